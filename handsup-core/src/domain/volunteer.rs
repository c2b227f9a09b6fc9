use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::VolunteerId;
use super::skills::normalize_skills;
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: VolunteerId,
    pub name: String,
    pub location: String,
    pub skills: BTreeSet<String>,
    pub preferences: Option<String>,
    #[serde(default)]
    pub availability: Vec<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

/// Profile body accepted by `POST/PUT /api/profile/{userId}` and by account
/// registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerProfile {
    pub name: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub preferences: Option<String>,
    #[serde(default)]
    pub availability: Vec<NaiveDate>,
}

/// Validated profile fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDraft {
    pub name: String,
    pub location: String,
    pub skills: BTreeSet<String>,
    pub preferences: Option<String>,
    pub availability: Vec<NaiveDate>,
}

impl VolunteerProfile {
    pub fn validate(&self) -> Result<ProfileDraft> {
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(CoreError::validation("missing required fields: name"));
        }

        let mut availability = self.availability.clone();
        availability.sort_unstable();
        availability.dedup();

        Ok(ProfileDraft {
            name: name.to_string(),
            location: self
                .location
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            skills: normalize_skills(&self.skills),
            preferences: self
                .preferences
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            availability,
        })
    }
}

impl ProfileDraft {
    pub fn into_volunteer(
        self,
        id: VolunteerId,
        updated_at: DateTime<Utc>,
    ) -> Volunteer {
        Volunteer {
            id,
            name: self.name,
            location: self.location,
            skills: self.skills,
            preferences: self.preferences,
            availability: self.availability,
            updated_at,
        }
    }
}
