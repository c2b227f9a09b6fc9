use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::EventId;
use super::skills::normalize_skills;
use crate::error::{CoreError, Result};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum Urgency {
    #[serde(alias = "low")]
    Low,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
    #[serde(alias = "critical")]
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
            Urgency::Critical => "Critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            "critical" => Ok(Urgency::Critical),
            other => Err(CoreError::validation(format!(
                "unknown urgency '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub required_skills: BTreeSet<String>,
    #[serde(rename = "eventDate")]
    pub date: DateTime<Utc>,
    pub urgency: Urgency,
    pub created_at: DateTime<Utc>,
}

/// Raw create/update body as posted by the front end. Every field is optional
/// so that missing fields surface as a validation error rather than a
/// deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub event_date: Option<String>,
    pub urgency: Option<Urgency>,
}

/// A validated event ready to be written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub name: String,
    pub description: String,
    pub location: String,
    pub required_skills: BTreeSet<String>,
    pub date: DateTime<Utc>,
    pub urgency: Urgency,
}

impl EventDraft {
    pub fn into_event(self, id: EventId, created_at: DateTime<Utc>) -> Event {
        Event {
            id,
            name: self.name,
            description: self.description,
            location: self.location,
            required_skills: self.required_skills,
            date: self.date,
            urgency: self.urgency,
            created_at,
        }
    }
}

/// Validate an event payload.
///
/// Blank `name`, `description`, `location` or `eventDate`, or a skill list
/// that is empty after trimming, fail with a single "missing required fields"
/// error naming every offending field. Urgency defaults to `Medium`.
pub fn ensure_event_payload(payload: &EventPayload) -> Result<EventDraft> {
    let name = non_blank(payload.name.as_deref());
    let description = non_blank(payload.description.as_deref());
    let location = non_blank(payload.location.as_deref());
    let event_date = non_blank(payload.event_date.as_deref());
    let required_skills = normalize_skills(&payload.required_skills);

    let mut missing = Vec::new();
    if name.is_none() {
        missing.push("name");
    }
    if description.is_none() {
        missing.push("description");
    }
    if location.is_none() {
        missing.push("location");
    }
    if event_date.is_none() {
        missing.push("eventDate");
    }
    if required_skills.is_empty() {
        missing.push("requiredSkills");
    }

    let (Some(name), Some(description), Some(location), Some(event_date)) =
        (name, description, location, event_date)
    else {
        return Err(missing_fields(&missing));
    };
    if !missing.is_empty() {
        return Err(missing_fields(&missing));
    }

    let date = parse_event_date(event_date)?;

    Ok(EventDraft {
        name: name.to_string(),
        description: description.to_string(),
        location: location.to_string(),
        required_skills,
        date,
        urgency: payload.urgency.unwrap_or_default(),
    })
}

/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM[:SS]` (read as UTC)
/// and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_event_date(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
    {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }
    Err(CoreError::validation(format!("invalid eventDate '{raw}'")))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn missing_fields(fields: &[&str]) -> CoreError {
    CoreError::validation(format!(
        "missing required fields: {}",
        fields.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload() -> EventPayload {
        EventPayload {
            name: Some("Food Drive".into()),
            description: Some("Sort donations".into()),
            location: Some("Houston".into()),
            required_skills: vec!["lifting".into(), "sorting".into()],
            event_date: Some("2025-03-01T09:00:00Z".into()),
            urgency: Some(Urgency::High),
        }
    }

    #[test]
    fn accepts_complete_payload() {
        let draft = ensure_event_payload(&payload()).unwrap();
        assert_eq!(draft.name, "Food Drive");
        assert_eq!(draft.urgency, Urgency::High);
        assert_eq!(
            draft.date,
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn blank_fields_are_reported_together() {
        let mut p = payload();
        p.name = Some("   ".into());
        p.location = None;
        let err = ensure_event_payload(&p).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("missing required fields"));
        assert!(message.contains("name"));
        assert!(message.contains("location"));
        assert!(!message.contains("description"));
    }

    #[test]
    fn missing_date_or_description_is_rejected() {
        let mut p = payload();
        p.event_date = Some(String::new());
        assert!(matches!(
            ensure_event_payload(&p),
            Err(CoreError::Validation(msg)) if msg.contains("eventDate")
        ));

        let mut p = payload();
        p.description = None;
        assert!(matches!(
            ensure_event_payload(&p),
            Err(CoreError::Validation(msg)) if msg.contains("description")
        ));
    }

    #[test]
    fn blank_skill_list_is_rejected() {
        let mut p = payload();
        p.required_skills = vec!["  ".into(), String::new()];
        let err = ensure_event_payload(&p).unwrap_err();
        assert!(err.to_string().contains("requiredSkills"));
    }

    #[test]
    fn skills_are_trimmed_and_deduplicated() {
        let mut p = payload();
        p.required_skills =
            vec![" lifting".into(), "lifting ".into(), "Lifting".into()];
        let draft = ensure_event_payload(&p).unwrap();
        assert_eq!(draft.required_skills.len(), 2);
        assert!(draft.required_skills.contains("lifting"));
        assert!(draft.required_skills.contains("Lifting"));
    }

    #[test]
    fn urgency_defaults_to_medium() {
        let mut p = payload();
        p.urgency = None;
        assert_eq!(ensure_event_payload(&p).unwrap().urgency, Urgency::Medium);
    }

    #[test]
    fn parses_supported_date_shapes() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
        assert_eq!(parse_event_date("2025-06-02").unwrap(), expected);
        assert_eq!(parse_event_date("2025-06-02T00:00").unwrap(), expected);
        assert_eq!(
            parse_event_date("2025-06-02T02:00:00+02:00").unwrap(),
            expected
        );
        assert!(parse_event_date("next tuesday").is_err());
    }

    #[test]
    fn urgency_parses_case_insensitively() {
        assert_eq!("critical".parse::<Urgency>().unwrap(), Urgency::Critical);
        assert_eq!(" HIGH ".parse::<Urgency>().unwrap(), Urgency::High);
        assert!("urgent".parse::<Urgency>().is_err());
    }
}
