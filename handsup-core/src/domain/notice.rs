use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::event::Event;
use super::ids::{EventId, NoticeId, VolunteerId};
use crate::error::{CoreError, Result};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    #[default]
    Info,
    Success,
    Warn,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Info => "info",
            NoticeKind::Success => "success",
            NoticeKind::Warn => "warn",
            NoticeKind::Error => "error",
        }
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoticeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "info" => Ok(NoticeKind::Info),
            "success" => Ok(NoticeKind::Success),
            "warn" => Ok(NoticeKind::Warn),
            "error" => Ok(NoticeKind::Error),
            other => Err(CoreError::validation(format!(
                "unknown notice type '{other}'"
            ))),
        }
    }
}

/// A user-facing message tied to a volunteer. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: NoticeId,
    pub volunteer_id: VolunteerId,
    /// Event the notice is about, when there is one. Reminder dedup keys on
    /// this.
    pub event_id: Option<EventId>,
    pub title: String,
    pub body: Option<String>,
    #[serde(rename = "type")]
    pub kind: NoticeKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotice {
    pub volunteer_id: VolunteerId,
    #[serde(default)]
    pub event_id: Option<EventId>,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: NoticeKind,
}

impl NewNotice {
    pub fn new(volunteer_id: VolunteerId, title: impl Into<String>) -> Self {
        Self {
            volunteer_id,
            event_id: None,
            title: title.into(),
            body: None,
            kind: NoticeKind::Info,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_kind(mut self, kind: NoticeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn for_event(mut self, event_id: EventId) -> Self {
        self.event_id = Some(event_id);
        self
    }

    /// The `warn` notice the reminder scheduler sends for an upcoming event.
    pub fn reminder(volunteer_id: VolunteerId, event: &Event) -> Self {
        Self::new(volunteer_id, format!("Reminder: {} tomorrow", event.name))
            .with_body(format!(
                "{} • {}",
                event.location,
                event.date.to_rfc3339_opts(SecondsFormat::Millis, true)
            ))
            .with_kind(NoticeKind::Warn)
            .for_event(event.id)
    }

    /// The `success` notice sent when a volunteer is assigned to an event.
    ///
    /// Carries no event id, so it never counts as a reminder for dedup.
    pub fn assigned(volunteer_id: VolunteerId, event: &Event) -> Self {
        Self::new(volunteer_id, format!("Assigned: {}", event.name))
            .with_body(format!(
                "{} • {}",
                event.location,
                event.date.to_rfc3339_opts(SecondsFormat::Millis, true)
            ))
            .with_kind(NoticeKind::Success)
    }

    /// Trim the title and body, rejecting a blank title.
    pub fn validated(mut self) -> Result<Self> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CoreError::validation("missing required fields: title"));
        }
        self.title = title.to_string();
        self.body = self
            .body
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string);
        Ok(self)
    }

    pub fn into_notice(
        self,
        id: NoticeId,
        created_at: DateTime<Utc>,
    ) -> Notice {
        Notice {
            id,
            volunteer_id: self.volunteer_id,
            event_id: self.event_id,
            title: self.title,
            body: self.body,
            kind: self.kind,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::Urgency;
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    #[test]
    fn reminder_notice_shape() {
        let event = Event {
            id: EventId(7),
            name: "Beach Cleanup".into(),
            description: "Bring gloves".into(),
            location: "Galveston".into(),
            required_skills: BTreeSet::new(),
            date: Utc.with_ymd_and_hms(2025, 5, 1, 14, 30, 0).unwrap(),
            urgency: Urgency::Low,
            created_at: Utc::now(),
        };
        let notice = NewNotice::reminder(VolunteerId(3), &event);
        assert_eq!(notice.kind, NoticeKind::Warn);
        assert_eq!(notice.title, "Reminder: Beach Cleanup tomorrow");
        assert_eq!(
            notice.body.as_deref(),
            Some("Galveston • 2025-05-01T14:30:00.000Z")
        );
        assert_eq!(notice.event_id, Some(EventId(7)));
    }

    #[test]
    fn blank_title_is_rejected() {
        let result = NewNotice::new(VolunteerId(1), "  ").validated();
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn serializes_kind_as_type() {
        let notice = NewNotice::new(VolunteerId(1), "Hello")
            .with_kind(NoticeKind::Success)
            .into_notice(NoticeId(1), Utc::now());
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["type"], "success");
        assert_eq!(json["volunteerId"], 1);
    }
}
