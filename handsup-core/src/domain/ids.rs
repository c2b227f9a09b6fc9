use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        #[cfg_attr(feature = "database", derive(sqlx::Type))]
        #[cfg_attr(feature = "database", sqlx(transparent))]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(
    /// Identifier of a volunteer profile.
    VolunteerId
);
define_id!(
    /// Identifier of an event.
    EventId
);
define_id!(AssignmentId);
define_id!(NoticeId);
define_id!(HistoryId);
define_id!(
    /// Identifier of a login account (credentials), distinct from the
    /// volunteer profile it owns.
    AccountId
);

/// Monotonic id source owned by a store instance.
///
/// Ids start at 1 and are never reused for the lifetime of the sequence.
#[derive(Debug)]
pub struct IdSequence {
    next: AtomicI64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }

    pub fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Make sure ids issued from now on are greater than `id`.
    pub fn advance_past(&self, id: i64) {
        self.next.fetch_max(id.saturating_add(1), Ordering::Relaxed);
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic_from_one() {
        let seq = IdSequence::new();
        assert_eq!(seq.next_id(), 1);
        assert_eq!(seq.next_id(), 2);
        assert_eq!(seq.next_id(), 3);
    }

    #[test]
    fn advance_past_skips_explicit_ids() {
        let seq = IdSequence::new();
        seq.advance_past(10);
        assert_eq!(seq.next_id(), 11);
        seq.advance_past(3);
        assert_eq!(seq.next_id(), 12);
    }

    #[test]
    fn ids_parse_from_path_segments() {
        assert_eq!(" 42".parse::<VolunteerId>().unwrap(), VolunteerId(42));
        assert!("abc".parse::<EventId>().is_err());
    }
}
