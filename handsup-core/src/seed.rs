use chrono::{DateTime, Duration, Utc};

use crate::domain::{EventDraft, Urgency, normalize_skills};

struct SeedEvent {
    name: &'static str,
    description: &'static str,
    location: &'static str,
    skills: &'static [&'static str],
    days_out: i64,
    urgency: Urgency,
}

const CATALOGUE: &[SeedEvent] = &[
    SeedEvent {
        name: "Food Bank Sorting",
        description: "Sort and shelve donated groceries for weekend distribution.",
        location: "Houston",
        skills: &["Organization", "Lifting"],
        days_out: 1,
        urgency: Urgency::High,
    },
    SeedEvent {
        name: "Community Garden Build",
        description: "Assemble raised beds and lay irrigation lines.",
        location: "Austin",
        skills: &["Gardening", "Carpentry"],
        days_out: 5,
        urgency: Urgency::Medium,
    },
    SeedEvent {
        name: "Shelter Meal Service",
        description: "Prepare and serve dinner at the downtown shelter.",
        location: "Houston",
        skills: &["Cooking", "Customer Service"],
        days_out: 3,
        urgency: Urgency::Critical,
    },
    SeedEvent {
        name: "Literacy Tutoring",
        description: "One-on-one reading sessions with elementary students.",
        location: "Dallas",
        skills: &["Teaching", "Patience"],
        days_out: 10,
        urgency: Urgency::Low,
    },
    SeedEvent {
        name: "Disaster Relief Supply Run",
        description: "Drive relief supplies to the coastal distribution centre.",
        location: "Galveston",
        skills: &["Driving", "Lifting", "First Aid"],
        days_out: 2,
        urgency: Urgency::Critical,
    },
    SeedEvent {
        name: "Park Cleanup",
        description: "Collect litter and clear trails along the bayou.",
        location: "Houston",
        skills: &["Teamwork"],
        days_out: 14,
        urgency: Urgency::Low,
    },
];

/// The built-in catalogue with dates relative to `now`.
pub fn default_events(now: DateTime<Utc>) -> Vec<EventDraft> {
    CATALOGUE
        .iter()
        .map(|seed| EventDraft {
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            location: seed.location.to_string(),
            required_skills: normalize_skills(seed.skills),
            date: now + Duration::days(seed.days_out),
            urgency: seed.urgency,
        })
        .collect()
}
