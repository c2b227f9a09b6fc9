//! Volunteer/event compatibility scoring.
//!
//! The score blends four signals:
//!
//! | component | weight | value |
//! |-----------|--------|-------|
//! | skills    | 0.6    | Jaccard index of volunteer skills and required skills |
//! | location  | 0.2    | 1 on exact match, else 0 |
//! | time      | 0.2 x urgency | 0 past, 1 within a day, 0.8 within a week, else 0.5 |
//!
//! The urgency weight is forced to 0 when neither skills nor location overlap,
//! so an irrelevant but urgent event never outranks a relevant one.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::domain::{Event, Urgency, Volunteer};

const SKILL_WEIGHT: f64 = 0.6;
const LOCATION_WEIGHT: f64 = 0.2;
const TIME_WEIGHT: f64 = 0.2;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub skills: f64,
    pub location: f64,
    pub time: f64,
    pub urgency_weight: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedEvent {
    pub event: Event,
    #[serde(flatten)]
    pub breakdown: ScoreBreakdown,
}

/// Score a volunteer against an event as of `now`.
pub fn score(volunteer: &Volunteer, event: &Event, now: DateTime<Utc>) -> f64 {
    breakdown(volunteer, event, now).score
}

pub fn breakdown(
    volunteer: &Volunteer,
    event: &Event,
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    let skills = jaccard(&volunteer.skills, &event.required_skills);
    let location = location_similarity(&volunteer.location, &event.location);
    let time = time_bonus(event.date, now);
    let urgency_weight = if skills == 0.0 && location == 0.0 {
        0.0
    } else {
        urgency_weight(event.urgency)
    };

    let score = round_to(
        SKILL_WEIGHT * skills
            + LOCATION_WEIGHT * location
            + TIME_WEIGHT * time * urgency_weight,
        4,
    );

    ScoreBreakdown {
        skills,
        location,
        time,
        urgency_weight,
        score,
    }
}

/// Rank events for a volunteer, best first. Ties go to the sooner event,
/// then the lower id.
pub fn rank_events<'a, I>(
    volunteer: &Volunteer,
    events: I,
    now: DateTime<Utc>,
) -> Vec<RankedEvent>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut ranked: Vec<RankedEvent> = events
        .into_iter()
        .map(|event| RankedEvent {
            breakdown: breakdown(volunteer, event, now),
            event: event.clone(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.breakdown
            .score
            .total_cmp(&a.breakdown.score)
            .then_with(|| a.event.date.cmp(&b.event.date))
            .then_with(|| a.event.id.cmp(&b.event.id))
    });
    ranked
}

/// Intersection over union. An empty union divides by 1.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count().max(1);
    intersection as f64 / union as f64
}

fn location_similarity(a: &str, b: &str) -> f64 {
    if a == b { 1.0 } else { 0.0 }
}

fn time_bonus(date: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let delta = date - now;
    let days = delta.num_milliseconds() as f64 / MILLIS_PER_DAY;
    let bonus = if delta < TimeDelta::zero() {
        0.0
    } else if days <= 1.0 {
        1.0
    } else if days <= 7.0 {
        0.8
    } else {
        0.5
    };
    round_to(bonus, 3)
}

pub fn urgency_weight(urgency: Urgency) -> f64 {
    match urgency {
        Urgency::Critical | Urgency::High => 1.0,
        Urgency::Medium => 0.6,
        Urgency::Low => 0.3,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
