use anyhow::Result;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::{Value, json};

#[path = "support/mod.rs"]
mod support;

use support::{bearer, build_test_app, register};

async fn create_event(
    server: &TestServer,
    admin: &str,
    name: &str,
    location: &str,
    skills: &[&str],
    offset: Duration,
) -> i64 {
    let response = server
        .post("/api/events")
        .add_header("Authorization", bearer(admin))
        .json(&json!({
            "name": name,
            "description": "Volunteer shift",
            "location": location,
            "requiredSkills": skills,
            "eventDate": (Utc::now() + offset).to_rfc3339(),
            "urgency": "High",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["data"]["id"].as_i64().expect("event id")
}

#[tokio::test]
async fn volunteers_edit_only_their_own_profile() -> Result<()> {
    let server = build_test_app().server()?;
    let (admin, _) = register(&server, "admin@example.org", "Admin").await;
    let (robin, robin_id) =
        register(&server, "robin@example.org", "Robin").await;
    let (_, sam_id) = register(&server, "sam@example.org", "Sam").await;

    let own = server
        .put(&format!("/api/profile/{robin_id}"))
        .add_header("Authorization", bearer(&robin))
        .json(&json!({
            "name": "Robin B.",
            "location": "Austin",
            "skills": ["Driving", "Driving "],
            "availability": ["2030-05-02", "2030-05-01", "2030-05-02"],
        }))
        .await;
    own.assert_status_ok();
    let own: Value = own.json();
    assert_eq!(own["data"]["name"], "Robin B.");
    assert_eq!(own["data"]["skills"], json!(["Driving"]));
    assert_eq!(
        own["data"]["availability"],
        json!(["2030-05-01", "2030-05-02"])
    );

    let fetched: Value = server
        .get(&format!("/api/profile/{robin_id}"))
        .add_header("Authorization", bearer(&robin))
        .await
        .json();
    assert_eq!(fetched["data"]["location"], "Austin");

    server
        .post(&format!("/api/profile/{sam_id}"))
        .add_header("Authorization", bearer(&robin))
        .json(&json!({ "name": "Not Sam" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    server
        .post(&format!("/api/profile/{sam_id}"))
        .add_header("Authorization", bearer(&admin))
        .json(&json!({ "name": "Samantha", "location": "Houston" }))
        .await
        .assert_status_ok();

    server
        .put(&format!("/api/profile/{robin_id}"))
        .add_header("Authorization", bearer(&robin))
        .json(&json!({ "location": "Austin" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .get("/api/profile/999")
        .add_header("Authorization", bearer(&robin))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn match_ranks_relevant_events_first() -> Result<()> {
    let server = build_test_app().server()?;
    let (admin, _) = register(&server, "admin@example.org", "Admin").await;
    let (robin, robin_id) =
        register(&server, "robin@example.org", "Robin").await;

    create_event(
        &server,
        &admin,
        "Coding Club",
        "Dallas",
        &["Python"],
        Duration::hours(20),
    )
    .await;
    let kitchen = create_event(
        &server,
        &admin,
        "Soup Kitchen",
        "Houston",
        &["Cooking", "First Aid"],
        Duration::hours(20),
    )
    .await;

    let response = server
        .get(&format!("/api/match/{robin_id}"))
        .add_header("Authorization", bearer(&robin))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let ranked = body["data"].as_array().expect("ranked events");
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0]["event"]["id"], kitchen);
    assert_eq!(ranked[0]["score"], 1.0);
    assert_eq!(ranked[1]["score"], 0.0);
    assert_eq!(ranked[1]["urgencyWeight"], 0.0);

    let limited: Value = server
        .get(&format!("/api/match/{robin_id}?limit=1"))
        .add_header("Authorization", bearer(&robin))
        .await
        .json();
    assert_eq!(limited["data"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn score_accepts_ids_or_inline_records() -> Result<()> {
    let server = build_test_app().server()?;
    let (admin, _) = register(&server, "admin@example.org", "Admin").await;
    let (robin, robin_id) =
        register(&server, "robin@example.org", "Robin").await;
    let event = create_event(
        &server,
        &admin,
        "Soup Kitchen",
        "Houston",
        &["Cooking", "Driving"],
        Duration::days(3),
    )
    .await;

    let by_id = server
        .post("/api/match/score")
        .add_header("Authorization", bearer(&robin))
        .json(&json!({ "volunteerId": robin_id, "eventId": event }))
        .await;
    by_id.assert_status_ok();
    let by_id: Value = by_id.json();
    // 1 of 3 skills shared, same city, within a week, high urgency.
    let skills = by_id["data"]["skills"].as_f64().expect("skills component");
    assert!((skills - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(by_id["data"]["location"], 1.0);
    assert_eq!(by_id["data"]["time"], 0.8);
    assert_eq!(by_id["data"]["score"], 0.56);

    let inline = server
        .post("/api/match/score")
        .add_header("Authorization", bearer(&robin))
        .json(&json!({
            "volunteer": { "skills": ["Cooking"], "location": "Houston" },
            "event": {
                "requiredSkills": ["Cooking"],
                "location": "Houston",
                "eventDate": (Utc::now() + Duration::hours(12)).to_rfc3339(),
                "urgency": "High",
            },
        }))
        .await;
    inline.assert_status_ok();
    let inline: Value = inline.json();
    assert_eq!(inline["data"]["score"], 1.0);

    server
        .post("/api/match/score")
        .add_header("Authorization", bearer(&robin))
        .json(&json!({ "volunteerId": robin_id, "eventId": 999 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn participation_history_is_scoped_to_the_volunteer() -> Result<()> {
    let server = build_test_app().server()?;
    let (admin, _) = register(&server, "admin@example.org", "Admin").await;
    let (robin, robin_id) =
        register(&server, "robin@example.org", "Robin").await;
    let (sam, sam_id) = register(&server, "sam@example.org", "Sam").await;
    let event = create_event(
        &server,
        &admin,
        "Soup Kitchen",
        "Houston",
        &["Cooking"],
        -Duration::days(2),
    )
    .await;

    let recorded = server
        .post("/api/volunteer-history")
        .add_header("Authorization", bearer(&admin))
        .json(&json!({
            "volunteerId": robin_id,
            "eventId": event,
            "status": "attended",
            "hours": 3.5,
        }))
        .await;
    recorded.assert_status(StatusCode::CREATED);

    let own: Value = server
        .get("/api/volunteer-history")
        .add_header("Authorization", bearer(&robin))
        .await
        .json();
    let own = own["data"].as_array().expect("history array").clone();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0]["status"], "attended");
    assert_eq!(own[0]["hours"], 3.5);
    assert_eq!(own[0]["event"]["name"], "Soup Kitchen");

    let sams: Value = server
        .get("/api/volunteer-history")
        .add_header("Authorization", bearer(&sam))
        .await
        .json();
    assert_eq!(sams["data"], json!([]));

    server
        .get(&format!("/api/volunteer-history?volunteer_id={robin_id}"))
        .add_header("Authorization", bearer(&sam))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    server
        .get(&format!("/api/volunteer-history/{robin_id}"))
        .add_header("Authorization", bearer(&sam))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let as_admin: Value = server
        .get(&format!("/api/volunteer-history/{robin_id}"))
        .add_header("Authorization", bearer(&admin))
        .await
        .json();
    assert_eq!(as_admin["data"].as_array().map(Vec::len), Some(1));

    // Unknown events and volunteers are rejected; volunteers cannot record.
    server
        .post("/api/volunteer-history")
        .add_header("Authorization", bearer(&admin))
        .json(&json!({
            "volunteerId": sam_id,
            "eventId": 999,
            "status": "registered"
        }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .post("/api/volunteer-history")
        .add_header("Authorization", bearer(&sam))
        .json(&json!({
            "volunteerId": sam_id,
            "eventId": event,
            "status": "registered"
        }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    Ok(())
}
