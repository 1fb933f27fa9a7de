mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::{read_json, TestApp};
use serde_json::json;
use tower::ServiceExt;

async fn submit_feedback(
    app: &TestApp,
    token: &str,
    event_id: &str,
    rating: i32,
) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/events/{}/feedback", event_id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(json!({
                "rating": rating, "comment": "Great match"
            }).to_string())).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_feedback_after_completed_event_succeeds() {
    let app = TestApp::new().await;
    let (_, owner_id) = app.register_and_login("Owner", "owner@example.com").await;
    let (player_token, player_id) = app.register_and_login("Player", "player@example.com").await;

    // Ended an hour ago.
    let event_id = app.insert_event_raw(&owner_id, Utc::now() - Duration::hours(2), 60, 5, 4).await;
    app.insert_reservation_raw(&player_id, &event_id, "JOINED").await;

    let res = submit_feedback(&app, &player_token, &event_id, 5).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    assert_eq!(body["rating"], 5);
    assert_eq!(body["comment"], "Great match");
}

#[tokio::test]
async fn test_feedback_before_event_end_rejected() {
    let app = TestApp::new().await;
    let (_, owner_id) = app.register_and_login("Owner", "owner2@example.com").await;
    let (player_token, player_id) = app.register_and_login("Player", "player2@example.com").await;

    // Still ongoing: started 10 minutes ago with an hour to run.
    let event_id = app.insert_event_raw(&owner_id, Utc::now() - Duration::minutes(10), 60, 5, 4).await;
    app.insert_reservation_raw(&player_id, &event_id, "JOINED").await;

    let res = submit_feedback(&app, &player_token, &event_id, 4).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Upcoming events reject too.
    let upcoming = app.insert_event_raw(&owner_id, Utc::now() + Duration::hours(1), 60, 5, 4).await;
    app.insert_reservation_raw(&player_id, &upcoming, "JOINED").await;
    let res = submit_feedback(&app, &player_token, &upcoming, 4).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_feedback_requires_joined_reservation() {
    let app = TestApp::new().await;
    let (_, owner_id) = app.register_and_login("Owner", "owner3@example.com").await;
    let (stranger_token, _) = app.register_and_login("Stranger", "stranger@example.com").await;
    let (quitter_token, quitter_id) = app.register_and_login("Quitter", "quitter@example.com").await;

    let event_id = app.insert_event_raw(&owner_id, Utc::now() - Duration::hours(2), 60, 5, 5).await;
    app.insert_reservation_raw(&quitter_id, &event_id, "CANCELLED").await;

    let res = submit_feedback(&app, &stranger_token, &event_id, 3).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = submit_feedback(&app, &quitter_token, &event_id, 3).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_feedback_rating_bounds() {
    let app = TestApp::new().await;
    let (_, owner_id) = app.register_and_login("Owner", "owner4@example.com").await;
    let (player_token, player_id) = app.register_and_login("Player", "player4@example.com").await;

    let event_id = app.insert_event_raw(&owner_id, Utc::now() - Duration::hours(2), 60, 5, 4).await;
    app.insert_reservation_raw(&player_id, &event_id, "JOINED").await;

    assert_eq!(submit_feedback(&app, &player_token, &event_id, 0).await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(submit_feedback(&app, &player_token, &event_id, 6).await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_feedback_for_event() {
    let app = TestApp::new().await;
    let (_, owner_id) = app.register_and_login("Owner", "owner5@example.com").await;
    let (player_token, player_id) = app.register_and_login("Player", "player5@example.com").await;

    let event_id = app.insert_event_raw(&owner_id, Utc::now() - Duration::hours(2), 60, 5, 4).await;
    app.insert_reservation_raw(&player_id, &event_id, "JOINED").await;

    assert_eq!(submit_feedback(&app, &player_token, &event_id, 5).await.status(), StatusCode::CREATED);

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/events/{}/feedback", event_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["rating"], 5);

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/events/no-such-event/feedback")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
