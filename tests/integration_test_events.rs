mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::{event_payload, read_json, TestApp};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_create_event_requires_auth() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/events")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(event_payload(5).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_event_starts_fully_available() {
    let app = TestApp::new().await;
    let (token, user_id) = app.register_and_login("Owner", "owner@example.com").await;

    let event = app.create_event(&token, event_payload(8)).await;

    assert_eq!(event["total_slots"], 8);
    assert_eq!(event["available_slots"], 8);
    assert_eq!(event["created_by"], user_id.as_str());
}

#[tokio::test]
async fn test_create_event_validation() {
    let app = TestApp::new().await;
    let (token, _) = app.register_and_login("Owner", "owner2@example.com").await;

    let cases = vec![
        {
            let mut p = event_payload(5);
            p["category"] = json!("chess");
            p
        },
        event_payload(0),
        {
            let mut p = event_payload(5);
            p["duration_min"] = json!(0);
            p
        },
        {
            let mut p = event_payload(5);
            p["time"] = json!((Utc::now() - Duration::hours(1)).to_rfc3339());
            p
        },
        {
            let mut p = event_payload(5);
            p["title"] = json!("ab");
            p
        },
    ];

    for payload in cases {
        let res = app.router.clone().oneshot(
            Request::builder().method("POST").uri("/api/events")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(payload.to_string())).unwrap()
        ).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_list_events_with_filters() {
    let app = TestApp::new().await;
    let (token, _) = app.register_and_login("Owner", "owner3@example.com").await;

    let mut soccer = event_payload(5);
    soccer["location"] = json!("Riverside Park");
    app.create_event(&token, soccer).await;

    let mut hoops = event_payload(5);
    hoops["category"] = json!("basketball");
    hoops["location"] = json!("Downtown Gym");
    app.create_event(&token, hoops).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/events")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(read_json(res).await.as_array().unwrap().len(), 2);

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/events?category=basketball")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let body = read_json(res).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["location"], "Downtown Gym");

    // q is an alias for the location search
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/events?q=riverside")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let body = read_json(res).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["location"], "Riverside Park");
}

#[tokio::test]
async fn test_get_event_includes_creator() {
    let app = TestApp::new().await;
    let (token, user_id) = app.register_and_login("Owner", "owner4@example.com").await;
    let event = app.create_event(&token, event_payload(5)).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/events/{}", event["id"].as_str().unwrap()))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["creator"]["id"], user_id.as_str());
    assert_eq!(body["creator"]["name"], "Owner");
}

#[tokio::test]
async fn test_event_status_endpoint() {
    let app = TestApp::new().await;
    let (token, user_id) = app.register_and_login("Owner", "owner5@example.com").await;
    let event = app.create_event(&token, event_payload(5)).await;
    let event_id = event["id"].as_str().unwrap();

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/events/{}/status", event_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["status"], "upcoming");
    assert!(body["time_remaining_ms"].as_i64().unwrap() > 0);

    // An ongoing event reports time to its end.
    let ongoing = app.insert_event_raw(&user_id, Utc::now() - Duration::minutes(10), 60, 5, 5).await;
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/events/{}/status", ongoing))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let body = read_json(res).await;
    assert_eq!(body["status"], "ongoing");

    // A stored row with an invalid duration must refuse classification.
    let broken = app.insert_event_raw(&user_id, Utc::now() + Duration::hours(1), 0, 5, 5).await;
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/events/{}/status", broken))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_event_only_creator() {
    let app = TestApp::new().await;
    let (owner_token, _) = app.register_and_login("Owner", "owner6@example.com").await;
    let (other_token, _) = app.register_and_login("Other", "other6@example.com").await;
    let event = app.create_event(&owner_token, event_payload(5)).await;
    let event_id = event["id"].as_str().unwrap();

    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/events/{}", event_id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", other_token))
            .body(Body::from(json!({"title": "Hijacked"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/events/{}", event_id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", owner_token))
            .body(Body::from(json!({"title": "Saturday Pickup Soccer"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["title"], "Saturday Pickup Soccer");
}

#[tokio::test]
async fn test_resize_below_participants_rejected() {
    let app = TestApp::new().await;
    let (owner_token, owner_id) = app.register_and_login("Owner", "owner7@example.com").await;

    // 5 total, 2 available: 3 participants already hold slots.
    let event_id = app.insert_event_raw(&owner_id, Utc::now() + Duration::hours(3), 90, 5, 2).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/events/{}", event_id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", owner_token))
            .body(Body::from(json!({"total_slots": 2}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = read_json(res).await;
    assert!(body["error"].as_str().unwrap().contains("participants"));

    // Nothing changed.
    assert_eq!(app.event_row(&event_id).await, (5, 2));
}

#[tokio::test]
async fn test_resize_reconciles_available_slots() {
    let app = TestApp::new().await;
    let (owner_token, owner_id) = app.register_and_login("Owner", "owner8@example.com").await;

    let event_id = app.insert_event_raw(&owner_id, Utc::now() + Duration::hours(3), 90, 5, 2).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/events/{}", event_id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", owner_token))
            .body(Body::from(json!({"total_slots": 4}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["total_slots"], 4);
    // newAvailable = newTotal - participants = 4 - 3
    assert_eq!(body["available_slots"], 1);
}

#[tokio::test]
async fn test_delete_event_only_creator() {
    let app = TestApp::new().await;
    let (owner_token, _) = app.register_and_login("Owner", "owner9@example.com").await;
    let (other_token, _) = app.register_and_login("Other", "other9@example.com").await;
    let event = app.create_event(&owner_token, event_payload(5)).await;
    let event_id = event["id"].as_str().unwrap();

    // A participant joining must not block the owner's delete later.
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/events/{}/join", event_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", other_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/events/{}", event_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", other_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/events/{}", event_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", owner_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/events/{}", event_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
