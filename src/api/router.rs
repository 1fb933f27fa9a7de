use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, event, feedback, health, recommend, rsvp, ws};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))

        // Events
        .route("/api/events", post(event::create_event).get(event::list_events))
        .route("/api/events/{event_id}", get(event::get_event).put(event::update_event).delete(event::delete_event))
        .route("/api/events/{event_id}/status", get(event::get_event_status))

        // RSVP
        .route("/api/events/{event_id}/join", post(rsvp::join_event))
        .route("/api/events/{event_id}/leave", post(rsvp::leave_event))
        .route("/api/my-events", get(rsvp::my_events))

        // Feedback
        .route("/api/events/{event_id}/feedback", post(feedback::create_feedback).get(feedback::list_feedback))

        // AI recommendations
        .route("/api/ai-chat", post(recommend::chat))

        // Live countdown / capacity stream
        .route("/api/events/{event_id}/live", get(ws::event_live))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
