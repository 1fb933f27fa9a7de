use axum::{extract::State, response::IntoResponse, Json};
use crate::api::dtos::requests::ChatRequest;
use crate::api::dtos::responses::ChatResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::chat::AiChatLog;
use crate::domain::models::event::CATEGORIES;
use crate::domain::ports::EventFilter;
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

const SYSTEM_INSTRUCTION: &str =
    "You are a sports event recommendation assistant. Briefly describe and promote the matching events listed in the prompt. Keep the reply short.";

pub async fn chat(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.history.is_empty() {
        return Err(AppError::Validation("History array is required".into()));
    }

    // Naive preference extraction: the first user message names a category,
    // the second a location.
    let mut category = None;
    let mut location = None;
    for message in payload.history.iter().filter(|m| m.role == "user") {
        let content = message.content.trim().to_lowercase();
        if category.is_none() {
            category = Some(content);
        } else if location.is_none() {
            location = Some(content);
            break;
        }
    }

    let filter = EventFilter {
        category: category.filter(|c| CATEGORIES.contains(&c.as_str())),
        location,
    };

    let now = Utc::now();
    let events: Vec<_> = state.event_repo.list(&filter).await?
        .into_iter()
        .filter(|e| e.time >= now)
        .collect();

    let last_message = payload.history.last()
        .map(|m| m.content.clone())
        .unwrap_or_default();

    let reply = if events.is_empty() {
        "Sorry, no upcoming events match your request yet.".to_string()
    } else {
        let event_list = events.iter()
            .map(|e| format!("- {} at {} on {}", e.title, e.location, e.time.to_rfc3339()))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Matching upcoming events:\n{}\n\nUser request: {}",
            event_list, last_message
        );
        state.llm_service.generate(&state.config.ai_api_key, &prompt, SYSTEM_INSTRUCTION).await?
    };

    let log = AiChatLog::new(claims.sub, last_message, reply.clone());
    if let Err(e) = state.chat_log_repo.create(&log).await {
        warn!("Failed to persist AI chat log: {:?}", e);
    }

    Ok(Json(ChatResponse { reply }))
}
