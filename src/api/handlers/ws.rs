use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use crate::error::AppError;
use crate::state::AppState;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::debug;

/// Live subscription to one event's notification topic.
///
/// Route: `GET /api/events/{event_id}/live`. The stream is fire-and-forget:
/// a client that reconnects must re-fetch authoritative state over HTTP
/// rather than expect a replay.
pub async fn event_live(
    ws: WebSocketUpgrade,
    Path(event_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, event.id, state)))
}

async fn handle_socket(socket: WebSocket, event_id: String, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let mut rx = state.hub.subscribe(&event_id).await;

    let forward_id = event_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Ok(notification) = rx.recv().await {
            let Ok(text) = serde_json::to_string(&notification) else {
                continue;
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                debug!(event_id = %forward_id, "Subscriber disconnected, closing forward loop");
                break;
            }
        }
    });

    // Drain the client side until it closes; inbound payloads are ignored.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            if let Message::Close(_) = message {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    // Dropping the receiver unsubscribed us; pruning the empty topic is
    // idempotent.
    state.hub.prune(&event_id).await;
}
