//! WebSocket upgrade + message loop. Each client message is parsed as JSON
//! and fed to the per-connection game session; every reply the session
//! produces is sent back as its own JSON message. Timed advances therefore
//! arrive as delayed pushes on the same socket.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::session::Session;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(
  ws: WebSocketUpgrade,
  State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
  info!(target: "wordquest_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "wordquest_backend", "WebSocket connected");
  let mut session = Session::new((*state).clone());

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize each response.
        let replies = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "wordquest_backend", "WS received: {:?}", &incoming);
            session.handle(incoming).await
          }
          Err(e) => vec![ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }],
        };

        let mut failed = false;
        for reply in replies {
          let out = serde_json::to_string(&reply).unwrap_or_else(|e| {
            serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) })
              .to_string()
          });
          if let Err(e) = socket.send(Message::Text(out)).await {
            error!(target: "wordquest_backend", error = %e, "WS send error");
            failed = true;
            break;
          }
        }
        if failed {
          break;
        }
      }
      Message::Ping(payload) => {
        let _ = socket.send(Message::Pong(payload)).await;
      }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "wordquest_backend", "WebSocket disconnected");
}
