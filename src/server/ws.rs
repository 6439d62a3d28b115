//! WebSocket alert delivery
//!
//! Each connection on `/ws` registers with the hub, forwards serialized
//! alert frames to the client, and ignores anything the client sends
//! (reserved for future control messages). Closing the connection, or any
//! write failure, unregisters the subscriber.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use tracing::debug;

use super::router::AppState;

/// Upgrade handler for `/ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one subscriber connection until it closes or fails
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut subscription = state.hub.register().await;
    let id = subscription.id;
    debug!(subscriber = id, "WebSocket subscriber connected");

    loop {
        tokio::select! {
            frame = subscription.frames.recv() => {
                match frame {
                    Some(frame) => {
                        if socket.send(Message::Text(frame)).await.is_err() {
                            break;
                        }
                    }
                    // Hub dropped us (failed delivery already unregistered).
                    None => break,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    // Client frames are accepted and ignored.
                    Some(Ok(Message::Text(_) | Message::Binary(_) | Message::Ping(_) | Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                }
            }
        }
    }

    state.hub.unregister(id).await;
    debug!(subscriber = id, "WebSocket subscriber disconnected");
}
