use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::debug;

use crate::state::SharedState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: SharedState) {
    // Send initial status snapshot
    let envelope = serde_json::json!({
        "type": "status",
        "data": state.bot.status(),
    });
    if let Ok(json) = serde_json::to_string(&envelope) {
        if socket.send(Message::Text(json.into())).await.is_err() {
            return;
        }
    }

    let mut status_rx = state.bot.subscribe();
    let mut log_rx = state.logs.subscribe();
    let mut shutdown_rx = state.shutdown_tx.subscribe();

    loop {
        tokio::select! {
            // Shutdown notification — tell client and close
            _ = shutdown_rx.recv() => {
                let _ = socket.send(Message::Text(r#"{"type":"shutdown"}"#.into())).await;
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
            // New status snapshot
            result = status_rx.changed() => {
                if result.is_err() {
                    break;
                }
                let envelope = serde_json::json!({
                    "type": "status",
                    "data": status_rx.borrow_and_update().clone(),
                });
                if let Ok(json) = serde_json::to_string(&envelope) {
                    if socket.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
            }
            // New log entry — lagged receivers skip ahead
            result = log_rx.recv() => {
                match result {
                    Ok(entry) => {
                        let envelope = serde_json::json!({
                            "type": "log",
                            "data": entry,
                        });
                        if let Ok(json) = serde_json::to_string(&envelope) {
                            if socket.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(_) => break,
                }
            }
            // Client messages — handle ping/pong/close
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {} // Ignore text/binary from client
                }
            }
        }
    }

    debug!("WebSocket client disconnected");
}
