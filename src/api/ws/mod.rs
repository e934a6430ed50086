//! WebSocket handler for dashboard subscriptions
//!
//! Each connection gets a bounded outbound queue from the hub; this task
//! drains it onto the socket and drops inbound frames. One slow dashboard
//! never delays anyone else: if its queue backs up, the hub unregisters it
//! and the drained channel ends this task.

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use futures::{SinkExt, StreamExt};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/ws", get(upgrade))
}

/// GET /ws - upgrade to WebSocket
async fn upgrade(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: ServerState) {
    let (mut ws_sink, mut ws_stream) = socket.split();
    let (connection_id, mut outbound) = state.hub.register();
    let shutdown = state.hub.shutdown_token().clone();

    loop {
        tokio::select! {
            // Server shutting down
            _ = shutdown.cancelled() => {
                tracing::info!(connection_id = %connection_id, "Closing dashboard connection on shutdown");
                break;
            }

            // Event queued by the hub for this connection
            queued = outbound.recv() => {
                match queued {
                    Some(text) => {
                        if ws_sink.send(Message::Text(text.into())).await.is_err() {
                            tracing::info!(connection_id = %connection_id, "Dashboard write failed");
                            break;
                        }
                    }
                    // Hub dropped this connection (slow or already removed)
                    None => break,
                }
            }

            // Incoming frame from the dashboard
            inbound = ws_stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        // Dashboards only listen; inbound text is logged, not interpreted
                        tracing::debug!(connection_id = %connection_id, message = %text.as_str(), "Ignoring inbound dashboard message");
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!(connection_id = %connection_id, "Dashboard disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(connection_id = %connection_id, "WebSocket error: {e}");
                        break;
                    }
                    _ => {} // Binary, Pong: ignore
                }
            }
        }
    }

    // Best-effort close frame, then drop out of the live set
    let _ = ws_sink.close().await;
    state.hub.unregister(&connection_id);
}
