//! Per-connection WebSocket lifecycle
//!
//! Each accepted connection runs `handle_socket` as its own task: admit into
//! the registry, pump outbound messages and inbound frames through one
//! select loop, and clean up on the single exit path at the bottom no matter
//! how the loop ends.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::broadcast;
use crate::protocol::{ClientMessage, ProtocolError, ServerMessage};
use crate::registry::{ClientSender, ConnectionHandle};
use crate::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle one WebSocket connection from admission to cleanup
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = admit(&state, tx).await;
    tracing::info!("Client {} connected", handle.id);

    loop {
        tokio::select! {
            // Outbound: everything the registry fan-out queued for us
            outbound = rx.recv() => {
                match outbound {
                    Some(msg) => {
                        if sender.send(Message::Text(msg.to_string().into())).await.is_err() {
                            break;
                        }
                    }
                    // Our registry entry is gone; treat as closed
                    None => break,
                }
            }

            // Inbound: frames from the client
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(e) = relay_answer(&state, &text).await {
                            // Non-fatal: drop the frame, keep the connection
                            tracing::warn!("Ignoring message from {}: {}", handle.id, e);
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("WebSocket error for {}: {}", handle.id, e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    depart(&state, &handle).await;
}

/// Register a freshly upgraded connection and announce the new count to
/// everyone, the newcomer included
pub async fn admit(state: &AppState, sender: ClientSender) -> ConnectionHandle {
    let handle = state.registry.add(sender).await;
    broadcast::broadcast_connected_users(state).await;
    handle
}

/// Parse an inbound `<name>:<answer>` frame and relay it to every client
pub async fn relay_answer(state: &AppState, text: &str) -> Result<(), ProtocolError> {
    let ClientMessage::Answer { name, answer } = text.parse::<ClientMessage>()?;
    let snapshot = state.registry.snapshot().await;
    broadcast::broadcast(&snapshot, &ServerMessage::AnswerRelay { name, answer });
    Ok(())
}

/// Unregister a connection and announce the new count. Every exit path of
/// `handle_socket` funnels through this exactly once.
pub async fn depart(state: &AppState, handle: &ConnectionHandle) {
    state.registry.remove(handle).await;
    let session = chrono::Utc::now() - handle.connected_at;
    tracing::info!(
        "Client {} disconnected after {}s",
        handle.id,
        session.num_seconds()
    );
    broadcast::broadcast_connected_users(state).await;
}
