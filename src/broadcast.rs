//! Best-effort fan-out and the background question cycle

use crate::protocol::ServerMessage;
use crate::registry::ClientSender;
use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;

/// Deliver `message` to every sender in `snapshot` and return how many
/// accepted it. A failed send means the receiving connection task is already
/// gone; it is skipped so one dead connection never stalls the rest of the
/// batch, and the failure is not surfaced to the caller. An empty snapshot
/// is a no-op.
pub fn broadcast(snapshot: &[ClientSender], message: &ServerMessage) -> usize {
    let mut delivered = 0;
    for sender in snapshot {
        if sender.send(message.clone()).is_ok() {
            delivered += 1;
        } else {
            tracing::debug!("skipping closed connection during broadcast");
        }
    }
    delivered
}

/// Broadcast the current connection count to everyone in the registry
pub async fn broadcast_connected_users(state: &AppState) {
    let count = state.registry.size().await;
    let snapshot = state.registry.snapshot().await;
    broadcast(&snapshot, &ServerMessage::ConnectedUsers(count));
}

/// Spawn the perpetual question cycle: pick a random question, announce it,
/// count down, repeat. Runs whether or not anyone is connected; the only way
/// it stops is process shutdown.
pub fn spawn_question_cycle(state: Arc<AppState>) {
    tokio::spawn(async move {
        loop {
            let question = state.questions.pick().clone();
            tracing::info!("Broadcasting question: {}", question.question);

            let snapshot = state.registry.snapshot().await;
            broadcast(&snapshot, &ServerMessage::Question(question));

            run_countdown(&state, state.config.countdown_seconds).await;
        }
    });
}

/// Broadcast one countdown: `remaining_time:<N>` for N = `seconds` down to 0
/// inclusive, with a one-second pause after each tick. The sleep is a
/// suspension point; connection tasks keep running throughout.
pub async fn run_countdown(state: &AppState, seconds: u32) {
    for remaining in (0..=seconds).rev() {
        let snapshot = state.registry.snapshot().await;
        broadcast(&snapshot, &ServerMessage::RemainingTime(remaining));
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}
