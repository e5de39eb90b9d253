//! Connection registry: the shared set of live client connections
//!
//! Every connection task adds itself on admission and removes itself on exit;
//! the question cycle only ever reads snapshots. Membership can lag true
//! socket state until the next failed send resolves it.

use crate::protocol::ServerMessage;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

pub type ConnectionId = String;
pub type ClientSender = mpsc::UnboundedSender<ServerMessage>;

/// One live client connection as seen by the rest of the server
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub connected_at: chrono::DateTime<chrono::Utc>,
}

/// Thread-safe map of connection id to outbound sender
#[derive(Clone)]
pub struct ConnectionRegistry {
    connections: Arc<RwLock<HashMap<ConnectionId, ClientSender>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a connection and hand back its handle. Ids are freshly
    /// minted ULIDs, so a handle can never be inserted twice.
    pub async fn add(&self, sender: ClientSender) -> ConnectionHandle {
        let handle = ConnectionHandle {
            id: ulid::Ulid::new().to_string(),
            connected_at: chrono::Utc::now(),
        };
        self.connections
            .write()
            .await
            .insert(handle.id.clone(), sender);
        handle
    }

    /// Remove a connection; silent no-op if it is already gone, so racing
    /// disconnect paths can both call this safely.
    pub async fn remove(&self, handle: &ConnectionHandle) {
        self.connections.write().await.remove(&handle.id);
    }

    /// Point-in-time copy of every live sender, safe to iterate while the
    /// registry keeps changing underneath.
    pub async fn snapshot(&self) -> Vec<ClientSender> {
        self.connections.read().await.values().cloned().collect()
    }

    /// Number of connections at the time of the call
    pub async fn size(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> (ClientSender, mpsc::UnboundedReceiver<ServerMessage>) {
        mpsc::unbounded_channel()
    }

    #[tokio::test]
    async fn test_add_and_remove() {
        let registry = ConnectionRegistry::new();
        assert_eq!(registry.size().await, 0);

        let (tx, _rx) = sender();
        let handle = registry.add(tx).await;
        assert_eq!(registry.size().await, 1);

        registry.remove(&handle).await;
        assert_eq!(registry.size().await, 0);
    }

    #[tokio::test]
    async fn test_double_remove_is_noop() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = sender();
        let handle = registry.add(tx).await;

        registry.remove(&handle).await;
        registry.remove(&handle).await;
        assert_eq!(registry.size().await, 0);
    }

    #[tokio::test]
    async fn test_size_tracks_connect_disconnect_sequence() {
        let registry = ConnectionRegistry::new();

        let (tx_a, _rx_a) = sender();
        let (tx_b, _rx_b) = sender();
        let (tx_c, _rx_c) = sender();

        let a = registry.add(tx_a).await;
        let b = registry.add(tx_b).await;
        let _c = registry.add(tx_c).await;
        assert_eq!(registry.size().await, 3);

        registry.remove(&a).await;
        assert_eq!(registry.size().await, 2);

        registry.remove(&b).await;
        registry.remove(&a).await; // already gone
        assert_eq!(registry.size().await, 1);
    }

    #[tokio::test]
    async fn test_snapshot_is_detached_from_live_set() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = sender();
        let handle = registry.add(tx).await;

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 1);

        // Mutating the registry does not touch the snapshot
        registry.remove(&handle).await;
        assert_eq!(registry.size().await, 0);
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_add_remove_snapshot() {
        let registry = ConnectionRegistry::new();

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                let (tx, _rx) = sender();
                let handle = registry.add(tx).await;
                let _ = registry.snapshot().await;
                registry.remove(&handle).await;
            }));
        }

        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(registry.size().await, 0);
    }
}
