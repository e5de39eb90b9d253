//! Shared application state

use crate::config::ServerConfig;
use crate::questions::QuestionBank;
use crate::registry::ConnectionRegistry;

/// Shared application state, held as `Arc<AppState>` by every connection
/// task and the question cycle
#[derive(Clone)]
pub struct AppState {
    pub registry: ConnectionRegistry,
    pub questions: QuestionBank,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(questions: QuestionBank, config: ServerConfig) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            questions,
            config,
        }
    }
}
