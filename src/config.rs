//! Server configuration loaded from environment variables

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_PORT: u16 = 8765;
pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 20;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the listener on
    pub host: IpAddr,
    pub port: u16,
    /// Countdown start value; each cycle ticks from here down to 0
    pub countdown_seconds: u32,
    /// Optional JSON question file; the built-in set is used when unset
    pub questions_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load config from environment variables
    ///
    /// QUIZCAST_HOST, QUIZCAST_PORT, QUIZCAST_COUNTDOWN_SECONDS and
    /// QUIZCAST_QUESTIONS are all optional. Unparseable values fall back to
    /// the defaults with a warning rather than refusing to start.
    pub fn from_env() -> Self {
        let host = match std::env::var("QUIZCAST_HOST") {
            Ok(raw) => match raw.trim().parse() {
                Ok(host) => host,
                Err(_) => {
                    tracing::warn!(
                        "QUIZCAST_HOST {:?} is not a valid IP address, using {}",
                        raw,
                        DEFAULT_HOST
                    );
                    DEFAULT_HOST
                }
            },
            Err(_) => DEFAULT_HOST,
        };

        let port = match std::env::var("QUIZCAST_PORT") {
            Ok(raw) => match raw.trim().parse() {
                Ok(port) => port,
                Err(_) => {
                    tracing::warn!(
                        "QUIZCAST_PORT {:?} is not a valid port, using {}",
                        raw,
                        DEFAULT_PORT
                    );
                    DEFAULT_PORT
                }
            },
            Err(_) => DEFAULT_PORT,
        };

        let countdown_seconds = match std::env::var("QUIZCAST_COUNTDOWN_SECONDS") {
            Ok(raw) => match raw.trim().parse() {
                Ok(seconds) => seconds,
                Err(_) => {
                    tracing::warn!(
                        "QUIZCAST_COUNTDOWN_SECONDS {:?} is not a valid duration, using {}",
                        raw,
                        DEFAULT_COUNTDOWN_SECONDS
                    );
                    DEFAULT_COUNTDOWN_SECONDS
                }
            },
            Err(_) => DEFAULT_COUNTDOWN_SECONDS,
        };

        let questions_path = std::env::var("QUIZCAST_QUESTIONS")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self {
            host,
            port,
            countdown_seconds,
            questions_path,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
            questions_path: None,
        }
    }
}
