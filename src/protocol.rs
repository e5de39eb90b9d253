//! Plain-text wire protocol
//!
//! Every frame is a single text message. Server frames are rendered through
//! `Display`; the only client frame is `<name>:<answer>`, parsed through
//! `FromStr`. The registry and fanout never look inside a message, so the
//! encodings live here and nowhere else.

use crate::questions::Question;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("message has no ':' separator: {0:?}")]
    MissingSeparator(String),
}

/// Messages sent from the server to every connected client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// `connected_users:<N>` — current connection count
    ConnectedUsers(usize),
    /// `<name> <answer>` — relay of one player's answer
    AnswerRelay { name: String, answer: String },
    /// Multi-line question announcement: text, one option per line, then the
    /// correct-option index. The correct index really does go out to every
    /// client; that reproduces the observed behavior of the system this
    /// replaces and must not be silently fixed.
    Question(Question),
    /// `remaining_time:<N>` — countdown tick
    RemainingTime(u32),
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::ConnectedUsers(count) => write!(f, "connected_users:{}", count),
            ServerMessage::AnswerRelay { name, answer } => write!(f, "{} {}", name, answer),
            ServerMessage::Question(question) => {
                writeln!(f, "{}", question.question)?;
                for option in &question.options {
                    writeln!(f, "{}", option)?;
                }
                write!(f, "{}", question.correct_index)
            }
            ServerMessage::RemainingTime(seconds) => write!(f, "remaining_time:{}", seconds),
        }
    }
}

/// Messages sent from a client to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// `<name>:<answer>` — a player's submitted answer
    Answer { name: String, answer: String },
}

impl FromStr for ClientMessage {
    type Err = ProtocolError;

    /// Split at the first `:`; extra colons belong to the answer text
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((name, answer)) => Ok(ClientMessage::Answer {
                name: name.to_string(),
                answer: answer.to_string(),
            }),
            None => Err(ProtocolError::MissingSeparator(s.to_string())),
        }
    }
}
