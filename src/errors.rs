// src/errors.rs

use thiserror::Error;

/// Errors raised below the widget boundary. Submission absorbs all of them;
/// nothing here ever reaches the transcript as anything but a fixed string.
#[derive(Debug, Error)]
pub enum ChatboxError {
    #[error("chat request failed: {0}")]
    Transport(String),

    #[error("chat reply was not usable JSON: {0}")]
    MalformedReply(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ChatboxError {
    pub fn transport_error(msg: impl Into<String>) -> Self {
        ChatboxError::Transport(msg.into())
    }

    pub fn malformed_reply(msg: impl Into<String>) -> Self {
        ChatboxError::MalformedReply(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        ChatboxError::Config(msg.into())
    }
}

pub type ChatboxResult<T> = Result<T, ChatboxError>;
