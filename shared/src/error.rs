use crate::config::ConfigError;
use crate::gesture::ParseGestureError;
use alloc::string::{String, ToString};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SharedError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid gesture: {0}")]
    Gesture(#[from] ParseGestureError),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("vault error: {0}")]
    Vault(String),
    #[error("invalid input: {0}")]
    Input(String),
}

impl From<io::Error> for SharedError {
    fn from(value: io::Error) -> Self {
        SharedError::Storage(value.to_string())
    }
}
