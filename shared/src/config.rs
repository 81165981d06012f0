use thiserror::Error;

/// Invalid parameters detected before any key material is computed.
///
/// These are fatal at startup: continuing would derive a meaningless key or none at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("iteration count must be at least 1 (got {0})")]
    InvalidIterations(u32),
    #[error("gesture must not be empty")]
    EmptyGesture,
    #[error("gesture must have {expected} symbols (got {actual})")]
    GestureLength { expected: usize, actual: usize },
    #[error("salt must be {expected} bytes (got {actual})")]
    SaltLength { expected: usize, actual: usize },
    #[error("maximum field length must be at least 1")]
    FieldLength,
    #[error("re-authentication limit must be at least 1")]
    ReauthLimit,
    #[error("lock press count must be at least 1")]
    LockPresses,
}
