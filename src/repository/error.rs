//! Storage errors

/// Common result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-level errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The storage area cannot be opened (no window, storage disabled).
    Unavailable(String),
    /// The backend rejected a read or write (quota, security error).
    Backend(String),
    /// A stored value is not a valid checklist.
    Malformed { key: String, reason: String },
    Serialize(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            StoreError::Backend(msg) => write!(f, "Storage error: {}", msg),
            StoreError::Malformed { key, reason } => {
                write!(f, "Malformed entry {}: {}", key, reason)
            }
            StoreError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
