// Error types for spotter

use thiserror::Error;

/// Result type alias for spotter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when locating elements
#[derive(Debug, Error)]
pub enum Error {
    /// No stable outcome was observed before the deadline
    ///
    /// Carries the last failure reason reported by the resolver (or by the
    /// execution boundary), how many attempts were made, and a sample of the
    /// attempt times in milliseconds since polling started.
    #[error(
        "Failed to find {description}:\n    {reason}\n\
        Resolution tried {attempts} times at: [{attempt_times}]"
    )]
    FindTimeout {
        description: String,
        reason: String,
        attempts: usize,
        attempt_times: String,
    },

    /// The resolver returned an outcome that cannot occur for the request
    ///
    /// Retrying cannot fix this, so it is raised on the first occurrence.
    #[error("Unexpected resolution outcome: {0}")]
    UnexpectedOutcome(String),

    /// The remote-execution boundary failed to run the resolver
    #[error("Execution error: {0}")]
    Execution(String),

    /// A click landed on another element, typically a native input overlay
    ///
    /// The message is the driver's own description of what received the click.
    #[error("Click intercepted: {0}")]
    ClickIntercepted(String),

    /// Invalid argument provided to method
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Returns true if this error (or the error it wraps) is a find timeout
    pub fn is_find_timeout(&self) -> bool {
        match self {
            Error::FindTimeout { .. } => true,
            Error::Context(_, inner) => inner.is_find_timeout(),
            _ => false,
        }
    }
}
