//! Error types for chat-triage.

/// Top-level error type for a triage run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Message-archive errors. The archive is the one resource the run cannot
/// proceed without, so these are fatal.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Cannot open message archive at {path}: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Archive query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Contact-book errors.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// A persisted record without the `address,name` delimiter. Recovered
    /// at load time: the line is skipped and loading continues.
    #[error("Contact record has no delimiter: {line:?}")]
    MalformedRecord { line: String },

    #[error("Contact book I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Reply-transport errors. Recovered per conversation: reported, then the
/// triage loop moves on.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Refusing to dispatch reply: {reason}")]
    InvalidOutgoing { reason: String },

    #[error("Transport invocation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport reported failure: {detail}")]
    TransportFailed { detail: String },
}

/// Result type alias for the triage pipeline.
pub type Result<T> = std::result::Result<T, Error>;
