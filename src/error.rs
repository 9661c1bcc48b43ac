use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("github error: {0}")]
    GitHub(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logging error: {0}")]
    Logging(String),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Failure of a single user + repository lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("user not found")]
    UserNotFound,

    #[error("rate limited by GitHub, try again later")]
    RateLimited,

    #[error("GitHub responded with HTTP {0}")]
    HttpError(u16),

    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// Superseded by a newer query. Never shown to the user.
    #[error("cancelled")]
    Cancelled,
}
