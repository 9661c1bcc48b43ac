pub mod client;
pub mod types;

use crate::error::QueryError;
use async_trait::async_trait;
use types::{Repository, UserProfile};

/// Which request of the lookup sequence a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    User,
    Repositories,
}

/// The two read-only endpoints a lookup needs.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn fetch_user(&self, login: &str) -> Result<UserProfile, QueryError>;

    async fn fetch_repositories(&self, repos_url: &str) -> Result<Vec<Repository>, QueryError>;
}

/// Maps a non-success status to the error surfaced for that stage.
///
/// Only the user lookup distinguishes 404 and 403; a 403 on the repository
/// listing is reported as a plain HTTP error.
pub fn classify_status(stage: Stage, status: u16) -> QueryError {
    match (stage, status) {
        (Stage::User, 404) => QueryError::UserNotFound,
        (Stage::User, 403) => QueryError::RateLimited,
        (_, code) => QueryError::HttpError(code),
    }
}
