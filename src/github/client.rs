use crate::config::Config;
use crate::error::{AppError, QueryError, Result};
use crate::github::types::{Repository, UserProfile};
use crate::github::{classify_status, GitHubApi, Stage};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use tracing::debug;

const MAX_PER_PAGE: u32 = 100;

#[derive(Clone)]
pub struct GitHubClient {
    octo: Octocrab,
    api_base: String,
    per_page: u32,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let api_base = config.api_base.trim_end_matches('/').to_string();

        let mut builder = Octocrab::builder()
            .base_uri(api_base.as_str())
            .map_err(|e| AppError::GitHub(e.to_string()))?;
        if let Some(token) = config.github_token.as_deref().filter(|t| !t.is_empty()) {
            builder = builder.personal_token(token.to_string());
        }
        let octo = builder
            .build()
            .map_err(|e| AppError::GitHub(e.to_string()))?;

        Ok(Self {
            octo,
            api_base,
            per_page: config.per_page.clamp(1, MAX_PER_PAGE),
        })
    }

    pub fn user_url(&self, login: &str) -> String {
        format!("{}/users/{}", self.api_base, encode_path_segment(login))
    }

    pub fn repositories_url(&self, repos_url: &str) -> String {
        let sep = if repos_url.contains('?') { '&' } else { '?' };
        format!("{repos_url}{sep}per_page={}&sort=updated", self.per_page)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        stage: Stage,
    ) -> Result<T, QueryError> {
        debug!(%url, ?stage, "GET");
        let response = self
            .octo
            ._get(url)
            .await
            .map_err(|e| QueryError::FetchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(stage, status.as_u16()));
        }

        let body = self
            .octo
            .body_to_string(response)
            .await
            .map_err(|e| QueryError::FetchFailed(e.to_string()))?;
        serde_json::from_str(&body)
            .map_err(|e| QueryError::FetchFailed(format!("malformed payload: {e}")))
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn fetch_user(&self, login: &str) -> Result<UserProfile, QueryError> {
        let url = self.user_url(login);
        self.get_json(&url, Stage::User).await
    }

    async fn fetch_repositories(&self, repos_url: &str) -> Result<Vec<Repository>, QueryError> {
        let url = self.repositories_url(repos_url);
        self.get_json(&url, Stage::Repositories).await
    }
}

fn encode_path_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}
