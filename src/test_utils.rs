#![cfg(test)]

use crate::error::QueryError;
use crate::github::types::{Repository, UserProfile};
use crate::github::GitHubApi;
use async_trait::async_trait;
use chrono::TimeZone;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

pub fn make_repo(name: &str) -> Repository {
    Repository {
        name: name.to_string(),
        description: None,
        language: None,
        topics: Vec::new(),
        html_url: format!("https://github.com/test/{name}"),
        clone_url: format!("https://github.com/test/{name}.git"),
        stargazers_count: 0,
        forks_count: 0,
        updated_at: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        private: false,
    }
}

pub fn make_user(login: &str) -> UserProfile {
    UserProfile {
        login: login.to_string(),
        name: None,
        avatar_url: String::new(),
        bio: None,
        location: None,
        followers: 0,
        repos_url: repos_url_for(login),
    }
}

fn repos_url_for(login: &str) -> String {
    format!("https://api.test/users/{login}/repos")
}

/// Scripted API. Unknown logins answer `UserNotFound`; a gated login blocks
/// its user lookup until the returned sender fires or is dropped.
#[derive(Default)]
pub struct FakeApi {
    users: Mutex<HashMap<String, Result<UserProfile, QueryError>>>,
    repos: Mutex<HashMap<String, Result<Vec<Repository>, QueryError>>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    user_calls: AtomicUsize,
    repo_calls: AtomicUsize,
}

impl FakeApi {
    pub fn with_user(self, login: &str, repos: Vec<Repository>) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(login.to_string(), Ok(make_user(login)));
        self.repos
            .lock()
            .unwrap()
            .insert(repos_url_for(login), Ok(repos));
        self
    }

    pub fn with_user_error(self, login: &str, err: QueryError) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(login.to_string(), Err(err));
        self
    }

    pub fn with_repos_error(self, login: &str, err: QueryError) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(login.to_string(), Ok(make_user(login)));
        self.repos
            .lock()
            .unwrap()
            .insert(repos_url_for(login), Err(err));
        self
    }

    pub fn gate(&self, login: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(login.to_string(), rx);
        tx
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    pub fn repo_calls(&self) -> usize {
        self.repo_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GitHubApi for FakeApi {
    async fn fetch_user(&self, login: &str) -> Result<UserProfile, QueryError> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().remove(login);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let scripted = self.users.lock().unwrap().get(login).cloned();
        scripted.unwrap_or(Err(QueryError::UserNotFound))
    }

    async fn fetch_repositories(&self, repos_url: &str) -> Result<Vec<Repository>, QueryError> {
        self.repo_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.repos.lock().unwrap().get(repos_url).cloned();
        scripted.unwrap_or(Err(QueryError::HttpError(404)))
    }
}
