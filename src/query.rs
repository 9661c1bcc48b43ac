//! Cancellation-aware lookup of a user and their repositories.
//!
//! At most one lookup is authoritative. Submitting a new query cancels the
//! previous token; the superseded task drops its pending request, never starts
//! the repository fetch, and sends nothing. Any result that still slips through
//! is rejected by [`QueryController::resolve`] because its id is no longer current.

use crate::error::QueryError;
use crate::event::AppEvent;
use crate::github::types::{QueryResult, Repository};
use crate::github::GitHubApi;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub type QueryId = u64;

#[derive(Debug, Clone)]
struct QueryToken {
    id: QueryId,
    cancel: CancellationToken,
}

/// Completion of a spawned lookup, routed back through the app event channel.
#[derive(Debug)]
pub struct QueryEvent {
    pub id: QueryId,
    pub query: String,
    pub result: Result<QueryResult, QueryError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Cleared,
    Pending(QueryId),
}

/// What the presentation layer should show after a lookup settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Loaded(QueryResult),
    Failed(QueryError),
    Cleared,
}

pub struct QueryController {
    api: Arc<dyn GitHubApi>,
    tx: mpsc::UnboundedSender<AppEvent>,
    timeout: Option<Duration>,
    next_id: QueryId,
    current: Option<QueryToken>,
    active_query: String,
    repositories: Vec<Repository>,
}

impl QueryController {
    pub fn new(
        api: Arc<dyn GitHubApi>,
        tx: mpsc::UnboundedSender<AppEvent>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            api,
            tx,
            timeout,
            next_id: 0,
            current: None,
            active_query: String::new(),
            repositories: Vec::new(),
        }
    }

    pub fn active_query(&self) -> &str {
        &self.active_query
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn is_loading(&self) -> bool {
        self.current.is_some()
    }

    pub fn submit_query(&mut self, query: &str) -> Submission {
        self.cancel_in_flight();

        let query = query.trim();
        if query.is_empty() {
            self.active_query.clear();
            self.repositories.clear();
            debug!("blank query, results cleared");
            return Submission::Cleared;
        }

        self.next_id += 1;
        let token = QueryToken {
            id: self.next_id,
            cancel: CancellationToken::new(),
        };
        self.current = Some(token.clone());
        self.active_query = query.to_string();
        debug!(id = token.id, query, "submitting lookup");

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let timeout = self.timeout;
        let login = self.active_query.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancel.cancelled() => Err(QueryError::Cancelled),
                r = run_lookup(api.as_ref(), &login, timeout, &token.cancel) => r,
            };
            if matches!(result, Err(QueryError::Cancelled)) || token.cancel.is_cancelled() {
                debug!(id = token.id, query = %login, "lookup abandoned");
                return;
            }
            let _ = tx.send(AppEvent::Query(QueryEvent {
                id: token.id,
                query: login,
                result,
            }));
        });

        Submission::Pending(self.next_id)
    }

    /// Re-issues the active query. A blank active query clears, like any blank submit.
    pub fn resubmit(&mut self) -> Submission {
        let query = self.active_query.clone();
        self.submit_query(&query)
    }

    pub fn reset(&mut self) {
        self.submit_query("");
    }

    /// Accepts a finished lookup if it still belongs to the current query.
    pub fn resolve(&mut self, event: QueryEvent) -> Option<Delivery> {
        let is_current = self.current.as_ref().is_some_and(|t| t.id == event.id);
        if !is_current {
            debug!(id = event.id, query = %event.query, "dropping stale result");
            return None;
        }
        self.current = None;

        match event.result {
            Ok(result) => {
                info!(
                    query = %event.query,
                    repositories = result.repositories.len(),
                    "lookup finished"
                );
                self.repositories = result.repositories.clone();
                Some(Delivery::Loaded(result))
            }
            Err(QueryError::Cancelled) => None,
            Err(e) => {
                warn!(query = %event.query, error = %e, "lookup failed");
                self.repositories.clear();
                Some(Delivery::Failed(e))
            }
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.current.take() {
            debug!(id = token.id, "cancelling in-flight lookup");
            token.cancel.cancel();
        }
    }
}

async fn run_lookup(
    api: &dyn GitHubApi,
    login: &str,
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) -> Result<QueryResult, QueryError> {
    let user = with_timeout(timeout, api.fetch_user(login)).await?;
    if cancel.is_cancelled() {
        return Err(QueryError::Cancelled);
    }
    let repositories = with_timeout(timeout, api.fetch_repositories(&user.repos_url)).await?;
    Ok(QueryResult { user, repositories })
}

async fn with_timeout<T>(
    limit: Option<Duration>,
    request: impl Future<Output = Result<T, QueryError>>,
) -> Result<T, QueryError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .unwrap_or_else(|_| Err(QueryError::FetchFailed("request timed out".to_string()))),
        None => request.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn controller(api: Arc<FakeApi>) -> (QueryController, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (QueryController::new(api, tx, None), rx)
    }

    async fn query_events(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> Vec<QueryEvent> {
        let mut events = Vec::new();
        let window = Duration::from_millis(100);
        while let Ok(Some(event)) = tokio::time::timeout(window, rx.recv()).await {
            if let AppEvent::Query(ev) = event {
                events.push(ev);
            }
        }
        events
    }

    async fn drain(
        controller: &mut QueryController,
        rx: &mut mpsc::UnboundedReceiver<AppEvent>,
    ) -> Vec<Delivery> {
        query_events(rx)
            .await
            .into_iter()
            .filter_map(|ev| controller.resolve(ev))
            .collect()
    }

    fn loaded_login(delivery: &Delivery) -> &str {
        match delivery {
            Delivery::Loaded(result) => &result.user.login,
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_successful_lookup_stores_repositories() {
        let api = Arc::new(FakeApi::default().with_user(
            "octocat",
            vec![make_repo("alpha"), make_repo("beta-tool"), make_repo("gamma")],
        ));
        let (mut controller, mut rx) = controller(api.clone());

        assert!(matches!(controller.submit_query("  octocat "), Submission::Pending(_)));
        assert!(controller.is_loading());
        assert_eq!(controller.active_query(), "octocat");

        let deliveries = drain(&mut controller, &mut rx).await;
        assert_eq!(deliveries.len(), 1);
        assert_eq!(loaded_login(&deliveries[0]), "octocat");
        assert!(!controller.is_loading());

        let names: Vec<_> = controller.repositories().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta-tool", "gamma"]);
        assert_eq!(api.user_calls(), 1);
        assert_eq!(api.repo_calls(), 1);
    }

    #[tokio::test]
    async fn test_superseded_query_never_delivers() {
        let api = Arc::new(
            FakeApi::default()
                .with_user("first", vec![make_repo("old")])
                .with_user("second", vec![make_repo("new")]),
        );
        let release_first = api.gate("first");
        let (mut controller, mut rx) = controller(api.clone());

        let Submission::Pending(first_id) = controller.submit_query("first") else {
            panic!("expected pending submission");
        };
        tokio::task::yield_now().await;
        let Submission::Pending(second_id) = controller.submit_query("second") else {
            panic!("expected pending submission");
        };
        let _ = release_first.send(());

        let events = query_events(&mut rx).await;
        assert!(events.iter().all(|ev| ev.id != first_id));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, second_id);
        // Only the second lookup reached the repository stage
        assert_eq!(api.repo_calls(), 1);

        let deliveries: Vec<_> = events
            .into_iter()
            .filter_map(|ev| controller.resolve(ev))
            .collect();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(loaded_login(&deliveries[0]), "second");
        assert_eq!(controller.repositories()[0].name, "new");
    }

    #[tokio::test]
    async fn test_superseded_error_is_swallowed() {
        let api = Arc::new(
            FakeApi::default()
                .with_user_error("broken", QueryError::HttpError(500))
                .with_user("good", vec![make_repo("kept")]),
        );
        let release = api.gate("broken");
        let (mut controller, mut rx) = controller(api.clone());

        controller.submit_query("broken");
        tokio::task::yield_now().await;
        controller.submit_query("good");
        drop(release);

        let deliveries = drain(&mut controller, &mut rx).await;
        assert_eq!(deliveries.len(), 1);
        assert_eq!(loaded_login(&deliveries[0]), "good");
    }

    #[tokio::test]
    async fn test_late_result_with_old_id_is_dropped() {
        let api = Arc::new(
            FakeApi::default()
                .with_user("first", vec![])
                .with_user("second", vec![make_repo("new")]),
        );
        let (mut controller, mut rx) = controller(api.clone());

        let Submission::Pending(first_id) = controller.submit_query("first") else {
            panic!("expected pending submission");
        };
        controller.submit_query("second");

        let stale = QueryEvent {
            id: first_id,
            query: "first".to_string(),
            result: Err(QueryError::FetchFailed("boom".to_string())),
        };
        assert_eq!(controller.resolve(stale), None);
        assert!(controller.is_loading());

        let deliveries = drain(&mut controller, &mut rx).await;
        assert_eq!(deliveries.len(), 1);
        assert_eq!(loaded_login(&deliveries[0]), "second");
    }

    #[tokio::test]
    async fn test_blank_query_clears_without_request() {
        let api = Arc::new(FakeApi::default().with_user("octocat", vec![make_repo("alpha")]));
        let (mut controller, mut rx) = controller(api.clone());

        controller.submit_query("octocat");
        let _ = drain(&mut controller, &mut rx).await;
        assert_eq!(controller.repositories().len(), 1);

        assert_eq!(controller.submit_query("   "), Submission::Cleared);
        assert!(controller.repositories().is_empty());
        assert_eq!(controller.active_query(), "");
        assert!(!controller.is_loading());
        assert!(drain(&mut controller, &mut rx).await.is_empty());
        assert_eq!(api.user_calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_query_cancels_pending_lookup() {
        let api = Arc::new(FakeApi::default().with_user("octocat", vec![make_repo("alpha")]));
        let release = api.gate("octocat");
        let (mut controller, mut rx) = controller(api.clone());

        controller.submit_query("octocat");
        tokio::task::yield_now().await;
        assert_eq!(api.user_calls(), 1);
        controller.submit_query("");
        let _ = release.send(());

        assert!(query_events(&mut rx).await.is_empty());
        assert_eq!(api.repo_calls(), 0);
        assert!(controller.repositories().is_empty());
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_cancelled_lookup_stops_before_repository_fetch() {
        let api = Arc::new(
            FakeApi::default()
                .with_user("first", vec![make_repo("old")])
                .with_user("second", vec![make_repo("new")]),
        );
        let (mut controller, mut rx) = controller(api.clone());

        for _ in 0..10 {
            let release = api.gate("first");
            let Submission::Pending(first_id) = controller.submit_query("first") else {
                panic!("expected pending submission");
            };
            tokio::task::yield_now().await;
            controller.submit_query("second");
            let _ = release.send(());

            let events = query_events(&mut rx).await;
            assert!(events.iter().all(|ev| ev.id != first_id));
            for ev in events {
                let _ = controller.resolve(ev);
            }
        }

        // Every repository request came from a "second" lookup
        assert_eq!(api.repo_calls(), 10);
        assert_eq!(api.user_calls(), 20);
    }

    #[tokio::test]
    async fn test_unknown_user_skips_repository_fetch() {
        let api = Arc::new(
            FakeApi::default().with_user_error("ghost-user-404", QueryError::UserNotFound),
        );
        let (mut controller, mut rx) = controller(api.clone());

        controller.submit_query("ghost-user-404");
        let deliveries = drain(&mut controller, &mut rx).await;

        assert_eq!(deliveries, vec![Delivery::Failed(QueryError::UserNotFound)]);
        assert_eq!(api.repo_calls(), 0);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_repository_failure_renders_nothing() {
        let api = Arc::new(
            FakeApi::default()
                .with_user("octocat", vec![make_repo("alpha")])
                .with_repos_error("limited", QueryError::HttpError(403)),
        );
        let (mut controller, mut rx) = controller(api.clone());

        controller.submit_query("octocat");
        let _ = drain(&mut controller, &mut rx).await;

        controller.submit_query("limited");
        let deliveries = drain(&mut controller, &mut rx).await;

        assert_eq!(deliveries, vec![Delivery::Failed(QueryError::HttpError(403))]);
        assert!(controller.repositories().is_empty());
    }

    #[tokio::test]
    async fn test_new_success_replaces_repositories() {
        let api = Arc::new(
            FakeApi::default()
                .with_user("one", vec![make_repo("a"), make_repo("b")])
                .with_user("two", vec![make_repo("c")]),
        );
        let (mut controller, mut rx) = controller(api.clone());

        controller.submit_query("one");
        let _ = drain(&mut controller, &mut rx).await;
        controller.submit_query("two");
        let _ = drain(&mut controller, &mut rx).await;

        let names: Vec<_> = controller.repositories().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["c"]);
    }

    #[tokio::test]
    async fn test_resubmit_reissues_active_query() {
        let api = Arc::new(FakeApi::default().with_user("octocat", vec![]));
        let (mut controller, mut rx) = controller(api.clone());

        controller.submit_query("octocat");
        let _ = drain(&mut controller, &mut rx).await;
        assert!(matches!(controller.resubmit(), Submission::Pending(_)));
        let deliveries = drain(&mut controller, &mut rx).await;

        assert_eq!(deliveries.len(), 1);
        assert_eq!(api.user_calls(), 2);
    }

    #[tokio::test]
    async fn test_timeout_surfaces_as_fetch_failed() {
        let api = Arc::new(FakeApi::default().with_user("slow", vec![]));
        let _hold = api.gate("slow");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut controller = QueryController::new(api, tx, Some(Duration::from_millis(10)));

        controller.submit_query("slow");
        let deliveries = drain(&mut controller, &mut rx).await;

        assert_eq!(
            deliveries,
            vec![Delivery::Failed(QueryError::FetchFailed(
                "request timed out".to_string()
            ))]
        );
    }
}
