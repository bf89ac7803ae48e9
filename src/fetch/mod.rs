//! Loading/error/data bookkeeping for one asynchronous data dependency.
//!
//! A [`FetchHook`] does not perform I/O itself. Callers declare the current
//! dependency key with [`FetchHook::update`]; when the key changed the hook
//! enters the loading phase and hands back a [`FetchRequest`] ticket. The
//! caller runs the fetch and reports the outcome with [`FetchHook::resolve`].
//! Only the most recently issued ticket can commit, so a slow response for an
//! old key never overwrites state produced for a newer one, and nothing
//! commits after [`FetchHook::teardown`].

use std::fmt;
use std::future::Future;

/// Observable state of a fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    /// Last successfully fetched value, kept across later failures
    pub data: Option<T>,
    pub loading: bool,
    /// Message of the last failure; takes precedence over `data` when set
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    /// Data that is current: loaded and not superseded by an error
    pub fn ready(&self) -> Option<&T> {
        if self.loading || self.error.is_some() {
            None
        } else {
            self.data.as_ref()
        }
    }
}

/// Ticket for one fetch cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest<K> {
    seq: u64,
    key: K,
}

impl<K> FetchRequest<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug)]
pub struct FetchHook<K, T> {
    key: Option<K>,
    state: FetchState<T>,
    latest: u64,
    attached: bool,
}

impl<K, T> Default for FetchHook<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            state: FetchState::default(),
            latest: 0,
            attached: true,
        }
    }
}

impl<K: Clone + PartialEq, T> FetchHook<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn data(&self) -> Option<&T> {
        self.state.data.as_ref()
    }

    /// Mutable access to committed data, for merging follow-up results
    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.state.data.as_mut()
    }

    #[allow(dead_code)]
    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    #[allow(dead_code)]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Declare the dependency key. Starts a fetch cycle if it differs from the
    /// current one (or none was declared yet).
    pub fn update(&mut self, key: K) -> Option<FetchRequest<K>> {
        if !self.attached || self.key.as_ref() == Some(&key) {
            return None;
        }
        self.key = Some(key);
        self.begin()
    }

    /// Repeat the cycle for the current key
    pub fn refetch(&mut self) -> Option<FetchRequest<K>> {
        if !self.attached {
            return None;
        }
        self.begin()
    }

    fn begin(&mut self) -> Option<FetchRequest<K>> {
        let key = self.key.clone()?;
        self.latest += 1;
        self.state.loading = true;
        self.state.error = None;
        Some(FetchRequest {
            seq: self.latest,
            key,
        })
    }

    /// Whether `request` is still the one allowed to commit
    pub fn is_current(&self, request: &FetchRequest<K>) -> bool {
        self.attached && request.seq == self.latest
    }

    /// Commit the outcome of `request`. Returns false, leaving state untouched,
    /// if a newer request was issued or the hook was torn down.
    pub fn resolve<E: fmt::Display>(
        &mut self,
        request: &FetchRequest<K>,
        result: Result<T, E>,
    ) -> bool {
        if !self.is_current(request) {
            tracing::debug!("Discarding stale fetch result #{}", request.seq);
            return false;
        }

        match result {
            Ok(data) => {
                self.state.data = Some(data);
                self.state.error = None;
            }
            Err(e) => {
                let message = e.to_string();
                self.state.error = Some(if message.is_empty() {
                    "An error occurred".to_string()
                } else {
                    message
                });
            }
        }
        self.state.loading = false;
        true
    }

    /// Forget the key and data, invalidating anything in flight
    pub fn reset(&mut self) {
        self.key = None;
        self.state = FetchState::default();
        self.latest += 1;
    }

    /// Detach for good: no further cycles start and in-flight results are dropped
    pub fn teardown(&mut self) {
        self.attached = false;
        self.latest += 1;
        self.state.loading = false;
    }

    /// Declare `key` and, if that started a cycle, run `fetch` to completion.
    /// For callers that never overlap requests on the same hook.
    pub async fn run<F, Fut, E>(&mut self, key: K, fetch: F) -> bool
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        match self.update(key) {
            Some(request) => self.complete(request, fetch).await,
            None => false,
        }
    }

    /// Refetch the current key and run `fetch` to completion
    #[allow(dead_code)]
    pub async fn rerun<F, Fut, E>(&mut self, fetch: F) -> bool
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        match self.refetch() {
            Some(request) => self.complete(request, fetch).await,
            None => false,
        }
    }

    async fn complete<F, Fut, E>(&mut self, request: FetchRequest<K>, fetch: F) -> bool
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let result = fetch(request.key.clone()).await;
        if let Err(e) = &result {
            tracing::warn!("Fetch error: {}", e);
        }
        self.resolve(&request, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Hook = FetchHook<&'static str, u32>;

    #[test]
    fn test_update_enters_loading() {
        let mut hook = Hook::new();
        assert!(!hook.state().loading);

        let request = hook.update("a").unwrap();
        assert_eq!(request.key(), &"a");
        assert!(hook.state().loading);
        assert!(hook.state().error.is_none());
    }

    #[test]
    fn test_same_key_does_not_refetch() {
        let mut hook = Hook::new();
        let request = hook.update("a").unwrap();
        assert!(hook.resolve(&request, Ok::<_, String>(1)));
        assert!(hook.update("a").is_none());
        assert!(hook.update("b").is_some());
    }

    #[test]
    fn test_success_sets_data() {
        let mut hook = Hook::new();
        let request = hook.update("a").unwrap();
        assert!(hook.resolve(&request, Ok::<_, String>(7)));
        assert_eq!(
            hook.state(),
            &FetchState {
                data: Some(7),
                loading: false,
                error: None
            }
        );
        assert_eq!(hook.state().ready(), Some(&7));
    }

    #[test]
    fn test_failure_keeps_stale_data() {
        let mut hook = Hook::new();
        let first = hook.update("a").unwrap();
        hook.resolve(&first, Ok::<_, String>(1));

        let second = hook.refetch().unwrap();
        assert!(hook.resolve(&second, Err::<u32, _>("boom".to_string())));
        assert_eq!(hook.state().data, Some(1));
        assert_eq!(hook.state().error.as_deref(), Some("boom"));
        assert!(!hook.state().loading);
        assert_eq!(hook.state().ready(), None);
    }

    #[test]
    fn test_empty_error_message_gets_default() {
        let mut hook = Hook::new();
        let request = hook.update("a").unwrap();
        hook.resolve(&request, Err::<u32, _>(String::new()));
        assert_eq!(hook.state().error.as_deref(), Some("An error occurred"));
    }

    #[test]
    fn test_last_request_wins() {
        let mut hook = Hook::new();
        let old = hook.update("season-1").unwrap();
        let new = hook.update("season-2").unwrap();

        assert!(hook.resolve(&new, Ok::<_, String>(2)));
        assert!(!hook.resolve(&old, Ok::<_, String>(1)));
        assert_eq!(hook.data(), Some(&2));

        // Also when the stale result arrives first
        let mut hook = Hook::new();
        let old = hook.update("season-1").unwrap();
        let new = hook.update("season-2").unwrap();
        assert!(!hook.resolve(&old, Ok::<_, String>(1)));
        assert!(hook.state().loading);
        assert_eq!(hook.data(), None);
        assert!(hook.resolve(&new, Ok::<_, String>(2)));
        assert_eq!(hook.data(), Some(&2));
    }

    #[test]
    fn test_refetch_supersedes_in_flight() {
        let mut hook = Hook::new();
        assert!(hook.refetch().is_none());

        let first = hook.update("a").unwrap();
        let second = hook.refetch().unwrap();
        assert!(!hook.is_current(&first));
        assert!(hook.is_current(&second));
    }

    #[test]
    fn test_teardown_suppresses_commits() {
        let mut hook = Hook::new();
        let request = hook.update("a").unwrap();
        hook.teardown();

        assert!(!hook.resolve(&request, Ok::<_, String>(1)));
        assert_eq!(hook.data(), None);
        assert!(!hook.state().loading);
        assert!(hook.update("b").is_none());
        assert!(hook.refetch().is_none());
    }

    #[test]
    fn test_reset_invalidates() {
        let mut hook = Hook::new();
        let request = hook.update("a").unwrap();
        hook.reset();
        assert!(!hook.resolve(&request, Ok::<_, String>(1)));
        assert!(hook.key().is_none());
        assert!(hook.update("a").is_some());
    }

    #[tokio::test]
    async fn test_run_and_rerun() {
        let mut hook = Hook::new();
        let committed = hook
            .run("a", |key| async move { Ok::<_, String>(key.len() as u32) })
            .await;
        assert!(committed);
        assert_eq!(hook.data(), Some(&1));

        let skipped = hook.run("a", |_| async { Ok::<_, String>(99) }).await;
        assert!(!skipped);
        assert_eq!(hook.data(), Some(&1));

        let committed = hook.rerun(|_| async { Err::<u32, _>("offline") }).await;
        assert!(committed);
        assert_eq!(hook.state().error.as_deref(), Some("offline"));
        assert_eq!(hook.data(), Some(&1));
    }
}
