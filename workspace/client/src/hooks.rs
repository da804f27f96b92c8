//! Loaders that bind fetches to a lifecycle and expose a tri-state result.
//!
//! A [`Hook`] owns the observable [`LoadState`]. Every request is tagged with
//! a generation number when it starts; a response is only written if no
//! newer request has started since, so a slow superseded fetch can never
//! overwrite fresher state. A [`Binding`] drives a hook from a background
//! task and tears it down when dropped.

pub mod metrics;

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, trace, warn};

use crate::api_client::Fetched;

/// What a widget renders: data (or its empty value), whether a request is in
/// flight, and a readable error message.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

struct Inner<T> {
    state: watch::Sender<LoadState<T>>,
    generation: AtomicU64,
    empty: T,
    timeout: Option<Duration>,
}

pub struct Hook<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Hook<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Hook<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Starts out loading, holding `empty`.
    pub fn new(empty: T) -> Self {
        Self::build(empty, None)
    }

    pub fn with_timeout(empty: T, timeout: Duration) -> Self {
        Self::build(empty, Some(timeout))
    }

    fn build(empty: T, timeout: Option<Duration>) -> Self {
        let (state, _) = watch::channel(LoadState {
            data: empty.clone(),
            loading: true,
            error: None,
        });
        Self {
            inner: Arc::new(Inner {
                state,
                generation: AtomicU64::new(0),
                empty,
                timeout,
            }),
        }
    }

    /// Fetches and settles the state, unless a newer request started in the
    /// meantime. Returns whether the result was applied.
    pub async fn run<F>(&self, fetch: F) -> bool
    where
        F: Future<Output = Fetched<T>>,
    {
        let tag = self.begin();
        self.complete(tag, fetch).await
    }

    /// Marks a new request as current and returns its tag.
    fn begin(&self) -> u64 {
        let tag = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        trace!("Starting request {}", tag);
        self.inner.state.send_if_modified(|state| {
            let changed = !state.loading;
            state.loading = true;
            changed
        });
        tag
    }

    async fn complete<F>(&self, tag: u64, fetch: F) -> bool
    where
        F: Future<Output = Fetched<T>>,
    {
        let (data, error) = match self.inner.timeout {
            Some(limit) => match tokio::time::timeout(limit, fetch).await {
                Ok(fetched) => (fetched.data, fetched.error.map(|e| e.to_string())),
                Err(_) => {
                    warn!("Request {} timed out after {:?}", tag, limit);
                    (
                        self.inner.empty.clone(),
                        Some(format!("Request timed out after {}ms", limit.as_millis())),
                    )
                }
            },
            None => {
                let fetched = fetch.await;
                (fetched.data, fetched.error.map(|e| e.to_string()))
            }
        };

        let inner = &self.inner;
        let applied = inner.state.send_if_modified(|state| {
            if inner.generation.load(Ordering::SeqCst) != tag {
                return false;
            }
            *state = LoadState {
                data,
                loading: false,
                error,
            };
            true
        });

        if applied {
            debug!("Request {} settled", tag);
        } else {
            debug!("Discarding stale response for request {}", tag);
        }
        applied
    }

    /// Makes every in-flight request stale.
    pub fn invalidate(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState<T>> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> LoadState<T> {
        self.inner.state.borrow().clone()
    }
}

/// Reports whether the dependencies hold a value no request was started for.
type PendingCheck = Box<dyn Fn() -> bool + Send + Sync>;

/// A hook mounted on a background task. Dropping the binding unmounts it:
/// the task and its in-flight requests are aborted and late responses are
/// discarded.
pub struct Binding<T>
where
    T: Clone + Send + Sync + 'static,
{
    hook: Hook<T>,
    task: JoinHandle<()>,
    pending: Option<PendingCheck>,
}

impl<T> Binding<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Fetches once on activation.
    pub fn once<F, Fut>(hook: Hook<T>, fetch: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Fetched<T>> + Send + 'static,
    {
        let runner = hook.clone();
        let task = tokio::spawn(async move {
            runner.run(fetch()).await;
        });
        Self {
            hook,
            task,
            pending: None,
        }
    }

    /// Fetches on activation and again every time `deps` changes.
    ///
    /// A change does not wait for the previous request: the new request is
    /// started immediately and the old one is left to be discarded.
    pub fn watching<D, F, Fut>(hook: Hook<T>, mut deps: watch::Receiver<D>, fetch: F) -> Self
    where
        D: Clone + PartialEq + Send + Sync + 'static,
        F: Fn(D) -> Fut + Send + 'static,
        Fut: Future<Output = Fetched<T>> + Send + 'static,
    {
        let requested = Arc::new(Mutex::new(deps.borrow().clone()));
        let pending = {
            let observer = deps.clone();
            let requested = Arc::clone(&requested);
            Box::new(move || {
                let requested = requested.lock().unwrap_or_else(|p| p.into_inner());
                *observer.borrow() != *requested
            }) as PendingCheck
        };

        let runner = hook.clone();
        let task = tokio::spawn(async move {
            let mut requests = JoinSet::new();
            loop {
                let value = deps.borrow_and_update().clone();
                // loading must be visible before the new value counts as requested
                let tag = runner.begin();
                *requested.lock().unwrap_or_else(|p| p.into_inner()) = value.clone();
                let request = fetch(value);
                let worker = runner.clone();
                requests.spawn(async move {
                    worker.complete(tag, request).await;
                });

                loop {
                    tokio::select! {
                        changed = deps.changed() => {
                            if changed.is_err() {
                                trace!("Dependencies closed, finishing outstanding requests");
                                while requests.join_next().await.is_some() {}
                                return;
                            }
                            break;
                        }
                        Some(_) = requests.join_next(), if !requests.is_empty() => {}
                    }
                }
            }
        });
        Self {
            hook,
            task,
            pending: Some(pending),
        }
    }

    /// True while a dependency change has not yet started its request.
    fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|check| check())
    }

    pub fn hook(&self) -> &Hook<T> {
        &self.hook
    }

    pub fn state(&self) -> LoadState<T> {
        self.hook.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState<T>> {
        self.hook.subscribe()
    }

    /// Waits until the state satisfies `predicate` and returns it.
    ///
    /// A state left over from before the latest dependency change never
    /// satisfies the wait.
    pub async fn wait_for(&self, mut predicate: impl FnMut(&LoadState<T>) -> bool) -> LoadState<T> {
        let mut rx = self.hook.subscribe();
        let state = match rx.wait_for(|state| !self.is_pending() && predicate(state)).await {
            Ok(state) => state.clone(),
            // the sender lives as long as the hook, which we hold
            Err(_) => self.hook.snapshot(),
        };
        state
    }

    /// Waits for the request started for the current dependencies to settle.
    pub async fn settled(&self) -> LoadState<T> {
        self.wait_for(|state| !state.loading).await
    }
}

impl<T> Drop for Binding<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.hook.invalidate();
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, QueryError};
    use common::Metric;

    fn fetched(value: u32) -> Fetched<Option<u32>> {
        Fetched::ok(Some(value))
    }

    #[tokio::test]
    async fn test_initial_state_is_loading_and_empty() {
        let hook: Hook<Option<u32>> = Hook::new(None);
        assert_eq!(
            hook.snapshot(),
            LoadState {
                data: None,
                loading: true,
                error: None
            }
        );
    }

    #[tokio::test]
    async fn test_run_settles_state() {
        let hook = Hook::new(None);
        assert!(hook.run(async { fetched(7) }).await);
        assert_eq!(hook.snapshot().data, Some(7));
        assert!(!hook.snapshot().loading);
    }

    #[tokio::test]
    async fn test_failure_sets_error_message() {
        let hook = Hook::new(None::<u32>);
        let error = FetchError::Query {
            metric: Metric::TopProducts,
            source: QueryError::Transport("connection refused".to_string()),
        };
        hook.run(async move { Fetched::failed(None, error) }).await;

        let state = hook.snapshot();
        assert_eq!(state.data, None);
        assert!(!state.loading);
        assert_eq!(
            state.error.as_deref(),
            Some("Error fetching top products: Request failed: connection refused")
        );
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let hook = Hook::new(None);
        let slow_tag = hook.begin();
        let fast_tag = hook.begin();

        assert!(hook.complete(fast_tag, async { fetched(2) }).await);
        assert!(!hook.complete(slow_tag, async { fetched(1) }).await);
        assert_eq!(hook.snapshot().data, Some(2));
    }

    #[tokio::test]
    async fn test_timeout_settles_with_empty_value() {
        let hook = Hook::with_timeout(Some(0u32), Duration::from_millis(20));
        hook.run(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            fetched(1)
        })
        .await;

        let state = hook.snapshot();
        assert_eq!(state.data, Some(0));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Request timed out after 20ms"));
    }

    #[tokio::test]
    async fn test_watching_refetches_on_change() {
        let (tx, rx) = watch::channel(1u32);
        let binding = Binding::watching(Hook::new(None), rx, |n| async move { fetched(n * 10) });

        let state = binding.wait_for(|s| s.data == Some(10)).await;
        assert!(!state.loading);

        tx.send(2).unwrap();
        let state = binding.wait_for(|s| s.data == Some(20)).await;
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_settled_after_change_reflects_new_value() {
        let (tx, rx) = watch::channel(1u32);
        let binding = Binding::watching(Hook::new(None), rx, |n| async move { fetched(n * 10) });
        assert_eq!(binding.settled().await.data, Some(10));

        tx.send(2).unwrap();
        let state = binding.settled().await;
        assert!(!state.loading);
        assert_eq!(state.data, Some(20));
    }

    #[tokio::test]
    async fn test_newer_request_wins_over_slow_older_one() {
        let (tx, rx) = watch::channel(1u32);
        let binding = Binding::watching(Hook::new(None), rx, |n| async move {
            // the first request is the slow one
            let delay = if n == 1 { 300 } else { 10 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            fetched(n)
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send(2).unwrap();

        let state = binding.wait_for(|s| s.data == Some(2)).await;
        assert!(!state.loading);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(binding.state().data, Some(2));
    }

    #[tokio::test]
    async fn test_drop_discards_late_response() {
        let hook = Hook::new(None);
        let binding = Binding::once(hook.clone(), || async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            fetched(1)
        });
        drop(binding);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hook.snapshot().data, None);
        assert!(hook.snapshot().loading);
    }
}
