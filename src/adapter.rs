//! Load orchestration between an asynchronous operation and a presenter.
//!
//! The adapter turns one logical load request into exactly one
//! started/finished notification pair: a request while a load is in flight
//! is a no-op, and a cancelled load delivers nothing at all. Notifications
//! are emitted under the adapter's state lock, so for a given instance they
//! are strictly ordered and never concurrent, no matter which worker thread
//! the operation completed on.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

use crate::error::LoadError;

/// Receives the adapter's lifecycle notifications.
///
/// Callbacks run under the adapter's delivery lock; implementations must
/// not call back into the adapter from inside them.
pub trait ResourcePresenter<V>: Send + Sync {
  fn did_start_loading(&self);
  fn did_finish_loading(&self, view_model: V);
  fn did_fail_loading(&self, message: &str);
}

type LoaderFuture<R> = Pin<Box<dyn Future<Output = Result<R, LoadError>> + Send>>;
type LoaderFn<R> = Box<dyn Fn() -> LoaderFuture<R> + Send + Sync>;
type MapperFn<R, V> = Box<dyn Fn(R) -> Result<V, LoadError> + Send + Sync>;

struct State {
  loading: bool,
  // Bumped on every accepted request and on cancel; a completion whose
  // generation no longer matches is discarded instead of delivered.
  generation: u64,
  handle: Option<JoinHandle<()>>,
}

struct Inner<R, V> {
  loader: LoaderFn<R>,
  mapper: MapperFn<R, V>,
  presenter: Arc<dyn ResourcePresenter<V>>,
  state: Mutex<State>,
}

impl<R, V> Inner<R, V> {
  fn lock(&self) -> MutexGuard<'_, State> {
    self.state.lock().unwrap_or_else(|e| e.into_inner())
  }

  fn complete(&self, generation: u64, result: Result<R, LoadError>) {
    let mut state = self.lock();
    if !state.loading || state.generation != generation {
      // Cancelled or superseded while in flight; stay silent.
      return;
    }
    state.loading = false;
    state.handle = None;

    match result.and_then(|resource| (self.mapper)(resource)) {
      Ok(view_model) => self.presenter.did_finish_loading(view_model),
      Err(err) => self.presenter.did_fail_loading(&err.to_string()),
    }
  }
}

/// Concurrency-safe bridge from load requests to presenter notifications.
///
/// Generic over the loaded resource `R` and the presented view model `V`;
/// the injected mapper turns one into the other, and a mapper failure is
/// reported as a failed load.
pub struct LoadAdapter<R, V> {
  inner: Arc<Inner<R, V>>,
}

impl<R, V> LoadAdapter<R, V>
where
  R: Send + 'static,
  V: Send + 'static,
{
  pub fn new<L, Fut, M>(loader: L, mapper: M, presenter: Arc<dyn ResourcePresenter<V>>) -> Self
  where
    L: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, LoadError>> + Send + 'static,
    M: Fn(R) -> Result<V, LoadError> + Send + Sync + 'static,
  {
    Self {
      inner: Arc::new(Inner {
        loader: Box::new(move || Box::pin(loader())),
        mapper: Box::new(mapper),
        presenter,
        state: Mutex::new(State {
          loading: false,
          generation: 0,
          handle: None,
        }),
      }),
    }
  }

  /// Requests a load. Emits `did_start_loading` synchronously, then runs
  /// the operation on a spawned task. A request while a load is already in
  /// flight is a no-op. Must be called within a tokio runtime.
  pub fn load_resource(&self) {
    let mut state = self.inner.lock();
    if state.loading {
      return;
    }
    state.loading = true;
    state.generation += 1;
    let generation = state.generation;

    self.inner.presenter.did_start_loading();

    let future = (self.inner.loader)();
    let inner = Arc::clone(&self.inner);
    state.handle = Some(tokio::spawn(async move {
      let result = future.await;
      inner.complete(generation, result);
    }));
  }

  /// Cancels the in-flight load, if any. The adapter returns to idle
  /// immediately and any completion of the cancelled operation is
  /// discarded, even one racing this call.
  pub fn cancel(&self) {
    let mut state = self.inner.lock();
    if let Some(handle) = state.handle.take() {
      handle.abort();
    }
    if state.loading {
      state.loading = false;
      state.generation += 1;
    }
  }

  /// Whether a load is currently in flight.
  pub fn is_loading(&self) -> bool {
    self.inner.lock().loading
  }
}

impl<R, V> Clone for LoadAdapter<R, V> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::time::Duration;

  #[derive(Debug, Clone, PartialEq, Eq)]
  enum Notification {
    Started,
    Finished(String),
    Failed(String),
  }

  #[derive(Default)]
  struct PresenterSpy {
    notifications: Mutex<Vec<Notification>>,
  }

  impl PresenterSpy {
    fn notifications(&self) -> Vec<Notification> {
      self.notifications.lock().unwrap().clone()
    }
  }

  impl ResourcePresenter<String> for PresenterSpy {
    fn did_start_loading(&self) {
      self
        .notifications
        .lock()
        .unwrap()
        .push(Notification::Started);
    }

    fn did_finish_loading(&self, view_model: String) {
      self
        .notifications
        .lock()
        .unwrap()
        .push(Notification::Finished(view_model));
    }

    fn did_fail_loading(&self, message: &str) {
      self
        .notifications
        .lock()
        .unwrap()
        .push(Notification::Failed(message.to_string()));
    }
  }

  fn uppercase(resource: String) -> Result<String, LoadError> {
    Ok(resource.to_uppercase())
  }

  async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
  }

  #[tokio::test]
  async fn test_load_emits_started_then_finished_with_mapped_resource() {
    let presenter = Arc::new(PresenterSpy::default());
    let adapter = LoadAdapter::new(
      || async { Ok("a feed".to_string()) },
      uppercase,
      presenter.clone() as Arc<dyn ResourcePresenter<String>>,
    );

    adapter.load_resource();
    assert_eq!(presenter.notifications(), vec![Notification::Started]);

    settle().await;
    assert_eq!(
      presenter.notifications(),
      vec![
        Notification::Started,
        Notification::Finished("A FEED".to_string())
      ]
    );
    assert!(!adapter.is_loading());
  }

  #[tokio::test]
  async fn test_load_failure_is_reported_once() {
    let presenter = Arc::new(PresenterSpy::default());
    let adapter: LoadAdapter<String, String> = LoadAdapter::new(
      || async { Err(LoadError::Connectivity) },
      uppercase,
      presenter.clone() as Arc<dyn ResourcePresenter<String>>,
    );

    adapter.load_resource();
    settle().await;

    assert_eq!(
      presenter.notifications(),
      vec![
        Notification::Started,
        Notification::Failed(LoadError::Connectivity.to_string())
      ]
    );
  }

  #[tokio::test]
  async fn test_mapper_failure_is_a_failed_load() {
    let presenter = Arc::new(PresenterSpy::default());
    let adapter = LoadAdapter::new(
      || async { Ok("a feed".to_string()) },
      |_resource: String| Err(LoadError::InvalidData),
      presenter.clone() as Arc<dyn ResourcePresenter<String>>,
    );

    adapter.load_resource();
    settle().await;

    assert_eq!(
      presenter.notifications(),
      vec![
        Notification::Started,
        Notification::Failed(LoadError::InvalidData.to_string())
      ]
    );
  }

  #[tokio::test]
  async fn test_second_request_while_loading_is_a_noop() {
    let presenter = Arc::new(PresenterSpy::default());
    let invocations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invocations);

    let adapter = LoadAdapter::new(
      move || {
        let counter = Arc::clone(&counter);
        async move {
          counter.fetch_add(1, Ordering::SeqCst);
          tokio::time::sleep(Duration::from_millis(100)).await;
          Ok("a feed".to_string())
        }
      },
      uppercase,
      presenter.clone() as Arc<dyn ResourcePresenter<String>>,
    );

    adapter.load_resource();
    adapter.load_resource();
    settle().await;

    assert_eq!(invocations.load(Ordering::SeqCst), 1);
    assert_eq!(presenter.notifications(), vec![Notification::Started]);
  }

  #[tokio::test]
  async fn test_cancel_suppresses_completion_and_allows_a_new_load() {
    let presenter = Arc::new(PresenterSpy::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    // The first operation never completes on its own; later ones finish
    // immediately.
    let adapter = LoadAdapter::new(
      move || {
        let call = counter.fetch_add(1, Ordering::SeqCst);
        async move {
          if call == 0 {
            futures::future::pending::<()>().await;
          }
          Ok("second result".to_string())
        }
      },
      uppercase,
      presenter.clone() as Arc<dyn ResourcePresenter<String>>,
    );

    adapter.load_resource();
    adapter.cancel();
    assert!(!adapter.is_loading());

    // The cancelled operation produces no finished notification.
    settle().await;
    assert_eq!(presenter.notifications(), vec![Notification::Started]);

    // A fresh load goes through immediately.
    adapter.load_resource();
    settle().await;
    assert_eq!(
      presenter.notifications(),
      vec![
        Notification::Started,
        Notification::Started,
        Notification::Finished("SECOND RESULT".to_string())
      ]
    );
  }

  #[tokio::test]
  async fn test_cancel_when_idle_is_a_noop() {
    let presenter = Arc::new(PresenterSpy::default());
    let adapter = LoadAdapter::new(
      || async { Ok("a feed".to_string()) },
      uppercase,
      presenter.clone() as Arc<dyn ResourcePresenter<String>>,
    );

    adapter.cancel();
    assert!(presenter.notifications().is_empty());
  }
}
