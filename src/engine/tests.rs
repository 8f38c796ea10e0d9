use std::io::{Error, ErrorKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::Semaphore;

use super::*;
use crate::resolver::{BoxError, LoadedModule, ResolveFuture, create_resolver, loader};
use crate::source::Glob;

// =============================================================================
// Fake host
// =============================================================================

struct FakeElement(Option<String>);

impl FakeElement {
    fn declaring(value: &str) -> Self {
        Self(Some(value.to_string()))
    }
}

impl Element for FakeElement {
    fn attribute(&self, name: &str) -> Option<String> {
        if name == DEFAULT_CONTROLLER_ATTRIBUTE {
            self.0.clone()
        } else {
            None
        }
    }
}

struct FakeObserver {
    delegate: Arc<dyn AttributeDelegate<FakeElement>>,
    attribute: String,
    active: bool,
}

impl FakeObserver {
    fn matched(&self, element: &FakeElement) {
        if self.active {
            self.delegate.element_matched_attribute(element);
        }
    }

    fn changed(&self, element: &FakeElement) {
        if self.active {
            self.delegate.element_attribute_value_changed(element);
        }
    }
}

impl AttributeObserver for FakeObserver {
    fn start(&mut self) {
        self.active = true;
    }

    fn stop(&mut self) {
        self.active = false;
    }
}

#[derive(Default)]
struct FakeApp {
    schema: Schema,
    registered: Mutex<FxHashMap<String, &'static str>>,
    registrations: AtomicUsize,
}

impl FakeApp {
    fn with_registered(identifier: &str) -> Self {
        let app = Self::default();
        app.registered
            .lock()
            .insert(identifier.to_string(), "registered elsewhere");
        app
    }

    fn controller(&self, identifier: &str) -> Option<&'static str> {
        self.registered.lock().get(identifier).copied()
    }
}

impl Application for FakeApp {
    type Element = FakeElement;
    type Controller = &'static str;
    type Observer = FakeObserver;

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn is_registered(&self, identifier: &str) -> bool {
        self.registered.lock().contains_key(identifier)
    }

    fn register(&self, identifier: &str, controller: &'static str) {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        self.registered
            .lock()
            .insert(identifier.to_string(), controller);
    }

    fn observe(
        &self,
        attribute: &str,
        delegate: Arc<dyn AttributeDelegate<FakeElement>>,
    ) -> FakeObserver {
        FakeObserver {
            delegate,
            attribute: attribute.to_string(),
            active: false,
        }
    }
}

// =============================================================================
// Fake resolver
// =============================================================================

/// Counts invocations and holds every load until a permit is released.
#[derive(Clone)]
struct GatedResolver {
    calls: Arc<AtomicUsize>,
    gate: Arc<Semaphore>,
}

impl GatedResolver {
    fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    fn open() -> Self {
        let resolver = Self::new();
        resolver.gate.add_permits(Semaphore::MAX_PERMITS / 2);
        resolver
    }

    fn release(&self, permits: usize) {
        self.gate.add_permits(permits);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Resolve<&'static str> for GatedResolver {
    fn resolve(&self, identifier: &str) -> ResolveFuture<&'static str> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = Arc::clone(&self.gate);
        let identifier = identifier.to_string();
        Box::pin(async move {
            gate.acquire().await.expect("gate closed").forget();
            match identifier.as_str() {
                "hello" => Ok(Some("HelloController")),
                "search" => Ok(Some("SearchController")),
                "broken" => Err(ResolveError::Load {
                    identifier,
                    source: Box::new(Error::new(ErrorKind::Other, "chunk failed")),
                }),
                _ => Ok(None),
            }
        })
    }
}

async fn join_all(handles: Vec<LoadHandle>) -> Vec<Result<(), ResolveError>> {
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.expect("load task panicked"));
    }
    results
}

/// Let detached load tasks run on the current-thread test runtime.
async fn settle(app: &FakeApp, identifier: &str) {
    for _ in 0..100 {
        if app.is_registered(identifier) {
            return;
        }
        tokio::task::yield_now().await;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_loads_and_registers() {
    let app = Arc::new(FakeApp::default());
    let resolver = GatedResolver::open();
    let engine = ControllerResolver::new(Arc::clone(&app), resolver.clone()).unwrap();

    let results = join_all(engine.load_controllers(&FakeElement::declaring("hello"))).await;

    assert_eq!(results.len(), 1);
    assert!(results[0].is_ok());
    assert_eq!(app.controller("hello"), Some("HelloController"));
    assert!(!engine.is_loading("hello"));
    assert_eq!(resolver.calls(), 1);
}

#[tokio::test]
async fn test_duplicate_notifications_load_once() {
    let app = Arc::new(FakeApp::default());
    let resolver = GatedResolver::new();
    let engine = ControllerResolver::new(Arc::clone(&app), resolver.clone()).unwrap();
    let element = FakeElement::declaring("hello");

    let first = engine.load_controllers(&element);
    let second = engine.load_controllers(&element);
    let third = engine.load_controllers(&FakeElement::declaring("hello hello"));

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert!(third.is_empty());
    assert!(engine.is_loading("hello"));

    resolver.release(1);
    join_all(first).await;

    assert_eq!(resolver.calls(), 1);
    assert_eq!(app.registrations.load(Ordering::SeqCst), 1);
    assert!(!engine.is_loading("hello"));
}

#[tokio::test]
async fn test_registered_identifier_never_resolved_again() {
    let app = Arc::new(FakeApp::default());
    let resolver = GatedResolver::open();
    let engine = ControllerResolver::new(Arc::clone(&app), resolver.clone()).unwrap();
    let element = FakeElement::declaring("hello");

    join_all(engine.load_controllers(&element)).await;
    for _ in 0..3 {
        assert!(engine.load_controllers(&element).is_empty());
    }

    assert_eq!(resolver.calls(), 1);
}

#[tokio::test]
async fn test_host_registered_identifier_skipped() {
    let app = Arc::new(FakeApp::with_registered("hello"));
    let resolver = GatedResolver::open();
    let engine = ControllerResolver::new(Arc::clone(&app), resolver.clone()).unwrap();

    assert!(engine.load_controller("hello").is_none());
    assert_eq!(resolver.calls(), 0);
    assert_eq!(app.controller("hello"), Some("registered elsewhere"));
}

#[tokio::test]
async fn test_splits_on_whitespace() {
    let app = Arc::new(FakeApp::default());
    let resolver = GatedResolver::open();
    let engine = ControllerResolver::new(Arc::clone(&app), resolver.clone()).unwrap();

    let handles = engine.load_controllers(&FakeElement::declaring("  hello\tsearch\n unknown "));
    assert_eq!(handles.len(), 3);
    join_all(handles).await;

    assert_eq!(app.controller("hello"), Some("HelloController"));
    assert_eq!(app.controller("search"), Some("SearchController"));
    assert_eq!(app.controller("unknown"), None);
}

#[tokio::test]
async fn test_element_without_attribute() {
    let app = Arc::new(FakeApp::default());
    let resolver = GatedResolver::open();
    let engine = ControllerResolver::new(Arc::clone(&app), resolver.clone()).unwrap();

    assert!(engine.load_controllers(&FakeElement(None)).is_empty());
    assert!(engine.load_controllers(&FakeElement::declaring("   ")).is_empty());
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn test_unresolved_identifier_can_retry() {
    let app = Arc::new(FakeApp::default());
    let resolver = GatedResolver::open();
    let engine = ControllerResolver::new(Arc::clone(&app), resolver.clone()).unwrap();

    let results = join_all(engine.load_controllers(&FakeElement::declaring("unknown"))).await;
    assert!(results[0].is_ok());
    assert!(!engine.is_loading("unknown"));
    assert!(!app.is_registered("unknown"));

    join_all(engine.load_controllers(&FakeElement::declaring("unknown"))).await;
    assert_eq!(resolver.calls(), 2);
}

#[tokio::test]
async fn test_failed_load_is_retained_by_default() {
    let app = Arc::new(FakeApp::default());
    let resolver = GatedResolver::open();
    let engine = ControllerResolver::new(Arc::clone(&app), resolver.clone()).unwrap();

    let results = join_all(engine.load_controllers(&FakeElement::declaring("broken"))).await;
    assert!(matches!(results[0], Err(ResolveError::Load { .. })));
    assert!(engine.is_loading("broken"));

    assert!(engine.load_controller("broken").is_none());
    assert_eq!(resolver.calls(), 1);
}

#[tokio::test]
async fn test_failed_load_released_on_request() {
    let app = Arc::new(FakeApp::default());
    let resolver = GatedResolver::open();
    let options = EngineOptions {
        on_failure: FailurePolicy::Release,
        runtime: None,
    };
    let engine = ControllerResolver::with_options(Arc::clone(&app), resolver.clone(), options).unwrap();

    let results = join_all(engine.load_controllers(&FakeElement::declaring("broken"))).await;
    assert!(results[0].is_err());
    assert!(!engine.is_loading("broken"));

    let retry = engine.load_controller("broken");
    assert!(retry.is_some());
    join_all(retry.into_iter().collect()).await;
    assert_eq!(resolver.calls(), 2);
}

#[tokio::test]
async fn test_install_observes_notifications() {
    let app = Arc::new(FakeApp::default());
    let resolver = GatedResolver::open();
    let engine = ControllerResolver::install(Arc::clone(&app), resolver.clone()).unwrap();

    assert!(engine.is_running());
    assert_eq!(engine.observer.attribute, "data-controller");

    engine.observer.matched(&FakeElement::declaring("hello"));
    settle(&app, "hello").await;
    assert_eq!(app.controller("hello"), Some("HelloController"));

    engine.observer.changed(&FakeElement::declaring("hello search"));
    settle(&app, "search").await;
    assert_eq!(app.controller("search"), Some("SearchController"));
    assert_eq!(resolver.calls(), 2);
}

#[tokio::test]
async fn test_install_with_options_releases_failures() {
    let app = Arc::new(FakeApp::default());
    let resolver = GatedResolver::open();
    let options = EngineOptions {
        on_failure: FailurePolicy::Release,
        runtime: None,
    };
    let engine =
        ControllerResolver::install_with_options(Arc::clone(&app), resolver.clone(), options)
            .unwrap();
    assert!(engine.is_running());

    let results = join_all(engine.load_controllers(&FakeElement::declaring("broken"))).await;
    assert!(results[0].is_err());
    assert!(!engine.is_loading("broken"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_notifications_load_once() {
    for _ in 0..50 {
        let app = Arc::new(FakeApp::default());
        let resolver = GatedResolver::open();
        let engine = ControllerResolver::new(Arc::clone(&app), resolver.clone()).unwrap();

        let handles: Vec<LoadHandle> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        (0..50)
                            .flat_map(|_| {
                                engine.load_controllers(&FakeElement::declaring("hello search"))
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            workers
                .into_iter()
                .flat_map(|worker| worker.join().expect("notifier panicked"))
                .collect()
        });

        assert_eq!(handles.len(), 2);
        join_all(handles).await;
        assert_eq!(app.registrations.load(Ordering::SeqCst), 2);
        assert_eq!(resolver.calls(), 2);
    }
}

#[tokio::test]
async fn test_stop_halts_notifications() {
    let app = Arc::new(FakeApp::default());
    let resolver = GatedResolver::open();
    let mut engine = ControllerResolver::new(Arc::clone(&app), resolver.clone()).unwrap();

    // Not started yet
    engine.observer.matched(&FakeElement::declaring("hello"));
    assert!(!engine.is_loading("hello"));

    engine.start();
    engine.stop();
    assert!(!engine.is_running());
    engine.observer.matched(&FakeElement::declaring("hello"));
    tokio::task::yield_now().await;

    assert_eq!(resolver.calls(), 0);
    assert!(!app.is_registered("hello"));
}

#[tokio::test]
async fn test_stop_lets_in_flight_load_finish() {
    let app = Arc::new(FakeApp::default());
    let resolver = GatedResolver::new();
    let mut engine = ControllerResolver::install(Arc::clone(&app), resolver.clone()).unwrap();

    let handles = engine.load_controllers(&FakeElement::declaring("hello"));
    engine.stop();
    resolver.release(1);
    join_all(handles).await;

    assert_eq!(app.controller("hello"), Some("HelloController"));
}

#[tokio::test]
async fn test_engines_are_independent() {
    let app = Arc::new(FakeApp::default());
    let resolver = GatedResolver::new();
    let first = ControllerResolver::new(Arc::clone(&app), resolver.clone()).unwrap();
    let second = ControllerResolver::new(Arc::clone(&app), resolver.clone()).unwrap();

    let handles = first.load_controllers(&FakeElement::declaring("hello"));
    assert!(first.is_loading("hello"));
    assert!(!second.is_loading("hello"));

    resolver.release(1);
    join_all(handles).await;

    // Once registered, the host lookup stops the second engine too
    assert!(second.load_controller("hello").is_none());
    assert_eq!(resolver.calls(), 1);
}

#[tokio::test]
async fn test_with_glob_resolver() {
    let app = Arc::new(FakeApp::default());
    let glob: Glob<_> = [(
        "../app/javascript/controllers/blogs/previous_updates_controller.js".to_string(),
        loader(|| async { Ok::<_, BoxError>(LoadedModule::new("PreviousUpdates")) }),
    )]
    .into();
    let engine = ControllerResolver::new(Arc::clone(&app), create_resolver([glob])).unwrap();

    let handles = engine.load_controllers(&FakeElement::declaring("blogs--previous-updates missing"));
    assert_eq!(handles.len(), 2);
    join_all(handles).await;

    assert_eq!(
        app.controller("blogs--previous-updates"),
        Some("PreviousUpdates")
    );
    assert!(!engine.is_loading("missing"));
}

#[test]
fn test_requires_runtime() {
    let app = Arc::new(FakeApp::default());
    let result = ControllerResolver::new(app, GatedResolver::open());
    assert!(matches!(result, Err(EngineError::NoRuntime(_))));
}
