//! Controller resolution engine.
//!
//! Watches the host's controller attribute and loads every declared
//! identifier on first sight, exactly once.
//!
//! # Identifier lifecycle
//!
//! ```text
//!            notification                 Some(controller)
//!   Idle ─────────────────────> Loading ───────────────────> Registered
//!    ^                             │
//!    └───────── Ok(None) ──────────┤
//!                                  │ Err(_)
//!                                  v
//!              stays Loading (FailurePolicy::Retain)
//!              back to Idle  (FailurePolicy::Release)
//! ```
//!
//! The check-and-mark happens synchronously on the notifying thread, before
//! the load task is spawned, so two notifications for the same identifier can
//! never both start a load. `Registered` is read from the host, which stays
//! the single source of truth across engines and other registration paths.

mod host;

pub use host::{
    Application, AttributeDelegate, AttributeObserver, DEFAULT_CONTROLLER_ATTRIBUTE, Element,
    Schema,
};

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use thiserror::Error;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;

use crate::core::FailurePolicy;
use crate::resolver::{Resolve, ResolveError};

/// Handle of one per-identifier load task.
///
/// Resolves to the resolver's error when the load failed.
pub type LoadHandle = JoinHandle<Result<(), ResolveError>>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("controller resolver must be created inside a tokio runtime")]
    NoRuntime(#[from] TryCurrentError),
}

/// Engine settings.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub on_failure: FailurePolicy,
    /// Runtime load tasks are spawned on (default: the current one).
    pub runtime: Option<Handle>,
}

// =============================================================================
// ControllerResolver
// =============================================================================

/// Loads controllers on demand as the document declares them.
pub struct ControllerResolver<A: Application> {
    state: Arc<LoadState<A>>,
    observer: A::Observer,
    running: bool,
}

impl<A: Application> ControllerResolver<A> {
    /// Create a stopped engine on the current tokio runtime.
    pub fn new(
        application: Arc<A>,
        resolver: impl Resolve<A::Controller> + 'static,
    ) -> Result<Self, EngineError> {
        Self::with_options(application, resolver, EngineOptions::default())
    }

    pub fn with_options(
        application: Arc<A>,
        resolver: impl Resolve<A::Controller> + 'static,
        options: EngineOptions,
    ) -> Result<Self, EngineError> {
        let runtime = match options.runtime {
            Some(handle) => handle,
            None => Handle::try_current()?,
        };

        let attribute = application.schema().controller_attribute.clone();
        let state = Arc::new(LoadState {
            application: Arc::clone(&application),
            resolver: Arc::new(resolver),
            loading: Mutex::new(FxHashSet::default()),
            runtime,
            on_failure: options.on_failure,
        });

        let delegate: Arc<dyn AttributeDelegate<A::Element>> =
            Arc::new(Notifications(Arc::clone(&state)));
        let observer = application.observe(&attribute, delegate);

        Ok(Self {
            state,
            observer,
            running: false,
        })
    }

    /// Create an engine and start observing right away.
    pub fn install(
        application: Arc<A>,
        resolver: impl Resolve<A::Controller> + 'static,
    ) -> Result<Self, EngineError> {
        Self::install_with_options(application, resolver, EngineOptions::default())
    }

    pub fn install_with_options(
        application: Arc<A>,
        resolver: impl Resolve<A::Controller> + 'static,
        options: EngineOptions,
    ) -> Result<Self, EngineError> {
        let mut engine = Self::with_options(application, resolver, options)?;
        engine.start();
        Ok(engine)
    }

    /// Begin delivering attribute notifications.
    pub fn start(&mut self) {
        self.observer.start();
        self.running = true;
        crate::debug!("engine"; "observing `{}`", self.attribute());
    }

    /// Stop delivering notifications. Loads already in flight still finish.
    pub fn stop(&mut self) {
        self.observer.stop();
        self.running = false;
        crate::debug!("engine"; "stopped observing `{}`", self.attribute());
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Load every identifier declared on `element`.
    ///
    /// Returns one handle per load actually started; identifiers already
    /// loading or registered are skipped.
    pub fn load_controllers(&self, element: &A::Element) -> Vec<LoadHandle> {
        self.state.load_controllers(element)
    }

    /// Load a single identifier, unless it is loading or registered.
    pub fn load_controller(&self, identifier: &str) -> Option<LoadHandle> {
        self.state.load_controller(identifier)
    }

    /// Whether a load for `identifier` is outstanding (or failed and was
    /// retained).
    pub fn is_loading(&self, identifier: &str) -> bool {
        self.state.loading.lock().contains(identifier)
    }

    pub fn application(&self) -> &Arc<A> {
        &self.state.application
    }

    fn attribute(&self) -> &str {
        &self.state.application.schema().controller_attribute
    }
}

// =============================================================================
// LoadState
// =============================================================================

/// State shared between the engine, its observer callbacks and load tasks.
struct LoadState<A: Application> {
    application: Arc<A>,
    resolver: Arc<dyn Resolve<A::Controller>>,
    /// Identifiers with a load in flight.
    loading: Mutex<FxHashSet<String>>,
    runtime: Handle,
    on_failure: FailurePolicy,
}

impl<A: Application> LoadState<A> {
    fn load_controllers(self: &Arc<Self>, element: &A::Element) -> Vec<LoadHandle> {
        let attribute = &self.application.schema().controller_attribute;
        let Some(value) = element.attribute(attribute) else {
            return Vec::new();
        };

        value
            .split_whitespace()
            .filter_map(|identifier| self.load_controller(identifier))
            .collect()
    }

    fn load_controller(self: &Arc<Self>, identifier: &str) -> Option<LoadHandle> {
        if !self.begin(identifier) {
            return None;
        }

        crate::debug!("engine"; "loading `{}`", identifier);
        let state = Arc::clone(self);
        let identifier = identifier.to_string();
        Some(self.runtime.spawn(state.load(identifier)))
    }

    /// Mark `identifier` as loading if it is idle.
    ///
    /// Runs under the lock so concurrent notifications cannot both pass.
    fn begin(&self, identifier: &str) -> bool {
        let mut loading = self.loading.lock();
        if loading.contains(identifier) || self.application.is_registered(identifier) {
            return false;
        }
        loading.insert(identifier.to_string())
    }

    fn finish(&self, identifier: &str) {
        self.loading.lock().remove(identifier);
    }

    async fn load(self: Arc<Self>, identifier: String) -> Result<(), ResolveError> {
        match self.resolver.resolve(&identifier).await {
            Ok(Some(controller)) => {
                // Register before clearing the mark: a concurrent notification
                // then sees either "loading" or "registered".
                self.application.register(&identifier, controller);
                crate::debug!("engine"; "registered `{}`", identifier);
            }
            Ok(None) => {
                crate::debug!("engine"; "nothing to register for `{}`", identifier);
            }
            Err(err) => {
                crate::log!("error"; "{}", err);
                if self.on_failure.releases() {
                    self.finish(&identifier);
                }
                return Err(err);
            }
        }

        self.finish(&identifier);
        Ok(())
    }
}

/// Observer callbacks. Load handles are detached, so failures surface only
/// through the runtime.
struct Notifications<A: Application>(Arc<LoadState<A>>);

impl<A: Application> AttributeDelegate<A::Element> for Notifications<A> {
    fn element_matched_attribute(&self, element: &A::Element) {
        self.0.load_controllers(element);
    }

    fn element_attribute_value_changed(&self, element: &A::Element) {
        self.0.load_controllers(element);
    }
}

#[cfg(test)]
mod tests;
