//! Resolver function factory.
//!
//! Builds an `identifier -> controller` async function over the identifier
//! map of one or more glob sources:
//!
//! ```text
//! GlobSource* --normalize--> NormalizedSource* --fold--> IdentifierMap<Loader>
//!                                                              |
//!                          resolve("blogs--previous-updates") -+-> loader().default
//! ```
//!
//! An identifier without a loader resolves to `Ok(None)`. In development mode
//! this also logs a warning listing every known identifier.

mod error;
mod loader;

pub use error::{BoxError, ResolveError};
pub use loader::{BoxFuture, LoadedModule, Loader, loader};

use std::fmt;

use crate::core::ExecutionMode;
use crate::source::{GlobSource, IdentifierMap, normalize};

/// Future returned by [`Resolve::resolve`].
pub type ResolveFuture<T> = BoxFuture<Result<Option<T>, ResolveError>>;

// =============================================================================
// Resolve
// =============================================================================

/// Asynchronous `identifier -> controller` lookup used by the engine.
///
/// Implemented by [`GlobResolver`] and by any
/// `Fn(&str) -> ResolveFuture<T>` closure.
pub trait Resolve<T>: Send + Sync {
    fn resolve(&self, identifier: &str) -> ResolveFuture<T>;
}

impl<T, F> Resolve<T> for F
where
    F: Fn(&str) -> ResolveFuture<T> + Send + Sync,
{
    fn resolve(&self, identifier: &str) -> ResolveFuture<T> {
        self(identifier)
    }
}

// =============================================================================
// Unresolved diagnostic
// =============================================================================

/// Development diagnostic for an identifier no source provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub identifier: String,
    /// Every identifier the resolver knows, sorted.
    pub available: Vec<String>,
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "can't resolve \"{}\". Available: [{}]",
            self.identifier,
            self.available.join(", ")
        )
    }
}

// =============================================================================
// GlobResolver
// =============================================================================

/// Resolver over the loaders of one or more glob sources.
pub struct GlobResolver<T> {
    loaders: IdentifierMap<Loader<T>>,
    mode: ExecutionMode,
}

/// Build a production-mode resolver from `sources`, later ones overriding
/// earlier ones.
pub fn create_resolver<T, S, I>(sources: I) -> GlobResolver<T>
where
    T: Send + 'static,
    S: Into<GlobSource<Loader<T>>>,
    I: IntoIterator<Item = S>,
{
    GlobResolver::new(sources)
}

impl<T: Send + 'static> GlobResolver<T> {
    pub fn new<S, I>(sources: I) -> Self
    where
        S: Into<GlobSource<Loader<T>>>,
        I: IntoIterator<Item = S>,
    {
        let normalized = sources.into_iter().map(|source| normalize(source.into()));
        Self::from_map(IdentifierMap::build(normalized))
    }

    pub fn from_map(loaders: IdentifierMap<Loader<T>>) -> Self {
        Self {
            loaders,
            mode: ExecutionMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn loaders(&self) -> &IdentifierMap<Loader<T>> {
        &self.loaders
    }

    /// Diagnostic for `identifier`, only in development mode and only when
    /// no loader exists for it.
    pub fn diagnose(&self, identifier: &str) -> Option<Unresolved> {
        if !self.mode.is_dev() || self.loaders.contains(identifier) {
            return None;
        }
        Some(Unresolved {
            identifier: identifier.to_string(),
            available: self.loaders.identifiers().map(str::to_string).collect(),
        })
    }

    /// Load the controller for `identifier`.
    ///
    /// - unknown identifier: `Ok(None)` (plus a warning in development mode)
    /// - loader failed: `Err(ResolveError::Load)`
    /// - module without default export: `Err(ResolveError::MissingDefault)`
    pub fn resolve(&self, identifier: &str) -> ResolveFuture<T> {
        let Some(loader) = self.loaders.get(identifier).cloned() else {
            if let Some(unresolved) = self.diagnose(identifier) {
                crate::log!("warning"; "{}", unresolved);
            }
            return Box::pin(async { Ok(None) });
        };

        let identifier = identifier.to_string();
        Box::pin(async move {
            let module = loader().await.map_err(|source| ResolveError::Load {
                identifier: identifier.clone(),
                source,
            })?;
            match module.default {
                Some(controller) => Ok(Some(controller)),
                None => Err(ResolveError::MissingDefault { identifier }),
            }
        })
    }
}

impl<T: Send + 'static> Resolve<T> for GlobResolver<T> {
    fn resolve(&self, identifier: &str) -> ResolveFuture<T> {
        GlobResolver::resolve(self, identifier)
    }
}

impl<T> fmt::Debug for GlobResolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobResolver")
            .field("identifiers", &self.loaders.identifiers().collect::<Vec<_>>())
            .field("mode", &self.mode)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
