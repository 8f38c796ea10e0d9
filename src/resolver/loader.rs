//! Lazy loaders as supplied by a bundler glob.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::error::BoxError;

/// Boxed future returned by loaders and resolvers.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// What a loader yields: a module whose `default` export is the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedModule<T> {
    pub default: Option<T>,
}

impl<T> LoadedModule<T> {
    /// Module exporting `controller` as its default.
    pub fn new(controller: T) -> Self {
        Self {
            default: Some(controller),
        }
    }

    /// Module without a default export.
    pub fn empty() -> Self {
        Self { default: None }
    }
}

/// Zero-argument asynchronous capability yielding a module.
///
/// Cloning shares the same underlying function.
pub type Loader<T> = Arc<dyn Fn() -> BoxFuture<Result<LoadedModule<T>, BoxError>> + Send + Sync>;

/// Wrap an async function as a [`Loader`].
///
/// ```ignore
/// let hello = loader(|| async { Ok(LoadedModule::new(HelloController)) });
/// ```
pub fn loader<T, F, Fut>(f: F) -> Loader<T>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<LoadedModule<T>, BoxError>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()) as BoxFuture<_>)
}
