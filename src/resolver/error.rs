//! Resolver error types.

use thiserror::Error;

/// Error produced by a loader.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A controller module could not be loaded.
///
/// An identifier that no source knows about is *not* an error, see
/// [`crate::resolver::GlobResolver::resolve`].
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to load controller `{identifier}`")]
    Load {
        identifier: String,
        #[source]
        source: BoxError,
    },

    #[error("controller module `{identifier}` has no default export")]
    MissingDefault { identifier: String },
}

impl ResolveError {
    pub fn identifier(&self) -> &str {
        match self {
            Self::Load { identifier, .. } | Self::MissingDefault { identifier } => identifier,
        }
    }
}
