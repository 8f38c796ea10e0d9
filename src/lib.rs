//! Controller Resolver - lazy, load-once controller registration.
//!
//! A document declares the controllers its elements need through an
//! attribute (`data-controller="search blogs--previous-updates"`). This crate
//! watches those declarations and loads each controller the first time it is
//! requested, from loaders a bundler enumerated at build time.
//!
//! # Module Structure
//!
//! ```text
//! identifier/   key -> identifier extraction (pattern + normalization)
//! source/       glob sources, normalization, identifier map fold
//! resolver/     async identifier -> controller function
//! engine/       attribute-driven, exactly-once loading
//! config/       controllers.toml
//! core/         shared enums (execution mode, failure policy)
//! logger        log!/debug! macros
//! ```
//!
//! # Example
//!
//! ```ignore
//! let resolver = create_resolver([app_glob, component_glob])
//!     .with_mode(ExecutionMode::Development);
//! let engine = ControllerResolver::install(application, resolver)?;
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod identifier;
pub mod logger;
pub mod resolver;
pub mod source;

pub use crate::core::{ExecutionMode, FailurePolicy};
pub use crate::engine::{
    Application, AttributeDelegate, AttributeObserver, ControllerResolver, Element, EngineError,
    EngineOptions, LoadHandle, Schema,
};
pub use crate::identifier::{
    CONTROLLER_FILENAME_PATTERN, Extract, extract_identifier, extract_identifier_with,
};
pub use crate::resolver::{
    GlobResolver, LoadedModule, Loader, Resolve, ResolveError, create_resolver, loader,
};
pub use crate::source::{Glob, GlobSource, IdentifierMap, SourceConfig};
