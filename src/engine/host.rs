//! Boundary with the host application.
//!
//! The engine never touches the document directly. The host provides:
//!
//! - a naming [`Schema`] with the controller attribute name,
//! - a lookup of identifiers it has already registered,
//! - `register(identifier, controller)`,
//! - an attribute observer that calls back into an [`AttributeDelegate`].

use std::sync::Arc;

/// Attribute the document uses to declare controllers.
pub const DEFAULT_CONTROLLER_ATTRIBUTE: &str = "data-controller";

/// Naming conventions of the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub controller_attribute: String,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            controller_attribute: DEFAULT_CONTROLLER_ATTRIBUTE.to_string(),
        }
    }
}

/// A node of the observed document.
pub trait Element {
    /// Current value of `name`, `None` if the attribute is absent.
    fn attribute(&self, name: &str) -> Option<String>;
}

/// Receiver of attribute notifications.
///
/// Both callbacks run synchronously on the notifying thread.
pub trait AttributeDelegate<E>: Send + Sync {
    /// `element` now carries the observed attribute.
    fn element_matched_attribute(&self, element: &E);

    /// The observed attribute of `element` changed value.
    fn element_attribute_value_changed(&self, element: &E);
}

/// Attribute observation primitive owned by the host.
pub trait AttributeObserver {
    fn start(&mut self);
    fn stop(&mut self);
}

/// The host application controllers are registered with.
pub trait Application: Send + Sync + 'static {
    type Element: Element + 'static;
    /// Controller definition produced by loaders.
    type Controller: Send + 'static;
    type Observer: AttributeObserver;

    fn schema(&self) -> &Schema;

    /// Whether `identifier` is registered, through any path.
    fn is_registered(&self, identifier: &str) -> bool;

    fn register(&self, identifier: &str, controller: Self::Controller);

    /// Create an observer for `attribute` reporting to `delegate`.
    ///
    /// The observer must not deliver notifications before `start()`.
    ///
    /// `delegate` keeps the engine state alive, including an `Arc` of this
    /// application. Store it in the returned observer only: an application
    /// holding it directly forms a reference cycle that is never freed.
    fn observe(
        &self,
        attribute: &str,
        delegate: Arc<dyn AttributeDelegate<Self::Element>>,
    ) -> Self::Observer;
}
