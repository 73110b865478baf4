use crate::foundation::error::ConfettiResult;

/// Host presentation layer: element creation, tree edits and custom properties.
///
/// Methods take `&self`; node handles are references into a tree owned by the host,
/// the same way DOM handles are.
pub trait Stage {
    /// Handle to one element.
    type Node: Clone;

    /// Create a detached element.
    fn create_element(&self, tag: &str) -> ConfettiResult<Self::Node>;

    /// Append `child` as the last child of `parent`.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> ConfettiResult<()>;

    /// Remove every child of `node`.
    fn clear_children(&self, node: &Self::Node) -> ConfettiResult<()>;

    /// Add a class to the element's class list.
    fn add_class(&self, node: &Self::Node, class: &str) -> ConfettiResult<()>;

    /// Set one named style property on the element.
    fn set_property(&self, node: &Self::Node, name: &str, value: &str) -> ConfettiResult<()>;

    /// Whether the shared stylesheet is already present in this environment.
    fn has_stylesheet(&self) -> bool;

    /// Insert the shared stylesheet into this environment.
    fn install_stylesheet(&self, css: &str) -> ConfettiResult<()>;
}
