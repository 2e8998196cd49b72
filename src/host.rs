//! The host operations the reconciler is driven through.

use crate::{
	error::Result,
	vnode::{Listener, Value},
};
use core::fmt::Debug;

/// A rendering surface, e.g. a browser document or an in-memory tree.
///
/// Apart from element creation, host operations are infallible from the reconciler's point of view:
/// Implementations should log failures and carry on, since a half-applied patch can't be rolled back either way.
pub trait Host: 'static {
	/// A handle to a host element or text node.
	///
	/// Equality must be identity.
	type Node: Clone + Debug + PartialEq;

	/// Creates a detached element, SVG-namespaced iff `svg`.
	///
	/// # Errors
	///
	/// Iff the host rejects the tag name.
	fn create_element(&mut self, tag: &str, svg: bool) -> Result<Self::Node>;

	/// Creates a detached text node.
	fn create_text(&mut self, text: &str) -> Self::Node;

	/// Reads a text node's payload.
	fn text(&self, node: &Self::Node) -> Option<String>;

	fn set_text(&mut self, node: &Self::Node, text: &str);

	fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str);

	fn remove_attribute(&mut self, element: &Self::Node, name: &str);

	/// Sets (or with `None`, clears) a live property, like `value` or `checked`.
	fn set_property(&mut self, element: &Self::Node, name: &str, value: Option<&Value>);

	/// Replaces the whole class list. `None` removes it.
	fn set_class(&mut self, element: &Self::Node, class: Option<&str>);

	/// Replaces the whole inline style.
	fn set_style(&mut self, element: &Self::Node, style: &[(String, String)]);

	fn add_event_listener(&mut self, element: &Self::Node, event: &str, listener: &Listener);

	fn remove_event_listener(&mut self, element: &Self::Node, event: &str, listener: &Listener);

	/// Inserts `child` into `parent` before `reference`, or appends it if there is no reference.
	///
	/// If `child` is already attached somewhere, it is moved.
	fn insert_before(&mut self, parent: &Self::Node, child: &Self::Node, reference: Option<&Self::Node>);

	fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node);

	fn parent_node(&self, node: &Self::Node) -> Option<Self::Node>;

	fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

	/// Resolves a portal target locator.
	fn query_selector(&self, selector: &str) -> Option<Self::Node>;
}
