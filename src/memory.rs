//! An in-memory [`Host`] that records every mutation.
//!
//! Useful for tests and for rendering without a browser.
//! Portal selectors are resolved as `#id`, `.class` or a tag name, matched in document order against the elements reachable from the roots
//! made with [`MemoryHost::create_root`]. Detached and removed nodes are never found.

use crate::{
	error::{Error, Result},
	host::Host,
	vnode::{Listener, Value},
};
use core::{any::Any, fmt::Write as _};
use hashbrown::HashMap;
use tracing::{error, warn};

/// Handle to a node inside a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A recorded host operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
	CreateElement { node: NodeId, tag: String, svg: bool },
	CreateText { node: NodeId, text: String },
	SetText { node: NodeId, text: String },
	SetAttribute { node: NodeId, name: String, value: String },
	RemoveAttribute { node: NodeId, name: String },
	SetProperty { node: NodeId, name: String, value: Option<Value> },
	SetClass { node: NodeId, class: Option<String> },
	SetStyle { node: NodeId, style: Vec<(String, String)> },
	AddListener { node: NodeId, event: String },
	RemoveListener { node: NodeId, event: String },
	/// `moved` is set if `child` was attached elsewhere (or at another position) before.
	Insert { parent: NodeId, child: NodeId, before: Option<NodeId>, moved: bool },
	Remove { parent: NodeId, child: NodeId },
}

#[derive(Debug)]
enum Content {
	Element { tag: String, svg: bool },
	Text(String),
}

#[derive(Debug)]
struct NodeData {
	content: Content,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	attributes: Vec<(String, String)>,
	properties: HashMap<String, Value>,
	class: Option<String>,
	style: Vec<(String, String)>,
	listeners: Vec<(String, Listener)>,
}
impl NodeData {
	fn new(content: Content) -> Self {
		Self {
			content,
			parent: None,
			children: Vec::new(),
			attributes: Vec::new(),
			properties: HashMap::new(),
			class: None,
			style: Vec::new(),
			listeners: Vec::new(),
		}
	}
}

#[derive(Debug, Default)]
pub struct MemoryHost {
	nodes: Vec<NodeData>,
	roots: Vec<NodeId>,
	log: Vec<Mutation>,
}
impl MemoryHost {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a detached element to render into, without recording it.
	pub fn create_root(&mut self, tag: &str) -> NodeId {
		let root = self.push(Content::Element { tag: tag.to_owned(), svg: false });
		self.roots.push(root);
		root
	}

	/// Attaches `child` to the end of `parent` without recording it, e.g. to set up portal targets.
	pub fn append_unrecorded(&mut self, parent: NodeId, child: NodeId) {
		self.detach(child);
		self.nodes[parent.0].children.push(child);
		self.nodes[child.0].parent = Some(parent);
	}

	/// Sets an attribute without recording it.
	pub fn set_attribute_unrecorded(&mut self, node: NodeId, name: &str, value: &str) {
		Self::set_attribute_on(&mut self.nodes[node.0], name, value);
	}

	#[must_use]
	pub fn mutations(&self) -> &[Mutation] {
		&self.log
	}

	pub fn take_mutations(&mut self) -> Vec<Mutation> {
		std::mem::take(&mut self.log)
	}

	#[must_use]
	pub fn children(&self, node: NodeId) -> &[NodeId] {
		&self.nodes[node.0].children
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.nodes[node.0].parent
	}

	#[must_use]
	pub fn tag(&self, node: NodeId) -> Option<&str> {
		match &self.nodes[node.0].content {
			Content::Element { tag, .. } => Some(tag),
			Content::Text(_) => None,
		}
	}

	#[must_use]
	pub fn is_svg(&self, node: NodeId) -> bool {
		matches!(self.nodes[node.0].content, Content::Element { svg: true, .. })
	}

	#[must_use]
	pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
		self.nodes[node.0].attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
	}

	#[must_use]
	pub fn property(&self, node: NodeId, name: &str) -> Option<&Value> {
		self.nodes[node.0].properties.get(name)
	}

	#[must_use]
	pub fn class(&self, node: NodeId) -> Option<&str> {
		self.nodes[node.0].class.as_deref()
	}

	#[must_use]
	pub fn style(&self, node: NodeId) -> &[(String, String)] {
		&self.nodes[node.0].style
	}

	#[must_use]
	pub fn listener_count(&self, node: NodeId, event: &str) -> usize {
		self.nodes[node.0].listeners.iter().filter(|(e, _)| e == event).count()
	}

	/// Calls every listener bound to `event` on `node`, in binding order.
	pub fn dispatch(&self, node: NodeId, event: &str, payload: &dyn Any) {
		let listeners: Vec<Listener> = self.nodes[node.0].listeners.iter().filter(|(e, _)| e == event).map(|(_, l)| l.clone()).collect();
		for listener in listeners {
			listener.call(payload);
		}
	}

	/// The first element matching `selector`, see the [module documentation](`self`).
	#[must_use]
	pub fn find(&self, selector: &str) -> Option<NodeId> {
		let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
		while let Some(node) = stack.pop() {
			if self.matches(node, selector) {
				return Some(node);
			}
			stack.extend(self.nodes[node.0].children.iter().rev().copied());
		}
		None
	}

	/// Serializes the content of `node` (not including `node` itself) as markup.
	///
	/// Attributes are written in binding order, followed by `class` and `style`.
	#[must_use]
	pub fn inner_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		for &child in &self.nodes[node.0].children {
			self.write_html(child, &mut html);
		}
		html
	}

	fn write_html(&self, node: NodeId, html: &mut String) {
		let data = &self.nodes[node.0];
		match &data.content {
			Content::Text(text) => html.push_str(text),
			Content::Element { tag, .. } => {
				let _ = write!(html, "<{}", tag);
				for (name, value) in &data.attributes {
					let _ = write!(html, " {}=\"{}\"", name, value);
				}
				if let Some(class) = &data.class {
					let _ = write!(html, " class=\"{}\"", class);
				}
				if !data.style.is_empty() {
					html.push_str(" style=\"");
					for (name, value) in &data.style {
						let _ = write!(html, "{}: {};", name, value);
					}
					html.push('"');
				}
				html.push('>');
				for &child in &data.children {
					self.write_html(child, html);
				}
				let _ = write!(html, "</{}>", tag);
			}
		}
	}

	fn matches(&self, node: NodeId, selector: &str) -> bool {
		let data = &self.nodes[node.0];
		if let Content::Text(_) = data.content {
			return false;
		}
		if let Some(id) = selector.strip_prefix('#') {
			data.attributes.iter().any(|(n, v)| n == "id" && v == id)
		} else if let Some(class) = selector.strip_prefix('.') {
			data.class.as_deref().map_or(false, |c| c.split_ascii_whitespace().any(|c| c == class))
		} else {
			matches!(&data.content, Content::Element { tag, .. } if tag.eq_ignore_ascii_case(selector))
		}
	}

	fn push(&mut self, content: Content) -> NodeId {
		self.nodes.push(NodeData::new(content));
		NodeId(self.nodes.len() - 1)
	}

	fn detach(&mut self, node: NodeId) -> Option<NodeId> {
		let parent = self.nodes[node.0].parent.take()?;
		self.nodes[parent.0].children.retain(|&child| child != node);
		Some(parent)
	}

	fn set_attribute_on(data: &mut NodeData, name: &str, value: &str) {
		match data.attributes.iter_mut().find(|(n, _)| n == name) {
			Some((_, existing)) => value.clone_into(existing),
			None => data.attributes.push((name.to_owned(), value.to_owned())),
		}
	}
}

impl Host for MemoryHost {
	type Node = NodeId;

	fn create_element(&mut self, tag: &str, svg: bool) -> Result<NodeId> {
		if tag.is_empty() || tag.contains(|c: char| c.is_whitespace() || c == '<' || c == '>') {
			return Err(Error::Host(format!("invalid tag name {:?}", tag)));
		}
		let node = self.push(Content::Element { tag: tag.to_owned(), svg });
		self.log.push(Mutation::CreateElement { node, tag: tag.to_owned(), svg });
		Ok(node)
	}

	fn create_text(&mut self, text: &str) -> NodeId {
		let node = self.push(Content::Text(text.to_owned()));
		self.log.push(Mutation::CreateText { node, text: text.to_owned() });
		node
	}

	fn text(&self, node: &NodeId) -> Option<String> {
		match &self.nodes[node.0].content {
			Content::Text(text) => Some(text.clone()),
			Content::Element { .. } => None,
		}
	}

	fn set_text(&mut self, node: &NodeId, text: &str) {
		match &mut self.nodes[node.0].content {
			Content::Text(existing) => text.clone_into(existing),
			Content::Element { tag, .. } => return error!("Tried to set text on <{}>.", tag),
		}
		self.log.push(Mutation::SetText { node: *node, text: text.to_owned() });
	}

	fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) {
		Self::set_attribute_on(&mut self.nodes[element.0], name, value);
		self.log.push(Mutation::SetAttribute {
			node: *element,
			name: name.to_owned(),
			value: value.to_owned(),
		});
	}

	fn remove_attribute(&mut self, element: &NodeId, name: &str) {
		self.nodes[element.0].attributes.retain(|(n, _)| n != name);
		self.log.push(Mutation::RemoveAttribute { node: *element, name: name.to_owned() });
	}

	fn set_property(&mut self, element: &NodeId, name: &str, value: Option<&Value>) {
		let properties = &mut self.nodes[element.0].properties;
		match value {
			Some(value) => {
				properties.insert(name.to_owned(), value.clone());
			}
			None => {
				properties.remove(name);
			}
		}
		self.log.push(Mutation::SetProperty {
			node: *element,
			name: name.to_owned(),
			value: value.cloned(),
		});
	}

	fn set_class(&mut self, element: &NodeId, class: Option<&str>) {
		self.nodes[element.0].class = class.map(ToOwned::to_owned);
		self.log.push(Mutation::SetClass {
			node: *element,
			class: class.map(ToOwned::to_owned),
		});
	}

	fn set_style(&mut self, element: &NodeId, style: &[(String, String)]) {
		self.nodes[element.0].style = style.to_vec();
		self.log.push(Mutation::SetStyle { node: *element, style: style.to_vec() });
	}

	fn add_event_listener(&mut self, element: &NodeId, event: &str, listener: &Listener) {
		self.nodes[element.0].listeners.push((event.to_owned(), listener.clone()));
		self.log.push(Mutation::AddListener { node: *element, event: event.to_owned() });
	}

	fn remove_event_listener(&mut self, element: &NodeId, event: &str, listener: &Listener) {
		let listeners = &mut self.nodes[element.0].listeners;
		match listeners.iter().position(|(e, l)| e == event && l == listener) {
			Some(index) => {
				listeners.remove(index);
			}
			None => warn!("Tried to remove {:?} listener {:?} that isn't bound.", event, listener),
		}
		self.log.push(Mutation::RemoveListener { node: *element, event: event.to_owned() });
	}

	fn insert_before(&mut self, parent: &NodeId, child: &NodeId, reference: Option<&NodeId>) {
		if reference == Some(child) {
			// Already in place.
			self.log.push(Mutation::Insert {
				parent: *parent,
				child: *child,
				before: reference.copied(),
				moved: false,
			});
			return;
		}
		let moved = self.detach(*child).is_some();
		let children = &mut self.nodes[parent.0].children;
		let index = match reference {
			None => children.len(),
			Some(reference) => match children.iter().position(|c| c == reference) {
				Some(index) => index,
				None => {
					error!("Reference node {:?} is not a child of {:?}. Appending instead.", reference, parent);
					children.len()
				}
			},
		};
		children.insert(index, *child);
		self.nodes[child.0].parent = Some(*parent);
		self.log.push(Mutation::Insert {
			parent: *parent,
			child: *child,
			before: reference.copied(),
			moved,
		});
	}

	fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
		if self.nodes[child.0].parent != Some(*parent) {
			return error!("{:?} is not a child of {:?}.", child, parent);
		}
		self.detach(*child);
		self.log.push(Mutation::Remove { parent: *parent, child: *child });
	}

	fn parent_node(&self, node: &NodeId) -> Option<NodeId> {
		self.nodes[node.0].parent
	}

	fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
		let parent = self.nodes[node.0].parent?;
		let siblings = &self.nodes[parent.0].children;
		let index = siblings.iter().position(|c| c == node)?;
		siblings.get(index + 1).copied()
	}

	fn query_selector(&self, selector: &str) -> Option<NodeId> {
		self.find(selector)
	}
}
