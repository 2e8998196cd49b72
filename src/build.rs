//! The tree builder: classifies descriptors and children into correctly shaped [`VNode`]s.

use crate::{
	component::{FunctionalDef, StatefulDef},
	error::{Error, Result},
	host::Host,
	vnode::{Children, Key, PortalTarget, Props, Tag, VNode},
};
use hashbrown::HashSet;
use tracing::trace;

/// What kind of [`VNode`] to build.
pub enum Descriptor<H: Host> {
	/// A host element tag name. `"svg"` starts an SVG element.
	Tag(String),
	Fragment,
	Portal(PortalTarget<H::Node>),
	Stateful(StatefulDef<H>),
	Functional(FunctionalDef<H>),
}
impl<H: Host> Descriptor<H> {
	/// A portal into the element matching `selector`.
	pub fn portal(selector: impl Into<String>) -> Self {
		Descriptor::Portal(PortalTarget::Selector(selector.into()))
	}

	/// A portal into `node`.
	pub fn portal_into(node: H::Node) -> Self {
		Descriptor::Portal(PortalTarget::Node(node))
	}
}
impl<H: Host> From<&str> for Descriptor<H> {
	fn from(tag: &str) -> Self {
		Descriptor::Tag(tag.to_owned())
	}
}
impl<H: Host> From<String> for Descriptor<H> {
	fn from(tag: String) -> Self {
		Descriptor::Tag(tag)
	}
}
impl<H: Host> From<StatefulDef<H>> for Descriptor<H> {
	fn from(def: StatefulDef<H>) -> Self {
		Descriptor::Stateful(def)
	}
}
impl<H: Host> From<FunctionalDef<H>> for Descriptor<H> {
	fn from(def: FunctionalDef<H>) -> Self {
		Descriptor::Functional(def)
	}
}

/// Children as passed to the builder, before classification.
///
/// Scalars become a single text child.
pub enum Content<H: Host> {
	Empty,
	Text(String),
	Node(VNode<H>),
	List(Vec<VNode<H>>),
}
impl<H: Host> From<()> for Content<H> {
	fn from((): ()) -> Self {
		Content::Empty
	}
}
impl<H: Host> From<&str> for Content<H> {
	fn from(text: &str) -> Self {
		Content::Text(text.to_owned())
	}
}
impl<H: Host> From<String> for Content<H> {
	fn from(text: String) -> Self {
		Content::Text(text)
	}
}
impl<H: Host> From<VNode<H>> for Content<H> {
	fn from(node: VNode<H>) -> Self {
		Content::Node(node)
	}
}
impl<H: Host> From<Option<VNode<H>>> for Content<H> {
	fn from(node: Option<VNode<H>>) -> Self {
		node.map_or(Content::Empty, Content::Node)
	}
}
impl<H: Host> From<Vec<VNode<H>>> for Content<H> {
	fn from(nodes: Vec<VNode<H>>) -> Self {
		Content::List(nodes)
	}
}
impl<H: Host, const N: usize> From<[VNode<H>; N]> for Content<H> {
	fn from(nodes: [VNode<H>; N]) -> Self {
		Content::List(Vec::from(nodes))
	}
}
macro_rules! scalar_content {
	($($ty:ty),*$(,)?) => {$(
		impl<H: Host> From<$ty> for Content<H> {
			fn from(scalar: $ty) -> Self {
				Content::Text(scalar.to_string())
			}
		}
	)*};
}
scalar_content!(bool, char, i32, i64, u32, u64, usize, f64);

/// How keyed lists treat children without a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
	/// Assign `φ<index>`.
	///
	/// Positional keys travel with the index, not the child, so reordered children are patched into each other rather than moved.
	#[default]
	Positional,
	/// Missing keys are an [`Error::MissingKey`].
	Required,
}

/// Builds [`VNode`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builder {
	key_policy: KeyPolicy,
}
impl Builder {
	#[must_use]
	pub const fn new() -> Self {
		Self { key_policy: KeyPolicy::Positional }
	}

	#[must_use]
	pub const fn key_policy(mut self, key_policy: KeyPolicy) -> Self {
		self.key_policy = key_policy;
		self
	}

	/// Classifies `descriptor` and `children` into a [`VNode`].
	///
	/// # Errors
	///
	/// - [`Error::InvalidDescriptor`] for empty or malformed tag names and empty portal selectors,
	/// - [`Error::DuplicateKey`] if two entries of a list share a key,
	/// - [`Error::MissingKey`] for unkeyed list entries under [`KeyPolicy::Required`].
	pub fn build<H: Host>(&self, descriptor: impl Into<Descriptor<H>>, props: Props, children: impl Into<Content<H>>) -> Result<VNode<H>> {
		let tag = match descriptor.into() {
			Descriptor::Tag(name) => {
				validate_tag_name(&name)?;
				if name == "svg" {
					Tag::Svg(name)
				} else {
					Tag::Html(name)
				}
			}
			Descriptor::Fragment => Tag::Fragment,
			Descriptor::Portal(PortalTarget::Selector(selector)) => {
				if selector.trim().is_empty() {
					return Err(Error::InvalidDescriptor("empty portal selector".to_owned()));
				}
				Tag::Portal(PortalTarget::Selector(selector))
			}
			Descriptor::Portal(target) => Tag::Portal(target),
			Descriptor::Stateful(def) => Tag::Stateful(def),
			Descriptor::Functional(def) => Tag::Functional(def),
		};

		let children = match children.into() {
			Content::Empty => Children::None,
			Content::Text(text) => Children::Single(Box::new(VNode::text(text))),
			Content::Node(node) => Children::Single(Box::new(node)),
			Content::List(mut nodes) => match nodes.len() {
				0 => Children::None,
				1 => Children::Single(Box::new(nodes.remove(0))),
				_ => Children::Keyed(self.assign_keys(nodes)?),
			},
		};

		Ok(VNode::new(tag, props, children))
	}

	fn assign_keys<H: Host>(&self, mut nodes: Vec<VNode<H>>) -> Result<Vec<VNode<H>>> {
		let mut seen = HashSet::with_capacity(nodes.len());
		for (index, node) in nodes.iter_mut().enumerate() {
			let key = match (&node.key, self.key_policy) {
				(Some(key), _) => key.clone(),
				(None, KeyPolicy::Positional) => {
					let key = Key::positional(index);
					trace!("Assigning positional key {}.", key);
					node.key = Some(key.clone());
					key
				}
				(None, KeyPolicy::Required) => return Err(Error::MissingKey { index }),
			};
			if !seen.insert(key.clone()) {
				return Err(Error::DuplicateKey(key));
			}
		}
		Ok(nodes)
	}
}

fn validate_tag_name(name: &str) -> Result<()> {
	let mut chars = name.chars();
	match chars.next() {
		None => Err(Error::InvalidDescriptor("empty tag name".to_owned())),
		Some(first) if !first.is_ascii_alphabetic() => Err(Error::InvalidDescriptor(format!("tag name {:?} must start with an ASCII letter", name))),
		Some(_) => match chars.find(|&c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))) {
			Some(c) => Err(Error::InvalidDescriptor(format!("tag name {:?} contains {:?}", name, c))),
			None => Ok(()),
		},
	}
}

/// Builds a [`VNode`] with the default [`Builder`].
///
/// # Errors
///
/// See [`Builder::build`].
///
/// # Example
///
/// ```
/// use vnode_reconciler::{h, memory::MemoryHost, text, Props, VNode};
///
/// let first: VNode<MemoryHost> = h("li", Props::new(), "first")?.with_key("a");
/// let second: VNode<MemoryHost> = h("li", Props::new(), text::<MemoryHost>("second"))?.with_key("b");
/// let list: VNode<MemoryHost> = h("ul", Props::new().class("items"), vec![first, second])?;
/// assert_eq!(list.children().as_slice().len(), 2);
/// # Ok::<(), vnode_reconciler::Error>(())
/// ```
pub fn h<H: Host>(descriptor: impl Into<Descriptor<H>>, props: Props, children: impl Into<Content<H>>) -> Result<VNode<H>> {
	Builder::new().build(descriptor, props, children)
}

/// A text [`VNode`].
pub fn text<H: Host>(text: impl Into<String>) -> VNode<H> {
	VNode::text(text)
}
