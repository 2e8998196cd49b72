//! The VNode data model.
//!
//! A [`VNode`] describes one node of the desired output tree. Its [`Tag`] decides what kind of node it is
//! and is fixed at construction, as is the shape of its [`Children`].
//! The reconciler only ever stamps host bookkeeping onto a [`VNode`] (its host node, component record and resolved portal target).

use crate::{
	component::{FunctionalDef, StatefulDef},
	host::Host,
};
use core::{
	any::Any,
	fmt::{self, Debug, Display, Formatter},
	slice,
};
use std::{borrow::Cow, rc::Rc};

/// The concrete kind of a [`VNode`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VNodeKind {
	HostElementHtml,
	HostElementSvg,
	Text,
	Fragment,
	Portal,
	ComponentStateful,
	ComponentFunctional,
}
impl VNodeKind {
	#[must_use]
	pub fn is_element(self) -> bool {
		matches!(self, Self::HostElementHtml | Self::HostElementSvg)
	}

	#[must_use]
	pub fn is_component(self) -> bool {
		matches!(self, Self::ComponentStateful | Self::ComponentFunctional)
	}
}

/// How many children a [`VNode`] was constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildArity {
	None,
	Single,
	/// More than one child, each carrying a unique [`Key`].
	Keyed,
}

/// Identifies a child within a keyed child list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Cow<'static, str>);
impl Key {
	#[must_use]
	pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
		Self(key.into())
	}

	/// The key assigned to the `index`th entry of a keyed list that didn't specify one.
	#[must_use]
	pub fn positional(index: usize) -> Self {
		Self(format!("φ{}", index).into())
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for Key {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
impl From<&'static str> for Key {
	fn from(key: &'static str) -> Self {
		Self(Cow::Borrowed(key))
	}
}
impl From<String> for Key {
	fn from(key: String) -> Self {
		Self(Cow::Owned(key))
	}
}
impl From<usize> for Key {
	fn from(key: usize) -> Self {
		Self(Cow::Owned(key.to_string()))
	}
}

/// An event handler.
///
/// Two [`Listener`]s are equal only if they are clones of each other, so a handler has to be reused across renders
/// for the binder to leave it attached.
///
/// The event is passed as [`Any`] so that each [`Host`] can hand over its native event type.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&dyn Any)>);
impl Listener {
	pub fn new(handler: impl 'static + Fn(&dyn Any)) -> Self {
		Self(Rc::new(handler))
	}

	pub fn call(&self, event: &dyn Any) {
		(self.0)(event)
	}

	/// A stable identity for this handler, shared by all its clones.
	#[must_use]
	pub fn addr(&self) -> usize {
		Rc::as_ptr(&self.0).cast::<()>() as usize
	}
}
impl PartialEq for Listener {
	fn eq(&self, other: &Self) -> bool {
		self.addr() == other.addr()
	}
}
impl Debug for Listener {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Listener").field(&format_args!("{:#x}", self.addr())).finish()
	}
}

/// Inline style entries, in application order.
pub type Style = Vec<(String, String)>;

/// A single entry of a [`Props`] mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Str(String),
	Bool(bool),
	Number(f64),
	Style(Style),
	Listener(Listener),
	/// Input of a component, under the reserved `props` key.
	Props(Props),
}
impl Value {
	#[must_use]
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(str) => Some(str),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_bool(&self) -> Option<bool> {
		match *self {
			Value::Bool(bool) => Some(bool),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_number(&self) -> Option<f64> {
		match *self {
			Value::Number(number) => Some(number),
			_ => None,
		}
	}
}
/// The string attribute form of the value. Structured values have none and display as empty.
impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::Str(str) => f.write_str(str),
			Value::Bool(bool) => Display::fmt(bool, f),
			Value::Number(number) => Display::fmt(number, f),
			Value::Style(_) | Value::Listener(_) | Value::Props(_) => Ok(()),
		}
	}
}
impl From<&str> for Value {
	fn from(str: &str) -> Self {
		Value::Str(str.to_owned())
	}
}
impl From<String> for Value {
	fn from(str: String) -> Self {
		Value::Str(str)
	}
}
impl From<bool> for Value {
	fn from(bool: bool) -> Self {
		Value::Bool(bool)
	}
}
impl From<f64> for Value {
	fn from(number: f64) -> Self {
		Value::Number(number)
	}
}
impl From<i32> for Value {
	fn from(number: i32) -> Self {
		Value::Number(number.into())
	}
}
impl From<Listener> for Value {
	fn from(listener: Listener) -> Self {
		Value::Listener(listener)
	}
}
impl From<Props> for Value {
	fn from(props: Props) -> Self {
		Value::Props(props)
	}
}

/// An ordered mapping from attribute, event, style or input name to [`Value`].
///
/// Reserved keys: `style`, `class`, `props` and `on…` (event listeners).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(Vec<(String, Value)>);
impl Props {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces `key`, keeping its original position when replacing.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		let key = key.into();
		let value = value.into();
		match self.0.iter_mut().find(|(k, _)| *k == key) {
			Some((_, existing)) => *existing = value,
			None => self.0.push((key, value)),
		}
	}

	#[must_use]
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(key, value);
		self
	}

	#[must_use]
	pub fn class(self, class: impl Into<String>) -> Self {
		self.with("class", class.into())
	}

	#[must_use]
	pub fn style<K: Into<String>, V: Into<String>>(self, style: impl IntoIterator<Item = (K, V)>) -> Self {
		self.with("style", Value::Style(style.into_iter().map(|(k, v)| (k.into(), v.into())).collect()))
	}

	/// Binds `listener` to `event`, e.g. `"click"` (stored as `onclick`).
	#[must_use]
	pub fn on(self, event: &str, listener: Listener) -> Self {
		self.with(format!("on{}", event), listener)
	}

	/// Sets the input passed on to a component.
	#[must_use]
	pub fn input(self, props: Props) -> Self {
		self.with("props", props)
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	#[must_use]
	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	pub fn remove(&mut self, key: &str) -> Option<Value> {
		let index = self.0.iter().position(|(k, _)| k == key)?;
		Some(self.0.remove(index).1)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// The component input stored under `props`, or an empty mapping.
	#[must_use]
	pub fn component_input(&self) -> Props {
		match self.get("props") {
			Some(Value::Props(input)) => input.clone(),
			_ => Props::new(),
		}
	}
}
impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Props {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		let mut props = Props::new();
		for (k, v) in iter {
			props.insert(k, v);
		}
		props
	}
}

/// Where a portal mounts its children.
#[derive(Debug, Clone, PartialEq)]
pub enum PortalTarget<N> {
	/// Resolved through [`Host::query_selector`].
	Selector(String),
	Node(N),
}

/// Handle of a component instance record owned by a [`Renderer`](`crate::Renderer`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) u64);

/// The kind of a [`VNode`] together with its kind-specific payload.
pub enum Tag<H: Host> {
	Html(String),
	Svg(String),
	Text(String),
	Fragment,
	Portal(PortalTarget<H::Node>),
	Stateful(StatefulDef<H>),
	Functional(FunctionalDef<H>),
}
impl<H: Host> Tag<H> {
	#[must_use]
	pub fn kind(&self) -> VNodeKind {
		match self {
			Tag::Html(_) => VNodeKind::HostElementHtml,
			Tag::Svg(_) => VNodeKind::HostElementSvg,
			Tag::Text(_) => VNodeKind::Text,
			Tag::Fragment => VNodeKind::Fragment,
			Tag::Portal(_) => VNodeKind::Portal,
			Tag::Stateful(_) => VNodeKind::ComponentStateful,
			Tag::Functional(_) => VNodeKind::ComponentFunctional,
		}
	}
}
impl<H: Host> Debug for Tag<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Tag::Html(name) => f.debug_tuple("Html").field(name).finish(),
			Tag::Svg(name) => f.debug_tuple("Svg").field(name).finish(),
			Tag::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Tag::Fragment => f.write_str("Fragment"),
			Tag::Portal(target) => f.debug_tuple("Portal").field(target).finish(),
			Tag::Stateful(def) => f.debug_tuple("Stateful").field(def).finish(),
			Tag::Functional(def) => f.debug_tuple("Functional").field(def).finish(),
		}
	}
}

/// Children of a [`VNode`]. The variant is the node's [`ChildArity`].
pub enum Children<H: Host> {
	None,
	Single(Box<VNode<H>>),
	Keyed(Vec<VNode<H>>),
}
impl<H: Host> Children<H> {
	#[must_use]
	pub fn arity(&self) -> ChildArity {
		match self {
			Children::None => ChildArity::None,
			Children::Single(_) => ChildArity::Single,
			Children::Keyed(_) => ChildArity::Keyed,
		}
	}

	#[must_use]
	pub fn as_slice(&self) -> &[VNode<H>] {
		match self {
			Children::None => &[],
			Children::Single(child) => slice::from_ref(child),
			Children::Keyed(children) => children,
		}
	}

	pub fn as_mut_slice(&mut self) -> &mut [VNode<H>] {
		match self {
			Children::None => &mut [],
			Children::Single(child) => slice::from_mut(child),
			Children::Keyed(children) => children,
		}
	}
}
impl<H: Host> Debug for Children<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Children::None => f.write_str("None"),
			Children::Single(child) => f.debug_tuple("Single").field(child).finish(),
			Children::Keyed(children) => f.debug_tuple("Keyed").field(children).finish(),
		}
	}
}

/// One node of a desired output tree.
///
/// Usually created through [`h`](`crate::h`) or [`Builder`](`crate::Builder`).
/// A [`VNode`] is consumed by at most one mount or patch. Later renders compare a newly built tree against the retained one.
pub struct VNode<H: Host> {
	pub(crate) tag: Tag<H>,
	pub(crate) props: Props,
	pub(crate) children: Children<H>,
	pub(crate) key: Option<Key>,
	pub(crate) host: Option<H::Node>,
	pub(crate) component: Option<ComponentId>,
	pub(crate) portal_container: Option<H::Node>,
}
impl<H: Host> VNode<H> {
	pub(crate) fn new(tag: Tag<H>, props: Props, children: Children<H>) -> Self {
		Self {
			tag,
			props,
			children,
			key: None,
			host: None,
			component: None,
			portal_container: None,
		}
	}

	#[must_use]
	pub fn text(text: impl Into<String>) -> Self {
		Self::new(Tag::Text(text.into()), Props::new(), Children::None)
	}

	#[must_use]
	pub fn with_key(mut self, key: impl Into<Key>) -> Self {
		self.key = Some(key.into());
		self
	}

	#[must_use]
	pub fn kind(&self) -> VNodeKind {
		self.tag.kind()
	}

	#[must_use]
	pub fn tag(&self) -> &Tag<H> {
		&self.tag
	}

	/// The tag name of a host element.
	#[must_use]
	pub fn tag_name(&self) -> Option<&str> {
		match &self.tag {
			Tag::Html(name) | Tag::Svg(name) => Some(name),
			_ => None,
		}
	}

	/// The payload of a text node.
	#[must_use]
	pub fn text_content(&self) -> Option<&str> {
		match &self.tag {
			Tag::Text(text) => Some(text),
			_ => None,
		}
	}

	#[must_use]
	pub fn props(&self) -> &Props {
		&self.props
	}

	#[must_use]
	pub fn children(&self) -> &Children<H> {
		&self.children
	}

	#[must_use]
	pub fn child_arity(&self) -> ChildArity {
		self.children.arity()
	}

	#[must_use]
	pub fn key(&self) -> Option<&Key> {
		self.key.as_ref()
	}

	/// The host node this [`VNode`] currently represents. `None` before mount.
	///
	/// For fragments this is the first child's host node (or a placeholder), for portals the placeholder left in the logical parent.
	#[must_use]
	pub fn host(&self) -> Option<&H::Node> {
		self.host.as_ref()
	}

	/// The instance record of a mounted component.
	#[must_use]
	pub fn component(&self) -> Option<ComponentId> {
		self.component
	}
}
impl<H: Host> Debug for VNode<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("VNode")
			.field("tag", &self.tag)
			.field("props", &self.props)
			.field("children", &self.children)
			.field("key", &self.key)
			.field("host", &self.host)
			.field("component", &self.component)
			.finish()
	}
}
