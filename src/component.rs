//! Stateful and functional components, and the runtime that re-renders them.
//!
//! Each mounted component owns an instance record inside the [`Renderer`], addressed by its [`ComponentId`].
//! A component re-renders by diffing its previous output against its new output through the regular patch machinery,
//! without touching anything outside its own subtree.

use crate::{
	diff::Renderer,
	error::{Error, Result},
	host::Host,
	vnode::{ComponentId, Props, VNode},
};
use core::{
	any::{type_name, Any, TypeId},
	fmt::{self, Debug, Formatter},
};
use std::rc::Rc;
use tracing::{instrument, trace, trace_span, warn};

/// A component with its own state.
///
/// # Example
///
/// ```
/// use vnode_reconciler::{h, memory::MemoryHost, Component, Props, Result, VNode};
///
/// #[derive(Default)]
/// struct Counter {
/// 	count: u32,
/// }
///
/// impl Component<MemoryHost> for Counter {
/// 	fn render(&self, _input: &Props) -> Result<VNode<MemoryHost>> {
/// 		h("span", Props::new(), self.count.to_string())
/// 	}
/// }
/// ```
pub trait Component<H: Host>: 'static {
	/// Produces this component's output for its current state and `input`.
	///
	/// # Errors
	///
	/// Builder errors are forwarded to whoever triggered the render.
	fn render(&self, input: &Props) -> Result<VNode<H>>;

	/// Called once after the first output was mounted.
	#[allow(unused_variables)]
	fn mounted(&mut self, id: ComponentId) {}

	/// Called before the component's host nodes are removed.
	fn unmounted(&mut self) {}

	fn name() -> &'static str
	where
		Self: Sized,
	{
		type_name::<Self>()
	}
}

/// Object-safe [`Component`] with downcasting, blanket-implemented.
pub(crate) trait AnyComponent<H: Host>: Component<H> {
	fn as_any_mut(&mut self) -> &mut dyn Any;
}
impl<H: Host, C: Component<H>> AnyComponent<H> for C {
	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}

/// The definition of a stateful component, i.e. its type.
pub struct StatefulDef<H: Host> {
	type_id: TypeId,
	name: &'static str,
	create: fn() -> Box<dyn AnyComponent<H>>,
}
impl<H: Host> StatefulDef<H> {
	#[must_use]
	pub fn of<C: Component<H> + Default>() -> Self {
		fn create<H: Host, C: Component<H> + Default>() -> Box<dyn AnyComponent<H>> {
			Box::new(C::default())
		}

		Self {
			type_id: TypeId::of::<C>(),
			name: C::name(),
			create: create::<H, C>,
		}
	}

	#[must_use]
	pub fn name(&self) -> &'static str {
		self.name
	}
}
impl<H: Host> Clone for StatefulDef<H> {
	fn clone(&self) -> Self {
		Self {
			type_id: self.type_id,
			name: self.name,
			create: self.create,
		}
	}
}
impl<H: Host> PartialEq for StatefulDef<H> {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}
impl<H: Host> Debug for StatefulDef<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("StatefulDef").field(&self.name).finish()
	}
}

type RenderFn<H> = dyn Fn(&Props) -> Result<VNode<H>>;

/// A render function used as a component.
pub struct FunctionalDef<H: Host> {
	name: &'static str,
	render: Rc<RenderFn<H>>,
}
impl<H: Host> FunctionalDef<H> {
	pub fn new(name: &'static str, render: impl 'static + Fn(&Props) -> Result<VNode<H>>) -> Self {
		Self { name, render: Rc::new(render) }
	}

	#[must_use]
	pub fn name(&self) -> &'static str {
		self.name
	}
}
impl<H: Host> Clone for FunctionalDef<H> {
	fn clone(&self) -> Self {
		Self {
			name: self.name,
			render: Rc::clone(&self.render),
		}
	}
}
impl<H: Host> Debug for FunctionalDef<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("FunctionalDef").field(&self.name).finish()
	}
}

pub(crate) struct StatefulRecord<H: Host> {
	instance: Box<dyn AnyComponent<H>>,
	input: Props,
	mounted: bool,
	rendered: Option<VNode<H>>,
	/// Where the first output is mounted. Later renders patch into the output's current parent instead.
	container: H::Node,
	svg: bool,
}

pub(crate) struct FunctionalRecord<H: Host> {
	def: FunctionalDef<H>,
	input: Props,
	prev: Option<VNode<H>>,
	container: H::Node,
	svg: bool,
}

pub(crate) enum Record<H: Host> {
	Stateful(StatefulRecord<H>),
	Functional(FunctionalRecord<H>),
}
impl<H: Host> Record<H> {
	pub(crate) fn stateful(def: &StatefulDef<H>, input: Props, container: H::Node, svg: bool) -> Self {
		Record::Stateful(StatefulRecord {
			instance: (def.create)(),
			input,
			mounted: false,
			rendered: None,
			container,
			svg,
		})
	}

	pub(crate) fn functional(def: FunctionalDef<H>, input: Props, container: H::Node, svg: bool) -> Self {
		Record::Functional(FunctionalRecord {
			def,
			input,
			prev: None,
			container,
			svg,
		})
	}

	/// The component's current output.
	pub(crate) fn output(&self) -> Option<&VNode<H>> {
		match self {
			Record::Stateful(record) => record.rendered.as_ref(),
			Record::Functional(record) => record.prev.as_ref(),
		}
	}

	pub(crate) fn set_input(&mut self, input: Props) {
		match self {
			Record::Stateful(record) => record.input = input,
			Record::Functional(record) => record.input = input,
		}
	}
}

impl<H: Host> Renderer<H> {
	pub(crate) fn insert_record(&mut self, record: Record<H>) -> ComponentId {
		let id = ComponentId(self.next_component_id);
		self.next_component_id += 1;
		self.components.insert(id, record);
		id
	}

	/// Re-renders a mounted component and patches its host nodes to match.
	///
	/// This only touches the component's own subtree.
	///
	/// # Errors
	///
	/// [`Error::UnknownComponent`] if `id` isn't mounted (anymore), otherwise whatever rendering the component produced.
	pub fn update(&mut self, id: ComponentId) -> Result<()> {
		self.update_component(id, None)
	}

	/// Gives access to a stateful component's instance, e.g. to change its state before an [`update`](`Renderer::update`).
	pub fn component_mut<C: Component<H>>(&mut self, id: ComponentId) -> Option<&mut C> {
		match self.components.get_mut(&id)? {
			Record::Stateful(record) => record.instance.as_any_mut().downcast_mut(),
			Record::Functional(_) => None,
		}
	}

	/// Number of live component instance records.
	#[must_use]
	pub fn component_count(&self) -> usize {
		self.components.len()
	}

	/// Renders a component, mounting before `before` if this is its first render.
	#[instrument(skip(self, before))]
	pub(crate) fn update_component(&mut self, id: ComponentId, before: Option<&H::Node>) -> Result<()> {
		let mut record = self.components.remove(&id).ok_or(Error::UnknownComponent(id))?;
		let result = match &mut record {
			Record::Stateful(record) => self.update_stateful(id, record, before),
			Record::Functional(record) => self.update_functional(record, before),
		};
		self.components.insert(id, record);
		result
	}

	fn update_stateful(&mut self, id: ComponentId, record: &mut StatefulRecord<H>, before: Option<&H::Node>) -> Result<()> {
		let mut next = record.instance.render(&record.input)?;
		if !record.mounted {
			let span = trace_span!("Mounting stateful component", ?id);
			let _enter = span.enter();
			let container = record.container.clone();
			let result = self.mount(&mut next, &container, record.svg, before);
			record.rendered = Some(next);
			result?;
			record.mounted = true;
			record.instance.mounted(id);
		} else {
			let span = trace_span!("Patching stateful component", ?id);
			let _enter = span.enter();
			let mut prev = match record.rendered.take() {
				Some(prev) => prev,
				None => {
					warn!("Mounted component {:?} has no output. Mounting afresh.", id);
					let container = record.container.clone();
					let result = self.mount(&mut next, &container, record.svg, before);
					record.rendered = Some(next);
					return result;
				}
			};
			let container = match self.first_host(&prev).and_then(|node| self.host.parent_node(&node)) {
				Some(parent) => parent,
				None => {
					trace!("Output of {:?} is detached. Falling back to the original container.", id);
					record.container.clone()
				}
			};
			let result = self.patch(&mut prev, &mut next, &container, record.svg);
			record.rendered = Some(next);
			result?;
		}
		Ok(())
	}

	fn update_functional(&mut self, record: &mut FunctionalRecord<H>, before: Option<&H::Node>) -> Result<()> {
		let span = trace_span!("Rendering functional component", name = record.def.name);
		let _enter = span.enter();
		let mut next = (record.def.render)(&record.input)?;
		let result = match record.prev.take() {
			None => {
				let container = record.container.clone();
				self.mount(&mut next, &container, record.svg, before)
			}
			Some(mut prev) => {
				// A portal may have moved the output since the record was last retargeted.
				let container = match self.first_host(&prev).and_then(|node| self.host.parent_node(&node)) {
					Some(parent) => parent,
					None => record.container.clone(),
				};
				self.patch(&mut prev, &mut next, &container, record.svg)
			}
		};
		record.prev = Some(next);
		result
	}

	/// Carries a functional component's record forward to its next [`VNode`].
	pub(crate) fn retarget_functional(&mut self, id: ComponentId, def: FunctionalDef<H>, input: Props, container: &H::Node, svg: bool) -> Result<()> {
		match self.components.get_mut(&id) {
			Some(Record::Functional(record)) => {
				record.def = def;
				record.input = input;
				record.container = container.clone();
				record.svg = svg;
				Ok(())
			}
			_ => Err(Error::UnknownComponent(id)),
		}
	}

	/// Removes a component's record, calling [`Component::unmounted`] for stateful ones, and returns its output.
	pub(crate) fn release_component(&mut self, id: ComponentId) -> Option<VNode<H>> {
		match self.components.remove(&id)? {
			Record::Stateful(mut record) => {
				let span = trace_span!("Unmounting stateful component", ?id);
				let _enter = span.enter();
				if record.mounted {
					record.instance.unmounted();
				}
				record.rendered
			}
			Record::Functional(record) => record.prev,
		}
	}
}
