use crate::{
	bind,
	component::Record,
	error::{Error, Result},
	host::Host,
	vnode::{Children, ComponentId, PortalTarget, Tag, VNode},
};
use core::fmt::{self, Debug, Formatter};
use hashbrown::HashMap;
use tracing::{error, instrument, level_filters::STATIC_MAX_LEVEL, trace, trace_span, warn, Level};

/// Drives a [`Host`] to match [`VNode`] trees.
///
/// The renderer retains the last tree rendered into each container, as well as the instance records of all mounted components.
///
/// # Correct Use
///
/// All calls that mutate a given container's tree ([`render`](`Renderer::render`) and [`update`](`Renderer::update`)) must be serialized.
/// Host nodes managed by the renderer shouldn't be moved or removed by other code.
pub struct Renderer<H: Host> {
	pub(crate) host: H,
	roots: Vec<(H::Node, VNode<H>)>,
	pub(crate) components: HashMap<ComponentId, Record<H>>,
	pub(crate) next_component_id: u64,
}
impl<H: Host> Renderer<H> {
	#[must_use]
	pub fn new(host: H) -> Self {
		Self {
			host,
			roots: Vec::new(),
			components: HashMap::new(),
			next_component_id: 0,
		}
	}

	#[must_use]
	pub fn host(&self) -> &H {
		&self.host
	}

	/// Direct host access. Nodes managed by the renderer must not be restructured through it.
	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	#[must_use]
	pub fn into_host(self) -> H {
		self.host
	}

	/// The tree last rendered into `container`.
	#[must_use]
	pub fn tree(&self, container: &H::Node) -> Option<&VNode<H>> {
		self.roots.iter().find(|(c, _)| c == container).map(|(_, tree)| tree)
	}

	/// Renders `vnode` into `container`.
	///
	/// The first call mounts, later calls patch against the retained tree. `None` unmounts whatever was rendered before.
	///
	/// # Errors
	///
	/// Portal targets that can't be resolved, host element creation failures and errors from component renders.
	/// The host tree may be partially updated in that case.
	#[instrument(skip(self, vnode))]
	pub fn render(&mut self, vnode: Option<VNode<H>>, container: &H::Node) -> Result<()> {
		let previous = self.roots.iter().position(|(c, _)| c == container).map(|i| self.roots.swap_remove(i).1);
		match (previous, vnode) {
			(None, None) => trace!("Nothing rendered before, nothing to render."),
			(None, Some(mut next)) => {
				let span = trace_span!("Initial render");
				let _enter = span.enter();
				let result = self.mount(&mut next, container, false, None);
				self.roots.push((container.clone(), next));
				result?;
			}
			(Some(mut prev), Some(mut next)) => {
				let span = trace_span!("Rerender");
				let _enter = span.enter();
				let result = self.patch(&mut prev, &mut next, container, false);
				self.roots.push((container.clone(), next));
				result?;
			}
			(Some(mut prev), None) => {
				let span = trace_span!("Unmounting root");
				let _enter = span.enter();
				self.unmount(&mut prev, Some(container));
			}
		}
		Ok(())
	}

	/// Reconciles `prev`, which is mounted into `container`, with `next`.
	///
	/// `next`'s host bookkeeping is stamped from `prev` where nodes are reused.
	pub(crate) fn patch(&mut self, prev: &mut VNode<H>, next: &mut VNode<H>, container: &H::Node, svg: bool) -> Result<()> {
		if prev.kind() != next.kind() {
			let span = trace_span!("Replacing mismatching kind", prev = ?prev.kind(), next = ?next.kind());
			let _enter = span.enter();
			return self.replace(prev, next, container, svg);
		}

		match (&prev.tag, &next.tag) {
			(Tag::Html(n_1), Tag::Html(n_2)) | (Tag::Svg(n_1), Tag::Svg(n_2)) => {
				if n_1 != n_2 {
					let span = trace_span!("Replacing element with different tag", n_1 = n_1.as_str(), n_2 = n_2.as_str());
					let _enter = span.enter();
					if STATIC_MAX_LEVEL >= Level::WARN && n_1.eq_ignore_ascii_case(n_2) {
						warn!("Recreating element due to different tag name casing: {:?} -> {:?}", n_1, n_2);
					}
					return self.replace(prev, next, container, svg);
				}
				let span = trace_span!("Patching element", tag = n_2.as_str());
				let _enter = span.enter();
				self.patch_element(prev, next, container, svg)
			}

			(Tag::Text(t_1), Tag::Text(t_2)) => {
				let span = trace_span!("Patching text node", t_1 = crate::redact(t_1), t_2 = crate::redact(t_2));
				let _enter = span.enter();
				let node = match prev.host.clone() {
					Some(node) => node,
					None => {
						error!("Previous text node was never mounted. Mounting the next one instead.");
						return self.mount(next, container, svg, None);
					}
				};
				if STATIC_MAX_LEVEL >= Level::WARN {
					if let Some(actual) = self.host.text(&node) {
						if actual != *t_1 {
							warn!("Unexpected text data: Expected {:?} but found {:?}. Overwriting.", crate::redact(t_1), crate::redact(&actual));
							self.host.set_text(&node, t_2);
							next.host = Some(node);
							return Ok(());
						}
					}
				}
				if t_1 != t_2 {
					self.host.set_text(&node, t_2);
				}
				next.host = Some(node);
				Ok(())
			}

			(Tag::Fragment, Tag::Fragment) => {
				let span = trace_span!("Patching fragment", prev = ?prev.child_arity(), next = ?next.child_arity());
				let _enter = span.enter();
				self.patch_fragment(prev, next, container, svg)
			}

			(Tag::Portal(_), Tag::Portal(_)) => {
				let span = trace_span!("Patching portal");
				let _enter = span.enter();
				self.patch_portal(prev, next, container, svg)
			}

			(Tag::Stateful(d_1), Tag::Stateful(d_2)) => {
				if d_1 != d_2 {
					let span = trace_span!("Replacing component with different definition", d_1 = d_1.name(), d_2 = d_2.name());
					let _enter = span.enter();
					return self.replace(prev, next, container, svg);
				}
				let span = trace_span!("Patching stateful component", name = d_2.name());
				let _enter = span.enter();
				let id = match prev.component.take() {
					Some(id) => id,
					None => {
						error!("Previous stateful component was never mounted. Mounting the next one instead.");
						return self.mount(next, container, svg, None);
					}
				};
				next.component = Some(id);
				match self.components.get_mut(&id) {
					Some(record) => record.set_input(next.props.component_input()),
					None => return Err(Error::UnknownComponent(id)),
				}
				self.update_component(id, None)?;
				next.host = self.first_host(next);
				Ok(())
			}

			(Tag::Functional(_), Tag::Functional(def)) => {
				let span = trace_span!("Patching functional component", name = def.name());
				let _enter = span.enter();
				let id = match prev.component.take() {
					Some(id) => id,
					None => {
						error!("Previous functional component was never mounted. Mounting the next one instead.");
						return self.mount(next, container, svg, None);
					}
				};
				next.component = Some(id);
				self.retarget_functional(id, def.clone(), next.props.component_input(), container, svg)?;
				self.update_component(id, None)?;
				next.host = self.first_host(next);
				Ok(())
			}

			_ => unreachable!("Kinds were compared above."),
		}
	}

	fn patch_element(&mut self, prev: &mut VNode<H>, next: &mut VNode<H>, container: &H::Node, svg: bool) -> Result<()> {
		let element = match prev.host.clone() {
			Some(element) => element,
			None => {
				error!("Previous element was never mounted. Mounting the next one instead.");
				return self.mount(next, container, svg, None);
			}
		};
		bind::patch_props(&mut self.host, &element, &prev.props, &next.props);
		next.host = Some(element.clone());
		let svg = svg || matches!(next.tag, Tag::Svg(_));
		self.patch_children(&mut prev.children, &mut next.children, &element, svg, None)
	}

	fn patch_fragment(&mut self, prev: &mut VNode<H>, next: &mut VNode<H>, container: &H::Node, svg: bool) -> Result<()> {
		let anchor = self.last_host(prev).and_then(|node| self.host.next_sibling(&node));
		match (&mut prev.children, &mut next.children) {
			(Children::None, Children::None) => {
				next.host = prev.host.clone();
				Ok(())
			}
			(Children::None, next_children) => {
				let placeholder = prev.host.clone();
				let before = placeholder.as_ref().or(anchor.as_ref());
				let result = next_children.as_mut_slice().iter_mut().try_for_each(|child| self.mount(child, container, svg, before));
				if let Some(placeholder) = &placeholder {
					trace!("Removing fragment placeholder.");
					self.host.remove_child(container, placeholder);
				}
				next.host = self.first_host(next);
				result
			}
			(prev_children, Children::None) => {
				for child in prev_children.as_mut_slice() {
					self.unmount(child, Some(container));
				}
				let placeholder = self.host.create_text("");
				self.host.insert_before(container, &placeholder, anchor.as_ref());
				next.host = Some(placeholder);
				Ok(())
			}
			(prev_children, next_children) => {
				self.patch_children(prev_children, next_children, container, svg, anchor.as_ref())?;
				next.host = self.first_host(next);
				Ok(())
			}
		}
	}

	fn patch_portal(&mut self, prev: &mut VNode<H>, next: &mut VNode<H>, container: &H::Node, svg: bool) -> Result<()> {
		let placeholder = match prev.host.clone() {
			Some(placeholder) => placeholder,
			None => {
				error!("Previous portal was never mounted. Mounting the next one instead.");
				return self.mount(next, container, svg, None);
			}
		};
		next.host = Some(placeholder);

		let next_container = match &next.tag {
			Tag::Portal(target) => self.resolve_portal_target(target),
			_ => unreachable!(),
		};
		let next_container = match next_container {
			Ok(next_container) => next_container,
			Err(error) => {
				// The children have nowhere to go, so they are dropped. The placeholder stays.
				if let Some(prev_container) = prev.portal_container.take() {
					for child in prev.children.as_mut_slice() {
						self.unmount(child, Some(&prev_container));
					}
				}
				return Err(error);
			}
		};

		let result = match prev.portal_container.clone() {
			Some(prev_container) => {
				let result = self.patch_children(&mut prev.children, &mut next.children, &prev_container, false, None);
				if next_container != prev_container {
					let span = trace_span!("Moving portal children to new target");
					let _enter = span.enter();
					let mut nodes = Vec::new();
					for child in next.children.as_slice() {
						self.collect_host_nodes(child, &mut nodes);
					}
					for node in &nodes {
						self.host.insert_before(&next_container, node, None);
					}
				}
				result
			}
			None => {
				trace!("Previous portal children were dropped. Mounting afresh.");
				next.children.as_mut_slice().iter_mut().try_for_each(|child| self.mount(child, &next_container, false, None))
			}
		};
		next.portal_container = Some(next_container);
		result
	}

	pub(crate) fn resolve_portal_target(&self, target: &PortalTarget<H::Node>) -> Result<H::Node> {
		match target {
			PortalTarget::Node(node) => Ok(node.clone()),
			PortalTarget::Selector(selector) => self.host.query_selector(selector).ok_or_else(|| {
				error!("Portal target {:?} could not be resolved.", selector);
				Error::MissingPortalTarget(selector.clone())
			}),
		}
	}

	/// Unmounts `prev` and mounts `next` at its position.
	fn replace(&mut self, prev: &mut VNode<H>, next: &mut VNode<H>, container: &H::Node, svg: bool) -> Result<()> {
		let anchor = self.last_host(prev).and_then(|node| self.host.next_sibling(&node));
		self.unmount(prev, Some(container));
		self.mount(next, container, svg, anchor.as_ref())
	}

	/// Releases `vnode`'s components and portals and, if `container` is given, removes its top-level host nodes from it.
	///
	/// Descendants of a removed element are passed `None`, since they leave the host tree together with it.
	pub(crate) fn unmount(&mut self, vnode: &mut VNode<H>, container: Option<&H::Node>) {
		let remove_own = |renderer: &mut Self, vnode: &VNode<H>| {
			if let (Some(container), Some(node)) = (container, vnode.host.as_ref()) {
				renderer.host.remove_child(container, node);
			}
		};

		match vnode.tag {
			Tag::Html(_) | Tag::Svg(_) => {
				let span = trace_span!("Removing element", tag = vnode.tag_name());
				let _enter = span.enter();
				for child in vnode.children.as_mut_slice() {
					self.unmount(child, None);
				}
				remove_own(self, vnode);
			}

			Tag::Text(ref text) => {
				let span = trace_span!("Removing text node", text = crate::redact(text));
				let _enter = span.enter();
				remove_own(self, vnode);
			}

			Tag::Fragment => {
				let span = trace_span!("Removing fragment", arity = ?vnode.child_arity());
				let _enter = span.enter();
				if let Children::None = vnode.children {
					remove_own(self, vnode);
				} else {
					for child in vnode.children.as_mut_slice() {
						self.unmount(child, container);
					}
				}
			}

			Tag::Portal(_) => {
				let span = trace_span!("Removing portal");
				let _enter = span.enter();
				match vnode.portal_container.clone() {
					Some(target) => {
						for child in vnode.children.as_mut_slice() {
							self.unmount(child, Some(&target));
						}
					}
					None => warn!("Removing portal that was never mounted."),
				}
				remove_own(self, vnode);
			}

			Tag::Stateful(_) | Tag::Functional(_) => {
				let span = trace_span!("Removing component", id = ?vnode.component);
				let _enter = span.enter();
				match vnode.component.take().and_then(|id| self.release_component(id)) {
					Some(mut output) => self.unmount(&mut output, container),
					None => warn!("Removing component without output."),
				}
			}
		}
	}

	/// Appends the host nodes `vnode` occupies in its container, in order.
	pub(crate) fn collect_host_nodes(&self, vnode: &VNode<H>, nodes: &mut Vec<H::Node>) {
		match &vnode.tag {
			Tag::Html(_) | Tag::Svg(_) | Tag::Text(_) | Tag::Portal(_) => nodes.extend(vnode.host.iter().cloned()),
			Tag::Fragment => {
				if let Children::None = vnode.children {
					nodes.extend(vnode.host.iter().cloned());
				} else {
					for child in vnode.children.as_slice() {
						self.collect_host_nodes(child, nodes);
					}
				}
			}
			Tag::Stateful(_) | Tag::Functional(_) => {
				// Read through the record, since the component may have re-rendered since `vnode.host` was stamped.
				if let Some(output) = vnode.component.and_then(|id| self.components.get(&id)).and_then(Record::output) {
					self.collect_host_nodes(output, nodes);
				}
			}
		}
	}

	pub(crate) fn first_host(&self, vnode: &VNode<H>) -> Option<H::Node> {
		let mut nodes = Vec::new();
		self.collect_host_nodes(vnode, &mut nodes);
		nodes.into_iter().next()
	}

	pub(crate) fn last_host(&self, vnode: &VNode<H>) -> Option<H::Node> {
		let mut nodes = Vec::new();
		self.collect_host_nodes(vnode, &mut nodes);
		nodes.pop()
	}
}
impl<H: Host> Debug for Renderer<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Renderer")
			.field("roots", &self.roots.iter().map(|(container, _)| container).collect::<Vec<_>>())
			.field("components", &self.components.len())
			.finish()
	}
}
