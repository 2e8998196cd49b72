use crate::{
	bind,
	component::Record,
	diff::Renderer,
	error::Result,
	host::Host,
	vnode::{Children, Tag, VNode},
};
use tracing::{instrument, trace, trace_span};

impl<H: Host> Renderer<H> {
	/// Materializes `vnode` into `container`, before `before` or at the end, and stamps its host bookkeeping.
	///
	/// Once `svg` is set, all descendant elements are created in the SVG namespace.
	#[instrument(skip(self, vnode, before))]
	pub(crate) fn mount(&mut self, vnode: &mut VNode<H>, container: &H::Node, svg: bool, before: Option<&H::Node>) -> Result<()> {
		match vnode.tag {
			Tag::Html(ref name) | Tag::Svg(ref name) => {
				let svg = svg || matches!(vnode.tag, Tag::Svg(_));
				let span = trace_span!("Mounting element", tag = name.as_str(), svg);
				let _enter = span.enter();

				let element = self.host.create_element(name, svg)?;
				bind::bind_all(&mut self.host, &element, &vnode.props);
				for child in vnode.children.as_mut_slice() {
					self.mount(child, &element, svg, None)?;
				}
				self.host.insert_before(container, &element, before);
				vnode.host = Some(element);
			}

			Tag::Text(ref text) => {
				let span = trace_span!("Mounting text node", text = crate::redact(text));
				let _enter = span.enter();
				let node = self.host.create_text(text);
				self.host.insert_before(container, &node, before);
				vnode.host = Some(node);
			}

			Tag::Fragment => {
				let span = trace_span!("Mounting fragment", arity = ?vnode.child_arity());
				let _enter = span.enter();
				if let Children::None = vnode.children {
					// Ancestors still need an anchor for this position.
					let placeholder = self.host.create_text("");
					self.host.insert_before(container, &placeholder, before);
					vnode.host = Some(placeholder);
				} else {
					for child in vnode.children.as_mut_slice() {
						self.mount(child, container, svg, before)?;
					}
					vnode.host = self.first_host(vnode);
				}
			}

			Tag::Portal(ref target) => {
				let span = trace_span!("Mounting portal", ?target);
				let _enter = span.enter();
				let target = self.resolve_portal_target(target)?;
				for child in vnode.children.as_mut_slice() {
					self.mount(child, &target, false, None)?;
				}
				trace!("Leaving placeholder in logical parent.");
				let placeholder = self.host.create_text("");
				self.host.insert_before(container, &placeholder, before);
				vnode.portal_container = Some(target);
				vnode.host = Some(placeholder);
			}

			Tag::Stateful(ref def) => {
				let span = trace_span!("Mounting stateful component", name = def.name());
				let _enter = span.enter();
				let record = Record::stateful(def, vnode.props.component_input(), container.clone(), svg);
				let id = self.insert_record(record);
				vnode.component = Some(id);
				self.update_component(id, before)?;
				vnode.host = self.first_host(vnode);
			}

			Tag::Functional(ref def) => {
				let span = trace_span!("Mounting functional component", name = def.name());
				let _enter = span.enter();
				let record = Record::functional(def.clone(), vnode.props.component_input(), container.clone(), svg);
				let id = self.insert_record(record);
				vnode.component = Some(id);
				self.update_component(id, before)?;
				vnode.host = self.first_host(vnode);
			}
		}
		Ok(())
	}
}
