use crate::{
	diff::Renderer,
	error::Result,
	host::Host,
	vnode::{Children, Key, VNode},
};
use hashbrown::{HashMap, HashSet};
use tracing::{instrument, trace, trace_span};

impl<H: Host> Renderer<H> {
	/// Reconciles the children of one parent.
	///
	/// Transitions that involve a keyed list on only one side remove everything and mount afresh.
	/// `anchor` is the host node following this child list in `container`, if any.
	#[instrument(skip(self, prev, next, anchor))]
	pub(crate) fn patch_children(&mut self, prev: &mut Children<H>, next: &mut Children<H>, container: &H::Node, svg: bool, anchor: Option<&H::Node>) -> Result<()> {
		match (prev, next) {
			(Children::None, Children::None) => Ok(()),

			(Children::Single(prev), Children::Single(next)) => self.patch(prev, next, container, svg),

			(Children::Keyed(prev), Children::Keyed(next)) => self.patch_keyed(prev, next, container, svg),

			(prev, next) => {
				let span = trace_span!("Replacing children", prev = ?prev.arity(), next = ?next.arity());
				let _enter = span.enter();
				for child in prev.as_mut_slice() {
					self.unmount(child, Some(container));
				}
				for child in next.as_mut_slice() {
					self.mount(child, container, svg, anchor)?;
				}
				Ok(())
			}
		}
	}

	/// Reuses previous children by key, moving host nodes that fell out of relative order.
	///
	/// Matched children are patched in place. A matched child whose previous index is lower than the highest previous index matched so far
	/// is moved behind its new predecessor. New children are mounted behind their new predecessor, or in front of the first previous child.
	/// Finally, previous children that weren't carried into `next` are removed.
	///
	/// The first failure stops the pass over `next`, but the removal still happens, so no host node is left without a [`VNode`] tracking it.
	fn patch_keyed(&mut self, prev: &mut [VNode<H>], next: &mut [VNode<H>], container: &H::Node, svg: bool) -> Result<()> {
		let span = trace_span!("Diffing keyed", "prev.len()" = prev.len(), "next.len()" = next.len());
		let _enter = span.enter();

		debug_assert_eq!(next.len(), next.iter().map(VNode::key).collect::<HashSet<_>>().len(), "Duplicate `VNode::key` encountered");

		let prev_indices: HashMap<Key, usize> = prev.iter().enumerate().filter_map(|(j, child)| Some((child.key.clone()?, j))).collect();
		let first_prev = prev.first().and_then(|child| self.first_host(child));

		let mut carried = vec![false; prev.len()];
		let mut result = Ok(());
		let mut last_index = 0;
		for i in 0..next.len() {
			let matched = next[i].key.as_ref().and_then(|key| prev_indices.get(key)).copied();
			match matched {
				Some(j) => {
					let span = trace_span!("Reusing keyed child", key = ?next[i].key, j, i);
					let _enter = span.enter();
					carried[j] = true;
					result = self.patch(&mut prev[j], &mut next[i], container, svg);
					if result.is_err() {
						break;
					}
					if j < last_index {
						let reference = self.last_host(&next[i - 1]).and_then(|node| self.host.next_sibling(&node));
						let mut nodes = Vec::new();
						self.collect_host_nodes(&next[i], &mut nodes);
						trace!("Moving {} host node(s).", nodes.len());
						for node in &nodes {
							self.host.insert_before(container, node, reference.as_ref());
						}
					} else {
						last_index = j;
					}
				}
				None => {
					let span = trace_span!("Mounting keyed child", key = ?next[i].key, i);
					let _enter = span.enter();
					let reference = if i == 0 {
						first_prev.clone()
					} else {
						self.last_host(&next[i - 1]).and_then(|node| self.host.next_sibling(&node))
					};
					result = self.mount(&mut next[i], container, svg, reference.as_ref());
					if result.is_err() {
						break;
					}
				}
			}
		}

		for (child, _) in prev.iter_mut().zip(carried).filter(|(_, carried)| !carried) {
			let span = trace_span!("Removing keyed child", key = ?child.key);
			let _enter = span.enter();
			self.unmount(child, Some(container));
		}
		result
	}
}
