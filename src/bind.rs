//! Applies [`Props`] entries to host elements.

use crate::{
	host::Host,
	vnode::{Props, Value},
};
use tracing::{trace, warn};

/// Keys that have to be set as live properties rather than attributes,
/// since changing the attribute doesn't reliably reflect into the rendered state for these.
fn is_dom_property(key: &str) -> bool {
	key.bytes().any(|b| b.is_ascii_uppercase()) || matches!(key, "value" | "checked" | "selected" | "muted")
}

/// Transitions the entry `key` on `element` from `previous` to `next`.
///
/// `previous` is `None` on mount, `next` is `None` when the key was dropped.
pub(crate) fn bind<H: Host>(host: &mut H, element: &H::Node, key: &str, previous: Option<&Value>, next: Option<&Value>) {
	match key {
		"style" => match next {
			None => host.set_style(element, &[]),
			Some(Value::Style(style)) => host.set_style(element, style),
			Some(other) => {
				warn!("Expected style entries under `style` but found {:?}. Clearing the inline style.", other);
				host.set_style(element, &[]);
			}
		},

		"class" => match next {
			None => host.set_class(element, None),
			Some(Value::Str(class)) => host.set_class(element, Some(class)),
			Some(other) => host.set_class(element, Some(&other.to_string())),
		},

		"props" => trace!("Ignoring component input on host element."),

		_ if key.starts_with("on") => {
			let event = key[2..].to_ascii_lowercase();
			if event.is_empty() {
				return;
			}
			match previous {
				Some(Value::Listener(listener)) => host.remove_event_listener(element, &event, listener),
				Some(other) => warn!("Expected previous listener for {:?} but found {:?}.", key, other),
				None => (),
			}
			match next {
				Some(Value::Listener(listener)) => host.add_event_listener(element, &event, listener),
				Some(other) => warn!("Expected listener for {:?} but found {:?}. Not binding.", key, other),
				None => (),
			}
		}

		_ if is_dom_property(key) => host.set_property(element, key, next),

		_ => match next {
			Some(value) => host.set_attribute(element, key, &value.to_string()),
			None => host.remove_attribute(element, key),
		},
	}
}

/// Binds every entry of a freshly created element.
pub(crate) fn bind_all<H: Host>(host: &mut H, element: &H::Node, props: &Props) {
	for (key, value) in props.iter() {
		bind(host, element, key, None, Some(value));
	}
}

/// Diffs `previous` against `next` on `element`.
///
/// Entries that compare equal are left alone, everything else is rebound in `next`'s order, then dropped keys are unbound.
pub(crate) fn patch_props<H: Host>(host: &mut H, element: &H::Node, previous: &Props, next: &Props) {
	for (key, value) in next.iter() {
		let previous_value = previous.get(key);
		if previous_value != Some(value) {
			bind(host, element, key, previous_value, Some(value));
		}
	}
	for (key, value) in previous.iter() {
		if !next.contains_key(key) {
			bind(host, element, key, Some(value), None);
		}
	}
}
