//! [`Host`] implementation for browser DOMs.

use crate::{
	error::{Error, Result},
	host::Host,
	binding_map::{BindingMap, CountSaturatedError, Release},
	vnode::{Listener, Value},
};
use core::fmt::{self, Debug, Formatter};
use tracing::{error, info, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Renders into a [`web_sys::Document`].
///
/// Each distinct [`Listener`] is wrapped into a single JavaScript closure, shared by all elements it's bound to
/// and released once the last binding is removed.
pub struct WebHost {
	document: web_sys::Document,
	closures: BindingMap<usize, u16, Closure<dyn Fn(web_sys::Event)>>,
}
impl WebHost {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self { document, closures: BindingMap::new() }
	}

	/// Uses the current window's document.
	///
	/// # Errors
	///
	/// Iff there is no window or it has no document.
	pub fn from_window() -> Result<Self> {
		let document = web_sys::window()
			.and_then(|window| window.document())
			.ok_or_else(|| Error::Host("no window document available".to_owned()))?;
		Ok(Self::new(document))
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}

	fn element<'a>(node: &'a web_sys::Node, operation: &str) -> Option<&'a web_sys::Element> {
		let element = node.dyn_ref::<web_sys::Element>();
		if element.is_none() {
			error!("Expected `web_sys::Element` to {} but found {:?}.", operation, node);
		}
		element
	}
}
impl Debug for WebHost {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("WebHost")
			.field("document", &self.document)
			.field("closures", &self.closures.len())
			.finish()
	}
}

fn to_js(value: &Value) -> JsValue {
	match value {
		Value::Str(text) => JsValue::from_str(text),
		&Value::Bool(flag) => JsValue::from_bool(flag),
		&Value::Number(number) => JsValue::from_f64(number),
		Value::Style(_) | Value::Listener(_) | Value::Props(_) => {
			warn!("{:?} has no property representation. Using `undefined`.", value);
			JsValue::UNDEFINED
		}
	}
}

impl Host for WebHost {
	type Node = web_sys::Node;

	fn create_element(&mut self, tag: &str, svg: bool) -> Result<web_sys::Node> {
		let element = if svg {
			self.document.create_element_ns(Some(SVG_NAMESPACE), tag)
		} else {
			self.document.create_element(tag)
		};
		element.map(Into::into).map_err(|error| Error::Host(format!("failed to create <{}>: {:?}", tag, error)))
	}

	fn create_text(&mut self, text: &str) -> web_sys::Node {
		self.document.create_text_node(text).into()
	}

	fn text(&self, node: &web_sys::Node) -> Option<String> {
		node.dyn_ref::<web_sys::Text>().and_then(|_| node.text_content())
	}

	fn set_text(&mut self, node: &web_sys::Node, text: &str) {
		node.set_text_content(Some(text));
	}

	fn set_attribute(&mut self, element: &web_sys::Node, name: &str, value: &str) {
		if let Some(element) = Self::element(element, "set an attribute") {
			if let Err(error) = element.set_attribute(name, value) {
				error!("Could not set attribute {:?}: {:?}", name, error);
			}
		}
	}

	fn remove_attribute(&mut self, element: &web_sys::Node, name: &str) {
		if let Some(element) = Self::element(element, "remove an attribute") {
			if let Err(error) = element.remove_attribute(name) {
				warn!("Could not remove attribute {:?}: {:?}", name, error);
			}
		}
	}

	fn set_property(&mut self, element: &web_sys::Node, name: &str, value: Option<&Value>) {
		let value = value.map_or(JsValue::UNDEFINED, to_js);
		if let Err(error) = js_sys::Reflect::set(element, &JsValue::from_str(name), &value) {
			error!("Could not set property {:?}: {:?}", name, error);
		}
	}

	fn set_class(&mut self, element: &web_sys::Node, class: Option<&str>) {
		match class {
			Some(class) => self.set_attribute(element, "class", class),
			None => self.remove_attribute(element, "class"),
		}
	}

	fn set_style(&mut self, element: &web_sys::Node, style: &[(String, String)]) {
		if style.is_empty() {
			return self.remove_attribute(element, "style");
		}
		let css: String = style.iter().map(|(name, value)| format!("{}: {};", name, value)).collect();
		self.set_attribute(element, "style", &css);
	}

	fn add_event_listener(&mut self, element: &web_sys::Node, event: &str, listener: &Listener) {
		let closure = match self.closures.bind_or_insert_with(listener.addr(), || {
			let listener = listener.clone();
			Closure::wrap(Box::new(move |event: web_sys::Event| listener.call(&event)) as Box<dyn Fn(web_sys::Event)>)
		}) {
			Ok(closure) => closure,
			Err(CountSaturatedError) => return error!("Too many (more than 65k) active bindings of the same `Listener`."),
		};
		if let Err(error) = element.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
			error!("Failed to add event listener {:?}: {:?}", event, error);
		}
	}

	fn remove_event_listener(&mut self, element: &web_sys::Node, event: &str, listener: &Listener) {
		let remove = |closure: &Closure<dyn Fn(web_sys::Event)>| {
			if let Err(error) = element.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
				error!("Failed to remove event listener {:?}: {:?}", event, error);
			}
		};
		match self.closures.release(listener.addr()) {
			Release::Shared(closure) => remove(closure),
			Release::Last(closure) => {
				remove(&closure);
				trace!("Dropping the last binding's listener closure.");
				info!("Listener closure count: {}", self.closures.len());
			}
			Release::Missing => error!("Tried to remove event listener {:?} that was never added.", event),
		}
	}

	fn insert_before(&mut self, parent: &web_sys::Node, child: &web_sys::Node, reference: Option<&web_sys::Node>) {
		if let Err(error) = parent.insert_before(child, reference) {
			error!("Failed to insert node: {:?}", error);
		}
	}

	fn remove_child(&mut self, parent: &web_sys::Node, child: &web_sys::Node) {
		if let Err(error) = parent.remove_child(child) {
			error!("Failed to remove node: {:?}", error);
		}
	}

	fn parent_node(&self, node: &web_sys::Node) -> Option<web_sys::Node> {
		node.parent_node()
	}

	fn next_sibling(&self, node: &web_sys::Node) -> Option<web_sys::Node> {
		node.next_sibling()
	}

	fn query_selector(&self, selector: &str) -> Option<web_sys::Node> {
		match self.document.query_selector(selector) {
			Ok(element) => element.map(Into::into),
			Err(error) => {
				error!("Invalid selector {:?}: {:?}", selector, error);
				None
			}
		}
	}
}
