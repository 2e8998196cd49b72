#![doc(html_root_url = "https://docs.rs/vnode-reconciler/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! A declarative virtual node reconciler.
//!
//! Build [`VNode`] trees with [`h`], then let a [`Renderer`] mount them into a [`Host`] and patch later trees against earlier ones,
//! issuing only the host mutations needed to turn one into the other.
//!
//! [`memory::MemoryHost`] is a recording in-memory host. With the `"web"` feature, `web::WebHost` renders into a browser document.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

mod bind;
pub mod build;
pub mod component;
pub mod diff;
pub mod error;
pub mod host;
mod keyed;
pub mod memory;
mod mount;
pub mod vnode;

#[cfg(feature = "web")]
mod binding_map;
#[cfg(feature = "web")]
pub mod web;

pub use build::{h, text, Builder, Content, Descriptor, KeyPolicy};
pub use component::{Component, FunctionalDef, StatefulDef};
pub use diff::Renderer;
pub use error::{Error, Result};
pub use host::Host;
pub use vnode::{ChildArity, Children, ComponentId, Key, Listener, PortalTarget, Props, Style, Tag, VNode, VNodeKind, Value};

/// Hides user-provided text from logs unless the `"dangerous-logging"` feature is enabled.
pub(crate) fn redact(text: &str) -> &str {
	if cfg!(feature = "dangerous-logging") {
		text
	} else {
		"…"
	}
}
