use crate::vnode::{ComponentId, Key};

/// Failures surfaced to the caller of [`Renderer::render`](`crate::Renderer::render`),
/// [`Renderer::update`](`crate::Renderer::update`) or the tree builder.
///
/// Structural mismatches between a previous and next tree are not errors: They are resolved by replacing the node.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Invalid descriptor: {0}")]
	InvalidDescriptor(String),

	#[error("Portal target {0:?} could not be resolved")]
	MissingPortalTarget(String),

	#[error("Duplicate key {0:?} among siblings")]
	DuplicateKey(Key),

	#[error("Child {index} of a keyed list has no key")]
	MissingKey { index: usize },

	#[error("No mounted component with id {0:?}")]
	UnknownComponent(ComponentId),

	#[error("Host operation failed: {0}")]
	Host(String),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
