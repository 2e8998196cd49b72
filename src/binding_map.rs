//! Binding counts for shared values, used by [`WebHost`](`crate::web::WebHost`) to keep one JavaScript closure per [`Listener`](`crate::Listener`).
//!
//! A value lives exactly as long as it has bindings: the last [`release`](`BindingMap::release`) hands it back out of the map.

use core::hash::{BuildHasher, Hash};
use hashbrown::{
	hash_map::{DefaultHashBuilder, Entry},
	HashMap,
};
use num_traits::{CheckedAdd, CheckedSub, One, Zero};

pub(crate) struct BindingMap<K, C, V, S = DefaultHashBuilder> {
	entries: HashMap<K, Binding<C, V>, S>,
}

struct Binding<C, V> {
	count: C,
	value: V,
}

/// Outcome of giving up one binding.
pub(crate) enum Release<'a, V> {
	/// Other bindings remain.
	Shared(&'a V),
	/// This was the last binding. The value has left the map.
	Last(V),
	/// Nothing was bound under that key.
	Missing,
}

impl<K, C, V, S> BindingMap<K, C, V, S>
where
	K: Hash + Eq,
	C: CheckedAdd + CheckedSub + One + Zero,
	S: BuildHasher,
{
	#[must_use]
	pub(crate) fn new() -> Self
	where
		S: Default,
	{
		Self { entries: HashMap::with_hasher(S::default()) }
	}

	/// Adds a binding to the value at `key`, creating the value with `create` for the first one.
	pub(crate) fn bind_or_insert_with(&mut self, key: K, create: impl FnOnce() -> V) -> Result<&V, CountSaturatedError> {
		match self.entries.entry(key) {
			Entry::Occupied(occupied) => {
				let binding = occupied.into_mut();
				binding.count = binding.count.checked_add(&C::one()).ok_or(CountSaturatedError)?;
				Ok(&binding.value)
			}
			Entry::Vacant(vacant) => Ok(&vacant.insert(Binding { count: C::one(), value: create() }).value),
		}
	}

	pub(crate) fn release(&mut self, key: K) -> Release<'_, V> {
		let mut occupied = match self.entries.entry(key) {
			Entry::Occupied(occupied) => occupied,
			Entry::Vacant(_) => return Release::Missing,
		};
		// Entries are removed at zero, so the subtraction can't underflow.
		let count = occupied.get().count.checked_sub(&C::one()).unwrap_or_else(C::zero);
		if count.is_zero() {
			Release::Last(occupied.remove().value)
		} else {
			let binding = occupied.into_mut();
			binding.count = count;
			Release::Shared(&binding.value)
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.len()
	}
}

/// A binding count would overflow.
#[derive(Debug)]
pub(crate) struct CountSaturatedError;

#[cfg(test)]
mod tests {
	use super::{BindingMap, Release};

	#[test]
	fn last_release_hands_the_value_back() {
		let mut map = BindingMap::<&str, u8, String>::new();
		map.bind_or_insert_with("click", || "closure".to_owned()).unwrap();
		map.bind_or_insert_with("click", || unreachable!()).unwrap();
		assert!(matches!(map.release("click"), Release::Shared(value) if value == "closure"));
		assert!(matches!(map.release("click"), Release::Last(value) if value == "closure"));
		assert_eq!(map.len(), 0);
		assert!(matches!(map.release("click"), Release::Missing));
	}

	#[test]
	fn saturated_count_is_an_error() {
		let mut map = BindingMap::<u8, u8, ()>::new();
		for _ in 0..u8::MAX {
			map.bind_or_insert_with(0, || ()).unwrap();
		}
		assert!(map.bind_or_insert_with(0, || ()).is_err());
	}
}
