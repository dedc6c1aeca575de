//! Property storage
//!
//! [`PropertyStore`] maps property keys to their current values and raises a
//! [`PropertyChanged`] notification whenever a write actually changes a value.
//! Values are boxed and keyed by `(name, TypeId)`, so a typed read can never
//! observe a value stored under another type.
//!
//! ## Example
//!
//! ```
//! use vigil_core::{PropertyKey, PropertyStore};
//!
//! const NAME: PropertyKey<String> = PropertyKey::new("Name");
//!
//! let store = PropertyStore::new();
//!
//! // The first read materializes the default
//! assert_eq!(store.get(NAME, "Enter a name".to_string()), "Enter a name");
//!
//! assert!(store.set(NAME, "Bob".to_string(), false));
//! // Writing the same value again is deduplicated
//! assert!(!store.set(NAME, "Bob".to_string(), false));
//! assert_eq!(store.get(NAME, String::new()), "Bob");
//! ```

use core::any::{Any, TypeId};
use core::cell::RefCell;
use core::fmt;

extern crate alloc;
use alloc::boxed::Box;
use alloc::rc::Rc;
use std::collections::HashMap;

use crate::key::PropertyKey;
use crate::notifier::{ChangeNotifier, PropertyChanged};

type Slot = (&'static str, TypeId);

/// Keyed property values with change notification.
///
/// Cloning a `PropertyStore` creates a new handle to the **same** values and
/// subscribers.
#[derive(Clone, Default)]
pub struct PropertyStore {
	values: Rc<RefCell<HashMap<Slot, Box<dyn Any>>>>,
	notifier: ChangeNotifier,
}

impl PropertyStore {
	/// Create an empty store with no subscribers.
	pub fn new() -> Self {
		Self::default()
	}

	/// Read the value stored under `key`.
	///
	/// If nothing has been stored yet, `default` is inserted and returned.
	/// Reads never raise change notifications.
	pub fn get<T: Clone + 'static>(&self, key: PropertyKey<T>, default: T) -> T {
		let slot = (key.name(), TypeId::of::<T>());
		let mut values = self.values.borrow_mut();
		if let Some(value) = values.get(&slot).and_then(|value| value.downcast_ref::<T>()) {
			return value.clone();
		}
		values.insert(slot, Box::new(default.clone()));
		default
	}

	/// Store `value` under `key` and notify subscribers if it changed.
	///
	/// The previous value is read with `T::default()` as its fallback. When it
	/// equals `value` and `force_update` is false, nothing is written and no
	/// notification is raised. Otherwise the value is stored and exactly one
	/// notification fires. Returns whether a notification fired.
	pub fn set<T>(&self, key: PropertyKey<T>, value: T, force_update: bool) -> bool
	where
		T: Clone + PartialEq + Default + 'static,
	{
		let old = self.get(key, T::default());
		if old == value && !force_update {
			tracing::debug!(property = key.name(), "write deduplicated");
			return false;
		}
		self.values
			.borrow_mut()
			.insert((key.name(), TypeId::of::<T>()), Box::new(value));
		tracing::debug!(property = key.name(), forced = force_update, "property changed");
		self.notifier.notify(&PropertyChanged { name: key.name() });
		true
	}

	/// Build a zero-argument accessor yielding the current value of `key`.
	///
	/// See [`PropertyReader::accessor`].
	pub fn accessor<T: Clone + 'static>(&self, key: PropertyKey<T>, default: T) -> impl Fn() -> T + use<T> {
		self.reader().accessor(key, default)
	}

	/// Whether any value has been materialized for the property `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.values.borrow().keys().any(|(stored, _)| *stored == name)
	}

	/// Number of materialized values.
	pub fn len(&self) -> usize {
		self.values.borrow().len()
	}

	/// Whether no value has been materialized yet.
	pub fn is_empty(&self) -> bool {
		self.values.borrow().is_empty()
	}

	/// The change notifier fed by [`set`](Self::set).
	pub fn notifier(&self) -> &ChangeNotifier {
		&self.notifier
	}

	/// Read-only handle to the same values.
	pub fn reader(&self) -> PropertyReader {
		PropertyReader {
			store: self.clone(),
		}
	}
}

impl fmt::Debug for PropertyStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PropertyStore")
			.field("values", &self.len())
			.field("notifier", &self.notifier)
			.finish()
	}
}

/// Read-only handle to a [`PropertyStore`].
///
/// Rule predicates capture a reader to observe current values; they cannot
/// write through it, so every write keeps going through the owner.
#[derive(Clone, Debug)]
pub struct PropertyReader {
	store: PropertyStore,
}

impl PropertyReader {
	/// Read the value stored under `key`, materializing `default` if absent.
	pub fn get<T: Clone + 'static>(&self, key: PropertyKey<T>, default: T) -> T {
		self.store.get(key, default)
	}

	/// Build a zero-argument accessor yielding the current value of `key`.
	///
	/// ```
	/// use vigil_core::{PropertyKey, PropertyStore};
	///
	/// const AGE: PropertyKey<u32> = PropertyKey::new("Age");
	///
	/// let store = PropertyStore::new();
	/// let age = store.reader().accessor(AGE, 0);
	///
	/// assert_eq!(age(), 0);
	/// store.set(AGE, 21, false);
	/// assert_eq!(age(), 21);
	/// ```
	pub fn accessor<T: Clone + 'static>(&self, key: PropertyKey<T>, default: T) -> impl Fn() -> T + use<T> {
		let store = self.store.clone();
		move || store.get(key, default.clone())
	}

	/// Whether any value has been materialized for the property `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.store.contains(name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::cell::Cell;
	use rstest::rstest;

	const NAME: PropertyKey<String> = PropertyKey::new("Name");
	const AGE: PropertyKey<i32> = PropertyKey::new("Age");

	fn counting(store: &PropertyStore) -> Rc<Cell<usize>> {
		let fired = Rc::new(Cell::new(0));
		let counter = Rc::clone(&fired);
		store
			.notifier()
			.subscribe(move |_: &PropertyChanged| counter.set(counter.get() + 1));
		fired
	}

	#[rstest]
	fn test_get_materializes_default_once() {
		// Arrange
		let store = PropertyStore::new();

		// Act
		let first = store.get(NAME, "Enter a name".to_string());
		let second = store.get(NAME, "ignored".to_string());

		// Assert
		assert_eq!(first, "Enter a name");
		assert_eq!(second, "Enter a name");
		assert!(store.contains("Name"));
		assert_eq!(store.len(), 1);
	}

	#[rstest]
	fn test_get_never_notifies() {
		let store = PropertyStore::new();
		let fired = counting(&store);

		let _ = store.get(AGE, 3);
		let _ = store.get(AGE, 4);

		assert_eq!(fired.get(), 0);
	}

	#[rstest]
	fn test_set_changed_value_notifies_once() {
		let store = PropertyStore::new();
		let fired = counting(&store);

		assert!(store.set(AGE, 20, false));

		assert_eq!(fired.get(), 1);
		assert_eq!(store.get(AGE, 0), 20);
	}

	#[rstest]
	#[case(false, 0)]
	#[case(true, 1)]
	fn test_set_equal_value_respects_force(#[case] force: bool, #[case] expected: usize) {
		// Arrange
		let store = PropertyStore::new();
		store.set(AGE, 20, false);
		let fired = counting(&store);

		// Act
		let changed = store.set(AGE, 20, force);

		// Assert
		assert_eq!(changed, force);
		assert_eq!(fired.get(), expected);
	}

	#[rstest]
	fn test_setting_default_on_fresh_key_is_deduplicated() {
		let store = PropertyStore::new();
		let fired = counting(&store);

		assert!(!store.set(AGE, 0, false));

		assert_eq!(fired.get(), 0);
		assert!(store.contains("Age"));
	}

	#[rstest]
	fn test_same_name_different_types_do_not_collide() {
		// Arrange
		let store = PropertyStore::new();
		let as_text = PropertyKey::<String>::new("Value");
		let as_number = PropertyKey::<i64>::new("Value");

		// Act
		store.set(as_text, "forty-two".to_string(), false);
		store.set(as_number, 42, false);

		// Assert
		assert_eq!(store.get(as_text, String::new()), "forty-two");
		assert_eq!(store.get(as_number, 0), 42);
	}

	#[rstest]
	fn test_handler_can_read_store_during_notification() {
		let store = PropertyStore::new();
		let observed = Rc::new(Cell::new(0));
		let reader = store.reader();
		let sink = Rc::clone(&observed);
		store
			.notifier()
			.subscribe(move |_: &PropertyChanged| sink.set(reader.get(AGE, 0)));

		store.set(AGE, 33, false);

		assert_eq!(observed.get(), 33);
	}

	#[rstest]
	fn test_reader_accessor_tracks_writes() {
		let store = PropertyStore::new();
		let name = store.reader().accessor(NAME, String::new());

		assert_eq!(name(), "");
		store.set(NAME, "Bob".to_string(), false);
		assert_eq!(name(), "Bob");
	}
}
