//! Typed property identifiers
//!
//! Properties are addressed by statically declared keys instead of names
//! derived at runtime. A key pairs a `'static` name with the value type
//! stored under it, so reads and writes through the same key always agree on
//! the type.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// A statically declared property identifier.
///
/// The name scopes validation rules and change notifications; the type
/// parameter fixes the value type read and written through this key.
///
/// # Examples
///
/// ```
/// use vigil_core::PropertyKey;
///
/// const NAME: PropertyKey<String> = PropertyKey::new("Name");
/// const AGE: PropertyKey<u32> = PropertyKey::new("Age");
///
/// assert_eq!(NAME.name(), "Name");
/// assert_eq!(AGE.to_string(), "Age");
/// ```
pub struct PropertyKey<T> {
	name: &'static str,
	_marker: PhantomData<fn() -> T>,
}

impl<T> PropertyKey<T> {
	/// Create a key for the property called `name`.
	pub const fn new(name: &'static str) -> Self {
		Self {
			name,
			_marker: PhantomData,
		}
	}

	/// The property name used for rule scoping and change notifications.
	pub const fn name(&self) -> &'static str {
		self.name
	}
}

impl<T> Clone for PropertyKey<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for PropertyKey<T> {}

impl<T> PartialEq for PropertyKey<T> {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

impl<T> Eq for PropertyKey<T> {}

impl<T> Hash for PropertyKey<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.name.hash(state);
	}
}

impl<T> fmt::Debug for PropertyKey<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("PropertyKey")
			.field(&self.name)
			.field(&core::any::type_name::<T>())
			.finish()
	}
}

impl<T> fmt::Display for PropertyKey<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

impl<T> AsRef<str> for PropertyKey<T> {
	fn as_ref(&self) -> &str {
		self.name
	}
}
