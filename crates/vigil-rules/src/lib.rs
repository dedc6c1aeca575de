//! Rule predicate combinators for vigil
//!
//! Each rule wraps a value accessor (a zero-argument closure yielding the
//! current value, usually built with
//! [`PropertyReader::accessor`](vigil_core::PropertyReader::accessor)) and a
//! fixed parameter. [`Rule::into_predicate`] turns a rule into the boxed
//! predicate that [`ValidationEngine`](vigil_core::ValidationEngine) stores.
//!
//! ## Example
//!
//! ```
//! use vigil_core::{PropertyKey, ValidationEngine};
//! use vigil_rules::prelude::*;
//!
//! const NAME: PropertyKey<String> = PropertyKey::new("Name");
//!
//! let mut engine = ValidationEngine::new();
//! let name = engine.reader();
//!
//! engine.add_scoped_rule(
//!     NAME,
//!     MinStringLengthRule::new(name.accessor(NAME, String::new()), 3).into_predicate(),
//!     "Name is too short",
//! );
//! engine.add_scoped_rule(
//!     NAME,
//!     doesnt_contain(name.accessor(NAME, String::new()), " "),
//!     "Name cannot contain spaces",
//! );
//!
//! engine.set(NAME, "Al".to_string());
//! assert_eq!(engine.get_error("Name"), "Name is too short");
//! ```

pub mod comparison;
pub mod composition;
pub mod format;
pub mod string;

pub use comparison::{
	EqualsRule, GreaterThanOrEqualsRule, GreaterThanRule, LessThanOrEqualsRule, LessThanRule,
	NotEqualsRule,
};
pub use composition::{And, Not, Or};
pub use format::{IsIntegerRule, IsNumericRule};
pub use string::{MaxStringLengthRule, MinStringLengthRule, StringContainsRule, StringDoesntContainRule};
pub use vigil_core::Predicate;

/// Re-export commonly used types
pub mod prelude {
	pub use crate::Rule;
	pub use crate::comparison::*;
	pub use crate::composition::*;
	pub use crate::format::*;
	pub use crate::string::*;
}

/// A condition over the current value of one or more accessors.
pub trait Rule {
	/// Whether the rule holds for the accessor's current value.
	fn holds(&self) -> bool;

	/// Box this rule as a predicate for
	/// [`ValidationEngine::add_rule`](vigil_core::ValidationEngine::add_rule).
	fn into_predicate(self) -> Predicate
	where
		Self: Sized + 'static,
	{
		Box::new(move || self.holds())
	}

	/// Holds when both `self` and `other` hold. `other` is not evaluated when
	/// `self` fails.
	fn and<R: Rule>(self, other: R) -> And<Self, R>
	where
		Self: Sized,
	{
		And::new(self, other)
	}

	/// Holds when either `self` or `other` holds. `other` is not evaluated
	/// when `self` holds.
	fn or<R: Rule>(self, other: R) -> Or<Self, R>
	where
		Self: Sized,
	{
		Or::new(self, other)
	}

	/// Holds when `self` does not.
	fn not(self) -> Not<Self>
	where
		Self: Sized,
	{
		Not::new(self)
	}
}

impl<R: Rule + ?Sized> Rule for Box<R> {
	fn holds(&self) -> bool {
		(**self).holds()
	}
}
