//! String rules
//!
//! Lengths are counted in Unicode scalar values, not bytes.

use crate::{Predicate, Rule};

/// Holds when the string has at least `min` characters.
pub struct MinStringLengthRule<F> {
	accessor: F,
	min: usize,
}

impl<F, S> MinStringLengthRule<F>
where
	F: Fn() -> S,
	S: AsRef<str>,
{
	/// Creates a new MinStringLengthRule over `accessor`.
	///
	/// # Examples
	///
	/// ```
	/// use vigil_rules::{MinStringLengthRule, Rule};
	///
	/// assert!(MinStringLengthRule::new(|| "Bob", 3).holds());
	/// assert!(!MinStringLengthRule::new(|| "Al", 3).holds());
	/// ```
	pub fn new(accessor: F, min: usize) -> Self {
		Self { accessor, min }
	}
}

impl<F, S> Rule for MinStringLengthRule<F>
where
	F: Fn() -> S,
	S: AsRef<str>,
{
	fn holds(&self) -> bool {
		(self.accessor)().as_ref().chars().count() >= self.min
	}
}

/// Holds when the string has at most `max` characters.
pub struct MaxStringLengthRule<F> {
	accessor: F,
	max: usize,
}

impl<F, S> MaxStringLengthRule<F>
where
	F: Fn() -> S,
	S: AsRef<str>,
{
	/// Creates a new MaxStringLengthRule over `accessor`.
	pub fn new(accessor: F, max: usize) -> Self {
		Self { accessor, max }
	}
}

impl<F, S> Rule for MaxStringLengthRule<F>
where
	F: Fn() -> S,
	S: AsRef<str>,
{
	fn holds(&self) -> bool {
		(self.accessor)().as_ref().chars().count() <= self.max
	}
}

/// Holds when the string contains `needle`.
pub struct StringContainsRule<F> {
	accessor: F,
	needle: String,
}

impl<F, S> StringContainsRule<F>
where
	F: Fn() -> S,
	S: AsRef<str>,
{
	pub fn new(accessor: F, needle: impl Into<String>) -> Self {
		Self {
			accessor,
			needle: needle.into(),
		}
	}
}

impl<F, S> Rule for StringContainsRule<F>
where
	F: Fn() -> S,
	S: AsRef<str>,
{
	fn holds(&self) -> bool {
		(self.accessor)().as_ref().contains(self.needle.as_str())
	}
}

/// Holds when the string does not contain `needle`.
pub struct StringDoesntContainRule<F> {
	accessor: F,
	needle: String,
}

impl<F, S> StringDoesntContainRule<F>
where
	F: Fn() -> S,
	S: AsRef<str>,
{
	pub fn new(accessor: F, needle: impl Into<String>) -> Self {
		Self {
			accessor,
			needle: needle.into(),
		}
	}
}

impl<F, S> Rule for StringDoesntContainRule<F>
where
	F: Fn() -> S,
	S: AsRef<str>,
{
	fn holds(&self) -> bool {
		!(self.accessor)().as_ref().contains(self.needle.as_str())
	}
}

/// Shorthand for `MinStringLengthRule::new(accessor, min).into_predicate()`.
pub fn min_length<F, S>(accessor: F, min: usize) -> Predicate
where
	F: Fn() -> S + 'static,
	S: AsRef<str> + 'static,
{
	MinStringLengthRule::new(accessor, min).into_predicate()
}

/// Shorthand for `MaxStringLengthRule::new(accessor, max).into_predicate()`.
pub fn max_length<F, S>(accessor: F, max: usize) -> Predicate
where
	F: Fn() -> S + 'static,
	S: AsRef<str> + 'static,
{
	MaxStringLengthRule::new(accessor, max).into_predicate()
}

/// Shorthand for `StringContainsRule::new(accessor, needle).into_predicate()`.
pub fn contains<F, S>(accessor: F, needle: impl Into<String>) -> Predicate
where
	F: Fn() -> S + 'static,
	S: AsRef<str> + 'static,
{
	StringContainsRule::new(accessor, needle).into_predicate()
}

/// Shorthand for `StringDoesntContainRule::new(accessor, needle).into_predicate()`.
pub fn doesnt_contain<F, S>(accessor: F, needle: impl Into<String>) -> Predicate
where
	F: Fn() -> S + 'static,
	S: AsRef<str> + 'static,
{
	StringDoesntContainRule::new(accessor, needle).into_predicate()
}
