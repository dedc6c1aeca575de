//! Number format rules
//!
//! These check the text of a value, typically user input bound to a string
//! property, without parsing it. Only the ten ASCII decimal digits count as
//! digits; signs, exponents and whitespace are rejected.

use crate::{Predicate, Rule};

const DECIMAL_SEPARATORS: [char; 2] = ['.', ','];

/// Whether `value` is non-empty and made of decimal digits only.
///
/// # Examples
///
/// ```
/// use vigil_rules::format::is_integer;
///
/// assert!(is_integer("0125"));
/// assert!(!is_integer(""));
/// assert!(!is_integer("-3"));
/// ```
pub fn is_integer(value: &str) -> bool {
	!value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Whether `value` is a decimal number with at most one separator.
///
/// The separator may be `.` or `,` and needs at least one digit on each side.
///
/// # Examples
///
/// ```
/// use vigil_rules::format::is_numeric;
///
/// assert!(is_numeric("12.3"));
/// assert!(is_numeric("12,3"));
/// assert!(!is_numeric("12.3.4"));
/// assert!(!is_numeric(".5"));
/// assert!(!is_numeric("5."));
/// ```
pub fn is_numeric(value: &str) -> bool {
	if value.is_empty() {
		return false;
	}

	let mut specials = value.char_indices().filter(|(_, c)| !c.is_ascii_digit());
	let Some((index, separator)) = specials.next() else {
		return true;
	};
	if specials.next().is_some() || !DECIMAL_SEPARATORS.contains(&separator) {
		return false;
	}

	index != 0 && index + separator.len_utf8() != value.len()
}

/// Holds when the accessor yields an integer string, see [`is_integer`].
pub struct IsIntegerRule<F> {
	accessor: F,
}

impl<F, S> IsIntegerRule<F>
where
	F: Fn() -> S,
	S: AsRef<str>,
{
	pub fn new(accessor: F) -> Self {
		Self { accessor }
	}
}

impl<F, S> Rule for IsIntegerRule<F>
where
	F: Fn() -> S,
	S: AsRef<str>,
{
	fn holds(&self) -> bool {
		is_integer((self.accessor)().as_ref())
	}
}

/// Holds when the accessor yields a numeric string, see [`is_numeric`].
pub struct IsNumericRule<F> {
	accessor: F,
}

impl<F, S> IsNumericRule<F>
where
	F: Fn() -> S,
	S: AsRef<str>,
{
	pub fn new(accessor: F) -> Self {
		Self { accessor }
	}
}

impl<F, S> Rule for IsNumericRule<F>
where
	F: Fn() -> S,
	S: AsRef<str>,
{
	fn holds(&self) -> bool {
		is_numeric((self.accessor)().as_ref())
	}
}

/// Shorthand for `IsIntegerRule::new(accessor).into_predicate()`.
pub fn integer<F, S>(accessor: F) -> Predicate
where
	F: Fn() -> S + 'static,
	S: AsRef<str> + 'static,
{
	IsIntegerRule::new(accessor).into_predicate()
}

/// Shorthand for `IsNumericRule::new(accessor).into_predicate()`.
pub fn numeric<F, S>(accessor: F) -> Predicate
where
	F: Fn() -> S + 'static,
	S: AsRef<str> + 'static,
{
	IsNumericRule::new(accessor).into_predicate()
}
