//! Rule composition
//!
//! ```
//! use vigil_rules::prelude::*;
//!
//! let name = || "Bob";
//! let rule = MinStringLengthRule::new(name, 3)
//!     .and(MaxStringLengthRule::new(name, 10))
//!     .and(StringContainsRule::new(name, " ").not());
//!
//! assert!(rule.holds());
//! ```

use crate::Rule;

/// Holds when both inner rules hold.
pub struct And<A, B> {
	left: A,
	right: B,
}

impl<A: Rule, B: Rule> And<A, B> {
	pub fn new(left: A, right: B) -> Self {
		Self { left, right }
	}
}

impl<A: Rule, B: Rule> Rule for And<A, B> {
	fn holds(&self) -> bool {
		self.left.holds() && self.right.holds()
	}
}

/// Holds when at least one inner rule holds.
pub struct Or<A, B> {
	left: A,
	right: B,
}

impl<A: Rule, B: Rule> Or<A, B> {
	pub fn new(left: A, right: B) -> Self {
		Self { left, right }
	}
}

impl<A: Rule, B: Rule> Rule for Or<A, B> {
	fn holds(&self) -> bool {
		self.left.holds() || self.right.holds()
	}
}

/// Holds when the inner rule fails.
pub struct Not<R> {
	inner: R,
}

impl<R: Rule> Not<R> {
	pub fn new(inner: R) -> Self {
		Self { inner }
	}
}

impl<R: Rule> Rule for Not<R> {
	fn holds(&self) -> bool {
		!self.inner.holds()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::comparison::{GreaterThanRule, LessThanRule};
	use crate::string::MinStringLengthRule;
	use rstest::rstest;
	use std::cell::Cell;
	use std::rc::Rc;

	struct Fixed {
		result: bool,
		calls: Rc<Cell<u32>>,
	}

	impl Rule for Fixed {
		fn holds(&self) -> bool {
			self.calls.set(self.calls.get() + 1);
			self.result
		}
	}

	fn fixed(result: bool) -> (Fixed, Rc<Cell<u32>>) {
		let calls = Rc::new(Cell::new(0));
		(
			Fixed {
				result,
				calls: Rc::clone(&calls),
			},
			calls,
		)
	}

	#[rstest]
	#[case(5, true)]
	#[case(0, false)]
	#[case(10, false)]
	fn test_and_builds_range(#[case] value: i32, #[case] expected: bool) {
		let rule = GreaterThanRule::new(move || value, 0).and(LessThanRule::new(move || value, 10));

		assert_eq!(rule.holds(), expected);
	}

	#[rstest]
	#[case(-1, true)]
	#[case(5, false)]
	#[case(11, true)]
	fn test_or_builds_outside_range(#[case] value: i32, #[case] expected: bool) {
		let rule = LessThanRule::new(move || value, 0).or(GreaterThanRule::new(move || value, 10));

		assert_eq!(rule.holds(), expected);
	}

	#[rstest]
	fn test_not_inverts() {
		assert!(MinStringLengthRule::new(|| "ab", 3).not().holds());
		assert!(!MinStringLengthRule::new(|| "abc", 3).not().holds());
	}

	#[rstest]
	fn test_and_short_circuits() {
		// Arrange
		let (left, _) = fixed(false);
		let (right, right_calls) = fixed(true);

		// Act
		let holds = left.and(right).holds();

		// Assert
		assert!(!holds);
		assert_eq!(right_calls.get(), 0);
	}

	#[rstest]
	fn test_or_short_circuits() {
		let (left, _) = fixed(true);
		let (right, right_calls) = fixed(false);

		assert!(left.or(right).holds());
		assert_eq!(right_calls.get(), 0);
	}

	#[rstest]
	fn test_composed_rule_into_predicate() {
		let value = Rc::new(Cell::new(3));
		let source = Rc::clone(&value);
		let predicate = GreaterThanRule::new(move || source.get(), 0).not().into_predicate();

		assert!(!predicate());
		value.set(0);
		assert!(predicate());
	}
}
