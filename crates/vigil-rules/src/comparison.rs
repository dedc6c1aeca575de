//! Ordering rules
//!
//! Each rule compares the accessor's current value against a fixed threshold
//! with [`PartialOrd`]. Values that do not compare (a `NaN`, for instance)
//! make every ordering rule fail, including [`NotEqualsRule`].

use core::cmp::Ordering;

use crate::{Predicate, Rule};

macro_rules! ordering_rule {
	($(#[$meta:meta])* $name:ident, $shorthand:ident, $($ordering:pat_param)|+) => {
		$(#[$meta])*
		pub struct $name<F, T> {
			accessor: F,
			threshold: T,
		}

		impl<F, T> $name<F, T>
		where
			F: Fn() -> T,
			T: PartialOrd,
		{
			/// Create the rule over `accessor` with the given threshold.
			pub fn new(accessor: F, threshold: T) -> Self {
				Self { accessor, threshold }
			}
		}

		impl<F, T> Rule for $name<F, T>
		where
			F: Fn() -> T,
			T: PartialOrd,
		{
			fn holds(&self) -> bool {
				matches!(
					(self.accessor)().partial_cmp(&self.threshold),
					$(Some($ordering))|+
				)
			}
		}

		#[doc = concat!("Shorthand for `", stringify!($name), "::new(accessor, threshold).into_predicate()`.")]
		pub fn $shorthand<F, T>(accessor: F, threshold: T) -> Predicate
		where
			F: Fn() -> T + 'static,
			T: PartialOrd + 'static,
		{
			$name::new(accessor, threshold).into_predicate()
		}
	};
}

ordering_rule!(
	/// Holds when the value equals the threshold.
	EqualsRule,
	equals,
	Ordering::Equal
);
ordering_rule!(
	/// Holds when the value is strictly less or strictly greater than the
	/// threshold.
	NotEqualsRule,
	not_equals,
	Ordering::Less | Ordering::Greater
);
ordering_rule!(
	/// Holds when the value is greater than the threshold.
	GreaterThanRule,
	greater_than,
	Ordering::Greater
);
ordering_rule!(
	/// Holds when the value is greater than or equal to the threshold.
	GreaterThanOrEqualsRule,
	greater_than_or_equals,
	Ordering::Greater | Ordering::Equal
);
ordering_rule!(
	/// Holds when the value is less than the threshold.
	LessThanRule,
	less_than,
	Ordering::Less
);
ordering_rule!(
	/// Holds when the value is less than or equal to the threshold.
	LessThanOrEqualsRule,
	less_than_or_equals,
	Ordering::Less | Ordering::Equal
);

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case(17, false)]
	#[case(18, true)]
	#[case(19, true)]
	fn test_greater_than_or_equals(#[case] age: i32, #[case] expected: bool) {
		let rule = GreaterThanOrEqualsRule::new(move || age, 18);

		assert_eq!(rule.holds(), expected);
	}

	#[rstest]
	#[case::below(1, true, true, false, false, false)]
	#[case::equal(2, false, true, false, true, true)]
	#[case::above(3, false, false, true, true, false)]
	fn test_each_ordering_against_two(
		#[case] value: i32,
		#[case] less: bool,
		#[case] less_or_equal: bool,
		#[case] greater: bool,
		#[case] greater_or_equal: bool,
		#[case] equal: bool,
	) {
		assert_eq!(LessThanRule::new(move || value, 2).holds(), less);
		assert_eq!(LessThanOrEqualsRule::new(move || value, 2).holds(), less_or_equal);
		assert_eq!(GreaterThanRule::new(move || value, 2).holds(), greater);
		assert_eq!(GreaterThanOrEqualsRule::new(move || value, 2).holds(), greater_or_equal);
		assert_eq!(EqualsRule::new(move || value, 2).holds(), equal);
		assert_eq!(NotEqualsRule::new(move || value, 2).holds(), !equal);
	}

	#[rstest]
	fn test_string_values_compare_lexicographically() {
		assert!(LessThanRule::new(|| "apple", "banana").holds());
		assert!(EqualsRule::new(|| String::from("Bob"), String::from("Bob")).holds());
	}

	#[rstest]
	fn test_nan_fails_every_ordering() {
		let nan = || f64::NAN;

		assert!(!EqualsRule::new(nan, 1.0).holds());
		assert!(!NotEqualsRule::new(nan, 1.0).holds());
		assert!(!GreaterThanRule::new(nan, 1.0).holds());
		assert!(!GreaterThanOrEqualsRule::new(nan, 1.0).holds());
		assert!(!LessThanRule::new(nan, 1.0).holds());
		assert!(!LessThanOrEqualsRule::new(nan, 1.0).holds());
	}

	#[rstest]
	fn test_shorthand_builds_predicate() {
		let predicate = less_than_or_equals(|| 10_u8, 10);

		assert!(predicate());
	}

	proptest! {
		#[test]
		fn prop_orderings_match_operators(value in any::<i64>(), threshold in any::<i64>()) {
			prop_assert_eq!(EqualsRule::new(move || value, threshold).holds(), value == threshold);
			prop_assert_eq!(NotEqualsRule::new(move || value, threshold).holds(), value != threshold);
			prop_assert_eq!(GreaterThanRule::new(move || value, threshold).holds(), value > threshold);
			prop_assert_eq!(GreaterThanOrEqualsRule::new(move || value, threshold).holds(), value >= threshold);
			prop_assert_eq!(LessThanRule::new(move || value, threshold).holds(), value < threshold);
			prop_assert_eq!(LessThanOrEqualsRule::new(move || value, threshold).holds(), value <= threshold);
		}
	}
}
