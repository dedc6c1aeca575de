//! Rule bindings
//!
//! A [`RuleBinding`] pairs a side-effect-free predicate with the message to
//! report when it fails, and caches the outcome of its last evaluation behind
//! a dirty flag.
//!
//! # Invariants
//!
//! 1. A binding starts dirty, so the first query always evaluates it.
//! 2. While the binding is clean, `has_error()` and `error()` reflect the last
//!    evaluation exactly and reading them never invokes the predicate.
//! 3. `update()` on a clean binding does nothing.
//! 4. While the predicate runs, `update()` and `refresh()` on the same binding
//!    do nothing, so a predicate that queries its own engine sees the previous
//!    outcome.
//! 5. A predicate fault (a returned error or a panic) is recorded as a
//!    failure whose text is the fault's diagnostic; it never propagates past
//!    `update()`.

use core::any::Any;
use core::cell::{Cell, RefCell};
use core::fmt;
use std::panic::{self, AssertUnwindSafe};

extern crate alloc;
use alloc::boxed::Box;
use alloc::string::{String, ToString};

/// Boxed zero-argument rule predicate.
pub type Predicate = Box<dyn Fn() -> bool>;

type Evaluator = Box<dyn Fn() -> Result<bool, String>>;

const OPAQUE_PANIC: &str = "predicate panicked";

/// One validation rule and its cached outcome.
pub struct RuleBinding {
	evaluator: Evaluator,
	message: String,
	scope: Option<&'static str>,
	dirty: Cell<bool>,
	evaluating: Cell<bool>,
	error: RefCell<Option<String>>,
	evaluations: Cell<u64>,
}

/// Clears the evaluating flag when dropped, also while unwinding.
struct EvaluationGuard<'a>(&'a Cell<bool>);

impl<'a> EvaluationGuard<'a> {
	fn enter(flag: &'a Cell<bool>) -> Self {
		flag.set(true);
		Self(flag)
	}
}

impl Drop for EvaluationGuard<'_> {
	fn drop(&mut self) {
		self.0.set(false);
	}
}

impl RuleBinding {
	pub(crate) fn new<P>(predicate: P, message: String, scope: Option<&'static str>) -> Self
	where
		P: Fn() -> bool + 'static,
	{
		Self::fallible(move || Ok(predicate()), message, scope)
	}

	pub(crate) fn fallible<P>(predicate: P, message: String, scope: Option<&'static str>) -> Self
	where
		P: Fn() -> Result<bool, String> + 'static,
	{
		Self {
			evaluator: Box::new(predicate),
			message,
			scope,
			dirty: Cell::new(true),
			evaluating: Cell::new(false),
			error: RefCell::new(None),
			evaluations: Cell::new(0),
		}
	}

	/// Whether the cached outcome is stale.
	pub fn is_dirty(&self) -> bool {
		self.dirty.get()
	}

	/// Whether the last evaluation failed.
	pub fn has_error(&self) -> bool {
		self.error.borrow().is_some()
	}

	/// Error text recorded by the last evaluation, if it failed.
	pub fn error(&self) -> Option<String> {
		self.error.borrow().clone()
	}

	/// The message reported when the predicate returns `false`.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// The property this rule is scoped to, or `None` for unscoped rules.
	pub fn scope(&self) -> Option<&'static str> {
		self.scope
	}

	/// Whether the predicate is running right now.
	pub fn is_evaluating(&self) -> bool {
		self.evaluating.get()
	}

	/// How many times the predicate has been invoked.
	pub fn evaluations(&self) -> u64 {
		self.evaluations.get()
	}

	pub(crate) fn invalidate(&self) {
		self.dirty.set(true);
	}

	/// Re-evaluate the predicate if the binding is dirty.
	///
	/// The dirty flag is cleared before the predicate runs, and nested calls
	/// made while it runs return immediately, so a predicate that queries the
	/// owning engine again sees this binding's previous outcome instead of
	/// recursing into it.
	pub(crate) fn update(&self, catch_panics: bool) {
		if !self.dirty.get() || self.evaluating.get() {
			return;
		}
		self.dirty.set(false);
		self.evaluations.set(self.evaluations.get() + 1);

		let outcome = {
			let _guard = EvaluationGuard::enter(&self.evaluating);
			if catch_panics {
				panic::catch_unwind(AssertUnwindSafe(|| (self.evaluator)()))
					.unwrap_or_else(|payload| Err(panic_text(payload.as_ref())))
			} else {
				(self.evaluator)()
			}
		};

		let error = match outcome {
			Ok(true) => None,
			Ok(false) => Some(self.message.clone()),
			Err(fault) => {
				tracing::warn!(
					property = self.scope.unwrap_or("<unscoped>"),
					rule = %self.message,
					fault = %fault,
					"rule predicate faulted"
				);
				Some(fault)
			}
		};
		tracing::trace!(
			property = self.scope.unwrap_or("<unscoped>"),
			has_error = error.is_some(),
			"rule evaluated"
		);
		*self.error.borrow_mut() = error;
	}

	/// Mark dirty and evaluate immediately. Does nothing while the predicate
	/// is already running.
	pub(crate) fn refresh(&self, catch_panics: bool) {
		if self.evaluating.get() {
			return;
		}
		self.invalidate();
		self.update(catch_panics);
	}
}

fn panic_text(payload: &(dyn Any + Send)) -> String {
	if let Some(text) = payload.downcast_ref::<&str>() {
		(*text).to_string()
	} else if let Some(text) = payload.downcast_ref::<String>() {
		text.clone()
	} else {
		OPAQUE_PANIC.to_string()
	}
}

impl fmt::Debug for RuleBinding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RuleBinding")
			.field("scope", &self.scope)
			.field("message", &self.message)
			.field("dirty", &self.dirty.get())
			.field("evaluating", &self.evaluating.get())
			.field("error", &self.error.borrow())
			.finish()
	}
}
