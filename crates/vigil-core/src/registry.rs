//! Rule registry and error aggregation
//!
//! The registry holds two disjoint collections: rules scoped to exactly one
//! property, grouped per property in registration order, and unscoped rules
//! that have no dirty gate and are re-evaluated on every aggregate query.
//!
//! Property groups are kept in first-registration order, which is the order
//! in which [`error`](RuleRegistry::error) concatenates them.

use indexmap::IndexMap;

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::binding::RuleBinding;
use crate::settings::UnscopedPolicy;

/// A failing rule as reported by [`RuleRegistry::failures`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
	/// Property the rule is scoped to; `None` for unscoped rules
	pub property: Option<&'static str>,
	/// Configured message, or the fault diagnostic for faulted predicates
	pub message: String,
}

/// Scoped and unscoped rule bindings.
#[derive(Debug, Default)]
pub struct RuleRegistry {
	scoped: IndexMap<&'static str, Vec<RuleBinding>>,
	unscoped: Vec<RuleBinding>,
}

impl RuleRegistry {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Register `binding` under its own scope, or as unscoped.
	pub(crate) fn insert(&mut self, binding: RuleBinding) {
		match binding.scope() {
			Some(name) => self.scoped.entry(name).or_default().push(binding),
			None => self.unscoped.push(binding),
		}
	}

	/// Mark every rule scoped to `name` dirty. Unknown names are ignored.
	pub(crate) fn mark_dirty(&self, name: &str) {
		if let Some(bindings) = self.scoped.get(name) {
			for binding in bindings {
				binding.invalidate();
			}
		}
	}

	pub(crate) fn mark_all_dirty(&self) {
		for binding in self.scoped_bindings() {
			binding.invalidate();
		}
	}

	/// Every scoped binding, property groups in registration order.
	pub fn scoped_bindings(&self) -> impl Iterator<Item = &RuleBinding> {
		self.scoped.values().flatten()
	}

	/// Bindings scoped to `name`, empty for unknown names.
	pub fn bindings_for(&self, name: &str) -> &[RuleBinding] {
		self.scoped.get(name).map(Vec::as_slice).unwrap_or_default()
	}

	/// Unscoped bindings in registration order.
	pub fn unscoped_bindings(&self) -> &[RuleBinding] {
		&self.unscoped
	}

	/// Property names that have at least one rule, in registration order.
	pub fn scopes(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.scoped.keys().copied()
	}

	/// Total number of registered rules.
	pub fn len(&self) -> usize {
		self.scoped.values().map(Vec::len).sum::<usize>() + self.unscoped.len()
	}

	/// Whether no rule is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Whether any scoped rule currently fails.
	///
	/// A clean binding with a cached failure answers immediately, without
	/// evaluating anything. Otherwise only the dirty bindings are evaluated.
	/// Unscoped rules are consulted only under [`UnscopedPolicy::Include`], and
	/// only once the scoped rules pass.
	pub(crate) fn has_errors(&self, policy: UnscopedPolicy, catch_panics: bool) -> bool {
		let (clean, dirty): (Vec<&RuleBinding>, Vec<&RuleBinding>) =
			self.scoped_bindings().partition(|binding| !binding.is_dirty());
		if clean.iter().any(|binding| binding.has_error()) {
			return true;
		}

		for binding in &dirty {
			binding.update(catch_panics);
		}
		if dirty.iter().any(|binding| binding.has_error()) {
			return true;
		}

		match policy {
			UnscopedPolicy::Exclude => false,
			UnscopedPolicy::Include => self.unscoped.iter().any(|binding| {
				binding.refresh(catch_panics);
				binding.has_error()
			}),
		}
	}

	/// Joined error text of the rules scoped to `name`.
	///
	/// Only the dirty bindings of `name` are evaluated; other properties are
	/// left untouched. Unknown names yield an empty string.
	pub(crate) fn error_for(&self, name: &str, separator: &str, catch_panics: bool) -> String {
		let Some(bindings) = self.scoped.get(name) else {
			return String::new();
		};
		for binding in bindings.iter().filter(|binding| binding.is_dirty()) {
			binding.update(catch_panics);
		}
		join(bindings.iter().filter_map(RuleBinding::error), separator)
	}

	/// Aggregate error text: every failing scoped rule, then every failing
	/// unscoped rule.
	pub(crate) fn error(&self, separator: &str, catch_panics: bool) -> String {
		let failures = self.failures(catch_panics);
		let (scoped, unscoped): (Vec<RuleFailure>, Vec<RuleFailure>) = failures
			.into_iter()
			.partition(|failure| failure.property.is_some());

		let block_a = join(scoped.into_iter().map(|failure| failure.message), separator);
		let block_b = join(unscoped.into_iter().map(|failure| failure.message), separator);
		match (block_a.is_empty(), block_b.is_empty()) {
			(true, _) => block_b,
			(false, true) => block_a,
			(false, false) => [block_a, block_b].join(separator),
		}
	}

	/// Every failing rule, scoped ones first.
	///
	/// Scoped bindings are brought up to date (dirty ones evaluated); unscoped
	/// bindings are always evaluated afresh.
	pub(crate) fn failures(&self, catch_panics: bool) -> Vec<RuleFailure> {
		let mut failures = Vec::new();
		for binding in self.scoped_bindings() {
			binding.update(catch_panics);
			if let Some(message) = binding.error() {
				failures.push(RuleFailure {
					property: binding.scope(),
					message,
				});
			}
		}
		for binding in &self.unscoped {
			binding.refresh(catch_panics);
			if let Some(message) = binding.error() {
				failures.push(RuleFailure {
					property: None,
					message,
				});
			}
		}
		failures
	}
}

fn join(messages: impl Iterator<Item = String>, separator: &str) -> String {
	messages.collect::<Vec<_>>().join(separator)
}
