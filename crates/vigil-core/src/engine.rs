//! Validation engine
//!
//! [`ValidationEngine`] composes a [`PropertyStore`] with a [`RuleRegistry`].
//! Writes go through the engine so that every rule scoped to the written
//! property is marked dirty before the store decides whether the value
//! actually changed. Rule predicates run lazily, when an error query needs
//! their outcome.
//!
//! ## Example
//!
//! ```
//! use vigil_core::{PropertyKey, ValidationEngine};
//!
//! const AGE: PropertyKey<u32> = PropertyKey::new("Age");
//!
//! let mut engine = ValidationEngine::new();
//! let age = engine.reader().accessor(AGE, 0);
//! engine.add_scoped_rule(AGE, move || age() >= 18, "Must be an adult");
//!
//! engine.set(AGE, 12);
//! assert!(engine.has_errors());
//! assert_eq!(engine.get_error("Age"), "Must be an adult");
//!
//! engine.set(AGE, 20);
//! assert!(!engine.has_errors());
//! assert_eq!(engine.error(), "");
//! ```

use core::fmt;

extern crate alloc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::binding::RuleBinding;
use crate::error::NotifierError;
use crate::key::PropertyKey;
use crate::notifier::{ChangeNotifier, PropertyChanged, SubscriptionId};
use crate::registry::{RuleFailure, RuleRegistry};
use crate::settings::EngineSettings;
use crate::store::{PropertyReader, PropertyStore};

/// Property store with dirty-tracked validation rules.
pub struct ValidationEngine {
	store: PropertyStore,
	rules: RuleRegistry,
	settings: EngineSettings,
}

impl ValidationEngine {
	/// Create an engine with default settings.
	pub fn new() -> Self {
		Self::with_settings(EngineSettings::default())
	}

	/// Create an engine with the given settings.
	pub fn with_settings(settings: EngineSettings) -> Self {
		Self {
			store: PropertyStore::new(),
			rules: RuleRegistry::new(),
			settings,
		}
	}

	pub fn settings(&self) -> &EngineSettings {
		&self.settings
	}

	/// Register a rule.
	///
	/// With `scope` set, the rule is re-evaluated only after a write to that
	/// property. Without it, the rule is unscoped and is evaluated afresh by
	/// every aggregate [`error`](Self::error) query.
	pub fn add_rule<P>(&mut self, predicate: P, message: impl Into<String>, scope: Option<&'static str>)
	where
		P: Fn() -> bool + 'static,
	{
		self.rules
			.insert(RuleBinding::new(predicate, message.into(), scope));
	}

	/// Register a rule scoped to `key`.
	pub fn add_scoped_rule<T, P>(&mut self, key: PropertyKey<T>, predicate: P, message: impl Into<String>)
	where
		P: Fn() -> bool + 'static,
	{
		self.add_rule(predicate, message, Some(key.name()));
	}

	/// Register a rule with no property scope.
	pub fn add_unscoped_rule<P>(&mut self, predicate: P, message: impl Into<String>)
	where
		P: Fn() -> bool + 'static,
	{
		self.add_rule(predicate, message, None);
	}

	/// Register a rule whose predicate can fail.
	///
	/// `Ok(false)` reports `message`; `Err(e)` reports `e.to_string()` instead.
	pub fn add_fallible_rule<P, E>(&mut self, predicate: P, message: impl Into<String>, scope: Option<&'static str>)
	where
		P: Fn() -> Result<bool, E> + 'static,
		E: fmt::Display,
	{
		self.rules.insert(RuleBinding::fallible(
			move || predicate().map_err(|fault| fault.to_string()),
			message.into(),
			scope,
		));
	}

	/// Read the value of `key`, materializing `default` if absent.
	pub fn get<T: Clone + 'static>(&self, key: PropertyKey<T>, default: T) -> T {
		self.store.get(key, default)
	}

	/// Write `value` to `key` without forcing a notification.
	///
	/// Returns whether a change notification fired.
	pub fn set<T>(&self, key: PropertyKey<T>, value: T) -> bool
	where
		T: Clone + PartialEq + Default + 'static,
	{
		self.set_with(key, value, false)
	}

	/// Write `value` to `key`.
	///
	/// Every rule scoped to `key` is marked dirty first, even when the store
	/// then drops the write as unchanged. Returns whether a change
	/// notification fired.
	pub fn set_with<T>(&self, key: PropertyKey<T>, value: T, force_update: bool) -> bool
	where
		T: Clone + PartialEq + Default + 'static,
	{
		self.rules.mark_dirty(key.name());
		self.store.set(key, value, force_update)
	}

	/// Whether any scoped rule currently fails.
	///
	/// Unscoped rules take part only under
	/// [`UnscopedPolicy::Include`](crate::UnscopedPolicy::Include).
	pub fn has_errors(&self) -> bool {
		self.rules.has_errors(
			self.settings.unscoped_policy,
			self.settings.catch_predicate_panics,
		)
	}

	/// Joined error text of the rules scoped to the property `name`.
	///
	/// Returns an empty string when the property has no rules or all of them
	/// pass.
	pub fn get_error(&self, name: &str) -> String {
		self.rules.error_for(
			name,
			&self.settings.line_separator,
			self.settings.catch_predicate_panics,
		)
	}

	/// Aggregate error text: failing scoped rules, then failing unscoped
	/// rules.
	pub fn error(&self) -> String {
		self.rules
			.error(&self.settings.line_separator, self.settings.catch_predicate_panics)
	}

	/// Structured view of every failing rule, in the order used by
	/// [`error`](Self::error).
	pub fn errors(&self) -> Vec<RuleFailure> {
		self.rules.failures(self.settings.catch_predicate_panics)
	}

	/// Total number of registered rules, scoped and unscoped.
	pub fn rule_count(&self) -> usize {
		self.rules.len()
	}

	/// Number of rules scoped to the property `name`.
	pub fn scoped_rule_count(&self, name: &str) -> usize {
		self.rules.bindings_for(name).len()
	}

	/// Whether any rule scoped to `name` awaits re-evaluation.
	pub fn is_dirty(&self, name: &str) -> bool {
		self.rules.bindings_for(name).iter().any(RuleBinding::is_dirty)
	}

	/// Mark every scoped rule dirty.
	///
	/// Use this when state read by predicates changed without a property
	/// write.
	pub fn invalidate_all(&self) {
		self.rules.mark_all_dirty();
	}

	pub fn rules(&self) -> &RuleRegistry {
		&self.rules
	}

	/// The property change notifier. Writes still go through [`set_with`](Self::set_with).
	pub fn notifier(&self) -> &ChangeNotifier {
		self.store.notifier()
	}

	/// Read-only handle for rule accessors.
	pub fn reader(&self) -> PropertyReader {
		self.store.reader()
	}

	/// Subscribe to property change notifications.
	pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
	where
		F: Fn(&PropertyChanged) + 'static,
	{
		self.store.notifier().subscribe(handler)
	}

	/// Remove a property change subscription.
	///
	/// # Errors
	///
	/// See [`Notifier::unsubscribe`](crate::Notifier::unsubscribe).
	pub fn unsubscribe(&self, id: SubscriptionId) -> Result<(), NotifierError> {
		self.store.notifier().unsubscribe(id)
	}
}

impl Default for ValidationEngine {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for ValidationEngine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ValidationEngine")
			.field("store", &self.store)
			.field("rules", &self.rules.len())
			.field("settings", &self.settings)
			.finish()
	}
}
