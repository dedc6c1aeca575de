//! Engine settings
//!
//! Settings can be built in code or loaded from a TOML document:
//!
//! ```
//! use vigil_core::{EngineSettings, UnscopedPolicy};
//!
//! let settings = EngineSettings::from_toml_str(
//!     r#"
//!     line_separator = "; "
//!     unscoped_policy = "include"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(settings.line_separator, "; ");
//! assert_eq!(settings.unscoped_policy, UnscopedPolicy::Include);
//! assert!(settings.catch_predicate_panics);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// How rules registered without a property scope take part in
/// [`has_errors`](crate::ValidationEngine::has_errors).
///
/// Unscoped rules always contribute to the aggregate
/// [`error`](crate::ValidationEngine::error) text; this policy only decides
/// whether they can also make `has_errors` return `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnscopedPolicy {
	/// Unscoped rules never affect `has_errors`.
	#[default]
	Exclude,
	/// `has_errors` re-evaluates unscoped rules once every scoped rule passes.
	Include,
}

/// Configuration for a [`ValidationEngine`](crate::ValidationEngine).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSettings {
	/// Separator placed between joined error messages
	#[serde(default = "default_line_separator")]
	pub line_separator: String,

	/// Participation of unscoped rules in `has_errors`
	#[serde(default)]
	pub unscoped_policy: UnscopedPolicy,

	/// Convert panicking predicates into rule failures instead of unwinding
	#[serde(default = "default_catch_predicate_panics")]
	pub catch_predicate_panics: bool,
}

fn default_line_separator() -> String {
	"\n".to_string()
}

fn default_catch_predicate_panics() -> bool {
	true
}

impl EngineSettings {
	/// Parse settings from a TOML document. Missing keys take their defaults.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::Parse`] for malformed TOML, unknown keys or
	/// values of the wrong type.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(source)?)
	}

	/// Render these settings as a TOML document.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::Render`] if serialization fails.
	pub fn to_toml_string(&self) -> Result<String, SettingsError> {
		Ok(toml::to_string(self)?)
	}

	/// Use `separator` between joined error messages.
	pub fn with_line_separator(mut self, separator: impl Into<String>) -> Self {
		self.line_separator = separator.into();
		self
	}

	/// Set how unscoped rules participate in `has_errors`.
	pub fn with_unscoped_policy(mut self, policy: UnscopedPolicy) -> Self {
		self.unscoped_policy = policy;
		self
	}

	/// Choose whether predicate panics are converted into rule failures.
	pub fn with_catch_predicate_panics(mut self, catch: bool) -> Self {
		self.catch_predicate_panics = catch;
		self
	}
}

impl Default for EngineSettings {
	fn default() -> Self {
		Self {
			line_separator: default_line_separator(),
			unscoped_policy: UnscopedPolicy::default(),
			catch_predicate_panics: default_catch_predicate_panics(),
		}
	}
}
