//! # Vigil
//!
//! Change-notifying property models with validation rules that are
//! re-evaluated only after the properties they depend on are written.
//!
//! ## Core Principles
//!
//! - **Lazy**: a rule runs when an error query needs its outcome, never on
//!   every read
//! - **Scoped**: a write to one property only invalidates the rules scoped to
//!   that property
//! - **Deduplicated**: writing an equal value raises no change notification
//!
//! ## Feature Flags
//!
//! - `rules` - Rule predicate combinators ([`rules`])
//! - `command` - Command adapter and dispatcher queue ([`command`])
//! - `full` (default) - All of the above
//!
//! ## Quick Example
//!
//! ```
//! # #[cfg(feature = "rules")]
//! # {
//! use vigil::prelude::*;
//!
//! const NAME: PropertyKey<String> = PropertyKey::new("Name");
//! const AGE: PropertyKey<u32> = PropertyKey::new("Age");
//!
//! let mut person = ValidationEngine::new();
//! let reader = person.reader();
//!
//! person.add_scoped_rule(
//!     NAME,
//!     doesnt_contain(reader.accessor(NAME, String::new()), " "),
//!     "Name cannot contain spaces",
//! );
//! person.add_scoped_rule(
//!     AGE,
//!     greater_than_or_equals(reader.accessor(AGE, 0), 18),
//!     "Must be 18 or older",
//! );
//!
//! person.set(NAME, "Bob".to_string());
//! person.set(AGE, 20);
//! assert!(!person.has_errors());
//!
//! person.set(NAME, "B ob".to_string());
//! assert_eq!(person.get_error("Name"), "Name cannot contain spaces");
//! # }
//! ```

pub use vigil_core::{
	ChangeNotifier, EngineSettings, Notifier, NotifierError, Predicate, PropertyChanged,
	PropertyKey, PropertyReader, PropertyStore, RuleBinding, RuleFailure, RuleRegistry,
	SettingsError, SubscriptionId, UnscopedPolicy, ValidationEngine,
};

#[cfg(feature = "rules")]
pub use vigil_rules as rules;

#[cfg(feature = "command")]
pub use vigil_command as command;

/// Re-export commonly used types
pub mod prelude {
	pub use vigil_core::prelude::*;

	#[cfg(feature = "rules")]
	pub use vigil_rules::prelude::*;

	#[cfg(feature = "command")]
	pub use vigil_command::prelude::*;
}
