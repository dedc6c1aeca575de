//! # Vigil Core
//!
//! Property storage with change notification, and a validation engine whose
//! rules are re-evaluated only after the properties they are scoped to have
//! been written.
//!
//! ## Modules
//!
//! - [`key`]: statically declared, typed property identifiers
//! - [`store`]: property values and change notification on write
//! - [`notifier`]: ordered handler lists with subscription tokens
//! - [`binding`]: a single rule with its cached outcome
//! - [`registry`]: scoped and unscoped rules and error aggregation
//! - [`engine`]: the store and registry composed behind one API
//! - [`settings`]: engine configuration, loadable from TOML
//!
//! ## Threading
//!
//! Everything here is single-threaded. The engine and store are `!Send`;
//! notifications run inline on the thread that performed the write. Moving
//! notifications to another thread is the job of the command layer.

pub mod binding;
pub mod engine;
pub mod error;
pub mod key;
pub mod notifier;
pub mod registry;
pub mod settings;
pub mod store;

pub use binding::{Predicate, RuleBinding};
pub use engine::ValidationEngine;
pub use error::{NotifierError, SettingsError};
pub use key::PropertyKey;
pub use notifier::{ChangeNotifier, Notifier, PropertyChanged, SubscriptionId};
pub use registry::{RuleFailure, RuleRegistry};
pub use settings::{EngineSettings, UnscopedPolicy};
pub use store::{PropertyReader, PropertyStore};

/// Re-export commonly used types
pub mod prelude {
	pub use crate::engine::ValidationEngine;
	pub use crate::key::PropertyKey;
	pub use crate::notifier::{PropertyChanged, SubscriptionId};
	pub use crate::settings::{EngineSettings, UnscopedPolicy};
	pub use crate::store::{PropertyReader, PropertyStore};
}
