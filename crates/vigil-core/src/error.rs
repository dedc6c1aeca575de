//! Error types for vigil-core
//!
//! Validation failures are not errors: they are reported as text through the
//! engine's query API. The types here cover caller bugs and configuration
//! problems only.

use crate::notifier::SubscriptionId;

/// Errors raised by [`Notifier`](crate::Notifier) when removing a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NotifierError {
	#[error("cannot unsubscribe {0}: no handlers are subscribed")]
	NoSubscribers(SubscriptionId),
	#[error("subscription {0} is not registered with this notifier")]
	UnknownSubscription(SubscriptionId),
}

/// Errors raised while loading or rendering [`EngineSettings`](crate::EngineSettings).
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("invalid engine settings: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("failed to render engine settings: {0}")]
	Render(#[from] toml::ser::Error),
}
