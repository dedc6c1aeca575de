//! # Vigil Command
//!
//! Commands whose enablement follows a [`ValidationEngine`](vigil_core::ValidationEngine),
//! and an explicit queue for raising their can-execute-changed signal from
//! other threads.
//!
//! ## Threading
//!
//! [`Command`] and [`Dispatcher`] are `!Send` and stay on the thread that
//! created them. [`CommandNotifier`] and [`DispatcherHandle`] are `Send + Sync`
//! and only enqueue; delivery happens when the owning thread calls
//! [`Dispatcher::run_pending`].

pub mod command;
pub mod dispatcher;
pub mod error;

pub use command::{CanExecuteChanged, Command, CommandId};
pub use dispatcher::{CommandNotifier, Dispatcher, DispatcherHandle};
pub use error::{CommandError, CommandResult};

/// Re-export commonly used types
pub mod prelude {
	pub use crate::command::{CanExecuteChanged, Command};
	pub use crate::dispatcher::{CommandNotifier, Dispatcher};
	pub use crate::error::CommandError;
}
