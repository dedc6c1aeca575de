//! Error types for vigil-command

/// Errors raised when handing a notice to a [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
	/// The dispatcher that owns the target command has been dropped
	#[error("dispatcher has been disposed")]
	Disposed,
}

pub type CommandResult<T> = Result<T, CommandError>;
