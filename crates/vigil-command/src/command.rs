//! Commands
//!
//! A [`Command`] pairs an action with an optional guard deciding whether the
//! action may run. Listeners subscribe to [`CanExecuteChanged`] to learn when
//! the guard's answer may have changed, typically after a property write on
//! the validation engine the guard reads.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use vigil_command::Command;
//! use vigil_core::{PropertyKey, ValidationEngine};
//!
//! const NAME: PropertyKey<String> = PropertyKey::new("Name");
//!
//! let mut engine = ValidationEngine::new();
//! let name = engine.reader().accessor(NAME, String::new());
//! engine.add_scoped_rule(NAME, move || !name().is_empty(), "Name required");
//!
//! let save = Command::validated(Rc::new(engine), |_: &()| {});
//! assert!(!save.can_execute(&()));
//! assert!(!save.execute(&()));
//! ```

use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

extern crate alloc;
use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;

use vigil_core::{ChangeNotifier, Notifier, NotifierError, SubscriptionId, ValidationEngine};

use crate::dispatcher::{CommandNotifier, Dispatcher};

/// Identifier of one command, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandId(u64);

impl CommandId {
	fn next() -> Self {
		static COUNTER: AtomicU64 = AtomicU64::new(1);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for CommandId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "command#{}", self.0)
	}
}

/// Event raised when a command's guard may answer differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanExecuteChanged {
	pub command: CommandId,
}

type Action<P> = Box<dyn Fn(&P)>;
type Guard<P> = Box<dyn Fn(&P) -> bool>;

pub(crate) trait Raise {
	fn raise(&self);
}

struct CommandInner<P: 'static> {
	id: CommandId,
	execute: Action<P>,
	can_execute: Option<Guard<P>>,
	changed: Notifier<CanExecuteChanged>,
	bindings: RefCell<Vec<(ChangeNotifier, SubscriptionId)>>,
}

impl<P: 'static> Raise for CommandInner<P> {
	fn raise(&self) {
		self.changed.notify(&CanExecuteChanged { command: self.id });
	}
}

// Engine subscriptions die with the command.
impl<P: 'static> Drop for CommandInner<P> {
	fn drop(&mut self) {
		for (notifier, id) in self.bindings.get_mut().drain(..) {
			if let Err(error) = notifier.unsubscribe(id) {
				tracing::trace!(command = %self.id, %error, "engine binding already removed");
			}
		}
	}
}

/// An action with an optional guard, parameterised by `P`.
///
/// Cloning a `Command` creates a new handle to the same command. Commands are
/// `!Send`: they live on the thread that created them, and other threads reach
/// them through a [`CommandNotifier`].
pub struct Command<P: 'static = ()> {
	inner: Rc<CommandInner<P>>,
}

impl<P: 'static> Command<P> {
	/// Create a command that is always enabled.
	pub fn new<E>(execute: E) -> Self
	where
		E: Fn(&P) + 'static,
	{
		Self::build(Box::new(execute), None)
	}

	/// Create a command enabled only while `can_execute` returns `true`.
	pub fn guarded<E, G>(execute: E, can_execute: G) -> Self
	where
		E: Fn(&P) + 'static,
		G: Fn(&P) -> bool + 'static,
	{
		Self::build(Box::new(execute), Some(Box::new(can_execute)))
	}

	/// Create a command enabled while `engine` reports no errors.
	///
	/// The command is also bound to `engine`, so every property change raises
	/// [`CanExecuteChanged`].
	pub fn validated<E>(engine: Rc<ValidationEngine>, execute: E) -> Self
	where
		E: Fn(&P) + 'static,
	{
		let guard = Rc::clone(&engine);
		let command = Self::guarded(execute, move |_: &P| !guard.has_errors());
		command.bind_to(&engine);
		command
	}

	fn build(execute: Action<P>, can_execute: Option<Guard<P>>) -> Self {
		Self {
			inner: Rc::new(CommandInner {
				id: CommandId::next(),
				execute,
				can_execute,
				changed: Notifier::new(),
				bindings: RefCell::new(Vec::new()),
			}),
		}
	}

	pub fn id(&self) -> CommandId {
		self.inner.id
	}

	/// Whether the command may run with `parameter`. Commands without a guard
	/// are always enabled.
	pub fn can_execute(&self, parameter: &P) -> bool {
		self.inner
			.can_execute
			.as_ref()
			.is_none_or(|guard| guard(parameter))
	}

	/// Run the action if the guard allows it. Returns whether it ran.
	pub fn execute(&self, parameter: &P) -> bool {
		if !self.can_execute(parameter) {
			tracing::debug!(command = %self.inner.id, "execute skipped: command disabled");
			return false;
		}
		(self.inner.execute)(parameter);
		true
	}

	/// Subscribe to can-execute-changed notifications.
	pub fn subscribe_can_execute_changed<F>(&self, handler: F) -> SubscriptionId
	where
		F: Fn(&CanExecuteChanged) + 'static,
	{
		self.inner.changed.subscribe(handler)
	}

	/// Remove a can-execute-changed subscription.
	///
	/// # Errors
	///
	/// Returns a [`NotifierError`] when `id` is not subscribed to this command.
	pub fn unsubscribe_can_execute_changed(&self, id: SubscriptionId) -> Result<(), NotifierError> {
		self.inner.changed.unsubscribe(id)
	}

	/// Notify listeners, inline on the calling thread.
	pub fn raise_can_execute_changed(&self) {
		self.inner.raise();
	}

	/// Raise [`CanExecuteChanged`] after every property change on `engine`.
	///
	/// The subscription holds the command weakly and is removed from the
	/// engine when the last handle to the command is dropped. Returns the
	/// engine subscription so the caller can remove it earlier.
	pub fn bind_to(&self, engine: &ValidationEngine) -> SubscriptionId {
		let command: Weak<CommandInner<P>> = Rc::downgrade(&self.inner);
		let id = engine.subscribe(move |event| {
			if let Some(command) = command.upgrade() {
				tracing::trace!(command = %command.id, property = event.name, "property changed, requerying");
				command.raise();
			}
		});
		self.inner
			.bindings
			.borrow_mut()
			.push((engine.notifier().clone(), id));
		id
	}

	/// Register this command with `dispatcher` and return a `Send` handle that
	/// other threads use to request a [`CanExecuteChanged`] notification.
	pub fn notifier(&self, dispatcher: &Dispatcher) -> CommandNotifier {
		let target: Weak<dyn Raise> = Rc::downgrade(&self.inner) as Weak<CommandInner<P>>;
		dispatcher.register(self.inner.id, target)
	}
}

impl<P: 'static> Clone for Command<P> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<P: 'static> fmt::Debug for Command<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Command")
			.field("id", &self.inner.id)
			.field("guarded", &self.inner.can_execute.is_some())
			.field("listeners", &self.inner.changed.subscriber_count())
			.finish()
	}
}
