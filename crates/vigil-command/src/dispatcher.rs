//! Owning-context dispatcher
//!
//! Commands and validation engines are single-threaded. When a worker thread
//! learns that a command's guard may have changed, it posts a notice through
//! a [`CommandNotifier`]; the notice waits in the dispatcher's queue until the
//! owning thread calls [`Dispatcher::run_pending`], which raises
//! [`CanExecuteChanged`](crate::CanExecuteChanged) on that thread.
//!
//! ## Example
//!
//! ```
//! use std::thread;
//! use vigil_command::{Command, Dispatcher};
//!
//! let dispatcher = Dispatcher::new();
//! let command = Command::new(|_: &()| {});
//! let notifier = command.notifier(&dispatcher);
//!
//! thread::spawn(move || notifier.notify().unwrap()).join().unwrap();
//!
//! assert_eq!(dispatcher.run_pending(), 1);
//! ```

use core::cell::RefCell;
use core::fmt;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Weak as SyncWeak};

extern crate alloc;
use alloc::rc::Weak;

use parking_lot::Mutex;

use crate::command::{CommandId, Raise};
use crate::error::{CommandError, CommandResult};

type Queue = Mutex<VecDeque<CommandId>>;

/// Queue of can-execute-changed notices, drained on the owning thread.
///
/// `Dispatcher` is `!Send`; it stays on the thread that owns the commands
/// registered with it.
pub struct Dispatcher {
	queue: Arc<Queue>,
	targets: RefCell<HashMap<CommandId, Weak<dyn Raise>>>,
}

impl Dispatcher {
	pub fn new() -> Self {
		Self {
			queue: Arc::new(Mutex::new(VecDeque::new())),
			targets: RefCell::new(HashMap::new()),
		}
	}

	/// A `Send + Sync` handle for posting notices from any thread.
	pub fn handle(&self) -> DispatcherHandle {
		DispatcherHandle {
			queue: Arc::downgrade(&self.queue),
		}
	}

	pub(crate) fn register(&self, command: CommandId, target: Weak<dyn Raise>) -> CommandNotifier {
		let mut targets = self.targets.borrow_mut();
		targets.retain(|_, target| target.strong_count() > 0);
		targets.insert(command, target);
		CommandNotifier {
			command,
			handle: self.handle(),
		}
	}

	/// Number of commands registered and not yet pruned.
	///
	/// Dropped commands are pruned on the next [`Command::notifier`](crate::Command::notifier)
	/// or [`run_pending`](Self::run_pending) call.
	pub fn registered(&self) -> usize {
		self.targets.borrow().len()
	}

	/// Number of notices waiting to be delivered.
	pub fn pending(&self) -> usize {
		self.queue.lock().len()
	}

	/// Deliver every queued notice on the calling thread.
	///
	/// Notices for commands that have been dropped are discarded. Notices
	/// posted while delivering wait for the next call. Returns the number of
	/// notices delivered.
	pub fn run_pending(&self) -> usize {
		let notices = core::mem::take(&mut *self.queue.lock());
		let mut delivered = 0;
		for command in notices {
			let target = self.targets.borrow().get(&command).and_then(Weak::upgrade);
			match target {
				Some(target) => {
					tracing::debug!(%command, "delivering can-execute-changed");
					target.raise();
					delivered += 1;
				}
				None => {
					tracing::debug!(%command, "dropping notice for released command");
				}
			}
		}
		self.targets
			.borrow_mut()
			.retain(|_, target| target.strong_count() > 0);
		delivered
	}
}

impl Default for Dispatcher {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dispatcher")
			.field("pending", &self.pending())
			.field("commands", &self.targets.borrow().len())
			.finish()
	}
}

/// Thread-safe handle to a [`Dispatcher`]'s queue.
///
/// The handle does not keep the dispatcher alive.
#[derive(Clone, Debug)]
pub struct DispatcherHandle {
	queue: SyncWeak<Queue>,
}

impl DispatcherHandle {
	/// Queue a can-execute-changed notice for `command`.
	///
	/// # Errors
	///
	/// Returns [`CommandError::Disposed`] once the dispatcher has been dropped.
	pub fn post(&self, command: CommandId) -> CommandResult<()> {
		let queue = self.queue.upgrade().ok_or(CommandError::Disposed)?;
		queue.lock().push_back(command);
		tracing::debug!(%command, "queued can-execute-changed");
		Ok(())
	}

	/// Whether the dispatcher is still alive.
	pub fn is_alive(&self) -> bool {
		self.queue.strong_count() > 0
	}
}

/// `Send` handle that requests a can-execute-changed notification for one
/// command. Built by [`Command::notifier`](crate::Command::notifier).
#[derive(Clone, Debug)]
pub struct CommandNotifier {
	command: CommandId,
	handle: DispatcherHandle,
}

impl CommandNotifier {
	pub fn command(&self) -> CommandId {
		self.command
	}

	/// Post a notice to the owning dispatcher.
	///
	/// # Errors
	///
	/// Returns [`CommandError::Disposed`] once the dispatcher has been dropped.
	pub fn notify(&self) -> CommandResult<()> {
		self.handle.post(self.command)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::command::Command;
	use core::cell::Cell;
	use rstest::rstest;
	use std::rc::Rc;
	use std::thread;

	fn assert_send_sync<T: Send + Sync>() {}

	fn listen(command: &Command) -> Rc<Cell<u32>> {
		let raised = Rc::new(Cell::new(0));
		let counter = Rc::clone(&raised);
		command.subscribe_can_execute_changed(move |_| counter.set(counter.get() + 1));
		raised
	}

	#[rstest]
	fn test_handles_cross_threads() {
		assert_send_sync::<DispatcherHandle>();
		assert_send_sync::<CommandNotifier>();
	}

	#[rstest]
	fn test_notice_waits_for_run_pending() {
		// Arrange
		let dispatcher = Dispatcher::new();
		let command = Command::new(|_: &()| {});
		let raised = listen(&command);
		let notifier = command.notifier(&dispatcher);

		// Act
		thread::spawn(move || notifier.notify())
			.join()
			.unwrap()
			.unwrap();

		// Assert
		assert_eq!(raised.get(), 0);
		assert_eq!(dispatcher.pending(), 1);
		assert_eq!(dispatcher.run_pending(), 1);
		assert_eq!(raised.get(), 1);
		assert_eq!(dispatcher.pending(), 0);
	}

	#[rstest]
	fn test_notices_from_many_threads_are_all_delivered() {
		// Arrange
		let dispatcher = Dispatcher::new();
		let command = Command::new(|_: &()| {});
		let raised = listen(&command);
		let notifier = command.notifier(&dispatcher);

		// Act
		let workers: Vec<_> = (0..4)
			.map(|_| {
				let notifier = notifier.clone();
				thread::spawn(move || {
					for _ in 0..5 {
						notifier.notify().unwrap();
					}
				})
			})
			.collect();
		for worker in workers {
			worker.join().unwrap();
		}
		let delivered = dispatcher.run_pending();

		// Assert
		assert_eq!(delivered, 20);
		assert_eq!(raised.get(), 20);
	}

	#[rstest]
	fn test_notice_for_dropped_command_is_discarded() {
		let dispatcher = Dispatcher::new();
		let command = Command::new(|_: &()| {});
		let notifier = command.notifier(&dispatcher);
		drop(command);

		notifier.notify().unwrap();

		assert_eq!(dispatcher.run_pending(), 0);
	}

	#[rstest]
	fn test_registering_prunes_dropped_commands() {
		// Arrange
		let dispatcher = Dispatcher::new();
		for _ in 0..10 {
			let command = Command::new(|_: &()| {});
			let _ = command.notifier(&dispatcher);
		}

		// Act
		let survivor = Command::new(|_: &()| {});
		let _notifier = survivor.notifier(&dispatcher);

		// Assert
		assert_eq!(dispatcher.registered(), 1);
	}

	#[rstest]
	fn test_run_pending_prunes_dropped_commands_without_notices() {
		let dispatcher = Dispatcher::new();
		let kept = Command::new(|_: &()| {});
		let _kept_notifier = kept.notifier(&dispatcher);
		let released = Command::new(|_: &()| {});
		let _released_notifier = released.notifier(&dispatcher);
		drop(released);

		assert_eq!(dispatcher.run_pending(), 0);

		assert_eq!(dispatcher.registered(), 1);
	}

	#[rstest]
	fn test_post_after_dispatcher_drop_fails() {
		// Arrange
		let dispatcher = Dispatcher::new();
		let command = Command::new(|_: &()| {});
		let notifier = command.notifier(&dispatcher);
		let handle = dispatcher.handle();

		// Act
		drop(dispatcher);

		// Assert
		assert!(!handle.is_alive());
		assert_eq!(notifier.notify(), Err(CommandError::Disposed));
		assert_eq!(handle.post(command.id()), Err(CommandError::Disposed));
	}

	#[rstest]
	fn test_notice_posted_during_delivery_waits_for_next_run() {
		// Arrange
		let dispatcher = Dispatcher::new();
		let command = Command::new(|_: &()| {});
		let notifier = command.notifier(&dispatcher);
		let reposted = Rc::new(Cell::new(false));
		let flag = Rc::clone(&reposted);
		let again = notifier.clone();
		command.subscribe_can_execute_changed(move |_| {
			if !flag.replace(true) {
				again.notify().unwrap();
			}
		});
		notifier.notify().unwrap();

		// Act
		let first = dispatcher.run_pending();
		let second = dispatcher.run_pending();

		// Assert
		assert_eq!(first, 1);
		assert_eq!(second, 1);
		assert_eq!(dispatcher.run_pending(), 0);
	}
}
