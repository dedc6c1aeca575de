//! Change notification
//!
//! [`Notifier<E>`] keeps an ordered list of handlers and invokes every one of
//! them, synchronously and in subscription order, each time an event is
//! raised. Handlers are removed through the [`SubscriptionId`] returned by
//! [`Notifier::subscribe`] rather than by comparing closures.
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use vigil_core::{ChangeNotifier, PropertyChanged};
//!
//! let notifier = ChangeNotifier::new();
//! let seen = Rc::new(Cell::new(0));
//!
//! let counter = Rc::clone(&seen);
//! let id = notifier.subscribe(move |_event: &PropertyChanged| counter.set(counter.get() + 1));
//!
//! notifier.notify(&PropertyChanged { name: "Name" });
//! assert_eq!(seen.get(), 1);
//!
//! notifier.unsubscribe(id).unwrap();
//! assert!(notifier.unsubscribe(id).is_err());
//! ```

use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

extern crate alloc;
use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::error::NotifierError;

/// Token identifying one subscription.
///
/// Tokens are unique for the lifetime of the process, so a token issued by one
/// notifier is never accepted by another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
	fn next() -> Self {
		static COUNTER: AtomicU64 = AtomicU64::new(1);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for SubscriptionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Event raised when a stored property value changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyChanged {
	/// Name of the property that changed
	pub name: &'static str,
}

/// Notifier specialised for property changes.
pub type ChangeNotifier = Notifier<PropertyChanged>;

type Handler<E> = Rc<dyn Fn(&E)>;

/// Ordered list of event handlers.
///
/// Cloning a `Notifier` creates a new handle to the **same** handler list.
pub struct Notifier<E: 'static> {
	handlers: Rc<RefCell<Vec<(SubscriptionId, Handler<E>)>>>,
}

impl<E: 'static> Notifier<E> {
	/// Create a notifier with no subscribers.
	pub fn new() -> Self {
		Self {
			handlers: Rc::new(RefCell::new(Vec::new())),
		}
	}

	/// Append `handler` to the subscriber list.
	///
	/// Subscribing the same closure twice creates two independent entries; each
	/// is invoked once per notification.
	pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
	where
		F: Fn(&E) + 'static,
	{
		let id = SubscriptionId::next();
		self.handlers.borrow_mut().push((id, Rc::new(handler)));
		id
	}

	/// Remove the subscription identified by `id`.
	///
	/// # Errors
	///
	/// Returns [`NotifierError::NoSubscribers`] when nothing is subscribed and
	/// [`NotifierError::UnknownSubscription`] when `id` is not in the list.
	/// Both indicate a caller bug.
	pub fn unsubscribe(&self, id: SubscriptionId) -> Result<(), NotifierError> {
		let mut handlers = self.handlers.borrow_mut();
		if handlers.is_empty() {
			return Err(NotifierError::NoSubscribers(id));
		}
		let position = handlers
			.iter()
			.position(|(existing, _)| *existing == id)
			.ok_or(NotifierError::UnknownSubscription(id))?;
		handlers.remove(position);
		Ok(())
	}

	/// Invoke every subscribed handler with `event`, in subscription order.
	///
	/// The handler list is snapshotted first, so handlers may subscribe,
	/// unsubscribe or raise further events without conflicting borrows.
	/// Changes made during a notification apply from the next one on.
	pub fn notify(&self, event: &E) {
		let handlers: Vec<Handler<E>> = self
			.handlers
			.borrow()
			.iter()
			.map(|(_, handler)| Rc::clone(handler))
			.collect();
		for handler in handlers {
			handler(event);
		}
	}

	/// Number of live subscriptions.
	pub fn subscriber_count(&self) -> usize {
		self.handlers.borrow().len()
	}

	/// Whether any handler is subscribed.
	pub fn has_subscribers(&self) -> bool {
		!self.handlers.borrow().is_empty()
	}
}

impl<E: 'static> Clone for Notifier<E> {
	fn clone(&self) -> Self {
		Self {
			handlers: Rc::clone(&self.handlers),
		}
	}
}

impl<E: 'static> Default for Notifier<E> {
	fn default() -> Self {
		Self::new()
	}
}

impl<E: 'static> fmt::Debug for Notifier<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Notifier")
			.field("subscribers", &self.subscriber_count())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::cell::Cell;
	use proptest::prelude::*;
	use rstest::rstest;

	const NAME: PropertyChanged = PropertyChanged { name: "Name" };

	fn recorder(notifier: &ChangeNotifier) -> (Rc<RefCell<Vec<&'static str>>>, SubscriptionId) {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&seen);
		let id = notifier.subscribe(move |event: &PropertyChanged| sink.borrow_mut().push(event.name));
		(seen, id)
	}

	#[rstest]
	fn test_notify_passes_property_name() {
		// Arrange
		let notifier = ChangeNotifier::new();
		let (seen, _id) = recorder(&notifier);

		// Act
		notifier.notify(&NAME);
		notifier.notify(&PropertyChanged { name: "Age" });

		// Assert
		assert_eq!(*seen.borrow(), vec!["Name", "Age"]);
	}

	#[rstest]
	fn test_handlers_run_in_subscription_order() {
		let notifier = ChangeNotifier::new();
		let order = Rc::new(RefCell::new(Vec::new()));

		for label in ["first", "second", "third"] {
			let order = Rc::clone(&order);
			notifier.subscribe(move |_: &PropertyChanged| order.borrow_mut().push(label));
		}
		notifier.notify(&NAME);

		assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
	}

	#[rstest]
	fn test_same_handler_subscribed_twice_runs_twice() {
		// Arrange
		let notifier = ChangeNotifier::new();
		let calls = Rc::new(Cell::new(0));
		let handler = {
			let calls = Rc::clone(&calls);
			Rc::new(move |_: &PropertyChanged| calls.set(calls.get() + 1))
		};

		// Act
		let first = Rc::clone(&handler);
		notifier.subscribe(move |event: &PropertyChanged| first(event));
		let second = Rc::clone(&handler);
		notifier.subscribe(move |event: &PropertyChanged| second(event));
		notifier.notify(&NAME);

		// Assert
		assert_eq!(calls.get(), 2);
	}

	#[rstest]
	fn test_unsubscribe_removes_only_that_entry() {
		let notifier = ChangeNotifier::new();
		let (kept, _kept_id) = recorder(&notifier);
		let (removed, removed_id) = recorder(&notifier);

		notifier.unsubscribe(removed_id).unwrap();
		notifier.notify(&NAME);

		assert_eq!(kept.borrow().len(), 1);
		assert!(removed.borrow().is_empty());
		assert_eq!(notifier.subscriber_count(), 1);
	}

	#[rstest]
	fn test_unsubscribe_on_empty_list_fails() {
		// Arrange
		let other = ChangeNotifier::new();
		let id = other.subscribe(|_: &PropertyChanged| {});
		let notifier = ChangeNotifier::new();

		// Act
		let result = notifier.unsubscribe(id);

		// Assert
		assert_eq!(result, Err(NotifierError::NoSubscribers(id)));
	}

	#[rstest]
	fn test_unsubscribe_unknown_token_fails() {
		let notifier = ChangeNotifier::new();
		let (_seen, id) = recorder(&notifier);
		notifier.unsubscribe(id).unwrap();
		let (_other, _other_id) = recorder(&notifier);

		let result = notifier.unsubscribe(id);

		assert_eq!(result, Err(NotifierError::UnknownSubscription(id)));
	}

	#[rstest]
	fn test_handler_may_unsubscribe_itself_during_notify() {
		// Arrange
		let notifier = ChangeNotifier::new();
		let calls = Rc::new(Cell::new(0));
		let slot: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
		let id = {
			let notifier = notifier.clone();
			let calls = Rc::clone(&calls);
			let slot = Rc::clone(&slot);
			notifier.clone().subscribe(move |_: &PropertyChanged| {
				calls.set(calls.get() + 1);
				if let Some(id) = slot.take() {
					notifier.unsubscribe(id).unwrap();
				}
			})
		};
		slot.set(Some(id));

		// Act
		notifier.notify(&NAME);
		notifier.notify(&NAME);

		// Assert
		assert_eq!(calls.get(), 1);
		assert!(!notifier.has_subscribers());
	}

	proptest! {
		#[test]
		fn prop_each_subscription_invoked_once_per_notify(subscriptions in 0usize..16, fires in 0usize..8) {
			let notifier = ChangeNotifier::new();
			let calls = Rc::new(Cell::new(0usize));
			for _ in 0..subscriptions {
				let calls = Rc::clone(&calls);
				notifier.subscribe(move |_: &PropertyChanged| calls.set(calls.get() + 1));
			}

			for _ in 0..fires {
				notifier.notify(&NAME);
			}

			prop_assert_eq!(calls.get(), subscriptions * fires);
		}
	}
}
