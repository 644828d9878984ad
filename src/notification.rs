//! # Notifications
//!
//! Ephemeral user-facing messages. A message becomes visible after a short
//! delay and disappears on its own after a fixed duration. The delay forces a
//! visible re-trigger even when the same message is shown twice in a row.

use std::{
	fmt::{self, Display, Formatter},
	rc::Rc,
	time::{Duration, Instant}
};

use log::debug;

use crate::clock::Clock;

/// The default delay between a request to show a message and its appearance.
pub const NOTIFICATION_DELAY: Duration = Duration::from_millis(100);

/// The default time that a message remains visible.
pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(2000);

/// The severity of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationKind
{
	Success,
	Warning,
	Error
}

/// A message for the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification
{
	/// The text of the message.
	pub message: String,

	/// The severity of the message.
	pub kind: NotificationKind
}

impl Display for Notification
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		write!(f, "{}", self.message)
	}
}

/// A sink for notifications. Showing is fire-and-forget.
pub trait NotificationChannel
{
	/// Show a message, replacing any message currently visible.
	///
	/// # Arguments
	///
	/// * `message` - The text of the message.
	/// * `kind` - The severity of the message.
	fn show(&mut self, message: &str, kind: NotificationKind);
}

/// The state of the [`Notifier`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotifierState
{
	/// Nothing is shown.
	Idle,

	/// A message is waiting for its delay to elapse.
	Pending {
		/// The message.
		notification: Notification,

		/// When the message becomes visible.
		at: Instant
	},

	/// A message is visible.
	Showing {
		/// The message.
		notification: Notification,

		/// When the message disappears.
		until: Instant
	}
}

/// The notification state machine: `Idle → Pending → Showing → Idle`. Time
/// moves only when [`update`](Self::update) is called.
pub struct Notifier
{
	/// The source of the current time.
	clock: Rc<dyn Clock>,

	/// The delay before a message becomes visible.
	delay: Duration,

	/// How long a message remains visible.
	duration: Duration,

	/// The current state.
	state: NotifierState,

	/// The most recently requested message, visible or not.
	last: Option<Notification>
}

impl Notifier
{
	/// Construct an idle notifier.
	///
	/// # Arguments
	///
	/// * `clock` - The source of the current time.
	/// * `delay` - The delay before a message becomes visible.
	/// * `duration` - How long a message remains visible.
	///
	/// # Returns
	///
	/// The new notifier.
	#[must_use]
	pub fn new(clock: Rc<dyn Clock>, delay: Duration, duration: Duration) -> Self
	{
		Self { clock, delay, duration, state: NotifierState::Idle, last: None }
	}

	/// Get the current state.
	#[inline]
	#[must_use]
	pub fn state(&self) -> &NotifierState { &self.state }

	/// Get the most recently requested message, whether or not it is still
	/// visible.
	#[inline]
	#[must_use]
	pub fn last(&self) -> Option<&Notification> { self.last.as_ref() }

	/// Get the visible message, if any.
	#[must_use]
	pub fn visible(&self) -> Option<&Notification>
	{
		match &self.state
		{
			NotifierState::Showing { notification, until }
				if self.clock.now() < *until => Some(notification),
			_ => None
		}
	}

	/// Advance the state machine to the current time.
	pub fn update(&mut self)
	{
		let now = self.clock.now();
		let state = std::mem::replace(&mut self.state, NotifierState::Idle);
		self.state = match state
		{
			NotifierState::Pending { notification, at } if now >= at =>
			{
				let until = at + self.duration;
				if now < until
				{
					NotifierState::Showing { notification, until }
				}
				else
				{
					NotifierState::Idle
				}
			},
			NotifierState::Showing { until, .. } if now >= until =>
				NotifierState::Idle,
			state => state
		};
	}

	/// Dismiss any pending or visible message.
	pub fn dismiss(&mut self)
	{
		self.state = NotifierState::Idle;
	}
}

impl NotificationChannel for Notifier
{
	fn show(&mut self, message: &str, kind: NotificationKind)
	{
		debug!("notify ({:?}): {}", kind, message);
		let notification = Notification { message: message.to_string(), kind };
		self.last = Some(notification.clone());
		self.state = NotifierState::Pending {
			notification,
			at: self.clock.now() + self.delay
		};
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
