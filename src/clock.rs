//! # Clock
//!
//! Everything time-driven in a session (the reveal sequence and notification
//! visibility) reads the time through a [`Clock`], so that tests can advance
//! virtual time instead of sleeping.

use std::{
	cell::Cell,
	time::{Duration, Instant}
};

/// A source of the current time.
pub trait Clock
{
	/// Get the current time.
	fn now(&self) -> Instant;
}

/// The wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock
{
	#[inline]
	fn now(&self) -> Instant { Instant::now() }
}

/// A clock that only moves when told to.
#[derive(Clone, Debug)]
pub struct ManualClock
{
	/// The current time.
	now: Cell<Instant>
}

impl ManualClock
{
	/// Construct a manual clock that starts at the current wall time.
	#[must_use]
	pub fn new() -> Self
	{
		Self { now: Cell::new(Instant::now()) }
	}

	/// Move the clock forward.
	///
	/// # Arguments
	///
	/// * `duration` - How far to move the clock.
	pub fn advance(&self, duration: Duration)
	{
		self.now.set(self.now.get() + duration);
	}
}

impl Default for ManualClock
{
	fn default() -> Self { Self::new() }
}

impl Clock for ManualClock
{
	#[inline]
	fn now(&self) -> Instant { self.now.get() }
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use super::*;

	/// Ensure that the manual clock stands still until advanced.
	#[test]
	fn test_manual_clock()
	{
		let clock = ManualClock::new();
		let start = clock.now();
		assert_eq!(clock.now(), start);
		clock.advance(Duration::from_millis(250));
		assert_eq!(clock.now() - start, Duration::from_millis(250));
	}
}
