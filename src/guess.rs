//! # Guess evaluation
//!
//! Scoring a guess is a pure function of the puzzle, the categories already
//! solved, the selected words, and the remaining mistake budget. The
//! [session](crate::session) applies the resulting [`Verdict`].

use crate::{
	notification::NotificationKind,
	puzzle::{Category, Puzzle, CATEGORY_SIZE}
};

/// The outcome of evaluating a guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict
{
	/// No mistakes remain, so no guess can be scored.
	OutOfAttempts,

	/// The guess is exactly a category that was already solved.
	AlreadyFound(usize),

	/// The guess is exactly the category at the given index.
	Correct(usize),

	/// The guess has 3 of the 4 words of some category. Costs a mistake.
	OneAway {
		/// The mistakes remaining after this guess.
		remaining: u8
	},

	/// The guess is wrong. Costs a mistake.
	Miss {
		/// The mistakes remaining after this guess.
		remaining: u8
	}
}

impl Verdict
{
	/// Get the mistakes remaining after applying this verdict.
	///
	/// # Arguments
	///
	/// * `before` - The mistakes remaining before the guess.
	///
	/// # Returns
	///
	/// The mistakes remaining after the guess.
	#[must_use]
	pub fn mistakes_after(&self, before: u8) -> u8
	{
		match *self
		{
			Self::OneAway { remaining } | Self::Miss { remaining } => remaining,
			_ => before
		}
	}

	/// Get the user-facing message for this verdict.
	///
	/// # Arguments
	///
	/// * `puzzle` - The puzzle that was guessed against.
	///
	/// # Returns
	///
	/// The message and its kind.
	#[must_use]
	pub fn message(&self, puzzle: &Puzzle) -> (String, NotificationKind)
	{
		match *self
		{
			Self::OutOfAttempts => (
				"No more attempts remaining! Game Over!".to_string(),
				NotificationKind::Error
			),
			Self::AlreadyFound(_) => (
				"You already found this combination!".to_string(),
				NotificationKind::Error
			),
			Self::Correct(index) => (
				format!("Correct! {}!", puzzle.combinations[index].name),
				NotificationKind::Success
			),
			Self::OneAway { .. } =>
				("One away...".to_string(), NotificationKind::Warning),
			Self::Miss { remaining: 0 } => (
				"Game Over! No more attempts remaining.".to_string(),
				NotificationKind::Error
			),
			Self::Miss { remaining } => (
				format!("Wrong combination. {} attempts remaining.", remaining),
				NotificationKind::Error
			)
		}
	}
}

/// Evaluate a guess. Categories are considered in declared order, and the
/// first match wins. An exact match always takes precedence over a near
/// match. The near match is skipped when only one mistake remains, so that
/// the final miss always exhausts the budget.
///
/// # Arguments
///
/// * `puzzle` - The puzzle being played.
/// * `solved` - The categories solved so far.
/// * `selected` - The selected words.
/// * `mistakes_remaining` - The mistake budget before the guess.
///
/// # Returns
///
/// The verdict.
#[must_use]
pub fn evaluate<T: AsRef<str>>(
	puzzle: &Puzzle,
	solved: &[Category],
	selected: &[T],
	mistakes_remaining: u8
) -> Verdict
{
	if mistakes_remaining == 0
	{
		return Verdict::OutOfAttempts
	}
	if let Some(index) =
		puzzle.combinations.iter().position(|c| c.matches(selected))
	{
		let category = &puzzle.combinations[index];
		return if solved.contains(category) { Verdict::AlreadyFound(index) }
			else { Verdict::Correct(index) }
	}
	let remaining = mistakes_remaining - 1;
	let one_away = puzzle.combinations.iter()
		.any(|c| c.overlap(selected) == CATEGORY_SIZE - 1);
	if one_away && mistakes_remaining > 1
	{
		Verdict::OneAway { remaining }
	}
	else
	{
		Verdict::Miss { remaining }
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
