//! # Share text
//!
//! A spoiler-free summary of a finished game, suitable for pasting into a
//! chat: one row of colored squares per category in the order solved, a row
//! of crosses for the mistakes, and a bonus line for a perfect reverse sweep.

use crate::{
	puzzle::{Category, Color, CATEGORY_COUNT, CATEGORY_SIZE},
	session::MISTAKE_BUDGET,
	store::SavedState
};

/// The first line of every share text.
pub const SHARE_HEADER: &str = "Connections";

/// The link that follows the header.
pub const SHARE_URL: &str = "https://example.com/connections";

/// The bonus line for solving purple, blue, green, yellow without mistakes.
pub const REVERSE_SWEEP: &str = "Reverse Sweep!!!";

/// The square that represents a category of the given color.
///
/// # Arguments
///
/// * `color` - The category color.
///
/// # Returns
///
/// The colored square.
#[must_use]
pub fn square(color: &Color) -> char
{
	match color
	{
		Color::Yellow => '🟨',
		Color::Green => '🟩',
		Color::Blue => '🟦',
		Color::Purple => '🟪',
		Color::Unknown(_) => '⬜'
	}
}

/// Check whether the solve order is a reverse sweep: all 4 categories found,
/// hardest first, with no mistakes.
///
/// # Arguments
///
/// * `solved` - The solved categories, in the order found.
/// * `mistakes_remaining` - The remaining mistake budget.
///
/// # Returns
///
/// `true` for a reverse sweep, `false` otherwise.
#[must_use]
pub fn is_reverse_sweep(solved: &[Category], mistakes_remaining: u8) -> bool
{
	const ORDER: [Color; 4] =
		[Color::Purple, Color::Blue, Color::Green, Color::Yellow];
	mistakes_remaining == MISTAKE_BUDGET
		&& solved.len() == ORDER.len()
		&& solved.iter().zip(ORDER.iter()).all(|(c, o)| &c.color == o)
}

/// Build the share text.
///
/// # Arguments
///
/// * `solved` - The solved categories, in the order found.
/// * `mistakes_remaining` - The remaining mistake budget.
///
/// # Returns
///
/// The share text, with lines separated by `\n`.
#[must_use]
pub fn share_text(solved: &[Category], mistakes_remaining: u8) -> String
{
	let mut lines = vec![SHARE_HEADER.to_string(), SHARE_URL.to_string()];
	lines.push(String::new());
	for category in solved
	{
		lines.push(square(&category.color).to_string().repeat(CATEGORY_SIZE));
	}
	let mistakes = MISTAKE_BUDGET.saturating_sub(mistakes_remaining);
	if mistakes > 0
	{
		lines.push("❌".repeat(mistakes as usize));
	}
	if is_reverse_sweep(solved, mistakes_remaining)
	{
		lines.push(REVERSE_SWEEP.to_string());
	}
	lines.join("\n")
}

/// Build the share text from a saved record, provided that the game it
/// records is finished.
///
/// # Arguments
///
/// * `state` - The saved record.
///
/// # Returns
///
/// The share text, or `None` if the game is still in progress.
#[must_use]
pub fn saved_share_text(state: &SavedState) -> Option<String>
{
	let finished = state.solved.len() == CATEGORY_COUNT
		|| state.mistakes_remaining == 0;
	finished.then(|| share_text(&state.solved, state.mistakes_remaining))
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use super::*;
	use crate::puzzle::test::fruit_puzzle;

	/// Ensure the layout of a game won in declared order with one mistake.
	#[test]
	fn test_share_text()
	{
		let puzzle = fruit_puzzle();
		let text = share_text(&puzzle.combinations, 3);
		let lines = text.lines().collect::<Vec<_>>();
		assert_eq!(
			lines,
			vec![
				SHARE_HEADER,
				SHARE_URL,
				"",
				"🟨🟨🟨🟨",
				"🟩🟩🟩🟩",
				"🟦🟦🟦🟦",
				"🟪🟪🟪🟪",
				"❌"
			]
		);
	}

	/// Ensure that the bonus line appears only for a flawless reverse sweep.
	#[test]
	fn test_reverse_sweep()
	{
		let puzzle = fruit_puzzle();
		let mut reversed = puzzle.combinations.clone();
		reversed.reverse();
		let text = share_text(&reversed, 4);
		assert!(!text.contains('❌'));
		let lines = text.lines().collect::<Vec<_>>();
		assert_eq!(lines.len(), 8);
		assert_eq!(lines[6], "🟨🟨🟨🟨");
		assert_eq!(lines[7], REVERSE_SWEEP);

		// A flawless game leaves no line for mistakes.
		let text = share_text(&puzzle.combinations, 4);
		let lines = text.lines().collect::<Vec<_>>();
		assert_eq!(lines.len(), 7);
		assert_eq!(lines[6], "🟪🟪🟪🟪");

		assert!(!share_text(&reversed, 3).contains(REVERSE_SWEEP));
		assert!(!share_text(&puzzle.combinations, 4).contains(REVERSE_SWEEP));
		assert!(!share_text(&reversed[..3], 4).contains(REVERSE_SWEEP));
	}

	/// Ensure that unknown colors are shared as white squares, and that a lost
	/// game shows every mistake.
	#[test]
	fn test_unknown_color_and_loss()
	{
		let category = Category::new(
			"Odd",
			Color::Unknown("teal".to_string()),
			&["A", "B", "C", "D"]
		);
		let text = share_text(&[category], 0);
		assert!(text.contains("⬜⬜⬜⬜"));
		assert!(text.ends_with("❌❌❌❌"));
	}

	/// Ensure that only finished records can be shared.
	#[test]
	fn test_saved_share_text()
	{
		let puzzle = fruit_puzzle();
		let partial = SavedState::new(1, 2, puzzle.combinations[..2].to_vec());
		assert_eq!(saved_share_text(&partial), None);
		let lost = SavedState { mistakes_remaining: 0, ..partial };
		assert!(saved_share_text(&lost).unwrap().ends_with("❌❌❌❌"));
		let won = SavedState::new(1, 4, puzzle.combinations.clone());
		assert_eq!(
			saved_share_text(&won),
			Some(share_text(&puzzle.combinations, 4))
		);
	}
}
