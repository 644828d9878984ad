//! # Smart shuffle
//!
//! The board is laid out by a retry-bounded randomization that avoids placing
//! two words from the same category next to each other. The guarantee is
//! best-effort: after the attempt budget is exhausted, the last shuffle is
//! accepted as-is.

use std::collections::{BTreeSet, HashMap};

use log::trace;
use rand::{seq::SliceRandom, Rng};

/// The default number of uniform shuffles to try before giving up on the
/// no-adjacency goal.
pub const MAX_SHUFFLE_ATTEMPTS: usize = 50;

/// Shuffle the tagged words so that, ideally, no two adjacent positions of the
/// flattened sequence belong to the same category. Each attempt is a uniform
/// Fisher–Yates shuffle of the complete sequence.
///
/// # Arguments
///
/// * `tagged` - The words to shuffle, each tagged with the index of its
///   category.
/// * `rng` - The source of randomness.
/// * `max_attempts` - The maximum number of shuffles to try. At least one
///   shuffle is always performed.
///
/// # Returns
///
/// The shuffled words, without their category tags.
#[must_use]
pub fn smart_shuffle<R: Rng + ?Sized>(
	tagged: &[(String, usize)],
	rng: &mut R,
	max_attempts: usize
) -> Vec<String>
{
	let mut entries = tagged.to_vec();
	let max_attempts = max_attempts.max(1);
	for attempt in 1 ..= max_attempts
	{
		entries.shuffle(rng);
		if !has_adjacent_collision(&entries)
		{
			trace!("smart shuffle succeeded after {} attempt(s)", attempt);
			break
		}
		if attempt == max_attempts
		{
			trace!("smart shuffle gave up after {} attempts", attempt);
		}
	}
	entries.into_iter().map(|(word, _)| word).collect()
}

/// Check whether any two adjacent entries share a category.
///
/// # Arguments
///
/// * `tagged` - The tagged words, in board order.
///
/// # Returns
///
/// `true` if some adjacent pair shares a category, `false` otherwise.
#[must_use]
pub fn has_adjacent_collision(tagged: &[(String, usize)]) -> bool
{
	tagged.windows(2).any(|pair| pair[0].1 == pair[1].1)
}

/// Carry a selection over from one word order to another, so that the same
/// _words_ remain selected at their new positions.
///
/// # Arguments
///
/// * `old_order` - The word order the selection refers to.
/// * `selected` - The selected indices into `old_order`.
/// * `new_order` - The new word order, a permutation of `old_order`.
///
/// # Returns
///
/// The selected indices into `new_order`.
#[must_use]
pub fn remap_selection(
	old_order: &[String],
	selected: &BTreeSet<usize>,
	new_order: &[String]
) -> BTreeSet<usize>
{
	let positions = new_order.iter().enumerate()
		.map(|(index, word)| (word.as_str(), index))
		.collect::<HashMap<_, _>>();
	selected.iter()
		.filter_map(|&index| old_order.get(index))
		.filter_map(|word| positions.get(word.as_str()).copied())
		.collect()
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
