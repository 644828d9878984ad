//! # Board
//!
//! The board is the on-screen arrangement of the 16 tiles plus the set of
//! tiles currently chosen by the player. Tile identity is by position, so a
//! shuffle must carry the selection along with the words.

use std::collections::BTreeSet;

use rand::Rng;

use crate::{
	puzzle::{Category, Puzzle, CATEGORY_SIZE},
	shuffle::{remap_selection, smart_shuffle}
};

/// The word layout and selection of a puzzle in play.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Board
{
	/// The words of the puzzle, in on-screen order.
	words: Vec<String>,

	/// The indices of the selected tiles.
	selected: BTreeSet<usize>
}

impl Board
{
	/// Lay out a fresh board for the given puzzle, using the smart shuffle.
	///
	/// # Arguments
	///
	/// * `puzzle` - The puzzle to lay out.
	/// * `rng` - The source of randomness.
	/// * `max_attempts` - The retry budget of the smart shuffle.
	///
	/// # Returns
	///
	/// The new board, with nothing selected.
	pub fn new<R: Rng + ?Sized>(
		puzzle: &Puzzle,
		rng: &mut R,
		max_attempts: usize
	) -> Self
	{
		Self {
			words: smart_shuffle(&puzzle.tagged_words(), rng, max_attempts),
			selected: BTreeSet::new()
		}
	}

	/// Construct a board with an explicit layout, without shuffling. A session
	/// with no puzzle loaded holds the empty board.
	///
	/// # Arguments
	///
	/// * `words` - The words, in on-screen order.
	///
	/// # Returns
	///
	/// The new board, with nothing selected.
	pub fn from_words(words: Vec<String>) -> Self
	{
		Self { words, selected: BTreeSet::new() }
	}

	/// Get the words, in on-screen order.
	#[inline]
	#[must_use]
	pub fn words(&self) -> &[String] { &self.words }

	/// Get the indices of the selected tiles, in ascending order.
	#[inline]
	#[must_use]
	pub fn selected(&self) -> &BTreeSet<usize> { &self.selected }

	/// Check if the tile at the given index is selected.
	#[inline]
	#[must_use]
	pub fn is_selected(&self, index: usize) -> bool
	{
		self.selected.contains(&index)
	}

	/// Get the selected words, in board order.
	///
	/// # Returns
	///
	/// The selected words.
	#[must_use]
	pub fn selected_words(&self) -> Vec<String>
	{
		self.selected.iter()
			.filter_map(|&index| self.words.get(index).cloned())
			.collect()
	}

	/// Toggle the selection of the tile at the given index. Tiles whose words
	/// are already solved cannot be selected, and no more than 4 tiles can be
	/// selected at once.
	///
	/// # Arguments
	///
	/// * `index` - The index of the tile.
	/// * `solved` - The categories solved so far.
	///
	/// # Returns
	///
	/// `true` if the selection changed, `false` if the request was rejected.
	pub fn toggle(&mut self, index: usize, solved: &[Category]) -> bool
	{
		let Some(word) = self.words.get(index) else { return false };
		if self.selected.remove(&index)
		{
			return true
		}
		if self.selected.len() >= CATEGORY_SIZE
			|| solved.iter().any(|c| c.contains(word))
		{
			return false
		}
		self.selected.insert(index)
	}

	/// Clear the selection.
	///
	/// # Returns
	///
	/// `true` if anything was selected, `false` otherwise.
	pub fn clear_selection(&mut self) -> bool
	{
		let changed = !self.selected.is_empty();
		self.selected.clear();
		changed
	}

	/// Reshuffle the board, keeping the selected words selected.
	///
	/// # Arguments
	///
	/// * `puzzle` - The puzzle on the board.
	/// * `rng` - The source of randomness.
	/// * `max_attempts` - The retry budget of the smart shuffle.
	pub fn shuffle<R: Rng + ?Sized>(
		&mut self,
		puzzle: &Puzzle,
		rng: &mut R,
		max_attempts: usize
	)
	{
		let words = smart_shuffle(&puzzle.tagged_words(), rng, max_attempts);
		self.selected = remap_selection(&self.words, &self.selected, &words);
		self.words = words;
	}

	/// Get the tiles that are still in play, i.e., whose words do not belong
	/// to a solved category.
	///
	/// # Arguments
	///
	/// * `solved` - The categories solved so far.
	///
	/// # Returns
	///
	/// The index and word of each unsolved tile, in board order.
	#[must_use]
	pub fn unsolved_tiles<'a>(&'a self, solved: &[Category]) -> Vec<(usize, &'a str)>
	{
		self.words.iter().enumerate()
			.filter(|(_, word)| !solved.iter().any(|c| c.contains(word)))
			.map(|(index, word)| (index, word.as_str()))
			.collect()
	}

	/// Find the board index of the given word.
	///
	/// # Arguments
	///
	/// * `word` - The word to find.
	///
	/// # Returns
	///
	/// The index of the word, if present.
	#[must_use]
	pub fn index_of(&self, word: &str) -> Option<usize>
	{
		self.words.iter().position(|w| w == word)
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
