//! # Puzzle
//!
//! A Connections puzzle comprises 16 words partitioned into 4 categories of 4
//! words each. The player must discover the categories by trial and error.
//! Herein are the immutable puzzle definitions and their validation.

use std::{
	collections::HashSet,
	error::Error,
	fmt::{self, Display, Formatter}
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

////////////////////////////////////////////////////////////////////////////////
//                                 Constants.                                 //
////////////////////////////////////////////////////////////////////////////////

/// The number of categories in a puzzle.
pub const CATEGORY_COUNT: usize = 4;

/// The number of words in a category.
pub const CATEGORY_SIZE: usize = 4;

/// The number of tiles on the board.
pub const TILE_COUNT: usize = CATEGORY_COUNT * CATEGORY_SIZE;

////////////////////////////////////////////////////////////////////////////////
//                                   Color.                                   //
////////////////////////////////////////////////////////////////////////////////

/// The color of a category. Colors conventionally denote difficulty, from
/// yellow (easiest) to purple (hardest). Unrecognized colors are preserved
/// verbatim, so that a hand-authored puzzle with an unusual color still loads.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color
{
	Yellow,
	Green,
	Blue,
	Purple,

	/// Any other color, by name.
	Unknown(String)
}

impl Color
{
	/// Get the canonical name of the color.
	///
	/// # Returns
	///
	/// The lowercase color name.
	#[must_use]
	pub fn name(&self) -> &str
	{
		match self
		{
			Self::Yellow => "yellow",
			Self::Green => "green",
			Self::Blue => "blue",
			Self::Purple => "purple",
			Self::Unknown(name) => name.as_str()
		}
	}
}

impl From<&str> for Color
{
	fn from(name: &str) -> Self
	{
		match name
		{
			"yellow" => Self::Yellow,
			"green" => Self::Green,
			"blue" => Self::Blue,
			"purple" => Self::Purple,
			other => Self::Unknown(other.to_string())
		}
	}
}

impl Display for Color
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		write!(f, "{}", self.name())
	}
}

impl Serialize for Color
{
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>
	{
		serializer.serialize_str(self.name())
	}
}

impl<'de> Deserialize<'de> for Color
{
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error>
	{
		let name = String::deserialize(deserializer)?;
		Ok(Self::from(name.as_str()))
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                 Category.                                  //
////////////////////////////////////////////////////////////////////////////////

/// A set of exactly 4 words sharing a hidden theme. Categories compare by
/// value, which is how solved categories are matched after a round trip
/// through persistent storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category
{
	/// The words of the category, in authoring order.
	pub words: Vec<String>,

	/// The name of the category, i.e., the hidden theme.
	#[serde(rename = "category")]
	pub name: String,

	/// The color of the category.
	pub color: Color
}

impl Category
{
	/// Construct a category.
	///
	/// # Arguments
	///
	/// * `name` - The name of the category.
	/// * `color` - The color of the category.
	/// * `words` - The words of the category.
	///
	/// # Returns
	///
	/// The new category. It is not validated until it becomes part of a
	/// [`Puzzle`].
	#[must_use]
	pub fn new<T: AsRef<str>>(name: &str, color: Color, words: &[T]) -> Self
	{
		Self {
			words: words.iter().map(|w| w.as_ref().to_string()).collect(),
			name: name.to_string(),
			color
		}
	}

	/// Check if the category contains the given word.
	///
	/// # Arguments
	///
	/// * `word` - The word to check.
	///
	/// # Returns
	///
	/// `true` if the category contains the word, `false` otherwise.
	#[inline]
	#[must_use]
	pub fn contains(&self, word: &str) -> bool
	{
		self.words.iter().any(|w| w == word)
	}

	/// Count how many of the given words belong to the category.
	///
	/// # Arguments
	///
	/// * `words` - The candidate words.
	///
	/// # Returns
	///
	/// The size of the overlap.
	#[must_use]
	pub fn overlap<T: AsRef<str>>(&self, words: &[T]) -> usize
	{
		words.iter().filter(|w| self.contains(w.as_ref())).count()
	}

	/// Check if the given words are exactly the words of the category, in any
	/// order.
	///
	/// # Arguments
	///
	/// * `words` - The candidate words.
	///
	/// # Returns
	///
	/// `true` if the candidate words and the category words are equal as
	/// sets, `false` otherwise.
	#[must_use]
	pub fn matches<T: AsRef<str>>(&self, words: &[T]) -> bool
	{
		words.iter().all(|w| self.contains(w.as_ref()))
			&& self.words.iter()
				.all(|w| words.iter().any(|x| x.as_ref() == w))
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                  Puzzle.                                   //
////////////////////////////////////////////////////////////////////////////////

/// An immutable puzzle definition. Construct via [`Puzzle::new`] or via the
/// [catalog](crate::catalog::Catalog); both paths validate the definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct Puzzle
{
	/// The catalog number of the puzzle, unique within its catalog.
	pub number: u32,

	/// The display name of the puzzle.
	pub name: String,

	/// The categories of the puzzle, in declared order. Declared order breaks
	/// ties during guess evaluation.
	pub combinations: Vec<Category>
}

impl Puzzle
{
	/// Construct and validate a puzzle.
	///
	/// # Arguments
	///
	/// * `number` - The catalog number of the puzzle.
	/// * `name` - The display name of the puzzle.
	/// * `combinations` - The categories of the puzzle.
	///
	/// # Returns
	///
	/// The validated puzzle.
	///
	/// # Errors
	///
	/// [`PuzzleError`] if the definition violates any structural invariant.
	pub fn new(
		number: u32,
		name: &str,
		combinations: Vec<Category>
	) -> Result<Self, PuzzleError>
	{
		let puzzle = Self { number, name: name.to_string(), combinations };
		puzzle.validate()?;
		Ok(puzzle)
	}

	/// Verify the structural invariants of the puzzle:
	///
	/// * The name is not blank.
	/// * There are exactly 4 categories.
	/// * Every category has a non-blank name and exactly 4 non-blank words.
	/// * No word appears twice anywhere in the puzzle, so the union of all
	///   category words has exactly 16 members.
	///
	/// # Errors
	///
	/// The first violation found.
	pub fn validate(&self) -> Result<(), PuzzleError>
	{
		if self.name.trim().is_empty()
		{
			return Err(PuzzleError::BlankName)
		}
		if self.combinations.len() != CATEGORY_COUNT
		{
			return Err(PuzzleError::CategoryCount(self.combinations.len()))
		}
		let mut seen = HashSet::with_capacity(TILE_COUNT);
		for category in &self.combinations
		{
			if category.name.trim().is_empty()
			{
				return Err(PuzzleError::BlankName)
			}
			if category.words.len() != CATEGORY_SIZE
			{
				return Err(PuzzleError::WordCount {
					category: category.name.clone(),
					count: category.words.len()
				})
			}
			for word in &category.words
			{
				if word.trim().is_empty()
				{
					return Err(PuzzleError::BlankWord(category.name.clone()))
				}
				if !seen.insert(word.as_str())
				{
					return Err(PuzzleError::DuplicateWord(word.clone()))
				}
			}
		}
		Ok(())
	}

	/// Get all 16 words of the puzzle, tagged with the index of the category
	/// that owns them, in declared order.
	///
	/// # Returns
	///
	/// The tagged words.
	#[must_use]
	pub fn tagged_words(&self) -> Vec<(String, usize)>
	{
		self.combinations.iter().enumerate()
			.flat_map(|(index, category)| {
				category.words.iter().map(move |w| (w.clone(), index))
			})
			.collect()
	}

	/// Find the category that owns the given word.
	///
	/// # Arguments
	///
	/// * `word` - The word to look up.
	///
	/// # Returns
	///
	/// The index of the owning category, if any.
	#[must_use]
	pub fn category_of(&self, word: &str) -> Option<usize>
	{
		self.combinations.iter().position(|c| c.contains(word))
	}
}

/// The complete enumeration of [`Puzzle`] validation errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PuzzleError
{
	/// The puzzle or one of its categories has a blank name.
	BlankName,

	/// The puzzle does not have exactly 4 categories.
	CategoryCount(usize),

	/// A category does not have exactly 4 words.
	WordCount {
		/// The name of the offending category.
		category: String,

		/// The actual number of words.
		count: usize
	},

	/// A category contains a blank word.
	BlankWord(String),

	/// A word occurs more than once in the puzzle.
	DuplicateWord(String)
}

impl Display for PuzzleError
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		match self
		{
			Self::BlankName => write!(f, "blank puzzle or category name"),
			Self::CategoryCount(count) => write!(
				f,
				"expected {} categories, found {}",
				CATEGORY_COUNT,
				count
			),
			Self::WordCount { category, count } => write!(
				f,
				"category \"{}\": expected {} words, found {}",
				category,
				CATEGORY_SIZE,
				count
			),
			Self::BlankWord(category) =>
				write!(f, "category \"{}\" contains a blank word", category),
			Self::DuplicateWord(word) =>
				write!(f, "word \"{}\" occurs more than once", word)
		}
	}
}

impl Error for PuzzleError {}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
pub(crate) mod test
{
	use super::*;

	/// The fruit puzzle used throughout the tests. Every category is a kind
	/// of fruit, so only memorization helps.
	#[must_use]
	pub(crate) fn fruit_puzzle() -> Puzzle
	{
		Puzzle::new(
			1,
			"Fruit Salad",
			vec![
				Category::new(
					"Common Fruits",
					Color::Yellow,
					&["APPLE", "BANANA", "ORANGE", "GRAPE"]
				),
				Category::new(
					"More Fruits",
					Color::Green,
					&["KIWI", "MANGO", "PEACH", "PEAR"]
				),
				Category::new(
					"Even More Fruits",
					Color::Blue,
					&["PLUM", "LEMON", "LIME", "CHERRY"]
				),
				Category::new(
					"Even More Different Fruits",
					Color::Purple,
					&["FIG", "DATE", "MELON", "BERRY"]
				)
			]
		).unwrap()
	}

	/// Ensure that a well-formed puzzle validates and exposes its 16 tagged
	/// words in declared order.
	#[test]
	fn test_valid_puzzle()
	{
		let puzzle = fruit_puzzle();
		let tagged = puzzle.tagged_words();
		assert_eq!(tagged.len(), TILE_COUNT);
		assert_eq!(tagged[0], ("APPLE".to_string(), 0));
		assert_eq!(tagged[15], ("BERRY".to_string(), 3));
		assert_eq!(puzzle.category_of("LIME"), Some(2));
		assert_eq!(puzzle.category_of("DURIAN"), None);
	}

	/// Ensure that every structural violation is detected.
	#[test]
	fn test_invalid_puzzles()
	{
		let good = fruit_puzzle();

		let mut puzzle = good.clone();
		puzzle.combinations.pop();
		assert_eq!(puzzle.validate(), Err(PuzzleError::CategoryCount(3)));

		let mut puzzle = good.clone();
		puzzle.combinations[1].words.pop();
		assert_eq!(
			puzzle.validate(),
			Err(PuzzleError::WordCount {
				category: "More Fruits".to_string(),
				count: 3
			})
		);

		let mut puzzle = good.clone();
		puzzle.combinations[3].words[0] = "APPLE".to_string();
		assert_eq!(
			puzzle.validate(),
			Err(PuzzleError::DuplicateWord("APPLE".to_string()))
		);

		let mut puzzle = good.clone();
		puzzle.combinations[2].words[1] = "  ".to_string();
		assert_eq!(
			puzzle.validate(),
			Err(PuzzleError::BlankWord("Even More Fruits".to_string()))
		);

		let mut puzzle = good;
		puzzle.name = String::new();
		assert_eq!(puzzle.validate(), Err(PuzzleError::BlankName));
	}

	/// Ensure that exact and partial matching treat the candidate words as a
	/// set.
	#[test]
	fn test_matching()
	{
		let puzzle = fruit_puzzle();
		let common = &puzzle.combinations[0];
		assert!(common.matches(&["GRAPE", "APPLE", "ORANGE", "BANANA"]));
		assert!(!common.matches(&["GRAPE", "APPLE", "ORANGE", "KIWI"]));
		assert!(!common.matches(&["GRAPE", "APPLE", "ORANGE"]));
		assert_eq!(common.overlap(&["GRAPE", "APPLE", "ORANGE", "KIWI"]), 3);
		assert_eq!(common.overlap(&["FIG", "DATE", "MELON", "KIWI"]), 0);
	}

	/// Ensure that colors round-trip through their names, including unknown
	/// colors.
	#[test]
	fn test_color_names()
	{
		assert_eq!(Color::from("purple"), Color::Purple);
		assert_eq!(
			Color::from("teal"),
			Color::Unknown("teal".to_string())
		);
		assert_eq!(Color::Unknown("teal".to_string()).to_string(), "teal");
		let json = serde_json::to_string(&Color::Blue).unwrap();
		assert_eq!(json, "\"blue\"");
		let color: Color = serde_json::from_str("\"magenta\"").unwrap();
		assert_eq!(color, Color::Unknown("magenta".to_string()));
	}
}
