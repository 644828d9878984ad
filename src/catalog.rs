//! # Catalog
//!
//! Herein is support for loading the puzzle catalog. Puzzles are authored as
//! JSON, but the catalog also maintains a binary cache alongside the JSON to
//! optimize future reads. Every puzzle is validated on every load path, so
//! malformed definitions never reach a [session](crate::session).

use std::{
	collections::HashSet,
	error::Error,
	fmt::{self, Display, Formatter},
	fs::File,
	io::{self, BufReader, Read, Write},
	path::Path
};

use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::puzzle::{Puzzle, PuzzleError};

////////////////////////////////////////////////////////////////////////////////
//                                Definitions.                                //
////////////////////////////////////////////////////////////////////////////////

/// A catalog is an ordered list of validated puzzles with unique numbers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct Catalog
{
	/// The puzzles, in catalog order.
	puzzles: Vec<Puzzle>
}

/// The listing entry for a single puzzle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PuzzleSummary
{
	/// The catalog number of the puzzle.
	pub number: u32,

	/// The display name of the puzzle.
	pub name: String
}

impl Catalog
{
	/// Construct a catalog from the given puzzles.
	///
	/// # Arguments
	///
	/// * `puzzles` - The intended content of the catalog, in catalog order.
	///
	/// # Returns
	///
	/// The validated catalog.
	///
	/// # Errors
	///
	/// * [`CatalogError::Empty`] if there are no puzzles.
	/// * [`CatalogError::Invalid`] if any puzzle is malformed.
	/// * [`CatalogError::DuplicateNumber`] if two puzzles share a number.
	pub fn new(puzzles: Vec<Puzzle>) -> Result<Self, CatalogError>
	{
		let catalog = Self { puzzles };
		catalog.validate()?;
		Ok(catalog)
	}

	/// Check if the catalog is empty.
	///
	/// # Returns
	///
	/// `true` if the catalog is empty, `false` otherwise.
	#[inline]
	#[must_use]
	pub fn is_empty(&self) -> bool { self.puzzles.is_empty() }

	/// List the available puzzles, in catalog order.
	///
	/// # Returns
	///
	/// The number and name of every puzzle.
	#[must_use]
	pub fn list_puzzles(&self) -> Vec<PuzzleSummary>
	{
		self.puzzles.iter()
			.map(|p| PuzzleSummary { number: p.number, name: p.name.clone() })
			.collect()
	}

	/// Load the puzzle with the given number.
	///
	/// # Arguments
	///
	/// * `number` - The catalog number of the puzzle.
	///
	/// # Returns
	///
	/// The requested puzzle.
	///
	/// # Errors
	///
	/// [`CatalogError::NotFound`] if no puzzle has the given number.
	pub fn load(&self, number: u32) -> Result<Puzzle, CatalogError>
	{
		self.puzzles.iter()
			.find(|p| p.number == number)
			.cloned()
			.ok_or(CatalogError::NotFound(number))
	}

	/// Get the number of the first puzzle in catalog order.
	///
	/// # Returns
	///
	/// The number of the first puzzle, if any.
	#[must_use]
	pub fn first(&self) -> Option<u32>
	{
		self.puzzles.first().map(|p| p.number)
	}

	/// Get the number of the puzzle adjacent to the given one, wrapping around
	/// at either end of the catalog.
	///
	/// # Arguments
	///
	/// * `number` - The catalog number of the reference puzzle.
	/// * `forward` - `true` for the next puzzle, `false` for the previous one.
	///
	/// # Returns
	///
	/// The number of the adjacent puzzle, or [`first`](Self::first) if the
	/// reference puzzle is unknown.
	#[must_use]
	pub fn neighbor(&self, number: u32, forward: bool) -> Option<u32>
	{
		let len = self.puzzles.len();
		match self.puzzles.iter().position(|p| p.number == number)
		{
			Some(index) =>
			{
				let next = if forward { (index + 1) % len }
					else { (index + len - 1) % len };
				Some(self.puzzles[next].number)
			},
			None => self.first()
		}
	}

	/// Verify that there is at least one puzzle, every puzzle, and the
	/// uniqueness of puzzle numbers.
	///
	/// # Errors
	///
	/// The first violation found.
	pub fn validate(&self) -> Result<(), CatalogError>
	{
		if self.puzzles.is_empty()
		{
			return Err(CatalogError::Empty)
		}
		let mut numbers = HashSet::with_capacity(self.puzzles.len());
		for puzzle in &self.puzzles
		{
			puzzle.validate().map_err(|error| CatalogError::Invalid {
				number: puzzle.number,
				error
			})?;
			if !numbers.insert(puzzle.number)
			{
				return Err(CatalogError::DuplicateNumber(puzzle.number))
			}
		}
		Ok(())
	}

	/// Open a catalog with the given name. Only the specified directory will
	/// be searched. `name` denotes the catalog file, sans the extension. If a
	/// binary catalog (`<name>.bin`) exists _and_ is newer than the JSON file
	/// (`<name>.json`), it will be read; otherwise, the JSON file will be read
	/// and a binary catalog will be created (to optimize future reads).
	///
	/// # Arguments
	///
	/// * `dir` - The directory to search.
	/// * `name` - The name of the catalog file.
	///
	/// # Returns
	///
	/// The validated catalog.
	///
	/// # Errors
	///
	/// * [`CatalogError::Io`] if the file cannot be opened or read.
	/// * [`CatalogError::Parse`] if the file is not a catalog.
	/// * Any validation error.
	pub fn open<T: AsRef<Path>>(dir: T, name: &str) -> Result<Self, CatalogError>
	{
		let bin_path = dir.as_ref().join(format!("{}.bin", name));
		let json_path = dir.as_ref().join(format!("{}.json", name));
		// Use the binary catalog only if it's newer than the JSON catalog. If
		// anything goes wrong while comparing, fall back to the JSON. The
		// `metadata` call fails if the binary catalog doesn't exist.
		if bin_path
			.metadata()
			.and_then(|m| m.modified())
			.and_then(|bin_time| {
				json_path
					.metadata()
					.and_then(|n| n.modified())
					.map(|json_time| bin_time > json_time)
			})
			.unwrap_or(false)
		{
			match Self::deserialize_from_file(&bin_path)
			{
				Ok(catalog) =>
				{
					trace!("Read binary catalog: {}", bin_path.display());
					return Ok(catalog)
				},
				Err(e) => warn!(
					"Ignoring unreadable binary catalog: {}: {}",
					bin_path.display(),
					e
				)
			}
		}
		let catalog = Self::read_from_file(&json_path)?;
		trace!("Read JSON catalog: {}", json_path.display());
		match catalog.serialize_to_file(&bin_path)
		{
			Ok(_) =>
			{
				trace!("Wrote binary catalog: {}", bin_path.display())
			},
			Err(e) => warn!(
				"Failed to write binary catalog: {}: {}",
				bin_path.display(),
				e
			)
		}
		Ok(catalog)
	}

	/// Construct a catalog from the given JSON text.
	///
	/// # Arguments
	///
	/// * `json` - The JSON text.
	///
	/// # Returns
	///
	/// The validated catalog.
	///
	/// # Errors
	///
	/// * [`CatalogError::Parse`] if the text is not a catalog.
	/// * Any validation error.
	pub fn from_json(json: &str) -> Result<Self, CatalogError>
	{
		let catalog: Self = serde_json::from_str(json)
			.map_err(|e| CatalogError::Parse(e.to_string()))?;
		catalog.validate()?;
		Ok(catalog)
	}

	/// Construct a catalog from the contents of the given JSON file.
	///
	/// # Arguments
	///
	/// * `path` - The target file.
	///
	/// # Returns
	///
	/// The validated catalog.
	///
	/// # Errors
	///
	/// * [`CatalogError::Io`] if the file cannot be opened or read.
	/// * [`CatalogError::Parse`] if the file is not a catalog.
	/// * Any validation error.
	pub fn read_from_file<T: AsRef<Path>>(path: T) -> Result<Self, CatalogError>
	{
		let file = File::open(path)?;
		let mut reader = BufReader::new(file);
		let mut content = String::new();
		reader.read_to_string(&mut content)?;
		Self::from_json(&content)
	}

	/// Deserialize a catalog from the given file. The file must contain a
	/// serialized catalog in [`bincode`](bincode) format.
	///
	/// # Arguments
	///
	/// * `path` - The target file.
	///
	/// # Returns
	///
	/// The validated catalog.
	///
	/// # Errors
	///
	/// * [`CatalogError::Io`] if the file cannot be opened or read.
	/// * [`CatalogError::Parse`] if the file contains invalid data.
	/// * Any validation error.
	pub fn deserialize_from_file<T: AsRef<Path>>(
		path: T
	) -> Result<Self, CatalogError>
	{
		let file = File::open(path)?;
		let mut reader = BufReader::new(file);
		let mut content = Vec::new();
		reader.read_to_end(&mut content)?;
		let catalog: Self = bincode::deserialize(&content)
			.map_err(|e| CatalogError::Parse(e.to_string()))?;
		catalog.validate()?;
		Ok(catalog)
	}

	/// Serialize the catalog to the given file. The catalog is serialized
	/// in [`bincode`](bincode) format.
	///
	/// # Arguments
	///
	/// * `path` - The target file.
	///
	/// # Errors
	///
	/// * [`CatalogError::Io`] if the file cannot be opened or written.
	/// * [`CatalogError::Parse`] if the catalog cannot be serialized.
	pub fn serialize_to_file<T: AsRef<Path>>(
		&self,
		path: T
	) -> Result<(), CatalogError>
	{
		let mut file = File::create(path)?;
		let content = bincode::serialize(self)
			.map_err(|e| CatalogError::Parse(e.to_string()))?;
		file.write_all(&content)?;
		Ok(())
	}
}

/// The complete enumeration of [`Catalog`] errors.
#[derive(Debug)]
pub enum CatalogError
{
	/// The catalog file could not be read or written.
	Io(io::Error),

	/// The catalog file does not contain a catalog.
	Parse(String),

	/// The catalog has no puzzles.
	Empty,

	/// A puzzle in the catalog is malformed.
	Invalid {
		/// The catalog number of the offending puzzle.
		number: u32,

		/// The validation failure.
		error: PuzzleError
	},

	/// Two puzzles share the given number.
	DuplicateNumber(u32),

	/// No puzzle has the given number.
	NotFound(u32)
}

impl From<io::Error> for CatalogError
{
	fn from(e: io::Error) -> Self { Self::Io(e) }
}

impl Display for CatalogError
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		match self
		{
			Self::Io(e) => write!(f, "catalog I/O failed: {}", e),
			Self::Parse(e) => write!(f, "malformed catalog: {}", e),
			Self::Empty => write!(f, "catalog has no puzzles"),
			Self::Invalid { number, error } =>
				write!(f, "puzzle #{} is invalid: {}", number, error),
			Self::DuplicateNumber(number) =>
				write!(f, "puzzle #{} is defined more than once", number),
			Self::NotFound(number) => write!(f, "puzzle #{} not found", number)
		}
	}
}

impl Error for CatalogError
{
	fn source(&self) -> Option<&(dyn Error + 'static)>
	{
		match self
		{
			Self::Io(e) => Some(e),
			Self::Invalid { error, .. } => Some(error),
			_ => None
		}
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
