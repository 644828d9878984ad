//! # Persistence
//!
//! Herein is the persistence contract of a session: one record per puzzle
//! number, holding the mistake budget, the categories solved (in the order
//! found), and when the puzzle was last played. Persistence is best-effort.
//! Failures are logged and swallowed, never surfaced to the player.
//!
//! Records carry no schema version. A future change to the record layout
//! will need to treat unparseable records as absent, which is what
//! [`PersistenceStore::load`] already does.

use std::{
	collections::HashMap,
	error::Error,
	fmt::{self, Display, Formatter},
	fs,
	io::{self, ErrorKind},
	path::{Path, PathBuf},
	time::{SystemTime, UNIX_EPOCH}
};

use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::puzzle::Category;

////////////////////////////////////////////////////////////////////////////////
//                                Definitions.                                //
////////////////////////////////////////////////////////////////////////////////

/// The persisted state of a single puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState
{
	/// The puzzle the record belongs to. Guards against a record stored under
	/// the wrong key.
	pub puzzle_number: u32,

	/// The remaining mistake budget.
	pub mistakes_remaining: u8,

	/// The categories solved so far, in the order found.
	pub solved: Vec<Category>,

	/// How many of the trailing solved categories were disclosed by the
	/// reveal rather than found by the player. Absent in older records.
	#[serde(default)]
	pub revealed: u8,

	/// When the puzzle was last played, in seconds since the Unix epoch.
	pub last_played: u64
}

impl SavedState
{
	/// Construct a record stamped with the current wall time.
	///
	/// # Arguments
	///
	/// * `puzzle_number` - The puzzle the record belongs to.
	/// * `mistakes_remaining` - The remaining mistake budget.
	/// * `solved` - The categories solved so far, in the order found.
	///
	/// # Returns
	///
	/// The new record.
	#[must_use]
	pub fn new(puzzle_number: u32, mistakes_remaining: u8, solved: Vec<Category>)
		-> Self
	{
		Self {
			puzzle_number,
			mistakes_remaining,
			solved,
			revealed: 0,
			last_played: unix_timestamp()
		}
	}
}

/// Get the current wall time, in seconds since the Unix epoch. A clock set
/// before the epoch reads as zero.
#[must_use]
pub fn unix_timestamp() -> u64
{
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or(0)
}

/// Keyed storage for [`SavedState`] records. Every operation is best-effort:
/// implementations log failures rather than report them.
pub trait PersistenceStore
{
	/// Save the record for the given puzzle, replacing any prior record.
	///
	/// # Arguments
	///
	/// * `puzzle_number` - The key.
	/// * `state` - The record. Its `puzzle_number` is overwritten with the
	///   key.
	fn save(&mut self, puzzle_number: u32, state: &SavedState);

	/// Load the record for the given puzzle.
	///
	/// # Arguments
	///
	/// * `puzzle_number` - The key.
	///
	/// # Returns
	///
	/// The record, or `None` if it is missing, unparseable, or stored under
	/// the wrong key.
	fn load(&self, puzzle_number: u32) -> Option<SavedState>;

	/// Remove the record for the given puzzle. A missing record is not an
	/// error.
	///
	/// # Arguments
	///
	/// * `puzzle_number` - The key.
	fn clear(&mut self, puzzle_number: u32);
}

/// Encode a record for storage under the given key.
///
/// # Errors
///
/// [`StoreError::Serialize`] if the record cannot be encoded.
fn encode(puzzle_number: u32, state: &SavedState) -> Result<String, StoreError>
{
	let record = SavedState { puzzle_number, ..state.clone() };
	serde_json::to_string(&record).map_err(|e| StoreError::Serialize(e.to_string()))
}

/// Decode a record stored under the given key, rejecting records that belong
/// to a different puzzle.
fn decode(puzzle_number: u32, text: &str) -> Option<SavedState>
{
	match serde_json::from_str::<SavedState>(text)
	{
		Ok(record) if record.puzzle_number == puzzle_number => Some(record),
		Ok(record) =>
		{
			warn!(
				"Ignoring record for puzzle #{} stored under puzzle #{}",
				record.puzzle_number,
				puzzle_number
			);
			None
		},
		Err(e) =>
		{
			warn!("Ignoring unreadable record for puzzle #{}: {}", puzzle_number, e);
			None
		}
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                File store.                                 //
////////////////////////////////////////////////////////////////////////////////

/// A store that keeps one JSON file per puzzle, `puzzle-<number>.json`, in a
/// single directory.
#[derive(Clone, Debug)]
pub struct FileStore
{
	/// The directory that holds the records.
	dir: PathBuf
}

impl FileStore
{
	/// Open the store in the given directory, creating the directory if
	/// necessary.
	///
	/// # Arguments
	///
	/// * `dir` - The directory that holds the records.
	///
	/// # Returns
	///
	/// The store.
	///
	/// # Errors
	///
	/// If the directory cannot be created.
	pub fn open<T: AsRef<Path>>(dir: T) -> Result<Self, io::Error>
	{
		fs::create_dir_all(dir.as_ref())?;
		Ok(Self { dir: dir.as_ref().to_path_buf() })
	}

	/// Get the path of the record for the given puzzle.
	#[must_use]
	pub fn path(&self, puzzle_number: u32) -> PathBuf
	{
		self.dir.join(format!("puzzle-{}.json", puzzle_number))
	}

	/// Write the record for the given puzzle.
	///
	/// # Errors
	///
	/// Any error that occurs while encoding or writing the record.
	fn try_save(&self, puzzle_number: u32, state: &SavedState)
		-> Result<(), StoreError>
	{
		let text = encode(puzzle_number, state)?;
		fs::write(self.path(puzzle_number), text)?;
		Ok(())
	}
}

impl PersistenceStore for FileStore
{
	fn save(&mut self, puzzle_number: u32, state: &SavedState)
	{
		match self.try_save(puzzle_number, state)
		{
			Ok(()) => trace!("Saved puzzle #{}", puzzle_number),
			Err(e) => warn!("Failed to save puzzle #{}: {}", puzzle_number, e)
		}
	}

	fn load(&self, puzzle_number: u32) -> Option<SavedState>
	{
		match fs::read_to_string(self.path(puzzle_number))
		{
			Ok(text) => decode(puzzle_number, &text),
			Err(e) if e.kind() == ErrorKind::NotFound => None,
			Err(e) =>
			{
				warn!("Failed to load puzzle #{}: {}", puzzle_number, e);
				None
			}
		}
	}

	fn clear(&mut self, puzzle_number: u32)
	{
		match fs::remove_file(self.path(puzzle_number))
		{
			Ok(()) => trace!("Cleared puzzle #{}", puzzle_number),
			Err(e) if e.kind() == ErrorKind::NotFound => {},
			Err(e) => warn!("Failed to clear puzzle #{}: {}", puzzle_number, e)
		}
	}
}

////////////////////////////////////////////////////////////////////////////////
//                               Memory store.                                //
////////////////////////////////////////////////////////////////////////////////

/// A store that keeps encoded records in memory. Records are kept encoded so
/// that the store behaves like durable storage, including for corrupt data.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore
{
	/// The encoded records, by key.
	records: HashMap<u32, String>
}

impl MemoryStore
{
	/// Construct an empty store.
	#[must_use]
	pub fn new() -> Self { Self::default() }

	/// Store raw text under the given key, bypassing encoding.
	///
	/// # Arguments
	///
	/// * `puzzle_number` - The key.
	/// * `text` - The raw record.
	pub fn insert_raw(&mut self, puzzle_number: u32, text: &str)
	{
		self.records.insert(puzzle_number, text.to_string());
	}

	/// Check if a record exists under the given key.
	#[must_use]
	pub fn contains(&self, puzzle_number: u32) -> bool
	{
		self.records.contains_key(&puzzle_number)
	}
}

impl PersistenceStore for MemoryStore
{
	fn save(&mut self, puzzle_number: u32, state: &SavedState)
	{
		match encode(puzzle_number, state)
		{
			Ok(text) =>
			{
				self.records.insert(puzzle_number, text);
			},
			Err(e) => warn!("Failed to save puzzle #{}: {}", puzzle_number, e)
		}
	}

	fn load(&self, puzzle_number: u32) -> Option<SavedState>
	{
		self.records.get(&puzzle_number)
			.and_then(|text| decode(puzzle_number, text))
	}

	fn clear(&mut self, puzzle_number: u32)
	{
		self.records.remove(&puzzle_number);
	}
}

/// The complete enumeration of store errors. These never escape the store.
#[derive(Debug)]
pub enum StoreError
{
	/// The record could not be written.
	Io(io::Error),

	/// The record could not be encoded.
	Serialize(String)
}

impl From<io::Error> for StoreError
{
	fn from(e: io::Error) -> Self { Self::Io(e) }
}

impl Display for StoreError
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		match self
		{
			Self::Io(e) => write!(f, "storage I/O failed: {}", e),
			Self::Serialize(e) => write!(f, "cannot encode record: {}", e)
		}
	}
}

impl Error for StoreError
{
	fn source(&self) -> Option<&(dyn Error + 'static)>
	{
		match self
		{
			Self::Io(e) => Some(e),
			Self::Serialize(_) => None
		}
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use tempfile::tempdir;

	use super::*;
	use crate::puzzle::test::fruit_puzzle;

	/// Build a record with one solved category.
	fn record() -> SavedState
	{
		let puzzle = fruit_puzzle();
		SavedState::new(1, 3, vec![puzzle.combinations[2].clone()])
	}

	/// Test the full contract against a store:
	///
	/// * [`PersistenceStore::save`]
	/// * [`PersistenceStore::load`]
	/// * [`PersistenceStore::clear`]
	fn exercise<S: PersistenceStore>(store: &mut S)
	{
		assert_eq!(store.load(1), None);
		let state = record();
		store.save(1, &state);
		assert_eq!(store.load(1), Some(state.clone()));
		// The key wins over the record's own number.
		store.save(5, &state);
		assert_eq!(store.load(5).unwrap().puzzle_number, 5);
		// Last write wins.
		let newer = SavedState { mistakes_remaining: 2, ..state };
		store.save(1, &newer);
		assert_eq!(store.load(1).unwrap().mistakes_remaining, 2);
		store.clear(1);
		assert_eq!(store.load(1), None);
		store.clear(1);
	}

	/// Test the contract against the file store.
	#[test]
	fn test_file_store()
	{
		let dir = tempdir().unwrap();
		let mut store = FileStore::open(dir.path().join("saves")).unwrap();
		exercise(&mut store);
	}

	/// Test the contract against the memory store.
	#[test]
	fn test_memory_store()
	{
		let mut store = MemoryStore::new();
		exercise(&mut store);
	}

	/// Test that corrupt and misfiled records load as absent.
	#[test]
	fn test_rejects_bad_records()
	{
		let mut store = MemoryStore::new();
		store.insert_raw(1, "{not json");
		assert_eq!(store.load(1), None);
		let text = serde_json::to_string(&record()).unwrap();
		store.insert_raw(2, &text);
		assert!(store.contains(2));
		assert_eq!(store.load(2), None);

		let dir = tempdir().unwrap();
		let store = FileStore::open(dir.path()).unwrap();
		fs::write(store.path(3), "[]").unwrap();
		assert_eq!(store.load(3), None);
	}

	/// Test the persisted layout, which must stay readable by older builds.
	#[test]
	fn test_layout()
	{
		let text = serde_json::to_string(&record()).unwrap();
		assert!(text.contains("\"puzzleNumber\":1"));
		assert!(text.contains("\"mistakesRemaining\":3"));
		assert!(text.contains("\"category\":\"Even More Fruits\""));
		assert!(text.contains("\"color\":\"blue\""));
		assert!(text.contains("\"lastPlayed\":"));
	}

	/// Test that records written before the reveal count existed still load.
	#[test]
	fn test_older_layout()
	{
		let text = r#"{"puzzleNumber":4,"mistakesRemaining":1,"solved":[],"lastPlayed":0}"#;
		let mut store = MemoryStore::new();
		store.insert_raw(4, text);
		let state = store.load(4).unwrap();
		assert_eq!(state.revealed, 0);
		assert_eq!(state.mistakes_remaining, 1);
	}
}
