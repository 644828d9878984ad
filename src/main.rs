//! # Connections
//!
//! Connections is a word puzzle game. The board holds 16 words that form 4
//! hidden categories of 4 words each, and the player must find every category
//! before making 4 mistakes.
//!
//! Via command line options, the user can specify the puzzle catalog and where
//! progress is saved. Then the user can play through a text-based user
//! interface (TUI), or manage saved progress from the command line.

mod app;
mod osc52;
mod tui;

use std::{process, rc::Rc, time::Duration};

use clap::{Parser, Subcommand};
use log::{debug, trace, warn};
use rand::{rngs::StdRng, SeedableRng};

use app::App;
use connections::{
	catalog::Catalog,
	clock::SystemClock,
	session::{PuzzleSession, SessionConfig},
	share::saved_share_text,
	store::{FileStore, MemoryStore, PersistenceStore},
	puzzle::CATEGORY_COUNT
};
use osc52::Osc52Clipboard;
use tui::tui;

////////////////////////////////////////////////////////////////////////////////
//                           Command line options.                            //
////////////////////////////////////////////////////////////////////////////////

/// CLI for playing Connections puzzles.
#[derive(Clone, Debug, Parser)]
#[command(version = "1.0", author = "Todd L Smith")]
struct Opts
{
	/// The path to the directory containing the catalog files.
	#[arg(short = 'd', long, default_value = "puzzles")]
	directory: String,

	/// The name of the catalog. This is the name shared by the JSON and
	/// binary files, sans the extension.
	#[arg(short = 'n', long, default_value = "connections")]
	catalog: String,

	/// The path to the directory that holds saved progress, one file per
	/// puzzle.
	#[arg(short = 's', long, default_value = "saves")]
	save_directory: String,

	#[command(subcommand)]
	command: Command
}

/// The subcommands of the CLI.
#[derive(Copy, Clone, Debug, Subcommand)]
enum Command
{
	/// Just generate the binary catalog and exit.
	Generate,

	/// List the puzzles in the catalog, with the state of any saved progress.
	List,

	/// Open the text-based user interface (TUI) and play. Anything shared
	/// from the TUI is copied to the terminal's clipboard, and also written to
	/// standard output on exit.
	Play {
		/// The number of the puzzle to start with. Defaults to the first
		/// puzzle in the catalog.
		#[arg(short = 'p', long)]
		puzzle: Option<u32>,

		/// How long (in ms) to pause between revealed categories after a
		/// loss.
		#[arg(long, default_value = "1000")]
		reveal_delay: u64,

		/// Start in dark mode.
		#[arg(long)]
		dark: bool
	},

	/// Forget the saved progress of a puzzle.
	Clear {
		/// The number of the puzzle.
		#[arg(short = 'p', long)]
		puzzle: u32
	},

	/// Print the share text of a finished puzzle.
	Share {
		/// The number of the puzzle.
		#[arg(short = 'p', long)]
		puzzle: u32
	}
}

////////////////////////////////////////////////////////////////////////////////
//                               Main program.                                //
////////////////////////////////////////////////////////////////////////////////

/// Parse the command line options and execute the appropriate subcommand.
fn main()
{
	env_logger::init();

	// Parse the command line options.
	let opts = Opts::parse();
	debug!("Command line options: {:?}", opts);

	// Open the catalog, creating the binary catalog if necessary.
	let catalog = match Catalog::open(&opts.directory, &opts.catalog)
	{
		Ok(catalog) => catalog,
		Err(e) =>
		{
			eprintln!(
				"Failed to open catalog: {}/{}.json: {}",
				opts.directory,
				opts.catalog,
				e
			);
			process::exit(1)
		}
	};
	// Open the save directory. Without one, play on, but save nothing.
	let mut store: Box<dyn PersistenceStore> =
		match FileStore::open(&opts.save_directory)
		{
			Ok(store) => Box::new(store),
			Err(e) =>
			{
				warn!(
					"Progress will not be saved: {}: {}",
					opts.save_directory,
					e
				);
				Box::new(MemoryStore::new())
			}
		};

	// Execute the appropriate subcommand.
	match opts.command
	{
		Command::Generate =>
		{
			trace!("Exiting after generating binary catalog");
		},
		Command::List => print_catalog(&catalog, &*store),
		Command::Play { puzzle, reveal_delay, dark } =>
		{
			let Some(number) = puzzle.or_else(|| catalog.first()) else {
				eprintln!("Catalog is empty");
				process::exit(1)
			};
			let config = SessionConfig {
				reveal_step: Duration::from_millis(reveal_delay),
				..SessionConfig::default()
			};
			let mut session = PuzzleSession::new(
				Rc::new(catalog),
				store,
				Rc::new(SystemClock),
				StdRng::from_os_rng(),
				config
			);
			session.activate(number);
			trace!("Opening TUI");
			let app = App::new(session, dark, Osc52Clipboard::stdout());
			let shared = tui(|terminal| app.run(terminal))
				.unwrap_or_else(|e| panic!("Failed to drive TUI: {}", e));
			print_shared(shared);
		},
		Command::Clear { puzzle } =>
		{
			store.clear(puzzle);
			println!("Cleared puzzle #{}", puzzle);
		},
		Command::Share { puzzle } =>
		{
			match store.load(puzzle).as_ref().and_then(saved_share_text)
			{
				Some(text) => println!("{}", text),
				None => eprintln!("Puzzle #{} is not finished", puzzle)
			}
		}
	}
}

/// Print the puzzles of the catalog, one per line, with the state of any
/// saved progress.
///
/// # Arguments
///
/// * `catalog` - The catalog.
/// * `store` - The saved progress.
fn print_catalog(catalog: &Catalog, store: &dyn PersistenceStore)
{
	for summary in catalog.list_puzzles()
	{
		let status = match store.load(summary.number)
		{
			None => "",
			Some(saved) if saved.solved.len() == CATEGORY_COUNT
				&& saved.mistakes_remaining > 0 => " (won)",
			Some(saved) if saved.mistakes_remaining == 0 => " (lost)",
			Some(_) => " (in progress)"
		};
		println!("{:>4}  {}{}", summary.number, summary.name, status);
	}
}

/// Print the share texts copied during play to standard output, separated by
/// blank lines, for terminals that ignore clipboard requests.
///
/// # Arguments
///
/// * `shared` - The share texts, oldest first.
fn print_shared(shared: Vec<String>)
{
	for text in shared
	{
		println!("{}\n", text);
	}
}
