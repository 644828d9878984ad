//! # Session
//!
//! Herein is the puzzle session: the state machine that owns the board, the
//! mistake budget, and the categories solved so far, and that applies the
//! player's actions to them. The session is single-threaded and event-driven.
//! Player actions arrive one at a time, and time-driven work (the reveal
//! sequence and notification visibility) advances only when
//! [`update`](PuzzleSession::update) is called.
//!
//! The lifecycle of a session is:
//!
//! ```text
//! Loading ─┬─▶ Active ─┬─▶ Won
//!          │           └─▶ Revealing ─▶ Lost
//!          └─▶ Failed
//! ```
//!
//! Only [`Phase::Active`] accepts selection, shuffle, and submission. Every
//! other phase is left only by switching puzzles.

use std::{
	collections::{BTreeSet, VecDeque},
	rc::Rc,
	time::{Duration, Instant}
};

use log::{debug, error, warn};
use rand::rngs::StdRng;

use crate::{
	board::Board,
	catalog::Catalog,
	clipboard::ClipboardSink,
	clock::Clock,
	guess::{evaluate, Verdict},
	notification::{
		Notification, NotificationChannel, NotificationKind, Notifier,
		NOTIFICATION_DELAY, NOTIFICATION_DURATION
	},
	puzzle::{Category, Puzzle, CATEGORY_COUNT, CATEGORY_SIZE},
	share::share_text,
	shuffle::MAX_SHUFFLE_ATTEMPTS,
	store::{PersistenceStore, SavedState}
};

////////////////////////////////////////////////////////////////////////////////
//                               Configuration.                               //
////////////////////////////////////////////////////////////////////////////////

/// The number of mistakes a player may make before the game is lost.
pub const MISTAKE_BUDGET: u8 = 4;

/// The default pause between revealed categories.
pub const REVEAL_STEP: Duration = Duration::from_millis(1000);

/// The default pause after the last revealed category.
pub const REVEAL_TAIL: Duration = Duration::from_millis(500);

/// The tunable timings of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig
{
	/// The pause between revealed categories.
	pub reveal_step: Duration,

	/// The pause after the last revealed category.
	pub reveal_tail: Duration,

	/// The delay before a notification becomes visible.
	pub notification_delay: Duration,

	/// How long a notification remains visible.
	pub notification_duration: Duration,

	/// The retry budget of the smart shuffle.
	pub max_shuffle_attempts: usize
}

impl Default for SessionConfig
{
	fn default() -> Self
	{
		Self {
			reveal_step: REVEAL_STEP,
			reveal_tail: REVEAL_TAIL,
			notification_delay: NOTIFICATION_DELAY,
			notification_duration: NOTIFICATION_DURATION,
			max_shuffle_attempts: MAX_SHUFFLE_ATTEMPTS
		}
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                  Session.                                  //
////////////////////////////////////////////////////////////////////////////////

/// The phase of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase
{
	/// No puzzle has been activated yet.
	Loading,

	/// The requested puzzle could not be loaded.
	Failed {
		/// What went wrong, for the player.
		message: String
	},

	/// The player is solving the puzzle.
	Active,

	/// The mistake budget is exhausted, and the unsolved categories are being
	/// disclosed one at a time.
	Revealing {
		/// The indices of the categories still to disclose, in declared order.
		remaining: VecDeque<usize>,

		/// When to take the next step.
		next: Instant
	},

	/// The player found every category.
	Won,

	/// The player ran out of mistakes.
	Lost
}

/// Whether a player action took effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome
{
	/// The action was applied.
	Applied,

	/// The action was not allowed in the current state, and nothing changed.
	Rejected
}

impl From<bool> for Outcome
{
	fn from(applied: bool) -> Self
	{
		if applied { Self::Applied } else { Self::Rejected }
	}
}

/// A puzzle session. See the [module documentation](self) for the lifecycle.
pub struct PuzzleSession
{
	/// The source of puzzles.
	catalog: Rc<Catalog>,

	/// Where progress is saved.
	store: Box<dyn PersistenceStore>,

	/// The source of the current time.
	clock: Rc<dyn Clock>,

	/// The source of randomness for shuffling.
	rng: StdRng,

	/// The tunable timings.
	config: SessionConfig,

	/// The messages for the player.
	notifier: Notifier,

	/// The number of the active puzzle, if any.
	number: Option<u32>,

	/// The active puzzle, if it loaded.
	puzzle: Option<Puzzle>,

	/// The word layout and selection.
	board: Board,

	/// The remaining mistake budget.
	mistakes_remaining: u8,

	/// The categories solved so far, in the order found.
	solved: Vec<Category>,

	/// How many of the solved categories were disclosed rather than found.
	revealed: u8,

	/// The current phase.
	phase: Phase
}

// Public interface.
impl PuzzleSession
{
	/// Create a session with no active puzzle. Call
	/// [`activate`](Self::activate) to start playing.
	///
	/// # Arguments
	///
	/// * `catalog` - The source of puzzles.
	/// * `store` - Where progress is saved.
	/// * `clock` - The source of the current time.
	/// * `rng` - The source of randomness for shuffling.
	/// * `config` - The tunable timings.
	///
	/// # Returns
	///
	/// The new session, in [`Phase::Loading`].
	#[must_use]
	pub fn new(
		catalog: Rc<Catalog>,
		store: Box<dyn PersistenceStore>,
		clock: Rc<dyn Clock>,
		rng: StdRng,
		config: SessionConfig
	) -> Self
	{
		let notifier = Notifier::new(
			Rc::clone(&clock),
			config.notification_delay,
			config.notification_duration
		);
		Self {
			catalog,
			store,
			clock,
			rng,
			config,
			notifier,
			number: None,
			puzzle: None,
			board: Board::from_words(Vec::new()),
			mistakes_remaining: MISTAKE_BUDGET,
			solved: Vec::new(),
			revealed: 0,
			phase: Phase::Loading
		}
	}

	/// Activate the puzzle with the given number, abandoning the current one.
	/// Any reveal in progress is cancelled; the steps already taken were saved
	/// as they happened. The new puzzle resumes from its saved progress, if
	/// any, with a freshly shuffled board and nothing selected.
	///
	/// # Arguments
	///
	/// * `number` - The catalog number of the puzzle.
	pub fn activate(&mut self, number: u32)
	{
		if let (Phase::Revealing { .. }, Some(current)) = (&self.phase, self.number)
		{
			debug!("Cancelling reveal of puzzle #{}", current);
		}
		self.phase = Phase::Loading;
		self.number = Some(number);
		self.puzzle = None;
		self.board = Board::from_words(Vec::new());
		self.mistakes_remaining = MISTAKE_BUDGET;
		self.solved.clear();
		self.revealed = 0;
		self.notifier.dismiss();
		let puzzle = match self.catalog.load(number)
		{
			Ok(puzzle) => puzzle,
			Err(e) =>
			{
				error!("Failed to load puzzle #{}: {}", number, e);
				self.phase = Phase::Failed {
					message: format!("Could not load puzzle #{}: {}", number, e)
				};
				return
			}
		};
		if let Some(saved) = self.store.load(number)
		{
			self.restore(&puzzle, saved);
		}
		self.board = Board::new(
			&puzzle,
			&mut self.rng,
			self.config.max_shuffle_attempts
		);
		self.puzzle = Some(puzzle);
		self.phase = if self.solved.len() == CATEGORY_COUNT
		{
			if self.mistakes_remaining > 0 { Phase::Won } else { Phase::Lost }
		}
		else
		{
			Phase::Active
		};
		if self.phase == Phase::Active && self.mistakes_remaining == 0
		{
			// A reveal was interrupted. Finish it.
			self.request_reveal();
		}
		debug!("Activated puzzle #{}: {:?}", number, self.phase);
	}

	/// Switch to the adjacent puzzle in catalog order, wrapping around.
	///
	/// # Arguments
	///
	/// * `forward` - `true` for the next puzzle, `false` for the previous one.
	///
	/// # Returns
	///
	/// [`Outcome::Rejected`] if the catalog is empty.
	pub fn switch_adjacent(&mut self, forward: bool) -> Outcome
	{
		let target = match self.number
		{
			Some(number) => self.catalog.neighbor(number, forward),
			None => self.catalog.first()
		};
		match target
		{
			Some(number) =>
			{
				self.activate(number);
				Outcome::Applied
			},
			None => Outcome::Rejected
		}
	}

	/// Forget the saved progress of the current puzzle and start it afresh.
	/// Not allowed during a reveal.
	///
	/// # Returns
	///
	/// Whether the puzzle was reset.
	pub fn reset_puzzle(&mut self) -> Outcome
	{
		match (self.number, &self.phase)
		{
			(Some(_), Phase::Revealing { .. }) | (None, _) => Outcome::Rejected,
			(Some(number), _) =>
			{
				self.store.clear(number);
				self.activate(number);
				Outcome::Applied
			}
		}
	}

	/// Toggle the selection of the tile at the given index. Selecting a fifth
	/// tile, a tile of a solved category, or a tile that doesn't exist is
	/// rejected. Selection is never saved.
	///
	/// # Arguments
	///
	/// * `index` - The index of the tile.
	///
	/// # Returns
	///
	/// Whether the selection changed.
	pub fn select_tile(&mut self, index: usize) -> Outcome
	{
		if self.phase != Phase::Active
		{
			return Outcome::Rejected
		}
		self.board.toggle(index, &self.solved).into()
	}

	/// Clear the selection.
	///
	/// # Returns
	///
	/// [`Outcome::Rejected`] if nothing was selected or the session is not
	/// active.
	pub fn deselect_all(&mut self) -> Outcome
	{
		if self.phase != Phase::Active
		{
			return Outcome::Rejected
		}
		self.board.clear_selection().into()
	}

	/// Reshuffle the board with the smart shuffle, keeping the selected words
	/// selected.
	///
	/// # Returns
	///
	/// [`Outcome::Rejected`] if the session is not active.
	pub fn shuffle(&mut self) -> Outcome
	{
		match (&self.phase, &self.puzzle)
		{
			(Phase::Active, Some(puzzle)) =>
			{
				self.board.shuffle(
					puzzle,
					&mut self.rng,
					self.config.max_shuffle_attempts
				);
				Outcome::Applied
			},
			_ => Outcome::Rejected
		}
	}

	/// Submit the 4 selected tiles as a guess. A correct guess records the
	/// category and clears the selection. A guess that is one away costs a
	/// mistake but keeps the selection, so that the player may adjust it. Any
	/// other guess costs a mistake, and the last mistake starts the reveal.
	///
	/// # Returns
	///
	/// [`Outcome::Rejected`] if the session is not active or exactly 4 tiles
	/// are not selected.
	pub fn submit_guess(&mut self) -> Outcome
	{
		if self.phase != Phase::Active
			|| self.board.selected().len() != CATEGORY_SIZE
		{
			return Outcome::Rejected
		}
		let Some(puzzle) = &self.puzzle else { return Outcome::Rejected };
		let words = self.board.selected_words();
		let verdict =
			evaluate(puzzle, &self.solved, &words, self.mistakes_remaining);
		debug!("Guess {:?}: {:?}", words, verdict);
		let (message, kind) = verdict.message(puzzle);
		match verdict
		{
			Verdict::OutOfAttempts | Verdict::AlreadyFound(_) => {},
			Verdict::Correct(index) =>
			{
				self.solved.push(puzzle.combinations[index].clone());
				self.board.clear_selection();
				self.persist();
				if self.solved.len() == CATEGORY_COUNT
				{
					debug!("Puzzle solved");
					self.phase = Phase::Won;
				}
			},
			Verdict::OneAway { .. } | Verdict::Miss { .. } =>
			{
				self.mistakes_remaining =
					verdict.mistakes_after(self.mistakes_remaining);
				self.persist();
			}
		}
		self.notifier.show(&message, kind);
		if verdict == (Verdict::Miss { remaining: 0 })
		{
			self.request_reveal();
		}
		Outcome::Applied
	}

	/// Advance the time-driven parts of the session to the current time:
	/// notification visibility and the reveal sequence. Steps that are
	/// overdue are all taken, in order.
	pub fn update(&mut self)
	{
		self.notifier.update();
		let now = self.clock.now();
		loop
		{
			let Phase::Revealing { remaining, next } = &mut self.phase
				else { break };
			if now < *next
			{
				break
			}
			match remaining.pop_front()
			{
				Some(index) =>
				{
					let Some(puzzle) = &self.puzzle else { break };
					let category = puzzle.combinations[index].clone();
					debug!("Revealing: {}", category.name);
					*next += if remaining.is_empty() { self.config.reveal_tail }
						else { self.config.reveal_step };
					self.solved.push(category);
					self.revealed += 1;
					self.persist();
				},
				None =>
				{
					debug!("Reveal finished");
					self.phase = Phase::Lost;
				}
			}
		}
	}

	/// Copy the share text of a finished game to the clipboard, and tell the
	/// player how that went.
	///
	/// # Arguments
	///
	/// * `clipboard` - The destination of the share text.
	///
	/// # Returns
	///
	/// [`Outcome::Rejected`] if the game is not finished.
	pub fn share(&mut self, clipboard: &mut dyn ClipboardSink) -> Outcome
	{
		if !matches!(self.phase, Phase::Won | Phase::Lost)
		{
			return Outcome::Rejected
		}
		let text = share_text(&self.solved, self.mistakes_remaining);
		if clipboard.write(&text)
		{
			self.notifier.show(
				"Results copied to clipboard!",
				NotificationKind::Success
			);
		}
		else
		{
			warn!("Failed to copy share text");
			self.notifier.show(
				"Could not copy results.",
				NotificationKind::Error
			);
		}
		Outcome::Applied
	}

	/// Get the current phase.
	#[inline]
	#[must_use]
	pub fn phase(&self) -> &Phase { &self.phase }

	/// Get the number of the active puzzle, if any.
	#[inline]
	#[must_use]
	pub fn number(&self) -> Option<u32> { self.number }

	/// Get the active puzzle, if it loaded.
	#[inline]
	#[must_use]
	pub fn puzzle(&self) -> Option<&Puzzle> { self.puzzle.as_ref() }

	/// Get the catalog.
	#[inline]
	#[must_use]
	pub fn catalog(&self) -> &Catalog { &self.catalog }

	/// Get the board.
	#[inline]
	#[must_use]
	pub fn board(&self) -> &Board { &self.board }

	/// Get the words, in on-screen order.
	#[inline]
	#[must_use]
	pub fn words(&self) -> &[String] { self.board.words() }

	/// Get the indices of the selected tiles.
	#[inline]
	#[must_use]
	pub fn selected(&self) -> &BTreeSet<usize> { self.board.selected() }

	/// Get the categories solved so far, in the order found.
	#[inline]
	#[must_use]
	pub fn solved_categories(&self) -> &[Category] { &self.solved }

	/// Get the remaining mistake budget.
	#[inline]
	#[must_use]
	pub fn mistakes_remaining(&self) -> u8 { self.mistakes_remaining }

	/// Check if the unsolved categories are being disclosed.
	#[inline]
	#[must_use]
	pub fn is_revealing(&self) -> bool
	{
		matches!(self.phase, Phase::Revealing { .. })
	}

	/// Check if the player found every category.
	#[must_use]
	pub fn is_won(&self) -> bool
	{
		self.solved.len() == CATEGORY_COUNT && self.mistakes_remaining > 0
	}

	/// Check if the game is over, i.e., either every category is on display
	/// or the mistake budget is exhausted and the reveal has finished.
	#[must_use]
	pub fn is_game_over(&self) -> bool
	{
		(self.mistakes_remaining == 0 && !self.is_revealing())
			|| self.solved.len() == CATEGORY_COUNT
	}

	/// Get the visible notification, if any.
	#[inline]
	#[must_use]
	pub fn notification(&self) -> Option<&Notification>
	{
		self.notifier.visible()
	}

	/// Get the most recent notification, whether or not it is still visible.
	#[inline]
	#[must_use]
	pub fn last_notification(&self) -> Option<&Notification>
	{
		self.notifier.last()
	}

	/// Get the summary of a finished game.
	///
	/// # Returns
	///
	/// The summary, or `None` if the game is not finished.
	#[must_use]
	pub fn summary(&self) -> Option<String>
	{
		match self.phase
		{
			Phase::Won => Some("Congratulations! You found all groups!".into()),
			Phase::Lost => Some(format!(
				"You found {} out of {} groups.",
				self.solved.len().saturating_sub(self.revealed as usize),
				CATEGORY_COUNT
			)),
			_ => None
		}
	}

	/// Get the store.
	#[inline]
	#[must_use]
	pub fn store(&self) -> &dyn PersistenceStore { self.store.as_ref() }
}

// Private implementation details.
impl PuzzleSession
{
	/// Adopt saved progress, discarding anything that doesn't fit the puzzle.
	///
	/// # Arguments
	///
	/// * `puzzle` - The puzzle being activated.
	/// * `saved` - The saved progress.
	fn restore(&mut self, puzzle: &Puzzle, saved: SavedState)
	{
		let mut solved: Vec<Category> = Vec::with_capacity(CATEGORY_COUNT);
		for category in saved.solved
		{
			if puzzle.combinations.contains(&category) && !solved.contains(&category)
			{
				solved.push(category);
			}
			else
			{
				warn!(
					"Discarding saved category \"{}\" of puzzle #{}",
					category.name,
					puzzle.number
				);
			}
		}
		self.revealed = saved.revealed.min(solved.len() as u8);
		self.solved = solved;
		self.mistakes_remaining = saved.mistakes_remaining.min(MISTAKE_BUDGET);
		debug!(
			"Restored puzzle #{}: {} solved, {} mistakes remaining",
			puzzle.number,
			self.solved.len(),
			self.mistakes_remaining
		);
	}

	/// Save the mistake budget and the solved categories.
	fn persist(&mut self)
	{
		if let Some(number) = self.number
		{
			let state = SavedState {
				revealed: self.revealed,
				..SavedState::new(
					number,
					self.mistakes_remaining,
					self.solved.clone()
				)
			};
			self.store.save(number, &state);
		}
	}

	/// Begin disclosing the unsolved categories, in declared order.
	fn request_reveal(&mut self)
	{
		let Some(puzzle) = &self.puzzle else { return };
		let remaining = puzzle.combinations.iter().enumerate()
			.filter(|(_, c)| !self.solved.contains(c))
			.map(|(index, _)| index)
			.collect::<VecDeque<_>>();
		debug!("Revealing {} categories", remaining.len());
		self.board.clear_selection();
		self.phase = Phase::Revealing {
			remaining,
			next: self.clock.now() + self.config.reveal_step
		};
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use rand::SeedableRng;
	use tempfile::tempdir;

	use super::*;
	use crate::{
		clipboard::MemoryClipboard,
		clock::ManualClock,
		puzzle::test::fruit_puzzle,
		share::REVERSE_SWEEP,
		store::{FileStore, MemoryStore}
	};

	/// Build a catalog of two fruit puzzles, numbered 1 and 2.
	fn catalog() -> Rc<Catalog>
	{
		let mut second = fruit_puzzle();
		second.number = 2;
		second.name = "Fruit Salad Again".to_string();
		Rc::new(Catalog::new(vec![fruit_puzzle(), second]).unwrap())
	}

	/// Build a session on the given store, with puzzle #1 active.
	fn session_with(
		store: Box<dyn PersistenceStore>
	) -> (Rc<ManualClock>, PuzzleSession)
	{
		let clock = Rc::new(ManualClock::new());
		let mut session = PuzzleSession::new(
			catalog(),
			store,
			clock.clone(),
			StdRng::seed_from_u64(42),
			SessionConfig::default()
		);
		session.activate(1);
		(clock, session)
	}

	/// Build a session on an empty memory store, with puzzle #1 active.
	fn session() -> (Rc<ManualClock>, PuzzleSession)
	{
		session_with(Box::new(MemoryStore::new()))
	}

	/// Select the given words.
	fn select(session: &mut PuzzleSession, words: &[&str])
	{
		for word in words
		{
			let index = session.board().index_of(word).unwrap();
			assert_eq!(session.select_tile(index), Outcome::Applied, "{}", word);
		}
	}

	/// Select the given words and submit them.
	fn guess(session: &mut PuzzleSession, words: &[&str]) -> Outcome
	{
		select(session, words);
		session.submit_guess()
	}

	/// Let the reveal run to completion.
	fn finish_reveal(clock: &ManualClock, session: &mut PuzzleSession)
	{
		for _ in 0..10
		{
			clock.advance(REVEAL_STEP);
			session.update();
		}
	}

	const COMMON: [&str; 4] = ["APPLE", "BANANA", "ORANGE", "GRAPE"];
	const MORE: [&str; 4] = ["KIWI", "MANGO", "PEACH", "PEAR"];
	const EVEN_MORE: [&str; 4] = ["PLUM", "LEMON", "LIME", "CHERRY"];
	const DIFFERENT: [&str; 4] = ["FIG", "DATE", "MELON", "BERRY"];
	const WILD: [&str; 4] = ["APPLE", "BANANA", "FIG", "DATE"];

	/// Ensure that activation lays out a fresh board.
	#[test]
	fn test_activate()
	{
		let (_, session) = session();
		assert_eq!(session.phase(), &Phase::Active);
		assert_eq!(session.number(), Some(1));
		assert_eq!(session.words().len(), 16);
		assert_eq!(session.mistakes_remaining(), MISTAKE_BUDGET);
		assert!(session.solved_categories().is_empty());
		assert!(session.selected().is_empty());
		assert!(!session.is_game_over());
	}

	/// Ensure that an unknown puzzle lands in the failed phase, and that
	/// nothing is accepted there.
	#[test]
	fn test_activate_unknown()
	{
		let (_, mut session) = session();
		session.activate(99);
		assert!(matches!(session.phase(), Phase::Failed { .. }));
		assert!(session.puzzle().is_none());
		assert_eq!(session.select_tile(0), Outcome::Rejected);
		assert_eq!(session.shuffle(), Outcome::Rejected);
		assert_eq!(session.submit_guess(), Outcome::Rejected);
		session.activate(2);
		assert_eq!(session.phase(), &Phase::Active);
	}

	/// Ensure that a correct guess is recorded once, even when repeated.
	#[test]
	fn test_correct_guess()
	{
		let (clock, mut session) = session();
		assert_eq!(guess(&mut session, &COMMON), Outcome::Applied);
		assert_eq!(session.solved_categories(), &[fruit_puzzle().combinations[0].clone()]);
		assert!(session.selected().is_empty());
		assert_eq!(
			session.last_notification().unwrap().message,
			"Correct! Common Fruits!"
		);
		assert_eq!(session.last_notification().unwrap().kind, NotificationKind::Success);
		// The notification appears only after the delay.
		session.update();
		assert!(session.notification().is_none());
		clock.advance(NOTIFICATION_DELAY);
		session.update();
		assert!(session.notification().is_some());
		// The solved words can no longer be selected.
		let apple = session.board().index_of("APPLE").unwrap();
		assert_eq!(session.select_tile(apple), Outcome::Rejected);
		assert_eq!(session.solved_categories().len(), 1);
		assert_eq!(session.mistakes_remaining(), MISTAKE_BUDGET);
		let saved = session.store().load(1).unwrap();
		assert_eq!(saved.solved.len(), 1);
	}

	/// Ensure that a re-submitted solved category is reported but changes
	/// nothing.
	#[test]
	fn test_already_found()
	{
		let (_, mut session) = session();
		guess(&mut session, &COMMON);
		// Force the solved words back into the selection, which the board
		// would normally refuse.
		for word in COMMON
		{
			let index = session.board.index_of(word).unwrap();
			session.board.toggle(index, &[]);
		}
		assert_eq!(session.submit_guess(), Outcome::Applied);
		assert_eq!(
			session.last_notification().unwrap().message,
			"You already found this combination!"
		);
		assert_eq!(session.solved_categories().len(), 1);
		assert_eq!(session.mistakes_remaining(), MISTAKE_BUDGET);
	}

	/// Ensure that one-away costs a mistake and keeps the selection, except
	/// on the last mistake.
	#[test]
	fn test_one_away()
	{
		let (_, mut session) = session();
		assert_eq!(
			guess(&mut session, &["APPLE", "BANANA", "ORANGE", "KIWI"]),
			Outcome::Applied
		);
		assert_eq!(session.mistakes_remaining(), 3);
		assert_eq!(session.last_notification().unwrap().message, "One away...");
		assert_eq!(session.selected().len(), 4);
		let mut selected = session.board().selected_words();
		selected.sort();
		assert_eq!(selected, vec!["APPLE", "BANANA", "KIWI", "ORANGE"]);
		assert_eq!(session.store().load(1).unwrap().mistakes_remaining, 3);

		session.submit_guess();
		session.submit_guess();
		assert_eq!(session.mistakes_remaining(), 1);
		assert_eq!(session.phase(), &Phase::Active);
		session.submit_guess();
		assert_eq!(session.mistakes_remaining(), 0);
		assert_eq!(
			session.last_notification().unwrap().message,
			"Game Over! No more attempts remaining."
		);
		assert!(session.is_revealing());
	}

	/// Ensure that submission requires exactly 4 selected tiles.
	#[test]
	fn test_submit_requires_four()
	{
		let (_, mut session) = session();
		select(&mut session, &COMMON[..3]);
		assert_eq!(session.submit_guess(), Outcome::Rejected);
		assert_eq!(session.mistakes_remaining(), MISTAKE_BUDGET);
		assert!(session.last_notification().is_none());
		let fifth = session.board().index_of("KIWI").unwrap();
		select(&mut session, &COMMON[3..]);
		assert_eq!(session.select_tile(fifth), Outcome::Rejected);
		assert_eq!(session.deselect_all(), Outcome::Applied);
		assert_eq!(session.deselect_all(), Outcome::Rejected);
	}

	/// Ensure that shuffling keeps the selected words selected.
	#[test]
	fn test_shuffle()
	{
		let (_, mut session) = session();
		select(&mut session, &["APPLE", "FIG"]);
		let mut words = session.words().to_vec();
		words.sort();
		assert_eq!(session.shuffle(), Outcome::Applied);
		let mut selected = session.board().selected_words();
		selected.sort();
		assert_eq!(selected, vec!["APPLE", "FIG"]);
		let mut shuffled = session.words().to_vec();
		shuffled.sort();
		assert_eq!(words, shuffled);
	}

	/// Ensure that four misses start the reveal, that input is refused
	/// during it, and that it ends with every category on display.
	#[test]
	fn test_loss_and_reveal()
	{
		let (clock, mut session) = session();
		guess(&mut session, &MORE);
		let mut previous = session.mistakes_remaining();
		for expected in (0..MISTAKE_BUDGET).rev()
		{
			assert_eq!(guess(&mut session, &WILD), Outcome::Applied);
			assert_eq!(session.mistakes_remaining(), expected);
			assert!(session.mistakes_remaining() <= previous);
			previous = session.mistakes_remaining();
			if expected > 0
			{
				assert_eq!(session.deselect_all(), Outcome::Applied);
			}
		}
		assert!(session.is_revealing());
		assert!(!session.is_game_over());
		assert!(session.selected().is_empty());
		assert_eq!(session.select_tile(0), Outcome::Rejected);
		assert_eq!(session.shuffle(), Outcome::Rejected);
		assert_eq!(session.submit_guess(), Outcome::Rejected);
		assert_eq!(session.reset_puzzle(), Outcome::Rejected);

		// One category per step.
		clock.advance(REVEAL_STEP - Duration::from_millis(1));
		session.update();
		assert_eq!(session.solved_categories().len(), 1);
		clock.advance(Duration::from_millis(1));
		session.update();
		assert_eq!(session.solved_categories().len(), 2);
		assert_eq!(session.store().load(1).unwrap().solved.len(), 2);
		finish_reveal(&clock, &mut session);

		assert_eq!(session.phase(), &Phase::Lost);
		assert_eq!(session.solved_categories().len(), 4);
		assert!(session.is_game_over());
		assert!(!session.is_won());
		assert_eq!(session.mistakes_remaining(), 0);
		assert_eq!(
			session.summary().unwrap(),
			"You found 1 out of 4 groups."
		);
		// Revealed in declared order, after the one found.
		let names = session.solved_categories().iter()
			.map(|c| c.name.as_str())
			.collect::<Vec<_>>();
		assert_eq!(
			names,
			vec![
				"More Fruits",
				"Common Fruits",
				"Even More Fruits",
				"Even More Different Fruits"
			]
		);
	}

	/// Ensure that a late update takes every overdue reveal step at once.
	#[test]
	fn test_reveal_catches_up()
	{
		let (clock, mut session) = session();
		for _ in 0..MISTAKE_BUDGET
		{
			guess(&mut session, &WILD);
			session.deselect_all();
		}
		assert!(session.is_revealing());
		clock.advance(Duration::from_secs(60));
		session.update();
		assert_eq!(session.phase(), &Phase::Lost);
		assert_eq!(session.solved_categories().len(), 4);
	}

	/// Ensure that a perfect game is won and shares a reverse sweep.
	#[test]
	fn test_win_and_share()
	{
		let (_, mut session) = session();
		let mut clipboard = MemoryClipboard::new();
		assert_eq!(session.share(&mut clipboard), Outcome::Rejected);
		for words in [DIFFERENT, EVEN_MORE, MORE, COMMON]
		{
			assert_eq!(guess(&mut session, &words), Outcome::Applied);
		}
		assert_eq!(session.phase(), &Phase::Won);
		assert!(session.is_won());
		assert!(session.is_game_over());
		assert_eq!(
			session.summary().unwrap(),
			"Congratulations! You found all groups!"
		);
		assert_eq!(session.select_tile(0), Outcome::Rejected);
		assert_eq!(session.share(&mut clipboard), Outcome::Applied);
		assert!(clipboard.contents().unwrap().contains(REVERSE_SWEEP));
		assert_eq!(
			session.last_notification().unwrap().kind,
			NotificationKind::Success
		);

		let mut broken = MemoryClipboard::broken();
		assert_eq!(session.share(&mut broken), Outcome::Applied);
		assert_eq!(
			session.last_notification().unwrap().kind,
			NotificationKind::Error
		);
	}

	/// Ensure that progress survives a new session, and that a finished game
	/// comes back finished.
	#[test]
	fn test_restore()
	{
		let dir = tempdir().unwrap();
		{
			let store = FileStore::open(dir.path()).unwrap();
			let (_, mut session) = session_with(Box::new(store));
			guess(&mut session, &EVEN_MORE);
			session.deselect_all();
			guess(&mut session, &WILD);
		}
		{
			let store = FileStore::open(dir.path()).unwrap();
			let (_, mut session) = session_with(Box::new(store));
			assert_eq!(session.phase(), &Phase::Active);
			assert_eq!(session.mistakes_remaining(), 3);
			assert_eq!(session.solved_categories()[0].name, "Even More Fruits");
			assert!(session.selected().is_empty());
			for words in [COMMON, MORE, DIFFERENT]
			{
				guess(&mut session, &words);
			}
			assert_eq!(session.phase(), &Phase::Won);
		}
		let store = FileStore::open(dir.path()).unwrap();
		let (_, session) = session_with(Box::new(store));
		assert_eq!(session.phase(), &Phase::Won);
		assert_eq!(session.solved_categories().len(), 4);
	}

	/// Ensure that an interrupted reveal resumes on activation, and that the
	/// summary still counts only what the player found.
	#[test]
	fn test_restore_interrupted_reveal()
	{
		let puzzle = fruit_puzzle();
		let mut store = MemoryStore::new();
		let state = SavedState {
			revealed: 1,
			..SavedState::new(
				1,
				0,
				vec![
					puzzle.combinations[3].clone(),
					puzzle.combinations[0].clone()
				]
			)
		};
		store.save(1, &state);
		let (clock, mut session) = session_with(Box::new(store));
		assert!(session.is_revealing());
		finish_reveal(&clock, &mut session);
		assert_eq!(session.phase(), &Phase::Lost);
		assert_eq!(session.summary().unwrap(), "You found 1 out of 4 groups.");
	}

	/// Ensure that a finished loss comes back finished, without another
	/// reveal, and that the summary counts only what the player found.
	#[test]
	fn test_restore_lost()
	{
		let puzzle = fruit_puzzle();
		let mut store = MemoryStore::new();
		let state = SavedState {
			revealed: 3,
			..SavedState::new(
				1,
				0,
				vec![
					puzzle.combinations[2].clone(),
					puzzle.combinations[0].clone(),
					puzzle.combinations[1].clone(),
					puzzle.combinations[3].clone()
				]
			)
		};
		store.save(1, &state);
		let (clock, mut session) = session_with(Box::new(store));
		assert_eq!(session.phase(), &Phase::Lost);
		assert!(!session.is_revealing());
		assert!(session.is_game_over());
		assert!(!session.is_won());
		assert_eq!(session.mistakes_remaining(), 0);
		assert_eq!(session.solved_categories().len(), 4);
		assert_eq!(session.summary().unwrap(), "You found 1 out of 4 groups.");
		finish_reveal(&clock, &mut session);
		assert_eq!(session.phase(), &Phase::Lost);
		assert_eq!(session.solved_categories().len(), 4);
		let mut clipboard = MemoryClipboard::new();
		assert_eq!(session.share(&mut clipboard), Outcome::Applied);
		assert!(clipboard.contents().unwrap().contains("❌❌❌❌"));
	}

	/// Ensure that switching puzzles mid-reveal cancels the reveal, and that
	/// each puzzle keeps its own progress.
	#[test]
	fn test_switch_cancels_reveal()
	{
		let (clock, mut session) = session();
		for _ in 0..MISTAKE_BUDGET
		{
			guess(&mut session, &WILD);
			session.deselect_all();
		}
		clock.advance(REVEAL_STEP);
		session.update();
		assert_eq!(session.solved_categories().len(), 1);
		assert_eq!(session.switch_adjacent(true), Outcome::Applied);
		assert_eq!(session.number(), Some(2));
		assert_eq!(session.phase(), &Phase::Active);
		assert_eq!(session.mistakes_remaining(), MISTAKE_BUDGET);
		finish_reveal(&clock, &mut session);
		assert_eq!(session.phase(), &Phase::Active);
		// The abandoned reveal keeps its partial progress, and resumes.
		assert_eq!(session.store().load(1).unwrap().solved.len(), 1);
		session.activate(1);
		assert!(session.is_revealing());
	}

	/// Ensure that resetting forgets the saved progress.
	#[test]
	fn test_reset()
	{
		let (_, mut session) = session();
		guess(&mut session, &COMMON);
		assert_eq!(session.reset_puzzle(), Outcome::Applied);
		assert!(session.solved_categories().is_empty());
		assert!(session.store().load(1).is_none());
		assert_eq!(session.phase(), &Phase::Active);
	}

	/// Ensure that saved categories that no longer belong to the puzzle are
	/// discarded, and that the budget is clamped.
	#[test]
	fn test_restore_sanitizes()
	{
		let puzzle = fruit_puzzle();
		let mut store = MemoryStore::new();
		let stranger = Category::new(
			"Vegetables",
			crate::puzzle::Color::Green,
			&["LEEK", "KALE", "BEET", "OKRA"]
		);
		let state = SavedState::new(
			1,
			9,
			vec![
				puzzle.combinations[1].clone(),
				stranger,
				puzzle.combinations[1].clone()
			]
		);
		store.save(1, &state);
		let (_, session) = session_with(Box::new(store));
		assert_eq!(session.solved_categories().len(), 1);
		assert_eq!(session.mistakes_remaining(), MISTAKE_BUDGET);
	}
}
