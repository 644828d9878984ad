//! # Application
//!
//! The application state and logic, including the text-based user interface
//! (TUI). The game itself lives in the [`PuzzleSession`]; the application
//! only maps keys onto session actions and draws the result.

use std::{io::{self, Write}, time::Duration};

use connections::{
	notification::NotificationKind,
	puzzle::{Color as CategoryColor, CATEGORY_SIZE},
	session::{Outcome, Phase, PuzzleSession, MISTAKE_BUDGET}
};
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind};
use log::debug;
use ratatui::{
	buffer::Buffer, layout::{Alignment, Constraint, Direction, Layout, Rect},
	style::{Color, Modifier, Style, Stylize},
	text::Line,
	widgets::{
		block::{Position, Title},
		Block, BorderType, Borders, Paragraph, Widget, Wrap
	},
	Frame
};

use crate::{osc52::Osc52Clipboard, tui::Tui};

/// The number of tiles in a row of the grid.
const COLUMNS: usize = CATEGORY_SIZE;

////////////////////////////////////////////////////////////////////////////////
//                                Application.                                //
////////////////////////////////////////////////////////////////////////////////

/// The application state.
#[must_use]
pub struct App
{
	/// Whether the application is running.
	state: ExecutionState,

	/// The game.
	session: PuzzleSession,

	/// The coordinates of the cursor over the unsolved tiles. The first
	/// element is X, which corresponds to the column, and the second element
	/// is Y, which corresponds to the row. The origin is the top-left corner.
	cursor: (u8, u8),

	/// Whether to draw light text on a dark background.
	dark: bool,

	/// Where shared results go.
	clipboard: Osc52Clipboard<Box<dyn Write>>
}

// Public interface.
impl App
{
	/// Create a new application state.
	///
	/// # Arguments
	///
	/// * `session` - The game, with a puzzle already activated.
	/// * `dark` - Whether to start in dark mode.
	/// * `clipboard` - Where shared results go.
	///
	/// # Returns
	///
	/// The new application state.
	#[inline]
	pub fn new(
		session: PuzzleSession,
		dark: bool,
		clipboard: Osc52Clipboard<Box<dyn Write>>
	) -> Self
	{
		Self {
			state: ExecutionState::Playing,
			session,
			cursor: (0, 0),
			dark,
			clipboard
		}
	}

	/// Run the application. This amounts to:
	///
	/// * Advancing the time-driven parts of the session.
	/// * Rendering the application frame.
	/// * Processing events.
	///
	/// # Arguments
	///
	/// * `tui` - The text-based user interface (TUI).
	///
	/// # Returns
	///
	/// Every share text that the player copied, oldest first.
	///
	/// # Errors
	///
	/// Any error that occurs while running the application.
	pub fn run(mut self, tui: &mut Tui) -> io::Result<Vec<String>>
	{
		while self.is_running()
		{
			self.process_systems();
			tui.draw(|frame| self.render_frame(frame))?;
			self.process_event()?;
		}
		match self.state
		{
			ExecutionState::Exiting { shared } => Ok(shared),
			ExecutionState::Playing => Ok(vec![])
		}
	}

	/// Check if the application is running.
	///
	/// # Returns
	///
	/// `true` if the application is running, `false` otherwise.
	#[inline]
	#[must_use]
	pub fn is_running(&self) -> bool
	{
		!matches!(self.state, ExecutionState::Exiting { .. })
	}
}

// Private implementation details.
impl App
{
	/// Get the tiles still in play, in on-screen order, as pairs of board
	/// index and word.
	fn tiles(&self) -> Vec<(usize, &str)>
	{
		self.session.board().unsolved_tiles(self.session.solved_categories())
	}

	/// Get the position of the cursor among the unsolved tiles.
	#[inline]
	#[must_use]
	fn current_index(&self) -> usize
	{
		self.cursor.1 as usize * COLUMNS + self.cursor.0 as usize
	}

	/// Move the cursor by the given deltas, saturating at the edges of the
	/// grid.
	///
	/// # Arguments
	///
	/// * `dx` - The change in the X-coordinate.
	/// * `dy` - The change in the Y-coordinate.
	fn move_cursor(&mut self, dx: i8, dy: i8)
	{
		let count = self.tiles().len() as i8;
		let x = self.cursor.0 as i8 + dx;
		let y = self.cursor.1 as i8 + dy;
		if (0..COLUMNS as i8).contains(&x)
			&& y >= 0
			&& y * COLUMNS as i8 + x < count
		{
			self.cursor = (x as u8, y as u8);
		}
	}

	/// Move the cursor by the given index delta, saturating at the ends of the
	/// grid. This supports tabbing through the tiles.
	///
	/// # Arguments
	///
	/// * `di` - The change in the index.
	fn move_index(&mut self, di: i8)
	{
		let count = self.tiles().len() as i8;
		let new_index = self.current_index() as i8 + di;
		if (0..count).contains(&new_index)
		{
			self.place_cursor(new_index as usize);
		}
	}

	/// Place the cursor at the given position among the unsolved tiles.
	fn place_cursor(&mut self, index: usize)
	{
		self.cursor = ((index % COLUMNS) as u8, (index / COLUMNS) as u8);
	}

	/// Keep the cursor on the grid after the grid shrinks.
	fn clamp_cursor(&mut self)
	{
		let count = self.tiles().len();
		if self.current_index() >= count
		{
			self.place_cursor(count.saturating_sub(1));
		}
	}

	/// Toggle the selection of the tile under the cursor.
	fn toggle_current(&mut self)
	{
		let index = self.tiles().get(self.current_index()).map(|(i, _)| *i);
		if let Some(index) = index
		{
			self.act("toggle", |session| session.select_tile(index));
		}
	}

	/// Apply an action to the session.
	///
	/// # Arguments
	///
	/// * `name` - The name of the action, for the log.
	/// * `action` - The action.
	fn act<F>(&mut self, name: &str, action: F)
		where F: FnOnce(&mut PuzzleSession) -> Outcome
	{
		let outcome = action(&mut self.session);
		debug!("{}: {:?}", name, outcome);
		self.clamp_cursor();
	}

	/// Copy the share text of a finished game.
	fn share(&mut self)
	{
		let outcome = self.session.share(&mut self.clipboard);
		debug!("share: {:?}", outcome);
	}

	/// Advance the time-driven parts of the session, i.e., notifications and
	/// the reveal.
	fn process_systems(&mut self)
	{
		self.session.update();
		self.clamp_cursor();
	}

	/// Process events. Block only briefly, so that the reveal and the
	/// notifications stay on schedule.
	///
	/// # Errors
	///
	/// Any error that occurs while processing events.
	fn process_event(&mut self) -> io::Result<()>
	{
		if poll(Duration::from_millis(50))?
		{
			match read()?
			{
				Event::Key(event) if event.kind == KeyEventKind::Press =>
					self.process_key_event(event),
				_ => {}
			}
		}
		Ok(())
	}

	/// Process a key event.
	///
	/// # Arguments
	///
	/// * `event` - The key event to process.
	fn process_key_event(&mut self, event: KeyEvent)
	{
		match self.state
		{
			ExecutionState::Playing => self.process_key_event_playing(event),
			ExecutionState::Exiting { .. } => {}
		}
	}

	/// Process a key event while [playing](ExecutionState::Playing):
	///
	/// * Escape - Exit the application.
	/// * Up, Down, Left, Right - Move the cursor.
	/// * Tab, BackTab - Move the cursor to the next or previous tile.
	/// * Space - Toggle the tile under the cursor.
	/// * Enter - Submit the selection.
	/// * s - Shuffle. d - Deselect all. t - Toggle dark mode.
	/// * n, p - Switch to the next or previous puzzle.
	/// * c - Copy the results of a finished game. r - Reset the puzzle.
	///
	/// The session ignores whatever its phase doesn't allow.
	///
	/// # Arguments
	///
	/// * `event` - The key event to process.
	fn process_key_event_playing(&mut self, event: KeyEvent)
	{
		match event.code
		{
			KeyCode::Esc => self.exit(),
			KeyCode::Up => self.move_cursor(0, -1),
			KeyCode::Down => self.move_cursor(0, 1),
			KeyCode::Left => self.move_cursor(-1, 0),
			KeyCode::Right => self.move_cursor(1, 0),
			KeyCode::BackTab => self.move_index(-1),
			KeyCode::Tab => self.move_index(1),
			KeyCode::Char(' ') => self.toggle_current(),
			KeyCode::Enter => self.act("submit", PuzzleSession::submit_guess),
			KeyCode::Char('s') => self.act("shuffle", PuzzleSession::shuffle),
			KeyCode::Char('d') =>
				self.act("deselect", PuzzleSession::deselect_all),
			KeyCode::Char('n') =>
				self.act("next", |session| session.switch_adjacent(true)),
			KeyCode::Char('p') =>
				self.act("previous", |session| session.switch_adjacent(false)),
			KeyCode::Char('r') => self.act("reset", PuzzleSession::reset_puzzle),
			KeyCode::Char('c') => self.share(),
			KeyCode::Char('t') => self.dark = !self.dark,
			_ => {}
		}
	}

	/// Mark the application for exit. The application will exit after the next
	/// iteration of the main loop.
	fn exit(&mut self)
	{
		self.state = ExecutionState::Exiting {
			shared: self.clipboard.take()
		};
	}

	/// Get the base style for the current color scheme.
	fn palette(&self) -> Style
	{
		if self.dark
		{
			Style::default().fg(Color::White).bg(Color::Black)
		}
		else
		{
			Style::default().fg(Color::Black).bg(Color::White)
		}
	}

	/// Render the application frame.
	///
	/// # Arguments
	///
	/// * `frame` - The target frame.
	fn render_frame(&self, frame: &mut Frame)
	{
		frame.render_widget(self, frame.area());
	}

	/// Build the outer frame: the puzzle title, the key hints or the game-over
	/// summary, and the current notification.
	fn frame_block(&self) -> Block<'static>
	{
		let title = match self.session.puzzle()
		{
			Some(puzzle) =>
				format!("Connections #{} – {}", puzzle.number, puzzle.name),
			None => "Connections".to_string()
		};
		let finished = matches!(self.session.phase(), Phase::Won | Phase::Lost);
		let action =
			if finished { "c – share".green().bold() }
			else { "↵ – submit".green().bold() };
		let footer = match self.session.summary()
		{
			Some(summary) => summary.bold(),
			None =>
				"\
					←↑↓→ - move \
					␣ - select \
					s - shuffle \
					d - deselect \
					n/p - puzzle \
					r - reset \
					t - theme\
				".cyan()
		};
		let mut block = Block::default()
			.borders(Borders::ALL)
			.style(self.palette())
			.title(
				Title::default()
					.content(title)
					.position(Position::Top)
					.alignment(Alignment::Center)
			)
			.title(
				Title::default()
					.content("⎋ – exit".yellow().bold())
					.position(Position::Top)
					.alignment(Alignment::Left)
			)
			.title(
				Title::default()
					.content(action)
					.position(Position::Top)
					.alignment(Alignment::Right)
			)
			.title(
				Title::default()
					.content(footer)
					.position(Position::Bottom)
					.alignment(Alignment::Center)
			);
		if let Some(notification) = self.session.notification()
		{
			let color = match notification.kind
			{
				NotificationKind::Success => Color::Green,
				NotificationKind::Warning => Color::Yellow,
				NotificationKind::Error => Color::Red
			};
			block = block.title(
				Title::default()
					.content(notification.message.clone().fg(color).bold())
					.position(Position::Bottom)
					.alignment(Alignment::Left)
			);
		}
		block
	}

	/// Render a lone message, for the phases without a board.
	///
	/// # Arguments
	///
	/// * `message` - The message.
	/// * `area` - The target area.
	/// * `buf` - The target buffer.
	fn render_message(&self, message: &str, area: Rect, buf: &mut Buffer)
	{
		let rows = Layout::default()
			.direction(Direction::Vertical)
			.constraints([
				Constraint::Ratio(1, 3),
				Constraint::Min(3),
				Constraint::Ratio(1, 3)
			])
			.split(area);
		Paragraph::new(message.to_string())
			.alignment(Alignment::Center)
			.wrap(Wrap { trim: true })
			.render(rows[1], buf);
	}

	/// Render the board: the solved categories as colored bars, then the grid
	/// of unsolved tiles, then the remaining mistakes.
	///
	/// # Arguments
	///
	/// * `area` - The target area.
	/// * `buf` - The target buffer.
	fn render_board(&self, area: Rect, buf: &mut Buffer)
	{
		let solved = self.session.solved_categories();
		let tiles = self.tiles();
		let rows = tiles.len().div_ceil(COLUMNS);
		let mut constraints = vec![Constraint::Ratio(1, 3)];
		constraints.extend(
			std::iter::repeat(Constraint::Length(3)).take(solved.len() + rows)
		);
		constraints.extend([
			Constraint::Length(1),
			Constraint::Length(1),
			Constraint::Ratio(1, 3)
		]);
		let board = Layout::default()
			.direction(Direction::Vertical)
			.margin(2)
			.constraints(constraints)
			.split(area);
		for (row, category) in solved.iter().enumerate()
		{
			let text = vec![
				Line::from(category.name.to_uppercase().bold()),
				Line::from(category.words.join(", "))
			];
			Paragraph::new(text)
				.alignment(Alignment::Center)
				.style(
					Style::default()
						.fg(Color::Black)
						.bg(category_color(&category.color))
				)
				.render(board[row + 1], buf);
		}
		let active = self.session.phase() == &Phase::Active;
		let cursor = self.current_index();
		let selected = self.session.board().selected();
		let plain = if self.dark { Color::White } else { Color::Black };
		tiles.chunks(COLUMNS).enumerate()
			.for_each(|(row, chunk)| {
				let cells = Layout::default()
					.direction(Direction::Horizontal)
					.constraints([Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
					.split(board[solved.len() + row + 1]);
				for (column, (index, word)) in chunk.iter().enumerate()
				{
					let under_cursor = active && row * COLUMNS + column == cursor;
					let is_selected = selected.contains(index);
					let style = match (under_cursor, is_selected)
					{
						(true, true) => Style::default()
							.fg(Color::Black)
							.bg(Color::LightCyan)
							.add_modifier(Modifier::BOLD),
						(true, false) => Style::default()
							.fg(Color::Black)
							.bg(Color::Cyan),
						(false, true) => self.palette()
							.add_modifier(Modifier::REVERSED | Modifier::BOLD),
						(false, false) => self.palette()
					};
					let border_color =
						if is_selected { Color::Yellow }
						else { plain };
					let block = Block::new()
						.border_type(BorderType::Rounded)
						.borders(Borders::ALL)
						.border_style(Style::default().fg(border_color));
					Paragraph::new(word.to_string())
						.block(block)
						.alignment(Alignment::Center)
						.style(style)
						.wrap(Wrap { trim: true })
						.render(cells[column], buf);
				}
			});
		let remaining = self.session.mistakes_remaining();
		let dots = (0..MISTAKE_BUDGET)
			.map(|i| if i < remaining { "●" } else { "○" })
			.collect::<Vec<_>>()
			.join(" ");
		Paragraph::new(format!("Mistakes remaining: {}", dots))
			.alignment(Alignment::Center)
			.render(board[board.len() - 2], buf);
	}
}

impl Widget for &App
{
	fn render(self, area: Rect, buf: &mut Buffer)
	{
		let block = self.frame_block();
		let inner = block.inner(area);
		block.render(area, buf);
		match self.session.phase()
		{
			Phase::Loading => self.render_message("Loading…", inner, buf),
			Phase::Failed { message } =>
				self.render_message(message, inner, buf),
			_ => self.render_board(inner, buf)
		}
	}
}

/// Map a category color onto the terminal palette.
///
/// # Arguments
///
/// * `color` - The category color.
///
/// # Returns
///
/// The terminal color.
fn category_color(color: &CategoryColor) -> Color
{
	match color
	{
		CategoryColor::Yellow => Color::Yellow,
		CategoryColor::Green => Color::Green,
		CategoryColor::Blue => Color::LightBlue,
		CategoryColor::Purple => Color::Magenta,
		CategoryColor::Unknown(_) => Color::Gray
	}
}

/// The execution state of the application.
#[derive(Clone, Debug)]
enum ExecutionState
{
	/// The player is playing. The session decides which actions apply.
	Playing,

	/// The application is exiting.
	Exiting {
		/// The share texts copied during the run, oldest first.
		shared: Vec<String>
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
