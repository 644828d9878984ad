//! # Text-based user interface (TUI)
//!
//! Terminal setup and teardown for the game. The terminal must come back in
//! its original state however the game ends, including a panic on the UI
//! thread.

use std::{
	io::{self, stdout, Stdout},
	panic::{self, PanicHookInfo},
	sync::{Arc, Mutex},
	thread
};

use crossterm::{
	cursor::Show,
	execute,
	terminal::{
		disable_raw_mode, enable_raw_mode,
		EnterAlternateScreen, LeaveAlternateScreen
	}
};
use log::{trace, warn};
use ratatui::{backend::CrosstermBackend, Terminal};

/// The text-based user interface (TUI) type.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// A panic hook, as stored by [`panic::take_hook`].
type Hook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Open the text-based user interface (TUI), apply `f` to it, and restore the
/// terminal afterward.
///
/// # Arguments
///
/// * `f` - The function to apply to the TUI.
///
/// # Returns
///
/// The result of applying `f` to the TUI.
///
/// # Errors
///
/// Any error that occurs while driving or restoring the TUI.
pub fn tui<F, T>(f: F) -> io::Result<T>
	where F: FnOnce(&mut Tui) -> io::Result<T>
{
	let guard = PanicGuard::install();
	// Entering the alternate screen is not atomic, so restore even when it
	// fails partway.
	let result = enter().and_then(|mut terminal| f(&mut terminal));
	drop(guard);
	leave()?;
	result
}

/// Restores the terminal if the UI thread panics, for as long as it lives.
/// Dropping it reinstates the previous panic hook.
struct PanicGuard
{
	/// The previous panic hook, shared with the replacement hook.
	previous: Arc<Mutex<Option<Hook>>>
}

impl PanicGuard
{
	/// Replace the panic hook with one that restores the terminal first, but
	/// only for panics on the calling thread, which is the UI thread.
	fn install() -> Self
	{
		let previous = Arc::new(Mutex::new(Some(panic::take_hook())));
		let chained = Arc::clone(&previous);
		let ui_thread = thread::current().id();
		panic::set_hook(Box::new(move |info| {
			if thread::current().id() == ui_thread
			{
				// Nothing useful can be done with a failure here.
				let _ = leave();
			}
			// Leave the previous hook in place, as it may run more than once.
			if let Ok(hook) = chained.lock()
			{
				if let Some(hook) = hook.as_ref()
				{
					hook(info);
				}
			}
		}));
		trace!("Installed terminal panic hook");
		Self { previous }
	}
}

impl Drop for PanicGuard
{
	fn drop(&mut self)
	{
		match self.previous.lock().ok().and_then(|mut hook| hook.take())
		{
			Some(hook) => panic::set_hook(hook),
			None => warn!("Previous panic hook unavailable")
		}
	}
}

/// Switch to the alternate screen in raw mode.
///
/// # Returns
///
/// The initialized TUI.
///
/// # Errors
///
/// Any error that occurs while initializing the TUI.
fn enter() -> io::Result<Tui>
{
	let mut stdout = stdout();
	execute!(stdout, EnterAlternateScreen)?;
	enable_raw_mode()?;
	Terminal::new(CrosstermBackend::new(stdout))
}

/// Restore the terminal to its original state, including the cursor.
///
/// # Errors
///
/// Any error that occurs while restoring the terminal.
fn leave() -> io::Result<()>
{
	disable_raw_mode()?;
	execute!(stdout(), LeaveAlternateScreen, Show)
}
