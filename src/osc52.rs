//! # Terminal clipboard
//!
//! Shared results are copied to the system clipboard of the terminal with the
//! OSC 52 escape sequence, which most modern terminal emulators honor, even
//! over SSH. A terminal that ignores the sequence simply discards it, so the
//! copied texts are also kept for printing once the terminal is restored.

use std::io::{self, Write};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use connections::clipboard::ClipboardSink;
use crossterm::{execute, style::Print};
use log::warn;

/// A clipboard that writes OSC 52 escape sequences to a terminal.
pub struct Osc52Clipboard<W: Write>
{
	/// The terminal.
	out: W,

	/// The texts copied so far, oldest first.
	history: Vec<String>
}

impl Osc52Clipboard<Box<dyn Write>>
{
	/// Construct a clipboard on standard output.
	#[inline]
	#[must_use]
	pub fn stdout() -> Self { Self::new(Box::new(io::stdout())) }
}

impl<W: Write> Osc52Clipboard<W>
{
	/// Construct a clipboard on the given terminal.
	///
	/// # Arguments
	///
	/// * `out` - The terminal.
	#[inline]
	#[must_use]
	pub fn new(out: W) -> Self { Self { out, history: Vec::new() } }

	/// Take every text copied so far, oldest first.
	pub fn take(&mut self) -> Vec<String>
	{
		std::mem::take(&mut self.history)
	}

	/// Get the terminal.
	#[cfg(test)]
	pub fn out(&self) -> &W { &self.out }
}

impl<W: Write> ClipboardSink for Osc52Clipboard<W>
{
	fn write(&mut self, text: &str) -> bool
	{
		match execute!(self.out, Print(osc52_sequence(text)))
		{
			Ok(()) =>
			{
				self.history.push(text.to_string());
				true
			},
			Err(e) =>
			{
				warn!("Failed to copy to the terminal clipboard: {}", e);
				false
			}
		}
	}
}

/// Build the OSC 52 sequence that sets the clipboard to the given text.
///
/// # Arguments
///
/// * `text` - The text.
///
/// # Returns
///
/// The escape sequence.
#[must_use]
fn osc52_sequence(text: &str) -> String
{
	format!("\x1b]52;c;{}\x1b\\", STANDARD.encode(text.as_bytes()))
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
