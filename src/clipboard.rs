//! # Clipboard
//!
//! The share action hands its text to a [`ClipboardSink`]. The host decides
//! what a clipboard is; the terminal front end, for instance, asks the
//! terminal emulator to set the system clipboard.

/// A destination for shared text.
pub trait ClipboardSink
{
	/// Write the text to the clipboard.
	///
	/// # Arguments
	///
	/// * `text` - The text to write.
	///
	/// # Returns
	///
	/// `true` on success, `false` on failure.
	fn write(&mut self, text: &str) -> bool;
}

/// A clipboard that remembers everything written to it.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard
{
	/// The texts written so far, oldest first.
	history: Vec<String>,

	/// Whether writes should fail.
	broken: bool
}

impl MemoryClipboard
{
	/// Construct an empty, working clipboard.
	#[must_use]
	pub fn new() -> Self { Self::default() }

	/// Construct a clipboard whose writes always fail.
	#[must_use]
	pub fn broken() -> Self { Self { history: Vec::new(), broken: true } }

	/// Get the most recently written text.
	#[must_use]
	pub fn contents(&self) -> Option<&str>
	{
		self.history.last().map(String::as_str)
	}

	/// Take every text written so far, oldest first, leaving the clipboard
	/// empty.
	pub fn take(&mut self) -> Vec<String>
	{
		std::mem::take(&mut self.history)
	}
}

impl ClipboardSink for MemoryClipboard
{
	fn write(&mut self, text: &str) -> bool
	{
		if self.broken
		{
			return false
		}
		self.history.push(text.to_string());
		true
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use super::*;

	/// Ensure that writes are remembered in order, and that a broken clipboard
	/// remembers nothing.
	#[test]
	fn test_memory_clipboard()
	{
		let mut clipboard = MemoryClipboard::new();
		assert_eq!(clipboard.contents(), None);
		assert!(clipboard.write("first"));
		assert!(clipboard.write("second"));
		assert_eq!(clipboard.contents(), Some("second"));
		assert_eq!(clipboard.take(), vec!["first", "second"]);
		assert_eq!(clipboard.contents(), None);

		let mut broken = MemoryClipboard::broken();
		assert!(!broken.write("lost"));
		assert!(broken.take().is_empty());
	}
}
