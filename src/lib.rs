//! # Connections
//!
//! Connections is a word puzzle game. The board holds 16 words that form 4
//! hidden categories of 4 words each. The player selects 4 words at a time and
//! submits them as a guess. A correct guess reveals the category; anything
//! else costs one of 4 allowed mistakes. A guess with 3 of the 4 words of some
//! category is reported as "one away". When the mistakes run out, the
//! unsolved categories are disclosed one by one and the game is lost.
//!
//! This crate is the game core: the [puzzle catalog](catalog), the
//! [session](session) state machine, the [smart shuffle](shuffle), [guess
//! evaluation](guess), the [share text](share), and the
//! [persistence contract](store). Hosts plug in through small capability
//! traits: [`PersistenceStore`](store::PersistenceStore),
//! [`ClipboardSink`](clipboard::ClipboardSink), and [`Clock`](clock::Clock).

pub mod board;
pub mod catalog;
pub mod clipboard;
pub mod clock;
pub mod guess;
pub mod notification;
pub mod puzzle;
pub mod session;
pub mod share;
pub mod shuffle;
pub mod store;
