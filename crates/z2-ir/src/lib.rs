//! Core music types for the Zelda II sound engine.
//!
//! Notes are single packed bytes, patterns hold four channels of notes,
//! and songs sequence patterns. These types know how to serialize
//! themselves; placing the bytes inside a ROM is left to `z2-rom`.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
mod note;
mod note_text;
mod pattern;
mod song;

pub use error::{NoteError, PatternError, SongError};
pub use note::{Duration, Note, Pitch, DURATION_MASK, PITCH_MASK, TICKS_PER_QUARTER};
pub use note_text::parse_notes;
pub use pattern::{
    Channel, Pattern, DEFAULT_TEMPO, MAX_PATTERN_TICKS, METADATA_LENGTH, TRIPLET_FLAG,
    VOICED_METADATA_LENGTH,
};
pub use song::Song;
