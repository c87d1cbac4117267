//! Error types for note and pattern construction.

use thiserror::Error;

use crate::pattern::Channel;

/// A MIDI-style value the sound engine has no encoding for.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum NoteError {
    #[error("note {0} is not usable")]
    UnsupportedPitch(i32),
    #[error("duration {0} is not usable")]
    UnsupportedDuration(u32),
}

/// A pattern that cannot be serialized or breaks the channel length rules.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    /// A channel's relative start does not fit the one-byte header field.
    #[error("{channel:?} starts {offset} bytes into the note data, past the one-byte limit")]
    ChannelOffsetOverflow { channel: Channel, offset: usize },
    /// Pulse1 is longer than the 64-quarter decode ceiling.
    #[error("pattern is {ticks} ticks long, limit is {limit}")]
    TooLong { ticks: usize, limit: usize },
    /// A secondary channel runs past the end of Pulse1.
    #[error("{channel:?} is {ticks} ticks long but the pattern is {length}")]
    ChannelLength {
        channel: Channel,
        ticks: usize,
        length: usize,
    },
}

/// A song whose sequence or offsets are inconsistent.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SongError {
    #[error("sequence entry {index} refers to pattern {pattern}, song has {count}")]
    PatternIndex {
        index: usize,
        pattern: usize,
        count: usize,
    },
    /// A pattern offset does not fit the one-byte sequence entry.
    #[error("pattern {pattern} would start at offset {offset}, past the one-byte limit")]
    OffsetOverflow { pattern: usize, offset: usize },
}
