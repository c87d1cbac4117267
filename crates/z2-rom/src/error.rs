//! Error types for ROM loading, layout and the credits codec.

use thiserror::Error;
use z2_ir::{PatternError, SongError};

/// Anything that can go wrong loading or saving a ROM image.
#[derive(Debug, Error)]
pub enum RomError {
    #[error("ROM image is {found} bytes, expected {expected}")]
    InvalidSize { expected: usize, found: usize },
    /// A loader address does not hold the `LDA abs,Y` the table lookup needs.
    #[error("expected LDA abs,Y (b9) at {address:06x}, found {found:02x}")]
    UnexpectedOpcode { address: usize, found: u8 },
    #[error("song slot {0} is outside the 8-entry table")]
    InvalidSlot(usize),
    #[error("sequence at {address:06x} has no terminator")]
    UnterminatedSequence { address: usize },
    #[error("table at {address:06x} does not fit in the ROM")]
    TableOutOfRange { address: usize },
    /// A pattern header or credits entry that runs past the end of the data.
    #[error("cannot read header: {0}")]
    Header(#[from] binrw::Error),
    #[error(transparent)]
    Song(#[from] SongError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Credits(#[from] CreditsError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A table group whose songs do not fit the one-byte offset scheme.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("table offset {offset:#x} does not fit in a byte")]
    TableOverflow { offset: usize },
    #[error("note data at {address:06x} is outside the music bank")]
    AddressOutOfBank { address: usize },
    /// A slot map entry names a song the group does not have.
    #[error("slot {slot} plays song {song}, but the group has {songs}")]
    SlotOutOfRange { slot: usize, song: usize, songs: usize },
    #[error(transparent)]
    Song(#[from] SongError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Credits text that cannot be stored in the ROM's character set.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CreditsError {
    #[error("cannot encode character {0:?}")]
    Unencodable(char),
    #[error("string of {0} characters is too long")]
    TooLong(usize),
    #[error("credits page {0} does not exist")]
    NoSuchPage(usize),
    #[error("credits data at {address:06x} is outside the credits bank")]
    AddressOutOfBank { address: usize },
}
