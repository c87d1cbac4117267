//! ROM side of the Zelda II music editor.
//!
//! Finds the five song tables through the loader code, decodes them into
//! `z2-ir` songs, lays the songs back out on save and can move a table
//! elsewhere in the music bank. Also reads and writes the end credits text.

mod catalog;
mod commit;
mod config;
mod credits;
mod decode;
mod error;
mod relocate;
mod rom;
mod rom_data;

pub use catalog::{Slot, SongTitle, TableGroup, UnknownSong};
pub use commit::{commit_group, write_group, GroupLayout};
pub use config::RomLayout;
pub use credits::{decode_char, encode_char, Credits, CreditsPage};
pub use decode::{read_pattern, read_song, TABLE_SLOTS};
pub use error::{CreditsError, LayoutError, RomError};
pub use relocate::{move_table, table_address, JMP_ABS, LDA_ABS_Y};
pub use rom::Rom;
pub use rom_data::{RomData, FILL_BYTE, HEADER_SIZE, ROM_SIZE};
