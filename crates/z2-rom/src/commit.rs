//! Laying out a table group.
//!
//! A group occupies one contiguous region starting at its song table:
//!
//! ```text
//! base + 0      song table: 8 one-byte offsets
//! base + 8      sequences, one per song, each ending in 00
//!               one extra 00 for the empty sequence
//! first_pattern pattern headers, 6 or 8 bytes each
//! notes_start   note data for every pattern
//! ```
//!
//! Table, sequence and header offsets are single bytes relative to `base`;
//! note data is addressed with full 16-bit bank addresses. Every block's
//! position depends on the size of the blocks before it, so a group is
//! always rewritten as a whole.

use std::ops::Range;

use tracing::debug;
use z2_ir::Song;

use crate::catalog::Slot;
use crate::config::RomLayout;
use crate::decode::TABLE_SLOTS;
use crate::error::LayoutError;
use crate::rom_data::RomData;

/// Computed positions for one table group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupLayout {
    /// ROM offset of the song table.
    pub base: usize,
    /// The 8 song table bytes.
    pub table: [u8; TABLE_SLOTS],
    /// Offset of each song's sequence.
    pub song_offsets: Vec<u8>,
    /// Offset of the empty sequence used by unassigned slots.
    pub empty_offset: u8,
    /// Encoded sequence of each song.
    pub sequences: Vec<Vec<u8>>,
    /// Offset of the first pattern header.
    pub first_pattern: u8,
    /// ROM offset of the first note byte.
    pub notes_start: usize,
}

fn byte_offset(offset: usize) -> Result<u8, LayoutError> {
    u8::try_from(offset).map_err(|_| LayoutError::TableOverflow { offset })
}

impl GroupLayout {
    /// Work out where everything in a group goes.
    ///
    /// `songs` are in layout order and `slots` index into them. Every
    /// pattern is validated here, so a plan that succeeds only holds
    /// patterns that decode back to themselves.
    pub fn plan(base: usize, slots: &[Slot; TABLE_SLOTS], songs: &[&Song]) -> Result<Self, LayoutError> {
        for pattern in songs.iter().flat_map(|s| s.patterns()) {
            pattern.validate()?;
        }

        // Song table: sequences follow it back to back
        let mut offset = TABLE_SLOTS;
        let mut song_offsets = Vec::with_capacity(songs.len());
        for song in songs {
            song_offsets.push(byte_offset(offset)?);
            offset += song.sequence_length() + 1;
        }

        // One extra sequence that is just a terminator
        let empty_offset = byte_offset(offset)?;

        let mut table = [empty_offset; TABLE_SLOTS];
        for (i, (entry, slot)) in table.iter_mut().zip(slots).enumerate() {
            if let Some(song) = *slot {
                *entry = song_offsets.get(song).copied().ok_or(LayoutError::SlotOutOfRange {
                    slot: i,
                    song,
                    songs: songs.len(),
                })?;
            }
        }

        // Sequences need the header offsets, which need every sequence's size
        let first_pattern = byte_offset(offset + 1)?;
        let mut pattern_offset = first_pattern as usize;
        let mut sequences = Vec::with_capacity(songs.len());
        for song in songs {
            // no patterns, no header offsets to encode
            let first = if song.pattern_count() > 0 {
                byte_offset(pattern_offset)?
            } else {
                0
            };
            sequences.push(song.sequence_data(first)?);
            pattern_offset += song.patterns_length();
        }

        Ok(Self {
            base,
            table,
            song_offsets,
            empty_offset,
            sequences,
            first_pattern,
            notes_start: base + pattern_offset,
        })
    }
}

/// Write a planned group into the ROM.
///
/// Returns the range of ROM offsets the group now occupies.
pub fn write_group(
    rom: &mut RomData,
    plan: &GroupLayout,
    songs: &[&Song],
    layout: &RomLayout,
) -> Result<Range<usize>, LayoutError> {
    // Encode every header before writing, so a failure leaves the ROM alone
    let mut blocks = Vec::new();
    let mut notes = plan.notes_start;
    for pattern in songs.iter().flat_map(|s| s.patterns()) {
        let cpu = layout
            .cpu_address(notes)
            .ok_or(LayoutError::AddressOutOfBank { address: notes })?;
        let meta = pattern.meta_data(cpu)?;
        let data = pattern.note_data();
        notes += data.len();
        blocks.push((meta, data));
    }

    let base = plan.base;
    rom.write(base, &plan.table);

    for (&offset, seq) in plan.song_offsets.iter().zip(&plan.sequences) {
        debug!("sequence at {:02x}: {:02x?}", offset, seq);
        rom.write(base + offset as usize, seq);
    }
    rom.putc(base + plan.empty_offset as usize, 0);

    let mut header = base + plan.first_pattern as usize;
    let mut notes = plan.notes_start;
    debug!("note data starts at {:06x}", notes);

    for (meta, data) in &blocks {
        debug!("pattern at {:06x}, notes at {:06x}: {:02x?}", header, notes, meta.as_slice());
        rom.write(header, meta);
        rom.write(notes, data);

        header += meta.len();
        notes += data.len();
    }

    Ok(base..notes)
}

/// Plan and write a group in one step.
pub fn commit_group(
    rom: &mut RomData,
    base: usize,
    slots: &[Slot; TABLE_SLOTS],
    songs: &[&Song],
    layout: &RomLayout,
) -> Result<Range<usize>, LayoutError> {
    let plan = GroupLayout::plan(base, slots, songs)?;
    write_group(rom, &plan, songs, layout)
}
