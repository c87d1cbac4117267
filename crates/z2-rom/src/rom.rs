//! The ROM image and everything decoded from it.

use std::fs;
use std::ops::Range;
use std::path::Path;

use tracing::{debug, info};
use z2_ir::Song;

use crate::catalog::{SongTitle, TableGroup};
use crate::commit;
use crate::config::RomLayout;
use crate::credits::Credits;
use crate::decode::{self, TABLE_SLOTS};
use crate::error::RomError;
use crate::relocate;
use crate::rom_data::{RomData, ROM_SIZE};

/// A loaded ROM: raw bytes plus the songs and credits decoded from them.
///
/// Edits go to the decoded values. Nothing is written back to the bytes
/// until [`Rom::commit`], which [`Rom::to_bytes`] and [`Rom::save`] call.
#[derive(Clone, Debug)]
pub struct Rom {
    layout: RomLayout,
    data: RomData,
    tables: [usize; 5],
    /// Indexed by `SongTitle as usize`.
    songs: Vec<Song>,
    credits: Credits,
}

impl Rom {
    /// Load a file image using the Zelda II layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RomError> {
        Self::from_bytes_with_layout(bytes, RomLayout::ZELDA2)
    }

    pub fn from_bytes_with_layout(bytes: &[u8], layout: RomLayout) -> Result<Self, RomError> {
        let data = RomData::from_bytes(bytes)?;

        let mut tables = [0; 5];
        for group in TableGroup::ALL {
            tables[group as usize] = relocate::table_address(&data, layout.loader(group), &layout)?;
        }

        let songs = SongTitle::all()
            .map(|title| {
                let song = decode::read_song(&data, tables[title.group() as usize], title.slot(), &layout)?;
                debug!(
                    "{}: {} patterns, sequence of {}",
                    title,
                    song.pattern_count(),
                    song.sequence_length()
                );
                Ok(song)
            })
            .collect::<Result<Vec<_>, RomError>>()?;

        let credits = Credits::decode(&data, &layout)?;

        info!("loaded {} songs from tables at {:06x?}", songs.len(), tables);
        Ok(Self {
            layout,
            data,
            tables,
            songs,
            credits,
        })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, RomError> {
        let path = path.as_ref();
        info!("reading {}", path.display());
        Self::from_bytes(&fs::read(path)?)
    }

    /// Commit and return the file image.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, RomError> {
        self.commit()?;
        Ok(self.data.to_bytes())
    }

    /// Commit and write the file image to `path`.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), RomError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        fs::write(path, bytes)?;
        info!("wrote {}", path.display());
        Ok(())
    }

    /// Write every table group and the credits back into the image.
    ///
    /// Either everything is written or, on error, nothing is.
    pub fn commit(&mut self) -> Result<(), RomError> {
        let mut data = self.data.clone();
        for group in TableGroup::ALL {
            write_group(&mut data, &self.songs, &self.tables, &self.layout, group)?;
        }
        self.credits.commit(&mut data, &self.layout)?;
        self.data = data;
        Ok(())
    }

    /// Rewrite one table group. Returns the ROM range it now occupies.
    pub fn commit_group(&mut self, group: TableGroup) -> Result<Range<usize>, RomError> {
        write_group(&mut self.data, &self.songs, &self.tables, &self.layout, group)
    }

    /// Move a group's song table to the music bank address `base` and
    /// repoint its loader code. The songs are written there on the next
    /// commit. Returns the number of loader operands patched.
    pub fn move_table(&mut self, group: TableGroup, base: u16) -> Result<usize, RomError> {
        let address = self.layout.rom_address(base);
        if base as usize + TABLE_SLOTS > 0x10000 || address + TABLE_SLOTS > ROM_SIZE {
            return Err(RomError::TableOutOfRange { address });
        }

        let loader = self.layout.loader(group);
        // make sure the loader is what we think it is before patching
        relocate::table_address(&self.data, loader, &self.layout)?;
        let patched = relocate::move_table(&mut self.data, loader, base, &self.layout);

        info!("moved {:?} table to {:06x}, {} operands patched", group, address, patched);
        self.tables[group as usize] = address;
        Ok(patched)
    }

    pub fn song(&self, title: SongTitle) -> &Song {
        &self.songs[title as usize]
    }

    pub fn song_mut(&mut self, title: SongTitle) -> &mut Song {
        &mut self.songs[title as usize]
    }

    pub fn credits(&self) -> &Credits {
        &self.credits
    }

    pub fn credits_mut(&mut self) -> &mut Credits {
        &mut self.credits
    }

    /// ROM offset of a group's song table.
    pub fn table_address(&self, group: TableGroup) -> usize {
        self.tables[group as usize]
    }

    pub fn data(&self) -> &RomData {
        &self.data
    }

    pub fn layout(&self) -> &RomLayout {
        &self.layout
    }
}

fn write_group(
    data: &mut RomData,
    songs: &[Song],
    tables: &[usize; 5],
    layout: &RomLayout,
    group: TableGroup,
) -> Result<Range<usize>, RomError> {
    let songs: Vec<&Song> = group.songs().iter().map(|&t| &songs[t as usize]).collect();
    let range = commit::commit_group(data, tables[group as usize], &group.slots(), &songs, layout)?;
    debug!("{:?} occupies {:06x}..{:06x}", group, range.start, range.end);
    Ok(range)
}
