//! Addresses that tie the codec to one specific ROM build.

use crate::catalog::TableGroup;

/// Image-specific constants. Addresses are offsets into the PRG data
/// (after the iNES header).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RomLayout {
    /// Added to 16-bit CPU addresses in the music bank to get a ROM offset.
    pub bank_offset: usize,
    /// `LDA table,Y` instruction that loads each group's song table.
    pub loaders: [usize; 5],
    /// How far before a loader the relocation scan starts. There is one
    /// more table load ahead of the main one.
    pub loader_rewind: usize,
    /// Relocation never scans past this address (start of the music reset
    /// routine).
    pub reset_boundary: usize,
    /// Start of the credits pointer table.
    pub credits_table: usize,
    /// Added to 16-bit CPU addresses in the credits bank.
    pub credits_bank_offset: usize,
    /// Number of credits pages.
    pub credits_pages: usize,
}

impl RomLayout {
    /// Zelda II: The Adventure of Link (U).
    pub const ZELDA2: RomLayout = RomLayout {
        bank_offset: 0x10000,
        loaders: [0x184da, 0x1994d, 0x199a1, 0x199f5, 0x19a49],
        loader_rewind: 11,
        reset_boundary: 0x19c74,
        credits_table: 0x15259,
        credits_bank_offset: 0xc000,
        credits_pages: 10,
    };

    /// Loader instruction address for a table group.
    pub fn loader(&self, group: TableGroup) -> usize {
        self.loaders[group as usize]
    }

    /// ROM offset of a 16-bit music bank address.
    pub fn rom_address(&self, cpu: u16) -> usize {
        cpu as usize + self.bank_offset
    }

    /// 16-bit music bank address of a ROM offset, if it is inside the bank.
    pub fn cpu_address(&self, address: usize) -> Option<u16> {
        address
            .checked_sub(self.bank_offset)
            .and_then(|a| u16::try_from(a).ok())
    }
}

impl Default for RomLayout {
    fn default() -> Self {
        Self::ZELDA2
    }
}
