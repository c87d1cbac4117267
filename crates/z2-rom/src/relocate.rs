//! Pointing loader code at a moved song table.
//!
//! Each group's loader reads its table with `LDA table,Y` (and a couple of
//! neighbouring loads at fixed offsets from it). Moving the table means
//! shifting every one of those operands by the same amount. This only
//! understands the instruction sequence the game actually uses.

use tracing::debug;

use crate::config::RomLayout;
use crate::error::RomError;
use crate::rom_data::RomData;

/// `LDA abs,Y`
pub const LDA_ABS_Y: u8 = 0xb9;

/// `JMP abs`
pub const JMP_ABS: u8 = 0x4c;

/// Table address loaded by the instruction at `loader`.
pub fn table_address(rom: &RomData, loader: usize, layout: &RomLayout) -> Result<usize, RomError> {
    let found = rom.getc(loader);
    if found != LDA_ABS_Y {
        return Err(RomError::UnexpectedOpcode { address: loader, found });
    }

    let address = layout.rom_address(rom.getw(loader + 1));
    debug!("table at {:06x} from LDA ${:04x},Y at {:06x}", address, rom.getw(loader + 1), loader);
    Ok(address)
}

/// Rewrite the loads around `loader` so they read from `new_base`.
///
/// Scans forward from a little before the loader, shifting the operand of
/// every `LDA abs,Y` by the distance the table moved, until a `JMP` or the
/// music reset routine. Returns the number of operands patched.
pub fn move_table(rom: &mut RomData, loader: usize, new_base: u16, layout: &RomLayout) -> usize {
    let old_base = rom.getw(loader + 1);
    let delta = new_base.wrapping_sub(old_base);
    let mut address = loader.saturating_sub(layout.loader_rewind);
    let mut patched = 0;

    loop {
        match rom.getc(address) {
            LDA_ABS_Y => {
                let operand = rom.getw(address + 1);
                let moved = operand.wrapping_add(delta);
                debug!("LDA at {:06x}: {:04x} -> {:04x}", address, operand, moved);
                rom.putw(address + 1, moved);
                address += 3;
                patched += 1;
            }
            JMP_ABS => {
                debug!("JMP at {:06x}, done moving table", address);
                break;
            }
            _ if address >= layout.reset_boundary => {
                debug!("reached music reset code at {:06x}", address);
                break;
            }
            _ => address += 1,
        }
    }

    patched
}
