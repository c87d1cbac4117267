//! End credits text.
//!
//! The credits table holds two pointers per page: one to the title record
//! and one to the names block. A record is `22 pp len chars...` where `pp`
//! is the screen position. The title record and the names block (one or
//! two name records) each end with `ff`.

use binrw::BinRead;
use tracing::{debug, warn};

use crate::config::RomLayout;
use crate::error::{CreditsError, RomError};
use crate::rom_data::RomData;

/// Marker byte that starts a text record.
const RECORD: u8 = 0x22;

/// Screen positions of the three lines.
const TITLE_POSITION: u8 = 0x47;
const NAME1_POSITION: u8 = 0x8b;
const NAME2_POSITION: u8 = 0xcb;

/// Ends a title record or a names block.
const END: u8 = 0xff;

/// Stands in for bytes outside the character map when decoding.
const UNKNOWN: char = ' ';

#[derive(BinRead, Debug)]
#[br(little)]
struct PageEntry {
    title: u16,
    names: u16,
}

/// The text shown on one credits page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreditsPage {
    /// Empty means "same title as the previous page".
    pub title: String,
    pub name1: String,
    pub name2: String,
}

impl CreditsPage {
    pub fn new(title: &str, name1: &str, name2: &str) -> Self {
        Self {
            title: title.to_string(),
            name1: name1.to_string(),
            name2: name2.to_string(),
        }
    }
}

/// All credits pages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credits {
    pages: Vec<CreditsPage>,
}

/// Map a character to the game's tile index.
pub fn encode_char(c: char) -> Result<u8, CreditsError> {
    Ok(match c {
        ' ' => 0xf4,
        '.' => 0xcf,
        '/' => 0xce,
        '!' => 0x07,
        '0'..='9' => c as u8 + 0xa0,
        'A'..='Z' => c as u8 + 0x99,
        // lowercase shares the uppercase tiles
        'a'..='z' => c as u8 + 0x79,
        _ => return Err(CreditsError::Unencodable(c)),
    })
}

/// Map a tile index back to a character.
pub fn decode_char(b: u8) -> Option<char> {
    Some(match b {
        0x07 => '!',
        0xce => '/',
        0xcf => '.',
        0xf4 | 0xf5 => ' ',
        0xd0..=0xd9 => (b - 0xa0) as char,
        0xda..=0xf3 => (b - 0x99) as char,
        _ => return None,
    })
}

/// Length-prefixed encoded string.
fn encode_string(s: &str) -> Result<Vec<u8>, CreditsError> {
    let len = s.chars().count();
    let len = u8::try_from(len).map_err(|_| CreditsError::TooLong(len))?;
    let mut b = Vec::with_capacity(len as usize + 1);
    b.push(len);
    for c in s.chars() {
        b.push(encode_char(c)?);
    }
    Ok(b)
}

/// Read the record at `address`; anything that is not a record reads as "".
fn read_record(rom: &RomData, address: usize) -> String {
    if rom.getc(address) != RECORD {
        return String::new();
    }

    let len = rom.getc(address + 2) as usize;
    let start = address + 3;
    (start..start + len)
        .map(|a| {
            let byte = rom.getc(a);
            decode_char(byte).unwrap_or_else(|| {
                warn!("cannot decode credits byte {:02x} at {:06x}", byte, a);
                UNKNOWN
            })
        })
        .collect()
}

impl Credits {
    /// Blank credits with `pages` pages.
    pub fn new(pages: usize) -> Self {
        Self {
            pages: vec![CreditsPage::default(); pages],
        }
    }

    pub fn pages(&self) -> &[CreditsPage] {
        &self.pages
    }

    pub fn get(&self, page: usize) -> Option<&CreditsPage> {
        self.pages.get(page)
    }

    pub fn set(&mut self, page: usize, text: CreditsPage) -> Result<(), CreditsError> {
        let slot = self.pages.get_mut(page).ok_or(CreditsError::NoSuchPage(page))?;
        *slot = text;
        Ok(())
    }

    /// Read every page from the credits table.
    pub fn decode(rom: &RomData, layout: &RomLayout) -> Result<Self, RomError> {
        let mut pages = Vec::with_capacity(layout.credits_pages);
        let mut previous_title = None;

        for i in 0..layout.credits_pages {
            let entry = PageEntry::read(&mut rom.cursor(layout.credits_table + 4 * i))?;

            let names = entry.names as usize + layout.credits_bank_offset;
            let name1 = read_record(rom, names);
            let name2 = read_record(rom, names + name1.len() + 3);

            // A title shared with the previous page is stored once
            let title = if previous_title == Some(entry.title) {
                String::new()
            } else {
                read_record(rom, entry.title as usize + layout.credits_bank_offset)
            };
            previous_title = Some(entry.title);

            pages.push(CreditsPage { title, name1, name2 });
        }

        Ok(Self { pages })
    }

    /// Write the pointer table and all strings.
    ///
    /// Everything is encoded before the first byte is written, so an
    /// unencodable string leaves the ROM unchanged.
    pub fn commit(&self, rom: &mut RomData, layout: &RomLayout) -> Result<(), CreditsError> {
        let encoded = self
            .pages
            .iter()
            .map(|p| Ok((encode_string(&p.title)?, encode_string(&p.name1)?, encode_string(&p.name2)?)))
            .collect::<Result<Vec<_>, CreditsError>>()?;

        let pointer = |address: usize| {
            address
                .checked_sub(layout.credits_bank_offset)
                .and_then(|a| u16::try_from(a).ok())
                .ok_or(CreditsError::AddressOutOfBank { address })
        };

        let mut table = layout.credits_table;
        let mut data = layout.credits_table + 4 * self.pages.len();
        let mut title_pointer = 0;

        for (i, (page, (title, name1, name2))) in self.pages.iter().zip(&encoded).enumerate() {
            // An empty title reuses the previous page's. The first page has
            // nothing to reuse and gets an empty record.
            if !page.title.is_empty() || i == 0 {
                title_pointer = pointer(data)?;
                rom.write(data, &[RECORD, TITLE_POSITION]);
                rom.write(data + 2, title);
                data += 2 + title.len();
                rom.putc(data, END);
                data += 1;
            }
            rom.putw(table, title_pointer);

            rom.putw(table + 2, pointer(data)?);
            rom.write(data, &[RECORD, NAME1_POSITION]);
            rom.write(data + 2, name1);
            data += 2 + name1.len();

            if !page.name2.is_empty() {
                rom.write(data, &[RECORD, NAME2_POSITION]);
                rom.write(data + 2, name2);
                data += 2 + name2.len();
            }

            rom.putc(data, END);
            data += 1;
            table += 4;
        }

        debug!("credits end at {:06x}", data);
        Ok(())
    }
}
