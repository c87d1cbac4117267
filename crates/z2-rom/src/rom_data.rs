//! Raw ROM bytes with the permissive access rules the decoders expect.

use std::io::Cursor;

use crate::error::RomError;

/// Size of the iNES header in front of the PRG data.
pub const HEADER_SIZE: usize = 0x10;

/// Size of the PRG/CHR data after the header.
pub const ROM_SIZE: usize = 0x40000;

/// Value returned for reads past the end of the data.
///
/// Decode loops sometimes probe beyond their nominal region; they rely on
/// getting this value back instead of an error.
pub const FILL_BYTE: u8 = 0xff;

/// Header plus data bytes of a ROM image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RomData {
    header: [u8; HEADER_SIZE],
    data: Vec<u8>,
}

impl Default for RomData {
    fn default() -> Self {
        Self {
            header: [0; HEADER_SIZE],
            data: vec![0; ROM_SIZE],
        }
    }
}

impl RomData {
    /// A zero-filled image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a file image into header and data.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RomError> {
        if bytes.len() != HEADER_SIZE + ROM_SIZE {
            return Err(RomError::InvalidSize {
                expected: HEADER_SIZE + ROM_SIZE,
                found: bytes.len(),
            });
        }

        let mut header = [0; HEADER_SIZE];
        header.copy_from_slice(&bytes[..HEADER_SIZE]);
        Ok(Self {
            header,
            data: bytes[HEADER_SIZE..].to_vec(),
        })
    }

    /// The file image: header followed by data.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut b = Vec::with_capacity(HEADER_SIZE + ROM_SIZE);
        b.extend_from_slice(&self.header);
        b.extend_from_slice(&self.data);
        b
    }

    pub fn header(&self) -> &[u8; HEADER_SIZE] {
        &self.header
    }

    /// A reader positioned at `address`, for structured reads with binrw.
    ///
    /// Unlike [`RomData::getc`] this has no fill value: reading past the
    /// end is an error.
    pub fn cursor(&self, address: usize) -> Cursor<&[u8]> {
        let mut cursor = Cursor::new(self.data.as_slice());
        cursor.set_position(address as u64);
        cursor
    }

    pub fn getc(&self, address: usize) -> u8 {
        self.data.get(address).copied().unwrap_or(FILL_BYTE)
    }

    /// Little-endian word.
    pub fn getw(&self, address: usize) -> u16 {
        u16::from_le_bytes([self.getc(address), self.getc(address + 1)])
    }

    /// Fill `buf` from `address`, padding past the end with [`FILL_BYTE`].
    pub fn read(&self, address: usize, buf: &mut [u8]) {
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.getc(address + i);
        }
    }

    /// Write one byte. Writes past the end are dropped.
    pub fn putc(&mut self, address: usize, value: u8) {
        if let Some(b) = self.data.get_mut(address) {
            *b = value;
        }
    }

    pub fn putw(&mut self, address: usize, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.putc(address, lo);
        self.putc(address + 1, hi);
    }

    pub fn write(&mut self, address: usize, bytes: &[u8]) {
        for (i, &b) in bytes.iter().enumerate() {
            self.putc(address + i, b);
        }
    }
}
