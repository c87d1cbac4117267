//! Reading patterns and songs out of a ROM image.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use binrw::BinRead;
use z2_ir::{Channel, Note, Pattern, Song, MAX_PATTERN_TICKS};

use crate::config::RomLayout;
use crate::error::RomError;
use crate::rom_data::RomData;

/// Number of entries in a song table.
pub const TABLE_SLOTS: usize = 8;

/// A sequence can address at most this many pattern offsets.
const MAX_SEQUENCE: usize = 256;

/// A pattern header: 6 bytes, or 8 when the tempo byte is 0.
#[derive(BinRead, Debug)]
#[br(little)]
struct PatternHeader {
    tempo: u8,
    /// Music bank address of the Pulse1 notes.
    notes: u16,
    /// Channel starts relative to `notes`; 0 when the channel is silent.
    triangle: u8,
    pulse2: u8,
    noise: u8,
    #[br(if(tempo == 0))]
    voices: Option<[u8; 2]>,
}

/// Decode the pattern whose header is at `address`.
pub fn read_pattern(rom: &RomData, address: usize, layout: &RomLayout) -> Result<Pattern, RomError> {
    let header = PatternHeader::read(&mut rom.cursor(address))?;

    let mut pattern = Pattern::new();
    match header.voices {
        Some([voice1, voice2]) => pattern.set_voicing(voice1, voice2),
        None => pattern.set_tempo(header.tempo),
    }

    let base = layout.rom_address(header.notes);
    read_channel(rom, &mut pattern, Channel::Pulse1, base);

    for (channel, offset) in [
        (Channel::Triangle, header.triangle),
        (Channel::Pulse2, header.pulse2),
        (Channel::Noise, header.noise),
    ] {
        if offset > 0 {
            read_channel(rom, &mut pattern, channel, base + offset as usize);
        }
    }

    Ok(pattern)
}

/// Read notes until a zero byte or until the channel is as long as it can be.
///
/// Pulse1 may be up to 64 quarters; the other channels stop at the Pulse1
/// length, which is why they only carry a terminator when they are shorter.
fn read_channel(rom: &RomData, pattern: &mut Pattern, channel: Channel, mut address: usize) {
    let limit = if channel == Channel::Pulse1 {
        MAX_PATTERN_TICKS
    } else {
        pattern.length()
    };

    // Counted from the bytes as written, before any triplet rewrite.
    let mut ticks = 0;
    while ticks < limit {
        let byte = rom.getc(address);
        address += 1;
        if byte == 0 {
            break;
        }

        let note = Note::from(byte);
        ticks += note.ticks();
        pattern.push_decoded(channel, note);
    }
}

/// Decode the song in `slot` of the table at `table`.
///
/// Sequence entries are offsets from the table to pattern headers. Each
/// distinct offset becomes one pattern; repeats only add to the sequence.
pub fn read_song(rom: &RomData, table: usize, slot: usize, layout: &RomLayout) -> Result<Song, RomError> {
    if slot >= TABLE_SLOTS {
        return Err(RomError::InvalidSlot(slot));
    }

    let start = table + rom.getc(table + slot) as usize;
    let mut seen: HashMap<u8, usize> = HashMap::new();
    let mut song = Song::new();

    for i in 0..MAX_SEQUENCE {
        let offset = rom.getc(start + i);
        if offset == 0 {
            return Ok(song);
        }

        let index = match seen.entry(offset) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let pattern = read_pattern(rom, table + offset as usize, layout)?;
                *e.insert(song.add_pattern(pattern))
            }
        };
        song.append_sequence(index)?;
    }

    Err(RomError::UnterminatedSequence { address: start })
}

#[cfg(test)]
mod tests {
    use super::*;
    use z2_ir::{parse_notes, Duration, Pitch};

    const LAYOUT: RomLayout = RomLayout::ZELDA2;
    const TABLE: usize = 0x1a000;

    /// Write a pattern header at `address` with notes at `notes`.
    fn place(rom: &mut RomData, pattern: &Pattern, address: usize, notes: usize) {
        let meta = pattern.meta_data(LAYOUT.cpu_address(notes).unwrap()).unwrap();
        rom.write(address, &meta);
        rom.write(notes, &pattern.note_data());
    }

    fn notes(text: &str) -> Vec<Note> {
        parse_notes(text, 0).unwrap()
    }

    #[test]
    fn pattern_round_trips_all_channel_combinations() {
        let full = || notes("c4.4 e4 g4 c5");
        let short = || notes("e3.8");
        let cases = vec![
            Pattern::with_notes(0x18, full(), vec![], vec![], vec![]),
            Pattern::with_notes(0x18, full(), full(), vec![], vec![]),
            Pattern::with_notes(0x18, full(), vec![], short(), vec![]),
            Pattern::with_notes(0x10, full(), short(), full(), notes("x.2 x x x r.8")),
            Pattern::voiced_with_notes(0x91, 0x9a, full(), full(), full(), full()),
        ];

        for (i, pattern) in cases.iter().enumerate() {
            let mut rom = RomData::new();
            place(&mut rom, pattern, TABLE + 0x20, 0x1a800);
            let decoded = read_pattern(&rom, TABLE + 0x20, &LAYOUT).unwrap();
            assert_eq!(&decoded, pattern, "case {}", i);
        }
    }

    #[test]
    fn empty_channels_stay_empty() {
        let pattern = Pattern::with_notes(0x18, notes("c4.8"), vec![], vec![], vec![]);
        let mut rom = RomData::new();
        // garbage after the terminator must not leak into other channels
        rom.write(0x1a802, &[0xd0, 0xd0, 0xd0]);
        place(&mut rom, &pattern, TABLE + 0x20, 0x1a800);

        let decoded = read_pattern(&rom, TABLE + 0x20, &LAYOUT).unwrap();
        for ch in [Channel::Pulse2, Channel::Triangle, Channel::Noise] {
            assert!(decoded.notes(ch).is_empty(), "{:?}", ch);
        }
    }

    #[test]
    fn triplet_group_is_rewritten_on_decode() {
        let mut rom = RomData::new();
        // EighthTriplet C4, EighthTriplet D4, QuarterTriplet E4, terminator
        rom.write(0x1a800, &[0x91, 0x95, 0xd9, 0x00]);

        rom.write(TABLE + 0x20, &[0x10, 0x00, 0xa8, 0, 0, 0]);
        let p = read_pattern(&rom, TABLE + 0x20, &LAYOUT).unwrap();
        let d: Vec<Duration> = p.notes(Channel::Pulse1).iter().map(|n| n.duration()).collect();
        assert_eq!(d, vec![Duration::DottedEighth, Duration::DottedEighth, Duration::Eighth]);

        rom.write(TABLE + 0x20, &[0x18, 0x00, 0xa8, 0, 0, 0]);
        let p = read_pattern(&rom, TABLE + 0x20, &LAYOUT).unwrap();
        let d: Vec<Duration> = p.notes(Channel::Pulse1).iter().map(|n| n.duration()).collect();
        assert_eq!(d, vec![Duration::EighthTriplet; 3]);
    }

    #[test]
    fn secondary_channel_stops_at_pattern_length() {
        let mut rom = RomData::new();
        // Pulse1: one half note. Pulse2: three quarters with no terminator.
        rom.write(0x1a800, &[0x51, 0x00, 0xd0, 0xd0, 0xd0]);
        rom.write(TABLE + 0x20, &[0x18, 0x00, 0xa8, 0, 2, 0]);

        let p = read_pattern(&rom, TABLE + 0x20, &LAYOUT).unwrap();
        assert_eq!(p.notes(Channel::Pulse2).len(), 2);
        assert_eq!(p.channel_length(Channel::Pulse2), p.length());
    }

    #[test]
    fn repeated_offsets_share_one_pattern() {
        let a = Pattern::with_notes(0x18, notes("c4.8"), vec![], vec![], vec![]);
        let b = Pattern::with_notes(0x18, notes("d4.8"), vec![], vec![], vec![]);

        let mut rom = RomData::new();
        rom.write(TABLE, &[0x08; 8]);
        rom.putc(TABLE + 2, 0x0c);
        // slot 2 sequence: a, b, a
        rom.write(TABLE + 0x0c, &[0x10, 0x16, 0x10, 0x00]);
        place(&mut rom, &a, TABLE + 0x10, 0x1a800);
        place(&mut rom, &b, TABLE + 0x16, 0x1a810);

        let song = read_song(&rom, TABLE, 2, &LAYOUT).unwrap();
        assert_eq!(song.pattern_count(), 2);
        assert_eq!(song.sequence(), &[0, 1, 0]);
        assert_eq!(song.patterns()[0].notes(Channel::Pulse1)[0].pitch(), Pitch::C4);
        assert_eq!(song.patterns()[1].notes(Channel::Pulse1)[0].pitch(), Pitch::D4);

        // the other slots point at an empty sequence
        let empty = read_song(&rom, TABLE, 0, &LAYOUT).unwrap();
        assert_eq!(empty.pattern_count(), 0);
        assert!(empty.sequence().is_empty());
    }

    #[test]
    fn slot_out_of_range() {
        let rom = RomData::new();
        assert!(matches!(read_song(&rom, TABLE, 8, &LAYOUT), Err(RomError::InvalidSlot(8))));
    }

    #[test]
    fn sequence_without_terminator_fails() {
        let mut rom = RomData::new();
        rom.write(TABLE, &[0x08; 8]);
        // one offset repeated well past the sequence limit
        rom.write(TABLE + 8, &[0x10; 300]);
        assert!(match read_song(&rom, TABLE, 0, &LAYOUT) {
            Err(RomError::UnterminatedSequence { address }) => address == TABLE + 8,
            _ => false,
        });
    }

    #[test]
    fn header_past_the_end_is_an_error() {
        let rom = RomData::new();
        let address = crate::rom_data::ROM_SIZE - 3;
        assert!(matches!(read_pattern(&rom, address, &LAYOUT), Err(RomError::Header(_))));
    }

    #[test]
    fn voiced_header_past_the_end_is_an_error() {
        let mut rom = RomData::new();
        let address = crate::rom_data::ROM_SIZE - 7;
        rom.write(address, &[0x00, 0x00, 0xa8, 0, 0, 0, 0x91]);
        assert!(matches!(read_pattern(&rom, address, &LAYOUT), Err(RomError::Header(_))));
    }
}
