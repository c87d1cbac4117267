//! Packed note byte.
//!
//! A note is a single byte holding two independent fields:
//!
//! ```text
//!   7 6 5 4 3 2 1 0
//!   D D P P P P P D     D = duration (mask 0xc1), P = pitch (mask 0x3e)
//! ```
//!
//! The byte `0x00` is never a note; the decoder treats it as a channel
//! terminator.

use core::fmt;

use crate::error::NoteError;

/// Bits of a note byte that hold the duration class.
pub const DURATION_MASK: u8 = 0xc1;

/// Bits of a note byte that hold the pitch class.
pub const PITCH_MASK: u8 = 0x3e;

/// Tick resolution: ticks per quarter note (same as standard MIDI files).
pub const TICKS_PER_QUARTER: usize = 96;

/// Duration class of a note.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Duration {
    Sixteenth = 0x00,
    DottedQuarter = 0x01,
    DottedEighth = 0x40,
    Half = 0x41,
    Eighth = 0x80,
    EighthTriplet = 0x81,
    Quarter = 0xc0,
    QuarterTriplet = 0xc1,
}

impl Duration {
    /// All duration classes, in encoding order.
    pub const ALL: [Duration; 8] = [
        Duration::Sixteenth,
        Duration::DottedQuarter,
        Duration::DottedEighth,
        Duration::Half,
        Duration::Eighth,
        Duration::EighthTriplet,
        Duration::Quarter,
        Duration::QuarterTriplet,
    ];

    /// Classify the duration bits of a note byte.
    pub const fn from_bits(byte: u8) -> Self {
        match byte & DURATION_MASK {
            0x00 => Duration::Sixteenth,
            0x01 => Duration::DottedQuarter,
            0x40 => Duration::DottedEighth,
            0x41 => Duration::Half,
            0x80 => Duration::Eighth,
            0x81 => Duration::EighthTriplet,
            0xc0 => Duration::Quarter,
            _ => Duration::QuarterTriplet,
        }
    }

    /// Length in ticks at [`TICKS_PER_QUARTER`] resolution.
    ///
    /// Triplets are truncated to whole ticks.
    pub const fn ticks(self) -> usize {
        const Q: usize = TICKS_PER_QUARTER;
        match self {
            Duration::Sixteenth => Q / 4,
            Duration::DottedQuarter => Q * 3 / 2,
            Duration::DottedEighth => Q / 2 * 3 / 2,
            Duration::Half => Q * 2,
            Duration::Eighth => Q / 2,
            Duration::EighthTriplet => Q / 2 * 2 / 3,
            Duration::Quarter => Q,
            Duration::QuarterTriplet => Q * 2 / 3,
        }
    }

    /// Look up a duration by MIDI tick count (24 ticks per quarter).
    pub fn from_midi_ticks(ticks: u32) -> Result<Self, NoteError> {
        Ok(match ticks {
            6 => Duration::Sixteenth,
            36 => Duration::DottedQuarter,
            18 => Duration::DottedEighth,
            48 => Duration::Half,
            12 => Duration::Eighth,
            8 => Duration::EighthTriplet,
            24 => Duration::Quarter,
            16 => Duration::QuarterTriplet,
            _ => return Err(NoteError::UnsupportedDuration(ticks)),
        })
    }
}

/// Pitch class of a note.
///
/// The sound engine only has a sparse chromatic range: a few notes of
/// octave 3 and everything from C4 up to B5 except G#5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Pitch {
    /// Pitch bits all clear. Not produced by the game's own data, but any
    /// byte can be decoded so it needs a class.
    Null = 0x00,
    Rest = 0x02,
    E3 = 0x04,
    G3 = 0x06,
    Gs3 = 0x08,
    A3 = 0x0a,
    As3 = 0x0c,
    B3 = 0x0e,
    C4 = 0x10,
    Cs4 = 0x12,
    D4 = 0x14,
    Ds4 = 0x16,
    E4 = 0x18,
    F4 = 0x1a,
    Fs4 = 0x1c,
    G4 = 0x1e,
    Gs4 = 0x20,
    A4 = 0x22,
    As4 = 0x24,
    B4 = 0x26,
    C5 = 0x28,
    Cs5 = 0x2a,
    D5 = 0x2c,
    Ds5 = 0x2e,
    E5 = 0x30,
    F5 = 0x32,
    Fs5 = 0x34,
    G5 = 0x36,
    A5 = 0x38,
    As5 = 0x3a,
    B5 = 0x3c,
    Cs3 = 0x3e,
}

/// Pitch classes indexed by `bits >> 1`.
const PITCHES: [Pitch; 32] = [
    Pitch::Null,
    Pitch::Rest,
    Pitch::E3,
    Pitch::G3,
    Pitch::Gs3,
    Pitch::A3,
    Pitch::As3,
    Pitch::B3,
    Pitch::C4,
    Pitch::Cs4,
    Pitch::D4,
    Pitch::Ds4,
    Pitch::E4,
    Pitch::F4,
    Pitch::Fs4,
    Pitch::G4,
    Pitch::Gs4,
    Pitch::A4,
    Pitch::As4,
    Pitch::B4,
    Pitch::C5,
    Pitch::Cs5,
    Pitch::D5,
    Pitch::Ds5,
    Pitch::E5,
    Pitch::F5,
    Pitch::Fs5,
    Pitch::G5,
    Pitch::A5,
    Pitch::As5,
    Pitch::B5,
    Pitch::Cs3,
];

impl Pitch {
    /// Classify the pitch bits of a note byte.
    pub const fn from_bits(byte: u8) -> Self {
        PITCHES[((byte & PITCH_MASK) >> 1) as usize]
    }

    /// Look up a pitch by MIDI note number. `0` is the rest marker.
    pub fn from_midi(note: i32) -> Result<Self, NoteError> {
        Ok(match note {
            0 => Pitch::Rest,
            49 => Pitch::Cs3,
            52 => Pitch::E3,
            55 => Pitch::G3,
            // 56 (G#3) through 79 (G5) are contiguous, two bits per step
            56..=79 => PITCHES[(note - 52) as usize],
            81 => Pitch::A5,
            82 => Pitch::As5,
            83 => Pitch::B5,
            _ => return Err(NoteError::UnsupportedPitch(note)),
        })
    }

    /// Four-character display mnemonic, e.g. `"C#4."` or `"---."`.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Pitch::Null => "???.",
            Pitch::Rest => "---.",
            Pitch::Cs3 => "C#3.",
            Pitch::E3 => "E3..",
            Pitch::G3 => "G3..",
            Pitch::Gs3 => "G#3.",
            Pitch::A3 => "A3..",
            Pitch::As3 => "A#3.",
            Pitch::B3 => "B3..",
            Pitch::C4 => "C4..",
            Pitch::Cs4 => "C#4.",
            Pitch::D4 => "D4..",
            Pitch::Ds4 => "D#4.",
            Pitch::E4 => "E4..",
            Pitch::F4 => "F4..",
            Pitch::Fs4 => "F#4.",
            Pitch::G4 => "G4..",
            Pitch::Gs4 => "G#4.",
            Pitch::A4 => "A4..",
            Pitch::As4 => "A#4.",
            Pitch::B4 => "B4..",
            Pitch::C5 => "C5..",
            Pitch::Cs5 => "C#5.",
            Pitch::D5 => "D5..",
            Pitch::Ds5 => "D#5.",
            Pitch::E5 => "E5..",
            Pitch::F5 => "F5..",
            Pitch::Fs5 => "F#5.",
            Pitch::G5 => "G5..",
            Pitch::A5 => "A5..",
            Pitch::As5 => "A#5.",
            Pitch::B5 => "B5..",
        }
    }
}

/// One packed note byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note(u8);

impl Note {
    /// Combine a duration and a pitch.
    pub const fn new(duration: Duration, pitch: Pitch) -> Self {
        Note(duration as u8 | pitch as u8)
    }

    /// Translate a MIDI note number and tick count (24 ticks per quarter).
    ///
    /// Only the pitches and durations the sound engine can play are
    /// accepted; anything else is an error for the caller to handle.
    pub fn from_midi(note: i32, ticks: u32) -> Result<Self, NoteError> {
        let pitch = Pitch::from_midi(note)?;
        let duration = Duration::from_midi_ticks(ticks)?;
        Ok(Note::new(duration, pitch))
    }

    /// The raw byte.
    pub const fn byte(self) -> u8 {
        self.0
    }

    pub const fn duration(self) -> Duration {
        Duration::from_bits(self.0)
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.0 = duration as u8 | (self.0 & PITCH_MASK);
    }

    pub const fn pitch(self) -> Pitch {
        Pitch::from_bits(self.0)
    }

    pub fn set_pitch(&mut self, pitch: Pitch) {
        self.0 = (self.0 & DURATION_MASK) | pitch as u8;
    }

    /// Length of this note in ticks.
    pub const fn ticks(self) -> usize {
        self.duration().ticks()
    }

    /// Four-character pitch mnemonic for diagnostics.
    pub const fn mnemonic(self) -> &'static str {
        self.pitch().mnemonic()
    }
}

impl From<u8> for Note {
    fn from(byte: u8) -> Self {
        Note(byte)
    }
}

impl From<Note> for u8 {
    fn from(note: Note) -> Self {
        note.0
    }
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Note({:02x} {} {:?})", self.0, self.mnemonic(), self.duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_byte_round_trips_through_fields() {
        for b in 0..=255u8 {
            let n = Note::from(b);
            assert_eq!(Note::new(n.duration(), n.pitch()).byte(), b, "byte {:02x}", b);
        }
    }

    #[test]
    fn tick_table() {
        assert_eq!(Duration::Sixteenth.ticks(), 24);
        assert_eq!(Duration::Eighth.ticks(), 48);
        assert_eq!(Duration::DottedEighth.ticks(), 72);
        assert_eq!(Duration::EighthTriplet.ticks(), 32);
        assert_eq!(Duration::Quarter.ticks(), 96);
        assert_eq!(Duration::QuarterTriplet.ticks(), 64);
        assert_eq!(Duration::DottedQuarter.ticks(), 144);
        assert_eq!(Duration::Half.ticks(), 192);
    }

    #[test]
    fn fields_do_not_overlap() {
        assert_eq!(DURATION_MASK & PITCH_MASK, 0);
        for d in Duration::ALL {
            assert_eq!(d as u8 & PITCH_MASK, 0);
        }
        for p in PITCHES {
            assert_eq!(p as u8 & DURATION_MASK, 0);
        }
    }

    #[test]
    fn pitch_table_is_indexed_by_bits() {
        for (i, p) in PITCHES.iter().enumerate() {
            assert_eq!(*p as u8, (i as u8) << 1);
        }
    }

    #[test]
    fn setters_keep_other_field() {
        let mut n = Note::new(Duration::Quarter, Pitch::A4);
        n.set_duration(Duration::EighthTriplet);
        assert_eq!(n.pitch(), Pitch::A4);
        assert_eq!(n.duration(), Duration::EighthTriplet);

        n.set_pitch(Pitch::Cs3);
        assert_eq!(n.duration(), Duration::EighthTriplet);
        assert_eq!(n.byte(), 0x81 | 0x3e);
    }

    #[test]
    fn from_midi_tables() {
        assert_eq!(Note::from_midi(60, 24).unwrap().byte(), 0xc0 | 0x10);
        assert_eq!(Note::from_midi(0, 6).unwrap().byte(), 0x02);
        assert_eq!(Note::from_midi(49, 48).unwrap().byte(), 0x41 | 0x3e);
        assert_eq!(Note::from_midi(56, 8).unwrap().pitch(), Pitch::Gs3);
        assert_eq!(Note::from_midi(79, 12).unwrap().pitch(), Pitch::G5);
        assert_eq!(Note::from_midi(81, 16).unwrap().pitch(), Pitch::A5);
        assert_eq!(Note::from_midi(83, 18).unwrap().byte(), 0x40 | 0x3c);
    }

    #[test]
    fn from_midi_rejects_unplayable() {
        assert_eq!(Note::from_midi(80, 24), Err(NoteError::UnsupportedPitch(80)));
        assert_eq!(Note::from_midi(50, 24), Err(NoteError::UnsupportedPitch(50)));
        assert_eq!(Note::from_midi(60, 30), Err(NoteError::UnsupportedDuration(30)));
    }

    #[test]
    fn mnemonics() {
        assert_eq!(Note::new(Duration::Quarter, Pitch::C4).mnemonic(), "C4..");
        assert_eq!(Note::new(Duration::Half, Pitch::Fs5).mnemonic(), "F#5.");
        assert_eq!(Note::new(Duration::Eighth, Pitch::Rest).mnemonic(), "---.");
        assert_eq!(Note::from(0x80).mnemonic(), "???.");
    }
}
