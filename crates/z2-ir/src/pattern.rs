//! Patterns: four channels of notes plus tempo or voicing.

use alloc::vec::Vec;
use arrayvec::ArrayVec;

use crate::error::PatternError;
use crate::note::{Duration, Note, TICKS_PER_QUARTER};

/// Longest pattern the decoder will read, in ticks (64 quarter notes).
pub const MAX_PATTERN_TICKS: usize = 64 * TICKS_PER_QUARTER;

/// Tempo flag that changes how a triplet group is counted.
pub const TRIPLET_FLAG: u8 = 0x08;

/// Tempo used for freshly created patterns.
pub const DEFAULT_TEMPO: u8 = 0x18;

/// Header bytes of a pattern without / with voicing.
pub const METADATA_LENGTH: usize = 6;
pub const VOICED_METADATA_LENGTH: usize = 8;

/// Sound channel. Discriminants give the order of note data blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Pulse1 = 0,
    Pulse2 = 1,
    Triangle = 2,
    Noise = 3,
}

impl Channel {
    /// All channels in note data order.
    pub const ALL: [Channel; 4] = [
        Channel::Pulse1,
        Channel::Pulse2,
        Channel::Triangle,
        Channel::Noise,
    ];
}

/// One pattern of music.
///
/// A tempo of zero switches the pattern into voicing mode: the header then
/// carries two instrument voice bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    tempo: u8,
    voice1: u8,
    voice2: u8,
    notes: [Vec<Note>; 4],
}

impl Default for Pattern {
    fn default() -> Self {
        Self {
            tempo: DEFAULT_TEMPO,
            voice1: 0,
            voice2: 0,
            notes: Default::default(),
        }
    }
}

impl Pattern {
    /// Create an empty pattern with the default tempo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pattern from per-channel note lists.
    pub fn with_notes(
        tempo: u8,
        pulse1: Vec<Note>,
        pulse2: Vec<Note>,
        triangle: Vec<Note>,
        noise: Vec<Note>,
    ) -> Self {
        Self {
            tempo,
            voice1: 0,
            voice2: 0,
            notes: [pulse1, pulse2, triangle, noise],
        }
    }

    /// Create a voiced pattern from per-channel note lists.
    pub fn voiced_with_notes(
        voice1: u8,
        voice2: u8,
        pulse1: Vec<Note>,
        pulse2: Vec<Note>,
        triangle: Vec<Note>,
        noise: Vec<Note>,
    ) -> Self {
        Self {
            tempo: 0,
            voice1,
            voice2,
            notes: [pulse1, pulse2, triangle, noise],
        }
    }

    pub fn tempo(&self) -> u8 {
        self.tempo
    }

    pub fn set_tempo(&mut self, tempo: u8) {
        self.tempo = tempo;
    }

    /// True when the header carries voice bytes instead of a tempo.
    pub fn voiced(&self) -> bool {
        self.tempo == 0
    }

    pub fn voice1(&self) -> u8 {
        self.voice1
    }

    pub fn voice2(&self) -> u8 {
        self.voice2
    }

    /// Switch to voicing mode.
    pub fn set_voicing(&mut self, voice1: u8, voice2: u8) {
        self.tempo = 0;
        self.voice1 = voice1;
        self.voice2 = voice2;
    }

    pub fn notes(&self, channel: Channel) -> &[Note] {
        &self.notes[channel as usize]
    }

    /// Append notes to a channel as-is.
    pub fn add_notes(&mut self, channel: Channel, notes: impl IntoIterator<Item = Note>) {
        self.notes[channel as usize].extend(notes);
    }

    /// Replace the notes of a channel.
    pub fn set_notes(&mut self, channel: Channel, notes: Vec<Note>) {
        self.notes[channel as usize] = notes;
    }

    /// Remove all notes from every channel.
    pub fn clear(&mut self) {
        for ch in &mut self.notes {
            ch.clear();
        }
    }

    /// Append a note read from the ROM, applying the triplet rewrite.
    ///
    /// When a QuarterTriplet follows two EighthTriplets the engine does not
    /// play the written durations. With [`TRIPLET_FLAG`] set in the tempo the
    /// last note counts as a third EighthTriplet; otherwise the group is a
    /// dotted eighth, dotted eighth, eighth.
    pub fn push_decoded(&mut self, channel: Channel, note: Note) {
        let triplet_flag = self.tempo & TRIPLET_FLAG != 0;
        let notes = &mut self.notes[channel as usize];
        notes.push(note);

        if note.duration() != Duration::QuarterTriplet || notes.len() < 3 {
            return;
        }

        let i = notes.len() - 3;
        if notes[i].duration() == Duration::EighthTriplet
            && notes[i + 1].duration() == Duration::EighthTriplet
        {
            if triplet_flag {
                notes[i + 2].set_duration(Duration::EighthTriplet);
            } else {
                notes[i].set_duration(Duration::DottedEighth);
                notes[i + 1].set_duration(Duration::DottedEighth);
                notes[i + 2].set_duration(Duration::Eighth);
            }
        }
    }

    /// Length of the pattern in ticks (the length of Pulse1).
    pub fn length(&self) -> usize {
        self.channel_length(Channel::Pulse1)
    }

    /// Length of one channel in ticks.
    pub fn channel_length(&self, channel: Channel) -> usize {
        self.notes[channel as usize].iter().map(|n| n.ticks()).sum()
    }

    /// Header size in bytes.
    pub fn metadata_length(&self) -> usize {
        if self.voiced() {
            VOICED_METADATA_LENGTH
        } else {
            METADATA_LENGTH
        }
    }

    /// Whether a channel's note data ends with an explicit zero byte.
    ///
    /// Pulse1 always does. Other channels only need one when they stop
    /// before the pattern length; otherwise the decoder stops on length.
    fn terminated(&self, channel: Channel) -> bool {
        if channel == Channel::Pulse1 {
            return true;
        }
        let len = self.channel_length(channel);
        len > 0 && len < self.length()
    }

    /// Encoded size of one channel's note data.
    pub fn note_data_length(&self, channel: Channel) -> usize {
        self.notes[channel as usize].len() + usize::from(self.terminated(channel))
    }

    /// Encoded note data of one channel.
    pub fn channel_note_data(&self, channel: Channel) -> Vec<u8> {
        let notes = &self.notes[channel as usize];
        let mut b = Vec::with_capacity(notes.len() + 1);
        b.extend(notes.iter().map(|n| n.byte()));
        if self.terminated(channel) {
            b.push(0);
        }
        b
    }

    /// Encoded note data of the whole pattern.
    pub fn note_data(&self) -> Vec<u8> {
        Channel::ALL
            .iter()
            .flat_map(|&ch| self.channel_note_data(ch))
            .collect()
    }

    /// Encoded header, given where the note data will live.
    ///
    /// `note_address` is the 16-bit CPU address of the first note byte.
    pub fn meta_data(&self, note_address: u16) -> Result<ArrayVec<u8, 8>, PatternError> {
        let pw1 = self.note_data_length(Channel::Pulse1);
        let pw2 = self.note_data_length(Channel::Pulse2);
        let tri = self.note_data_length(Channel::Triangle);
        let noi = self.note_data_length(Channel::Noise);

        let offset = |channel: Channel, len: usize, start: usize| {
            if len == 0 {
                return Ok(0);
            }
            u8::try_from(start)
                .map_err(|_| PatternError::ChannelOffsetOverflow { channel, offset: start })
        };

        let mut b = ArrayVec::new();
        let [lo, hi] = note_address.to_le_bytes();
        b.push(self.tempo);
        b.push(lo);
        b.push(hi);
        b.push(offset(Channel::Triangle, tri, pw1 + pw2)?);
        b.push(offset(Channel::Pulse2, pw2, pw1)?);
        b.push(offset(Channel::Noise, noi, pw1 + pw2 + tri)?);

        if self.voiced() {
            b.push(self.voice1);
            b.push(self.voice2);
        }

        Ok(b)
    }

    /// Check the channel length rules the decoder relies on.
    pub fn validate(&self) -> Result<(), PatternError> {
        let length = self.length();
        if length > MAX_PATTERN_TICKS {
            return Err(PatternError::TooLong { ticks: length, limit: MAX_PATTERN_TICKS });
        }
        for channel in [Channel::Pulse2, Channel::Triangle, Channel::Noise] {
            let ticks = self.channel_length(channel);
            if ticks > length {
                return Err(PatternError::ChannelLength { channel, ticks, length });
            }
        }
        Ok(())
    }
}
