//! Songs: a pattern pool and the order to play it in.

use alloc::vec::Vec;

use crate::error::SongError;
use crate::pattern::Pattern;

/// A song is a list of unique patterns plus a playback sequence of
/// indices into that list. The same pattern may be played many times.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Song {
    patterns: Vec<Pattern>,
    sequence: Vec<usize>,
}

impl Song {
    /// Create an empty song.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pattern to the pool and return its index.
    pub fn add_pattern(&mut self, pattern: Pattern) -> usize {
        self.patterns.push(pattern);
        self.patterns.len() - 1
    }

    /// Append one entry to the playback sequence.
    pub fn append_sequence(&mut self, pattern: usize) -> Result<(), SongError> {
        self.check_index(self.sequence.len(), pattern)?;
        self.sequence.push(pattern);
        Ok(())
    }

    /// Replace the playback sequence.
    pub fn set_sequence(&mut self, sequence: Vec<usize>) -> Result<(), SongError> {
        for (index, &pattern) in sequence.iter().enumerate() {
            self.check_index(index, pattern)?;
        }
        self.sequence = sequence;
        Ok(())
    }

    fn check_index(&self, index: usize, pattern: usize) -> Result<(), SongError> {
        if pattern < self.patterns.len() {
            Ok(())
        } else {
            Err(SongError::PatternIndex { index, pattern, count: self.patterns.len() })
        }
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn patterns_mut(&mut self) -> &mut [Pattern] {
        &mut self.patterns
    }

    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence.len()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// The pattern played at a given sequence position.
    pub fn pattern_at(&self, position: usize) -> Option<&Pattern> {
        self.sequence.get(position).map(|&i| &self.patterns[i])
    }

    pub fn pattern_at_mut(&mut self, position: usize) -> Option<&mut Pattern> {
        let i = *self.sequence.get(position)?;
        self.patterns.get_mut(i)
    }

    /// Remove all patterns and the sequence.
    pub fn clear(&mut self) {
        self.patterns.clear();
        self.sequence.clear();
    }

    /// Header bytes this song needs in its table group: the sequence with
    /// its terminator plus every pattern's metadata.
    pub fn metadata_length(&self) -> usize {
        self.sequence.len() + 1 + self.patterns_length()
    }

    /// Total pattern metadata bytes.
    pub fn patterns_length(&self) -> usize {
        self.patterns.iter().map(Pattern::metadata_length).sum()
    }

    /// Byte offset of each pattern's metadata when laid out from `first`.
    pub fn pattern_offsets(&self, first: u8) -> Result<Vec<u8>, SongError> {
        let mut offset = first as usize;
        let mut offsets = Vec::with_capacity(self.patterns.len());
        for (pattern, p) in self.patterns.iter().enumerate() {
            let o = u8::try_from(offset).map_err(|_| SongError::OffsetOverflow { pattern, offset })?;
            offsets.push(o);
            offset += p.metadata_length();
        }
        Ok(offsets)
    }

    /// Encoded sequence data, with patterns laid out from `first`.
    pub fn sequence_data(&self, first: u8) -> Result<Vec<u8>, SongError> {
        let offsets = self.pattern_offsets(first)?;
        let mut b = Vec::with_capacity(self.sequence.len() + 1);
        b.extend(self.sequence.iter().map(|&i| offsets[i]));
        b.push(0);
        Ok(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::{Duration, Note, Pitch};
    use alloc::vec;

    fn pattern(tempo: u8) -> Pattern {
        Pattern::with_notes(tempo, vec![Note::new(Duration::Half, Pitch::C4)], vec![], vec![], vec![])
    }

    #[test]
    fn sequence_data_uses_pattern_offsets() {
        let mut song = Song::new();
        song.add_pattern(pattern(0x18));
        song.add_pattern(pattern(0x00));
        song.add_pattern(pattern(0x18));
        song.set_sequence(vec![0, 1, 1, 2, 0]).unwrap();

        // Second pattern is voiced (8 bytes), others are 6
        assert_eq!(song.sequence_data(0x20).unwrap(), vec![0x20, 0x26, 0x26, 0x2e, 0x20, 0x00]);
        assert_eq!(song.metadata_length(), 5 + 1 + 6 + 8 + 6);
    }

    #[test]
    fn rejects_out_of_range_sequence() {
        let mut song = Song::new();
        song.add_pattern(pattern(0x18));
        assert_eq!(
            song.set_sequence(vec![0, 1]),
            Err(SongError::PatternIndex { index: 1, pattern: 1, count: 1 })
        );
        assert!(song.append_sequence(3).is_err());
        assert!(song.sequence().is_empty());
    }

    #[test]
    fn pattern_at_follows_sequence() {
        let mut song = Song::new();
        song.add_pattern(pattern(0x18));
        song.add_pattern(pattern(0x10));
        song.set_sequence(vec![1, 0]).unwrap();

        assert_eq!(song.pattern_at(0).map(|p| p.tempo()), Some(0x10));
        assert_eq!(song.pattern_at(1).map(|p| p.tempo()), Some(0x18));
        assert!(song.pattern_at(2).is_none());

        song.pattern_at_mut(0).unwrap().set_tempo(0x08);
        assert_eq!(song.patterns()[1].tempo(), 0x08);
    }

    #[test]
    fn offsets_past_a_byte_are_rejected() {
        let mut song = Song::new();
        song.add_pattern(pattern(0x18));
        song.add_pattern(pattern(0x18));
        song.set_sequence(vec![0, 1]).unwrap();
        assert_eq!(
            song.sequence_data(0xfc),
            Err(SongError::OffsetOverflow { pattern: 1, offset: 0x102 })
        );
    }
}
