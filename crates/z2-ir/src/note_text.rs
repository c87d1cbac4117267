//! Minimal text notation for building note lists.
//!
//! In `"c4.4 e4 g4 r.8 x.2"` a letter picks the pitch, the first digit is
//! the octave and the second the duration in sixteenths. Duration carries
//! over to following notes that leave it out. Spaces end a note.

use alloc::vec::Vec;

use crate::error::NoteError;
use crate::note::Note;

/// Ticks (24 per quarter) per duration unit.
const TICKS_PER_UNIT: u32 = 6;

#[derive(Default)]
struct Pending {
    pitch: i32,
    octave: i32,
    duration: u32,
}

impl Pending {
    fn ready(&self) -> bool {
        self.pitch != 0 && self.octave != 0 && self.duration != 0
    }

    fn midi(&self, transpose: i32) -> i32 {
        if self.pitch > 0 {
            self.pitch + 12 * self.octave + 11 + transpose
        } else {
            0
        }
    }
}

/// Parse a line of note text, shifting every pitch by `transpose` semitones.
pub fn parse_notes(text: &str, transpose: i32) -> Result<Vec<Note>, NoteError> {
    let mut notes = Vec::new();
    let mut cur = Pending::default();

    for c in text.chars() {
        match c {
            'C' | 'c' => cur.pitch = 1,
            'D' | 'd' => cur.pitch = 3,
            'E' | 'e' => cur.pitch = 5,
            'F' | 'f' => cur.pitch = 6,
            'G' | 'g' => cur.pitch = 8,
            'A' | 'a' => cur.pitch = 10,
            'B' => cur.pitch = 12,
            // Lowercase b is the note B until a pitch is chosen, then a flat
            'b' if cur.pitch == 0 => cur.pitch = 12,
            'b' => cur.pitch -= 1,
            '#' | 's' => cur.pitch += 1,
            '1'..='8' => {
                let digit = c as i32 - '0' as i32;
                if cur.octave == 0 {
                    cur.octave = digit;
                } else {
                    cur.duration = digit as u32;
                }
            }
            '.' => {}
            // snare drum (G#3)
            'x' => {
                cur.pitch = 9;
                cur.octave = 3;
            }
            'r' | '-' => {
                cur.pitch = -1;
                cur.octave = -1;
            }
            ' ' => flush(&mut cur, &mut notes, transpose)?,
            _ => tracing::warn!("unknown character {:?} in note text", c),
        }
    }

    flush(&mut cur, &mut notes, transpose)?;
    Ok(notes)
}

fn flush(cur: &mut Pending, notes: &mut Vec<Note>, transpose: i32) -> Result<(), NoteError> {
    if cur.ready() {
        notes.push(Note::from_midi(cur.midi(transpose), TICKS_PER_UNIT * cur.duration)?);
        cur.pitch = 0;
        cur.octave = 0;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::{Duration, Pitch};
    use alloc::vec;

    fn fields(notes: &[Note]) -> Vec<(Pitch, Duration)> {
        notes.iter().map(|n| (n.pitch(), n.duration())).collect()
    }

    #[test]
    fn duration_carries_over() {
        let notes = parse_notes("c4.4 e4 g4.8", 0).unwrap();
        assert_eq!(
            fields(&notes),
            vec![
                (Pitch::C4, Duration::Quarter),
                (Pitch::E4, Duration::Quarter),
                (Pitch::G4, Duration::Half),
            ]
        );
    }

    #[test]
    fn accidentals() {
        let notes = parse_notes("f#4.2 bb4 b4 C#5 ds5", 0).unwrap();
        assert_eq!(
            notes.iter().map(|n| n.pitch()).collect::<Vec<_>>(),
            vec![Pitch::Fs4, Pitch::As4, Pitch::B4, Pitch::Cs5, Pitch::Ds5]
        );
    }

    #[test]
    fn rests_and_drums() {
        let notes = parse_notes("r.2 x.1 -.6", 0).unwrap();
        assert_eq!(
            fields(&notes),
            vec![
                (Pitch::Rest, Duration::Eighth),
                (Pitch::Gs3, Duration::Sixteenth),
                (Pitch::Rest, Duration::DottedQuarter),
            ]
        );
    }

    #[test]
    fn transpose_shifts_pitch() {
        let notes = parse_notes("c4.4", 2).unwrap();
        assert_eq!(notes[0].pitch(), Pitch::D4);
    }

    #[test]
    fn unplayable_input_is_an_error() {
        // G#5 does not exist in the engine
        assert_eq!(parse_notes("g#5.4", 0), Err(NoteError::UnsupportedPitch(80)));
        // five sixteenths is not a duration
        assert_eq!(parse_notes("c4.5", 0), Err(NoteError::UnsupportedDuration(30)));
    }

    #[test]
    fn incomplete_notes_are_dropped() {
        // no duration has been given yet
        assert!(parse_notes("c4", 0).unwrap().is_empty());
        assert!(parse_notes("...", 0).unwrap().is_empty());
    }
}
