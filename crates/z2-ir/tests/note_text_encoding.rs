//! Patterns and songs written as note text, checked against their encoding.

use z2_ir::{parse_notes, Channel, Pattern, PatternError, Pitch, Song};

fn notes(text: &str) -> Vec<z2_ir::Note> {
    parse_notes(text, 0).unwrap()
}

fn four_bar() -> Pattern {
    Pattern::with_notes(0x18, notes("c4.4 e4 d4.8"), notes("f4.8"), notes("c4.8 c4"), vec![])
}

#[test]
fn pattern_from_text_encodes_every_channel() {
    let p = four_bar();
    assert_eq!(p.length(), 4 * 96);
    assert!(p.validate().is_ok());

    assert_eq!(
        p.note_data(),
        vec![
            // Pulse1, always terminated
            0xd0, 0xd8, 0x55, 0x00,
            // Pulse2 is short, so it is terminated too
            0x5b, 0x00,
            // Triangle fills the pattern and needs no terminator
            0x51, 0x51,
        ]
    );
    assert_eq!(p.meta_data(0xa800).unwrap().as_slice(), &[0x18, 0x00, 0xa8, 6, 4, 0]);
}

#[test]
fn transpose_shifts_every_pitch() {
    let up = parse_notes("c4.4 d4", 2).unwrap();
    assert_eq!(up.iter().map(|n| n.pitch()).collect::<Vec<_>>(), vec![Pitch::D4, Pitch::E4]);

    let rests = parse_notes("r.4 r", 5).unwrap();
    assert!(rests.iter().all(|n| n.pitch() == Pitch::Rest));
}

#[test]
fn song_sequence_points_at_pattern_headers() {
    let mut song = Song::new();
    song.add_pattern(four_bar());
    song.add_pattern(Pattern::voiced_with_notes(0x91, 0x9a, notes("c4.8"), vec![], vec![], vec![]));
    song.set_sequence(vec![0, 1, 1, 0]).unwrap();

    assert_eq!(song.pattern_offsets(0x20).unwrap(), vec![0x20, 0x26]);
    assert_eq!(song.sequence_data(0x20).unwrap(), vec![0x20, 0x26, 0x26, 0x20, 0x00]);
    assert_eq!(song.metadata_length(), 5 + 6 + 8);
}

#[test]
fn secondary_channel_longer_than_pulse1_is_invalid() {
    let p = Pattern::with_notes(0x18, notes("c4.4"), vec![], notes("c4.8"), vec![]);
    assert_eq!(
        p.validate(),
        Err(PatternError::ChannelLength {
            channel: Channel::Triangle,
            ticks: 192,
            length: 96,
        })
    );
}
