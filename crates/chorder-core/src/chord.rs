//! Chord qualities and tone sets

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChorderError, IdentifierKind};
use crate::note::NoteName;
use crate::pitch::PitchClass;

/// Chord quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    Dominant7,
    Major7,
    Minor7,
    MinorMajor7,
    Diminished7,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 11] = [
        Self::Major,
        Self::Minor,
        Self::Diminished,
        Self::Augmented,
        Self::Sus2,
        Self::Sus4,
        Self::Dominant7,
        Self::Major7,
        Self::Minor7,
        Self::MinorMajor7,
        Self::Diminished7,
    ];

    /// Get chord intervals from root
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            Self::Major => &[0, 4, 7],
            Self::Minor => &[0, 3, 7],
            Self::Diminished => &[0, 3, 6],
            Self::Augmented => &[0, 4, 8],
            Self::Sus2 => &[0, 2, 7],
            Self::Sus4 => &[0, 5, 7],
            Self::Dominant7 => &[0, 4, 7, 10],
            Self::Major7 => &[0, 4, 7, 11],
            Self::Minor7 => &[0, 3, 7, 10],
            Self::MinorMajor7 => &[0, 3, 7, 11],
            Self::Diminished7 => &[0, 3, 6, 9],
        }
    }

    /// Suffix used after the root in chord symbols ("" for major)
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Major => "",
            Self::Minor => "m",
            Self::Diminished => "dim",
            Self::Augmented => "aug",
            Self::Sus2 => "sus2",
            Self::Sus4 => "sus4",
            Self::Dominant7 => "7",
            Self::Major7 => "M7",
            Self::Minor7 => "m7",
            Self::MinorMajor7 => "mM7",
            Self::Diminished7 => "dim7",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Diminished => "diminished",
            Self::Augmented => "augmented",
            Self::Sus2 => "sus2",
            Self::Sus4 => "sus4",
            Self::Dominant7 => "dominant7",
            Self::Major7 => "major7",
            Self::Minor7 => "minor7",
            Self::MinorMajor7 => "minor-major7",
            Self::Diminished7 => "diminished7",
        }
    }

    /// Pitch classes this quality produces when rooted at `root`
    pub fn tone_set(&self, root: PitchClass) -> BTreeSet<PitchClass> {
        self.intervals()
            .iter()
            .map(|&interval| root + interval as i32)
            .collect()
    }
}

impl FromStr for ChordQuality {
    type Err = ChorderError;

    /// Symbols are case-sensitive (`M7` vs `m7`); long names are not
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let by_symbol = match trimmed {
            "" | "M" | "maj" => Some(Self::Major),
            "m" | "min" | "-" => Some(Self::Minor),
            "dim" | "°" => Some(Self::Diminished),
            "aug" | "+" => Some(Self::Augmented),
            "sus2" => Some(Self::Sus2),
            "sus4" | "sus" => Some(Self::Sus4),
            "7" | "dom7" => Some(Self::Dominant7),
            "M7" | "maj7" | "Δ7" => Some(Self::Major7),
            "m7" | "min7" | "-7" => Some(Self::Minor7),
            "mM7" | "m(maj7)" | "minmaj7" => Some(Self::MinorMajor7),
            "dim7" | "°7" => Some(Self::Diminished7),
            _ => None,
        };
        if let Some(quality) = by_symbol {
            return Ok(quality);
        }

        let normalized: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|q| q.name().replace('-', "") == normalized)
            .ok_or_else(|| ChorderError::unknown(IdentifierKind::ChordQuality, s))
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conventional chord symbol, e.g. "C", "A♯m7"
pub fn chord_name(root: NoteName, quality: ChordQuality) -> String {
    format!("{}{}", root.sharp_name(), quality.symbol())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intervals_are_well_formed() {
        for quality in ChordQuality::ALL {
            let intervals = quality.intervals();
            assert_eq!(intervals[0], 0, "{quality} must contain the root");
            // Offsets distinct modulo 12, so the tone set never shrinks
            let distinct: BTreeSet<u8> = intervals.iter().map(|i| i % 12).collect();
            assert_eq!(distinct.len(), intervals.len(), "{quality}");
        }
    }

    #[test]
    fn test_tone_set() {
        // C major: C E G
        let tones = ChordQuality::Major.tone_set(NoteName::C.pitch_class());
        let expected: BTreeSet<PitchClass> = [3, 7, 10].into_iter().map(PitchClass::new).collect();
        assert_eq!(tones, expected);

        // G7 wraps past A
        let tones = ChordQuality::Dominant7.tone_set(NoteName::G.pitch_class());
        let expected: BTreeSet<PitchClass> = [10, 2, 5, 8].into_iter().map(PitchClass::new).collect();
        assert_eq!(tones, expected);
    }

    #[test]
    fn test_parse_symbols_and_names() {
        for quality in ChordQuality::ALL {
            assert_eq!(quality.symbol().parse::<ChordQuality>(), Ok(quality));
            assert_eq!(quality.name().parse::<ChordQuality>(), Ok(quality));
        }
        assert_eq!("Minor Major 7".parse::<ChordQuality>(), Ok(ChordQuality::MinorMajor7));
        assert_eq!("MAJOR".parse::<ChordQuality>(), Ok(ChordQuality::Major));
        assert_eq!("maj7".parse::<ChordQuality>(), Ok(ChordQuality::Major7));
        assert_eq!("min7".parse::<ChordQuality>(), Ok(ChordQuality::Minor7));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "add9".parse::<ChordQuality>().unwrap_err();
        assert_eq!(
            err,
            ChorderError::UnknownIdentifier {
                kind: IdentifierKind::ChordQuality,
                name: "add9".to_string(),
            }
        );
    }

    #[test]
    fn test_chord_name() {
        assert_eq!(chord_name(NoteName::C, ChordQuality::Major), "C");
        assert_eq!(chord_name(NoteName::A, ChordQuality::Minor7), "Am7");
        assert_eq!(chord_name(NoteName::FSharp, ChordQuality::Diminished7), "F♯dim7");
    }
}
