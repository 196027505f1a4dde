//! Root note names
//!
//! Numbering starts at A, matching the reference tuning offsets: A = 0,
//! A♯/B♭ = 1, ... G♯/A♭ = 11.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChorderError, IdentifierKind};
use crate::pitch::PitchClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NoteName {
    A,
    ASharp,
    B,
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
}

impl NoteName {
    pub const ALL: [NoteName; 12] = [
        Self::A,
        Self::ASharp,
        Self::B,
        Self::C,
        Self::CSharp,
        Self::D,
        Self::DSharp,
        Self::E,
        Self::F,
        Self::FSharp,
        Self::G,
        Self::GSharp,
    ];

    pub fn pitch_class(self) -> PitchClass {
        PitchClass::new(self as i32)
    }

    pub fn from_pitch_class(pc: PitchClass) -> Self {
        Self::ALL[pc.value() as usize]
    }

    /// Display name, with both spellings for enharmonic pairs
    pub fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::ASharp => "A♯/B♭",
            Self::B => "B",
            Self::C => "C",
            Self::CSharp => "C♯/D♭",
            Self::D => "D",
            Self::DSharp => "D♯/E♭",
            Self::E => "E",
            Self::F => "F",
            Self::FSharp => "F♯/G♭",
            Self::G => "G",
            Self::GSharp => "G♯/A♭",
        }
    }

    /// Short sharp spelling, used in chord names
    pub fn sharp_name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::ASharp => "A♯",
            Self::B => "B",
            Self::C => "C",
            Self::CSharp => "C♯",
            Self::D => "D",
            Self::DSharp => "D♯",
            Self::E => "E",
            Self::F => "F",
            Self::FSharp => "F♯",
            Self::G => "G",
            Self::GSharp => "G♯",
        }
    }

    fn natural(letter: char) -> Option<i32> {
        match letter.to_ascii_uppercase() {
            'A' => Some(0),
            'B' => Some(2),
            'C' => Some(3),
            'D' => Some(5),
            'E' => Some(7),
            'F' => Some(8),
            'G' => Some(10),
            _ => None,
        }
    }

    /// Parse a single spelling such as `C`, `C#`, `Db`, `D♭`
    fn parse_spelling(s: &str) -> Option<PitchClass> {
        let mut chars = s.chars();
        let base = Self::natural(chars.next()?)?;
        let mut offset = 0;
        for c in chars {
            offset += match c {
                '#' | '♯' => 1,
                'b' | '♭' => -1,
                _ => return None,
            };
        }
        Some(PitchClass::new(base + offset))
    }
}

impl FromStr for NoteName {
    type Err = ChorderError;

    /// Accepts `A`, `A#`, `Bb`, `A♯`, `B♭`, and the paired forms `A♯/B♭`, `A♯(B♭)`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let unknown = || ChorderError::unknown(IdentifierKind::Note, s);

        let spellings: Vec<&str> = trimmed
            .split(['/', '(', ')'])
            .filter(|part| !part.is_empty())
            .collect();
        if spellings.is_empty() || spellings.len() > 2 {
            return Err(unknown());
        }

        let mut resolved: Option<PitchClass> = None;
        for spelling in spellings {
            let pc = Self::parse_spelling(spelling).ok_or_else(unknown)?;
            // Both halves of a pair must name the same pitch
            if resolved.is_some_and(|prev| prev != pc) {
                return Err(unknown());
            }
            resolved = Some(pc);
        }

        resolved.map(Self::from_pitch_class).ok_or_else(unknown)
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_numbering() {
        assert_eq!(NoteName::A.pitch_class().value(), 0);
        assert_eq!(NoteName::C.pitch_class().value(), 3);
        assert_eq!(NoteName::GSharp.pitch_class().value(), 11);
        for (i, note) in NoteName::ALL.iter().enumerate() {
            assert_eq!(note.pitch_class().value() as usize, i);
            assert_eq!(NoteName::from_pitch_class(note.pitch_class()), *note);
        }
    }

    #[test]
    fn test_parse_spellings() {
        assert_eq!("C".parse::<NoteName>(), Ok(NoteName::C));
        assert_eq!("c".parse::<NoteName>(), Ok(NoteName::C));
        assert_eq!("A#".parse::<NoteName>(), Ok(NoteName::ASharp));
        assert_eq!("Bb".parse::<NoteName>(), Ok(NoteName::ASharp));
        assert_eq!("B♭".parse::<NoteName>(), Ok(NoteName::ASharp));
        assert_eq!("A♯/B♭".parse::<NoteName>(), Ok(NoteName::ASharp));
        assert_eq!("A♯(B♭)".parse::<NoteName>(), Ok(NoteName::ASharp));
        assert_eq!("E#".parse::<NoteName>(), Ok(NoteName::F));
        assert_eq!("Cb".parse::<NoteName>(), Ok(NoteName::B));
        assert_eq!("Ab".parse::<NoteName>(), Ok(NoteName::GSharp));
    }

    #[test]
    fn test_display_names_parse_back() {
        for note in NoteName::ALL {
            assert_eq!(note.name().parse::<NoteName>(), Ok(note));
        }
    }

    #[test]
    fn test_parse_unknown() {
        for bad in ["", "H", "C$", "A#/C", "A/B/C", "Cm"] {
            let err = bad.parse::<NoteName>().unwrap_err();
            assert!(matches!(
                err,
                ChorderError::UnknownIdentifier { kind: IdentifierKind::Note, .. }
            ), "{bad:?}");
        }
    }
}
