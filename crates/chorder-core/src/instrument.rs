//! Fretted instrument descriptions and built-in profiles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChorderError, IdentifierKind, Result};
use crate::pitch::PitchClass;

/// One string (or course) of a fretted instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentString {
    /// Pitch class of the open string
    pub open: PitchClass,
    /// Semitones below the reference pitch (negative = above), frequency only
    pub tuning_offset: i32,
}

impl InstrumentString {
    pub fn new(open: u8, tuning_offset: i32) -> Self {
        Self {
            open: PitchClass::new(open as i32),
            tuning_offset,
        }
    }
}

/// Strings in order from the first (highest-sounding) string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInstrument")]
pub struct Instrument {
    name: String,
    strings: Vec<InstrumentString>,
    frets: u8,
}

#[derive(Deserialize)]
struct RawInstrument {
    #[serde(default)]
    name: String,
    strings: Vec<InstrumentString>,
    frets: u8,
}

impl TryFrom<RawInstrument> for Instrument {
    type Error = ChorderError;

    fn try_from(raw: RawInstrument) -> Result<Self> {
        Instrument::new(raw.name, raw.strings, raw.frets)
    }
}

impl Instrument {
    pub fn new(name: impl Into<String>, strings: Vec<InstrumentString>, frets: u8) -> Result<Self> {
        let name = name.into();
        if strings.len() < 2 {
            return Err(ChorderError::InvalidInstrument(format!(
                "{name:?} needs at least 2 strings, got {}",
                strings.len()
            )));
        }
        if frets == 0 {
            return Err(ChorderError::InvalidInstrument(format!(
                "{name:?} needs at least one fret"
            )));
        }
        Ok(Self { name, strings, frets })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn strings(&self) -> &[InstrumentString] {
        &self.strings
    }

    pub fn num_strings(&self) -> usize {
        self.strings.len()
    }

    /// Highest playable fret
    pub fn frets(&self) -> u8 {
        self.frets
    }
}

/// Built-in instrument profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentProfile {
    /// Standard G-C-E-A re-entrant tuning, listed A E C G
    Ukulele,
    /// Standard E-A-D-G-B-E tuning, listed high E first
    Guitar,
    /// G-D-A-E courses, listed E first
    Mandolin,
}

impl InstrumentProfile {
    pub const ALL: [InstrumentProfile; 3] = [Self::Ukulele, Self::Guitar, Self::Mandolin];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ukulele => "ukulele",
            Self::Guitar => "guitar",
            Self::Mandolin => "mandolin",
        }
    }

    /// (open pitch class, tuning offset) per string, and fret count
    fn layout(&self) -> (&'static [(u8, i32)], u8) {
        match self {
            Self::Ukulele => (&[(0, 0), (7, 5), (3, 9), (10, 2)], 19),
            Self::Guitar => (&[(7, 5), (2, 10), (10, 14), (5, 19), (0, 24), (7, 29)], 20),
            Self::Mandolin => (&[(7, -7), (0, 0), (5, 7), (10, 14)], 17),
        }
    }

    pub fn instrument(&self) -> Instrument {
        let (strings, frets) = self.layout();
        Instrument {
            name: self.name().to_string(),
            strings: strings
                .iter()
                .map(|&(open, offset)| InstrumentString::new(open, offset))
                .collect(),
            frets,
        }
    }
}

impl FromStr for InstrumentProfile {
    type Err = ChorderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| ChorderError::unknown(IdentifierKind::Instrument, s))
    }
}

impl fmt::Display for InstrumentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Default for Instrument {
    fn default() -> Self {
        InstrumentProfile::Ukulele.instrument()
    }
}
