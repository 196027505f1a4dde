//! Pitch classes and fret-to-frequency conversion (12-tone equal temperament)

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Number of pitch classes in an octave
pub const NUM_PITCH_CLASSES: u8 = 12;

/// Frequency of tuning offset 0 at fret 0 (concert A4)
pub const REFERENCE_FREQUENCY: f64 = 440.0;

/// Ratio between successive fret spacings, 2^(-1/12)
pub const FRET_RATIO: f64 = 0.943_874_312_681_693_5;

/// A note identified up to octave, always in `0..12`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PitchClass(u8);

impl PitchClass {
    /// Wrap any integer into a pitch class (modulo 12, always non-negative)
    pub fn new(value: i32) -> Self {
        Self(value.rem_euclid(NUM_PITCH_CLASSES as i32) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Semitones to move up from `self` to reach `other`, in `0..12`
    pub fn distance_to(self, other: PitchClass) -> u8 {
        (other.0 + NUM_PITCH_CLASSES - self.0) % NUM_PITCH_CLASSES
    }
}

impl Add<i32> for PitchClass {
    type Output = PitchClass;

    fn add(self, semitones: i32) -> PitchClass {
        PitchClass::new(self.0 as i32 + semitones)
    }
}

impl TryFrom<u8> for PitchClass {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < NUM_PITCH_CLASSES {
            Ok(Self(value))
        } else {
            Err(format!("pitch class must be below 12, got {value}"))
        }
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> u8 {
        pc.0
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pitch class sounded by `fret` on a string whose open note is `open`
pub fn pitch_class_of(fret: u8, open: PitchClass) -> PitchClass {
    open + fret as i32
}

/// Frequency in Hz sounded at `fret` on a string tuned `tuning_offset`
/// semitones below the reference pitch
pub fn frequency_of(fret: i32, tuning_offset: i32) -> f64 {
    frequency_at(REFERENCE_FREQUENCY, fret, tuning_offset)
}

/// Same as [`frequency_of`] with a custom reference frequency
///
/// Computes `reference * FRET_RATIO^(tuning_offset - fret)`, written as a power
/// of two so whole octaves come out exact.
pub fn frequency_at(reference: f64, fret: i32, tuning_offset: i32) -> f64 {
    reference * 2f64.powf((fret - tuning_offset) as f64 / NUM_PITCH_CLASSES as f64)
}
