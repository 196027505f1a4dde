//! Fret assignments (one concrete fingering)

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChorderError, Result};
use crate::instrument::Instrument;
use crate::pitch::{PitchClass, pitch_class_of};

/// One fret per string, in the instrument's string order
///
/// Ordering is lexicographic over the fret sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FretAssignment(Vec<u8>);

impl FretAssignment {
    pub fn new(frets: Vec<u8>) -> Self {
        Self(frets)
    }

    pub fn frets(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn min_fret(&self) -> Option<u8> {
        self.0.iter().copied().min()
    }

    pub fn max_fret(&self) -> Option<u8> {
        self.0.iter().copied().max()
    }

    /// Distance between the highest and lowest fret used (0 when empty)
    pub fn span(&self) -> u8 {
        match (self.min_fret(), self.max_fret()) {
            (Some(lo), Some(hi)) => hi - lo,
            _ => 0,
        }
    }

    /// Per-string pitch classes
    pub fn notes(&self, instrument: &Instrument) -> Result<Vec<PitchClass>> {
        self.check_length(instrument)?;
        Ok(self
            .0
            .iter()
            .zip(instrument.strings())
            .map(|(&fret, string)| pitch_class_of(fret, string.open))
            .collect())
    }

    /// Distinct pitch classes sounded across all strings
    pub fn pitch_classes(&self, instrument: &Instrument) -> Result<BTreeSet<PitchClass>> {
        Ok(self.notes(instrument)?.into_iter().collect())
    }

    pub(crate) fn check_length(&self, instrument: &Instrument) -> Result<()> {
        if self.0.len() != instrument.num_strings() {
            return Err(ChorderError::AssignmentLength {
                expected: instrument.num_strings(),
                actual: self.0.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<u8>> for FretAssignment {
    fn from(frets: Vec<u8>) -> Self {
        Self(frets)
    }
}

impl<const N: usize> From<[u8; N]> for FretAssignment {
    fn from(frets: [u8; N]) -> Self {
        Self(frets.to_vec())
    }
}

impl fmt::Display for FretAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, fret) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{fret}")?;
        }
        f.write_str(")")
    }
}
