//! Chord diagram layout
//!
//! Geometry for drawing a fingering, independent of any toolkit. Positions are
//! normalised along the displayed part of the neck: the first fret line is at
//! 0.0 and the last at 1.0, with fret spacing shrinking by [`FRET_RATIO`] per
//! fret like a real fingerboard.

use serde::Serialize;

use crate::error::Result;
use crate::fingering::FretAssignment;
use crate::instrument::Instrument;
use crate::pitch::{FRET_RATIO, PitchClass};

/// Fewest frets a diagram shows
pub const MIN_DISPLAY_FRETS: u8 = 5;

/// Where a finger goes on one string
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FingerMark {
    pub fret: u8,
    /// Centre of the fretted cell, `None` for an open string
    pub position: Option<f64>,
    /// This string sounds the chord root
    pub is_root: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordDiagram {
    /// Fret number of the first drawn fret line (0 = nut)
    pub first_fret: u8,
    /// Normalised positions of `display_frets + 1` fret lines
    pub fret_lines: Vec<f64>,
    /// One mark per string, in string order
    pub fingers: Vec<FingerMark>,
}

impl ChordDiagram {
    pub fn new(assignment: &FretAssignment, instrument: &Instrument, root: PitchClass) -> Result<Self> {
        let notes = assignment.notes(instrument)?;
        let lowest = assignment.min_fret().unwrap_or(0);
        let highest = assignment.max_fret().unwrap_or(0);

        let first_fret = lowest.saturating_sub(1);
        let display_frets = MIN_DISPLAY_FRETS.max(highest - first_fret);
        let fret_lines = fret_lines(display_frets);

        let fingers = assignment
            .frets()
            .iter()
            .zip(notes)
            .map(|(&fret, pc)| {
                let position = (fret > 0).then(|| {
                    let cell = (fret - first_fret) as usize;
                    (fret_lines[cell - 1] + fret_lines[cell]) * 0.5
                });
                FingerMark {
                    fret,
                    position,
                    is_root: pc == root,
                }
            })
            .collect();

        Ok(Self {
            first_fret,
            fret_lines,
            fingers,
        })
    }

    pub fn display_frets(&self) -> usize {
        self.fret_lines.len() - 1
    }

    /// Whether the nut is drawn (diagram starts at fret 0)
    pub fn shows_nut(&self) -> bool {
        self.first_fret == 0
    }
}

/// Fret line positions for `count` frets fitted into a unit length
fn fret_lines(count: u8) -> Vec<f64> {
    let first_gap = (1.0 - FRET_RATIO) / (1.0 - FRET_RATIO.powi(count as i32));
    let mut lines = Vec::with_capacity(count as usize + 1);
    let mut position = 0.0;
    lines.push(position);
    for fret in 0..count {
        position += first_gap * FRET_RATIO.powi(fret as i32);
        lines.push(position);
    }
    lines
}
