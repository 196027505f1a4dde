//! Fingering search
//!
//! For every position of the root note on the allowed root strings (an
//! "anchor"), each other string collects the chord tones reachable within
//! `max_span` frets of the anchor. The cartesian product of those candidate
//! lists is walked lazily and a combination is kept when it sounds exactly the
//! chord's tone set and the whole hand fits in `max_span` frets. The window only
//! bounds strings relative to the anchor, so the span is checked again on the
//! full assignment.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::chord::ChordQuality;
use crate::error::{ChorderError, Result};
use crate::fingering::FretAssignment;
use crate::instrument::Instrument;
use crate::pitch::{NUM_PITCH_CLASSES, PitchClass, pitch_class_of};

/// Default limit on the distance between the lowest and highest fret
pub const DEFAULT_MAX_SPAN: u8 = 5;

/// Constraints for [`search`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Strings allowed to carry the root (all strings when `None`)
    pub root_strings: Option<Vec<usize>>,
    /// Highest fret the root may be played at (instrument fret count when `None`)
    pub max_root_fret: Option<u8>,
    /// Maximum hand span in frets
    pub max_span: u8,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            root_strings: None,
            max_root_fret: None,
            max_span: DEFAULT_MAX_SPAN,
        }
    }
}

/// Find every distinct fingering of `quality` rooted at `root`
///
/// Results are sorted lexicographically by fret sequence. An empty result means
/// no fingering satisfies the constraints; it is not an error.
pub fn search(
    root: PitchClass,
    quality: ChordQuality,
    instrument: &Instrument,
    options: &SearchOptions,
) -> Result<Vec<FretAssignment>> {
    let num_strings = instrument.num_strings();
    let root_strings: Vec<usize> = match &options.root_strings {
        Some(strings) => {
            if let Some(&index) = strings.iter().find(|&&s| s >= num_strings) {
                return Err(ChorderError::StringOutOfRange {
                    index,
                    count: num_strings,
                });
            }
            strings.clone()
        }
        None => (0..num_strings).collect(),
    };

    let max_root_fret = options
        .max_root_fret
        .unwrap_or(instrument.frets())
        .min(instrument.frets());
    let tones = tone_mask(quality.tone_set(root));

    let mut found: BTreeSet<FretAssignment> = BTreeSet::new();
    let mut anchors = 0usize;
    let mut examined = 0usize;

    for &root_string in &root_strings {
        let open = instrument.strings()[root_string].open;
        for root_fret in root_frets(root, open, max_root_fret) {
            anchors += 1;
            let candidates = anchor_candidates(instrument, root_string, root_fret, tones, options.max_span);
            trace!(
                root_string,
                root_fret,
                candidates = ?candidates.iter().map(Vec::len).collect::<Vec<_>>(),
                "Expanding anchor"
            );

            for frets in CartesianProduct::new(&candidates) {
                examined += 1;
                if is_playable(&frets, instrument, tones, options.max_span) {
                    found.insert(FretAssignment::new(frets));
                }
            }
        }
    }

    debug!(
        root = root.value(),
        quality = quality.name(),
        instrument = instrument.name(),
        anchors,
        examined,
        results = found.len(),
        "Fingering search complete"
    );

    Ok(found.into_iter().collect())
}

/// Frets on a string with open note `open` that sound `root`, up to `max_fret`
///
/// Starts from the lowest non-negative fret and steps by an octave, so the nut
/// (fret 0) and `max_fret` itself are both included when they match.
pub fn root_frets(root: PitchClass, open: PitchClass, max_fret: u8) -> impl Iterator<Item = u8> {
    let first = open.distance_to(root);
    (first..=max_fret).step_by(NUM_PITCH_CLASSES as usize)
}

/// Candidate frets per string for one anchor; the anchor string gets only its fret
fn anchor_candidates(
    instrument: &Instrument,
    root_string: usize,
    root_fret: u8,
    tones: u16,
    max_span: u8,
) -> Vec<Vec<u8>> {
    let low = root_fret.saturating_sub(max_span);
    let high = root_fret.saturating_add(max_span).min(instrument.frets());

    instrument
        .strings()
        .iter()
        .enumerate()
        .map(|(index, string)| {
            if index == root_string {
                vec![root_fret]
            } else {
                (low..=high)
                    .filter(|&fret| tones & pc_bit(pitch_class_of(fret, string.open)) != 0)
                    .collect()
            }
        })
        .collect()
}

/// Sounds exactly the chord tones and fits within the span
fn is_playable(frets: &[u8], instrument: &Instrument, tones: u16, max_span: u8) -> bool {
    let sounded = frets
        .iter()
        .zip(instrument.strings())
        .fold(0u16, |mask, (&fret, string)| mask | pc_bit(pitch_class_of(fret, string.open)));
    if sounded != tones {
        return false;
    }

    let lo = frets.iter().copied().min().unwrap_or(0);
    let hi = frets.iter().copied().max().unwrap_or(0);
    hi - lo <= max_span
}

fn pc_bit(pc: PitchClass) -> u16 {
    1 << pc.value()
}

fn tone_mask(tones: BTreeSet<PitchClass>) -> u16 {
    tones.into_iter().fold(0, |mask, pc| mask | pc_bit(pc))
}

/// Lazy cartesian product over per-string candidate lists
///
/// Yields combinations in lexicographic index order (last list varies
/// fastest). Yields nothing if any list is empty or there are no lists.
#[derive(Debug, Clone)]
pub struct CartesianProduct<'a> {
    lists: &'a [Vec<u8>],
    indices: Vec<usize>,
    exhausted: bool,
}

impl<'a> CartesianProduct<'a> {
    pub fn new(lists: &'a [Vec<u8>]) -> Self {
        Self {
            lists,
            indices: vec![0; lists.len()],
            exhausted: lists.is_empty() || lists.iter().any(Vec::is_empty),
        }
    }

    fn advance(&mut self) {
        for position in (0..self.indices.len()).rev() {
            self.indices[position] += 1;
            if self.indices[position] < self.lists[position].len() {
                return;
            }
            self.indices[position] = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for CartesianProduct<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        if self.exhausted {
            return None;
        }
        let item = self
            .indices
            .iter()
            .zip(self.lists)
            .map(|(&i, list)| list[i])
            .collect();
        self.advance();
        Some(item)
    }
}
