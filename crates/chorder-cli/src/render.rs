//! Text and JSON output for fingerings

use std::fmt::Write;

use chorder_core::{ChordDiagram, FretAssignment, Instrument, NoteName, PitchClass};
use serde::Serialize;

/// One fingering with everything needed to show it
#[derive(Debug, Serialize)]
pub(crate) struct FingeringReport {
    pub index: usize,
    pub frets: FretAssignment,
    pub notes: Vec<&'static str>,
    pub diagram: ChordDiagram,
}

impl FingeringReport {
    pub fn new(
        index: usize,
        assignment: &FretAssignment,
        instrument: &Instrument,
        root: PitchClass,
    ) -> chorder_core::Result<Self> {
        let notes = assignment
            .notes(instrument)?
            .into_iter()
            .map(|pc| NoteName::from_pitch_class(pc).sharp_name())
            .collect();
        Ok(Self {
            index,
            frets: assignment.clone(),
            notes,
            diagram: ChordDiagram::new(assignment, instrument, root)?,
        })
    }
}

/// Chord grid with one row per string; `R` marks the root, `*` other fingers
///
/// ```text
///      1   2   3   4   5
/// A    ‖---|---|-R-|---|---|
/// E  o ‖---|---|---|---|---|
/// ```
pub(crate) fn text_diagram(report: &FingeringReport, instrument: &Instrument) -> String {
    let diagram = &report.diagram;
    let cells = diagram.display_frets();
    let mut out = String::new();

    let _ = write!(out, "{:6}", "");
    for cell in 1..=cells {
        let _ = write!(out, "{:^4}", diagram.first_fret as usize + cell);
    }
    out.push('\n');

    let nut = if diagram.shows_nut() { '‖' } else { '|' };
    for (string, finger) in instrument.strings().iter().zip(&diagram.fingers) {
        let label = NoteName::from_pitch_class(string.open).sharp_name();
        let open_mark = match (finger.fret, finger.is_root) {
            (0, true) => 'R',
            (0, false) => 'o',
            _ => ' ',
        };
        let _ = write!(out, "{label:<3}{open_mark} {nut}");
        for cell in 1..=cells {
            let fretted = finger.fret > 0 && (finger.fret - diagram.first_fret) as usize == cell;
            let mark = match (fretted, finger.is_root) {
                (true, true) => 'R',
                (true, false) => '*',
                _ => '-',
            };
            let _ = write!(out, "-{mark}-|");
        }
        out.push('\n');
    }
    out
}

/// Heading line, e.g. `#1 (3,0,0,0)  C E C G`
pub(crate) fn summary_line(report: &FingeringReport) -> String {
    format!("#{} {}  {}", report.index, report.frets, report.notes.join(" "))
}
