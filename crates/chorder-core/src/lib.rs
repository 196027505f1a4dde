//! chorder-core: Chord fingering search and synthesis for fretted instruments

pub mod chord;
pub mod diagram;
mod error;
pub mod fingering;
pub mod instrument;
pub mod note;
pub mod pitch;
pub mod search;
pub mod synth;

pub use chord::{ChordQuality, chord_name};
pub use diagram::{ChordDiagram, FingerMark};
pub use error::{ChorderError, IdentifierKind, Result};
pub use fingering::FretAssignment;
pub use instrument::{Instrument, InstrumentProfile, InstrumentString};
pub use note::NoteName;
pub use pitch::{FRET_RATIO, PitchClass, REFERENCE_FREQUENCY, frequency_of, pitch_class_of};
pub use search::{DEFAULT_MAX_SPAN, SearchOptions, search};
pub use synth::{RenderedWaveform, SAMPLE_RATE, WaveformSynthesizer};

/// Find fingerings by name, e.g. `compose("C", "m7", "ukulele", &options)`
pub fn compose(
    root: &str,
    quality: &str,
    instrument: &str,
    options: &SearchOptions,
) -> Result<Vec<FretAssignment>> {
    let instrument = instrument.parse::<InstrumentProfile>()?.instrument();
    compose_on(root, quality, &instrument, options)
}

/// Like [`compose`] for an instrument that is not a built-in profile
pub fn compose_on(
    root: &str,
    quality: &str,
    instrument: &Instrument,
    options: &SearchOptions,
) -> Result<Vec<FretAssignment>> {
    let root: NoteName = root.parse()?;
    let quality: ChordQuality = quality.parse()?;
    search(root.pitch_class(), quality, instrument, options)
}

/// Per-string pitch classes of a fingering
pub fn notes(assignment: &FretAssignment, instrument: &Instrument) -> Result<Vec<PitchClass>> {
    assignment.notes(instrument)
}
