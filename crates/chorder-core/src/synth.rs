//! Additive sine synthesis of a fingering

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChorderError, Result};
use crate::fingering::FretAssignment;
use crate::instrument::Instrument;
use crate::pitch::{REFERENCE_FREQUENCY, frequency_at};

/// Default output sample rate
pub const SAMPLE_RATE: u32 = 44100;

/// Peak sample value after normalisation
pub const MAX_AMPLITUDE: i16 = i16::MAX;

/// Mono 16-bit PCM buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedWaveform {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl RenderedWaveform {
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn peak(&self) -> i16 {
        self.samples
            .iter()
            .map(|s| s.unsigned_abs())
            .max()
            .map_or(0, |p| p.min(i16::MAX as u16) as i16)
    }

    /// Samples scaled to `-1.0..=1.0` for float audio APIs
    pub fn to_f32(&self) -> Vec<f32> {
        self.samples
            .iter()
            .map(|&s| s as f32 / MAX_AMPLITUDE as f32)
            .collect()
    }
}

/// Renders fret assignments as equal-weight sums of sine waves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformSynthesizer {
    pub sample_rate: u32,
    pub reference_frequency: f64,
}

impl Default for WaveformSynthesizer {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            reference_frequency: REFERENCE_FREQUENCY,
        }
    }
}

impl WaveformSynthesizer {
    pub fn new(sample_rate: u32, reference_frequency: f64) -> Self {
        Self {
            sample_rate,
            reference_frequency,
        }
    }

    /// Frequency of each string for this assignment
    pub fn frequencies(&self, assignment: &FretAssignment, instrument: &Instrument) -> Result<Vec<f64>> {
        assignment.check_length(instrument)?;
        Ok(assignment
            .frets()
            .iter()
            .zip(instrument.strings())
            .map(|(&fret, string)| frequency_at(self.reference_frequency, fret as i32, string.tuning_offset))
            .collect())
    }

    /// Render `duration_secs` of the chord, normalised to full 16-bit scale
    pub fn render(
        &self,
        assignment: &FretAssignment,
        instrument: &Instrument,
        duration_secs: f64,
    ) -> Result<RenderedWaveform> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(ChorderError::InvalidDuration(duration_secs));
        }
        if assignment.is_empty() {
            return Err(ChorderError::EmptyChord);
        }
        let frequencies = self.frequencies(assignment, instrument)?;

        let num_samples = (duration_secs * self.sample_rate as f64).round() as usize;
        if num_samples == 0 {
            return Err(ChorderError::InvalidDuration(duration_secs));
        }

        let voices = frequencies.len() as f64;
        let rate = self.sample_rate as f64;
        let mixed: Vec<f64> = (0..num_samples)
            .map(|i| {
                let t = i as f64 / rate;
                frequencies.iter().map(|f| (TAU * f * t).sin()).sum::<f64>() / voices
            })
            .collect();

        let peak = mixed.iter().fold(0.0f64, |acc, s| acc.max(s.abs()));
        if peak <= f64::EPSILON {
            // A single sample at t = 0 is silent for every sine
            return Err(ChorderError::EmptyChord);
        }

        let scale = MAX_AMPLITUDE as f64 / peak;
        let samples = mixed
            .iter()
            .map(|s| (s * scale).round().clamp(-(MAX_AMPLITUDE as f64), MAX_AMPLITUDE as f64) as i16)
            .collect();

        debug!(
            frets = %assignment,
            num_samples,
            sample_rate = self.sample_rate,
            "Rendered chord waveform"
        );

        Ok(RenderedWaveform {
            samples,
            sample_rate: self.sample_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::{InstrumentProfile, InstrumentString};

    #[test]
    fn test_render_length_and_peak() {
        let uke = InstrumentProfile::Ukulele.instrument();
        let synth = WaveformSynthesizer::default();
        let chord = FretAssignment::from([3, 0, 0, 0]);

        let wave = synth.render(&chord, &uke, 1.0).unwrap();
        assert_eq!(wave.len(), 44100);
        assert_eq!(wave.sample_rate(), 44100);
        assert_eq!(wave.peak(), MAX_AMPLITUDE);
        assert_eq!(wave.samples()[0], 0);

        let short = synth.render(&chord, &uke, 0.25).unwrap();
        assert_eq!(short.len(), 11025);
        assert!((short.duration_secs() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_length_rounds() {
        let uke = InstrumentProfile::Ukulele.instrument();
        let synth = WaveformSynthesizer::new(1000, REFERENCE_FREQUENCY);
        let wave = synth.render(&FretAssignment::from([0, 0, 0, 0]), &uke, 0.0126).unwrap();
        assert_eq!(wave.len(), 13);
    }

    #[test]
    fn test_frequencies() {
        let uke = InstrumentProfile::Ukulele.instrument();
        let synth = WaveformSynthesizer::default();
        let freqs = synth.frequencies(&FretAssignment::from([0, 0, 0, 0]), &uke).unwrap();
        assert_eq!(freqs[0], 440.0);
        // Open C is middle C
        assert!((freqs[2] - 261.6256).abs() < 1e-3);

        let octave = synth.frequencies(&FretAssignment::from([12, 0, 0, 0]), &uke).unwrap();
        assert_eq!(octave[0], 880.0);
    }

    #[test]
    fn test_unison_strings_are_pure_sine() {
        let duo = Instrument::new(
            "duo",
            vec![InstrumentString::new(0, 0), InstrumentString::new(0, 0)],
            12,
        )
        .unwrap();
        let synth = WaveformSynthesizer::default();
        let wave = synth.render(&FretAssignment::from([0, 0]), &duo, 0.01).unwrap();
        // 440 Hz at 44.1 kHz crests near sample 25 and troughs near sample 75
        assert!(wave.samples()[25] > 32700);
        assert!(wave.samples()[75] < -32700);
        assert_eq!(wave.samples()[0], 0);
    }

    #[test]
    fn test_invalid_input() {
        let uke = InstrumentProfile::Ukulele.instrument();
        let synth = WaveformSynthesizer::default();
        let chord = FretAssignment::from([3, 0, 0, 0]);

        assert_eq!(synth.render(&chord, &uke, 0.0), Err(ChorderError::InvalidDuration(0.0)));
        assert_eq!(synth.render(&chord, &uke, -1.0), Err(ChorderError::InvalidDuration(-1.0)));
        assert!(matches!(
            synth.render(&chord, &uke, f64::NAN),
            Err(ChorderError::InvalidDuration(_))
        ));
        assert_eq!(
            synth.render(&FretAssignment::new(vec![]), &uke, 1.0),
            Err(ChorderError::EmptyChord)
        );
        assert_eq!(
            synth.render(&FretAssignment::from([1, 2]), &uke, 1.0),
            Err(ChorderError::AssignmentLength { expected: 4, actual: 2 })
        );
    }

    #[test]
    fn test_to_f32_range() {
        let uke = InstrumentProfile::Ukulele.instrument();
        let wave = WaveformSynthesizer::default()
            .render(&FretAssignment::from([0, 2, 0, 2]), &uke, 0.1)
            .unwrap();
        let floats = wave.to_f32();
        assert_eq!(floats.len(), wave.len());
        assert!(floats.iter().all(|s| (-1.0..=1.0).contains(s)));
        assert!(floats.iter().any(|s| (s.abs() - 1.0).abs() < 1e-6));
    }
}
