//! Render fingerings and hand them to a playback sink

use chorder_core::{ChorderError, FretAssignment, Instrument, RenderedWaveform, WaveformSynthesizer};
use thiserror::Error;
use tracing::info;

use crate::audio_io::{AudioOutputError, AudioOutputService, PlaybackHandle};

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error(transparent)]
    Chord(#[from] ChorderError),
    #[error("Audio output error: {0}")]
    Output(#[from] AudioOutputError),
}

/// Destination for rendered chords
pub trait PlaybackSink {
    /// Start playing; the returned handle reports completion
    fn start(&self, waveform: &RenderedWaveform) -> Result<PlaybackHandle, AudioOutputError>;
}

/// Default output device via cpal
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceSink;

impl PlaybackSink for DeviceSink {
    fn start(&self, waveform: &RenderedWaveform) -> Result<PlaybackHandle, AudioOutputError> {
        AudioOutputService::play_samples(waveform.to_f32(), waveform.sample_rate())
    }
}

/// Plays fingerings of an instrument
pub struct ChordPlayer<S: PlaybackSink = DeviceSink> {
    synth: WaveformSynthesizer,
    sink: S,
}

impl ChordPlayer<DeviceSink> {
    pub fn new(synth: WaveformSynthesizer) -> Self {
        Self::with_sink(synth, DeviceSink)
    }
}

impl Default for ChordPlayer<DeviceSink> {
    fn default() -> Self {
        Self::new(WaveformSynthesizer::default())
    }
}

impl<S: PlaybackSink> ChordPlayer<S> {
    pub fn with_sink(synth: WaveformSynthesizer, sink: S) -> Self {
        Self { synth, sink }
    }

    pub fn synth(&self) -> &WaveformSynthesizer {
        &self.synth
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Render and play, blocking until playback completes
    pub fn play(
        &self,
        assignment: &FretAssignment,
        instrument: &Instrument,
        duration_secs: f64,
    ) -> Result<(), PlayerError> {
        let handle = self.play_async(assignment, instrument, duration_secs)?;
        handle.wait()?;
        Ok(())
    }

    /// Render and start playing; stop early with [`PlaybackHandle::stop`]
    pub fn play_async(
        &self,
        assignment: &FretAssignment,
        instrument: &Instrument,
        duration_secs: f64,
    ) -> Result<PlaybackHandle, PlayerError> {
        let waveform = self.synth.render(assignment, instrument, duration_secs)?;
        info!(
            frets = %assignment,
            instrument = instrument.name(),
            duration_secs,
            "Playing chord"
        );
        Ok(self.sink.start(&waveform)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chorder_core::InstrumentProfile;

    use super::*;

    /// Records buffers and completes immediately
    #[derive(Default)]
    struct RecordingSink {
        played: Mutex<Vec<RenderedWaveform>>,
    }

    impl PlaybackSink for RecordingSink {
        fn start(&self, waveform: &RenderedWaveform) -> Result<PlaybackHandle, AudioOutputError> {
            if let Ok(mut played) = self.played.lock() {
                played.push(waveform.clone());
            }
            let (handle, done_tx, _) = PlaybackHandle::detached();
            let _ = done_tx.send(Ok(()));
            Ok(handle)
        }
    }

    struct FailingSink;

    impl PlaybackSink for FailingSink {
        fn start(&self, _: &RenderedWaveform) -> Result<PlaybackHandle, AudioOutputError> {
            Err(AudioOutputError::NoDevices)
        }
    }

    #[test]
    fn test_play_renders_into_sink() {
        let uke = InstrumentProfile::Ukulele.instrument();
        let player = ChordPlayer::with_sink(WaveformSynthesizer::default(), RecordingSink::default());

        player.play(&FretAssignment::from([3, 0, 0, 0]), &uke, 0.5).unwrap();

        let played = player.sink().played.lock().unwrap();
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].len(), 22050);
        assert_eq!(played[0].peak(), i16::MAX);
    }

    #[test]
    fn test_render_errors_skip_sink() {
        let uke = InstrumentProfile::Ukulele.instrument();
        let player = ChordPlayer::with_sink(WaveformSynthesizer::default(), RecordingSink::default());

        let err = player.play(&FretAssignment::from([3, 0, 0, 0]), &uke, 0.0).unwrap_err();
        assert!(matches!(err, PlayerError::Chord(ChorderError::InvalidDuration(_))));
        let err = player.play(&FretAssignment::new(vec![]), &uke, 1.0).unwrap_err();
        assert!(matches!(err, PlayerError::Chord(ChorderError::EmptyChord)));
        assert!(player.sink().played.lock().unwrap().is_empty());
    }

    #[test]
    fn test_sink_errors_propagate() {
        let uke = InstrumentProfile::Ukulele.instrument();
        let player = ChordPlayer::with_sink(WaveformSynthesizer::default(), FailingSink);
        let err = player.play(&FretAssignment::from([0, 0, 0, 2]), &uke, 1.0).unwrap_err();
        assert!(matches!(err, PlayerError::Output(AudioOutputError::NoDevices)));
    }

    #[test]
    fn test_handle_stop_and_completion() {
        let (handle, done_tx, stop_flag) = PlaybackHandle::detached();
        assert!(!handle.is_done());
        handle.stop();
        assert!(stop_flag.load(std::sync::atomic::Ordering::SeqCst));
        assert!(handle.is_stopped());
        let _ = done_tx.send(Ok(()));
        assert!(handle.is_done());
        assert!(handle.wait().is_ok());
    }
}
