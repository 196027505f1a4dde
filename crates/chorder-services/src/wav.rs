//! WAV export of rendered chords

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use chorder_core::RenderedWaveform;
use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum WavError {
    #[error("WAV encoding error: {0}")]
    Encode(#[from] hound::Error),
}

/// 16-bit mono PCM at the waveform's sample rate
fn wav_spec(waveform: &RenderedWaveform) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

fn write_samples<W: Write + Seek>(mut writer: WavWriter<W>, waveform: &RenderedWaveform) -> Result<(), WavError> {
    for &sample in waveform.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Write a rendered chord to a WAV file
pub fn write_wav_file(waveform: &RenderedWaveform, path: &Path) -> Result<(), WavError> {
    let writer = WavWriter::create(path, wav_spec(waveform))?;
    write_samples(writer, waveform)?;
    info!(path = %path.display(), samples = waveform.len(), "Wrote WAV file");
    Ok(())
}

/// Encode a rendered chord as WAV bytes
pub fn encode_wav(waveform: &RenderedWaveform) -> Result<Vec<u8>, WavError> {
    let mut buffer = Vec::new();
    {
        let writer = WavWriter::new(Cursor::new(&mut buffer), wav_spec(waveform))?;
        write_samples(writer, waveform)?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use chorder_core::{FretAssignment, InstrumentProfile, WaveformSynthesizer};

    use super::*;

    fn c_major() -> RenderedWaveform {
        let uke = InstrumentProfile::Ukulele.instrument();
        WaveformSynthesizer::default()
            .render(&FretAssignment::from([3, 0, 0, 0]), &uke, 0.1)
            .unwrap()
    }

    #[test]
    fn test_encode_wav_header_and_samples() {
        let waveform = c_major();
        let bytes = encode_wav(&waveform).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");

        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.bits_per_sample, 16);
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, waveform.samples());
    }

    #[test]
    fn test_write_wav_file() {
        let waveform = c_major();
        let path = std::env::temp_dir().join(format!("chorder-test-{}.wav", std::process::id()));
        write_wav_file(&waveform, &path).unwrap();
        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.len() as usize, waveform.len());
        let _ = std::fs::remove_file(&path);
    }
}
