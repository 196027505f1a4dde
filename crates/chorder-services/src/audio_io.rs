//! Audio output service for chord playback

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::StreamConfig;
use crossbeam_channel::{bounded, Receiver, Sender};
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum AudioOutputError {
    #[error("No audio output devices found")]
    NoDevices,
    #[error("Failed to get default output config: {0}")]
    ConfigError(String),
    #[error("Failed to build output stream: {0}")]
    StreamError(String),
    #[error("Playback failed: {0}")]
    PlaybackError(String),
}

/// Handle for async playback completion
///
/// Dropping the handle stops playback.
pub struct PlaybackHandle {
    done_rx: Receiver<Result<(), AudioOutputError>>,
    stop_flag: Arc<AtomicBool>,
    _stream: Option<cpal::Stream>,
}

impl PlaybackHandle {
    /// A handle not tied to a device stream; `done_tx` signals completion
    pub fn detached() -> (Self, Sender<Result<(), AudioOutputError>>, Arc<AtomicBool>) {
        let (done_tx, done_rx) = bounded(1);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let handle = Self {
            done_rx,
            stop_flag: stop_flag.clone(),
            _stream: None,
        };
        (handle, done_tx, stop_flag)
    }

    /// Block until playback finishes or is stopped
    pub fn wait(self) -> Result<(), AudioOutputError> {
        self.done_rx.recv().unwrap_or(Ok(()))
    }

    pub fn is_done(&self) -> bool {
        !self.done_rx.is_empty()
    }

    /// Silence the output and release waiters
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::SeqCst)
    }
}

impl Drop for PlaybackHandle {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }
}

pub struct AudioOutputService;

impl AudioOutputService {
    /// Play mono f32 samples through default output device (async)
    pub fn play_samples(samples: Vec<f32>, sample_rate: u32) -> Result<PlaybackHandle, AudioOutputError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioOutputError::NoDevices)?;

        let supported_config = device
            .default_output_config()
            .map_err(|e| AudioOutputError::ConfigError(e.to_string()))?;

        let device_sample_rate = supported_config.sample_rate().0;
        let channels = supported_config.channels() as usize;

        info!(
            device = %device.name().unwrap_or_default(),
            sample_rate = device_sample_rate,
            channels = channels,
            input_samples = samples.len(),
            "Starting audio playback"
        );

        let resampled = Self::resample_if_needed(&samples, sample_rate, device_sample_rate)?;

        // Duplicate mono across output channels
        let output_samples: Vec<f32> = resampled
            .iter()
            .flat_map(|&s| std::iter::repeat_n(s, channels))
            .collect();

        let samples_arc = Arc::new(output_samples);
        let position = Arc::new(AtomicUsize::new(0));
        let position_clone = position.clone();
        let samples_clone = samples_arc.clone();
        let total_samples = samples_arc.len();

        let (done_tx, done_rx) = bounded(1);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop_clone = stop_flag.clone();
        let stop_monitor = stop_flag.clone();

        let config: StreamConfig = supported_config.into();

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if stop_clone.load(Ordering::SeqCst) {
                        data.fill(0.0);
                        return;
                    }
                    let pos = position_clone.load(Ordering::SeqCst);
                    for (i, sample) in data.iter_mut().enumerate() {
                        *sample = samples_clone.get(pos + i).copied().unwrap_or(0.0);
                    }
                    let new_pos = (pos + data.len()).min(total_samples);
                    position_clone.store(new_pos, Ordering::SeqCst);
                },
                move |err| error!("Playback stream error: {}", err),
                None,
            )
            .map_err(|e| AudioOutputError::StreamError(e.to_string()))?;

        stream.play().map_err(|e| AudioOutputError::StreamError(e.to_string()))?;

        // Monitor completion
        let position_monitor = position;
        thread::spawn(move || {
            let duration_secs = total_samples as f64 / (device_sample_rate as f64 * channels as f64);
            let timeout = Duration::from_secs_f64(duration_secs + 0.5);
            let start = Instant::now();

            while start.elapsed() < timeout {
                if stop_monitor.load(Ordering::SeqCst) {
                    debug!("Playback stopped early");
                    break;
                }
                if position_monitor.load(Ordering::SeqCst) >= total_samples {
                    break;
                }
                thread::sleep(Duration::from_millis(20));
            }
            let _ = done_tx.send(Ok(()));
        });

        Ok(PlaybackHandle {
            done_rx,
            stop_flag,
            _stream: Some(stream),
        })
    }

    fn resample_if_needed(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioOutputError> {
        if from_rate == to_rate {
            return Ok(samples.to_vec());
        }

        use rubato::{Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction};

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let mut resampler = SincFixedIn::<f32>::new(
            to_rate as f64 / from_rate as f64,
            2.0,
            params,
            samples.len(),
            1,
        )
        .map_err(|e| AudioOutputError::PlaybackError(format!("Resample init error: {}", e)))?;

        let input = vec![samples.to_vec()];
        let output = resampler
            .process(&input, None)
            .map_err(|e| AudioOutputError::PlaybackError(format!("Resample error: {}", e)))?;

        debug!(from_rate, to_rate, "Resampled playback buffer");
        Ok(output.into_iter().flatten().collect())
    }

    /// Get default output device info
    pub fn get_default_device_info() -> Result<(String, u32, u16), AudioOutputError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioOutputError::NoDevices)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioOutputError::ConfigError(e.to_string()))?;

        let name = device.name().unwrap_or_default();
        Ok((name, config.sample_rate().0, config.channels()))
    }
}
