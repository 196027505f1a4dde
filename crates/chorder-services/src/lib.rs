//! chorder-services: Playback and file output for rendered chords

pub mod audio_io;
pub mod player;
pub mod wav;

pub use audio_io::{AudioOutputError, AudioOutputService, PlaybackHandle};
pub use player::{ChordPlayer, DeviceSink, PlaybackSink, PlayerError};
pub use wav::{WavError, encode_wav, write_wav_file};
