use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between "read the file" and "ready to play".
/// Any of these leaves playback disabled for the rest of the session.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read audio file {}: {source}", path.display())]
    Fetch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode WAV data: {0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported WAV layout: {0}")]
    UnsupportedWav(String),

    #[error("failed to decode audio data: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("audio file contains no samples")]
    Empty,

    #[error("failed to open audio output device: {0}")]
    Output(#[from] rodio::StreamError),

    #[error("audio loader stopped before delivering a result")]
    Interrupted,
}
