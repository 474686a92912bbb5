use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the audio backend. The player absorbs all of them;
/// they only ever reach the log.
#[derive(Debug, Error)]
pub enum AudioError {
    /// No usable output device; audio stays inert for the whole session.
    #[error("audio output unavailable: {0}")]
    OutputUnavailable(String),

    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("no track loaded")]
    NotLoaded,
}
