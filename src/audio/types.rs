//! Contracts between the player and whatever actually produces sound.

use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::library::Track;

use super::analyser::FrequencyAnalyser;
use super::error::AudioError;

/// Asynchronous notifications from the output resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEvent {
    /// The source loaded under `generation` played to its end.
    Finished { generation: u64 },
}

/// The playable output resource: one loaded track at a time.
pub trait PlayableOutput {
    /// Replace whatever is loaded with `track`, held paused at its start.
    /// A `Finished` event for this load carries `generation`.
    fn load(&mut self, track: &Track, generation: u64) -> Result<(), AudioError>;
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    /// Rewind the loaded track to its start. The output is left paused, like
    /// a fresh load.
    fn seek_start(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn position(&self) -> Duration;
}

/// The per-session pair of output and analyser.
pub struct AudioGraph {
    pub output: Box<dyn PlayableOutput>,
    pub analyser: FrequencyAnalyser,
}

/// Creates the audio graph. `events` is registered once here and is the only
/// channel through which end-of-track is reported.
pub trait AudioBackend {
    fn open(&mut self, events: Sender<OutputEvent>) -> Result<AudioGraph, AudioError>;
}
