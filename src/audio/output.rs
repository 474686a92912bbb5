//! `rodio`-backed implementation of the output contract.
//!
//! A single `Sink` lives for the whole session; loading a track clears it
//! and appends a freshly decoded source wrapped in a `SampleTap`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info};

use crate::library::Track;

use super::analyser::{FrequencyAnalyser, SampleFeed};
use super::error::AudioError;
use super::tap::SampleTap;
use super::types::{AudioBackend, AudioGraph, OutputEvent, PlayableOutput};

/// Opens the default output device.
pub struct RodioBackend {
    fft_size: usize,
}

impl RodioBackend {
    pub fn new(fft_size: usize) -> Self {
        Self { fft_size }
    }
}

impl AudioBackend for RodioBackend {
    fn open(&mut self, events: Sender<OutputEvent>) -> Result<AudioGraph, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::OutputUnavailable(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would
        // scribble over the terminal UI.
        stream.log_on_drop(false);

        let sink = Sink::connect_new(stream.mixer());
        sink.pause();

        let analyser = FrequencyAnalyser::new(self.fft_size);
        info!(fft_size = self.fft_size, "audio output opened");

        let output = RodioOutput::new(sink, Some(stream), analyser.feed(), events);

        Ok(AudioGraph {
            output: Box::new(output),
            analyser,
        })
    }
}

struct Loaded {
    path: PathBuf,
    generation: u64,
}

pub(super) struct RodioOutput {
    // Declared before the stream so it is dropped first.
    sink: Sink,
    _stream: Option<OutputStream>,
    feed: SampleFeed,
    events: Sender<OutputEvent>,
    loaded: Option<Loaded>,
}

impl RodioOutput {
    /// `stream` is `None` only for a sink not attached to a device.
    pub(super) fn new(
        sink: Sink,
        stream: Option<OutputStream>,
        feed: SampleFeed,
        events: Sender<OutputEvent>,
    ) -> Self {
        Self {
            sink,
            _stream: stream,
            feed,
            events,
            loaded: None,
        }
    }

    #[cfg(test)]
    pub(super) fn sink(&self) -> &Sink {
        &self.sink
    }

    /// Drop whatever is queued and append the loaded track again from its
    /// start. `Sink::clear` leaves the sink paused.
    fn rebuild(&self) -> Result<(), AudioError> {
        let Some(loaded) = &self.loaded else {
            return Err(AudioError::NotLoaded);
        };
        self.sink.clear();
        self.append(&loaded.path, loaded.generation)
    }

    fn append(&self, path: &Path, generation: u64) -> Result<(), AudioError> {
        let file = File::open(path).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let tap = SampleTap::new(decoder, self.feed.clone(), self.events.clone(), generation);
        self.sink.append(tap);
        Ok(())
    }
}

impl PlayableOutput for RodioOutput {
    fn load(&mut self, track: &Track, generation: u64) -> Result<(), AudioError> {
        // Remember the track even if decoding fails so a later play reports
        // the failure instead of replaying the previous track.
        self.loaded = Some(Loaded {
            path: track.path.clone(),
            generation,
        });
        debug!(track = %track.name, generation, "loading track");
        self.rebuild()
    }

    fn play(&mut self) -> Result<(), AudioError> {
        let Some(loaded) = &self.loaded else {
            return Err(AudioError::NotLoaded);
        };
        if self.sink.empty() {
            // Nothing decodable is queued: the load failed earlier, or the
            // track already ended. Try to rebuild it so the error surfaces.
            self.append(&loaded.path, loaded.generation)?;
        }
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek_start(&mut self) {
        // Never `try_seek` here: it blocks until the audio thread takes the
        // order, which never happens once the source has just ended.
        match self.rebuild() {
            Ok(()) | Err(AudioError::NotLoaded) => {}
            Err(e) => debug!(error = %e, "rewind failed"),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn position(&self) -> Duration {
        if self.sink.empty() {
            Duration::ZERO
        } else {
            self.sink.get_pos()
        }
    }
}
