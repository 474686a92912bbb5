//! In-memory backend used by the player and UI tests.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::Track;

use super::analyser::FrequencyAnalyser;
use super::error::AudioError;
use super::types::{AudioBackend, AudioGraph, OutputEvent, PlayableOutput};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Load { name: String, generation: u64 },
    Play,
    Pause,
    SeekStart,
    Volume(f32),
}

#[derive(Default)]
pub(crate) struct Recorder {
    pub calls: Vec<Call>,
    pub events: Option<Sender<OutputEvent>>,
    pub opens: usize,
    pub fail_open: bool,
    pub fail_play: bool,
    pub fail_load: bool,
}

pub(crate) type RecorderHandle = Arc<Mutex<Recorder>>;

pub(crate) struct FakeBackend {
    recorder: RecorderHandle,
}

impl FakeBackend {
    pub fn new() -> (Self, RecorderHandle) {
        let recorder: RecorderHandle = Arc::new(Mutex::new(Recorder::default()));
        (
            Self {
                recorder: recorder.clone(),
            },
            recorder,
        )
    }
}

impl AudioBackend for FakeBackend {
    fn open(&mut self, events: Sender<OutputEvent>) -> Result<AudioGraph, AudioError> {
        let mut p = self.recorder.lock().unwrap();
        p.opens += 1;
        if p.fail_open {
            return Err(AudioError::OutputUnavailable("no device".into()));
        }
        p.events = Some(events);
        Ok(AudioGraph {
            output: Box::new(FakeOutput {
                recorder: self.recorder.clone(),
            }),
            analyser: FrequencyAnalyser::new(64),
        })
    }
}

struct FakeOutput {
    recorder: RecorderHandle,
}

impl PlayableOutput for FakeOutput {
    fn load(&mut self, track: &Track, generation: u64) -> Result<(), AudioError> {
        let mut p = self.recorder.lock().unwrap();
        p.calls.push(Call::Load {
            name: track.name.clone(),
            generation,
        });
        if p.fail_load {
            return Err(AudioError::NotLoaded);
        }
        Ok(())
    }

    fn play(&mut self) -> Result<(), AudioError> {
        let mut p = self.recorder.lock().unwrap();
        p.calls.push(Call::Play);
        if p.fail_play {
            return Err(AudioError::NotLoaded);
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.recorder.lock().unwrap().calls.push(Call::Pause);
    }

    fn seek_start(&mut self) {
        self.recorder.lock().unwrap().calls.push(Call::SeekStart);
    }

    fn set_volume(&mut self, volume: f32) {
        self.recorder.lock().unwrap().calls.push(Call::Volume(volume));
    }

    fn position(&self) -> Duration {
        Duration::from_secs(42)
    }
}

pub(crate) fn track(name: &str) -> Track {
    Track {
        id: crate::library::TrackId::random(),
        name: name.to_string(),
        path: std::path::PathBuf::from(format!("/music/{name}.mp3")),
        duration: Some(Duration::from_secs(180)),
    }
}

/// Fire the end-of-track signal the way the output thread would.
pub(crate) fn finish(recorder: &RecorderHandle, generation: u64) {
    let p = recorder.lock().unwrap();
    if let Some(tx) = &p.events {
        tx.send(OutputEvent::Finished { generation }).unwrap();
    }
}

/// Take and clear the recorded calls.
pub(crate) fn drain(recorder: &RecorderHandle) -> Vec<Call> {
    std::mem::take(&mut recorder.lock().unwrap().calls)
}
