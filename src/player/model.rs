use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use tracing::{debug, error, info, trace, warn};

use crate::audio::{AudioBackend, AudioGraph, FrequencyAnalyser, OutputEvent};
use crate::library::{Track, TrackId};

/// What the user asked for. The output is made to follow this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSession {
    /// `None` until the first track is added; afterwards always a valid index.
    pub current_index: Option<usize>,
    /// Only ever true while a current track exists.
    pub is_playing: bool,
    /// Always within `[0, 1]`.
    pub volume: f32,
}

enum GraphState {
    /// Not created yet; the first user interaction opens it.
    Unopened,
    Open(AudioGraph),
    /// Opening failed. Never retried; the session stays silent.
    Unavailable,
    /// Torn down at session end.
    Closed,
}

/// What was last pushed to the output.
#[derive(Default)]
struct Applied {
    track: Option<TrackId>,
    playing: bool,
    volume: Option<f32>,
}

pub struct Player {
    backend: Box<dyn AudioBackend>,
    graph: GraphState,
    events_tx: Sender<OutputEvent>,
    events_rx: Receiver<OutputEvent>,
    playlist: Vec<Track>,
    session: PlaybackSession,
    applied: Applied,
    /// Bumped on every load; end-of-track events from older loads are stale.
    generation: u64,
}

impl Player {
    pub fn new(backend: Box<dyn AudioBackend>, initial_volume: f32) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            backend,
            graph: GraphState::Unopened,
            events_tx,
            events_rx,
            playlist: Vec::new(),
            session: PlaybackSession {
                current_index: None,
                is_playing: false,
                volume: initial_volume.clamp(0.0, 1.0),
            },
            applied: Applied::default(),
            generation: 0,
        }
    }

    pub fn playlist(&self) -> &[Track] {
        &self.playlist
    }

    pub fn session(&self) -> PlaybackSession {
        self.session
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.current_index
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.session
            .current_index
            .and_then(|i| self.playlist.get(i))
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_playing
    }

    pub fn volume(&self) -> f32 {
        self.session.volume
    }

    /// False once opening the audio output has failed.
    pub fn audio_available(&self) -> bool {
        !matches!(self.graph, GraphState::Unavailable)
    }

    pub fn analyser(&self) -> Option<&FrequencyAnalyser> {
        match &self.graph {
            GraphState::Open(graph) => Some(&graph.analyser),
            _ => None,
        }
    }

    pub fn analyser_mut(&mut self) -> Option<&mut FrequencyAnalyser> {
        match &mut self.graph {
            GraphState::Open(graph) => Some(&mut graph.analyser),
            _ => None,
        }
    }

    /// Playback position of the loaded track, if there is one.
    pub fn position(&self) -> Option<Duration> {
        match &self.graph {
            GraphState::Open(graph) if self.applied.track.is_some() => {
                Some(graph.output.position())
            }
            _ => None,
        }
    }

    /// Append `tracks` in order. Selects the first track when the playlist
    /// was empty, without starting playback.
    pub fn add_files(&mut self, tracks: Vec<Track>) {
        let was_empty = self.playlist.is_empty();
        info!(added = tracks.len(), total = self.playlist.len() + tracks.len(), "adding tracks");
        self.playlist.extend(tracks);

        if was_empty && !self.playlist.is_empty() {
            self.session.current_index = Some(0);
        }

        self.ensure_graph();
        self.sync();
    }

    pub fn toggle_play(&mut self) {
        self.ensure_graph();
        if self.playlist.is_empty() {
            return;
        }
        self.session.is_playing = !self.session.is_playing;
        self.sync();
    }

    /// Advance by one. At the last track playback stops and rewinds instead
    /// of wrapping around.
    pub fn next_track(&mut self) {
        if self.playlist.is_empty() {
            return;
        }

        let len = self.playlist.len();
        match self.session.current_index {
            Some(i) if i + 1 >= len => {
                self.session.is_playing = false;
                if let GraphState::Open(graph) = &mut self.graph {
                    graph.output.seek_start();
                }
            }
            current => {
                self.session.current_index = Some(current.map_or(0, |i| i + 1));
                self.session.is_playing = true;
            }
        }
        self.sync();
    }

    /// Step back by one, wrapping from the first track to the last, and
    /// always start playing.
    pub fn prev_track(&mut self) {
        if self.playlist.is_empty() {
            return;
        }

        let len = self.playlist.len();
        let i = self.session.current_index.unwrap_or(0);
        self.session.current_index = Some((i + len - 1) % len);
        self.session.is_playing = true;
        self.sync();
    }

    pub fn play_track(&mut self, index: usize) {
        self.ensure_graph();
        if index >= self.playlist.len() {
            debug!(index, len = self.playlist.len(), "ignoring out-of-range track");
            return;
        }
        self.session.current_index = Some(index);
        self.session.is_playing = true;
        self.sync();
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        self.session.volume = (self.session.volume + delta).clamp(0.0, 1.0);
        self.sync();
    }

    /// Drain output notifications. A finish of the current load runs the
    /// same logic as `next_track`, against the state as it is now.
    pub fn pump_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                OutputEvent::Finished { generation } if generation == self.generation => {
                    debug!(generation, "track finished");
                    self.next_track();
                }
                OutputEvent::Finished { generation } => {
                    trace!(generation, current = self.generation, "ignoring stale finish");
                }
            }
        }
    }

    /// Release the audio graph. Commands keep updating state afterwards but
    /// no longer reach an output.
    pub fn shutdown(&mut self) {
        if let GraphState::Open(graph) = &mut self.graph {
            graph.output.pause();
            graph.analyser.suspend();
            info!("audio output closed");
        }
        self.graph = GraphState::Closed;
    }

    fn ensure_graph(&mut self) {
        if matches!(self.graph, GraphState::Unopened) {
            self.graph = match self.backend.open(self.events_tx.clone()) {
                Ok(graph) => GraphState::Open(graph),
                Err(e) => {
                    error!(error = %e, "audio unavailable, continuing without sound");
                    GraphState::Unavailable
                }
            };
        } else if let GraphState::Open(graph) = &self.graph {
            if !graph.analyser.is_running() {
                graph.analyser.resume();
            }
        }
    }

    /// Push the session onto the output: load rule, then play/pause rule,
    /// then volume rule.
    fn sync(&mut self) {
        let GraphState::Open(graph) = &mut self.graph else {
            return;
        };

        let desired = self
            .session
            .current_index
            .and_then(|i| self.playlist.get(i));
        if let Some(track) = desired {
            if self.applied.track.as_ref() != Some(&track.id) {
                self.generation += 1;
                if let Err(e) = graph.output.load(track, self.generation) {
                    warn!(track = %track.name, error = %e, "failed to load track");
                }
                // A fresh load is held paused; the play rule below resumes it
                // when the session wants sound.
                self.applied.track = Some(track.id.clone());
                self.applied.playing = false;
            }
        }

        if self.session.is_playing != self.applied.playing {
            if self.session.is_playing {
                graph.analyser.resume();
                if let Err(e) = graph.output.play() {
                    warn!(error = %e, "playback failed to start");
                }
            } else {
                graph.output.pause();
                graph.analyser.suspend();
            }
            self.applied.playing = self.session.is_playing;
        }

        if self.applied.volume != Some(self.session.volume) {
            graph.output.set_volume(self.session.volume);
            self.applied.volume = Some(self.session.volume);
        }
    }
}
