//! `Source` wrapper that feeds the analyser and reports end-of-track.

use std::sync::mpsc::Sender;
use std::time::Duration;

use rodio::Source;

use super::analyser::SampleFeed;
use super::types::OutputEvent;

pub(super) struct SampleTap<S> {
    inner: S,
    feed: SampleFeed,
    events: Sender<OutputEvent>,
    generation: u64,
    channels: u16,
    frame_sum: f32,
    frame_len: u16,
    finished: bool,
}

impl<S: Source> SampleTap<S> {
    pub(super) fn new(
        inner: S,
        feed: SampleFeed,
        events: Sender<OutputEvent>,
        generation: u64,
    ) -> Self {
        let channels = inner.channels().max(1);
        Self {
            inner,
            feed,
            events,
            generation,
            channels,
            frame_sum: 0.0,
            frame_len: 0,
            finished: false,
        }
    }
}

impl<S: Source> Iterator for SampleTap<S> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let Some(sample) = self.inner.next() else {
            if !self.finished {
                self.finished = true;
                // The receiver only disappears at session end.
                let _ = self.events.send(OutputEvent::Finished {
                    generation: self.generation,
                });
            }
            return None;
        };

        // Mix interleaved frames down to mono for the analyser.
        self.frame_sum += sample;
        self.frame_len += 1;
        if self.frame_len >= self.channels {
            self.feed.push(self.frame_sum / self.channels as f32);
            self.frame_sum = 0.0;
            self.frame_len = 0;
        }

        Some(sample)
    }
}

impl<S: Source> Source for SampleTap<S> {
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), rodio::source::SeekError> {
        self.frame_sum = 0.0;
        self.frame_len = 0;
        self.inner.try_seek(pos)
    }
}
