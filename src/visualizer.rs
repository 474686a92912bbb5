//! Spectrum visualizer: samples frequency snapshots into a fixed number of
//! blocky columns.
//!
//! Only the lower part of the spectrum is ever sampled: column `i` reads bin
//! `floor(i * len / 24)`, so sixteen columns cover roughly the bottom two
//! thirds of the snapshot.

use tracing::trace;

use crate::audio::FrequencyAnalyser;

/// Divisor of the sampling stride (`stride = len / STRIDE_DIVISOR`).
pub const STRIDE_DIVISOR: f64 = 24.0;

/// Snapshot indices sampled for each of `columns` columns.
pub fn sample_indices(buffer_len: usize, columns: usize) -> Vec<usize> {
    if buffer_len == 0 {
        return Vec::new();
    }
    let stride = buffer_len as f64 / STRIDE_DIVISOR;
    (0..columns)
        .map(|i| ((i as f64 * stride).floor() as usize).min(buffer_len - 1))
        .collect()
}

/// Number of whole blocks drawn for a magnitude in a view `view_height` tall.
pub fn block_count(magnitude: u8, view_height: f32, block_height: f32) -> u16 {
    if block_height <= 0.0 || view_height <= 0.0 {
        return 0;
    }
    let bar_height = magnitude as f32 / 255.0 * view_height;
    (bar_height / block_height).floor() as u16
}

/// The per-frame subscription: holds the snapshot buffer being refreshed.
#[derive(Debug)]
struct FrameSubscription {
    snapshot: Vec<u8>,
    indices: Vec<usize>,
}

/// Pulls snapshots while the detailed view is up.
///
/// Owners call `sync` whenever the view mode or the analyser presence may
/// have changed, and `frame` once per display frame.
#[derive(Debug)]
pub struct Visualizer {
    columns: usize,
    subscription: Option<FrameSubscription>,
}

impl Visualizer {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            subscription: None,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Whether a frame subscription is live. The event loop ticks at frame
    /// rate only while this is true.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribe when the detailed view is active and an analyser exists,
    /// cancel otherwise.
    pub fn sync(&mut self, detailed_active: bool, analyser: Option<&FrequencyAnalyser>) {
        match (detailed_active, analyser) {
            (true, Some(a)) => {
                let len = a.frequency_bin_count();
                let stale = self
                    .subscription
                    .as_ref()
                    .is_none_or(|s| s.snapshot.len() != len);
                if stale {
                    trace!(bins = len, "visualizer subscribed");
                    self.subscription = Some(FrameSubscription {
                        snapshot: vec![0; len],
                        indices: sample_indices(len, self.columns),
                    });
                }
            }
            _ => self.cancel(),
        }
    }

    pub fn cancel(&mut self) {
        if self.subscription.take().is_some() {
            trace!("visualizer cancelled");
        }
    }

    /// Pull the latest snapshot and return one magnitude per column.
    ///
    /// Returns `None` without subscribing when there is no subscription, and
    /// cancels the subscription when the analyser has gone away.
    pub fn frame(&mut self, analyser: Option<&mut FrequencyAnalyser>) -> Option<Vec<u8>> {
        let Some(analyser) = analyser else {
            self.cancel();
            return None;
        };
        let sub = self.subscription.as_mut()?;

        analyser.byte_frequency_data(&mut sub.snapshot);
        Some(sub.indices.iter().map(|&i| sub.snapshot[i]).collect())
    }
}
