//! Frequency analysis over the samples the output is currently playing.
//!
//! Snapshots are byte-scaled the same way a browser `AnalyserNode` does it:
//! Blackman window, magnitude smoothing over time, then a linear map from
//! the `[MIN_DB, MAX_DB]` decibel range onto `0..=255`.

use std::collections::VecDeque;
use std::f32::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

pub const MIN_DB: f32 = -100.0;
pub const MAX_DB: f32 = -30.0;
pub const SMOOTHING: f32 = 0.8;

#[derive(Debug)]
struct Shared {
    running: AtomicBool,
    samples: Mutex<VecDeque<f32>>,
    capacity: usize,
}

/// Producer side of the analyser, handed to the audio thread.
#[derive(Debug, Clone)]
pub struct SampleFeed {
    shared: Arc<Shared>,
}

impl SampleFeed {
    /// Record one mono sample. Dropped while the analyser is suspended or
    /// when the reader holds the buffer; the audio thread never waits.
    pub fn push(&self, sample: f32) {
        if !self.shared.running.load(Ordering::Relaxed) {
            return;
        }
        if let Ok(mut buf) = self.shared.samples.try_lock() {
            if buf.len() >= self.shared.capacity {
                buf.pop_front();
            }
            buf.push_back(sample);
        }
    }
}

pub struct FrequencyAnalyser {
    shared: Arc<Shared>,
    fft_size: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    smoothed: Vec<f32>,
    scratch: Vec<Complex<f32>>,
}

impl FrequencyAnalyser {
    /// `fft_size` must be a power of two (validated with the settings).
    pub fn new(fft_size: usize) -> Self {
        let fft = FftPlanner::<f32>::new().plan_fft_forward(fft_size);
        let window = blackman(fft_size);

        Self {
            shared: Arc::new(Shared {
                running: AtomicBool::new(true),
                samples: Mutex::new(VecDeque::with_capacity(fft_size)),
                capacity: fft_size,
            }),
            fft_size,
            fft,
            window,
            smoothed: vec![0.0; fft_size / 2],
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
        }
    }

    pub fn feed(&self) -> SampleFeed {
        SampleFeed {
            shared: self.shared.clone(),
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Length of a snapshot.
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Relaxed)
    }

    pub fn resume(&self) {
        self.shared.running.store(true, Ordering::Relaxed);
    }

    /// Stop recording and forget buffered samples, so later snapshots
    /// decay towards silence.
    pub fn suspend(&self) {
        self.shared.running.store(false, Ordering::Relaxed);
        if let Ok(mut buf) = self.shared.samples.lock() {
            buf.clear();
        }
    }

    /// Write the current magnitude snapshot into `out`, one byte per bin.
    /// At most `frequency_bin_count()` bytes are written.
    pub fn byte_frequency_data(&mut self, out: &mut [u8]) {
        let n = self.fft_size;

        // Most recent `n` samples, left-padded with silence.
        {
            let buf = match self.shared.samples.lock() {
                Ok(b) => b,
                Err(poisoned) => poisoned.into_inner(),
            };
            let pad = n.saturating_sub(buf.len());
            let skip = buf.len().saturating_sub(n);
            for c in &mut self.scratch[..pad] {
                *c = Complex::new(0.0, 0.0);
            }
            for (i, s) in buf.iter().skip(skip).enumerate() {
                self.scratch[pad + i] = Complex::new(s * self.window[pad + i], 0.0);
            }
        }

        self.fft.process(&mut self.scratch);

        let scale = 255.0 / (MAX_DB - MIN_DB);
        for (k, slot) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.scratch[k].norm() / n as f32;
            *slot = SMOOTHING * *slot + (1.0 - SMOOTHING) * magnitude;
        }

        for (byte, &mag) in out.iter_mut().zip(self.smoothed.iter()) {
            *byte = if mag > 0.0 {
                let db = 20.0 * mag.log10();
                (scale * (db - MIN_DB)).clamp(0.0, 255.0) as u8
            } else {
                0
            };
        }
    }
}

fn blackman(n: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            A0 - A1 * (2.0 * PI * x).cos() + A2 * (4.0 * PI * x).cos()
        })
        .collect()
}
