//! Presentation state: which screen is up, the volume overlay, the
//! playlist cursor and the Select prompt.
//!
//! Playback state itself lives in `Player`; nothing here touches audio.

use std::time::{Duration, Instant};

use crate::config::{ScreenSetting, UiSettings};

/// What the console screen shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScreenMode {
    /// Text: status and current track name.
    Info,
    /// Cassette and spectrum: the detailed view.
    Tape,
}

impl From<ScreenSetting> for ScreenMode {
    fn from(s: ScreenSetting) -> Self {
        match s {
            ScreenSetting::Info => Self::Info,
            ScreenSetting::Tape => Self::Tape,
        }
    }
}

/// Transient "VOL n" overlay. Every change pushes the hide deadline out,
/// replacing any earlier pending hide.
#[derive(Debug, Clone)]
pub struct VolumeOverlay {
    delay: Duration,
    hide_at: Option<Instant>,
}

impl VolumeOverlay {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            hide_at: None,
        }
    }

    pub fn show(&mut self, now: Instant) {
        self.hide_at = Some(now + self.delay);
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.hide_at.is_some_and(|t| now < t)
    }
}

/// The main presentation model.
pub struct App {
    pub screen: ScreenMode,
    pub overlay: VolumeOverlay,
    /// Playlist row highlighted for `play_track`.
    pub cursor: usize,
    /// Text typed into the Select prompt, when it is open.
    pub prompt: Option<String>,
    /// Latest per-column magnitudes from the visualizer.
    pub spectrum: Vec<u8>,
    /// Frames drawn so far; drives the cassette reels.
    pub frame: u64,
    pub header_text: String,
}

impl App {
    pub fn new(ui: &UiSettings) -> Self {
        Self {
            screen: ui.start_screen.into(),
            overlay: VolumeOverlay::new(Duration::from_millis(ui.volume_overlay_ms)),
            cursor: 0,
            prompt: None,
            spectrum: vec![0; ui.columns],
            frame: 0,
            header_text: ui.header_text.clone(),
        }
    }

    /// The A button.
    pub fn show_tape(&mut self) {
        self.screen = ScreenMode::Tape;
    }

    /// The B button.
    pub fn show_info(&mut self) {
        self.screen = ScreenMode::Info;
    }

    pub fn detailed_view_active(&self) -> bool {
        self.screen == ScreenMode::Tape
    }

    /// Move the cursor down, wrapping to the top.
    pub fn cursor_next(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor.min(len - 1) + 1) % len;
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn cursor_prev(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor.min(len - 1) + len - 1) % len;
    }

    /// Put the cursor on the playing row, e.g. after next/prev.
    pub fn follow(&mut self, current: Option<usize>) {
        if let Some(i) = current {
            self.cursor = i;
        }
    }

    /// Replace the column magnitudes with a new frame, or let them drop to
    /// zero when no frame was produced.
    pub fn set_spectrum(&mut self, columns: Option<Vec<u8>>) {
        match columns {
            Some(c) => self.spectrum = c,
            None => self.spectrum.iter_mut().for_each(|m| *m = 0),
        }
    }

    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn open_prompt(&mut self) {
        self.prompt = Some(String::new());
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(p) = self.prompt.as_mut() {
            p.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Some(p) = self.prompt.as_mut() {
            p.pop();
        }
    }

    /// Close the prompt and hand back what was typed.
    pub fn submit_prompt(&mut self) -> Option<String> {
        self.prompt.take()
    }
}
