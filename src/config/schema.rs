use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cartridge/config.toml` or `~/.config/cartridge/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CARTRIDGE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub library: LibrarySettings,
    pub integration: IntegrationSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume the session starts with, in `[0, 1]`.
    pub initial_volume: f32,
    /// Volume delta applied by one press of the up/down button.
    pub volume_step: f32,
    /// Analyser window size. Must be a power of two; half of it is the
    /// number of frequency bins in a snapshot. Small values give the
    /// chunky retro look.
    pub fft_size: usize,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.5,
            volume_step: 0.1,
            fft_size: 64,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered in the console's top strip.
    pub header_text: String,
    /// Which screen is shown at startup.
    pub start_screen: ScreenSetting,
    /// How long the volume overlay stays up after the last volume change (milliseconds).
    pub volume_overlay_ms: u64,
    /// Redraw interval while the spectrum is subscribed (milliseconds).
    pub frame_ms: u64,
    /// Redraw interval otherwise (milliseconds).
    pub idle_ms: u64,
    /// Number of spectrum columns.
    pub columns: usize,
    /// Height of one spectrum block, in terminal rows.
    pub block_height: u16,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: "POCKET MUSIC PLAYER".to_string(),
            start_screen: ScreenSetting::Info,
            volume_overlay_ms: 1500,
            frame_ms: 16,
            idle_ms: 100,
            columns: 16,
            block_height: 1,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenSetting {
    #[serde(alias = "text")]
    Info,
    #[serde(alias = "visualizer", alias = "spectrum")]
    Tape,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions picked up when a directory is loaded (case-insensitive, without dot).
    /// Files named explicitly are always accepted.
    pub extensions: Vec<String>,
    /// Whether to follow symlinks while walking directories.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntegrationSettings {
    /// Expose the player on the session bus as an MPRIS media player.
    pub mpris: bool,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self { mpris: true }
    }
}
