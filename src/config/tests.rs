use super::load::{InvalidSetting, default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_explicit_override() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CARTRIDGE_CONFIG_PATH", "/tmp/cartridge-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/cartridge-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("cartridge")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("cartridge")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_the_stock_console() {
    let s = Settings::default();
    assert_eq!(s.audio.initial_volume, 0.5);
    assert_eq!(s.audio.volume_step, 0.1);
    assert_eq!(s.audio.fft_size, 64);
    assert_eq!(s.ui.columns, 16);
    assert_eq!(s.ui.volume_overlay_ms, 1500);
    assert!(matches!(s.ui.start_screen, ScreenSetting::Info));
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file_and_parse_screen_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
initial_volume = 0.8
volume_step = 0.05
fft_size = 128

[ui]
header_text = "hello"
start_screen = "visualizer"
volume_overlay_ms = 900
columns = 12
block_height = 2

[library]
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false
max_depth = 3

[integration]
mpris = false
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CARTRIDGE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CARTRIDGE__AUDIO__FFT_SIZE");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 0.8);
    assert_eq!(s.audio.volume_step, 0.05);
    assert_eq!(s.audio.fft_size, 128);
    assert_eq!(s.ui.header_text, "hello");
    assert!(matches!(s.ui.start_screen, ScreenSetting::Tape));
    assert_eq!(s.ui.volume_overlay_ms, 900);
    assert_eq!(s.ui.columns, 12);
    assert_eq!(s.ui.block_height, 2);
    // Untouched keys keep their defaults.
    assert_eq!(s.ui.frame_ms, 16);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert!(!s.integration.mpris);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
fft_size = 256
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CARTRIDGE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CARTRIDGE__AUDIO__FFT_SIZE", "512");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.fft_size, 512);
}

#[test]
fn validate_rejects_bad_fft_sizes_and_volumes() {
    let mut s = Settings::default();
    s.audio.fft_size = 100;
    assert_eq!(s.validate(), Err(InvalidSetting::FftSize(100)));

    s.audio.fft_size = 16;
    assert_eq!(s.validate(), Err(InvalidSetting::FftSize(16)));

    s.audio.fft_size = 64;
    s.audio.initial_volume = 1.5;
    assert_eq!(s.validate(), Err(InvalidSetting::InitialVolume(1.5)));

    s.audio.initial_volume = 1.0;
    s.ui.columns = 0;
    assert_eq!(s.validate(), Err(InvalidSetting::Zero("ui.columns")));

    s.ui.columns = 16;
    s.ui.frame_ms = 0;
    let err = s.validate().unwrap_err();
    assert_eq!(err.to_string(), "ui.frame_ms must be >= 1");
}

#[test]
fn load_from_without_a_file_uses_defaults() {
    let _lock = env_lock();
    let s = Settings::load_from(None).unwrap();
    assert_eq!(s.audio.fft_size, 64);
    assert_eq!(s.ui.columns, 16);
}
