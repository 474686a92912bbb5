use tracing::{info, warn};

use crate::config::{Settings, resolve_config_path};

/// Settings for this run. A broken config never stops the console from
/// starting: problems are logged and the stock settings are used.
pub fn load_settings() -> Settings {
    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "failed to load config, using defaults");
            return Settings::default();
        }
    };

    match settings.validate() {
        Ok(()) => {
            info!(path = ?resolve_config_path(), "settings loaded");
            settings
        }
        Err(e) => {
            warn!(error = %e, "invalid config, using defaults");
            Settings::default()
        }
    }
}
