use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};
use std::thread;
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::library::Track;
use crate::player::Player;

const BUS_NAME: &str = "org.mpris.MediaPlayer2.cartridge";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

/// Requests coming in from the session bus, handled on the UI thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackStatus {
    /// Stopped means nothing is loaded; a loaded track that is not playing is paused.
    pub fn of(player: &Player) -> Self {
        if player.is_playing() {
            Self::Playing
        } else if player.current_track().is_some() {
            Self::Paused
        } else {
            Self::Stopped
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
        }
    }
}

#[derive(Debug, Default)]
struct SharedState {
    status: PlaybackStatus,
    track_id: Option<String>,
    title: Option<String>,
    length_micros: Option<i64>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn set_status(&self, status: PlaybackStatus) {
        if let Ok(mut s) = self.state.lock() {
            s.status = status;
        }
    }

    pub fn set_track_metadata(&self, track: Option<&Track>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        match track {
            Some(t) => {
                s.track_id = Some(format!("/org/cartridge/track/{}", t.id));
                s.title = Some(t.name.clone());
                s.length_micros = t
                    .duration
                    .and_then(|d| i64::try_from(d.as_micros()).ok());
            }
            None => {
                s.track_id = None;
                s.title = None;
                s.length_micros = None;
            }
        }
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "cartridge"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        self.state
            .lock()
            .map(|s| s.status.as_str())
            .unwrap_or("Stopped")
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Value<'_>| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };

        if let Some(Ok(path)) = s.track_id.as_deref().map(ObjectPath::try_from) {
            put("mpris:trackid", Value::from(path));
        }
        if let Some(title) = &s.title {
            put("xesam:title", Value::from(title.clone()));
        }
        if let Some(len) = s.length_micros {
            put("mpris:length", Value::from(len));
        }
        map
    }
}

async fn serve(
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
) -> zbus::Result<Connection> {
    connection::Builder::session()?
        .name(BUS_NAME)?
        .serve_at(OBJECT_PATH, RootIface { tx: tx.clone() })?
        .serve_at(OBJECT_PATH, PlayerIface { tx, state })?
        .build()
        .await
}

/// Serve MPRIS on a background thread. Bus failures are logged and the
/// returned handle then updates state nobody reads.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    let spawned = thread::Builder::new()
        .name("mpris".to_string())
        .spawn(move || {
            block_on(async move {
                match serve(tx, state_for_thread).await {
                    Ok(_connection) => {
                        info!(name = BUS_NAME, "mpris service registered");
                        // The connection serves requests for as long as it lives.
                        loop {
                            Timer::after(Duration::from_secs(3600)).await;
                        }
                    }
                    Err(e) => warn!(error = %e, "mpris unavailable"),
                }
            });
        });
    if let Err(e) = spawned {
        warn!(error = %e, "failed to start mpris thread");
    }

    MprisHandle { state }
}
