use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::app::App;
use crate::config;
use crate::library::parse_typed_path;
use crate::mpris::{ControlCmd, MprisHandle, PlaybackStatus};
use crate::player::Player;
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::startup::insert_cartridge;
use crate::ui;
use crate::visualizer::Visualizer;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    pub visualizer: Visualizer,
    /// Last-known playing index, used to move the cursor after auto-advance.
    pub last_index: Option<usize>,
    /// Last-known playback status as emitted to MPRIS.
    pub last_mpris_status: PlaybackStatus,
    pub last_mpris_index: Option<usize>,
}

impl EventLoopState {
    pub fn new(ui: &config::UiSettings, player: &Player) -> Self {
        Self {
            visualizer: Visualizer::new(ui.columns),
            last_index: player.current_index(),
            last_mpris_status: PlaybackStatus::of(player),
            last_mpris_index: player.current_index(),
        }
    }
}

/// Main terminal event loop: output notifications, the spectrum frame,
/// drawing, MPRIS requests and keys. Returns `Ok(())` when quit is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player,
    mpris: Option<&MprisHandle>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        player.pump_events();
        after_command(app, player, mpris, state);

        state
            .visualizer
            .sync(app.detailed_view_active(), player.analyser());
        let columns = state.visualizer.frame(player.analyser_mut());
        app.set_spectrum(columns);
        app.tick();

        let now = Instant::now();
        terminal.draw(|f| ui::draw(f, app, player, &settings.ui, now))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, player) {
                return Ok(());
            }
            after_command(app, player, mpris, state);
        }

        // Animate at frame rate only while something on screen moves.
        let timeout = if state.visualizer.is_subscribed() || app.overlay.is_visible(now) {
            settings.ui.frame_ms
        } else {
            settings.ui.idle_ms
        };

        if event::poll(Duration::from_millis(timeout))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, player, Instant::now()) {
                    break;
                }
                after_command(app, player, mpris, state);
            }
        }
    }

    Ok(())
}

/// Keep the cursor and MPRIS in step with playback, whoever changed it.
fn after_command(
    app: &mut App,
    player: &Player,
    mpris: Option<&MprisHandle>,
    state: &mut EventLoopState,
) {
    let index = player.current_index();
    if index != state.last_index {
        app.follow(index);
        state.last_index = index;
    }

    let status = PlaybackStatus::of(player);
    if status != state.last_mpris_status || index != state.last_mpris_index {
        if let Some(m) = mpris {
            update_mpris(m, player);
        }
        state.last_mpris_status = status;
        state.last_mpris_index = index;
    }
}

/// Map an MPRIS request onto player commands. Returns `true` on quit.
pub(crate) fn handle_control_cmd(cmd: ControlCmd, player: &mut Player) -> bool {
    debug!(?cmd, "mpris command");
    match cmd {
        ControlCmd::Quit => {
            info!("quit requested over mpris");
            return true;
        }
        ControlCmd::Play => {
            if !player.is_playing() {
                player.toggle_play();
            }
        }
        // There is no stopped state beyond pause.
        ControlCmd::Pause | ControlCmd::Stop => {
            if player.is_playing() {
                player.toggle_play();
            }
        }
        ControlCmd::PlayPause => player.toggle_play(),
        ControlCmd::Next => player.next_track(),
        ControlCmd::Prev => player.prev_track(),
    }
    false
}

/// Apply one key press. Returns `true` when the app should quit.
pub(crate) fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player,
    now: Instant,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if app.prompt.is_some() {
        match key.code {
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Backspace => app.pop_prompt_char(),
            KeyCode::Enter => {
                if let Some(path) = app.submit_prompt().as_deref().and_then(parse_typed_path) {
                    let inputs = [path];
                    if insert_cartridge(player, &inputs, &settings.library) == 0 {
                        info!(path = %inputs[0].display(), "nothing playable at selected path");
                    }
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
            _ => {}
        }
        return false;
    }

    let step = settings.audio.volume_step;
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Left | KeyCode::Char('h') => player.prev_track(),
        KeyCode::Right | KeyCode::Char('l') => player.next_track(),
        KeyCode::Up | KeyCode::Char('+') | KeyCode::Char('=') => {
            player.adjust_volume(step);
            app.overlay.show(now);
        }
        KeyCode::Down | KeyCode::Char('-') => {
            player.adjust_volume(-step);
            app.overlay.show(now);
        }
        KeyCode::Char(' ') => player.toggle_play(),
        KeyCode::Char('a') => app.show_tape(),
        KeyCode::Char('b') => app.show_info(),
        KeyCode::Char('o') => app.open_prompt(),
        KeyCode::Char('j') => app.cursor_next(player.playlist().len()),
        KeyCode::Char('k') => app.cursor_prev(player.playlist().len()),
        KeyCode::Enter => player.play_track(app.cursor),
        _ => {}
    }

    false
}
