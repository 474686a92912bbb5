use std::env;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::RodioBackend;
use crate::mpris::ControlCmd;
use crate::player::Player;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let backend = RodioBackend::new(settings.audio.fft_size);
    let mut player = Player::new(Box::new(backend), settings.audio.initial_volume);

    let inputs = startup::initial_inputs(env::args_os().skip(1));
    startup::insert_cartridge(&mut player, &inputs, &settings.library);

    let mut app = App::new(&settings.ui);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = settings
        .integration
        .mpris
        .then(|| crate::mpris::spawn_mpris(control_tx));
    if let Some(m) = &mpris {
        mpris_sync::update_mpris(m, &player);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::new(&settings.ui, &player);
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut player,
        mpris.as_ref(),
        &control_rx,
        &mut state,
    );

    state.visualizer.cancel();
    player.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("bye");
    run_result
}
