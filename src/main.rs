mod app;
mod audio;
mod config;
mod library;
mod logging;
mod mpris;
mod player;
mod runtime;
mod ui;
mod visualizer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    runtime::run()
}
