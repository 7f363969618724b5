//! drumgrid - 16 step drum machine in the terminal
//!
//! Run with: cargo run
//!
//! Logs go to `drumgrid.log` in the data directory; set `DRUMGRID_LOG`
//! (e.g. `DRUMGRID_LOG=debug`) to change the filter.

mod app;
mod ui;

use std::fs::{self, File};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use rtrb::RingBuffer;

use app::App;
use drumgrid::{
    config::{self, MachineConfig},
    machine::{DisplayState, DrumMachine},
    output::{AudioSink, CpalSink, NullSink},
    sequencing::IntervalTimer,
    store::{FileStore, MemoryStore, PatternLibrary},
};

/// Output samples kept for the level meter and scope
const TAP_BUFFER_SIZE: usize = 16_384;

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let config = MachineConfig::new();
    let data_dir = config.resolved_data_dir();
    if let Some(dir) = &data_dir {
        init_logging(dir).wrap_err("failed to set up logging")?;
    }

    let (tap_tx, tap_rx) = RingBuffer::<f32>::new(TAP_BUFFER_SIZE);
    let sink: Box<dyn AudioSink> = match CpalSink::open(Some(tap_tx)) {
        Ok(sink) => Box::new(sink),
        Err(err) => {
            log::warn!("audio output unavailable: {}", err);
            Box::new(NullSink)
        }
    };

    let library = match &data_dir {
        Some(dir) => PatternLibrary::new(FileStore::new(dir)),
        None => {
            log::warn!("no data directory, saved patterns will not persist");
            PatternLibrary::new(MemoryStore::new())
        }
    };

    let machine = DrumMachine::new(
        config,
        sink,
        library,
        IntervalTimer::new(),
        DisplayState::default(),
    );

    let mut terminal = ratatui::init();
    let result = App::new(machine, tap_rx).run(&mut terminal);
    ratatui::restore();
    result
}

fn init_logging(dir: &std::path::Path) -> EyreResult<()> {
    fs::create_dir_all(dir)
        .wrap_err_with(|| format!("could not create {}", dir.display()))?;
    let file = File::create(dir.join("drumgrid.log"))?;

    env_logger::Builder::from_env(env_logger::Env::new().filter_or(config::LOG_ENV, "info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
