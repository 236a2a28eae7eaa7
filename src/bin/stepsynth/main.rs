//! stepsynth - terminal front end
//!
//! Run with: cargo run --release
//!
//! Logs go to `stepsynth.log` (filter with `RUST_LOG`), settings are read
//! from `stepsynth.toml` when present, and finished recordings are written
//! next to it as `take-<n>.wav`.

mod app;
mod keys;
mod ui;

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use stepsynth::drums::{SampleSource, SynthKit, WavKit};
use stepsynth::io::CpalSink;
use stepsynth::sequencing::drum::DEFAULT_ROWS;
use stepsynth::{AudioEngine, EngineConfig};

const CONFIG_PATH: &str = "stepsynth.toml";
const LOG_PATH: &str = "stepsynth.log";
const KIT_DIR: &str = "kit";

fn init_logging() -> EyreResult<()> {
    let file = File::create(LOG_PATH).wrap_err("failed to create log file")?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// WAV samples from `kit/` when that directory has any, else the built-in kit.
fn load_kit() -> Box<dyn SampleSource> {
    if Path::new(KIT_DIR).is_dir() {
        let kit = WavKit::from_dir(KIT_DIR, DEFAULT_ROWS);
        if !kit.is_empty() {
            tracing::info!(samples = kit.len(), "using drum samples from {KIT_DIR}/");
            return Box::new(kit);
        }
    }
    Box::new(SynthKit::new())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    let config =
        EngineConfig::load_or_default(CONFIG_PATH).wrap_err("failed to load stepsynth.toml")?;
    let mut engine = AudioEngine::new(config, load_kit());

    let mut sink = CpalSink::open_default().wrap_err("failed to open audio output")?;
    engine.attach(&mut sink).wrap_err("failed to start audio output")?;

    let mut terminal = ratatui::init();
    let result = app::App::new(engine).run(&mut terminal);
    ratatui::restore();

    // The stream stops when the sink is dropped, after the engine has
    // released every voice.
    drop(sink);
    result
}
