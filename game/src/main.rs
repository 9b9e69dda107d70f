use std::path::Path;

use anyhow::Context;
use stoop_engine::{init_logging, EngineContext, WindowSettings};

use stoop_runner::config::{load_config, GameConfig, CONFIG_FILE};
use stoop_runner::gamepad::Gamepads;
use stoop_runner::level::load_level;
use stoop_runner::runner::Runner;

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = load_config(Path::new(CONFIG_FILE)).unwrap_or_else(|err| {
        log::warn!("{err}; using default tuning");
        GameConfig::default()
    });
    let layout = load_level(config.level.as_deref()).context("loading level")?;

    let settings = WindowSettings {
        title: config.window.title.clone(),
        width: f64::from(config.window.width),
        height: f64::from(config.window.height),
    };

    // ---- Create engine context (game owns this) ----
    let runner = Runner::new(config, layout, Gamepads::new());
    let ctx = EngineContext::new(settings, Box::new(runner))?;
    ctx.run()?;
    Ok(())
}
