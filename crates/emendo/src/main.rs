use anyhow::{Context, Result};
use log::LevelFilter;
use std::env;
use std::fs;
use std::path::PathBuf;

use emendo::config::Config;
use emendo::{edit_code, screen};

fn main() -> Result<()> {
    let mut logger = env_logger::Builder::from_default_env();
    if env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Warn);
        logger.filter_module("emendo", LevelFilter::Info);
    }
    logger.init();

    // Restore the terminal before unwinding out of the full-screen editor.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = screen::restore_terminal();
        original_hook(panic_info);
    }));

    let args: Vec<String> = env::args().collect();
    let file = args.get(1).map(PathBuf::from);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load config, using defaults: {:#}", e);
            Config::default()
        }
    };

    let initial = match &file {
        Some(path) if path.exists() => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        Some(path) => {
            log::info!(
                "{} does not exist, starting with empty buffer",
                path.display()
            );
            String::new()
        }
        None => {
            log::info!("No file specified, starting with empty buffer");
            String::new()
        }
    };

    let edited = edit_code(&initial, &config);

    match &file {
        Some(path) => {
            fs::write(path, &edited)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("{} lines written to {}", edited.lines().count(), path.display());
        }
        None => {
            print!("{}", edited);
        }
    }

    Ok(())
}
