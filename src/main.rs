// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::fs::File;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::runtime::Runtime;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;
use tracing_subscriber::EnvFilter;

use song_roulette::carousel::{CarouselEngine, CarouselEvent};
use song_roulette::config::{validate_config, AppConfig, ConfigWatcher};
use song_roulette::setup::Navigator;
use song_roulette::ui::{terminal_width, App, UiModel};

fn print_usage() {
    println!("Song Roulette - party game setup");
    println!();
    println!("Usage: song-roulette [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --play [CONFIG]         Run the terminal UI (default)");
    println!("  --carousel [SECONDS]    Run the cover carousel headless for SECONDS (default 10)");
    println!("  --demo [CONFIG]         Walk through a scripted game setup");
    println!("  --check-config <FILE>   Validate a YAML or TOML config file");
    println!("  --log <FILE>            Write log output to FILE");
    println!("  --help                  Show this help message");
}

/// Set up tracing. The terminal UI owns stdout, so it only logs to a file.
fn init_logging(log_file: Option<&str>, tui: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if tui => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load_config(path: Option<&str>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::default()),
    }
}

fn run_ui(config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let _guard = runtime.enter();

    let mut model = UiModel::new(&config, terminal_width());
    if let Some(path) = config_path {
        model.watch_config(ConfigWatcher::new(path, None)?);
    }

    let mut app = App::new(model)?;
    app.run()?;

    let summary = app
        .model()
        .session()
        .map(|s| (s.roster().locked_count(), s.player_count()));
    drop(app);

    if let Some((locked, players)) = summary {
        println!("{}/{} players locked in a song", locked, players);
    }
    Ok(())
}

fn run_carousel(seconds: f64) -> Result<()> {
    let config = AppConfig::default();
    let runtime = Runtime::new().context("Failed to start async runtime")?;

    runtime.block_on(async {
        let mut engine = CarouselEngine::new(config.cover_pool(), config.carousel_settings());
        let mut events = engine.subscribe();

        println!(
            "Rotating {} covers every {:.1}s for {:.1}s (press Ctrl+C to stop)...",
            engine.pool().len(),
            engine.period().as_secs_f64(),
            seconds
        );
        println!("start:     [{}]", window_names(&engine.window().to_vec()));

        engine.start(terminal_width());
        let deadline = tokio::time::sleep(Duration::from_secs_f64(seconds));
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                event = events.recv() => match event {
                    Ok(CarouselEvent::WindowChanged { cycle, window, inserted }) => {
                        println!(
                            "cycle {:>3}: [{}]  +{}",
                            cycle,
                            window_names(&window.to_vec()),
                            inserted
                        );
                    }
                    Ok(CarouselEvent::CycleStarted { .. }) => {}
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                },
            }
        }

        engine.stop();
        println!("Carousel stopped after {} cycles", engine.cycles());
    });

    Ok(())
}

fn window_names(covers: &[song_roulette::Cover]) -> String {
    covers
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Play every step of a game setup against the configured catalog
fn run_demo(config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let runtime = Runtime::new().context("Failed to start async runtime")?;

    runtime.block_on(async {
        let songs = config.catalog.songs.clone();
        if songs.is_empty() {
            return Err(anyhow!("The catalog has no songs to pick from"));
        }

        let mut navigator = Navigator::new(Arc::new(config.static_catalog()), config.setup_settings());
        navigator.play();
        navigator.start()?;

        let session = navigator
            .session_mut()
            .ok_or_else(|| anyhow!("No setup session after start"))?;
        let players = session.player_count();
        println!("Setting up a game for {} players", players);

        for slot in 0..players {
            session.select_slot(slot)?;

            let wanted = &songs[slot % songs.len()];
            let query = wanted.title.split_whitespace().next().unwrap_or_default();
            session.search(query);
            while session.is_searching() {
                session.wait_for_response().await;
            }

            println!(
                "Player {}: search \"{}\" found {} song(s)",
                slot + 1,
                query,
                session.results().len()
            );
            if session.results().is_empty() {
                session.dismiss();
                continue;
            }

            let song = session.choose_result(0)?;
            println!("Player {}: locked in {}", slot + 1, song);
        }

        for slot in session.roster().slots() {
            println!("  {}", slot);
        }
        info!(complete = session.is_complete(), "demo finished");
        println!(
            "Setup {}",
            if session.is_complete() { "complete" } else { "incomplete" }
        );
        Ok(())
    })
}

fn check_config(path: &str) -> Result<()> {
    let config = validate_config(path)?;
    println!("Config OK: {}", path);
    println!(
        "  carousel: {} covers, {:.1}s per cycle",
        config.carousel.pool_size, config.carousel.cycle_seconds
    );
    println!(
        "  setup:    {} players by default, {}ms search timeout",
        config.setup.default_player_count, config.setup.search_timeout_ms
    );
    println!("  catalog:  {} songs", config.catalog.songs.len());
    Ok(())
}

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().collect();

    let log_file = match args.iter().position(|a| a == "--log") {
        Some(i) => {
            if i + 1 >= args.len() {
                eprintln!("Error: --log requires a file path");
                std::process::exit(1);
            }
            let path = args.remove(i + 1);
            args.remove(i);
            Some(path)
        }
        None => None,
    };

    let mode = args.get(1).map(String::as_str).unwrap_or("--play");
    let tui = mode == "--play";
    init_logging(log_file.as_deref(), tui)?;

    match mode {
        "--play" => {
            run_ui(args.get(2).map(String::as_str))?;
        }
        "--carousel" => {
            let seconds: f64 = match args.get(2) {
                Some(s) => s
                    .parse()
                    .map_err(|_| anyhow!("Invalid number of seconds: {}", s))?,
                None => 10.0,
            };
            run_carousel(seconds)?;
        }
        "--demo" => {
            run_demo(args.get(2).map(String::as_str))?;
        }
        "--check-config" => {
            let Some(path) = args.get(2) else {
                eprintln!("Error: --check-config requires a file path");
                std::process::exit(1);
            };
            check_config(path)?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", mode);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
