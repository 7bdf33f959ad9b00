//! Command handlers

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

use stepmeter_app::{capture_reading, paths};
use stepmeter_domain::{settings, Dashboard};
use stepmeter_store::{export_state, import_state, StateStore};
use stepmeter_types::{Error, OutputFormat, Result};
use stepmeter_vision::{ExtractionCache, ExtractorConfig, ProgressObserver, ReadingExtractor};

use crate::cli::{Cli, Commands};
use crate::output;

pub fn execute(cli: Cli) -> Result<()> {
    let data_dir = paths::data_dir(cli.data_dir.clone())?;
    let store = StateStore::open(data_dir)?;

    match &cli.command {
        Commands::Init { steps, api_key } => cmd_init(&store, *steps, api_key.clone()),
        Commands::Capture { image, no_cache } => {
            cmd_capture(&cli, &store, image.clone(), *no_cache)
        }
        Commands::Status => cmd_status(&cli, &store),
        Commands::History { limit } => cmd_history(&cli, &store, *limit),
        Commands::Config {
            show,
            set_api_key,
            set_steps,
        } => cmd_config(&cli, &store, *show, set_api_key.clone(), *set_steps),
        Commands::Export { output } => cmd_export(&store, output.clone()),
        Commands::Import { file, dry_run } => cmd_import(&store, file.clone(), *dry_run),
        Commands::Photo { output } => cmd_photo(&store, output.clone()),
        Commands::Reset { yes } => cmd_reset(&store, *yes),
        Commands::Cache { clear, stats } => cmd_cache(&cli, *clear, *stats),
    }
}

/// Extraction progress shown on stderr: a spinner normally, plain lines
/// when verbose so they interleave readably with log output.
enum CliProgress {
    Spinner(ProgressBar),
    Plain,
}

impl CliProgress {
    fn new(verbose: bool) -> Self {
        if verbose {
            return CliProgress::Plain;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        CliProgress::Spinner(bar)
    }

    fn finish(&self) {
        if let CliProgress::Spinner(bar) = self {
            bar.finish_and_clear();
        }
    }
}

impl ProgressObserver for CliProgress {
    fn on_status(&self, status: &str) {
        match self {
            CliProgress::Spinner(bar) => bar.set_message(status.to_string()),
            CliProgress::Plain => eprintln!("{}", status),
        }
    }
}

fn cmd_init(store: &StateStore, steps: f64, api_key: Option<String>) -> Result<()> {
    let mut state = store.load()?;
    if state.onboarded {
        return Err(Error::Config(
            "already set up; use `stepmeter config` to change settings".to_string(),
        ));
    }

    settings::onboard(&mut state, steps, api_key.unwrap_or_default())?;
    store.save(&state)?;

    println!("Season initialized with an allowance of {} steps.", steps);
    if state.api_key.is_empty() {
        println!("No API key yet. Set one with: stepmeter config --set-api-key <KEY>");
    }
    Ok(())
}

fn cmd_capture(cli: &Cli, store: &StateStore, image: PathBuf, no_cache: bool) -> Result<()> {
    let mut state = store.load()?;

    let cache = if no_cache {
        None
    } else {
        Some(ExtractionCache::open(paths::cache_dir(
            cli.data_dir.clone(),
        )?)?)
    };

    let extractor = ReadingExtractor::new(&ExtractorConfig::default());
    let progress = CliProgress::new(cli.verbose);

    let result = capture_reading(
        store,
        &mut state,
        &extractor,
        cache.as_ref(),
        &image,
        Some(&progress),
    );
    progress.finish();
    let outcome = result?;

    output::print_capture(cli.format, &outcome)?;

    if cli.format == OutputFormat::Table {
        let dashboard = Dashboard::compute(&state, Utc::now());
        output::print_capture_summary(&state, &dashboard);
    }
    Ok(())
}

fn cmd_status(cli: &Cli, store: &StateStore) -> Result<()> {
    let state = store.load()?;
    if !state.onboarded {
        return Err(Error::NotOnboarded);
    }

    let dashboard = Dashboard::compute(&state, Utc::now());
    output::print_status(cli.format, &state, &dashboard)
}

fn cmd_history(cli: &Cli, store: &StateStore, limit: usize) -> Result<()> {
    let state = store.load()?;
    output::print_history(cli.format, &state.readings, limit)
}

fn cmd_config(
    cli: &Cli,
    store: &StateStore,
    show: bool,
    set_api_key: Option<String>,
    set_steps: Option<f64>,
) -> Result<()> {
    let mut state = store.load()?;
    let modified = set_api_key.is_some() || set_steps.is_some();

    if modified {
        settings::update_settings(&mut state, set_api_key, set_steps)?;
        store.save(&state)?;
        println!("Settings updated");
    }

    if show || !modified {
        output::print_settings(cli.format, &state, store.path())?;
    }
    Ok(())
}

fn cmd_export(store: &StateStore, output: Option<PathBuf>) -> Result<()> {
    let state = store.load()?;
    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "stepmeter_backup_{}.json",
            Utc::now().format("%Y-%m-%d")
        ))
    });

    export_state(&state, &path)?;
    println!("Exported to: {}", path.display());
    Ok(())
}

fn cmd_import(store: &StateStore, file: PathBuf, dry_run: bool) -> Result<()> {
    let imported = import_state(&file)?;

    if dry_run {
        println!(
            "Backup OK: {} readings, onboarded: {}, allowance: {} steps",
            imported.readings.len(),
            imported.onboarded,
            imported.allowed_steps
        );
        println!("Dry run - nothing imported");
        return Ok(());
    }

    store.save(&imported)?;
    println!(
        "Imported {} readings from {}",
        imported.readings.len(),
        file.display()
    );
    Ok(())
}

fn cmd_photo(store: &StateStore, output: Option<PathBuf>) -> Result<()> {
    let state = store.load()?;
    let photo = state
        .initial_photo
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or(Error::NoReferencePhoto)?;

    let bytes = STANDARD
        .decode(photo)
        .map_err(|e| Error::Config(format!("stored photo is not valid base64: {}", e)))?;

    let path = output.unwrap_or_else(|| PathBuf::from("stepmeter_reference.jpg"));
    std::fs::write(&path, bytes)?;
    println!("Reference photo written to: {}", path.display());
    Ok(())
}

fn cmd_reset(store: &StateStore, yes: bool) -> Result<()> {
    if !yes {
        print!("Delete ALL local data? This cannot be undone. Type 'yes' to confirm: ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if answer.trim() != "yes" {
            println!("Aborted");
            return Ok(());
        }
    }

    store.reset()?;
    println!("All data deleted");
    Ok(())
}

fn cmd_cache(cli: &Cli, clear: bool, stats: bool) -> Result<()> {
    let cache = ExtractionCache::open(paths::cache_dir(cli.data_dir.clone())?)?;

    if clear {
        let count = cache.clear()?;
        println!("Cleared {} cached extractions", count);
    }

    if stats || !clear {
        println!("{}", cache.stats()?.display());
    }
    Ok(())
}
