use crate::cli::{Cli, Commands};
use motionlive::{config, engine};
use std::path::PathBuf;
use std::process;

use engine::worker::WorkerMessage;
use engine::types::OutcomeStatus;

pub fn run(cli: Cli) {
    // Handle subcommands first
    if let Some(command) = cli.command {
        match command {
            Commands::CheckTools => handle_check_tools(),
            Commands::Scan { directory } => handle_scan(directory),
            Commands::InitConfig => handle_init_config(),
        }
        return;
    }

    let Some(directory) = cli.directory else {
        eprintln!("Usage: motionlive <DIRECTORY> [--workers N]");
        eprintln!("Run 'motionlive --help' for details.");
        process::exit(2);
    };

    handle_convert(directory, cli.workers);
}

fn handle_check_tools() {
    let mut failed = false;

    match engine::tools::ffmpeg_version() {
        Ok(version) => println!("ffmpeg found: {}", version),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            failed = true;
        }
    }
    match engine::tools::exiftool_version() {
        Ok(version) => println!("exiftool found: {}", version),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            failed = true;
        }
    }
    match engine::tools::makelive_available() {
        Ok(()) => println!("makelive injector found"),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            failed = true;
        }
    }

    process::exit(if failed { 1 } else { 0 });
}

fn handle_scan(directory: Option<PathBuf>) {
    let dir = directory.unwrap_or_else(|| PathBuf::from("."));

    match engine::scan_pairs(&dir) {
        Ok((pairs, unpaired)) => {
            println!(
                "Found {} Live Photo pair(s), {} unpaired file(s)",
                pairs.len(),
                unpaired.len()
            );
            for pair in &pairs {
                println!(
                    "  {}  ({} + {})",
                    pair.base_name,
                    pair.image_path.display(),
                    pair.video_path.display()
                );
            }
            for single in &unpaired {
                println!("  [unpaired] {}", single.path.display());
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn handle_init_config() {
    match config::Config::config_path() {
        Ok(path) => {
            if config::Config::exists() {
                println!("Config file exists: {}", path.display());
            } else {
                match config::Config::default().save() {
                    Ok(()) => println!("Created default config: {}", path.display()),
                    Err(e) => {
                        eprintln!("Error creating config: {:#}", e);
                        process::exit(1);
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn handle_convert(directory: PathBuf, workers_override: Option<usize>) {
    if let Err(e) = engine::tools::check_all() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }

    let config = config::Config::load().unwrap_or_default();
    let input_dir = std::fs::canonicalize(&directory).unwrap_or(directory);

    let (pairs, unpaired) = match engine::scan_pairs(&input_dir) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if pairs.is_empty() && unpaired.is_empty() {
        println!("No motion photos found.");
        return;
    }

    let workers = workers_override
        .filter(|w| *w > 0)
        .or_else(|| {
            let configured = config.defaults.max_workers as usize;
            (configured > 0).then_some(configured)
        })
        .unwrap_or_else(engine::default_workers);

    let output_dir = input_dir.join(&config.defaults.export_folder);
    let prefix = config.defaults.output_prefix.clone();

    println!(
        "Found {} Live Photo pair(s), {} unpaired file(s)",
        pairs.len(),
        unpaired.len()
    );
    println!("Output → {}", output_dir.display());
    println!("Workers: {}\n", workers);

    let report = match engine::run(
        pairs,
        unpaired,
        &output_dir,
        workers,
        &prefix,
        engine::Backends::native(),
        |message| print_event(message),
    ) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    print_summary(&report);

    if !report.all_succeeded() {
        process::exit(1);
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_event(message: &WorkerMessage) {
    match message {
        WorkerMessage::PairStarted { base_name } => {
            tracing::debug!(pair = %base_name, "converting");
        }
        WorkerMessage::PairFinished { outcome } => match outcome.status {
            OutcomeStatus::Succeeded => {
                println!(
                    "  {}  →  {} + {}",
                    outcome.pair.base_name,
                    outcome
                        .output_image_path
                        .as_deref()
                        .map(file_name)
                        .unwrap_or_default(),
                    outcome
                        .output_video_path
                        .as_deref()
                        .map(file_name)
                        .unwrap_or_default(),
                );
            }
            OutcomeStatus::Failed => {
                println!(
                    "  {}  →  FAILED: {}",
                    outcome.pair.base_name,
                    outcome.error_detail.as_deref().unwrap_or("unknown error")
                );
            }
        },
        WorkerMessage::SingleCopied { path } => {
            println!("  {}  →  copied", file_name(path));
        }
        WorkerMessage::SingleFailed { path, error } => {
            println!("  {}  →  COPY FAILED: {}", file_name(path), error);
        }
    }
}

fn print_summary(report: &engine::RunReport) {
    println!("\n{}", "─".repeat(50));
    println!(
        "Done: {}/{} pair(s) converted",
        report.converted.len(),
        report.total_pairs()
    );
    if !report.failed.is_empty() {
        println!("  {} pair(s) failed:", report.failed.len());
        for outcome in &report.failed {
            println!(
                "    {}: {}",
                outcome.pair.base_name,
                outcome.error_detail.as_deref().unwrap_or("unknown error")
            );
        }
    }
    if !report.copied.is_empty() {
        println!("  + {} unpaired file(s) copied", report.copied.len());
    }
    if !report.copy_failures.is_empty() {
        println!("  {} cop(y/ies) failed:", report.copy_failures.len());
        for (path, error) in &report.copy_failures {
            println!("    {}: {}", file_name(path), error);
        }
    }

    if !report.converted.is_empty() || !report.copied.is_empty() {
        println!("\nNext steps:");
        println!("  1. Open Photos.app");
        println!("  2. File → Import, and select the export folder");
        println!("  3. Select all and import");
    }
}
