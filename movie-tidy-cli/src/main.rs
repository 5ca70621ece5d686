use anyhow::Result;
use clap::Parser;
use movie_tidy_core::{Config, Interrupt, OutputFormatter, VersionResult};
use std::io;
use std::path::Path;
use std::process;

mod cli;
mod run;

use cli::{Cli, Commands, OutputFormat};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // First Ctrl-C stops after the current file; at a prompt, or when
    // pressed again, exit right away
    let interrupt = Interrupt::new();
    let handler_side = interrupt.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        if handler_side.prompt_active() || handler_side.is_requested() {
            eprintln!("\nInterrupted.");
            process::exit(130);
        }
        eprintln!("\nReceived SIGINT. Stopping after the current file...");
        handler_side.request();
    }) {
        tracing::warn!(error = %e, "could not install SIGINT handler");
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(2);
        },
    };

    let result = match cli.command {
        Commands::Run(args) => {
            run::handle_run(&args, &config, cli.no_color, &interrupt).map(|_| ())
        },
        Commands::Version { output } => handle_version(output),
    };

    if interrupt.is_requested() {
        eprintln!("Operation interrupted.");
        process::exit(130);
    }

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");

            let exit_code = if e.to_string().to_lowercase().contains("invalid") {
                2 // Invalid input
            } else {
                1
            };

            process::exit(exit_code);
        },
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

fn handle_version(output: OutputFormat) -> Result<()> {
    let version_result = VersionResult {
        name: "movie-tidy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    println!("{}", version_result.format(output.into()));
    Ok(())
}
