use anyhow::Result;
use movie_tidy_core::{
    run_operation, Config, HttpNamingService, Interrupt, OutputFormatter, ResolverOptions,
    RunOptions, RunResult,
};
use std::io::{self, IsTerminal, Write};

use crate::cli::{OutputFormat, RunArgs};

/// Command-line values win over the configuration file.
pub fn resolve_options(args: &RunArgs, config: &Config) -> (RunOptions, ResolverOptions) {
    let mut options = RunOptions::from_config(config);
    if let Some(dir) = &args.dir {
        options.directory.clone_from(dir);
    }
    if let Some(name_format) = &args.name_format {
        options.name_format.clone_from(name_format);
    }
    if let Some(manual_mode) = args.manual_mode {
        options.manual_mode = manual_mode;
    }
    if let Some(count) = args.recent_file_count {
        options.enumerate.recent_file_count = count;
    }
    if !args.filename.is_empty() {
        options.enumerate.name_filter = Some(args.filename.clone());
    }

    let mut service = config.service.clone();
    if let Some(endpoint) = &args.endpoint {
        service.endpoint.clone_from(endpoint);
    }
    if let Some(timeout) = args.timeout {
        service.timeout_secs = timeout;
    }
    if let Some(retries) = args.retries {
        service.retry.max_attempts = retries;
    }

    (options, ResolverOptions::from(&service))
}

pub fn handle_run(
    args: &RunArgs,
    config: &Config,
    no_color: bool,
    interrupt: &Interrupt,
) -> Result<RunResult> {
    let (mut options, resolver) = resolve_options(args, config);
    let service = HttpNamingService::new(&resolver)?;
    tracing::debug!(url = service.url(), "using naming service");

    let stdin = io::stdin();
    let mut input = stdin.lock();

    // Keep stdout clean for the JSON document
    let result = if args.output == OutputFormat::Json {
        let mut progress = io::stderr();
        options.use_color = !no_color && progress.is_terminal();
        run_operation(&options, &service, &mut input, &mut progress, interrupt)?
    } else {
        let mut progress = io::stdout();
        options.use_color = !no_color && progress.is_terminal();
        let result = run_operation(&options, &service, &mut input, &mut progress, interrupt)?;
        progress.flush()?;
        result
    };

    if !result.files.is_empty() || args.output == OutputFormat::Json || result.interrupted {
        println!("{}", result.format(args.output.into()));
    }
    Ok(result)
}
