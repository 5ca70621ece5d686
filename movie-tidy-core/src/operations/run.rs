use crate::config::Config;
use crate::enumerate::{enumerate_candidates, CandidateFile, EnumerateOptions};
use crate::interrupt::{Interrupt, PromptGuard};
use crate::output::{FileOutcome, FileReport, RunResult};
use crate::prompt::{decide, Decision, LineSource};
use crate::rename::{rename_file, RenameDecision, RenameOutcome};
use crate::resolver::{NameQuery, NamingService};
use anyhow::{Context, Result};
use nu_ansi_term::Color;
use std::io::Write;
use std::path::PathBuf;

const SEPARATOR_WIDTH: usize = 79;

/// Everything a run needs besides the naming service and the terminal.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub directory: PathBuf,
    /// Template sent as `custom_name` with every query
    pub name_format: String,
    pub manual_mode: bool,
    pub enumerate: EnumerateOptions,
    pub use_color: bool,
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            directory: config.defaults.directory.clone(),
            name_format: config.defaults.name_format.clone(),
            manual_mode: config.defaults.manual_mode,
            enumerate: EnumerateOptions {
                recent_file_count: config.defaults.recent_file_count,
                ..EnumerateOptions::default()
            },
            use_color: false,
        }
    }
}

struct Status<'a, W: Write + ?Sized> {
    out: &'a mut W,
    use_color: bool,
}

impl<W: Write + ?Sized> Status<'_, W> {
    fn line(&mut self, color: Option<Color>, text: &str) -> std::io::Result<()> {
        match color {
            Some(color) if self.use_color => writeln!(self.out, "{}", color.paint(text)),
            _ => writeln!(self.out, "{text}"),
        }
    }
}

/// Tidy every candidate file in `options.directory`, one at a time.
///
/// Per-file failures are reported and recorded; they never stop the run.
/// Only a failure to talk to the operator (writing progress or reading a
/// selection) is returned as an error.
pub fn run_operation<S, L, W>(
    options: &RunOptions,
    service: &S,
    input: &mut L,
    out: &mut W,
    interrupt: &Interrupt,
) -> Result<RunResult>
where
    S: NamingService + ?Sized,
    L: LineSource + ?Sized,
    W: Write + ?Sized,
{
    let mut result = RunResult {
        directory: options.directory.display().to_string(),
        ..RunResult::default()
    };

    let files = enumerate_candidates(&options.directory, &options.enumerate);
    if files.is_empty() {
        writeln!(out, "No files to tidy").context("Failed to write output")?;
        return Ok(result);
    }

    tracing::info!(count = files.len(), dir = %result.directory, "starting run");

    for file in files {
        if interrupt.is_requested() {
            tracing::info!("stop requested, leaving remaining files untouched");
            result.interrupted = true;
            break;
        }

        let outcome = tidy_file(options, service, &file, input, out, interrupt)?;
        result.files.push(FileReport {
            name: file.name,
            outcome,
        });
    }

    Ok(result)
}

fn tidy_file<S, L, W>(
    options: &RunOptions,
    service: &S,
    file: &CandidateFile,
    input: &mut L,
    out: &mut W,
    interrupt: &Interrupt,
) -> Result<FileOutcome>
where
    S: NamingService + ?Sized,
    L: LineSource + ?Sized,
    W: Write + ?Sized,
{
    let mut status = Status {
        out,
        use_color: options.use_color,
    };

    status.line(None, &"-".repeat(SEPARATOR_WIDTH))?;
    status.line(Some(Color::Cyan), &format!("Original name: {}", file.name))?;

    let query = NameQuery::new(file.name.clone(), options.name_format.clone());
    let candidates = match service.resolve(&query) {
        Ok(result) => result.candidates,
        Err(err) => {
            tracing::warn!(file = %file.name, error = %err, "lookup failed");
            status.line(Some(Color::Red), &format!(" Lookup failed: {err}"))?;
            return Ok(FileOutcome::ResolveFailed {
                error: err.to_string(),
            });
        },
    };

    let decision = {
        let _guard = PromptGuard::activate(interrupt);
        decide(&candidates, options.manual_mode, input, &mut *status.out)
            .context("Failed to read selection")?
    };

    let new_name = match decision {
        Decision::Chosen(name) => name,
        Decision::Cancelled => {
            status.line(Some(Color::Yellow), "Cancelled, leaving file as is")?;
            return Ok(FileOutcome::Cancelled);
        },
    };

    let outcome = match rename_file(
        &options.directory,
        RenameDecision::new(file.name.clone(), new_name.clone()),
    ) {
        RenameOutcome::Renamed => {
            status.line(Some(Color::Green), &format!("Renamed to: {new_name}"))?;
            FileOutcome::Renamed { new_name }
        },
        RenameOutcome::SkippedIdentical => {
            status.line(Some(Color::Yellow), "New name is identical, skipping")?;
            FileOutcome::SkippedIdentical
        },
        RenameOutcome::SkippedCollision => {
            status.line(
                Some(Color::Yellow),
                &format!("File already exists: {new_name}, skipping"),
            )?;
            FileOutcome::SkippedCollision { new_name }
        },
        RenameOutcome::Failed(error) => {
            status.line(Some(Color::Red), &format!("Rename failed: {error}"))?;
            FileOutcome::RenameFailed { new_name, error }
        },
    };

    Ok(outcome)
}
