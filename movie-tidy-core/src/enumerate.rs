use crate::config::LOCAL_CONFIG_FILE;
use chrono::{DateTime, Utc};
use std::path::Path;
use walkdir::WalkDir;

/// Names the tool never tries to rename, even when they live in the
/// directory being tidied: its executables and its local config file.
pub const SELF_NAMES: &[&str] = &["movie-tidy", "movie-tidy.exe", LOCAL_CONFIG_FILE];

/// A file eligible for renaming, as seen when the directory was listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EnumerateOptions {
    /// When set, only the entry with exactly this name is returned
    pub name_filter: Option<String>,
    /// Keep only the N most recently modified files (0 = keep all)
    pub recent_file_count: usize,
    pub excluded_names: Vec<String>,
}

impl Default for EnumerateOptions {
    fn default() -> Self {
        let mut excluded_names: Vec<String> =
            SELF_NAMES.iter().map(|s| (*s).to_string()).collect();
        if let Some(own) = current_exe_name() {
            if !excluded_names.contains(&own) {
                excluded_names.push(own);
            }
        }
        Self {
            name_filter: None,
            recent_file_count: 0,
            excluded_names,
        }
    }
}

fn current_exe_name() -> Option<String> {
    let exe = std::env::current_exe().ok()?;
    exe.file_name()?.to_str().map(ToString::to_string)
}

/// List the rename candidates directly inside `directory`.
///
/// Directories and the tool's own executable are skipped. An unreadable
/// directory yields an empty list; there is nothing to do in that case.
pub fn enumerate_candidates(directory: &Path, options: &EnumerateOptions) -> Vec<CandidateFile> {
    let name_filter = options.name_filter.as_deref().filter(|f| !f.is_empty());
    let mut candidates = Vec::new();

    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                tracing::warn!(dir = %directory.display(), error = %err, "cannot read directory");
                return Vec::new();
            },
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                continue;
            },
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            tracing::debug!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };

        if name_filter.is_some_and(|filter| filter != name) {
            continue;
        }

        if options.excluded_names.iter().any(|excluded| excluded == name) {
            continue;
        }

        let modified_at = match entry.metadata().map(|m| m.modified()) {
            Ok(Ok(time)) => DateTime::<Utc>::from(time),
            Ok(Err(err)) => {
                tracing::debug!(file = name, error = %err, "no modification time");
                continue;
            },
            Err(err) => {
                tracing::debug!(file = name, error = %err, "cannot stat entry");
                continue;
            },
        };

        candidates.push(CandidateFile {
            name: name.to_string(),
            modified_at,
        });
    }

    if options.recent_file_count > 0 {
        candidates.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        candidates.truncate(options.recent_file_count);
    }

    tracing::debug!(
        dir = %directory.display(),
        count = candidates.len(),
        "enumerated candidate files"
    );
    candidates
}
