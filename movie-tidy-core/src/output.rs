use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

/// What happened to one file during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    Renamed { new_name: String },
    SkippedIdentical,
    SkippedCollision { new_name: String },
    Cancelled,
    ResolveFailed { error: String },
    RenameFailed { new_name: String, error: String },
}

impl FileOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::ResolveFailed { .. } | Self::RenameFailed { .. })
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Self::SkippedIdentical | Self::SkippedCollision { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Result of a `run` operation
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunResult {
    pub directory: String,
    pub files: Vec<FileReport>,
    /// The run stopped early on operator request
    pub interrupted: bool,
}

impl RunResult {
    pub fn renamed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Renamed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(FileOutcome::is_skip)
    }

    pub fn cancelled(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Cancelled))
    }

    pub fn failed(&self) -> usize {
        self.count(FileOutcome::is_failure)
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// Result of a version command
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResult {
    pub name: String,
    pub version: String,
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }
    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

impl OutputFormatter for RunResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "run",
            "directory": self.directory,
            "interrupted": self.interrupted,
            "summary": {
                "files": self.files.len(),
                "renamed": self.renamed(),
                "skipped": self.skipped(),
                "cancelled": self.cancelled(),
                "failed": self.failed(),
            },
            "files": self.files,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        if self.files.is_empty() && !self.interrupted {
            return format!("No files to tidy in {}", self.directory);
        }

        let mut output = format!(
            "Processed {} file(s) in {}\n",
            self.files.len(),
            self.directory
        );

        writeln!(output, "✓ Renamed {}", self.renamed()).unwrap();
        if self.skipped() > 0 {
            writeln!(output, "- Skipped {}", self.skipped()).unwrap();
        }
        if self.cancelled() > 0 {
            writeln!(output, "- Cancelled {}", self.cancelled()).unwrap();
        }
        if self.failed() > 0 {
            writeln!(output, "✗ Failed {}", self.failed()).unwrap();
        }
        if self.interrupted {
            output.push_str("Interrupted before all files were processed\n");
        }

        output.trim_end().to_string()
    }
}

impl OutputFormatter for VersionResult {
    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}
