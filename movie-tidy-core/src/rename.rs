use std::fs;
use std::path::{Component, Path};

/// A chosen rename for one file, consumed by [`rename_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameDecision {
    pub old_name: String,
    pub new_name: String,
}

impl RenameDecision {
    pub fn new(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    /// Old and new names are the same; nothing touched.
    SkippedIdentical,
    /// Destination already exists; nothing touched.
    SkippedCollision,
    Failed(String),
}

/// The new name must stay a plain entry of the same directory.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

fn destination_taken(path: &Path) -> bool {
    match fs::symlink_metadata(path) {
        Ok(_) => true,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
        // Unknown state: never risk an overwrite
        Err(_) => true,
    }
}

/// Rename `directory/old_name` to `directory/new_name` without ever
/// replacing an existing entry.
pub fn rename_file(directory: &Path, decision: RenameDecision) -> RenameOutcome {
    let RenameDecision { old_name, new_name } = decision;

    if old_name == new_name {
        return RenameOutcome::SkippedIdentical;
    }

    if !is_plain_file_name(&new_name) {
        return RenameOutcome::Failed(format!("invalid target name: {new_name:?}"));
    }

    let from = directory.join(&old_name);
    let to = directory.join(&new_name);

    if destination_taken(&to) {
        tracing::debug!(target = %to.display(), "destination exists, not renaming");
        return RenameOutcome::SkippedCollision;
    }

    match fs::rename(&from, &to) {
        Ok(()) => {
            tracing::info!(from = %from.display(), to = %to.display(), "renamed");
            RenameOutcome::Renamed
        },
        Err(err) => {
            tracing::warn!(from = %from.display(), error = %err, "rename failed");
            RenameOutcome::Failed(err.to_string())
        },
    }
}
