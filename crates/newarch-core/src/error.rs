//! Precondition failures that stop a run before anything is written

use std::path::PathBuf;
use thiserror::Error;

/// Failures detected up front, before the project is mutated.
///
/// Everything else (network, filesystem, parse errors) travels as a plain
/// `anyhow::Error` with context attached.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Your git working tree is dirty ({} pending change(s)). Please commit or stash your changes and re-run.", .0.len())]
    DirtyWorkingTree(Vec<String>),

    #[error("Couldn't find package.json in {}. Are you sure you are in the right directory?", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("{label} folder already exists. Please check {}", .path.display())]
    DestinationCollision { label: &'static str, path: PathBuf },

    #[error("Invalid {field}: {reason}")]
    InvalidIdentity { field: &'static str, reason: String },
}

impl ScaffoldError {
    pub fn invalid_identity(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidIdentity {
            field,
            reason: reason.into(),
        }
    }
}
