//! Working tree inspection through the git CLI

use crate::error::ScaffoldError;
use anyhow::Result;
use std::path::Path;
use std::process::Command;

/// State of the version-controlled working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkingTreeStatus {
    Clean,
    /// Porcelain lines for every pending change (tracked or untracked)
    Dirty(Vec<String>),
    /// git is not installed or the directory is not inside a repository
    NotARepository,
}

/// Check if git is available in PATH
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Run `git status --porcelain` in `dir` and classify the result
pub fn working_tree_status(dir: &Path) -> WorkingTreeStatus {
    let output = Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(dir)
        .output();

    match output {
        Ok(out) if out.status.success() => parse_porcelain(&String::from_utf8_lossy(&out.stdout)),
        _ => WorkingTreeStatus::NotARepository,
    }
}

fn parse_porcelain(stdout: &str) -> WorkingTreeStatus {
    let changes: Vec<String> = stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    if changes.is_empty() {
        WorkingTreeStatus::Clean
    } else {
        WorkingTreeStatus::Dirty(changes)
    }
}

/// Refuse to continue when the working tree has pending changes.
///
/// Returns the observed status so callers can warn about `NotARepository`.
pub fn ensure_clean_tree(dir: &Path) -> Result<WorkingTreeStatus> {
    match working_tree_status(dir) {
        WorkingTreeStatus::Dirty(changes) => Err(ScaffoldError::DirtyWorkingTree(changes).into()),
        status => Ok(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .expect("git should run");
        assert!(status.status.success(), "git {:?} failed", args);
    }

    fn init_repo(dir: &Path) {
        git(dir, &["init", "-q"]);
        git(dir, &["config", "user.email", "test@example.com"]);
        git(dir, &["config", "user.name", "Test"]);
    }

    #[test]
    fn test_parse_porcelain_empty_is_clean() {
        assert_eq!(parse_porcelain(""), WorkingTreeStatus::Clean);
        assert_eq!(parse_porcelain("\n"), WorkingTreeStatus::Clean);
    }

    #[test]
    fn test_parse_porcelain_collects_changes() {
        let status = parse_porcelain(" M package.json\n?? android/new.txt\n");
        assert_eq!(
            status,
            WorkingTreeStatus::Dirty(vec![
                " M package.json".to_string(),
                "?? android/new.txt".to_string()
            ])
        );
    }

    #[test]
    fn test_untracked_file_makes_tree_dirty() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        let err = ensure_clean_tree(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScaffoldError>(),
            Some(ScaffoldError::DirtyWorkingTree(_))
        ));
    }

    #[test]
    fn test_committed_tree_is_clean() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        git(dir.path(), &["add", "."]);
        git(dir.path(), &["commit", "-q", "-m", "init"]);

        assert_eq!(
            ensure_clean_tree(dir.path()).unwrap(),
            WorkingTreeStatus::Clean
        );
    }

    #[test]
    fn test_missing_directory_is_not_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert_eq!(
            working_tree_status(&missing),
            WorkingTreeStatus::NotARepository
        );
    }
}
