//! Recursive directory copy used for local template directories

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Copy `source` into `target`, returning copied files relative to `target`.
///
/// Depth-first; within each directory files are copied before descending into
/// subdirectories, both in name order. Target directories are created only
/// when a file is about to be written into them.
pub fn copy_tree(source: &Path, target: &Path) -> Result<Vec<PathBuf>> {
    if !source.is_dir() {
        anyhow::bail!("Template directory not found: {}", source.display());
    }

    let mut copied = Vec::new();
    copy_dir(source, target, Path::new(""), &mut copied)?;
    Ok(copied)
}

fn copy_dir(source: &Path, target: &Path, relative: &Path, copied: &mut Vec<PathBuf>) -> Result<()> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for entry in fs::read_dir(source)
        .with_context(|| format!("Failed to read directory: {}", source.display()))?
    {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            dirs.push(entry.file_name());
        } else if file_type.is_file() {
            files.push(entry.file_name());
        }
    }
    files.sort();
    dirs.sort();

    for name in files {
        if !target.exists() {
            fs::create_dir_all(target)
                .with_context(|| format!("Failed to create directory: {}", target.display()))?;
        }
        let from = source.join(&name);
        let to = target.join(&name);
        fs::copy(&from, &to)
            .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
        copied.push(relative.join(&name));
    }

    for name in dirs {
        copy_dir(
            &source.join(&name),
            &target.join(&name),
            &relative.join(&name),
            copied,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_before_subdirectories() {
        let src = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("a_dir/nested")).unwrap();
        fs::write(src.path().join("z_file.txt"), "z").unwrap();
        fs::write(src.path().join("a_dir/inner.txt"), "inner").unwrap();
        fs::write(src.path().join("a_dir/nested/deep.txt"), "deep").unwrap();
        fs::write(src.path().join("b_file.txt"), "b").unwrap();

        let dst = tempfile::tempdir().unwrap();
        let target = dst.path().join("out");
        let copied = copy_tree(src.path(), &target).unwrap();

        assert_eq!(
            copied,
            vec![
                PathBuf::from("b_file.txt"),
                PathBuf::from("z_file.txt"),
                Path::new("a_dir").join("inner.txt"),
                Path::new("a_dir").join("nested").join("deep.txt"),
            ]
        );
        assert_eq!(
            fs::read_to_string(target.join("a_dir/nested/deep.txt")).unwrap(),
            "deep"
        );
    }

    #[test]
    fn test_empty_directories_are_not_created() {
        let src = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("empty")).unwrap();
        fs::write(src.path().join("file.txt"), "x").unwrap();

        let dst = tempfile::tempdir().unwrap();
        let target = dst.path().join("out");
        copy_tree(src.path(), &target).unwrap();

        assert!(target.join("file.txt").exists());
        assert!(!target.join("empty").exists());
    }

    #[test]
    fn test_missing_source_fails() {
        let dst = tempfile::tempdir().unwrap();
        assert!(copy_tree(&dst.path().join("missing"), &dst.path().join("out")).is_err());
    }
}
