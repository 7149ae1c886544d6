//! Selective extraction of the two template subtrees into the Android project
//!
//! The archive (or local template directory) is laid out as
//! `<wrapper>/files/jni/...` and `<wrapper>/files/newarchitecture/...`.
//! Each subtree is written directly into its destination with the wrapper
//! and subtree prefix stripped.

use super::copier::copy_tree;
use super::fetcher::FetchedTemplate;
use crate::error::ScaffoldError;
use crate::project::ProjectIdentity;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use zip::ZipArchive;

/// Subtree holding the C++ (JNI) glue
pub const NATIVE_GLUE_SUBTREE: &str = "files/jni";

/// Subtree holding the Java new architecture glue
pub const NEW_ARCH_GLUE_SUBTREE: &str = "files/newarchitecture";

/// One subtree and where it goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Human readable name used in messages
    pub label: &'static str,
    /// Path of the subtree inside the archive, below the wrapper directory
    pub subtree: &'static str,
    pub path: PathBuf,
}

/// Both extraction destinations for a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionTargets {
    pub native_glue: PathBuf,
    pub new_arch_glue: PathBuf,
}

impl ExtractionTargets {
    /// `<project>/android/app/src/main/jni` and
    /// `<project>/android/app/src/main/java/<package path>/newarchitecture`
    pub fn for_project(project_dir: &Path, identity: &ProjectIdentity) -> Self {
        let main = main_source_root(project_dir);
        Self {
            native_glue: main.join("jni"),
            new_arch_glue: main
                .join("java")
                .join(identity.package_identifier.to_path())
                .join("newarchitecture"),
        }
    }

    pub fn destinations(&self) -> [Destination; 2] {
        [
            Destination {
                label: "JNI",
                subtree: NATIVE_GLUE_SUBTREE,
                path: self.native_glue.clone(),
            },
            Destination {
                label: "New architecture",
                subtree: NEW_ARCH_GLUE_SUBTREE,
                path: self.new_arch_glue.clone(),
            },
        ]
    }

    /// Fail if either destination already holds something
    pub fn ensure_vacant(&self) -> Result<()> {
        for dest in self.destinations() {
            if is_occupied(&dest.path)? {
                return Err(ScaffoldError::DestinationCollision {
                    label: dest.label,
                    path: dest.path,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// `<project>/android/app/src`, the tree the placeholder rewrite covers
pub fn android_source_root(project_dir: &Path) -> PathBuf {
    project_dir.join("android").join("app").join("src")
}

fn main_source_root(project_dir: &Path) -> PathBuf {
    android_source_root(project_dir).join("main")
}

fn is_occupied(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    if !path.is_dir() {
        return Ok(true);
    }
    let mut entries = fs::read_dir(path)
        .with_context(|| format!("Failed to read directory: {}", path.display()))?;
    Ok(entries.next().is_some())
}

/// Files written into each destination, relative to it
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub native_glue: Vec<PathBuf>,
    pub new_arch_glue: Vec<PathBuf>,
}

impl ExtractionReport {
    pub fn total(&self) -> usize {
        self.native_glue.len() + self.new_arch_glue.len()
    }
}

/// Extract both subtrees concurrently and wait for both to finish
pub async fn extract_template(
    template: &FetchedTemplate,
    targets: &ExtractionTargets,
) -> Result<ExtractionReport> {
    targets.ensure_vacant()?;

    let [native, new_arch] = targets.destinations();
    let native_task = spawn_extraction(template.clone(), native);
    let new_arch_task = spawn_extraction(template.clone(), new_arch);

    let (native_glue, new_arch_glue) = tokio::try_join!(native_task, new_arch_task)?;

    Ok(ExtractionReport {
        native_glue,
        new_arch_glue,
    })
}

async fn spawn_extraction(template: FetchedTemplate, dest: Destination) -> Result<Vec<PathBuf>> {
    let label = dest.label;
    tokio::task::spawn_blocking(move || extract_destination(&template, &dest))
        .await
        .with_context(|| format!("{} extraction task failed", label))?
}

/// Extract a single subtree from whatever the fetcher produced
pub fn extract_destination(template: &FetchedTemplate, dest: &Destination) -> Result<Vec<PathBuf>> {
    let written = match template {
        FetchedTemplate::Archive(bytes) => extract_archive(bytes, dest)?,
        FetchedTemplate::Directory(root) => {
            let source = root.join(dest.subtree);
            if !source.is_dir() {
                anyhow::bail!(
                    "Template directory {} does not contain {}",
                    root.display(),
                    dest.subtree
                );
            }
            copy_tree(&source, &dest.path)?
        }
    };

    if written.is_empty() {
        anyhow::bail!("Template contains no files under {}", dest.subtree);
    }
    Ok(written)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveFormat {
    TarGz,
    Zip,
}

fn detect_format(bytes: &[u8]) -> Result<ArchiveFormat> {
    match bytes {
        [0x1f, 0x8b, ..] => Ok(ArchiveFormat::TarGz),
        [b'P', b'K', ..] => Ok(ArchiveFormat::Zip),
        _ => anyhow::bail!("Unrecognized template archive format (expected tar.gz or zip)"),
    }
}

fn extract_archive(bytes: &Arc<Vec<u8>>, dest: &Destination) -> Result<Vec<PathBuf>> {
    match detect_format(bytes)? {
        ArchiveFormat::TarGz => extract_tar_gz(bytes, dest),
        ArchiveFormat::Zip => extract_zip(bytes, dest),
    }
}

fn extract_tar_gz(bytes: &[u8], dest: &Destination) -> Result<Vec<PathBuf>> {
    let mut archive = tar::Archive::new(GzDecoder::new(Cursor::new(bytes)));
    let mut written = Vec::new();

    for entry in archive
        .entries()
        .context("Failed to read template archive")?
    {
        let mut entry = entry.context("Failed to read template archive entry")?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let entry_path = entry.path()?.into_owned();
        let Some(relative) = strip_subtree(&entry_path, dest.subtree)? else {
            continue;
        };

        let target = prepare_target(&dest.path, &relative)?;
        entry
            .unpack(&target)
            .with_context(|| format!("Failed to write file: {}", target.display()))?;
        written.push(relative);
    }

    Ok(written)
}

fn extract_zip(bytes: &[u8], dest: &Destination) -> Result<Vec<PathBuf>> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).context("Failed to read template zip archive")?;
    let mut written = Vec::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let entry_path = PathBuf::from(file.name());
        let Some(relative) = strip_subtree(&entry_path, dest.subtree)? else {
            continue;
        };

        let target = prepare_target(&dest.path, &relative)?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        fs::write(&target, &contents)
            .with_context(|| format!("Failed to write file: {}", target.display()))?;
        written.push(relative);
    }

    Ok(written)
}

fn prepare_target(dest_root: &Path, relative: &Path) -> Result<PathBuf> {
    let target = dest_root.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(target)
}

/// Map `<wrapper>/<subtree>/rest` to `rest`.
///
/// Returns `None` for entries outside the subtree (or the subtree root itself)
/// and an error for entries that would escape the destination.
fn strip_subtree(entry_path: &Path, subtree: &str) -> Result<Option<PathBuf>> {
    let mut components = entry_path.components().skip_while(|c| matches!(c, Component::CurDir));
    if components.next().is_none() {
        return Ok(None);
    }

    for expected in subtree.split('/') {
        match components.next() {
            Some(Component::Normal(name)) if name == expected => {}
            _ => return Ok(None),
        }
    }

    let mut relative = PathBuf::new();
    for component in components {
        match component {
            Component::Normal(name) => relative.push(name),
            Component::CurDir => {}
            _ => anyhow::bail!(
                "Archive entry escapes its destination: {}",
                entry_path.display()
            ),
        }
    }

    Ok((!relative.as_os_str().is_empty()).then_some(relative))
}
