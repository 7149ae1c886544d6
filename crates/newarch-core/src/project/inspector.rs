//! Derive identity defaults from the project's manifests and native sources

use super::identity::PackageIdentifier;
use super::manifest::ProjectManifest;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// App name used when no manifest declares one
pub const FALLBACK_APP_NAME: &str = "HelloWorld";

const MAIN_ACTIVITY_FILES: &[&str] = &["MainActivity.java", "MainActivity.kt"];

/// Package and component name declared by an existing MainActivity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredNames {
    pub source: PathBuf,
    pub package: Option<String>,
    pub component: Option<String>,
}

/// Defaults offered to the user before extraction
#[derive(Debug, Clone)]
pub struct ProjectDefaults {
    pub app_name: String,
    pub package_identifier: PackageIdentifier,
    pub react_native_version: Option<String>,
    /// Set when a MainActivity supplied any of the defaults
    pub declared: Option<DeclaredNames>,
}

/// Read manifests and native sources under `project_dir`
pub fn inspect_project(project_dir: &Path) -> Result<ProjectDefaults> {
    let manifest = ProjectManifest::load(project_dir)?;
    let declared = find_declared_names(&project_dir.join("android"))?;
    Ok(derive_defaults(&manifest, declared))
}

/// Combine manifest values with names declared in native code.
///
/// Declared names win over anything derived from the manifests.
pub fn derive_defaults(
    manifest: &ProjectManifest,
    declared: Option<DeclaredNames>,
) -> ProjectDefaults {
    let manifest_name = manifest
        .app
        .as_ref()
        .and_then(|app| app.app_name())
        .and_then(component_name)
        .or_else(|| manifest.package.name.as_deref().and_then(component_name))
        .unwrap_or_else(|| FALLBACK_APP_NAME.to_string());

    let declared_component = declared
        .as_ref()
        .and_then(|d| d.component.as_deref())
        .and_then(component_name);
    let declared_package = declared
        .as_ref()
        .and_then(|d| d.package.as_deref())
        .and_then(|p| PackageIdentifier::parse(p).ok());

    let app_name = declared_component.unwrap_or(manifest_name);
    let package_identifier =
        declared_package.unwrap_or_else(|| PackageIdentifier::from_app_name(&app_name));

    ProjectDefaults {
        app_name,
        package_identifier,
        react_native_version: manifest.package.react_native_version().map(str::to_string),
        declared,
    }
}

/// Turn a manifest name into a usable main component name.
///
/// Scoped npm names keep their last segment (`@acme/mobile` -> `mobile`);
/// whitespace, quotes and path separators are dropped.
pub fn component_name(raw: &str) -> Option<String> {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let name: String = last
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '"' | '\'' | '@'))
        .collect();
    (!name.is_empty()).then_some(name)
}

/// Locate the first MainActivity under `android_dir` and read its names.
///
/// Returns `Ok(None)` when the directory or the file does not exist.
pub fn find_declared_names(android_dir: &Path) -> Result<Option<DeclaredNames>> {
    if !android_dir.is_dir() {
        return Ok(None);
    }

    let main_activity = WalkDir::new(android_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .find(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|name| MAIN_ACTIVITY_FILES.contains(&name))
        });

    let Some(entry) = main_activity else {
        return Ok(None);
    };

    let content = std::fs::read_to_string(entry.path())
        .with_context(|| format!("Failed to read {}", entry.path().display()))?;
    let (package, component) = parse_main_activity(&content)?;

    Ok(Some(DeclaredNames {
        source: entry.path().to_path_buf(),
        package,
        component,
    }))
}

/// Extract `package x.y.z` and the `return "Name"` component literal
fn parse_main_activity(content: &str) -> Result<(Option<String>, Option<String>)> {
    let package_re = Regex::new(r"(?m)^\s*package\s+([A-Za-z_][A-Za-z0-9_.]*)\s*;?\s*$")
        .context("Invalid package regex")?;
    let component_re =
        Regex::new(r#"return\s+"([^"]+)""#).context("Invalid component name regex")?;

    let package = package_re
        .captures(content)
        .map(|c| c[1].to_string());
    let component = component_re
        .captures(content)
        .map(|c| c[1].to_string());

    Ok((package, component))
}
