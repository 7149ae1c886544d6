//! package.json / app.json parsing

use crate::error::ScaffoldError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const PACKAGE_MANIFEST: &str = "package.json";
pub const APP_MANIFEST: &str = "app.json";

/// The fields of package.json this tool cares about
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageManifest {
    /// Declared react-native version range, regular dependencies first
    pub fn react_native_version(&self) -> Option<&str> {
        self.dependencies
            .get("react-native")
            .or_else(|| self.dev_dependencies.get("react-native"))
            .map(String::as_str)
    }
}

/// app.json, either the bare React Native shape or the Expo one
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub expo: Option<ExpoSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpoSection {
    #[serde(default)]
    pub name: Option<String>,
}

impl AppManifest {
    pub fn app_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.expo.as_ref().and_then(|e| e.name.as_deref()))
            .filter(|n| !n.trim().is_empty())
    }
}

/// Both manifests of a project
#[derive(Debug, Clone, Default)]
pub struct ProjectManifest {
    pub package: PackageManifest,
    pub app: Option<AppManifest>,
}

impl ProjectManifest {
    /// Load manifests from a project directory.
    ///
    /// package.json is mandatory; app.json is optional but must parse if present.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let package_path = project_dir.join(PACKAGE_MANIFEST);
        if !package_path.is_file() {
            return Err(ScaffoldError::ManifestNotFound(project_dir.to_path_buf()).into());
        }

        let content = std::fs::read_to_string(&package_path)
            .with_context(|| format!("Failed to read {}", package_path.display()))?;
        let package: PackageManifest = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", package_path.display()))?;

        let app_path = project_dir.join(APP_MANIFEST);
        let app = if app_path.is_file() {
            let content = std::fs::read_to_string(&app_path)
                .with_context(|| format!("Failed to read {}", app_path.display()))?;
            Some(
                serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse {}", app_path.display()))?,
            )
        } else {
            None
        };

        Ok(Self { package, app })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_package_json_is_precondition_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectManifest::load(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScaffoldError>(),
            Some(ScaffoldError::ManifestNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_package_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{ not json").unwrap();
        let err = ProjectManifest::load(dir.path()).unwrap_err();
        assert!(err.downcast_ref::<ScaffoldError>().is_none());
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_loads_react_native_version() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name":"MyApp","dependencies":{"react":"17.0.2","react-native":"0.67.3"}}"#,
        )
        .unwrap();

        let manifest = ProjectManifest::load(dir.path()).unwrap();
        assert_eq!(manifest.package.name.as_deref(), Some("MyApp"));
        assert_eq!(manifest.package.react_native_version(), Some("0.67.3"));
        assert!(manifest.app.is_none());
    }

    #[test]
    fn test_app_json_expo_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name":"pkg"}"#).unwrap();
        fs::write(dir.path().join("app.json"), r#"{"expo":{"name":"Expo App"}}"#).unwrap();

        let manifest = ProjectManifest::load(dir.path()).unwrap();
        assert_eq!(manifest.app.unwrap().app_name(), Some("Expo App"));
    }
}
