//! Project identity (app name + package identifier) and its resolution

use crate::error::ScaffoldError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Which half of the identity a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityField {
    PackageIdentifier,
    AppName,
}

impl IdentityField {
    pub fn display_name(&self) -> &'static str {
        match self {
            IdentityField::PackageIdentifier => "package name",
            IdentityField::AppName => "main component name",
        }
    }

    /// Prompt text shown to the user
    pub fn prompt_label(&self) -> &'static str {
        match self {
            IdentityField::PackageIdentifier => "Package Name?",
            IdentityField::AppName => "Main Component Name?",
        }
    }

    /// Validate a candidate value for this field, returning it normalized
    pub fn validate(&self, value: &str) -> Result<String, ScaffoldError> {
        match self {
            IdentityField::PackageIdentifier => PackageIdentifier::parse(value).map(|p| p.0),
            IdentityField::AppName => validate_app_name(value),
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Reverse-domain package identifier, e.g. `com.acme.app`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageIdentifier(String);

impl PackageIdentifier {
    /// Parse a dot-separated identifier.
    ///
    /// Every segment must be non-empty, made of ASCII alphanumerics or `_`,
    /// and must not start with a digit.
    pub fn parse(value: &str) -> Result<Self, ScaffoldError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ScaffoldError::invalid_identity(
                "package name",
                "value is empty",
            ));
        }

        for segment in value.split('.') {
            if segment.is_empty() {
                return Err(ScaffoldError::invalid_identity(
                    "package name",
                    format!("'{}' contains an empty segment", value),
                ));
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(ScaffoldError::invalid_identity(
                    "package name",
                    format!("segment '{}' may only contain letters, digits and '_'", segment),
                ));
            }
            if segment.starts_with(|c: char| c.is_ascii_digit()) {
                return Err(ScaffoldError::invalid_identity(
                    "package name",
                    format!("segment '{}' must not start with a digit", segment),
                ));
            }
        }

        Ok(Self(value.to_string()))
    }

    /// Derive `com.<lowercased app name>` from an app name
    pub fn from_app_name(app_name: &str) -> Self {
        let lowered: String = app_name
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        let segment = lowered.trim_start_matches(|c: char| c.is_ascii_digit());
        let segment = if segment.is_empty() { "app" } else { segment };
        Self(format!("com.{}", segment))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative directory path for this package (`com/acme/app`)
    pub fn to_path(&self) -> PathBuf {
        self.0.split('.').collect()
    }
}

impl fmt::Display for PackageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_app_name(value: &str) -> Result<String, ScaffoldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ScaffoldError::invalid_identity(
            "main component name",
            "value is empty",
        ));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '"' | '\''))
    {
        return Err(ScaffoldError::invalid_identity(
            "main component name",
            format!("'{}' contains the invalid character {:?}", value, bad),
        ));
    }
    Ok(value.to_string())
}

/// The identity every later stage works with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    pub app_name: String,
    pub package_identifier: PackageIdentifier,
}

impl ProjectIdentity {
    pub fn new(app_name: &str, package_identifier: &str) -> Result<Self, ScaffoldError> {
        Ok(Self {
            app_name: validate_app_name(app_name)?,
            package_identifier: PackageIdentifier::parse(package_identifier)?,
        })
    }

    pub fn value(&self, field: IdentityField) -> &str {
        match field {
            IdentityField::PackageIdentifier => self.package_identifier.as_str(),
            IdentityField::AppName => &self.app_name,
        }
    }
}

/// Blocking question/answer channel used to confirm defaults.
///
/// An empty answer means "keep the default".
pub trait IdentityPrompt {
    fn ask(&mut self, field: IdentityField, default: &str) -> Result<String>;
}

/// Values fixed before any prompt is shown
#[derive(Debug, Clone, Default)]
pub struct IdentityOverrides {
    pub package_identifier: Option<String>,
    pub app_name: Option<String>,
    /// Accept defaults without prompting
    pub accept_defaults: bool,
}

/// Confirm or override each default, package identifier first
pub fn resolve_identity<P: IdentityPrompt + ?Sized>(
    default_app_name: &str,
    default_package: &PackageIdentifier,
    overrides: &IdentityOverrides,
    prompt: &mut P,
) -> Result<ProjectIdentity> {
    let package = resolve_field(
        IdentityField::PackageIdentifier,
        default_package.as_str(),
        overrides.package_identifier.as_deref(),
        overrides.accept_defaults,
        prompt,
    )?;
    let app_name = resolve_field(
        IdentityField::AppName,
        default_app_name,
        overrides.app_name.as_deref(),
        overrides.accept_defaults,
        prompt,
    )?;

    Ok(ProjectIdentity::new(&app_name, &package)?)
}

fn resolve_field<P: IdentityPrompt + ?Sized>(
    field: IdentityField,
    default: &str,
    fixed: Option<&str>,
    accept_defaults: bool,
    prompt: &mut P,
) -> Result<String> {
    if let Some(value) = fixed {
        return Ok(value.to_string());
    }
    if accept_defaults {
        return Ok(default.to_string());
    }

    let answer = prompt.ask(field, default)?;
    let answer = answer.trim();
    if answer.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(answer.to_string())
    }
}
