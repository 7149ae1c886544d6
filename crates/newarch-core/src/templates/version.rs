//! React Native version checks against the template's target release

use anyhow::Result;
use semver::Version;

/// Compare the project's react-native version with the minimum the template needs.
/// Returns a warning message if the project is older.
pub fn check_compatibility(
    project_version: &str,
    minimum_version: &str,
    target_version: &str,
) -> Option<String> {
    let project_ver = match parse_version(project_version) {
        Ok(v) => v,
        Err(_) => return None, // Can't compare, skip warning
    };

    let minimum_ver = match parse_version(minimum_version) {
        Ok(v) => v,
        Err(_) => return None,
    };

    if project_ver < minimum_ver {
        Some(format!(
            "This project uses react-native {} but the new architecture files need {} or newer.\n\
             Upgrade towards {} before building.",
            project_ver, minimum_ver, target_version
        ))
    } else {
        None
    }
}

/// Parse a package.json version range into a concrete version.
///
/// Range operators (`^`, `~`, `>=`, `=`, `v`) are stripped; anything more
/// elaborate (`*`, `||`, git URLs) is rejected.
pub fn parse_version(version_str: &str) -> Result<Version> {
    let cleaned = version_str
        .trim()
        .trim_start_matches(|c: char| matches!(c, '^' | '~' | '>' | '=' | 'v'))
        .trim();
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

/// Version string suitable for the upgrade helper's `from` parameter
pub fn normalized_version(version_str: &str) -> Option<String> {
    parse_version(version_str).ok().map(|v| v.to_string())
}
