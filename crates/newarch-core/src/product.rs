//! Product configuration trait for the CLI binary
//!
//! The binary implements this trait to tell the library where the template
//! archive lives and what to say once the files are in place.

/// Configuration trait for the scaffolding product
///
/// Defines:
/// - Product identity (name, display name)
/// - Template archive URL and its environment override
/// - The React Native release the template targets
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, user agent)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default URL of the template archive
    fn default_archive_url(&self) -> &'static str;

    /// Environment variable name for overriding the archive URL
    fn archive_url_env(&self) -> &'static str;

    /// React Native version the template files were taken from
    fn target_react_native_version(&self) -> &'static str;

    /// Oldest React Native version the new architecture files work with
    fn minimum_react_native_version(&self) -> &'static str;

    /// Generate the "next steps" instructions after the files are created
    fn next_steps(&self, react_native_version: Option<&str>) -> Vec<String>;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}

/// Build the upgrade helper link for the remaining manual diff
pub fn upgrade_helper_url(from: Option<&str>, to: &str) -> String {
    match from {
        Some(from) => format!(
            "https://react-native-community.github.io/upgrade-helper/?from={}&to={}",
            from, to
        ),
        None => format!(
            "https://react-native-community.github.io/upgrade-helper/?to={}",
            to
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_helper_url_with_version() {
        assert_eq!(
            upgrade_helper_url(Some("0.67.3"), "0.68.0-rc.3"),
            "https://react-native-community.github.io/upgrade-helper/?from=0.67.3&to=0.68.0-rc.3"
        );
    }

    #[test]
    fn test_upgrade_helper_url_without_version() {
        assert!(!upgrade_helper_url(None, "0.68.0-rc.3").contains("from="));
    }
}
