//! Placeholder token replacement across the Android source tree
//!
//! The template files use the identity of the React Native diff app
//! (`com.rndiffapp`, `RnDiffApp`, `rndiffapp`). The tokens and what they map
//! to are configuration, loadable from YAML:
//!
//! ```yaml
//! passes:
//!   - - token: com.rndiffapp
//!       field: package_identifier
//!   - - token: RnDiffApp
//!       field: app_name
//!     - token: rndiffapp
//!       field: app_name
//! ```

use crate::error::ScaffoldError;
use crate::project::{IdentityField, ProjectIdentity};
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use walkdir::WalkDir;

/// Upper bound on full sweeps over one text before giving up
const MAX_SWEEPS: usize = 16;

/// A literal token and the identity value replacing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderRule {
    pub token: String,
    pub field: IdentityField,
}

impl PlaceholderRule {
    pub fn new(token: &str, field: IdentityField) -> Self {
        Self {
            token: token.to_string(),
            field,
        }
    }
}

/// Ordered substitution passes.
///
/// Passes run one after another; the rules of a single pass are applied in
/// one sweep so that a longer token is never split by a shorter one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderSet {
    pub passes: Vec<Vec<PlaceholderRule>>,
}

impl Default for PlaceholderSet {
    fn default() -> Self {
        Self {
            passes: vec![
                vec![PlaceholderRule::new(
                    "com.rndiffapp",
                    IdentityField::PackageIdentifier,
                )],
                vec![
                    PlaceholderRule::new("RnDiffApp", IdentityField::AppName),
                    PlaceholderRule::new("rndiffapp", IdentityField::AppName),
                ],
            ],
        }
    }
}

impl PlaceholderSet {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let set: Self = serde_yaml::from_str(content).context("Failed to parse placeholder set")?;
        set.validate()?;
        Ok(set)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid placeholder file {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.passes.iter().all(|pass| pass.is_empty()) {
            anyhow::bail!("Placeholder set has no rules");
        }
        if let Some(rule) = self.rules().find(|rule| rule.token.is_empty()) {
            anyhow::bail!("Placeholder rule for {} has an empty token", rule.field);
        }
        Ok(())
    }

    fn rules(&self) -> impl Iterator<Item = &PlaceholderRule> {
        self.passes.iter().flatten()
    }

    /// Reject identities whose values contain a placeholder token.
    ///
    /// Replacing with such a value would leave tokens behind that no number
    /// of sweeps removes. A value equal to a token of the same field is
    /// allowed since that replacement is a no-op.
    pub fn check_identity(&self, identity: &ProjectIdentity) -> Result<(), ScaffoldError> {
        for rule in self.rules() {
            let value = identity.value(rule.field);
            for other in self.rules() {
                let token = other.token.as_str();
                if value.contains(token) && !(value == token && other.field == rule.field) {
                    return Err(ScaffoldError::invalid_identity(
                        rule.field.display_name(),
                        format!("'{}' contains the template placeholder '{}'", value, token),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Compile the passes against concrete identity values
    pub fn compile(&self, identity: &ProjectIdentity) -> Result<Rewriter> {
        let passes = self
            .passes
            .iter()
            .filter(|pass| !pass.is_empty())
            .map(|pass| CompiledPass::new(pass, identity))
            .collect::<Result<Vec<_>>>()?;
        Ok(Rewriter { passes })
    }
}

struct CompiledPass {
    pattern: Regex,
    replacements: Vec<(String, String)>,
}

impl CompiledPass {
    fn new(rules: &[PlaceholderRule], identity: &ProjectIdentity) -> Result<Self> {
        let mut replacements: Vec<(String, String)> = rules
            .iter()
            .map(|rule| (rule.token.clone(), identity.value(rule.field).to_string()))
            .collect();
        replacements.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        replacements.dedup_by(|a, b| a.0 == b.0);

        let alternation = replacements
            .iter()
            .map(|(token, _)| regex::escape(token))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation).context("Failed to compile placeholder pattern")?;

        Ok(Self {
            pattern,
            replacements,
        })
    }

    fn apply(&self, text: &str) -> (String, usize) {
        let mut count = 0;
        let replaced = self.pattern.replace_all(text, |caps: &regex::Captures| {
            let token = &caps[0];
            let value = self
                .replacements
                .iter()
                .find(|(t, _)| t == token)
                .map(|(_, value)| value.as_str())
                .unwrap_or(token);
            // A token mapped onto itself is not a change
            if value != token {
                count += 1;
            }
            value.to_string()
        });
        (replaced.into_owned(), count)
    }
}

/// Placeholder passes bound to one identity
pub struct Rewriter {
    passes: Vec<CompiledPass>,
}

/// Outcome of a tree rewrite
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub files_scanned: usize,
    pub files_rewritten: usize,
    pub replacements: usize,
    /// Files left alone because they are not UTF-8 text
    pub files_skipped: usize,
}

impl Rewriter {
    /// Apply every pass in order, returning the new text and replacement count.
    ///
    /// A replacement can join with its neighbours into a new token
    /// (`RnDiff` + `App`), so sweeps repeat until one changes nothing or
    /// `MAX_SWEEPS` is reached.
    pub fn rewrite_text(&self, text: &str) -> (String, usize) {
        let mut current = text.to_string();
        let mut total = 0;
        for _ in 0..MAX_SWEEPS {
            let (next, count) = self.sweep(&current);
            current = next;
            total += count;
            if count == 0 {
                break;
            }
        }
        (current, total)
    }

    /// True when another sweep would not change `text`
    pub fn is_settled(&self, text: &str) -> bool {
        self.sweep(text).1 == 0
    }

    fn sweep(&self, text: &str) -> (String, usize) {
        let mut current = text.to_string();
        let mut total = 0;
        for pass in &self.passes {
            let (next, count) = pass.apply(&current);
            current = next;
            total += count;
        }
        (current, total)
    }

    /// Rewrite every file under `root` in place.
    ///
    /// Files are only written back when their content changed.
    pub fn rewrite_tree(&self, root: &Path) -> Result<RewriteReport> {
        let mut report = RewriteReport::default();
        if !root.is_dir() {
            return Ok(report);
        }

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("Failed to walk {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            report.files_scanned += 1;

            let path = entry.path();
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let Ok(text) = String::from_utf8(bytes) else {
                report.files_skipped += 1;
                continue;
            };

            let (rewritten, count) = self.rewrite_text(&text);
            if !self.is_settled(&rewritten) {
                anyhow::bail!(
                    "Placeholders in {} keep reappearing after {} rewrites",
                    path.display(),
                    MAX_SWEEPS
                );
            }
            if count > 0 && rewritten != text {
                std::fs::write(path, rewritten)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                report.files_rewritten += 1;
            }
            report.replacements += count;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn identity(app: &str, package: &str) -> ProjectIdentity {
        ProjectIdentity::new(app, package).unwrap()
    }

    #[test]
    fn test_default_set_rewrites_identifier_before_name() {
        let rewriter = PlaceholderSet::default()
            .compile(&identity("MyApp", "com.myapp"))
            .unwrap();

        let (text, count) = rewriter.rewrite_text(
            "package com.rndiffapp.newarchitecture;\nclass RnDiffAppModule {}\nadd_library(rndiffapp_appmodules)\n",
        );

        assert_eq!(
            text,
            "package com.myapp.newarchitecture;\nclass MyAppModule {}\nadd_library(MyApp_appmodules)\n"
        );
        assert_eq!(count, 3);
    }

    #[test]
    fn test_multi_segment_package_is_not_clobbered_by_name_pass() {
        let rewriter = PlaceholderSet::default()
            .compile(&identity("AcmeApp", "com.acme.app"))
            .unwrap();

        let (text, _) = rewriter.rewrite_text("import com.rndiffapp.BuildConfig; // rndiffapp");
        assert_eq!(text, "import com.acme.app.BuildConfig; // AcmeApp");
    }

    #[test]
    fn test_longest_token_wins_within_a_pass() {
        let set = PlaceholderSet {
            passes: vec![vec![
                PlaceholderRule::new("app", IdentityField::AppName),
                PlaceholderRule::new("app.id", IdentityField::PackageIdentifier),
            ]],
        };
        let rewriter = set.compile(&identity("Demo", "org.demo")).unwrap();
        assert_eq!(rewriter.rewrite_text("app.id app").0, "org.demo Demo");
    }

    #[test]
    fn test_yaml_round_trip_of_default_set() {
        let yaml = serde_yaml::to_string(&PlaceholderSet::default()).unwrap();
        assert_eq!(PlaceholderSet::from_yaml(&yaml).unwrap(), PlaceholderSet::default());
    }

    #[test]
    fn test_yaml_custom_set() {
        let set = PlaceholderSet::from_yaml(
            "passes:\n  - - token: com.helloworld\n      field: package_identifier\n  - - token: HelloWorld\n      field: app_name\n",
        )
        .unwrap();
        let rewriter = set.compile(&identity("MyApp", "com.myapp")).unwrap();
        assert_eq!(
            rewriter.rewrite_text("com.helloworld.HelloWorldActivity").0,
            "com.myapp.MyAppActivity"
        );
    }

    #[test]
    fn test_yaml_rejects_empty_token() {
        assert!(PlaceholderSet::from_yaml("passes:\n  - - token: ''\n      field: app_name\n").is_err());
        assert!(PlaceholderSet::from_yaml("passes: []\n").is_err());
    }

    #[test]
    fn test_check_identity_rejects_embedded_token() {
        let set = PlaceholderSet::default();
        assert!(set.check_identity(&identity("MyApp", "com.myapp")).is_ok());
        assert!(set.check_identity(&identity("rndiffapp", "com.myapp")).is_ok());
        assert!(set
            .check_identity(&identity("MyApp", "com.rndiffapp.x"))
            .is_err());
        assert!(set.check_identity(&identity("MyRnDiffApp", "com.myapp")).is_err());
    }

    #[test]
    fn test_rewrite_tree_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let java = root.path().join("main/java/com/myapp/newarchitecture");
        fs::create_dir_all(&java).unwrap();
        fs::write(
            java.join("MainApplicationReactNativeHost.java"),
            "package com.rndiffapp.newarchitecture;\nimport com.rndiffapp.BuildConfig;\n",
        )
        .unwrap();
        fs::write(root.path().join("main/untouched.txt"), "nothing to see").unwrap();
        fs::write(root.path().join("main/icon.bin"), b"\xff\xfe\x00\x9f").unwrap();

        let rewriter = PlaceholderSet::default()
            .compile(&identity("MyApp", "com.myapp"))
            .unwrap();

        let first = rewriter.rewrite_tree(root.path()).unwrap();
        assert_eq!(first.files_scanned, 3);
        assert_eq!(first.files_rewritten, 1);
        assert_eq!(first.replacements, 2);
        assert_eq!(first.files_skipped, 1);

        let after_first =
            fs::read_to_string(java.join("MainApplicationReactNativeHost.java")).unwrap();
        assert_eq!(
            after_first,
            "package com.myapp.newarchitecture;\nimport com.myapp.BuildConfig;\n"
        );

        let second = rewriter.rewrite_tree(root.path()).unwrap();
        assert_eq!(second.files_rewritten, 0);
        assert_eq!(second.replacements, 0);
        assert_eq!(
            fs::read_to_string(java.join("MainApplicationReactNativeHost.java")).unwrap(),
            after_first
        );
    }

    #[test]
    fn test_token_formed_by_a_replacement_is_rewritten_too() {
        let rewriter = PlaceholderSet::default()
            .compile(&identity("App", "com.myapp"))
            .unwrap();

        let (once, count) = rewriter.rewrite_text("RnDiffrndiffapp");
        assert_eq!(once, "App");
        assert_eq!(count, 2);
        assert!(rewriter.is_settled(&once));
        assert_eq!(rewriter.rewrite_text(&once), (once.clone(), 0));
    }

    #[test]
    fn test_identity_equal_to_its_token_is_settled() {
        let rewriter = PlaceholderSet::default()
            .compile(&identity("rndiffapp", "com.myapp"))
            .unwrap();

        let (text, count) = rewriter.rewrite_text("package com.rndiffapp; // rndiffapp");
        assert_eq!(text, "package com.myapp; // rndiffapp");
        assert_eq!(count, 1);
        assert!(rewriter.is_settled(&text));
    }

    #[test]
    fn test_rewrite_tree_rejects_text_that_never_settles() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("Nested.java");
        let original = format!("{}rndiffapp", "RnDiff".repeat(MAX_SWEEPS + 4));
        fs::write(&file, &original).unwrap();

        let rewriter = PlaceholderSet::default()
            .compile(&identity("App", "com.myapp"))
            .unwrap();

        let err = rewriter.rewrite_tree(root.path()).unwrap_err();
        assert!(err.to_string().contains("keep reappearing"));
        assert_eq!(fs::read_to_string(&file).unwrap(), original);
    }

    #[test]
    fn test_rewrite_missing_root_is_empty_report() {
        let root = tempfile::tempdir().unwrap();
        let rewriter = PlaceholderSet::default()
            .compile(&identity("MyApp", "com.myapp"))
            .unwrap();
        assert_eq!(
            rewriter.rewrite_tree(&root.path().join("missing")).unwrap(),
            RewriteReport::default()
        );
    }
}
