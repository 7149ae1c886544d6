//! newarch-core - scaffold React Native new architecture files into an existing app
//!
//! A run is a fixed sequence of stages, each gating the next:
//!
//! 1. Preflight: refuse to run on a dirty git working tree ([`runtime`])
//! 2. Inspect `package.json`, `app.json` and any existing `MainActivity` for
//!    default names ([`project`])
//! 3. Confirm the app name and package identifier ([`project::resolve_identity`])
//! 4. Fetch the template archive, or use a local template directory ([`templates::fetcher`])
//! 5. Extract the JNI and new architecture subtrees concurrently ([`templates::extractor`])
//! 6. Replace placeholder names in the Android sources ([`templates::placeholders`])
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts that drive the stages
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use newarch_core::{project, templates};
//!
//! let defaults = project::inspect_project(&dir)?;
//! let identity = project::ProjectIdentity::new(&defaults.app_name, defaults.package_identifier.as_str())?;
//! let targets = templates::ExtractionTargets::for_project(&dir, &identity);
//! let template = templates::ArchiveFetcher::from_local(template_dir, "my-tool").fetch().await?;
//! templates::extract_template(&template, &targets).await?;
//! templates::PlaceholderSet::default()
//!     .compile(&identity)?
//!     .rewrite_tree(&templates::android_source_root(&dir))?;
//! ```

pub mod error;
pub mod product;
pub mod project;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::ScaffoldError;
pub use product::ProductConfig;
pub use project::{PackageIdentifier, ProjectIdentity};
pub use templates::{ArchiveFetcher, ArchiveSource, ExtractionTargets, PlaceholderSet};

#[cfg(feature = "tui")]
pub use tui::run;
