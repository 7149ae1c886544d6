//! Template fetching, extraction and placeholder rewriting
//!
//! This module provides:
//! - Archive retrieval from a remote URL or a local template directory
//! - Selective extraction of the JNI and new architecture subtrees
//! - Placeholder replacement over the Android source tree
//! - React Native version compatibility checking

pub mod copier;
pub mod extractor;
pub mod fetcher;
pub mod placeholders;
pub mod version;

pub use copier::copy_tree;
pub use extractor::{
    android_source_root, extract_template, ExtractionReport, ExtractionTargets,
    NATIVE_GLUE_SUBTREE, NEW_ARCH_GLUE_SUBTREE,
};
pub use fetcher::{ArchiveFetcher, ArchiveSource, FetchedTemplate};
pub use placeholders::{PlaceholderRule, PlaceholderSet, RewriteReport, Rewriter};
pub use version::check_compatibility;
