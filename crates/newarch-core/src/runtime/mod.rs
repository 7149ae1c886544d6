//! External tool checks
//!
//! This module provides:
//! - git detection
//! - Working tree cleanliness check run before any file is written

pub mod git;

pub use git::{ensure_clean_tree, git_available, working_tree_status, WorkingTreeStatus};
