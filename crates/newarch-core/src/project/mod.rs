//! The caller's React Native project
//!
//! - Manifest parsing (package.json, app.json)
//! - Default identity derivation, including names declared in MainActivity
//! - Identity resolution through a prompt abstraction

pub mod identity;
pub mod inspector;
pub mod manifest;

pub use identity::{
    resolve_identity, IdentityField, IdentityOverrides, IdentityPrompt, PackageIdentifier,
    ProjectIdentity,
};
pub use inspector::{inspect_project, DeclaredNames, ProjectDefaults};
pub use manifest::ProjectManifest;
