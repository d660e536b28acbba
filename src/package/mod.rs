//! Package model
//!
//! This module provides the declarative side of reconciliation: the packages
//! a manifest asks for, the manifest file itself, and version comparison.

mod desired;
mod manifest;
pub mod version;

pub use desired::DesiredPackage;
pub use manifest::{Manifest, default_export_file_name};
