use log::debug;
use std::path::PathBuf;

use super::{ManagerKind, Platform};
use crate::runtime::Runtime;

/// Result of looking for one package manager on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub kind: ManagerKind,
    pub executable: Option<PathBuf>,
}

impl Detection {
    pub fn is_installed(&self) -> bool {
        self.executable.is_some()
    }
}

/// Look up every package manager supported on `platform`, in display order.
#[tracing::instrument(skip(runtime))]
pub fn detect_managers<R: Runtime>(runtime: &R, platform: Platform) -> Vec<Detection> {
    platform
        .supported_managers()
        .iter()
        .map(|&kind| {
            let executable = runtime.find_executable(kind.executable_name());
            debug!("Detected {}: {:?}", kind, executable);
            Detection { kind, executable }
        })
        .collect()
}
