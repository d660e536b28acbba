use std::fmt;

use super::ManagerKind;

/// Operating system families devctl distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Darwin,
    Linux,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Darwin
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Darwin => "darwin",
            Platform::Linux => "linux",
            Platform::Other => "unknown",
        }
    }

    /// Package managers worth detecting on this platform, in display order.
    pub fn supported_managers(&self) -> &'static [ManagerKind] {
        match self {
            Platform::Windows => &[ManagerKind::Scoop, ManagerKind::Pwsh],
            Platform::Darwin => &[ManagerKind::Brew],
            Platform::Linux => &[ManagerKind::Brew, ManagerKind::Apt],
            Platform::Other => &[],
        }
    }

    pub fn supports(&self, kind: ManagerKind) -> bool {
        self.supported_managers().contains(&kind)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_managers() {
        assert_eq!(
            Platform::Windows.supported_managers(),
            &[ManagerKind::Scoop, ManagerKind::Pwsh]
        );
        assert_eq!(Platform::Darwin.supported_managers(), &[ManagerKind::Brew]);
        assert_eq!(
            Platform::Linux.supported_managers(),
            &[ManagerKind::Brew, ManagerKind::Apt]
        );
        assert!(Platform::Other.supported_managers().is_empty());
    }

    #[test]
    fn test_supports() {
        assert!(Platform::Windows.supports(ManagerKind::Scoop));
        assert!(!Platform::Linux.supports(ManagerKind::Scoop));
        assert!(!Platform::Darwin.supports(ManagerKind::Apt));
    }

    #[test]
    fn test_current_matches_target() {
        let current = Platform::current();
        #[cfg(windows)]
        assert_eq!(current, Platform::Windows);
        #[cfg(target_os = "linux")]
        assert_eq!(current, Platform::Linux);
        #[cfg(target_os = "macos")]
        assert_eq!(current, Platform::Darwin);
        let _ = current;
    }
}
