use super::{ManagerKind, Platform};

/// Manual installation steps for a package manager devctl cannot install itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallGuide {
    pub kind: ManagerKind,
    pub steps: &'static [&'static str],
    pub url: &'static str,
    pub verify_command: &'static str,
}

const BREW_INSTALL: &str = "Run: /bin/bash -c \"$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)\"";

pub fn install_guide(kind: ManagerKind, platform: Platform) -> Option<InstallGuide> {
    let guide = match kind {
        ManagerKind::Scoop => InstallGuide {
            kind,
            steps: &[
                "Open PowerShell",
                "Run: Set-ExecutionPolicy -ExecutionPolicy RemoteSigned -Scope CurrentUser",
                "Run: Invoke-RestMethod -Uri https://get.scoop.sh | Invoke-Expression",
                "Restart your terminal after installation",
            ],
            url: "https://scoop.sh",
            verify_command: "scoop --version",
        },
        ManagerKind::Pwsh => InstallGuide {
            kind,
            steps: &[
                "Visit the PowerShell GitHub releases page",
                "Download the latest .msi installer for Windows",
                "Run the installer and follow the prompts",
                "Restart your terminal after installation",
            ],
            url: "https://github.com/PowerShell/PowerShell/releases",
            verify_command: "pwsh --version",
        },
        ManagerKind::Brew if platform == Platform::Darwin => InstallGuide {
            kind,
            steps: &[
                "Open Terminal",
                BREW_INSTALL,
                "Follow the on-screen instructions",
                "Add Homebrew to your PATH as instructed",
            ],
            url: "https://brew.sh",
            verify_command: "brew --version",
        },
        ManagerKind::Brew => InstallGuide {
            kind,
            steps: &[
                "Open Terminal",
                BREW_INSTALL,
                "Follow the on-screen instructions",
                "Add Homebrew to your PATH: eval \"$(/home/linuxbrew/.linuxbrew/bin/brew shellenv)\"",
            ],
            url: "https://brew.sh",
            verify_command: "brew --version",
        },
        // Ships with the distribution.
        ManagerKind::Apt => return None,
    };
    Some(guide)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoop_guide() {
        let guide = install_guide(ManagerKind::Scoop, Platform::Windows).unwrap();
        assert_eq!(guide.url, "https://scoop.sh");
        assert_eq!(guide.verify_command, "scoop --version");
        assert_eq!(guide.steps.len(), 4);
    }

    #[test]
    fn test_brew_guide_differs_per_platform() {
        let darwin = install_guide(ManagerKind::Brew, Platform::Darwin).unwrap();
        let linux = install_guide(ManagerKind::Brew, Platform::Linux).unwrap();
        assert_ne!(darwin.steps, linux.steps);
        assert!(linux.steps[3].contains("linuxbrew"));
    }

    #[test]
    fn test_no_apt_guide() {
        assert!(install_guide(ManagerKind::Apt, Platform::Linux).is_none());
    }
}
