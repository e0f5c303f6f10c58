//! Host operating-system family.
//!
//! Shell selection and the control-sequence dialect both branch on this,
//! never on the shell binary itself.

/// Operating-system family of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostFamily {
    Windows,
    Mac,
    /// Linux, the BSDs and everything else
    Other,
}

impl HostFamily {
    /// Family of the running process
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Classify an OS identifier as reported by `std::env::consts::OS`
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => HostFamily::Windows,
            "macos" | "ios" => HostFamily::Mac,
            _ => HostFamily::Other,
        }
    }

    pub fn is_windows(self) -> bool {
        self == HostFamily::Windows
    }

    /// Name of the default terminal shown in list labels and prompts
    pub fn terminal_label(self) -> &'static str {
        match self {
            HostFamily::Windows => "PowerShell",
            HostFamily::Mac => "Terminal",
            HostFamily::Other => "Bash",
        }
    }
}
