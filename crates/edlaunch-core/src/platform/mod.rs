//! Operating-system boundary.
//!
//! The platform is picked once at startup (`Platform::current()`) and passed
//! explicitly to the resolver and composer. Filesystem and environment access
//! goes through `SystemProbe` so resolution can be exercised against a fake
//! filesystem in tests.

pub mod expand;
pub mod probe;

use serde::{Deserialize, Serialize};

pub use expand::expand_env_vars;
pub use probe::{HostProbe, SystemProbe};

/// Supported platform families, each with its own variable expansion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    #[serde(rename = "macos")]
    MacOs,
    Windows,
}

impl Platform {
    /// The platform this binary was compiled for.
    ///
    /// Unix flavours other than macOS share the Linux rules.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::Windows => "windows",
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// Env var holding the user's home directory.
    pub fn home_var(&self) -> &'static str {
        match self {
            Platform::Windows => "USERPROFILE",
            Platform::Linux | Platform::MacOs => "HOME",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "macos" | "mac" | "darwin" | "osx" => Ok(Platform::MacOs),
            "windows" | "win" => Ok(Platform::Windows),
            _ => Err(format!(
                "Unknown platform '{}'. Known platforms: linux, macos, windows",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_platform_from_str_aliases() {
        assert_eq!(Platform::from_str("Linux"), Ok(Platform::Linux));
        assert_eq!(Platform::from_str("darwin"), Ok(Platform::MacOs));
        assert_eq!(Platform::from_str("MACOS"), Ok(Platform::MacOs));
        assert_eq!(Platform::from_str("win"), Ok(Platform::Windows));
        assert!(Platform::from_str("beos").is_err());
    }

    #[test]
    fn test_platform_serde() {
        assert_eq!(
            serde_json::to_string(&Platform::MacOs).unwrap(),
            "\"macos\""
        );
        let parsed: Platform = serde_json::from_str("\"windows\"").unwrap();
        assert_eq!(parsed, Platform::Windows);
    }

    #[test]
    fn test_current_platform_matches_cfg() {
        let current = Platform::current();
        assert_eq!(current.is_windows(), cfg!(target_os = "windows"));
    }

    #[test]
    fn test_home_var() {
        assert_eq!(Platform::Windows.home_var(), "USERPROFILE");
        assert_eq!(Platform::Linux.home_var(), "HOME");
        assert_eq!(Platform::MacOs.home_var(), "HOME");
    }
}
