//! Base directories for file records
//!
//! A record lives at `{base}/{identifier}`. The base is chosen per call from
//! [`BasePath`] and resolved to a real directory only when it is needed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SaveError};

/// Where file records are rooted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BasePath {
    /// Per-user writable data directory (`{data_dir}/{app_name}`)
    #[default]
    PersistentData,
    /// Directory containing the running executable
    Install,
    /// Caller-chosen directory. An empty path uses identifiers as given.
    Custom(PathBuf),
}

impl BasePath {
    pub fn custom(path: impl Into<PathBuf>) -> Self {
        BasePath::Custom(path.into())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BasePath::PersistentData => "PersistentData",
            BasePath::Install => "Install",
            BasePath::Custom(_) => "Custom",
        }
    }

    /// Resolve to a real directory
    pub fn resolve(&self, app_name: &str) -> Result<PathBuf> {
        match self {
            BasePath::PersistentData => dirs::data_dir()
                .map(|dir| dir.join(app_name))
                .ok_or_else(|| SaveError::Config("no platform data directory available".into())),
            BasePath::Install => {
                let exe = std::env::current_exe()?;
                exe.parent().map(Path::to_path_buf).ok_or_else(|| {
                    SaveError::Config(format!("executable {} has no parent", exe.display()))
                })
            }
            BasePath::Custom(path) => Ok(path.clone()),
        }
    }

    /// Full path of the record named by `identifier`.
    ///
    /// Rooted identifiers bypass the base directory.
    pub fn record_path(&self, app_name: &str, identifier: &str) -> Result<PathBuf> {
        if is_file_path(identifier) {
            return Ok(PathBuf::from(identifier));
        }
        Ok(self.resolve(app_name)?.join(identifier))
    }
}

/// True iff `value` is a rooted path (`/saves/a.sav`, `C:\saves\a.sav`)
pub fn is_file_path(value: &str) -> bool {
    Path::new(value).has_root()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_file_path() {
        assert!(!is_file_path("a.sav"));
        assert!(!is_file_path("slots/a.sav"));
        assert!(!is_file_path("../a.sav"));
        assert!(!is_file_path(""));
        #[cfg(unix)]
        assert!(is_file_path("/tmp/a.sav"));
        #[cfg(windows)]
        assert!(is_file_path(r"C:\saves\a.sav"));
    }

    #[test]
    fn test_custom_record_path() {
        let base = BasePath::custom("/var/games");
        let path = base.record_path("app", "slot1.sav").unwrap();
        assert_eq!(path, Path::new("/var/games").join("slot1.sav"));
        assert_eq!(base.as_str(), "Custom");
        assert_eq!(BasePath::default().as_str(), "PersistentData");
    }

    #[test]
    fn test_empty_custom_uses_identifier() {
        let base = BasePath::custom("");
        assert_eq!(
            base.record_path("app", "slot1.sav").unwrap(),
            PathBuf::from("slot1.sav")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_rooted_identifier_bypasses_base() {
        let base = BasePath::custom("/var/games");
        assert_eq!(
            base.record_path("app", "/elsewhere/x.sav").unwrap(),
            PathBuf::from("/elsewhere/x.sav")
        );
    }

    #[test]
    fn test_persistent_data_includes_app_name() {
        if let Ok(dir) = BasePath::PersistentData.resolve("savegame-test") {
            assert!(dir.ends_with("savegame-test"));
        }
    }

    #[test]
    fn test_install_is_exe_dir() {
        let dir = BasePath::Install.resolve("ignored").unwrap();
        let exe = std::env::current_exe().unwrap();
        assert_eq!(exe.parent().unwrap(), dir);
    }
}
