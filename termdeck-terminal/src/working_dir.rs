//! Working directory resolution at replay time.

use std::path::{Path, PathBuf};

use termdeck_config::Profile;

/// Outcome of resolving a profile's working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDirectory {
    /// Directory the shell starts in
    pub path: PathBuf,
    /// The configured directory, when it no longer exists and was replaced
    pub stale: Option<String>,
}

/// Use the profile's directory when it exists on disk, otherwise `fallback`.
///
/// A missing directory is not an error; the caller reports it as a warning.
pub fn resolve_working_directory(profile: Option<&Profile>, fallback: &Path) -> ResolvedDirectory {
    let configured = profile.and_then(|p| p.working_directory.as_deref());

    match configured {
        Some(dir) if Path::new(dir).is_dir() => ResolvedDirectory {
            path: PathBuf::from(dir),
            stale: None,
        },
        Some(dir) => {
            log::warn!(
                "Working directory {} does not exist, using {}",
                dir,
                fallback.display()
            );
            ResolvedDirectory {
                path: fallback.to_path_buf(),
                stale: Some(dir.to_string()),
            }
        }
        None => ResolvedDirectory {
            path: fallback.to_path_buf(),
            stale: None,
        },
    }
}
