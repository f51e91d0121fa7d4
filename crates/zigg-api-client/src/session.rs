//! Operator session.
//!
//! A session exists between a successful login and either an explicit logout
//! or the first 401 from the backend. The token is kept in memory and, when a
//! token file is configured, persisted so the next invocation can reuse it.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};
use zigg_core::ConsoleError;

/// Write the token readable by the owner only.
fn write_token_file(path: &Path, token: &str) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // an existing file keeps its old mode on open
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(token.as_bytes())
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    file: Option<PathBuf>,
}

impl Session {
    /// Session that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Session backed by `path`. A token already stored there is picked up.
    pub fn persisted(path: impl Into<PathBuf>) -> Result<Self, ConsoleError> {
        let path = path.into();
        let token = match std::fs::read_to_string(&path) {
            Ok(raw) => Some(raw.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), active = token.is_some(), "Loaded session");
        Ok(Self {
            token: Arc::new(RwLock::new(token)),
            file: Some(path),
        })
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.token().is_some()
    }

    fn set(&self, value: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }

    /// Start a session with `token`, replacing any previous one.
    pub fn begin(&self, token: impl Into<String>) -> Result<(), ConsoleError> {
        let token = token.into();
        if let Some(path) = &self.file {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            write_token_file(path, &token)?;
        }
        self.set(Some(token));
        Ok(())
    }

    /// Drop the token from memory and from disk. Ending an inactive session is
    /// not an error.
    pub fn end(&self) -> Result<(), ConsoleError> {
        self.set(None);
        if let Some(path) = &self.file {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to remove session file");
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_session_round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("token");

        let session = Session::persisted(&path).unwrap();
        assert!(!session.is_active());

        session.begin("Bearer abc").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Bearer abc");

        let reloaded = Session::persisted(&path).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("Bearer abc"));

        reloaded.end().unwrap();
        assert!(!reloaded.is_active());
        assert!(!path.exists());
        // ending twice is fine
        reloaded.end().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private_to_the_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "stale").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let session = Session::persisted(&path).unwrap();
        session.begin("Bearer fresh").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Bearer fresh");
    }

    #[test]
    fn clones_share_the_token() {
        let session = Session::in_memory();
        let clone = session.clone();
        session.begin("t").unwrap();
        assert_eq!(clone.token().as_deref(), Some("t"));
        clone.end().unwrap();
        assert!(!session.is_active());
    }

    #[test]
    fn blank_token_file_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  \n").unwrap();
        assert!(!Session::persisted(&path).unwrap().is_active());
    }
}
