use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use shared_http::TokenProvider;
use shared_models::{ClientError, Role, Session, SessionTokens, UserIdentity};

/// File-backed store for the one active session on this device.
///
/// The in-memory copy is only replaced after the file has been atomically
/// renamed into place, and both happen under the write lock. Readers therefore
/// see either the previous session or the new one, never a mix, and racing
/// writers resolve to the last one to take the lock.
pub struct SessionStore {
    path: PathBuf,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Opens the store at `path`, loading a previously saved session if one exists.
    ///
    /// A missing file is an empty store. A file that cannot be read or parsed is
    /// logged and ignored; the next save overwrites it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = load_from_disk(&path);

        if current.is_some() {
            debug!("Loaded saved session from {}", path.display());
        }

        Self {
            path,
            current: RwLock::new(current),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save_session(
        &self,
        tokens: SessionTokens,
        identity: UserIdentity,
    ) -> Result<Session, ClientError> {
        let session = Session::new(tokens, identity);

        let mut current = self.write();
        self.persist(&session)?;
        *current = Some(session.clone());

        info!("Session saved for {} ({})", session.email, session.role);
        Ok(session)
    }

    /// Replaces the token pair of the active session, keeping its identity.
    pub fn update_tokens(&self, tokens: SessionTokens) -> Result<Session, ClientError> {
        let mut current = self.write();
        let identity = current
            .as_ref()
            .map(Session::identity)
            .ok_or(ClientError::NotAuthenticated)?;

        let session = Session::new(tokens, identity);
        self.persist(&session)?;
        *current = Some(session.clone());

        debug!("Tokens updated for {}", session.email);
        Ok(session)
    }

    pub fn get_access_token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.access_token.clone())
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.read()
            .as_ref()
            .map(|s| s.refresh_token.clone())
            .filter(|t| !t.is_empty())
    }

    pub fn current_session(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn current_role(&self) -> Option<Role> {
        self.read().as_ref().map(|s| s.role)
    }

    pub fn is_logged_in(&self) -> bool {
        self.read().is_some()
    }

    pub fn clear_session(&self) -> Result<(), ClientError> {
        let mut current = self.write();

        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        *current = None;

        info!("Session cleared");
        Ok(())
    }

    fn persist(&self, session: &Session) -> Result<(), ClientError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, session)
            .map_err(|e| ClientError::Storage(format!("failed to encode session: {}", e)))?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| ClientError::from(e.error))?;

        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenProvider for SessionStore {
    fn access_token(&self) -> Option<String> {
        self.get_access_token()
    }
}

fn load_from_disk(path: &Path) -> Option<Session> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Could not read session file {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_slice::<Session>(&bytes) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("Ignoring unreadable session file {}: {}", path.display(), e);
            None
        }
    }
}
