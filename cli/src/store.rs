//! File-backed token store for the terminal client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The CLI persists the session token in a single file (by default
//! `$HOME/.chamasys/token`) so consecutive invocations share one login, the
//! same way browser tabs share `localStorage`.
//!
//! ERROR HANDLING
//! ==============
//! `TokenStore` methods cannot fail. An unreadable file reads as "no token";
//! write and delete failures are logged and leave the next guard check to
//! send the user back to `login`.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chamasys::TokenStore;

/// Token file location relative to the home directory.
const DEFAULT_RELATIVE_PATH: [&str; 2] = [".chamasys", "token"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{token}\n"))?;
        restrict_permissions(&self.path)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        (!token.is_empty()).then(|| token.to_owned())
    }

    fn set(&self, token: &str) {
        if let Err(error) = self.write(token) {
            tracing::error!(path = %self.path.display(), %error, "failed to write token file");
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => tracing::error!(path = %self.path.display(), %error, "failed to remove token file"),
        }
    }
}

/// `<home>/.chamasys/token`, or `None` when no home directory is known.
#[must_use]
pub fn default_token_path(home: Option<OsString>) -> Option<PathBuf> {
    let home = home.filter(|value| !value.is_empty())?;
    let mut path = PathBuf::from(home);
    path.extend(DEFAULT_RELATIVE_PATH);
    Some(path)
}
