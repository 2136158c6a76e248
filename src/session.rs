//! Session token persistence.
//!
//! The token is opaque and never validated locally: presence is the only gate
//! for entering the user list. `FileSessionStore` keeps it across restarts in a
//! one-key `token = <value>` file; `MemorySessionStore` lives for one run.
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Context, Result};

const TOKEN_KEY: &str = "token";

pub trait SessionStore {
    fn get_token(&self) -> Option<String>;
    fn set_token(&mut self, token: &str) -> Result<()>;
    fn clear_token(&mut self) -> Result<()>;
}

/// Token kept only in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    token: Option<String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn set_token(&mut self, token: &str) -> Result<()> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&mut self) -> Result<()> {
        self.token = None;
        Ok(())
    }
}

/// Token persisted to a small key=value file.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/user-console/session`, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("user-console"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("session")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get_token(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        parse_token(&contents)
    }

    fn set_token(&mut self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_ctx(|| format!("create session dir {}", parent.display()))?;
        }
        let contents = format!("# user-console session\n{TOKEN_KEY} = {token}\n");
        std::fs::write(&self.path, contents)
            .with_ctx(|| format!("write session file {}", self.path.display()))?;
        debug!(path = %self.path.display(), "Session token stored");
        Ok(())
    }

    fn clear_token(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session token cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_ctx(|| format!("remove session file {}", self.path.display())),
        }
    }
}

fn parse_token(contents: &str) -> Option<String> {
    for raw_line in contents.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.splitn(2, '=');
        let key = parts.next().map(|s| s.trim()).unwrap_or("");
        let val = parts.next().map(|s| s.trim()).unwrap_or("");
        if key == TOKEN_KEY && !val.is_empty() {
            return Some(val.to_string());
        }
    }
    None
}
