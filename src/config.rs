//! Command-line and environment configuration.
use std::path::PathBuf;

use clap::Parser;

use crate::api::DEFAULT_BASE_URL;
use crate::app::Route;
use crate::session::{FileSessionStore, MemorySessionStore, SessionStore};

#[derive(Debug, Clone, Parser)]
#[command(name = "user-console", version, about = "Terminal console for managing reqres users")]
pub struct Config {
    /// Base URL of the users API.
    #[arg(long, env = "USER_CONSOLE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Value sent as the `x-api-key` header.
    #[arg(long, env = "USER_CONSOLE_API_KEY")]
    pub api_key: Option<String>,

    /// Where the session token is kept between runs.
    #[arg(long, env = "USER_CONSOLE_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Keep the token in memory only.
    #[arg(long)]
    pub no_persist: bool,

    /// Screen to open first.
    #[arg(long, value_enum, default_value_t = Route::Login)]
    pub route: Route,

    #[arg(long, default_value = "theme.conf")]
    pub theme: String,

    #[arg(long, default_value = "keybinds.conf")]
    pub keybinds: String,

    #[arg(long, env = "USER_CONSOLE_LOG_FILE", default_value = "user-console.log")]
    pub log_file: PathBuf,
}

impl Config {
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(FileSessionStore::default_path)
    }

    pub fn session_store(&self) -> Box<dyn SessionStore> {
        if self.no_persist {
            Box::new(MemorySessionStore::new())
        } else {
            Box::new(FileSessionStore::new(self.session_path()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cfg = Config::parse_from([
            "user-console",
            "--base-url",
            "http://localhost:9000/api",
            "--session-file",
            "/tmp/uc-session",
            "--route",
            "users",
        ]);
        assert_eq!(cfg.base_url, "http://localhost:9000/api");
        assert_eq!(cfg.session_path(), PathBuf::from("/tmp/uc-session"));
        assert_eq!(cfg.route, Route::Users);
        assert!(!cfg.no_persist);
    }

    #[test]
    fn no_persist_uses_memory_store() {
        let cfg = Config::parse_from(["user-console", "--no-persist"]);
        let mut store = cfg.session_store();
        store.set_token("abc").unwrap();
        assert_eq!(store.get_token().as_deref(), Some("abc"));
        assert_eq!(cfg.keybinds, "keybinds.conf");
    }
}
