use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;

pub const DEFAULT_SERVER: &str = "http://localhost:3000";
const SESSION_FILE: &str = "session.json";

/// Persisted CLI session: which server to talk to and the token it issued
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub server: Option<String>,
    pub token: Option<String>,
    pub email: Option<String>,
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Explicit flag, then the saved server, then `FINTRACK_SERVER`, then localhost
    pub fn server_url(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.server.clone())
            .or_else(|| std::env::var("FINTRACK_SERVER").ok())
            .unwrap_or_else(|| DEFAULT_SERVER.to_string())
    }

    pub fn start(&mut self, server: String, email: String, token: String) {
        self.server = Some(server);
        self.email = Some(email);
        self.token = Some(token);
        self.logged_in_at = Some(Utc::now());
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.email = None;
        self.logged_in_at = None;
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("FINTRACK_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("fintrack").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<Session> {
    load_session_from(&get_config_dir()?.join(SESSION_FILE))
}

pub fn save_session(session: &Session) -> anyhow::Result<()> {
    save_session_to(&get_config_dir()?.join(SESSION_FILE), session)
}

pub fn load_session_from(path: &Path) -> anyhow::Result<Session> {
    if !path.exists() {
        return Ok(Session::default());
    }

    let content = fs::read_to_string(path)?;
    let session: Session = serde_json::from_str(&content)?;
    Ok(session)
}

pub fn save_session_to(path: &Path, session: &Session) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(session)?;
    fs::write(path, content)?;
    Ok(())
}

/// Client for the resolved server, carrying the saved token if any
pub fn client_for(session: &Session, server: Option<&str>) -> anyhow::Result<ApiClient> {
    let client = ApiClient::new(&session.server_url(server))?;
    Ok(match &session.token {
        Some(token) => client.with_token(token.clone()),
        None => client,
    })
}
