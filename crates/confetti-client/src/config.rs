//! Client configuration file and endpoint resolution.
//!
//! The config lives at `$HOME/.config/confetti-websocket/config.json` and
//! holds a single `url` field. A missing file is created with a placeholder
//! so the operator can fill it in before the next run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::{ClientError, ClientResult};

pub const APP_NAME: &str = "confetti-websocket";
pub const CONFIG_FILE: &str = "config.json";
pub const PLACEHOLDER_URL: &str = "ENTER_WEBSOCKET_URL_HERE";
pub const HOME_VAR: &str = "HOME";

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default)]
    pub url: Option<String>,
}

impl ClientConfig {
    fn placeholder() -> Self {
        Self {
            url: Some(PLACEHOLDER_URL.to_string()),
        }
    }
}

/// The user's home directory, which must exist.
///
/// `HOME` must be set; the passwd entry is never used as a fallback.
pub fn home_dir() -> ClientResult<PathBuf> {
    home_dir_from(std::env::var_os(HOME_VAR))
}

fn home_dir_from(home_var: Option<std::ffi::OsString>) -> ClientResult<PathBuf> {
    if home_var.map_or(true, |value| value.is_empty()) {
        return Err(ClientError::HomeDirMissing(None));
    }
    let home = dirs::home_dir().ok_or(ClientError::HomeDirMissing(None))?;
    if !home.is_dir() {
        return Err(ClientError::HomeDirMissing(Some(home)));
    }
    Ok(home)
}

pub fn config_dir(home: &Path) -> PathBuf {
    home.join(".config").join(APP_NAME)
}

pub fn config_path(home: &Path) -> PathBuf {
    config_dir(home).join(CONFIG_FILE)
}

/// Parse `raw` and require a `ws` or `wss` scheme.
pub fn parse_ws_url(raw: &str) -> ClientResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ClientError::config_invalid(format!("invalid URL {raw:?}: {e}")))?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(ClientError::config_invalid(format!(
            "URL must use ws:// or wss:// protocol, got {other}://"
        ))),
    }
}

/// Read the endpoint from the config file under `home`, creating the file
/// with a placeholder on first run.
pub fn load_endpoint(home: &Path) -> ClientResult<Url> {
    if !home.is_dir() {
        return Err(ClientError::HomeDirMissing(Some(home.to_path_buf())));
    }

    let dir = config_dir(home);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        info!(path = %dir.display(), "Config directory created");
    }

    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        let placeholder = serde_json::to_string(&ClientConfig::placeholder())
            .map_err(|e| ClientError::config_invalid(e.to_string()))?;
        std::fs::write(&path, placeholder)?;
        return Err(ClientError::ConfigCreated(path));
    }

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ClientError::ConfigNotFound(path));
        }
        Err(e) => return Err(e.into()),
    };

    let config: ClientConfig = serde_json::from_str(&contents).map_err(|e| {
        ClientError::config_invalid(format!("{} is not valid JSON: {e}", path.display()))
    })?;

    let raw = config
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ClientError::config_invalid("URL is not set in the config file"))?;

    debug!(path = %path.display(), "Loaded client config");
    parse_ws_url(&raw)
}

/// Pick the endpoint: the command-line override wins, otherwise the config file.
pub fn resolve_endpoint(
    url_override: Option<&str>,
    home: impl FnOnce() -> ClientResult<PathBuf>,
) -> ClientResult<Url> {
    match url_override {
        Some(raw) => {
            info!(url = raw, "Using URL from command line");
            parse_ws_url(raw)
        }
        None => load_endpoint(&home()?),
    }
}
