use std::path::PathBuf;

use crate::config::{config_dir, ApiConfig};
use crate::error::{MarqueeError, Result};

/// Run a shell command and take its trimmed stdout as the key
fn try_cli_key(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        non_empty(String::from_utf8_lossy(&output.stdout).as_ref())
    } else {
        None
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let key = raw.trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

/// ~/.config/marquee/api_key
fn key_path() -> Option<PathBuf> {
    Some(config_dir()?.join("api_key"))
}

fn load_stored_key() -> Option<String> {
    let path = key_path()?;
    let key = std::fs::read_to_string(path).ok()?;
    non_empty(&key)
}

fn save_key(key: &str) -> std::io::Result<()> {
    if let Some(path) = key_path() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, key)?;
    }
    Ok(())
}

/// Resolve the TMDB API key, trying in order:
/// 1. The env var named in config
/// 2. The stored key file
/// 3. The configured key command (result is stored for next time)
pub fn load_api_key(api: &ApiConfig) -> Result<String> {
    if let Some(env_var) = &api.api_key_env {
        if let Some(key) = std::env::var(env_var).ok().as_deref().and_then(non_empty) {
            return Ok(key);
        }
    }

    if let Some(key) = load_stored_key() {
        return Ok(key);
    }

    if let Some(cmd) = &api.api_key_command {
        if let Some(key) = try_cli_key(cmd) {
            if let Err(e) = save_key(&key) {
                tracing::warn!(error = %e, "could not store API key");
            }
            return Ok(key);
        }
    }

    Err(MarqueeError::Auth(format!(
        "No TMDB API key found. Set {} or configure api_key_command.",
        api.api_key_env.as_deref().unwrap_or("an API key env var")
    )))
}
