mod config;

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use snapsave_core::{SnapError, SnapResult};

pub use config::{HttpConfig, OutputConfig, ServerConfig, SnapConfig};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

pub fn config_path() -> SnapResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SnapError::Config("home directory not found".to_string()))?;
    Ok(home.join(".snapsave").join("config.toml"))
}

pub fn load_config() -> SnapResult<SnapConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(SnapConfig::default());
    }
    let content = fs::read_to_string(&path)
        .map_err(|err| SnapError::Config(format!("failed to read config: {err}")))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> SnapResult<SnapConfig> {
    toml::from_str(content)
        .map_err(|err| SnapError::Config(format!("failed to parse config: {err}")))
}

pub fn save_config(config: &SnapConfig) -> SnapResult<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| SnapError::Config(format!("failed to create config dir: {err}")))?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|err| SnapError::Config(format!("failed to serialize config: {err}")))?;
    fs::write(&path, content)
        .map_err(|err| SnapError::Config(format!("failed to write config: {err}")))?;
    Ok(())
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

pub fn resolve_user_agent(config: &SnapConfig) -> Option<String> {
    env_value("SNAPSAVE_USER_AGENT").or_else(|| config.http.user_agent.clone())
}

pub fn resolve_timeout_secs(config: &SnapConfig) -> Option<u64> {
    timeout_from(config, env_value("SNAPSAVE_TIMEOUT_SECS"))
}

fn timeout_from(config: &SnapConfig, env: Option<String>) -> Option<u64> {
    env.and_then(|value| value.trim().parse().ok())
        .or(config.http.timeout_secs)
}

pub fn resolve_host(config: &SnapConfig) -> String {
    env_value("SNAPSAVE_HOST")
        .or_else(|| config.server.host.clone())
        .unwrap_or_else(|| DEFAULT_HOST.to_string())
}

pub fn resolve_port(config: &SnapConfig) -> u16 {
    port_from(config, env_value("PORT"))
}

fn port_from(config: &SnapConfig, env: Option<String>) -> u16 {
    env.and_then(|value| value.trim().parse().ok())
        .or(config.server.port)
        .unwrap_or(DEFAULT_PORT)
}

pub fn resolve_pretty_output(config: &SnapConfig) -> Option<bool> {
    pretty_from(config, env_value("SNAPSAVE_OUTPUT_PRETTY"))
}

fn pretty_from(config: &SnapConfig, env: Option<String>) -> Option<bool> {
    if let Some(value) = env {
        let normalized = value.to_lowercase();
        return Some(normalized == "1" || normalized == "true" || normalized == "yes");
    }
    config.output.pretty
}

/// Reads a dotted key such as `server.port`.
pub fn get_config_value(config: &SnapConfig, key_path: &str) -> Option<String> {
    let parts: Vec<&str> = key_path.split('.').collect();
    match parts.as_slice() {
        ["http", "user_agent"] => config.http.user_agent.clone(),
        ["http", "timeout_secs"] => config.http.timeout_secs.map(|v| v.to_string()),
        ["server", "host"] => config.server.host.clone(),
        ["server", "port"] => config.server.port.map(|v| v.to_string()),
        ["output", "pretty"] => config.output.pretty.map(|v| v.to_string()),
        _ => None,
    }
}

pub fn set_config_value(key_path: &str, value: &str) -> SnapResult<()> {
    let path = config_path()?;
    let content = if path.exists() {
        fs::read_to_string(&path)
            .map_err(|err| SnapError::Config(format!("failed to read config: {err}")))?
    } else {
        String::new()
    };

    let updated = apply_value(&content, key_path, value)?;
    parse_config(&updated)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| SnapError::Config(format!("failed to create config dir: {err}")))?;
    }
    fs::write(&path, updated)
        .map_err(|err| SnapError::Config(format!("failed to write config: {err}")))?;

    Ok(())
}

/// Writes `value` under `key_path` in a TOML document, keeping comments and
/// layout. Integers and booleans are stored with their TOML type.
fn apply_value(content: &str, key_path: &str, value: &str) -> SnapResult<String> {
    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .unwrap_or_default();

    let parts: Vec<&str> = key_path.split('.').collect();
    let Some((last_part, tables)) = parts.split_last().filter(|_| parts.len() >= 2) else {
        return Err(SnapError::Config(
            "key path must have at least 2 parts (e.g., 'server.port')".to_string(),
        ));
    };

    let mut current = doc.as_table_mut();
    for part in tables {
        current = current
            .entry(part)
            .or_insert(toml_edit::Item::Table(Default::default()))
            .as_table_mut()
            .ok_or_else(|| {
                SnapError::Config(format!("cannot set nested value in '{}'", key_path))
            })?;
    }

    current[*last_part] = if let Ok(number) = value.parse::<i64>() {
        toml_edit::value(number)
    } else if let Ok(flag) = value.parse::<bool>() {
        toml_edit::value(flag)
    } else {
        toml_edit::value(value)
    };

    Ok(doc.to_string())
}

pub fn open_in_editor() -> SnapResult<()> {
    let path = config_path()?;
    if !path.exists() {
        save_config(&SnapConfig::default())?;
    }

    let editor = env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(target_os = "macos") {
            "vim".to_string()
        } else if cfg!(target_os = "windows") {
            "notepad".to_string()
        } else {
            "nano".to_string()
        }
    });

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .map_err(|err| SnapError::Config(format!("failed to open editor '{}': {}", editor, err)))?;

    if !status.success() {
        return Err(SnapError::Config(format!(
            "editor exited with status: {}",
            status
        )));
    }

    Ok(())
}
