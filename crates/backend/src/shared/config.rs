use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DataConfig {
    /// Path to the monthly sales JSON feed; empty means the embedded sample
    #[serde(default)]
    pub path: String,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[data]
path = ""
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                return load_config_from(&config_path);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

/// Get the sales feed path from configuration, `None` for the embedded sample.
/// Resolves relative paths relative to the executable directory
pub fn get_data_path(config: &Config) -> Option<PathBuf> {
    let data_path_str = config.data.path.trim();
    if data_path_str.is_empty() {
        return None;
    }

    let data_path = Path::new(data_path_str);
    if data_path.is_absolute() {
        return Some(data_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Some(exe_dir.join(data_path));
        }
    }

    // Fallback: use relative to current directory
    Some(PathBuf::from(data_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(get_data_path(&config).is_none());
    }

    #[test]
    fn test_data_section_is_optional() {
        let config: Config = toml::from_str("[server]\nhost = \"127.0.0.1\"\nport = 8080\n").unwrap();
        assert!(config.data.path.is_empty());
    }

    #[test]
    fn test_absolute_data_path_kept() {
        let dir = tempfile::tempdir().unwrap();
        let feed = dir.path().join("feed.json");
        let config: Config = toml::from_str(&format!(
            "[server]\nhost = \"0.0.0.0\"\nport = 3000\n[data]\npath = {:?}\n",
            feed.display().to_string()
        ))
        .unwrap();
        assert_eq!(get_data_path(&config), Some(feed));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nhost = \"127.0.0.1\"\nport = 4000\n").unwrap();
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
    }
}
