use crate::adapter::AtomSpaceMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub host: String,
    pub port: u16,
    pub atomspace_mode: AtomSpaceMode,
    pub atomspace_url: Option<String>,
    pub cognition_mode: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7807,
            atomspace_mode: AtomSpaceMode::Mock,
            atomspace_url: None,
            cognition_mode: "default".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Apply environment overrides: HOST, PORT, ATOMSPACE_MODE,
    /// ATOMSPACE_URL, FOURE_MODE.
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(host) = std::env::var("HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid PORT value: {port}"))?;
        }
        if let Ok(mode) = std::env::var("ATOMSPACE_MODE") {
            self.atomspace_mode = mode
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid ATOMSPACE_MODE value: {mode}"))?;
        }
        if let Ok(url) = std::env::var("ATOMSPACE_URL") {
            self.atomspace_url = Some(url);
        }
        if let Ok(mode) = std::env::var("FOURE_MODE") {
            self.cognition_mode = mode;
        }
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("atombridge.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<BridgeConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: BridgeConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &BridgeConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
