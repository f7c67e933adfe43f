use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::http::parser::DEFAULT_MAX_HEADER_BYTES;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 1773;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Tcp,
    Udp,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub transport: Transport,
    pub max_header_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            transport: Transport::Tcp,
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    /// Directory exposed to clients. Read-only for the life of the process.
    pub root_dir: PathBuf,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            root_dir: default_root_dir(),
            verbose: false,
        }
    }
}

impl Config {
    /// Defaults, overlaid by the YAML file at `path` when one is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Creates the root directory if needed and replaces it with its canonical absolute form.
    pub fn prepare_root(&mut self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.root_dir)
            .with_context(|| format!("failed to create root directory {}", self.root_dir.display()))?;
        self.root_dir = self
            .root_dir
            .canonicalize()
            .with_context(|| format!("failed to resolve root directory {}", self.root_dir.display()))?;

        if !self.root_dir.is_dir() {
            anyhow::bail!("root path is not a directory: {}", self.root_dir.display());
        }
        Ok(())
    }
}

/// `shared` next to the running executable.
fn default_root_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("shared")))
        .unwrap_or_else(|| PathBuf::from("shared"))
}
