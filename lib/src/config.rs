//! Chain endpoint and contract accounts, loaded from a TOML file.

use crate::name::Name;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8888";

/// Per-deployment settings. Contract accounts differ between staging,
/// demo and production chains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    pub contracts: Contracts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contracts {
    pub community: Name,
    pub token: Name,
    #[serde(default = "default_msig")]
    pub msig: Name,
    #[serde(default = "default_system")]
    pub system: Name,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn builtin(name: &'static str) -> Name {
    Name::new_unchecked(name.to_string())
}

fn default_msig() -> Name {
    builtin("eosio.msig")
}

fn default_system() -> Name {
    builtin("eosio")
}

impl Default for Contracts {
    fn default() -> Self {
        Self {
            community: builtin("cambiatus.cm"),
            token: builtin("cambiatus.tk"),
            msig: default_msig(),
            system: default_system(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            contracts: Contracts::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.rpc_url.is_empty() {
            anyhow::bail!("rpc_url cannot be empty");
        }
        Ok(config)
    }
}
