//! Configuration loading and management.

use std::fmt;
use std::num::{NonZeroU64, NonZeroUsize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use sb_core::SessionConfig;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON-RPC endpoint of the chain node.
    pub rpc_url: String,

    /// Address of the staking contract.
    pub contract_address: String,

    /// Staker addresses requested per contract page.
    pub fetch_page_size: NonZeroU64,

    /// Stakers shown per result page.
    pub page_size: NonZeroUsize,

    /// Timeout for a single RPC request.
    pub request_timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("contract_address", &self.contract_address)
            .field("fetch_page_size", &self.fetch_page_size)
            .field("page_size", &self.page_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let defaults = SessionConfig::default();
        Self {
            rpc_url: "https://api.roninchain.com/rpc".to_string(),
            contract_address: "0xfb597d6fa6c08f5434e6ecf69114497343ae13dd".to_string(),
            fetch_page_size: defaults.fetch_page_size,
            page_size: defaults.page_size,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Zero page sizes fail extraction.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // SB_RPC_URL, SB_PAGE_SIZE, ...
        figment = figment.merge(Env::prefixed("SB_"));

        figment.extract()
    }

    pub const fn session_config(&self) -> SessionConfig {
        SessionConfig {
            fetch_page_size: self.fetch_page_size,
            page_size: self.page_size,
        }
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Returns the platform-specific config directory for sb.
///
/// On Linux: `~/.config/stakeboard`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("stakeboard"))
}
