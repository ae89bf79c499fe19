//! Portal configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/cess-portal/portal.toml`
//! - Windows: `%APPDATA%/cess-portal/portal.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use portal_client::ClientConfig;

/// Portal configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub chain: ChainSection,

    #[serde(default)]
    pub paths: PathsSection,
}

/// Chain gateway and account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSection {
    /// JSON-RPC endpoint of the chain gateway.
    #[serde(default = "default_rpc_addr")]
    pub rpc_addr: String,

    /// Account that owns uploaded files.
    #[serde(default)]
    pub account_address: String,
}

/// Local directories. A leading `~` is expanded to the home directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsSection {
    /// Where downloads are written.
    #[serde(default = "default_install_dir")]
    pub install_dir: String,

    /// Where encryption passphrases are kept.
    #[serde(default = "default_key_dir")]
    pub key_dir: String,
}

fn default_rpc_addr() -> String {
    "http://127.0.0.1:9933".into()
}

fn default_install_dir() -> String {
    "~/.local/share/cess-portal/files".into()
}

fn default_key_dir() -> String {
    "~/.local/share/cess-portal/keys".into()
}

impl Default for ChainSection {
    fn default() -> Self {
        Self {
            rpc_addr: default_rpc_addr(),
            account_address: String::new(),
        }
    }
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            install_dir: default_install_dir(),
            key_dir: default_key_dir(),
        }
    }
}

impl PortalConfig {
    /// Loads configuration from `path` (or the platform default), writing
    /// the defaults there first if the file does not exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: PortalConfig = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "configuration loaded");
            Ok(config)
        } else {
            let config = PortalConfig::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Restrict permissions on Unix (holds the account address).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Builds the runtime settings for the client flows.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(
            expand_home(&self.paths.install_dir),
            expand_home(&self.paths.key_dir),
            self.chain.account_address.clone(),
        )
    }
}

/// Expands a leading `~` to the user's home directory.
fn expand_home(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return PathBuf::from(raw),
    };
    match home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(raw),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cess-portal")
            .join("portal.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("cess-portal").join("portal.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/cess-portal/portal.toml"))
    }
}
