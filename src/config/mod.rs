mod settings;

pub use settings::{ApiSettings, Config, ReportSettings, TOKEN_ENV};

use crate::error::{DebtorsError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG, falling back to ~/.debtors/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "debtors") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = std::env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
        DebtorsError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".debtors"))
}

pub fn config_file(config_dir: &Path) -> PathBuf {
    config_dir.join("config.toml")
}

/// Load config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    if !config_dir.exists() {
        return Err(DebtorsError::ConfigNotFound(config_dir.to_path_buf()));
    }
    let path = config_file(config_dir);
    if !path.exists() {
        return Err(DebtorsError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| DebtorsError::ConfigParse { path, source: e })
}

/// Load config.toml, or fall back to defaults when it does not exist.
/// A config file that exists but does not parse is still an error.
pub fn load_config_or_default(config_dir: &Path) -> Result<Config> {
    if config_file(config_dir).exists() {
        load_config(config_dir)
    } else {
        tracing::debug!(dir = %config_dir.display(), "no config file, using defaults");
        Ok(Config::default())
    }
}

/// Create the config directory with a template config.toml
pub fn init_config(config_dir: &Path) -> Result<PathBuf> {
    if config_dir.exists() {
        return Err(DebtorsError::AlreadyInitialized(config_dir.to_path_buf()));
    }
    fs::create_dir_all(config_dir)?;
    let path = config_file(config_dir);
    fs::write(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
base_url = "http://localhost:3000/api"
sales_path = "ventas"        # GET {base_url}/{sales_path} returns the sales list
clients_path = "clientes"    # GET {base_url}/{clients_path}/{id} returns one client
timeout_secs = 10
# token = "..."              # or set DEBTORS_API_TOKEN

[report]
currency_symbol = "$"
epsilon = 0.01               # balances at or below this count as paid
"#;
