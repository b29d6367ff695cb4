//! Init command implementation
//!
//! Scaffolds a Satchel deployment: `satchel.toml`, `.env.example` and the
//! `data/` directory for the SQLite file.

use super::output::Output;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug, PartialEq, Eq)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (satchel.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing Satchel");

    let base_path = &config.path;

    let config_path = base_path.join("satchel.toml");
    if config_path.exists() && !config.force {
        output.warning("satchel.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let data_dir = base_path.join("data");
    if let Err(e) = fs::create_dir_all(&data_dir) {
        output.error(&format!("Failed to create data/: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("directory", "data");

    if let Err(e) = write_file(&config_path, &generate_satchel_toml(&config), true) {
        output.error(&format!("Failed to write satchel.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", "satchel.toml");

    let env_path = base_path.join(".env.example");
    match write_file(&env_path, ENV_EXAMPLE, config.force) {
        Ok(true) => output.created("env", ".env.example"),
        Ok(false) => output.skipped(".env.example", "already exists"),
        Err(e) => output.warning(&format!("Failed to write .env.example: {}", e)),
    }

    output.complete("Satchel is ready");
    output.hint("Copy .env.example to .env and set a long random secret, then start:");
    output.command("satchel-server");

    InitResult::Success
}

const ENV_EXAMPLE: &str = "# Secret used to sign session tokens. Use at least 32 random characters.\n\
SATCHEL_JWT_SECRET=change-me-to-a-long-random-string\n";

/// Renders the starter `satchel.toml`.
pub fn generate_satchel_toml(config: &InitConfig) -> String {
    format!(
        r#"# Satchel configuration

[server]
host = "{host}"
port = {port}
log_level = "info"

[auth]
# Name of the environment variable holding the token signing secret
jwt_secret_env = "SATCHEL_JWT_SECRET"

[database]
# SQLite file path, or ":memory:" for an ephemeral database
url = "./data/satchel.db"

[cart]
# "per-user-lock" serializes cart updates per account.
# "unguarded" allows concurrent updates for one account to overwrite each other.
update_policy = "per-user-lock"
"#,
        host = config.host,
        port = config.port,
    )
}

/// Writes `content` to `path`. Returns `Ok(false)` when the file exists and
/// `overwrite` is off.
fn write_file(path: &Path, content: &str, overwrite: bool) -> std::io::Result<bool> {
    if path.exists() && !overwrite {
        return Ok(false);
    }
    fs::write(path, content)?;
    Ok(true)
}
