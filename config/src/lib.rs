//! Configuration for the vibe service.
//!
//! [`load_and_apply`] merges XDG `config.toml` and the project `.env` into the process
//! environment with priority **existing env > .env > XDG**. [`ServeSettings::from_env`]
//! then reads the server's settings from that environment.
//!
//! With the `tracing-init` feature, [`init_tracing`] installs the shared subscriber used by
//! binaries (`RUST_LOG` filter, optional `LOG_FILE`).

mod dotenv;
mod settings;
#[cfg(feature = "tracing-init")]
mod tracing_init;
mod xdg_toml;

pub use settings::{
    ServeSettings, DEFAULT_ADDR, ENV_ADDR, ENV_ANCHORS, ENV_EMBEDDING_MODEL, ENV_OPENAI_API_KEY,
    ENV_OPENAI_BASE_URL,
};
#[cfg(feature = "tracing-init")]
pub use tracing_init::{init_tracing, TracingGuard};

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    Dotenv(#[from] ::dotenv::Error),
}

/// Loads `$XDG_CONFIG_HOME/<app_name>/config.toml` and `.env` (from `override_dir`, else the
/// current directory) and sets every key that is **not** already in the environment.
///
/// Returns the keys that were set.
pub fn load_and_apply(
    app_name: &str,
    override_dir: Option<&Path>,
) -> Result<Vec<String>, LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = dotenv::load_env_map(override_dir)?;

    let keys: HashSet<&String> = xdg_map.keys().chain(dotenv_map.keys()).collect();
    let mut applied = Vec::new();
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        if let Some(value) = dotenv_map.get(key).or_else(|| xdg_map.get(key)) {
            std::env::set_var(key, value);
            applied.push(key.clone());
        }
    }
    applied.sort();
    Ok(applied)
}

/// Serializes tests that mutate process-wide environment variables.
#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
