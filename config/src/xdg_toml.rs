//! Reads `$XDG_CONFIG_HOME/<app>/config.toml`.
//!
//! ```toml
//! [env]
//! OPENAI_API_KEY = "sk-..."
//!
//! [anchors]
//! labels = ["cozy", "chaotic", "dreamy"]
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::LoadError;

/// `$XDG_CONFIG_HOME` when set, else the platform config dir.
fn config_home() -> Result<PathBuf, LoadError> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir().ok_or_else(|| LoadError::XdgPath("no config directory".to_string()))
}

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, String>,
    #[serde(default)]
    anchors: AnchorsSection,
}

#[derive(serde::Deserialize, Default)]
struct AnchorsSection {
    #[serde(default)]
    labels: Vec<String>,
}

/// Env pairs from `[env]`, plus `VIBE_ANCHORS` built from `[anchors] labels` when that list
/// is non-empty and `[env]` does not already set it. Missing file gives an empty map.
pub fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let path = config_home()?.join(app_name).join("config.toml");
    if !path.is_file() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    let file: ConfigFile = toml::from_str(&content)?;

    let mut env = file.env;
    if !file.anchors.labels.is_empty() {
        env.entry(crate::settings::ENV_ANCHORS.to_string())
            .or_insert_with(|| file.anchors.labels.join(","));
    }
    Ok(env)
}
