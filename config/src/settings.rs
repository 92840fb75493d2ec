//! Server settings read from the (already merged) process environment.

pub const ENV_ADDR: &str = "VIBE_ADDR";
pub const ENV_EMBEDDING_MODEL: &str = "VIBE_EMBEDDING_MODEL";
pub const ENV_ANCHORS: &str = "VIBE_ANCHORS";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

pub const DEFAULT_ADDR: &str = "127.0.0.1:8787";

/// Settings for `vibe-serve`. Unset or blank variables fall back to defaults.
///
/// - `VIBE_ADDR` (default `127.0.0.1:8787`)
/// - `VIBE_EMBEDDING_MODEL`: embeddings model name (default: the embedder's own)
/// - `VIBE_ANCHORS`: comma-separated anchor labels (default: built-in set)
/// - `OPENAI_API_KEY`: when unset the server embeds offline
/// - `OPENAI_BASE_URL`: OpenAI-compatible endpoint override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeSettings {
    pub addr: String,
    pub embedding_model: Option<String>,
    pub anchors: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
}

impl Default for ServeSettings {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            embedding_model: None,
            anchors: None,
            openai_api_key: None,
            openai_base_url: None,
        }
    }
}

impl ServeSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup (the environment, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let default = Self::default();
        Self {
            addr: get(ENV_ADDR).unwrap_or(default.addr),
            embedding_model: get(ENV_EMBEDDING_MODEL),
            anchors: get(ENV_ANCHORS),
            openai_api_key: get(ENV_OPENAI_API_KEY),
            openai_base_url: get(ENV_OPENAI_BASE_URL),
        }
    }
}
