use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Anthropic API key, only needed to produce recommendations
    #[serde(default)]
    pub anthropic_api_key: String,

    /// Anthropic messages API base URL
    #[serde(default = "default_anthropic_api_url")]
    pub anthropic_api_url: String,

    /// Model used to generate recommendations
    #[serde(default = "default_model")]
    pub model: String,

    /// Response token cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Prompt template holding the `[SYSTEM]` and `[USER WATCH PROFILE]` sections
    #[serde(default = "default_prompt_path")]
    pub prompt_path: PathBuf,

    /// Directory holding recommendation batches and evaluation snapshots
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_anthropic_api_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_prompt_path() -> PathBuf {
    PathBuf::from("prompts/recommend.txt")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_vars(Vec::new()).unwrap();
        assert!(config.anthropic_api_key.is_empty());
        assert_eq!(config.anthropic_api_url, "https://api.anthropic.com");
        assert_eq!(config.model, "claude-sonnet-4-20250514");
        assert_eq!(config.max_tokens, 1000);
        assert_eq!(config.prompt_path, PathBuf::from("prompts/recommend.txt"));
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn test_overrides() {
        let vars = vec![
            ("ANTHROPIC_API_KEY".to_string(), "sk-test".to_string()),
            ("MAX_TOKENS".to_string(), "2048".to_string()),
            ("OUTPUT_DIR".to_string(), "/tmp/runs".to_string()),
        ];
        let config = Config::from_vars(vars).unwrap();
        assert_eq!(config.anthropic_api_key, "sk-test");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/runs"));
    }

    #[test]
    fn test_invalid_number_is_error() {
        let vars = vec![("MAX_TOKENS".to_string(), "lots".to_string())];
        let err = Config::from_vars(vars).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load config"));
    }
}
