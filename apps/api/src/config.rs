use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    /// Header carrying the verified user id, set by the upstream session layer.
    pub auth_user_header: String,
    pub run_migrations: bool,
    pub port: u16,
    pub rust_log: String,
}

pub const DEFAULT_LLM_MODEL: &str = "claude-sonnet-4-5";
pub const DEFAULT_AUTH_USER_HEADER: &str = "x-user-id";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS")
                .unwrap_or_else(|_| "4096".to_string())
                .parse::<u32>()
                .context("LLM_MAX_TOKENS must be a positive integer")?,
            auth_user_header: std::env::var("AUTH_USER_HEADER")
                .unwrap_or_else(|_| DEFAULT_AUTH_USER_HEADER.to_string())
                .to_ascii_lowercase(),
            run_migrations: parse_flag(std::env::var("RUN_MIGRATIONS").ok().as_deref(), true)
                .context("RUN_MIGRATIONS must be true or false")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

#[cfg(test)]
impl Config {
    /// Minimal configuration for router tests; nothing here is dialled.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/applyai_test".into(),
            anthropic_api_key: "test-key".into(),
            llm_model: DEFAULT_LLM_MODEL.into(),
            llm_max_tokens: 256,
            auth_user_header: DEFAULT_AUTH_USER_HEADER.into(),
            run_migrations: false,
            port: 0,
            rust_log: "debug".into(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_flag(value: Option<&str>, default: bool) -> Result<bool> {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if v.is_empty() => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => anyhow::bail!("unrecognised boolean '{other}'"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_defaults_when_unset() {
        assert!(parse_flag(None, true).unwrap());
        assert!(!parse_flag(Some(""), false).unwrap());
    }

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        assert!(parse_flag(Some("TRUE"), false).unwrap());
        assert!(parse_flag(Some("1"), false).unwrap());
        assert!(!parse_flag(Some("off"), true).unwrap());
    }

    #[test]
    fn test_parse_flag_rejects_garbage() {
        assert!(parse_flag(Some("maybe"), true).is_err());
    }
}
