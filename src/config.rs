// src/config.rs
// Every knob loads from the environment with a usable default. The struct is
// passed by value into the clients so tests can substitute endpoints.

use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // ── Completion backend
    pub api_key: String,
    pub api_base_url: String,
    pub model: String,
    pub stream: bool,
    pub timeout_secs: u64,
    pub proxy: Option<String>,

    // ── Problem catalog
    pub fetch_problems: bool,
    pub max_candidates: usize,
    pub leetcode_url: String,
    pub leetcode_cn_url: String,

    // ── Logging
    pub debug: bool,
}

// Tolerates inline comments and stray whitespace in the value.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean = val.split('#').next().unwrap_or("").trim();
            match clean.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    tracing::warn!("config: {} = {:?} failed to parse, using default", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://api.openai.com".into(),
            model: "gpt-4o-mini".into(),
            stream: true,
            timeout_secs: 60,
            proxy: None,
            fetch_problems: true,
            max_candidates: 3,
            leetcode_url: "https://leetcode.com/graphql".into(),
            leetcode_cn_url: "https://leetcode.cn/graphql".into(),
            debug: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        // A missing .env file is not an error, just fall through to the
        // process environment.
        let _ = dotenvy::dotenv();

        let base = Config::default();
        Self {
            api_key: env_var_or("OPENAI_API_KEY", base.api_key),
            api_base_url: env_var_or("OPENAI_BASE_URL", base.api_base_url),
            model: env_var_or("LEETCOACH_MODEL", base.model),
            stream: env_var_or("LEETCOACH_STREAM", base.stream),
            timeout_secs: env_var_or("LEETCOACH_TIMEOUT_SECS", base.timeout_secs),
            proxy: std::env::var("LEETCOACH_PROXY")
                .ok()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            fetch_problems: env_var_or("LEETCOACH_FETCH_PROBLEMS", base.fetch_problems),
            max_candidates: env_var_or("LEETCOACH_MAX_CANDIDATES", base.max_candidates),
            leetcode_url: env_var_or("LEETCOACH_LEETCODE_URL", base.leetcode_url),
            leetcode_cn_url: env_var_or("LEETCOACH_LEETCODE_CN_URL", base.leetcode_cn_url),
            debug: env_var_or("LEETCOACH_DEBUG", base.debug),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "https://api.openai.com");
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.stream);
        assert!(config.fetch_problems);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_candidates, 3);
        assert!(!config.debug);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn timeout_converts_to_duration() {
        let config = Config {
            timeout_secs: 5,
            ..Config::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }
}
