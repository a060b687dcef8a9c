use std::env;
use std::fmt;

pub const API_KEY_ENV: &str = "RIOT_API_KEY";
pub const REGION_ENV: &str = "RIOT_REGION";
pub const DEFAULT_REGION: &str = "americas";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("RIOT_API_KEY is not set (export it or add it to a .env file)")]
    MissingApiKey,
}

/// Connection settings for the Riot API, built once per process and handed
/// to [`crate::riot_api::RiotClient::new`].
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    api_key: String,
    base_url: String,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>, region: &str) -> Self {
        Self::with_base_url(api_key, format!("https://{}.api.riotgames.com", region))
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();

        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads the key from `RIOT_API_KEY`. The region falls back to
    /// `RIOT_REGION` and then to [`DEFAULT_REGION`].
    pub fn from_env(region: Option<&str>) -> Result<Self, ConfigError> {
        Self::from_lookup(region, |name| env::var(name).ok())
    }

    fn from_lookup<F>(region: Option<&str>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let region = match region {
            Some(region) => region.to_string(),
            None => lookup(REGION_ENV)
                .map(|r| r.trim().to_lowercase())
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        };

        Ok(Self::new(api_key, &region))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn region_builds_riot_host() {
        let config = ApiConfig::new("key", "europe");
        assert_eq!(config.base_url(), "https://europe.api.riotgames.com");
    }

    #[test]
    fn explicit_base_url_is_trimmed() {
        let config = ApiConfig::with_base_url("key", "http://127.0.0.1:8080/");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn missing_key_is_reported() {
        let err = ApiConfig::from_lookup(None, lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);

        let err = ApiConfig::from_lookup(None, lookup_from(&[(API_KEY_ENV, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
    }

    #[test]
    fn region_resolution_order() {
        let config = ApiConfig::from_lookup(None, lookup_from(&[(API_KEY_ENV, "RGAPI-1")])).unwrap();
        assert_eq!(config.base_url(), "https://americas.api.riotgames.com");
        assert_eq!(config.api_key(), "RGAPI-1");

        let vars = [(API_KEY_ENV, "RGAPI-1"), (REGION_ENV, "ASIA")];
        let config = ApiConfig::from_lookup(None, lookup_from(&vars)).unwrap();
        assert_eq!(config.base_url(), "https://asia.api.riotgames.com");

        let config = ApiConfig::from_lookup(Some("sea"), lookup_from(&vars)).unwrap();
        assert_eq!(config.base_url(), "https://sea.api.riotgames.com");
    }

    #[test]
    fn debug_hides_api_key() {
        let config = ApiConfig::new("RGAPI-secret", "europe");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("RGAPI-secret"));
        assert!(rendered.contains("europe"));
    }
}
