use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "config/splitta.toml";

/// Client settings.
///
/// Sources, later ones winning: defaults, the TOML file, `SPLITTA_*`
/// environment variables. The binary applies CLI overrides on top.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the accounting service, including the API prefix.
    pub base_url: String,
    /// Bearer token of the signed-in user.
    pub token: Option<String>,
    /// Items requested per page by feed loaders.
    pub page_size: u64,
    /// Distance in pixels below the viewport at which a sentinel already
    /// counts as visible.
    pub prefetch_margin: f64,
    /// Fraction of the sentinel that must intersect the extended viewport.
    pub threshold: f64,
    /// Log level used by the binary's subscriber.
    pub level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api/v1".to_string(),
            token: None,
            page_size: 20,
            prefetch_margin: 100.0,
            threshold: 0.1,
            level: "info".to_string(),
        }
    }
}

/// Loads the configuration from `path` (or [`DEFAULT_CONFIG_PATH`]) and the
/// environment. A missing file is not an error.
pub fn load(path: Option<&str>) -> Result<ClientConfig> {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    let settings = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(config::Environment::with_prefix("SPLITTA").try_parsing(true))
        .build()?
        .try_deserialize()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("splitta-missing-{}", uuid::Uuid::new_v4()));
        let settings = load(path.to_str()).unwrap();
        assert_eq!(settings.page_size, 20);
        assert_eq!(settings.prefetch_margin, 100.0);
        assert_eq!(settings.token, None);
    }

    #[test]
    fn file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("splitta-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "base_url = \"https://ledger.example/api/v1\"\npage_size = 10\ntoken = \"abc\"\n",
        )
        .unwrap();

        let settings = load(path.to_str()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.base_url, "https://ledger.example/api/v1");
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.token.as_deref(), Some("abc"));
        assert_eq!(settings.threshold, 0.1);
    }
}
