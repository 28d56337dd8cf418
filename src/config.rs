//! Cleanup heuristics as configuration.
//!
//! The extraction rules are tuned to one site layout: an `<article>`
//! content region, media wrapped in `photo__img`-classed containers, and
//! inline "Baca Juga" (see-also) prompts. Those site-specific values are
//! deliberately data rather than code so a second source site only needs
//! a different YAML file, not a rebuild.

use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::error::ConfigError;

/// Site-specific extraction heuristics plus fetch settings.
///
/// Loaded from YAML with [`load_config`]; every field has a default tuned
/// to the supported source site, so a partial (or absent) file is fine.
///
/// ```yaml
/// see_also_phrase: "Baca Juga:"
/// media_class_token: photo__img
/// strip_tags: [div, a, center, script]
/// request_timeout_secs: 30
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Element types removed wholesale from the article region.
    pub strip_tags: Vec<String>,

    /// Lead-in text of inline "related stories" prompts. Removed together
    /// with everything up to the next line break, plus any dangling
    /// bold-wrapped label.
    pub see_also_phrase: String,

    /// Class-attribute token marking the media region images are read
    /// from. Matched as a substring, not exact equality.
    pub media_class_token: String,

    /// Upper bound on a single page fetch, in seconds.
    pub request_timeout_secs: u64,

    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            strip_tags: ["div", "a", "center", "script"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            see_also_phrase: "Baca Juga:".to_string(),
            media_class_token: "photo__img".to_string(),
            request_timeout_secs: 30,
            user_agent: concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            )
            .to_string(),
        }
    }
}

impl ScrapeConfig {
    /// The fetch timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Load a [`ScrapeConfig`] from a YAML file.
///
/// Unspecified fields fall back to the tuned defaults.
pub fn load_config(path: &str) -> Result<ScrapeConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    let config: ScrapeConfig =
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })?;
    info!(path, "Loaded scrape configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuned_site() {
        let config = ScrapeConfig::default();
        assert_eq!(config.strip_tags, vec!["div", "a", "center", "script"]);
        assert_eq!(config.see_also_phrase, "Baca Juga:");
        assert_eq!(config.media_class_token, "photo__img");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: ScrapeConfig =
            serde_yaml::from_str("see_also_phrase: \"Lihat Juga:\"").unwrap();
        assert_eq!(config.see_also_phrase, "Lihat Juga:");
        assert_eq!(config.media_class_token, "photo__img");
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
strip_tags: [div, script]
see_also_phrase: "Read More:"
media_class_token: gallery__item
request_timeout_secs: 10
user_agent: test-agent/1.0
"#;
        let config: ScrapeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.strip_tags, vec!["div", "script"]);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }
}
