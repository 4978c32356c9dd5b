/// Extension settings compiled in from `extension.toml`
use serde::{Deserialize, Serialize};

const BUNDLED_CONFIG: &str = include_str!("../extension.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Hostname suffixes where the page action may be shown
    pub supported_hosts: Vec<String>,
    /// MediaWiki namespaces whose pages can be saved
    pub supported_namespaces: Vec<i64>,
    /// CSRF token value that means the session is logged out
    pub anonymous_token: String,
    pub fallback_language: String,
    pub default_max_entries_per_list: u64,
    pub learn_more_url: String,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        ExtensionConfig {
            supported_hosts: vec!["wikipedia.org".to_string(), "wikivoyage.org".to_string()],
            supported_namespaces: vec![0],
            anonymous_token: "+\\".to_string(),
            fallback_language: "en".to_string(),
            default_max_entries_per_list: 5000,
            learn_more_url: "https://www.mediawiki.org/wiki/Wikimedia_Apps/Synced_Reading_Lists"
                .to_string(),
        }
    }
}

impl ExtensionConfig {
    /// Parse settings, defaulting any field the document leaves out
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Settings shipped with the extension package
    pub fn bundled() -> Self {
        match Self::from_toml_str(BUNDLED_CONFIG) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("bundled extension.toml is invalid, using defaults: {}", e);
                Self::default()
            }
        }
    }
}
