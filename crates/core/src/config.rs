use crate::error::ConfigError;

pub const DEFAULT_INDEX_NAME: &str = "medicalchatbot";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Connection settings for the Pinecone index.
#[derive(Debug, Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    pub cloud: String,
    pub region: String,
}

impl PineconeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: require(&lookup, "PINECONE_API_KEY")?,
            index_name: optional(&lookup, "PINECONE_INDEX", DEFAULT_INDEX_NAME),
            cloud: optional(&lookup, "PINECONE_CLOUD", "aws"),
            region: optional(&lookup, "PINECONE_REGION", "us-east-1"),
        })
    }
}

/// Connection settings for the Gemini chat-completion API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

impl GeminiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: require(&lookup, "GEMINI_API_KEY")?,
            model: optional(&lookup, "GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
        })
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, ConfigError> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError(name.to_string()))
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::{GeminiConfig, PineconeConfig};

    #[test]
    fn pinecone_config_requires_api_key() {
        let missing = PineconeConfig::from_lookup(|_| None);
        assert!(missing.is_err());
    }

    #[test]
    fn pinecone_config_applies_defaults() {
        let config = PineconeConfig::from_lookup(|name| {
            if name == "PINECONE_API_KEY" {
                Some("key".to_string())
            } else {
                None
            }
        })
        .expect("api key is present");

        assert_eq!(config.index_name, "medicalchatbot");
        assert_eq!(config.cloud, "aws");
        assert_eq!(config.region, "us-east-1");
    }

    #[test]
    fn blank_values_count_as_missing() {
        let blank = GeminiConfig::from_lookup(|name| {
            if name == "GEMINI_API_KEY" {
                Some("   ".to_string())
            } else {
                None
            }
        });
        assert!(blank.is_err());
    }

    #[test]
    fn gemini_model_is_overridable() {
        let config = GeminiConfig::from_lookup(|name| match name {
            "GEMINI_API_KEY" => Some("key".to_string()),
            "GEMINI_MODEL" => Some("gemini-2.0-pro".to_string()),
            _ => None,
        })
        .expect("api key is present");
        assert_eq!(config.model, "gemini-2.0-pro");
    }
}
