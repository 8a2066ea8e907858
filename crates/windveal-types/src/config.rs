//! Application configuration, deserialized from `windveal.toml`.
//!
//! Every section is optional. An empty file yields the same configuration as
//! no file at all.

use serde::{Deserialize, Serialize};

use crate::llm::{FallbackChainConfig, ProviderConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub persona: PersonaConfig,
    pub chat: ChatConfig,
    /// Providers in priority order.
    pub providers: Vec<ProviderConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            persona: PersonaConfig::default(),
            chat: ChatConfig::default(),
            providers: FallbackChainConfig::default().providers,
        }
    }
}

impl AppConfig {
    /// The slice of configuration the fallback chain is built from.
    pub fn chain_config(&self) -> FallbackChainConfig {
        FallbackChainConfig {
            providers: self.providers.clone(),
            attempt_timeout_secs: self.chat.attempt_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the built browser client. Not served when absent.
    pub web_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            web_dir: "web/dist".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection URL. `None` means `WINDVEAL_DATA_DIR/windveal.db`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    pub path: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            path: "data/persona.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Upper bound on a single provider attempt, in seconds.
    pub attempt_timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_secs: FallbackChainConfig::default().attempt_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ProviderKind;

    #[test]
    fn test_empty_file_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.providers.len(), 3);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [chat]
            attempt_timeout_secs = 12

            [[providers]]
            kind = "openai"
            base_url = "http://localhost:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        let chain = config.chain_config();
        assert_eq!(chain.attempt_timeout_secs, 12);
        assert_eq!(chain.providers.len(), 1);
        assert_eq!(chain.providers[0].kind, ProviderKind::OpenAi);
    }
}
