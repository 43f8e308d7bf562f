use std::env;
use tracing::warn;

pub const DEFAULT_DATABASE_URL: &str = "memory://";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub database_api_key: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub server_port: u16,
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_name: "clinica".to_string(),
            database_api_key: String::new(),
            jwt_secret: String::new(),
            token_ttl_hours: 24,
            server_port: 3000,
            google_api_key: String::new(),
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_URL not set, using in-memory store");
                    defaults.database_url
                }),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_NAME not set, using default");
                    defaults.database_name
                }),
            database_api_key: env::var("DATABASE_API_KEY")
                .unwrap_or_default(),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            token_ttl_hours: env::var("JWT_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.token_ttl_hours),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            google_api_key: env::var("GOOGLE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("GOOGLE_API_KEY not set, assistant disabled");
                    String::new()
                }),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or(defaults.gemini_model),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or(defaults.gemini_base_url),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
            && !self.database_url.is_empty()
            && !self.database_name.is_empty()
    }

    pub fn is_assistant_configured(&self) -> bool {
        !self.google_api_key.is_empty()
            && !self.gemini_model.is_empty()
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with("memory://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_memory_store() {
        let config = AppConfig::default();
        assert!(config.uses_memory_store());
        assert_eq!(config.token_ttl_hours, 24);
        assert!(!config.is_configured());
    }

    #[test]
    fn secret_makes_config_complete() {
        let config = AppConfig {
            jwt_secret: "secret".to_string(),
            ..AppConfig::default()
        };
        assert!(config.is_configured());
        assert!(!config.is_assistant_configured());
    }
}
