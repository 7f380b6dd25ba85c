use std::env;

/// Runtime settings loaded from the environment (and `.env` in development).
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_address: String,
    /// Base URL under which photo blobs are publicly reachable
    pub public_base_url: String,
    /// Directory for locally stored photo blobs
    pub media_root: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
}

impl AppSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://ocorrencias.db?mode=rwc".to_string());
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;
        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let public_base_url =
            env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            bind_address,
            public_base_url,
            media_root,
        })
    }
}
