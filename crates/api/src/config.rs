use crate::auth::jwt::AuthConfig;

/// Default base URL of the client portal.
const DEFAULT_PORTAL_BASE_URL: &str = "https://client.trymarro.com";

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL client portal links are built from.
    pub portal_base_url: String,
    /// Bearer token verification settings.
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                       |
    /// |------------------------|-------------------------------|
    /// | `HOST`                 | `0.0.0.0`                     |
    /// | `PORT`                 | `3000`                        |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                          |
    /// | `PORTAL_BASE_URL`      | `https://client.trymarro.com` |
    ///
    /// See [`AuthConfig::from_env`] for the JWT variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let portal_base_url = std::env::var("PORTAL_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_PORTAL_BASE_URL.into());

        let auth = AuthConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            portal_base_url,
            auth,
        }
    }
}
