/// Configuration management for the server
///
/// Configuration is loaded from environment variables (a `.env` file is
/// honored in development).
///
/// # Environment Variables
///
/// - `BIND_HOST`: host to bind to (default: 127.0.0.1)
/// - `BIND_PORT`: port to bind to (default: 8080)
/// - `DATABASE_PATH`: SQLite database file (default: data.db)
/// - `SECRET_KEY`: signs session cookies and reset tokens (required)
/// - `BASE_URL`: public URL used in reset links (default: http://localhost:8080)
/// - `SESSION_TTL_SECS`: session cookie lifetime (default: 7 days)
/// - `RESET_TOKEN_TTL_SECS`: reset token window (default: 1800)
/// - `SMTP_HOST`, `SMTP_PORT`, `SMTP_TLS`, `SMTP_USERNAME`,
///   `SMTP_PASSWORD`, `MAIL_FROM`: optional mail transport; without
///   `SMTP_HOST` outbound mail is logged instead of sent

use std::env;
use uzduotys_shared::{db::pool::DatabaseConfig, mail::SmtpConfig};

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Secret for session and reset-token signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret_key: String,

    /// Public base URL embedded in password-reset links
    pub base_url: String,

    /// Session cookie lifetime in seconds
    pub session_ttl_secs: i64,

    /// Password-reset token validity window in seconds
    pub reset_token_ttl_secs: i64,

    /// Optional SMTP transport; `None` selects the logging mailer
    pub smtp: Option<SmtpConfig>,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `SECRET_KEY` is missing or too short, or if
    /// a numeric variable has an invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("BIND_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("BIND_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let database_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "data.db".to_string());
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()?;

        let secret_key = env::var("SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("SECRET_KEY environment variable is required"))?;
        if secret_key.len() < 32 {
            anyhow::bail!("SECRET_KEY must be at least 32 characters long");
        }

        let base_url = env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

        let session_ttl_secs = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| (7 * 24 * 3600).to_string())
            .parse::<i64>()?;

        let reset_token_ttl_secs = env::var("RESET_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "1800".to_string())
            .parse::<i64>()?;

        let smtp = match env::var("SMTP_HOST") {
            Ok(smtp_host) => Some(SmtpConfig {
                host: smtp_host,
                port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse::<u16>()?,
                use_tls: env::var("SMTP_TLS")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse::<bool>()?,
                username: env::var("SMTP_USERNAME").ok(),
                password: env::var("SMTP_PASSWORD").ok(),
                from: env::var("MAIL_FROM")
                    .unwrap_or_else(|_| "noreply@localhost".to_string()),
            }),
            Err(_) => None,
        };

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                path: database_path,
                max_connections,
            },
            secret_key,
            base_url,
            session_ttl_secs,
            reset_token_ttl_secs,
            smtp,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Builds a configuration suitable for tests
    pub fn for_tests() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                path: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            secret_key: "test-secret-key-at-least-32-bytes-long".to_string(),
            base_url: "http://localhost:8080".to_string(),
            session_ttl_secs: 3600,
            reset_token_ttl_secs: 1800,
            smtp: None,
        }
    }
}
