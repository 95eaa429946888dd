/// Server configuration.
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | PORT | 3001 | HTTP listen port |
/// | DATABASE_URL | unset | PostgreSQL URL; unset selects the JSON-file fallback |
/// | DATA_DIR | ./data | Directory for the JSON documents (fallback backend) |
/// | ENVIRONMENT | development | development \| staging \| production |
///
/// The storage backend is chosen once at startup from `DATABASE_URL` and is
/// never mixed within one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// PostgreSQL connection URL; `None` selects the JSON-file backend
    pub database_url: Option<String>,
    /// Directory holding the JSON documents of the fallback backend
    pub data_dir: String,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the parts that matter for tests.
    pub fn with_overrides(data_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.database_url = None;
        config.data_dir = data_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
