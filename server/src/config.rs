//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration, loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret for admin/customer authentication
    pub jwt_secret: String,
    /// Toss Payments secret key
    pub toss_secret_key: String,
    /// Stripe secret key
    pub stripe_secret_key: String,
    /// Stripe webhook signing secret
    pub stripe_webhook_secret: String,
    /// Directory for per-language snapshot files
    pub snapshot_dir: String,
    /// Snapshot files older than this are considered stale (seconds)
    pub cache_max_age_secs: u64,
    /// Default language code; cannot be deactivated
    pub default_language: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            toss_secret_key: Self::require_secret("TOSS_SECRET_KEY", &environment)?,
            stripe_secret_key: Self::require_secret("STRIPE_SECRET_KEY", &environment)?,
            stripe_webhook_secret: Self::require_secret("STRIPE_WEBHOOK_SECRET", &environment)?,
            snapshot_dir: std::env::var("SNAPSHOT_DIR")
                .unwrap_or_else(|_| "public/cache/ui-sections".into()),
            cache_max_age_secs: std::env::var("CACHE_MAX_AGE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            default_language: std::env::var("DEFAULT_LANGUAGE").unwrap_or_else(|_| "ko".into()),
            environment,
        })
    }
}
