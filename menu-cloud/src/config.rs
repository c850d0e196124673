//! Service configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// Public origin, used for menu URLs and checkout redirects
    pub public_base_url: String,
    /// PostgreSQL connection URL; in-memory store when unset
    pub database_url: Option<String>,
    /// Stripe secret key
    pub stripe_secret_key: String,
    /// Stripe webhook signing secret
    pub stripe_webhook_secret: String,
    /// Default subscription price when the request has none
    pub stripe_price_id: String,
    pub stripe_trial_days: u32,
    /// Accepted age of a webhook signature timestamp
    pub webhook_tolerance_secs: i64,
    /// S3 bucket for uploaded images; in-memory blobs when unset
    pub s3_bucket: Option<String>,
    /// Public URL prefix for stored blobs
    pub blob_public_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        let public_base_url = "http://localhost:3000".to_string();
        Self {
            environment: "development".into(),
            http_port: 8080,
            blob_public_base_url: format!("{public_base_url}/blobs"),
            public_base_url,
            database_url: None,
            stripe_secret_key: "dev-STRIPE_SECRET_KEY-not-for-production".into(),
            stripe_webhook_secret: "dev-STRIPE_WEBHOOK_SECRET-not-for-production".into(),
            stripe_price_id: "price_menu_premium_monthly".into(),
            stripe_trial_days: 7,
            webhook_tolerance_secs: 300,
            s3_bucket: None,
        }
    }
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

    fn parsed<T: std::str::FromStr + std::fmt::Display>(name: &str, default: T) -> T {
        Self::parse_or_default(name, std::env::var(name).ok().as_deref(), default)
    }

    /// Unset keeps the default silently; a malformed value keeps it with a warning
    fn parse_or_default<T: std::str::FromStr + std::fmt::Display>(
        name: &str,
        raw: Option<&str>,
        default: T,
    ) -> T {
        let Some(raw) = raw else {
            return default;
        };
        match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(var = name, value = raw, default = %default, "Malformed env var, using default");
                default
            }
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let defaults = Self::default();
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or(defaults.public_base_url);

        Ok(Self {
            http_port: Self::parsed("HTTP_PORT", defaults.http_port),
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            stripe_secret_key: Self::require_secret("STRIPE_SECRET_KEY", &environment)?,
            stripe_webhook_secret: Self::require_secret("STRIPE_WEBHOOK_SECRET", &environment)?,
            stripe_price_id: std::env::var("STRIPE_PRICE_ID")
                .unwrap_or(defaults.stripe_price_id),
            stripe_trial_days: Self::parsed("STRIPE_TRIAL_DAYS", defaults.stripe_trial_days),
            webhook_tolerance_secs: Self::parsed(
                "WEBHOOK_TOLERANCE_SECS",
                defaults.webhook_tolerance_secs,
            ),
            s3_bucket: std::env::var("S3_BUCKET").ok().filter(|s| !s.is_empty()),
            blob_public_base_url: std::env::var("BLOB_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("{public_base_url}/blobs")),
            public_base_url,
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
