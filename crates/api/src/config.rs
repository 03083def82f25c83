use crate::auth::jwt::JwtConfig;

/// Deployment environment, toggling behaviour that differs between a laptop
/// and a real deployment (`Secure` session cookies, for now).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Development,
    Production,
}

impl RuntimeEnv {
    pub fn is_production(self) -> bool {
        matches!(self, RuntimeEnv::Production)
    }

    /// `APP_ENV=production` selects production; anything else (including an
    /// unset variable) is development.
    fn from_env() -> Self {
        match std::env::var("APP_ENV").as_deref() {
            Ok("production") => RuntimeEnv::Production,
            _ => RuntimeEnv::Development,
        }
    }
}

/// Rate-limit window applied to the `/api/v1` subtree.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Requests allowed per client IP within one window.
    pub max_requests: usize,
    /// Window length in seconds.
    pub window_secs: u64,
}

impl RateLimitConfig {
    /// | Env Var                  | Default |
    /// |--------------------------|---------|
    /// | `RATE_LIMIT_MAX`         | `100`   |
    /// | `RATE_LIMIT_WINDOW_SECS` | `3600`  |
    pub fn from_env() -> Self {
        let max_requests: usize = std::env::var("RATE_LIMIT_MAX")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("RATE_LIMIT_MAX must be a valid integer");

        let window_secs: u64 = std::env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("RATE_LIMIT_WINDOW_SECS must be a valid u64");

        Self {
            max_requests,
            window_secs,
        }
    }
}

/// SMTP relay settings for outbound mail (password-reset tokens).
///
/// Optional as a whole: when `EMAIL_HOST` is unset the server starts without
/// a mailer and the forgot-password endpoint reports a send failure instead.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// `From:` mailbox, e.g. `Trailhead <no-reply@trailhead.example>`.
    pub from: String,
}

impl EmailConfig {
    /// | Env Var          | Default                                    |
    /// |------------------|--------------------------------------------|
    /// | `EMAIL_HOST`     | (unset: mailer disabled)                   |
    /// | `EMAIL_PORT`     | `587`                                      |
    /// | `EMAIL_USERNAME` | (unset: no SMTP auth)                      |
    /// | `EMAIL_PASSWORD` | (unset: no SMTP auth)                      |
    /// | `EMAIL_FROM`     | `Trailhead <no-reply@trailhead.example>`   |
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("EMAIL_HOST").ok()?;

        let port: u16 = std::env::var("EMAIL_PORT")
            .unwrap_or_else(|_| "587".into())
            .parse()
            .expect("EMAIL_PORT must be a valid u16");

        Some(Self {
            host,
            port,
            username: std::env::var("EMAIL_USERNAME").ok(),
            password: std::env::var("EMAIL_PASSWORD").ok(),
            from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "Trailhead <no-reply@trailhead.example>".into()),
        })
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except `JWT_SECRET` have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Deployment environment (default: development).
    pub env: RuntimeEnv,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Externally reachable base URL, used to build password-reset links.
    pub public_base_url: String,
    /// Session token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// API rate-limit window.
    pub rate_limit: RateLimitConfig,
    /// SMTP settings; `None` leaves the mailer disabled.
    pub email: Option<EmailConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                     |
    /// |------------------------|-----------------------------|
    /// | `HOST`                 | `0.0.0.0`                   |
    /// | `PORT`                 | `3000`                      |
    /// | `APP_ENV`              | `development`               |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                        |
    /// | `PUBLIC_BASE_URL`      | `http://localhost:3000`     |
    ///
    /// JWT, rate-limit, and email variables are documented on
    /// [`JwtConfig::from_env`], [`RateLimitConfig::from_env`], and
    /// [`EmailConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        Self {
            host,
            port,
            env: RuntimeEnv::from_env(),
            cors_origins,
            request_timeout_secs,
            public_base_url,
            jwt: JwtConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            email: EmailConfig::from_env(),
        }
    }
}
