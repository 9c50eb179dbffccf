use anyhow::{Context, Result, anyhow};
use std::env;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS when true, STARTTLS otherwise.
    pub secure: bool,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_secs: u64,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .context("invalid PORT")?;
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| anyhow!("JWT_SECRET must be set"))?;
        let jwt_ttl_secs = env::var("JWT_TTL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .context("invalid JWT_TTL_SECS")?;
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Self {
            host,
            port,
            jwt_secret,
            jwt_ttl_secs,
            environment,
            cors_origins,
            smtp: smtp_from_env()?,
        };

        if config.is_production() && config.smtp.is_none() {
            return Err(anyhow!(
                "SMTP_HOST, SMTP_USER and SMTP_PASS must be set in production"
            ));
        }

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// SMTP counts as configured only when host, user and password are all set.
fn smtp_from_env() -> Result<Option<SmtpConfig>> {
    let (Some(host), Some(username), Some(password)) = (
        non_empty_var("SMTP_HOST"),
        non_empty_var("SMTP_USER"),
        non_empty_var("SMTP_PASS"),
    ) else {
        return Ok(None);
    };

    let port = match non_empty_var("SMTP_PORT") {
        Some(p) => p.parse().context("invalid SMTP_PORT")?,
        None => 587,
    };
    let secure = non_empty_var("SMTP_SECURE").is_some_and(|v| v == "true");
    let from = non_empty_var("MAIL_FROM").unwrap_or_else(|| username.clone());

    Ok(Some(SmtpConfig {
        host,
        port,
        secure,
        username,
        password,
        from,
    }))
}
