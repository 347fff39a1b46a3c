use anyhow::{Context, bail};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

const DEV_JWT_SECRET: &str = "dev-only-jwt-secret-change-me";

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub environment: String,
    pub jwt_secret: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_limit_enabled: bool,
    pub rate_auth_per_min: u32,
    pub rate_default_per_min: u32,

    pub api_prefix: String,

    /// Turns on advance-notice, max-consecutive and balance checks at submission.
    pub enforce_policy_limits: bool,
    /// Password given to the seeded demo accounts.
    pub seed_password: String,

    pub log_dir: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        let config = Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            access_token_ttl: parse_or("ACCESS_TOKEN_TTL", 900)?, // 15 min
            refresh_token_ttl: parse_or("REFRESH_TOKEN_TTL", 604_800)?, // 7 days

            rate_limit_enabled: parse_or("RATE_LIMIT_ENABLED", true)?,
            rate_auth_per_min: parse_or("RATE_AUTH_PER_MIN", 5)?,
            rate_default_per_min: parse_or("RATE_DEFAULT_PER_MIN", 100)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),

            enforce_policy_limits: parse_or("ENFORCE_POLICY_LIMITS", false)?,
            seed_password: env::var("SEED_PASSWORD").unwrap_or_else(|_| "Demo1234".to_string()),

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.is_production() && self.jwt_secret == DEV_JWT_SECRET {
            bail!("JWT_SECRET must be set in production");
        }
        if self.access_token_ttl == 0 || self.refresh_token_ttl == 0 {
            bail!("token TTLs must be positive");
        }
        Ok(())
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            environment: "test".to_string(),
            jwt_secret: "test-secret".to_string(),
            access_token_ttl: 900,
            refresh_token_ttl: 3600,
            rate_limit_enabled: false,
            rate_auth_per_min: 5,
            rate_default_per_min: 100,
            api_prefix: "/api/v1".to_string(),
            enforce_policy_limits: false,
            seed_password: "Demo1234".to_string(),
            log_dir: "logs".to_string(),
            log_level: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_refuses_the_development_secret() {
        let mut config = Config::for_tests();
        config.environment = "production".to_string();
        config.jwt_secret = DEV_JWT_SECRET.to_string();
        assert!(config.validate().is_err());

        config.jwt_secret = "a-real-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let mut config = Config::for_tests();
        config.access_token_ttl = 0;
        assert!(config.validate().is_err());
    }
}
