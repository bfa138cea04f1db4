//! Environment configuration
//!
//! Everything the server reads from the process environment (after `.env`
//! has been loaded by `dotenvy`).

use anyhow::{anyhow, Context, Result};
use std::env;
use std::str::FromStr;

/// SMTP relay credentials; email is only logged when these are absent
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub frontend_url: String,
    pub reminder_hour: u32,
    pub reminder_window_days: i64,
    pub smtp: Option<SmtpConfig>,
}

fn var_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("{} must be a valid value, got '{}'", name, raw)),
        _ => Ok(default),
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self> {
        let reminder_hour: u32 = var_or("REMINDER_HOUR", 6)?;
        if reminder_hour > 23 {
            return Err(anyhow!("REMINDER_HOUR must be between 0 and 23"));
        }

        let smtp = match optional_var("SMTP_HOST") {
            Some(host) => {
                let username = optional_var("SMTP_USERNAME")
                    .context("SMTP_USERNAME must be set when SMTP_HOST is set")?;
                let password = optional_var("SMTP_PASSWORD")
                    .context("SMTP_PASSWORD must be set when SMTP_HOST is set")?;
                let from = optional_var("SMTP_FROM")
                    .unwrap_or_else(|| format!("VehicleVault <{}>", username));
                Some(SmtpConfig {
                    host,
                    username,
                    password,
                    from,
                })
            }
            None => None,
        };

        Ok(Self {
            environment: optional_var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: var_or("PORT", 5000)?,
            host: optional_var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            jwt_secret: optional_var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expiration: var_or("JWT_EXPIRATION", 86_400)?,
            cors_origins: optional_var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            frontend_url: optional_var("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            reminder_hour,
            reminder_window_days: var_or("REMINDER_WINDOW_DAYS", 7)?,
            smtp,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Link emailed for a password reset
    pub fn reset_password_url(&self, token: &str) -> String {
        format!("{}/reset-password/{}", self.frontend_url.trim_end_matches('/'), token)
    }

    /// Config suitable for tests: no SMTP, fixed secret
    pub fn for_tests() -> Self {
        Self {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_expiration: 3600,
            cors_origins: Vec::new(),
            frontend_url: "http://localhost:3000/".to_string(),
            reminder_hour: 6,
            reminder_window_days: 7,
            smtp: None,
        }
    }
}
