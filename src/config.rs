//! Application configuration
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::email::Branding;
use crate::mailer::SmtpConfig;
use crate::order::OrderSettings;
use std::env;
use std::time::Duration;

const DEFAULT_MAIL_FROM: &str = "noreply@kozijncomfort.local";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Frontend assets directory
    pub frontend_dir: String,
    /// Idle shopper session lifetime in hours
    pub session_expiry_hours: u64,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// CORS allowed origins
    pub cors_origins: Vec<String>,
    /// Environment (development/production)
    pub environment: Environment,
    /// Country recorded when the shopper leaves it blank
    pub default_country: String,
    /// Recipient of business notifications
    pub mail_to: String,
    /// `None` when no SMTP host is configured; mail is then only logged
    pub smtp: Option<SmtpConfig>,
    pub outbox_retry_interval: Duration,
    pub outbox_max_attempts: u32,
    pub outbox_capacity: usize,
    pub branding: Branding,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

/// Read a variable, treating blank values as unset
fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("{} has an invalid value: '{}'", name, raw))),
        None => Ok(default),
    }
}

fn flag(name: &str) -> Option<bool> {
    var(name).map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
}

/// SMTP relay settings; `MAIL_FROM` is the sender and the default login
fn smtp_from_env(mail_from: &str, from_name: &str) -> Result<Option<SmtpConfig>, ConfigError> {
    let Some(host) = var("SMTP_HOST").or_else(|| var("MAIL_HOST")) else {
        return Ok(None);
    };
    let port: u16 = parsed("SMTP_PORT", 587)?;
    Ok(Some(SmtpConfig {
        host,
        port,
        // Port 465 speaks TLS from the first byte
        implicit_tls: flag("SMTP_SECURE").unwrap_or(port == 465),
        username: Some(var("SMTP_USER").unwrap_or_else(|| mail_from.to_string())),
        password: var("SMTP_PASSWORD").or_else(|| var("MAIL_PASSWORD")),
        from_address: mail_from.to_string(),
        from_name: Some(from_name.to_string()),
        timeout: Duration::from_secs(parsed("SMTP_TIMEOUT_SECS", 15)?),
    }))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = match var("ENVIRONMENT")
            .unwrap_or_else(|| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        };

        let mail_from = var("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string());
        let mail_to = match var("MAIL_TO") {
            Some(to) => to,
            None if environment == Environment::Production => {
                return Err(ConfigError::Missing(
                    "MAIL_TO is required in production".to_string(),
                ))
            }
            None => mail_from.clone(),
        };

        let branding = Branding {
            company_name: var("COMPANY_NAME").unwrap_or_else(|| "Kozijn Comfort".to_string()),
            email: var("COMPANY_EMAIL").unwrap_or_else(|| "info@kozijncomfort.nl".to_string()),
            phone: var("COMPANY_PHONE").unwrap_or_else(|| "+31 623432448".to_string()),
            website: var("COMPANY_WEBSITE").unwrap_or_else(|| "www.kozijncomfort.nl".to_string()),
        };

        let smtp = smtp_from_env(&mail_from, &branding.company_name)?;

        Ok(Config {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed("PORT", 3001)?,
            frontend_dir: var("FRONTEND_DIR").unwrap_or_else(|| "./frontend".to_string()),
            session_expiry_hours: parsed("SESSION_EXPIRY_HOURS", 24)?,
            max_body_size: parsed("MAX_BODY_SIZE", 1024 * 1024)?, // 1MB default
            cors_origins: var("CORS_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| vec!["http://localhost:5173".to_string()]),
            environment,
            default_country: var("DEFAULT_COUNTRY").unwrap_or_else(|| "Netherlands".to_string()),
            mail_to,
            smtp,
            outbox_retry_interval: Duration::from_secs(
                parsed::<u64>("OUTBOX_RETRY_INTERVAL_SECS", 60)?.max(1),
            ),
            outbox_max_attempts: parsed("OUTBOX_MAX_ATTEMPTS", 5)?,
            outbox_capacity: parsed("OUTBOX_CAPACITY", 500)?,
            branding,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn order_settings(&self) -> OrderSettings {
        OrderSettings {
            default_country: self.default_country.clone(),
            business_email: self.mail_to.clone(),
            branding: self.branding.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_rejects_garbage() {
        std::env::set_var("KC_TEST_PORT_GARBAGE", "eighty");
        assert!(matches!(
            parsed::<u16>("KC_TEST_PORT_GARBAGE", 3001),
            Err(ConfigError::Invalid(_))
        ));
        std::env::remove_var("KC_TEST_PORT_GARBAGE");
    }

    #[test]
    fn test_blank_values_fall_back_to_default() {
        std::env::set_var("KC_TEST_BLANK", "   ");
        assert_eq!(parsed::<u16>("KC_TEST_BLANK", 3001).unwrap(), 3001);
        assert!(var("KC_TEST_BLANK").is_none());
        std::env::remove_var("KC_TEST_BLANK");
    }

    #[test]
    fn test_smtp_sender_comes_from_mail_from() {
        std::env::remove_var("MAIL_HOST");
        std::env::remove_var("SMTP_HOST");
        assert!(smtp_from_env("info@kozijncomfort.nl", "Kozijn Comfort")
            .unwrap()
            .is_none());

        std::env::set_var("SMTP_HOST", "smtp.example.com");
        std::env::set_var("SMTP_PORT", "465");
        let smtp = smtp_from_env("info@kozijncomfort.nl", "Kozijn Comfort")
            .unwrap()
            .unwrap();
        std::env::remove_var("SMTP_HOST");
        std::env::remove_var("SMTP_PORT");

        assert_eq!(smtp.from_address, "info@kozijncomfort.nl");
        assert_eq!(smtp.from_name.as_deref(), Some("Kozijn Comfort"));
        assert!(smtp.implicit_tls);
        if std::env::var("SMTP_USER").is_err() {
            assert_eq!(smtp.username.as_deref(), Some("info@kozijncomfort.nl"));
        }
    }

    #[test]
    fn test_flag_values() {
        std::env::set_var("KC_TEST_FLAG", "TRUE");
        assert_eq!(flag("KC_TEST_FLAG"), Some(true));
        std::env::set_var("KC_TEST_FLAG", "false");
        assert_eq!(flag("KC_TEST_FLAG"), Some(false));
        std::env::remove_var("KC_TEST_FLAG");
        assert_eq!(flag("KC_TEST_FLAG"), None);
    }
}
