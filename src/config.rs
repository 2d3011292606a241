use chrono::Duration;
use std::env;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Token signing settings shared by the auth handlers.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub auth_database: String,
    pub data_database: String,
    pub auth: AuthSettings,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw.clone(),
            })?,
            None => 5000,
        };

        let expires_in = required("EXPIRES_IN")?;
        let token_ttl = parse_expires_in(&expires_in).ok_or(ConfigError::Invalid {
            key: "EXPIRES_IN",
            value: expires_in.clone(),
        })?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            mongodb_uri: required("MONGODB_URI")?,
            auth_database: lookup("AUTH_DB_NAME").unwrap_or_else(|| "assignment".to_string()),
            data_database: lookup("DATA_DB_NAME").unwrap_or_else(|| "disater-db".to_string()),
            auth: AuthSettings {
                jwt_secret: required("JWT_SECRET")?,
                token_ttl,
            },
        })
    }
}

/// Parses a token lifetime such as `"3600"`, `"10h"`, `"7d"` or `"2 days"`.
/// A bare number is a count of seconds.
pub fn parse_expires_in(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(raw.len());
    let (number, unit) = raw.split_at(split);

    let value: f64 = number.parse().ok()?;
    let millis_per_unit = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1_000.0,
        "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1.0,
        "m" | "min" | "mins" | "minute" | "minutes" => 60_000.0,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600_000.0,
        "d" | "day" | "days" => 86_400_000.0,
        "w" | "week" | "weeks" => 604_800_000.0,
        "y" | "yr" | "yrs" | "year" | "years" => 31_557_600_000.0,
        _ => return None,
    };

    let millis = (value * millis_per_unit).round();
    if !millis.is_finite() || millis <= 0.0 || millis > i64::MAX as f64 {
        return None;
    }

    let ttl = Duration::try_milliseconds(millis as i64)?;

    // Tokens are stamped with now + ttl, which must stay a representable date
    chrono::Utc::now().checked_add_signed(ttl)?;
    Some(ttl)
}
