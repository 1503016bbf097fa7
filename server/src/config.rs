use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub admin_secret: Option<String>,
    pub max_attempts: u32,
    pub lockout: Duration,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "1111"),
            admin_secret: load_secret("ADMIN_PASSWORD"),
            max_attempts: try_load("ADMIN_MAX_ATTEMPTS", "3"),
            lockout: Duration::from_secs(try_load("ADMIN_LOCKOUT_SECS", "14400")),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

// No default for the secret. A missing value disables admin login; the
// public read-only endpoints keep working.
fn load_secret(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => {
            warn!("{key} not set, admin login is disabled");
            None
        }
    }
}
