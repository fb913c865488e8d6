use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use tracing::{info, warn};

const DEFAULT_PORT: u16 = 1111;
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24;
const DEFAULT_CORS_MAX_AGE_SECS: u64 = 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub session_ttl: Duration,
    pub seed_on_start: bool,
    pub cors_max_age: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            seed_on_start: false,
            cors_max_age: Duration::from_secs(DEFAULT_CORS_MAX_AGE_SECS),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let redis_url: String = try_load("REDIS_URL", DEFAULT_REDIS_URL);

        Self {
            port: try_load("RUST_PORT", &DEFAULT_PORT.to_string()),
            redis_url: with_password(&redis_url, read_secret("REDIS_PASSWORD")),
            session_ttl: Duration::from_secs(try_load(
                "SESSION_TTL_SECS",
                &DEFAULT_SESSION_TTL_SECS.to_string(),
            )),
            seed_on_start: try_load("SEED_ON_START", "false"),
            cors_max_age: Duration::from_secs(try_load(
                "CORS_MAX_AGE_SECS",
                &DEFAULT_CORS_MAX_AGE_SECS.to_string(),
            )),
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

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("No {secret_name} secret ({e}), connecting without it");
        })
        .ok()
        .filter(|s| !s.is_empty())
}

/// Splices a password into `redis://host` style urls that do not already carry credentials.
fn with_password(url: &str, password: Option<String>) -> String {
    match (password, url.split_once("://")) {
        (Some(password), Some((scheme, rest))) if !rest.contains('@') => {
            format!("{scheme}://:{password}@{rest}")
        }
        _ => url.to_string(),
    }
}
