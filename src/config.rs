use std::env;
use std::path::PathBuf;

use crate::id::KeyFormat;

/// Development-only admin secret used when `ADMIN_TOKEN` is unset.
pub const DEFAULT_ADMIN_TOKEN: &str = "change-this-token";

/// Per-IP rate limit for every endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests per minute per source address (0 = disabled)
    pub requests_per_minute: u32,
}

impl RateLimitConfig {
    pub fn disabled() -> Self {
        Self {
            requests_per_minute: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.requests_per_minute > 0
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 120,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// JSON file holding every license record
    pub data_file: PathBuf,
    pub admin_token: String,
    /// True when `admin_token` is the built-in development fallback
    pub admin_token_is_default: bool,
    pub key_format: KeyFormat,
    /// Take the client address from `x-forwarded-for` / `x-real-ip`
    pub trust_proxy: bool,
    pub rate_limit: RateLimitConfig,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let (admin_token, admin_token_is_default) = match env::var("ADMIN_TOKEN") {
            Ok(token) if !token.trim().is_empty() => (token.trim().to_string(), false),
            _ => (DEFAULT_ADMIN_TOKEN.to_string(), true),
        };

        let key_format = match env::var("KEY_FORMAT") {
            Ok(v) => KeyFormat::parse(&v).unwrap_or_else(|| {
                tracing::warn!("Unknown KEY_FORMAT {:?}, using uuid", v);
                KeyFormat::Uuid
            }),
            Err(_) => KeyFormat::default(),
        };

        let trust_proxy = env::var("TRUST_PROXY")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let rate_limit = env::var("RATE_LIMIT_RPM")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(|requests_per_minute| RateLimitConfig {
                requests_per_minute,
            })
            .unwrap_or_default();

        Self {
            host,
            port,
            data_file: env::var("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./licenses.json")),
            admin_token,
            admin_token_is_default,
            key_format,
            trust_proxy,
            rate_limit,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
