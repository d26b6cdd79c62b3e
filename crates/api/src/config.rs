use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use streamshelf_core::watch_progress::{CONTINUE_WATCHING_LIMIT, HISTORY_PAGE_LIMIT};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Everything except the JWT secret has a local-development default.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to, from `HOST` and `PORT`.
    pub bind_addr: SocketAddr,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
    /// Per-request deadline enforced by the timeout layer.
    pub request_timeout: Duration,
    /// How long the database pool may take to close after a shutdown signal.
    pub shutdown_timeout: Duration,
    /// Page sizes for the resume shelf and the history listing.
    pub pages: PageLimits,
    pub jwt: JwtConfig,
}

/// Caps applied to the list endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub continue_watching: i64,
    pub history: i64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            continue_watching: CONTINUE_WATCHING_LIMIT,
            history: HISTORY_PAGE_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:3001` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                    |
    /// | `CONTINUE_WATCHING_LIMIT` | `50`                    |
    /// | `HISTORY_PAGE_LIMIT`      | `100`                   |
    ///
    /// # Panics
    ///
    /// Panics if a variable is set but does not parse, or a page limit is not
    /// positive.
    pub fn from_env() -> Self {
        let host: IpAddr = env_or("HOST", IpAddr::from([0, 0, 0, 0]));
        let port: u16 = env_or("PORT", 3000);

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3001".into()),
        );

        let defaults = PageLimits::default();
        let pages = PageLimits {
            continue_watching: env_or("CONTINUE_WATCHING_LIMIT", defaults.continue_watching),
            history: env_or("HISTORY_PAGE_LIMIT", defaults.history),
        };
        assert!(
            pages.continue_watching > 0 && pages.history > 0,
            "page limits must be positive"
        );

        Self {
            bind_addr: SocketAddr::new(host, port),
            cors_origins,
            request_timeout: Duration::from_secs(env_or("REQUEST_TIMEOUT_SECS", 30)),
            shutdown_timeout: Duration::from_secs(env_or("SHUTDOWN_TIMEOUT_SECS", 30)),
            pages,
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Read `key` and parse it, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
