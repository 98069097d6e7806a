//! Server configuration.

use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::{ServerError, ServerResult};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Send permissive CORS headers and answer preflight requests.
    pub allow_cors: bool,
    /// Upper bound of a random per-request delay, in milliseconds. Zero disables it.
    pub artificial_delay_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            allow_cors: false,
            artificial_delay_ms: 0,
        }
    }
}

impl ServerConfig {
    /// Read `PORT`, `ALLOW_CORS` and `ARTIFICIAL_DELAY_MS` from the environment.
    pub fn from_env() -> ServerResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup. Unset or empty variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let port = parse_var(&lookup, "PORT", defaults.bind_addr.port())?;

        Ok(Self {
            bind_addr: SocketAddr::new(defaults.bind_addr.ip(), port),
            allow_cors: parse_var(&lookup, "ALLOW_CORS", defaults.allow_cors)?,
            artificial_delay_ms: parse_var(
                &lookup,
                "ARTIFICIAL_DELAY_MS",
                defaults.artificial_delay_ms,
            )?,
        })
    }

    /// Create a new config with custom bind address.
    #[cfg(test)]
    pub fn with_addr(addr: impl Into<SocketAddr>) -> Self {
        Self {
            bind_addr: addr.into(),
            ..Default::default()
        }
    }

    /// Enable or disable CORS headers.
    #[cfg(test)]
    pub fn with_cors(mut self, allow: bool) -> Self {
        self.allow_cors = allow;
        self
    }

    /// Set the artificial delay bound.
    #[cfg(test)]
    pub fn with_artificial_delay(mut self, max_ms: u64) -> Self {
        self.artificial_delay_ms = max_ms;
        self
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> ServerResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ServerError::Config(format!("invalid {} value: {}", name, raw))),
    }
}

/// Usage text listing the environment variables.
pub const USAGE: &str = "\
Environment variables:
  PORT                 port to listen on (default: 3001)
  ALLOW_CORS           set to 'true' to enable CORS headers (default: false)
  ARTIFICIAL_DELAY_MS  random 0..N ms delay per request (default: 0)
  RUST_LOG             log filter (default: info)";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.port(), 3001);
        assert!(!config.allow_cors);
        assert_eq!(config.artificial_delay_ms, 0);
    }

    #[test]
    fn env_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("ALLOW_CORS", "true"),
            ("ARTIFICIAL_DELAY_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.allow_cors);
        assert_eq!(config.artificial_delay_ms, 250);
    }

    #[test]
    fn empty_values_keep_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "")])).unwrap();
        assert_eq!(config.bind_addr.port(), 3001);
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "abc")])).unwrap_err();
        assert_eq!(err.to_string(), "config error: invalid PORT value: abc");

        let err = ServerConfig::from_lookup(lookup(&[("ALLOW_CORS", "yes")])).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn custom_config() {
        let config = ServerConfig::with_addr(([127, 0, 0, 1], 9000))
            .with_cors(true)
            .with_artificial_delay(100);
        assert_eq!(config.bind_addr.port(), 9000);
        assert!(config.allow_cors);
        assert_eq!(config.artificial_delay_ms, 100);
    }
}
