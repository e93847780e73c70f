//! Configuration management for Citeline Server

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::highlight::HighlightTimings;
use crate::lookup::RegistryConfig;
use crate::render::CitationMode;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub lookup: LookupConfig,
    pub viewer: ViewerConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Backend that serves share document listings
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub api_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub ttl_secs: u64,
    pub max_shares: usize,
}

/// Viewer behaviour: citation style and highlight timing
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub citation_mode: CitationMode,
    pub scroll_duration_ms: u64,
    pub highlight_delay_ms: u64,
    pub highlight_duration_ms: u64,
    pub mount_retry_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let timings = HighlightTimings::default();
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            backend: BackendConfig {
                api_url: "http://localhost:8000".to_string(),
                timeout_secs: 10,
            },
            lookup: LookupConfig {
                ttl_secs: 300,
                max_shares: 64,
            },
            viewer: ViewerConfig {
                citation_mode: CitationMode::Inline,
                scroll_duration_ms: timings.scroll_duration.as_millis() as u64,
                highlight_delay_ms: timings.highlight_delay.as_millis() as u64,
                highlight_duration_ms: timings.highlight_duration.as_millis() as u64,
                mount_retry_delay_ms: timings.mount_retry_delay.as_millis() as u64,
            },
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let defaults = Config::default();
        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| defaults.server.host.clone()),
                port: env_or("SERVER_PORT", defaults.server.port),
            },
            backend: BackendConfig {
                api_url: env::var("BACKEND_API_URL")?,
                timeout_secs: env_or("BACKEND_TIMEOUT_SECS", defaults.backend.timeout_secs),
            },
            lookup: LookupConfig {
                ttl_secs: env_or("LOOKUP_TTL_SECS", defaults.lookup.ttl_secs),
                max_shares: env_or("LOOKUP_MAX_SHARES", defaults.lookup.max_shares),
            },
            viewer: ViewerConfig {
                citation_mode: env_or("CITATION_MODE", defaults.viewer.citation_mode),
                scroll_duration_ms: env_or("SCROLL_DURATION_MS", defaults.viewer.scroll_duration_ms),
                highlight_delay_ms: env_or("HIGHLIGHT_DELAY_MS", defaults.viewer.highlight_delay_ms),
                highlight_duration_ms: env_or(
                    "HIGHLIGHT_DURATION_MS",
                    defaults.viewer.highlight_duration_ms,
                ),
                mount_retry_delay_ms: env_or(
                    "MOUNT_RETRY_DELAY_MS",
                    defaults.viewer.mount_retry_delay_ms,
                ),
            },
        })
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs)
    }

    pub fn registry(&self) -> RegistryConfig {
        RegistryConfig {
            max_shares: self.lookup.max_shares,
            ttl: Duration::from_secs(self.lookup.ttl_secs),
        }
    }

    pub fn highlight_timings(&self) -> HighlightTimings {
        HighlightTimings {
            scroll_duration: Duration::from_millis(self.viewer.scroll_duration_ms),
            highlight_delay: Duration::from_millis(self.viewer.highlight_delay_ms),
            highlight_duration: Duration::from_millis(self.viewer.highlight_duration_ms),
            mount_retry_delay: Duration::from_millis(self.viewer.mount_retry_delay_ms),
            ..HighlightTimings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_library_defaults() {
        let config = Config::default();
        assert_eq!(config.highlight_timings(), HighlightTimings::default());

        let registry = config.registry();
        assert_eq!(registry.max_shares, 64);
        assert_eq!(registry.ttl, crate::lookup::DEFAULT_TTL);
        assert_eq!(config.viewer.citation_mode, CitationMode::Inline);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        assert_eq!(env_or("CITELINE_TEST_UNSET_VARIABLE", 7u64), 7);
    }
}
