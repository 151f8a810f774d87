//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.
//! Every knob is a named, typed field with a documented default; there are no
//! open-ended option bags.

use std::env;

/// Top-level configuration for the data-access layer and its health surface.
#[derive(Debug, Clone)]
pub struct Config {
    /// Memory cache settings
    pub cache: CacheConfig,
    /// Query executor settings
    pub executor: ExecutorConfig,
    /// Health reporter thresholds
    pub health: HealthConfig,
    /// HTTP port for the health/stats surface
    pub server_port: u16,
}

/// Memory cache settings.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
}

/// Query executor settings.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
    /// Total attempts per query (first attempt included)
    pub retries: u32,
    /// Base backoff delay in milliseconds
    pub base_delay_ms: u64,
    /// Backoff delay cap in milliseconds
    pub max_delay_ms: u64,
    /// Number of operations executed concurrently per batch chunk
    pub batch_size: usize,
}

/// Health reporter thresholds.
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Cache probe / executor latency above this is degraded (ms)
    pub degraded_latency_ms: u64,
    /// Latency above this is unhealthy (ms)
    pub unhealthy_latency_ms: u64,
    /// Executor error rate above this is degraded
    pub degraded_error_rate: f64,
    /// Executor error rate above this is unhealthy
    pub unhealthy_error_rate: f64,
    /// Deadline for the health probe itself (ms)
    pub probe_timeout_ms: u64,
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 30)
    /// - `QUERY_TIMEOUT_MS` - Per-attempt timeout (default: 5000)
    /// - `QUERY_RETRIES` - Total attempts per query (default: 3)
    /// - `QUERY_BASE_DELAY_MS` - Base backoff delay (default: 100)
    /// - `QUERY_MAX_DELAY_MS` - Backoff delay cap (default: 5000)
    /// - `QUERY_BATCH_SIZE` - Batch chunk size (default: 10)
    /// - `HEALTH_DEGRADED_LATENCY_MS` / `HEALTH_UNHEALTHY_LATENCY_MS`
    /// - `HEALTH_DEGRADED_ERROR_RATE` / `HEALTH_UNHEALTHY_ERROR_RATE`
    /// - `HEALTH_PROBE_TIMEOUT_MS` - Probe deadline (default: 2000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            cache: CacheConfig {
                max_entries: env_parse("CACHE_MAX_ENTRIES", 1000),
                cleanup_interval: env_parse("CACHE_CLEANUP_INTERVAL", 30),
            },
            executor: ExecutorConfig {
                timeout_ms: env_parse("QUERY_TIMEOUT_MS", 5000),
                retries: env_parse("QUERY_RETRIES", 3),
                base_delay_ms: env_parse("QUERY_BASE_DELAY_MS", 100),
                max_delay_ms: env_parse("QUERY_MAX_DELAY_MS", 5000),
                batch_size: env_parse("QUERY_BATCH_SIZE", 10),
            },
            health: HealthConfig {
                degraded_latency_ms: env_parse("HEALTH_DEGRADED_LATENCY_MS", 100),
                unhealthy_latency_ms: env_parse("HEALTH_UNHEALTHY_LATENCY_MS", 1000),
                degraded_error_rate: env_parse("HEALTH_DEGRADED_ERROR_RATE", 0.05),
                unhealthy_error_rate: env_parse("HEALTH_UNHEALTHY_ERROR_RATE", 0.25),
                probe_timeout_ms: env_parse("HEALTH_PROBE_TIMEOUT_MS", 2000),
            },
            server_port: env_parse("SERVER_PORT", 3000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            executor: ExecutorConfig::default(),
            health: HealthConfig::default(),
            server_port: 3000,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            cleanup_interval: 30,
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 5000,
            batch_size: 10,
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            degraded_latency_ms: 100,
            unhealthy_latency_ms: 1000,
            degraded_error_rate: 0.05,
            unhealthy_error_rate: 0.25,
            probe_timeout_ms: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env vars are process-global; serialize every test that touches them so
    // parallel test threads cannot observe each other's mutations.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache.max_entries, 1000);
        assert_eq!(config.cache.cleanup_interval, 30);
        assert_eq!(config.executor.retries, 3);
        assert_eq!(config.executor.timeout_ms, 5000);
        assert_eq!(config.executor.batch_size, 10);
        assert_eq!(config.health.probe_timeout_ms, 2000);
    }

    #[test]
    fn test_config_from_env_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();

        env::remove_var("CACHE_MAX_ENTRIES");
        env::remove_var("QUERY_RETRIES");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.cache.max_entries, 1000);
        assert_eq!(config.executor.retries, 3);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();

        env::set_var("CACHE_MAX_ENTRIES", "42");
        env::set_var("QUERY_RETRIES", "7");
        env::set_var("SERVER_PORT", "not-a-port");

        let config = Config::from_env();
        assert_eq!(config.cache.max_entries, 42);
        assert_eq!(config.executor.retries, 7);
        // Unparseable values fall back to the default
        assert_eq!(config.server_port, 3000);

        env::remove_var("CACHE_MAX_ENTRIES");
        env::remove_var("QUERY_RETRIES");
        env::remove_var("SERVER_PORT");
    }
}
