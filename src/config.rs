use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Upstream catalog
    pub locale: String,
    pub fetch_timeout_ms: u64,
    pub user_agent: String,

    // Cache
    pub search_cache_ttl_ms: u64,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env::var("PORT")
                .unwrap_or_else(|_| "3301".to_string())
                .parse()
                .unwrap_or(3301),

            // Default request locale; individual searches may override it
            locale: env::var("STORYTEL_LOCALE").unwrap_or_else(|_| "en".to_string()),

            fetch_timeout_ms: env::var("FETCH_TIMEOUT_MS")
                .unwrap_or_else(|_| "30000".to_string())
                .parse()
                .unwrap_or(30_000), // 30 seconds

            // Identifying header the upstream expects on every call
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| "Storytel".to_string()),

            // Cache
            search_cache_ttl_ms: env::var("SEARCH_CACHE_TTL_MS")
                .unwrap_or_else(|_| "600000".to_string())
                .parse()
                .unwrap_or(600_000), // 10 minutes
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
