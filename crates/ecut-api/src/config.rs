//! API configuration.

use std::str::FromStr;

/// Which job store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStoreKind {
    /// JSON files in the jobs directory, cached in memory
    #[default]
    File,
    /// Process memory only
    Memory,
    /// Redis at `REDIS_URL`
    Redis,
}

impl FromStr for JobStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(format!("unknown job store: {}", other)),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max upload body size in bytes
    pub max_upload_size: usize,
    /// Serve Prometheus metrics at /metrics
    pub metrics_enabled: bool,
    /// Job store backend
    pub job_store: JobStoreKind,
    /// Redis URL for the redis job store
    pub redis_url: String,
    /// Expiry for job records in Redis
    pub job_record_ttl_secs: Option<u64>,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_upload_size: 2 * 1024 * 1024 * 1024, // 2GiB
            metrics_enabled: true,
            job_store: JobStoreKind::File,
            redis_url: "redis://localhost:6379".to_string(),
            job_record_ttl_secs: None,
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_upload_size: std::env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_upload_size),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
            job_store: std::env::var("JOB_STORE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.job_store),
            redis_url: std::env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            job_record_ttl_secs: std::env::var("JOB_RECORD_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
