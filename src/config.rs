use std::time::Duration;

use crate::types::palette::DEFAULT_COLORS;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub max_file_size: usize,
    pub cache_ttl: Duration,
    /// Track colors, in the order they are assigned to imported activities.
    pub palette: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let max_file_size_mb = std::env::var("MAX_FILE_SIZE_MB")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(25);

        let cache_ttl_seconds = std::env::var("CACHE_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600);

        let palette = std::env::var("TRACK_PALETTE")
            .ok()
            .map(|s| s.split(',').map(|c| c.trim().to_string()).collect())
            .unwrap_or_else(|| DEFAULT_COLORS.iter().map(|c| c.to_string()).collect());

        Self {
            port,
            max_file_size: max_file_size_mb * 1024 * 1024,
            cache_ttl: Duration::from_secs(cache_ttl_seconds),
            palette,
        }
    }
}
