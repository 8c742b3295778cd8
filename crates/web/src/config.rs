use anyhow::{Context, Result};

/// Broadcast capacity of the change bus when `FEED_CHANNEL_CAPACITY` is unset.
const DEFAULT_FEED_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub feed_channel_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let feed_channel_capacity = match std::env::var("FEED_CHANNEL_CAPACITY") {
            Ok(value) => value
                .parse::<usize>()
                .context("FEED_CHANNEL_CAPACITY must be a number")?,
            Err(_) => DEFAULT_FEED_CHANNEL_CAPACITY,
        };
        anyhow::ensure!(
            feed_channel_capacity > 0,
            "FEED_CHANNEL_CAPACITY must be greater than zero"
        );

        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            feed_channel_capacity,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
