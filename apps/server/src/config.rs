use std::{fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use rust_decimal::Decimal;
use sitefolio_core::evm::ReportingBucket;
use sitefolio_core::settings::EvmSettings;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_file: PathBuf,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Most bucket dates a single series or aggregate request may span.
    pub max_series_points: usize,
    pub evm: EvmSettings,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("SF_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid SF_LISTEN_ADDR")?;
        let data_file = std::env::var("SF_DATA_FILE")
            .unwrap_or_else(|_| "./data/records.json".into())
            .into();
        let cors_allow = std::env::var("SF_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("SF_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let max_series_points = env_parse::<usize>("SF_MAX_SERIES_POINTS")?.unwrap_or(10_000);
        if max_series_points == 0 {
            return Err(anyhow!("SF_MAX_SERIES_POINTS must be positive"));
        }

        Ok(Self {
            listen_addr,
            data_file,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            max_series_points,
            evm: evm_settings_from_env()?,
        })
    }
}

/// Engine settings, starting from the defaults and overridden per variable.
fn evm_settings_from_env() -> anyhow::Result<EvmSettings> {
    let mut settings = EvmSettings::default();
    if let Some(v) = env_parse::<Decimal>("SF_AHEAD_THRESHOLD")? {
        settings.ahead_threshold = v;
    }
    if let Some(v) = env_parse::<Decimal>("SF_ON_TRACK_THRESHOLD")? {
        settings.on_track_threshold = v;
    }
    if let Some(v) = env_parse::<usize>("SF_TREND_WINDOW")? {
        settings.trend_window = v;
    }
    if let Some(v) = env_parse::<Decimal>("SF_TREND_TOLERANCE")? {
        settings.trend_tolerance = v;
    }
    if let Some(v) = env_parse::<ReportingBucket>("SF_DEFAULT_BUCKET")? {
        settings.default_bucket = v;
    }
    settings.validate()?;
    Ok(settings)
}

fn env_parse<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow!("Invalid {}: {}", key, e)),
        _ => Ok(None),
    }
}
