use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigurationError, Result};
use crate::evm::ReportingBucket;

/// Tunables for status classification and trend analysis.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EvmSettings {
    /// CPI and SPI at or above this value mark a project as ahead.
    pub ahead_threshold: Decimal,
    /// CPI and SPI at or above this value (but below `ahead_threshold`) mark it on track.
    pub on_track_threshold: Decimal,
    /// Number of most recent measurable index values considered by trend analysis.
    pub trend_window: usize,
    /// Average change per point beyond which a trend is improving or declining.
    pub trend_tolerance: Decimal,
    pub default_bucket: ReportingBucket,
}

impl Default for EvmSettings {
    fn default() -> Self {
        Self {
            ahead_threshold: Decimal::ONE,
            on_track_threshold: dec!(0.9),
            trend_window: 3,
            trend_tolerance: dec!(0.05),
            default_bucket: ReportingBucket::Month,
        }
    }
}

impl EvmSettings {
    pub fn validate(&self) -> Result<()> {
        if self.on_track_threshold <= Decimal::ZERO {
            return Err(invalid("onTrackThreshold", "must be positive"));
        }
        if self.ahead_threshold < self.on_track_threshold {
            return Err(invalid(
                "aheadThreshold",
                "must not be lower than onTrackThreshold",
            ));
        }
        if self.trend_window < 2 {
            return Err(invalid("trendWindow", "must be at least 2"));
        }
        if self.trend_tolerance < Decimal::ZERO {
            return Err(invalid("trendTolerance", "must not be negative"));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> crate::errors::Error {
    ConfigurationError::InvalidSetting {
        key: key.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
