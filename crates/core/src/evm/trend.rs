use rust_decimal::Decimal;

use super::evm_model::{EvmSnapshot, PerformanceIndex, TrendAnalysis, TrendDirection};
use crate::settings::EvmSettings;

/// CPI and SPI direction over the most recent measurable points of a series.
pub fn analyze_trend(
    project_id: &str,
    snapshots: &[EvmSnapshot],
    settings: &EvmSettings,
) -> TrendAnalysis {
    let cpi: Vec<&PerformanceIndex> = snapshots.iter().map(|s| &s.cost_performance_index).collect();
    let spi: Vec<&PerformanceIndex> = snapshots
        .iter()
        .map(|s| &s.schedule_performance_index)
        .collect();

    TrendAnalysis {
        project_id: project_id.to_string(),
        latest_cpi: cpi.last().map(|i| **i),
        latest_spi: spi.last().map(|i| **i),
        cpi_trend: trend_direction(&cpi, settings),
        spi_trend: trend_direction(&spi, settings),
        data_points: snapshots.len(),
    }
}

fn trend_direction(indices: &[&PerformanceIndex], settings: &EvmSettings) -> TrendDirection {
    let values: Vec<Decimal> = indices.iter().filter_map(|i| i.value()).collect();
    let window = settings.trend_window.max(2);
    let recent = &values[values.len().saturating_sub(window)..];
    if recent.len() < 2 {
        return TrendDirection::Stable;
    }

    let total_change: Decimal = recent.windows(2).map(|pair| pair[1] - pair[0]).sum();
    let average_change = total_change / Decimal::from(recent.len() - 1);

    if average_change > settings.trend_tolerance {
        TrendDirection::Improving
    } else if average_change < -settings.trend_tolerance {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}
