//! Earned value management calculation.
//!
//! - **Calculator** (`evm_calculator.rs`) - point-in-time PV/EV/AC and derived indices
//! - **Series builder** (`series_builder.rs`) - bucketed snapshots for S-curves
//! - **Trend** (`trend.rs`) - CPI/SPI direction over recent points
//! - **Data quality** (`data_quality.rs`) - warnings attached to snapshots
//! - **Service** (`evm_service.rs`) - record store access around the pure calculator

mod data_quality;
mod evm_calculator;
mod evm_model;
mod evm_service;
mod evm_traits;
mod series_builder;
mod trend;

pub use data_quality::{inspect_records, DataQualityIssue, DataQualityWarning};
pub use evm_calculator::{classify_status, compute_snapshot, ProjectRecords};
pub use evm_model::*;
pub use evm_service::EvmService;
pub use evm_traits::EvmServiceTrait;
pub use series_builder::{build_series, BucketTimeline, SeriesBuilder};
pub use trend::analyze_trend;

#[cfg(test)]
mod trend_tests;
