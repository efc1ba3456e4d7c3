//! Portfolio aggregation across projects.
//!
//! - **Aggregator** (`portfolio_aggregator.rs`) - sums project series per date
//!   with carry-forward and cost-weighted indices
//! - **Service** (`portfolio_service.rs`) - selection handling, parallel
//!   per-project computation and failure isolation

mod portfolio_aggregator;
mod portfolio_model;
mod portfolio_service;
mod portfolio_traits;

pub use portfolio_aggregator::{aggregate, PortfolioAggregator};
pub use portfolio_model::*;
pub use portfolio_service::PortfolioService;
pub use portfolio_traits::PortfolioServiceTrait;

#[cfg(test)]
mod portfolio_aggregator_tests;
