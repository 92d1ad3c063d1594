//! # GeoBrent Analytics Engine
//!
//! This crate derives statistics from the daily price series. It is the only
//! place in the system that does non-trivial numeric work.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   HTTP or configuration sources. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** `WindowStatisticsEngine` takes a sorted slice of
//!   `PricePoint`s and an anchor date and produces a `WindowAnalysis`. The same
//!   inputs always produce the same output.
//!
//! ## Public API
//!
//! - `RollingWindow`: The O(1) sliding-window accumulator behind the derived columns.
//! - `WindowStatisticsEngine`: Before/after partitioning around an anchor date.
//! - `DashboardSummary`: Headline metrics for the dashboard landing page.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod rolling;
pub mod stats;
pub mod summary;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{WindowStatisticsEngine, select_range};
pub use error::AnalyticsError;
pub use report::{ImpactMetrics, PartitionStats, WindowAnalysis};
pub use rolling::RollingWindow;
pub use summary::{CurrentMetrics, DashboardSummary, DataCoverage, SummaryParams};
