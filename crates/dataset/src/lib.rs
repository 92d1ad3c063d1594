//! # GeoBrent Dataset Crate
//!
//! This crate owns the three in-memory data feeds the service answers from:
//! the daily price series, the geopolitical event catalog and the registry of
//! precomputed change points.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Adapter:** All file formats (CSV, JSON) and the synthetic
//!   fallback generator live here. The rest of the application sees only typed,
//!   validated collections.
//! - **Immutable After Load:** A `Dataset` is built once at startup and only
//!   exposes `&self` accessors, so it can be shared across request handlers
//!   behind an `Arc` without locking.
//! - **Always Available:** A missing or malformed price feed is logged and
//!   replaced by a seeded synthetic series; a broken catalog override falls
//!   back to the built-in catalog.
//!
//! ## Public API
//!
//! - `Dataset`: The immutable snapshot handed to request handlers.
//! - `PriceSeries`: Sorted daily prices with derived columns.
//! - `EventCatalog` / `ChangePointRegistry`: The static annotation feeds.
//! - `DataError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod catalog;
pub mod change_points;
pub mod csv_source;
pub mod error;
pub mod prices;
pub mod snapshot;
pub mod synthetic;

// Re-export the key components to create a clean, public-facing API.
pub use catalog::EventCatalog;
pub use change_points::ChangePointRegistry;
pub use error::DataError;
pub use prices::{Observation, PriceSeries};
pub use snapshot::Dataset;
