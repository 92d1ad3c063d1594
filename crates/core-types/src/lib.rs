pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ChangePointKind, EventCategory, ImpactLevel};
pub use error::CoreError;
pub use structs::{ChangePoint, Event, PricePoint};
