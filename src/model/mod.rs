//! Domain model: line ranges, diff mappings and shared identifiers.
//!
//! Everything here is plain data. The diff collaborator produces
//! [`LineRangeMapping`]s and [`MovedText`] blocks; the rest of the crate only
//! reads them.

pub mod error;
pub mod line_range;
pub mod mapping;
pub mod types;

pub use error::{InvalidLineRange, StaleDiff};
pub use line_range::LineRange;
pub use mapping::{LineRangeMapping, MovedText, RangeMapping, TextRange};
pub use types::{PayloadHandle, PerSide, Side, Timestamp, ZoneId};
