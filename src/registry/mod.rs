//! Zone contents keyed by layout leaf, with blake3-based change detection.

mod core;

pub use core::{ZoneContent, ZoneId, ZoneRegistry, ZoneState};
