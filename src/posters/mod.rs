//! Canonical poster records and the normalization pass that produces them.

mod normalizer;
mod record;

pub use normalizer::{normalize, Filters, SourceInfo};
pub use record::PosterRecord;
