//! Name normalization and similarity scoring
//!
//! Everything that compares two company names goes through here:
//! - [`normalizer`] canonicalizes names and extracts keywords
//! - [`similarity`] scores two names in `[0, 1]` with length/containment gates

pub mod normalizer;
pub mod similarity;

pub use normalizer::{extract_keywords, normalize};
pub use similarity::{sequence_ratio, similarity};
