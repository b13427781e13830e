//! Outcheck validates that the example output embedded in a source file's
//! documentation comment matches the output actually captured from running
//! that example, while tolerating legitimate nondeterminism (timestamps,
//! object addresses, unordered-container iteration, thread interleaving).
//!
//! The pipeline: a [`duet::Duet`] pairs a captured `.out` artifact with its
//! companion source file, extracts the embedded `/* Output: ... */` block,
//! runs both texts through the per-file [`adjust::Adjustment`] chain resolved
//! from the [`strategy::StrategyTable`], and classifies the comparison as a
//! [`duet::Validity`]. The [`varying`] filters give near-misses a second
//! chance when only volatile substrings differ.

pub use crate::duet::{Duet, Validity};
pub use crate::errors::{OutcheckError, Result};
pub use crate::strategy::ValidationConfig;

pub mod adjust;
pub mod cli;
pub mod discovery;
pub mod duet;
pub mod errors;
pub mod strategy;
pub mod varying;
