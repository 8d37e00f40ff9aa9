//! Comment sentiment scoring for polytube.
//!
//! A fixed lexicon-and-rules polarity analyzer (VADER): every text maps to the same
//! four-component score on every call, with no state carried between calls.
//! The compound component drives the three-way label used in the reports.

pub mod analyzer;
pub mod error;
pub mod types;

pub use analyzer::SentimentAnalyzer;
pub use error::SentimentParseError;
pub use types::{SentimentLabel, SentimentScore};
