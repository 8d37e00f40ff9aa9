//! Typed client for the video platform's Data API.
//!
//! Covers the three endpoints the pipeline needs: channel-scoped keyword
//! search, per-video statistics, and paginated comment threads. Failures are
//! mapped onto a small closed taxonomy ([`ApiErrorKind`]) so callers never
//! compare raw reason strings.

pub mod client;
pub mod comments;
pub mod error;
pub mod pagination;
pub mod types;

pub use client::YoutubeClient;
pub use comments::{CommentFetch, ExtractedVideo};
pub use error::{ApiErrorKind, YoutubeError};
pub use pagination::collect_pages;
