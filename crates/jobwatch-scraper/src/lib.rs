//! Fetch backends for career pages and the posting normalizer.

pub mod client;
pub mod detail;
pub mod error;
pub mod greenhouse;
pub mod html;
pub mod normalize;
pub mod origin;
mod retry;
pub mod source;

pub use client::{HttpClient, HttpOptions};
pub use detail::{parse_detail, HttpDetailSource};
pub use error::ScraperError;
pub use html::parse_listing;
pub use normalize::{normalize_posting, resolve_url};
pub use origin::extract_site_origin;
pub use source::{run_cancellable, DetailSource, HttpPostingSource, PostingSource};
