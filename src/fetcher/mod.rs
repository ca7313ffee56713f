//! Remote analysis API client and HTML page fetching.

pub mod analysis;
pub mod client;
pub mod errors;
pub mod pipeline;
pub mod types;
pub mod wire;

pub use analysis::{AnalysisClient, DEFAULT_MODEL_TYPE};
pub use client::fetch_page;
pub use errors::FetchError;
pub use types::{Charset, PageResponse};
