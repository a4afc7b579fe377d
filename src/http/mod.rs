//! HTTP transport with failure normalization and a single-retry policy.

mod client;
mod error;
mod retry;

pub use client::HttpClient;
pub use error::{ApiError, TransportFailure, parse_body};
pub use retry::{Attempt, with_single_retry};
