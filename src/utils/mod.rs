//! Utility modules supporting search transport.
//!
//! - [`HttpClient`]: shared HTTP client with sane timeouts
//! - [`with_retry`] / [`RetryConfig`]: automatic retry with exponential
//!   backoff for transient API failures
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use prisma_search::utils::{with_retry, api_retry_config};
//! use prisma_search::sources::SourceError;
//!
//! # async fn fetch_data() -> Result<String, SourceError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), SourceError> {
//! let result = with_retry(api_retry_config(), || async { fetch_data().await }).await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod retry;

pub use http::HttpClient;
pub use retry::{api_retry_config, with_retry, RetryConfig, TransientError};
