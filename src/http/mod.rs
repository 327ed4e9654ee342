//! HTTP layer: transport seam, retry policy and the authenticated client.

mod client;
mod retry;
mod transport;

pub use client::{RequestOptions, SigmaClient};
pub use retry::{MAX_ATTEMPTS, RETRY_DELAY_MS, RetryPolicy};
pub use transport::{ApiRequest, ApiResponse, RequestBody, ReqwestTransport, Transport};

#[cfg(test)]
pub use transport::MockTransport;
