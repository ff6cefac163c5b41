//! Outbound gateway to the club's backend service.
//!
//! ARCHITECTURE
//! ============
//! Route handlers never hold a reqwest client. They build an
//! `UpstreamRequest`, hand it to the `BackendApi` trait object on
//! `AppState`, and normalize the reply into the API envelope. Tests swap
//! in a scripted stub behind the same trait, so the proxy contract (what
//! gets forwarded, with which headers) is assertable without a network.

pub mod http;
pub mod types;

use async_trait::async_trait;

pub use http::HttpBackend;
pub use types::{
    BackendError, Method, RawReply, UploadPart, UpstreamBody, UpstreamPayload, UpstreamReply,
    UpstreamRequest,
};

/// Gateway seam in front of the external backend.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Forward an API request and decode the reply as JSON or text.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` when the request cannot be built or sent, or
    /// when the reply body cannot be read.
    async fn send(&self, req: UpstreamRequest) -> Result<UpstreamReply, BackendError>;

    /// Fetch a stored file as raw bytes, keeping status and content type.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` when the request fails or the body cannot be
    /// read.
    async fn fetch_raw(&self, path: &str, bearer: Option<&str>)
    -> Result<RawReply, BackendError>;
}
