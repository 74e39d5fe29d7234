mod client;
mod error;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

pub use client::ApiClient;
pub use error::ApiError;

/// A request the CLI can send to the service
pub trait ApiRequest {
    type Response: ApiResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError>;
}

/// Decodes a successful response body
#[async_trait]
pub trait ApiResponse: Sized {
    async fn from_response(response: Response) -> Result<Self, ApiError>;
}
