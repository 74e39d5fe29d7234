use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder};
use store::ObjectStoreError;
use url::Url;

use super::{object_url, InvalidName, ObjectPath};
use crate::daemon::http_server::api::client::{ApiError, ApiRequest, ApiResponse};
use crate::daemon::ServiceState;

#[derive(Debug, Clone, clap::Args)]
pub struct DeleteObjectRequest {
    /// Bucket holding the object
    #[arg(long)]
    pub bucket: String,

    /// Object to remove
    #[arg(long = "id")]
    pub object_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteObjectResponse;

pub async fn handler(
    State(state): State<ServiceState>,
    Path(path): Path<ObjectPath>,
) -> Result<StatusCode, DeleteObjectError> {
    path.validate()?;
    let ObjectPath { bucket, object_id } = path;

    tracing::info!(bucket = %bucket, object_id = %object_id, "deleting object");

    if !state
        .store()
        .remove_object_if_exists(&bucket, &object_id)
        .await?
    {
        tracing::info!(bucket = %bucket, object_id = %object_id, "object does not exist");
        return Err(DeleteObjectError::NotFound);
    }

    Ok(StatusCode::OK)
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteObjectError {
    #[error(transparent)]
    InvalidName(#[from] InvalidName),
    #[error("object not found")]
    NotFound,
    #[error("store error: {0}")]
    Store(#[from] ObjectStoreError),
}

impl IntoResponse for DeleteObjectError {
    fn into_response(self) -> Response {
        match self {
            DeleteObjectError::InvalidName(e) => {
                tracing::warn!("DELETE OBJECT: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string()).into_response()
            }
            DeleteObjectError::NotFound => StatusCode::NOT_FOUND.into_response(),
            DeleteObjectError::Store(e) => {
                tracing::error!("DELETE OBJECT ERROR: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl ApiRequest for DeleteObjectRequest {
    type Response = DeleteObjectResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = object_url(base_url, &self.bucket, &self.object_id)?;
        Ok(client.delete(url))
    }
}

#[async_trait]
impl ApiResponse for DeleteObjectResponse {
    async fn from_response(_response: reqwest::Response) -> Result<Self, ApiError> {
        Ok(Self)
    }
}
