use std::io::SeekFrom;

use async_trait::async_trait;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use store::ObjectStoreError;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use url::Url;

use super::{object_url, InvalidName, ObjectPath};
use crate::daemon::http_server::api::client::{ApiError, ApiRequest, ApiResponse};
use crate::daemon::ServiceState;

#[derive(Debug, Clone)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub object_id: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutObjectResponse {
    pub id: String,
}

/// Create the object, or replace its whole content if it already exists.
pub async fn handler(
    State(state): State<ServiceState>,
    Path(path): Path<ObjectPath>,
    body: Bytes,
) -> Result<impl IntoResponse, PutObjectError> {
    path.validate()?;
    let ObjectPath { bucket, object_id } = path;

    tracing::info!(bucket = %bucket, object_id = %object_id, size = body.len(), "creating object");

    let store = state.store();
    store.create_bucket_if_not_exists(&bucket).await?;

    let mut object = store.create_or_open_object(&bucket, &object_id).await?;
    object.seek(SeekFrom::Start(0)).await?;
    object.write_all(&body).await?;
    object.flush().await?;
    // drop whatever a longer previous version left past the new end
    object.set_len(body.len() as u64).await?;

    Ok((StatusCode::OK, Json(PutObjectResponse { id: object_id })))
}

#[derive(Debug, thiserror::Error)]
pub enum PutObjectError {
    #[error(transparent)]
    InvalidName(#[from] InvalidName),
    #[error("store error: {0}")]
    Store(#[from] ObjectStoreError),
    #[error("can not write object: {0}")]
    Write(#[from] std::io::Error),
}

impl IntoResponse for PutObjectError {
    fn into_response(self) -> Response {
        match self {
            PutObjectError::InvalidName(e) => {
                tracing::warn!("PUT OBJECT: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string()).into_response()
            }
            e => {
                tracing::error!("PUT OBJECT ERROR: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl ApiRequest for PutObjectRequest {
    type Response = PutObjectResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = object_url(base_url, &self.bucket, &self.object_id)?;
        Ok(client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(self.data))
    }
}

#[async_trait]
impl ApiResponse for PutObjectResponse {
    async fn from_response(response: reqwest::Response) -> Result<Self, ApiError> {
        Ok(response.json().await?)
    }
}
