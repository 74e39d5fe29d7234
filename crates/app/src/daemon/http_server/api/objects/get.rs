use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use reqwest::{Client, RequestBuilder};
use store::ObjectStoreError;
use tokio::io::AsyncReadExt;
use url::Url;

use super::{object_url, InvalidName, ObjectPath};
use crate::daemon::http_server::api::client::{ApiError, ApiRequest, ApiResponse};
use crate::daemon::ServiceState;

#[derive(Debug, Clone)]
pub struct GetObjectRequest {
    pub bucket: String,
    pub object_id: String,
}

/// Raw object content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetObjectResponse {
    pub data: Bytes,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(path): Path<ObjectPath>,
) -> Result<Response, GetObjectError> {
    path.validate()?;
    let ObjectPath { bucket, object_id } = path;

    tracing::info!(bucket = %bucket, object_id = %object_id, "getting object");

    let Some(mut object) = state
        .store()
        .get_object_if_exists(&bucket, &object_id)
        .await?
    else {
        tracing::info!(bucket = %bucket, object_id = %object_id, "object does not exist");
        return Err(GetObjectError::NotFound);
    };

    let mut data = Vec::new();
    object.read_to_end(&mut data).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        data,
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum GetObjectError {
    #[error(transparent)]
    InvalidName(#[from] InvalidName),
    #[error("object not found")]
    NotFound,
    #[error("store error: {0}")]
    Store(#[from] ObjectStoreError),
    #[error("can not read object: {0}")]
    Read(#[from] std::io::Error),
}

impl IntoResponse for GetObjectError {
    fn into_response(self) -> Response {
        match self {
            GetObjectError::InvalidName(e) => {
                tracing::warn!("GET OBJECT: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string()).into_response()
            }
            GetObjectError::NotFound => StatusCode::NOT_FOUND.into_response(),
            e => {
                tracing::error!("GET OBJECT ERROR: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl ApiRequest for GetObjectRequest {
    type Response = GetObjectResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = object_url(base_url, &self.bucket, &self.object_id)?;
        Ok(client.get(url))
    }
}

#[async_trait]
impl ApiResponse for GetObjectResponse {
    async fn from_response(response: reqwest::Response) -> Result<Self, ApiError> {
        Ok(Self {
            data: response.bytes().await?,
        })
    }
}
