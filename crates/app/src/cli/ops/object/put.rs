use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;
use tokio::io::AsyncReadExt;

use objects_service::http_server::api::client::ApiError;
use objects_service::http_server::api::objects::{PutObjectRequest, PutObjectResponse};

#[derive(Args, Debug, Clone)]
pub struct Put {
    /// Bucket to store the object in (created if missing)
    #[arg(long)]
    pub bucket: String,

    /// Object identifier within the bucket
    #[arg(long = "id")]
    pub object_id: String,

    /// File to upload (reads stdin if not set)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ObjectPutError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Put {
    type Error = ObjectPutError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let data = match &self.file {
            Some(path) => tokio::fs::read(path).await?,
            None => {
                let mut data = Vec::new();
                tokio::io::stdin().read_to_end(&mut data).await?;
                data
            }
        };
        let size = data.len();

        let request = PutObjectRequest {
            bucket: self.bucket.clone(),
            object_id: self.object_id.clone(),
            data: Bytes::from(data),
        };

        let response: PutObjectResponse = ctx.client.call(request).await?;

        Ok(format!(
            "Stored object {} in bucket {} ({} bytes)",
            response.id, self.bucket, size
        ))
    }
}
