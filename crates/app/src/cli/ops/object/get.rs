use std::path::PathBuf;

use clap::Args;
use tokio::io::AsyncWriteExt;

use objects_service::http_server::api::client::ApiError;
use objects_service::http_server::api::objects::{GetObjectRequest, GetObjectResponse};

#[derive(Args, Debug, Clone)]
pub struct Get {
    /// Bucket holding the object
    #[arg(long)]
    pub bucket: String,

    /// Object identifier within the bucket
    #[arg(long = "id")]
    pub object_id: String,

    /// Write the content to this file (writes to stdout if not set)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ObjectGetError {
    #[error("object {object_id} not found in bucket {bucket}")]
    NotFound { bucket: String, object_id: String },
    #[error("API error: {0}")]
    Api(ApiError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Get {
    type Error = ObjectGetError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let request = GetObjectRequest {
            bucket: self.bucket.clone(),
            object_id: self.object_id.clone(),
        };

        let response: GetObjectResponse = match ctx.client.call(request).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                return Err(ObjectGetError::NotFound {
                    bucket: self.bucket.clone(),
                    object_id: self.object_id.clone(),
                })
            }
            Err(e) => return Err(ObjectGetError::Api(e)),
        };

        match &self.output {
            Some(path) => {
                tokio::fs::write(path, &response.data).await?;
                Ok(format!(
                    "Wrote {} bytes to {}",
                    response.data.len(),
                    path.display()
                ))
            }
            None => {
                // raw bytes go straight to stdout, nothing left to print
                let mut stdout = tokio::io::stdout();
                stdout.write_all(&response.data).await?;
                stdout.flush().await?;
                Ok(String::new())
            }
        }
    }
}
