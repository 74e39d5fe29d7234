use objects_service::http_server::api::client::ApiError;
use objects_service::http_server::api::objects::DeleteObjectRequest;

#[derive(Debug, thiserror::Error)]
pub enum ObjectRmError {
    #[error("object {object_id} not found in bucket {bucket}")]
    NotFound { bucket: String, object_id: String },
    #[error("API error: {0}")]
    Api(ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for DeleteObjectRequest {
    type Error = ObjectRmError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        match ctx.client.call(self.clone()).await {
            Ok(_) => Ok(format!(
                "Removed object {} from bucket {}",
                self.object_id, self.bucket
            )),
            Err(e) if e.is_not_found() => Err(ObjectRmError::NotFound {
                bucket: self.bucket.clone(),
                object_id: self.object_id.clone(),
            }),
            Err(e) => Err(ObjectRmError::Api(e)),
        }
    }
}
