use axum::routing;
use axum::Router;
use serde::Deserialize;
use url::Url;

pub mod delete;
pub mod get;
pub mod put;

pub use delete::{DeleteObjectRequest, DeleteObjectResponse};
pub use get::{GetObjectRequest, GetObjectResponse};
pub use put::{PutObjectRequest, PutObjectResponse};

use super::client::ApiError;
use crate::daemon::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route(
            "/:bucket/:object_id",
            routing::put(put::handler)
                .get(get::handler)
                .delete(delete::handler),
        )
        .with_state(state)
}

/// Path parameters shared by every object route
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectPath {
    pub bucket: String,
    pub object_id: String,
}

impl ObjectPath {
    /// Reject names that would escape their directory once joined onto the store root
    pub fn validate(&self) -> Result<(), InvalidName> {
        check_name("bucket", &self.bucket)?;
        check_name("object id", &self.object_id)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid {kind}: {name:?}")]
pub struct InvalidName {
    kind: &'static str,
    name: String,
}

fn check_name(kind: &'static str, name: &str) -> Result<(), InvalidName> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        return Err(InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// `{base}/objects/{bucket}/{object_id}` with both names percent-encoded as single segments
fn object_url(base_url: &Url, bucket: &str, object_id: &str) -> Result<Url, ApiError> {
    // the url crate silently drops `.` and `..` segments, so check before building
    check_name("bucket", bucket).map_err(|e| ApiError::InvalidPath(e.to_string()))?;
    check_name("object id", object_id).map_err(|e| ApiError::InvalidPath(e.to_string()))?;

    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::CannotBeABase(base_url.clone()))?
        .pop_if_empty()
        .extend(["objects", bucket, object_id]);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(bucket: &str, object_id: &str) -> ObjectPath {
        ObjectPath {
            bucket: bucket.to_string(),
            object_id: object_id.to_string(),
        }
    }

    #[test]
    fn test_validate() {
        assert!(path("images", "logo.png").validate().is_ok());
        assert!(path("b", "..hidden").validate().is_ok());

        assert!(path("", "o").validate().is_err());
        assert!(path(".", "o").validate().is_err());
        assert!(path("b", "..").validate().is_err());
        assert!(path("b", "a/b").validate().is_err());
        assert!(path("a\\b", "o").validate().is_err());
    }

    #[test]
    fn test_object_url() {
        let base = Url::parse("http://localhost:8080").unwrap();
        let url = object_url(&base, "images", "logo.png").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/objects/images/logo.png");

        let url = object_url(&base, "b", "a b").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/objects/b/a%20b");

        assert!(matches!(
            object_url(&base, "..", "o"),
            Err(ApiError::InvalidPath(_))
        ));
        assert!(matches!(
            object_url(&base, "b", "a/b"),
            Err(ApiError::InvalidPath(_))
        ));

        let base = Url::parse("http://localhost:8080/prefix/").unwrap();
        let url = object_url(&base, "b", "o").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/prefix/objects/b/o");
    }
}
