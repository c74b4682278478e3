use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Content types the media host is asked to store. Everything else is
/// rejected before any remote call.
pub const ALLOWED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Clone)]
pub struct MediaService {
    client: Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    max_upload_bytes: usize,
}

impl MediaService {
    pub fn new(
        client: Client,
        cloud_name: String,
        api_key: String,
        api_secret: String,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            client,
            cloud_name,
            api_key,
            api_secret,
            max_upload_bytes,
        }
    }

    /// Local validation contract: content type must be in the allow-set and
    /// the payload must fit the configured limit.
    pub fn validate(&self, content_type: &str, len: usize) -> Result<()> {
        if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
            return Err(Error::UnsupportedMediaType(content_type.to_string()));
        }
        if len > self.max_upload_bytes {
            return Err(Error::PayloadTooLarge(self.max_upload_bytes));
        }
        Ok(())
    }

    /// Uploads an image to the media host under a fresh public id and
    /// returns its public retrieval URL. Validation failures never reach
    /// the network.
    pub async fn upload_image(&self, data: Bytes, content_type: &str) -> Result<String> {
        self.validate(content_type, data.len())?;

        let public_id = format!("profile_images/{}", Uuid::new_v4());
        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.sign_request(&public_id, timestamp);

        let file_part = Part::bytes(data.to_vec())
            .file_name("profile")
            .mime_str(content_type)
            .map_err(|e| Error::UploadFailed(anyhow::Error::new(e)))?;

        let form = Form::new()
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("public_id", public_id.clone())
            .text("signature_algorithm", "sha256")
            .text("signature", signature)
            .part("file", file_part);

        let endpoint = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        );

        let response = self
            .client
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::UploadFailed(anyhow::Error::new(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UploadFailed(anyhow::anyhow!(
                "media host returned {}: {}",
                status,
                body
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| Error::UploadFailed(anyhow::Error::new(e)))?;

        info!(public_id = %public_id, "Uploaded profile image");
        Ok(upload.secure_url)
    }

    /// SHA-256 request signature over the signed params plus the API secret.
    fn sign_request(&self, public_id: &str, timestamp: i64) -> String {
        let to_sign = format!(
            "public_id={}&signature_algorithm=sha256&timestamp={}{}",
            public_id, timestamp, self.api_secret
        );
        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(max_upload_bytes: usize) -> MediaService {
        MediaService::new(
            Client::new(),
            "test-cloud".to_string(),
            "key".to_string(),
            "secret".to_string(),
            max_upload_bytes,
        )
    }

    #[test]
    fn rejects_unsupported_content_type() {
        let svc = service(1024);
        let err = svc.validate("text/plain", 10).unwrap_err();
        assert!(matches!(err, Error::UnsupportedMediaType(ct) if ct == "text/plain"));
    }

    #[test]
    fn rejects_oversize_payload() {
        let svc = service(1024);
        let err = svc.validate("image/png", 2048).unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge(1024)));
    }

    #[test]
    fn accepts_allowed_types_within_limit() {
        let svc = service(1024);
        assert!(svc.validate("image/png", 512).is_ok());
        assert!(svc.validate("image/jpeg", 1024).is_ok());
    }

    #[tokio::test]
    async fn upload_fails_locally_before_any_remote_call() {
        // The client points at the real host, so an attempted request would
        // not produce these validation errors.
        let svc = service(16);
        let err = svc
            .upload_image(Bytes::from_static(b"not an image"), "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedMediaType(_)));

        let err = svc
            .upload_image(Bytes::from_static(&[0u8; 32]), "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge(16)));
    }

    #[test]
    fn request_signature_is_stable_hex() {
        let svc = service(1024);
        let a = svc.sign_request("profile_images/abc", 1700000000);
        let b = svc.sign_request("profile_images/abc", 1700000000);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
