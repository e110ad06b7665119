//! Listing image endpoints
//!
//! Uploads are signed: the backend hands out a timestamp and signature,
//! and the file itself goes straight to the image host as a multipart
//! form. Deletion goes back through the backend, which holds the secret.

use crate::client::HomeCookClient;
use crate::error::{ApiError, ApiResult};
use reqwest::multipart::{Form, Part};
use serde::de::{self, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Upload signature issued by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadSignature {
    /// Unix timestamp the signature covers
    #[serde(deserialize_with = "string_or_number")]
    pub timestamp: String,
    /// Hex signature over the upload parameters
    pub signature: String,
}

/// Image host response for a stored image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedImage {
    /// Host-side identifier, used for deletion
    pub public_id: String,
    /// Plain HTTP URL
    #[serde(default)]
    pub url: String,
    /// HTTPS URL
    pub secure_url: String,
    /// Stored format (jpg, png, webp)
    #[serde(default)]
    pub format: Option<String>,
    /// Width in pixels
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels
    #[serde(default)]
    pub height: Option<u32>,
    /// Stored size in bytes
    #[serde(default)]
    pub bytes: Option<u64>,
}

/// A local image ready to be uploaded
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Original file name
    pub file_name: String,
    /// MIME type
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Images API interface
#[derive(Clone)]
pub struct ImagesApi {
    client: HomeCookClient,
}

impl ImagesApi {
    /// Create a new images API interface
    pub(crate) fn new(client: HomeCookClient) -> Self {
        Self { client }
    }

    /// Ask the backend to sign an upload
    ///
    /// POST /Cloudinary/signature
    pub async fn signature(&self) -> ApiResult<UploadSignature> {
        self.client
            .post("Cloudinary/signature", &serde_json::json!({}))
            .await
    }

    /// Upload one file to the image host using `signature`
    ///
    /// POST {host}/{cloud}/image/upload (multipart)
    pub async fn upload(
        &self,
        signature: &UploadSignature,
        file: ImageFile,
    ) -> ApiResult<UploadedImage> {
        let host = &self.client.config().image_host;
        if host.cloud_name.is_empty() {
            return Err(ApiError::config("image host cloud_name is not configured"));
        }

        let file_name = file.file_name.clone();
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;

        let form = Form::new()
            .part("file", part)
            .text("api_key", host.api_key.clone())
            .text("timestamp", signature.timestamp.clone())
            .text("signature", signature.signature.clone())
            .text("upload_preset", host.upload_preset.clone());

        debug!(file = %file_name, "Uploading image");
        let image: UploadedImage = self
            .client
            .post_multipart_url(&host.image_upload_url(), form)
            .await?;
        info!(file = %file_name, public_id = %image.public_id, "Image uploaded");
        Ok(image)
    }

    /// Delete an uploaded image
    ///
    /// DELETE /Cloudinary?publicId=<id>
    pub async fn delete(&self, public_id: &str) -> ApiResult<()> {
        let _: IgnoredAny = self
            .client
            .delete_with_query("Cloudinary", &[("publicId", public_id)])
            .await?;
        info!(public_id, "Image deleted");
        Ok(())
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct Visitor;

    impl de::Visitor<'_> for Visitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or an integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, ImageHostConfig};

    #[test]
    fn test_signature_accepts_numeric_timestamp() {
        let sig: UploadSignature =
            serde_json::from_str(r#"{"timestamp": 1730000000, "signature": "abc123"}"#).unwrap();
        assert_eq!(sig.timestamp, "1730000000");

        let sig: UploadSignature =
            serde_json::from_str(r#"{"timestamp": "1730000000", "signature": "abc123"}"#)
                .unwrap();
        assert_eq!(sig.timestamp, "1730000000");
    }

    #[test]
    fn test_uploaded_image_deserialize() {
        let json = r#"{
            "public_id": "homecook/abc",
            "url": "http://res.example.com/abc.jpg",
            "secure_url": "https://res.example.com/abc.jpg",
            "format": "jpg",
            "width": 800,
            "height": 600,
            "bytes": 12345,
            "etag": "ignored"
        }"#;

        let image: UploadedImage = serde_json::from_str(json).unwrap();
        assert_eq!(image.public_id, "homecook/abc");
        assert_eq!(image.width, Some(800));
        assert_eq!(image.bytes, Some(12345));
    }

    #[test]
    fn test_image_file_debug_omits_bytes() {
        let file = ImageFile {
            file_name: "pie.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xFF; 64],
        };
        let debug = format!("{file:?}");
        assert!(debug.contains("len: 64"));
        assert!(!debug.contains("255"));
    }

    #[tokio::test]
    async fn test_upload_requires_cloud_name() {
        let config = ClientConfig::development().with_image_host(ImageHostConfig::default());
        let client = HomeCookClient::with_config(config).unwrap();
        let signature = UploadSignature {
            timestamp: "1".into(),
            signature: "s".into(),
        };
        let file = ImageFile {
            file_name: "pie.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        };

        let result = client.images().upload(&signature, file).await;
        assert!(matches!(result, Err(ApiError::Config(_))));
    }
}
