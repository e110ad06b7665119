//! Listing photo uploads
//!
//! A drop of files is screened locally, signed once by the backend and
//! then uploaded to the image host concurrently. Successful uploads are
//! kept even when others in the same drop fail.

use crate::backend::{ImageHost, MarketplaceApi};
use crate::error::{AppError, AppResult};
use crate::notify::{Notification, Notifier};
use futures_util::future::join_all;
use homecook_api_client::endpoints::{ImageFile, UploadedImage};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Files accepted per drop unless configured otherwise
pub const DEFAULT_MAX_FILES: usize = 10;

const UPLOAD_FAILED: &str = "Failed to upload image, please try again";

/// Image formats the host accepts for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// WebP image
    WebP,
}

impl ImageFormat {
    /// MIME type sent with the upload
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }
}

/// Detect a supported format from the leading bytes
#[must_use]
pub fn detect_format(data: &[u8]) -> Option<ImageFormat> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(ImageFormat::Jpeg);
    }

    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some(ImageFormat::Png);
    }

    // RIFF....WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some(ImageFormat::WebP);
    }

    None
}

/// A file picked by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    /// File name shown to the user and sent to the host
    pub file_name: String,
    /// Contents
    pub bytes: Vec<u8>,
}

impl PendingFile {
    /// Read a file from disk
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let bytes = std::fs::read(path).map_err(homecook_core::Error::from)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self { file_name, bytes })
    }
}

/// What happened to one drop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOutcome {
    /// Images now stored on the host
    pub uploaded: Vec<UploadedImage>,
    /// Files the host refused
    pub failed: Vec<String>,
    /// Files skipped locally because of their format
    pub rejected: Vec<String>,
}

impl UploadOutcome {
    /// Whether every dropped file ended up on the host
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.rejected.is_empty()
    }
}

/// Uploaded images of a listing being created
pub struct ImageUploader {
    api: Arc<dyn MarketplaceApi>,
    host: Arc<dyn ImageHost>,
    notifier: Arc<dyn Notifier>,
    max_files: usize,
    images: RwLock<Vec<UploadedImage>>,
    in_flight: AtomicUsize,
}

impl ImageUploader {
    /// Create an uploader with no images
    pub fn new(
        api: Arc<dyn MarketplaceApi>,
        host: Arc<dyn ImageHost>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            host,
            notifier,
            max_files: DEFAULT_MAX_FILES,
            images: RwLock::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Change the per-drop file limit
    #[must_use]
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Images uploaded so far, in upload order
    #[must_use]
    pub fn images(&self) -> Vec<UploadedImage> {
        self.images.read().map(|g| g.clone()).unwrap_or_default()
    }

    /// HTTPS URLs of the uploaded images
    #[must_use]
    pub fn secure_urls(&self) -> Vec<String> {
        self.images().into_iter().map(|i| i.secure_url).collect()
    }

    /// Whether any drop is still being uploaded
    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Screen, sign and upload a drop of files
    pub async fn upload(&self, files: Vec<PendingFile>) -> AppResult<UploadOutcome> {
        if files.is_empty() {
            return Ok(UploadOutcome::default());
        }

        if files.len() > self.max_files {
            let message = format!("You can upload at most {} images at a time.", self.max_files);
            self.notifier
                .notify(Notification::error("uploadImage-rejected-toast", message.clone()));
            return Err(AppError::UploadRejected(message));
        }

        let mut outcome = UploadOutcome::default();
        let mut accepted = Vec::with_capacity(files.len());
        for file in files {
            match detect_format(&file.bytes) {
                Some(format) => accepted.push(ImageFile {
                    file_name: file.file_name,
                    content_type: format.mime_type().to_string(),
                    bytes: file.bytes,
                }),
                None => outcome.rejected.push(file.file_name),
            }
        }

        if !outcome.rejected.is_empty() {
            let message = format!(
                "Only JPEG, PNG and WebP images are supported: {}",
                outcome.rejected.join(", ")
            );
            self.notifier
                .notify(Notification::error("uploadImage-rejected-toast", message.clone()));
            if accepted.is_empty() {
                return Err(AppError::UploadRejected(message));
            }
        }

        let _busy = InFlight::enter(&self.in_flight);

        let signature = match self.api.upload_signature().await {
            Ok(signature) => signature,
            Err(e) => {
                warn!(error = %e, "Upload signature request failed");
                self.notifier
                    .notify(Notification::error("uploadImage-fail-toast", UPLOAD_FAILED));
                return Err(AppError::SignatureUnavailable(e));
            }
        };

        debug!(count = accepted.len(), "Uploading images");
        let names: Vec<String> = accepted.iter().map(|f| f.file_name.clone()).collect();
        let results = join_all(
            accepted
                .into_iter()
                .map(|file| self.host.upload(&signature, file)),
        )
        .await;

        for (name, result) in names.into_iter().zip(results) {
            match result {
                Ok(image) => outcome.uploaded.push(image),
                Err(e) => {
                    warn!(file = %name, error = %e, "Image upload failed");
                    outcome.failed.push(name);
                }
            }
        }

        if let Ok(mut guard) = self.images.write() {
            guard.extend(outcome.uploaded.iter().cloned());
        }

        if !outcome.failed.is_empty() {
            self.notifier
                .notify(Notification::error("uploadImage-fail-toast", UPLOAD_FAILED));
        } else if outcome.is_complete() {
            self.notifier.notify(Notification::success(
                "uploadImage-success-toast",
                "Images uploaded successfully.",
            ));
        }

        info!(
            uploaded = outcome.uploaded.len(),
            failed = outcome.failed.len(),
            rejected = outcome.rejected.len(),
            "Image drop processed"
        );
        Ok(outcome)
    }

    /// Delete an uploaded image through the backend
    pub async fn remove(&self, public_id: &str) -> AppResult<()> {
        if let Err(e) = self.api.delete_image(public_id).await {
            warn!(public_id, error = %e, "Image delete failed");
            self.notifier.notify(Notification::error(
                "deleteImage-fail-toast",
                "Failed to delete image, please try again",
            ));
            return Err(e.into());
        }

        if let Ok(mut guard) = self.images.write() {
            guard.retain(|i| i.public_id != public_id);
        }
        Ok(())
    }
}

/// Counts one drop as in flight until dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(count)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
