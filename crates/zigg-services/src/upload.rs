//! Upload coordinator
//!
//! One file at a time: probe → (normalize) → grant → PUT. Batches run in
//! submission order and stop at the first failure. Content that was already
//! uploaded is not rolled back; its IDs are logged as orphaned.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use zigg_api_client::ApiClient;
use zigg_core::models::{
    ImageDescriptor, ImagePurpose, MediaExtension, MediaFile, MediaKind, UploadGrant,
    VideoDescriptor, VideoPurpose,
};
use zigg_core::ConsoleError;
use zigg_processing::{
    AspectNormalizer, DurationProbe, ImageDimensions, ImageProbe, NormalizeOptions,
    OutputEncoding,
};

/// An image that reached its grant URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedMedia {
    pub content_id: i64,
    pub url: String,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

/// A video that reached its grant URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedVideo {
    pub content_id: i64,
    pub url: String,
    pub file_name: String,
    pub duration_seconds: u64,
}

/// Content IDs uploaded so far by one workflow.
#[derive(Debug, Default)]
pub(crate) struct UploadTrail {
    content_ids: Vec<i64>,
}

impl UploadTrail {
    pub(crate) fn record(&mut self, content_id: i64) {
        self.content_ids.push(content_id);
    }

    /// Log what the failed workflow leaves behind on the backend.
    pub(crate) fn abandon(&self, err: &ConsoleError) {
        if self.content_ids.is_empty() {
            return;
        }
        warn!(
            orphaned_content_ids = ?self.content_ids,
            error = %err,
            "Workflow failed after uploads; uploaded content is not rolled back"
        );
    }
}

pub(crate) fn ensure_kind(file: &MediaFile, expected: MediaKind) -> Result<(), ConsoleError> {
    match file.declared_kind() {
        Some(kind) if kind != expected => Err(ConsoleError::validation(format!(
            "{} is not an {}",
            file.file_name,
            match expected {
                MediaKind::Image => "image",
                MediaKind::Video => "video file",
            }
        ))),
        _ => Ok(()),
    }
}

/// Video extension from the declared MIME type, or from the file name when no
/// type was declared.
fn video_extension(file: &MediaFile) -> MediaExtension {
    match &file.content_type {
        Some(mime) => MediaExtension::video_from_mime(mime),
        None => file
            .name_extension()
            .and_then(|ext| MediaExtension::parse(&ext).ok())
            .filter(|ext| ext.kind() == MediaKind::Video)
            .unwrap_or(MediaExtension::Webm),
    }
}

#[derive(Clone)]
pub struct UploadCoordinator {
    client: ApiClient,
    duration_probe: Arc<dyn DurationProbe>,
}

impl UploadCoordinator {
    pub fn new(client: ApiClient, duration_probe: Arc<dyn DurationProbe>) -> Self {
        Self {
            client,
            duration_probe,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    async fn probe_image(file: &MediaFile) -> Result<ImageDimensions, ConsoleError> {
        let file = file.clone();
        tokio::task::spawn_blocking(move || ImageProbe::probe(&file))
            .await
            .map_err(|e| ConsoleError::Internal {
                message: "Image probe task failed".to_string(),
                source: e.into(),
            })?
    }

    async fn grant_and_put_image(
        &self,
        file: &MediaFile,
        purpose: ImagePurpose,
        descriptor: ImageDescriptor,
    ) -> Result<UploadedMedia, ConsoleError> {
        let UploadGrant { content_id, url } =
            self.client.request_image_grant(purpose, &descriptor).await?;
        self.client.put_to_grant(&url, file).await?;

        info!(
            content_id,
            purpose = %purpose,
            file = %file.file_name,
            "Image uploaded"
        );
        Ok(UploadedMedia {
            content_id,
            url,
            file_name: file.file_name.clone(),
            width: descriptor.width,
            height: descriptor.height,
        })
    }

    /// Upload an image as-is.
    #[tracing::instrument(skip(self, file), fields(file = %file.file_name))]
    pub async fn upload_image(
        &self,
        file: &MediaFile,
        purpose: ImagePurpose,
    ) -> Result<UploadedMedia, ConsoleError> {
        ensure_kind(file, MediaKind::Image)?;
        let dims = Self::probe_image(file).await?;
        let descriptor = ImageDescriptor::new(dims.extension, dims.width, dims.height)?;
        self.grant_and_put_image(file, purpose, descriptor).await
    }

    /// Normalize an image to `options`, then upload the re-encoded file.
    #[tracing::instrument(skip(self, file, options), fields(file = %file.file_name))]
    pub async fn upload_normalized_image(
        &self,
        file: &MediaFile,
        purpose: ImagePurpose,
        options: &NormalizeOptions,
    ) -> Result<UploadedMedia, ConsoleError> {
        ensure_kind(file, MediaKind::Image)?;
        let normalized = AspectNormalizer::normalize_blocking(file.clone(), *options).await?;

        let extension = match options.encoding {
            OutputEncoding::Jpeg { .. } => MediaExtension::Jpg,
            OutputEncoding::Png => MediaExtension::Png,
        };
        let descriptor = ImageDescriptor::new(extension, normalized.width, normalized.height)?;
        self.grant_and_put_image(&normalized.file, purpose, descriptor)
            .await
    }

    /// Upload a video; its duration is probed and floored to whole seconds.
    #[tracing::instrument(skip(self, file), fields(file = %file.file_name))]
    pub async fn upload_video(
        &self,
        file: &MediaFile,
        purpose: VideoPurpose,
    ) -> Result<UploadedVideo, ConsoleError> {
        ensure_kind(file, MediaKind::Video)?;
        let extension = video_extension(file);
        let duration_seconds = self.duration_probe.probe_duration(file).await?;
        let descriptor = VideoDescriptor::new(duration_seconds, extension)?;

        let UploadGrant { content_id, url } =
            self.client.request_video_grant(purpose, &descriptor).await?;
        self.client.put_to_grant(&url, file).await?;

        info!(
            content_id,
            purpose = %purpose,
            duration_seconds,
            "Video uploaded"
        );
        Ok(UploadedVideo {
            content_id,
            url,
            file_name: file.file_name.clone(),
            duration_seconds,
        })
    }

    /// Upload `files` one after another. The first failure stops the batch.
    #[tracing::instrument(skip(self, files), fields(count = files.len()))]
    pub async fn upload_images(
        &self,
        files: &[MediaFile],
        purpose: ImagePurpose,
    ) -> Result<Vec<UploadedMedia>, ConsoleError> {
        let mut trail = UploadTrail::default();
        let mut uploaded = Vec::with_capacity(files.len());

        for file in files {
            match self.upload_image(file, purpose).await {
                Ok(media) => {
                    trail.record(media.content_id);
                    uploaded.push(media);
                }
                Err(e) => {
                    trail.abandon(&e);
                    return Err(e);
                }
            }
        }
        Ok(uploaded)
    }
}
