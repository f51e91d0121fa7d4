//! Upload grants and presigned PUTs.

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use zigg_core::models::{
    ImageDescriptor, ImagePurpose, MediaFile, UploadGrant, VideoDescriptor, VideoPurpose,
};
use zigg_core::ConsoleError;

use crate::{transport_error, ApiClient};

impl ApiClient {
    /// `POST /contents/image?purpose=P`
    #[tracing::instrument(skip(self))]
    pub async fn request_image_grant(
        &self,
        purpose: ImagePurpose,
        descriptor: &ImageDescriptor,
    ) -> Result<UploadGrant, ConsoleError> {
        let grant: UploadGrant = self
            .post_json(
                "/contents/image",
                &[("purpose", purpose.as_str().to_string())],
                descriptor,
            )
            .await?;
        debug!(content_id = grant.content_id, "Image grant issued");
        Ok(grant)
    }

    /// `POST /contents/video?purpose=P`
    #[tracing::instrument(skip(self))]
    pub async fn request_video_grant(
        &self,
        purpose: VideoPurpose,
        descriptor: &VideoDescriptor,
    ) -> Result<UploadGrant, ConsoleError> {
        let grant: UploadGrant = self
            .post_json(
                "/contents/video",
                &[("purpose", purpose.as_str().to_string())],
                descriptor,
            )
            .await?;
        debug!(content_id = grant.content_id, "Video grant issued");
        Ok(grant)
    }

    /// PUT the raw bytes of `file` to a grant URL.
    ///
    /// The session token is never sent here. Any 2xx counts as success and the
    /// body is ignored.
    #[tracing::instrument(skip(self, url, file), fields(file = %file.file_name, bytes = file.data.len()))]
    pub async fn put_to_grant(&self, url: &str, file: &MediaFile) -> Result<(), ConsoleError> {
        let response = self
            .client()
            .put(url)
            .header(CONTENT_TYPE, file.content_type_or_default())
            .body(file.data.clone())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Presigned upload rejected");
            return Err(ConsoleError::Upload {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
