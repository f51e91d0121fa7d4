use serde_json::Value;
use tracing::info;
use validator::Validate;
use zigg_core::models::{
    AdminBoardPostDetail, BoardCategory, ImagePurpose, MediaFile, MediaKind, PostPayload,
    PostVideoContent, VideoPurpose,
};
use zigg_core::validation::not_blank_field;
use zigg_core::ConsoleError;
use zigg_processing::format_hms;

use super::{check_attachment_count, settle, FormAssembler, GalleryItem, MediaSlot};
use crate::upload::{ensure_kind, UploadTrail};

/// New board post. Images are uploaded in order, the video last.
#[derive(Debug, Clone, Validate)]
pub struct PostForm {
    #[validate(custom(function = "not_blank_field"))]
    pub title: String,
    #[validate(custom(function = "not_blank_field"))]
    pub message: String,
    pub images: Vec<MediaFile>,
    pub video: Option<MediaFile>,
}

impl PostForm {
    fn check(&self) -> Result<(), ConsoleError> {
        self.validate()?;
        check_attachment_count(self.images.len() + usize::from(self.video.is_some()))?;
        // declared kinds are checked before the first upload
        for file in &self.images {
            ensure_kind(file, MediaKind::Image)?;
        }
        if let Some(video) = &self.video {
            ensure_kind(video, MediaKind::Video)?;
        }
        Ok(())
    }
}

/// Edit of an existing post, seeded from its detail.
#[derive(Debug, Clone, Validate)]
pub struct PostEditForm {
    #[validate(custom(function = "not_blank_field"))]
    pub title: String,
    #[validate(custom(function = "not_blank_field"))]
    pub message: String,
    pub gallery: Vec<GalleryItem>,
    pub video: MediaSlot,
    /// Video currently attached to the post
    pub original_video: Option<PostVideoContent>,
    /// Thumbnail key currently attached to the post
    pub original_thumbnail: Option<String>,
}

impl PostEditForm {
    /// Form that would leave `detail` unchanged.
    pub fn seeded(detail: &AdminBoardPostDetail) -> Self {
        Self {
            title: detail.post_title.clone(),
            message: detail.post_message.clone(),
            gallery: detail
                .post_image_contents
                .iter()
                .map(|image| GalleryItem::Keep(image.image_key.clone()))
                .collect(),
            video: MediaSlot::Keep,
            original_video: detail.post_video_content.as_ref().map(|v| PostVideoContent {
                video_key: v.video_url.clone(),
                video_duration: v.video_duration.clone(),
            }),
            original_thumbnail: detail
                .post_thumbnail_image
                .as_ref()
                .map(|t| t.image_key.clone()),
        }
    }

    /// Whether the post still has a video once the edit is applied.
    fn keeps_video(&self) -> bool {
        match self.video {
            MediaSlot::Keep => self.original_video.is_some(),
            MediaSlot::Remove => false,
            MediaSlot::Replace(_) => true,
        }
    }

    fn check(&self) -> Result<(), ConsoleError> {
        self.validate()?;
        check_attachment_count(self.gallery.len() + usize::from(self.keeps_video()))?;
        for item in &self.gallery {
            if let GalleryItem::Upload(file) = item {
                ensure_kind(file, MediaKind::Image)?;
            }
        }
        if let MediaSlot::Replace(video) = &self.video {
            ensure_kind(video, MediaKind::Video)?;
        }
        Ok(())
    }
}

impl FormAssembler {
    /// Upload a post video. Board posts reference media by grant URL.
    async fn upload_post_video(
        &self,
        file: &MediaFile,
        trail: &mut UploadTrail,
    ) -> Result<PostVideoContent, ConsoleError> {
        let video = self
            .uploads()
            .upload_video(file, VideoPurpose::PostVideo)
            .await?;
        trail.record(video.content_id);
        Ok(PostVideoContent {
            video_key: video.url,
            video_duration: format_hms(video.duration_seconds),
        })
    }

    async fn upload_post_image(
        &self,
        file: &MediaFile,
        trail: &mut UploadTrail,
    ) -> Result<String, ConsoleError> {
        let image = self
            .uploads()
            .upload_image(file, ImagePurpose::PostImage)
            .await?;
        trail.record(image.content_id);
        Ok(image.url)
    }

    async fn build_post(
        &self,
        form: &PostForm,
        trail: &mut UploadTrail,
    ) -> Result<PostPayload, ConsoleError> {
        let mut image_keys = Vec::with_capacity(form.images.len());
        for file in &form.images {
            image_keys.push(self.upload_post_image(file, trail).await?);
        }

        let video = match &form.video {
            Some(file) => Some(self.upload_post_video(file, trail).await?),
            None => None,
        };

        Ok(PostPayload {
            post_title: form.title.clone(),
            post_message: form.message.clone(),
            post_video_thumbnail: image_keys.first().cloned(),
            post_image_content: image_keys,
            post_video_content: video,
        })
    }

    async fn build_post_edit(
        &self,
        form: &PostEditForm,
        trail: &mut UploadTrail,
    ) -> Result<PostPayload, ConsoleError> {
        let mut kept = Vec::new();
        let mut uploaded = Vec::new();
        for item in &form.gallery {
            match item {
                GalleryItem::Keep(key) => kept.push(key.clone()),
                GalleryItem::Upload(file) => {
                    uploaded.push(self.upload_post_image(file, trail).await?)
                }
            }
        }
        // kept keys first, then new uploads
        let mut image_keys = kept;
        image_keys.extend(uploaded);

        let video = match &form.video {
            MediaSlot::Keep => form.original_video.clone(),
            MediaSlot::Remove => None,
            MediaSlot::Replace(file) => Some(self.upload_post_video(file, trail).await?),
        };

        Ok(PostPayload {
            post_title: form.title.clone(),
            post_message: form.message.clone(),
            post_video_thumbnail: image_keys
                .first()
                .cloned()
                .or_else(|| form.original_thumbnail.clone()),
            post_image_content: image_keys,
            post_video_content: video,
        })
    }

    /// Upload the post media, then `POST /boards/posts/{boardId}`.
    #[tracing::instrument(skip(self, form), fields(title = %form.title))]
    pub async fn create_post(
        &self,
        category: BoardCategory,
        form: &PostForm,
    ) -> Result<Value, ConsoleError> {
        form.check()?;

        let mut trail = UploadTrail::default();
        let result = async {
            let payload = self.build_post(form, &mut trail).await?;
            self.client().create_post(category, &payload).await
        }
        .await;

        let created = settle(&trail, result)?;
        info!(board = ?category, "Post created");
        Ok(created)
    }

    /// Apply gallery and video edits, then `PATCH /boards/posts/{boardId}/{postId}`.
    #[tracing::instrument(skip(self, form))]
    pub async fn update_post(
        &self,
        category: BoardCategory,
        post_id: i64,
        form: &PostEditForm,
    ) -> Result<Value, ConsoleError> {
        form.check()?;

        let mut trail = UploadTrail::default();
        let result = async {
            let payload = self.build_post_edit(form, &mut trail).await?;
            self.client()
                .update_post(category, post_id, &payload)
                .await
        }
        .await;

        let updated = settle(&trail, result)?;
        info!(board = ?category, post_id, "Post updated");
        Ok(updated)
    }
}
