use serde_json::Value;
use tracing::{info, warn};
use zigg_core::models::{
    ImagePurpose, MediaFile, MediaKind, NoticeLayout, NoticePayload, NoticeUpdatePayload,
    VideoPurpose,
};
use zigg_core::validation::not_blank;
use zigg_core::ConsoleError;
use zigg_processing::NormalizeOptions;

use super::{check_attachment_count, settle, FormAssembler, MediaSlot};
use crate::upload::UploadTrail;

/// New notice. The banner is always pad-normalized before upload.
#[derive(Debug, Clone)]
pub struct NoticeForm {
    pub layout: NoticeLayout,
    pub title: String,
    pub text_content: String,
    pub priority: i32,
    pub on_click_url: Option<String>,
    pub banner: Option<MediaFile>,
    /// Images and at most one video, in submission order
    pub attachments: Vec<MediaFile>,
}

struct SortedAttachments<'a> {
    images: Vec<&'a MediaFile>,
    video: Option<&'a MediaFile>,
}

impl NoticeForm {
    fn check(&self) -> Result<(), ConsoleError> {
        match self.layout {
            NoticeLayout::BannerOnly => {
                if self.banner.is_none() {
                    return Err(ConsoleError::validation("A banner image is required"));
                }
            }
            NoticeLayout::Common => {
                if not_blank(&self.title).is_err() || not_blank(&self.text_content).is_err() {
                    return Err(ConsoleError::validation("Title and text are required"));
                }
                check_attachment_count(self.attachments.len())?;
            }
        }
        Ok(())
    }

    /// Split attachments by declared type. Only the first video is used.
    fn sorted_attachments(&self) -> Result<SortedAttachments<'_>, ConsoleError> {
        let mut images = Vec::new();
        let mut videos = Vec::new();
        for file in &self.attachments {
            match file.declared_kind() {
                Some(MediaKind::Image) => images.push(file),
                Some(MediaKind::Video) => videos.push(file),
                None => {
                    return Err(ConsoleError::validation(format!(
                        "{} is neither an image nor a video",
                        file.file_name
                    )))
                }
            }
        }
        if videos.len() > 1 {
            warn!(ignored = videos.len() - 1, "Only the first video is attached to a notice");
        }
        Ok(SortedAttachments {
            images,
            video: videos.first().copied(),
        })
    }
}

/// Partial notice edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct NoticeEditForm {
    pub layout: Option<NoticeLayout>,
    pub title: Option<String>,
    pub text_content: Option<String>,
    pub priority: Option<i32>,
    /// `Some(None)` clears the link
    pub on_click_url: Option<Option<String>>,
    pub banner: MediaSlot,
}

impl NoticeEditForm {
    fn check(&self) -> Result<(), ConsoleError> {
        if let Some(title) = &self.title {
            not_blank(title).map_err(|_| ConsoleError::validation("Title must not be empty"))?;
        }
        if let Some(text) = &self.text_content {
            not_blank(text).map_err(|_| ConsoleError::validation("Text must not be empty"))?;
        }
        let untouched = self.layout.is_none()
            && self.title.is_none()
            && self.text_content.is_none()
            && self.priority.is_none()
            && self.on_click_url.is_none()
            && matches!(self.banner, MediaSlot::Keep);
        if untouched {
            return Err(ConsoleError::validation("Nothing to update"));
        }
        Ok(())
    }
}

impl FormAssembler {
    async fn upload_notice_banner(
        &self,
        file: &MediaFile,
        trail: &mut UploadTrail,
    ) -> Result<i64, ConsoleError> {
        let banner = self
            .uploads()
            .upload_normalized_image(
                file,
                ImagePurpose::NoticeBanner,
                &NormalizeOptions::banner(),
            )
            .await?;
        trail.record(banner.content_id);
        Ok(banner.content_id)
    }

    async fn build_notice(
        &self,
        form: &NoticeForm,
        trail: &mut UploadTrail,
    ) -> Result<NoticePayload, ConsoleError> {
        let banner_id = match &form.banner {
            Some(file) => Some(self.upload_notice_banner(file, trail).await?),
            None => None,
        };

        match (form.layout, banner_id) {
            (NoticeLayout::BannerOnly, Some(banner_image_content)) => {
                Ok(NoticePayload::BannerOnly {
                    priority: form.priority,
                    banner_image_content,
                })
            }
            (NoticeLayout::BannerOnly, None) => {
                Err(ConsoleError::validation("A banner image is required"))
            }
            (NoticeLayout::Common, banner_image_content) => {
                let attachments = form.sorted_attachments()?;

                // notices reference media by content ID
                let mut image_ids = Vec::with_capacity(attachments.images.len());
                for file in attachments.images {
                    let image = self
                        .uploads()
                        .upload_image(file, ImagePurpose::NoticeImage)
                        .await?;
                    trail.record(image.content_id);
                    image_ids.push(image.content_id);
                }

                let video_id = match attachments.video {
                    Some(file) => {
                        let video = self
                            .uploads()
                            .upload_video(file, VideoPurpose::NoticeVideo)
                            .await?;
                        trail.record(video.content_id);
                        Some(video.content_id)
                    }
                    None => None,
                };

                Ok(NoticePayload::Common {
                    title: form.title.clone(),
                    text_content: form.text_content.clone(),
                    banner_image_content,
                    notice_image_content: image_ids,
                    notice_video_content: video_id,
                    notice_video_thumbnail: None,
                    priority: Some(form.priority),
                    on_click_url: form.on_click_url.clone(),
                })
            }
        }
    }

    /// Upload banner, images and video in that order, then `POST /notices`.
    #[tracing::instrument(skip(self, form), fields(layout = ?form.layout))]
    pub async fn create_notice(&self, form: &NoticeForm) -> Result<Value, ConsoleError> {
        form.check()?;
        // attachment types are checked before anything is uploaded
        if form.layout == NoticeLayout::Common {
            form.sorted_attachments()?;
        }

        let mut trail = UploadTrail::default();
        let result = async {
            let payload = self.build_notice(form, &mut trail).await?;
            self.client().create_notice(&payload).await
        }
        .await;

        let created = settle(&trail, result)?;
        info!("Notice created");
        Ok(created)
    }

    /// Upload a replacement banner, if any, then `PATCH /notices/{id}`.
    #[tracing::instrument(skip(self, form))]
    pub async fn update_notice(
        &self,
        notice_id: i64,
        form: &NoticeEditForm,
    ) -> Result<Value, ConsoleError> {
        form.check()?;

        let mut trail = UploadTrail::default();
        let result = async {
            let banner_image_content = match &form.banner {
                MediaSlot::Keep => None,
                MediaSlot::Remove => Some(None),
                MediaSlot::Replace(file) => {
                    Some(Some(self.upload_notice_banner(file, &mut trail).await?))
                }
            };
            let payload = NoticeUpdatePayload {
                layout: form.layout,
                title: form.title.clone().map(Some),
                text_content: form.text_content.clone().map(Some),
                priority: form.priority,
                banner_image_content,
                on_click_url: form.on_click_url.clone(),
                ..Default::default()
            };
            self.client().update_notice(notice_id, &payload).await
        }
        .await;

        let updated = settle(&trail, result)?;
        info!(notice_id, "Notice updated");
        Ok(updated)
    }
}
