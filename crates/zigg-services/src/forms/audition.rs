use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;
use validator::Validate;
use zigg_core::models::{AuditionPayload, ImagePurpose, MediaFile};
use zigg_core::validation::not_blank_field;
use zigg_core::ConsoleError;

use super::{settle, FormAssembler};
use crate::upload::UploadTrail;

/// Audition posting. On edit, a missing thumbnail keeps the current one.
#[derive(Debug, Clone, Validate)]
pub struct AuditionForm {
    #[validate(custom(function = "not_blank_field"))]
    pub title: String,
    #[validate(custom(function = "not_blank_field"))]
    pub company: String,
    #[validate(custom(function = "not_blank_field"))]
    pub qualification: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub thumbnail: Option<MediaFile>,
}

impl AuditionForm {
    fn payload(&self, thumbnail_id: Option<i64>) -> AuditionPayload {
        AuditionPayload {
            title: self.title.clone(),
            company: self.company.clone(),
            qualification: self.qualification.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            thumbnail_id,
        }
    }
}

impl FormAssembler {
    async fn upload_audition_thumbnail(
        &self,
        form: &AuditionForm,
        trail: &mut UploadTrail,
    ) -> Result<Option<i64>, ConsoleError> {
        match &form.thumbnail {
            Some(file) => {
                let uploaded = self
                    .uploads()
                    .upload_image(file, ImagePurpose::AuditionThumbnail)
                    .await?;
                trail.record(uploaded.content_id);
                Ok(Some(uploaded.content_id))
            }
            None => Ok(None),
        }
    }

    /// Upload the thumbnail, if any, then `POST /auditions`.
    #[tracing::instrument(skip(self, form), fields(title = %form.title))]
    pub async fn create_audition(&self, form: &AuditionForm) -> Result<Value, ConsoleError> {
        form.validate()?;

        let mut trail = UploadTrail::default();
        let result = async {
            let thumbnail_id = self.upload_audition_thumbnail(form, &mut trail).await?;
            self.client()
                .create_audition(&form.payload(thumbnail_id))
                .await
        }
        .await;

        let created = settle(&trail, result)?;
        info!("Audition created");
        Ok(created)
    }

    /// Upload a replacement thumbnail, if any, then `PATCH /auditions/{id}`.
    /// `thumbnailId` is only sent when a new thumbnail was uploaded.
    #[tracing::instrument(skip(self, form))]
    pub async fn update_audition(
        &self,
        audition_id: i64,
        form: &AuditionForm,
    ) -> Result<Value, ConsoleError> {
        form.validate()?;

        let mut trail = UploadTrail::default();
        let result = async {
            let thumbnail_id = self.upload_audition_thumbnail(form, &mut trail).await?;
            self.client()
                .update_audition(audition_id, &form.payload(thumbnail_id))
                .await
        }
        .await;

        let updated = settle(&trail, result)?;
        info!(audition_id, "Audition updated");
        Ok(updated)
    }
}
