use serde_json::Value;
use zigg_core::models::{ApplicantFilter, ApplicantPage, Audition, AuditionPayload};
use zigg_core::ConsoleError;

use crate::ApiClient;

impl ApiClient {
    #[tracing::instrument(skip(self))]
    pub async fn list_auditions(&self) -> Result<Vec<Audition>, ConsoleError> {
        self.get("/auditions", &[]).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_audition(&self, audition_id: i64) -> Result<Audition, ConsoleError> {
        self.get(&format!("/auditions/{}", audition_id), &[]).await
    }

    #[tracing::instrument(skip(self, payload), fields(title = %payload.title))]
    pub async fn create_audition(&self, payload: &AuditionPayload) -> Result<Value, ConsoleError> {
        self.post_json("/auditions", &[], payload).await
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn update_audition(
        &self,
        audition_id: i64,
        payload: &AuditionPayload,
    ) -> Result<Value, ConsoleError> {
        self.patch_json(&format!("/auditions/{}", audition_id), payload)
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_audition(&self, audition_id: i64) -> Result<(), ConsoleError> {
        self.delete(&format!("/auditions/{}", audition_id)).await
    }

    /// One page of applicants. `page` is 0-based.
    #[tracing::instrument(skip(self))]
    pub async fn list_applicants(
        &self,
        audition_id: i64,
        page: u32,
        filter: ApplicantFilter,
    ) -> Result<ApplicantPage, ConsoleError> {
        self.get(
            &format!("/auditions/{}/applications", audition_id),
            &[
                ("page", page.to_string()),
                ("filter", filter.as_str().to_string()),
            ],
        )
        .await
    }

    /// Scrap (`POST`) or un-scrap (`DELETE`) an application.
    #[tracing::instrument(skip(self))]
    pub async fn set_scrap(
        &self,
        audition_id: i64,
        application_id: i64,
        scrapped: bool,
    ) -> Result<(), ConsoleError> {
        let path = format!(
            "/auditions/{}/applications/{}/scrap",
            audition_id, application_id
        );
        if scrapped {
            self.post_empty(&path).await
        } else {
            self.delete(&path).await
        }
    }

    /// Like (`POST`) or un-like (`DELETE`) an application.
    #[tracing::instrument(skip(self))]
    pub async fn set_like(
        &self,
        audition_id: i64,
        application_id: i64,
        liked: bool,
    ) -> Result<(), ConsoleError> {
        let path = format!(
            "/auditions/{}/applications/{}/like",
            audition_id, application_id
        );
        if liked {
            self.post_empty(&path).await
        } else {
            self.delete(&path).await
        }
    }
}
