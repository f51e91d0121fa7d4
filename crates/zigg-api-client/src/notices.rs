use serde_json::Value;
use zigg_core::models::{AdminNoticeBanner, AdminNoticeDetail, NoticePayload, NoticeUpdatePayload};
use zigg_core::ConsoleError;

use crate::ApiClient;

impl ApiClient {
    #[tracing::instrument(skip(self))]
    pub async fn list_notice_banners(&self) -> Result<Vec<AdminNoticeBanner>, ConsoleError> {
        self.get("/notices/banners", &[]).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_notice(&self, notice_id: i64) -> Result<AdminNoticeDetail, ConsoleError> {
        self.get(&format!("/notices/{}", notice_id), &[]).await
    }

    #[tracing::instrument(skip(self, payload), fields(layout = ?payload.layout()))]
    pub async fn create_notice(&self, payload: &NoticePayload) -> Result<Value, ConsoleError> {
        self.post_json("/notices", &[], payload).await
    }

    /// Partial update; fields left as `None` are not sent.
    #[tracing::instrument(skip(self, payload))]
    pub async fn update_notice(
        &self,
        notice_id: i64,
        payload: &NoticeUpdatePayload,
    ) -> Result<Value, ConsoleError> {
        if payload.is_empty() {
            return Err(ConsoleError::validation("Nothing to update"));
        }
        self.patch_json(&format!("/notices/{}", notice_id), payload)
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_notice(&self, notice_id: i64) -> Result<(), ConsoleError> {
        self.delete(&format!("/notices/{}", notice_id)).await
    }
}
