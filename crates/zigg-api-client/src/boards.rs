use serde_json::Value;
use zigg_core::models::{AdminBoardPost, AdminBoardPostDetail, BoardCategory, PostPayload};
use zigg_core::ConsoleError;

use crate::ApiClient;

fn admin_query() -> [(&'static str, String); 2] {
    [("page", "0".to_string()), ("writtenByAdmin", "true".to_string())]
}

impl ApiClient {
    /// Posts written by admins in `category` (first page only).
    #[tracing::instrument(skip(self))]
    pub async fn list_admin_posts(
        &self,
        category: BoardCategory,
    ) -> Result<Vec<AdminBoardPost>, ConsoleError> {
        self.get(
            &format!("/boards/posts/{}", category.board_id()),
            &admin_query(),
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_admin_post(
        &self,
        category: BoardCategory,
        post_id: i64,
    ) -> Result<AdminBoardPostDetail, ConsoleError> {
        self.get(
            &format!("/boards/posts/{}/{}", category.board_id(), post_id),
            &admin_query(),
        )
        .await
    }

    #[tracing::instrument(skip(self, payload), fields(title = %payload.post_title))]
    pub async fn create_post(
        &self,
        category: BoardCategory,
        payload: &PostPayload,
    ) -> Result<Value, ConsoleError> {
        self.post_json(
            &format!("/boards/posts/{}", category.board_id()),
            &[],
            payload,
        )
        .await
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn update_post(
        &self,
        category: BoardCategory,
        post_id: i64,
        payload: &PostPayload,
    ) -> Result<Value, ConsoleError> {
        self.patch_json(
            &format!("/boards/posts/{}/{}", category.board_id(), post_id),
            payload,
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_post(&self, category: BoardCategory, post_id: i64) -> Result<(), ConsoleError> {
        self.delete(&format!("/boards/posts/{}/{}", category.board_id(), post_id))
            .await
    }
}
