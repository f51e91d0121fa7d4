use serde::{Deserialize, Serialize};

use super::media::ImageContent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeLayout {
    BannerOnly,
    Common,
}

/// Banner list entry (`GET /notices/banners`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNoticeBanner {
    pub notice_id: i64,
    pub banner_image: ImageContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeVideoDetail {
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub video_key: Option<String>,
    pub video_duration: DurationValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNoticeDetail {
    pub notice_id: i64,
    pub layout: NoticeLayout,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text_content: Option<String>,
    pub priority: i32,
    #[serde(default)]
    pub banner: Option<ImageContent>,
    #[serde(default)]
    pub image_contents: Vec<ImageContent>,
    #[serde(default)]
    pub video_content: Option<NoticeVideoDetail>,
    #[serde(default)]
    pub video_thumbnail: Option<ImageContent>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /notices`. The layout doubles as the tag; media are
/// referenced by content ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum NoticePayload {
    BannerOnly {
        priority: i32,
        banner_image_content: i64,
    },
    Common {
        title: String,
        text_content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        banner_image_content: Option<i64>,
        notice_image_content: Vec<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        notice_video_content: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        notice_video_thumbnail: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        priority: Option<i32>,
        on_click_url: Option<String>,
    },
}

impl NoticePayload {
    pub fn layout(&self) -> NoticeLayout {
        match self {
            NoticePayload::BannerOnly { .. } => NoticeLayout::BannerOnly,
            NoticePayload::Common { .. } => NoticeLayout::Common,
        }
    }
}

/// Body of `PATCH /notices/{id}`. Outer `None` leaves a field untouched,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<NoticeLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_image_content: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_image_content: Option<Option<Vec<i64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_video_content: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_video_thumbnail: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_click_url: Option<Option<String>>,
}

impl NoticeUpdatePayload {
    pub fn is_empty(&self) -> bool {
        *self == NoticeUpdatePayload::default()
    }
}
