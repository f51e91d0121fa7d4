use serde::{Deserialize, Serialize};

use super::media::ImageContent;

/// Community board categories and their backend board IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardCategory {
    Free,
    Promotion,
    Challenge,
}

impl BoardCategory {
    pub fn board_id(self) -> i64 {
        match self {
            BoardCategory::Free => 1,
            BoardCategory::Promotion => 2,
            BoardCategory::Challenge => 3,
        }
    }

    pub fn from_board_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(BoardCategory::Free),
            2 => Some(BoardCategory::Promotion),
            3 => Some(BoardCategory::Challenge),
            _ => None,
        }
    }
}

impl std::str::FromStr for BoardCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(BoardCategory::Free),
            "promotion" => Ok(BoardCategory::Promotion),
            "challenge" => Ok(BoardCategory::Challenge),
            other => Err(format!(
                "Invalid board '{}'. Must be: free, promotion, challenge",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCreator {
    pub user_id: i64,
    pub user_name: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// Row of the admin post list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBoardPost {
    pub board_id: i64,
    pub post_id: i64,
    pub post_title: String,
    pub post_message: String,
    pub created_at: String,
    pub post_creator: PostCreator,
    #[serde(default)]
    pub post_image_contents: Vec<String>,
    pub is_anonymous: bool,
    pub like_cnt: u32,
    pub comment_cnt: u32,
    pub scrap_cnt: u32,
    pub is_scraped: bool,
    pub is_liked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostVideoDetail {
    pub video_url: String,
    pub video_duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBoardPostDetail {
    pub board_id: i64,
    pub post_id: i64,
    pub post_title: String,
    pub post_message: String,
    pub post_creator: PostCreator,
    #[serde(default)]
    pub post_image_contents: Vec<ImageContent>,
    #[serde(default)]
    pub post_video_content: Option<PostVideoDetail>,
    #[serde(default)]
    pub post_thumbnail_image: Option<ImageContent>,
    pub created_at: String,
    pub is_anonymous: bool,
    pub like_cnt: u32,
    pub comment_cnt: u32,
    pub scrap_cnt: u32,
    pub is_scraped: bool,
    pub is_liked: bool,
}

/// Video reference inside a post payload: the upload key plus `HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostVideoContent {
    pub video_key: String,
    pub video_duration: String,
}

/// Body of `POST /boards/posts/{boardId}` and
/// `PATCH /boards/posts/{boardId}/{postId}`. Media are referenced by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    pub post_title: String,
    pub post_message: String,
    pub post_image_content: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_video_thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_video_content: Option<PostVideoContent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_round_trips_board_id() {
        for category in [
            BoardCategory::Free,
            BoardCategory::Promotion,
            BoardCategory::Challenge,
        ] {
            assert_eq!(BoardCategory::from_board_id(category.board_id()), Some(category));
        }
        assert_eq!(BoardCategory::from_board_id(99), None);
    }

    #[test]
    fn detail_tolerates_missing_media() {
        let detail: AdminBoardPostDetail = serde_json::from_value(json!({
            "boardId": 1,
            "postId": 7,
            "postTitle": "hello",
            "postMessage": "world",
            "postCreator": { "userId": 3, "userName": "admin" },
            "createdAt": "2025-08-31T10:00:00",
            "isAnonymous": false,
            "likeCnt": 0,
            "commentCnt": 0,
            "scrapCnt": 0,
            "isScraped": false,
            "isLiked": false
        }))
        .unwrap();
        assert!(detail.post_image_contents.is_empty());
        assert!(detail.post_video_content.is_none());
        assert!(detail.post_thumbnail_image.is_none());
    }

    #[test]
    fn payload_skips_absent_video() {
        let payload = PostPayload {
            post_title: "t".into(),
            post_message: "m".into(),
            post_image_content: vec!["k1".into()],
            post_video_thumbnail: Some("k1".into()),
            post_video_content: None,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "postTitle": "t",
                "postMessage": "m",
                "postImageContent": ["k1"],
                "postVideoThumbnail": "k1"
            })
        );
    }
}
