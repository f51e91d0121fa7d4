use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::OCTET_STREAM;
use crate::error::ConsoleError;

/// Whether a file is treated as an image or a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Closed set of media extensions the backend accepts. Serialized uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaExtension {
    Jpg,
    Png,
    Webp,
    Gif,
    Mp4,
    Mov,
    Webm,
}

impl MediaExtension {
    pub fn kind(self) -> MediaKind {
        match self {
            MediaExtension::Jpg
            | MediaExtension::Png
            | MediaExtension::Webp
            | MediaExtension::Gif => MediaKind::Image,
            MediaExtension::Mp4 | MediaExtension::Mov | MediaExtension::Webm => MediaKind::Video,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaExtension::Jpg => "JPG",
            MediaExtension::Png => "PNG",
            MediaExtension::Webp => "WEBP",
            MediaExtension::Gif => "GIF",
            MediaExtension::Mp4 => "MP4",
            MediaExtension::Mov => "MOV",
            MediaExtension::Webm => "WEBM",
        }
    }

    /// Parse a file extension, case-insensitively. `jpeg` maps to `JPG`,
    /// `qt` to `MOV`.
    pub fn parse(ext: &str) -> Result<Self, ConsoleError> {
        match ext.trim().trim_start_matches('.').to_uppercase().as_str() {
            "JPG" | "JPEG" => Ok(MediaExtension::Jpg),
            "PNG" => Ok(MediaExtension::Png),
            "WEBP" => Ok(MediaExtension::Webp),
            "GIF" => Ok(MediaExtension::Gif),
            "MP4" => Ok(MediaExtension::Mp4),
            "MOV" | "QT" => Ok(MediaExtension::Mov),
            "WEBM" => Ok(MediaExtension::Webm),
            other => Err(ConsoleError::validation(format!(
                "Unsupported media extension: {}",
                other
            ))),
        }
    }

    /// Image extension implied by a MIME type. Anything that is not PNG, WebP
    /// or GIF is sent as JPG.
    pub fn image_from_mime(mime: &str) -> Self {
        if mime.contains("png") {
            MediaExtension::Png
        } else if mime.contains("webp") {
            MediaExtension::Webp
        } else if mime.contains("gif") {
            MediaExtension::Gif
        } else {
            MediaExtension::Jpg
        }
    }

    /// Video extension implied by a MIME type. Anything that is not MP4 or
    /// QuickTime is sent as WEBM.
    pub fn video_from_mime(mime: &str) -> Self {
        if mime.contains("mp4") {
            MediaExtension::Mp4
        } else if mime.contains("quicktime") {
            MediaExtension::Mov
        } else {
            MediaExtension::Webm
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            MediaExtension::Jpg => "image/jpeg",
            MediaExtension::Png => "image/png",
            MediaExtension::Webp => "image/webp",
            MediaExtension::Gif => "image/gif",
            MediaExtension::Mp4 => "video/mp4",
            MediaExtension::Mov => "video/quicktime",
            MediaExtension::Webm => "video/webm",
        }
    }
}

impl Display for MediaExtension {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A file selected by the operator: name, declared MIME type and raw bytes.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl MediaFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            data,
        }
    }

    /// Read a file from disk, inferring its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, ConsoleError> {
        let data = std::fs::read(path).map_err(|e| {
            ConsoleError::Decode(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let content_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| MediaExtension::parse(e).ok())
            .map(|e| e.mime_type().to_string());
        Ok(Self::new(file_name, content_type, data))
    }

    /// Declared MIME type, or the generic octet stream.
    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(OCTET_STREAM)
    }

    /// Kind declared by the MIME type, if any.
    pub fn declared_kind(&self) -> Option<MediaKind> {
        let mime = self.content_type.as_deref()?;
        if mime.starts_with("image/") {
            Some(MediaKind::Image)
        } else if mime.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// Uppercased extension taken from the file name.
    pub fn name_extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_uppercase())
    }

    /// File name without its last extension.
    pub fn stem(&self) -> &str {
        match self.file_name.rfind('.') {
            Some(0) | None => &self.file_name,
            Some(idx) => &self.file_name[..idx],
        }
    }
}

/// Upload-grant request body for images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub extension: MediaExtension,
    pub width: u32,
    pub height: u32,
}

impl ImageDescriptor {
    pub fn new(extension: MediaExtension, width: u32, height: u32) -> Result<Self, ConsoleError> {
        if extension.kind() != MediaKind::Image {
            return Err(ConsoleError::validation(format!(
                "{} is not an image extension",
                extension
            )));
        }
        if width == 0 || height == 0 {
            return Err(ConsoleError::validation(format!(
                "Image dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            extension,
            width,
            height,
        })
    }
}

/// Upload-grant request body for videos. Duration travels as a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDescriptor {
    #[serde(with = "seconds_string")]
    pub video_duration: u64,
    pub video_extension: MediaExtension,
}

impl VideoDescriptor {
    pub fn new(duration_seconds: u64, extension: MediaExtension) -> Result<Self, ConsoleError> {
        if extension.kind() != MediaKind::Video {
            return Err(ConsoleError::validation(format!(
                "{} is not a video extension",
                extension
            )));
        }
        Ok(Self {
            video_duration: duration_seconds,
            video_extension: extension,
        })
    }
}

mod seconds_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Purpose tags for image grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImagePurpose {
    HistoryThumbnail,
    SpaceImage,
    UserBannerImage,
    UserProfileImage,
    PostImage,
    PostThumbnail,
    PostReport,
    CommentReport,
    UserReport,
    HomeBanner,
    AuditionThumbnail,
    ApplicationImage,
    AuditionImage,
    NoticeBanner,
    NoticeImage,
}

impl ImagePurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            ImagePurpose::HistoryThumbnail => "HISTORY_THUMBNAIL",
            ImagePurpose::SpaceImage => "SPACE_IMAGE",
            ImagePurpose::UserBannerImage => "USER_BANNER_IMAGE",
            ImagePurpose::UserProfileImage => "USER_PROFILE_IMAGE",
            ImagePurpose::PostImage => "POST_IMAGE",
            ImagePurpose::PostThumbnail => "POST_THUMBNAIL",
            ImagePurpose::PostReport => "POST_REPORT",
            ImagePurpose::CommentReport => "COMMENT_REPORT",
            ImagePurpose::UserReport => "USER_REPORT",
            ImagePurpose::HomeBanner => "HOME_BANNER",
            ImagePurpose::AuditionThumbnail => "AUDITION_THUMBNAIL",
            ImagePurpose::ApplicationImage => "APPLICATION_IMAGE",
            ImagePurpose::AuditionImage => "AUDITION_IMAGE",
            ImagePurpose::NoticeBanner => "NOTICE_BANNER",
            ImagePurpose::NoticeImage => "NOTICE_IMAGE",
        }
    }
}

/// Purpose tags for video grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoPurpose {
    HistoryVideo,
    PostVideo,
    ApplicationVideo,
    AuditionVideo,
    NoticeVideo,
}

impl VideoPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            VideoPurpose::HistoryVideo => "HISTORY_VIDEO",
            VideoPurpose::PostVideo => "POST_VIDEO",
            VideoPurpose::ApplicationVideo => "APPLICATION_VIDEO",
            VideoPurpose::AuditionVideo => "AUDITION_VIDEO",
            VideoPurpose::NoticeVideo => "NOTICE_VIDEO",
        }
    }
}

impl ImagePurpose {
    pub const ALL: [ImagePurpose; 15] = [
        ImagePurpose::HistoryThumbnail,
        ImagePurpose::SpaceImage,
        ImagePurpose::UserBannerImage,
        ImagePurpose::UserProfileImage,
        ImagePurpose::PostImage,
        ImagePurpose::PostThumbnail,
        ImagePurpose::PostReport,
        ImagePurpose::CommentReport,
        ImagePurpose::UserReport,
        ImagePurpose::HomeBanner,
        ImagePurpose::AuditionThumbnail,
        ImagePurpose::ApplicationImage,
        ImagePurpose::AuditionImage,
        ImagePurpose::NoticeBanner,
        ImagePurpose::NoticeImage,
    ];
}

impl VideoPurpose {
    pub const ALL: [VideoPurpose; 5] = [
        VideoPurpose::HistoryVideo,
        VideoPurpose::PostVideo,
        VideoPurpose::ApplicationVideo,
        VideoPurpose::AuditionVideo,
        VideoPurpose::NoticeVideo,
    ];
}

/// Accepts wire names and their kebab-case spelling (`notice-banner`).
fn wire_name(s: &str) -> String {
    s.trim().to_uppercase().replace('-', "_")
}

impl std::str::FromStr for ImagePurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = wire_name(s);
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| format!("Unknown image purpose '{}'", s))
    }
}

impl std::str::FromStr for VideoPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = wire_name(s);
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| format!("Unknown video purpose '{}'", s))
    }
}

impl Display for ImagePurpose {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl Display for VideoPurpose {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Backend answer to a grant request: the content ID and a single-use,
/// time-limited destination URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadGrant {
    pub content_id: i64,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UploadState {
    Pending,
    Uploaded,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaImage {
    pub id: i64,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub upload_state: UploadState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaVideo {
    pub id: i64,
    pub url: String,
    pub duration: String,
    pub width: u32,
    pub height: u32,
    pub upload_state: UploadState,
}

/// Image reference as returned inside posts, notices and auditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    pub image_key: String,
    #[serde(default)]
    pub on_click_url: Option<String>,
}
