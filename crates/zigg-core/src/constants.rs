//! Shared constants

/// Recommended banner aspect ratio (9 : 5.16, about 1.744).
pub const BANNER_ASPECT: f64 = 9.0 / 5.16;

/// Minimum banner width in pixels after normalization.
pub const BANNER_MIN_WIDTH: u32 = 1500;

/// JPEG quality used for normalized banners (0-100).
pub const BANNER_JPEG_QUALITY: u8 = 92;

/// Letterbox background for padded banners (opaque white).
pub const BANNER_BACKGROUND: [u8; 4] = [255, 255, 255, 255];

/// Relative tolerance under which a source already matches the target aspect.
pub const ASPECT_TOLERANCE: f64 = 0.01;

/// Maximum number of image/video attachments on a post or notice.
pub const MAX_ATTACHMENTS: usize = 5;

/// Default notice priority (higher is shown first).
pub const DEFAULT_NOTICE_PRIORITY: i32 = 10;

/// Content type used when a file declares none.
pub const OCTET_STREAM: &str = "application/octet-stream";
