//! ZIGG Media Processing Library
//!
//! Client-side media preparation for presigned uploads:
//! - Dimension probing for images and duration probing for videos (probe)
//! - Pad/crop aspect geometry (geometry)
//! - Aspect normalization and re-encoding (normalize)
//! - Duration formatting (duration)

pub mod duration;
pub mod geometry;
pub mod normalize;
pub mod probe;

// Re-export commonly used types
pub use duration::format_hms;
pub use geometry::{aspects_match, crop_layout, pad_layout, AspectReport, CropLayout, PadLayout};
pub use normalize::{
    AspectNormalizer, NormalizeOptions, NormalizePolicy, NormalizedImage, OutputEncoding,
};
pub use probe::{DurationProbe, FfprobeDurationProbe, ImageDimensions, ImageProbe};
