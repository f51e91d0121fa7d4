//! Aspect-ratio geometry for pad and crop normalization
//!
//! Pure arithmetic, no pixels. All sizes are in pixels, rounded half away
//! from zero like `f64::round`.

use serde::Serialize;
use zigg_core::constants::ASPECT_TOLERANCE;

/// True when `source` is within the relative tolerance of `target`.
///
/// At this boundary both policies switch from letterbox/trim arithmetic to a
/// plain proportional rescale.
pub fn aspects_match(source: f64, target: f64) -> bool {
    (source - target).abs() <= target * ASPECT_TOLERANCE
}

/// Where a padded image lands on its canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PadLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub draw_x: u32,
    pub draw_y: u32,
    pub draw_width: u32,
    pub draw_height: u32,
    pub scale: f64,
}

impl PadLayout {
    /// True when the drawn image covers the whole canvas.
    pub fn is_unpadded(&self) -> bool {
        self.draw_x == 0
            && self.draw_y == 0
            && self.draw_width == self.canvas_width
            && self.draw_height == self.canvas_height
    }
}

/// Source window to keep and the size it is scaled to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropLayout {
    pub crop_x: u32,
    pub crop_y: u32,
    pub crop_width: u32,
    pub crop_height: u32,
    pub output_width: u32,
    pub output_height: u32,
}

impl CropLayout {
    pub fn is_uncropped(&self, source_width: u32, source_height: u32) -> bool {
        self.crop_x == 0
            && self.crop_y == 0
            && self.crop_width == source_width
            && self.crop_height == source_height
    }
}

fn round_px(value: f64) -> u32 {
    value.round().max(1.0) as u32
}

/// Size of a proportional rescale that only upscales when below `min_width`.
fn rescale(source_width: u32, source_height: u32, min_width: u32) -> (u32, u32) {
    let width = min_width.max(source_width);
    let height = round_px(source_height as f64 * width as f64 / source_width as f64);
    (width, height)
}

/// Fit the whole source inside a `target_aspect` canvas without cropping.
///
/// Canvas width is `max(min_width, source_width)`, height is
/// `width / target_aspect`. The source is scaled by
/// `min(canvas_w / src_w, canvas_h / src_h)` and centered.
pub fn pad_layout(
    source_width: u32,
    source_height: u32,
    target_aspect: f64,
    min_width: u32,
) -> PadLayout {
    let source_aspect = source_width as f64 / source_height as f64;

    if aspects_match(source_aspect, target_aspect) {
        let (width, height) = rescale(source_width, source_height, min_width);
        return PadLayout {
            canvas_width: width,
            canvas_height: height,
            draw_x: 0,
            draw_y: 0,
            draw_width: width,
            draw_height: height,
            scale: width as f64 / source_width as f64,
        };
    }

    let canvas_width = min_width.max(source_width);
    let canvas_height = round_px(canvas_width as f64 / target_aspect);

    let scale = (canvas_width as f64 / source_width as f64)
        .min(canvas_height as f64 / source_height as f64);
    let draw_width = round_px(source_width as f64 * scale).min(canvas_width);
    let draw_height = round_px(source_height as f64 * scale).min(canvas_height);
    let draw_x = ((canvas_width - draw_width) as f64 / 2.0).round() as u32;
    let draw_y = ((canvas_height - draw_height) as f64 / 2.0).round() as u32;

    PadLayout {
        canvas_width,
        canvas_height,
        draw_x,
        draw_y,
        draw_width,
        draw_height,
        scale,
    }
}

/// Trim the source symmetrically to `target_aspect`, then scale the window to
/// `max(min_width, window_width)`.
pub fn crop_layout(
    source_width: u32,
    source_height: u32,
    target_aspect: f64,
    min_width: u32,
) -> CropLayout {
    let source_aspect = source_width as f64 / source_height as f64;

    if aspects_match(source_aspect, target_aspect) {
        let (width, height) = rescale(source_width, source_height, min_width);
        return CropLayout {
            crop_x: 0,
            crop_y: 0,
            crop_width: source_width,
            crop_height: source_height,
            output_width: width,
            output_height: height,
        };
    }

    let (mut crop_x, mut crop_y) = (0, 0);
    let (mut crop_width, mut crop_height) = (source_width, source_height);

    if source_aspect > target_aspect {
        // too wide: trim left and right
        crop_width = round_px(source_height as f64 * target_aspect).min(source_width);
        crop_x = ((source_width - crop_width) as f64 / 2.0).round() as u32;
    } else {
        // too tall: trim top and bottom
        crop_height = round_px(source_width as f64 / target_aspect).min(source_height);
        crop_y = ((source_height - crop_height) as f64 / 2.0).round() as u32;
    }

    let output_width = min_width.max(crop_width);
    let output_height = round_px(output_width as f64 / target_aspect);

    CropLayout {
        crop_x,
        crop_y,
        crop_width,
        crop_height,
        output_width,
        output_height,
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}

/// How a source image compares with a target aspect ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectReport {
    pub width: u32,
    pub height: u32,
    /// Reduced `w:h`, e.g. `3:2`
    pub ratio: String,
    pub aspect: f64,
    pub target_aspect: f64,
    pub matches_target: bool,
}

impl AspectReport {
    pub fn new(width: u32, height: u32, target_aspect: f64) -> Self {
        let g = gcd(width, height);
        let aspect = width as f64 / height as f64;
        Self {
            width,
            height,
            ratio: format!("{}:{}", width / g, height / g),
            aspect,
            target_aspect,
            matches_target: aspects_match(aspect, target_aspect),
        }
    }

    /// Advisory shown before the image is normalized.
    pub fn message(&self) -> String {
        if self.matches_target {
            format!(
                "Image ratio {} (~{:.3}) already matches the recommended ~{:.3}.",
                self.ratio, self.aspect, self.target_aspect
            )
        } else {
            format!(
                "Image ratio is {} (~{:.3}). It will be adjusted to the recommended ~{:.3} before upload.",
                self.ratio, self.aspect, self.target_aspect
            )
        }
    }
}
