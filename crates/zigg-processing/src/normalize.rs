//! Aspect normalizer
//!
//! Re-encodes an image so it matches a target aspect ratio and minimum width,
//! either by letterboxing onto a solid background (pad) or by trimming the
//! overflowing edges (crop). The output encoding is part of the options and
//! never depends on the source format.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageReader, Rgba, RgbaImage};
use tracing::debug;
use zigg_core::constants::{
    BANNER_ASPECT, BANNER_BACKGROUND, BANNER_JPEG_QUALITY, BANNER_MIN_WIDTH,
};
use zigg_core::models::MediaFile;
use zigg_core::ConsoleError;

use crate::geometry::{crop_layout, pad_layout};

/// Largest width or height a normalized image may have.
pub const MAX_OUTPUT_SIDE: u32 = 16_384;

/// Largest pixel count a normalized image may have.
pub const MAX_OUTPUT_PIXELS: u64 = 100_000_000;

fn check_output_size(width: u32, height: u32) -> Result<(), ConsoleError> {
    if width > MAX_OUTPUT_SIDE
        || height > MAX_OUTPUT_SIDE
        || width as u64 * height as u64 > MAX_OUTPUT_PIXELS
    {
        return Err(ConsoleError::validation(format!(
            "Normalized image would be {}x{}, above the {}px limit",
            width, height, MAX_OUTPUT_SIDE
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizePolicy {
    /// Fit the whole image and fill the margins with `background`.
    Pad { background: Rgba<u8> },
    /// Trim symmetrically to the target aspect.
    Crop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEncoding {
    /// Quality 1-100
    Jpeg { quality: u8 },
    Png,
}

impl OutputEncoding {
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputEncoding::Jpeg { .. } => "image/jpeg",
            OutputEncoding::Png => "image/png",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            OutputEncoding::Jpeg { .. } => "jpg",
            OutputEncoding::Png => "png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeOptions {
    pub target_aspect: f64,
    pub min_width: u32,
    pub policy: NormalizePolicy,
    pub encoding: OutputEncoding,
}

impl NormalizeOptions {
    /// Notice banner preset: 9 : 5.16, at least 1500px wide, padded with
    /// white, JPEG quality 92.
    pub fn banner() -> Self {
        Self {
            target_aspect: BANNER_ASPECT,
            min_width: BANNER_MIN_WIDTH,
            policy: NormalizePolicy::Pad {
                background: Rgba(BANNER_BACKGROUND),
            },
            encoding: OutputEncoding::Jpeg {
                quality: BANNER_JPEG_QUALITY,
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConsoleError> {
        if !self.target_aspect.is_finite() || self.target_aspect <= 0.0 {
            return Err(ConsoleError::validation(format!(
                "Target aspect must be a positive number, got {}",
                self.target_aspect
            )));
        }
        if self.min_width == 0 {
            return Err(ConsoleError::validation("Minimum width must be positive"));
        }
        if self.min_width > MAX_OUTPUT_SIDE {
            return Err(ConsoleError::validation(format!(
                "Minimum width must be at most {}px, got {}",
                MAX_OUTPUT_SIDE, self.min_width
            )));
        }
        if let OutputEncoding::Jpeg { quality } = self.encoding {
            if !(1..=100).contains(&quality) {
                return Err(ConsoleError::validation(format!(
                    "JPEG quality must be between 1 and 100, got {}",
                    quality
                )));
            }
        }
        Ok(())
    }

    fn name_suffix(&self) -> &'static str {
        match self.policy {
            NormalizePolicy::Pad { .. } => "padded",
            NormalizePolicy::Crop => "normalized",
        }
    }
}

/// Re-encoded image and its final size.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub file: MediaFile,
    pub width: u32,
    pub height: u32,
}

pub struct AspectNormalizer;

impl AspectNormalizer {
    /// Choose a resampling filter from the resize ratio.
    fn select_filter(orig_width: u32, orig_height: u32, new_width: u32, new_height: u32) -> FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    fn resize(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        if (orig_width, orig_height) == (width, height) {
            return img.clone();
        }
        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }

    fn decode(file: &MediaFile) -> Result<DynamicImage, ConsoleError> {
        ImageReader::new(Cursor::new(&file.data))
            .with_guessed_format()
            .map_err(|e| ConsoleError::Decode(format!("{}: {}", file.file_name, e)))?
            .decode()
            .map_err(|e| ConsoleError::Decode(format!("{}: {}", file.file_name, e)))
    }

    /// Transparent source pixels are blended onto `background` even when no
    /// margin is added.
    fn pad(
        img: &DynamicImage,
        options: &NormalizeOptions,
        background: Rgba<u8>,
    ) -> Result<DynamicImage, ConsoleError> {
        let (width, height) = img.dimensions();
        let layout = pad_layout(width, height, options.target_aspect, options.min_width);
        check_output_size(layout.canvas_width, layout.canvas_height)?;

        let drawn = Self::resize(img, layout.draw_width, layout.draw_height).to_rgba8();
        let mut canvas = RgbaImage::from_pixel(layout.canvas_width, layout.canvas_height, background);
        imageops::overlay(&mut canvas, &drawn, layout.draw_x as i64, layout.draw_y as i64);
        Ok(DynamicImage::ImageRgba8(canvas))
    }

    fn crop(img: &DynamicImage, options: &NormalizeOptions) -> Result<DynamicImage, ConsoleError> {
        let (width, height) = img.dimensions();
        let layout = crop_layout(width, height, options.target_aspect, options.min_width);
        check_output_size(layout.output_width, layout.output_height)?;

        let window = if layout.is_uncropped(width, height) {
            img.clone()
        } else {
            img.crop_imm(layout.crop_x, layout.crop_y, layout.crop_width, layout.crop_height)
        };
        Ok(Self::resize(&window, layout.output_width, layout.output_height))
    }

    fn encode(img: &DynamicImage, encoding: OutputEncoding) -> Result<Vec<u8>, ConsoleError> {
        let mut buffer = Vec::new();
        match encoding {
            OutputEncoding::Jpeg { quality } => {
                // JPEG has no alpha channel
                let rgb = img.to_rgb8();
                let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
                rgb.write_with_encoder(encoder)
                    .map_err(|e| ConsoleError::Encode(e.to_string()))?;
            }
            OutputEncoding::Png => {
                let encoder = PngEncoder::new(&mut buffer);
                img.write_with_encoder(encoder)
                    .map_err(|e| ConsoleError::Encode(e.to_string()))?;
            }
        }

        if buffer.is_empty() {
            return Err(ConsoleError::Encode("encoder produced no output".to_string()));
        }
        Ok(buffer)
    }

    /// Decode `file`, bring it to the target aspect and re-encode it.
    ///
    /// The result is named `<stem>_padded.<ext>` or `<stem>_normalized.<ext>`
    /// depending on the policy.
    pub fn normalize(
        file: &MediaFile,
        options: &NormalizeOptions,
    ) -> Result<NormalizedImage, ConsoleError> {
        options.validate()?;
        let img = Self::decode(file)?;

        let output = match options.policy {
            NormalizePolicy::Pad { background } => Self::pad(&img, options, background)?,
            NormalizePolicy::Crop => Self::crop(&img, options)?,
        };
        let (width, height) = output.dimensions();
        let data = Self::encode(&output, options.encoding)?;

        let file_name = format!(
            "{}_{}.{}",
            file.stem(),
            options.name_suffix(),
            options.encoding.file_extension()
        );
        debug!(
            source = %file.file_name,
            output = %file_name,
            width,
            height,
            bytes = data.len(),
            "Normalized image"
        );

        Ok(NormalizedImage {
            file: MediaFile::new(
                file_name,
                Some(options.encoding.mime_type().to_string()),
                data,
            ),
            width,
            height,
        })
    }

    /// [`normalize`](Self::normalize) on the blocking thread pool.
    pub async fn normalize_blocking(
        file: MediaFile,
        options: NormalizeOptions,
    ) -> Result<NormalizedImage, ConsoleError> {
        tokio::task::spawn_blocking(move || Self::normalize(&file, &options))
            .await
            .map_err(|e| ConsoleError::Internal {
                message: "Image normalization task failed".to_string(),
                source: e.into(),
            })?
    }
}
