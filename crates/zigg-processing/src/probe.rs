//! Dimension probe: image size from in-memory bytes, video duration through
//! `ffprobe`.

use std::io::Cursor;
use std::path::PathBuf;

use async_trait::async_trait;
use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, error};
use zigg_core::models::{MediaExtension, MediaFile};
use zigg_core::ConsoleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
    pub extension: MediaExtension,
}

pub struct ImageProbe;

impl ImageProbe {
    fn extension_for(format: Option<ImageFormat>, file: &MediaFile) -> MediaExtension {
        match format {
            Some(ImageFormat::Jpeg) => MediaExtension::Jpg,
            Some(ImageFormat::Png) => MediaExtension::Png,
            Some(ImageFormat::WebP) => MediaExtension::Webp,
            Some(ImageFormat::Gif) => MediaExtension::Gif,
            _ => MediaExtension::image_from_mime(file.content_type_or_default()),
        }
    }

    /// Read the image header and report its pixel size.
    ///
    /// The format is guessed from content. The extension falls back to the
    /// declared MIME type when the detected format is outside the accepted set.
    pub fn probe(file: &MediaFile) -> Result<ImageDimensions, ConsoleError> {
        let reader = ImageReader::new(Cursor::new(&file.data))
            .with_guessed_format()
            .map_err(|e| ConsoleError::Decode(format!("{}: {}", file.file_name, e)))?;
        let extension = Self::extension_for(reader.format(), file);

        // header only, pixels are not decoded
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| ConsoleError::Decode(format!("{}: {}", file.file_name, e)))?;

        let dimensions = ImageDimensions {
            width,
            height,
            extension,
        };
        debug!(
            file = %file.file_name,
            width = dimensions.width,
            height = dimensions.height,
            extension = %extension,
            "Probed image"
        );
        Ok(dimensions)
    }
}

/// Source of video durations in whole seconds.
#[async_trait]
pub trait DurationProbe: Send + Sync {
    async fn probe_duration(&self, file: &MediaFile) -> Result<u64, ConsoleError>;
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Floor the `format.duration` field of ffprobe's JSON output.
pub(crate) fn duration_from_ffprobe_json(stdout: &[u8]) -> Result<u64, ConsoleError> {
    let output: FfprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ConsoleError::Decode(format!("Failed to parse ffprobe output: {}", e)))?;

    let seconds = output
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite())
        .ok_or_else(|| ConsoleError::Decode("Video duration is unavailable".to_string()))?;

    Ok(seconds.max(0.0).floor() as u64)
}

/// Runs `ffprobe` against a temporary copy of the video bytes.
pub struct FfprobeDurationProbe {
    ffprobe_path: String,
    temp_dir: Option<PathBuf>,
}

impl FfprobeDurationProbe {
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            temp_dir: None,
        }
    }

    /// Place temporary copies in `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    fn temp_file(&self) -> std::io::Result<tempfile::NamedTempFile> {
        match &self.temp_dir {
            Some(dir) => tempfile::NamedTempFile::new_in(dir),
            None => tempfile::NamedTempFile::new(),
        }
    }
}

#[async_trait]
impl DurationProbe for FfprobeDurationProbe {
    #[tracing::instrument(skip(self, file), fields(file = %file.file_name))]
    async fn probe_duration(&self, file: &MediaFile) -> Result<u64, ConsoleError> {
        // removed on drop, whichever way this returns
        let temp_file = self.temp_file()?;
        tokio::fs::write(temp_file.path(), &file.data).await?;

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
            .arg(temp_file.path())
            .output()
            .await
            .map_err(|e| ConsoleError::Decode(format!("Failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffprobe failed: {}", stderr);
            return Err(ConsoleError::Decode(format!(
                "Could not read video metadata: {}",
                stderr.trim()
            )));
        }

        let seconds = duration_from_ffprobe_json(&output.stdout)?;
        debug!(seconds, "Probed video duration");
        Ok(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn encoded(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([30, 60, 90]));
        let mut data = Vec::new();
        img.write_to(&mut Cursor::new(&mut data), format).unwrap();
        data
    }

    #[test]
    fn probes_png_dimensions_and_extension() {
        let file = MediaFile::new("a.png", Some("image/png".into()), encoded(ImageFormat::Png, 320, 200));
        let dims = ImageProbe::probe(&file).unwrap();
        assert_eq!((dims.width, dims.height), (320, 200));
        assert_eq!(dims.extension, MediaExtension::Png);
    }

    #[test]
    fn detected_format_wins_over_declared_mime() {
        let file = MediaFile::new(
            "mislabeled.png",
            Some("image/png".into()),
            encoded(ImageFormat::Jpeg, 64, 48),
        );
        let dims = ImageProbe::probe(&file).unwrap();
        assert_eq!(dims.extension, MediaExtension::Jpg);
        assert_eq!((dims.width, dims.height), (64, 48));
    }

    #[test]
    fn formats_outside_the_set_fall_back_to_mime() {
        let untyped = MediaFile::new("scan.bmp", None, vec![]);
        assert_eq!(
            ImageProbe::extension_for(Some(ImageFormat::Bmp), &untyped),
            MediaExtension::Jpg
        );
        let typed = MediaFile::new("scan", Some("image/webp".into()), vec![]);
        assert_eq!(
            ImageProbe::extension_for(None, &typed),
            MediaExtension::Webp
        );
    }

    #[test]
    fn reads_gif_dimensions() {
        let file = MediaFile::new("wide.gif", Some("image/gif".into()), encoded(ImageFormat::Gif, 2400, 90));
        let dims = ImageProbe::probe(&file).unwrap();
        assert_eq!((dims.width, dims.height), (2400, 90));
        assert_eq!(dims.extension, MediaExtension::Gif);
    }

    #[test]
    fn junk_is_a_decode_error() {
        let file = MediaFile::new("x.jpg", Some("image/jpeg".into()), vec![0, 1, 2, 3, 4]);
        assert!(matches!(ImageProbe::probe(&file), Err(ConsoleError::Decode(_))));
    }

    #[test]
    fn ffprobe_duration_is_floored() {
        let json = br#"{"format":{"duration":"125.700000"}}"#;
        assert_eq!(duration_from_ffprobe_json(json).unwrap(), 125);

        let json = br#"{"format":{"duration":"0.4"}}"#;
        assert_eq!(duration_from_ffprobe_json(json).unwrap(), 0);
    }

    #[test]
    fn missing_duration_is_a_decode_error() {
        for json in [
            &br#"{"format":{}}"#[..],
            br#"{}"#,
            br#"{"format":{"duration":"N/A"}}"#,
            b"garbage",
        ] {
            assert!(matches!(
                duration_from_ffprobe_json(json),
                Err(ConsoleError::Decode(_))
            ));
        }
    }

    #[tokio::test]
    async fn temp_file_is_removed_when_ffprobe_fails() {
        let dir = tempfile::tempdir().unwrap();
        let probe = FfprobeDurationProbe::new("/nonexistent/ffprobe-binary").with_temp_dir(dir.path());
        let file = MediaFile::new("clip.mp4", Some("video/mp4".into()), vec![0u8; 64]);

        let err = probe.probe_duration(&file).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Decode(_)), "{:?}", err);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
