//! Image downscaling contracts.
//!
//! Uploaded photos are persisted as data URLs, so every image passes through an
//! [`ImageCompressor`] that bounds its width and re-encodes it lossily before it is stored.

use std::{future::Future, pin::Pin};

use thiserror::Error;

/// Default maximum width, in pixels, of a persisted image.
pub const DEFAULT_MAX_WIDTH: u32 = 800;
/// Default lossy encoding quality in `0.0..=1.0`.
pub const DEFAULT_QUALITY: f64 = 0.7;
/// Mime type produced by compressors.
pub const COMPRESSED_MIME_TYPE: &str = "image/jpeg";

/// Object-safe boxed future used by [`ImageCompressor`].
pub type ImageFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failures of the decode/resize/encode pipeline.
pub enum ImageError {
    /// The input could not be interpreted as an image.
    #[error("failed to load image: {0}")]
    Decode(String),
    /// The rendering surface or encoder could not be created.
    #[error("could not encode image: {0}")]
    Encode(String),
    /// No compressor is available on this host.
    #[error("image compression unavailable: {0}")]
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Pixel dimensions of a raster image.
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates a dimension pair.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Constrains `source` to `max_width`, keeping the aspect ratio.
///
/// Images already at or below `max_width` keep their dimensions. Wider images get exactly
/// `max_width` and `round(height * max_width / width)`, never less than one pixel.
pub fn scaled_dimensions(source: ImageDimensions, max_width: u32) -> ImageDimensions {
    if source.width <= max_width || source.width == 0 {
        return source;
    }
    let ratio = f64::from(max_width) / f64::from(source.width);
    let height = (f64::from(source.height) * ratio).round().max(1.0) as u32;
    ImageDimensions::new(max_width, height)
}

/// Clamps an encoder quality into `0.0..=1.0`, mapping NaN to [`DEFAULT_QUALITY`].
pub fn clamp_quality(quality: f64) -> f64 {
    if quality.is_nan() {
        DEFAULT_QUALITY
    } else {
        quality.clamp(0.0, 1.0)
    }
}

/// Host service that downscales and re-encodes an encoded image.
pub trait ImageCompressor {
    /// Decodes `data_url`, limits its width to `max_width`, and re-encodes it as
    /// [`COMPRESSED_MIME_TYPE`] at `quality`.
    fn compress<'a>(
        &'a self,
        data_url: &'a str,
        max_width: u32,
        quality: f64,
    ) -> ImageFuture<'a, Result<String, ImageError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Compressor for hosts without an image pipeline; every call fails with
/// [`ImageError::Unsupported`].
pub struct NoopImageCompressor;

impl ImageCompressor for NoopImageCompressor {
    fn compress<'a>(
        &'a self,
        _data_url: &'a str,
        _max_width: u32,
        _quality: f64,
    ) -> ImageFuture<'a, Result<String, ImageError>> {
        Box::pin(async { Err(ImageError::Unsupported("no image pipeline on this host".into())) })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Metadata of a user-selected image file, checked before the file is read.
pub struct ImageCandidate {
    /// Browser-reported mime type (may be empty).
    pub mime_type: String,
    /// File size in bytes.
    pub size_bytes: u64,
}

impl ImageCandidate {
    /// Creates candidate metadata.
    pub fn new(mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            mime_type: mime_type.into(),
            size_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn narrow_images_keep_their_dimensions() {
        let source = ImageDimensions::new(640, 480);
        assert_eq!(scaled_dimensions(source, 800), source);
        assert_eq!(scaled_dimensions(ImageDimensions::new(800, 10), 800).width, 800);
    }

    #[test]
    fn wide_images_scale_to_max_width_proportionally() {
        assert_eq!(
            scaled_dimensions(ImageDimensions::new(1600, 1200), 800),
            ImageDimensions::new(800, 600)
        );
        // 1000 * 800 / 3000 = 266.67
        assert_eq!(
            scaled_dimensions(ImageDimensions::new(3000, 1000), 800),
            ImageDimensions::new(800, 267)
        );
    }

    #[test]
    fn extreme_panoramas_keep_at_least_one_pixel_of_height() {
        assert_eq!(
            scaled_dimensions(ImageDimensions::new(100_000, 10), 800),
            ImageDimensions::new(800, 1)
        );
    }

    #[test]
    fn quality_is_clamped() {
        assert_eq!(clamp_quality(1.5), 1.0);
        assert_eq!(clamp_quality(-0.2), 0.0);
        assert_eq!(clamp_quality(0.4), 0.4);
        assert_eq!(clamp_quality(f64::NAN), DEFAULT_QUALITY);
    }

    #[test]
    fn noop_compressor_reports_unsupported() {
        let result = futures::executor::block_on(NoopImageCompressor.compress(
            "data:image/png;base64,aGVsbG8=",
            DEFAULT_MAX_WIDTH,
            DEFAULT_QUALITY,
        ));
        assert!(matches!(result, Err(ImageError::Unsupported(_))));
    }
}
