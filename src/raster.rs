//! Decoded raster ingestion
//!
//! Every supported pixel layout is tagged once on the way in and normalized
//! to 8-bit RGB, so the rest of the viewer only ever samples RGB triples.

use fast_image_resize as fr;
use image::{ColorType, DynamicImage, GenericImageView, ImageBuffer, Rgb, RgbImage};
use log::{debug, warn};
use std::path::Path;

/// Errors raised while bringing an image into the viewer
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("invalid image: {reason}")]
    InvalidImage { reason: String },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ViewerError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
        }
    }
}

/// Channel layout of the source data before normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    fn from_color_type(color: ColorType) -> Result<Self, ViewerError> {
        match color {
            ColorType::L8 | ColorType::L16 => Ok(Self::Gray),
            ColorType::La8 | ColorType::La16 => Ok(Self::GrayAlpha),
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => Ok(Self::Rgb),
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => Ok(Self::Rgba),
            other => Err(ViewerError::invalid(format!(
                "unsupported color type {other:?}"
            ))),
        }
    }

    /// Expand one source pixel to RGB; gray is replicated, alpha is dropped
    fn to_rgb(self, px: &[u8]) -> Rgb<u8> {
        match self {
            Self::Gray | Self::GrayAlpha => Rgb([px[0], px[0], px[0]]),
            Self::Rgb | Self::Rgba => Rgb([px[0], px[1], px[2]]),
        }
    }
}

/// Immutable RGB pixel grid
#[derive(Clone)]
pub struct RasterImage {
    pixels: RgbImage,
    source_format: PixelFormat,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("source_format", &self.source_format)
            .finish()
    }
}

impl RasterImage {
    /// Decode an image file from disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let path = path.as_ref();
        let image = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?;
        debug!(
            "Decoded {path:?}: {}x{} {:?}",
            image.width(),
            image.height(),
            image.color()
        );
        Self::from_dynamic(&image)
    }

    /// Ingest an already decoded image
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self, ViewerError> {
        let source_format = PixelFormat::from_color_type(image.color())?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ViewerError::invalid(format!(
                "image has no pixels ({width}x{height})"
            )));
        }

        Ok(Self {
            pixels: image.to_rgb8(),
            source_format,
        })
    }

    /// Ingest a tightly packed 8-bit buffer in the given layout
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: &[u8],
    ) -> Result<Self, ViewerError> {
        if width == 0 || height == 0 {
            return Err(ViewerError::invalid(format!(
                "image has no pixels ({width}x{height})"
            )));
        }
        let expected = width as usize * height as usize * format.channels();
        if data.len() != expected {
            return Err(ViewerError::invalid(format!(
                "expected {expected} bytes for {width}x{height} {format:?}, got {}",
                data.len()
            )));
        }

        let mut pixels = RgbImage::new(width, height);
        for (dst, src) in pixels.pixels_mut().zip(data.chunks_exact(format.channels())) {
            *dst = format.to_rgb(src);
        }

        Ok(Self {
            pixels,
            source_format: format,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn source_format(&self) -> PixelFormat {
        self.source_format
    }

    /// Sample one pixel; `None` outside the grid
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb<u8>> {
        if x < 0 || y < 0 {
            return None;
        }
        self.pixels.get_pixel_checked(x as u32, y as u32).copied()
    }

    /// Resample to the given size, never below one pixel per axis
    pub fn resized(&self, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        if (width, height) == self.size() {
            return self.clone();
        }

        let pixels = match fast_resize(&self.pixels, width, height) {
            Ok(resized) => resized,
            Err(e) => {
                warn!("Fast resize to {width}x{height} failed: {e}, falling back to slow resize");
                image::imageops::resize(
                    &self.pixels,
                    width,
                    height,
                    image::imageops::FilterType::CatmullRom,
                )
            }
        };

        Self {
            pixels,
            source_format: self.source_format,
        }
    }
}

fn fast_resize(
    src: &RgbImage,
    new_width: u32,
    new_height: u32,
) -> Result<RgbImage, Box<dyn std::error::Error>> {
    let (src_width, src_height) = src.dimensions();

    let src_image = fr::Image::from_vec_u8(
        std::num::NonZeroU32::new(src_width).ok_or("Invalid width")?,
        std::num::NonZeroU32::new(src_height).ok_or("Invalid height")?,
        src.as_raw().clone(),
        fr::PixelType::U8x3,
    )?;

    let dst_width = std::num::NonZeroU32::new(new_width).ok_or("Invalid target width")?;
    let dst_height = std::num::NonZeroU32::new(new_height).ok_or("Invalid target height")?;
    let mut dst_image = fr::Image::new(dst_width, dst_height, fr::PixelType::U8x3);

    // Bicubic, matching what most image libraries use for a plain resize
    let mut resizer = fr::Resizer::new(fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom));
    resizer.resize(&src_image.view(), &mut dst_image.view_mut())?;

    ImageBuffer::from_raw(new_width, new_height, dst_image.into_vec())
        .ok_or_else(|| "Failed to create ImageBuffer".into())
}
