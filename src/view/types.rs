//! Core types shared by the zoom cache, viewport and renderer

use image::Rgb;

/// Index into the geometric zoom series; higher is smaller on screen
pub type ZoomLevel = u32;

/// Per-level scale multiplier
pub const ZOOM_RATE: f64 = 0.8;

/// Zooming out stops once the current level is this small on either axis
pub const MIN_ZOOMED_DIMENSION: u32 = 8;

/// Scale factor for a zoom level
pub fn zoom_multiplier(level: ZoomLevel) -> f64 {
    ZOOM_RATE.powi(level as i32)
}

/// Half-block glyph used for a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// `▀`: foreground paints the upper pixel
    UpperHalf,
    /// `▄`: foreground paints the lower pixel
    LowerHalf,
}

impl Glyph {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::UpperHalf => "▀",
            Self::LowerHalf => "▄",
        }
    }
}

/// One terminal cell covering two vertically adjacent pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledCell {
    pub glyph: Glyph,
    /// Color of the half the glyph draws; absent only when neither pixel exists
    pub fg: Option<Rgb<u8>>,
    /// Color of the other half, when there is one
    pub bg: Option<Rgb<u8>>,
}

impl StyledCell {
    /// Build a cell from the upper and lower pixel samples
    pub fn from_pair(upper: Option<Rgb<u8>>, lower: Option<Rgb<u8>>) -> Self {
        match upper {
            Some(upper) => Self {
                glyph: Glyph::UpperHalf,
                fg: Some(upper),
                bg: lower,
            },
            None => Self {
                glyph: Glyph::LowerHalf,
                fg: lower,
                bg: None,
            },
        }
    }
}
