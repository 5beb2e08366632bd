//! Zoomable, pannable view of a raster image rendered as half-block cells
//!
//! [`ImageView`] owns the zoom cache and the viewport. Every mutation
//! re-clamps the origin before returning, so reads always observe a window
//! that overlaps the image.

pub mod coords;
pub mod render;
pub mod types;
pub mod viewport;
pub mod zoom;

use log::debug;

use crate::raster::RasterImage;

pub use render::RenderedLine;
pub use types::{Glyph, MIN_ZOOMED_DIMENSION, StyledCell, ZOOM_RATE, ZoomLevel};
pub use viewport::{Viewport, clamp_origin};
pub use zoom::{ZoomCache, ZoomEntry};

/// Zoom, pan and render state for a single image
#[derive(Debug)]
pub struct ImageView {
    cache: ZoomCache,
    zoom: ZoomLevel,
    viewport: Viewport,
}

impl ImageView {
    pub fn new(image: RasterImage) -> Self {
        let mut view = Self {
            cache: ZoomCache::new(image),
            zoom: 0,
            viewport: Viewport::new(),
        };
        view.set_origin((0, 0));
        view
    }

    /// Size of the unscaled image
    pub fn size(&self) -> (u32, u32) {
        self.cache.source().size()
    }

    /// Size of the image at the current zoom level
    pub fn zoomed_size(&self) -> (u32, u32) {
        self.cache
            .entry(self.zoom)
            .map(ZoomEntry::size)
            .unwrap_or_else(|| self.size())
    }

    pub fn zoom_level(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn origin(&self) -> (i32, i32) {
        self.viewport.origin()
    }

    pub fn container_size(&self) -> Option<(u16, u16)> {
        self.viewport.container_size()
    }

    pub fn cache(&self) -> &ZoomCache {
        &self.cache
    }

    /// Change the zoom level by `delta`; positive zooms out
    pub fn zoom(&mut self, delta: i32, anchor: Option<(i32, i32)>) {
        let target = i64::from(self.zoom) + i64::from(delta);
        self.set_zoom(target.clamp(0, i64::from(i32::MAX)) as i32, anchor);
    }

    /// Switch to `level`, keeping the image pixel at `anchor` fixed on screen.
    ///
    /// Levels below 0 become 0. Zooming further out is refused once the
    /// current level is already [`MIN_ZOOMED_DIMENSION`] pixels or smaller
    /// on either axis. Without an anchor the container's default anchor is
    /// used.
    pub fn set_zoom(&mut self, level: i32, anchor: Option<(i32, i32)>) {
        let mut level = level.max(0) as ZoomLevel;

        let old_size = self.zoomed_size();
        if level > self.zoom && old_size.0.min(old_size.1) <= MIN_ZOOMED_DIMENSION {
            debug!(
                "Refusing zoom {} -> {level}: current size {old_size:?} is already minimal",
                self.zoom
            );
            level = self.zoom;
        }

        let new_size = self.cache.get_or_create(level).size();
        let mut origin = self.viewport.origin();

        if let Some(default_anchor) = self.viewport.default_anchor() {
            let (ax, ay) = anchor.unwrap_or(default_anchor);
            origin.0 = origin.0.saturating_add(anchor_shift(ax, old_size.0, new_size.0));
            origin.1 = origin.1.saturating_add(anchor_shift(ay, old_size.1, new_size.1));
        }

        if level != self.zoom {
            debug!(
                "Zoom {} -> {level}: {old_size:?} -> {new_size:?}, origin {:?} -> {origin:?}",
                self.zoom,
                self.viewport.origin()
            );
        }
        self.zoom = level;
        self.viewport.set_origin(origin, new_size);
    }

    /// Move the image by `(dx, dy)` pixels: +x right, +y down.
    /// One cell row is two pixels.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        let size = self.zoomed_size();
        self.viewport.move_by(dx, dy, size);
    }

    /// Place the origin directly, returning the clamped value
    pub fn set_origin(&mut self, candidate: (i32, i32)) -> (i32, i32) {
        let size = self.zoomed_size();
        self.viewport.set_origin(candidate, size)
    }

    /// Adopt a new container size in cells
    pub fn set_container_size(&mut self, width: u16, height: u16, maintain_center: bool) {
        let size = self.zoomed_size();
        self.viewport
            .set_container_size(width, height, maintain_center, size);
    }

    /// Image position of the cell at `(row, col)` given the widget `offset`
    /// `(rows, cols)` from the drawing surface's top-left
    pub fn rowcol_to_xy(&self, row: i32, col: i32, offset: (i32, i32)) -> (i32, i32) {
        coords::rowcol_to_xy(self.origin(), row, col, offset)
    }

    /// Cell `(row, col)` showing image position `(x, y)`
    pub fn xy_to_rowcol(&self, x: i32, y: i32, offset: (i32, i32)) -> (i32, i32) {
        coords::xy_to_rowcol(self.origin(), x, y, offset)
    }

    /// Cell whose upper half is pixel `(x, y)` at the current zoom level
    pub fn get_cell(&mut self, x: i32, y: i32) -> StyledCell {
        self.cache.get_or_create(self.zoom).cell(x, y)
    }

    /// Lines for the current window; empty until a non-zero container is set
    pub fn render(&mut self) -> Vec<RenderedLine> {
        let origin = self.viewport.origin();
        let container = self.viewport.container_size();
        render::render_lines(self.cache.get_or_create(self.zoom), origin, container)
    }

    /// Replace the source image, resetting zoom and every cached level
    pub fn set_image(&mut self, image: RasterImage) {
        self.cache.replace_source(image);
        self.zoom = 0;
        let origin = self.viewport.origin();
        self.set_origin(origin);
    }
}

/// How far a pixel at `pos` travels when its axis goes from `old` to `new` pixels
fn anchor_shift(pos: i32, old: u32, new: u32) -> i32 {
    let scaled = f64::from(pos) * f64::from(new) / f64::from(old);
    (scaled - f64::from(pos)).round_ties_even() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> RasterImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
        });
        RasterImage::from_dynamic(&DynamicImage::ImageRgb8(img)).unwrap()
    }

    fn view_with(width: u32, height: u32, container: (u16, u16), origin: (i32, i32)) -> ImageView {
        let mut view = ImageView::new(gradient(width, height));
        view.set_container_size(container.0, container.1, false);
        view.set_origin(origin);
        view
    }

    #[test]
    fn test_render_fully_inside() {
        let mut view = view_with(16, 16, (8, 4), (0, 0));
        let lines = view.render();

        assert_eq!(lines.len(), 4);
        for (row, line) in lines.iter().enumerate() {
            assert_eq!(line.padding, 0);
            assert_eq!(line.cells.len(), 8);
            for (col, cell) in line.cells.iter().enumerate() {
                assert_eq!(cell.glyph, Glyph::UpperHalf);
                let y = 2 * row as i32;
                assert_eq!(cell.fg, view.cache().source().pixel(col as i32, y));
                assert_eq!(cell.bg, view.cache().source().pixel(col as i32, y + 1));
            }
        }
    }

    #[test]
    fn test_render_with_padding_and_blank_rows() {
        let mut view = view_with(16, 16, (40, 20), (-20, -20));
        assert_eq!(view.origin(), (-20, -20));

        let lines = view.render();
        // y = -20..-2 are above the image, y = 0..14 cover it
        assert_eq!(lines.len(), 18);
        for line in &lines[..10] {
            assert!(line.is_empty());
        }
        for line in &lines[10..] {
            assert_eq!(line.padding, 20);
            assert_eq!(line.cells.len(), 16);
        }
    }

    #[test]
    fn test_render_half_row_at_top_edge() {
        let mut view = view_with(16, 16, (40, 20), (0, -21));
        let lines = view.render();

        let first = lines.iter().find(|line| !line.is_empty()).unwrap();
        assert!(first.cells.iter().all(|cell| cell.glyph == Glyph::LowerHalf));
        assert_eq!(first.cells[3].fg, view.cache().source().pixel(3, 0));
    }

    #[test]
    fn test_render_bottom_edge_has_no_background() {
        let mut view = view_with(4, 5, (4, 4), (0, 0));
        let lines = view.render();

        assert_eq!(lines.len(), 3);
        let last = lines.last().unwrap();
        assert!(last.cells.iter().all(|cell| cell.bg.is_none()));
    }

    #[test]
    fn test_render_without_container_or_with_zero_size() {
        let mut view = ImageView::new(gradient(16, 16));
        assert!(view.render().is_empty());

        view.set_container_size(0, 4, false);
        assert!(view.render().is_empty());

        view.set_container_size(4, 0, false);
        assert!(view.render().is_empty());
    }

    #[test]
    fn test_zoom_never_below_zero() {
        let mut view = view_with(32, 32, (8, 4), (0, 0));

        view.set_zoom(-3, None);
        assert_eq!(view.zoom_level(), 0);

        view.zoom(-1, None);
        assert_eq!(view.zoom_level(), 0);
    }

    #[test]
    fn test_zoom_out_stops_at_minimum_size() {
        let mut view = view_with(10, 10, (8, 4), (0, 0));

        view.zoom(1, None);
        assert_eq!(view.zoom_level(), 1);
        assert_eq!(view.zoomed_size(), (8, 8));

        view.zoom(1, None);
        assert_eq!(view.zoom_level(), 1);
        assert!(!view.cache().contains(2));
    }

    #[test]
    fn test_large_zoom_step_is_measured_against_current_level() {
        let mut view = view_with(10, 10, (8, 4), (0, 0));

        // 10px is above the minimum, so a five-level jump goes through
        view.set_zoom(5, None);
        assert_eq!(view.zoom_level(), 5);
        assert_eq!(view.zoomed_size(), (3, 3));
    }

    #[test]
    fn test_set_zoom_is_idempotent() {
        let mut view = view_with(64, 64, (16, 8), (5, 7));

        view.set_zoom(2, None);
        let origin = view.origin();
        let size = view.zoomed_size();
        let levels = view.cache().len();

        view.set_zoom(2, None);
        assert_eq!(view.origin(), origin);
        assert_eq!(view.zoomed_size(), size);
        assert_eq!(view.cache().len(), levels);
    }

    #[test]
    fn test_zoom_keeps_anchor_in_place() {
        let mut view = view_with(64, 64, (16, 8), (0, 0));
        let anchor = (8, 14);
        let before = view.xy_to_rowcol(anchor.0, anchor.1, (0, 0));

        view.zoom(1, Some(anchor));
        assert_eq!(view.zoomed_size(), (51, 51));
        assert_eq!(view.origin(), (-2, -3));

        let scale = 51.0 / 64.0;
        let moved = (
            (f64::from(anchor.0) * scale).round() as i32,
            (f64::from(anchor.1) * scale).round() as i32,
        );
        let after = view.xy_to_rowcol(moved.0, moved.1, (0, 0));
        assert!((after.0 - before.0).abs() <= 1, "{before:?} vs {after:?}");
        assert!((after.1 - before.1).abs() <= 1, "{before:?} vs {after:?}");
    }

    #[test]
    fn test_zoom_defaults_to_bottom_center_anchor() {
        let mut view = view_with(64, 64, (16, 8), (10, 10));
        // (origin_x + 16 / 2, origin_y + 8)
        let anchor = (18, 18);
        let before = view.xy_to_rowcol(anchor.0, anchor.1, (0, 0));
        assert_eq!(before, (4, 8));

        view.zoom(1, None);
        assert_eq!(view.zoomed_size(), (51, 51));
        assert_eq!(view.origin(), (6, 6));

        // 18 * 51 / 64 rounds to 14
        let after = view.xy_to_rowcol(14, 14, (0, 0));
        assert!((after.0 - before.0).abs() <= 1, "{before:?} vs {after:?}");
        assert!((after.1 - before.1).abs() <= 1, "{before:?} vs {after:?}");
    }

    #[test]
    fn test_zoom_in_with_distant_anchor_saturates() {
        let mut view = view_with(10, 10, (8, 4), (0, 0));
        view.set_zoom(5, None);
        assert_eq!(view.zoomed_size(), (3, 3));
        view.set_origin((2, 0));

        view.set_zoom(0, Some((i32::MAX, 0)));
        assert_eq!(view.zoom_level(), 0);
        // Upper bound for x is image width - 1
        assert_eq!(view.origin().0, 9);

        view.set_zoom(5, None);
        view.set_zoom(0, Some((i32::MIN, i32::MIN)));
        assert_eq!(view.origin(), (-7, -7));
    }

    #[test]
    fn test_zoom_without_container_still_switches_level() {
        let mut view = ImageView::new(gradient(64, 64));

        view.zoom(2, None);
        assert_eq!(view.zoom_level(), 2);
        assert_eq!(view.zoomed_size(), (41, 41));
    }

    #[test]
    fn test_cells_cached_per_level() {
        let mut view = view_with(32, 32, (8, 4), (0, 0));

        let first = view.get_cell(3, 4);
        assert_eq!(view.get_cell(3, 4), first);
        assert_eq!(view.cache().entry(0).unwrap().cached_cells(), 1);

        view.zoom(1, None);
        view.get_cell(3, 4);
        assert_eq!(view.cache().entry(1).unwrap().cached_cells(), 1);
        assert_eq!(view.cache().entry(0).unwrap().cached_cells(), 1);
    }

    #[test]
    fn test_move_round_trip() {
        let mut view = view_with(64, 64, (16, 8), (10, 10));

        view.move_by(3, -4);
        assert_eq!(view.origin(), (7, 14));
        view.move_by(-3, 4);
        assert_eq!(view.origin(), (10, 10));
    }

    #[test]
    fn test_set_image_resets_cache() {
        let mut view = view_with(64, 64, (16, 8), (40, 40));
        view.zoom(2, None);

        view.set_image(gradient(20, 20));

        assert_eq!(view.zoom_level(), 0);
        assert_eq!(view.cache().len(), 1);
        assert_eq!(view.zoomed_size(), (20, 20));
        assert!(view.origin().0 <= 19 && view.origin().1 <= 19);
    }
}
