//! Per-zoom-level resize and cell cache
//!
//! Entries are created the first time a level is visited and kept for the
//! rest of the session. The whole cache is dropped only when the source
//! raster is replaced.

use std::collections::HashMap;

use log::debug;

use super::types::{StyledCell, ZoomLevel, zoom_multiplier};
use crate::raster::RasterImage;

/// Resized raster for one zoom level plus the cells rendered from it
#[derive(Debug)]
pub struct ZoomEntry {
    image: RasterImage,
    cells: HashMap<(i32, i32), StyledCell>,
}

impl ZoomEntry {
    fn new(image: RasterImage) -> Self {
        Self {
            image,
            cells: HashMap::new(),
        }
    }

    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.size()
    }

    /// Cell whose upper half is pixel `(x, y)` and lower half `(x, y + 1)`
    pub fn cell(&mut self, x: i32, y: i32) -> StyledCell {
        let image = &self.image;
        *self.cells.entry((x, y)).or_insert_with(|| {
            StyledCell::from_pair(image.pixel(x, y), image.pixel(x, y.saturating_add(1)))
        })
    }

    /// Number of memoized cells
    pub fn cached_cells(&self) -> usize {
        self.cells.len()
    }
}

/// Map from zoom level to its resized raster and cell cache
#[derive(Debug)]
pub struct ZoomCache {
    source: RasterImage,
    entries: HashMap<ZoomLevel, ZoomEntry>,
}

impl ZoomCache {
    /// Create a cache with level 0 already populated
    pub fn new(source: RasterImage) -> Self {
        let mut cache = Self {
            source,
            entries: HashMap::new(),
        };
        cache.get_or_create(0);
        cache
    }

    /// The unscaled raster
    pub fn source(&self) -> &RasterImage {
        &self.source
    }

    pub fn contains(&self, level: ZoomLevel) -> bool {
        self.entries.contains_key(&level)
    }

    /// Number of levels resized so far
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, level: ZoomLevel) -> Option<&ZoomEntry> {
        self.entries.get(&level)
    }

    /// Entry for `level`, resizing the source on first use
    pub fn get_or_create(&mut self, level: ZoomLevel) -> &mut ZoomEntry {
        let source = &self.source;
        self.entries.entry(level).or_insert_with(|| {
            let multiplier = zoom_multiplier(level);
            let (w, h) = source.size();
            let width = (w as f64 * multiplier).round_ties_even() as u32;
            let height = (h as f64 * multiplier).round_ties_even() as u32;
            debug!("Zoom level {level}: resizing {w}x{h} to {width}x{height}");
            ZoomEntry::new(source.resized(width, height))
        })
    }

    /// Swap in a new source raster, dropping every cached level
    pub fn replace_source(&mut self, source: RasterImage) {
        debug!(
            "Replacing source raster, invalidating {} zoom levels",
            self.entries.len()
        );
        self.source = source;
        self.entries.clear();
        self.get_or_create(0);
    }
}
