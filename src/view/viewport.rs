//! Visible window over the zoomed image
//!
//! Image space has its origin at the top-left pixel, +x right and +y down.
//! A cell is one unit wide and two units tall.

use log::debug;

/// Clamp a candidate origin so the image and container overlap on both axes.
///
/// `container` is `(width_cells, height_cells)`; without one both bounds
/// collapse to zero. The lower bound is applied first, so the upper bound
/// wins when they cross.
pub fn clamp_origin(
    candidate: (i32, i32),
    container: Option<(u16, u16)>,
    image_size: (u32, u32),
) -> (i32, i32) {
    let (w, h_px) = container
        .map(|(w, h)| (i64::from(w), 2 * i64::from(h)))
        .unwrap_or((0, 0));
    let (img_w, img_h) = (i64::from(image_size.0), i64::from(image_size.1));

    let clamp_axis = |value: i32, span: i64, extent: i64| -> i32 {
        let clamped = i64::from(value).max(1 - span).min(extent - 1);
        clamped as i32
    };

    (
        clamp_axis(candidate.0, w, img_w),
        clamp_axis(candidate.1, h_px, img_h),
    )
}

/// Origin and container size of the visible window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    origin: (i32, i32),
    container: Option<(u16, u16)>,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Image-space position of the container's top-left corner
    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// `(width, height)` in cells, once known
    pub fn container_size(&self) -> Option<(u16, u16)> {
        self.container
    }

    /// Store `candidate` after clamping it against `image_size`
    pub fn set_origin(&mut self, candidate: (i32, i32), image_size: (u32, u32)) -> (i32, i32) {
        self.origin = clamp_origin(candidate, self.container, image_size);
        self.origin
    }

    /// Shift the image by `(dx, dy)` pixels: +x moves it right, +y down
    pub fn move_by(&mut self, dx: i32, dy: i32, image_size: (u32, u32)) {
        let (x, y) = self.origin;
        self.set_origin(
            (x.saturating_sub(dx), y.saturating_sub(dy)),
            image_size,
        );
    }

    /// Adopt a new container size.
    ///
    /// With `maintain_center`, the columns in the middle of the old container
    /// stay in the middle horizontally and the content stays anchored to the
    /// bottom edge vertically.
    pub fn set_container_size(
        &mut self,
        width: u16,
        height: u16,
        maintain_center: bool,
        image_size: (u32, u32),
    ) {
        let (mut x, mut y) = self.origin;

        if let (true, Some((old_w, old_h))) = (maintain_center, self.container) {
            if width != old_w {
                let delta_w = i32::from(width) - i32::from(old_w);
                if delta_w % 2 == 0 {
                    x -= delta_w / 2;
                } else {
                    // Odd deltas alternate floor/ceil so 1-column steps stay even
                    let doubled = 2 * x - delta_w;
                    let floor = doubled.div_euclid(2);
                    x = if width % 2 == 0 { floor } else { floor + 1 };
                }
            }
            if height != old_h {
                y -= i32::from(height) - i32::from(old_h);
            }
        }

        debug!(
            "Container {:?} -> {width}x{height}, origin {:?} -> ({x}, {y})",
            self.container, self.origin
        );
        self.container = Some((width, height));
        self.set_origin((x, y), image_size);
    }

    /// Zoom anchor used when the caller gives none: the middle column and
    /// the pixel row `height` below the origin
    pub fn default_anchor(&self) -> Option<(i32, i32)> {
        self.container.map(|(w, h)| {
            let (x, y) = self.origin;
            (x + i32::from(w) / 2, y + i32::from(h))
        })
    }
}
