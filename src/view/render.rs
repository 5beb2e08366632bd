//! Viewport -> styled cell lines

use super::types::StyledCell;
use super::zoom::ZoomEntry;

/// One output row: blank padding cells followed by image cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedLine {
    /// Blank cells before the first image column
    pub padding: usize,
    pub cells: Vec<StyledCell>,
}

impl RenderedLine {
    pub fn is_empty(&self) -> bool {
        self.padding == 0 && self.cells.is_empty()
    }
}

/// Render the window at `origin` of size `container` over `entry`.
///
/// Rows entirely above the image come out as empty lines. Output stops at
/// the last image row, so a container taller than the image yields fewer
/// lines than its height.
pub fn render_lines(
    entry: &mut ZoomEntry,
    origin: (i32, i32),
    container: Option<(u16, u16)>,
) -> Vec<RenderedLine> {
    let Some((width, height)) = container else {
        return Vec::new();
    };
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let (img_w, img_h) = entry.size();
    let (img_w, img_h) = (img_w as i32, img_h as i32);
    let (origin_x, origin_y) = origin;
    let width = i32::from(width);
    let y_end = (origin_y + 2 * i32::from(height)).min(img_h);

    let mut lines = Vec::with_capacity(usize::from(height));
    let mut y = origin_y;
    while y < y_end {
        if y < -1 {
            lines.push(RenderedLine::default());
            y += 2;
            continue;
        }

        let (padding, x_start) = if origin_x < 0 {
            ((-origin_x) as usize, 0)
        } else {
            (0, origin_x)
        };
        let cells = (x_start..(x_start + width).min(img_w))
            .map(|x| entry.cell(x, y))
            .collect();

        lines.push(RenderedLine { padding, cells });
        y += 2;
    }

    lines
}
