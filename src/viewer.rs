//! Ratatui widget that hosts an [`ImageView`]
//!
//! Handles the first-show fit, container resizes, mouse drag panning and
//! scroll-wheel zoom, and paints rendered cells into the frame buffer.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use image::Rgb;
use log::debug;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::{Clear, Widget},
};

use crate::raster::RasterImage;
use crate::view::{ImageView, ZOOM_RATE};

/// Smallest zoom level at which an image of `image_size` fits inside a
/// container of `container` cells
pub fn fit_zoom_level(image_size: (u32, u32), container: (u16, u16)) -> i32 {
    let (w, h) = (container.0.max(1), container.1.max(1));
    let (img_w, img_h) = (image_size.0.max(1), image_size.1.max(1));

    let zoom_w = (f64::from(w) / f64::from(img_w)).ln() / ZOOM_RATE.ln();
    let zoom_h = (f64::from(h) * 2.0 / f64::from(img_h)).ln() / ZOOM_RATE.ln();
    zoom_w.max(zoom_h).ceil().max(0.0) as i32
}

pub struct ImageViewer {
    view: ImageView,
    /// Area of the last render; `None` until first shown
    area: Option<Rect>,
    /// Last pointer position while the left button is held
    drag_from: Option<(u16, u16)>,
    maintain_center_on_resize: bool,
}

impl ImageViewer {
    pub fn new(image: RasterImage) -> Self {
        Self {
            view: ImageView::new(image),
            area: None,
            drag_from: None,
            maintain_center_on_resize: true,
        }
    }

    pub fn with_maintain_center(mut self, maintain_center: bool) -> Self {
        self.maintain_center_on_resize = maintain_center;
        self
    }

    pub fn view(&self) -> &ImageView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ImageView {
        &mut self.view
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    /// Track the widget area: fit on first show, resize afterwards
    pub fn sync_area(&mut self, area: Rect) {
        match self.area {
            None => self.show(area),
            Some(previous) if (previous.width, previous.height) != (area.width, area.height) => {
                self.view.set_container_size(
                    area.width,
                    area.height,
                    self.maintain_center_on_resize,
                );
            }
            Some(_) => {}
        }
        self.area = Some(area);
    }

    /// Zoom so the whole image fits, then center it
    fn show(&mut self, area: Rect) {
        let (w, h) = (area.width, area.height);
        let zoom = fit_zoom_level(self.view.size(), (w, h));

        self.view.set_container_size(w, h, false);
        self.view.set_zoom(zoom, None);

        let (img_w, img_h) = self.view.zoomed_size();
        let origin_x = -((f64::from(w) - f64::from(img_w)) / 2.0).round_ties_even();
        let origin_y = -(f64::from(h) - f64::from(img_h) / 2.0).round_ties_even();
        let origin = self.view.set_origin((origin_x as i32, origin_y as i32));

        debug!(
            "Showing {:?} in {w}x{h}: zoom {zoom}, zoomed {img_w}x{img_h}, origin {origin:?}",
            self.view.size()
        );
    }

    /// Apply a mouse event; returns true when the view changed
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        let Some(area) = self.area else {
            return false;
        };
        let inside = area.contains((mouse.column, mouse.row).into());

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => {
                self.drag_from = Some((mouse.column, mouse.row));
                false
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_from = None;
                false
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some((last_col, last_row)) = self.drag_from else {
                    return false;
                };
                let dx = i32::from(mouse.column) - i32::from(last_col);
                let dy = i32::from(mouse.row) - i32::from(last_row);
                self.drag_from = Some((mouse.column, mouse.row));
                if dx == 0 && dy == 0 {
                    return false;
                }
                self.view.move_by(dx, dy * 2);
                true
            }
            MouseEventKind::ScrollDown if inside => {
                let anchor = self.pointer_to_xy(area, mouse);
                self.view.zoom(1, Some(anchor));
                true
            }
            MouseEventKind::ScrollUp if inside => {
                let anchor = self.pointer_to_xy(area, mouse);
                self.view.zoom(-1, Some(anchor));
                true
            }
            _ => false,
        }
    }

    fn pointer_to_xy(&self, area: Rect, mouse: MouseEvent) -> (i32, i32) {
        self.view.rowcol_to_xy(
            i32::from(mouse.row),
            i32::from(mouse.column),
            (i32::from(area.y), i32::from(area.x)),
        )
    }
}

fn to_color(Rgb([r, g, b]): Rgb<u8>) -> Color {
    Color::Rgb(r, g, b)
}

impl Widget for &mut ImageViewer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.sync_area(area);
        Clear.render(area, buf);

        let lines = self.view.render();
        for (row, line) in lines.iter().enumerate().take(usize::from(area.height)) {
            let y = area.y + row as u16;
            for (i, cell) in line.cells.iter().enumerate() {
                let col = line.padding + i;
                if col >= usize::from(area.width) {
                    break;
                }
                let Some(target) = buf.cell_mut((area.x + col as u16, y)) else {
                    continue;
                };
                target.set_symbol(cell.glyph.symbol());
                target.set_fg(cell.fg.map_or(Color::Reset, to_color));
                target.set_bg(cell.bg.map_or(Color::Reset, to_color));
            }
        }
    }
}
