//! Character grid <-> image space conversion
//!
//! `offset` is `(rows, cols)` between the top-left of the drawing surface
//! and the top-left of the widget.

/// Image position of the cell at `(row, col)`; `y` is the cell's upper pixel
pub fn rowcol_to_xy(origin: (i32, i32), row: i32, col: i32, offset: (i32, i32)) -> (i32, i32) {
    let (offset_row, offset_col) = offset;
    let (origin_x, origin_y) = origin;
    (
        origin_x.saturating_add(col).saturating_sub(offset_col),
        origin_y.saturating_add(row.saturating_sub(offset_row).saturating_mul(2)),
    )
}

/// Cell `(row, col)` containing the image position `(x, y)`
pub fn xy_to_rowcol(origin: (i32, i32), x: i32, y: i32, offset: (i32, i32)) -> (i32, i32) {
    let (offset_row, offset_col) = offset;
    let (origin_x, origin_y) = origin;
    (
        y.saturating_sub(origin_y)
            .div_euclid(2)
            .saturating_add(offset_row),
        x.saturating_sub(origin_x).saturating_add(offset_col),
    )
}
