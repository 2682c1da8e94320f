//! Integer line rasterization.

use crate::CellIndex;

/// Returns every cell under the straight line from `a` to `b`, endpoints
/// included, using Bresenham's algorithm. A degenerate segment yields the
/// single cell itself.
#[must_use]
pub fn line_cells(a: CellIndex, b: CellIndex) -> Vec<CellIndex> {
    let (mut r, mut c) = a;
    let (r1, c1) = b;

    let dr = (r1 - r).abs();
    let dc = (c1 - c).abs();
    let step_r = if r < r1 { 1 } else { -1 };
    let step_c = if c < c1 { 1 } else { -1 };
    let mut err = dr - dc;

    let mut cells = Vec::with_capacity((dr.max(dc) + 1) as usize);
    loop {
        cells.push((r, c));
        if r == r1 && c == c1 {
            break;
        }
        let doubled = 2 * err;
        if doubled > -dc {
            err -= dc;
            r += step_r;
        }
        if doubled < dr {
            err += dr;
            c += step_c;
        }
    }
    cells
}
