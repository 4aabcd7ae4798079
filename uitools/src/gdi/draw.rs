//! Rasterization
//!
//! Scan conversion used by the software backend. The routines only compute
//! which pixels a primitive covers; the caller decides what to write there
//! (pen color, brush color, raster operation).
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/drawgdi.cxx`
//! - `windows/core/ntgdi/gre/fillpath.cxx`

use alloc::vec::Vec;

use crate::Point;

// ============================================================================
// Line Drawing
// ============================================================================

/// Bresenham's line algorithm, end point excluded
///
/// GDI lines never paint their last pixel, so consecutive `LineTo` calls
/// share joints without double-painting them.
pub fn line(from: Point, to: Point, mut plot: impl FnMut(i32, i32)) {
    let (x1, y1) = (to.x, to.y);
    let dx = (x1 - from.x).abs();
    let dy = (y1 - from.y).abs();
    let sx: i32 = if from.x < x1 { 1 } else { -1 };
    let sy: i32 = if from.y < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let mut x = from.x;
    let mut y = from.y;

    while x != x1 || y != y1 {
        plot(x, y);

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

// ============================================================================
// Polygon Fill
// ============================================================================

/// Scanline fill; calls `span(x_start, x_end, y)` with `x_end` exclusive
pub fn fill_polygon(points: &[Point], mut span: impl FnMut(i32, i32, i32)) {
    if points.len() < 3 {
        return;
    }

    // Find bounding box
    let min_y = points.iter().map(|p| p.y).min().unwrap_or(0);
    let max_y = points.iter().map(|p| p.y).max().unwrap_or(0);

    let mut intersections: Vec<i32> = Vec::with_capacity(points.len());

    for y in min_y..=max_y {
        intersections.clear();

        for i in 0..points.len() {
            let p1 = points[i];
            let p2 = points[(i + 1) % points.len()];

            // Check if edge crosses this scanline
            if (p1.y <= y && p2.y > y) || (p2.y <= y && p1.y > y) {
                let dy = p2.y - p1.y;
                let x = p1.x + ((y - p1.y) as i64 * (p2.x - p1.x) as i64 / dy as i64) as i32;
                intersections.push(x);
            }
        }

        intersections.sort_unstable();

        // Fill between pairs of intersections
        for pair in intersections.chunks_exact(2) {
            span(pair[0], pair[1] + 1, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_line(from: Point, to: Point) -> Vec<(i32, i32)> {
        let mut pts = Vec::new();
        line(from, to, |x, y| pts.push((x, y)));
        pts
    }

    #[test]
    fn test_line_excludes_end_point() {
        assert_eq!(
            collect_line(Point::new(0, 0), Point::new(3, 0)),
            [(0, 0), (1, 0), (2, 0)]
        );
        assert_eq!(
            collect_line(Point::new(2, 5), Point::new(2, 3)),
            [(2, 5), (2, 4)]
        );
        assert!(collect_line(Point::new(4, 4), Point::new(4, 4)).is_empty());
    }

    #[test]
    fn test_diagonal_line() {
        assert_eq!(
            collect_line(Point::new(0, 3), Point::new(3, 0)),
            [(0, 3), (1, 2), (2, 1)]
        );
    }

    #[test]
    fn test_fill_triangle_spans() {
        let mut rows = Vec::new();
        fill_polygon(
            &[Point::new(0, 0), Point::new(4, 0), Point::new(0, 4)],
            |x0, x1, y| rows.push((y, x0, x1)),
        );
        assert_eq!(rows.first(), Some(&(0, 0, 5)));
        assert!(rows.iter().all(|&(_, x0, x1)| x0 == 0 && x1 >= 1));
        assert!(rows.iter().all(|&(y, _, _)| (0..4).contains(&y)));
    }

    #[test]
    fn test_degenerate_polygon() {
        let mut called = false;
        fill_polygon(&[Point::new(0, 0), Point::new(1, 1)], |_, _, _| called = true);
        assert!(!called);
    }
}
