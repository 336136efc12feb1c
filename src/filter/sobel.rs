//! Sobel edge mask over a luma plane
//!
//! - Convolves the 3×3 Sobel pair with integer arithmetic.
//! - Writes `EDGE` where `floor(sqrt(gx^2 + gy^2)) > EDGE_THRESHOLD`,
//!   `BACKGROUND` elsewhere.
//! - Only interior pixels are written; the outer row/column of the
//!   destination is left untouched.
//!
//! Every read comes from the source plane, so rows are independent and can
//! be scanned in any order or in parallel.

use crate::processing::EdgeStats;
use rayon::prelude::*;

type Kernel3 = [[i32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Magnitudes strictly above this value are edges
pub const EDGE_THRESHOLD: u32 = 128;
/// Luma written for edge pixels
pub const EDGE: u8 = 255;
/// Luma written for non-edge interior pixels
pub const BACKGROUND: u8 = 0;

// floor(sqrt(s)) > 128  <=>  s >= 129^2
const EDGE_THRESHOLD_SQ: u32 = (EDGE_THRESHOLD + 1) * (EDGE_THRESHOLD + 1);

/// Horizontal and vertical gradient at column `x` of `row`
#[inline]
pub fn gradient(above: &[u8], row: &[u8], below: &[u8], x: usize) -> (i32, i32) {
    let rows = [above, row, below];
    let mut gx = 0i32;
    let mut gy = 0i32;
    for (ky, r) in rows.iter().enumerate() {
        let px = [r[x - 1] as i32, r[x] as i32, r[x + 1] as i32];
        let kx_row = &SOBEL_KERNEL_X[ky];
        let ky_row = &SOBEL_KERNEL_Y[ky];
        gx += px[0] * kx_row[0] + px[1] * kx_row[1] + px[2] * kx_row[2];
        gy += px[0] * ky_row[0] + px[1] * ky_row[1] + px[2] * ky_row[2];
    }
    (gx, gy)
}

/// Squared gradient magnitude; at most 2 * 1020^2, well inside u32
#[inline]
pub fn magnitude_sq(gx: i32, gy: i32) -> u32 {
    (gx * gx + gy * gy) as u32
}

/// `floor(sqrt(gx^2 + gy^2))`
#[inline]
pub fn magnitude(gx: i32, gy: i32) -> u32 {
    // f64 sqrt is correctly rounded, exact floor for sums this small
    (magnitude_sq(gx, gy) as f64).sqrt() as u32
}

#[inline]
fn classify(mag_sq: u32) -> u8 {
    if mag_sq >= EDGE_THRESHOLD_SQ {
        EDGE
    } else {
        BACKGROUND
    }
}

fn edge_row(above: &[u8], row: &[u8], below: &[u8], out: &mut [u8]) {
    let width = row.len();
    for x in 1..width - 1 {
        let (gx, gy) = gradient(above, row, below, x);
        out[x] = classify(magnitude_sq(gx, gy));
    }
}

fn edge_row_with_stats(above: &[u8], row: &[u8], below: &[u8], out: &mut [u8]) -> EdgeStats {
    let width = row.len();
    let mut stats = EdgeStats::default();
    for x in 1..width - 1 {
        let (gx, gy) = gradient(above, row, below, x);
        let value = classify(magnitude_sq(gx, gy));
        stats.record(magnitude(gx, gy), value == EDGE);
        out[x] = value;
    }
    stats
}

/// Source rows `y - 1`, `y` and `y + 1`
#[inline]
fn neighborhood(src: &[u8], width: usize, y: usize) -> (&[u8], &[u8], &[u8]) {
    (
        &src[(y - 1) * width..y * width],
        &src[y * width..(y + 1) * width],
        &src[(y + 1) * width..(y + 2) * width],
    )
}

fn has_interior(width: usize, height: usize) -> bool {
    width >= 3 && height >= 3
}

/// Write the edge mask for all interior pixels of `dst` from `src`.
///
/// Both planes must hold exactly `width * height` samples.
pub fn detect_edges(src: &[u8], dst: &mut [u8], width: usize, height: usize) {
    debug_assert_eq!(src.len(), width * height);
    debug_assert_eq!(dst.len(), width * height);
    if !has_interior(width, height) {
        return;
    }

    for (y, out) in dst
        .chunks_exact_mut(width)
        .enumerate()
        .skip(1)
        .take(height - 2)
    {
        let (above, row, below) = neighborhood(src, width, y);
        edge_row(above, row, below, out);
    }
}

/// Row-parallel variant of [`detect_edges`]; identical output.
pub fn detect_edges_par(src: &[u8], dst: &mut [u8], width: usize, height: usize) {
    debug_assert_eq!(src.len(), width * height);
    debug_assert_eq!(dst.len(), width * height);
    if !has_interior(width, height) {
        return;
    }

    dst.par_chunks_exact_mut(width)
        .enumerate()
        .skip(1)
        .take(height - 2)
        .for_each(|(y, out)| {
            let (above, row, below) = neighborhood(src, width, y);
            edge_row(above, row, below, out);
        });
}

/// [`detect_edges`] that also collects magnitude statistics.
pub fn detect_edges_with_stats(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
) -> EdgeStats {
    if !has_interior(width, height) {
        return EdgeStats::default();
    }

    dst.chunks_exact_mut(width)
        .enumerate()
        .skip(1)
        .take(height - 2)
        .map(|(y, out)| {
            let (above, row, below) = neighborhood(src, width, y);
            edge_row_with_stats(above, row, below, out)
        })
        .fold(EdgeStats::default(), EdgeStats::merge)
}

/// Row-parallel variant of [`detect_edges_with_stats`].
pub fn detect_edges_with_stats_par(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
) -> EdgeStats {
    if !has_interior(width, height) {
        return EdgeStats::default();
    }

    dst.par_chunks_exact_mut(width)
        .enumerate()
        .skip(1)
        .take(height - 2)
        .map(|(y, out)| {
            let (above, row, below) = neighborhood(src, width, y);
            edge_row_with_stats(above, row, below, out)
        })
        .reduce(EdgeStats::default, EdgeStats::merge)
}
