//! Packing camera planes into a semi-planar frame
//!
//! Cameras commonly hand out three plane buffers (Y, U, V) where the chroma
//! planes either are fully planar (pixel stride 1) or are two overlapping
//! views into one interleaved buffer (pixel stride 2). Both are packed into a
//! single NV21 or NV12 buffer here. Rows are assumed to be tightly packed.

use crate::error::{Error, Result};
use crate::types::{Frame, FrameFormat, FrameLayout};

/// Borrowed Y/U/V planes as delivered by a camera
#[derive(Debug, Clone, Copy)]
pub struct CameraPlanes<'a> {
    pub y: &'a [u8],
    pub u: &'a [u8],
    pub v: &'a [u8],
    /// Distance in bytes between consecutive samples of one chroma plane
    pub pixel_stride: usize,
}

impl<'a> CameraPlanes<'a> {
    pub fn planar(y: &'a [u8], u: &'a [u8], v: &'a [u8]) -> Self {
        Self {
            y,
            u,
            v,
            pixel_stride: 1,
        }
    }

    pub fn interleaved(y: &'a [u8], u: &'a [u8], v: &'a [u8]) -> Self {
        Self {
            y,
            u,
            v,
            pixel_stride: 2,
        }
    }
}

/// Pack `planes` into a `width x height` frame of `format`.
pub fn pack_semi_planar(
    planes: &CameraPlanes<'_>,
    width: u32,
    height: u32,
    format: FrameFormat,
) -> Result<Frame> {
    let layout = FrameLayout::new(width, height)?;
    let stride = planes.pixel_stride;
    if stride != 1 && stride != 2 {
        return Err(Error::contract(format!(
            "unsupported chroma pixel stride: {}",
            stride
        )));
    }

    let luma_len = layout.luma_len();
    if planes.y.len() < luma_len {
        return Err(Error::contract(format!(
            "Y plane has {} bytes, {}x{} needs {}",
            planes.y.len(),
            width,
            height,
            luma_len
        )));
    }

    let samples = (layout.width / 2) * (layout.height / 2);
    // The last sample of a strided view needs no trailing padding
    let needed = if samples == 0 {
        0
    } else {
        (samples - 1) * stride + 1
    };
    for (name, plane) in [("U", planes.u), ("V", planes.v)] {
        if plane.len() < needed {
            return Err(Error::contract(format!(
                "{} plane has {} bytes, needs {}",
                name,
                plane.len(),
                needed
            )));
        }
    }

    let mut frame = Frame::new(width, height, format)?;
    frame.data[..luma_len].copy_from_slice(&planes.y[..luma_len]);

    let (u_off, v_off) = format.chroma_order();
    let chroma = &mut frame.data[luma_len..];
    for (i, pair) in chroma.chunks_exact_mut(2).take(samples).enumerate() {
        pair[u_off] = planes.u[i * stride];
        pair[v_off] = planes.v[i * stride];
    }

    tracing::trace!(
        "Packed {}x{} {} frame (pixel stride {})",
        width,
        height,
        format,
        stride
    );
    Ok(frame)
}
