//! Verified frame views
//!
//! A view only exists once its buffer length has been checked against the
//! frame layout, so the kernel can slice planes without re-checking sizes.

use crate::error::{Error, Result};
use crate::types::FrameLayout;

/// Read-only view over a frame buffer of known layout
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    layout: FrameLayout,
    data: &'a [u8],
}

impl<'a> FrameView<'a> {
    pub fn new(data: &'a [u8], layout: FrameLayout) -> Result<Self> {
        check_len("input", data.len(), layout)?;
        Ok(Self { layout, data })
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    pub fn luma(&self) -> &'a [u8] {
        &self.data[..self.layout.luma_len()]
    }

    pub fn chroma(&self) -> &'a [u8] {
        &self.data[self.layout.luma_len()..]
    }
}

/// Exclusive view over an output frame buffer of known layout
#[derive(Debug)]
pub struct FrameViewMut<'a> {
    layout: FrameLayout,
    data: &'a mut [u8],
}

impl<'a> FrameViewMut<'a> {
    pub fn new(data: &'a mut [u8], layout: FrameLayout) -> Result<Self> {
        check_len("output", data.len(), layout)?;
        Ok(Self { layout, data })
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    pub fn as_bytes(&self) -> &[u8] {
        &*self.data
    }

    pub fn luma_mut(&mut self) -> &mut [u8] {
        let luma_len = self.layout.luma_len();
        &mut self.data[..luma_len]
    }

    /// Overwrite the whole buffer with `src`
    pub fn copy_from(&mut self, src: &FrameView<'_>) -> Result<()> {
        if src.layout() != self.layout {
            return Err(Error::contract(format!(
                "layout mismatch: source {} destination {}",
                src.layout().resolution(),
                self.layout.resolution()
            )));
        }
        self.data.copy_from_slice(src.as_bytes());
        Ok(())
    }
}

/// Validate dimensions and both buffers before anything is written
pub fn verify<'i, 'o>(
    input: &'i [u8],
    output: &'o mut [u8],
    width: u32,
    height: u32,
) -> Result<(FrameView<'i>, FrameViewMut<'o>)> {
    let layout = FrameLayout::new(width, height)?;
    let src = FrameView::new(input, layout)?;
    let dst = FrameViewMut::new(output, layout)?;
    Ok((src, dst))
}

fn check_len(which: &str, len: usize, layout: FrameLayout) -> Result<()> {
    if len != layout.total_len() {
        return Err(Error::contract(format!(
            "{} buffer is {} bytes, {}x{} frame needs {}",
            which,
            len,
            layout.width,
            layout.height,
            layout.total_len()
        )));
    }
    Ok(())
}
