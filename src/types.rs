//! Common types used throughout edgecam

use crate::error::{Error, Result};
use crate::processing::EdgeStats;
use serde::{Deserialize, Serialize};

/// Video resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    // Common camera preview resolutions
    pub const VGA: Self = Self::new(640, 480);
    pub const HD_720P: Self = Self::new(1280, 720);
    pub const FHD_1080P: Self = Self::new(1920, 1080);

    /// Calculate total pixels
    pub fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Does this resolution fit inside `limit` on both axes?
    pub fn fits_within(&self, limit: Resolution) -> bool {
        self.width <= limit.width && self.height <= limit.height
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::HD_720P
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s
            .split_once('x')
            .ok_or_else(|| Error::Config(format!("Invalid resolution: {}", s)))?;
        let width = w
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Invalid width in resolution: {}", s)))?;
        let height = h
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Invalid height in resolution: {}", s)))?;
        Ok(Self::new(width, height))
    }
}

/// Semi-planar 4:2:0 pixel format
///
/// Both variants store a full-resolution Y plane followed by one interleaved
/// chroma plane at quarter resolution; they differ only in chroma byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    /// NV21 - Android camera default (Y plane + interleaved VU)
    #[default]
    Nv21,
    /// NV12 - Y plane + interleaved UV
    Nv12,
}

impl FrameFormat {
    /// Byte offsets of (U, V) inside one interleaved chroma pair
    pub fn chroma_order(&self) -> (usize, usize) {
        match self {
            FrameFormat::Nv21 => (1, 0),
            FrameFormat::Nv12 => (0, 1),
        }
    }
}

impl std::fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameFormat::Nv21 => write!(f, "NV21"),
            FrameFormat::Nv12 => write!(f, "NV12"),
        }
    }
}

/// Byte layout of a semi-planar frame with the given dimensions
///
/// Luma occupies `width * height` bytes, chroma the following
/// `width * height / 2` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub width: usize,
    pub height: usize,
    luma_len: usize,
}

impl FrameLayout {
    /// Validate dimensions and compute plane sizes
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::contract(format!(
                "frame dimensions must be positive, got {}x{}",
                width, height
            )));
        }

        let width = width as usize;
        let height = height as usize;
        // total_len = luma + luma / 2 must also fit
        let luma_len = width
            .checked_mul(height)
            .filter(|l| l.checked_add(l / 2).is_some())
            .ok_or_else(|| {
                Error::contract(format!("frame dimensions overflow: {}x{}", width, height))
            })?;

        Ok(Self {
            width,
            height,
            luma_len,
        })
    }

    /// Size of the Y plane in bytes
    pub fn luma_len(&self) -> usize {
        self.luma_len
    }

    /// Size of the interleaved chroma region in bytes
    pub fn chroma_len(&self) -> usize {
        self.luma_len / 2
    }

    /// Total frame size in bytes
    pub fn total_len(&self) -> usize {
        self.luma_len + self.chroma_len()
    }

    /// Number of pixels with a full 3x3 neighborhood
    pub fn interior_pixels(&self) -> usize {
        self.width.saturating_sub(2) * self.height.saturating_sub(2)
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width as u32, self.height as u32)
    }
}

/// A captured video frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw frame data (Y plane followed by interleaved chroma)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Chroma byte order
    pub format: FrameFormat,
    /// Presentation timestamp in microseconds
    pub pts: i64,
}

impl Frame {
    /// Create a new frame with a zeroed, correctly sized buffer
    pub fn new(width: u32, height: u32, format: FrameFormat) -> Result<Self> {
        let layout = FrameLayout::new(width, height)?;
        Ok(Self {
            data: vec![0u8; layout.total_len()],
            width,
            height,
            format,
            pts: 0,
        })
    }

    /// Create a frame from existing data, checking its size
    pub fn from_data(data: Vec<u8>, width: u32, height: u32, format: FrameFormat) -> Result<Self> {
        let layout = FrameLayout::new(width, height)?;
        if data.len() != layout.total_len() {
            return Err(Error::contract(format!(
                "{}x{} frame needs {} bytes, got {}",
                width,
                height,
                layout.total_len(),
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            format,
            pts: 0,
        })
    }

    pub fn with_pts(mut self, pts: i64) -> Self {
        self.pts = pts;
        self
    }

    /// Get resolution
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    /// Layout derived from the frame dimensions
    pub fn layout(&self) -> Result<FrameLayout> {
        FrameLayout::new(self.width, self.height)
    }

    /// Layout of a frame whose buffer matches its dimensions
    pub fn checked_layout(&self) -> Result<FrameLayout> {
        let layout = self.layout()?;
        if self.data.len() != layout.total_len() {
            return Err(Error::contract(format!(
                "{} frame needs {} bytes, buffer has {}",
                layout.resolution(),
                layout.total_len(),
                self.data.len()
            )));
        }
        Ok(layout)
    }

    /// Y plane, clamped to the buffer
    pub fn luma(&self) -> &[u8] {
        &self.data[..self.luma_end()]
    }

    /// Chroma region, clamped to the buffer
    pub fn chroma(&self) -> &[u8] {
        &self.data[self.luma_end()..]
    }

    fn luma_end(&self) -> usize {
        self.layout()
            .map_or(0, |layout| layout.luma_len())
            .min(self.data.len())
    }

    /// Calculate frame size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Statistics for monitoring a running pipeline
#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// Frames handed to the pipeline
    pub frames_submitted: u64,
    /// Frames filtered and forwarded
    pub frames_processed: u64,
    /// Frames dropped because the queue was full
    pub frames_dropped: u64,
    /// Frames rejected by validation
    pub frames_failed: u64,
    /// Filter throughput since the first processed frame
    pub processing_fps: f64,
    /// Average time spent in the filter per frame in ms
    pub avg_filter_latency_ms: f64,
    /// Edge statistics of the most recent edge-detected frame
    pub last_edges: Option<EdgeStats>,
}
