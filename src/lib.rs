//! edgecam — real-time Sobel edge filter for camera frames
//!
//! Filters semi-planar 4:2:0 frames (NV21/NV12) one at a time, either
//! passing them through or replacing interior luma with a binary edge mask.
//!
//! # Features
//!
//! - **Filter**: validated, stateless per-frame transform with an optional
//!   row-parallel scan
//! - **Processing**: packing camera Y/U/V planes into NV21/NV12, edge stats
//! - **Pipeline**: non-blocking frame worker with runtime mode switching
//!
//! # Example
//!
//! ```rust
//! use edgecam::{FrameFilter, Mode};
//!
//! fn main() -> edgecam::Result<()> {
//!     let (width, height) = (640u32, 480u32);
//!     let input = vec![0u8; (width * height * 3 / 2) as usize];
//!     let mut output = vec![0u8; input.len()];
//!
//!     FrameFilter::new().process(&input, width, height, &mut output, Mode::EdgeDetect)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod processing;
pub mod types;

// Re-exports for convenience
pub use config::FilterConfig;
pub use error::{Error, Result};
pub use filter::{process, FrameFilter, Mode};
pub use pipeline::FramePipeline;
pub use processing::{pack_semi_planar, CameraPlanes, EdgeStats};
pub use types::{Frame, FrameFormat, FrameLayout, Resolution, Stats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
