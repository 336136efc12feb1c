//! Frame processing helpers
//!
//! Provides the pieces around the filter kernel:
//! - Packing camera Y/U/V planes into NV21/NV12 frames
//! - Per-frame edge statistics

mod pack;
mod stats;

pub use pack::{pack_semi_planar, CameraPlanes};
pub use stats::EdgeStats;
