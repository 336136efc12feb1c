//! Frame filter
//!
//! Transforms one semi-planar frame into a caller-provided output buffer:
//! - `PassThrough` copies the frame unchanged
//! - `EdgeDetect` replaces interior luma with a binary Sobel edge mask and
//!   keeps chroma and border luma as captured
//!
//! All dimensions and buffer sizes are validated before the output is touched.

pub mod sobel;
mod view;

pub use sobel::{BACKGROUND, EDGE, EDGE_THRESHOLD};
pub use view::{verify, FrameView, FrameViewMut};

use crate::config::FilterConfig;
use crate::error::{Error, Result};
use crate::processing::EdgeStats;
use crate::types::Frame;
use serde::{Deserialize, Serialize};

/// Filter mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Copy input to output unchanged
    #[serde(alias = "passthrough", alias = "raw")]
    PassThrough,
    /// Binary edge mask on luma, chroma untouched
    #[default]
    #[serde(alias = "edge", alias = "edges")]
    EdgeDetect,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::PassThrough => "passthrough",
            Mode::EdgeDetect => "edge",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::PassThrough => 0,
            Mode::EdgeDetect => 1,
        }
    }
}

impl TryFrom<i64> for Mode {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Mode::PassThrough),
            1 => Ok(Mode::EdgeDetect),
            other => Err(Error::UnsupportedMode(other)),
        }
    }
}

impl TryFrom<i32> for Mode {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Mode::try_from(value as i64)
    }
}

impl std::str::FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "passthrough" | "pass-through" | "raw" => Ok(Mode::PassThrough),
            "edge" | "edges" | "edge-detect" => Ok(Mode::EdgeDetect),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

/// Stateless frame filter
///
/// Holds only scan settings; no frame data survives a call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameFilter {
    parallel: bool,
}

impl FrameFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self {
            parallel: config.parallel,
        }
    }

    /// Shard interior rows across the rayon pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Filter `input` into `output`.
    ///
    /// Both buffers must be exactly `width * height * 3 / 2` bytes. On error
    /// `output` is left as it was.
    pub fn process(
        &self,
        input: &[u8],
        width: u32,
        height: u32,
        output: &mut [u8],
        mode: Mode,
    ) -> Result<()> {
        let (src, mut dst) = verify(input, output, width, height).inspect_err(|e| {
            tracing::warn!("Rejected {}x{} frame: {}", width, height, e);
        })?;

        dst.copy_from(&src)?;
        if mode == Mode::EdgeDetect {
            let layout = src.layout();
            if self.parallel {
                sobel::detect_edges_par(src.luma(), dst.luma_mut(), layout.width, layout.height);
            } else {
                sobel::detect_edges(src.luma(), dst.luma_mut(), layout.width, layout.height);
            }
        }

        tracing::trace!("Frame processed: {}x{} mode={}", width, height, mode);
        Ok(())
    }

    /// Same output as [`FrameFilter::process`], plus edge statistics.
    ///
    /// Stats are empty in `PassThrough` mode.
    pub fn process_with_stats(
        &self,
        input: &[u8],
        width: u32,
        height: u32,
        output: &mut [u8],
        mode: Mode,
    ) -> Result<EdgeStats> {
        let (src, mut dst) = verify(input, output, width, height).inspect_err(|e| {
            tracing::warn!("Rejected {}x{} frame: {}", width, height, e);
        })?;

        dst.copy_from(&src)?;
        let stats = match mode {
            Mode::PassThrough => EdgeStats::default(),
            Mode::EdgeDetect => {
                let layout = src.layout();
                let stats = if self.parallel {
                    sobel::detect_edges_with_stats_par(
                        src.luma(),
                        dst.luma_mut(),
                        layout.width,
                        layout.height,
                    )
                } else {
                    sobel::detect_edges_with_stats(
                        src.luma(),
                        dst.luma_mut(),
                        layout.width,
                        layout.height,
                    )
                };
                debug_assert_eq!(stats.pixels, layout.interior_pixels() as u64);
                stats
            }
        };

        tracing::debug!(
            "Frame processed: {}x{} mode={} edges={}/{} ({:.2}%) magnitude min={} max={} avg={:.2}",
            width,
            height,
            mode,
            stats.edges,
            stats.pixels,
            stats.edge_ratio() * 100.0,
            stats.min_magnitude,
            stats.max_magnitude,
            stats.mean_magnitude()
        );
        Ok(stats)
    }

    /// Filter between two owned frames of identical shape.
    pub fn process_frame(&self, input: &Frame, output: &mut Frame, mode: Mode) -> Result<()> {
        check_same_shape(input, output)?;
        self.process(&input.data, input.width, input.height, &mut output.data, mode)
    }

    /// [`FrameFilter::process_frame`] with edge statistics.
    pub fn process_frame_with_stats(
        &self,
        input: &Frame,
        output: &mut Frame,
        mode: Mode,
    ) -> Result<EdgeStats> {
        check_same_shape(input, output)?;
        self.process_with_stats(&input.data, input.width, input.height, &mut output.data, mode)
    }

    /// Entry point for callers passing untyped dimensions and mode (e.g. a
    /// native camera bridge). Negative dimensions are contract violations and
    /// unknown modes are rejected, both before `output` is touched.
    pub fn process_raw(
        &self,
        input: &[u8],
        width: i32,
        height: i32,
        output: &mut [u8],
        mode: i32,
    ) -> Result<()> {
        let mode = Mode::try_from(mode)?;
        let width = u32::try_from(width)
            .map_err(|_| Error::contract(format!("negative width: {}", width)))?;
        let height = u32::try_from(height)
            .map_err(|_| Error::contract(format!("negative height: {}", height)))?;
        self.process(input, width, height, output, mode)
    }
}

fn check_same_shape(input: &Frame, output: &Frame) -> Result<()> {
    if input.resolution() != output.resolution() {
        return Err(Error::contract(format!(
            "resolution mismatch: input {} output {}",
            input.resolution(),
            output.resolution()
        )));
    }
    if input.format != output.format {
        return Err(Error::contract(format!(
            "format mismatch: input {} output {}",
            input.format, output.format
        )));
    }
    Ok(())
}

/// Filter with default settings (sequential scan).
pub fn process(input: &[u8], width: u32, height: u32, output: &mut [u8], mode: Mode) -> Result<()> {
    FrameFilter::default().process(input, width, height, output, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrameFormat;

    fn frame_bytes(luma: &[u8], chroma_fill: u8) -> Vec<u8> {
        let mut data = luma.to_vec();
        data.extend(std::iter::repeat(chroma_fill).take(luma.len() / 2));
        data
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("edge".parse::<Mode>().unwrap(), Mode::EdgeDetect);
        assert_eq!("RAW".parse::<Mode>().unwrap(), Mode::PassThrough);
        assert!("sharpen".parse::<Mode>().is_err());
    }

    #[test]
    fn test_mode_wire_values() {
        assert_eq!(Mode::try_from(0i32).unwrap(), Mode::PassThrough);
        assert_eq!(Mode::try_from(1i32).unwrap(), Mode::EdgeDetect);
        assert!(matches!(Mode::try_from(2i32), Err(Error::UnsupportedMode(2))));
        assert!(matches!(Mode::try_from(-1i64), Err(Error::UnsupportedMode(-1))));
        assert_eq!(u8::from(Mode::EdgeDetect), 1);
    }

    #[test]
    fn test_passthrough_copies() {
        let input: Vec<u8> = (0..24u8).map(|v| v.wrapping_mul(37)).collect();
        let mut output = vec![0u8; 24];
        process(&input, 4, 4, &mut output, Mode::PassThrough).unwrap();
        assert_eq!(input, output);
    }

    #[test]
    fn test_edge_detect_keeps_chroma_and_border() {
        let luma: Vec<u8> = (0..36u8).map(|v| v.wrapping_mul(53)).collect();
        let input = frame_bytes(&luma, 128);
        let mut output = vec![0u8; input.len()];
        process(&input, 6, 6, &mut output, Mode::EdgeDetect).unwrap();

        assert_eq!(&output[36..], &input[36..]);
        for y in 0..6 {
            for x in 0..6 {
                let idx = y * 6 + x;
                if x == 0 || y == 0 || x == 5 || y == 5 {
                    assert_eq!(output[idx], input[idx]);
                } else {
                    assert!(output[idx] == EDGE || output[idx] == BACKGROUND);
                }
            }
        }
    }

    #[test]
    fn test_size_mismatch_leaves_output() {
        let input = vec![7u8; 24];
        let mut output = vec![3u8; 20];
        let err = process(&input, 4, 4, &mut output, Mode::EdgeDetect).unwrap_err();
        assert!(err.is_contract_violation());
        assert!(output.iter().all(|&v| v == 3));
    }

    #[test]
    fn test_process_raw_rejects_before_write() {
        let filter = FrameFilter::new();
        let input = vec![7u8; 24];
        let mut output = vec![3u8; 24];

        let err = filter.process_raw(&input, 4, 4, &mut output, 5).unwrap_err();
        assert!(matches!(err, Error::UnsupportedMode(5)));
        let err = filter.process_raw(&input, -4, 4, &mut output, 1).unwrap_err();
        assert!(err.is_contract_violation());
        let err = filter.process_raw(&input, 0, 4, &mut output, 1).unwrap_err();
        assert!(err.is_contract_violation());
        assert!(output.iter().all(|&v| v == 3));

        filter.process_raw(&input, 4, 4, &mut output, 0).unwrap();
        assert_eq!(input, output);
    }

    #[test]
    fn test_process_frame_shape_checks() {
        let filter = FrameFilter::new();
        let input = Frame::new(4, 4, FrameFormat::Nv21).unwrap();
        let mut wrong_res = Frame::new(4, 6, FrameFormat::Nv21).unwrap();
        let mut wrong_fmt = Frame::new(4, 4, FrameFormat::Nv12).unwrap();
        assert!(filter
            .process_frame(&input, &mut wrong_res, Mode::PassThrough)
            .unwrap_err()
            .is_contract_violation());
        assert!(filter
            .process_frame(&input, &mut wrong_fmt, Mode::PassThrough)
            .unwrap_err()
            .is_contract_violation());
    }

    #[test]
    fn test_stats_match_plain_output() {
        let luma: Vec<u8> = (0..64u32).map(|i| if (i % 8) < 4 { 10 } else { 240 }).collect();
        let input = frame_bytes(&luma, 90);
        let mut plain = vec![0u8; input.len()];
        let mut with_stats = vec![0u8; input.len()];

        let filter = FrameFilter::new();
        filter.process(&input, 8, 8, &mut plain, Mode::EdgeDetect).unwrap();
        let stats = filter
            .process_with_stats(&input, 8, 8, &mut with_stats, Mode::EdgeDetect)
            .unwrap();

        assert_eq!(plain, with_stats);
        assert_eq!(stats.pixels, 36);
        // Columns 3 and 4 straddle the step
        assert_eq!(stats.edges, 12);
        assert_eq!(stats.min_magnitude, 0);
        assert_eq!(stats.max_magnitude, 920);

        let passthrough = filter
            .process_with_stats(&input, 8, 8, &mut with_stats, Mode::PassThrough)
            .unwrap();
        assert_eq!(passthrough, EdgeStats::default());
        assert_eq!(with_stats, input);
    }
}
