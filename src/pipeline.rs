//! Frame pipeline
//!
//! Connects a frame producer (camera thread) → filter worker → consumer.
//! The producer never blocks: when the queue is full the frame is dropped.
//! The mode can be switched at any time and applies to the next frame the
//! worker picks up.

use crate::config::FilterConfig;
use crate::error::{Error, Result};
use crate::filter::{FrameFilter, Mode};
use crate::types::{Frame, Stats};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Background filter worker fed over a bounded queue
pub struct FramePipeline {
    config: FilterConfig,
    mode: Arc<AtomicU8>,
    input: Option<Sender<Frame>>,
    output: Receiver<Frame>,
    stats: Arc<Mutex<Stats>>,
    worker: Option<JoinHandle<()>>,
}

impl FramePipeline {
    /// Spawn the worker thread
    pub fn start(config: FilterConfig) -> Result<Self> {
        config.validate()?;

        let (input_tx, input_rx) = bounded::<Frame>(config.queue_capacity);
        let (output_tx, output_rx) = bounded::<Frame>(config.queue_capacity);
        let mode = Arc::new(AtomicU8::new(config.mode.into()));
        let stats = Arc::new(Mutex::new(Stats::default()));

        let worker = Worker {
            filter: FrameFilter::from_config(&config),
            log_stats: config.log_stats,
            mode: Arc::clone(&mode),
            stats: Arc::clone(&stats),
            input: input_rx,
            output: output_tx,
        };

        let handle = std::thread::Builder::new()
            .name("edgecam-filter".into())
            .spawn(move || worker.run())
            .map_err(|e| Error::Pipeline(format!("Failed to spawn worker: {}", e)))?;

        tracing::info!(
            "Pipeline started (mode: {}, parallel: {}, queue: {})",
            config.mode,
            config.parallel,
            config.queue_capacity
        );

        Ok(Self {
            config,
            mode,
            input: Some(input_tx),
            output: output_rx,
            stats,
            worker: Some(handle),
        })
    }

    /// Queue a frame for filtering.
    ///
    /// Returns `Ok(false)` when the frame was dropped because the queue is
    /// full. Frames whose buffer does not match their dimensions, or that are
    /// above `max_resolution`, are rejected before anything is allocated for
    /// them. Every frame handed over while running counts as submitted.
    pub fn submit(&self, frame: Frame) -> Result<bool> {
        let input = self.input.as_ref().ok_or(Error::PipelineStopped)?;

        if let Err(e) = self.admit(&frame) {
            self.stats.lock().frames_submitted += 1;
            record_failure(&self.stats, &frame, &e);
            return Err(e);
        }

        match input.try_send(frame) {
            Ok(()) => {
                self.stats.lock().frames_submitted += 1;
                Ok(true)
            }
            Err(TrySendError::Full(frame)) => {
                let mut stats = self.stats.lock();
                stats.frames_submitted += 1;
                stats.frames_dropped += 1;
                tracing::debug!("Queue full, dropped frame pts={}", frame.pts);
                Ok(false)
            }
            Err(TrySendError::Disconnected(_)) => Err(Error::PipelineStopped),
        }
    }

    fn admit(&self, frame: &Frame) -> Result<()> {
        frame.checked_layout()?;
        if let Some(limit) = self.config.max_resolution {
            if !frame.resolution().fits_within(limit) {
                return Err(Error::contract(format!(
                    "frame {} exceeds limit {}",
                    frame.resolution(),
                    limit
                )));
            }
        }
        Ok(())
    }

    /// Switch the filter mode for subsequent frames
    pub fn set_mode(&self, mode: Mode) {
        let previous = self.mode();
        self.mode.store(mode.into(), Ordering::Relaxed);
        if previous != mode {
            tracing::info!("Processing mode changed: {} -> {}", previous, mode);
        }
    }

    pub fn mode(&self) -> Mode {
        load_mode(&self.mode)
    }

    /// Processed frames, in submission order
    pub fn receiver(&self) -> &Receiver<Frame> {
        &self.output
    }

    /// Wait up to `timeout` for the next processed frame
    pub fn next_frame(&self, timeout: Duration) -> Option<Frame> {
        match self.output.recv_timeout(timeout) {
            Ok(frame) => Some(frame),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Snapshot of the pipeline counters
    pub fn stats(&self) -> Stats {
        self.stats.lock().clone()
    }

    pub fn is_running(&self) -> bool {
        self.input.is_some()
    }

    /// Close the queue and wait for the worker to drain it
    pub fn stop(&mut self) -> Result<()> {
        let Some(input) = self.input.take() else {
            return Ok(());
        };
        drop(input);

        if let Some(handle) = self.worker.take() {
            handle
                .join()
                .map_err(|_| Error::Pipeline("Filter worker panicked".into()))?;
        }

        let stats = self.stats();
        tracing::info!(
            "Pipeline stopped (processed: {}, dropped: {}, failed: {})",
            stats.frames_processed,
            stats.frames_dropped,
            stats.frames_failed
        );
        Ok(())
    }
}

impl Drop for FramePipeline {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::error!("Error stopping pipeline: {}", e);
        }
    }
}

fn load_mode(mode: &AtomicU8) -> Mode {
    match mode.load(Ordering::Relaxed) {
        0 => Mode::PassThrough,
        _ => Mode::EdgeDetect,
    }
}

struct Worker {
    filter: FrameFilter,
    log_stats: bool,
    mode: Arc<AtomicU8>,
    stats: Arc<Mutex<Stats>>,
    input: Receiver<Frame>,
    output: Sender<Frame>,
}

impl Worker {
    fn run(self) {
        let mut first_processed: Option<Instant> = None;
        let mut total_filter_time = Duration::ZERO;

        for frame in self.input.iter() {
            let mode = load_mode(&self.mode);
            let started = Instant::now();

            // Allocate only once the buffer is known to match the dimensions
            let mut out = match frame.checked_layout() {
                Ok(layout) => Frame {
                    data: vec![0; layout.total_len()],
                    width: frame.width,
                    height: frame.height,
                    format: frame.format,
                    pts: frame.pts,
                },
                Err(e) => {
                    self.fail(&frame, &e);
                    continue;
                }
            };

            let edges = if self.log_stats && mode == Mode::EdgeDetect {
                self.filter
                    .process_frame_with_stats(&frame, &mut out, mode)
                    .map(Some)
            } else {
                self.filter.process_frame(&frame, &mut out, mode).map(|_| None)
            };

            let edges = match edges {
                Ok(edges) => edges,
                Err(e) => {
                    self.fail(&frame, &e);
                    continue;
                }
            };

            let elapsed = started.elapsed();
            total_filter_time += elapsed;
            let since_first = *first_processed.get_or_insert(started);

            {
                let mut stats = self.stats.lock();
                stats.frames_processed += 1;
                stats.avg_filter_latency_ms =
                    total_filter_time.as_secs_f64() * 1000.0 / stats.frames_processed as f64;
                let window = since_first.elapsed().as_secs_f64();
                if window > 0.0 {
                    stats.processing_fps = stats.frames_processed as f64 / window;
                }
                if edges.is_some() {
                    stats.last_edges = edges;
                }
            }

            if let Some(edges) = edges {
                tracing::debug!("Frame pts={}: {}", out.pts, edges);
            }

            match self.output.try_send(out) {
                Ok(()) => {}
                Err(TrySendError::Full(out)) => {
                    self.stats.lock().frames_dropped += 1;
                    tracing::debug!("Output queue full, dropped frame pts={}", out.pts);
                }
                Err(TrySendError::Disconnected(_)) => {
                    tracing::debug!("Output receiver gone, worker exiting");
                    break;
                }
            }
        }
    }

    fn fail(&self, frame: &Frame, e: &Error) {
        record_failure(&self.stats, frame, e);
    }
}

fn record_failure(stats: &Mutex<Stats>, frame: &Frame, e: &Error) {
    stats.lock().frames_failed += 1;
    if e.is_recoverable() {
        tracing::warn!("Dropped {} frame pts={}: {}", frame.resolution(), frame.pts, e);
    } else {
        tracing::error!(
            "Failed to process {} frame pts={}: {}",
            frame.resolution(),
            frame.pts,
            e
        );
    }
}
