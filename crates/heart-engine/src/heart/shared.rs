use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use super::config::validate_fps_cap;
use super::HeartError;

/// Point-in-time view of the scheduler's counters.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameStats {
    /// Frames rendered during the last closed one-second window.
    pub fps: u32,
    /// Seconds taken by the last completed iteration.
    pub delta: f32,
    pub fps_cap: u32,
    /// Frames rendered in the current run.
    pub frame_index: u64,
    /// Outer iterations in the current run.
    pub iterations: u64,
    /// Consecutive iterations since the last rendered frame.
    pub idle_iterations: u64,
}

/// State shared between the owning `Heart`, its remotes and the loop thread.
///
/// Every field is an independent scalar; nothing needs to be updated
/// together with anything else.
#[derive(Debug)]
pub(crate) struct Shared {
    running: AtomicBool,
    stop_requested: AtomicBool,
    fps: AtomicU32,
    delta_bits: AtomicU32,
    fps_cap: AtomicU32,
    frame_index: AtomicU64,
    iterations: AtomicU64,
    idle_iterations: AtomicU64,
}

impl Shared {
    pub(crate) fn new(fps_cap: u32) -> Self {
        Self {
            running: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            fps: AtomicU32::new(0),
            delta_bits: AtomicU32::new(0f32.to_bits()),
            fps_cap: AtomicU32::new(fps_cap),
            frame_index: AtomicU64::new(0),
            iterations: AtomicU64::new(0),
            idle_iterations: AtomicU64::new(0),
        }
    }

    /// Marks a new run as live and clears the previous run's measurements.
    pub(crate) fn begin_run(&self) {
        self.fps.store(0, Ordering::Relaxed);
        self.delta_bits.store(0f32.to_bits(), Ordering::Relaxed);
        self.frame_index.store(0, Ordering::Relaxed);
        self.iterations.store(0, Ordering::Relaxed);
        self.idle_iterations.store(0, Ordering::Relaxed);

        self.stop_requested.store(false, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
    }

    pub(crate) fn end_run(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub(crate) fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn set_fps(&self, fps: u32) {
        self.fps.store(fps, Ordering::Relaxed);
    }

    pub(crate) fn set_delta(&self, delta: f32) {
        self.delta_bits.store(delta.to_bits(), Ordering::Relaxed);
    }

    pub(crate) fn fps_cap(&self) -> u32 {
        self.fps_cap.load(Ordering::Relaxed)
    }

    pub(crate) fn record_iteration(&self, rendered: bool) {
        self.iterations.fetch_add(1, Ordering::Relaxed);
        if rendered {
            self.frame_index.fetch_add(1, Ordering::Relaxed);
            self.idle_iterations.store(0, Ordering::Relaxed);
        } else {
            self.idle_iterations.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Clears the running flag when the loop thread leaves `run_loop`, whether
/// it returns or unwinds.
pub(crate) struct RunningGuard<'a>(pub(crate) &'a Shared);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.end_run();
    }
}

/// Cloneable handle for observing and stopping a heart from other threads,
/// including from inside its own hooks.
#[derive(Debug, Clone)]
pub struct HeartRemote {
    pub(crate) shared: Arc<Shared>,
}

impl HeartRemote {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Asks the loop to exit after its current iteration. Does not block.
    pub fn stop(&self) {
        if self.shared.is_running() && !self.shared.stop_requested() {
            log::debug!("heart stop requested");
        }
        self.shared.request_stop();
    }

    /// True while the loop thread is executing.
    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    /// True once a stop was requested for the current run.
    pub fn is_stopping(&self) -> bool {
        self.shared.stop_requested()
    }

    /// Frames rendered in the last closed one-second window; zero until
    /// the first window closes.
    pub fn fps(&self) -> u32 {
        self.shared.fps.load(Ordering::Relaxed)
    }

    /// Seconds taken by the last completed iteration; zero before one completes.
    pub fn delta(&self) -> f32 {
        f32::from_bits(self.shared.delta_bits.load(Ordering::Relaxed))
    }

    pub fn fps_cap(&self) -> u32 {
        self.shared.fps_cap()
    }

    /// Changes the cap; the loop picks it up on its next iteration.
    pub fn set_fps_cap(&self, fps_cap: u32) -> Result<(), HeartError> {
        validate_fps_cap(fps_cap)?;
        self.shared.fps_cap.store(fps_cap, Ordering::Relaxed);
        Ok(())
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            fps: self.fps(),
            delta: self.delta(),
            fps_cap: self.fps_cap(),
            frame_index: self.shared.frame_index.load(Ordering::Relaxed),
            iterations: self.shared.iterations.load(Ordering::Relaxed),
            idle_iterations: self.shared.idle_iterations.load(Ordering::Relaxed),
        }
    }
}
