use std::time::Duration;

/// Substeps per second used when the host does not pick a rate.
pub const DEFAULT_STEP_RATE: u32 = 1_000;

/// Highest step rate whose quantum is still at least one nanosecond.
pub const MAX_STEP_RATE: u32 = 1_000_000_000;

const ONE_SECOND: Duration = Duration::from_secs(1);
const MIN_STEP: Duration = Duration::from_nanos(1);
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Result of feeding one iteration's elapsed time into a [`FixedStep`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct StepOutcome {
    /// Substeps drained from the accumulator during this iteration.
    pub substeps: u32,

    /// Set when a one-second window closed while draining; carries the
    /// number of frames rendered during that window.
    pub fps_sample: Option<u32>,
}

impl StepOutcome {
    /// A frame is due when at least one substep was drained.
    pub fn should_render(&self) -> bool {
        self.substeps > 0
    }
}

/// Fixed-timestep accumulator.
///
/// Wall-clock time is fed in per outer iteration and drained in fixed
/// quanta (`step`). However many quanta drain, the caller renders once, so
/// a slow iteration catches up on simulated time without queueing extra
/// frames.
///
/// The type is clock-free: it only sees the durations handed to
/// [`advance`](Self::advance), which keeps it deterministic under test.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: Duration,
    unprocessed: Duration,
    since_sample: Duration,
    frames_this_second: u32,
    fps: u32,
}

impl FixedStep {
    /// Accumulator draining `step_rate` quanta per second.
    ///
    /// `step_rate` must lie in `1..=MAX_STEP_RATE`; configuration
    /// validation rejects anything else before a scheduler gets here.
    pub fn new(step_rate: u32) -> Self {
        debug_assert!(
            (1..=MAX_STEP_RATE).contains(&step_rate),
            "step rate out of range: {step_rate}"
        );
        Self::from_step(ONE_SECOND / step_rate.max(1))
    }

    /// Accumulator with an explicit quantum, raised to at least 1 ns.
    pub fn from_step(step: Duration) -> Self {
        Self {
            step: step.max(MIN_STEP),
            unprocessed: Duration::ZERO,
            since_sample: Duration::ZERO,
            frames_this_second: 0,
            fps: 0,
        }
    }

    /// Feeds `elapsed` wall-clock time and drains every full quantum.
    ///
    /// A quantum only drains while strictly more than one `step` is pending.
    pub fn advance(&mut self, elapsed: Duration) -> StepOutcome {
        self.unprocessed += elapsed;
        self.since_sample += elapsed;

        let mut outcome = StepOutcome::default();

        if self.unprocessed <= self.step {
            return outcome;
        }

        // Drain all due quanta at once: the smallest n leaving at most one
        // step pending. The window can only close on the first of them.
        let pending = self.unprocessed.as_nanos();
        let step = self.step.as_nanos();
        let drained = (pending - step).div_ceil(step);
        let rest = pending - drained * step;

        self.unprocessed = Duration::new(
            (rest / NANOS_PER_SEC) as u64,
            (rest % NANOS_PER_SEC) as u32,
        );
        outcome.substeps = u32::try_from(drained).unwrap_or(u32::MAX);

        if self.since_sample >= ONE_SECOND {
            self.fps = self.frames_this_second;
            outcome.fps_sample = Some(self.fps);

            self.frames_this_second = 0;
            self.since_sample = Duration::ZERO;
        }

        outcome
    }

    /// Counts one rendered frame towards the current one-second window.
    pub fn frame_rendered(&mut self) {
        self.frames_this_second = self.frames_this_second.saturating_add(1);
    }

    /// Frames rendered during the last closed one-second window.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Time carried over to the next iteration.
    pub fn unprocessed(&self) -> Duration {
        self.unprocessed
    }

    /// Wall-clock time that still has to pass before a quantum can drain.
    pub fn until_next_step(&self) -> Duration {
        self.step.saturating_sub(self.unprocessed)
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_RATE)
    }
}
