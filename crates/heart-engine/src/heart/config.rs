use std::time::Duration;

use crate::core::TargetId;
use crate::time::{DEFAULT_STEP_RATE, MAX_STEP_RATE};

use super::HeartError;

pub const DEFAULT_FPS_CAP: u32 = 60;

/// Below this much time to the next quantum the loop yields instead of sleeping.
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_micros(200);

/// How `fps_cap` affects the loop.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Pacing {
    /// After a rendered frame the loop waits out the rest of the
    /// `1 / fps_cap` budget, so measured fps stays at or below the cap.
    #[default]
    Capped,
    /// The cap is stored and reported only; frames are paced by the
    /// accumulator quantum alone.
    Uncapped,
}

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct HeartConfig {
    /// Upper bound on rendered frames per second.
    pub fps_cap: u32,

    /// Attached targets, in attach order.
    pub targets: Vec<TargetId>,

    /// Accumulator quanta per second.
    pub step_rate: u32,

    pub pacing: Pacing,

    /// See [`DEFAULT_IDLE_THRESHOLD`].
    pub idle_threshold: Duration,

    /// Reject an empty target list at construction.
    pub require_targets: bool,
}

impl HeartConfig {
    pub fn with_fps_cap(mut self, fps_cap: u32) -> Self {
        self.fps_cap = fps_cap;
        self
    }

    /// Appends one target.
    pub fn attach(mut self, target: impl Into<TargetId>) -> Self {
        self.targets.push(target.into());
        self
    }

    pub fn with_targets<I, T>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TargetId>,
    {
        self.targets.extend(targets.into_iter().map(Into::into));
        self
    }

    pub fn with_step_rate(mut self, step_rate: u32) -> Self {
        self.step_rate = step_rate;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_idle_threshold(mut self, threshold: Duration) -> Self {
        self.idle_threshold = threshold;
        self
    }

    pub fn require_targets(mut self, required: bool) -> Self {
        self.require_targets = required;
        self
    }

    pub fn validate(&self) -> Result<(), HeartError> {
        validate_fps_cap(self.fps_cap)?;

        if self.step_rate == 0 {
            return Err(HeartError::invalid("step rate must be non-zero"));
        }

        if self.step_rate > MAX_STEP_RATE {
            return Err(HeartError::invalid(format!(
                "step rate {} exceeds {MAX_STEP_RATE} (sub-nanosecond quantum)",
                self.step_rate
            )));
        }

        if self.require_targets && self.targets.is_empty() {
            return Err(HeartError::invalid("at least one target must be attached"));
        }

        Ok(())
    }
}

pub(crate) fn validate_fps_cap(fps_cap: u32) -> Result<(), HeartError> {
    if fps_cap == 0 {
        return Err(HeartError::invalid("fps cap must be non-zero"));
    }
    Ok(())
}

impl Default for HeartConfig {
    fn default() -> Self {
        Self {
            fps_cap: DEFAULT_FPS_CAP,
            targets: Vec::new(),
            step_rate: DEFAULT_STEP_RATE,
            pacing: Pacing::default(),
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            require_targets: false,
        }
    }
}
