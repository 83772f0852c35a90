//! Time subsystem.
//!
//! Provides stable, testable timing utilities without coupling to the
//! scheduler thread:
//! - `FrameClock` measures wall-clock time between loop iterations
//! - `FixedStep` is the fixed-timestep accumulator that decides when a frame
//!   is due and samples frames-per-second once per second

mod fixed_step;
mod frame_clock;

pub use fixed_step::{FixedStep, StepOutcome, DEFAULT_STEP_RATE, MAX_STEP_RATE};
pub use frame_clock::{FrameClock, FrameTime};
