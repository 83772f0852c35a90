//! Frame scheduler.
//!
//! A [`Heart`] owns one background thread running a fixed-timestep loop:
//! - every iteration measures elapsed wall-clock time and calls `on_input`
//! - elapsed time is drained in fixed quanta (see [`crate::time::FixedStep`])
//! - if at least one quantum drained, `on_update` and `on_render` run once
//!
//! Frame statistics are published through atomics so any thread can poll
//! them, directly on the `Heart` or through a cloned [`HeartRemote`].

mod config;
mod error;
mod run;
mod scheduler;
mod shared;

pub use config::{HeartConfig, Pacing, DEFAULT_FPS_CAP, DEFAULT_IDLE_THRESHOLD};
pub use error::HeartError;
pub use scheduler::Heart;
pub use shared::{FrameStats, HeartRemote};
