//! Host-facing contracts.
//!
//! Defines what a host hands to the scheduler: the per-frame hooks it wants
//! called and the opaque targets the frames are meant for. Nothing here
//! knows about threads or timing.

mod hooks;
mod target;

pub use hooks::{HeartHooks, Phase};
pub use target::TargetId;
