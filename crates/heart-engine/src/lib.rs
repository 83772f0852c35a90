//! Heart engine crate.
//!
//! Hosts the fixed-timestep frame scheduler ("heart") and the small pieces
//! around it: frame timing, the host hooks contract and logger setup.

pub mod core;
pub mod heart;
pub mod logging;
pub mod time;

pub use crate::core::{HeartHooks, Phase, TargetId};
pub use crate::heart::{FrameStats, Heart, HeartConfig, HeartError, HeartRemote, Pacing};
