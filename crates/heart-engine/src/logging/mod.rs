//! Logging utilities.
//!
//! Hosts call [`init_logging`] once near the top of `main`. The scheduler
//! itself only talks to the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};
