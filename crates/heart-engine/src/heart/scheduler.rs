use std::any::Any;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::core::{HeartHooks, TargetId};

use super::config::{HeartConfig, Pacing};
use super::run::{run_loop, LoopSettings};
use super::shared::{FrameStats, HeartRemote, Shared};
use super::HeartError;

/// What the loop thread hands back when it ends.
type RunExit<H> = (H, Result<(), HeartError>);

/// Fixed-timestep frame scheduler.
///
/// Owns the host hooks and, while started, the background thread that calls
/// them. Lifecycle:
/// - [`new`](Self::new) validates the configuration; nothing runs yet
/// - [`start`](Self::start) spawns the loop and returns immediately
/// - [`stop`](Self::stop) asks the loop to exit and returns immediately
/// - [`join`](Self::join) blocks until the thread is gone and reports how
///   the run ended
///
/// Dropping a `Heart` stops and joins it.
pub struct Heart<H: HeartHooks> {
    config: HeartConfig,
    remote: HeartRemote,
    hooks: Option<H>,
    handle: Option<JoinHandle<RunExit<H>>>,
}

impl<H: HeartHooks> Heart<H> {
    pub fn new(config: HeartConfig, hooks: H) -> Result<Self, HeartError> {
        Self::new_with(config, |_| hooks)
    }

    /// Like [`new`](Self::new), but builds the hooks from this heart's
    /// remote so they can stop the loop or read its stats themselves.
    pub fn new_with<F>(config: HeartConfig, make_hooks: F) -> Result<Self, HeartError>
    where
        F: FnOnce(HeartRemote) -> H,
    {
        config.validate()?;

        let remote = HeartRemote::new(Arc::new(Shared::new(config.fps_cap)));
        let hooks = make_hooks(remote.clone());

        Ok(Self {
            config,
            remote,
            hooks: Some(hooks),
            handle: None,
        })
    }

    /// Spawns the loop thread.
    ///
    /// A heart that is already running (and not stopping) is left alone. A
    /// previous run that has ended or is winding down is joined first; if it
    /// failed, its error is returned and no new run starts.
    pub fn start(&mut self) -> Result<(), HeartError> {
        if self.remote.is_running() && !self.remote.is_stopping() {
            log::debug!("heart already running; start ignored");
            return Ok(());
        }

        self.join()?;

        let mut hooks = self.hooks.take().ok_or(HeartError::HooksLost)?;
        let shared = Arc::clone(&self.remote.shared);
        let settings = LoopSettings::from(&self.config);

        shared.begin_run();

        let spawned = thread::Builder::new()
            .name("heart".to_string())
            .spawn(move || {
                let result = run_loop(&mut hooks, &shared, settings);
                (hooks, result)
            });

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                log::debug!("heart started with {} attached target(s)", self.config.targets.len());
                Ok(())
            }
            Err(e) => {
                self.remote.shared.end_run();
                Err(HeartError::Spawn(e))
            }
        }
    }

    /// Asks the loop to exit after its current iteration. Does not block and
    /// may be called any number of times.
    pub fn stop(&self) {
        self.remote.stop();
    }

    /// Blocks until the loop thread has exited.
    ///
    /// Returns the error a hook failed with, or [`HeartError::Panicked`] if a
    /// hook panicked. Joining a heart that was never started, or was already
    /// joined, returns `Ok(())`. Without a prior [`stop`](Self::stop) this
    /// waits for the loop to end by itself.
    pub fn join(&mut self) -> Result<(), HeartError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        match handle.join() {
            Ok((hooks, result)) => {
                self.hooks = Some(hooks);
                result
            }
            Err(payload) => {
                // The running flag was already cleared by the unwinding guard.
                let message = panic_message(payload.as_ref());
                log::error!("heart loop panicked: {message}");
                Err(HeartError::Panicked { message })
            }
        }
    }

    /// [`stop`](Self::stop) followed by [`join`](Self::join).
    pub fn shutdown(&mut self) -> Result<(), HeartError> {
        self.stop();
        self.join()
    }

    /// Shuts the heart down and returns the hooks.
    pub fn into_hooks(mut self) -> Result<H, HeartError> {
        self.shutdown()?;
        self.hooks.take().ok_or(HeartError::HooksLost)
    }

    /// True while the loop thread is executing.
    pub fn is_running(&self) -> bool {
        self.remote.is_running()
    }

    /// Seconds taken by the last completed iteration; 0 before the first.
    pub fn delta(&self) -> f32 {
        self.remote.delta()
    }

    /// Frames rendered in the last closed one-second window; 0 before the first.
    pub fn fps(&self) -> u32 {
        self.remote.fps()
    }

    pub fn fps_cap(&self) -> u32 {
        self.remote.fps_cap()
    }

    /// Changes the cap. Takes effect on the loop's next iteration.
    pub fn set_fps_cap(&self, fps_cap: u32) -> Result<(), HeartError> {
        self.remote.set_fps_cap(fps_cap)
    }

    pub fn stats(&self) -> FrameStats {
        self.remote.stats()
    }

    pub fn pacing(&self) -> Pacing {
        self.config.pacing
    }

    /// Attached targets, in attach order.
    pub fn targets(&self) -> &[TargetId] {
        &self.config.targets
    }

    /// Handle for observing and stopping this heart from elsewhere.
    pub fn remote(&self) -> HeartRemote {
        self.remote.clone()
    }

    /// Hooks, while the loop is not holding them.
    pub fn hooks(&self) -> Option<&H> {
        self.hooks.as_ref()
    }
}

impl<H: HeartHooks> Drop for Heart<H> {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!("heart stopped with error: {e}");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    struct Nop;

    impl HeartHooks for Nop {
        fn on_render(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn construction_does_not_start() {
        let heart = Heart::new(HeartConfig::default(), Nop).unwrap();
        assert!(!heart.is_running());
        assert_eq!(heart.delta(), 0.0);
        assert_eq!(heart.fps(), 0);
        assert_eq!(heart.fps_cap(), 60);
        assert!(heart.hooks().is_some());
    }

    #[test]
    fn invalid_config_rejected() {
        let err = Heart::new(HeartConfig::default().with_fps_cap(0), Nop)
            .err()
            .expect("zero cap must be rejected");
        assert!(matches!(err, HeartError::InvalidConfiguration(_)));
    }

    #[test]
    fn join_and_stop_without_start_are_noops() {
        let mut heart = Heart::new(HeartConfig::default(), Nop).unwrap();
        heart.stop();
        heart.stop();
        heart.join().unwrap();
        assert!(!heart.is_running());
    }

    #[test]
    fn targets_are_exposed_in_order() {
        let cfg = HeartConfig::default().attach(9u64).attach(4u64);
        let heart = Heart::new(cfg, Nop).unwrap();
        assert_eq!(heart.targets(), &[TargetId::new(9), TargetId::new(4)]);
    }

    #[test]
    fn panic_payloads() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&7u32), "non-string panic payload");
    }
}
