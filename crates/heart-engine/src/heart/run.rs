use std::thread;
use std::time::{Duration, Instant};

use crate::core::{HeartHooks, Phase};
use crate::time::{FixedStep, FrameClock};

use super::config::{HeartConfig, Pacing};
use super::shared::{RunningGuard, Shared};
use super::HeartError;

/// Loop parameters fixed for the duration of one run.
#[derive(Debug, Copy, Clone)]
pub(crate) struct LoopSettings {
    pub(crate) step_rate: u32,
    pub(crate) pacing: Pacing,
    pub(crate) idle_threshold: Duration,
}

impl From<&HeartConfig> for LoopSettings {
    fn from(config: &HeartConfig) -> Self {
        Self {
            step_rate: config.step_rate,
            pacing: config.pacing,
            idle_threshold: config.idle_threshold,
        }
    }
}

/// Body of the loop thread.
///
/// Runs `on_init` once, then iterates until a stop is requested or a hook
/// fails. The running flag is cleared on every way out, unwinding included.
pub(crate) fn run_loop<H>(hooks: &mut H, shared: &Shared, settings: LoopSettings) -> Result<(), HeartError>
where
    H: HeartHooks + ?Sized,
{
    let _running = RunningGuard(shared);

    log::info!(
        "heart loop started (step rate {} Hz, fps cap {}, {:?})",
        settings.step_rate,
        shared.fps_cap(),
        settings.pacing
    );

    let result = iterate(hooks, shared, settings);

    match &result {
        Ok(()) => log::info!("heart loop stopped"),
        Err(e) => log::error!("heart loop aborted: {e}"),
    }

    result
}

fn iterate<H>(hooks: &mut H, shared: &Shared, settings: LoopSettings) -> Result<(), HeartError>
where
    H: HeartHooks + ?Sized,
{
    hooks.on_init().map_err(|e| HeartError::phase(Phase::Init, e))?;

    let mut clock = FrameClock::new();
    let mut step = FixedStep::new(settings.step_rate);

    while !shared.stop_requested() {
        // Elapsed time since the previous iteration started, i.e. the
        // duration of the previous iteration.
        let ft = clock.tick();
        shared.set_delta(ft.dt());

        hooks.on_input().map_err(|e| HeartError::phase(Phase::Input, e))?;

        let outcome = step.advance(ft.elapsed);

        if let Some(fps) = outcome.fps_sample {
            shared.set_fps(fps);
            log::trace!("fps sample: {fps}");
        }

        let rendered = outcome.should_render();
        if rendered {
            hooks.on_update().map_err(|e| HeartError::phase(Phase::Update, e))?;
            hooks.on_render().map_err(|e| HeartError::phase(Phase::Render, e))?;
            step.frame_rendered();
        }

        shared.record_iteration(rendered);

        if rendered && settings.pacing == Pacing::Capped {
            wait_for_frame_budget(ft.now, shared.fps_cap());
        } else if !rendered {
            idle(step.until_next_step(), settings.idle_threshold);
        }
    }

    Ok(())
}

/// Sleeps until `1 / fps_cap` has passed since `frame_start`.
fn wait_for_frame_budget(frame_start: Instant, fps_cap: u32) {
    let budget = Duration::from_secs(1) / fps_cap.max(1);
    let deadline = frame_start + budget;

    let now = Instant::now();
    if deadline > now {
        thread::sleep(deadline - now);
    }
}

/// Gives the CPU back while no quantum is due.
///
/// Sleeps short of the next quantum by `threshold` (sleep overshoots), and
/// only yields once the quantum is closer than that.
fn idle(until_next_step: Duration, threshold: Duration) {
    if until_next_step > threshold {
        thread::sleep(until_next_step - threshold);
    } else {
        thread::yield_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use std::sync::Arc;

    struct StopAfter {
        shared: Arc<Shared>,
        frames: u32,
        limit: u32,
        inits: u32,
        log: Vec<Phase>,
    }

    impl StopAfter {
        fn new(shared: Arc<Shared>, limit: u32) -> Self {
            Self { shared, frames: 0, limit, inits: 0, log: Vec::new() }
        }
    }

    impl HeartHooks for StopAfter {
        fn on_init(&mut self) -> Result<()> {
            self.inits += 1;
            self.log.push(Phase::Init);
            Ok(())
        }

        fn on_input(&mut self) -> Result<()> {
            self.log.push(Phase::Input);
            Ok(())
        }

        fn on_update(&mut self) -> Result<()> {
            self.log.push(Phase::Update);
            Ok(())
        }

        fn on_render(&mut self) -> Result<()> {
            self.log.push(Phase::Render);
            self.frames += 1;
            if self.frames >= self.limit {
                self.shared.request_stop();
            }
            Ok(())
        }
    }

    fn settings(pacing: Pacing) -> LoopSettings {
        LoopSettings {
            step_rate: 1_000,
            pacing,
            idle_threshold: Duration::from_micros(200),
        }
    }

    #[test]
    fn runs_on_the_calling_thread_until_stopped() {
        let shared = Arc::new(Shared::new(1_000));
        shared.begin_run();

        let mut hooks = StopAfter::new(Arc::clone(&shared), 5);
        run_loop(&mut hooks, &shared, settings(Pacing::Uncapped)).unwrap();

        assert!(!shared.is_running());
        assert_eq!(hooks.inits, 1);
        assert_eq!(hooks.frames, 5);
        assert_eq!(hooks.log.first(), Some(&Phase::Init));
    }

    #[test]
    fn phase_order_within_iterations() {
        let shared = Arc::new(Shared::new(1_000));
        shared.begin_run();

        let mut hooks = StopAfter::new(Arc::clone(&shared), 10);
        run_loop(&mut hooks, &shared, settings(Pacing::Capped)).unwrap();

        // After init: every update is preceded by an input and followed by a
        // render, and no two renders share an iteration.
        let body = &hooks.log[1..];
        for (i, phase) in body.iter().enumerate() {
            match phase {
                Phase::Update => {
                    assert_eq!(body[i - 1], Phase::Input);
                    assert_eq!(body[i + 1], Phase::Render);
                }
                Phase::Render => assert_eq!(body[i - 1], Phase::Update),
                Phase::Input => {}
                Phase::Init => panic!("init ran twice"),
            }
        }
    }

    #[test]
    fn stop_before_first_iteration_still_inits() {
        let shared = Arc::new(Shared::new(60));
        shared.begin_run();
        shared.request_stop();

        let mut hooks = StopAfter::new(Arc::clone(&shared), 1);
        run_loop(&mut hooks, &shared, settings(Pacing::Capped)).unwrap();

        assert_eq!(hooks.log, vec![Phase::Init]);
    }

    struct FailingInit;

    impl HeartHooks for FailingInit {
        fn on_init(&mut self) -> Result<()> {
            bail!("no device")
        }

        fn on_render(&mut self) -> Result<()> {
            unreachable!("render after failed init")
        }
    }

    #[test]
    fn failing_init_aborts_run() {
        let shared = Arc::new(Shared::new(60));
        shared.begin_run();

        let err = run_loop(&mut FailingInit, &shared, settings(Pacing::Capped)).unwrap_err();
        assert_eq!(err.failed_phase(), Some(Phase::Init));
        assert!(!shared.is_running());
    }

    #[test]
    fn idle_without_sleep_when_close_to_next_step() {
        let start = Instant::now();
        idle(Duration::from_micros(100), Duration::from_micros(200));
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn frame_budget_waits_for_cap() {
        let start = Instant::now();
        wait_for_frame_budget(start, 50);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
