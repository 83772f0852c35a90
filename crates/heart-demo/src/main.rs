use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use heart_engine::logging::{init_logging, LoggingConfig};
use heart_engine::{Heart, HeartConfig, HeartHooks, HeartRemote, Pacing, TargetId};

/// Runs a heart with a host that only renders, reporting fps once a second.
#[derive(Debug, Parser)]
#[command(name = "heart-demo", version)]
struct Args {
    /// Upper bound on rendered frames per second.
    #[arg(long, default_value_t = 100)]
    fps_cap: u32,

    /// Seconds to run before stopping; runs until Ctrl-C when omitted.
    #[arg(long)]
    seconds: Option<f64>,

    /// Treat the fps cap as advisory and render at the accumulator rate.
    #[arg(long)]
    uncapped: bool,

    /// Number of placeholder targets to attach.
    #[arg(long, default_value_t = 1)]
    targets: u64,

    /// Log filter, e.g. "debug" or "heart_engine=trace".
    #[arg(long)]
    log: Option<String>,
}

/// Host that renders nothing but says so.
struct DemoHost {
    remote: HeartRemote,
    frames: u64,
    last_report: Instant,
}

impl HeartHooks for DemoHost {
    fn on_init(&mut self) -> Result<()> {
        log::info!("demo host ready");
        self.last_report = Instant::now();
        Ok(())
    }

    fn on_update(&mut self) -> Result<()> {
        if self.last_report.elapsed() >= Duration::from_secs(1) {
            self.last_report = Instant::now();
            let stats = self.remote.stats();
            log::info!(
                "fps {:>4} / cap {:<4} delta {:.6}s frames {}",
                stats.fps,
                stats.fps_cap,
                stats.delta,
                stats.frame_index
            );
        }
        Ok(())
    }

    fn on_render(&mut self) -> Result<()> {
        self.frames += 1;
        log::trace!("something is rendered ({})", self.frames);
        Ok(())
    }
}

/// Converts `--seconds` into a run duration, rejecting values a `Duration`
/// cannot hold (negative, NaN, infinite, too large).
fn run_duration(seconds: Option<f64>) -> Result<Option<Duration>> {
    seconds
        .map(|s| {
            Duration::try_from_secs_f64(s)
                .with_context(|| format!("--seconds must be a finite, non-negative number, got {s}"))
        })
        .transpose()
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logging = LoggingConfig::default();
    if let Some(filter) = args.log.clone() {
        logging = logging.with_filter(filter);
    }
    init_logging(logging);

    let run_for = run_duration(args.seconds)?;

    let config = HeartConfig::default()
        .with_fps_cap(args.fps_cap)
        .with_targets((0..args.targets).map(TargetId::new))
        .with_pacing(if args.uncapped { Pacing::Uncapped } else { Pacing::Capped });

    let mut heart = Heart::new_with(config, |remote| DemoHost {
        remote,
        frames: 0,
        last_report: Instant::now(),
    })
    .context("failed to configure heart")?;

    heart.start().context("failed to start heart")?;

    let deadline = run_for.and_then(|d| Instant::now().checked_add(d));

    while heart.is_running() {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            heart.stop();
        }
        thread::sleep(Duration::from_millis(50));
    }

    heart.join().context("heart stopped with an error")?;

    let host = heart.into_hooks()?;
    println!(
        "rendered {} frame(s); last fps {}, cap {}",
        host.frames,
        host.remote.fps(),
        host.remote.fps_cap()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_duration_accepts_finite_seconds() {
        assert_eq!(run_duration(None).unwrap(), None);
        assert_eq!(run_duration(Some(1.5)).unwrap(), Some(Duration::from_millis(1_500)));
        assert_eq!(run_duration(Some(0.0)).unwrap(), Some(Duration::ZERO));
    }

    #[test]
    fn run_duration_rejects_unrepresentable_seconds() {
        assert!(run_duration(Some(f64::INFINITY)).is_err());
        assert!(run_duration(Some(f64::NAN)).is_err());
        assert!(run_duration(Some(-1.0)).is_err());
        assert!(run_duration(Some(1e30)).is_err());
    }
}
