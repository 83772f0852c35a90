use std::fmt;

use anyhow::Result;

/// Loop phase a hook belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Phase {
    Init,
    Input,
    Update,
    Render,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Input => "input",
            Phase::Update => "update",
            Phase::Render => "render",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame callbacks implemented by the host.
///
/// The hooks value is moved onto the loop thread when the heart starts and
/// handed back when the loop ends, so it must be `Send + 'static`.
///
/// Call order for one run:
/// - `on_init` once, before the first iteration
/// - `on_input` every iteration
/// - `on_update` then `on_render` on iterations where a frame is due
///
/// Returning `Err` from any hook ends the run; the error is delivered to
/// whoever joins the heart.
pub trait HeartHooks: Send + 'static {
    fn on_init(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_input(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_update(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_render(&mut self) -> Result<()>;
}

impl<H: HeartHooks + ?Sized> HeartHooks for Box<H> {
    fn on_init(&mut self) -> Result<()> {
        (**self).on_init()
    }

    fn on_input(&mut self) -> Result<()> {
        (**self).on_input()
    }

    fn on_update(&mut self) -> Result<()> {
        (**self).on_update()
    }

    fn on_render(&mut self) -> Result<()> {
        (**self).on_render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct RenderOnly {
        renders: u32,
    }

    impl HeartHooks for RenderOnly {
        fn on_render(&mut self) -> Result<()> {
            self.renders += 1;
            Ok(())
        }
    }

    #[test]
    fn default_hooks_are_noops() {
        let mut h = RenderOnly::default();
        h.on_init().unwrap();
        h.on_input().unwrap();
        h.on_update().unwrap();
        h.on_render().unwrap();
        assert_eq!(h.renders, 1);
    }

    struct Tally(Arc<AtomicU32>);

    impl HeartHooks for Tally {
        fn on_update(&mut self) -> Result<()> {
            self.0.fetch_add(10, Ordering::SeqCst);
            Ok(())
        }

        fn on_render(&mut self) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn boxed_hooks_forward() {
        let count = Arc::new(AtomicU32::new(0));
        let mut h: Box<dyn HeartHooks> = Box::new(Tally(Arc::clone(&count)));
        h.on_init().unwrap();
        h.on_update().unwrap();
        h.on_render().unwrap();
        h.on_render().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 12);
    }

    #[test]
    fn phase_names() {
        assert_eq!(Phase::Init.to_string(), "init");
        assert_eq!(Phase::Render.as_str(), "render");
    }
}
