use std::fmt;

/// Opaque handle to something frames are presented to (a window, a surface).
///
/// The scheduler stores these in attach order and hands them back to the
/// host; it never resolves them. Whoever owns the real target keeps it alive.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TargetId(u64);

impl TargetId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for TargetId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

#[cfg(feature = "winit")]
impl From<winit::window::WindowId> for TargetId {
    fn from(id: winit::window::WindowId) -> Self {
        Self(u64::from(id))
    }
}

#[cfg(feature = "winit")]
impl From<TargetId> for winit::window::WindowId {
    fn from(id: TargetId) -> Self {
        winit::window::WindowId::from(id.0)
    }
}
