/// Zero-argument critical-section callback.
pub type Hook = extern "C" fn();

/// Enter and leave callbacks bracketing every mutation of a heap.
///
/// With no hooks installed the caller guarantees single-threaded,
/// non-reentrant use.
#[derive(Debug, Clone, Copy, Default)]
#[repr(C)]
pub struct Hooks {
  enter: Option<Hook>,
  leave: Option<Hook>,
}

impl Hooks {
  pub const fn none() -> Self {
    Self {
      enter: None,
      leave: None,
    }
  }

  pub const fn new(enter: Hook, leave: Hook) -> Self {
    Self {
      enter: Some(enter),
      leave: Some(leave),
    }
  }

  pub const fn from_parts(enter: Option<Hook>, leave: Option<Hook>) -> Self {
    Self { enter, leave }
  }

  pub const fn is_set(&self) -> bool {
    self.enter.is_some() || self.leave.is_some()
  }

  /// Runs `enter` now and `leave` when the returned guard drops.
  #[inline]
  pub fn enter(self) -> Section {
    if let Some(enter) = self.enter {
      enter();
    }
    Section { leave: self.leave }
  }
}

#[must_use = "the critical section ends when the guard is dropped"]
pub struct Section {
  leave: Option<Hook>,
}

impl Drop for Section {
  fn drop(&mut self) {
    if let Some(leave) = self.leave {
      leave();
    }
  }
}
