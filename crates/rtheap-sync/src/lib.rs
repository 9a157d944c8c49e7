#![cfg_attr(not(test), no_std)]

//! Spin-lock critical sections shaped to fit the heap's enter and leave
//! hooks.

use spin::Mutex;

pub use rtheap_alloc::Hooks;

/// A critical section split into two calls instead of a guard.
///
/// The heap hooks are plain `extern "C"` functions, so the guard of the
/// underlying lock cannot travel from `enter` to `leave`. `enter` leaks it
/// and `leave` releases the lock by force.
pub struct SpinSection {
  lock: Mutex<()>,
}

impl SpinSection {
  pub const fn new() -> Self {
    Self {
      lock: Mutex::new(()),
    }
  }

  /// Spins until the section is ours.
  ///
  /// Not reentrant: entering twice from the same thread never returns.
  #[inline]
  pub fn enter(&self) {
    core::mem::forget(self.lock.lock());
  }

  /// Releases a section taken with [`SpinSection::enter`].
  ///
  /// # Safety
  ///
  /// The caller must be the context that entered the section and must not
  /// have left it yet. Release builds do not check this; an unmatched call
  /// unlocks whoever holds the section now.
  #[inline]
  pub unsafe fn leave(&self) {
    debug_assert!(self.is_held(), "leaving a section that was never entered");
    unsafe { self.lock.force_unlock() };
  }

  pub fn is_held(&self) -> bool {
    self.lock.is_locked()
  }
}

impl Default for SpinSection {
  fn default() -> Self {
    Self::new()
  }
}

/// Builds a [`Hooks`] pair backed by a fresh static [`SpinSection`].
///
/// Every expansion owns its own section, so two heaps built from two
/// invocations never contend.
#[macro_export]
macro_rules! spin_hooks {
  () => {{
    static SECTION: $crate::SpinSection = $crate::SpinSection::new();

    extern "C" fn enter() {
      SECTION.enter();
    }

    extern "C" fn leave() {
      // SAFETY: the heap calls `leave` once per `enter`, from the same
      // context.
      unsafe { SECTION.leave() };
    }

    $crate::Hooks::new(enter, leave)
  }};
}
