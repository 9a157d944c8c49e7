use getset::CopyGetters;

/// Snapshot of a heap's counters.
///
/// `allocated` and `peak_allocated` count whole fragments, headers included,
/// so they move in powers of two rather than in requested bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
#[repr(C)]
pub struct Diagnostics {
  capacity: usize,
  allocated: usize,
  peak_allocated: usize,
  peak_request_size: usize,
  oom_count: u64,
}

impl Diagnostics {
  pub(crate) const fn new(capacity: usize) -> Self {
    Self {
      capacity,
      allocated: 0,
      peak_allocated: 0,
      peak_request_size: 0,
      oom_count: 0,
    }
  }

  pub(crate) fn record_request(&mut self, request: usize) {
    if request > self.peak_request_size {
      self.peak_request_size = request;
    }
  }

  pub(crate) fn record_allocation(&mut self, fragment: usize, request: usize) {
    self.allocated += fragment;
    debug_assert!(self.allocated <= self.capacity);
    if self.allocated > self.peak_allocated {
      self.peak_allocated = self.allocated;
    }
    self.record_request(request);
  }

  pub(crate) fn record_release(&mut self, fragment: usize) {
    debug_assert!(self.allocated >= fragment);
    self.allocated -= fragment;
  }

  pub(crate) fn record_oom(&mut self, request: usize) {
    self.oom_count = self.oom_count.saturating_add(1);
    self.record_request(request);
  }
}
