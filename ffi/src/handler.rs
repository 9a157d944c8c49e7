#![allow(dead_code)]
use core::fmt::{
  self,
  Write,
};

use libc::FILE;

#[cfg(target_os = "linux")]
unsafe extern "C" {
  static mut stderr: *mut FILE;
}

#[cfg(target_os = "macos")]
unsafe extern "C" {
  #[link_name = "__stderrp"]
  static mut stderr: *mut FILE;
}

/// Fixed buffer for formatting without an allocator. Output past the end is
/// dropped.
pub(crate) struct Scratch {
  buf: [u8; 256],
  len: usize,
}

impl Scratch {
  pub(crate) const fn new() -> Self {
    Self {
      buf: [0; 256],
      len: 0,
    }
  }

  pub(crate) fn as_bytes(&self) -> &[u8] {
    &self.buf[..self.len]
  }
}

impl Write for Scratch {
  fn write_str(&mut self, s: &str) -> fmt::Result {
    let room = self.buf.len() - self.len;
    let take = s.len().min(room);
    self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
    self.len += take;
    Ok(())
  }
}

#[cfg(not(test))]
#[panic_handler]
pub fn panic_handler(info: &core::panic::PanicInfo) -> ! {
  let mut scratch = Scratch::new();
  _ = write!(scratch, "{}", info.message());
  let message = scratch.as_bytes();

  unsafe {
    libc::fprintf(
      stderr,
      c"rtheap panic: %.*s\n".as_ptr(),
      message.len() as libc::c_int,
      message.as_ptr() as *const libc::c_char,
    );

    if let Some(loc) = info.location() {
      libc::fprintf(
        stderr,
        c"at %.*s:%d:%d\n".as_ptr(),
        loc.file().len() as libc::c_int,
        loc.file().as_ptr() as *const libc::c_char,
        loc.line() as libc::c_int,
        loc.column() as libc::c_int,
      );
    }

    libc::abort();
  }
}
