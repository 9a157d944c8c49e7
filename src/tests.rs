use super::*;

fn leaked_arena(words: usize) -> &'static mut [u8] {
  let words = Box::leak(vec![u64::from_ne_bytes([0xa5; 8]); words].into_boxed_slice());
  unsafe { core::slice::from_raw_parts_mut(words.as_mut_ptr().cast::<u8>(), words.len() * 8) }
}

fn layout(size: usize, align: usize) -> Layout {
  Layout::from_size_align(size, align).unwrap()
}

#[test]
fn test_empty_heap_serves_nothing() {
  let heap = LockedHeap::empty();
  assert!(!heap.is_initialized());
  assert!(heap.diagnostics().is_none());
  assert!(unsafe { heap.alloc(layout(16, 8)) }.is_null());
  unsafe { heap.dealloc(ptr::null_mut(), layout(16, 8)) };
}

#[test]
fn test_init_only_once() {
  let heap = LockedHeap::empty();
  assert_eq!(heap.init_from_slice(leaked_arena(8)), Err(HeapError::InvalidArgument));
  assert!(!heap.is_initialized());

  assert!(heap.init_from_slice(leaked_arena(1024)).is_ok());
  assert!(heap.is_initialized());
  assert_eq!(heap.init_from_slice(leaked_arena(1024)), Err(HeapError::InvalidArgument));
}

#[test]
fn test_global_alloc_round_trip() {
  let heap = LockedHeap::empty();
  heap.init_from_slice(leaked_arena(2048)).unwrap();

  let small = layout(24, 8);
  let wide = layout(300, ALIGNMENT);
  let a = unsafe { heap.alloc(small) };
  let b = unsafe { heap.alloc(wide) };
  assert!(!a.is_null() && !b.is_null());
  assert_eq!(b as usize % ALIGNMENT, 0);

  unsafe {
    a.write_bytes(0xa5, 24);
    b.write_bytes(0x5a, 300);
    assert_eq!(*a.add(23), 0xa5);
    assert_eq!(*b.add(299), 0x5a);
  }
  assert!(heap.diagnostics().unwrap().allocated() > 0);

  unsafe {
    heap.dealloc(a, small);
    heap.dealloc(b, wide);
  }
  assert_eq!(heap.diagnostics().unwrap().allocated(), 0);
  assert_eq!(heap.with_heap(|heap| heap.invariants_hold()), Some(true));
}

#[test]
fn test_over_aligned_layout_is_refused() {
  let heap = LockedHeap::empty();
  heap.init_from_slice(leaked_arena(1024)).unwrap();

  assert!(unsafe { heap.alloc(layout(8, ALIGNMENT * 2)) }.is_null());
  // Refused before reaching the heap, so not an out-of-memory event.
  assert_eq!(heap.diagnostics().unwrap().oom_count(), 0);
}

#[test]
fn test_zero_sized_layout_gets_a_block() {
  let heap = LockedHeap::empty();
  heap.init_from_slice(leaked_arena(1024)).unwrap();

  let zero = layout(0, 1);
  let ptr = unsafe { heap.alloc(zero) };
  assert!(!ptr.is_null());
  assert_eq!(heap.diagnostics().unwrap().peak_request_size(), 1);
  unsafe { heap.dealloc(ptr, zero) };
  assert_eq!(heap.diagnostics().unwrap().allocated(), 0);
}

#[test]
fn test_exhaustion_returns_null() {
  let heap = LockedHeap::empty();
  heap.init_from_slice(leaked_arena(1024)).unwrap();

  let huge = layout(1 << 20, 8);
  assert!(unsafe { heap.alloc(huge) }.is_null());
  assert_eq!(heap.diagnostics().unwrap().oom_count(), 1);
}

#[test]
fn test_shared_between_threads() {
  static HEAP: LockedHeap = LockedHeap::empty();
  HEAP.init_from_slice(leaked_arena(1 << 14)).unwrap();

  std::thread::scope(|scope| {
    for tag in 0..4u8 {
      scope.spawn(move || {
        let block = layout(48, 8);
        for _ in 0..500 {
          let ptr = unsafe { HEAP.alloc(block) };
          assert!(!ptr.is_null());
          unsafe {
            ptr.write_bytes(tag, 48);
            assert!(core::slice::from_raw_parts(ptr, 48).iter().all(|&b| b == tag));
            HEAP.dealloc(ptr, block);
          }
        }
      });
    }
  });

  let diag = HEAP.diagnostics().unwrap();
  assert_eq!(diag.allocated(), 0);
  assert_eq!(diag.oom_count(), 0);
  assert_eq!(HEAP.with_heap(|heap| heap.invariants_hold()), Some(true));
}
