use super::*;

#[test]
fn test_set_get_clear() {
  let mut mask = BinMask::zero();

  mask.set(0).unwrap();
  mask.set(5).unwrap();
  mask.set(WORD_BITS - 1).unwrap();

  assert!(mask.get(0).unwrap());
  assert!(mask.get(5).unwrap());
  assert!(mask.get(WORD_BITS - 1).unwrap());
  assert!(!mask.get(4).unwrap());
  assert_eq!(mask.word(), 1 | 1 << 5 | 1 << (WORD_BITS - 1));

  mask.clear(5).unwrap();
  assert!(!mask.get(5).unwrap());
  assert_eq!(mask.word(), 1 | 1 << (WORD_BITS - 1));

  mask.clear(0).unwrap();
  mask.clear(WORD_BITS - 1).unwrap();
  assert!(mask.is_clear());
}

#[test]
fn test_set_is_idempotent() {
  let mut mask = BinMask::zero();
  mask.set(7).unwrap();
  mask.set(7).unwrap();
  assert_eq!(mask.word(), 1 << 7);

  mask.clear(7).unwrap();
  mask.clear(7).unwrap();
  assert!(mask.is_clear());
}

#[test]
fn test_search_operations() {
  let mut mask = BinMask::zero();
  assert_eq!(mask.find_fs_from(0), None);

  mask.set(6).unwrap();
  mask.set(10).unwrap();

  assert_eq!(mask.find_fs_from(0), Some(6));
  assert_eq!(mask.find_fs_from(6), Some(6));
  assert_eq!(mask.find_fs_from(7), Some(10));
  assert_eq!(mask.find_fs_from(10), Some(10));
  assert_eq!(mask.find_fs_from(11), None);
  assert_eq!(mask.find_fs_from(WORD_BITS), None);
  assert_eq!(mask.find_fs_from(usize::MAX), None);
}

#[test]
fn test_top_bit_search() {
  let mut mask = BinMask::zero();
  mask.set(WORD_BITS - 1).unwrap();

  assert_eq!(mask.find_fs_from(WORD_BITS - 1), Some(WORD_BITS - 1));
  assert_eq!(mask.find_fs_from(1), Some(WORD_BITS - 1));
}

#[test]
fn test_error_handling() {
  let mut mask = BinMask::zero();

  assert_eq!(
    mask.set(WORD_BITS),
    Err(BitmapError::OutOfBounds {
      index: WORD_BITS,
      size: WORD_BITS,
    })
  );
  assert!(matches!(
    mask.clear(WORD_BITS + 3),
    Err(BitmapError::OutOfBounds { .. })
  ));
  assert!(matches!(
    mask.get(usize::MAX),
    Err(BitmapError::OutOfBounds { .. })
  ));
  assert!(mask.is_clear());
}
