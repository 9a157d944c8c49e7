#![cfg_attr(not(test), no_std)]

use core::{
  marker::PhantomData,
  ptr::NonNull,
};

use getset::{
  CopyGetters,
  MutGetters,
};

pub mod prelude {
  pub use super::{
    FreeList,
    HasLink,
    Link,
    List,
    ListIter,
  };
}

pub trait HasLink {
  fn link(&self) -> &Link<Self>
  where
    Self: Sized;
  fn link_mut(&mut self) -> &mut Link<Self>
  where
    Self: Sized;
}

#[derive(Debug, CopyGetters, MutGetters)]
#[repr(C)]
pub struct Link<T>
where
  T: HasLink,
{
  #[getset(get_copy = "pub", get_mut = "pub")]
  next: Option<NonNull<T>>,
  #[getset(get_copy = "pub", get_mut = "pub")]
  prev: Option<NonNull<T>>,
}

impl<T> Link<T>
where
  T: HasLink,
{
  pub const fn new() -> Self {
    Self {
      next: None,
      prev: None,
    }
  }

  #[inline]
  pub const fn is_detached(&self) -> bool {
    self.next.is_none() && self.prev.is_none()
  }
}

impl<T> Default for Link<T>
where
  T: HasLink,
{
  fn default() -> Self {
    Self::new()
  }
}

/// Headless operations on an intrusive doubly-linked chain.
pub struct List {}

impl List {
  fn to_non_null<T>(item: &mut T) -> NonNull<T>
  where
    T: HasLink,
  {
    NonNull::from(&mut *item)
  }

  /// Links `item` directly behind `at`.
  ///
  /// # Safety
  ///
  /// Every node reachable from `at` through its links must be live and not
  /// otherwise borrowed, and `item` must not be linked anywhere.
  pub unsafe fn insert_after<T>(item: &mut T, at: &mut T)
  where
    T: HasLink,
  {
    let at_ptr = Self::to_non_null(at);
    let item_ptr = Self::to_non_null(item);

    let item_link = item.link_mut();
    let at_link = at.link_mut();

    item_link.prev = Some(at_ptr);
    item_link.next = at_link.next;

    if let Some(mut next) = at_link.next {
      unsafe { next.as_mut().link_mut().prev = Some(item_ptr) };
    }

    at_link.next = Some(item_ptr);
  }

  /// Unlinks `item` and patches its neighbours together.
  ///
  /// # Safety
  ///
  /// The neighbours of `item` must be live and not otherwise borrowed.
  pub unsafe fn remove<T>(item: &mut T)
  where
    T: HasLink,
  {
    let item_link = item.link_mut();

    if let Some(mut prev) = item_link.prev {
      unsafe { prev.as_mut().link_mut().next = item_link.next };
    }

    if let Some(mut next) = item_link.next {
      unsafe { next.as_mut().link_mut().prev = item_link.prev };
    }

    item_link.next = None;
    item_link.prev = None;
  }
}

/// Intrusive doubly-linked list with a head pointer.
///
/// Push, pop and removal of an arbitrary member are all O(1).
#[derive(Debug)]
#[repr(transparent)]
pub struct FreeList<T>
where
  T: HasLink,
{
  head: Option<NonNull<T>>,
}

impl<T> FreeList<T>
where
  T: HasLink,
{
  pub const fn new() -> Self {
    Self { head: None }
  }

  #[inline]
  pub const fn head(&self) -> Option<NonNull<T>> {
    self.head
  }

  #[inline]
  pub const fn is_empty(&self) -> bool {
    self.head.is_none()
  }

  /// # Safety
  ///
  /// `item` must not be a member of any list, and the current head must be
  /// live.
  pub unsafe fn push_front(&mut self, item: &mut T) {
    debug_assert!(item.link().is_detached());
    let item_ptr = List::to_non_null(item);
    let link = item.link_mut();
    link.prev = None;
    link.next = self.head;

    if let Some(mut head) = self.head {
      unsafe { head.as_mut().link_mut().prev = Some(item_ptr) };
    }

    self.head = Some(item_ptr);
  }

  /// # Safety
  ///
  /// All members must be live and not otherwise borrowed.
  pub unsafe fn pop_front(&mut self) -> Option<NonNull<T>> {
    let mut head = self.head?;
    unsafe { self.remove(head.as_mut()) };
    Some(head)
  }

  /// # Safety
  ///
  /// `item` must be a member of this list, and its neighbours must be live
  /// and not otherwise borrowed.
  pub unsafe fn remove(&mut self, item: &mut T) {
    let item_ptr = List::to_non_null(item);
    if self.head == Some(item_ptr) {
      self.head = item.link().next;
    }
    unsafe { List::remove(item) };
  }

  /// # Safety
  ///
  /// The list must not be mutated while the iterator is alive.
  pub unsafe fn iter<'list>(&'list self) -> ListIter<'list, T> {
    ListIter::new(self.head)
  }
}

impl<T> Default for FreeList<T>
where
  T: HasLink,
{
  fn default() -> Self {
    Self::new()
  }
}

pub struct ListIter<'list, T>
where
  T: HasLink + 'list,
{
  next: Option<NonNull<T>>,
  marker: PhantomData<&'list T>,
}

impl<'list, T> ListIter<'list, T>
where
  T: HasLink + 'list,
{
  pub fn new(start: Option<NonNull<T>>) -> Self {
    Self {
      next: start,
      marker: PhantomData,
    }
  }
}

impl<'list, T> From<&'list T> for ListIter<'list, T>
where
  T: HasLink + 'list,
{
  fn from(start: &'list T) -> Self {
    Self::new(Some(NonNull::from(start)))
  }
}

impl<'list, T> Iterator for ListIter<'list, T>
where
  T: HasLink + 'list,
{
  type Item = &'list T;

  fn next(&mut self) -> Option<Self::Item> {
    let current = self.next?;
    let current_ref = unsafe { current.as_ref() };
    self.next = current_ref.link().next;
    Some(current_ref)
  }
}

#[cfg(test)]
mod tests;
