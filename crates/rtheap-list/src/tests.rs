use super::*;
use core::ptr::NonNull;

#[derive(Debug)]
struct TestNode {
  value: i32,
  link: Link<Self>,
}

impl TestNode {
  fn new(value: i32) -> Self {
    Self {
      value,
      link: Link::default(),
    }
  }
}

impl HasLink for TestNode {
  fn link(&self) -> &Link<Self> {
    &self.link
  }

  fn link_mut(&mut self) -> &mut Link<Self> {
    &mut self.link
  }
}

fn values(list: &FreeList<TestNode>) -> Vec<i32> {
  unsafe { list.iter() }.map(|n| n.value).collect()
}

#[test]
fn test_insert_after() {
  let mut node1 = TestNode::new(1);
  let mut node2 = TestNode::new(2);

  unsafe { List::insert_after(&mut node2, &mut node1) };

  let node1_ptr = NonNull::from(&node1);
  let node2_ptr = NonNull::from(&node2);

  assert_eq!(node1.link().next(), Some(node2_ptr));
  assert_eq!(node2.link().prev(), Some(node1_ptr));
}

#[test]
fn test_insert_after_middle() {
  let mut node1 = TestNode::new(1);
  let mut node2 = TestNode::new(2);
  let mut node3 = TestNode::new(3);

  unsafe {
    List::insert_after(&mut node3, &mut node1);
    List::insert_after(&mut node2, &mut node1);
  }

  let values: Vec<i32> = ListIter::from(&node1).map(|n| n.value).collect();
  assert_eq!(values, vec![1, 2, 3]);
  assert_eq!(node3.link().prev(), Some(NonNull::from(&node2)));
}

#[test]
fn test_remove() {
  let mut node1 = TestNode::new(1);
  let mut node2 = TestNode::new(2);
  let mut node3 = TestNode::new(3);

  unsafe {
    List::insert_after(&mut node2, &mut node1);
    List::insert_after(&mut node3, &mut node2);
    List::remove(&mut node2);
  }

  let node1_ptr = NonNull::from(&node1);
  let node3_ptr = NonNull::from(&node3);

  assert_eq!(node1.link().next(), Some(node3_ptr));
  assert_eq!(node3.link().prev(), Some(node1_ptr));
  assert!(node2.link().is_detached());
}

#[test]
fn test_iter() {
  let mut node1 = TestNode::new(1);
  let mut node2 = TestNode::new(2);
  let mut node3 = TestNode::new(3);

  unsafe {
    List::insert_after(&mut node2, &mut node1);
    List::insert_after(&mut node3, &mut node2);
  }

  let iter = ListIter::from(&node1);
  let values: Vec<i32> = iter.map(|n| n.value).collect();

  assert_eq!(values, vec![1, 2, 3]);
}

#[test]
fn test_free_list_push_pop_is_lifo() {
  let mut node1 = TestNode::new(1);
  let mut node2 = TestNode::new(2);
  let mut node3 = TestNode::new(3);
  let mut list = FreeList::new();
  assert!(list.is_empty());

  unsafe {
    list.push_front(&mut node1);
    list.push_front(&mut node2);
    list.push_front(&mut node3);
  }
  assert_eq!(values(&list), vec![3, 2, 1]);

  let popped = unsafe { list.pop_front() };
  assert_eq!(popped, Some(NonNull::from(&mut node3)));
  assert_eq!(list.head(), Some(NonNull::from(&mut node2)));
  assert!(node3.link().is_detached());
  assert_eq!(node2.link().prev(), None);
}

#[test]
fn test_free_list_remove_any_position() {
  let mut node1 = TestNode::new(1);
  let mut node2 = TestNode::new(2);
  let mut node3 = TestNode::new(3);
  let mut list = FreeList::new();

  unsafe {
    list.push_front(&mut node1);
    list.push_front(&mut node2);
    list.push_front(&mut node3);

    list.remove(&mut node2);
  }
  assert_eq!(values(&list), vec![3, 1]);
  assert!(node2.link().is_detached());

  unsafe { list.remove(&mut node1) };
  assert_eq!(values(&list), vec![3]);

  unsafe { list.remove(&mut node3) };
  assert!(list.is_empty());
  assert_eq!(unsafe { list.pop_front() }, None);
}

#[test]
fn test_free_list_remove_head_promotes_next() {
  let mut node1 = TestNode::new(1);
  let mut node2 = TestNode::new(2);
  let mut list = FreeList::new();

  unsafe {
    list.push_front(&mut node1);
    list.push_front(&mut node2);
    list.remove(&mut node2);
  }

  assert_eq!(list.head(), Some(NonNull::from(&mut node1)));
  assert_eq!(node1.link().prev(), None);
}
