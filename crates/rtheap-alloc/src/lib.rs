#![cfg_attr(not(test), no_std)]

pub mod bin;
pub mod classes;
pub mod config;
pub mod diag;
pub mod fragment;
pub mod heap;
pub mod hooks;
mod integrity;

pub use config::ALIGNMENT;
pub use diag::Diagnostics;
pub use heap::{
  Heap,
  HeapError,
  HeapResult,
};
pub use hooks::{
  Hook,
  Hooks,
};

pub mod prelude {
  pub use super::{
    ALIGNMENT,
    Diagnostics,
    Heap,
    HeapError,
    HeapResult,
    Hook,
    Hooks,
    config::{
      FRAGMENT_SIZE_MAX,
      FRAGMENT_SIZE_MIN,
    },
    heap::INSTANCE_SIZE,
  };
}
