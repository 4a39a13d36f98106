//! Dense surrogate-id generators.
//!
//! Downstream consumers join on these integers, so ids must come out the
//! same on every run: each generator starts at 1 and only ever advances by
//! one, in processing order.

use std::marker::PhantomData;

#[derive(Debug)]
pub struct Sequence<T> {
  next:   u32,
  marker: PhantomData<fn() -> T>,
}

impl<T: From<u32>> Sequence<T> {
  pub fn new() -> Self { Self { next: 1, marker: PhantomData } }

  /// Hand out the next id.
  pub fn next_id(&mut self) -> T {
    let id = self.next;
    self.next += 1;
    T::from(id)
  }

  /// How many ids have been issued so far.
  pub fn issued(&self) -> u32 { self.next - 1 }
}

impl<T: From<u32>> Default for Sequence<T> {
  fn default() -> Self { Self::new() }
}
