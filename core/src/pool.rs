use crate::song::track::TrackId;

pub type Allocator<T> = fn() -> T;

/// Append-only pool of identifiers.
///
/// Identifiers are handed out by position: the same position always yields
/// the same identifier, positions past the end are allocated on demand.
#[derive(Debug, Clone)]
pub struct IdPool<T> {
  allocator: Allocator<T>,
  items: Vec<T>,
}

impl<T: Copy> IdPool<T> {
  pub fn new(allocator: Allocator<T>) -> IdPool<T> {
    IdPool {
      allocator,
      items: Vec::new(),
    }
  }

  pub fn with_items(allocator: Allocator<T>, items: Vec<T>) -> IdPool<T> {
    IdPool { allocator, items }
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn items(&self) -> &[T] {
    &self.items
  }

  pub fn get(&self, position: usize) -> Option<T> {
    self.items.get(position).cloned()
  }

  /// Allocate a new identifier at the end of the pool
  pub fn alloc(&mut self) -> T {
    let item = (self.allocator)();
    self.items.push(item);
    item
  }
}

pub type TrackIdPool = IdPool<TrackId>;

impl TrackIdPool {
  pub fn new_tracks() -> TrackIdPool {
    IdPool::new(TrackId::new_random)
  }
}

impl Default for TrackIdPool {
  fn default() -> Self {
    TrackIdPool::new_tracks()
  }
}
