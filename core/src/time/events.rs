//! Sorted sequences of events stamped with a tick position.
//!
//! Sequences are kept in ascending tick order. Events sharing a tick keep
//! their insertion order, a new event lands after the existing ones.

use super::{Seconds, TicksTime};

pub trait TimedEvent {
  fn ticks(&self) -> TicksTime;

  /// Absolute time, for events that carry one
  fn time(&self) -> Option<Seconds> {
    None
  }
}

/// Insert `event` after every event with a tick not greater than its own.
/// Returns the index where it was inserted.
pub fn insert_sorted<E: TimedEvent>(events: &mut Vec<E>, event: E) -> usize {
  let index = upper_bound_by_ticks(events, event.ticks());
  events.insert(index, event);
  index
}

/// Index of the first event with a tick not less than `ticks`
pub fn lower_bound_by_ticks<E: TimedEvent>(events: &[E], ticks: TicksTime) -> usize {
  events.partition_point(|event| event.ticks() < ticks)
}

/// Index of the first event with a tick greater than `ticks`
pub fn upper_bound_by_ticks<E: TimedEvent>(events: &[E], ticks: TicksTime) -> usize {
  events.partition_point(|event| event.ticks() <= ticks)
}

/// Index of the first event with a time not less than `time`.
/// Events without time sort before any time.
pub fn lower_bound_by_time<E: TimedEvent>(events: &[E], time: Seconds) -> usize {
  events.partition_point(|event| event.time().map_or(true, |t| t < time))
}

/// Index of the first event with a time greater than `time`
pub fn upper_bound_by_time<E: TimedEvent>(events: &[E], time: Seconds) -> usize {
  events.partition_point(|event| event.time().map_or(true, |t| t <= time))
}

/// Last event at or before `ticks`
pub fn last_at_or_before<E: TimedEvent>(events: &[E], ticks: TicksTime) -> Option<&E> {
  match upper_bound_by_ticks(events, ticks) {
    0 => None,
    index => events.get(index - 1),
  }
}

/// Stable sort by tick, keeping the relative order of events sharing a tick
pub fn sort_by_ticks<E: TimedEvent>(events: &mut Vec<E>) {
  events.sort_by_key(|event| event.ticks());
}

#[cfg(test)]
mod test {

  use super::*;

  #[derive(Debug, PartialEq)]
  struct Marker(u64, f64, &'static str);

  impl TimedEvent for Marker {
    fn ticks(&self) -> TicksTime {
      TicksTime::new(self.0)
    }

    fn time(&self) -> Option<Seconds> {
      Some(self.1)
    }
  }

  fn markers() -> Vec<Marker> {
    vec![
      Marker(0, 0.0, "a"),
      Marker(10, 1.0, "b"),
      Marker(10, 1.0, "c"),
      Marker(20, 2.0, "d"),
    ]
  }

  #[test]
  pub fn insert_sorted_places_after_equal_ticks() {
    let mut events = markers();
    let index = insert_sorted(&mut events, Marker(10, 1.0, "new"));
    assert_eq!(index, 3);
    assert_eq!(events[3].2, "new");
    assert_eq!(events[4].2, "d");
  }

  #[test]
  pub fn insert_sorted_into_empty() {
    let mut events = Vec::new();
    assert_eq!(insert_sorted(&mut events, Marker(5, 0.0, "x")), 0);
    assert_eq!(insert_sorted(&mut events, Marker(1, 0.0, "y")), 0);
    assert_eq!(events[1].2, "x");
  }

  #[test]
  pub fn bounds_by_ticks() {
    let events = markers();
    assert_eq!(lower_bound_by_ticks(&events, TicksTime::new(10)), 1);
    assert_eq!(upper_bound_by_ticks(&events, TicksTime::new(10)), 3);
    assert_eq!(lower_bound_by_ticks(&events, TicksTime::new(25)), 4);
    assert_eq!(upper_bound_by_ticks(&events, TicksTime::zero()), 1);
  }

  #[test]
  pub fn bounds_by_time() {
    let events = markers();
    assert_eq!(lower_bound_by_time(&events, 1.0), 1);
    assert_eq!(upper_bound_by_time(&events, 1.0), 3);
    assert_eq!(lower_bound_by_time(&events, 1.5), 3);
  }

  #[test]
  pub fn last_at_or_before_ticks() {
    let events = markers();
    assert_eq!(last_at_or_before(&events, TicksTime::new(15)).map(|e| e.2), Some("c"));
    assert_eq!(last_at_or_before(&events, TicksTime::new(0)).map(|e| e.2), Some("a"));
    assert_eq!(last_at_or_before(&events[1..], TicksTime::new(5)), None);
  }

  #[test]
  pub fn sort_by_ticks_is_stable() {
    let mut events = vec![Marker(10, 0.0, "b"), Marker(0, 0.0, "a"), Marker(10, 0.0, "c")];
    sort_by_ticks(&mut events);
    let names: Vec<&str> = events.iter().map(|e| e.2).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
  }
}
