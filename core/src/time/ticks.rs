use std::{
  cmp::{min, Ordering},
  fmt,
  ops::{Add, AddAssign, Sub, SubAssign},
};

use super::{Resolution, Seconds, Tempo};

const SECONDS_PER_MINUTE: f64 = 60.0;

///! Musical time measured in ticks at the song resolution
#[derive(Debug, Eq, Copy, Clone, Hash, Default)]
pub struct TicksTime(u64);

impl TicksTime {
  pub fn new(ticks: u64) -> TicksTime {
    TicksTime(ticks)
  }

  pub fn zero() -> TicksTime {
    TicksTime(0)
  }

  pub fn get_ticks(&self) -> u64 {
    self.0
  }

  pub fn is_zero(&self) -> bool {
    self.0 == 0
  }

  pub fn per_second(tempo: Tempo, resolution: Resolution) -> f64 {
    tempo.get_value() * f64::from(resolution) / SECONDS_PER_MINUTE
  }

  /// Duration of these ticks at a constant tempo
  pub fn to_seconds(&self, tempo: Tempo, resolution: Resolution) -> Seconds {
    self.0 as f64 / Self::per_second(tempo, resolution)
  }

  /// Ticks elapsed in `seconds` at a constant tempo, without rounding
  pub fn from_seconds(seconds: Seconds, tempo: Tempo, resolution: Resolution) -> f64 {
    seconds * Self::per_second(tempo, resolution)
  }

  pub fn saturating_add(&self, rhs: TicksTime) -> TicksTime {
    TicksTime(self.0.saturating_add(rhs.0))
  }

  /// Rescale a tick position by `factor`, rounding to the nearest tick
  pub fn rescale(&self, factor: f64) -> TicksTime {
    TicksTime((self.0 as f64 * factor).round() as u64)
  }
}

impl Ord for TicksTime {
  fn cmp(&self, other: &TicksTime) -> Ordering {
    self.0.cmp(&other.0)
  }
}

impl PartialOrd for TicksTime {
  fn partial_cmp(&self, other: &TicksTime) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl PartialEq for TicksTime {
  fn eq(&self, other: &TicksTime) -> bool {
    self.0 == other.0
  }
}

impl Add for TicksTime {
  type Output = TicksTime;
  fn add(self, rhs: TicksTime) -> Self {
    TicksTime::new(self.0 + rhs.0)
  }
}

impl AddAssign for TicksTime {
  fn add_assign(&mut self, rhs: TicksTime) {
    *self = *self + rhs;
  }
}

impl Sub for TicksTime {
  type Output = TicksTime;
  fn sub(self, rhs: TicksTime) -> Self {
    TicksTime::new(self.0 - min(self.0, rhs.0))
  }
}

impl SubAssign for TicksTime {
  fn sub_assign(&mut self, rhs: TicksTime) {
    *self = *self - rhs;
  }
}

impl From<u64> for TicksTime {
  fn from(item: u64) -> Self {
    TicksTime(item)
  }
}

impl From<TicksTime> for f64 {
  fn from(item: TicksTime) -> Self {
    item.0 as f64
  }
}

impl From<TicksTime> for u64 {
  fn from(item: TicksTime) -> Self {
    item.0
  }
}

impl fmt::Display for TicksTime {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}t", self.0)
  }
}
