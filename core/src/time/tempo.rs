use super::{events::TimedEvent, Seconds, TicksTime};

pub const DEFAULT_TEMPO: f64 = 120.0;

///! Tempo in beats per minute
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Tempo(f64);

impl Tempo {
  pub fn new(value: f64) -> Tempo {
    Tempo(value)
  }

  pub fn get_value(&self) -> f64 {
    self.0
  }

  pub fn is_valid(&self) -> bool {
    self.0.is_finite() && self.0 > 0.0
  }
}

impl Default for Tempo {
  fn default() -> Self {
    Tempo(DEFAULT_TEMPO)
  }
}

impl From<Tempo> for f64 {
  fn from(item: Tempo) -> Self {
    item.0
  }
}

/// A tempo change. The absolute time is derived by the timeline from every
/// change preceding it and cannot be set from outside the crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoChange {
  ticks: TicksTime,
  tempo: Tempo,
  time: Seconds,
}

impl TempoChange {
  pub fn new(ticks: TicksTime, tempo: Tempo) -> TempoChange {
    TempoChange {
      ticks,
      tempo,
      time: 0.0,
    }
  }

  pub(crate) fn with_time(ticks: TicksTime, tempo: Tempo, time: Seconds) -> TempoChange {
    TempoChange { ticks, tempo, time }
  }

  pub fn get_ticks(&self) -> TicksTime {
    self.ticks
  }

  pub fn get_tempo(&self) -> Tempo {
    self.tempo
  }

  pub fn get_time(&self) -> Seconds {
    self.time
  }

  pub(crate) fn set_tempo(&mut self, tempo: Tempo) {
    self.tempo = tempo;
  }

  pub(crate) fn set_time(&mut self, time: Seconds) {
    self.time = time;
  }
}

impl TimedEvent for TempoChange {
  fn ticks(&self) -> TicksTime {
    self.ticks
  }

  fn time(&self) -> Option<Seconds> {
    Some(self.time)
  }
}
