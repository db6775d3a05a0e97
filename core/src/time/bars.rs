use std::fmt;

use super::{Resolution, Signature, TicksTime};

/// Position in bars, beats and ticks, all zero based
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct BarsTime {
  bars: u32,
  beats: u32,
  ticks: u32,
}

impl BarsTime {
  pub fn new(bars: u32, beats: u32, ticks: u32) -> BarsTime {
    BarsTime { bars, beats, ticks }
  }

  pub fn ticks_per_beat(signature: Signature, resolution: Resolution) -> u64 {
    let note_value = u64::from(signature.get_note_value().max(1));
    (u64::from(resolution) * 4 / note_value).max(1)
  }

  pub fn ticks_per_bar(signature: Signature, resolution: Resolution) -> u64 {
    Self::ticks_per_beat(signature, resolution) * u64::from(signature.get_num_beats().max(1))
  }

  pub fn from_ticks(ticks_time: TicksTime, signature: Signature, resolution: Resolution) -> BarsTime {
    let num_ticks = u64::from(ticks_time);
    let ticks_per_beat = Self::ticks_per_beat(signature, resolution);
    let total_beats = num_ticks / ticks_per_beat;
    let num_beats = u64::from(signature.get_num_beats().max(1));
    BarsTime {
      bars: (total_beats / num_beats) as u32,
      beats: (total_beats % num_beats) as u32,
      ticks: (num_ticks % ticks_per_beat) as u32,
    }
  }

  pub fn get_bars(&self) -> u32 {
    self.bars
  }

  pub fn get_beats(&self) -> u32 {
    self.beats
  }

  pub fn get_ticks(&self) -> u32 {
    self.ticks
  }

  pub fn to_ticks(&self, signature: Signature, resolution: Resolution) -> TicksTime {
    let ticks_per_beat = Self::ticks_per_beat(signature, resolution);
    let ticks_per_bar = Self::ticks_per_bar(signature, resolution);
    TicksTime::new(
      u64::from(self.bars) * ticks_per_bar
        + u64::from(self.beats) * ticks_per_beat
        + u64::from(self.ticks),
    )
  }

  pub(crate) fn add_bars(self, bars: u32) -> BarsTime {
    BarsTime {
      bars: self.bars + bars,
      ..self
    }
  }
}

impl fmt::Debug for BarsTime {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:05}:{:02}:{:03}", self.bars + 1, self.beats + 1, self.ticks)
  }
}
