use failure::Fail;
use log::debug;

use super::{
  events::{self, TimedEvent},
  BarsTime, Resolution, Seconds, Signature, SignatureChange, Tempo, TempoChange, TicksTime,
};

#[derive(Debug, Fail, PartialEq)]
pub enum TimelineError {
  #[fail(display = "Invalid resolution: {}", resolution)]
  InvalidResolution { resolution: Resolution },

  #[fail(display = "The resolution must be set before creating tempo changes")]
  ResolutionUnset,

  #[fail(display = "The resolution can not change once tempo changes exist")]
  ResolutionFrozen,

  #[fail(display = "The first tempo change must be at tick 0, but found {}", ticks)]
  FirstTempoNotAtZero { ticks: TicksTime },

  #[fail(display = "Can not overwrite the tempo changes with an empty sequence")]
  EmptyTempoOverwrite,

  #[fail(display = "Invalid tempo: {} bpm", bpm)]
  InvalidTempo { bpm: f64 },

  #[fail(display = "Invalid time signature: {}/{}", num_beats, note_value)]
  InvalidSignature { num_beats: u8, note_value: u8 },

  #[fail(display = "Tempo change not found: {}", index)]
  TempoNotFound { index: usize },
}

pub type TimelineResult<T> = Result<T, TimelineError>;

/// Tick position to seconds, using `changes` as the tempo map.
///
/// The base is the last change strictly before `ticks`, or the first change
/// when there is none.
fn ticks_to_seconds_in(changes: &[TempoChange], resolution: Resolution, ticks: TicksTime) -> Seconds {
  if ticks.is_zero() {
    return 0.0;
  }

  let base = match events::lower_bound_by_ticks(changes, ticks) {
    0 => changes.first(),
    index => changes.get(index - 1),
  };

  match base {
    Some(base) => {
      let elapsed = ticks - base.get_ticks();
      base.get_time() + elapsed.to_seconds(base.get_tempo(), resolution)
    }
    None => ticks.to_seconds(Tempo::default(), resolution),
  }
}

/// Tempo and time signature maps of a song, with the resolution they are
/// expressed in.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
  resolution: Option<Resolution>,
  tempo_changes: Vec<TempoChange>,
  signature_changes: Vec<SignatureChange>,
}

impl Timeline {
  pub fn new() -> Timeline {
    Timeline::default()
  }

  pub fn with_resolution(resolution: Resolution) -> TimelineResult<Timeline> {
    let mut timeline = Timeline::new();
    timeline.set_resolution(resolution)?;
    Ok(timeline)
  }

  pub fn get_resolution(&self) -> Option<Resolution> {
    self.resolution
  }

  pub fn set_resolution(&mut self, resolution: Resolution) -> TimelineResult<()> {
    if resolution == 0 {
      return Err(TimelineError::InvalidResolution { resolution });
    }
    if !self.tempo_changes.is_empty() && self.resolution != Some(resolution) {
      return Err(TimelineError::ResolutionFrozen);
    }
    self.resolution = Some(resolution);
    Ok(())
  }

  fn require_resolution(&self) -> TimelineResult<Resolution> {
    self.resolution.ok_or(TimelineError::ResolutionUnset)
  }

  pub fn tempo_changes(&self) -> &[TempoChange] {
    &self.tempo_changes
  }

  pub fn signature_changes(&self) -> &[SignatureChange] {
    &self.signature_changes
  }

  /// Insert a tempo change and return its index.
  ///
  /// Its time is derived from the changes existing before the insertion.
  /// A change at an existing tick is placed after the existing ones.
  pub fn create_tempo_change(&mut self, ticks: TicksTime, tempo: Tempo) -> TimelineResult<usize> {
    let resolution = self.require_resolution()?;
    if !tempo.is_valid() {
      return Err(TimelineError::InvalidTempo {
        bpm: tempo.get_value(),
      });
    }
    if self.tempo_changes.is_empty() && !ticks.is_zero() {
      return Err(TimelineError::FirstTempoNotAtZero { ticks });
    }

    let time = ticks_to_seconds_in(&self.tempo_changes, resolution, ticks);
    let index = events::insert_sorted(
      &mut self.tempo_changes,
      TempoChange::with_time(ticks, tempo, time),
    );
    debug!(
      "Tempo change created at {} ({:.3}s): {} bpm",
      ticks,
      time,
      tempo.get_value()
    );

    self.rederive_tempo_times();
    Ok(index)
  }

  /// Replace every tempo change.
  ///
  /// The earliest change must be at tick 0, it becomes the canonical change
  /// at time 0 and the rest are inserted one by one.
  pub fn overwrite_tempo_changes(&mut self, changes: Vec<TempoChange>) -> TimelineResult<()> {
    let resolution = self.require_resolution()?;
    let mut changes = changes;
    events::sort_by_ticks(&mut changes);

    let first = match changes.first() {
      Some(first) => *first,
      None => return Err(TimelineError::EmptyTempoOverwrite),
    };
    if !first.get_ticks().is_zero() {
      return Err(TimelineError::FirstTempoNotAtZero {
        ticks: first.get_ticks(),
      });
    }
    if let Some(invalid) = changes.iter().find(|change| !change.get_tempo().is_valid()) {
      return Err(TimelineError::InvalidTempo {
        bpm: invalid.get_tempo().get_value(),
      });
    }

    debug!(
      "Overwriting {} tempo changes with {} at resolution {}",
      self.tempo_changes.len(),
      changes.len(),
      resolution
    );

    self.tempo_changes.clear();
    self
      .tempo_changes
      .push(TempoChange::with_time(TicksTime::zero(), first.get_tempo(), 0.0));

    for change in changes.iter().skip(1) {
      self.create_tempo_change(change.get_ticks(), change.get_tempo())?;
    }
    Ok(())
  }

  pub fn update_tempo(&mut self, index: usize, tempo: Tempo) -> TimelineResult<()> {
    if !tempo.is_valid() {
      return Err(TimelineError::InvalidTempo {
        bpm: tempo.get_value(),
      });
    }
    let change = self
      .tempo_changes
      .get_mut(index)
      .ok_or(TimelineError::TempoNotFound { index })?;
    change.set_tempo(tempo);

    self.rederive_tempo_times();
    Ok(())
  }

  /// Recompute the time of every tempo change from the changes preceding it
  fn rederive_tempo_times(&mut self) {
    let resolution = match self.resolution {
      Some(resolution) => resolution,
      None => return,
    };

    events::sort_by_ticks(&mut self.tempo_changes);

    for index in 0..self.tempo_changes.len() {
      let ticks = self.tempo_changes[index].get_ticks();
      let time = ticks_to_seconds_in(&self.tempo_changes[..index], resolution, ticks);
      self.tempo_changes[index].set_time(time);
    }
  }

  /// Seconds from the song start to `ticks`.
  ///
  /// Without tempo changes the default tempo applies, and without a
  /// resolution every position maps to 0.
  pub fn ticks_to_seconds(&self, ticks: TicksTime) -> Seconds {
    match self.resolution {
      Some(resolution) => ticks_to_seconds_in(&self.tempo_changes, resolution, ticks),
      None => 0.0,
    }
  }

  /// Nearest tick for a time in seconds
  pub fn seconds_to_ticks(&self, seconds: Seconds) -> TicksTime {
    let resolution = match self.resolution {
      Some(resolution) => resolution,
      None => return TicksTime::zero(),
    };
    if seconds <= 0.0 {
      return TicksTime::zero();
    }

    let changes = &self.tempo_changes;
    let base = match events::lower_bound_by_time(changes, seconds) {
      0 => changes.first(),
      index => changes.get(index - 1),
    };

    let ticks = match base {
      Some(base) => {
        let elapsed = (seconds - base.get_time()).max(0.0);
        base.get_ticks().get_ticks() as f64
          + TicksTime::from_seconds(elapsed, base.get_tempo(), resolution)
      }
      None => TicksTime::from_seconds(seconds, Tempo::default(), resolution),
    };
    TicksTime::new(ticks.round() as u64)
  }

  /// Tempo change in effect at `ticks`
  pub fn tempo_at(&self, ticks: TicksTime) -> Option<&TempoChange> {
    events::last_at_or_before(&self.tempo_changes, ticks).or_else(|| self.tempo_changes.first())
  }

  /// Insert a time signature change and return its index
  pub fn create_signature_change(
    &mut self,
    ticks: TicksTime,
    signature: Signature,
  ) -> TimelineResult<usize> {
    if !signature.is_valid() {
      return Err(TimelineError::InvalidSignature {
        num_beats: signature.get_num_beats(),
        note_value: signature.get_note_value(),
      });
    }
    let index = events::insert_sorted(
      &mut self.signature_changes,
      SignatureChange::new(ticks, signature),
    );
    debug!(
      "Time signature change created at {}: {}/{}",
      ticks,
      signature.get_num_beats(),
      signature.get_note_value()
    );
    Ok(index)
  }

  pub fn overwrite_signature_changes(&mut self, changes: Vec<SignatureChange>) -> TimelineResult<()> {
    if let Some(invalid) = changes.iter().find(|change| !change.get_signature().is_valid()) {
      let signature = invalid.get_signature();
      return Err(TimelineError::InvalidSignature {
        num_beats: signature.get_num_beats(),
        note_value: signature.get_note_value(),
      });
    }
    let mut changes = changes;
    events::sort_by_ticks(&mut changes);
    self.signature_changes = changes;
    Ok(())
  }

  /// Time signature in effect at `ticks`; the first change applies from the start
  pub fn signature_at(&self, ticks: TicksTime) -> Signature {
    events::last_at_or_before(&self.signature_changes, ticks)
      .or_else(|| self.signature_changes.first())
      .map(|change| change.get_signature())
      .unwrap_or_default()
  }

  /// Bars position of `ticks`. A signature change always starts a new bar.
  pub fn bars_at(&self, ticks: TicksTime) -> TimelineResult<BarsTime> {
    let resolution = self.require_resolution()?;

    let mut bars = 0u32;
    let mut segment_start = TicksTime::zero();
    let mut signature = self.signature_at(TicksTime::zero());

    for change in self.signature_changes.iter() {
      if change.ticks() > ticks {
        break;
      }
      if change.ticks() > segment_start {
        let span = u64::from(change.ticks() - segment_start);
        let ticks_per_bar = BarsTime::ticks_per_bar(signature, resolution);
        bars += ((span + ticks_per_bar - 1) / ticks_per_bar) as u32;
        segment_start = change.ticks();
      }
      signature = change.get_signature();
    }

    Ok(BarsTime::from_ticks(ticks - segment_start, signature, resolution).add_bars(bars))
  }
}
