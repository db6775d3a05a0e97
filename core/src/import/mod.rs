pub mod source;

use failure::Fail;
use log::{debug, info, warn};

use crate::config::ImportConfig;
use crate::song::{
  clip::{
    notes::{Note, MAX_KEY, MAX_VELOCITY},
    Clip,
  },
  track::{
    automation::{Automation, AutomationTarget},
    instrument::Instrument,
    TrackId, TrackKind,
  },
  Song, SongError,
};
use crate::time::{
  Resolution, Signature, SignatureChange, Tempo, TempoChange, TicksTime, Timeline, TimelineError,
};

use self::source::{SourceSong, SourceTrack};

#[derive(Debug, Fail, PartialEq)]
pub enum ImportError {
  #[fail(display = "Invalid source resolution: {}", resolution)]
  InvalidResolution { resolution: Resolution },

  #[fail(display = "Song error: {}", cause)]
  Song {
    #[cause]
    cause: SongError,
  },
}

impl From<SongError> for ImportError {
  fn from(cause: SongError) -> Self {
    ImportError::Song { cause }
  }
}

impl From<TimelineError> for ImportError {
  fn from(cause: TimelineError) -> Self {
    ImportError::Song {
      cause: SongError::from(cause),
    }
  }
}

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportOptions {
  /// Where the imported material starts, in song ticks
  pub offset: TicksTime,
  /// Replace the song tempo and time signature changes with the imported ones
  pub overwrite_timeline: bool,
}

impl Default for ImportOptions {
  fn default() -> ImportOptions {
    ImportOptions {
      offset: TicksTime::zero(),
      overwrite_timeline: true,
    }
  }
}

impl<'a> From<&'a ImportConfig> for ImportOptions {
  fn from(config: &'a ImportConfig) -> Self {
    ImportOptions {
      offset: TicksTime::new(config.offset),
      overwrite_timeline: config.overwrite_timeline,
    }
  }
}

/// Maps source ticks into song ticks
#[derive(Debug, Clone, Copy)]
struct TickMapper {
  factor: f64,
  offset: TicksTime,
}

impl TickMapper {
  fn new(source: Resolution, destination: Resolution, offset: TicksTime) -> TickMapper {
    TickMapper {
      factor: f64::from(destination) / f64::from(source),
      offset,
    }
  }

  fn map(&self, ticks: u64) -> TicksTime {
    TicksTime::new(ticks).rescale(self.factor).saturating_add(self.offset)
  }
}

fn velocity_from_unit(velocity: f64) -> u8 {
  let velocity = if velocity.is_finite() { velocity } else { 0.0 };
  (velocity.max(0.0).min(1.0) * f64::from(MAX_VELOCITY)).round() as u8
}

/// Track contents decoded from the source, not yet part of the song
struct ImportedTrack {
  name: String,
  instrument: Instrument,
  clip: Clip,
  automation: Automation,
}

/// Merge decoded song data into `song`, returns the created tracks.
///
/// Without a resolution the song adopts the source one.
/// The song is left untouched when the import fails.
pub fn merge(song: &mut Song, source: &SourceSong, options: &ImportOptions) -> ImportResult<Vec<TrackId>> {
  if source.resolution == 0 {
    return Err(ImportError::InvalidResolution {
      resolution: source.resolution,
    });
  }

  let mut timeline = song.timeline().clone();
  let resolution = match timeline.get_resolution() {
    Some(resolution) => resolution,
    None => {
      timeline.set_resolution(source.resolution)?;
      source.resolution
    }
  };
  let mapper = TickMapper::new(source.resolution, resolution, options.offset);

  info!(
    "Importing {} tracks at resolution {} into {} at {} (offset {})",
    source.tracks.len(),
    source.resolution,
    song.get_name(),
    resolution,
    options.offset
  );

  if options.overwrite_timeline {
    import_timeline(&mut timeline, source, &mapper)?;
  }

  let tracks = source
    .tracks
    .iter()
    .map(|source_track| import_track(source_track, &mapper))
    .collect::<ImportResult<Vec<ImportedTrack>>>()?;
  song.check_ranks_available(tracks.len())?;

  *song.timeline_mut() = timeline;

  let mut track_ids = Vec::with_capacity(tracks.len());
  for imported in tracks {
    let id = TrackId::new_random();
    let track = song.insert_track(id, TrackKind::Midi, None, None)?;
    track.set_name(imported.name);
    track.set_instrument(Some(imported.instrument));
    *track.automation_mut() = imported.automation;
    track.add_clip(imported.clip);
    track_ids.push(id);
  }
  Ok(track_ids)
}

fn import_timeline(timeline: &mut Timeline, source: &SourceSong, mapper: &TickMapper) -> ImportResult<()> {
  let signatures = source
    .signatures
    .iter()
    .map(|signature| {
      SignatureChange::new(
        mapper.map(signature.ticks),
        Signature::new(signature.numerator, signature.denominator),
      )
    })
    .collect();
  timeline.overwrite_signature_changes(signatures)?;

  let mut tempos = Vec::with_capacity(source.tempos.len() + 1);
  if !mapper.offset.is_zero() {
    tempos.push(TempoChange::new(TicksTime::zero(), Tempo::default()));
  }
  tempos.extend(
    source
      .tempos
      .iter()
      .map(|tempo| TempoChange::new(mapper.map(tempo.ticks), Tempo::new(tempo.bpm))),
  );
  if !tempos.is_empty() {
    timeline.overwrite_tempo_changes(tempos)?;
  }
  Ok(())
}

fn import_track(source: &SourceTrack, mapper: &TickMapper) -> ImportResult<ImportedTrack> {
  let mut clip = Clip::notes(source.name.as_str(), mapper.offset, mapper.offset);
  for source_note in source.notes.iter() {
    if source_note.pitch > MAX_KEY {
      warn!(
        "Dropping note with pitch {} at {} from {}",
        source_note.pitch, source_note.ticks, source.name
      );
      continue;
    }
    let start = mapper.map(source_note.ticks);
    let end = mapper
      .map(source_note.ticks.saturating_add(source_note.duration))
      .max(start.saturating_add(TicksTime::new(1)));
    if end <= start {
      warn!(
        "Dropping note at {} from {}, it ends past the last tick",
        source_note.ticks, source.name
      );
      continue;
    }
    let note = Note::new(
      source_note.pitch,
      velocity_from_unit(source_note.velocity),
      start,
      end,
    )
    .map_err(SongError::from)?;
    clip.add_note(note);
  }

  let mut automation = Automation::new();
  for change in source.control_changes.iter() {
    match AutomationTarget::from_controller(change.controller) {
      Some(target) => {
        automation
          .curve_mut(target)
          .add_point(mapper.map(change.ticks), change.value);
      }
      None => debug!(
        "Ignoring controller {} at {} of {}",
        change.controller, change.ticks, source.name
      ),
    }
  }

  if let Some(first_start) = clip.first_note_start() {
    clip.set_start(first_start);
  }

  Ok(ImportedTrack {
    name: source.name.clone(),
    instrument: Instrument::new(source.instrument.program, source.instrument.percussion),
    clip,
    automation,
  })
}
