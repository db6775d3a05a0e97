pub mod clip;
pub mod track;

use std::collections::BTreeSet;

use failure::Fail;
use log::{debug, info};

use crate::config::SongConfig;
use crate::plugin::{Capability, ExecutionContext, PluginId};
use crate::time::{
  Resolution, Signature, SignatureChange, Tempo, TempoChange, TicksTime, Timeline, TimelineError,
};

use self::{
  clip::notes::NoteError,
  track::{Track, TrackId, TrackKind, TrackRank},
};

#[derive(Debug, Fail, PartialEq)]
pub enum SongError {
  #[fail(display = "No privileged context attached, required for {}", capability)]
  NoPrivilegedContext { capability: Capability },

  #[fail(display = "Plugin {} is missing the {} capability", plugin, capability)]
  MissingCapability {
    plugin: PluginId,
    capability: Capability,
  },

  #[fail(display = "An execution context for {} is already attached", plugin)]
  ContextAlreadyAttached { plugin: PluginId },

  #[fail(
    display = "Track identifier pool out of sync: {} tracks created with {} identifiers pooled",
    created, pooled
  )]
  IdPoolDesync { created: usize, pooled: usize },

  #[fail(display = "Track not found: {}", id)]
  TrackNotFound { id: TrackId },

  #[fail(display = "Track already exists: {}", id)]
  DuplicateTrack { id: TrackId },

  #[fail(display = "Track rank already in use: {}", rank)]
  DuplicateRank { rank: TrackRank },

  #[fail(display = "No track ranks left to assign")]
  RanksExhausted,

  #[fail(display = "Invalid note: {}", cause)]
  InvalidNote {
    #[cause]
    cause: NoteError,
  },

  #[fail(display = "Timeline error: {}", cause)]
  Timeline {
    #[cause]
    cause: TimelineError,
  },
}

impl From<TimelineError> for SongError {
  fn from(cause: TimelineError) -> Self {
    SongError::Timeline { cause }
  }
}

impl From<NoteError> for SongError {
  fn from(cause: NoteError) -> Self {
    SongError::InvalidNote { cause }
  }
}

pub type SongResult<T> = Result<T, SongError>;

const FIRST_RANK: u64 = 1;

/// Proof of attaching an execution context, required to detach it again
#[derive(Debug)]
pub(crate) struct ContextToken {
  serial: u64,
}

pub struct Song {
  name: String,

  timeline: Timeline,

  tracks: Vec<Track>,
  next_rank: u64,
  issued_ranks: BTreeSet<TrackRank>,

  context: Option<(u64, ExecutionContext)>,
  context_serial: u64,
}

impl Song {
  pub fn new<T>(name: T) -> Song
  where
    T: Into<String>,
  {
    Song {
      name: name.into(),
      timeline: Timeline::new(),
      tracks: Vec::new(),
      next_rank: FIRST_RANK,
      issued_ranks: BTreeSet::new(),
      context: None,
      context_serial: 0,
    }
  }

  /// Song with the configured resolution, an initial tempo and time signature
  pub fn from_config(config: &SongConfig) -> SongResult<Song> {
    let mut song = Song::new(config.name.as_str());
    song.timeline.set_resolution(config.resolution)?;
    song
      .timeline
      .create_tempo_change(TicksTime::zero(), Tempo::new(config.tempo))?;
    song.timeline.create_signature_change(
      TicksTime::zero(),
      Signature::new(config.signature.num_beats, config.signature.note_value),
    )?;
    Ok(song)
  }

  pub fn set_name<T>(&mut self, name: T)
  where
    T: Into<String>,
  {
    self.name = name.into();
  }

  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn timeline(&self) -> &Timeline {
    &self.timeline
  }

  pub(crate) fn timeline_mut(&mut self) -> &mut Timeline {
    &mut self.timeline
  }

  /// Set the resolution. Once tempo changes exist it can not change.
  pub fn set_resolution(&mut self, resolution: Resolution) -> SongResult<()> {
    self.timeline.set_resolution(resolution)?;
    Ok(())
  }

  pub fn tracks(&self) -> &[Track] {
    &self.tracks
  }

  pub fn track(&self, id: TrackId) -> Option<&Track> {
    self.tracks.iter().find(|track| track.get_id() == id)
  }

  pub fn track_index(&self, id: TrackId) -> Option<usize> {
    self.tracks.iter().position(|track| track.get_id() == id)
  }

  pub fn track_by_rank(&self, rank: TrackRank) -> Option<&Track> {
    self.tracks.iter().find(|track| track.get_rank() == rank)
  }

  /// Largest end tick across every track
  pub fn last_ticks(&self) -> TicksTime {
    self
      .tracks
      .iter()
      .map(|track| track.end_ticks())
      .max()
      .unwrap_or_else(TicksTime::zero)
  }

  pub fn context(&self) -> Option<&ExecutionContext> {
    self.context.as_ref().map(|(_, context)| context)
  }

  pub(crate) fn attach_context(&mut self, context: ExecutionContext) -> SongResult<ContextToken> {
    if let Some((_, attached)) = &self.context {
      return Err(SongError::ContextAlreadyAttached {
        plugin: attached.get_plugin().clone(),
      });
    }
    debug!("Attaching execution context for {}", context.get_plugin());
    self.context_serial += 1;
    self.context = Some((self.context_serial, context));
    Ok(ContextToken {
      serial: self.context_serial,
    })
  }

  /// Detach the context attached with `token`
  pub(crate) fn detach_context(&mut self, token: ContextToken) -> Option<ExecutionContext> {
    match self.context.take() {
      Some((serial, context)) if serial == token.serial => {
        debug!("Detached execution context for {}", context.get_plugin());
        Some(context)
      }
      other => {
        self.context = other;
        None
      }
    }
  }

  fn require(&self, capability: Capability) -> SongResult<()> {
    match &self.context {
      None => Err(SongError::NoPrivilegedContext { capability }),
      Some((_, context)) if !context.has_capability(capability) => {
        Err(SongError::MissingCapability {
          plugin: context.get_plugin().clone(),
          capability,
        })
      }
      Some(_) => Ok(()),
    }
  }

  fn context_mut(&mut self) -> SongResult<&mut ExecutionContext> {
    match &mut self.context {
      Some((_, context)) => Ok(context),
      None => Err(SongError::NoPrivilegedContext {
        capability: Capability::CreateTrack,
      }),
    }
  }

  /// Identifier for the next created track. It is only consumed by `commit_track_id`.
  fn peek_track_id(&mut self) -> SongResult<TrackId> {
    let id = self.context_mut()?.peek_track_id()?;
    if self.track(id).is_some() {
      return Err(SongError::DuplicateTrack { id });
    }
    Ok(id)
  }

  fn commit_track_id(&mut self) -> SongResult<()> {
    self.context_mut()?.commit_track_id();
    Ok(())
  }

  /// Ranks are never handed out twice, even after the track holding one is removed
  fn check_rank(&self, rank: Option<TrackRank>) -> SongResult<()> {
    match rank {
      Some(rank) if self.issued_ranks.contains(&rank) => Err(SongError::DuplicateRank { rank }),
      _ => Ok(()),
    }
  }

  fn next_rank(&self, rank: Option<TrackRank>) -> SongResult<TrackRank> {
    match rank {
      Some(rank) => Ok(rank),
      None if self.next_rank > u64::from(u32::max_value()) => Err(SongError::RanksExhausted),
      None => Ok(TrackRank::new(self.next_rank as u32)),
    }
  }

  /// Fails unless `count` more ranks can be assigned automatically
  pub(crate) fn check_ranks_available(&self, count: usize) -> SongResult<()> {
    let last = self.next_rank.saturating_add(count as u64);
    if count > 0 && last - 1 > u64::from(u32::max_value()) {
      return Err(SongError::RanksExhausted);
    }
    Ok(())
  }

  fn issue_rank(&mut self, rank: TrackRank) {
    self.issued_ranks.insert(rank);
    self.next_rank = self.next_rank.max(u64::from(rank.get_value()) + 1);
  }

  fn insert_at(&mut self, index: Option<usize>, track: Track) -> &mut Track {
    let index = index
      .unwrap_or_else(|| self.tracks.len())
      .min(self.tracks.len());
    self.tracks.insert(index, track);
    &mut self.tracks[index]
  }

  /// Create a track outside of any plugin run, used by the importer
  pub(crate) fn insert_track(
    &mut self,
    id: TrackId,
    kind: TrackKind,
    index: Option<usize>,
    rank: Option<TrackRank>,
  ) -> SongResult<&mut Track> {
    if self.track(id).is_some() {
      return Err(SongError::DuplicateTrack { id });
    }
    self.check_rank(rank)?;
    let rank = self.next_rank(rank)?;
    self.issue_rank(rank);
    debug!("Creating {:?} track {} with rank {}", kind, id, rank);
    Ok(self.insert_at(index, Track::new(id, kind, rank)))
  }

  /// Create a track at `index` (appended by default).
  /// Without an explicit rank the next one is assigned.
  pub fn create_track(
    &mut self,
    kind: TrackKind,
    index: Option<usize>,
    rank: Option<TrackRank>,
  ) -> SongResult<TrackId> {
    self.require(Capability::CreateTrack)?;
    self.check_rank(rank)?;
    self.next_rank(rank)?;
    let id = self.peek_track_id()?;
    self.insert_track(id, kind, index, rank)?;
    self.commit_track_id()?;
    Ok(id)
  }

  pub fn remove_track(&mut self, id: TrackId) -> SongResult<Track> {
    self.require(Capability::RemoveTrack)?;
    let index = self
      .track_index(id)
      .ok_or(SongError::TrackNotFound { id })?;
    info!("Removing track {}", id);
    Ok(self.tracks.remove(index))
  }

  /// Deep copy of a track from any song, inserted at `index` (appended by default)
  pub fn clone_track(&mut self, source: &Track, index: Option<usize>) -> SongResult<TrackId> {
    self.require(Capability::CreateTrack)?;
    let rank = self.next_rank(None)?;
    let id = self.peek_track_id()?;
    self.issue_rank(rank);
    self.commit_track_id()?;
    debug!("Cloning track {} into {} with rank {}", source.get_id(), id, rank);
    self.insert_at(index, source.duplicate(id, rank));
    Ok(id)
  }

  /// Clone a track of this song right after the original
  pub fn duplicate_track(&mut self, id: TrackId) -> SongResult<TrackId> {
    self.require(Capability::CreateTrack)?;
    let index = self
      .track_index(id)
      .ok_or(SongError::TrackNotFound { id })?;
    let rank = self.next_rank(None)?;
    let new_id = self.peek_track_id()?;
    self.issue_rank(rank);
    self.commit_track_id()?;
    let copy = self.tracks[index].duplicate(new_id, rank);
    self.tracks.insert(index + 1, copy);
    Ok(new_id)
  }

  pub fn move_track(&mut self, id: TrackId, index: usize) -> SongResult<()> {
    self.require(Capability::EditTrack)?;
    let from = self
      .track_index(id)
      .ok_or(SongError::TrackNotFound { id })?;
    let track = self.tracks.remove(from);
    let index = index.min(self.tracks.len());
    self.tracks.insert(index, track);
    Ok(())
  }

  pub fn track_mut(&mut self, id: TrackId) -> SongResult<&mut Track> {
    self.require(Capability::EditTrack)?;
    self
      .tracks
      .iter_mut()
      .find(|track| track.get_id() == id)
      .ok_or(SongError::TrackNotFound { id })
  }

  pub fn create_tempo_change(&mut self, ticks: TicksTime, tempo: Tempo) -> SongResult<usize> {
    self.require(Capability::EditTempo)?;
    Ok(self.timeline.create_tempo_change(ticks, tempo)?)
  }

  pub fn overwrite_tempo_changes(&mut self, changes: Vec<TempoChange>) -> SongResult<()> {
    self.require(Capability::EditTempo)?;
    Ok(self.timeline.overwrite_tempo_changes(changes)?)
  }

  pub fn update_tempo(&mut self, index: usize, tempo: Tempo) -> SongResult<()> {
    self.require(Capability::EditTempo)?;
    Ok(self.timeline.update_tempo(index, tempo)?)
  }

  pub fn create_signature_change(
    &mut self,
    ticks: TicksTime,
    signature: Signature,
  ) -> SongResult<usize> {
    self.require(Capability::EditTimeSignature)?;
    Ok(self.timeline.create_signature_change(ticks, signature)?)
  }

  pub fn overwrite_signature_changes(&mut self, changes: Vec<SignatureChange>) -> SongResult<()> {
    self.require(Capability::EditTimeSignature)?;
    Ok(self.timeline.overwrite_signature_changes(changes)?)
  }
}
