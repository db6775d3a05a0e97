use std::cmp::Ordering;

use log::debug;

use crate::pool::TrackIdPool;
use crate::song::{track::TrackId, SongError, SongResult};

use super::{Capabilities, Capability, PluginId};

/// State of one plugin run attached to a song.
///
/// Track identifiers come from the plugin instance pool: the n-th track
/// created in a run gets the n-th pooled identifier, minted on first use.
#[derive(Debug)]
pub struct ExecutionContext {
  plugin: PluginId,
  capabilities: Capabilities,
  track_ids: TrackIdPool,
  created_tracks: usize,
}

impl ExecutionContext {
  pub(crate) fn new(
    plugin: PluginId,
    capabilities: Capabilities,
    track_ids: TrackIdPool,
  ) -> ExecutionContext {
    ExecutionContext {
      plugin,
      capabilities,
      track_ids,
      created_tracks: 0,
    }
  }

  pub fn get_plugin(&self) -> &PluginId {
    &self.plugin
  }

  pub fn has_capability(&self, capability: Capability) -> bool {
    self.capabilities.contains(capability)
  }

  pub fn created_tracks(&self) -> usize {
    self.created_tracks
  }

  /// Identifier for the next track created in this run, without consuming it.
  /// It is minted into the pool when the cursor reaches the end of the pool.
  pub(crate) fn peek_track_id(&mut self) -> SongResult<TrackId> {
    let pooled = self.track_ids.len();
    match self.created_tracks.cmp(&pooled) {
      Ordering::Equal => {
        let id = self.track_ids.alloc();
        debug!("Minted track id {} for {}", id, self.plugin);
        Ok(id)
      }
      Ordering::Less => self
        .track_ids
        .get(self.created_tracks)
        .ok_or(SongError::IdPoolDesync {
          created: self.created_tracks,
          pooled,
        }),
      Ordering::Greater => Err(SongError::IdPoolDesync {
        created: self.created_tracks,
        pooled,
      }),
    }
  }

  /// Move the cursor past the identifier returned by `peek_track_id`
  pub(crate) fn commit_track_id(&mut self) {
    self.created_tracks += 1;
  }

  pub fn into_track_ids(self) -> TrackIdPool {
    self.track_ids
  }
}
