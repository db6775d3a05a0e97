use std::ops::{Deref, DerefMut};

use log::{info, warn};

use crate::song::{track::TrackId, ContextToken, Song, SongError, SongResult};

use super::{ExecutionContext, PluginError, PluginId, PluginInstance, PluginResult};

/// Attaches an execution context for a plugin instance to a song while it
/// lives. Dropping the scope detaches the context and hands the track
/// identifier pool back to the instance, also when the run fails.
pub struct ExecutionScope<'a> {
  song: &'a mut Song,
  instance: &'a mut PluginInstance,
  token: Option<ContextToken>,
}

impl<'a> ExecutionScope<'a> {
  pub fn enter(song: &'a mut Song, instance: &'a mut PluginInstance) -> SongResult<ExecutionScope<'a>> {
    if let Some(attached) = song.context() {
      return Err(SongError::ContextAlreadyAttached {
        plugin: attached.get_plugin().clone(),
      });
    }

    let context = ExecutionContext::new(
      instance.get_id(),
      instance.capabilities(),
      instance.take_track_ids(),
    );
    let token = song.attach_context(context)?;

    Ok(ExecutionScope {
      song,
      instance,
      token: Some(token),
    })
  }

  pub fn created_tracks(&self) -> usize {
    self
      .song
      .context()
      .map(|context| context.created_tracks())
      .unwrap_or(0)
  }

  /// Run the plugin against the song with the instance parameters
  pub fn run(&mut self) -> PluginResult<()> {
    let instance: &PluginInstance = &*self.instance;
    let song: &mut Song = &mut *self.song;
    instance.plugin().run(song, instance.parameters())
  }
}

impl<'a> Deref for ExecutionScope<'a> {
  type Target = Song;

  fn deref(&self) -> &Song {
    &*self.song
  }
}

impl<'a> DerefMut for ExecutionScope<'a> {
  fn deref_mut(&mut self) -> &mut Song {
    &mut *self.song
  }
}

impl<'a> Drop for ExecutionScope<'a> {
  fn drop(&mut self) {
    match self.token.take().and_then(|token| self.song.detach_context(token)) {
      Some(context) => self.instance.restore_track_ids(context.into_track_ids()),
      None => warn!(
        "Execution context for {} was detached before the end of the run",
        self.instance.get_id()
      ),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
  pub plugin: PluginId,
  pub created_tracks: Vec<TrackId>,
}

/// Run an enabled plugin instance against a song within an execution scope
pub fn run_plugin(song: &mut Song, instance: &mut PluginInstance) -> PluginResult<RunReport> {
  let plugin = instance.get_id();
  if !instance.is_enabled() {
    return Err(PluginError::Disabled { plugin });
  }

  info!("Running plugin {} on {}", plugin, song.get_name());

  let created = {
    let mut scope = ExecutionScope::enter(song, instance)?;
    let result = scope.run();
    let created = scope.created_tracks();
    result.map(|_| created)
  }?;

  let created_tracks: Vec<TrackId> = instance
    .track_ids()
    .items()
    .iter()
    .take(created)
    .cloned()
    .collect();

  info!("Plugin {} created {} tracks", plugin, created_tracks.len());

  Ok(RunReport {
    plugin,
    created_tracks,
  })
}
