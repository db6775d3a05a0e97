use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info, warn};

use failure::{Error, Fail};

use song_engine_core::{
  config::Config,
  import::{self, source::SourceSong, ImportOptions},
  plugin::{run_plugin, PluginInstance, RunReport},
  song::{track::TrackId, Song},
};

mod config;
use crate::config::{HostConfig, Pipeline};

mod plugins;
use crate::plugins::{ChordTrack, Fade};

const SONG_ENGINE_CONFIG: &str = "SONG_ENGINE_CONFIG";
const DEFAULT_SONG_ENGINE_CONFIG: &str = "song.toml";

const SONG_ENGINE_LOG_CONFIG: &str = "SONG_ENGINE_LOG_CONFIG";
const DEFAULT_SONG_ENGINE_LOG_CONFIG: &str = "log4rs.yaml";

#[derive(Debug, Fail)]
enum MainError {
  #[fail(display = "Failed to init logging: {}", cause)]
  LoggingInit { cause: String },

  #[fail(display = "Failed to import {}: {}", path, cause)]
  Import { path: String, cause: String },
}

fn main() -> Result<(), Error> {
  init_logging()?;

  let (config, host_config) = init_config()?;

  let source = match host_config.pipeline.source.as_ref() {
    Some(path) => Some(init_source(path.as_str())?),
    None => None,
  };

  let mut plugins = init_plugins(&host_config.pipeline);

  // Running the pipeline again on a fresh song reuses the plugin track identifiers
  let (_, first_ids) = render(&config, source.as_ref(), &mut plugins)?;
  let (song, second_ids) = render(&config, source.as_ref(), &mut plugins)?;
  if first_ids != second_ids {
    warn!("Plugin track identifiers changed between renders");
  }

  log_song(&song)?;

  Ok(())
}

fn init_logging() -> Result<(), Error> {
  let log_config_path = std::env::var(SONG_ENGINE_LOG_CONFIG)
    .unwrap_or_else(|_| DEFAULT_SONG_ENGINE_LOG_CONFIG.to_string());

  log4rs::init_file(log_config_path.as_str(), Default::default()).map_err(|err| {
    MainError::LoggingInit {
      cause: err.to_string(),
    }
  })?;

  Ok(())
}

fn init_config() -> Result<(Config, HostConfig), Error> {
  let config_path =
    std::env::var(SONG_ENGINE_CONFIG).unwrap_or_else(|_| DEFAULT_SONG_ENGINE_CONFIG.to_string());

  if !Path::new(config_path.as_str()).exists() {
    warn!("Configuration {} not found, using defaults", config_path);
    return Ok((Config::default(), HostConfig::default()));
  }

  info!("Loading song configuration from {} ...", config_path);
  let config = Config::from_file(config_path.as_str())?;
  let host_config = HostConfig::from_file(config_path.as_str())?;
  debug!("{:#?}", config);
  debug!("{:#?}", host_config);

  Ok((config, host_config))
}

fn init_source(path: &str) -> Result<SourceSong, Error> {
  info!("Reading song data from {} ...", path);

  let mut content = String::new();
  let mut file = File::open(path)?;
  file.read_to_string(&mut content)?;
  let source: SourceSong = toml::from_str(&content).map_err(|err| MainError::Import {
    path: path.to_string(),
    cause: err.to_string(),
  })?;

  Ok(source)
}

fn init_plugins(pipeline: &Pipeline) -> Vec<PluginInstance> {
  let mut chords = PluginInstance::new(Box::new(ChordTrack));
  chords.set_parameter("root", i64::from(pipeline.chord_root));
  chords.set_parameter("bars", i64::from(pipeline.chord_bars));
  chords.set_enabled(true);

  let mut fade = PluginInstance::new(Box::new(Fade));
  fade.set_parameter("gain", pipeline.fade);

  vec![chords, fade]
}

/// Build a song from the configuration, the imported data and the plugins.
/// Returns the song and the tracks created by the plugins.
fn render(
  config: &Config,
  source: Option<&SourceSong>,
  plugins: &mut [PluginInstance],
) -> Result<(Song, Vec<TrackId>), Error> {
  let mut song = Song::from_config(&config.song)?;

  if let Some(source) = source {
    let options = ImportOptions::from(&config.import);
    let imported = import::merge(&mut song, source, &options)?;
    info!("Imported {} tracks", imported.len());
  }

  let mut plugin_tracks = Vec::new();
  for instance in plugins.iter_mut() {
    if !instance.is_enabled() {
      info!("Skipping disabled plugin {}", instance.get_id());
      continue;
    }
    let RunReport {
      plugin,
      created_tracks,
    } = run_plugin(&mut song, instance)?;
    for id in created_tracks.iter() {
      debug!("{} created track {}", plugin, id);
    }
    plugin_tracks.extend(created_tracks);
  }

  Ok((song, plugin_tracks))
}

fn log_song(song: &Song) -> Result<(), Error> {
  let timeline = song.timeline();
  let end = song.last_ticks();

  info!(
    "Song {} ends at {} ({:?}, {:.3}s)",
    song.get_name(),
    end,
    timeline.bars_at(end)?,
    timeline.ticks_to_seconds(end)
  );

  for track in song.tracks() {
    info!(
      "{} {} {:?} [{}] clips={} volume={:.2}",
      track.get_rank(),
      track.get_id(),
      track.get_kind(),
      track.get_name(),
      track.clips().len(),
      track.mixer().volume
    );
  }

  Ok(())
}
