use log::debug;

use song_engine_core::{
  plugin::{
    Capabilities, Capability, ParameterSchema, Parameters, Plugin, PluginError, PluginId,
    PluginResult,
  },
  song::{
    clip::{notes::Note, Clip},
    track::{instrument::Instrument, TrackId, TrackKind},
    Song, SongError,
  },
  time::{BarsTime, TicksTime},
};

const PROVIDER: &str = "host";

const CHORD_VELOCITY: u8 = 80;
const MAJOR_TRIAD: [u8; 3] = [0, 4, 7];

fn integer_parameter(parameters: &Parameters, name: &str) -> PluginResult<i64> {
  parameters
    .get(name)
    .and_then(|value| value.as_integer())
    .ok_or_else(|| PluginError::Run {
      cause: format!("Missing integer parameter {}", name),
    })
}

fn float_parameter(parameters: &Parameters, name: &str) -> PluginResult<f64> {
  parameters
    .get(name)
    .and_then(|value| value.as_float())
    .ok_or_else(|| PluginError::Run {
      cause: format!("Missing float parameter {}", name),
    })
}

/// Creates a MIDI track holding a major triad per bar
pub struct ChordTrack;

impl Plugin for ChordTrack {
  fn id(&self) -> PluginId {
    PluginId::new(PROVIDER, "chord-track")
  }

  fn capabilities(&self) -> Capabilities {
    Capabilities::new()
      .with(Capability::CreateTrack)
      .with(Capability::EditTrack)
  }

  fn parameter_schema(&self) -> ParameterSchema {
    let mut schema = ParameterSchema::new();
    schema.insert("root".to_string(), toml::Value::String("integer".to_string()));
    schema.insert("bars".to_string(), toml::Value::String("integer".to_string()));
    schema
  }

  fn run(&self, song: &mut Song, parameters: &Parameters) -> PluginResult<()> {
    let root = integer_parameter(parameters, "root")?;
    let bars = integer_parameter(parameters, "bars")?;
    if root < 0 || root > i64::from(u8::max_value()) || bars < 0 {
      return Err(PluginError::Run {
        cause: format!("Invalid chord root {} or bars {}", root, bars),
      });
    }

    let resolution = song.timeline().get_resolution().ok_or_else(|| PluginError::Run {
      cause: "The song has no resolution".to_string(),
    })?;
    let signature = song.timeline().signature_at(TicksTime::zero());
    let bar_length = TicksTime::new(BarsTime::ticks_per_bar(signature, resolution));

    let mut clip = Clip::notes("chords", TicksTime::zero(), TicksTime::zero());
    for bar in 0..bars as u64 {
      let start = TicksTime::new(bar * bar_length.get_ticks());
      for interval in MAJOR_TRIAD.iter() {
        let key = (root as u8).saturating_add(*interval);
        let note = Note::new(key, CHORD_VELOCITY, start, start + bar_length).map_err(SongError::from)?;
        clip.add_note(note);
      }
    }

    let id = song.create_track(TrackKind::Midi, None, None)?;
    let track = song.track_mut(id)?;
    track.set_name("chords");
    track.set_instrument(Some(Instrument::new(0, false)));
    track.add_clip(clip);

    debug!("Created chord track {} with {} bars", id, bars);
    Ok(())
  }
}

/// Scales the volume of every track
pub struct Fade;

impl Plugin for Fade {
  fn id(&self) -> PluginId {
    PluginId::new(PROVIDER, "fade")
  }

  fn capabilities(&self) -> Capabilities {
    Capabilities::new().with(Capability::EditTrack)
  }

  fn parameter_schema(&self) -> ParameterSchema {
    let mut schema = ParameterSchema::new();
    schema.insert("gain".to_string(), toml::Value::String("float".to_string()));
    schema
  }

  fn run(&self, song: &mut Song, parameters: &Parameters) -> PluginResult<()> {
    let gain = float_parameter(parameters, "gain")?;
    if !gain.is_finite() || gain < 0.0 {
      return Err(PluginError::Run {
        cause: format!("Invalid gain {}", gain),
      });
    }

    let ids: Vec<TrackId> = song.tracks().iter().map(|track| track.get_id()).collect();
    for id in ids {
      let mixer = song.track_mut(id)?.mixer_mut();
      mixer.volume = (mixer.volume * gain).min(1.0);
    }
    Ok(())
  }
}

#[cfg(test)]
mod test {

  use song_engine_core::{
    config::SongConfig,
    plugin::{run_plugin, PluginError, PluginInstance},
    song::{track::TrackKind, Song},
    time::TicksTime,
  };

  use super::{ChordTrack, Fade};

  fn song() -> Song {
    Song::from_config(&SongConfig::default()).unwrap()
  }

  fn chords(root: i64, bars: i64) -> PluginInstance {
    let mut instance = PluginInstance::new(Box::new(ChordTrack));
    instance.set_parameter("root", root);
    instance.set_parameter("bars", bars);
    instance.set_enabled(true);
    instance
  }

  #[test]
  pub fn chord_track_needs_parameters_and_enabling() {
    let mut instance = PluginInstance::new(Box::new(ChordTrack));
    assert!(!instance.is_enabled());
    instance.set_parameter("root", 60i64);
    instance.set_parameter("bars", 1i64);
    assert!(!instance.is_enabled());
    instance.set_enabled(true);
    assert!(instance.is_enabled());
  }

  #[test]
  pub fn chord_track_adds_a_triad_per_bar() {
    let mut song = song();
    let mut instance = chords(60, 2);
    let report = run_plugin(&mut song, &mut instance).unwrap();
    assert_eq!(report.created_tracks.len(), 1);

    let track = song.track(report.created_tracks[0]).unwrap();
    assert_eq!(track.get_kind(), TrackKind::Midi);
    assert_eq!(track.get_name(), "chords");

    let clip = &track.clips()[0];
    assert_eq!(clip.get_end(), TicksTime::new(2 * 1920));
    let keys: Vec<u8> = clip.audible_notes().map(|note| note.get_key()).collect();
    assert_eq!(keys, vec![60, 64, 67, 60, 64, 67]);
  }

  #[test]
  pub fn chord_track_rejects_out_of_range_keys() {
    let mut song = song();
    let mut instance = chords(126, 1);
    assert!(run_plugin(&mut song, &mut instance).is_err());
    assert!(song.context().is_none());
  }

  #[test]
  pub fn fade_scales_volumes() {
    let mut song = song();
    let mut chords = chords(48, 1);
    let report = run_plugin(&mut song, &mut chords).unwrap();

    let mut fade = PluginInstance::new(Box::new(Fade));
    fade.set_parameter("gain", 0.5);
    assert!(fade.is_enabled());
    run_plugin(&mut song, &mut fade).unwrap();

    let track = song.track(report.created_tracks[0]).unwrap();
    assert_eq!(track.mixer().volume, 0.5);
  }

  #[test]
  pub fn fade_without_gain_fails() {
    let mut song = song();
    let mut fade = PluginInstance::new(Box::new(Fade));
    match run_plugin(&mut song, &mut fade) {
      Err(PluginError::Run { .. }) => (),
      other => panic!("unexpected result: {:?}", other),
    }
  }
}
