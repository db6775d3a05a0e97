pub mod audio_plugin;
pub mod automation;
pub mod instrument;

use std::fmt;

use uuid::Uuid;

use crate::song::clip::{Clip, ClipIndex};
use crate::time::TicksTime;

use self::{
  audio_plugin::{AudioPluginId, AudioPluginInstance},
  automation::Automation,
  instrument::Instrument,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(Uuid);

impl TrackId {
  pub fn new_random() -> TrackId {
    TrackId(Uuid::new_v4())
  }

  pub fn get_uuid(&self) -> &Uuid {
    &self.0
  }
}

impl From<Uuid> for TrackId {
  fn from(item: Uuid) -> Self {
    TrackId(item)
  }
}

impl fmt::Display for TrackId {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Human visible track number, unique within a song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackRank(u32);

impl TrackRank {
  pub fn new(rank: u32) -> TrackRank {
    TrackRank(rank)
  }

  pub fn get_value(&self) -> u32 {
    self.0
  }
}

impl fmt::Display for TrackRank {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
  Midi,
  Audio,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mixer {
  pub volume: f64,
  pub pan: f64,
  pub solo: bool,
  pub mute: bool,
}

impl Default for Mixer {
  fn default() -> Mixer {
    Mixer {
      volume: 1.0,
      pan: 0.0,
      solo: false,
      mute: false,
    }
  }
}

#[derive(Debug)]
pub struct Track {
  id: TrackId,
  kind: TrackKind,
  name: String,
  rank: TrackRank,

  mixer: Mixer,

  instrument: Option<Instrument>,
  suggested_instruments: Vec<Instrument>,
  sampler: Option<AudioPluginInstance>,
  audio_plugins: Vec<AudioPluginInstance>,

  automation: Automation,

  clips: Vec<Clip>,
}

impl Track {
  pub(crate) fn new(id: TrackId, kind: TrackKind, rank: TrackRank) -> Track {
    Track {
      id,
      kind,
      name: String::new(),
      rank,
      mixer: Mixer::default(),
      instrument: None,
      suggested_instruments: Vec::new(),
      sampler: None,
      audio_plugins: Vec::new(),
      automation: Automation::new(),
      clips: Vec::new(),
    }
  }

  /// Deep copy under a new identity. Plugins get fresh local identifiers.
  pub(crate) fn duplicate(&self, id: TrackId, rank: TrackRank) -> Track {
    Track {
      id,
      kind: self.kind,
      name: self.name.clone(),
      rank,
      mixer: self.mixer,
      instrument: self.instrument,
      suggested_instruments: self.suggested_instruments.clone(),
      sampler: self.sampler.as_ref().map(|sampler| sampler.duplicate()),
      audio_plugins: self
        .audio_plugins
        .iter()
        .map(|plugin| plugin.duplicate())
        .collect(),
      automation: self.automation.clone(),
      clips: self.clips.clone(),
    }
  }

  pub fn get_id(&self) -> TrackId {
    self.id
  }

  pub fn get_kind(&self) -> TrackKind {
    self.kind
  }

  pub fn get_rank(&self) -> TrackRank {
    self.rank
  }

  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn set_name<T>(&mut self, name: T)
  where
    T: Into<String>,
  {
    self.name = name.into();
  }

  pub fn mixer(&self) -> &Mixer {
    &self.mixer
  }

  pub fn mixer_mut(&mut self) -> &mut Mixer {
    &mut self.mixer
  }

  pub fn get_instrument(&self) -> Option<Instrument> {
    self.instrument
  }

  /// Only MIDI tracks carry an instrument, returns false otherwise
  pub fn set_instrument(&mut self, instrument: Option<Instrument>) -> bool {
    match self.kind {
      TrackKind::Midi => {
        self.instrument = instrument;
        true
      }
      TrackKind::Audio => false,
    }
  }

  pub fn suggested_instruments(&self) -> &[Instrument] {
    &self.suggested_instruments
  }

  pub fn add_suggested_instrument(&mut self, instrument: Instrument) {
    if !self.suggested_instruments.contains(&instrument) {
      self.suggested_instruments.push(instrument);
    }
  }

  pub fn get_sampler(&self) -> Option<&AudioPluginInstance> {
    self.sampler.as_ref()
  }

  pub fn set_sampler(&mut self, sampler: Option<AudioPluginInstance>) {
    self.sampler = sampler;
  }

  pub fn audio_plugins(&self) -> &[AudioPluginInstance] {
    &self.audio_plugins
  }

  pub fn add_audio_plugin(&mut self, plugin: AudioPluginInstance) -> AudioPluginId {
    let id = plugin.get_id();
    self.audio_plugins.push(plugin);
    id
  }

  pub fn audio_plugin_mut(&mut self, id: AudioPluginId) -> Option<&mut AudioPluginInstance> {
    self.audio_plugins.iter_mut().find(|plugin| plugin.get_id() == id)
  }

  pub fn remove_audio_plugin(&mut self, id: AudioPluginId) -> Option<AudioPluginInstance> {
    self
      .audio_plugins
      .iter()
      .position(|plugin| plugin.get_id() == id)
      .map(|index| self.audio_plugins.remove(index))
  }

  pub fn automation(&self) -> &Automation {
    &self.automation
  }

  pub fn automation_mut(&mut self) -> &mut Automation {
    &mut self.automation
  }

  pub fn clips(&self) -> &[Clip] {
    &self.clips
  }

  /// Edit a clip in place, moving it to keep the clips ordered by start.
  /// Returns the index of the clip after the edit.
  pub fn edit_clip<F>(&mut self, index: ClipIndex, edit: F) -> Option<ClipIndex>
  where
    F: FnOnce(&mut Clip),
  {
    let mut clip = self.remove_clip(index)?;
    edit(&mut clip);
    Some(self.add_clip(clip))
  }

  /// Add a clip keeping the clips ordered by start, returns its index
  pub fn add_clip(&mut self, clip: Clip) -> ClipIndex {
    let index = self
      .clips
      .iter()
      .position(|prev_clip| prev_clip.get_start() > clip.get_start())
      .unwrap_or_else(|| self.clips.len());
    self.clips.insert(index, clip);
    index
  }

  pub fn remove_clip(&mut self, index: ClipIndex) -> Option<Clip> {
    if index < self.clips.len() {
      Some(self.clips.remove(index))
    } else {
      None
    }
  }

  /// Largest clip end, 0 without clips
  pub fn end_ticks(&self) -> TicksTime {
    self
      .clips
      .iter()
      .map(|clip| clip.get_end())
      .max()
      .unwrap_or_else(TicksTime::zero)
  }
}

#[cfg(test)]
mod test {

  use super::{
    audio_plugin::{AudioPluginDescriptor, AudioPluginInstance},
    instrument::Instrument,
    Track, TrackId, TrackKind, TrackRank,
  };
  use crate::song::clip::Clip;
  use crate::time::TicksTime;

  fn track(kind: TrackKind) -> Track {
    Track::new(TrackId::new_random(), kind, TrackRank::new(1))
  }

  #[test]
  pub fn end_ticks() {
    let mut track = track(TrackKind::Midi);
    assert_eq!(track.end_ticks(), TicksTime::zero());
    track.add_clip(Clip::notes("a", TicksTime::new(0), TicksTime::new(960)));
    track.add_clip(Clip::notes("b", TicksTime::new(480), TicksTime::new(720)));
    assert_eq!(track.end_ticks(), TicksTime::new(960));
  }

  #[test]
  pub fn clips_are_ordered_by_start() {
    let mut track = track(TrackKind::Midi);
    track.add_clip(Clip::notes("late", TicksTime::new(960), TicksTime::new(1920)));
    let index = track.add_clip(Clip::notes("early", TicksTime::zero(), TicksTime::new(10)));
    assert_eq!(index, 0);
    assert_eq!(track.clips()[1].get_name(), "late");
    assert!(track.remove_clip(5).is_none());
    assert_eq!(track.remove_clip(0).map(|c| c.get_name().to_string()), Some("early".to_string()));
  }

  #[test]
  pub fn edited_clip_keeps_its_place_in_order() {
    let mut track = track(TrackKind::Midi);
    track.add_clip(Clip::notes("first", TicksTime::zero(), TicksTime::new(480)));
    track.add_clip(Clip::notes("second", TicksTime::new(960), TicksTime::new(1440)));

    let index = track.edit_clip(0, |clip| clip.set_start(TicksTime::new(2000)));
    assert_eq!(index, Some(1));
    let names: Vec<&str> = track.clips().iter().map(|clip| clip.get_name()).collect();
    assert_eq!(names, vec!["second", "first"]);
    assert_eq!(track.clips()[1].get_start(), TicksTime::new(2000));

    assert_eq!(track.edit_clip(2, |clip| clip.set_name("none")), None);
  }

  #[test]
  pub fn instrument_only_on_midi_tracks() {
    let mut midi = track(TrackKind::Midi);
    assert!(midi.set_instrument(Some(Instrument::new(33, false))));
    assert_eq!(midi.get_instrument(), Some(Instrument::new(33, false)));

    let mut audio = track(TrackKind::Audio);
    assert!(!audio.set_instrument(Some(Instrument::new(33, false))));
    assert_eq!(audio.get_instrument(), None);
  }

  #[test]
  pub fn suggested_instruments_are_a_set() {
    let mut track = track(TrackKind::Midi);
    track.add_suggested_instrument(Instrument::new(0, false));
    track.add_suggested_instrument(Instrument::new(0, false));
    track.add_suggested_instrument(Instrument::new(0, true));
    assert_eq!(track.suggested_instruments().len(), 2);
  }

  #[test]
  pub fn duplicate_is_deep() {
    let mut source = track(TrackKind::Midi);
    source.set_name("lead");
    source.mixer_mut().volume = 0.5;
    let descriptor = AudioPluginDescriptor::new("Acme", "VST3", "Synth", "2.0");
    source.set_sampler(Some(AudioPluginInstance::new(descriptor.clone())));
    let plugin_id = source.add_audio_plugin(AudioPluginInstance::new(descriptor));
    source.add_clip(Clip::notes("clip", TicksTime::zero(), TicksTime::new(960)));

    let copy = source.duplicate(TrackId::new_random(), TrackRank::new(2));
    assert_ne!(copy.get_id(), source.get_id());
    assert_eq!(copy.get_rank(), TrackRank::new(2));
    assert_eq!(copy.get_name(), "lead");
    assert_eq!(copy.mixer().volume, 0.5);
    assert_eq!(copy.clips(), source.clips());
    assert_ne!(copy.audio_plugins()[0].get_id(), plugin_id);
    assert_ne!(
      copy.get_sampler().map(|s| s.get_id()),
      source.get_sampler().map(|s| s.get_id())
    );
  }

  #[test]
  pub fn remove_audio_plugin() {
    let mut track = track(TrackKind::Audio);
    let descriptor = AudioPluginDescriptor::new("Acme", "CLAP", "Eq", "1");
    let id = track.add_audio_plugin(AudioPluginInstance::new(descriptor));
    track.audio_plugin_mut(id).unwrap().set_enabled(false);
    let removed = track.remove_audio_plugin(id).unwrap();
    assert!(!removed.is_enabled());
    assert!(track.audio_plugins().is_empty());
  }
}
