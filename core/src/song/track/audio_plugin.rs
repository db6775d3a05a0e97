use std::fmt;

use uuid::Uuid;

/// Local identifier of an audio plugin instance within a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AudioPluginId(Uuid);

impl AudioPluginId {
  pub fn new_random() -> AudioPluginId {
    AudioPluginId(Uuid::new_v4())
  }
}

impl fmt::Display for AudioPluginId {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioPluginDescriptor {
  pub manufacturer: String,
  pub format: String,
  pub name: String,
  pub version: String,
}

impl AudioPluginDescriptor {
  pub fn new<T>(manufacturer: T, format: T, name: T, version: T) -> AudioPluginDescriptor
  where
    T: Into<String>,
  {
    AudioPluginDescriptor {
      manufacturer: manufacturer.into(),
      format: format.into(),
      name: name.into(),
      version: version.into(),
    }
  }

  /// Fields joined by `/`, with `%` and `/` inside them escaped
  pub fn identity(&self) -> String {
    format!("{}/{}", self.identity_without_version(), escape_field(&self.version))
  }

  fn identity_without_version(&self) -> String {
    format!(
      "{}/{}/{}",
      escape_field(&self.manufacturer),
      escape_field(&self.format),
      escape_field(&self.name)
    )
  }

  pub fn matches(&self, other: &AudioPluginDescriptor, ignore_version: bool) -> bool {
    if ignore_version {
      self.identity_without_version() == other.identity_without_version()
    } else {
      self.identity() == other.identity()
    }
  }
}

fn escape_field(field: &str) -> String {
  field.replace('%', "%25").replace('/', "%2F")
}

/// An audio plugin attached to a track. The plugin state is an opaque blob
/// owned by the audio host.
#[derive(Debug, PartialEq)]
pub struct AudioPluginInstance {
  id: AudioPluginId,
  descriptor: AudioPluginDescriptor,
  enabled: bool,
  state: Vec<u8>,
}

impl AudioPluginInstance {
  pub fn new(descriptor: AudioPluginDescriptor) -> AudioPluginInstance {
    AudioPluginInstance {
      id: AudioPluginId::new_random(),
      descriptor,
      enabled: true,
      state: Vec::new(),
    }
  }

  pub fn get_id(&self) -> AudioPluginId {
    self.id
  }

  pub fn get_descriptor(&self) -> &AudioPluginDescriptor {
    &self.descriptor
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  pub fn set_enabled(&mut self, enabled: bool) {
    self.enabled = enabled;
  }

  pub fn get_state(&self) -> &[u8] {
    self.state.as_slice()
  }

  pub fn set_state(&mut self, state: Vec<u8>) {
    self.state = state;
  }

  /// Copy with a fresh local identifier
  pub fn duplicate(&self) -> AudioPluginInstance {
    AudioPluginInstance {
      id: AudioPluginId::new_random(),
      descriptor: self.descriptor.clone(),
      enabled: self.enabled,
      state: self.state.clone(),
    }
  }
}

#[cfg(test)]
mod test {

  use super::{AudioPluginDescriptor, AudioPluginInstance};

  fn descriptor(version: &str) -> AudioPluginDescriptor {
    AudioPluginDescriptor::new("Acme", "VST3", "Reverb", version)
  }

  #[test]
  pub fn identity() {
    assert_eq!(descriptor("1.2").identity(), "Acme/VST3/Reverb/1.2");
  }

  #[test]
  pub fn identity_escapes_separators() {
    let slash_in_manufacturer = AudioPluginDescriptor::new("A/B", "C", "Delay", "1.0");
    let slash_in_format = AudioPluginDescriptor::new("A", "B/C", "Delay", "1.0");
    assert_eq!(slash_in_manufacturer.identity(), "A%2FB/C/Delay/1.0");
    assert_ne!(slash_in_manufacturer.identity(), slash_in_format.identity());
    assert!(!slash_in_manufacturer.matches(&slash_in_format, true));

    let percent = AudioPluginDescriptor::new("A%2FB", "C", "Delay", "1.0");
    assert_eq!(percent.identity(), "A%252FB/C/Delay/1.0");
  }

  #[test]
  pub fn matches() {
    assert!(descriptor("1.2").matches(&descriptor("1.2"), false));
    assert!(!descriptor("1.2").matches(&descriptor("1.3"), false));
    assert!(descriptor("1.2").matches(&descriptor("1.3"), true));
    let other = AudioPluginDescriptor::new("Acme", "AU", "Reverb", "1.2");
    assert!(!descriptor("1.2").matches(&other, true));
  }

  #[test]
  pub fn duplicate_gets_fresh_id() {
    let mut plugin = AudioPluginInstance::new(descriptor("1.0"));
    plugin.set_enabled(false);
    plugin.set_state(vec![1, 2, 3]);
    let copy = plugin.duplicate();
    assert_ne!(copy.get_id(), plugin.get_id());
    assert!(!copy.is_enabled());
    assert_eq!(copy.get_state(), &[1, 2, 3]);
    assert!(copy.get_descriptor().matches(plugin.get_descriptor(), false));
  }
}
