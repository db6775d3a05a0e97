use log::debug;

use crate::pool::TrackIdPool;

use super::{Capabilities, Parameters, Plugin, PluginId};

/// A plugin configured in a pipeline. Keeps the parameters, the enable
/// state and the track identifiers minted by previous runs.
pub struct PluginInstance {
  plugin: Box<dyn Plugin>,
  parameters: Parameters,
  enabled: bool,
  track_ids: TrackIdPool,
}

impl PluginInstance {
  /// Plugins editing the track structure start disabled
  pub fn new(plugin: Box<dyn Plugin>) -> PluginInstance {
    let enabled = !plugin.capabilities().is_structural();
    PluginInstance {
      plugin,
      parameters: Parameters::new(),
      enabled,
      track_ids: TrackIdPool::default(),
    }
  }

  pub fn get_id(&self) -> PluginId {
    self.plugin.id()
  }

  pub fn capabilities(&self) -> Capabilities {
    self.plugin.capabilities()
  }

  pub fn plugin(&self) -> &dyn Plugin {
    self.plugin.as_ref()
  }

  pub fn parameters(&self) -> &Parameters {
    &self.parameters
  }

  pub fn set_parameters(&mut self, parameters: Parameters) {
    self.parameters = parameters;
  }

  pub fn set_parameter<K, V>(&mut self, name: K, value: V)
  where
    K: Into<String>,
    V: Into<toml::Value>,
  {
    self.parameters.insert(name.into(), value.into());
  }

  pub fn has_all_parameters(&self) -> bool {
    self
      .plugin
      .parameter_schema()
      .keys()
      .all(|name| self.parameters.contains_key(name))
  }

  /// Structural plugins stay disabled until every parameter is populated
  pub fn requires_manual_enable(&self) -> bool {
    self.capabilities().is_structural() && !self.has_all_parameters()
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled && !self.requires_manual_enable()
  }

  pub fn set_enabled(&mut self, enabled: bool) {
    debug!("Plugin {} enabled: {}", self.get_id(), enabled);
    self.enabled = enabled;
  }

  pub fn track_ids(&self) -> &TrackIdPool {
    &self.track_ids
  }

  pub(crate) fn take_track_ids(&mut self) -> TrackIdPool {
    std::mem::replace(&mut self.track_ids, TrackIdPool::default())
  }

  pub(crate) fn restore_track_ids(&mut self, track_ids: TrackIdPool) {
    self.track_ids = track_ids;
  }
}

#[cfg(test)]
mod test {

  use super::PluginInstance;
  use crate::plugin::{
    Capabilities, Capability, ParameterSchema, Parameters, Plugin, PluginId, PluginResult,
  };
  use crate::song::Song;

  struct Splitter {
    capabilities: Capabilities,
  }

  impl Plugin for Splitter {
    fn id(&self) -> PluginId {
      PluginId::new("test", "splitter")
    }

    fn capabilities(&self) -> Capabilities {
      self.capabilities.clone()
    }

    fn parameter_schema(&self) -> ParameterSchema {
      let mut schema = ParameterSchema::new();
      schema.insert("key".to_string(), toml::Value::String("integer".to_string()));
      schema
    }

    fn run(&self, _song: &mut Song, _parameters: &Parameters) -> PluginResult<()> {
      Ok(())
    }
  }

  fn instance(capabilities: Capabilities) -> PluginInstance {
    PluginInstance::new(Box::new(Splitter { capabilities }))
  }

  #[test]
  pub fn non_structural_plugins_start_enabled() {
    let instance = instance(Capabilities::new().with(Capability::EditTrack));
    assert!(!instance.requires_manual_enable());
    assert!(instance.is_enabled());
  }

  #[test]
  pub fn structural_plugins_need_parameters_and_manual_enable() {
    let mut instance = instance(Capabilities::new().with(Capability::CreateTrack));
    assert!(instance.requires_manual_enable());
    assert!(!instance.is_enabled());

    instance.set_parameter("key", 60i64);
    assert!(instance.has_all_parameters());
    assert!(!instance.requires_manual_enable());
    assert!(!instance.is_enabled());

    instance.set_enabled(true);
    assert!(instance.is_enabled());

    instance.set_parameters(Parameters::new());
    assert!(!instance.is_enabled());
  }
}
