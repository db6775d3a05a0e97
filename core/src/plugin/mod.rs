pub mod capability;
pub mod context;
pub mod instance;
pub mod scope;

pub use self::capability::{Capabilities, Capability};
pub use self::context::ExecutionContext;
pub use self::instance::PluginInstance;
pub use self::scope::{run_plugin, ExecutionScope, RunReport};

use std::fmt;

use failure::Fail;

use crate::song::{Song, SongError};

/// Opaque description of the parameters a plugin asks the user for
pub type ParameterSchema = toml::value::Table;

/// Resolved parameter values, keyed like the schema
pub type Parameters = toml::value::Table;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginId {
  provider: String,
  plugin: String,
}

impl PluginId {
  pub fn new<T>(provider: T, plugin: T) -> PluginId
  where
    T: Into<String>,
  {
    PluginId {
      provider: provider.into(),
      plugin: plugin.into(),
    }
  }

  pub fn get_provider(&self) -> &str {
    self.provider.as_str()
  }

  pub fn get_plugin(&self) -> &str {
    self.plugin.as_str()
  }
}

impl fmt::Display for PluginId {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}/{}", self.provider, self.plugin)
  }
}

#[derive(Debug, Fail)]
pub enum PluginError {
  #[fail(display = "Plugin {} is disabled", plugin)]
  Disabled { plugin: PluginId },

  #[fail(display = "Song error: {}", cause)]
  Song {
    #[cause]
    cause: SongError,
  },

  #[fail(display = "Plugin run failed: {}", cause)]
  Run { cause: String },
}

impl From<SongError> for PluginError {
  fn from(cause: SongError) -> Self {
    PluginError::Song { cause }
  }
}

pub type PluginResult<T> = Result<T, PluginError>;

/// A song transformation run by the host
pub trait Plugin {
  fn id(&self) -> PluginId;

  fn capabilities(&self) -> Capabilities;

  fn parameter_schema(&self) -> ParameterSchema {
    ParameterSchema::new()
  }

  fn run(&self, song: &mut Song, parameters: &Parameters) -> PluginResult<()>;
}
