use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

/// Host only settings, read from the `pipeline` section of the song configuration
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct HostConfig {
  pub pipeline: Pipeline,
}

impl HostConfig {
  pub fn from_file<'a, T>(path: T) -> Result<HostConfig, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let path_str = path.into();
    let mut file = File::open(path_str)?;
    file.read_to_string(&mut content)?;
    HostConfig::from_str(content.as_str())
  }

  pub fn from_str<'a, T>(content: T) -> Result<HostConfig, Error>
  where
    T: Into<&'a str>,
  {
    let config: HostConfig = toml::from_str(content.into())?;
    Ok(config)
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Pipeline {
  /// Song data to import before running the plugins
  pub source: Option<String>,
  pub chord_root: u8,
  pub chord_bars: u32,
  pub fade: f64,
}

impl Default for Pipeline {
  fn default() -> Pipeline {
    Pipeline {
      source: None,
      chord_root: 60,
      chord_bars: 2,
      fade: 1.0,
    }
  }
}

#[cfg(test)]
mod test {

  use super::HostConfig;

  #[test]
  pub fn pipeline_defaults() {
    let config = HostConfig::from_str("[song]\nname = \"x\"\n").unwrap();
    assert_eq!(config.pipeline.source, None);
    assert_eq!(config.pipeline.chord_root, 60);
    assert_eq!(config.pipeline.chord_bars, 2);
  }

  #[test]
  pub fn pipeline_section() {
    let config = HostConfig::from_str(
      "[pipeline]\nsource = \"source.toml\"\nchord_root = 57\nfade = 0.5\n",
    )
    .unwrap();
    assert_eq!(config.pipeline.source, Some("source.toml".to_string()));
    assert_eq!(config.pipeline.chord_root, 57);
    assert_eq!(config.pipeline.fade, 0.5);
  }
}
