use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

use crate::time::{
  signature::{DEFAULT_SIGNATURE_NOTE_VALUE, DEFAULT_SIGNATURE_NUM_BEATS},
  tempo::DEFAULT_TEMPO,
  Resolution,
};

pub const DEFAULT_RESOLUTION: Resolution = 480;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SignatureConfig {
  pub num_beats: u8,
  pub note_value: u8,
}

impl Default for SignatureConfig {
  fn default() -> SignatureConfig {
    SignatureConfig {
      num_beats: DEFAULT_SIGNATURE_NUM_BEATS,
      note_value: DEFAULT_SIGNATURE_NOTE_VALUE,
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SongConfig {
  pub name: String,
  pub resolution: Resolution,
  pub tempo: f64,
  pub signature: SignatureConfig,
}

impl Default for SongConfig {
  fn default() -> SongConfig {
    SongConfig {
      name: "untitled".to_string(),
      resolution: DEFAULT_RESOLUTION,
      tempo: DEFAULT_TEMPO,
      signature: SignatureConfig::default(),
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ImportConfig {
  pub overwrite_timeline: bool,
  pub offset: u64,
}

impl Default for ImportConfig {
  fn default() -> ImportConfig {
    ImportConfig {
      overwrite_timeline: true,
      offset: 0,
    }
  }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
  pub song: SongConfig,
  pub import: ImportConfig,
}

impl Config {
  pub fn from_file<'a, T>(path: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let path_str = path.into();
    let mut file = File::open(path_str)?;
    file.read_to_string(&mut content)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
  }

  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}

#[cfg(test)]
mod test {

  use super::Config;

  #[test]
  pub fn defaults() {
    let config = Config::default();
    assert_eq!(config.song.resolution, 480);
    assert_eq!(config.song.tempo, 120.0);
    assert_eq!(config.song.signature.num_beats, 4);
    assert!(config.import.overwrite_timeline);
  }

  #[test]
  pub fn from_str() {
    let config = Config::from_str(
      r#"
      [song]
      name = "demo"
      resolution = 96
      tempo = 92.5

      [song.signature]
      num_beats = 6
      note_value = 8

      [import]
      offset = 1920
      "#,
    )
    .unwrap();

    assert_eq!(config.song.name, "demo");
    assert_eq!(config.song.resolution, 96);
    assert_eq!(config.song.tempo, 92.5);
    assert_eq!(config.song.signature.note_value, 8);
    assert_eq!(config.import.offset, 1920);
    assert!(config.import.overwrite_timeline);
  }

  #[test]
  pub fn from_str_invalid() {
    assert!(Config::from_str("song = 3").is_err());
  }
}
