//! Song data decoded from an external file, in the file own resolution.

use serde_derive::Deserialize;

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SourceSong {
  /// Ticks per quarter note of the source
  pub resolution: u32,
  pub tempos: Vec<SourceTempo>,
  pub signatures: Vec<SourceSignature>,
  pub tracks: Vec<SourceTrack>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct SourceTempo {
  pub ticks: u64,
  #[serde(default)]
  pub time: f64,
  pub bpm: f64,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct SourceSignature {
  pub ticks: u64,
  pub numerator: u8,
  pub denominator: u8,
}

#[derive(Deserialize, Debug, Clone, Copy, Default)]
#[serde(default)]
pub struct SourceInstrument {
  pub program: u8,
  pub percussion: bool,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct SourceNote {
  pub ticks: u64,
  pub duration: u64,
  pub pitch: u8,
  /// Normalised to `[0, 1]`
  pub velocity: f64,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct SourceControlChange {
  pub controller: u8,
  pub ticks: u64,
  pub value: f64,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SourceTrack {
  pub name: String,
  pub instrument: SourceInstrument,
  pub notes: Vec<SourceNote>,
  pub control_changes: Vec<SourceControlChange>,
}

#[cfg(test)]
mod test {

  use super::SourceSong;

  #[test]
  pub fn decode_from_toml() {
    let source: SourceSong = toml::from_str(
      r#"
      resolution = 96

      [[tempos]]
      ticks = 0
      bpm = 90.0

      [[tracks]]
      name = "bass"
      instrument = { program = 33 }

      [[tracks.notes]]
      ticks = 0
      duration = 96
      pitch = 40
      velocity = 0.75

      [[tracks.control_changes]]
      controller = 7
      ticks = 0
      value = 0.9
      "#,
    )
    .unwrap();

    assert_eq!(source.resolution, 96);
    assert_eq!(source.tempos[0].time, 0.0);
    assert!(source.signatures.is_empty());
    let track = &source.tracks[0];
    assert_eq!(track.instrument.program, 33);
    assert!(!track.instrument.percussion);
    assert_eq!(track.notes[0].pitch, 40);
    assert_eq!(track.control_changes[0].controller, 7);
  }
}
