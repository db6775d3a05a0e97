use crate::time::TicksTime;

/// Region of an audio source referenced by a clip. The source is opaque to
/// the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioRegion {
  source: String,
  offset: TicksTime,
}

impl AudioRegion {
  pub fn new<T>(source: T, offset: TicksTime) -> AudioRegion
  where
    T: Into<String>,
  {
    AudioRegion {
      source: source.into(),
      offset,
    }
  }

  pub fn get_source(&self) -> &str {
    self.source.as_str()
  }

  /// Position within the source where the clip starts playing
  pub fn get_offset(&self) -> TicksTime {
    self.offset
  }
}
