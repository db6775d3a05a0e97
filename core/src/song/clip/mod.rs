pub mod audio;
pub mod notes;

use self::{
  audio::AudioRegion,
  notes::{Note, Notes},
};

use crate::time::TicksTime;

pub type ClipIndex = usize;

#[derive(Debug, Clone, PartialEq)]
pub enum ClipMedia {
  Notes(Notes),
  Audio(AudioRegion),
}

/// A region `[start, end)` of a track.
///
/// Notes are positioned at absolute song ticks, moving the clip boundaries
/// never moves them. Only notes starting inside the clip are audible.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
  name: String,
  start: TicksTime,
  end: TicksTime,
  media: ClipMedia,
}

impl Clip {
  pub fn notes<T>(name: T, start: TicksTime, end: TicksTime) -> Clip
  where
    T: Into<String>,
  {
    Clip {
      name: name.into(),
      start,
      end: end.max(start),
      media: ClipMedia::Notes(Notes::new()),
    }
  }

  pub fn audio<T>(name: T, start: TicksTime, end: TicksTime, region: AudioRegion) -> Clip
  where
    T: Into<String>,
  {
    Clip {
      name: name.into(),
      start,
      end: end.max(start),
      media: ClipMedia::Audio(region),
    }
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

  pub fn get_start(&self) -> TicksTime {
    self.start
  }

  pub fn get_end(&self) -> TicksTime {
    self.end
  }

  pub fn length(&self) -> TicksTime {
    self.end - self.start
  }

  pub fn get_media(&self) -> &ClipMedia {
    &self.media
  }

  /// Move the left boundary, leaving the notes where they are
  pub fn set_start(&mut self, start: TicksTime) {
    self.start = start;
    self.end = self.end.max(start);
  }

  pub fn set_end(&mut self, end: TicksTime) {
    self.end = end.max(self.start);
  }

  pub fn contains(&self, ticks: TicksTime) -> bool {
    self.start <= ticks && ticks < self.end
  }

  pub fn get_notes(&self) -> Option<&Notes> {
    match &self.media {
      ClipMedia::Notes(notes) => Some(notes),
      ClipMedia::Audio(_) => None,
    }
  }

  /// Add a note, growing the clip end to cover it.
  /// Returns false for audio clips.
  pub fn add_note(&mut self, note: Note) -> bool {
    match &mut self.media {
      ClipMedia::Notes(notes) => {
        notes.add_note(note);
        self.end = self.end.max(note.get_end());
        true
      }
      ClipMedia::Audio(_) => false,
    }
  }

  pub fn remove_note(&mut self, note: &Note) -> bool {
    match &mut self.media {
      ClipMedia::Notes(notes) => notes.remove_note(note),
      ClipMedia::Audio(_) => false,
    }
  }

  /// Notes starting inside the clip boundaries
  pub fn audible_notes<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Note> + 'a> {
    match &self.media {
      ClipMedia::Notes(notes) => Box::new(notes.notes_range(self.start, self.end)),
      ClipMedia::Audio(_) => Box::new(std::iter::empty()),
    }
  }

  pub fn first_note_start(&self) -> Option<TicksTime> {
    self.get_notes().and_then(|notes| notes.first_start())
  }
}

#[cfg(test)]
mod test {

  use super::{audio::AudioRegion, notes::Note, Clip, TicksTime};

  fn note(key: u8, start: u64, end: u64) -> Note {
    Note::new(key, 90, TicksTime::new(start), TicksTime::new(end)).unwrap()
  }

  #[test]
  pub fn add_note_grows_end() {
    let mut clip = Clip::notes("clip", TicksTime::new(100), TicksTime::new(100));
    assert!(clip.add_note(note(60, 120, 480)));
    assert_eq!(clip.get_end(), TicksTime::new(480));
    assert!(clip.add_note(note(62, 130, 200)));
    assert_eq!(clip.get_end(), TicksTime::new(480));
  }

  #[test]
  pub fn set_start_keeps_notes_in_place() {
    let mut clip = Clip::notes("clip", TicksTime::zero(), TicksTime::new(960));
    clip.add_note(note(60, 240, 480));
    clip.set_start(TicksTime::new(240));
    assert_eq!(clip.get_start(), TicksTime::new(240));
    assert_eq!(clip.length(), TicksTime::new(720));
    assert_eq!(clip.first_note_start(), Some(TicksTime::new(240)));
  }

  #[test]
  pub fn end_is_exclusive() {
    let mut clip = Clip::notes("clip", TicksTime::new(10), TicksTime::new(20));
    assert!(clip.contains(TicksTime::new(10)));
    assert!(!clip.contains(TicksTime::new(20)));

    clip.add_note(note(60, 10, 30));
    clip.set_end(TicksTime::new(20));
    clip.add_note(note(61, 20, 21));
    clip.set_end(TicksTime::new(20));
    let audible: Vec<u8> = clip.audible_notes().map(|n| n.get_key()).collect();
    assert_eq!(audible, vec![60]);
  }

  #[test]
  pub fn audio_clip_has_no_notes() {
    let region = AudioRegion::new("drums.wav", TicksTime::zero());
    let mut clip = Clip::audio("audio", TicksTime::zero(), TicksTime::new(10), region);
    assert!(!clip.add_note(note(60, 0, 1)));
    assert_eq!(clip.get_notes(), None);
    assert_eq!(clip.audible_notes().count(), 0);
  }
}
