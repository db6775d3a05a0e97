use std::collections::BTreeMap;

use failure::Fail;

use crate::time::TicksTime;

pub type Key = u8;

pub const MAX_KEY: Key = 127;
pub const MAX_VELOCITY: u8 = 127;

#[derive(Debug, Fail, PartialEq)]
pub enum NoteError {
  #[fail(display = "Note key out of range: {}", key)]
  KeyOutOfRange { key: Key },

  #[fail(display = "Note velocity out of range: {}", velocity)]
  VelocityOutOfRange { velocity: u8 },

  #[fail(display = "Note must end after it starts: [{}, {})", start, end)]
  EmptyRange { start: TicksTime, end: TicksTime },
}

/// A note at absolute song ticks, ending before `end`
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Note {
  key: Key,
  velocity: u8,
  start: TicksTime,
  end: TicksTime,
}

impl Note {
  pub fn new(key: Key, velocity: u8, start: TicksTime, end: TicksTime) -> Result<Note, NoteError> {
    if key > MAX_KEY {
      return Err(NoteError::KeyOutOfRange { key });
    }
    if velocity > MAX_VELOCITY {
      return Err(NoteError::VelocityOutOfRange { velocity });
    }
    if end <= start {
      return Err(NoteError::EmptyRange { start, end });
    }
    Ok(Note {
      key,
      velocity,
      start,
      end,
    })
  }

  pub fn get_key(&self) -> Key {
    self.key
  }

  pub fn get_velocity(&self) -> u8 {
    self.velocity
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
}

/// Notes ordered by start tick, notes sharing a start keep insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notes {
  notes: BTreeMap<TicksTime, Vec<Note>>,
  len: usize,
}

impl Notes {
  pub fn new() -> Notes {
    Notes::default()
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn add_note(&mut self, note: Note) -> &mut Self {
    self
      .notes
      .entry(note.start)
      .and_modify(|tick_notes| tick_notes.push(note))
      .or_insert_with(|| vec![note]);
    self.len += 1;
    self
  }

  pub fn add_notes<I>(&mut self, notes: I) -> &mut Self
  where
    I: IntoIterator<Item = Note>,
  {
    notes.into_iter().for_each(|note| {
      self.add_note(note);
    });
    self
  }

  /// Remove the first note equal to `note`, returns whether one was found
  pub fn remove_note(&mut self, note: &Note) -> bool {
    let mut removed = false;
    if let Some(tick_notes) = self.notes.get_mut(&note.start) {
      if let Some(index) = tick_notes.iter().position(|prev_note| prev_note == note) {
        tick_notes.remove(index);
        removed = true;
        if tick_notes.is_empty() {
          self.notes.remove(&note.start);
        }
      }
    }
    if removed {
      self.len -= 1;
    }
    removed
  }

  pub fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Note> + 'a {
    self.notes.values().flat_map(|tick_notes| tick_notes.iter())
  }

  /// Notes starting within `[range_start, range_end)`
  pub fn notes_range<'a>(
    &'a self,
    range_start: TicksTime,
    range_end: TicksTime,
  ) -> impl Iterator<Item = &'a Note> + 'a {
    self
      .notes
      .range(range_start..range_end.max(range_start))
      .flat_map(|(_tick, tick_notes)| tick_notes.iter())
  }

  pub fn first_start(&self) -> Option<TicksTime> {
    self.notes.keys().next().cloned()
  }

  pub fn last_end(&self) -> Option<TicksTime> {
    self.iter().map(|note| note.end).max()
  }
}
