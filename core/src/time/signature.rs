use super::{events::TimedEvent, TicksTime};

pub const DEFAULT_SIGNATURE_NUM_BEATS: u8 = 4;
pub const DEFAULT_SIGNATURE_NOTE_VALUE: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
  num_beats: u8,  // numerator
  note_value: u8, // denominator
}

impl Signature {
  pub fn new(num_beats: u8, note_value: u8) -> Signature {
    Signature {
      num_beats,
      note_value,
    }
  }

  pub fn get_num_beats(&self) -> u8 {
    self.num_beats
  }

  pub fn get_note_value(&self) -> u8 {
    self.note_value
  }

  pub fn is_valid(&self) -> bool {
    self.num_beats > 0 && self.note_value > 0
  }
}

impl Default for Signature {
  fn default() -> Self {
    Signature::new(DEFAULT_SIGNATURE_NUM_BEATS, DEFAULT_SIGNATURE_NOTE_VALUE)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureChange {
  ticks: TicksTime,
  signature: Signature,
}

impl SignatureChange {
  pub fn new(ticks: TicksTime, signature: Signature) -> SignatureChange {
    SignatureChange { ticks, signature }
  }

  pub fn get_ticks(&self) -> TicksTime {
    self.ticks
  }

  pub fn get_signature(&self) -> Signature {
    self.signature
  }
}

impl TimedEvent for SignatureChange {
  fn ticks(&self) -> TicksTime {
    self.ticks
  }
}
