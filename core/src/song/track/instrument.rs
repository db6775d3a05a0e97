/// General MIDI program of a MIDI track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Instrument {
  program: u8,
  percussion: bool,
}

impl Instrument {
  pub fn new(program: u8, percussion: bool) -> Instrument {
    Instrument {
      program,
      percussion,
    }
  }

  pub fn get_program(&self) -> u8 {
    self.program
  }

  pub fn is_percussion(&self) -> bool {
    self.percussion
  }
}
