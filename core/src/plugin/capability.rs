use std::collections::BTreeSet;
use std::fmt;
use std::iter::FromIterator;

/// Structural song edits a plugin has to declare before performing them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
  CreateTrack,
  RemoveTrack,
  EditTrack,
  EditTempo,
  EditTimeSignature,
}

impl Capability {
  pub fn all() -> [Capability; 5] {
    [
      Capability::CreateTrack,
      Capability::RemoveTrack,
      Capability::EditTrack,
      Capability::EditTempo,
      Capability::EditTimeSignature,
    ]
  }

  pub fn name(&self) -> &'static str {
    match self {
      Capability::CreateTrack => "createTrack",
      Capability::RemoveTrack => "removeTrack",
      Capability::EditTrack => "editTrack",
      Capability::EditTempo => "editTempo",
      Capability::EditTimeSignature => "editTimeSignature",
    }
  }

  pub fn from_name(name: &str) -> Option<Capability> {
    Capability::all()
      .iter()
      .find(|capability| capability.name() == name)
      .cloned()
  }
}

impl fmt::Display for Capability {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
  pub fn new() -> Capabilities {
    Capabilities::default()
  }

  pub fn with(mut self, capability: Capability) -> Capabilities {
    self.0.insert(capability);
    self
  }

  pub fn contains(&self, capability: Capability) -> bool {
    self.0.contains(&capability)
  }

  pub fn iter<'a>(&'a self) -> impl Iterator<Item = Capability> + 'a {
    self.0.iter().cloned()
  }

  /// Whether the capabilities change the track structure of a song
  pub fn is_structural(&self) -> bool {
    self.contains(Capability::CreateTrack) || self.contains(Capability::RemoveTrack)
  }
}

impl FromIterator<Capability> for Capabilities {
  fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
    Capabilities(iter.into_iter().collect())
  }
}
