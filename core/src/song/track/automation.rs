use std::collections::BTreeMap;

use crate::time::{
  events::{self, TimedEvent},
  TicksTime,
};

pub const VOLUME_CONTROLLER: u8 = 7;
pub const PAN_CONTROLLER: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AutomationTarget {
  Volume,
  Pan,
}

impl AutomationTarget {
  pub fn from_controller(controller: u8) -> Option<AutomationTarget> {
    match controller {
      VOLUME_CONTROLLER => Some(AutomationTarget::Volume),
      PAN_CONTROLLER => Some(AutomationTarget::Pan),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutomationPoint {
  pub ticks: TicksTime,
  pub value: f64,
}

impl TimedEvent for AutomationPoint {
  fn ticks(&self) -> TicksTime {
    self.ticks
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutomationCurve {
  points: Vec<AutomationPoint>,
}

impl AutomationCurve {
  pub fn new() -> AutomationCurve {
    AutomationCurve::default()
  }

  pub fn add_point(&mut self, ticks: TicksTime, value: f64) -> usize {
    events::insert_sorted(&mut self.points, AutomationPoint { ticks, value })
  }

  pub fn points(&self) -> &[AutomationPoint] {
    &self.points
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  /// Value held at `ticks`, points are steps
  pub fn value_at(&self, ticks: TicksTime) -> Option<f64> {
    events::last_at_or_before(&self.points, ticks).map(|point| point.value)
  }
}

/// Automation curves of a track keyed by target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Automation {
  curves: BTreeMap<AutomationTarget, AutomationCurve>,
}

impl Automation {
  pub fn new() -> Automation {
    Automation::default()
  }

  pub fn curve(&self, target: AutomationTarget) -> Option<&AutomationCurve> {
    self.curves.get(&target)
  }

  pub fn curve_mut(&mut self, target: AutomationTarget) -> &mut AutomationCurve {
    self.curves.entry(target).or_insert_with(AutomationCurve::new)
  }

  pub fn remove_curve(&mut self, target: AutomationTarget) -> Option<AutomationCurve> {
    self.curves.remove(&target)
  }

  pub fn targets<'a>(&'a self) -> impl Iterator<Item = AutomationTarget> + 'a {
    self.curves.keys().cloned()
  }
}

#[cfg(test)]
mod test {

  use super::{Automation, AutomationTarget, TicksTime};

  #[test]
  pub fn from_controller() {
    assert_eq!(AutomationTarget::from_controller(7), Some(AutomationTarget::Volume));
    assert_eq!(AutomationTarget::from_controller(10), Some(AutomationTarget::Pan));
    assert_eq!(AutomationTarget::from_controller(64), None);
  }

  #[test]
  pub fn curve_points_are_sorted() {
    let mut automation = Automation::new();
    let curve = automation.curve_mut(AutomationTarget::Pan);
    curve.add_point(TicksTime::new(960), 0.25);
    curve.add_point(TicksTime::zero(), 0.5);
    curve.add_point(TicksTime::new(480), 0.75);

    let curve = automation.curve(AutomationTarget::Pan).unwrap();
    let ticks: Vec<u64> = curve.points().iter().map(|p| p.ticks.get_ticks()).collect();
    assert_eq!(ticks, vec![0, 480, 960]);
    assert_eq!(curve.value_at(TicksTime::new(500)), Some(0.75));
    assert_eq!(automation.targets().collect::<Vec<_>>(), vec![AutomationTarget::Pan]);
    assert!(automation.curve(AutomationTarget::Volume).is_none());
  }
}
