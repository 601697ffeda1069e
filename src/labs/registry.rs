use super::{BuoyancyLab, FrictionLab, Lab, NewtonLab, RocketLab, UniformMotionLab};
use crate::error::LabError;
use crate::{BuoyancyParams, FrictionParams, NewtonParams, RocketParams, UniformParams};
use std::fmt::Display;
use std::str::FromStr;

/// Every lab the platform offers, addressed by subject and lab slug.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LabKind {
  UniformMotion,
  NewtonLaws,
  Friction,
  Pressure,
  Buoyancy,
  RocketOrbit,
}

impl LabKind {
  pub const ALL: [LabKind; 6] = [
    LabKind::UniformMotion,
    LabKind::NewtonLaws,
    LabKind::Friction,
    LabKind::Pressure,
    LabKind::Buoyancy,
    LabKind::RocketOrbit,
  ];

  pub fn subject(self) -> &'static str {
    "fizika"
  }

  pub fn slug(self) -> &'static str {
    match self {
      LabKind::UniformMotion => "tekis-harakat",
      LabKind::NewtonLaws => "nyuton",
      LabKind::Friction => "ishqalanish",
      LabKind::Pressure => "bosim",
      LabKind::Buoyancy => "suzish",
      LabKind::RocketOrbit => "raketa-orbita",
    }
  }

  pub fn key(self) -> String {
    format!("{}/{}", self.subject(), self.slug())
  }

  pub fn title(self) -> &'static str {
    match self {
      LabKind::UniformMotion => "Uniform and accelerated motion",
      LabKind::NewtonLaws => "Newton's laws: F = ma",
      LabKind::Friction => "Sliding friction",
      LabKind::Pressure => "Pressure: P = F/S",
      LabKind::Buoyancy => "Buoyancy",
      LabKind::RocketOrbit => "Rocket: orbit and escape velocity",
    }
  }

  /// Resolves a `subject/lab` route pair.
  pub fn from_route(subject: &str, lab: &str) -> Option<LabKind> {
    LabKind::ALL
      .into_iter()
      .find(|kind| kind.subject() == subject && kind.slug() == lab)
  }

  /// Pressure is a static calculation and has no time evolution.
  pub fn is_dynamic(self) -> bool {
    self != LabKind::Pressure
  }

  /// The lab with its default parameters, for dynamic labs.
  pub fn build(self) -> Option<Box<dyn Lab>> {
    match self {
      LabKind::UniformMotion => Some(Box::new(UniformMotionLab::new(UniformParams::default()))),
      LabKind::NewtonLaws => Some(Box::new(NewtonLab::new(NewtonParams::default()))),
      LabKind::Friction => Some(Box::new(FrictionLab::new(FrictionParams::default()))),
      LabKind::Pressure => None,
      LabKind::Buoyancy => Some(Box::new(BuoyancyLab::new(BuoyancyParams::default()))),
      LabKind::RocketOrbit => Some(Box::new(RocketLab::new(RocketParams::default()))),
    }
  }
}

impl Display for LabKind {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "{}/{}", self.subject(), self.slug())
  }
}

impl FromStr for LabKind {
  type Err = LabError;

  /// Accepts `subject/lab` or a bare lab slug.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let found = match s.split_once('/') {
      Some((subject, lab)) => LabKind::from_route(subject, lab),
      None => LabKind::ALL.into_iter().find(|kind| kind.slug() == s),
    };
    found.ok_or_else(|| LabError::UnknownLab(s.to_string()))
  }
}
