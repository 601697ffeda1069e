use crate::clock::FixedStep;
use crate::telemetry::{Sample, Series};
use log::{debug, trace};

pub mod buoyancy;
pub mod friction;
pub mod newton;
pub mod pressure;
pub mod registry;
pub mod rocket;
pub mod uniform;

pub use buoyancy::BuoyancyLab;
pub use friction::FrictionLab;
pub use newton::NewtonLab;
pub use pressure::PressureLab;
pub use registry::LabKind;
pub use rocket::RocketLab;
pub use uniform::UniformMotionLab;

/// A lab whose state is advanced by fixed simulation ticks.
pub trait Lab {
  fn kind(&self) -> LabKind;

  /// Restores the initial conditions derived from the lab's parameters.
  fn reset(&mut self);

  /// The reading shown right after a reset, at t = 0.
  fn initial_sample(&self) -> Sample;

  /// Advances one fixed tick of `dt` seconds.
  fn tick(&mut self, dt: f64) -> Sample;

  /// A halted lab has stopped moving on its own (e.g. the rocket crashed);
  /// the runner drops any time still pending for the frame.
  fn halted(&self) -> bool {
    false
  }

  fn clamp_time_scale(&self, time_scale: f64) -> f64 {
    time_scale
  }

  /// Speed-up used when the caller does not pick one.
  fn default_time_scale(&self) -> f64 {
    1.0
  }

  /// One line describing the current state for status output.
  fn describe(&self) -> String;
}

impl Lab for Box<dyn Lab> {
  fn kind(&self) -> LabKind {
    (**self).kind()
  }

  fn reset(&mut self) {
    (**self).reset()
  }

  fn initial_sample(&self) -> Sample {
    (**self).initial_sample()
  }

  fn tick(&mut self, dt: f64) -> Sample {
    (**self).tick(dt)
  }

  fn halted(&self) -> bool {
    (**self).halted()
  }

  fn clamp_time_scale(&self, time_scale: f64) -> f64 {
    (**self).clamp_time_scale(time_scale)
  }

  fn default_time_scale(&self) -> f64 {
    (**self).default_time_scale()
  }

  fn describe(&self) -> String {
    (**self).describe()
  }
}

/// Drives a lab from frame intervals: owns the clock, the chart history and
/// the pause state.
pub struct LabRunner<L: Lab> {
  lab: L,
  clock: FixedStep,
  series: Series,
  time_scale: f64,
  paused: bool,
}

impl<L: Lab> LabRunner<L> {
  pub fn new(lab: L, time_scale: f64) -> Self {
    let mut runner = Self {
      lab,
      clock: FixedStep::default(),
      series: Series::default(),
      time_scale,
      paused: false,
    };
    runner.reset();
    runner
  }

  pub fn lab(&self) -> &L {
    &self.lab
  }

  pub fn lab_mut(&mut self) -> &mut L {
    &mut self.lab
  }

  pub fn series(&self) -> &Series {
    &self.series
  }

  pub fn clock(&self) -> &FixedStep {
    &self.clock
  }

  pub fn time_scale(&self) -> f64 {
    self.lab.clamp_time_scale(self.time_scale)
  }

  pub fn set_time_scale(&mut self, time_scale: f64) {
    self.time_scale = time_scale;
  }

  pub fn is_paused(&self) -> bool {
    self.paused
  }

  pub fn set_paused(&mut self, paused: bool) {
    self.paused = paused;
  }

  pub fn toggle_pause(&mut self) {
    self.paused = !self.paused;
  }

  /// Back to the initial conditions. Clears the chart and unpauses.
  pub fn reset(&mut self) {
    self.lab.reset();
    self.clock.clear();
    self.series.clear();
    self.paused = false;
    self.series.push(self.lab.initial_sample());
    debug!("{:?} reset: {}", self.lab.kind(), self.lab.describe());
  }

  pub fn frame(&mut self, real_dt: f64) -> usize {
    self.frame_with(real_dt, |_| {})
  }

  /// Runs every tick that is due after `real_dt` seconds of real time,
  /// handing each new sample to `on_sample`. Returns the number of ticks.
  pub fn frame_with<F: FnMut(&Sample)>(&mut self, real_dt: f64, mut on_sample: F) -> usize {
    if self.paused {
      return 0;
    }
    let time_scale = self.time_scale();
    let due = self.clock.advance(real_dt, time_scale);
    let dt = self.clock.tick();

    let mut ran = 0;
    while ran < due && !self.lab.halted() {
      let sample = self.lab.tick(dt);
      self.series.push(sample);
      on_sample(&sample);
      ran += 1;
    }
    if self.lab.halted() {
      self.clock.drain(due - ran);
    }
    trace!("frame {real_dt:.4}s x{time_scale}: {ran}/{due} ticks");
    ran
  }
}

/// Wraps a position that left the corridor back to its start.
pub(crate) fn wrap_corridor(x: f64) -> f64 {
  if x > crate::CORRIDOR_END {
    -crate::CORRIDOR_END
  } else {
    x
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::clock::TICK;
  use crate::UniformParams;

  #[test]
  fn test_runner_starts_with_initial_sample() {
    let runner = LabRunner::new(UniformMotionLab::new(UniformParams::default()), 1.0);
    assert_eq!(runner.series().len(), 1);
    assert_eq!(runner.series().last().map(|s| s.t), Some(0.0));
  }

  #[test]
  fn test_paused_runner_consumes_no_time() {
    let mut runner = LabRunner::new(UniformMotionLab::new(UniformParams::default()), 1.0);
    runner.set_paused(true);
    assert_eq!(runner.frame(1.0), 0);
    assert_eq!(runner.clock().leftover(), 0.0);
    runner.toggle_pause();
    assert!(runner.frame(1.0) >= 59);
  }

  #[test]
  fn test_samples_follow_ticks() {
    let mut runner = LabRunner::new(UniformMotionLab::new(UniformParams::default()), 0.5);
    let mut seen = Vec::new();
    let ran = runner.frame_with(TICK * 10.0, |s| seen.push(*s));
    assert_eq!(ran, seen.len());
    assert!((4..=5).contains(&ran));
    assert_eq!(runner.series().len(), ran + 1);
  }

  #[test]
  fn test_reset_clears_series_and_clock() {
    let mut runner = LabRunner::new(UniformMotionLab::new(UniformParams::default()), 1.0);
    runner.frame(0.5);
    runner.set_paused(true);
    runner.reset();
    assert!(!runner.is_paused());
    assert_eq!(runner.series().len(), 1);
    assert_eq!(runner.clock().elapsed(), 0.0);
  }

  #[test]
  fn test_wrap_corridor() {
    assert_eq!(wrap_corridor(7.9), 7.9);
    assert_eq!(wrap_corridor(8.0), 8.0);
    assert_eq!(wrap_corridor(8.1), -8.0);
  }
}
