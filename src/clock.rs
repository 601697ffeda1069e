use crate::error::{positive, LabError};

/// Simulation ticks per second
pub const TICKS_PER_SECOND: u32 = 60;
/// Simulation tick interval (in seconds)
pub const TICK: f64 = 1.0 / (TICKS_PER_SECOND as f64);

/// Decouples the simulation tick from the render frame interval.
///
/// Real elapsed time, scaled by the user's time multiplier, is accumulated and
/// spent in whole ticks. Whatever is left over carries into the next frame.
#[derive(Clone, Debug)]
pub struct FixedStep {
  tick: f64,
  accumulator: f64,
  elapsed: f64,
}

impl Default for FixedStep {
  fn default() -> Self {
    Self {
      tick: TICK,
      accumulator: 0.0,
      elapsed: 0.0,
    }
  }
}

impl FixedStep {
  /// A clock with a custom tick, which must be finite and positive.
  pub fn new(tick: f64) -> Result<Self, LabError> {
    Ok(Self {
      tick: positive("tick", tick)?,
      ..Self::default()
    })
  }

  pub fn tick(&self) -> f64 {
    self.tick
  }

  /// Simulated seconds consumed by ticks since the last clear.
  pub fn elapsed(&self) -> f64 {
    self.elapsed
  }

  pub fn leftover(&self) -> f64 {
    self.accumulator
  }

  /// Adds a frame's worth of time and returns how many ticks are due.
  pub fn advance(&mut self, real_dt: f64, time_scale: f64) -> usize {
    let scaled = real_dt * time_scale;
    if scaled.is_finite() && scaled > 0.0 {
      self.accumulator += scaled;
    }

    let mut due = 0;
    while self.accumulator >= self.tick {
      self.accumulator -= self.tick;
      self.elapsed += self.tick;
      due += 1;
    }
    due
  }

  /// Drops pending time, e.g. when a lab is reset or a body has crashed.
  pub fn clear(&mut self) {
    self.accumulator = 0.0;
    self.elapsed = 0.0;
  }

  /// Drops pending time. `unrun` ticks that `advance` reported as due but
  /// the caller never ran are taken back out of the elapsed total.
  pub fn drain(&mut self, unrun: usize) {
    self.accumulator = 0.0;
    self.elapsed = (self.elapsed - unrun as f64 * self.tick).max(0.0);
  }
}
