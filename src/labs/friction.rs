use super::{wrap_corridor, Lab, LabKind};
use crate::telemetry::Sample;
use crate::{FrictionParams, GRAVITY};

/// Block displacement per unit of motion intensity in the static view.
const DISPLAY_TRAVEL: f64 = 2.2;

/// Force balance of a block pushed across a rough floor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrictionAnalysis {
  /// N = m g
  pub normal: f64,
  /// Ff = mu N
  pub friction: f64,
  pub can_move: bool,
  /// How hard the push beats friction, 0..1
  pub intensity: f64,
  pub display_offset: f64,
}

impl FrictionAnalysis {
  pub fn new(params: &FrictionParams) -> Self {
    let normal = params.mass * GRAVITY;
    let friction = params.mu * normal;
    let can_move = params.push > friction;
    let intensity = if can_move {
      ((params.push - friction) / (params.mass * 10.0)).clamp(0.0, 1.0)
    } else {
      0.0
    };
    Self {
      normal,
      friction,
      can_move,
      intensity,
      display_offset: intensity * DISPLAY_TRAVEL,
    }
  }
}

/// Sliding block. It starts only when the push beats friction; once moving,
/// kinetic friction decelerates it to rest if the push is reduced.
pub struct FrictionLab {
  params: FrictionParams,
  t: f64,
  x: f64,
  v: f64,
}

impl FrictionLab {
  pub fn new(params: FrictionParams) -> Self {
    Self {
      params,
      t: 0.0,
      x: 0.0,
      v: 0.0,
    }
  }

  pub fn analysis(&self) -> FrictionAnalysis {
    FrictionAnalysis::new(&self.params)
  }

  /// Changes the push without restarting the run.
  pub fn set_push(&mut self, push: f64) {
    self.params.push = push;
  }

  pub fn velocity(&self) -> f64 {
    self.v
  }

  fn net_force(&self) -> f64 {
    let analysis = self.analysis();
    if self.v > 0.0 || analysis.can_move {
      self.params.push - analysis.friction
    } else {
      0.0
    }
  }
}

impl Lab for FrictionLab {
  fn kind(&self) -> LabKind {
    LabKind::Friction
  }

  fn reset(&mut self) {
    self.t = 0.0;
    self.x = 0.0;
    self.v = 0.0;
  }

  fn initial_sample(&self) -> Sample {
    Sample {
      t: 0.0,
      x: 0.0,
      v: 0.0,
      a: self.net_force() / self.params.mass,
    }
  }

  fn tick(&mut self, dt: f64) -> Sample {
    let mut a = self.net_force() / self.params.mass;
    let v = self.v + a * dt;
    if v < 0.0 {
      // friction cannot push the block backwards
      a = -self.v / dt;
      self.v = 0.0;
    } else {
      self.v = v;
    }
    self.x = wrap_corridor(self.x + self.v * dt);
    self.t += dt;
    Sample {
      t: self.t,
      x: self.x,
      v: self.v,
      a,
    }
  }

  fn describe(&self) -> String {
    let analysis = self.analysis();
    format!(
      "N = {:.2} N, Ff = {:.2} N, push = {:.2} N, {}",
      analysis.normal,
      analysis.friction,
      self.params.push,
      if analysis.can_move { "moves" } else { "stays" }
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_relative_eq;

  const DT: f64 = 1.0 / 60.0;

  #[test]
  fn test_analysis_forces() {
    let analysis = FrictionAnalysis::new(&FrictionParams {
      mass: 2.0,
      mu: 0.5,
      push: 5.0,
    });
    assert_relative_eq!(analysis.normal, 19.62);
    assert_relative_eq!(analysis.friction, 9.81);
    assert!(!analysis.can_move);
    assert_eq!(analysis.intensity, 0.0);
  }

  #[test]
  fn test_intensity_is_clamped() {
    let analysis = FrictionAnalysis::new(&FrictionParams {
      mass: 1.0,
      mu: 0.0,
      push: 100.0,
    });
    assert!(analysis.can_move);
    assert_eq!(analysis.intensity, 1.0);
    assert_relative_eq!(analysis.display_offset, 2.2);
  }

  #[test]
  fn test_weak_push_leaves_block_at_rest() {
    let mut lab = FrictionLab::new(FrictionParams {
      mass: 2.0,
      mu: 0.5,
      push: 9.0,
    });
    for _ in 0..120 {
      let s = lab.tick(DT);
      assert_eq!(s.v, 0.0);
      assert_eq!(s.x, 0.0);
    }
  }

  #[test]
  fn test_block_accelerates_then_coasts_to_rest() {
    let mut lab = FrictionLab::new(FrictionParams {
      mass: 1.0,
      mu: 0.2,
      push: 3.962,
    });
    let s = lab.tick(DT);
    assert_relative_eq!(s.a, 2.0, epsilon = 1e-9);
    for _ in 0..59 {
      lab.tick(DT);
    }
    assert_relative_eq!(lab.velocity(), 2.0, epsilon = 1e-9);

    lab.set_push(0.0);
    for _ in 0..120 {
      let s = lab.tick(DT);
      assert!(s.v >= 0.0);
    }
    assert_eq!(lab.velocity(), 0.0);
  }
}
