use super::{wrap_corridor, Lab, LabKind};
use crate::integrator::semi_implicit_euler;
use crate::telemetry::Sample;
use crate::{MotionMode, UniformParams};

/// A ball rolling along the corridor at constant velocity or constant
/// acceleration.
pub struct UniformMotionLab {
  params: UniformParams,
  t: f64,
  x: f64,
  v: f64,
}

impl UniformMotionLab {
  pub fn new(params: UniformParams) -> Self {
    Self {
      params,
      t: 0.0,
      x: 0.0,
      v: params.v0,
    }
  }

  pub fn params(&self) -> &UniformParams {
    &self.params
  }

  /// Parameter changes restart the experiment.
  pub fn set_params(&mut self, params: UniformParams) {
    self.params = params;
    self.reset();
  }

  fn acceleration(&self) -> f64 {
    match self.params.mode {
      MotionMode::Uniform => 0.0,
      MotionMode::Accelerated => self.params.a,
    }
  }

  pub fn position(&self) -> f64 {
    self.x
  }

  pub fn velocity(&self) -> f64 {
    self.v
  }
}

impl Lab for UniformMotionLab {
  fn kind(&self) -> LabKind {
    LabKind::UniformMotion
  }

  fn reset(&mut self) {
    self.t = 0.0;
    self.x = 0.0;
    self.v = self.params.v0;
  }

  fn initial_sample(&self) -> Sample {
    Sample {
      t: 0.0,
      x: 0.0,
      v: self.params.v0,
      a: self.acceleration(),
    }
  }

  fn tick(&mut self, dt: f64) -> Sample {
    let a = self.acceleration();
    semi_implicit_euler(&mut self.x, &mut self.v, a, dt);
    self.x = wrap_corridor(self.x);
    self.t += dt;
    Sample {
      t: self.t,
      x: self.x,
      v: self.v,
      a,
    }
  }

  fn describe(&self) -> String {
    let mode = match self.params.mode {
      MotionMode::Uniform => "uniform",
      MotionMode::Accelerated => "accelerated",
    };
    format!("{mode} motion, x = {:.3} m, v = {:.3} m/s", self.x, self.v)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_relative_eq;

  const DT: f64 = 1.0 / 60.0;

  #[test]
  fn test_uniform_ignores_acceleration() {
    let mut lab = UniformMotionLab::new(UniformParams {
      mode: MotionMode::Uniform,
      v0: 2.0,
      a: 5.0,
    });
    for _ in 0..60 {
      let s = lab.tick(DT);
      assert_eq!(s.a, 0.0);
      assert_eq!(s.v, 2.0);
    }
    assert_relative_eq!(lab.position(), 2.0, epsilon = 1e-9);
  }

  #[test]
  fn test_accelerated_matches_semi_implicit_sum() {
    let mut lab = UniformMotionLab::new(UniformParams {
      mode: MotionMode::Accelerated,
      v0: 0.0,
      a: 1.0,
    });
    let n = 60;
    for _ in 0..n {
      lab.tick(DT);
    }
    assert_relative_eq!(lab.velocity(), 1.0, epsilon = 1e-9);
    // x = a dt^2 * n(n+1)/2 for semi-implicit Euler from rest
    let expected = DT * DT * (n * (n + 1)) as f64 / 2.0;
    assert_relative_eq!(lab.position(), expected, epsilon = 1e-9);
  }

  #[test]
  fn test_wraps_at_corridor_end() {
    let mut lab = UniformMotionLab::new(UniformParams {
      mode: MotionMode::Uniform,
      v0: 60.0,
      a: 0.0,
    });
    let mut wrapped = false;
    for _ in 0..20 {
      let s = lab.tick(DT);
      assert!(s.x <= crate::CORRIDOR_END);
      if s.x < 0.0 {
        wrapped = true;
      }
    }
    assert!(wrapped);
  }

  #[test]
  fn test_set_params_resets() {
    let mut lab = UniformMotionLab::new(UniformParams::default());
    lab.tick(DT);
    lab.set_params(UniformParams {
      v0: 3.0,
      ..UniformParams::default()
    });
    assert_eq!(lab.position(), 0.0);
    assert_eq!(lab.velocity(), 3.0);
    assert_eq!(lab.initial_sample().v, 3.0);
  }
}
