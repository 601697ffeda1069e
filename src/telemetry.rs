use serde::Serialize;
use std::collections::VecDeque;
use std::fmt::Write;

/// Default number of samples a chart keeps.
pub const SERIES_CAPACITY: usize = 260;

/// Padding around the plotted area, in chart units.
const CHART_PAD: f64 = 10.0;

/// One telemetry reading per simulation tick.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Sample {
  pub t: f64,
  pub x: f64,
  pub v: f64,
  pub a: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Channel {
  Time,
  Position,
  Velocity,
  Acceleration,
}

impl Channel {
  pub fn of(self, sample: &Sample) -> f64 {
    match self {
      Channel::Time => sample.t,
      Channel::Position => sample.x,
      Channel::Velocity => sample.v,
      Channel::Acceleration => sample.a,
    }
  }
}

/// Maps `value` into 0..1 across `min..max`; a flat range maps to the middle.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
  if max - min < 1e-9 {
    return 0.5;
  }
  (value - min) / (max - min)
}

/// Bounded sample history, oldest samples are evicted first.
#[derive(Clone, Debug)]
pub struct Series {
  samples: VecDeque<Sample>,
  capacity: usize,
}

impl Default for Series {
  fn default() -> Self {
    Self::with_capacity(SERIES_CAPACITY)
  }
}

impl Series {
  pub fn with_capacity(capacity: usize) -> Self {
    let capacity = capacity.max(1);
    Self {
      samples: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  pub fn push(&mut self, sample: Sample) {
    self.samples.push_back(sample);
    while self.samples.len() > self.capacity {
      self.samples.pop_front();
    }
  }

  pub fn clear(&mut self) {
    self.samples.clear();
  }

  pub fn len(&self) -> usize {
    self.samples.len()
  }

  pub fn is_empty(&self) -> bool {
    self.samples.is_empty()
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn last(&self) -> Option<&Sample> {
    self.samples.back()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Sample> {
    self.samples.iter()
  }

  pub fn range(&self, channel: Channel) -> Option<(f64, f64)> {
    self.samples.iter().map(|s| channel.of(s)).fold(None, |acc, value| {
      Some(match acc {
        None => (value, value),
        Some((lo, hi)) => (lo.min(value), hi.max(value)),
      })
    })
  }

  /// Chart coordinates of one channel, time running left to right and larger
  /// values drawn higher (smaller y).
  pub fn polyline(&self, channel: Channel, width: f64, height: f64) -> Vec<(f64, f64)> {
    if self.samples.len() < 2 {
      return Vec::new();
    }
    let (t0, t1) = match (self.samples.front(), self.samples.back()) {
      (Some(first), Some(last)) => (first.t, last.t),
      _ => return Vec::new(),
    };
    let (lo, hi) = match self.range(channel) {
      Some(range) => range,
      None => return Vec::new(),
    };

    self
      .samples
      .iter()
      .map(|s| {
        let tx = normalize(s.t, t0, t1);
        let ty = normalize(channel.of(s), lo, hi);
        (
          tx * (width - 2.0 * CHART_PAD) + CHART_PAD,
          (1.0 - ty) * (height - 2.0 * CHART_PAD) + CHART_PAD,
        )
      })
      .collect()
  }

  pub fn to_csv(&self) -> String {
    let mut out = String::from("t,x,v,a\n");
    for s in &self.samples {
      let _ = writeln!(out, "{:.4},{:.6},{:.6},{:.6}", s.t, s.x, s.v, s.a);
    }
    out
  }
}
