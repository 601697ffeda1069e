use approx::assert_relative_eq;
use physlab::clock::TICK;
use physlab::labs::{Lab, LabKind, LabRunner, NewtonLab, RocketLab, UniformMotionLab};
use physlab::orbit::Verdict;
use physlab::quiz::{parse_quizzes, Answers, Grade};
use physlab::store::{Profile, Store};
use physlab::{MotionMode, NewtonParams, RocketParams, UniformParams};

#[test]
fn uniform_motion_covers_v_times_t() {
  let mut runner = LabRunner::new(UniformMotionLab::new(UniformParams::default()), 1.0);
  for _ in 0..60 {
    runner.frame(TICK);
  }
  assert_relative_eq!(runner.lab().position(), 2.0, max_relative = 1e-6);
  assert_relative_eq!(runner.clock().elapsed(), 1.0, max_relative = 1e-9);
}

#[test]
fn accelerated_motion_matches_kinematics() {
  let params = UniformParams {
    mode: MotionMode::Accelerated,
    v0: 0.0,
    a: 2.0,
  };
  let mut runner = LabRunner::new(UniformMotionLab::new(params), 1.0);
  for _ in 0..60 {
    runner.frame(TICK);
  }
  assert_relative_eq!(runner.lab().velocity(), 2.0, max_relative = 1e-6);
  // semi-implicit Euler runs slightly ahead of a t^2 / 2
  assert!((runner.lab().position() - 1.0).abs() < 0.05);
}

#[test]
fn newton_lab_approaches_terminal_velocity() {
  let lab = NewtonLab::new(NewtonParams::default());
  let terminal = lab.terminal_velocity(TICK).unwrap_or(f64::INFINITY);
  let mut runner = LabRunner::new(lab, 1.0);
  for _ in 0..600 {
    runner.frame(TICK);
  }
  assert_relative_eq!(runner.lab().velocity(), terminal, max_relative = 1e-3);
}

#[test]
fn slow_rocket_falls_back_and_stops_consuming_time() {
  let params = RocketParams {
    v0: 1.0,
    ..RocketParams::default()
  };
  let lab = RocketLab::new(params);
  assert_eq!(lab.elements().verdict(), Verdict::Suborbital);

  let mut runner = LabRunner::new(lab, 50.0);
  for _ in 0..600 {
    runner.frame(1.0 / 30.0);
    if runner.lab().impacted() {
      break;
    }
  }
  assert!(runner.lab().impacted());
  assert!(runner.lab().halted());
  assert_relative_eq!(runner.lab().altitude(), 0.0, epsilon = 1e-9);
  assert_eq!(runner.frame(1.0), 0);
  assert_eq!(runner.clock().leftover(), 0.0);
}

#[test]
fn elapsed_counts_only_ticks_run_before_impact() {
  let params = RocketParams {
    v0: 0.0,
    height: 1.0,
    ..RocketParams::default()
  };
  let mut runner = LabRunner::new(RocketLab::new(params), 50.0);
  let ran = runner.frame(1.0);
  assert!(runner.lab().impacted());
  assert!(ran > 0 && ran < 3000, "ran = {ran}");
  assert_relative_eq!(runner.clock().elapsed(), ran as f64 * TICK, max_relative = 1e-9);

  runner.frame(1.0);
  assert_relative_eq!(runner.clock().elapsed(), ran as f64 * TICK, max_relative = 1e-9);
}

#[test]
fn rocket_time_scale_is_clamped() {
  let runner = LabRunner::new(RocketLab::new(RocketParams::default()), 500.0);
  assert_eq!(runner.time_scale(), 50.0);

  let boxed = LabKind::RocketOrbit.build().unwrap();
  assert_eq!(boxed.default_time_scale(), 20.0);
  let uniform = LabKind::UniformMotion.build().unwrap();
  assert_eq!(uniform.default_time_scale(), 1.0);
}

#[test]
fn every_dynamic_lab_runs_through_the_registry() {
  for kind in LabKind::ALL {
    match kind.build() {
      Some(lab) => {
        assert!(kind.is_dynamic());
        let mut runner = LabRunner::new(lab, 1.0);
        assert!(runner.frame(0.25) > 0, "{kind} did not tick");
        assert_eq!(runner.lab().kind(), kind);
        assert!(runner.series().len() > 1);
      }
      None => assert_eq!(kind, LabKind::Pressure),
    }
  }
}

#[test]
fn quiz_result_is_saved_for_the_profile() {
  let dir = std::env::temp_dir().join(format!("physlab-it-{}", std::process::id()));
  let _ = std::fs::remove_dir_all(&dir);
  let path = dir.join("store.json");

  let quiz = parse_quizzes(
    r#"{"id": 9, "title": "Pressure", "questions": [
      {"id": 1, "question": "P = F / ?", "choices": [{"id": 1, "text": "S"}, {"id": 2, "text": "t"}], "correctChoiceId": 1},
      {"id": 2, "question": "Unit of P?", "choices": [{"id": 1, "text": "Pa"}, {"id": 2, "text": "N"}], "correctChoiceId": 1}
    ]}"#,
  )
  .unwrap()
  .remove(0);

  let mut store = Store::open(&path);
  store.set_profile(Profile::new("Dilnoza", "Rahimova", "8-B")).unwrap();
  let answers: Answers = [(1, 1), (2, 2)].into_iter().collect();
  let score = quiz.score(&answers);
  store.record_quiz(&quiz, score).unwrap();

  let reopened = Store::open(&path);
  let record = &reopened.quiz_results()["9"];
  assert_eq!(record.student, "Dilnoza Rahimova");
  assert_eq!(record.score.percent, 50);
  assert_eq!(record.level, Grade::Satisfactory);
  let _ = std::fs::remove_dir_all(&dir);
}
