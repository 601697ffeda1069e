use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info};
use physlab::error::{finite, non_negative, positive};
use physlab::game::{self, Difficulty, GameSession};
use physlab::integrator::Vec3;
use physlab::labs::{
  BuoyancyLab, FrictionLab, Lab, LabKind, LabRunner, NewtonLab, PressureLab, RocketLab,
  UniformMotionLab,
};
use physlab::methods::{self, Method};
use physlab::orbit::{OrbitalElements, MU_EARTH};
use physlab::quiz::{self, Answers};
use physlab::store::{Profile, Store};
use physlab::telemetry::Sample;
use physlab::{
  BuoyancyParams, FrictionParams, LabError, MotionMode, NewtonParams, PressureParams,
  RocketParams, RunParams, UniformParams,
};
use std::error::Error;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Physics labs, quizzes and reflections for the classroom
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
  /// File holding the profile, quiz results and reflections
  #[arg(long, global = true, default_value = "physlab.json")]
  store: PathBuf,
  #[command(subcommand)]
  command: Commands,
}

#[derive(Args, Debug)]
struct RunArgs {
  /// Real seconds to run the lab for
  #[arg(long, default_value_t = 10.0)]
  duration: f64,
  /// Simulated seconds per real second [default: 1, rocket 20]
  #[arg(long)]
  time_scale: Option<f64>,
  /// Frame interval fed to the fixed-step clock
  #[arg(long, default_value_t = 1.0 / 60.0)]
  frame_dt: f64,
  /// Print every Nth telemetry sample
  #[arg(long, default_value_t = 30)]
  every: usize,
  /// Pace frames by the wall clock; Ctrl-C stops early
  #[arg(long, default_value_t = false)]
  realtime: bool,
  /// Write the chart history (last samples kept for plotting) to this file
  #[arg(long)]
  csv: Option<PathBuf>,
}

impl RunArgs {
  fn params(&self, default_time_scale: f64) -> Result<RunParams, LabError> {
    let time_scale = self.time_scale.unwrap_or(default_time_scale);
    Ok(RunParams {
      time_scale: non_negative("time-scale", time_scale)?,
      duration: non_negative("duration", self.duration)?,
      frame_dt: positive("frame-dt", self.frame_dt)?,
    })
  }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
  Uniform,
  Accelerated,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LevelArg {
  Easy,
  Medium,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// List the available labs
  Labs,
  /// Run any dynamic lab with its default parameters
  Run {
    /// Lab key such as fizika/raketa-orbita, or just the slug
    lab: LabKind,
    #[command(flatten)]
    run: RunArgs,
  },
  /// Constant velocity or constant acceleration along a corridor
  Uniform {
    #[arg(long, value_enum, default_value_t = ModeArg::Uniform)]
    mode: ModeArg,
    #[arg(long, default_value_t = UniformParams::default().v0, allow_hyphen_values = true)]
    v0: f64,
    #[arg(long, default_value_t = UniformParams::default().a, allow_hyphen_values = true)]
    a: f64,
    #[command(flatten)]
    run: RunArgs,
  },
  /// F = ma with velocity damping
  Newton {
    #[arg(long, default_value_t = NewtonParams::default().mass)]
    mass: f64,
    #[arg(long, default_value_t = NewtonParams::default().force, allow_hyphen_values = true)]
    force: f64,
    #[arg(long, default_value_t = NewtonParams::default().friction)]
    friction: f64,
    #[command(flatten)]
    run: RunArgs,
  },
  /// Can the push beat friction?
  Friction {
    #[arg(long, default_value_t = FrictionParams::default().mass)]
    mass: f64,
    #[arg(long, default_value_t = FrictionParams::default().mu)]
    mu: f64,
    #[arg(long, default_value_t = FrictionParams::default().push)]
    push: f64,
    #[command(flatten)]
    run: RunArgs,
  },
  /// Pressure of a force spread over an area
  Pressure {
    #[arg(long, default_value_t = PressureParams::default().force)]
    force: f64,
    #[arg(long, default_value_t = PressureParams::default().area)]
    area: f64,
  },
  /// A cube dropped into water
  Buoyancy {
    #[arg(long, default_value_t = BuoyancyParams::default().object_density)]
    object_density: f64,
    #[arg(long, default_value_t = BuoyancyParams::default().fluid_density)]
    fluid_density: f64,
    #[arg(long, default_value_t = BuoyancyParams::default().volume)]
    volume: f64,
    #[command(flatten)]
    run: RunArgs,
  },
  /// Launch a rocket from the equator
  Rocket {
    /// Launch speed, km/s
    #[arg(long, default_value_t = RocketParams::default().v0)]
    v0: f64,
    /// Launch altitude, km
    #[arg(long, default_value_t = RocketParams::default().height)]
    height: f64,
    /// Heading, degrees from east towards north
    #[arg(long, default_value_t = RocketParams::default().azimuth_deg)]
    azimuth: f64,
    #[arg(long, default_value_t = RocketParams::default().substeps)]
    substeps: u32,
    /// Engine thrust along the velocity, km/s^2 (0 is off)
    #[arg(long, default_value_t = 0.0)]
    thrust: f64,
    /// Disable atmospheric drag
    #[arg(long, default_value_t = false)]
    no_drag: bool,
    #[command(flatten)]
    run: RunArgs,
  },
  /// Orbital elements of a state vector around the Earth
  Orbit {
    /// Position x,y,z in km
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    r: Vec3,
    /// Velocity x,y,z in km/s
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    v: Vec3,
    /// Gravitational parameter, km^3/s^2
    #[arg(long, default_value_t = MU_EARTH)]
    mu: f64,
  },
  /// Show or set the learner profile
  Profile {
    #[command(subcommand)]
    action: Option<ProfileAction>,
  },
  /// Score a quiz and save the result
  Quiz {
    /// JSON file with one quiz or a list of quizzes
    #[arg(long)]
    file: PathBuf,
    /// Quiz id, needed when the file holds several
    #[arg(long)]
    id: Option<u32>,
    /// QUESTION=CHOICE, repeatable
    #[arg(long = "answer", value_parser = quiz::parse_answer)]
    answers: Vec<(u32, u32)>,
  },
  /// Timed subject quiz read from standard input
  Play {
    /// JSON list of questions tagged with a subject
    #[arg(long)]
    questions: PathBuf,
    #[arg(long)]
    subject: String,
    #[arg(long, value_enum, default_value_t = LevelArg::Easy)]
    level: LevelArg,
    /// Shuffle the questions with this seed
    #[arg(long)]
    seed: Option<u64>,
  },
  /// Browse the catalog of teaching methods
  Methods {
    /// JSON list of methods
    #[arg(long, default_value = "methods.json")]
    file: PathBuf,
    /// Quiz file, to show which methods have a mini-quiz
    #[arg(long)]
    quizzes: Option<PathBuf>,
    #[command(subcommand)]
    action: Option<MethodsAction>,
  },
  /// Write or list reflections
  Reflect {
    /// Method catalog used to name reflections
    #[arg(long)]
    methods: Option<PathBuf>,
    #[command(subcommand)]
    action: ReflectAction,
  },
  /// Forget the profile, quiz results and reflections
  Reset,
  /// Generate shell completion scripts
  Completions {
    /// The shell to generate the script for
    #[arg(value_enum)]
    shell: Shell,
  },
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
  Set {
    #[arg(long)]
    first: String,
    #[arg(long)]
    last: String,
    /// Class, group or school
    #[arg(long, default_value = "")]
    org: String,
  },
}

#[derive(Subcommand, Debug)]
enum MethodsAction {
  List,
  Show { id: u32 },
}

#[derive(Subcommand, Debug)]
enum ReflectAction {
  Add {
    text: String,
    #[arg(long)]
    method_id: Option<u32>,
    /// Used when the method is not in the catalog
    #[arg(long, default_value = "")]
    method_title: String,
  },
  List,
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
  let parts: Vec<f64> = s
    .split(',')
    .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
    .collect::<Result<_, _>>()?;
  match parts.as_slice() {
    [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
    _ => Err(format!("expected x,y,z, got {} components", parts.len())),
  }
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Vec<Method>, LabError> {
  match path {
    Some(path) => methods::load_methods(path),
    None => Ok(Vec::new()),
  }
}

fn show_method(method: &Method, quiz: Option<&quiz::Quiz>) {
  println!("{}: {}", method.id, method.title);
  println!(
    "  {} / {} / ~{} min",
    method.category, method.difficulty, method.estimated_minutes
  );
  if !method.description.is_empty() {
    println!("  {}", method.description);
  }
  let sections = [
    ("Steps", &method.steps),
    ("Assessment", &method.assessment),
    ("Reflection prompts", &method.reflection_prompts),
  ];
  for (title, items) in sections {
    if items.is_empty() {
      continue;
    }
    println!("{title}:");
    for (i, item) in items.iter().enumerate() {
      println!("  {}. {item}", i + 1);
    }
  }
  if let Some(quiz) = quiz {
    println!("mini-quiz: {} ({})", quiz.id, quiz.title);
  }
}

fn print_sample(s: &Sample) {
  println!("{:.4},{:.6},{:.6},{:.6}", s.t, s.x, s.v, s.a);
}

fn run_lab<L: Lab>(lab: L, args: &RunArgs) -> Result<(), Box<dyn Error>> {
  let params = args.params(lab.default_time_scale())?;
  let every = args.every.max(1);
  let mut runner = LabRunner::new(lab, params.time_scale);
  info!("{}: {}", runner.lab().kind().title(), runner.lab().describe());

  println!("t,x,v,a");
  if let Some(first) = runner.series().last() {
    print_sample(first);
  }
  let mut count = 0usize;
  let mut on_sample = |s: &Sample| {
    count += 1;
    if count % every == 0 {
      print_sample(s);
    }
  };

  if args.realtime {
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::SeqCst))?;

    let started = Instant::now();
    let mut last = started;
    let frame = Duration::from_secs_f64(params.frame_dt);
    while !stop.load(Ordering::SeqCst) && started.elapsed().as_secs_f64() < params.duration {
      std::thread::sleep(frame);
      let now = Instant::now();
      runner.frame_with((now - last).as_secs_f64(), &mut on_sample);
      last = now;
    }
    if stop.load(Ordering::SeqCst) {
      info!("interrupted after {:.1} s", started.elapsed().as_secs_f64());
    }
  } else {
    let frames = (params.duration / params.frame_dt).round() as u64;
    for _ in 0..frames {
      runner.frame_with(params.frame_dt, &mut on_sample);
    }
  }

  debug!("{} ticks, {:.3} simulated s", count, runner.clock().elapsed());
  if runner.lab().halted() {
    info!("lab halted");
  }
  eprintln!("{}", runner.lab().describe());
  if let Some(path) = &args.csv {
    std::fs::write(path, runner.series().to_csv())?;
    info!("wrote {} samples to {}", runner.series().len(), path.display());
  }
  Ok(())
}

fn show_profile(store: &Store) {
  match store.profile() {
    Some(p) => {
      let org = if p.org.is_empty() { "-" } else { p.org.as_str() };
      println!("{} ({org})", p.full_name());
    }
    None => println!("no profile yet"),
  }
  for record in store.quiz_history() {
    println!(
      "quiz {} {:?}: {}/{} ({}%), {}",
      record.quiz_id,
      record.quiz_title,
      record.score.score,
      record.score.total,
      record.score.percent,
      record.level.title()
    );
  }
  if let Some(game) = store.last_game() {
    println!(
      "last game {} ({}): {}/{} ({}%), {}",
      game.subject,
      game.level.grades(),
      game.score,
      game.total,
      game.percent,
      game.grade.title()
    );
  }
}

fn play(store: &mut Store, session: &mut GameSession) -> Result<(), Box<dyn Error>> {
  let per_question = i64::from(session.difficulty().seconds_per_question());
  let stdin = io::stdin();
  let mut lines = stdin.lock().lines();

  while let Some(question) = session.current().cloned() {
    let (n, total) = session.progress();
    println!("[{n}/{total}] {} ({per_question} s)", question.question);
    for choice in &question.choices {
      println!("  {}) {}", choice.id, choice.text);
    }

    let asked = Instant::now();
    let line = match lines.next() {
      Some(line) => line?,
      None => break,
    };
    let time_left = per_question - asked.elapsed().as_secs() as i64;
    if time_left <= 0 {
      println!("time is up");
      session.timeout();
      continue;
    }
    match line.trim().parse::<u32>() {
      Ok(choice) => match session.answer(choice, time_left) {
        Some(true) => println!("correct, score {}", session.score()),
        Some(false) => println!("wrong, the answer was {}", question.correct_choice_id),
        None => break,
      },
      Err(_) => {
        println!("skipped");
        session.timeout();
      }
    }
  }

  match session.result() {
    Some(result) => {
      println!(
        "{}/{} points ({}%): {}",
        result.score,
        result.total,
        result.percent,
        result.grade.title()
      );
      store.set_last_game(result)?;
    }
    None => println!("game abandoned with {} points", session.score()),
  }
  Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
  env_logger::init();
  let cli = Cli::parse();

  match cli.command {
    Commands::Labs => {
      for kind in LabKind::ALL {
        let note = if kind.is_dynamic() { "" } else { " (static)" };
        println!("{:<24} {}{note}", kind.key(), kind.title());
      }
    }
    Commands::Run { lab, run } => match lab.build() {
      Some(lab) => run_lab(lab, &run)?,
      None => {
        let lab = PressureLab::new(PressureParams::default());
        println!("{}", lab.describe());
      }
    },
    Commands::Uniform { mode, v0, a, run } => {
      let mode = match mode {
        ModeArg::Uniform => MotionMode::Uniform,
        ModeArg::Accelerated => MotionMode::Accelerated,
      };
      let params = UniformParams {
        mode,
        v0: finite("v0", v0)?,
        a: finite("a", a)?,
      };
      run_lab(UniformMotionLab::new(params), &run)?;
    }
    Commands::Newton {
      mass,
      force,
      friction,
      run,
    } => {
      let params = NewtonParams {
        mass: non_negative("mass", mass)?,
        force: finite("force", force)?,
        friction: non_negative("friction", friction)?,
      };
      run_lab(NewtonLab::new(params), &run)?;
    }
    Commands::Friction {
      mass,
      mu,
      push,
      run,
    } => {
      let params = FrictionParams {
        mass: positive("mass", mass)?,
        mu: non_negative("mu", mu)?,
        push: non_negative("push", push)?,
      };
      let lab = FrictionLab::new(params);
      let analysis = lab.analysis();
      info!(
        "N = {:.2} N, Ff = {:.2} N, moves: {}, intensity {:.2}",
        analysis.normal, analysis.friction, analysis.can_move, analysis.intensity
      );
      run_lab(lab, &run)?;
    }
    Commands::Pressure { force, area } => {
      let lab = PressureLab::new(PressureParams {
        force: finite("force", force)?,
        area: non_negative("area", area)?,
      });
      println!("{}", lab.describe());
    }
    Commands::Buoyancy {
      object_density,
      fluid_density,
      volume,
      run,
    } => {
      let params = BuoyancyParams {
        object_density: positive("object-density", object_density)?,
        fluid_density: non_negative("fluid-density", fluid_density)?,
        volume: non_negative("volume", volume)?,
      };
      run_lab(BuoyancyLab::new(params), &run)?;
    }
    Commands::Rocket {
      v0,
      height,
      azimuth,
      substeps,
      thrust,
      no_drag,
      run,
    } => {
      let params = RocketParams {
        v0: finite("v0", v0)?,
        height: finite("height", height)?,
        azimuth_deg: finite("azimuth", azimuth)?,
        substeps,
        thrust_on: thrust > 0.0,
        thrust: non_negative("thrust", thrust)?,
        drag_on: !no_drag,
      };
      run_lab(RocketLab::new(params), &run)?;
    }
    Commands::Orbit { r, v, mu } => {
      let el = OrbitalElements::from_state(r, v, positive("mu", mu)?);
      println!("{}", serde_json::to_string_pretty(&el)?);
      println!("{}", el.verdict());
    }
    Commands::Profile { action } => {
      let mut store = Store::open(&cli.store);
      if let Some(ProfileAction::Set { first, last, org }) = action {
        store.set_profile(Profile::new(&first, &last, &org))?;
      }
      show_profile(&store);
    }
    Commands::Quiz { file, id, answers } => {
      let mut store = Store::open(&cli.store);
      let quizzes = quiz::load_quizzes(&file)?;
      let quiz = match id {
        Some(id) => quizzes.into_iter().find(|q| q.id == id),
        None if quizzes.len() == 1 => quizzes.into_iter().next(),
        None => None,
      }
      .ok_or_else(|| format!("pick a quiz with --id from {}", file.display()))?;

      let answers: Answers = answers.into_iter().collect();
      quiz.check(&answers)?;
      let score = quiz.score(&answers);
      let record = store.record_quiz(&quiz, score)?;
      println!(
        "{}: {}/{} ({}%) {}",
        record.quiz_title,
        score.score,
        score.total,
        score.percent,
        record.level.title()
      );
    }
    Commands::Play {
      questions,
      subject,
      level,
      seed,
    } => {
      let mut store = Store::open(&cli.store);
      if !store.require_profile() {
        return Err(LabError::MissingProfile.into());
      }
      let difficulty = match level {
        LevelArg::Easy => Difficulty::Easy,
        LevelArg::Medium => Difficulty::Medium,
      };
      let pool = game::load_questions(&questions)?;
      let mut session = GameSession::new(&subject, difficulty, &pool)?;
      if let Some(seed) = seed {
        session.shuffle(seed);
      }
      play(&mut store, &mut session)?;
    }
    Commands::Methods {
      file,
      quizzes,
      action,
    } => {
      let catalog = methods::load_methods(&file)?;
      let quizzes = match &quizzes {
        Some(path) => quiz::load_quizzes(path)?,
        None => Vec::new(),
      };
      match action {
        None | Some(MethodsAction::List) => {
          for m in &catalog {
            let tags: Vec<String> = m.tags.iter().take(3).map(|t| format!("#{t}")).collect();
            let quiz = if m.quiz(&quizzes).is_some() { " [quiz]" } else { "" };
            println!(
              "{:>3} {} ({}, {}, ~{} min) {}{quiz}",
              m.id,
              m.title,
              m.category,
              m.difficulty,
              m.estimated_minutes,
              tags.join(" ")
            );
          }
        }
        Some(MethodsAction::Show { id }) => {
          let method = methods::find(&catalog, id)?;
          show_method(method, method.quiz(&quizzes));
        }
      }
    }
    Commands::Reflect { methods: catalog, action } => {
      let mut store = Store::open(&cli.store);
      let catalog = load_catalog(catalog.as_ref())?;
      match action {
        ReflectAction::Add {
          text,
          method_id,
          method_title,
        } => {
          let title = match method_id {
            Some(id) if !catalog.is_empty() => methods::find(&catalog, id)?.title.clone(),
            _ => method_title,
          };
          store.add_reflection(method_id, &title, &text)?;
          println!("saved to {}", store.path().display());
        }
        ReflectAction::List => {
          if store.reflections().is_empty() {
            println!("no reflections yet");
          }
          let titles = methods::titles(&catalog);
          for r in store.reflections() {
            let heading = methods::reflection_heading(r, &titles);
            println!("[{}] {} / {}: {}", r.created_at, r.student, heading, r.text);
          }
        }
      }
    }
    Commands::Reset => {
      let mut store = Store::open(&cli.store);
      store.clear_all()?;
      println!("cleared {}", store.path().display());
    }
    Commands::Completions { shell } => {
      let mut cmd = Cli::command();
      let name = cmd.get_name().to_string();
      generate(shell, &mut cmd, name, &mut io::stdout());
    }
  }
  Ok(())
}
