use affinity::otter::{self, Engine, ManualScheduler, Snapshot};
use affinity::{
    Action, AffinityConfig, Coloring, Contributions, Dimension, EntityKey, GraphOptions, Roster,
    SeedOptions, Session,
};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Affinity(affinity::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Affinity(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<affinity::Error> for CliError {
    fn from(value: affinity::Error) -> Self {
        Self::Affinity(value)
    }
}

impl From<affinity::affinity_core::Error> for CliError {
    fn from(value: affinity::affinity_core::Error) -> Self {
        Self::Affinity(value.into())
    }
}

impl From<otter::Error> for CliError {
    fn from(value: otter::Error) -> Self {
        Self::Affinity(value.into())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    Score,
    #[default]
    Rank,
    Layout,
    Seed,
}

#[derive(Debug)]
struct Args {
    command: Command,
    seed: u64,
    size: Option<usize>,
    focal: Option<EntityKey>,
    config: Option<String>,
    population: Option<String>,
    weights: Vec<(Dimension, f64)>,
    coloring: Option<Coloring>,
    animate: bool,
    frame_ms: u64,
    pretty: bool,
    verbose: u8,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: Command::default(),
            seed: 1,
            size: None,
            focal: None,
            config: None,
            population: None,
            weights: Vec::new(),
            coloring: None,
            animate: false,
            frame_ms: 16,
            pretty: false,
            verbose: 0,
        }
    }
}

fn usage() -> &'static str {
    "affinity-cli\n\
\n\
USAGE:\n\
  affinity-cli seed [--seed <n>] [--size <n>] [--config <path>] [--pretty]\n\
  affinity-cli rank [--focal <key>] [ROSTER] [WEIGHTS] [--pretty]\n\
  affinity-cli score [--focal <key>] [ROSTER] [WEIGHTS] [--pretty]\n\
  affinity-cli layout [--focal <key>] [--coloring none|location|department] [--animate] [--frame-ms <n>] [ROSTER] [WEIGHTS] [--pretty]\n\
\n\
ROSTER:   --population <path> | --seed <n> [--size <n>]\n\
WEIGHTS:  [--config <path>] [--weight <dimension>=<value>]...\n\
\n\
NOTES:\n\
  - Dimensions: connected, connections, departments, interests, locations (0 to 3).\n\
  - --config reads a JSON object with optional weights, simulation, forces, graph and seed sections.\n\
  - layout --animate prints one snapshot per frame as JSON lines before the final result.\n\
  - -v logs debug output to stderr, -vv trace.\n\
"
}

fn value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a str, CliError> {
    it.next().map(String::as_str).ok_or(CliError::Usage(usage()))
}

fn number<T: std::str::FromStr>(raw: &str) -> Result<T, CliError> {
    raw.parse::<T>().map_err(|_| CliError::Usage(usage()))
}

fn parse_weight(raw: &str) -> Result<(Dimension, f64), CliError> {
    let Some((name, v)) = raw.split_once('=') else {
        return Err(CliError::Usage(usage()));
    };
    let dimension = name
        .trim()
        .parse::<Dimension>()
        .map_err(|_| CliError::Usage(usage()))?;
    let value: f64 = number(v.trim())?;
    if !value.is_finite() {
        return Err(CliError::Usage(usage()));
    }
    Ok((dimension, value))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "score" => args.command = Command::Score,
            "rank" => args.command = Command::Rank,
            "layout" => args.command = Command::Layout,
            "seed" => args.command = Command::Seed,
            "--seed" => args.seed = number(value(&mut it)?)?,
            "--size" => args.size = Some(number(value(&mut it)?)?),
            "--focal" => args.focal = Some(EntityKey(number(value(&mut it)?)?)),
            "--config" => args.config = Some(value(&mut it)?.to_string()),
            "--population" => args.population = Some(value(&mut it)?.to_string()),
            "--weight" => args.weights.push(parse_weight(value(&mut it)?)?),
            "--coloring" => {
                args.coloring = Some(match value(&mut it)? {
                    "none" => Coloring::None,
                    "location" => Coloring::Location,
                    "department" => Coloring::Department,
                    _ => return Err(CliError::Usage(usage())),
                });
            }
            "--animate" => args.animate = true,
            "--frame-ms" => args.frame_ms = number(value(&mut it)?)?,
            "--pretty" => args.pretty = true,
            "-v" | "--verbose" => args.verbose += 1,
            "-vv" => args.verbose += 2,
            _ => return Err(CliError::Usage(usage())),
        }
    }

    Ok(args)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Built-in defaults, then the `--config` file, then the command-line overrides.
fn load_config(args: &Args) -> Result<AffinityConfig, CliError> {
    let mut config = affinity::default_config()?;
    if let Some(path) = &args.config {
        let file = AffinityConfig::from_json_str(&std::fs::read_to_string(path)?)?;
        config.deep_merge(file.as_value());
    }
    for &(dimension, value) in &args.weights {
        config.set_value(&format!("weights.{dimension}"), serde_json::Value::from(value));
    }
    if let Some(size) = args.size {
        config.set_value("seed.size", serde_json::Value::from(size));
    }
    if let Some(coloring) = args.coloring {
        config.set_section("graph.coloring", &coloring)?;
    }
    Ok(config)
}

fn load_roster(args: &Args, config: &AffinityConfig) -> Result<Roster, CliError> {
    if let Some(path) = &args.population {
        let text = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&text)?);
    }
    let options: SeedOptions = config.section("seed")?;
    Ok(affinity::generate(args.seed, &options)?)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PairOut {
    source: EntityKey,
    target: EntityKey,
    distance: f64,
    similarity: f64,
    contributions: Contributions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreOut<'a> {
    weights: &'a affinity::Weights,
    maximum: f64,
    pairs: Vec<PairOut>,
}

fn score(session: &Session, pretty: bool) -> Result<(), CliError> {
    let scorer = session.scorer()?;
    let population = session.population();
    let mut pairs = Vec::new();
    let mut push = |a: &affinity::Entity, b: &affinity::Entity| -> Result<(), CliError> {
        pairs.push(PairOut {
            source: a.key,
            target: b.key,
            distance: scorer.distance(a, b)?,
            similarity: scorer.similarity(a, b)?,
            contributions: scorer.contributions(a, b)?,
        });
        Ok(())
    };
    match session.focal() {
        Some(key) => {
            let focal = population.entity(key)?;
            for other in population.iter().filter(|e| e.key != key) {
                push(focal, other)?;
            }
        }
        None => {
            let all: Vec<_> = population.iter().collect();
            for (i, a) in all.iter().enumerate() {
                for b in &all[i + 1..] {
                    push(*a, *b)?;
                }
            }
        }
    }
    write_json(
        &ScoreOut {
            weights: session.weights(),
            maximum: scorer.maximum(),
            pairs,
        },
        pretty,
    )
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    graph: &'a otter::GraphData,
    snapshot: &'a Snapshot,
}

fn layout(args: &Args, config: &AffinityConfig, session: &Session) -> Result<(), CliError> {
    let options = affinity::explorer_options(config)?;
    let graph: &GraphOptions = &options.graph;
    let data = affinity::project(session, graph)?;
    let forces = graph.forces(&options.forces);

    let snapshot = if args.animate {
        let pretty = args.pretty;
        let mut engine = Engine::create(
            data.clone(),
            forces,
            options.simulation.clone(),
            ManualScheduler::new(),
            move |snapshot: &Snapshot| {
                if let Err(err) = write_json(snapshot, pretty) {
                    tracing::warn!(%err, "failed to write frame");
                }
            },
        )?;
        let frames = engine.run_paced(Duration::from_millis(args.frame_ms))?;
        tracing::debug!(frames, "animation finished");
        let snapshot = engine.simulation().snapshot();
        engine.dispose();
        snapshot
    } else {
        otter::layout(data.clone(), forces, options.simulation.clone())?
    };

    write_json(
        &LayoutOut {
            graph: &data,
            snapshot: &snapshot,
        },
        args.pretty,
    )
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    let weights = config.weights()?;

    let roster = load_roster(&args, &config)?;
    if args.command == Command::Seed {
        return write_json(&roster, args.pretty);
    }

    let mut session = Session::from_roster(roster, weights)?;
    if let Some(key) = args.focal {
        session.dispatch(Action::Select { key })?;
    }

    match args.command {
        Command::Score => score(&session, args.pretty),
        Command::Rank => write_json(&session.ranking()?, args.pretty),
        Command::Layout => layout(&args, &config, &session),
        Command::Seed => Ok(()),
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
