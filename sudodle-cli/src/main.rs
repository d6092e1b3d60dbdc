use std::time::Duration;

use serde::Serialize;
use sudodle_core::Deadline;
use sudodle_gen::{
    cyclic_latin_square, find_single_solution_puzzles, score_puzzle_difficulty,
    uniform_random_latin_square,
};
use sudodle_io::{compact_puzzle, format_catalog_csv, format_tiles, parse_puzzle_lines, CatalogRecord};
use sudodle_sim::{run_cyclic_simulations, GameOutcome, TaskResult};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("cannot read {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Core(#[from] sudodle_core::CoreError),
    #[error(transparent)]
    Gen(#[from] sudodle_gen::GenError),
    #[error(transparent)]
    Sim(#[from] sudodle_sim::SimError),
    #[error(transparent)]
    Io(#[from] sudodle_io::IoError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn usage_err(msg: &str) -> CliError {
    CliError::Usage(msg.to_string())
}

#[cfg(feature = "telemetry-subscriber")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("sudodle_solver=info,sudodle_gen=info,sudodle_sim=info,sudodle_io=warn")
    });

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(not(feature = "telemetry-subscriber"))]
fn init_tracing() {}

fn usage() -> &'static str {
    "sudodle-cli\n\
\n\
USAGE:\n\
  sudodle-cli sample --n <N> [--seed <S>] [--uniform] [--burn-in <STEPS>]\n\
  sudodle-cli discover --n <N> --tiles <K> [--catalog]\n\
  sudodle-cli score --n <N> --file <PUZZLES.txt> [--json]\n\
  sudodle-cli simulate --n <N> --games <G> [--workers <W>] [--task-timeout-secs <T>] [--json]\n\
\n\
EXAMPLES:\n\
  sudodle-cli sample --n 5 --seed 42 --uniform\n\
  sudodle-cli discover --n 4 --tiles 4 --catalog\n\
  sudodle-cli score --n 5 --file puzzles.txt\n\
  sudodle-cli simulate --n 5 --games 100 --workers 8\n"
}

fn parse_arg_value(args: &[String], i: &mut usize) -> Result<String, CliError> {
    *i += 1;
    args.get(*i).cloned().ok_or_else(|| usage_err("missing value"))
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        match err {
            CliError::Usage(msg) => {
                eprintln!("{msg}\n\n{}", usage());
                std::process::exit(2);
            }
            other => {
                eprintln!("{other}");
                std::process::exit(1);
            }
        }
    }
}

fn run() -> Result<(), CliError> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        return Err(usage_err("missing command"));
    }

    let cmd = args[1].as_str();
    let mut n: Option<u8> = None;
    let mut seed: Option<u64> = None;
    let mut uniform = false;
    let mut burn_in: Option<u64> = None;
    let mut tiles: Option<usize> = None;
    let mut file: Option<String> = None;
    let mut games: usize = 10;
    let mut workers: usize = 4;
    let mut task_timeout = Duration::from_secs(30);
    let mut catalog = false;
    let mut json = false;

    let mut i = 2usize;
    while i < args.len() {
        match args[i].as_str() {
            "--n" | "-n" => {
                let v = parse_arg_value(&args, &mut i)?;
                n = Some(v.parse::<u8>().map_err(|_| usage_err("invalid --n"))?);
            }
            "--seed" => {
                let v = parse_arg_value(&args, &mut i)?;
                seed = Some(v.parse::<u64>().map_err(|_| usage_err("invalid --seed"))?);
            }
            "--uniform" => uniform = true,
            "--burn-in" => {
                let v = parse_arg_value(&args, &mut i)?;
                burn_in = Some(v.parse::<u64>().map_err(|_| usage_err("invalid --burn-in"))?);
            }
            "--tiles" | "-k" => {
                let v = parse_arg_value(&args, &mut i)?;
                tiles = Some(v.parse::<usize>().map_err(|_| usage_err("invalid --tiles"))?);
            }
            "--file" | "-f" => {
                file = Some(parse_arg_value(&args, &mut i)?);
            }
            "--games" => {
                let v = parse_arg_value(&args, &mut i)?;
                games = v.parse::<usize>().map_err(|_| usage_err("invalid --games"))?;
            }
            "--workers" => {
                let v = parse_arg_value(&args, &mut i)?;
                workers = v.parse::<usize>().map_err(|_| usage_err("invalid --workers"))?;
            }
            "--task-timeout-secs" => {
                let v = parse_arg_value(&args, &mut i)?;
                task_timeout = Duration::from_secs(
                    v.parse::<u64>()
                        .map_err(|_| usage_err("invalid --task-timeout-secs"))?,
                );
            }
            "--catalog" => catalog = true,
            "--json" => json = true,
            "--help" | "-h" => {
                println!("{}", usage());
                return Ok(());
            }
            other => {
                return Err(usage_err(&format!("unknown arg: {other}")));
            }
        }
        i += 1;
    }

    let Some(n) = n else {
        return Err(usage_err("missing required flag: --n"));
    };

    match cmd {
        "sample" => {
            let grid = if uniform {
                uniform_random_latin_square(n, seed, burn_in)?
            } else {
                sudodle_gen::random_latin_square(n, seed, Deadline::after(task_timeout))?
            };
            println!("{grid}");
        }
        "discover" => {
            let Some(k) = tiles else {
                return Err(usage_err("'discover' requires --tiles"));
            };
            let base = cyclic_latin_square(n)?;
            let puzzles = find_single_solution_puzzles(&base, k)?;

            if catalog {
                let mut records = Vec::with_capacity(puzzles.len());
                for puzzle in &puzzles {
                    let difficulty = score_puzzle_difficulty(&base, &puzzle.tiles)?;
                    records.push(CatalogRecord {
                        compacted_puzzle: compact_puzzle(n, &puzzle.tiles)?,
                        level: k as u32,
                        difficulty,
                    });
                }
                print!("{}", format_catalog_csv(&records));
            } else {
                for puzzle in &puzzles {
                    println!("{}", format_tiles(&puzzle.tiles));
                }
            }
        }
        "score" => {
            let Some(path) = file else {
                return Err(usage_err("'score' requires --file"));
            };
            let text = std::fs::read_to_string(&path)
                .map_err(|source| CliError::ReadFile { path, source })?;
            let base = cyclic_latin_square(n)?;
            let puzzles = parse_puzzle_lines(&text, true);

            let mut scored = Vec::with_capacity(puzzles.len());
            for tiles in &puzzles {
                let difficulty = score_puzzle_difficulty(&base, tiles)?;
                scored.push(ScoredPuzzle {
                    tiles: format_tiles(tiles),
                    difficulty,
                });
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&scored)?);
            } else {
                for entry in &scored {
                    println!("{}\t{}", entry.difficulty, entry.tiles);
                }
            }
        }
        "simulate" => {
            let results = run_cyclic_simulations(n, games, workers, task_timeout)?;
            let summary = summarize(&results);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "games={} solved={} out-of-turns={} stalled={} errors={} timeouts={}",
                    summary.games,
                    summary.solved,
                    summary.out_of_turns,
                    summary.stalled,
                    summary.errors,
                    summary.timeouts
                );
                for (tries, count) in summary.tries_histogram.iter().enumerate() {
                    if *count > 0 {
                        println!("solved in {} tries: {}", tries + 1, count);
                    }
                }
            }
        }
        _ => {
            return Err(usage_err(&format!("unknown command: {cmd}")));
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct ScoredPuzzle {
    tiles: String,
    difficulty: u32,
}

#[derive(Serialize)]
struct SimulationSummary {
    games: usize,
    solved: usize,
    out_of_turns: usize,
    stalled: usize,
    errors: usize,
    timeouts: usize,
    /// Index t counts games solved in t+1 tries.
    tries_histogram: Vec<usize>,
}

fn summarize(
    results: &[TaskResult<Result<GameOutcome, sudodle_sim::SimError>>],
) -> SimulationSummary {
    let mut summary = SimulationSummary {
        games: results.len(),
        solved: 0,
        out_of_turns: 0,
        stalled: 0,
        errors: 0,
        timeouts: 0,
        tries_histogram: vec![0; sudodle_sim::MAX_ROUNDS],
    };
    for result in results {
        match result {
            TaskResult::TimedOut => summary.timeouts += 1,
            TaskResult::Done(Err(_)) => summary.errors += 1,
            TaskResult::Done(Ok(GameOutcome::Solved { known_counts })) => {
                summary.solved += 1;
                let tries = known_counts.len() + 1;
                if let Some(slot) = summary.tries_histogram.get_mut(tries - 1) {
                    *slot += 1;
                }
            }
            TaskResult::Done(Ok(GameOutcome::OutOfTurns { .. })) => summary.out_of_turns += 1,
            TaskResult::Done(Ok(GameOutcome::SolverStalled)) => summary.stalled += 1,
        }
    }
    summary
}
