use maze_core::{solver, NullSink};
use maze_host::{
    AsciiCanvas, Controller, CycleEnd, MazeRunner, MazeSnapshot, RunnerConfig, TracingSink,
};
use std::env;
use std::time::Instant;
use tokio::signal;

#[tokio::main]
async fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "run" => {
            let config = parse_run_args(&args[2..]).unwrap_or_else(|e| {
                eprintln!("❌ Error: {}", e);
                std::process::exit(1);
            });
            run_command(config).await;
        }

        "generate" => {
            if args.len() < 5 {
                eprintln!("Usage: {} generate <rows> <cols> <seed> [output_file]", args[0]);
                std::process::exit(1);
            }
            let rows = parse_arg::<usize>("rows", &args[2]);
            let cols = parse_arg::<usize>("cols", &args[3]);
            let seed = parse_arg::<u32>("seed", &args[4]);

            generate_command(rows, cols, seed, args.get(5).map(|s| s.as_str()));
        }

        "solve" => {
            if args.len() < 3 {
                eprintln!("Usage: {} solve <snapshot_file>", args[0]);
                std::process::exit(1);
            }
            solve_command(&args[2]);
        }

        command => {
            eprintln!("❌ Unknown command: {}", command);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [options]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run [--rows <n>] [--cols <n>] [--difficulty <1-10>] [--seed <n>]");
    eprintln!("      [--cycles <n>] [--config <file>]");
    eprintln!("      Generate, solve and advance mazes until Ctrl+C");
    eprintln!("      - --rows/--cols: Grid size in cells (forced odd)");
    eprintln!("                       Default: derived from an 800x600 viewport");
    eprintln!("      - --difficulty: 1 (easy) to 10 (hard). Default: 5");
    eprintln!("      - --seed: Integer seed; a random one is drawn if omitted");
    eprintln!("      - --cycles: Stop after this many solved mazes");
    eprintln!("      - --config: JSON runner configuration");
    eprintln!();
    eprintln!("  generate <rows> <cols> <seed> [output_file]");
    eprintln!("      Carve and solve one maze, saving a JSON snapshot");
    eprintln!("      - output_file: Defaults to <seed>_maze.json");
    eprintln!();
    eprintln!("  solve <snapshot_file>");
    eprintln!("      Re-solve a saved snapshot and compare with its stored path");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MAZE_DIFFICULTY, MAZE_SEED, MAZE_BATCH_SIZE override the config file;");
    eprintln!("  command-line flags override both. RUST_LOG sets the log filter.");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  {} generate 21 31 2918957128", program);
    eprintln!("  {} solve 2918957128_maze.json", program);
}

fn parse_arg<T: std::str::FromStr>(name: &str, value: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        eprintln!("❌ Error: Invalid {} '{}'. Must be a positive integer.", name, value);
        std::process::exit(1);
    })
}

/// Build the runner configuration: file, then environment, then flags.
fn parse_run_args(args: &[String]) -> Result<RunnerConfig, Box<dyn std::error::Error>> {
    let config_file = args
        .iter()
        .position(|a| a == "--config")
        .map(|i| args.get(i + 1).ok_or("--config requires a file"))
        .transpose()?;

    let mut config = match config_file {
        Some(path) => RunnerConfig::from_json_file(path)?,
        None => RunnerConfig::default(),
    };
    config.apply_env()?;

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .ok_or_else(|| format!("{} requires a value", flag))
        };
        match flag.as_str() {
            "--rows" => config.rows = Some(value()?.parse()?),
            "--cols" => config.cols = Some(value()?.parse()?),
            "--difficulty" => config.difficulty = value()?.parse()?,
            "--seed" => config.seed = Some(value()?.parse()?),
            "--cycles" => config.max_cycles = Some(value()?.parse()?),
            "--config" => {
                value()?;
            }
            other => return Err(format!("Unknown option '{}'", other).into()),
        }
    }

    config.validate()?;
    Ok(config)
}

async fn run_command(config: RunnerConfig) {
    println!("🌀 Maze runner");
    println!("{}", "=".repeat(70));

    let runner = MazeRunner::new(config, (TracingSink, AsciiCanvas::new()));
    println!("  Grid: {}x{} cells", runner.grid().rows(), runner.grid().cols());
    println!("  Seed: {}", runner.seed());
    println!("  Difficulty: {}", runner.config().difficulty);
    println!();

    let mut controller = Controller::new(runner);
    controller.start().await;

    let end = tokio::select! {
        end = controller.wait() => end,
        _ = shutdown_signal() => {
            println!();
            println!("🛑 Stopping...");
            controller.stop().await
        }
    };

    let Some(runner) = controller.into_runner() else {
        eprintln!("❌ Maze task failed; nothing to show");
        std::process::exit(1);
    };

    println!();
    print!("{}", runner.sink().1.draw());
    println!();
    println!("  Solved cycles: {}", runner.cycles_completed());
    match end {
        Some(CycleEnd::NoPath) => println!("⚠️  Stopped: End was unreachable"),
        Some(CycleEnd::CycleLimit) => println!("✅ Cycle limit reached"),
        Some(CycleEnd::Faulted) => println!("❌ Stopped after an internal fault (see log)"),
        Some(CycleEnd::Cancelled) | None => println!("✅ Stopped"),
    }
    println!("{}", "=".repeat(70));
}

fn generate_command(rows: usize, cols: usize, seed: u32, output_file: Option<&str>) {
    println!("📋 Generating maze");
    println!("  Size: {}x{} cells", rows, cols);
    println!("  Seed: {}", seed);
    println!();

    let started = Instant::now();
    let snapshot = MazeSnapshot::generate(rows, cols, seed);
    println!("  Generation time: {:.3}s", started.elapsed().as_secs_f64());
    println!("  Start: {:?}  End: {:?}", snapshot.start, snapshot.end);
    println!("  Path length: {} cells", snapshot.path.len());
    println!();

    let default_filename = format!("{}_maze.json", seed);
    let file_to_save = output_file.unwrap_or(&default_filename);

    match snapshot.save(file_to_save) {
        Ok(()) => println!("💾 Maze saved to: {}", file_to_save),
        Err(e) => {
            eprintln!("❌ Error saving maze: {}", e);
            std::process::exit(1);
        }
    }
    println!("{}", "=".repeat(70));
}

fn solve_command(snapshot_file: &str) {
    println!("📋 Solving maze snapshot");
    println!("  File: {}", snapshot_file);
    println!();

    let snapshot = match MazeSnapshot::load(snapshot_file) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("❌ Error loading snapshot: {}", e);
            std::process::exit(1);
        }
    };
    let grid = match snapshot.to_grid() {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    println!("📦 Loaded {}x{} maze (seed: {})", grid.rows(), grid.cols(), snapshot.seed);

    let started = Instant::now();
    let path = solver::solve(&grid, snapshot.start(), snapshot.end(), &mut NullSink);
    println!("  Solve time: {:.3}s", started.elapsed().as_secs_f64());
    println!();

    match path {
        Some(path) => {
            println!("✅ Path found: {} cells", path.len());
            if snapshot.path.is_empty() {
                println!("  Snapshot had no stored path");
            } else if path == snapshot.path() {
                println!("  Matches the stored path ✓");
            } else {
                println!("  Differs from the stored path ({} cells) ✗", snapshot.path.len());
            }
        }
        None => {
            println!("❌ No path from {:?} to {:?}", snapshot.start, snapshot.end);
            std::process::exit(2);
        }
    }
    println!("{}", "=".repeat(70));
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
