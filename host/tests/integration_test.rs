use maze_core::{solver, Coord, MazeEvent, NullSink, Tag};
use maze_host::{
    AsciiCanvas, Controller, CycleEnd, MazeRunner, MazeSnapshot, Phase, RunnerConfig, Viewport,
};
use std::time::Duration;

/// The known seed used across tests
const MAZE_SEED: u32 = 2918957128;

fn instant_config(rows: usize, cols: usize) -> RunnerConfig {
    RunnerConfig {
        rows: Some(rows),
        cols: Some(cols),
        seed: Some(MAZE_SEED),
        ..RunnerConfig::instant()
    }
}

#[tokio::test]
async fn test_cycles_chain_end_to_start() {
    let mut config = instant_config(15, 21);
    config.max_cycles = Some(4);
    let mut runner = MazeRunner::new(config, Vec::<MazeEvent>::new());

    let end = runner.run(tokio_util::sync::CancellationToken::new()).await;
    assert_eq!(end, CycleEnd::CycleLimit);
    assert_eq!(runner.cycles_completed(), 4);

    // Every new Start is the previous End
    let events = runner.sink();
    let ends: Vec<Coord> = events
        .iter()
        .filter_map(|e| match e {
            MazeEvent::CellMarked(c, Tag::End) => Some(*c),
            _ => None,
        })
        .collect();
    let starts: Vec<Coord> = events
        .iter()
        .filter_map(|e| match e {
            MazeEvent::CellMarked(c, Tag::Start) => Some(*c),
            _ => None,
        })
        .collect();
    assert_eq!(ends.len(), 4);
    assert_eq!(starts.len(), 4);
    assert_eq!(&starts[1..], &ends[..3]);

    // Partial regenerations keep the Start cell
    let kept: Vec<Option<Coord>> = events
        .iter()
        .filter_map(|e| match e {
            MazeEvent::WallsRestored { keep } => Some(*keep),
            _ => None,
        })
        .collect();
    assert_eq!(kept.len(), 4);
    assert_eq!(kept[0], None);
    assert_eq!(&kept[1..], &starts[1..].iter().copied().map(Some).collect::<Vec<_>>()[..]);
}

#[tokio::test]
async fn test_same_seed_same_run() {
    let mut config = instant_config(11, 11);
    config.max_cycles = Some(2);

    let mut a = MazeRunner::new(config.clone(), Vec::<MazeEvent>::new());
    let mut b = MazeRunner::new(config, Vec::<MazeEvent>::new());
    a.run(tokio_util::sync::CancellationToken::new()).await;
    b.run(tokio_util::sync::CancellationToken::new()).await;

    assert_eq!(a.grid(), b.grid());
    assert_eq!(a.sink(), b.sink());
}

#[tokio::test]
async fn test_canvas_tracks_run() {
    let mut config = instant_config(9, 9);
    config.max_cycles = Some(1);
    let mut runner = MazeRunner::new(config, AsciiCanvas::new());
    runner.run(tokio_util::sync::CancellationToken::new()).await;

    let canvas = runner.sink();
    let start = runner.start().unwrap();
    let end = runner.end().unwrap();
    assert_eq!(canvas.marked(Tag::Start), vec![start]);
    assert_eq!(canvas.marked(Tag::End), vec![end]);

    let mut path = runner.last_path().unwrap().to_vec();
    path.sort();
    assert_eq!(canvas.marked(Tag::Path), path);

    // The canvas walls match the carved grid
    let expected: Vec<Vec<u8>> = runner.grid().to_binary_grid();
    let drawn = canvas.draw();
    for (line, row) in drawn.lines().zip(&expected) {
        for (ch, &open) in line.chars().zip(row) {
            assert_eq!(ch == '#', open == 0);
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_controller_start_is_idempotent_and_stops() {
    let mut config = RunnerConfig::default();
    config.rows = Some(21);
    config.cols = Some(21);
    config.seed = Some(MAZE_SEED);
    let mut controller = Controller::new(MazeRunner::new(config, NullSink));

    assert!(controller.start().await);
    assert!(!controller.start().await);
    assert!(controller.is_running());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(controller.stop().await, Some(CycleEnd::Cancelled));
    assert!(!controller.is_running());

    let runner = controller.runner().unwrap();
    assert_eq!(runner.phase(), Phase::Stopped);
    assert!(runner.grid().walls_symmetric());
}

#[tokio::test(start_paused = true)]
async fn test_controller_resize_restarts() {
    let mut config = RunnerConfig::default();
    config.seed = Some(MAZE_SEED);
    let mut controller = Controller::new(MazeRunner::new(config, NullSink));
    controller.start().await;
    tokio::time::sleep(Duration::from_millis(30)).await;

    // Difficulty 5 uses 28px cells
    let restarted = controller
        .resize(Viewport {
            width: 1024,
            height: 768,
        })
        .await;
    assert!(restarted);
    assert!(controller.is_running());

    controller.stop().await;
    let grid = controller.runner().unwrap().grid();
    assert_eq!((grid.rows(), grid.cols()), (27, 35));
}

#[tokio::test]
async fn test_controller_restarts_after_finished_run() {
    let mut config = instant_config(7, 7);
    config.max_cycles = Some(1);
    let mut controller = Controller::new(MazeRunner::new(config, NullSink));

    controller.start().await;
    assert_eq!(controller.wait().await, Some(CycleEnd::CycleLimit));

    // max_cycles counts from construction, so the next run stops after
    // its first solve as well
    assert!(controller.start().await);
    assert_eq!(controller.wait().await, Some(CycleEnd::CycleLimit));
    assert_eq!(controller.runner().unwrap().cycles_completed(), 2);
}

#[test]
fn test_snapshot_file_round_trip() {
    let snapshot = MazeSnapshot::generate(11, 15, MAZE_SEED);
    let path = std::env::temp_dir().join(format!("maze_snapshot_{}.json", std::process::id()));

    snapshot.save(&path).expect("save snapshot");
    let loaded = MazeSnapshot::load(&path).expect("load snapshot");
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, snapshot);

    let grid = loaded.to_grid().expect("snapshot grid");
    assert_eq!(grid.passage_count(), 11 * 15 - 1);
    let solved = solver::solve(&grid, loaded.start(), loaded.end(), &mut NullSink)
        .expect("snapshot maze is solvable");
    assert_eq!(solved, loaded.path());
}
