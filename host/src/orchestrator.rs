//! The generate → solve → advance cycle
//!
//! [`MazeRunner`] owns the grid and everything mutated by the phases. Its
//! async methods run one phase at a time, yielding between batches so the
//! continue token (a [`CancellationToken`]) is observed promptly.
//! [`Controller`] owns the spawned task: it makes `start` idempotent and
//! turns a resize into stop → rebuild → restart, so no phase ever sees a
//! half-rebuilt grid.

use std::time::Duration;

use maze_core::selection::{reselect_end, select_start_end, Endpoints};
use maze_core::{
    AStar, Carver, Coord, Flow, Grid, MazeEvent, MazeSink, RunStatus, SearchStep, SimpleLCG, Tag,
    END_RESELECT_ATTEMPTS, SELECTION_SAMPLES,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::{RunnerConfig, Viewport};
use crate::error::{Result, RunnerError};
use crate::phase::{Phase, PhaseTracker};

/// Why a run of cycles ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleEnd {
    /// The continue token was cleared
    Cancelled,
    /// The solver could not reach End
    NoPath,
    /// `max_cycles` solved cycles were completed
    CycleLimit,
    /// An internal fault was caught and logged
    Faulted,
}

/// Result of a solve phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    Found(Vec<Coord>),
    NotFound,
    Aborted,
}

async fn pause(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}

/// Sleep for `delay`; `true` if the token was cancelled first.
async fn pause_or_cancel(delay: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = pause(delay) => cancel.is_cancelled(),
        _ = cancel.cancelled() => true,
    }
}

pub struct MazeRunner<S> {
    config: RunnerConfig,
    grid: Grid,
    rng: SimpleLCG,
    seed: u32,
    start: Option<Coord>,
    end: Option<Coord>,
    last_path: Option<Vec<Coord>>,
    /// Visited and path marks drawn by the last solve
    decorations: Vec<(Coord, Tag)>,
    phase: PhaseTracker,
    cycles: usize,
    sink: S,
}

impl<S: MazeSink> MazeRunner<S> {
    /// Build the grid from `config` and announce its size to `sink`.
    ///
    /// Draws a random seed when the config has none.
    pub fn new(config: RunnerConfig, sink: S) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let (rows, cols) = config.grid_size();
        let mut runner = Self {
            grid: Grid::new(rows, cols),
            rng: SimpleLCG::new(seed),
            seed,
            start: None,
            end: None,
            last_path: None,
            decorations: Vec::new(),
            phase: PhaseTracker::default(),
            cycles: 0,
            config,
            sink,
        };
        runner.announce_size();
        tracing::info!(
            "Maze runner ready: {}x{} grid, seed {}, difficulty {}",
            runner.grid.rows(),
            runner.grid.cols(),
            seed,
            runner.config.difficulty
        );
        runner
    }

    fn announce_size(&mut self) {
        self.sink.notify(MazeEvent::GridResized {
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            cell_size: self.config.difficulty().cell_size(),
        });
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    pub fn end(&self) -> Option<Coord> {
        self.end
    }

    pub fn phase(&self) -> Phase {
        self.phase.current()
    }

    /// Path found by the most recent successful solve.
    pub fn last_path(&self) -> Option<&[Coord]> {
        self.last_path.as_deref()
    }

    /// Solved cycles since construction.
    pub fn cycles_completed(&self) -> usize {
        self.cycles
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn mark(&mut self, c: Coord, tag: Tag) {
        self.sink.notify(MazeEvent::CellMarked(c, tag));
    }

    fn unmark(&mut self, c: Coord, tag: Tag) {
        self.sink.notify(MazeEvent::CellUnmarked(c, tag));
    }

    fn clear_decorations(&mut self) {
        for (c, tag) in std::mem::take(&mut self.decorations) {
            self.sink.notify(MazeEvent::CellUnmarked(c, tag));
        }
    }

    fn clear_endpoints(&mut self) {
        if let Some(start) = self.start.take() {
            self.unmark(start, Tag::Start);
        }
        if let Some(end) = self.end.take() {
            self.unmark(end, Tag::End);
        }
        self.last_path = None;
    }

    fn place(&mut self, endpoints: Endpoints) {
        let min_distance = self.config.difficulty().min_distance();
        if endpoints.fallback {
            tracing::warn!(
                "No sampled End met the distance target; using corner {:?}",
                endpoints.end
            );
        } else if endpoints.distance() < min_distance {
            tracing::debug!(
                "Farthest sampled pair is {} apart, below the difficulty minimum {}",
                endpoints.distance(),
                min_distance
            );
        }
        if self.start != Some(endpoints.start) {
            self.mark(endpoints.start, Tag::Start);
        }
        self.mark(endpoints.end, Tag::End);
        self.start = Some(endpoints.start);
        self.end = Some(endpoints.end);
        tracing::debug!(
            "Start {:?}, End {:?}, distance {}",
            endpoints.start,
            endpoints.end,
            endpoints.distance()
        );
    }

    fn enter(&mut self, next: Phase) -> Result<()> {
        self.phase.enter(next).inspect_err(|err| {
            if matches!(err, RunnerError::PhaseConflict { .. }) {
                tracing::warn!("{}; request skipped", err);
            }
        })
    }

    /// Carve the maze, yielding every `batch_size` frontier pops.
    ///
    /// With `keep_start` the current Start survives and only End is
    /// re-placed afterwards; otherwise the whole grid is carved and both
    /// endpoints are chosen. Rejected while a solve is in progress.
    pub async fn generate(&mut self, keep_start: bool, cancel: &CancellationToken) -> Result<RunStatus> {
        let kept = match (keep_start, self.start) {
            (true, Some(start)) => Some(start),
            (true, None) => return Err(RunnerError::MissingEndpoints),
            (false, _) => None,
        };
        self.enter(Phase::Generating)?;

        self.clear_decorations();
        let mut carver = match kept {
            Some(start) => {
                if let Some(end) = self.end.take() {
                    self.unmark(end, Tag::End);
                }
                self.last_path = None;
                Carver::keep_start(&mut self.grid, start, &mut self.sink)
            }
            None => {
                self.clear_endpoints();
                Carver::full(&mut self.grid, &mut self.rng, &mut self.sink)
            }
        };
        tracing::info!(
            "Generating maze from {:?} ({})",
            carver.seed(),
            if kept.is_some() { "keep start" } else { "full" }
        );

        let delay = self.config.generation_delay();
        let status = carver
            .run_batched(
                &mut self.grid,
                &mut self.rng,
                &mut self.sink,
                self.config.batch_size,
                move || async move {
                    pause(delay).await;
                    if cancel.is_cancelled() {
                        Flow::Stop
                    } else {
                        Flow::Continue
                    }
                },
            )
            .await;
        self.phase.finish();

        if status == RunStatus::Aborted {
            tracing::info!(
                "Generation aborted after {} cells, {} frontier walls left",
                carver.carved(),
                carver.frontier_len()
            );
            self.end = None;
            return Ok(status);
        }

        let endpoints = match kept {
            Some(start) => reselect_end(
                &self.grid,
                start,
                self.config.difficulty().min_distance(),
                &mut self.rng,
                END_RESELECT_ATTEMPTS,
            ),
            None => select_start_end(&self.grid, &mut self.rng, SELECTION_SAMPLES),
        };
        self.place(endpoints);
        Ok(status)
    }

    /// Search from Start to End, yielding after each expansion other than
    /// Start and End. Rejected while generation is in progress.
    pub async fn solve(&mut self, cancel: &CancellationToken) -> Result<SolveOutcome> {
        let (start, end) = self
            .start
            .zip(self.end)
            .ok_or(RunnerError::MissingEndpoints)?;
        self.enter(Phase::Solving)?;
        self.clear_decorations();
        self.last_path = None;

        let mut search = AStar::new(&self.grid, start, end);
        let outcome = loop {
            match search.step(&self.grid, &mut self.sink) {
                SearchStep::Expanded(c) if search.is_endpoint(c) => {}
                SearchStep::Expanded(c) => {
                    self.decorations.push((c, Tag::Visited));
                    pause(self.config.solve_delay()).await;
                    if cancel.is_cancelled() {
                        break SolveOutcome::Aborted;
                    }
                }
                SearchStep::Found(path) => {
                    self.decorations.extend(path.iter().map(|&c| (c, Tag::Path)));
                    break SolveOutcome::Found(path);
                }
                SearchStep::NotFound => break SolveOutcome::NotFound,
            }
        };
        self.phase.finish();

        match &outcome {
            SolveOutcome::Found(path) => {
                tracing::debug!(
                    "Solved in {} expansions, path length {}",
                    search.expanded().len(),
                    path.len()
                );
                self.last_path = Some(path.clone());
            }
            SolveOutcome::NotFound => tracing::warn!(
                "No path from {:?} to {:?} after {} iterations",
                start,
                end,
                search.iterations()
            ),
            SolveOutcome::Aborted => tracing::info!("Solve aborted"),
        }
        Ok(outcome)
    }

    /// Promote End to Start after a successful solve and clear the
    /// solver's visited and path marks.
    pub fn advance(&mut self) -> Result<()> {
        let (start, end) = self
            .start
            .zip(self.end)
            .ok_or(RunnerError::MissingEndpoints)?;
        if self.last_path.is_none() {
            return Err(RunnerError::NotSolved);
        }
        self.enter(Phase::Advancing)?;

        self.unmark(end, Tag::End);
        self.unmark(start, Tag::Start);
        self.clear_decorations();
        self.mark(end, Tag::Start);
        self.start = Some(end);
        self.end = None;
        self.last_path = None;
        Ok(())
    }

    /// Discard the grid and rebuild it for `viewport`.
    ///
    /// Takes `&mut self`, so it cannot overlap a running phase; stop the
    /// cycle first (see [`Controller::resize`]).
    pub fn resize(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
        self.config.rows = None;
        self.config.cols = None;
        let (rows, cols) = self.config.grid_size();

        self.grid = Grid::new(rows, cols);
        self.start = None;
        self.end = None;
        self.last_path = None;
        self.decorations.clear();
        self.phase.rearm();
        self.announce_size();
        tracing::info!("Grid rebuilt at {}x{}", self.grid.rows(), self.grid.cols());
    }

    /// Run cycles until the token is cancelled, a solve fails or the cycle
    /// limit is reached. Faults are logged here and end the run; the token
    /// is always cancelled on return.
    pub async fn run(&mut self, cancel: CancellationToken) -> CycleEnd {
        self.phase.rearm();
        let end = match self.run_cycles(&cancel).await {
            Ok(end) => end,
            Err(err) => {
                tracing::error!("Maze cycle failed: {}", err);
                CycleEnd::Faulted
            }
        };
        cancel.cancel();
        self.phase.stop();
        tracing::info!("Maze cycle ended: {:?} after {} solved cycles", end, self.cycles);
        end
    }

    async fn run_cycles(&mut self, cancel: &CancellationToken) -> Result<CycleEnd> {
        let mut keep_start = false;
        loop {
            if cancel.is_cancelled() {
                return Ok(CycleEnd::Cancelled);
            }
            if self.generate(keep_start, cancel).await? == RunStatus::Aborted {
                return Ok(CycleEnd::Cancelled);
            }
            if pause_or_cancel(self.config.post_generate_pause(), cancel).await {
                return Ok(CycleEnd::Cancelled);
            }

            match self.solve(cancel).await? {
                SolveOutcome::Found(path) => {
                    self.cycles += 1;
                    tracing::info!("Cycle {} solved: {} cells on path", self.cycles, path.len());
                }
                SolveOutcome::NotFound => return Ok(CycleEnd::NoPath),
                SolveOutcome::Aborted => return Ok(CycleEnd::Cancelled),
            }

            if self.config.max_cycles.is_some_and(|max| self.cycles >= max) {
                return Ok(CycleEnd::CycleLimit);
            }
            if pause_or_cancel(self.config.post_solve_pause(), cancel).await {
                return Ok(CycleEnd::Cancelled);
            }

            self.advance()?;
            keep_start = true;
        }
    }
}

/// Owns the background task running a [`MazeRunner`].
pub struct Controller<S> {
    runner: Option<MazeRunner<S>>,
    task: Option<JoinHandle<(MazeRunner<S>, CycleEnd)>>,
    cancel: CancellationToken,
}

impl<S: MazeSink + Send + 'static> Controller<S> {
    pub fn new(runner: MazeRunner<S>) -> Self {
        Self {
            runner: Some(runner),
            task: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Start a run of cycles on a new task. Does nothing and returns
    /// `false` while a run is already active.
    pub async fn start(&mut self) -> bool {
        if self.is_running() {
            tracing::debug!("Maze cycle already running; start ignored");
            return false;
        }
        // Reclaim the runner from a run that ended on its own
        self.join().await;

        let Some(mut runner) = self.runner.take() else {
            tracing::error!("Maze runner lost after a task failure; cannot start");
            return false;
        };
        self.cancel = CancellationToken::new();
        let cancel = self.cancel.clone();
        self.task = Some(tokio::spawn(async move {
            let end = runner.run(cancel).await;
            (runner, end)
        }));
        true
    }

    /// Clear the continue token and wait for the task to reach a yield point
    /// and exit. Returns how the run ended, or `None` if nothing was running.
    pub async fn stop(&mut self) -> Option<CycleEnd> {
        self.cancel.cancel();
        self.join().await
    }

    /// Wait for the current run to end on its own.
    pub async fn wait(&mut self) -> Option<CycleEnd> {
        self.join().await
    }

    async fn join(&mut self) -> Option<CycleEnd> {
        let task = self.task.take()?;
        match task.await {
            Ok((runner, end)) => {
                self.runner = Some(runner);
                Some(end)
            }
            Err(err) => {
                tracing::error!("Maze task failed: {}", err);
                Some(CycleEnd::Faulted)
            }
        }
    }

    /// Stop the cycle, rebuild the grid for `viewport` and start again.
    pub async fn resize(&mut self, viewport: Viewport) -> bool {
        self.stop().await;
        match self.runner.as_mut() {
            Some(runner) => runner.resize(viewport),
            None => return false,
        }
        self.start().await
    }

    /// The runner, when no run is active.
    pub fn runner(&self) -> Option<&MazeRunner<S>> {
        self.runner.as_ref()
    }

    pub fn into_runner(self) -> Option<MazeRunner<S>> {
        self.runner
    }
}
