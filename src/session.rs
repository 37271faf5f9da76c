//! Interactive game session: lifecycle, timers, score delivery.
//!
//! [`GameSession`] is the synchronous core: difficulty selection, start,
//! steering, restart, and turning a finished game into a submission.
//! [`spawn_session`] wraps one in a tokio task that owns the tick and
//! food-relocation timers and publishes state through watch channels.
//! Score delivery happens on a detached task; a player can always start
//! the next run while the previous score is still in flight.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::game::{Difficulty, Direction, GameEngine, GameStatus, GameView, TickOutcome};
use crate::leaderboard::{
    unix_time_ms, LeaderboardEntry, QueryService, ScoreSubmission, SubmissionService,
};

const COMMAND_BUFFER: usize = 32;

/// Synchronous session core. Holds no engine until a difficulty is
/// chosen; all operations are safe no-ops in the Idle state.
#[derive(Debug, Default)]
pub struct GameSession {
    engine: Option<GameEngine>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh engine for `difficulty`. Refused mid-game; allowed
    /// from Idle, AwaitingStart, and GameOver.
    pub fn select_difficulty(&mut self, difficulty: Difficulty, seed: u64) -> bool {
        if self.status() == GameStatus::Running {
            return false;
        }
        self.engine = Some(GameEngine::new(difficulty, seed));
        true
    }

    pub fn status(&self) -> GameStatus {
        self.engine
            .as_ref()
            .map(|engine| engine.status())
            .unwrap_or(GameStatus::Idle)
    }

    pub fn start(&mut self, now_ms: u64) -> bool {
        match self.engine.as_mut() {
            Some(engine) => engine.start(now_ms),
            None => false,
        }
    }

    pub fn restart(&mut self) -> bool {
        match self.engine.as_mut() {
            Some(engine) => engine.restart(),
            None => false,
        }
    }

    pub fn steer(&mut self, direction: Direction) {
        if let Some(engine) = self.engine.as_mut() {
            engine.set_pending_direction(direction);
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        match self.engine.as_mut() {
            Some(engine) => engine.tick(),
            None => TickOutcome::Ignored,
        }
    }

    pub fn relocate_food(&mut self) -> bool {
        match self.engine.as_mut() {
            Some(engine) => engine.relocate_food(),
            None => false,
        }
    }

    /// Tick period of the active game, if any.
    pub fn speed_ms(&self) -> Option<u64> {
        self.engine.as_ref().map(|engine| engine.speed_ms())
    }

    /// Food relocation timeout of the active game, if any.
    pub fn food_timeout_ms(&self) -> Option<u64> {
        self.engine.as_ref().map(|engine| engine.food_timeout_ms())
    }

    pub fn view(&self) -> GameView {
        self.engine
            .as_ref()
            .map(|engine| engine.view())
            .unwrap_or_else(GameView::idle)
    }

    /// Turn a finished game into a score submission. `None` unless the
    /// game reached GameOver.
    pub fn build_submission(&self, now_ms: i64) -> Option<ScoreSubmission> {
        let engine = self.engine.as_ref()?;
        if engine.status() != GameStatus::GameOver {
            return None;
        }
        Some(ScoreSubmission {
            score: i64::from(engine.score()),
            timestamp: now_ms,
            difficulty: engine.difficulty().as_str().to_string(),
            snake_length: engine.segment_count() as i64,
            game_time: now_ms - engine.started_at_ms() as i64,
        })
    }
}

/// Commands accepted by a spawned session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    NewGame(Difficulty),
    Start,
    Steer(Direction),
    Restart,
    Shutdown,
}

/// What became of a finished game's score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    /// Achieved rank, `None` when the score did not place.
    pub rank: Option<u32>,
    pub scores: Vec<LeaderboardEntry>,
    pub last_updated: u64,
    /// False when the submission or the follow-up query failed.
    pub delivered: bool,
}

impl ScoreReport {
    pub fn unavailable() -> Self {
        Self {
            rank: None,
            scores: Vec::new(),
            last_updated: 0,
            delivered: false,
        }
    }
}

/// Handle to a spawned session task.
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    pub view: watch::Receiver<GameView>,
    pub report: watch::Receiver<Option<ScoreReport>>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub async fn send(&self, command: SessionCommand) -> bool {
        self.commands.send(command).await.is_ok()
    }

    pub async fn shutdown(self) {
        let _ = self.commands.send(SessionCommand::Shutdown).await;
        let _ = self.task.await;
    }
}

/// Spawn a session task wired to the score services.
pub fn spawn_session(
    submission: Arc<SubmissionService>,
    query: Arc<QueryService>,
) -> SessionHandle {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (view_tx, view_rx) = watch::channel(GameView::idle());
    let (report_tx, report_rx) = watch::channel(None);
    let task = tokio::spawn(run_session(
        command_rx,
        view_tx,
        Arc::new(report_tx),
        submission,
        query,
    ));
    SessionHandle {
        commands: command_tx,
        view: view_rx,
        report: report_rx,
        task,
    }
}

async fn run_session(
    mut commands: mpsc::Receiver<SessionCommand>,
    view: watch::Sender<GameView>,
    report: Arc<watch::Sender<Option<ScoreReport>>>,
    submission: Arc<SubmissionService>,
    query: Arc<QueryService>,
) {
    let mut session = GameSession::new();
    // Absolute deadlines, meaningful only while a game is running. The
    // `if running` guards below disarm both timers in every other state.
    let mut next_tick = Instant::now();
    let mut food_deadline = Instant::now();

    loop {
        let running = session.status() == GameStatus::Running;
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                match command {
                    SessionCommand::Shutdown => break,
                    SessionCommand::NewGame(difficulty) => {
                        if session.select_difficulty(difficulty, rand::random()) {
                            debug!(?difficulty, "new game prepared");
                            let _ = view.send(session.view());
                        }
                    }
                    SessionCommand::Start => {
                        if session.start(unix_time_ms() as u64) {
                            let now = Instant::now();
                            if let Some(speed) = session.speed_ms() {
                                next_tick = now + Duration::from_millis(speed);
                            }
                            if let Some(timeout) = session.food_timeout_ms() {
                                food_deadline = now + Duration::from_millis(timeout);
                            }
                            let _ = view.send(session.view());
                        }
                    }
                    SessionCommand::Steer(direction) => session.steer(direction),
                    SessionCommand::Restart => {
                        if session.restart() {
                            let _ = view.send(session.view());
                        }
                    }
                }
            }
            _ = sleep_until(next_tick), if running => {
                match session.tick() {
                    TickOutcome::Advanced { captured } => {
                        let now = Instant::now();
                        if let Some(speed) = session.speed_ms() {
                            next_tick = now + Duration::from_millis(speed);
                        }
                        if captured {
                            if let Some(timeout) = session.food_timeout_ms() {
                                food_deadline = now + Duration::from_millis(timeout);
                            }
                        }
                        let _ = view.send(session.view());
                    }
                    TickOutcome::GameOver(cause) => {
                        debug!(?cause, score = session.view().score, "game over");
                        let _ = view.send(session.view());
                        deliver_in_background(&session, &report, &submission, &query);
                    }
                    TickOutcome::Ignored => {}
                }
            }
            _ = sleep_until(food_deadline), if running => {
                if session.relocate_food() {
                    if let Some(timeout) = session.food_timeout_ms() {
                        food_deadline = Instant::now() + Duration::from_millis(timeout);
                    }
                    let _ = view.send(session.view());
                }
            }
        }
    }
}

/// Kick off score delivery without blocking the command loop.
fn deliver_in_background(
    session: &GameSession,
    report: &Arc<watch::Sender<Option<ScoreReport>>>,
    submission: &Arc<SubmissionService>,
    query: &Arc<QueryService>,
) {
    let Some(score) = session.build_submission(unix_time_ms()) else {
        return;
    };
    let report = Arc::clone(report);
    let submission = Arc::clone(submission);
    let query = Arc::clone(query);
    tokio::spawn(async move {
        let outcome = deliver_score(&submission, &query, score).await;
        let _ = report.send(Some(outcome));
    });
}

/// Submit a finished game from the in-process client and fetch the board
/// it landed on. The loopback source passes through the same admission
/// control as any remote client.
async fn deliver_score(
    submission: &SubmissionService,
    query: &QueryService,
    score: ScoreSubmission,
) -> ScoreReport {
    let source = IpAddr::V4(Ipv4Addr::LOCALHOST);
    let outcome = match submission.submit(source, score).await {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(%err, "session score submission failed");
            return ScoreReport::unavailable();
        }
    };

    query.invalidate().await;
    match query.top_scores().await {
        Ok(board) => ScoreReport {
            rank: outcome.rank,
            scores: board.scores,
            last_updated: board.last_updated,
            delivered: true,
        },
        Err(err) => {
            warn!(%err, "post-game leaderboard fetch failed");
            ScoreReport::unavailable()
        }
    }
}
