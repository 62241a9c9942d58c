//! # Deferred Opponent Worker
//!
//! The automated opponent does not answer instantly: after the human move
//! completes, its reply is deferred by a short "thinking" delay. The worker
//! runs on a dedicated thread fed by an mpsc channel; each request carries
//! the generation counter of the board it was scheduled against, and the
//! worker discards any request whose generation no longer matches by the
//! time the delay elapses. That guard is what keeps a timer scheduled
//! before a reset from mutating the superseded board.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::archetype::Archetype;
use crate::board::Player;
use crate::game_controller::{GameController, GameSnapshot, GameStatus};

/// Messages sent to the opponent worker thread.
enum WorkerRequest {
    /// Think for the configured delay, then move if the request is still
    /// current for this generation.
    Think { generation: u64 },
    Stop,
}

/// The opponent worker that runs in a separate thread.
pub struct AiWorker {
    handle: Option<JoinHandle<()>>,
    tx: Sender<WorkerRequest>,
    stop_flag: Arc<AtomicBool>,
}

impl AiWorker {
    /// Spawns the worker over a shared controller. Each scheduled request
    /// sleeps for `thinking_delay` before acting.
    pub fn spawn(controller: Arc<Mutex<GameController>>, thinking_delay: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop = stop_flag.clone();

        let handle = thread::spawn(move || {
            for request in rx {
                match request {
                    WorkerRequest::Think { generation } => {
                        thread::sleep(thinking_delay);
                        if stop.load(Ordering::Relaxed) {
                            break;
                        }
                        let mut controller = controller.lock();
                        if controller.generation() != generation {
                            debug!(
                                scheduled = generation,
                                current = controller.generation(),
                                "discarding stale think request"
                            );
                            continue;
                        }
                        if controller.is_game_over()
                            || controller.current_player() != Player::Red
                        {
                            trace!("think request no longer applicable");
                            continue;
                        }
                        if let Some((row, col)) = controller.choose_ai_move() {
                            let _ = controller.try_make_move(row, col);
                        }
                    }
                    WorkerRequest::Stop => break,
                }
            }
        });

        Self {
            handle: Some(handle),
            tx,
            stop_flag,
        }
    }

    /// Schedules one deferred opponent move against `generation`.
    pub fn schedule(&self, generation: u64) {
        self.tx.send(WorkerRequest::Think { generation }).ok();
    }

    /// Explicitly stop the worker.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        self.tx.send(WorkerRequest::Stop).ok();
    }
}

impl Drop for AiWorker {
    fn drop(&mut self) {
        self.stop();
        // A request mid-sleep delays the join by at most one thinking
        // delay; the stop flag keeps it from touching the board.
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// The engine facade wired for play against the automated opponent.
///
/// Owns the shared controller and the worker. Human moves go through
/// [`Engine::apply_move`]; whenever a successful move leaves the board in
/// progress on Red's turn with the AI enabled, a deferred opponent move is
/// scheduled automatically. Disabling the AI turns the engine into a local
/// two-player board.
pub struct Engine {
    controller: Arc<Mutex<GameController>>,
    worker: AiWorker,
    ai_enabled: bool,
}

impl Engine {
    /// Thinking delay of the reference instance.
    pub const DEFAULT_THINKING_DELAY: Duration = Duration::from_millis(600);

    pub fn new(archetype: Archetype, size: usize) -> Self {
        Self::with_thinking_delay(archetype, size, Self::DEFAULT_THINKING_DELAY)
    }

    pub fn with_thinking_delay(
        archetype: Archetype,
        size: usize,
        thinking_delay: Duration,
    ) -> Self {
        let controller = Arc::new(Mutex::new(GameController::new(archetype, size)));
        let worker = AiWorker::spawn(controller.clone(), thinking_delay);
        Self {
            controller,
            worker,
            ai_enabled: true,
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    /// Toggle between AI opponent and local two-player mode.
    pub fn set_ai_enabled(&mut self, enabled: bool) {
        self.ai_enabled = enabled;
    }

    /// Applies a move for the current turn player and, when it is now the
    /// automated opponent's turn, schedules its deferred reply.
    pub fn apply_move(&self, row: usize, col: usize) -> GameSnapshot {
        let snapshot = self.controller.lock().apply_move(row, col);
        if self.ai_enabled
            && snapshot.status == GameStatus::InProgress
            && snapshot.turn == Player::Red
        {
            self.worker.schedule(snapshot.generation);
        }
        snapshot
    }

    /// Regenerates the board for `archetype`. Any opponent move still
    /// pending against the old board is discarded by the generation guard.
    pub fn reset(&self, archetype: Archetype) -> GameSnapshot {
        self.controller.lock().reset(archetype)
    }

    /// Reset by catalog id; unknown ids are no-ops.
    pub fn reset_by_id(&self, id: &str) -> GameSnapshot {
        self.controller.lock().reset_by_id(id)
    }

    /// Read-only snapshot of the current state.
    pub fn snapshot(&self) -> GameSnapshot {
        self.controller.lock().snapshot()
    }

    /// The static archetype catalog.
    pub fn archetypes() -> impl Iterator<Item = Archetype> {
        Archetype::ALL.into_iter()
    }
}
