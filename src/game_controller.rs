//! # Game Controller - Central Game State Management
//!
//! The `GameController` is the single source of truth for the authoritative
//! game state. All moves go through the controller, which validates them
//! before application; illegal requests are rejected without any state
//! change, so callers can treat them as no-ops. Consumers observe the game
//! through pull-based [`GameSnapshot`] values rather than shared references,
//! which keeps renderers, test harnesses, and the AI worker free to poll or
//! diff state without holding the controller.
//!
//! A monotonically increasing generation counter is bumped on every reset.
//! The deferred AI worker records the generation it was scheduled against
//! and discards itself if a reset supersedes the board it intended to play
//! on.

use std::time::SystemTime;

use rand::{thread_rng, Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing::{debug, trace};

use crate::ai::select_move;
use crate::archetype::Archetype;
use crate::board::{Board, Player, WinningLine};
use crate::mask::Mask;

/// Current game status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Game is still in progress.
    InProgress,
    /// Game ended with a winner.
    Win(Player),
    /// Every playable cell is occupied with no winner.
    Draw,
}

impl GameStatus {
    /// Check if the game is over.
    pub fn is_game_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Reasons a move request is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// The game is already in a terminal state.
    GameAlreadyOver,
    /// The coordinate lies outside the board.
    OutOfBounds,
    /// The cell is void under the current mask.
    NotPlayable,
    /// The cell already holds a mark.
    Occupied,
}

impl std::fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveRejection::GameAlreadyOver => write!(f, "Game is already over"),
            MoveRejection::OutOfBounds => write!(f, "Coordinate is out of bounds"),
            MoveRejection::NotPlayable => write!(f, "Cell is not playable"),
            MoveRejection::Occupied => write!(f, "Cell is already occupied"),
        }
    }
}

/// Result of attempting to apply a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// Move was applied; `status` reflects the board afterwards.
    Applied { player: Player, status: GameStatus },
    /// Move was rejected; nothing changed.
    Rejected(MoveRejection),
}

/// A single entry in the move history.
#[derive(Debug, Clone)]
pub struct MoveHistoryEntry {
    /// When the move was made.
    pub timestamp: SystemTime,
    /// Player who made the move.
    pub player: Player,
    pub row: usize,
    pub col: usize,
    /// Move number (1-indexed).
    pub move_number: usize,
}

impl MoveHistoryEntry {
    fn new(player: Player, row: usize, col: usize, move_number: usize) -> Self {
        Self {
            timestamp: SystemTime::now(),
            player,
            row,
            col,
            move_number,
        }
    }
}

/// Value snapshot of the observable game state.
///
/// Every mutating call returns one of these, so external controllers never
/// need a live reference into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub size: usize,
    pub archetype: Archetype,
    pub mask: Mask,
    /// Marks in row-major order.
    pub grid: Vec<Option<Player>>,
    pub turn: Player,
    pub status: GameStatus,
    pub winning_line: Option<WinningLine>,
    /// Potential four-in-a-row lines the mask admits ("paths validated").
    pub potential_paths: usize,
    /// Bumped on every reset; stale deferred work keys off this.
    pub generation: u64,
}

/// The central game controller that owns the authoritative game state.
#[derive(Debug, Clone)]
pub struct GameController {
    board: Board,
    archetype: Archetype,
    turn: Player,
    status: GameStatus,
    winning_line: Option<WinningLine>,
    potential_paths: usize,
    generation: u64,
    move_history: Vec<MoveHistoryEntry>,
    rng: Xoshiro256StarStar,
}

impl GameController {
    /// Creates a controller with a freshly generated mask for `archetype`.
    pub fn new(archetype: Archetype, size: usize) -> Self {
        let seed = thread_rng().gen();
        Self::with_rng(archetype, size, Xoshiro256StarStar::seed_from_u64(seed))
    }

    /// Creates a controller with a caller-provided RNG, for reproducible
    /// procedural generation and AI play.
    pub fn with_rng(archetype: Archetype, size: usize, mut rng: Xoshiro256StarStar) -> Self {
        let mask = archetype.generate(size, &mut rng);
        let potential_paths = mask.count_potential_paths();
        Self {
            board: Board::new(mask),
            archetype,
            turn: Player::Blue,
            status: GameStatus::InProgress,
            winning_line: None,
            potential_paths,
            generation: 0,
            move_history: Vec::new(),
            rng,
        }
    }

    /// Creates a controller over an explicit mask, bypassing the catalog.
    /// The archetype label defaults to [`Archetype::FractalRandom`]; the
    /// mask itself is used verbatim.
    pub fn from_mask(mask: Mask) -> Self {
        let potential_paths = mask.count_potential_paths();
        let seed = thread_rng().gen();
        Self {
            board: Board::new(mask),
            archetype: Archetype::FractalRandom,
            turn: Player::Blue,
            status: GameStatus::InProgress,
            winning_line: None,
            potential_paths,
            generation: 0,
            move_history: Vec::new(),
            rng: Xoshiro256StarStar::seed_from_u64(seed),
        }
    }

    /// Validate a move without applying it.
    pub fn validate_move(&self, row: usize, col: usize) -> Result<(), MoveRejection> {
        if self.status.is_game_over() {
            return Err(MoveRejection::GameAlreadyOver);
        }
        if row >= self.board.size() || col >= self.board.size() {
            return Err(MoveRejection::OutOfBounds);
        }
        if !self.board.mask().is_playable(row, col) {
            return Err(MoveRejection::NotPlayable);
        }
        if self.board.cell(row, col).is_some() {
            return Err(MoveRejection::Occupied);
        }
        Ok(())
    }

    /// Attempt to make a move for whichever player currently holds the turn.
    ///
    /// Validates the move and applies it if legal. A win transitions to
    /// [`GameStatus::Win`]; exhausting the last open cell without a win
    /// transitions to [`GameStatus::Draw`]; otherwise the turn flips.
    pub fn try_make_move(&mut self, row: usize, col: usize) -> MoveResult {
        if let Err(rejection) = self.validate_move(row, col) {
            trace!(row, col, %rejection, "move rejected");
            return MoveResult::Rejected(rejection);
        }

        let player = self.turn;
        self.board.place(row, col, player);
        let move_number = self.move_history.len() + 1;
        self.move_history
            .push(MoveHistoryEntry::new(player, row, col, move_number));

        if let Some(line) = self.board.check_win(row, col, player) {
            self.status = GameStatus::Win(player);
            self.winning_line = Some(line);
        } else if !self.board.has_open_cell() {
            self.status = GameStatus::Draw;
        } else {
            self.turn = player.other();
        }

        debug!(row, col, %player, status = ?self.status, "move applied");
        MoveResult::Applied {
            player,
            status: self.status,
        }
    }

    /// Applies a move for the current turn player, returning the resulting
    /// snapshot. Illegal requests are no-ops with an unchanged snapshot.
    pub fn apply_move(&mut self, row: usize, col: usize) -> GameSnapshot {
        let _ = self.try_make_move(row, col);
        self.snapshot()
    }

    /// Regenerates the mask for `archetype`, clears the grid, and hands the
    /// opening turn back to Blue. Bumps the generation counter so deferred
    /// work scheduled against the previous board discards itself.
    pub fn reset(&mut self, archetype: Archetype) -> GameSnapshot {
        let mask = archetype.generate(self.board.size(), &mut self.rng);
        self.potential_paths = mask.count_potential_paths();
        self.board = Board::new(mask);
        self.archetype = archetype;
        self.turn = Player::Blue;
        self.status = GameStatus::InProgress;
        self.winning_line = None;
        self.move_history.clear();
        self.generation += 1;
        debug!(
            archetype = archetype.id(),
            paths = self.potential_paths,
            generation = self.generation,
            "board reset"
        );
        self.snapshot()
    }

    /// Reset by catalog id. An unrecognized id is a no-op returning the
    /// unchanged snapshot.
    pub fn reset_by_id(&mut self, id: &str) -> GameSnapshot {
        match Archetype::from_id(id) {
            Some(archetype) => self.reset(archetype),
            None => {
                trace!(id, "unknown archetype id; reset ignored");
                self.snapshot()
            }
        }
    }

    /// Chooses a move for the automated opponent (the player currently
    /// holding the turn) via the heuristic selector.
    pub fn choose_ai_move(&mut self) -> Option<(usize, usize)> {
        select_move(&self.board, self.turn, &mut self.rng)
    }

    /// Read-only value snapshot of the observable state.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            size: self.board.size(),
            archetype: self.archetype,
            mask: self.board.mask().clone(),
            grid: self.board.cells().to_vec(),
            turn: self.turn,
            status: self.status,
            winning_line: self.winning_line,
            potential_paths: self.potential_paths,
            generation: self.generation,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn current_player(&self) -> Player {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Get the winner if the game is over.
    pub fn winner(&self) -> Option<Player> {
        match self.status {
            GameStatus::Win(w) => Some(w),
            _ => None,
        }
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        self.winning_line
    }

    pub fn potential_paths(&self) -> usize {
        self.potential_paths
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Get the complete move history.
    pub fn move_history(&self) -> &[MoveHistoryEntry] {
        &self.move_history
    }

    /// Format the move history as a string suitable for export.
    pub fn format_history(&self) -> String {
        if self.move_history.is_empty() {
            return String::from("No moves made yet.");
        }

        let mut output = format!("=== {} Game History ===\n\n", self.archetype.name());
        for entry in &self.move_history {
            output.push_str(&format!(
                "{}. {} - ({}, {})\n",
                entry.move_number, entry.player, entry.row, entry.col
            ));
        }
        match self.status {
            GameStatus::Win(winner) => {
                output.push_str(&format!("\nResult: {} wins!\n", winner));
            }
            GameStatus::Draw => {
                output.push_str("\nResult: Draw\n");
            }
            GameStatus::InProgress => {
                output.push_str(&format!("\n(Game in progress - {} to move)\n", self.turn));
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_controller(size: usize) -> GameController {
        GameController::from_mask(Mask::filled(size))
    }

    #[test]
    fn test_new_game_starts_with_blue() {
        let controller = GameController::new(Archetype::Figure8, 12);
        assert_eq!(controller.current_player(), Player::Blue);
        assert_eq!(controller.status(), GameStatus::InProgress);
        assert_eq!(controller.generation(), 0);
        assert!(controller.move_history().is_empty());
    }

    #[test]
    fn test_turn_alternates_on_legal_moves() {
        let mut controller = open_controller(12);
        assert!(matches!(
            controller.try_make_move(0, 0),
            MoveResult::Applied {
                player: Player::Blue,
                ..
            }
        ));
        assert_eq!(controller.current_player(), Player::Red);
        assert!(matches!(
            controller.try_make_move(5, 5),
            MoveResult::Applied {
                player: Player::Red,
                ..
            }
        ));
        assert_eq!(controller.current_player(), Player::Blue);
    }

    #[test]
    fn test_scripted_win_on_small_board() {
        // N=4, fully playable: Blue takes (0,0),(0,1),(0,2), Red plays
        // elsewhere without blocking, Blue completes at (0,3).
        let mut controller = open_controller(4);
        controller.apply_move(0, 0); // Blue
        controller.apply_move(2, 0); // Red
        controller.apply_move(0, 1); // Blue
        controller.apply_move(2, 1); // Red
        controller.apply_move(0, 2); // Blue
        controller.apply_move(3, 3); // Red
        let snapshot = controller.apply_move(0, 3); // Blue wins

        assert_eq!(snapshot.status, GameStatus::Win(Player::Blue));
        let line: std::collections::HashSet<_> =
            snapshot.winning_line.unwrap().into_iter().collect();
        assert_eq!(line, [(0, 0), (0, 1), (0, 2), (0, 3)].into_iter().collect());
    }

    #[test]
    fn test_illegal_requests_leave_state_unchanged() {
        let mut controller = GameController::new(Archetype::SwissCheese, 12);
        controller.apply_move(0, 0); // Blue, playable on the checkerboard
        let before = controller.snapshot();

        // Occupied, void, and out-of-bounds requests must all be no-ops.
        assert_eq!(
            controller.try_make_move(0, 0),
            MoveResult::Rejected(MoveRejection::Occupied)
        );
        assert_eq!(
            controller.try_make_move(0, 1),
            MoveResult::Rejected(MoveRejection::NotPlayable)
        );
        assert_eq!(
            controller.try_make_move(40, 2),
            MoveResult::Rejected(MoveRejection::OutOfBounds)
        );
        assert_eq!(controller.snapshot(), before);
    }

    #[test]
    fn test_no_moves_accepted_after_win() {
        let mut controller = open_controller(4);
        controller.apply_move(0, 0); // Blue
        controller.apply_move(1, 0); // Red
        controller.apply_move(0, 1); // Blue
        controller.apply_move(1, 1); // Red
        controller.apply_move(0, 2); // Blue
        controller.apply_move(1, 2); // Red
        controller.apply_move(0, 3); // Blue wins
        let before = controller.snapshot();
        assert_eq!(before.status, GameStatus::Win(Player::Blue));

        assert_eq!(
            controller.try_make_move(2, 2),
            MoveResult::Rejected(MoveRejection::GameAlreadyOver)
        );
        assert_eq!(controller.snapshot(), before);
    }

    #[test]
    fn test_exhausted_board_is_a_draw() {
        // Four scattered playable cells: no four-in-a-row is geometrically
        // possible, so filling them must end in a draw.
        let mut mask = Mask::new(6);
        for (r, c) in [(0, 0), (0, 4), (4, 0), (4, 4)] {
            mask.set(r, c, true);
        }
        let mut controller = GameController::from_mask(mask);
        controller.apply_move(0, 0); // Blue
        controller.apply_move(0, 4); // Red
        controller.apply_move(4, 0); // Blue
        let snapshot = controller.apply_move(4, 4); // Red, last open cell

        assert_eq!(snapshot.status, GameStatus::Draw);
        assert_eq!(snapshot.winning_line, None);
        assert_eq!(
            controller.try_make_move(0, 0),
            MoveResult::Rejected(MoveRejection::GameAlreadyOver)
        );
    }

    #[test]
    fn test_reset_replaces_board_and_bumps_generation() {
        let mut controller = GameController::new(Archetype::Corridors, 12);
        controller.apply_move(1, 1);
        let snapshot = controller.reset(Archetype::SwissCheese);

        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.turn, Player::Blue);
        assert_eq!(snapshot.status, GameStatus::InProgress);
        assert_eq!(snapshot.archetype, Archetype::SwissCheese);
        assert!(snapshot.grid.iter().all(Option::is_none));
        assert!(controller.move_history().is_empty());
        assert_eq!(
            snapshot.potential_paths,
            controller.board().mask().count_potential_paths()
        );
    }

    #[test]
    fn test_reset_by_unknown_id_is_a_noop() {
        let mut controller = GameController::new(Archetype::Figure8, 12);
        controller.apply_move(0, 0);
        let before = controller.snapshot();
        let after = controller.reset_by_id("mystery-topology");
        assert_eq!(after, before);
        assert_eq!(controller.generation(), 0);
    }

    #[test]
    fn test_reset_by_id_dispatches_through_catalog() {
        let mut controller = GameController::new(Archetype::Figure8, 12);
        let snapshot = controller.reset_by_id("swiss-cheese");
        assert_eq!(snapshot.archetype, Archetype::SwissCheese);
        assert_eq!(snapshot.generation, 1);
    }

    #[test]
    fn test_history_records_and_formats_moves() {
        let mut controller = open_controller(12);
        controller.apply_move(2, 3);
        controller.apply_move(4, 5);
        let history = controller.move_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].player, Player::Blue);
        assert_eq!(history[1].player, Player::Red);
        assert_eq!(history[1].move_number, 2);

        let text = controller.format_history();
        assert!(text.contains("1. Blue - (2, 3)"));
        assert!(text.contains("2. Red - (4, 5)"));
        assert!(text.contains("Blue to move"));
    }
}
