//! Heuristic move selection for the automated opponent.
//!
//! A greedy one-ply search: every open cell is scored by local mark density
//! along the 8 directional rays around it, and the highest-scoring cell is
//! chosen. A ray only contributes when all 3 look-ahead cells are in-bounds
//! and playable, i.e. when the candidate cell could actually anchor a
//! four-in-a-row through that ray on this topology.
//!
//! The per-ray counts are ownership tallies, not contiguous-run lengths: a
//! ray holding [opponent, empty, own] contributes to both tallies. This
//! local-density scoring is deliberate; making it strictly contiguous would
//! change observable play.

use rand::Rng;

use crate::board::{Board, Player};
use crate::mask::{step, LINE_SIZE};

/// The 8 directional rays: the 4 line directions and their reverses.
const RAYS: [(isize, isize); 8] = [
    (0, 1),
    (1, 0),
    (1, 1),
    (1, -1),
    (0, -1),
    (-1, 0),
    (-1, -1),
    (-1, 1),
];

/// Score bonus for a ray already holding 3 of the AI's marks (win now).
const WIN_BONUS: f64 = 10_000.0;
/// Score bonus for a ray already holding 3 opposing marks (block now).
const BLOCK_BONUS: f64 = 5_000.0;
const OWN_MARK_WEIGHT: f64 = 15.0;
const OPPONENT_MARK_WEIGHT: f64 = 8.0;

/// Chooses a move for `ai` by scanning every open cell row-major and
/// keeping the strictly highest-scoring one. Ties beyond the random jitter
/// go to the first-scanned cell. Returns `None` when no open cell exists.
pub fn select_move<R: Rng>(board: &Board, ai: Player, rng: &mut R) -> Option<(usize, usize)> {
    let size = board.size();
    let opponent = ai.other();
    let mut best_score = f64::NEG_INFINITY;
    let mut best_move = None;

    for row in 0..size {
        for col in 0..size {
            if !board.is_open(row, col) {
                continue;
            }
            // Small jitter breaks ties so play is not deterministic.
            let mut score = rng.gen_range(0.0..5.0);

            for ray in RAYS {
                let mut own = 0;
                let mut theirs = 0;
                let mut realizable = true;
                for i in 1..LINE_SIZE {
                    let open = step(size, row, col, ray, i)
                        .filter(|&(r, c)| board.mask().is_playable(r, c));
                    let Some((r, c)) = open else {
                        realizable = false;
                        break;
                    };
                    match board.cell(r, c) {
                        Some(p) if p == ai => own += 1,
                        Some(p) if p == opponent => theirs += 1,
                        _ => {}
                    }
                }
                if realizable {
                    if own == 3 {
                        score += WIN_BONUS;
                    }
                    if theirs == 3 {
                        score += BLOCK_BONUS;
                    }
                    score += f64::from(own) * OWN_MARK_WEIGHT;
                    score += f64::from(theirs) * OPPONENT_MARK_WEIGHT;
                }
            }

            if score > best_score {
                best_score = score;
                best_move = Some((row, col));
            }
        }
    }
    best_move
}
