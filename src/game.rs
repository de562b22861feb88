use log::trace;
use thiserror::Error;

use crate::board::{Board, Conflicts, MAX_DIGIT, SIZE};
use crate::history::ActionHistory;
use crate::puzzle::{PuzzleGenerator, DEFAULT_TARGET_CLUES};

/// Minimal delta for reversing one cell write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Move {
    index: usize,
    previous: u8,
}

/// Why a `set_number` call was rejected. Both cases leave the board, the
/// stacks, and the history untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("number {0} is out of range 1-6")]
    OutOfRange(u8),
    #[error("number {value} already appears in its {conflicts}")]
    Conflict { value: u8, conflicts: Conflicts },
}

/// The live game: owns the board and drives every mutation through
/// validation, with undo/redo stacks of cell deltas and an action log.
#[derive(Debug, Clone, Default)]
pub struct Game {
    board: Board,
    undo_stack: Vec<Move>,
    redo_stack: Vec<Move>,
    history: ActionHistory,
}

impl Game {
    /// Generates a fresh solution, seeds the starting clues from it, and
    /// discards the solution.
    pub fn new_game(seed: Option<u64>) -> Self {
        let mut generator = PuzzleGenerator::new(seed);
        let (_solution, puzzle) = generator.generate_puzzle(DEFAULT_TARGET_CLUES);
        Self::with_board(puzzle)
    }

    pub fn empty() -> Self {
        Self::with_board(Board::empty())
    }

    pub fn with_board(board: Board) -> Self {
        Self {
            board,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            history: ActionHistory::new(),
        }
    }

    /// Writes `value` at (row, col) if it is in range and legal. Acceptance
    /// pushes the old cell value for undo and invalidates redo history.
    pub fn set_number(&mut self, row: usize, col: usize, value: u8) -> Result<(), PlaceError> {
        if !(1..=MAX_DIGIT).contains(&value) {
            return Err(PlaceError::OutOfRange(value));
        }
        let conflicts = self.board.conflicts(row, col, value);
        if conflicts.any() {
            return Err(PlaceError::Conflict { value, conflicts });
        }
        self.push_undo(row, col);
        self.board.set(row, col, value);
        self.history.push(format!("set {value} at [{row},{col}]"));
        trace!("set {value} at ({row},{col})");
        Ok(())
    }

    /// Empties a filled cell. Clearing an already-empty cell is a no-op,
    /// not an error.
    pub fn clear_number(&mut self, row: usize, col: usize) -> bool {
        let old = self.board.get(row, col);
        if old == 0 {
            return false;
        }
        self.push_undo(row, col);
        self.board.set(row, col, 0);
        self.history.push(format!("cleared {old} from [{row},{col}]"));
        trace!("cleared {old} from ({row},{col})");
        true
    }

    /// Reverses the most recent edit. Restores are deliberately not run back
    /// through the legality check: the value being restored was valid when
    /// written, and the board may have changed since.
    pub fn undo(&mut self) -> bool {
        let Some(mv) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(Move {
            index: mv.index,
            previous: self.board.at_index(mv.index),
        });
        self.board.set_index(mv.index, mv.previous);
        let (row, col) = (mv.index / SIZE, mv.index % SIZE);
        self.history.push(format!("undo at [{row},{col}]"));
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(mv) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(Move {
            index: mv.index,
            previous: self.board.at_index(mv.index),
        });
        self.board.set_index(mv.index, mv.previous);
        let (row, col) = (mv.index / SIZE, mv.index % SIZE);
        self.history.push(format!("redo at [{row},{col}]"));
        true
    }

    pub fn number_at(&self, row: usize, col: usize) -> u8 {
        self.board.get(row, col)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_solved(&self) -> bool {
        self.board.is_solved()
    }

    /// Conflict localization for the presentation layer: which regions hold
    /// a duplicate of `value`. Read-only.
    pub fn conflicts(&self, row: usize, col: usize, value: u8) -> Conflicts {
        self.board.conflicts(row, col, value)
    }

    /// Read-only snapshot of the action log; nothing is drained.
    pub fn action_history(&self) -> &[String] {
        self.history.entries()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    // A fresh edit makes the redo stack meaningless; redo is only valid
    // straight after an undo.
    fn push_undo(&mut self, row: usize, col: usize) {
        let index = row * SIZE + col;
        self.undo_stack.push(Move {
            index,
            previous: self.board.at_index(index),
        });
        self.redo_stack.clear();
    }
}
