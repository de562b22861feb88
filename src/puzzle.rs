use log::debug;
use rand::{seq::SliceRandom, Rng, SeedableRng};

use crate::board::{block_origins, Board, BLOCK_COLS, BLOCK_ROWS, CELL_COUNT, MAX_DIGIT, SIZE};

/// Upper bound on clues in a freshly seeded puzzle. With 2-3 clues drawn per
/// block the total lands in 12..=18, so the default never clips.
pub const DEFAULT_TARGET_CLUES: usize = 19;

const MIN_BLOCK_CLUES: usize = 2;
const MAX_BLOCK_CLUES: usize = 3;

pub struct PuzzleGenerator {
    rng: rand::rngs::StdRng,
}

impl PuzzleGenerator {
    /// Pass a seed for reproducible output; `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => rand::rngs::StdRng::seed_from_u64(s),
            None => rand::rngs::StdRng::from_rng(rand::thread_rng()).unwrap(),
        };
        Self { rng }
    }

    /// Produces a fully solved board by randomized backtracking. Digit order
    /// is reshuffled per cell, so repeated calls give different solutions.
    pub fn generate_solution(&mut self) -> Board {
        let mut board = Board::empty();
        let filled = self.fill_grid(&mut board);
        debug_assert!(filled, "an empty 6x6 board is always solvable");
        debug!("generated full solution");
        board
    }

    /// Solution plus the seeded starting puzzle derived from it.
    pub fn generate_puzzle(&mut self, target_clues: usize) -> (Board, Board) {
        let solution = self.generate_solution();
        let puzzle = self.seed_puzzle(&solution, target_clues);
        (solution, puzzle)
    }

    /// Depth-first search over the empty cells in row-major order. Each frame
    /// keeps its own shuffled digit order and a cursor into it, so unwinding
    /// a placement resumes the previous frame exactly where it left off.
    /// Returns false only if `board` already breaks a constraint.
    fn fill_grid(&mut self, board: &mut Board) -> bool {
        struct Frame {
            digits: [u8; MAX_DIGIT as usize],
            cursor: usize,
        }

        let open: Vec<usize> = (0..CELL_COUNT)
            .filter(|&i| board.at_index(i) == 0)
            .collect();
        let mut frames: Vec<Frame> = Vec::with_capacity(open.len());
        let mut depth = 0;
        while depth < open.len() {
            if frames.len() == depth {
                let mut digits = [1, 2, 3, 4, 5, 6];
                digits.shuffle(&mut self.rng);
                frames.push(Frame { digits, cursor: 0 });
            }
            let index = open[depth];
            let (row, col) = (index / SIZE, index % SIZE);
            let frame = &mut frames[depth];
            let mut placed = false;
            while frame.cursor < frame.digits.len() {
                let digit = frame.digits[frame.cursor];
                frame.cursor += 1;
                if board.is_legal(row, col, digit) {
                    board.set_index(index, digit);
                    placed = true;
                    break;
                }
            }
            if placed {
                depth += 1;
                continue;
            }
            // all 6 digits failed here: unwind the previous placement
            frames.pop();
            if depth == 0 {
                return false;
            }
            depth -= 1;
            board.set_index(open[depth], 0);
        }
        true
    }

    /// Derives a starting puzzle by copying a few solution cells per 2x3
    /// block: 2-3 clues each, clipped so the total never exceeds
    /// `target_clues`. Cells within a block are drawn by rejection sampling,
    /// so no position is picked twice.
    pub fn seed_puzzle(&mut self, solution: &Board, target_clues: usize) -> Board {
        let mut puzzle = Board::empty();
        let mut placed = 0;
        for (block_row, block_col) in block_origins() {
            let want = self
                .rng
                .gen_range(MIN_BLOCK_CLUES..=MAX_BLOCK_CLUES)
                .min(target_clues.saturating_sub(placed));
            let mut chosen: Vec<usize> = Vec::with_capacity(want);
            while chosen.len() < want {
                let offset = self.rng.gen_range(0..BLOCK_ROWS * BLOCK_COLS);
                let row = block_row + offset / BLOCK_COLS;
                let col = block_col + offset % BLOCK_COLS;
                let index = row * SIZE + col;
                if chosen.contains(&index) {
                    continue;
                }
                chosen.push(index);
                puzzle.set_index(index, solution.at_index(index));
                placed += 1;
            }
        }
        debug_assert!(puzzle.is_valid(), "clues copied from a legal solution");
        debug!("seeded puzzle with {placed} clues (target {target_clues})");
        puzzle
    }
}
