pub mod board;
pub mod game;
pub mod history;
pub mod puzzle;

pub use board::{Board, Conflicts};
pub use game::{Game, PlaceError};
pub use history::ActionHistory;
pub use puzzle::{PuzzleGenerator, DEFAULT_TARGET_CLUES};
