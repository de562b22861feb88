use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const SIZE: usize = 6;
pub const CELL_COUNT: usize = SIZE * SIZE;
pub const MAX_DIGIT: u8 = 6;
pub const BLOCK_ROWS: usize = 2;
pub const BLOCK_COLS: usize = 3;

/// All 18 constraint units (6 rows, 6 columns, 6 blocks) as cell indices.
pub static UNITS: Lazy<Vec<[usize; SIZE]>> = Lazy::new(|| {
    let mut units = Vec::with_capacity(SIZE * 3);
    for r in 0..SIZE {
        let mut unit = [0; SIZE];
        for c in 0..SIZE {
            unit[c] = r * SIZE + c;
        }
        units.push(unit);
    }
    for c in 0..SIZE {
        let mut unit = [0; SIZE];
        for r in 0..SIZE {
            unit[r] = r * SIZE + c;
        }
        units.push(unit);
    }
    for (br, bc) in block_origins() {
        let mut unit = [0; SIZE];
        let mut i = 0;
        for r in br..br + BLOCK_ROWS {
            for c in bc..bc + BLOCK_COLS {
                unit[i] = r * SIZE + c;
                i += 1;
            }
        }
        units.push(unit);
    }
    units
});

/// Origin (top-left cell) of the 2x3 block containing (row, col).
pub fn block_origin(row: usize, col: usize) -> (usize, usize) {
    (row - row % BLOCK_ROWS, col - col % BLOCK_COLS)
}

pub(crate) fn block_origins() -> impl Iterator<Item = (usize, usize)> {
    (0..SIZE)
        .step_by(BLOCK_ROWS)
        .cartesian_product((0..SIZE).step_by(BLOCK_COLS))
}

/// Which constraint regions hold a duplicate of a proposed value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflicts {
    pub row: bool,
    pub col: bool,
    pub block: bool,
}

impl Conflicts {
    pub fn any(self) -> bool {
        self.row || self.col || self.block
    }
}

impl Display for Conflicts {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.row {
            names.push("row");
        }
        if self.col {
            names.push("column");
        }
        if self.block {
            names.push("block");
        }
        match names.as_slice() {
            [] => write!(f, "no region"),
            [a] => write!(f, "{a}"),
            [a, b] => write!(f, "{a} and {b}"),
            [a, b, c] => write!(f, "{a}, {b} and {c}"),
            _ => unreachable!(),
        }
    }
}

/// A 6x6 board as a flat run of 36 cells addressed by `row*6+col`.
/// 0 marks an empty cell, 1-6 a placed digit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<u8>", try_from = "Vec<u8>")]
pub struct Board {
    cells: [u8; CELL_COUNT],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: [0; CELL_COUNT],
        }
    }

    pub fn from_rows(rows: [[u8; SIZE]; SIZE]) -> Self {
        let mut b = Self::empty();
        for r in 0..SIZE {
            for c in 0..SIZE {
                b.set(r, c, rows[r][c]);
            }
        }
        b
    }

    /// Accepts 36 cells as digits 1-6 with 0/./_ for blanks; whitespace is ignored.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut digits = Vec::with_capacity(CELL_COUNT);
        for ch in text.chars() {
            match ch {
                '1'..='6' => digits.push(ch as u8 - b'0'),
                '0' | '.' | '_' => digits.push(0),
                c if c.is_whitespace() => {}
                c => anyhow::bail!("invalid character {c:?} in grid text"),
            }
        }
        if digits.len() != CELL_COUNT {
            anyhow::bail!("expected {} cells, got {}", CELL_COUNT, digits.len());
        }
        let mut cells = [0; CELL_COUNT];
        cells.copy_from_slice(&digits);
        Ok(Self { cells })
    }

    pub fn to_compact(&self) -> String {
        self.cells
            .iter()
            .map(|&v| if v == 0 { '.' } else { char::from(b'0' + v) })
            .collect()
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * SIZE + col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: u8) {
        self.set_index(row * SIZE + col, value);
    }

    pub(crate) fn at_index(&self, index: usize) -> u8 {
        self.cells[index]
    }

    pub(crate) fn set_index(&mut self, index: usize, value: u8) {
        debug_assert!(value <= MAX_DIGIT);
        self.cells[index] = value;
    }

    /// Reports every region in which `value` already occurs, excluding the
    /// target cell itself (so re-placing a cell's current digit conflicts
    /// with nothing).
    pub fn conflicts(&self, row: usize, col: usize, value: u8) -> Conflicts {
        let mut found = Conflicts::default();
        if value == 0 {
            // 0 marks empties, never a duplicate
            return found;
        }
        for c in 0..SIZE {
            if c != col && self.get(row, c) == value {
                found.row = true;
            }
        }
        for r in 0..SIZE {
            if r != row && self.get(r, col) == value {
                found.col = true;
            }
        }
        let (br, bc) = block_origin(row, col);
        for r in br..br + BLOCK_ROWS {
            for c in bc..bc + BLOCK_COLS {
                if (r, c) != (row, col) && self.get(r, c) == value {
                    found.block = true;
                }
            }
        }
        found
    }

    /// True iff `value` is 1-6 and placing it at (row, col) breaks no
    /// row/column/block rule.
    pub fn is_legal(&self, row: usize, col: usize, value: u8) -> bool {
        (1..=MAX_DIGIT).contains(&value) && !self.conflicts(row, col, value).any()
    }

    /// No unit holds a duplicate, ignoring zeros.
    pub fn is_valid(&self) -> bool {
        UNITS.iter().all(|unit| no_dupes(unit.map(|i| self.cells[i])))
    }

    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(|&v| v != 0) && self.is_valid()
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }
}

impl From<Board> for Vec<u8> {
    fn from(board: Board) -> Self {
        board.cells.to_vec()
    }
}

impl TryFrom<Vec<u8>> for Board {
    type Error = anyhow::Error;

    fn try_from(values: Vec<u8>) -> Result<Self, Self::Error> {
        if values.len() != CELL_COUNT {
            anyhow::bail!("expected {} cells, got {}", CELL_COUNT, values.len());
        }
        let mut cells = [0; CELL_COUNT];
        for (i, &v) in values.iter().enumerate() {
            if v > MAX_DIGIT {
                anyhow::bail!("cell {i} holds {v}, expected 0-{MAX_DIGIT}");
            }
            cells[i] = v;
        }
        Ok(Self { cells })
    }
}

fn no_dupes(values: [u8; SIZE]) -> bool {
    let mut seen = [false; MAX_DIGIT as usize + 1];
    for v in values {
        if v != 0 {
            if seen[v as usize] {
                return false;
            }
            seen[v as usize] = true;
        }
    }
    true
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for r in 0..SIZE {
            if r != 0 && r % BLOCK_ROWS == 0 {
                writeln!(f, "------+------")?;
            }
            for c in 0..SIZE {
                if c != 0 && c % BLOCK_COLS == 0 {
                    write!(f, "| ")?;
                }
                let v = self.get(r, c);
                write!(f, "{} ", if v == 0 { '.' } else { char::from(b'0' + v) })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
