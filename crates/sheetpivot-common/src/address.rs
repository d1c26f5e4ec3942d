//! A1-style cell references and column-letter helpers.
//!
//! All indices here are 1-based, matching what a user sees in a worksheet.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Largest column Excel accepts (`XFD`).
pub const MAX_COL: u32 = 16_384;
/// Largest row Excel accepts.
pub const MAX_ROW: u32 = 1_048_576;

/// Errors returned when parsing an A1 reference.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum A1ParseError {
    Empty,
    MissingColumn(String),
    MissingRow(String),
    /// Row or column is 0 or beyond the Excel grid.
    OutOfBounds(String),
    Invalid(String),
}

impl fmt::Display for A1ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            A1ParseError::Empty => write!(f, "empty cell reference"),
            A1ParseError::MissingColumn(s) => write!(f, "cell reference `{s}` has no column"),
            A1ParseError::MissingRow(s) => write!(f, "cell reference `{s}` has no row"),
            A1ParseError::OutOfBounds(s) => {
                write!(f, "cell reference `{s}` is outside the worksheet grid")
            }
            A1ParseError::Invalid(s) => write!(f, "`{s}` is not an A1 cell reference"),
        }
    }
}

impl Error for A1ParseError {}

/// Absolute 1-based cell position.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse `B12` or `$B$12`. Lowercase column letters are accepted.
    pub fn parse_a1(s: &str) -> Result<Self, A1ParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(A1ParseError::Empty);
        }
        let upper = trimmed.replace('$', "").to_ascii_uppercase();
        let split = upper
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(upper.len());
        let (letters, digits) = upper.split_at(split);
        if letters.is_empty() {
            return Err(A1ParseError::MissingColumn(trimmed.to_string()));
        }
        if digits.is_empty() {
            return Err(A1ParseError::MissingRow(trimmed.to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(A1ParseError::Invalid(trimmed.to_string()));
        }
        let col = letters_to_col(letters)
            .ok_or_else(|| A1ParseError::OutOfBounds(trimmed.to_string()))?;
        let row: u32 = digits
            .parse()
            .map_err(|_| A1ParseError::OutOfBounds(trimmed.to_string()))?;
        if row == 0 || row > MAX_ROW || col > MAX_COL {
            return Err(A1ParseError::OutOfBounds(trimmed.to_string()));
        }
        Ok(Self { row, col })
    }

    /// Move down `drow` rows and right `dcol` columns. `None` when the
    /// result leaves the worksheet grid.
    pub fn checked_offset(self, drow: u32, dcol: u32) -> Option<Self> {
        let row = self.row.checked_add(drow).filter(|r| *r <= MAX_ROW)?;
        let col = self.col.checked_add(dcol).filter(|c| *c <= MAX_COL)?;
        Some(Self { row, col })
    }

    /// `$B$12` form, used inside chart series formulas.
    pub fn to_absolute(self) -> String {
        format!("${}${}", col_to_letters(self.col), self.row)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", col_to_letters(self.col), self.row)
    }
}

impl FromStr for CellRef {
    type Err = A1ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s)
    }
}

/// 1-based column index to letters (`1 -> A`, `27 -> AA`). Column 0 renders as
/// an empty string.
pub fn col_to_letters(col: u32) -> String {
    let mut buf = Vec::new();
    let mut n = col;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        buf.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    buf.reverse();
    buf.into_iter().map(char::from).collect()
}

/// Letters to 1-based column index. Only uppercase ASCII is accepted.
pub fn letters_to_col(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for ch in s.bytes() {
        if !ch.is_ascii_uppercase() {
            return None;
        }
        col = col.checked_mul(26)?;
        col = col.checked_add((ch - b'A') as u32 + 1)?;
    }
    Some(col)
}
