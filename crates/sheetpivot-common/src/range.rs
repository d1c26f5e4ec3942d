use crate::address::CellRef;

/// A rectangular, sheet-qualified block of cells with 1-based inclusive bounds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RangeAddress {
    pub sheet: String,
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl RangeAddress {
    pub fn new(
        sheet: impl Into<String>,
        start_row: u32,
        start_col: u32,
        end_row: u32,
        end_col: u32,
    ) -> Result<Self, &'static str> {
        if start_row == 0 || start_col == 0 || end_row == 0 || end_col == 0 {
            return Err("Row and column indices must be 1-based");
        }
        if start_row > end_row || start_col > end_col {
            return Err("Range must be ordered: start <= end");
        }
        Ok(Self {
            sheet: sheet.into(),
            start_row,
            start_col,
            end_row,
            end_col,
        })
    }

    pub fn width(&self) -> u32 {
        self.end_col - self.start_col + 1
    }
    pub fn height(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    pub fn start(&self) -> CellRef {
        CellRef::new(self.start_row, self.start_col)
    }

    pub fn end(&self) -> CellRef {
        CellRef::new(self.end_row, self.end_col)
    }

    /// Relative `A5:C7` form without the sheet.
    pub fn to_a1(&self) -> String {
        format!("{}:{}", self.start(), self.end())
    }

    /// Absolute, sheet-qualified reference as used by chart series
    /// (`Report!$B$5:$B$7`, quoted when the sheet name needs it).
    pub fn to_absolute_ref(&self) -> String {
        format!(
            "{}!{}:{}",
            quote_sheet_name(&self.sheet),
            self.start().to_absolute(),
            self.end().to_absolute()
        )
    }

    /// The single-column sub-range `col` of this range, same rows.
    pub fn column(&self, col: u32) -> Option<Self> {
        if col < self.start_col || col > self.end_col {
            return None;
        }
        Some(Self {
            sheet: self.sheet.clone(),
            start_row: self.start_row,
            start_col: col,
            end_row: self.end_row,
            end_col: col,
        })
    }
}

/// Quote a sheet name for use in a reference when it contains anything other
/// than ASCII alphanumerics or `_`. Embedded quotes are doubled.
pub fn quote_sheet_name(name: &str) -> String {
    let plain = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if plain {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_and_unordered_bounds() {
        assert!(RangeAddress::new("Report", 0, 1, 2, 2).is_err());
        assert!(RangeAddress::new("Report", 3, 1, 2, 2).is_err());
        assert!(RangeAddress::new("Report", 2, 3, 2, 2).is_err());
        let r = RangeAddress::new("Report", 5, 1, 7, 3).unwrap();
        assert_eq!((r.height(), r.width()), (3, 3));
    }

    #[test]
    fn renders_relative_and_absolute_forms() {
        let r = RangeAddress::new("Report", 5, 1, 7, 3).unwrap();
        assert_eq!(r.to_a1(), "A5:C7");
        assert_eq!(r.to_absolute_ref(), "Report!$A$5:$C$7");
        let spaced = RangeAddress::new("Q1 Sales", 1, 2, 1, 2).unwrap();
        assert_eq!(spaced.to_absolute_ref(), "'Q1 Sales'!$B$1:$B$1");
        assert_eq!(quote_sheet_name("Bob's"), "'Bob''s'");
    }

    #[test]
    fn column_slices_stay_inside_the_range() {
        let r = RangeAddress::new("Report", 5, 1, 7, 3).unwrap();
        assert_eq!(r.column(2).unwrap().to_a1(), "B5:B7");
        assert!(r.column(4).is_none());
    }
}
