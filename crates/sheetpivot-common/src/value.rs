use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

use crate::CellErrorKind;

/// A single cell value as read from, or written to, a worksheet.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
    Empty, // For empty cells
    Error(CellErrorKind),
}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            LiteralValue::Int(i) => i.hash(state),
            LiteralValue::Number(n) => n.to_bits().hash(state),
            LiteralValue::Text(s) => s.hash(state),
            LiteralValue::Boolean(b) => b.hash(state),
            LiteralValue::Empty => state.write_u8(0),
            LiteralValue::Error(e) => e.hash(state),
        }
    }
}

impl Eq for LiteralValue {}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(i) => write!(f, "{i}"),
            LiteralValue::Number(n) => write!(f, "{n}"),
            LiteralValue::Text(s) => write!(f, "{s}"),
            LiteralValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            LiteralValue::Error(e) => write!(f, "{e}"),
            LiteralValue::Empty => write!(f, ""),
        }
    }
}

impl LiteralValue {
    /// Numeric view of the value. Only `Int` and `Number` qualify; text is
    /// never coerced here.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            LiteralValue::Int(i) => Some(*i as f64),
            LiteralValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// `Empty`, or text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            LiteralValue::Empty => true,
            LiteralValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the value as a grouping key.
    ///
    /// Integral floats drop their fractional part so a year read as `2019.0`
    /// groups with the text `2019`.
    pub fn to_key(&self) -> String {
        match self {
            LiteralValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            LiteralValue::Text(s) => s.trim().to_string(),
            other => other.to_string(),
        }
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Int(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Boolean(value)
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::Text(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_render_integral_numbers_without_fraction() {
        assert_eq!(LiteralValue::Number(2019.0).to_key(), "2019");
        assert_eq!(LiteralValue::Number(12.5).to_key(), "12.5");
        assert_eq!(LiteralValue::Int(-3).to_key(), "-3");
        assert_eq!(LiteralValue::Text("  Female ".into()).to_key(), "Female");
        assert_eq!(LiteralValue::Boolean(true).to_key(), "TRUE");
    }

    #[test]
    fn blank_detection() {
        assert!(LiteralValue::Empty.is_blank());
        assert!(LiteralValue::Text("   ".into()).is_blank());
        assert!(!LiteralValue::Int(0).is_blank());
        assert!(!LiteralValue::Error(CellErrorKind::Na).is_blank());
    }

    #[test]
    fn only_numeric_variants_have_a_number() {
        assert_eq!(LiteralValue::Int(4).as_number(), Some(4.0));
        assert_eq!(LiteralValue::Number(1.5).as_number(), Some(1.5));
        assert_eq!(LiteralValue::Text("1.5".into()).as_number(), None);
        assert_eq!(LiteralValue::Boolean(true).as_number(), None);
    }
}
