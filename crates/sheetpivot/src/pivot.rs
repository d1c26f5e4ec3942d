//! Aggregator: group-and-sum pivot of records into a [`SummaryTable`].

use crate::config::{MissingCells, PivotFields};
use crate::error::ReportError;
use crate::reader::Record;
use rustc_hash::FxHashMap;
use sheetpivot_common::LiteralValue;
use std::collections::BTreeSet;
use tracing::debug;

/// Groups as rows, categories as columns, both sorted lexically.
///
/// `cells[g][c]` is `None` only for a pair absent from the input under
/// [`MissingCells::Blank`]; with zero fill every cell is `Some`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    groups: Vec<String>,
    categories: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl SummaryTable {
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() || self.categories.is_empty()
    }

    /// `(rows, columns)` of the numeric body.
    pub fn shape(&self) -> (usize, usize) {
        (self.groups.len(), self.categories.len())
    }

    pub fn value_at(&self, group_idx: usize, category_idx: usize) -> Option<f64> {
        self.cells
            .get(group_idx)
            .and_then(|row| row.get(category_idx))
            .copied()
            .flatten()
    }

    pub fn get(&self, group: &str, category: &str) -> Option<f64> {
        let g = self.groups.iter().position(|x| x == group)?;
        let c = self.categories.iter().position(|x| x == category)?;
        self.value_at(g, c)
    }

    /// Rows as `(group label, values)`, in display order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.groups
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(Vec::as_slice))
    }

    /// Sum of one category column, blanks ignored.
    pub fn column_total(&self, category_idx: usize) -> f64 {
        self.cells
            .iter()
            .filter_map(|row| row.get(category_idx).copied().flatten())
            .sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub records_used: usize,
    /// Records with a blank group, category or value cell.
    pub records_skipped: usize,
}

/// Whole-number rounding, ties to even.
pub fn round_value(v: f64) -> f64 {
    v.round_ties_even()
}

/// Partition records by (group, category), sum each partition in input
/// order, then round.
pub fn aggregate(
    records: &[Record],
    fields: PivotFields<'_>,
    missing: MissingCells,
) -> Result<(SummaryTable, AggregateStats), ReportError> {
    let mut sums: FxHashMap<(String, String), f64> = FxHashMap::default();
    let mut groups = BTreeSet::new();
    let mut categories = BTreeSet::new();
    let mut stats = AggregateStats::default();

    for record in records {
        let (Some(group), Some(category), Some(value)) = (
            key_of(record, fields.group),
            key_of(record, fields.category),
            record.get(fields.value).filter(|v| !v.is_blank()),
        ) else {
            debug!(row = record.row, "skipping record with a blank pivot field");
            stats.records_skipped += 1;
            continue;
        };
        let amount = coerce_number(value).ok_or_else(|| {
            ReportError::Schema(format!(
                "row {}: `{}` value `{value}` is not numeric",
                record.row, fields.value
            ))
        })?;

        groups.insert(group.clone());
        categories.insert(category.clone());
        *sums.entry((group, category)).or_insert(0.0) += amount;
        stats.records_used += 1;
    }

    let groups: Vec<String> = groups.into_iter().collect();
    let categories: Vec<String> = categories.into_iter().collect();
    let cells = groups
        .iter()
        .map(|g| {
            categories
                .iter()
                .map(|c| match sums.get(&(g.clone(), c.clone())) {
                    Some(sum) => Some(round_value(*sum)),
                    None => match missing {
                        MissingCells::ZeroFill => Some(0.0),
                        MissingCells::Blank => None,
                    },
                })
                .collect()
        })
        .collect();

    Ok((
        SummaryTable {
            groups,
            categories,
            cells,
        },
        stats,
    ))
}

fn key_of(record: &Record, field: &str) -> Option<String> {
    record
        .get(field)
        .filter(|v| !v.is_blank())
        .map(LiteralValue::to_key)
}

fn coerce_number(value: &LiteralValue) -> Option<f64> {
    match value {
        LiteralValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        other => other.as_number(),
    }
}
