//! Schema normalization: raw tabular rows -> pivoted (x-category × z-category)
//! matrix of numeric values.

use crate::core::{ColumnMap, RawRow};
use crate::{ChartError, Result};
use error_stack::Report;
use serde_json::Value;

/// One pivoted record: the primary category key plus one numeric cell per
/// secondary category seen for it. Cell order is first-seen.
#[derive(Clone, Debug, PartialEq)]
pub struct PivotedRow {
    pub key: String,
    cells: Vec<(String, f64)>,
}

impl PivotedRow {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            cells: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// Last write wins per cell.
    pub fn set(&mut self, key: &str, value: f64) {
        match self.cells.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.cells.push((key.to_string(), value)),
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, f64)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// The normalizer's output: pivoted rows plus the derived category key sets.
#[derive(Clone, Debug, PartialEq)]
pub struct PivotedTable {
    pub rows: Vec<PivotedRow>,
    /// Primary category values, one per pivoted row, in first-seen order.
    pub keys_x: Vec<String>,
    /// Secondary category keys: the union across all rows, first-seen order.
    pub keys_z: Vec<String>,
}

impl PivotedTable {
    /// Every numeric cell actually present, row-major.
    pub fn values(&self) -> Vec<f64> {
        self.rows
            .iter()
            .flat_map(|r| r.cells().map(|(_, v)| v))
            .collect()
    }
}

/// Coerce a raw cell to a number; numeric strings are accepted.
pub fn numeric(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Stringify a raw cell for use as a category key.
fn key_of(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Build the pivoted matrix from raw rows and a column mapping.
///
/// With `x`, `y` and `z` all mapped, rows are grouped by the `x` cell and a
/// value cell is written at `row[z] = numeric(y)` for each raw row. With only
/// `x` mapped the data is assumed pre-pivoted and passed through. Raw input
/// is never mutated.
pub fn pivot(rows: &[RawRow], columns: &ColumnMap) -> Result<PivotedTable> {
    if rows.is_empty() {
        return Err(Report::new(ChartError::Configuration).attach_printable("no data to display"));
    }
    if columns.x.is_empty() && columns.y.is_empty() && columns.z.is_empty() {
        return Err(
            Report::new(ChartError::Configuration).attach_printable("no column names specified")
        );
    }

    let first = &rows[0];
    let pivoted = if !columns.x.is_empty() && !columns.z.is_empty() {
        for name in [&columns.x, &columns.y, &columns.z] {
            if !first.contains_key(name) {
                return Err(Report::new(ChartError::Configuration)
                    .attach_printable(format!("column `{name}` not found in the data")));
            }
        }
        group_rows(rows, columns)
    } else {
        if !first.contains_key(&columns.x) {
            return Err(Report::new(ChartError::Configuration)
                .attach_printable(format!("column `{}` not found in the data", columns.x)));
        }
        pass_through(rows, &columns.x)
    };

    let keys_x = pivoted.iter().map(|r| r.key.clone()).collect();

    // Union of all secondary keys in first-seen order. The source this chart
    // derives from took the keys of whichever row happened to be widest,
    // which drops categories absent from that row; the union never does.
    let mut keys_z: Vec<String> = Vec::new();
    for row in &pivoted {
        for (key, _) in row.cells() {
            if !keys_z.iter().any(|k| k == key) {
                keys_z.push(key.to_string());
            }
        }
    }

    Ok(PivotedTable {
        rows: pivoted,
        keys_x,
        keys_z,
    })
}

fn group_rows(rows: &[RawRow], columns: &ColumnMap) -> Vec<PivotedRow> {
    let mut out: Vec<PivotedRow> = Vec::new();
    for raw in rows {
        let Some(key_x) = raw.get(&columns.x).map(key_of) else {
            continue;
        };
        let idx = match out.iter().position(|r| r.key == key_x) {
            Some(i) => i,
            None => {
                out.push(PivotedRow::new(key_x));
                out.len() - 1
            }
        };
        if let (Some(key_z), Some(value)) = (
            raw.get(&columns.z).map(key_of),
            raw.get(&columns.y).and_then(numeric),
        ) {
            out[idx].set(&key_z, value);
        }
    }
    out
}

fn pass_through(rows: &[RawRow], column_x: &str) -> Vec<PivotedRow> {
    rows.iter()
        .filter_map(|raw| {
            let key_x = raw.get(column_x).map(key_of)?;
            let mut row = PivotedRow::new(key_x);
            for (key, cell) in raw {
                if key != column_x {
                    if let Some(value) = numeric(cell) {
                        row.set(key, value);
                    }
                }
            }
            Some(row)
        })
        .collect()
}
