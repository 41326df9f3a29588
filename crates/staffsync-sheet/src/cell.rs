use std::collections::HashMap;

use calamine::Data;

/// One spreadsheet cell, reduced to the shapes the importer cares about.
///
/// Every calamine variant maps onto exactly one of these: booleans coerce
/// to text, error cells degrade to empty.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Text(String),
    Number(f64),
    /// Excel serial date: fractional days since the 1899-12-30 epoch.
    DateTime(f64),
    Empty,
}

impl RawCell {
    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&Data> for RawCell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => RawCell::Empty,
            Data::String(s) => RawCell::Text(s.clone()),
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Float(f) => RawCell::Number(*f),
            Data::Bool(b) => RawCell::Text(b.to_string()),
            Data::DateTime(dt) => RawCell::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) => RawCell::Text(s.clone()),
            Data::DurationIso(s) => RawCell::Text(s.clone()),
            Data::Error(_) => RawCell::Empty,
        }
    }
}

/// One data row keyed by the free-text column headers of the source sheet.
#[derive(Debug, Clone)]
pub struct RawRow {
    /// 1-based spreadsheet row number (the header row is 1).
    pub row_index: usize,
    cells: HashMap<String, RawCell>,
}

impl RawRow {
    pub fn new(row_index: usize) -> Self {
        Self {
            row_index,
            cells: HashMap::new(),
        }
    }

    pub fn insert(&mut self, header: impl Into<String>, cell: RawCell) {
        self.cells.insert(header.into(), cell);
    }

    pub fn get(&self, header: &str) -> Option<&RawCell> {
        self.cells.get(header)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(RawCell::is_empty)
    }
}
