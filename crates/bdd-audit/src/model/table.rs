//! Tabular data: cells, rows, and data tables.
//!
//! [`DataTable`] serves two roles. In the model it is a step's inline
//! tabular argument; in reporting it is the canonical output shape, with
//! columns right-padded to the widest value observed in that column and a
//! configurable cell delimiter (`|` by default).

use std::collections::HashSet;
use std::fmt;

use super::placeholder::{self, ParamUsage};

/// A single table cell holding a string value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TableCell {
    /// The cell's textual value.
    pub value: String,
}

impl TableCell {
    /// Create a cell from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Placeholder usage within this cell's value.
    #[must_use]
    pub fn parameter_usage(&self) -> ParamUsage {
        placeholder::parameter_usage(&self.value)
    }

    /// Literally substitute `<name>` with `value` inside the cell.
    pub fn apply_parameter(&mut self, name: &str, value: &str) {
        if !self.value.trim().is_empty() {
            self.value = placeholder::substitute(&self.value, name, value);
        }
    }
}

impl fmt::Display for TableCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// An ordered sequence of [`TableCell`]s.
///
/// Cell counts may differ row-to-row until a table is reconciled; rows are
/// padded with empty cells, never truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TableRow {
    /// The row's cells in column order.
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row from an ordered list of cell values.
    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            cells: values.into_iter().map(TableCell::new).collect(),
        }
    }

    /// Create a row of `size` empty cells.
    #[must_use]
    pub fn sized(size: usize) -> Self {
        Self {
            cells: vec![TableCell::default(); size],
        }
    }

    /// Number of cells in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Append a cell value, returning the new cell count.
    pub fn add_cell(&mut self, value: impl Into<String>) -> usize {
        self.cells.push(TableCell::new(value));
        self.cells.len()
    }

    /// Remove the cell at `index`; out-of-range indexes are ignored.
    pub fn remove_cell(&mut self, index: usize) {
        if index < self.cells.len() {
            self.cells.remove(index);
        }
    }

    /// The value at `index`, or `None` when out of range.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(|cell| cell.value.as_str())
    }

    /// Overwrite the value at `index`, growing the row with empty cells
    /// as needed.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        while self.cells.len() <= index {
            self.add_cell("");
        }
        if let Some(cell) = self.cells.get_mut(index) {
            cell.value = value.into();
        }
    }

    /// Pad the row with empty cells until it holds `size` cells.
    pub fn adjust_size(&mut self, size: usize) {
        while self.cells.len() < size {
            self.add_cell("");
        }
    }

    /// Iterate cell values in column order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|cell| cell.value.as_str())
    }

    /// Every column index holding exactly `value`.
    #[must_use]
    pub fn find_value(&self, value: &str) -> Vec<usize> {
        self.values()
            .enumerate()
            .filter_map(|(index, cell)| (cell == value).then_some(index))
            .collect()
    }

    /// Whether any cell holds exactly `value`.
    #[must_use]
    pub fn contains_value(&self, value: &str) -> bool {
        self.values().any(|cell| cell == value)
    }

    /// Union of this row's values with another's, in order of first
    /// appearance. Used to merge Examples headers by column name.
    #[must_use]
    pub fn merge_values(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for value in other.values() {
            if !merged.contains_value(value) {
                merged.add_cell(value);
            }
        }
        merged
    }

    /// Combined placeholder usage across all cells.
    #[must_use]
    pub fn parameter_usage(&self) -> ParamUsage {
        let mut usage = ParamUsage::new();
        for cell in &self.cells {
            usage.merge(&cell.parameter_usage());
        }
        usage
    }

    /// Literally substitute `<name>` with `value` in every cell.
    pub fn apply_parameter(&mut self, name: &str, value: &str) {
        for cell in &mut self.cells {
            cell.apply_parameter(name, value);
        }
    }

    /// Render the row with per-column padding widths and a delimiter.
    #[must_use]
    pub fn render(&self, widths: &[usize], delimiter: &str) -> String {
        if self.cells.is_empty() {
            return String::new();
        }
        let padded: Vec<String> = self
            .cells
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let width = widths.get(index).copied().unwrap_or(0);
                pad_right(&cell.value, width)
            })
            .collect();
        let joined = padded.join(delimiter);
        format!("{delimiter}{joined}{delimiter}").trim().to_owned()
    }
}

impl fmt::Display for TableRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = vec![0; self.cells.len()];
        f.write_str(&self.render(&widths, "|"))
    }
}

fn pad_right(value: &str, width: usize) -> String {
    let mut out = value.to_owned();
    let mut length = value.chars().count();
    while length < width {
        out.push(' ');
        length += 1;
    }
    out
}

/// An ordered sequence of [`TableRow`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    /// The table's rows in source order.
    pub rows: Vec<TableRow>,
}

impl DataTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Append a row built from an ordered list of cell values.
    pub fn add_values<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.add_row(TableRow::from_values(values));
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Combined placeholder usage across all rows.
    #[must_use]
    pub fn parameter_usage(&self) -> ParamUsage {
        let mut usage = ParamUsage::new();
        for row in &self.rows {
            usage.merge(&row.parameter_usage());
        }
        usage
    }

    /// Literally substitute `<name>` with `value` in every cell.
    pub fn apply_parameter(&mut self, name: &str, value: &str) {
        for row in &mut self.rows {
            row.apply_parameter(name, value);
        }
    }

    /// Render all rows with shared column widths and the given delimiter.
    ///
    /// Each column is right-padded to the widest value observed in that
    /// column across all rows.
    #[must_use]
    pub fn render(&self, delimiter: &str) -> String {
        let widths = column_widths(&self.rows);
        let lines: Vec<String> = self
            .rows
            .iter()
            .map(|row| row.render(&widths, delimiter))
            .collect();
        lines.join("\n")
    }

    /// Remove exact-duplicate rows, keeping the first occurrence, unless
    /// only one row remains.
    pub fn dedup_rows(&mut self) {
        dedup_rows(&mut self.rows);
    }
}

impl fmt::Display for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render("|"))
    }
}

/// Per-column maximum value widths across `rows`, in characters.
pub(crate) fn column_widths(rows: &[TableRow]) -> Vec<usize> {
    let columns = rows.iter().map(TableRow::len).max().unwrap_or(0);
    (0..columns)
        .map(|index| {
            rows.iter()
                .filter_map(|row| row.value(index))
                .map(|value| value.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect()
}

/// Remove exact-duplicate rows in place, preserving first occurrences.
/// A single remaining row is never touched.
pub(crate) fn dedup_rows(rows: &mut Vec<TableRow>) {
    if rows.len() <= 1 {
        return;
    }
    let mut seen = HashSet::new();
    rows.retain(|row| seen.insert(row.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> DataTable {
        let mut out = DataTable::new();
        for row in rows {
            out.add_values(row.iter().copied());
        }
        out
    }

    #[test]
    fn renders_with_column_max_widths() {
        let table = table(&[&["id", "environment"], &["1", "prod"]]);
        assert_eq!(table.render("|"), "|id|environment|\n|1 |prod       |");
    }

    #[test]
    fn render_supports_custom_delimiter() {
        let table = table(&[&["a", "bc"], &["dd", "e"]]);
        assert_eq!(table.render(" "), "a  bc\ndd e");
    }

    #[test]
    fn ragged_rows_share_widths() {
        let table = table(&[&["one"], &["a", "longer"]]);
        assert_eq!(table.render("|"), "|one|\n|a  |longer|");
    }

    #[test]
    fn dedup_rows_keeps_first_occurrence() {
        let mut table = table(&[&["1", "x"], &["2", "y"], &["1", "x"]]);
        table.dedup_rows();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows.first().map(|r| r.value(0)), Some(Some("1")));
    }

    #[test]
    fn dedup_rows_leaves_single_row_alone() {
        let mut table = table(&[&["1", "x"]]);
        table.dedup_rows();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn merge_values_unions_by_value() {
        let base = TableRow::from_values(["id", "name"]);
        let other = TableRow::from_values(["name", "env"]);
        let merged = base.merge_values(&other);
        assert_eq!(merged.values().collect::<Vec<_>>(), ["id", "name", "env"]);
    }

    #[test]
    fn set_value_grows_short_rows() {
        let mut row = TableRow::new();
        row.set_value(2, "x");
        assert_eq!(row.values().collect::<Vec<_>>(), ["", "", "x"]);
    }

    #[test]
    fn apply_parameter_rewrites_cells() {
        let mut table = table(&[&["<id>", "fixed"], &["<id> twice <id>", ""]]);
        table.apply_parameter("id", "7");
        assert_eq!(table.rows.first().map(|r| r.value(0)), Some(Some("7")));
        let second = table.rows.get(1).and_then(|r| r.value(0)).map(str::to_owned);
        assert_eq!(second.as_deref(), Some("7 twice 7"));
    }
}
