//! Examples blocks: parameter tables driving scenario outline expansion.

use std::fmt;

use super::table::{self, TableRow};
use super::tag::{HasTags, Tags};

/// A tagged table of parameter values for a scenario outline.
///
/// Body rows are keyed to the header by **position** until blocks are
/// merged; merging reconciles columns by **name**. Rows are padded to the
/// header width, never truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Examples {
    /// Tags scoping this block.
    pub tags: Tags,
    /// Keyword as authored, normally `Examples`.
    pub keyword: String,
    /// Block name, whitespace-normalised (may be empty).
    pub name: String,
    /// Free-text description, when present.
    pub description: Option<String>,
    /// Header row of parameter names.
    pub header: TableRow,
    /// Body rows in authored order.
    pub body: Vec<TableRow>,
}

impl Default for Examples {
    fn default() -> Self {
        Self {
            tags: Tags::new(),
            keyword: "Examples".to_owned(),
            name: String::new(),
            description: None,
            header: TableRow::new(),
            body: Vec::new(),
        }
    }
}

impl Examples {
    /// Create an empty block from a header of parameter names.
    #[must_use]
    pub fn with_header<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            header: TableRow::from_values(names),
            ..Self::default()
        }
    }

    /// Append a body row built from an ordered list of values.
    pub fn add_row<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.body.push(TableRow::from_values(values));
    }

    /// Index of the column whose header equals `name`, when present.
    /// Blank names never match.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        if name.trim().is_empty() {
            return None;
        }
        self.header.find_value(name).first().copied()
    }

    /// Parameter name of the column at `index`, when in range.
    #[must_use]
    pub fn param_name(&self, index: usize) -> Option<&str> {
        self.header.value(index)
    }

    /// Parameter names of the columns at `indexes`, skipping out-of-range
    /// entries.
    #[must_use]
    pub fn param_names(&self, indexes: &[usize]) -> Vec<String> {
        indexes
            .iter()
            .filter_map(|&index| self.param_name(index).map(str::to_owned))
            .collect()
    }

    /// Remove the column at `index` from the header and every body row.
    pub fn remove_column(&mut self, index: usize) {
        self.header.remove_cell(index);
        for row in &mut self.body {
            row.remove_cell(index);
        }
    }

    /// Remove the first column whose header equals `name`, if any.
    pub fn remove_column_named(&mut self, name: &str) {
        if let Some(index) = self.column_index(name) {
            self.remove_column(index);
        }
    }

    /// Remove one column per name in `names`, in order.
    pub fn remove_columns_named(&mut self, names: &[String]) {
        for name in names {
            self.remove_column_named(name);
        }
    }

    /// Remove exact-duplicate body rows, keeping first occurrences. A body
    /// with a single row is never touched.
    pub fn dedup_rows(&mut self) {
        table::dedup_rows(&mut self.body);
    }

    /// Indexes of columns whose value is identical across every body row.
    ///
    /// The column count is taken from the first body row; an empty body has
    /// no constant columns.
    #[must_use]
    pub fn find_constant_columns(&self) -> Vec<usize> {
        let Some(first) = self.body.first() else {
            return Vec::new();
        };
        (0..first.len())
            .filter(|&index| {
                let reference = first.value(index);
                self.body
                    .iter()
                    .skip(1)
                    .all(|row| row.value(index) == reference)
            })
            .collect()
    }

    /// `(name, value)` pairs for one body row, keyed by the header.
    ///
    /// Duplicate header names keep their first position and take the
    /// last column's value, matching map-insertion semantics. Values past
    /// the end of a short row read as empty.
    #[must_use]
    pub fn to_map(&self, row_index: usize) -> Vec<(String, String)> {
        let Some(row) = self.body.get(row_index) else {
            return Vec::new();
        };
        let mut values: Vec<(String, String)> = Vec::new();
        for index in 0..self.header.len() {
            let name = self.header.value(index).unwrap_or("").to_owned();
            let value = row.value(index).unwrap_or("").to_owned();
            push_pair(&mut values, name, value);
        }
        values
    }

    /// `(name, value)` pairs for one body row, restricted to `names`.
    /// Names without a matching column are skipped.
    #[must_use]
    pub fn to_map_of(&self, row_index: usize, names: &[String]) -> Vec<(String, String)> {
        let Some(row) = self.body.get(row_index) else {
            return Vec::new();
        };
        let mut values: Vec<(String, String)> = Vec::new();
        for name in names {
            if let Some(index) = self.column_index(name) {
                let value = row.value(index).unwrap_or("").to_owned();
                push_pair(&mut values, name.clone(), value);
            }
        }
        values
    }

    /// Merge another block into this one, reconciling columns by name.
    ///
    /// The header becomes the union of both headers in first-seen order.
    /// When the other block's header already equals the merged header its
    /// rows are appended unchanged; otherwise each row is rebuilt against
    /// the merged header, copying cells into the column with the matching
    /// name and skipping blank-named columns. Duplicate rows are then
    /// dropped, rows are padded to the header width, and the other block's
    /// tags are merged in.
    pub fn join_with(&mut self, other: &Self) {
        self.header = self.header.merge_values(&other.header);
        if self.header == other.header {
            self.body.extend(other.body.iter().cloned());
        } else {
            for row in &other.body {
                let mut merged = TableRow::sized(self.header.len());
                for (index, name) in other.header.values().enumerate() {
                    if name.trim().is_empty() {
                        continue;
                    }
                    if let Some(target) = self.column_index(name) {
                        merged.set_value(target, row.value(index).unwrap_or(""));
                    }
                }
                self.body.push(merged);
            }
        }
        self.dedup_rows();
        self.adjust_table_size();
        self.add_tags(other.tags.iter().cloned());
    }

    /// Join an ordered list of blocks into one, left to right.
    #[must_use]
    pub fn join(blocks: &[Self]) -> Self {
        let mut iter = blocks.iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        let mut joined = first.clone();
        for block in iter {
            joined.join_with(block);
        }
        joined
    }

    /// Whether both blocks carry exactly the same tag names, in any order.
    #[must_use]
    pub fn has_same_scope_with(&self, other: &Self) -> bool {
        self.tags.set_eq(&other.tags)
    }

    /// Pad every body row with empty cells to the header width.
    pub fn adjust_table_size(&mut self) {
        let width = self.header.len();
        for row in &mut self.body {
            row.adjust_size(width);
        }
    }
}

fn push_pair(values: &mut Vec<(String, String)>, name: String, value: String) {
    if let Some(entry) = values.iter_mut().find(|(seen, _)| *seen == name) {
        entry.1 = value;
        return;
    }
    values.push((name, value));
}

impl HasTags for Examples {
    fn tags(&self) -> &Tags {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut Tags {
        &mut self.tags
    }
}

impl fmt::Display for Examples {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.tags.is_empty() {
            writeln!(f, "{}", self.tags)?;
        }
        write!(f, "{}: {}", self.keyword, self.name)?;
        if let Some(description) = self
            .description
            .as_deref()
            .filter(|text| !text.trim().is_empty())
        {
            write!(f, "\n{}", super::indent(description))?;
        }
        let mut rows = Vec::with_capacity(self.body.len() + 1);
        rows.push(self.header.clone());
        rows.extend(self.body.iter().cloned());
        let widths = table::column_widths(&rows);
        for row in &rows {
            write!(f, "\n  {}", row.render(&widths, "|"))?;
        }
        Ok(())
    }
}
