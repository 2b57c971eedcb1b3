use crate::database::cell::Cell;
use crate::database::column::{Column, ColumnType};
use crate::database::row::{Key, Row};
use log::debug;

/// Owner of a column layout and the rows stored against it.
#[derive(Clone, Debug, Default)]
pub struct Table {
    /// Table name
    pub(crate) name: String,
    /// Column definitions, unique by name ignoring case
    pub(crate) columns: Vec<Column>,
    /// Stored rows; every row has one cell per column
    pub(crate) rows: Vec<Row>,
}

impl Table {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Mutable access to a stored row, for filling in values in place.
    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of the column named `name`, ignoring case.
    pub fn column_ordinal(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.same_name(name))
    }

    pub fn column<'k>(&self, key: impl Into<Key<'k>>) -> Option<&Column> {
        match key.into() {
            Key::Ordinal(ordinal) => self.columns.get(ordinal),
            Key::Name(name) => self.column_ordinal(name).and_then(|ordinal| self.columns.get(ordinal)),
            Key::Invalid => None,
        }
    }

    /// Adds a column unless one with the same name (ignoring case) exists.
    ///
    /// Every stored row gains an absent cell for the new column. Returns
    /// whether the column was added.
    pub fn add_column(&mut self, name: &str, kind: ColumnType, length: usize, origin_type: Option<&str>) -> bool {
        let column = Column {
            name: name.to_owned(),
            kind,
            length,
            origin_type: origin_type.map(str::to_owned),
        };
        self.push_column(column)
    }

    /// Adds every column whose name is not taken yet, in order. Returns how many were added.
    pub fn add_columns<I>(&mut self, columns: I) -> usize
    where
        I: IntoIterator<Item = Column>,
    {
        let mut added = 0;
        for column in columns {
            if self.push_column(column) {
                added += 1;
            }
        }
        added
    }

    fn push_column(&mut self, column: Column) -> bool {
        if self.column_ordinal(&column.name).is_some() {
            debug!("Table '{}' already has column '{}', skipped", self.name, column.name);
            return false;
        }
        let column_index = self.columns.len();
        for (row_index, row) in self.rows.iter_mut().enumerate() {
            let mut cell = Cell::new(&column.name, column_index, column.origin_type.as_deref());
            cell.row_index = row_index;
            row.push_cell(cell);
        }
        self.columns.push(column);
        true
    }

    /// Template cells for the current layout, all absent.
    fn template(&self) -> Vec<Cell> {
        self.columns
            .iter()
            .enumerate()
            .map(|(column_index, column)| Cell::new(&column.name, column_index, column.origin_type.as_deref()))
            .collect()
    }

    /// Creates a detached row with one absent cell per column.
    pub fn new_row(&self) -> Row {
        Row::with_cells(self.template())
    }

    /// Stores an independent copy of `row` at the end of the table.
    ///
    /// Cells are restamped with their final positions; a row with fewer cells
    /// than columns is padded with absent cells, extra cells are dropped.
    pub fn add_row(&mut self, row: &Row) {
        let mut stored = row.clone();
        stored.conform(&self.template());
        stored.stamp(self.rows.len());
        self.rows.push(stored);
    }

    /// Stores copies of `rows` in order, as repeated [`Table::add_row`] calls would.
    pub fn add_rows<'r, I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = &'r Row>,
    {
        let start = self.rows.len();
        self.rows.extend(rows.into_iter().cloned());
        let template = self.template();
        for (row_index, row) in self.rows.iter_mut().enumerate().skip(start) {
            row.conform(&template);
            row.stamp(row_index);
        }
    }
}
