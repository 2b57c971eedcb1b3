//! Rows, cell lookup and pull iteration over a [`RowSource`].
use crate::database::cell::Cell;
use crate::database::column::{fold_name, same_name};
use crate::database::origin::OriginType;
use crate::database::source::RowSource;
use crate::error::{DataTableError, Result};
use crate::value::format::{parse_decimal, to_bool};
use crate::value::{coerce, CoercionError, CoercionMode, Slot, Timestamp, Value};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt::{Debug, Display};

/// Addresses a cell by ordinal or by case-insensitive column name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key<'a> {
    Ordinal(usize),
    Name(&'a str),
    /// A key that can never resolve, e.g. a negative ordinal.
    Invalid,
}

impl From<usize> for Key<'_> {
    fn from(value: usize) -> Self {
        Key::Ordinal(value)
    }
}

impl From<i32> for Key<'_> {
    fn from(value: i32) -> Self {
        usize::try_from(value).map(Key::Ordinal).unwrap_or(Key::Invalid)
    }
}

impl From<i64> for Key<'_> {
    fn from(value: i64) -> Self {
        usize::try_from(value).map(Key::Ordinal).unwrap_or(Key::Invalid)
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(value: &'a str) -> Self {
        Key::Name(value)
    }
}

impl<'a> From<&'a String> for Key<'a> {
    fn from(value: &'a String) -> Self {
        Key::Name(value)
    }
}

impl Display for Key<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Ordinal(ordinal) => write!(f, "#{ordinal}"),
            Key::Name(name) => f.write_str(name),
            Key::Invalid => f.write_str("<invalid>"),
        }
    }
}

/// An ordered collection of cells matching a table's column layout.
///
/// A row may also be bound to a [`RowSource`]; it then acts as a single-use
/// cursor whose cells are overwritten in place by every [`Row::advance`].
#[derive(Default)]
pub struct Row {
    cells: Vec<Cell>,
    /// Lowercase column name to cell position
    index: HashMap<String, usize>,
    source: Option<Box<dyn RowSource>>,
    /// Whether the cell layout was built from the bound source
    initialized: bool,
    /// Raw values of the current source record
    staging: Vec<Option<Value>>,
}

impl Clone for Row {
    /// Copies the cells only; the clone is never bound to a source.
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
            index: self.index.clone(),
            ..Self::default()
        }
    }
}

impl Debug for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Row")
            .field("cells", &self.cells)
            .field("bound", &self.source.is_some())
            .finish()
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Row {
    /// Creates an empty, unbound row.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_cells(cells: Vec<Cell>) -> Self {
        let mut row = Self {
            cells,
            ..Self::default()
        };
        row.rebuild_index();
        row
    }

    /// Creates a row bound to `source`. Its cells appear on the first successful advance.
    pub fn from_source<S: RowSource + 'static>(source: S) -> Self {
        let mut row = Self::new();
        row.bind(source);
        row
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, ordinal: usize) -> Option<&Cell> {
        self.cells.get(ordinal)
    }

    pub fn cell_mut(&mut self, ordinal: usize) -> Option<&mut Cell> {
        self.cells.get_mut(ordinal)
    }

    // Name index

    /// Rebuilds the name index from the current cells. The first cell wins on duplicate names.
    pub fn rebuild_index(&mut self) {
        self.index.clear();
        for (position, cell) in self.cells.iter().enumerate() {
            self.index.entry(fold_name(&cell.column_name)).or_insert(position);
        }
    }

    /// Finds the position of a column name without touching the index.
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.index
            .get(&fold_name(name))
            .copied()
            .filter(|&position| {
                self.cells
                    .get(position)
                    .is_some_and(|cell| same_name(&cell.column_name, name))
            })
            .or_else(|| self.scan_name(name))
    }

    /// Finds the position of a column name, caching a hit of the linear scan.
    pub fn resolve(&mut self, name: &str) -> Option<usize> {
        let position = self.ordinal(name)?;
        self.index.insert(fold_name(name), position);
        Some(position)
    }

    fn scan_name(&self, name: &str) -> Option<usize> {
        self.cells
            .iter()
            .position(|cell| same_name(&cell.column_name, name))
    }

    fn position(&self, key: Key) -> Option<usize> {
        match key {
            Key::Ordinal(ordinal) if ordinal < self.cells.len() => Some(ordinal),
            Key::Ordinal(_) | Key::Invalid => None,
            Key::Name(name) => self.ordinal(name),
        }
    }

    // Population

    /// Stores a value into the addressed cell. Returns false if no cell matches.
    pub fn set<'k, V: Into<Value>>(&mut self, key: impl Into<Key<'k>>, value: V) -> bool {
        self.put(key.into(), Some(value.into()))
    }

    /// Makes the addressed cell absent. Returns false if no cell matches.
    pub fn clear<'k>(&mut self, key: impl Into<Key<'k>>) -> bool {
        self.put(key.into(), None)
    }

    fn put(&mut self, key: Key, value: Option<Value>) -> bool {
        match self.position(key) {
            Some(position) => {
                self.cells[position].value = value;
                true
            }
            None => {
                debug!("No cell matches '{}', value dropped", key);
                false
            }
        }
    }

    pub(crate) fn push_cell(&mut self, cell: Cell) {
        self.index
            .entry(fold_name(&cell.column_name))
            .or_insert(self.cells.len());
        self.cells.push(cell);
    }

    /// Restamps positions for a row stored at `row_index`.
    pub(crate) fn stamp(&mut self, row_index: usize) {
        for (column_index, cell) in self.cells.iter_mut().enumerate() {
            cell.row_index = row_index;
            cell.column_index = column_index;
        }
    }

    /// Pads with or drops cells so that the row has exactly `cells.len()` cells.
    pub(crate) fn conform(&mut self, cells: &[Cell]) {
        if self.cells.len() > cells.len() {
            self.cells.truncate(cells.len());
            self.rebuild_index();
        }
        for cell in &cells[self.cells.len()..] {
            self.push_cell(cell.clone());
        }
    }

    // Read side

    /// Value of the cell at `ordinal`, `None` when out of range or absent.
    pub fn value_by_ordinal(&self, ordinal: usize) -> Option<Value> {
        self.cells.get(ordinal).and_then(Cell::display_value)
    }

    /// Value of the cell named `name` ignoring case, `None` when missing or absent.
    pub fn value_by_name(&self, name: &str) -> Option<Value> {
        self.ordinal(name).and_then(|position| self.value_by_ordinal(position))
    }

    /// Value of the cell addressed by ordinal or by name.
    pub fn value<'k>(&self, key: impl Into<Key<'k>>) -> Option<Value> {
        match key.into() {
            Key::Ordinal(ordinal) => self.value_by_ordinal(ordinal),
            Key::Name(name) => self.value_by_name(name),
            Key::Invalid => None,
        }
    }

    /// Typed value, `None` when missing or absent.
    ///
    /// # Errors
    ///
    /// Returns [`DataTableError::TypeMismatch`] if the stored kind is not `T`'s kind.
    pub fn get_opt<'k, T: Slot>(&self, key: impl Into<Key<'k>>) -> Result<Option<T>> {
        let key = key.into();
        let Some(value) = self.value(key) else {
            return Ok(None);
        };
        let actual = value.kind();
        T::from_value(value)
            .map(Some)
            .ok_or_else(|| DataTableError::TypeMismatch {
                key: key.to_string(),
                expected: T::KIND,
                actual,
            })
    }

    /// Typed value, the zero value when missing or absent.
    ///
    /// # Errors
    ///
    /// Returns [`DataTableError::TypeMismatch`] if the stored kind is not `T`'s kind.
    pub fn get<'k, T: Slot>(&self, key: impl Into<Key<'k>>) -> Result<T> {
        Ok(self.get_opt(key)?.unwrap_or_else(T::zero))
    }

    pub fn value_string<'k>(&self, key: impl Into<Key<'k>>) -> Result<String> {
        self.get(key)
    }

    pub fn value_string_opt<'k>(&self, key: impl Into<Key<'k>>) -> Result<Option<String>> {
        self.get_opt(key)
    }

    pub fn value_int<'k>(&self, key: impl Into<Key<'k>>) -> Result<i64> {
        self.get(key)
    }

    pub fn value_int_opt<'k>(&self, key: impl Into<Key<'k>>) -> Result<Option<i64>> {
        self.get_opt(key)
    }

    pub fn value_float64<'k>(&self, key: impl Into<Key<'k>>) -> Result<f64> {
        self.get(key)
    }

    pub fn value_float64_opt<'k>(&self, key: impl Into<Key<'k>>) -> Result<Option<f64>> {
        self.get_opt(key)
    }

    pub fn value_time<'k>(&self, key: impl Into<Key<'k>>) -> Result<Timestamp> {
        self.get(key)
    }

    pub fn value_time_opt<'k>(&self, key: impl Into<Key<'k>>) -> Result<Option<Timestamp>> {
        self.get_opt(key)
    }

    pub fn value_byte<'k>(&self, key: impl Into<Key<'k>>) -> Result<u8> {
        self.get(key)
    }

    pub fn value_byte_opt<'k>(&self, key: impl Into<Key<'k>>) -> Result<Option<u8>> {
        self.get_opt(key)
    }

    pub fn value_bytes<'k>(&self, key: impl Into<Key<'k>>) -> Result<Vec<u8>> {
        self.get(key)
    }

    pub fn value_bytes_opt<'k>(&self, key: impl Into<Key<'k>>) -> Result<Option<Vec<u8>>> {
        self.get_opt(key)
    }

    /// Reads any stored kind as a flag: `true`, `on`, `yes`, `1` and `-1`
    /// (ignoring case) and numbers of magnitude at least one are true.
    pub fn value_bool<'k>(&self, key: impl Into<Key<'k>>) -> bool {
        self.value_bool_opt(key).unwrap_or(false)
    }

    pub fn value_bool_opt<'k>(&self, key: impl Into<Key<'k>>) -> Option<bool> {
        self.value(key).map(|value| to_bool(&value))
    }

    // Write side

    fn convert<T: Slot>(&self, key: Key, mode: CoercionMode) -> Result<Option<Value>, CoercionError> {
        let position = self
            .position(key)
            .ok_or_else(|| CoercionError::LookupMiss(key.to_string()))?;
        match self.cells[position].display_value() {
            Some(value) => coerce(&value, T::KIND, mode).map(Some),
            None => Ok(None),
        }
    }

    /// Converts the addressed value into `destination`'s kind and stores it.
    ///
    /// Absent values store the zero value (`None` for `Option` slots). Parse
    /// failures store the zero value. Missing cells and unsupported conversions
    /// leave `destination` untouched and return false.
    pub fn set_value<'k, T: Slot>(&self, destination: &mut T, key: impl Into<Key<'k>>) -> bool {
        let key = key.into();
        match self.convert::<T>(key, CoercionMode::Lenient) {
            Ok(value) => {
                destination.assign(value);
                true
            }
            Err(error @ CoercionError::LookupMiss(_)) => {
                debug!("{}", error);
                false
            }
            Err(error) => {
                warn!("Set value from column '{}' failed: {}", key, error);
                false
            }
        }
    }

    /// [`Row::set_value`] addressing the cell by ordinal.
    pub fn set_value_by_ord<T: Slot>(&self, destination: &mut T, ordinal: usize) -> bool {
        self.set_value(destination, Key::Ordinal(ordinal))
    }

    /// Strict form of [`Row::set_value`]: every failure is returned and
    /// `destination` is only written on success.
    ///
    /// # Errors
    ///
    /// Returns a [`CoercionError`] on a missing cell, an unsupported
    /// conversion, a parse failure or a numeric overflow.
    pub fn try_set_value<'k, T: Slot>(
        &self,
        destination: &mut T,
        key: impl Into<Key<'k>>,
    ) -> Result<(), CoercionError> {
        let value = self.convert::<T>(key.into(), CoercionMode::Strict)?;
        destination.assign(value);
        Ok(())
    }

    /// [`Row::try_set_value`] addressing the cell by ordinal.
    pub fn try_set_value_by_ord<T: Slot>(
        &self,
        destination: &mut T,
        ordinal: usize,
    ) -> Result<(), CoercionError> {
        self.try_set_value(destination, Key::Ordinal(ordinal))
    }

    // Pull iteration

    /// Binds the row to `source`, closing any previous binding first.
    pub fn bind<S: RowSource + 'static>(&mut self, source: S) {
        if self.source.is_some() {
            self.close();
        }
        self.source = Some(Box::new(source));
    }

    pub fn is_bound(&self) -> bool {
        self.source.is_some()
    }

    /// Pulls the next record from the bound source into the cells.
    ///
    /// Returns false when the row is unbound, the source is exhausted or the
    /// source fails; the cells keep their previous values in every such case.
    pub fn advance(&mut self) -> bool {
        let Some(mut source) = self.source.take() else {
            return false;
        };
        let advanced = self.pull(source.as_mut());
        self.source = Some(source);
        advanced
    }

    fn pull(&mut self, source: &mut dyn RowSource) -> bool {
        match source.advance() {
            Ok(true) => {}
            Ok(false) => return false,
            Err(error) => {
                warn!("Advance row source failed: {}", error);
                return false;
            }
        }

        if !self.initialized {
            let origin_types = source.column_origin_types();
            self.cells = source
                .column_names()
                .iter()
                .enumerate()
                .map(|(position, name)| Cell::new(name, position, origin_types.get(position).map(String::as_str)))
                .collect();
            self.staging = vec![None; self.cells.len()];
            self.rebuild_index();
            self.initialized = true;
            debug!("Row bound to source with {} columns", self.cells.len());
        }

        if let Err(error) = source.scan(&mut self.staging) {
            warn!("Scan row source failed: {}", error);
            return false;
        }
        for (cell, raw) in self.cells.iter_mut().zip(self.staging.iter_mut()) {
            cell.value = match raw.take() {
                Some(raw) if cell.origin == OriginType::Decimal => Some(decimal(raw)),
                raw => raw,
            };
        }
        true
    }

    /// Releases the bound source and resets the row: values are cleared and the
    /// cells removed, so a later [`Row::bind`] starts from a fresh layout.
    pub fn close(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
            debug!("Row source released");
        }
        self.initialized = false;
        self.cells.clear();
        self.index.clear();
        self.staging.clear();
    }
}

/// Reads a raw decimal delivered as text or bytes; other kinds pass through.
fn decimal(raw: Value) -> Value {
    let parsed = match &raw {
        Value::String(text) => parse_decimal(text),
        Value::Bytes(bytes) => parse_decimal(&String::from_utf8_lossy(bytes)),
        _ => return raw,
    };
    parsed.unwrap_or_else(|| {
        warn!("Parse decimal '{}' failed, keeping raw value", raw);
        raw
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::source::{MemorySource, ScanError};

    fn row(values: Vec<(&str, Option<Value>)>) -> Row {
        let cells = values
            .into_iter()
            .enumerate()
            .map(|(position, (name, value))| {
                let mut cell = Cell::new(name, position, None);
                cell.value = value;
                cell
            })
            .collect();
        Row::with_cells(cells)
    }

    fn sample() -> Row {
        row(vec![
            ("ID", Some(Value::I64(7))),
            ("Code", Some(Value::from("B1"))),
            ("Name", None),
            ("Active", Some(Value::from("yes"))),
        ])
    }

    #[test]
    fn lookup_by_ordinal_and_name() {
        let row = sample();
        assert_eq!(row.value_by_ordinal(0), Some(Value::I64(7)));
        assert_eq!(row.value_by_ordinal(4), None);
        assert_eq!(row.value_by_name("code"), Some(Value::from("B1")));
        assert_eq!(row.value_by_name("CODE"), Some(Value::from("B1")));
        assert_eq!(row.value_by_name("missing"), None);
        assert_eq!(row.value("Code"), row.value(1usize));
        assert_eq!(row.value(-1), None);
        assert_eq!(row.value(1), Some(Value::from("B1")));
    }

    #[test]
    fn resolve_caches_scan_hit() {
        let mut row = sample();
        row.index.clear();
        assert_eq!(row.ordinal("name"), Some(2));
        assert!(row.index.is_empty());
        assert_eq!(row.resolve("NAME"), Some(2));
        assert_eq!(row.index.get("name"), Some(&2));
    }

    #[test]
    fn typed_accessors() {
        let row = sample();
        assert_eq!(row.value_int("id").unwrap(), 7);
        assert_eq!(row.value_string("Code").unwrap(), "B1");
        assert_eq!(row.value_string("Name").unwrap(), "");
        assert_eq!(row.value_string_opt("Name").unwrap(), None);
        assert_eq!(row.value_float64("missing").unwrap(), 0.0);
        assert!(row.value_bool("Active"));
        assert_eq!(row.value_bool_opt("Name"), None);
    }

    #[test]
    fn typed_accessor_rejects_other_kind() {
        let row = sample();
        let error = row.value_string("ID").unwrap_err();
        assert!(matches!(
            error,
            DataTableError::TypeMismatch {
                expected: crate::value::ValueKind::String,
                actual: crate::value::ValueKind::I64,
                ..
            }
        ));
        assert!(row.value_float64(0usize).is_err());
    }

    #[test]
    fn set_value_coerces() {
        let row = sample();
        let mut id = String::new();
        assert!(row.set_value(&mut id, "ID"));
        assert_eq!(id, "7");

        let mut code = 99i32;
        assert!(row.set_value(&mut code, "Code"));
        assert_eq!(code, 0);

        let mut active = false;
        assert!(row.set_value_by_ord(&mut active, 3));
        assert!(active);

        let mut name = Some("previous".to_owned());
        assert!(row.set_value(&mut name, "name"));
        assert_eq!(name, None);

        let mut untouched = 5u8;
        assert!(!row.set_value(&mut untouched, "missing"));
        assert_eq!(untouched, 5);
    }

    #[test]
    fn set_value_unsupported_leaves_destination() {
        let row = row(vec![("When", Some(Value::Bool(true)))]);
        let mut timestamp = crate::value::format::zero_timestamp();
        let before = timestamp;
        assert!(!row.set_value(&mut timestamp, "When"));
        assert_eq!(timestamp, before);
    }

    #[test]
    fn try_set_value_reports_failures() {
        let row = sample();
        let mut code = 1i64;
        assert_eq!(
            row.try_set_value(&mut code, "Code"),
            Err(CoercionError::ParseFailure {
                text: "B1".to_owned(),
                to: crate::value::ValueKind::I64
            })
        );
        assert_eq!(code, 1);
        assert_eq!(
            row.try_set_value(&mut code, "nope"),
            Err(CoercionError::LookupMiss("nope".to_owned()))
        );
        let mut small = 0u8;
        let row = self::row(vec![("N", Some(Value::I64(300)))]);
        assert!(matches!(
            row.try_set_value_by_ord(&mut small, 0),
            Err(CoercionError::Overflow { .. })
        ));
    }

    #[test]
    fn set_and_clear() {
        let mut row = sample();
        assert!(row.set("name", "Gamma"));
        assert_eq!(row.value_string("Name").unwrap(), "Gamma");
        assert!(row.clear(0usize));
        assert_eq!(row.value(0usize), None);
        assert!(!row.set("nope", 1i64));
    }

    #[test]
    fn advance_initialises_layout_and_parses_decimals() {
        let source = MemorySource::new(&[("X", "INT"), ("Y", "DECIMAL")])
            .with_record(vec![Some(Value::I64(1)), Some(Value::Bytes(b"3.14".to_vec()))])
            .with_record(vec![Some(Value::I64(2)), None]);
        let mut row = Row::from_source(source);
        assert!(row.is_empty());

        assert!(row.advance());
        assert_eq!(row.len(), 2);
        assert_eq!(row.cell(1).and_then(Cell::origin_type), Some("DECIMAL"));
        assert_eq!(row.cell(1).map(Cell::origin), Some(OriginType::Decimal));
        assert_eq!(row.cell(0).map(Cell::origin), Some(OriginType::Other));
        assert_eq!(row.value_float64("y").unwrap(), 3.14);

        assert!(row.advance());
        assert_eq!(row.value_int("X").unwrap(), 2);
        assert_eq!(row.value("Y"), None);

        assert!(!row.advance());
        assert_eq!(row.value_int("X").unwrap(), 2);
    }

    struct FailingSource;

    impl RowSource for FailingSource {
        fn advance(&mut self) -> Result<bool, ScanError> {
            Err(anyhow::anyhow!("connection reset").into())
        }

        fn column_names(&self) -> Vec<String> {
            vec!["X".to_owned()]
        }

        fn column_origin_types(&self) -> Vec<String> {
            vec!["INT".to_owned()]
        }

        fn scan(&mut self, _slots: &mut [Option<Value>]) -> Result<(), ScanError> {
            Ok(())
        }
    }

    #[test]
    fn advance_reports_source_failure_as_end() {
        let mut row = Row::from_source(FailingSource);
        assert!(!row.advance());
        assert!(row.is_bound());
        assert!(!Row::new().advance());
    }

    /// Advances forever but only scans the first `good` records.
    struct BrokenScanSource {
        good: usize,
        served: usize,
    }

    impl RowSource for BrokenScanSource {
        fn advance(&mut self) -> Result<bool, ScanError> {
            Ok(true)
        }

        fn column_names(&self) -> Vec<String> {
            vec!["X".to_owned()]
        }

        fn column_origin_types(&self) -> Vec<String> {
            vec!["INT".to_owned()]
        }

        fn scan(&mut self, slots: &mut [Option<Value>]) -> Result<(), ScanError> {
            if self.served == self.good {
                return Err(anyhow::anyhow!("malformed record").into());
            }
            slots[0] = Some(Value::I64(self.served as i64));
            self.served += 1;
            Ok(())
        }
    }

    #[test]
    fn scan_failure_on_first_record_ends_iteration() {
        let mut row = Row::from_source(BrokenScanSource { good: 0, served: 0 });
        assert!(!row.advance());
        assert_eq!(row.value("X"), None);
        assert!(row.is_bound());
    }

    #[test]
    fn scan_failure_keeps_previous_record() {
        let mut row = Row::from_source(BrokenScanSource { good: 2, served: 0 });
        assert!(row.advance());
        assert_eq!(row.value_int("X").unwrap(), 0);
        assert!(row.advance());
        assert_eq!(row.value_int("X").unwrap(), 1);

        assert!(!row.advance());
        assert_eq!(row.value_int("X").unwrap(), 1);
        assert!(!row.advance());
        assert_eq!(row.value_by_ordinal(0), Some(Value::I64(1)));
    }

    #[test]
    fn close_resets_for_a_fresh_bind() {
        let source = MemorySource::new(&[("X", "INT")]).with_record(vec![Some(Value::I64(1))]);
        let mut row = Row::from_source(source);
        assert!(row.advance());
        row.close();
        assert!(!row.is_bound());
        assert!(row.is_empty());
        assert_eq!(row.value("X"), None);

        row.bind(MemorySource::new(&[("A", "TEXT"), ("B", "TEXT")]).with_record(vec![
            Some(Value::from("a")),
            Some(Value::from("b")),
        ]));
        assert!(row.advance());
        assert_eq!(row.len(), 2);
        assert_eq!(row.value_string("b").unwrap(), "b");
    }

    #[test]
    fn clone_is_detached() {
        let source = MemorySource::new(&[("X", "INT")]).with_record(vec![Some(Value::I64(1))]);
        let mut row = Row::from_source(source);
        row.advance();
        let copy = row.clone();
        assert!(!copy.is_bound());
        assert_eq!(copy, row);
    }
}
