use crate::value::Value;
use std::collections::VecDeque;
use thiserror::Error;

/// Errors reported by a row source while fetching or scanning a record.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Row source failed: {0}")]
    Driver(#[from] anyhow::Error),

    #[error("Expected {expected} scan slots, got {actual}")]
    SlotCount { expected: usize, actual: usize },
}

/// A sequential source of records, such as a database cursor.
///
/// A row bound to a source pulls one record per [`RowSource::advance`] and
/// copies it out with [`RowSource::scan`]. Sources must be `Send + Sync` so
/// that rows, and the tables storing them, can be shared across threads.
pub trait RowSource: Send + Sync {
    /// Moves to the next record. Returns false when there are no more records.
    fn advance(&mut self) -> Result<bool, ScanError>;

    /// Column names of every record.
    fn column_names(&self) -> Vec<String>;

    /// Source-side type label of every column, in column order.
    fn column_origin_types(&self) -> Vec<String>;

    /// Copies the current record's raw values into `slots`, one per column.
    fn scan(&mut self, slots: &mut [Option<Value>]) -> Result<(), ScanError>;

    /// Releases the underlying resources. Called once when the row is closed.
    fn release(&mut self) {}
}

/// A row source over records held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    names: Vec<String>,
    origin_types: Vec<String>,
    records: VecDeque<Vec<Option<Value>>>,
    current: Option<Vec<Option<Value>>>,
    released: bool,
}

impl MemorySource {
    /// Creates a source with `(name, origin type)` columns and no records.
    pub fn new(columns: &[(&str, &str)]) -> Self {
        Self {
            names: columns.iter().map(|(name, _)| name.to_string()).collect(),
            origin_types: columns.iter().map(|(_, kind)| kind.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Appends a record; it is served after every record pushed before it.
    pub fn push(&mut self, record: Vec<Option<Value>>) -> &mut Self {
        self.records.push_back(record);
        self
    }

    pub fn with_record(mut self, record: Vec<Option<Value>>) -> Self {
        self.push(record);
        self
    }

    /// Number of records not yet served.
    pub fn remaining(&self) -> usize {
        self.records.len()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl RowSource for MemorySource {
    fn advance(&mut self) -> Result<bool, ScanError> {
        self.current = self.records.pop_front();
        Ok(self.current.is_some())
    }

    fn column_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn column_origin_types(&self) -> Vec<String> {
        self.origin_types.clone()
    }

    fn scan(&mut self, slots: &mut [Option<Value>]) -> Result<(), ScanError> {
        let record = self
            .current
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("scan called before advance"))?;
        if record.len() != slots.len() {
            return Err(ScanError::SlotCount {
                expected: record.len(),
                actual: slots.len(),
            });
        }
        slots.clone_from_slice(record);
        Ok(())
    }

    fn release(&mut self) {
        self.records.clear();
        self.current = None;
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_serves_records_in_order() {
        let mut source = MemorySource::new(&[("X", "INT")])
            .with_record(vec![Some(Value::I64(1))])
            .with_record(vec![None]);
        let mut slots = vec![None];

        assert!(source.advance().unwrap());
        source.scan(&mut slots).unwrap();
        assert_eq!(slots, vec![Some(Value::I64(1))]);

        assert!(source.advance().unwrap());
        source.scan(&mut slots).unwrap();
        assert_eq!(slots, vec![None]);

        assert!(!source.advance().unwrap());
        assert!(source.scan(&mut slots).is_err());
    }

    #[test]
    fn memory_source_checks_slot_count() {
        let mut source = MemorySource::new(&[("X", "INT"), ("Y", "INT")])
            .with_record(vec![Some(Value::I64(1)), None]);
        source.advance().unwrap();
        let mut slots = vec![None];
        assert!(matches!(
            source.scan(&mut slots),
            Err(ScanError::SlotCount { expected: 2, actual: 1 })
        ));
    }
}
