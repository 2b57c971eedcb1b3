//! Row source over the result of a DuckDB query.
use crate::database::source::{RowSource, ScanError};
use crate::value::Value;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate};
use duckdb::arrow::datatypes::DataType;
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::{Connection, Params};
use std::collections::VecDeque;

/// Materialises a DuckDB query and serves its records one by one.
///
/// Decimals are handed over as text under a `DECIMAL` origin type, the way
/// text-protocol drivers deliver them, so rows parse them back to `f64`.
pub struct DuckDbSource {
    names: Vec<String>,
    origin_types: Vec<String>,
    records: VecDeque<Vec<Option<Value>>>,
    current: Option<Vec<Option<Value>>>,
}

impl DuckDbSource {
    /// Runs `sql` and collects its result.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement cannot be prepared or executed, or if
    /// a value cannot be read.
    pub fn query<P: Params>(connection: &Connection, sql: &str, params: P) -> Result<Self> {
        let mut statement = connection
            .prepare(sql)
            .with_context(|| format!("Failed to prepare '{sql}'"))?;
        let mut rows = statement.query(params).context("Failed to execute query")?;

        let executed = rows.as_ref().ok_or_else(|| anyhow!("Query has no result set"))?;
        let names = executed.column_names();
        let origin_types = (0..executed.column_count())
            .map(|index| origin_label(&executed.column_type(index)))
            .collect::<Vec<_>>();

        let mut records = VecDeque::new();
        while let Some(row) = rows.next().context("Failed to fetch row")? {
            let record = (0..names.len())
                .map(|index| row.get::<_, DuckValue>(index).map(convert))
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to read row")?;
            records.push_back(record);
        }

        Ok(Self {
            names,
            origin_types,
            records,
            current: None,
        })
    }
}

/// Origin type label of an Arrow column type.
fn origin_label(data_type: &DataType) -> String {
    match data_type {
        DataType::Decimal128(_, _) | DataType::Decimal256(_, _) => "DECIMAL".to_owned(),
        DataType::Binary | DataType::LargeBinary | DataType::FixedSizeBinary(_) => "BLOB".to_owned(),
        other => format!("{other:?}").to_ascii_uppercase(),
    }
}

fn timestamp(unit: TimeUnit, value: i64) -> Option<Value> {
    let datetime = match unit {
        TimeUnit::Second => DateTime::from_timestamp(value, 0),
        TimeUnit::Millisecond => DateTime::from_timestamp_millis(value),
        TimeUnit::Microsecond => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(value)),
    };
    datetime.map(|datetime| Value::Timestamp(datetime.fixed_offset()))
}

fn convert(value: DuckValue) -> Option<Value> {
    match value {
        DuckValue::Null => None,
        DuckValue::Boolean(value) => Some(Value::Bool(value)),
        DuckValue::TinyInt(value) => Some(Value::I8(value)),
        DuckValue::SmallInt(value) => Some(Value::I16(value)),
        DuckValue::Int(value) => Some(Value::I32(value)),
        DuckValue::BigInt(value) => Some(Value::I64(value)),
        DuckValue::UTinyInt(value) => Some(Value::U8(value)),
        DuckValue::USmallInt(value) => Some(Value::U16(value)),
        DuckValue::UInt(value) => Some(Value::U32(value)),
        DuckValue::UBigInt(value) => Some(Value::U64(value)),
        DuckValue::Float(value) => Some(Value::F32(value)),
        DuckValue::Double(value) => Some(Value::F64(value)),
        DuckValue::HugeInt(value) => Some(Value::String(value.to_string())),
        DuckValue::Decimal(value) => Some(Value::String(value.to_string())),
        DuckValue::Text(value) | DuckValue::Enum(value) => Some(Value::String(value)),
        DuckValue::Blob(value) => Some(Value::Bytes(value)),
        DuckValue::Timestamp(unit, value) => timestamp(unit, value),
        DuckValue::Date32(days) => NaiveDate::default()
            .checked_add_signed(chrono::Duration::days(days as i64))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|datetime| Value::Timestamp(datetime.and_utc().fixed_offset())),
        other => Some(Value::String(format!("{other:?}"))),
    }
}

impl RowSource for DuckDbSource {
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
            .ok_or_else(|| anyhow!("scan called before advance"))?;
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::row::Row;

    #[test]
    fn reads_query_through_row() {
        let connection = Connection::open_in_memory().unwrap();
        let source = DuckDbSource::query(
            &connection,
            "SELECT * FROM (VALUES (1, 3.14::DECIMAL(5,2)), (2, NULL)) AS t(x, y)",
            [],
        )
        .unwrap();
        let mut row = Row::from_source(source);

        assert!(row.advance());
        assert_eq!(row.get::<i32>("x").unwrap(), 1);
        assert_eq!(row.value_float64("Y").unwrap(), 3.14);

        assert!(row.advance());
        assert_eq!(row.value("y"), None);
        assert!(!row.advance());
    }
}
