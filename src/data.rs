use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::model::{CellValue, Column, ColumnType, QueryResult, Row};
use crate::normalize::parse_timestamp;

impl QueryResult {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Create a QueryResult from a JSON array of objects. Column order is
    /// taken from the first object's keys; types are inferred from the first
    /// non-null value seen per column.
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        if array.is_empty() {
            return Err(anyhow!("Input data array is empty"));
        }

        let first_obj = array[0]
            .as_object()
            .ok_or_else(|| anyhow!("Items in array must be objects"))?;

        let names: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            let mut row = Vec::with_capacity(names.len());
            for name in &names {
                let cell = match obj.get(name) {
                    Some(Value::String(s)) => CellValue::String(s.clone()),
                    Some(Value::Number(n)) => CellValue::Number(
                        n.as_f64()
                            .ok_or_else(|| anyhow!("Non-finite number in field '{}'", name))?,
                    ),
                    Some(Value::Bool(b)) => CellValue::Bool(*b),
                    Some(Value::Null) | None => CellValue::Null,
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", name)),
                };
                row.push(cell);
            }
            rows.push(row);
        }

        let columns = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Column::new(name, infer_column_type(&rows, i)))
            .collect();

        Ok(Self { columns, rows })
    }
}

/// Infer a column's declared type from its first non-null cell. String cells
/// that parse as timestamps type the column as datetime.
fn infer_column_type(rows: &[Row], index: usize) -> ColumnType {
    for row in rows {
        match row.get(index) {
            Some(CellValue::Number(_)) => return ColumnType::Real,
            Some(CellValue::Bool(_)) => return ColumnType::Bool,
            Some(CellValue::Timestamp(_)) => return ColumnType::DateTime,
            Some(CellValue::String(s)) => {
                if parse_timestamp(s).is_ok() {
                    return ColumnType::DateTime;
                }
                return ColumnType::String;
            }
            Some(CellValue::Null) | None => continue,
        }
    }
    ColumnType::String
}
