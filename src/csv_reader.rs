use std::io;

use anyhow::{Context, Result};

use crate::model::{CellValue, Column, ColumnType, QueryResult, Row};
use crate::normalize::parse_timestamp;

/// Read a CSV query result from stdin.
pub fn read_query_from_stdin() -> Result<QueryResult> {
    read_query(io::stdin().lock())
}

/// Read a CSV query result: first record is the header, every other record
/// is a data row. Column types are inferred by scanning each column's values.
pub fn read_query<R: io::Read>(reader: R) -> Result<QueryResult> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records: Vec<Vec<String>> = Vec::new();
    for record in csv_reader.records() {
        let record = record.context("Failed to read CSV record")?;
        records.push(record.iter().map(|f| f.to_string()).collect());
    }

    if records.is_empty() {
        anyhow::bail!("CSV input must contain at least one data row");
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .enumerate()
        .map(|(i, name)| Column::new(name, infer_column_type(&records, i)))
        .collect();

    let rows: Vec<Row> = records
        .into_iter()
        .map(|record| {
            columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    typed_cell(record.get(i).map(String::as_str).unwrap_or(""), column)
                })
                .collect()
        })
        .collect();

    Ok(QueryResult::new(columns, rows))
}

/// Infer a column type from its raw string values: all-numeric columns are
/// Long (integers) or Real, all-timestamp columns are DateTime, all-boolean
/// columns are Bool, anything else stays String. Empty fields are nulls and
/// don't vote.
fn infer_column_type(records: &[Vec<String>], index: usize) -> ColumnType {
    let values: Vec<&str> = records
        .iter()
        .filter_map(|r| r.get(index))
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .collect();

    if values.is_empty() {
        return ColumnType::String;
    }
    if values.iter().all(|v| v.parse::<i64>().is_ok()) {
        return ColumnType::Long;
    }
    if values.iter().all(|v| v.parse::<f64>().is_ok()) {
        return ColumnType::Real;
    }
    if values.iter().all(|v| parse_timestamp(v).is_ok()) {
        return ColumnType::DateTime;
    }
    if values.iter().all(|v| v == &"true" || v == &"false") {
        return ColumnType::Bool;
    }
    ColumnType::String
}

/// Convert a raw CSV field into a cell of the column's inferred type. Fields
/// that slip past inference fall back to string cells rather than failing.
fn typed_cell(raw: &str, column: &Column) -> CellValue {
    if raw.is_empty() {
        return CellValue::Null;
    }
    match column.column_type {
        ColumnType::Int | ColumnType::Long | ColumnType::Real | ColumnType::Decimal => raw
            .parse::<f64>()
            .map(CellValue::Number)
            .unwrap_or_else(|_| CellValue::String(raw.to_string())),
        ColumnType::DateTime => parse_timestamp(raw)
            .map(CellValue::Timestamp)
            .unwrap_or_else(|_| CellValue::String(raw.to_string())),
        ColumnType::Bool => match raw {
            "true" => CellValue::Bool(true),
            "false" => CellValue::Bool(false),
            other => CellValue::String(other.to_string()),
        },
        _ => CellValue::String(raw.to_string()),
    }
}
