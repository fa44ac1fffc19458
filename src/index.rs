use crate::error::TransformError;
use crate::model::{AxisSelection, Column};

/// Positional indices of the selected columns within a row tuple, resolved
/// once so the row scan works on plain integers.
#[derive(Debug, Clone)]
pub struct AxisIndexes {
    pub x_axis: usize,
    pub y_axes: Vec<usize>,
    pub split_by: Vec<usize>,
}

/// Resolve every selected column to its position in the column list.
pub fn resolve_indexes(
    columns: &[Column],
    selection: &AxisSelection,
) -> Result<AxisIndexes, TransformError> {
    let x_axis = find_column_index(columns, &selection.x_axis)?;

    let mut y_axes = Vec::with_capacity(selection.y_axes.len());
    for column in &selection.y_axes {
        y_axes.push(find_column_index(columns, column)?);
    }

    let mut split_by = Vec::with_capacity(selection.split_by.len());
    for column in &selection.split_by {
        split_by.push(find_column_index(columns, column)?);
    }

    Ok(AxisIndexes {
        x_axis,
        y_axes,
        split_by,
    })
}

/// Match by full identity (name and type) first, falling back to name only.
fn find_column_index(columns: &[Column], wanted: &Column) -> Result<usize, TransformError> {
    columns
        .iter()
        .position(|c| c == wanted)
        .or_else(|| columns.iter().position(|c| c.name == wanted.name))
        .ok_or_else(|| TransformError::ColumnNotFound(wanted.name.clone()))
}

/// Look up a column descriptor by name, for callers building a selection
/// from plain column names.
pub fn column_by_name(columns: &[Column], name: &str) -> Result<Column, TransformError> {
    columns
        .iter()
        .find(|c| c.name == name)
        .cloned()
        .ok_or_else(|| TransformError::ColumnNotFound(name.to_string()))
}
