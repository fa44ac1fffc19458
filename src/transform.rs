use crate::error::TransformError;
use crate::flat::flat_series;
use crate::hierarchy::hierarchical_series;
use crate::index::resolve_indexes;
use crate::model::{
    AxisSelection, CategoriesAndSeries, ChartFamily, ChartKind, Column, QueryResult, Row,
};

/// Main entry point: transform a query result into `{categories, series}`
/// for the requested chart kind.
///
/// Pure and synchronous: the same inputs always produce a structurally
/// identical result, and any error aborts the whole call.
pub fn transform(
    selection: &AxisSelection,
    columns: &[Column],
    rows: &[Row],
    is_temporal_axis: bool,
    chart: ChartKind,
) -> Result<CategoriesAndSeries, TransformError> {
    // 1. Resolve the selection to positional indices once.
    let idx = resolve_indexes(columns, selection)?;

    // 2. Dispatch on the chart's processing family.
    match chart.family() {
        ChartFamily::Flat => {
            flat_series(rows, columns, &idx, selection.utc_offset, is_temporal_axis)
        }
        ChartFamily::Hierarchical => hierarchical_series(rows, columns, &idx),
    }
}

/// Convenience wrapper over [`transform`] that derives the temporal-axis flag
/// from the selected x-axis column's declared type. Hierarchical charts treat
/// every column as a discrete grouping key, so the flag only applies to flat
/// processing.
pub fn transform_result(
    selection: &AxisSelection,
    result: &QueryResult,
    chart: ChartKind,
) -> Result<CategoriesAndSeries, TransformError> {
    let is_temporal_axis =
        selection.x_axis.column_type.is_temporal() && chart.family() == ChartFamily::Flat;
    transform(
        selection,
        &result.columns,
        &result.rows,
        is_temporal_axis,
        chart,
    )
}
