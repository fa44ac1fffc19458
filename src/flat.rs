use indexmap::IndexMap;

use crate::error::TransformError;
use crate::index::AxisIndexes;
use crate::model::{cell_at, CategoriesAndSeries, CellValue, Column, DataPoint, Row, Series};
use crate::normalize::{group_key, measure_value, temporal_value};

/// Build the non-hierarchical `{categories, series}` result for standard
/// (line/bar/area-like) chart kinds, honoring at most one split-by column.
pub fn flat_series(
    rows: &[Row],
    columns: &[Column],
    idx: &AxisIndexes,
    utc_offset: i64,
    is_temporal_axis: bool,
) -> Result<CategoriesAndSeries, TransformError> {
    match idx.split_by.first() {
        Some(&split_idx) => {
            // Only the first declared measure is honored with a split-by.
            let Some(&y_idx) = idx.y_axes.first() else {
                return Ok(CategoriesAndSeries::empty());
            };
            if is_temporal_axis {
                split_by_temporal(rows, idx.x_axis, y_idx, split_idx, utc_offset)
            } else {
                split_by_categorical(rows, idx.x_axis, y_idx, split_idx)
            }
        }
        None => {
            if is_temporal_axis {
                standard_temporal(rows, columns, idx, utc_offset)
            } else {
                standard_categorical(rows, columns, idx)
            }
        }
    }
}

/// No split-by, categorical axis: one series per measure, index-aligned to
/// the de-duplicated category list. A repeated axis value overwrites the
/// previously stored measure value (last write wins, no summation).
fn standard_categorical(
    rows: &[Row],
    columns: &[Column],
    idx: &AxisIndexes,
) -> Result<CategoriesAndSeries, TransformError> {
    let mut categories: IndexMap<String, usize> = IndexMap::new();
    let mut data: Vec<Vec<Option<f64>>> = vec![Vec::new(); idx.y_axes.len()];

    for row in rows {
        let key = group_key(cell_at(row, idx.x_axis));
        let slot = match categories.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = categories.len();
                categories.insert(key, slot);
                for measure in &mut data {
                    measure.push(None);
                }
                slot
            }
        };
        for (series_idx, &y_idx) in idx.y_axes.iter().enumerate() {
            data[series_idx][slot] = measure_value(cell_at(row, y_idx));
        }
    }

    let series = idx
        .y_axes
        .iter()
        .zip(data)
        .map(|(&y_idx, values)| Series {
            name: columns[y_idx].name.clone(),
            data: values.into_iter().map(DataPoint::Scalar).collect(),
        })
        .collect();

    Ok(CategoriesAndSeries {
        series,
        categories: Some(categories.into_keys().collect()),
    })
}

/// No split-by, datetime axis: one `[x, y]` pair per row per measure, in row
/// order. Points carry their own x value, so no shared category list exists.
fn standard_temporal(
    rows: &[Row],
    columns: &[Column],
    idx: &AxisIndexes,
    utc_offset: i64,
) -> Result<CategoriesAndSeries, TransformError> {
    let mut data: Vec<Vec<DataPoint>> = vec![Vec::with_capacity(rows.len()); idx.y_axes.len()];

    for row in rows {
        let x_value = temporal_value(cell_at(row, idx.x_axis), utc_offset)?;
        for (series_idx, &y_idx) in idx.y_axes.iter().enumerate() {
            data[series_idx].push(temporal_point(x_value, cell_at(row, y_idx)));
        }
    }

    let series = idx
        .y_axes
        .iter()
        .zip(data)
        .map(|(&y_idx, points)| Series {
            name: columns[y_idx].name.clone(),
            data: points,
        })
        .collect();

    Ok(CategoriesAndSeries {
        series,
        categories: None,
    })
}

/// Single split-by, categorical axis: one series per distinct split value in
/// first-appearance order, each aligned to the shared category list with
/// `null` holes. The scan is a single pass: discovering a new category pads
/// every existing series, and a new series starts padded to the current
/// category count.
fn split_by_categorical(
    rows: &[Row],
    x_idx: usize,
    y_idx: usize,
    split_idx: usize,
) -> Result<CategoriesAndSeries, TransformError> {
    let mut categories: IndexMap<String, usize> = IndexMap::new();
    let mut series: IndexMap<String, Vec<Option<f64>>> = IndexMap::new();

    for row in rows {
        let category = group_key(cell_at(row, x_idx));
        let slot = match categories.get(&category) {
            Some(&slot) => slot,
            None => {
                let slot = categories.len();
                categories.insert(category, slot);
                for values in series.values_mut() {
                    values.push(None);
                }
                slot
            }
        };

        let split_key = group_key(cell_at(row, split_idx));
        let values = series
            .entry(split_key)
            .or_insert_with(|| vec![None; categories.len()]);
        values[slot] = measure_value(cell_at(row, y_idx));
    }

    let series = series
        .into_iter()
        .map(|(name, values)| Series {
            name,
            data: values.into_iter().map(DataPoint::Scalar).collect(),
        })
        .collect();

    Ok(CategoriesAndSeries {
        series,
        categories: Some(categories.into_keys().collect()),
    })
}

/// Single split-by, datetime axis: one series per distinct split value, whose
/// data is the `[x, y]` pairs of exactly its own rows, in row order.
fn split_by_temporal(
    rows: &[Row],
    x_idx: usize,
    y_idx: usize,
    split_idx: usize,
    utc_offset: i64,
) -> Result<CategoriesAndSeries, TransformError> {
    let mut series: IndexMap<String, Vec<DataPoint>> = IndexMap::new();

    for row in rows {
        let x_value = temporal_value(cell_at(row, x_idx), utc_offset)?;
        let split_key = group_key(cell_at(row, split_idx));
        series
            .entry(split_key)
            .or_default()
            .push(temporal_point(x_value, cell_at(row, y_idx)));
    }

    let series = series
        .into_iter()
        .map(|(name, data)| Series { name, data })
        .collect();

    Ok(CategoriesAndSeries {
        series,
        categories: None,
    })
}

/// A null measure cell still occupies a row slot in temporal output.
fn temporal_point(x_value: f64, measure: &CellValue) -> DataPoint {
    match measure_value(measure) {
        Some(y) => DataPoint::Point([x_value, y]),
        None => DataPoint::Scalar(None),
    }
}
