use thiserror::Error;

/// Errors surfaced by the transformation core. Any of these aborts the whole
/// call; no partial result is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The axis selection references a column that is absent from the query
    /// result's column list.
    #[error("column '{0}' was not found in the query result")]
    ColumnNotFound(String),

    /// A cell used as a datetime axis value could not be parsed as a
    /// timestamp. Axis alignment depends on every row producing a value, so
    /// this is fatal rather than silently coerced.
    #[error("cannot parse '{0}' as a datetime value")]
    InvalidTemporalValue(String),

    /// The chart kind tag is not part of the supported vocabulary.
    #[error("unsupported chart type '{0}'")]
    UnsupportedChartType(String),
}
