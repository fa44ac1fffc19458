use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TransformError;

// =============================================================================
// Input side: columns, cells, rows
// =============================================================================

/// Declared type of a query result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Bool,
    DateTime,
    Decimal,
    Dynamic,
    Guid,
    Int,
    Long,
    Real,
    String,
    TimeSpan,
}

impl ColumnType {
    /// Types whose cells are consumed as numeric measure values.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Long | Self::Real | Self::Decimal)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::DateTime)
    }
}

/// A column descriptor supplied by the query layer.
/// Identifies a position in every row tuple by order against the column list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// A single cell value. Rows are heterogeneous, so this is a small closed
/// union rather than a generic "any" value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Timestamp(DateTime<Utc>),
}

impl fmt::Display for CellValue {
    /// The string form used as grouping identity for category/split keys.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
            Self::Timestamp(ts) => {
                write!(f, "{}", ts.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
        }
    }
}

/// One result row: cells positionally aligned to the column list.
pub type Row = Vec<CellValue>;

static NULL_CELL: CellValue = CellValue::Null;

/// Positional cell access; a short row reads as null past its end.
pub fn cell_at(row: &Row, index: usize) -> &CellValue {
    row.get(index).unwrap_or(&NULL_CELL)
}

/// A fully materialized query result. Row order is semantically significant
/// (it defines first-appearance ordering) and is never re-sorted.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

// =============================================================================
// Configuration side: axis selection and chart kinds
// =============================================================================

/// Which columns feed the chart: one x-axis, one or more measures, and an
/// optional chain of split-by dimensions. Every referenced column must appear
/// in the query result's column list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisSelection {
    pub x_axis: Column,
    pub y_axes: Vec<Column>,
    #[serde(default)]
    pub split_by: Vec<Column>,
    /// Signed offset in minutes added to datetime axis values.
    #[serde(default)]
    pub utc_offset: i64,
}

/// The target visualization kind. Only the pie-like kinds change the
/// processing mode; everything else shares the flat axis-and-series shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Line,
    Scatter,
    Area,
    StackedArea,
    PercentageArea,
    Column,
    StackedColumn,
    PercentageColumn,
    Bar,
    StackedBar,
    PercentageBar,
    Pie,
    Donut,
}

/// The two processing modes a chart kind maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFamily {
    /// Categorical axis with one or more measures, optionally one split.
    Flat,
    /// Proportional charts: recursive group-and-sum over axis + split chain.
    Hierarchical,
}

impl ChartKind {
    pub fn family(&self) -> ChartFamily {
        match self {
            Self::Pie | Self::Donut => ChartFamily::Hierarchical,
            _ => ChartFamily::Flat,
        }
    }
}

impl FromStr for ChartKind {
    type Err = TransformError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "line" => Ok(Self::Line),
            "scatter" => Ok(Self::Scatter),
            "area" => Ok(Self::Area),
            "stacked-area" => Ok(Self::StackedArea),
            "percentage-area" => Ok(Self::PercentageArea),
            "column" => Ok(Self::Column),
            "stacked-column" => Ok(Self::StackedColumn),
            "percentage-column" => Ok(Self::PercentageColumn),
            "bar" => Ok(Self::Bar),
            "stacked-bar" => Ok(Self::StackedBar),
            "percentage-bar" => Ok(Self::PercentageBar),
            "pie" => Ok(Self::Pie),
            "donut" => Ok(Self::Donut),
            other => Err(TransformError::UnsupportedChartType(other.to_string())),
        }
    }
}

// =============================================================================
// Output side: series and data points
// =============================================================================

/// One point in a series. The variant depends on the processing mode:
/// flat non-temporal points are bare values (or null for an absent
/// category/series combination), temporal points carry their own x value,
/// hierarchical points carry their own label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataPoint {
    Scalar(Option<f64>),
    Point([f64; 2]),
    Slice { name: String, y: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub data: Vec<DataPoint>,
}

/// The normalized output consumed by a rendering adapter. `categories` is
/// present only for flat non-temporal output, where it is index-aligned with
/// every series' data; otherwise points are self-describing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoriesAndSeries {
    pub series: Vec<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

impl CategoriesAndSeries {
    pub fn empty() -> Self {
        Self {
            series: Vec::new(),
            categories: None,
        }
    }
}
