// Library exports for querychart

pub mod csv_reader;
pub mod data;
pub mod error;
pub mod flat;
pub mod hierarchy;
pub mod index;
pub mod model;
pub mod normalize;
pub mod transform;

pub use error::TransformError;
pub use model::{
    AxisSelection, CategoriesAndSeries, CellValue, ChartFamily, ChartKind, Column, ColumnType,
    DataPoint, QueryResult, Row, Series,
};
pub use transform::{transform, transform_result};
