use chrono::{TimeZone, Utc};
use querychart::{
    csv_reader, transform, transform_result, AxisSelection, CellValue, ChartKind, Column,
    ColumnType, DataPoint, QueryResult, TransformError,
};
use serde_json::json;

fn s(v: &str) -> CellValue {
    CellValue::String(v.to_string())
}

fn n(v: f64) -> CellValue {
    CellValue::Number(v)
}

fn epoch_ms(y: i32, m: u32, d: u32) -> f64 {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
        .unwrap()
        .timestamp_millis() as f64
}

fn country_city_result() -> QueryResult {
    QueryResult::new(
        vec![
            Column::new("country", ColumnType::String),
            Column::new("city", ColumnType::String),
            Column::new("request_count", ColumnType::Int),
        ],
        vec![
            vec![s("Israel"), s("Herzliya"), n(30.0)],
            vec![s("United States"), s("New York"), n(100.0)],
            vec![s("Japan"), s("Tokyo"), n(20.0)],
        ],
    )
}

#[test]
fn test_flat_non_temporal_single_measure() {
    let query = country_city_result();
    let selection = AxisSelection {
        x_axis: query.columns[0].clone(),
        y_axes: vec![query.columns[2].clone()],
        split_by: vec![],
        utc_offset: 0,
    };

    let result = transform_result(&selection, &query, ChartKind::Column).unwrap();

    assert_eq!(
        result.categories,
        Some(vec![
            "Israel".to_string(),
            "United States".to_string(),
            "Japan".to_string()
        ])
    );
    assert_eq!(result.series.len(), 1);
    assert_eq!(result.series[0].name, "request_count");
    assert_eq!(
        result.series[0].data,
        vec![
            DataPoint::Scalar(Some(30.0)),
            DataPoint::Scalar(Some(100.0)),
            DataPoint::Scalar(Some(20.0)),
        ]
    );
}

#[test]
fn test_flat_temporal_axis_no_split() {
    let query = QueryResult::new(
        vec![
            Column::new("country", ColumnType::String),
            Column::new("timestamp", ColumnType::DateTime),
            Column::new("city", ColumnType::String),
            Column::new("request_count", ColumnType::Int),
        ],
        vec![
            vec![s("Israel"), s("2019-05-25T00:00:00Z"), s("Herzliya"), n(30.0)],
            vec![s("Japan"), s("2019-05-25T00:00:00Z"), s("Tokyo"), n(20.0)],
            vec![
                s("United States"),
                s("2000-06-26T00:00:00Z"),
                s("New York"),
                n(100.0),
            ],
        ],
    );
    let selection = AxisSelection {
        x_axis: query.columns[1].clone(),
        y_axes: vec![query.columns[3].clone()],
        split_by: vec![],
        utc_offset: 0,
    };

    let result = transform_result(&selection, &query, ChartKind::Line).unwrap();

    assert_eq!(result.categories, None);
    assert_eq!(
        result.series[0].data,
        vec![
            DataPoint::Point([epoch_ms(2019, 5, 25), 30.0]),
            DataPoint::Point([epoch_ms(2019, 5, 25), 20.0]),
            DataPoint::Point([epoch_ms(2000, 6, 26), 100.0]),
        ]
    );
}

#[test]
fn test_flat_temporal_utc_offset_shifts_every_point() {
    let query = QueryResult::new(
        vec![
            Column::new("timestamp", ColumnType::DateTime),
            Column::new("request_count", ColumnType::Int),
        ],
        vec![
            vec![s("2019-05-25T00:00:00Z"), n(30.0)],
            vec![s("2000-06-26T00:00:00Z"), n(100.0)],
        ],
    );
    let mut selection = AxisSelection {
        x_axis: query.columns[0].clone(),
        y_axes: vec![query.columns[1].clone()],
        split_by: vec![],
        utc_offset: 0,
    };

    let base = transform_result(&selection, &query, ChartKind::Line).unwrap();
    selection.utc_offset = 90;
    let shifted = transform_result(&selection, &query, ChartKind::Line).unwrap();

    for (a, b) in base.series[0].data.iter().zip(&shifted.series[0].data) {
        let (DataPoint::Point([ax, ay]), DataPoint::Point([bx, by])) = (a, b) else {
            panic!("expected [x, y] points");
        };
        assert_eq!(*bx, *ax + 90.0 * 60_000.0);
        assert_eq!(ay, by);
    }
}

#[test]
fn test_flat_split_by_non_temporal() {
    let query = QueryResult::new(
        vec![
            Column::new("country", ColumnType::String),
            Column::new("city", ColumnType::String),
            Column::new("request_count", ColumnType::Int),
        ],
        vec![
            vec![s("United States"), s("Atlanta"), n(300.0)],
            vec![s("United States"), s("Redmond"), n(20.0)],
            vec![s("Israel"), s("Herzliya"), n(1000.0)],
            vec![s("Israel"), s("Tel Aviv"), n(10.0)],
            vec![s("United States"), s("New York"), n(100.0)],
            vec![s("Japan"), s("Tokyo"), n(20.0)],
            vec![s("Israel"), s("Jerusalem"), n(5.0)],
            vec![s("United States"), s("Boston"), n(200.0)],
        ],
    );
    let selection = AxisSelection {
        x_axis: query.columns[0].clone(),
        y_axes: vec![query.columns[2].clone()],
        split_by: vec![query.columns[1].clone()],
        utc_offset: 0,
    };

    let result = transform_result(&selection, &query, ChartKind::StackedColumn).unwrap();

    assert_eq!(
        result.categories,
        Some(vec![
            "United States".to_string(),
            "Israel".to_string(),
            "Japan".to_string()
        ])
    );
    assert_eq!(result.series.len(), 8);

    // Alignment invariant: each series is non-null exactly at its own
    // category's index.
    let null = DataPoint::Scalar(None);
    assert_eq!(result.series[0].name, "Atlanta");
    assert_eq!(
        result.series[0].data,
        vec![DataPoint::Scalar(Some(300.0)), null.clone(), null.clone()]
    );
    assert_eq!(result.series[3].name, "Tel Aviv");
    assert_eq!(
        result.series[3].data,
        vec![null.clone(), DataPoint::Scalar(Some(10.0)), null.clone()]
    );
    assert_eq!(result.series[5].name, "Tokyo");
    assert_eq!(
        result.series[5].data,
        vec![null.clone(), null.clone(), DataPoint::Scalar(Some(20.0))]
    );
}

#[test]
fn test_flat_split_by_temporal() {
    let query = QueryResult::new(
        vec![
            Column::new("country", ColumnType::String),
            Column::new("timestamp", ColumnType::DateTime),
            Column::new("city", ColumnType::String),
            Column::new("request_count", ColumnType::Int),
        ],
        vec![
            vec![s("Israel"), s("1988-06-26T00:00:00Z"), s("Jerusalem"), n(500.0)],
            vec![s("Israel"), s("2000-06-26T00:00:00Z"), s("Herzliya"), n(1000.0)],
            vec![
                s("United States"),
                s("2000-06-26T00:00:00Z"),
                s("Boston"),
                n(200.0),
            ],
            vec![s("Israel"), s("2000-06-26T00:00:00Z"), s("Tel Aviv"), n(10.0)],
            vec![
                s("United States"),
                s("2000-06-26T00:00:00Z"),
                s("New York"),
                n(100.0),
            ],
            vec![s("Japan"), s("2019-05-25T00:00:00Z"), s("Tokyo"), n(20.0)],
            vec![
                s("United States"),
                s("2019-05-25T00:00:00Z"),
                s("Atlanta"),
                n(300.0),
            ],
            vec![
                s("United States"),
                s("2019-05-25T00:00:00Z"),
                s("Redmond"),
                n(20.0),
            ],
        ],
    );
    let selection = AxisSelection {
        x_axis: query.columns[1].clone(),
        y_axes: vec![query.columns[3].clone()],
        split_by: vec![query.columns[2].clone()],
        utc_offset: 0,
    };

    let result = transform_result(&selection, &query, ChartKind::Line).unwrap();

    assert_eq!(result.categories, None);
    let names: Vec<&str> = result.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Jerusalem", "Herzliya", "Boston", "Tel Aviv", "New York", "Tokyo", "Atlanta",
            "Redmond"
        ]
    );
    assert_eq!(
        result.series[0].data,
        vec![DataPoint::Point([epoch_ms(1988, 6, 26), 500.0])]
    );
    assert_eq!(
        result.series[6].data,
        vec![DataPoint::Point([epoch_ms(2019, 5, 25), 300.0])]
    );
}

#[test]
fn test_hierarchical_pie_two_levels() {
    let query = QueryResult::new(
        vec![
            Column::new("country", ColumnType::String),
            Column::new("city", ColumnType::String),
            Column::new("request_count", ColumnType::Int),
        ],
        vec![
            vec![s("Israel"), s("Tel Aviv"), n(10.0)],
            vec![s("United States"), s("Redmond"), n(5.0)],
            vec![s("United States"), s("New York"), n(2.0)],
            vec![s("United States"), s("Miami"), n(3.0)],
            vec![s("Israel"), s("Herzliya"), n(30.0)],
            vec![s("Israel"), s("Jaffa"), n(50.0)],
            vec![s("United States"), s("Boston"), n(1.0)],
        ],
    );
    let selection = AxisSelection {
        x_axis: query.columns[0].clone(),
        y_axes: vec![query.columns[2].clone()],
        split_by: vec![query.columns[1].clone()],
        utc_offset: 0,
    };

    let result = transform_result(&selection, &query, ChartKind::Pie).unwrap();

    assert_eq!(result.categories, None);
    assert_eq!(result.series.len(), 2);
    assert_eq!(result.series[0].name, "country");
    assert_eq!(result.series[1].name, "city");

    let countries: Vec<(String, f64)> = result.series[0]
        .data
        .iter()
        .map(|p| match p {
            DataPoint::Slice { name, y } => (name.clone(), *y),
            other => panic!("expected slice point, got {:?}", other),
        })
        .collect();
    assert_eq!(
        countries,
        vec![
            ("Israel".to_string(), 90.0),
            ("United States".to_string(), 11.0)
        ]
    );

    // Hierarchical sum invariant: each country's slice equals the sum of its
    // own cities' slices.
    let city_total: f64 = result.series[1]
        .data
        .iter()
        .map(|p| match p {
            DataPoint::Slice { y, .. } => *y,
            _ => 0.0,
        })
        .sum();
    assert_eq!(city_total, 90.0 + 11.0);
}

#[test]
fn test_hierarchical_donut_ignores_extra_measures() {
    let query = QueryResult::new(
        vec![
            Column::new("country", ColumnType::String),
            Column::new("request_count", ColumnType::Int),
            Column::new("second_count", ColumnType::Int),
        ],
        vec![
            vec![s("Israel"), n(30.0), n(999.0)],
            vec![s("Japan"), n(20.0), n(999.0)],
        ],
    );
    let selection = AxisSelection {
        x_axis: query.columns[0].clone(),
        y_axes: vec![query.columns[1].clone(), query.columns[2].clone()],
        split_by: vec![],
        utc_offset: 0,
    };

    let result = transform_result(&selection, &query, ChartKind::Donut).unwrap();

    assert_eq!(result.series.len(), 1);
    assert_eq!(
        result.series[0].data,
        vec![
            DataPoint::Slice {
                name: "Israel".to_string(),
                y: 30.0
            },
            DataPoint::Slice {
                name: "Japan".to_string(),
                y: 20.0
            },
        ]
    );
}

#[test]
fn test_invalid_temporal_value_aborts_whole_call() {
    let columns = vec![
        Column::new("timestamp", ColumnType::DateTime),
        Column::new("request_count", ColumnType::Int),
    ];
    let rows = vec![
        vec![s("2019-05-25T00:00:00Z"), n(30.0)],
        vec![s("garbage"), n(20.0)],
    ];
    let selection = AxisSelection {
        x_axis: columns[0].clone(),
        y_axes: vec![columns[1].clone()],
        split_by: vec![],
        utc_offset: 0,
    };

    let err = transform(&selection, &columns, &rows, true, ChartKind::Line).unwrap_err();
    assert_eq!(
        err,
        TransformError::InvalidTemporalValue("garbage".to_string())
    );
}

#[test]
fn test_json_output_shape() {
    let query = country_city_result();
    let selection = AxisSelection {
        x_axis: query.columns[0].clone(),
        y_axes: vec![query.columns[2].clone()],
        split_by: vec![],
        utc_offset: 0,
    };

    let flat = transform_result(&selection, &query, ChartKind::Bar).unwrap();
    assert_eq!(
        serde_json::to_value(&flat).unwrap(),
        json!({
            "series": [{ "name": "request_count", "data": [30.0, 100.0, 20.0] }],
            "categories": ["Israel", "United States", "Japan"]
        })
    );

    // Hierarchical output omits categories entirely; points carry names.
    let pie = transform_result(&selection, &query, ChartKind::Pie).unwrap();
    let value = serde_json::to_value(&pie).unwrap();
    assert!(value.get("categories").is_none());
    assert_eq!(
        value["series"][0]["data"][0],
        json!({ "name": "Israel", "y": 30.0 })
    );
}

#[test]
fn test_csv_to_series_pipeline() {
    let csv = "country,timestamp,request_count\n\
               Israel,2019-05-25T00:00:00Z,30\n\
               Japan,2019-05-25T00:00:00Z,20\n\
               United States,2000-06-26T00:00:00Z,100\n";
    let query = csv_reader::read_query(csv.as_bytes()).unwrap();
    let selection = AxisSelection {
        x_axis: query.columns[1].clone(),
        y_axes: vec![query.columns[2].clone()],
        split_by: vec![],
        utc_offset: 0,
    };

    let result = transform_result(&selection, &query, ChartKind::Area).unwrap();

    assert_eq!(result.categories, None);
    assert_eq!(
        result.series[0].data,
        vec![
            DataPoint::Point([epoch_ms(2019, 5, 25), 30.0]),
            DataPoint::Point([epoch_ms(2019, 5, 25), 20.0]),
            DataPoint::Point([epoch_ms(2000, 6, 26), 100.0]),
        ]
    );
}

#[test]
fn test_json_to_series_pipeline() {
    let value = json!([
        { "country": "Israel", "city": "Tel Aviv", "request_count": 10 },
        { "country": "Israel", "city": "Herzliya", "request_count": 30 },
        { "country": "Japan", "city": "Tokyo", "request_count": 20 },
    ]);
    let query = QueryResult::from_json(&value).unwrap();
    let selection = AxisSelection {
        x_axis: query.columns[0].clone(),
        y_axes: vec![query.columns[2].clone()],
        split_by: vec![query.columns[1].clone()],
        utc_offset: 0,
    };

    let result = transform_result(&selection, &query, ChartKind::Donut).unwrap();

    assert_eq!(result.series.len(), 2);
    assert_eq!(
        result.series[0].data,
        vec![
            DataPoint::Slice {
                name: "Israel".to_string(),
                y: 40.0
            },
            DataPoint::Slice {
                name: "Japan".to_string(),
                y: 20.0
            },
        ]
    );
}
