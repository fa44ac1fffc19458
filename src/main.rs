use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::Parser;

use querychart::index::column_by_name;
use querychart::{csv_reader, transform_result, AxisSelection, ChartKind, QueryResult};

#[derive(Parser, Debug)]
#[command(name = "querychart")]
#[command(about = "Transform tabular query results into chart-ready series", long_about = None)]
struct Args {
    /// Column to use as the x-axis
    #[arg(long = "x")]
    x_axis: String,

    /// Measure column(s); repeat for multiple series
    #[arg(long = "y", required = true)]
    y_axes: Vec<String>,

    /// Optional split-by column(s); repeat for deeper pie/donut levels
    #[arg(long = "split-by")]
    split_by: Vec<String>,

    /// Chart kind (e.g. line, stacked-column, pie, donut)
    #[arg(long, default_value = "line")]
    chart: String,

    /// UTC offset in minutes applied to datetime axis values
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    utc_offset: i64,

    /// Read a JSON array of objects from stdin instead of CSV
    #[arg(long)]
    json: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Read the query result from stdin
    let query = if args.json {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read JSON from stdin")?;
        let value = serde_json::from_str(&input).context("Failed to parse JSON input")?;
        QueryResult::from_json(&value).context("Failed to build query result from JSON")?
    } else {
        csv_reader::read_query_from_stdin().context("Failed to read CSV from stdin")?
    };

    let chart: ChartKind = args.chart.parse()?;

    // Build the axis selection against the discovered columns
    let mut y_axes = Vec::with_capacity(args.y_axes.len());
    for name in &args.y_axes {
        y_axes.push(column_by_name(&query.columns, name)?);
    }
    let mut split_by = Vec::with_capacity(args.split_by.len());
    for name in &args.split_by {
        split_by.push(column_by_name(&query.columns, name)?);
    }
    let selection = AxisSelection {
        x_axis: column_by_name(&query.columns, &args.x_axis)?,
        y_axes,
        split_by,
        utc_offset: args.utc_offset,
    };

    let result = transform_result(&selection, &query, chart)?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .context("Failed to serialize result")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", output).context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
