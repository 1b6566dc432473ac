use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Announcement, TimeSeries, TimeSeriesRow};

/// Header names accepted for the date column (compared case-insensitively).
const DATE_COLUMN: &str = "date";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a time series from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – a Date32 or string `date` column plus numeric columns
/// * `.json`    – `[{ "date": "2023-01-31", "CPI": 5.0, ... }, ...]`
/// * `.csv`     – header row with a `date` column, all other columns numeric
pub fn load_series(path: &Path, name: &str) -> Result<TimeSeries> {
    match extension(path).as_str() {
        "parquet" | "pq" => load_parquet(path, name),
        "json" => load_json(path, name),
        "csv" => load_csv(path, name),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Load announcements from `.json` (records array) or `.csv`
/// (`date,category,text,impact`).
pub fn load_announcements(path: &Path) -> Result<Vec<Announcement>> {
    let mut items: Vec<Announcement> = match extension(path).as_str() {
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            serde_json::from_str(&text).context("parsing announcements JSON")?
        }
        "csv" => {
            let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
            reader
                .deserialize::<Announcement>()
                .enumerate()
                .map(|(row_no, rec)| rec.with_context(|| format!("CSV row {row_no}")))
                .collect::<Result<_>>()?
        }
        other => bail!("Unsupported file extension for announcements: .{other}"),
    };
    items.sort_by_key(|a| a.date);
    Ok(items)
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    // Accept a trailing time component, as written by dataframe exports.
    let day = s.split(['T', ' ']).next().unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").with_context(|| format!("'{s}' is not a date"))
}

/// Rows from files are sorted by date; duplicates are left for
/// [`TimeSeries::new`] to reject.
fn finish(name: &str, columns: Vec<String>, mut rows: Vec<TimeSeriesRow>) -> Result<TimeSeries> {
    rows.sort_by_key(|r| r.date);
    Ok(TimeSeries::new(name, columns, rows)?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records',
/// date_format='iso')`):
///
/// ```json
/// [
///   { "date": "2023-01-31", "Repo Rate": 6.0, "CRR": 4.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path, name: &str) -> Result<TimeSeries> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let date_value = obj
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(DATE_COLUMN))
            .map(|(_, v)| v)
            .with_context(|| format!("Row {i}: missing '{DATE_COLUMN}'"))?;
        let date = date_value
            .as_str()
            .with_context(|| format!("Row {i}: '{DATE_COLUMN}' is not a string"))
            .and_then(parse_date)?;

        let mut row = TimeSeriesRow::new(date);
        for (key, val) in obj {
            if key.eq_ignore_ascii_case(DATE_COLUMN) {
                continue;
            }
            let v = val
                .as_f64()
                .with_context(|| format!("Row {i}, '{key}': not a number"))?;
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            row.fields.insert(key.clone(), v);
        }
        rows.push(row);
    }

    finish(name, columns, rows)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one `date` column in ISO form,
/// every other column numeric. Empty cells are errors.
fn load_csv(path: &Path, name: &str) -> Result<TimeSeries> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let date_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(DATE_COLUMN))
        .context("CSV missing 'date' column")?;

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let date = parse_date(record.get(date_idx).unwrap_or(""))
            .with_context(|| format!("CSV row {row_no}"))?;

        let mut row = TimeSeriesRow::new(date);
        for (col_idx, value) in record.iter().enumerate() {
            if col_idx == date_idx {
                continue;
            }
            let col_name = &headers[col_idx];
            let v = value.trim().parse::<f64>().with_context(|| {
                format!("CSV row {row_no}, '{col_name}': '{value}' is not a number")
            })?;
            row.fields.insert(col_name.clone(), v);
        }
        rows.push(row);
    }

    finish(name, columns, rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing one time series.
///
/// Expected schema:
/// - `date`: Date32, or Utf8 holding ISO dates
/// - any other columns: Float64, Float32, Int64 or Int32
///
/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars**
/// (`df.write_parquet()`) and the bundled `export-fixtures` binary.
fn load_parquet(path: &Path, name: &str) -> Result<TimeSeries> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let date_idx = schema
            .fields()
            .iter()
            .position(|f| f.name().eq_ignore_ascii_case(DATE_COLUMN))
            .context("Parquet file missing 'date' column")?;
        let date_col = batch.column(date_idx);

        let value_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx)
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        if columns.is_empty() {
            columns = value_cols.iter().map(|(_, n)| n.clone()).collect();
        }

        for row in 0..batch.num_rows() {
            let date = extract_date(date_col, row)
                .with_context(|| format!("Row {row}: failed to read '{DATE_COLUMN}'"))?;

            let mut ts_row = TimeSeriesRow::new(date);
            for (col_idx, col_name) in &value_cols {
                let v = extract_f64(batch.column(*col_idx), row)
                    .with_context(|| format!("Row {row}: failed to read '{col_name}'"))?;
                ts_row.fields.insert(col_name.clone(), v);
            }
            rows.push(ts_row);
        }
    }

    finish(name, columns, rows)
}

// -- Parquet / Arrow helpers --

fn extract_date(col: &Arc<dyn Array>, row: usize) -> Result<NaiveDate> {
    if col.is_null(row) {
        bail!("null date");
    }
    match col.data_type() {
        DataType::Date32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Date32Array>()
                .context("expected Date32Array")?;
            arr.value_as_date(row).context("date out of range")
        }
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            parse_date(arr.value(row))
        }
        DataType::LargeUtf8 => parse_date(col.as_string::<i64>().value(row)),
        other => bail!("Expected Date32 or string date column, got {other:?}"),
    }
}

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    value.with_context(|| format!("column does not match its {:?} type", col.data_type()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(dir: &Path, file: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(file);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_series_is_sorted_and_typed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "forex.csv",
            "Date,Forex Reserves (USD bn),USD/INR\n\
             2023-02-28,605,75.2\n\
             2023-01-31,600,75.0\n",
        );
        let ts = load_series(&path, "forex").unwrap();
        assert_eq!(ts.name(), "forex");
        assert_eq!(ts.columns(), ["Forex Reserves (USD bn)", "USD/INR"]);
        assert_eq!(ts.values("Forex Reserves (USD bn)").unwrap(), vec![600.0, 605.0]);
    }

    #[test]
    fn csv_with_text_in_numeric_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "x.csv", "date,CPI\n2023-01-31,high\n");
        let err = load_series(&path, "x").unwrap_err();
        assert!(format!("{err:#}").contains("not a number"));
    }

    #[test]
    fn csv_nan_and_inf_cells_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for cell in ["NaN", "inf"] {
            let path = write(
                dir.path(),
                "x.csv",
                &format!("date,CRR\n2023-01-31,4\n2023-02-28,{cell}\n"),
            );
            let err = load_series(&path, "x").unwrap_err();
            assert!(format!("{err:#}").contains("non-finite"), "{cell}: {err:#}");
        }
    }

    #[test]
    fn parquet_null_values_are_rejected() {
        use arrow::array::{ArrayRef, Date32Array, Float64Array};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("date", DataType::Date32, false),
            Field::new("CRR", DataType::Float64, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Date32Array::from(vec![19388, 19416])),
            Arc::new(Float64Array::from(vec![Some(4.0), None])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
        let mut writer =
            ArrowWriter::try_new(std::fs::File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_series(&path, "x").unwrap_err();
        assert!(format!("{err:#}").contains("null value"), "{err:#}");
    }

    #[test]
    fn json_records_accept_datetime_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "economy.json",
            r#"[{"date": "2023-01-31T00:00:00", "GDP Growth (%)": 6.0},
                {"date": "2023-02-28", "GDP Growth (%)": 6.1}]"#,
        );
        let ts = load_series(&path, "economy").unwrap();
        assert_eq!(ts.len(), 2);
        assert_eq!(
            ts.rows()[0].date,
            NaiveDate::from_ymd_opt(2023, 1, 31).unwrap()
        );
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "x.csv", "date,CPI\n2023-01-31,5\n2023-01-31,6\n");
        assert!(load_series(&path, "x").is_err());
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let err = load_series(Path::new("rates.xlsx"), "rates").unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn announcements_csv_parses_categories() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "announcements.csv",
            "date,category,text,impact\n\
             2023-02-15,Liquidity,Liquidity injection,Positive\n\
             2023-01-01,Policy Rate,Repo Rate increased by 25 bps,Increase\n",
        );
        let items = load_announcements(&path).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category, crate::data::model::Category::PolicyRate);
    }
}
