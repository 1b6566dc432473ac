//! Writers for the file layout [`super::source::DirectorySource`] reads.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array};
use arrow::datatypes::{DataType, Date32Type, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::{Map, Value as JsonValue};

use super::model::{Announcement, TimeSeries};
use super::source::{DataSource, DatasetId};

/// Write `series` as one record batch: a Date32 `date` column followed by a
/// Float64 column per field.
pub fn write_parquet(series: &TimeSeries, path: &Path) -> Result<()> {
    let mut fields = vec![Field::new("date", DataType::Date32, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Date32Array::from(
        series
            .dates()
            .into_iter()
            .map(Date32Type::from_naive_date)
            .collect::<Vec<_>>(),
    ))];
    for column in series.columns() {
        fields.push(Field::new(column, DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(series.values(column)?)));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;
    if log::log_enabled!(log::Level::Trace) {
        let table = arrow::util::pretty::pretty_format_batches(std::slice::from_ref(&batch))?;
        log::trace!("{}:\n{table}", series.name());
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

pub fn write_csv(series: &TimeSeries, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["date".to_string()];
    header.extend(series.columns().iter().cloned());
    writer.write_record(&header)?;

    for row in series.rows() {
        let mut record = vec![row.date.to_string()];
        for column in series.columns() {
            record.push(row.get(column).map(|v| v.to_string()).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Records orientation: `[{ "date": "2023-01-31", "<field>": value, ... }]`.
pub fn write_json(series: &TimeSeries, path: &Path) -> Result<()> {
    let records: Vec<JsonValue> = series
        .rows()
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            obj.insert("date".to_string(), JsonValue::String(row.date.to_string()));
            for (field, value) in &row.fields {
                obj.insert(field.clone(), JsonValue::from(*value));
            }
            JsonValue::Object(obj)
        })
        .collect();
    let text = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

pub fn write_announcements_json(items: &[Announcement], path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(items)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

pub fn write_announcements_csv(items: &[Announcement], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for item in items {
        writer.serialize(item)?;
    }
    writer.flush()?;
    Ok(())
}

/// Output formats of [`export_source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Parquet,
    Csv,
    Json,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Parquet, Format::Csv, Format::Json];

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Parquet => "parquet",
            Format::Csv => "csv",
            Format::Json => "json",
        }
    }
}

/// Write every table of `source` into `dir` in `format`, plus the
/// announcements and a `VERSION` file. Returns the paths written.
pub fn export_source(source: &dyn DataSource, dir: &Path, format: Format) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut written = Vec::new();

    for id in DatasetId::ALL {
        let series = source.series(id)?;
        let path = dir.join(format!("{}.{}", id.key(), format.extension()));
        match format {
            Format::Parquet => write_parquet(&series, &path)?,
            Format::Csv => write_csv(&series, &path)?,
            Format::Json => write_json(&series, &path)?,
        }
        log::debug!("{id}: wrote {} rows to {}", series.len(), path.display());
        written.push(path);
    }

    let items = source.announcements()?;
    let path = match format {
        Format::Csv => {
            let path = dir.join("announcements.csv");
            write_announcements_csv(&items, &path)?;
            path
        }
        Format::Parquet | Format::Json => {
            let path = dir.join("announcements.json");
            write_announcements_json(&items, &path)?;
            path
        }
    };
    written.push(path);

    let version = dir.join("VERSION");
    std::fs::write(&version, format!("{}\n", source.version()))
        .with_context(|| format!("writing {}", version.display()))?;
    written.push(version);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::{Catalog, DirectorySource, FixtureSource};

    #[test]
    fn parquet_dates_are_days_since_the_unix_epoch() {
        use arrow::array::AsArray;
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy_rates.parquet");
        write_parquet(&FixtureSource.series(DatasetId::PolicyRates).unwrap(), &path).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let mut reader = ParquetRecordBatchReaderBuilder::try_new(file).unwrap().build().unwrap();
        let batch = reader.next().unwrap().unwrap();
        let dates = batch.column(0).as_primitive::<Date32Type>();
        // 2023-01-31 and 2023-12-31.
        assert_eq!(dates.value(0), 19388);
        assert_eq!(dates.value(dates.len() - 1), 19722);
    }

    #[test]
    fn every_format_reloads_as_the_same_catalog() {
        let expected = Catalog::load(&FixtureSource).unwrap();
        for format in Format::ALL {
            let dir = tempfile::tempdir().unwrap();
            let written = export_source(&FixtureSource, dir.path(), format).unwrap();
            assert_eq!(written.len(), DatasetId::ALL.len() + 2);

            let reloaded = Catalog::load(&DirectorySource::new(dir.path())).unwrap();
            assert_eq!(reloaded.version, expected.version, "{format:?}");
            for id in DatasetId::ALL {
                let (got, want) = (reloaded.series(id).unwrap(), expected.series(id).unwrap());
                assert_eq!(got.rows(), want.rows(), "{format:?} {id}");
                // JSON objects do not keep key order.
                let sorted = |s: &TimeSeries| {
                    let mut c = s.columns().to_vec();
                    c.sort();
                    c
                };
                assert_eq!(sorted(got), sorted(want), "{format:?} {id}");
            }
            assert_eq!(reloaded.announcements(), expected.announcements());
        }
    }
}
