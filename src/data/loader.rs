use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{ClimateRow, Metric, MetricValues, Region, RowStore};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a climate dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "year": 2000, "continent": "Asia", "country": "Japan", "temperature": 15.1, ... }, ...]`
/// * `.csv`     – same columns, or the raw export headers (`Year`, `CO2 Emissions`, ...)
/// * `.parquet` – flat columns with the JSON field names
pub fn load_file(path: &Path) -> Result<RowStore> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let unknown = rows.iter().filter(|r| r.region.is_none()).count();
    if unknown > 0 {
        log::warn!("{unknown} rows have a continent outside the known regions and will be ignored");
    }
    Ok(RowStore::from_rows(rows))
}

// ---------------------------------------------------------------------------
// Loose value coercion
// ---------------------------------------------------------------------------

/// Coerce a text cell to a number. Blank or malformed text becomes NaN, so
/// the value is dropped for its metric only.
pub fn coerce_str(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Coerce a loosely-typed JSON value to a number.
pub fn coerce_json(val: Option<&JsonValue>) -> f64 {
    match val {
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(JsonValue::String(s)) => coerce_str(s),
        Some(JsonValue::Bool(b)) => f64::from(u8::from(*b)),
        _ => f64::NAN,
    }
}

/// A finite, integral number that fits in `i32`.
fn as_year(v: f64) -> Option<i32> {
    (v.is_finite() && v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX))
        .then_some(v as i32)
}

fn as_month(v: f64) -> Option<u32> {
    (v.is_finite() && v.fract() == 0.0 && (1.0..=12.0).contains(&v)).then_some(v as u32)
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn build_row(
    year: f64,
    month: f64,
    continent: &str,
    country: &str,
    date: Option<String>,
    metrics: MetricValues,
) -> ClimateRow {
    let continent = continent.trim();
    ClimateRow {
        year: as_year(year),
        region: Region::from_label(continent),
        continent: continent.to_string(),
        country: country.trim().to_string(),
        month: as_month(month),
        date,
        metrics,
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "date": "2000-01-01", "year": 2000, "month": 1,
///     "country": "Japan", "continent": "Asia",
///     "temperature": 15.1, "co2": "412.3", "sea_level": null, ...
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<ClimateRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    rows_from_json(&root)
}

fn rows_from_json(root: &JsonValue) -> Result<Vec<ClimateRow>> {
    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| -> Result<ClimateRow> {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;

            let mut metrics = MetricValues::default();
            for metric in Metric::ALL {
                metrics.set(metric, coerce_json(obj.get(metric.id())));
            }

            Ok(build_row(
                coerce_json(obj.get("year")),
                coerce_json(obj.get("month")),
                &json_text(obj.get("continent")),
                &json_text(obj.get("country")),
                obj.get("date").map(|d| json_text(Some(d))).and_then(|d| non_empty(&d)),
                metrics,
            ))
        })
        .collect()
}

fn json_text(val: Option<&JsonValue>) -> String {
    match val {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Position of a column under either its field name or its raw export
/// header.
fn find_column(headers: &[String], names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim() == *n))
}

/// Round a value the way the raw-export conversion does (3 decimals).
fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Apply the raw-export cleaning to a parsed row: metrics are rounded to 3
/// decimals, and rows lacking a country, a year or a temperature are
/// rejected as a whole.
fn clean_raw_export(mut row: ClimateRow) -> Option<ClimateRow> {
    for metric in Metric::ALL {
        let v = row.metrics.get(metric);
        if v.is_finite() {
            row.metrics.set(metric, round3(v));
        }
    }
    let complete = !row.country.is_empty()
        && row.year.is_some()
        && row.value(Metric::Temperature).is_some();
    complete.then_some(row)
}

/// CSV layout: header row, then one observation per line.
///
/// Headers may be the JSON field names (`year`, `co2`, ...) or the raw
/// export headers (`Year`, `CO2 Emissions`, ...). `year`, `continent` and
/// `country` are required; a missing metric column leaves that metric empty.
/// Raw exports are cleaned with [`clean_raw_export`] so they aggregate the
/// same as the converted JSON.
fn load_csv(path: &Path) -> Result<Vec<ClimateRow>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let year_idx = find_column(&headers, &["year", "Year"]).context("CSV missing 'year' column")?;
    let continent_idx = find_column(&headers, &["continent", "Continent"])
        .context("CSV missing 'continent' column")?;
    let country_idx =
        find_column(&headers, &["country", "Country"]).context("CSV missing 'country' column")?;
    let raw_export = headers[year_idx].trim() == "Year";
    let month_idx = find_column(&headers, &["month", "Month"]);
    let date_idx = find_column(&headers, &["date", "Date"]);

    let metric_idx: Vec<(Metric, Option<usize>)> = Metric::ALL
        .into_iter()
        .map(|m| (m, find_column(&headers, &[m.id(), m.source_header()])))
        .collect();
    for (metric, idx) in &metric_idx {
        if idx.is_none() {
            log::warn!("CSV has no column for metric '{metric}'");
        }
    }

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

        let mut metrics = MetricValues::default();
        for (metric, idx) in &metric_idx {
            metrics.set(*metric, coerce_str(cell(*idx)));
        }

        let row = build_row(
            coerce_str(cell(Some(year_idx))),
            coerce_str(cell(month_idx)),
            cell(Some(continent_idx)),
            cell(Some(country_idx)),
            non_empty(cell(date_idx)),
            metrics,
        );
        if !raw_export {
            rows.push(row);
            continue;
        }
        match clean_raw_export(row) {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::info!("Dropped {dropped} raw export rows missing country, year or temperature");
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Numeric columns may be Int32, Int64, Float32, Float64 or text holding
/// numbers; nulls become missing values.
fn load_parquet(path: &Path) -> Result<Vec<ClimateRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        rows.extend(rows_from_batch(&batch)?);
    }
    Ok(rows)
}

fn rows_from_batch(batch: &RecordBatch) -> Result<Vec<ClimateRow>> {
    let required = |name: &str| {
        batch
            .column_by_name(name)
            .with_context(|| format!("Parquet file missing '{name}' column"))
    };
    let year_col = required("year")?;
    let continent_col = required("continent")?;
    let country_col = required("country")?;
    let month_col = batch.column_by_name("month");
    let date_col = batch.column_by_name("date");
    let metric_cols: Vec<(Metric, Option<&Arc<dyn Array>>)> = Metric::ALL
        .into_iter()
        .map(|m| (m, batch.column_by_name(m.id())))
        .collect();

    (0..batch.num_rows())
        .map(|row| -> Result<ClimateRow> {
            let mut metrics = MetricValues::default();
            for (metric, col) in &metric_cols {
                if let Some(col) = col {
                    let v = extract_f64(col, row)
                        .with_context(|| format!("Row {row}: failed to read '{metric}'"))?;
                    metrics.set(*metric, v);
                }
            }

            let month = match month_col {
                Some(col) => extract_f64(col, row)?,
                None => f64::NAN,
            };
            let date = match date_col {
                Some(col) => extract_string(col, row)?.and_then(|d| non_empty(&d)),
                None => None,
            };

            Ok(build_row(
                extract_f64(year_col, row).with_context(|| format!("Row {row}: failed to read 'year'"))?,
                month,
                &extract_string(continent_col, row)?.unwrap_or_default(),
                &extract_string(country_col, row)?.unwrap_or_default(),
                date,
                metrics,
            ))
        })
        .collect()
}

// -- Parquet / Arrow helpers --

/// Read a numeric cell; nulls and unparsable text become NaN.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        return Ok(f64::NAN);
    }
    let v = match col.data_type() {
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().context("expected Int32Array")?;
            f64::from(arr.value(row))
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().context("expected Int64Array")?;
            arr.value(row) as f64
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            f64::from(arr.value(row))
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            arr.value(row)
        }
        DataType::Utf8 | DataType::LargeUtf8 => match extract_string(col, row)? {
            Some(s) => coerce_str(&s),
            None => f64::NAN,
        },
        other => bail!("Expected a numeric or text column, got {other:?}"),
    };
    Ok(v)
}

/// Read a text cell. Numeric columns are rendered as text.
fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let s = match col.data_type() {
        DataType::Utf8 => {
            let arr = col.as_any().downcast_ref::<StringArray>().context("expected StringArray")?;
            arr.value(row).to_string()
        }
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        _ => arrow::util::display::array_value_to_string(col, row)
            .context("formatting parquet value")?,
    };
    Ok(Some(s))
}
