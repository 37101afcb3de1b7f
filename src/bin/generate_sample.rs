use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use climate_dash::{Metric, Region};

/// A metric cell as it appears in exported files.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
enum Reading {
    Value(f64),
    /// Non-numeric junk the loader must treat as missing.
    Malformed(&'static str),
    Missing,
}

impl Reading {
    fn value(self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::Malformed(_) | Reading::Missing => None,
        }
    }
}

/// One synthetic observation, serialised with the dataset's field names.
#[derive(Debug, Clone, Serialize)]
struct Record {
    date: String,
    year: i64,
    month: i64,
    country: String,
    continent: String,
    temperature: Reading,
    co2: Reading,
    sea_level: Reading,
    precipitation: Reading,
    humidity: Reading,
    wind_speed: Reading,
}

impl Record {
    fn metric(&self, metric: Metric) -> Option<f64> {
        let reading = match metric {
            Metric::Temperature => self.temperature,
            Metric::Co2 => self.co2,
            Metric::SeaLevel => self.sea_level,
            Metric::Precipitation => self.precipitation,
            Metric::Humidity => self.humidity,
            Metric::WindSpeed => self.wind_speed,
        };
        reading.value()
    }
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const FIRST_YEAR: i64 = 2000;
const LAST_YEAR: i64 = 2023;

/// Countries per continent with a baseline temperature.
const COUNTRIES: &[(Region, &str, f64)] = &[
    (Region::Africa, "Kenya", 24.0),
    (Region::Africa, "Nigeria", 27.0),
    (Region::Africa, "Egypt", 22.5),
    (Region::Asia, "Japan", 15.5),
    (Region::Asia, "India", 25.0),
    (Region::Asia, "China", 14.0),
    (Region::Europe, "France", 12.0),
    (Region::Europe, "Norway", 4.0),
    (Region::Europe, "Spain", 15.0),
    (Region::NorthAmerica, "Canada", 1.5),
    (Region::NorthAmerica, "Mexico", 21.0),
    (Region::NorthAmerica, "United States", 12.5),
    (Region::Oceania, "Australia", 22.0),
    (Region::Oceania, "New Zealand", 12.0),
    (Region::SouthAmerica, "Brazil", 25.5),
    (Region::SouthAmerica, "Argentina", 16.0),
    (Region::SouthAmerica, "Peru", 19.0),
];

fn reading(v: f64) -> Reading {
    Reading::Value((v * 1000.0).round() / 1000.0)
}

fn generate(rng: &mut SimpleRng) -> Vec<Record> {
    let mut records = Vec::new();

    for year in FIRST_YEAR..=LAST_YEAR {
        let t = (year - FIRST_YEAR) as f64;
        for &(region, country, base_temp) in COUNTRIES {
            // Oceania starts reporting late, so the ranking sees a missing
            // baseline.
            if region == Region::Oceania && year < 2005 {
                continue;
            }
            for month in 1..=12 {
                let season = (month as f64 / 12.0 * 2.0 * std::f64::consts::PI).sin();
                let mut rec = Record {
                    date: format!("{year}-{month:02}-01"),
                    year,
                    month,
                    country: country.to_string(),
                    continent: region.name().to_string(),
                    temperature: reading(base_temp + 0.03 * t + 3.0 * season + rng.gauss(0.0, 0.6)),
                    co2: reading(370.0 + 2.1 * t + rng.gauss(0.0, 1.5)),
                    sea_level: reading(3.2 * t + rng.gauss(0.0, 2.0)),
                    precipitation: reading((80.0 + 30.0 * season + rng.gauss(0.0, 15.0)).max(0.0)),
                    humidity: reading((65.0 + 10.0 * season + rng.gauss(0.0, 5.0)).clamp(0.0, 100.0)),
                    wind_speed: reading((14.0 + rng.gauss(0.0, 3.0)).max(0.0)),
                };
                // Sprinkle malformed and missing measurements.
                if rng.next_f64() < 0.01 {
                    rec.co2 = Reading::Malformed("n/a");
                }
                if rng.next_f64() < 0.01 {
                    rec.temperature = Reading::Malformed("");
                }
                if rng.next_f64() < 0.02 {
                    rec.humidity = Reading::Missing;
                }
                records.push(rec);
            }
        }
    }

    // A record outside the known continents; the dashboard ignores it.
    records.push(Record {
        date: format!("{LAST_YEAR}-01-01"),
        year: LAST_YEAR,
        month: 1,
        country: "Research Station".into(),
        continent: "Antarctica".into(),
        temperature: Reading::Value(-25.0),
        co2: Reading::Value(400.0),
        sea_level: Reading::Missing,
        precipitation: Reading::Missing,
        humidity: Reading::Missing,
        wind_speed: Reading::Missing,
    });

    records
}

fn write_json(path: &Path, records: &[Record]) -> Result<()> {
    let file = std::fs::File::create(path).context("creating JSON output")?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), records).context("writing JSON")
}

fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    for rec in records {
        writer.serialize(rec).context("writing CSV record")?;
    }
    writer.flush().context("flushing CSV output")
}

fn write_parquet(path: &Path, records: &[Record]) -> Result<()> {
    let mut fields = vec![
        Field::new("date", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("month", DataType::Int64, false),
        Field::new("country", DataType::Utf8, false),
        Field::new("continent", DataType::Utf8, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.date.as_str()))),
        Arc::new(Int64Array::from_iter_values(records.iter().map(|r| r.year))),
        Arc::new(Int64Array::from_iter_values(records.iter().map(|r| r.month))),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.country.as_str()))),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.continent.as_str()))),
    ];
    for metric in Metric::ALL {
        fields.push(Field::new(metric.id(), DataType::Float64, true));
        columns.push(Arc::new(Float64Array::from_iter(
            records.iter().map(|r| r.metric(metric)),
        )));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let output = std::env::args().nth(1).unwrap_or_else(|| "climate_data.json".into());
    let path = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let records = generate(&mut rng);

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "json" => write_json(path, &records)?,
        "csv" => write_csv(path, &records)?,
        "parquet" | "pq" => write_parquet(path, &records)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    log::info!("Wrote {} records to {}", records.len(), path.display());
    println!("Wrote {} records to {output}", records.len());
    Ok(())
}
