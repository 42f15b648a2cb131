// Copyright (C) 2020-2026 Andy Kurnia.

// replay <input.csv> [half_life_seconds] [output.csv]
// input rows are timestamp_ns,value without a header.

use rtstats::{error, logging, realtime_value, return_error};
use std::str::FromStr;

fn main() -> error::Returns<()> {
    logging::init();
    let args = std::env::args().collect::<Vec<_>>();
    if args.len() < 2 || args.len() > 4 {
        return_error!("usage: replay <input.csv> [half_life_seconds] [output.csv]".into());
    }
    let half_life = match args.get(2) {
        Some(s) => f64::from_str(s)?,
        None => realtime_value::DEFAULT_HALF_LIFE_SECONDS,
    };
    if !(half_life.is_finite() && half_life > 0.0) {
        return_error!(format!("half-life must be positive, got {}", half_life));
    }

    let f = std::fs::File::open(&args[1])?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(f);
    let out: Box<dyn std::io::Write> = match args.get(3) {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    let mut csv_out = csv::Writer::from_writer(out);
    csv_out.write_record(["timestamp_ns", "value", "mean", "std", "weight"])?;

    let mut rv = realtime_value::RealtimeValue::<f64>::new(half_life);
    let mut num_rows = 0usize;
    for (row_num, result) in csv_reader.records().enumerate() {
        let record = result?;
        if record.len() != 2 {
            return_error!(format!(
                "row {}: expected 2 fields, got {}",
                row_num + 1,
                record.len()
            ));
        }
        let timestamp = u64::from_str(&record[0])?;
        let value = f64::from_str(&record[1])?;
        if timestamp < rv.timestamp() {
            tracing::warn!(row = row_num + 1, timestamp, "timestamp goes backwards");
        }
        rv.update_at(value, timestamp);
        csv_out.write_record(&[
            timestamp.to_string(),
            value.to_string(),
            rv.mean().to_string(),
            rv.std().to_string(),
            rv.weight().to_string(),
        ])?;
        num_rows += 1;
    }
    csv_out.flush()?;
    tracing::info!(num_rows, half_life, "replayed");

    Ok(())
}
