//! Batch trend extractor: melts a wide per-year land-cover area table into
//! long form, computes year-over-year and full-period percent change per
//! class, and writes the observation and trend tables (with the display
//! labels and colors a renderer needs) as JSON.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::Path;

use landcover_core::{
    class_trends, melt, signed_pct_label, taxonomy, year_from_column, AreaObservation,
    ClassTrend, CoarseClass, WideAreaRow,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "trends", about = "Compute per-class area trends from a wide per-year summary table")]
struct Args {
    /// Wide CSV with Value, CoverClass and per-year area columns.
    #[arg(short, long)]
    input: String,

    /// Output JSON file.
    #[arg(short, long, default_value = "data/area_trends.json")]
    output: String,

    /// Prefix of the per-year area columns.
    #[arg(long, default_value = landcover_core::timeseries::AREA_HA_PREFIX)]
    prefix: String,

    /// Color/label schema attached for the renderer: "general" or "nlcd".
    #[arg(long, default_value = "general")]
    schema: String,
}

// ── Input parsing ─────────────────────────────────────────────────────────────

fn read_wide_table(path: &str, prefix: &str) -> Result<Vec<WideAreaRow>> {
    let mut reader = csv::Reader::from_path(path).with_context(|| format!("opening {}", path))?;
    let headers = reader.headers()?.clone();
    let value_idx = headers
        .iter()
        .position(|h| h == "Value")
        .ok_or_else(|| anyhow!("{}: missing Value column", path))?;
    let label_idx = headers
        .iter()
        .position(|h| h == "CoverClass")
        .ok_or_else(|| anyhow!("{}: missing CoverClass column", path))?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading {} row {}", path, i + 2))?;
        let code: u16 = record[value_idx]
            .trim()
            .parse()
            .with_context(|| format!("{} row {}: bad Value", path, i + 2))?;
        let label = record[label_idx].trim().to_owned();

        let mut columns = Vec::new();
        for (idx, field) in record.iter().enumerate() {
            let name = &headers[idx];
            if year_from_column(name, prefix).is_none() {
                continue;
            }
            let value: f64 = field
                .trim()
                .parse()
                .with_context(|| format!("{} row {}: bad value in {}", path, i + 2, name))?;
            columns.push((name.to_owned(), value));
        }
        rows.push(WideAreaRow { code, label, columns });
    }
    Ok(rows)
}

// ── Output shape ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ObservationRow {
    #[serde(flatten)]
    obs: AreaObservation,
    /// Signed-percent display form of pct_change, when present.
    pct_label: Option<String>,
}

#[derive(Serialize)]
struct TrendRow {
    #[serde(flatten)]
    trend: ClassTrend,
    display_label: Option<String>,
    color: [u8; 3],
}

#[derive(Serialize)]
struct TrendReport {
    observations: Vec<ObservationRow>,
    trends: Vec<TrendRow>,
}

fn class_color(schema: &str, code: u16) -> [u8; 3] {
    match schema {
        "general" => taxonomy::general_color(code),
        _ => CoarseClass::of(code).color(),
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    if args.schema != "general" && args.schema != "nlcd" {
        bail!("unknown schema {:?} (expected \"general\" or \"nlcd\")", args.schema);
    }

    eprintln!("Reading area table from {} ...", args.input);
    let wide = read_wide_table(&args.input, &args.prefix)?;
    eprintln!("{} classes read.", wide.len());

    let obs = melt(&wide, &args.prefix);
    if obs.is_empty() {
        eprintln!("Warning: no {}* columns found; writing an empty report.", args.prefix);
    }
    let trends = class_trends(&obs);

    eprintln!("\n{:<24} {:>4}-{:<4} {:>14} {:>9}", "Class", "From", "To", "Change (ha)", "Pct");
    eprintln!("{}", "-".repeat(60));
    for t in &trends {
        let pct = t.pct_change.map(signed_pct_label).unwrap_or_else(|| "n/a".to_owned());
        eprintln!(
            "{:<24} {:>4}-{:<4} {:>14.1} {:>9}",
            t.label, t.first_year, t.last_year, t.area_change_ha, pct
        );
    }

    let report = TrendReport {
        observations: obs
            .into_iter()
            .map(|o| ObservationRow {
                pct_label: o.pct_change.map(signed_pct_label),
                obs: o,
            })
            .collect(),
        trends: trends
            .into_iter()
            .map(|t| TrendRow {
                display_label: t.pct_change.map(signed_pct_label),
                color: class_color(&args.schema, t.code),
                trend: t,
            })
            .collect(),
    };

    if let Some(dir) = Path::new(&args.output).parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&args.output, serde_json::to_string_pretty(&report)?)?;
    eprintln!("\nDone. {} trend rows in {}.", report.trends.len(), args.output);
    Ok(())
}
