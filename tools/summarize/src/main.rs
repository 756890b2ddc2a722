//! Batch gain/loss summarizer: reads a change-record CSV exported from a
//! change-detection attribute table, aggregates gains and losses relative to
//! a class-of-interest set, and writes the summary (per-direction or net)
//! as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use landcover_core::{aggregate, net, ChangeConfig, ChangeRecord, CoarseClass, Remap};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "summarize", about = "Aggregate land-cover change records into gain/loss summaries")]
struct Args {
    /// Change-record CSV with start_class, end_class, count, period columns.
    #[arg(short, long)]
    input: String,

    /// Output JSON file.
    #[arg(short, long, default_value = "data/change_summary.json")]
    output: String,

    /// Comma-separated class-of-interest codes.
    #[arg(long, default_value = "41,42,43,52,90")]
    interest: String,

    /// Comma-separated period labels to drop before aggregation.
    #[arg(long, default_value = "")]
    exclude: String,

    /// Display order for period labels.
    #[arg(long, default_value = "2001-2011,2011-2021,2001-2021")]
    periods: String,

    /// Display order for counterpart coarse categories.
    #[arg(long, default_value = "10,20,30,50,70,80,90")]
    categories: String,

    /// Hectares represented by one cell count (900 m² cells by default).
    #[arg(long, default_value_t = landcover_core::CELL_AREA_HA)]
    cell_area_ha: f64,

    /// Fold derived successional sub-types into their parent classes first.
    #[arg(long)]
    merge_successional: bool,

    /// Emit one signed net value per (category, period) instead of
    /// per-direction rows.
    #[arg(long)]
    net: bool,
}

// ── Input parsing ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawRecord {
    start_class: u16,
    end_class: u16,
    count: u64,
    period: String,
}

fn read_records(path: &str) -> Result<Vec<ChangeRecord>> {
    let mut reader = csv::Reader::from_path(path).with_context(|| format!("opening {}", path))?;
    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<RawRecord>().enumerate() {
        let raw = row.with_context(|| format!("reading {} row {}", path, i + 2))?;
        let rec = ChangeRecord::new(raw.start_class, raw.end_class, raw.count, &raw.period)
            .with_context(|| format!("{} row {}", path, i + 2))?;
        records.push(rec);
    }
    Ok(records)
}

fn parse_codes(s: &str) -> Result<Vec<u16>> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<u16>()
                .with_context(|| format!("invalid class code {:?}", t))
        })
        .collect()
}

fn parse_labels(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    eprintln!("Reading change records from {} ...", args.input);
    let mut records = read_records(&args.input)?;
    eprintln!("{} records read.", records.len());

    if args.merge_successional {
        Remap::merge_successional().apply_all(&mut records);
    }

    let config = ChangeConfig {
        interest: parse_codes(&args.interest)?.into_iter().collect(),
        excluded_periods: parse_labels(&args.exclude).into_iter().collect(),
        period_order: parse_labels(&args.periods),
        category_order: parse_codes(&args.categories)?
            .into_iter()
            .map(CoarseClass)
            .collect(),
        cell_area_ha: args.cell_area_ha,
    };

    let rows = aggregate(&records, &config)?;
    if rows.is_empty() {
        eprintln!("Warning: no records matched the filters; writing an empty summary.");
    }

    if let Some(dir) = Path::new(&args.output).parent() {
        fs::create_dir_all(dir)?;
    }

    if args.net {
        let net_rows = net(&rows, &config)?;
        eprintln!("\n{:<12} {:<14} {:>4} {:>12}", "Period", "Span", "Cat", "Net ha");
        eprintln!("{}", "-".repeat(46));
        for row in &net_rows {
            eprintln!(
                "{:<12} {:<14} {:>4} {:>12.2}",
                row.period, row.span, row.category, row.net_ha
            );
        }
        fs::write(&args.output, serde_json::to_string_pretty(&net_rows)?)?;
        eprintln!("\nDone. {} net rows in {}.", net_rows.len(), args.output);
    } else {
        eprintln!("\n{:<12} {:<5} {:>4} {:>12} {:>8}", "Period", "Dir", "Cat", "Hectares", "Pct");
        eprintln!("{}", "-".repeat(46));
        for row in &rows {
            eprintln!(
                "{:<12} {:<5} {:>4} {:>12.2} {:>7.2}%",
                row.period, row.direction, row.category, row.area_ha, row.pct_of_period_total
            );
        }
        fs::write(&args.output, serde_json::to_string_pretty(&rows)?)?;
        eprintln!("\nDone. {} summary rows in {}.", rows.len(), args.output);
    }

    Ok(())
}
