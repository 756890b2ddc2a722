//! Year-over-year and full-period change over a wide per-year area table.
//!
//! The wide table has one row per class and one area column per year,
//! recognized by a fixed prefix followed by a 4-digit year ("Area_ha_2001").
//! Melting produces one observation per (class, year) in chronological order,
//! with lag-based percent change filled per class.

use serde::{Deserialize, Serialize};

/// Prefix of hectare-denominated per-year columns.
pub const AREA_HA_PREFIX: &str = "Area_ha_";
/// Prefix of acre-denominated per-year columns in the same table shape.
pub const AREA_AC_PREFIX: &str = "Area_ac_";

/// Extract the 4-digit year suffix from a recognized area column name.
pub fn year_from_column(name: &str, prefix: &str) -> Option<u16> {
    let rest = name.strip_prefix(prefix)?;
    if rest.len() != 4 || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// One wide-table row: a class plus its raw (column name, value) pairs.
/// Only columns matching the year-area pattern take part in the melt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WideAreaRow {
    pub code: u16,
    pub label: String,
    pub columns: Vec<(String, f64)>,
}

/// One long-form observation: a class's area in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaObservation {
    pub code: u16,
    pub label: String,
    pub year: u16,
    pub area_ha: f64,
    /// Percent change from the class's prior year, rounded to 2 decimals.
    /// None for the class's first year and when the prior-year area is zero.
    pub pct_change: Option<f64>,
}

/// Per-class first-to-last summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassTrend {
    pub code: u16,
    pub label: String,
    pub first_year: u16,
    pub last_year: u16,
    /// Absolute change, last year minus first year.
    pub area_change_ha: f64,
    /// Full-period percent change, rounded to 2 decimals. None with a single
    /// year of data or a zero first-year area.
    pub pct_change: Option<f64>,
    /// Median (year, area) position, used only for label placement by the
    /// rendering collaborator.
    pub anchor_year: f64,
    pub anchor_area_ha: f64,
}

/// Reshape a wide per-year table to long form, sorted ascending by
/// (class, year), with year-over-year percent change filled in.
pub fn melt(rows: &[WideAreaRow], prefix: &str) -> Vec<AreaObservation> {
    let mut obs = Vec::new();
    for row in rows {
        for (name, value) in &row.columns {
            if let Some(year) = year_from_column(name, prefix) {
                obs.push(AreaObservation {
                    code: row.code,
                    label: row.label.clone(),
                    year,
                    area_ha: *value,
                    pct_change: None,
                });
            }
        }
    }
    obs.sort_by(|a, b| (a.code, a.year).cmp(&(b.code, b.year)));
    fill_pct_change(&mut obs);
    obs
}

/// Lag-based percent change over (class, year)-sorted observations.
fn fill_pct_change(obs: &mut [AreaObservation]) {
    for i in 1..obs.len() {
        if obs[i].code != obs[i - 1].code {
            continue;
        }
        let prior = obs[i - 1].area_ha;
        if prior == 0.0 {
            continue;
        }
        obs[i].pct_change = Some(round2((obs[i].area_ha - prior) / prior * 100.0));
    }
}

/// Per-class full-period summaries over melted observations.
pub fn class_trends(obs: &[AreaObservation]) -> Vec<ClassTrend> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < obs.len() {
        let mut j = i;
        while j < obs.len() && obs[j].code == obs[i].code {
            j += 1;
        }
        let class = &obs[i..j];
        let first = &class[0];
        let last = &class[class.len() - 1];

        let pct_change = if class.len() < 2 || first.area_ha == 0.0 {
            None
        } else {
            Some(round2(
                (last.area_ha - first.area_ha) / first.area_ha * 100.0,
            ))
        };

        // years arrive sorted from melt; areas need their own ordering
        let years: Vec<f64> = class.iter().map(|o| o.year as f64).collect();
        let mut areas: Vec<f64> = class.iter().map(|o| o.area_ha).collect();
        areas.sort_by(f64::total_cmp);

        out.push(ClassTrend {
            code: first.code,
            label: first.label.clone(),
            first_year: first.year,
            last_year: last.year,
            area_change_ha: last.area_ha - first.area_ha,
            pct_change,
            anchor_year: median(&years),
            anchor_area_ha: median(&areas),
        });
        i = j;
    }
    out
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Round to 2 decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Signed-percentage display label: "+" prefix when positive, the signed
/// number otherwise, both followed by "%".
pub fn signed_pct_label(pct: f64) -> String {
    if pct > 0.0 {
        format!("+{}%", pct)
    } else {
        format!("{}%", pct)
    }
}
