//! Gain/loss change aggregation relative to a class-of-interest set.
//!
//! A record counts only when the class-of-interest set appears on exactly one
//! side of the transition; both-in and both-out rows represent no net change
//! relative to the set and are dropped. The retained side's counterpart class
//! is bucketed into its coarse category, counts are summed per
//! (category, direction, period), and cell counts are converted to hectares.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ChangeError;
use crate::record::{parse_period, ChangeRecord};
use crate::taxonomy::CoarseClass;

/// One 900 m² NLCD cell in hectares.
pub const CELL_AREA_HA: f64 = 0.09;
/// One 900 m² NLCD cell in acres.
pub const CELL_AREA_AC: f64 = 0.2223948429;

/// Whether area moved away from or toward the class-of-interest set.
/// Loss sorts (and displays) before Gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Loss,
    Gain,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Direction::Loss => "Loss",
            Direction::Gain => "Gain",
        })
    }
}

/// Aggregation settings.
///
/// The period and category orders are presentation concerns, but every period
/// and counterpart category reaching the output must be declared in them; an
/// absent entry is a configuration mismatch and surfaces as a [`ChangeError`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeConfig {
    /// Fine codes whose gain/loss is being measured.
    pub interest: BTreeSet<u16>,
    /// Period labels dropped before aggregation.
    pub excluded_periods: BTreeSet<String>,
    /// Display order for period labels.
    pub period_order: Vec<String>,
    /// Display order for counterpart coarse categories.
    pub category_order: Vec<CoarseClass>,
    /// Hectares represented by one cell count.
    pub cell_area_ha: f64,
}

impl Default for ChangeConfig {
    /// Calibrated to the forest-change run of the 2021-edition product:
    /// forest interest set, 900 m² cells, the three analysis periods.
    fn default() -> Self {
        Self {
            interest: BTreeSet::from([41, 42, 43, 52, 90]),
            excluded_periods: BTreeSet::new(),
            period_order: vec![
                "2001-2011".to_owned(),
                "2011-2021".to_owned(),
                "2001-2021".to_owned(),
            ],
            category_order: [10, 20, 30, 50, 70, 80, 90]
                .into_iter()
                .map(CoarseClass)
                .collect(),
            cell_area_ha: CELL_AREA_HA,
        }
    }
}

/// One aggregated (category, direction, period) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummaryRow {
    /// Coarse category of the non-interest side of the transition.
    pub category: CoarseClass,
    pub direction: Direction,
    pub period: String,
    pub area_ha: f64,
    /// Share of this period's retained cell count, in percent.
    pub pct_of_period_total: f64,
}

/// Whether a period covers the dataset's full year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodSpan {
    Full,
    Intermediate,
}

impl fmt::Display for PeriodSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            PeriodSpan::Full => "Full period",
            PeriodSpan::Intermediate => "Intermediate",
        })
    }
}

/// One signed net-change value per (category, period).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetChangeRow {
    pub category: CoarseClass,
    pub period: String,
    pub span: PeriodSpan,
    /// Gain minus Loss in hectares.
    pub net_ha: f64,
}

/// Aggregate change records into per-direction summary rows.
///
/// Records in an excluded period, and records whose interest-set membership is
/// the same on both sides, are dropped. An empty result is not an error.
pub fn aggregate(
    records: &[ChangeRecord],
    config: &ChangeConfig,
) -> Result<Vec<ChangeSummaryRow>, ChangeError> {
    let mut groups: BTreeMap<(String, Direction, CoarseClass), u64> = BTreeMap::new();
    let mut period_totals: BTreeMap<String, u64> = BTreeMap::new();

    for r in records {
        if config.excluded_periods.contains(&r.period) {
            continue;
        }
        let start_in = config.interest.contains(&r.start_class);
        let end_in = config.interest.contains(&r.end_class);
        if start_in == end_in {
            continue;
        }
        // Start side in the interest set means the area transitioned away
        // from it: a loss. The counterpart class names the category.
        let (direction, counterpart) = if start_in {
            (Direction::Loss, r.end_class)
        } else {
            (Direction::Gain, r.start_class)
        };
        let key = (r.period.clone(), direction, CoarseClass::of(counterpart));
        *groups.entry(key).or_default() += r.count;
        *period_totals.entry(r.period.clone()).or_default() += r.count;
    }

    let mut rows = Vec::with_capacity(groups.len());
    for ((period, direction, category), count) in groups {
        let total = period_totals[&period];
        let pct = if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        };
        rows.push(ChangeSummaryRow {
            category,
            direction,
            area_ha: count as f64 * config.cell_area_ha,
            pct_of_period_total: pct,
            period,
        });
    }

    sort_for_display(&mut rows, config, |r| (&r.period, r.direction, r.category))?;
    Ok(rows)
}

/// Collapse per-direction rows into one signed value per (category, period).
///
/// Loss areas are negated before summation. A period equal to the min-start ..
/// max-end range of all input periods is bucketed as [`PeriodSpan::Full`].
pub fn net(
    rows: &[ChangeSummaryRow],
    config: &ChangeConfig,
) -> Result<Vec<NetChangeRow>, ChangeError> {
    let mut range: Option<(u16, u16)> = None;
    let mut groups: BTreeMap<(String, CoarseClass), f64> = BTreeMap::new();

    for row in rows {
        let (start, end) = parse_period(&row.period)?;
        range = Some(match range {
            None => (start, end),
            Some((lo, hi)) => (lo.min(start), hi.max(end)),
        });
        let signed = match row.direction {
            Direction::Loss => -row.area_ha,
            Direction::Gain => row.area_ha,
        };
        *groups.entry((row.period.clone(), row.category)).or_default() += signed;
    }

    let Some(full_range) = range else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(groups.len());
    for ((period, category), net_ha) in groups {
        let span = if parse_period(&period)? == full_range {
            PeriodSpan::Full
        } else {
            PeriodSpan::Intermediate
        };
        out.push(NetChangeRow {
            category,
            span,
            net_ha,
            period,
        });
    }

    sort_for_display(&mut out, config, |r| {
        (&r.period, Direction::Loss, r.category)
    })?;
    Ok(out)
}

/// Sort rows by (period order, direction, category order), surfacing any
/// period or category missing from the configured orders.
fn sort_for_display<T>(
    rows: &mut Vec<T>,
    config: &ChangeConfig,
    key: impl Fn(&T) -> (&String, Direction, CoarseClass),
) -> Result<(), ChangeError> {
    let mut keyed = Vec::with_capacity(rows.len());
    for row in rows.drain(..) {
        let (period, direction, category) = key(&row);
        let p = config
            .period_order
            .iter()
            .position(|x| x == period)
            .ok_or_else(|| ChangeError::UnknownPeriod(period.clone()))?;
        let c = config
            .category_order
            .iter()
            .position(|x| *x == category)
            .ok_or(ChangeError::UnknownCategory(category))?;
        keyed.push(((p, direction, c), row));
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    rows.extend(keyed.into_iter().map(|(_, row)| row));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rec(start: u16, end: u16, count: u64, period: &str) -> ChangeRecord {
        ChangeRecord::new(start, end, count, period).unwrap()
    }

    #[test]
    fn forest_to_developed_worked_example() {
        let records = vec![rec(41, 21, 100, "2001-2011"), rec(21, 41, 50, "2001-2011")];
        let rows = aggregate(&records, &ChangeConfig::default()).unwrap();

        assert_eq!(rows.len(), 2);
        // Loss sorts before Gain
        assert_eq!(rows[0].category, CoarseClass(20));
        assert_eq!(rows[0].direction, Direction::Loss);
        assert_relative_eq!(rows[0].area_ha, 9.0);
        assert_eq!(rows[1].direction, Direction::Gain);
        assert_relative_eq!(rows[1].area_ha, 4.5);
    }

    #[test]
    fn summed_area_is_cell_area_times_count() {
        // duplicates of the same key are summed, not deduplicated
        let records = vec![
            rec(41, 21, 30, "2001-2011"),
            rec(41, 21, 70, "2001-2011"),
            rec(42, 22, 11, "2001-2011"),
        ];
        let rows = aggregate(&records, &ChangeConfig::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_relative_eq!(rows[0].area_ha, 111.0 * CELL_AREA_HA);
        assert_relative_eq!(rows[0].pct_of_period_total, 100.0);
    }

    #[test]
    fn both_in_or_both_out_records_never_appear() {
        let records = vec![
            rec(41, 42, 500, "2001-2011"), // both in the interest set
            rec(21, 22, 500, "2001-2011"), // both outside it
        ];
        let rows = aggregate(&records, &ChangeConfig::default()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn excluded_period_never_appears() {
        let mut config = ChangeConfig::default();
        config.excluded_periods.insert("2011-2021".to_owned());
        let records = vec![
            rec(41, 21, 100, "2001-2011"),
            rec(41, 21, 100, "2011-2021"),
            rec(21, 41, 100, "2011-2021"),
        ];
        let rows = aggregate(&records, &config).unwrap();
        assert!(rows.iter().all(|r| r.period != "2011-2021"));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn empty_input_degrades_to_empty_summary() {
        let config = ChangeConfig::default();
        assert!(aggregate(&[], &config).unwrap().is_empty());
        assert!(net(&[], &config).unwrap().is_empty());
    }

    #[test]
    fn rows_sorted_by_period_direction_category() {
        let records = vec![
            rec(82, 41, 10, "2011-2021"),
            rec(41, 21, 10, "2011-2021"),
            rec(21, 41, 10, "2001-2011"),
            rec(41, 82, 10, "2011-2021"),
        ];
        let rows = aggregate(&records, &ChangeConfig::default()).unwrap();
        let order: Vec<(&str, Direction, u16)> = rows
            .iter()
            .map(|r| (r.period.as_str(), r.direction, r.category.0))
            .collect();
        assert_eq!(
            order,
            vec![
                ("2001-2011", Direction::Gain, 20),
                ("2011-2021", Direction::Loss, 20),
                ("2011-2021", Direction::Loss, 80),
                ("2011-2021", Direction::Gain, 80),
            ]
        );
    }

    #[test]
    fn undeclared_category_is_a_config_error() {
        let mut config = ChangeConfig::default();
        config.category_order = vec![CoarseClass(10)];
        let records = vec![rec(41, 21, 10, "2001-2011")];
        assert_eq!(
            aggregate(&records, &config),
            Err(ChangeError::UnknownCategory(CoarseClass(20)))
        );
    }

    #[test]
    fn undeclared_period_is_a_config_error() {
        let records = vec![rec(41, 21, 10, "1992-2001")];
        assert_eq!(
            aggregate(&records, &ChangeConfig::default()),
            Err(ChangeError::UnknownPeriod("1992-2001".to_owned()))
        );
    }

    #[test]
    fn net_matches_regrouped_signed_sums() {
        let config = ChangeConfig::default();
        let records = vec![
            rec(41, 21, 120, "2001-2011"),
            rec(21, 41, 80, "2001-2011"),
            rec(41, 82, 40, "2001-2011"),
            rec(41, 21, 300, "2001-2021"),
            rec(21, 90, 50, "2001-2021"),
        ];
        let rows = aggregate(&records, &config).unwrap();
        let nets = net(&rows, &config).unwrap();

        for n in &nets {
            let expected: f64 = rows
                .iter()
                .filter(|r| r.period == n.period && r.category == n.category)
                .map(|r| match r.direction {
                    Direction::Loss => -r.area_ha,
                    Direction::Gain => r.area_ha,
                })
                .sum();
            assert_relative_eq!(n.net_ha, expected);
        }

        // Developed 2001-2011: gain 80 cells, loss 120 cells -> net -40 cells
        let dev = nets
            .iter()
            .find(|n| n.period == "2001-2011" && n.category == CoarseClass(20))
            .unwrap();
        assert_relative_eq!(dev.net_ha, -40.0 * CELL_AREA_HA, epsilon = 1e-9);
    }

    #[test]
    fn full_range_period_is_bucketed_as_full() {
        let config = ChangeConfig::default();
        let records = vec![
            rec(41, 21, 10, "2001-2011"),
            rec(41, 21, 10, "2011-2021"),
            rec(41, 21, 10, "2001-2021"),
        ];
        let nets = net(&aggregate(&records, &config).unwrap(), &config).unwrap();
        for n in &nets {
            let expected = if n.period == "2001-2021" {
                PeriodSpan::Full
            } else {
                PeriodSpan::Intermediate
            };
            assert_eq!(n.span, expected, "period {}", n.period);
        }
    }

    #[test]
    fn period_shares_sum_to_one_hundred() {
        let records = vec![
            rec(41, 21, 25, "2001-2011"),
            rec(41, 82, 25, "2001-2011"),
            rec(21, 41, 50, "2001-2011"),
        ];
        let rows = aggregate(&records, &ChangeConfig::default()).unwrap();
        let total: f64 = rows.iter().map(|r| r.pct_of_period_total).sum();
        assert_relative_eq!(total, 100.0);
        assert!(rows.iter().all(|r| r.area_ha >= 0.0));
    }
}
