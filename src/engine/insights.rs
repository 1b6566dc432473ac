//! Headline figures for each tab: KPI cards, trend labels and small tables.

use std::fmt;

use chrono::NaiveDate;

use super::SeriesView;
use super::summary::round_to;
use crate::data::source::DatasetId;

/// What, if anything, a KPI card shows under its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    None,
    /// Absolute change from the previous row (MoM).
    Delta,
    /// Percentage change from the previous row.
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KpiSpec {
    pub field: &'static str,
    pub label: &'static str,
    pub change: ChangeKind,
}

const fn kpi(field: &'static str, label: &'static str, change: ChangeKind) -> KpiSpec {
    KpiSpec {
        field,
        label,
        change,
    }
}

const POLICY_RATE_KPIS: &[KpiSpec] = &[
    kpi("Repo Rate", "Repo Rate (%)", ChangeKind::None),
    kpi("Reverse Repo Rate", "Reverse Repo Rate (%)", ChangeKind::None),
    kpi("CRR", "CRR (%)", ChangeKind::None),
    kpi("SLR", "SLR (%)", ChangeKind::None),
];

const INFLATION_KPIS: &[KpiSpec] = &[
    kpi("CPI", "CPI (%)", ChangeKind::Delta),
    kpi("WPI", "WPI (%)", ChangeKind::Delta),
    kpi("Food Inflation", "Food Inflation (%)", ChangeKind::Delta),
];

const LIQUIDITY_KPIS: &[KpiSpec] = &[
    kpi("Liquidity (₹ Cr)", "Liquidity (₹ Cr)", ChangeKind::None),
    kpi("Credit Growth (%)", "Credit Growth (%)", ChangeKind::None),
    kpi("Call Rate (%)", "Call Rate (%)", ChangeKind::None),
    kpi("M3", "M3 (₹ Lakh Cr)", ChangeKind::None),
];

const FOREX_KPIS: &[KpiSpec] = &[
    kpi("Forex Reserves (USD bn)", "Forex Reserves (USD bn)", ChangeKind::None),
    kpi("USD/INR", "USD/INR Rate", ChangeKind::None),
];

const ECONOMY_KPIS: &[KpiSpec] = &[
    kpi("GDP Growth (%)", "GDP Growth (%)", ChangeKind::Percent),
    kpi("IIP (%)", "IIP (%)", ChangeKind::Percent),
];

/// KPI cards shown at the top of each tab, left to right.
pub fn kpi_specs(id: DatasetId) -> &'static [KpiSpec] {
    match id {
        DatasetId::PolicyRates => POLICY_RATE_KPIS,
        DatasetId::Inflation => INFLATION_KPIS,
        DatasetId::Liquidity => LIQUIDITY_KPIS,
        DatasetId::Forex => FOREX_KPIS,
        DatasetId::Economy => ECONOMY_KPIS,
    }
}

/// A rendered KPI card.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpi {
    pub label: &'static str,
    pub value: f64,
    pub change_kind: ChangeKind,
    /// `None` when the kind is `None`, or the change is undefined (single
    /// row, or a percentage after a zero).
    pub change: Option<f64>,
}

impl Kpi {
    /// Text under the value, e.g. `+0.1` or `-1.64% YoY`.
    pub fn change_text(&self) -> Option<String> {
        match self.change_kind {
            ChangeKind::None => None,
            ChangeKind::Delta => Some(match self.change {
                Some(d) => format!("{d:+.1}"),
                None => "n/a".to_string(),
            }),
            ChangeKind::Percent => Some(match self.change {
                Some(p) => format!("{p:.2}% YoY"),
                None => "n/a".to_string(),
            }),
        }
    }
}

/// Build the KPI cards of `id` from its computed view.
///
/// Fields missing from the view (a file source with a different schema) are
/// skipped.
pub fn kpis(id: DatasetId, view: &SeriesView) -> Vec<Kpi> {
    kpi_specs(id)
        .iter()
        .filter_map(|spec| {
            let summary = view.summary(spec.field)?;
            let derived = view.derived.get(spec.field)?;
            let last = |col: &[Option<f64>]| col.last().copied().flatten();
            let change = match spec.change {
                ChangeKind::None => None,
                ChangeKind::Delta => last(&derived.delta),
                ChangeKind::Percent => last(&derived.pct_change),
            };
            Some(Kpi {
                label: spec.label,
                value: summary.latest_value(),
                change_kind: spec.change,
                change,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Trend labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
    Flat,
    Expanding,
    Cooling,
}

impl Trend {
    /// Latest value against the previous row. `None` with fewer than two rows.
    pub fn momentum(view: &SeriesView, field: &str) -> Option<Trend> {
        let delta = view.derived.get(field)?.delta.last().copied().flatten()?;
        Some(if delta > 0.0 {
            Trend::Rising
        } else if delta < 0.0 {
            Trend::Falling
        } else {
            Trend::Flat
        })
    }

    /// Expanding when the latest value is above the subset mean.
    pub fn against_mean(view: &SeriesView, field: &str) -> Option<Trend> {
        let s = view.summary(field)?;
        Some(if s.latest_value() > s.mean {
            Trend::Expanding
        } else {
            Trend::Cooling
        })
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Flat => "flat",
            Trend::Expanding => "Expanding 📈",
            Trend::Cooling => "Cooling 📉",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Summary tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub metric: String,
    pub value: f64,
}

/// Average (2 decimals), minimum and maximum for each `(field, label)`.
pub fn stats_table(view: &SeriesView, fields: &[(&str, &str)]) -> Vec<TableRow> {
    let mut rows = Vec::new();
    for (field, label) in fields {
        let Some(s) = view.summary(field) else {
            continue;
        };
        rows.push(TableRow {
            metric: format!("Avg {label}"),
            value: round_to(s.mean, 2),
        });
        rows.push(TableRow {
            metric: format!("Min {label}"),
            value: s.min,
        });
        rows.push(TableRow {
            metric: format!("Max {label}"),
            value: s.max,
        });
    }
    rows
}

/// Latest value for each `(field, label)`.
pub fn latest_table(view: &SeriesView, fields: &[(&str, &str)]) -> Vec<TableRow> {
    fields
        .iter()
        .filter_map(|(field, label)| {
            let s = view.summary(field)?;
            Some(TableRow {
                metric: label.to_string(),
                value: s.latest_value(),
            })
        })
        .collect()
}

/// One observation of a [`DerivedTable`]; `cells` follow its headers after
/// the date.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRow {
    pub date: NaiveDate,
    pub cells: Vec<Option<f64>>,
}

/// A row-per-observation table of raw values followed by their rolling means.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTable {
    pub headers: Vec<String>,
    pub rows: Vec<DerivedRow>,
}

/// Value and rolling mean of each `(field, label)` for every row of the
/// subset, rounded to 2 decimals. Rolling means inside the leading window are
/// `None`. Fields the view does not have are skipped.
pub fn derived_table(view: &SeriesView, fields: &[(&str, &str)]) -> DerivedTable {
    let known: Vec<_> = fields
        .iter()
        .filter_map(|(field, label)| {
            let values = view.subset.values(field).ok()?;
            let rolling = &view.derived.get(field)?.rolling_mean;
            Some((*label, values, rolling))
        })
        .collect();

    let mut headers = vec!["Date".to_string()];
    headers.extend(known.iter().map(|(label, ..)| label.to_string()));
    headers.extend(
        known
            .iter()
            .map(|(label, ..)| format!("{label} {}M Avg", view.derived.window)),
    );

    let rows = view
        .subset
        .dates()
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let raw = known.iter().map(|(_, values, _)| Some(values[i]));
            let avg = known.iter().map(|(.., rolling)| rolling[i]);
            DerivedRow {
                date,
                cells: raw.chain(avg).map(|c| c.map(|v| round_to(v, 2))).collect(),
            }
        })
        .collect();

    DerivedTable { headers, rows }
}
