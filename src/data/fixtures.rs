//! Built-in sample datasets.
//!
//! Twelve month-end observations for calendar 2023 per series, plus a short
//! announcement feed. The values are illustrative, not official statistics.

use chrono::{Days, NaiveDate};

use super::model::{Announcement, Category, Impact, TimeSeries};
use crate::error::EngineError;

/// Version tag of the fixture set below. Bump when any value changes.
pub const FIXTURE_VERSION: &str = "sample-2023.1";

/// Month-end dates for 2023.
pub fn month_ends_2023() -> Vec<NaiveDate> {
    (1..=12)
        .filter_map(|m| {
            let first_of_next = if m == 12 {
                NaiveDate::from_ymd_opt(2024, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(2023, m + 1, 1)
            };
            first_of_next?.pred_opt()
        })
        .collect()
}

fn build(name: &str, columns: Vec<(&str, Vec<f64>)>) -> Result<TimeSeries, EngineError> {
    TimeSeries::from_columns(name, &month_ends_2023(), columns)
}

pub fn policy_rates() -> Result<TimeSeries, EngineError> {
    build(
        "policy_rates",
        vec![
            ("Repo Rate", vec![6.0, 6.25, 6.25, 6.5, 6.5, 6.75, 6.75, 7.0, 7.0, 7.25, 7.25, 7.5]),
            (
                "Reverse Repo Rate",
                vec![5.5, 5.75, 5.75, 6.0, 6.0, 6.25, 6.25, 6.5, 6.5, 6.75, 6.75, 7.0],
            ),
            ("CRR", vec![4.0; 12]),
            ("SLR", vec![18.0; 12]),
        ],
    )
}

pub fn inflation() -> Result<TimeSeries, EngineError> {
    build(
        "inflation",
        vec![
            ("CPI", vec![5.0, 5.1, 5.2, 5.0, 5.3, 5.4, 5.5, 5.2, 5.1, 5.0, 4.9, 4.8]),
            ("WPI", vec![3.5, 3.6, 3.7, 3.6, 3.5, 3.4, 3.5, 3.6, 3.7, 3.6, 3.5, 3.4]),
            ("Food Inflation", vec![4.0, 4.2, 4.1, 4.3, 4.0, 4.1, 4.2, 4.0, 3.9, 4.0, 4.1, 4.2]),
            ("Fuel", vec![3.1, 3.0, 2.9, 2.8, 3.0, 3.2, 3.1, 3.0, 3.2, 3.1, 3.0, 2.9]),
            ("Housing", vec![4.6, 4.7, 4.6, 4.8, 4.7, 4.6, 4.7, 4.6, 4.8, 4.7, 4.6, 4.5]),
            ("Clothing", vec![3.5, 3.6, 3.4, 3.5, 3.6, 3.7, 3.5, 3.4, 3.5, 3.6, 3.7, 3.5]),
        ],
    )
}

pub fn liquidity() -> Result<TimeSeries, EngineError> {
    build(
        "liquidity",
        vec![
            (
                "Liquidity (₹ Cr)",
                vec![
                    500000.0, 520000.0, 510000.0, 530000.0, 540000.0, 550000.0, 560000.0,
                    570000.0, 580000.0, 590000.0, 600000.0, 610000.0,
                ],
            ),
            ("Credit Growth (%)", vec![7.0, 7.2, 7.1, 7.3, 7.5, 7.6, 7.8, 7.7, 7.9, 8.0, 8.2, 8.3]),
            ("Call Rate (%)", vec![5.9, 6.0, 6.1, 6.0, 6.2, 6.3, 6.2, 6.1, 6.4, 6.5, 6.3, 6.4]),
            ("M1", vec![45.0, 46.0, 46.3, 46.8, 47.0, 47.5, 48.0, 48.3, 48.7, 49.0, 49.3, 50.0]),
            (
                "M3",
                vec![
                    150.0, 151.0, 152.0, 153.0, 153.5, 154.0, 155.0, 156.0, 157.0, 158.0, 159.0,
                    160.0,
                ],
            ),
            ("Yield 3M", vec![6.1, 6.2, 6.2, 6.3, 6.3, 6.4, 6.4, 6.5, 6.5, 6.6, 6.6, 6.7]),
            ("Yield 1Y", vec![6.4, 6.4, 6.5, 6.5, 6.6, 6.6, 6.7, 6.7, 6.8, 6.8, 6.9, 7.0]),
            ("Yield 5Y", vec![7.0, 7.0, 7.1, 7.1, 7.2, 7.3, 7.3, 7.4, 7.5, 7.5, 7.6, 7.7]),
            ("Yield 10Y", vec![7.3, 7.3, 7.4, 7.5, 7.5, 7.6, 7.7, 7.7, 7.8, 7.9, 7.9, 8.0]),
        ],
    )
}

pub fn forex() -> Result<TimeSeries, EngineError> {
    build(
        "forex",
        vec![
            (
                "Forex Reserves (USD bn)",
                vec![
                    600.0, 605.0, 610.0, 615.0, 620.0, 625.0, 630.0, 635.0, 640.0, 645.0, 650.0,
                    655.0,
                ],
            ),
            (
                "USD/INR",
                vec![75.0, 75.2, 75.5, 75.3, 75.1, 74.9, 75.0, 75.2, 75.4, 75.3, 75.5, 75.6],
            ),
        ],
    )
}

pub fn economy() -> Result<TimeSeries, EngineError> {
    build(
        "economy",
        vec![
            ("GDP Growth (%)", vec![6.0, 6.1, 6.2, 6.0, 5.9, 6.0, 6.1, 6.2, 6.3, 6.1, 6.0, 5.9]),
            ("IIP (%)", vec![4.0, 4.1, 4.2, 4.0, 3.9, 4.0, 4.1, 4.2, 4.3, 4.1, 4.0, 3.9]),
        ],
    )
}

/// Eight announcements, one every 45 days from 2023-01-01.
pub fn announcements() -> Vec<Announcement> {
    use Category::*;
    use Impact::*;

    let entries = [
        (PolicyRate, "Repo Rate increased by 25 bps", Increase),
        (Liquidity, "Liquidity injection of ₹50,000 Cr", Positive),
        (Regulatory, "Guidelines revised for NBFCs", Neutral),
        (PolicyRate, "Repo Rate unchanged", Neutral),
        (Liquidity, "CRR reduced by 50 bps", Decrease),
        (Banking, "SLR increased by 50 bps", Increase),
        (Regulatory, "KYC rules simplified for small accounts", Neutral),
        (PolicyRate, "Reverse Repo Rate unchanged", Neutral),
    ];

    let Some(start) = NaiveDate::from_ymd_opt(2023, 1, 1) else {
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(i, (category, text, impact))| {
            let date = start.checked_add_days(Days::new(45 * i as u64))?;
            Some(Announcement {
                date,
                category: *category,
                text: text.to_string(),
                impact: *impact,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_ends_cover_2023() {
        let dates = month_ends_2023();
        assert_eq!(dates.len(), 12);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2023, 1, 31).unwrap());
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
        assert_eq!(dates[11], NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn every_fixture_builds_with_twelve_rows() {
        for series in [policy_rates(), inflation(), liquidity(), forex(), economy()] {
            let series = series.unwrap();
            assert_eq!(series.len(), 12, "{}", series.name());
        }
    }

    #[test]
    fn announcements_are_spaced_45_days_apart() {
        let items = announcements();
        assert_eq!(items.len(), 8);
        assert_eq!(items[1].date, NaiveDate::from_ymd_opt(2023, 2, 15).unwrap());
        assert_eq!(items[7].date, NaiveDate::from_ymd_opt(2023, 11, 12).unwrap());
    }
}
