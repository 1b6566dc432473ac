use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, LineStyle, Plot, PlotPoints, Points};

use rbi_dashboard::engine::SeriesView;

use crate::color::{SeriesColors, heat_color};

const CHART_HEIGHT: f32 = 260.0;

/// Bar width in days; month-end rows are roughly 30 days apart.
const BAR_SPAN_DAYS: f64 = 24.0;

// ---------------------------------------------------------------------------
// Date axis
// ---------------------------------------------------------------------------

fn date_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn format_date_mark(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_default()
}

fn date_plot(id: &str, y_label: &str) -> Plot<'static> {
    Plot::new(id.to_string())
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_formatter(format_date_mark)
        .y_axis_label(y_label.to_string())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// One line per field, optionally with its rolling mean as a dashed overlay.
pub fn line_chart(
    ui: &mut Ui,
    id: &str,
    view: &SeriesView,
    fields: &[&str],
    y_label: &str,
    with_rolling: bool,
) {
    let colors = SeriesColors::new(fields);
    let dates = view.subset.dates();
    let window = view.derived.window;

    date_plot(id, y_label).show(ui, |plot_ui| {
        for field in fields {
            let Ok(values) = view.subset.values(field) else {
                continue;
            };
            let color = colors.color_for(field);

            let points: PlotPoints = dates
                .iter()
                .zip(&values)
                .map(|(d, v)| [date_x(*d), *v])
                .collect();
            plot_ui.line(Line::new(points).name(*field).color(color).width(2.0));

            let markers: PlotPoints = dates
                .iter()
                .zip(&values)
                .map(|(d, v)| [date_x(*d), *v])
                .collect();
            plot_ui.points(Points::new(markers).color(color).radius(3.0));

            if !with_rolling {
                continue;
            }
            let Some(derived) = view.derived.get(field) else {
                continue;
            };
            // Leading entries without a full window are skipped.
            let rolling: PlotPoints = dates
                .iter()
                .zip(&derived.rolling_mean)
                .filter_map(|(d, v)| v.map(|v| [date_x(*d), v]))
                .collect();
            plot_ui.line(
                Line::new(rolling)
                    .name(format!("{field} {window}M Avg"))
                    .color(color.gamma_multiply(0.6))
                    .style(LineStyle::dashed_loose())
                    .width(1.5),
            );
        }
    });
}

/// Grouped bars, one group per row and one bar per field.
pub fn grouped_bar_chart(ui: &mut Ui, id: &str, view: &SeriesView, fields: &[&str], y_label: &str) {
    let colors = SeriesColors::new(fields);
    let dates = view.subset.dates();
    let bar_width = BAR_SPAN_DAYS / fields.len().max(1) as f64;

    date_plot(id, y_label).show(ui, |plot_ui| {
        for (i, field) in fields.iter().enumerate() {
            let Ok(values) = view.subset.values(field) else {
                continue;
            };
            let offset = (i as f64 + 0.5) * bar_width - BAR_SPAN_DAYS / 2.0;
            let bars = dates
                .iter()
                .zip(&values)
                .map(|(d, v)| Bar::new(date_x(*d) + offset, *v).width(bar_width * 0.9))
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).name(*field).color(colors.color_for(field)));
        }
    });
}

/// Month-on-month change of one field, shaded by magnitude.
pub fn delta_bars(ui: &mut Ui, id: &str, view: &SeriesView, field: &str) {
    let Some(derived) = view.derived.get(field) else {
        return;
    };
    let dates = view.subset.dates();
    let changes: Vec<(f64, f64)> = dates
        .iter()
        .zip(&derived.delta)
        .filter_map(|(d, v)| v.map(|v| (date_x(*d), v)))
        .collect();
    let largest = changes.iter().map(|(_, v)| v.abs()).fold(0.0, f64::max);

    date_plot(id, "Change").show(ui, |plot_ui| {
        let bars = changes
            .iter()
            .map(|&(x, v)| {
                let t = if largest > 0.0 { v.abs() / largest } else { 0.0 };
                Bar::new(x, v).width(BAR_SPAN_DAYS).fill(heat_color(0.3 + 0.7 * t))
            })
            .collect();
        plot_ui.bar_chart(BarChart::new(bars).name(format!("MoM {field} Change")));
    });
}

/// One field as bars, each shaded by where its value sits in the field's range.
pub fn shaded_bars(ui: &mut Ui, id: &str, view: &SeriesView, field: &str, y_label: &str) {
    let Ok(values) = view.subset.values(field) else {
        return;
    };
    let dates = view.subset.dates();
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });

    date_plot(id, y_label).show(ui, |plot_ui| {
        let bars = dates
            .iter()
            .zip(&values)
            .map(|(d, v)| {
                Bar::new(date_x(*d), *v)
                    .width(BAR_SPAN_DAYS)
                    .fill(heat_color(0.3 + 0.7 * shade(*v, lo, hi)))
            })
            .collect();
        plot_ui.bar_chart(BarChart::new(bars).name(field));
    });
}

/// Position of `v` in `[lo, hi]`, or 0 for a flat range.
fn shade(v: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo { (v - lo) / (hi - lo) } else { 0.0 }
}

/// `y_field` against `x_field`, one point per row.
pub fn scatter(ui: &mut Ui, id: &str, view: &SeriesView, x_field: &str, y_field: &str) {
    let (Ok(xs), Ok(ys)) = (view.subset.values(x_field), view.subset.values(y_field)) else {
        return;
    };
    let points: PlotPoints = xs.iter().zip(&ys).map(|(x, y)| [*x, *y]).collect();

    Plot::new(id.to_string())
        .height(CHART_HEIGHT)
        .x_axis_label(x_field.to_string())
        .y_axis_label(y_field.to_string())
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .name(format!("{y_field} vs {x_field}"))
                    .color(Color32::from_rgb(0x02, 0x88, 0xd1))
                    .radius(5.0),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_axis_round_trips_through_marks() {
        let d = NaiveDate::from_ymd_opt(2023, 3, 31).unwrap();
        let mark = GridMark {
            value: date_x(d),
            step_size: 30.0,
        };
        assert_eq!(format_date_mark(mark, &(0.0..=1.0)), "Mar 2023");
    }

    #[test]
    fn shade_spans_the_field_range() {
        assert_eq!(shade(3.9, 3.9, 4.3), 0.0);
        assert_eq!(shade(4.3, 3.9, 4.3), 1.0);
        assert_eq!(shade(4.1, 4.1, 4.1), 0.0);
    }
}
