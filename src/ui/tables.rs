use eframe::egui::{self, Color32, RichText, Ui};

use rbi_dashboard::data::model::Announcement;
use rbi_dashboard::engine::SeriesView;
use rbi_dashboard::engine::insights::{DerivedTable, Kpi, TableRow};

use crate::color::{heat_color, impact_color};

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

pub fn kpi_cards(ui: &mut Ui, cards: &[Kpi]) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for card in cards {
            metric_card(ui, card.label, &format_value(card.value), card.change_text());
        }
    });
}

/// A framed label / value pair with optional change line.
pub fn metric_card(ui: &mut Ui, label: &str, value: &str, change: Option<String>) {
    egui::Frame::group(ui.style())
        .inner_margin(8.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(150.0);
            ui.vertical(|ui: &mut Ui| {
                ui.label(RichText::new(label).small());
                ui.label(RichText::new(value).heading().strong());
                if let Some(change) = change {
                    let color = if change.starts_with('-') {
                        Color32::from_rgb(0xc6, 0x28, 0x28)
                    } else if change == "n/a" {
                        Color32::GRAY
                    } else {
                        Color32::from_rgb(0x2e, 0x7d, 0x32)
                    };
                    ui.label(RichText::new(change).color(color));
                }
            });
        });
}

fn format_value(v: f64) -> String {
    if v.abs() >= 10_000.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

// ---------------------------------------------------------------------------
// Metric tables
// ---------------------------------------------------------------------------

pub fn metric_table(ui: &mut Ui, id: &str, rows: &[TableRow]) {
    egui::Grid::new(id)
        .striped(true)
        .num_columns(2)
        .spacing([24.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Metric");
            ui.strong("Value");
            ui.end_row();
            for row in rows {
                ui.label(row.metric.as_str());
                ui.label(format_value(row.value));
                ui.end_row();
            }
        });
}

/// One grid row per observation, cells at 2 decimals; rolling means still
/// inside the leading window show as "—".
pub fn derived_table(ui: &mut Ui, id: &str, table: &DerivedTable) {
    egui::ScrollArea::horizontal().id_salt(id).show(ui, |ui: &mut Ui| {
        egui::Grid::new(id)
            .striped(true)
            .num_columns(table.headers.len())
            .spacing([24.0, 4.0])
            .show(ui, |ui: &mut Ui| {
                for title in &table.headers {
                    ui.strong(title.as_str());
                }
                ui.end_row();
                for row in &table.rows {
                    ui.label(row.date.to_string());
                    for cell in &row.cells {
                        match cell {
                            Some(v) => ui.label(format!("{v:.2}")),
                            None => ui.label(RichText::new("—").color(Color32::GRAY)),
                        };
                    }
                    ui.end_row();
                }
            });
    });
}

/// Fields (rows) by dates (columns), each cell shaded by its value within the
/// whole grid.
pub fn heatmap(ui: &mut Ui, id: &str, view: &SeriesView, fields: &[&str]) {
    let columns: Vec<(&str, Vec<f64>)> = fields
        .iter()
        .filter_map(|f| Some((*f, view.subset.values(f).ok()?)))
        .collect();
    let (lo, hi) = columns
        .iter()
        .flat_map(|(_, vs)| vs.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let span = hi - lo;
    let dates = view.subset.dates();

    egui::ScrollArea::horizontal().id_salt(id).show(ui, |ui: &mut Ui| {
        egui::Grid::new(id).spacing([2.0, 2.0]).show(ui, |ui: &mut Ui| {
            ui.label("");
            for d in &dates {
                ui.label(RichText::new(d.format("%b").to_string()).small());
            }
            ui.end_row();

            for (field, values) in &columns {
                ui.label(*field);
                for v in values {
                    let t = if span > 0.0 { (v - lo) / span } else { 0.0 };
                    let text_color = if t > 0.5 { Color32::WHITE } else { Color32::BLACK };
                    ui.label(
                        RichText::new(format!(" {v:.1} "))
                            .monospace()
                            .color(text_color)
                            .background_color(heat_color(t)),
                    );
                }
                ui.end_row();
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Announcement feed
// ---------------------------------------------------------------------------

pub fn announcement_feed(ui: &mut Ui, items: &[Announcement]) {
    for item in items {
        egui::Frame::group(ui.style())
            .fill(impact_color(item.impact))
            .inner_margin(8.0)
            .show(ui, |ui: &mut Ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    RichText::new(format!("{} · {}", item.date.format("%d %b %Y"), item.category))
                        .strong()
                        .color(Color32::BLACK),
                );
                ui.label(RichText::new(item.text.as_str()).color(Color32::BLACK));
                ui.label(
                    RichText::new(format!("Impact: {}", item.impact))
                        .small()
                        .color(Color32::BLACK),
                );
            });
        ui.add_space(4.0);
    }
}

pub fn announcement_table(ui: &mut Ui, items: &[Announcement]) {
    egui::Grid::new("announcement_table")
        .striped(true)
        .num_columns(4)
        .show(ui, |ui: &mut Ui| {
            for title in ["Date", "Category", "Announcement", "Impact"] {
                ui.strong(title);
            }
            ui.end_row();
            for item in items {
                ui.label(item.date.to_string());
                ui.label(item.category.label());
                ui.label(item.text.as_str());
                ui.label(item.impact.to_string());
                ui.end_row();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_values_drop_decimals() {
        assert_eq!(format_value(650000.0), "650000");
        assert_eq!(format_value(6.5), "6.50");
    }
}
