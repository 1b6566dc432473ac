use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use rbi_dashboard::data::filter::{CategorySelector, SLIDERS};
use rbi_dashboard::data::model::Category;
use rbi_dashboard::data::source::{DirectorySource, FixtureSource};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            ui.strong("Date range");
            egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
                ui.label("Start");
                ui.add(DatePickerButton::new(&mut state.filters.dates.start).id_salt("start_date"));
                ui.end_row();
                ui.label("End");
                ui.add(DatePickerButton::new(&mut state.filters.dates.end).id_salt("end_date"));
                ui.end_row();
            });
            ui.separator();

            ui.strong("Rolling average");
            ui.add(egui::Slider::new(&mut state.options.window, 1..=12).suffix(" months"));
            ui.separator();

            match state.active_tab {
                Tab::Dataset(id) => {
                    let columns = state
                        .catalog
                        .as_ref()
                        .and_then(|c| c.series(id).ok())
                        .map(|s| s.columns().to_vec())
                        .unwrap_or_default();
                    range_sliders(ui, state, &columns);
                }
                Tab::Announcements => category_selector(ui, state),
            }

            ui.add_space(8.0);
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }

            if let Err(e) = state.filters.validate() {
                ui.add_space(4.0);
                ui.label(RichText::new(e.to_string()).color(Color32::RED));
            }
        });
}

/// Min/max sliders for the predicates on `columns`.
fn range_sliders(ui: &mut Ui, state: &mut AppState, columns: &[String]) {
    let specs = SLIDERS.iter().filter(|s| columns.iter().any(|c| c == s.field));
    for spec in specs {
        let Some(range) = state.filters.range_mut(spec.field) else {
            continue;
        };
        egui::CollapsingHeader::new(RichText::new(spec.label).strong())
            .id_salt(spec.field)
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                ui.add(
                    egui::Slider::new(&mut range.min, spec.lower..=spec.upper)
                        .step_by(spec.step)
                        .text("min"),
                );
                ui.add(
                    egui::Slider::new(&mut range.max, spec.lower..=spec.upper)
                        .step_by(spec.step)
                        .text("max"),
                );
            });
    }
}

fn category_selector(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Category");
    let current = state.filters.category;
    egui::ComboBox::from_id_salt("category")
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut state.filters.category, CategorySelector::All, "All");
            for c in Category::ALL {
                ui.selectable_value(
                    &mut state.filters.category,
                    CategorySelector::Only(c),
                    c.label(),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the menu bar, source status and tab strip.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Load built-in sample").clicked() {
                state.load_source(&FixtureSource);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(catalog) = &state.catalog {
            ui.label(format!("{} ({})", catalog.source_name, catalog.version));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.title());
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open exported dashboard tables")
        .pick_folder();

    if let Some(path) = folder {
        log::info!("Opening data folder {}", path.display());
        state.load_source(&DirectorySource::new(path));
    }
}
