use eframe::egui::{Color32, RichText, ScrollArea, Ui};

use rbi_dashboard::EngineError;
use rbi_dashboard::data::source::DatasetId;
use rbi_dashboard::engine::insights::{self, Trend};
use rbi_dashboard::engine::{AnnouncementView, SeriesView};

use super::{plot, tables};
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the active tab in the central panel.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(views) = state.views() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data loaded  (File → Open data folder…)");
        });
        return;
    };

    ui.heading(state.active_tab.title());
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.active_tab {
            Tab::Dataset(id) => match views.series(id) {
                Some(Ok(view)) => dataset_tab(ui, id, view),
                Some(Err(e)) => error_notice(ui, e),
                None => error_notice(ui, &EngineError::UnknownDataset(id.key().to_string())),
            },
            Tab::Announcements => match &views.announcements {
                Ok(view) => announcements_tab(ui, view),
                Err(e) => error_notice(ui, e),
            },
        });
}

fn error_notice(ui: &mut Ui, err: &EngineError) {
    ui.add_space(24.0);
    ui.vertical_centered(|ui: &mut Ui| match err {
        EngineError::EmptyResult { .. } => {
            ui.label(RichText::new("No data for the selected range.").heading());
            ui.label("Widen the date range or the sliders in the filter panel.");
        }
        other => {
            ui.label(RichText::new(other.to_string()).color(Color32::RED));
        }
    });
}

fn dataset_tab(ui: &mut Ui, id: DatasetId, view: &SeriesView) {
    tables::kpi_cards(ui, &insights::kpis(id, view));
    ui.add_space(8.0);

    match id {
        DatasetId::PolicyRates => policy_rates(ui, view),
        DatasetId::Inflation => inflation(ui, view),
        DatasetId::Liquidity => liquidity(ui, view),
        DatasetId::Forex => forex(ui, view),
        DatasetId::Economy => economy(ui, view),
    }
}

// ---------------------------------------------------------------------------
// Per-dataset layouts
// ---------------------------------------------------------------------------

fn policy_rates(ui: &mut Ui, view: &SeriesView) {
    ui.strong(format!("Repo & Reverse Repo Rate (with {}M Avg)", view.derived.window));
    plot::line_chart(
        ui,
        "policy_main",
        view,
        &["Repo Rate", "Reverse Repo Rate"],
        "Rate (%)",
        true,
    );
    ui.add_space(8.0);
    ui.strong("CRR & SLR Trend");
    plot::grouped_bar_chart(ui, "policy_reserves", view, &["CRR", "SLR"], "%");
}

fn inflation(ui: &mut Ui, view: &SeriesView) {
    ui.strong("CPI vs WPI");
    plot::line_chart(ui, "inflation_main", view, &["CPI", "WPI"], "Inflation (%)", true);

    ui.add_space(8.0);
    ui.strong("Food Inflation Trend");
    plot::shaded_bars(ui, "inflation_food", view, "Food Inflation", "Inflation (%)");

    ui.add_space(8.0);
    ui.strong("CPI Category Breakdown");
    plot::grouped_bar_chart(
        ui,
        "inflation_categories",
        view,
        &["Food Inflation", "Fuel", "Housing", "Clothing"],
        "Inflation (%)",
    );

    ui.add_space(8.0);
    ui.strong("Month-on-Month Inflation Change");
    plot::delta_bars(ui, "inflation_mom", view, "CPI");

    ui.add_space(8.0);
    ui.strong("Inflation Category Heatmap");
    tables::heatmap(
        ui,
        "inflation_heatmap",
        view,
        &["Food Inflation", "Fuel", "Housing", "Clothing"],
    );

    ui.add_space(8.0);
    ui.strong("Inflation Summary");
    let headlines = [
        ("CPI", "CPI is currently"),
        ("WPI", "WPI stands at"),
        ("Food Inflation", "Food inflation is"),
    ];
    for (field, lead) in headlines {
        if let Some(s) = view.summary(field) {
            ui.label(format!("• {lead} {}%.", s.latest_value()));
        }
    }
    match Trend::momentum(view, "CPI") {
        Some(trend) => ui.label(format!("• Recent months show {trend} inflation.")),
        None => ui.label("• Not enough months selected to show a trend."),
    };
}

fn liquidity(ui: &mut Ui, view: &SeriesView) {
    ui.strong("Liquidity vs Credit Growth Trend");
    plot::line_chart(
        ui,
        "liquidity_main",
        view,
        &["Liquidity (₹ Cr)", "Credit Growth (%)"],
        "Value",
        true,
    );

    ui.add_space(8.0);
    ui.strong("Money Supply Trends (M1 & M3)");
    plot::line_chart(ui, "liquidity_money", view, &["M1", "M3"], "₹ Lakh Cr", false);

    ui.add_space(8.0);
    ui.strong("Call Money Rate Trend");
    plot::line_chart(ui, "liquidity_call", view, &["Call Rate (%)"], "%", false);

    ui.add_space(8.0);
    ui.strong("Government Securities Yield Curve Trend");
    plot::line_chart(
        ui,
        "liquidity_yields",
        view,
        &["Yield 3M", "Yield 1Y", "Yield 5Y", "Yield 10Y"],
        "Yield (%)",
        false,
    );

    ui.add_space(8.0);
    ui.strong("Summary Table");
    let rows = insights::latest_table(
        view,
        &[
            ("Liquidity (₹ Cr)", "Liquidity (₹ Cr)"),
            ("Credit Growth (%)", "Credit Growth (%)"),
            ("Call Rate (%)", "Call Rate (%)"),
            ("M1", "M1 (₹ Lakh Cr)"),
            ("M3", "M3 (₹ Lakh Cr)"),
            ("Yield 10Y", "10Y Yield (%)"),
        ],
    );
    tables::metric_table(ui, "liquidity_summary", &rows);
}

fn forex(ui: &mut Ui, view: &SeriesView) {
    ui.strong("Forex Reserves and USD/INR");
    plot::line_chart(
        ui,
        "forex_main",
        view,
        &["Forex Reserves (USD bn)", "USD/INR"],
        "Value",
        true,
    );

    ui.add_space(8.0);
    ui.strong("USD/INR vs Forex Reserves");
    plot::scatter(ui, "forex_scatter", view, "Forex Reserves (USD bn)", "USD/INR");

    ui.add_space(8.0);
    ui.strong("Summary Table");
    let rows = insights::stats_table(
        view,
        &[("Forex Reserves (USD bn)", "Forex Reserves"), ("USD/INR", "USD/INR")],
    );
    tables::metric_table(ui, "forex_summary", &rows);
}

fn economy(ui: &mut Ui, view: &SeriesView) {
    ui.strong(format!("GDP Growth vs IIP (with {}M Avg)", view.derived.window));
    plot::line_chart(
        ui,
        "economy_main",
        view,
        &["GDP Growth (%)", "IIP (%)"],
        "%",
        true,
    );

    if let Some(trend) = Trend::against_mean(view, "GDP Growth (%)") {
        ui.add_space(4.0);
        ui.label(RichText::new(format!("Economy status: {trend}")).strong());
    }

    ui.add_space(8.0);
    ui.strong("Summary Table");
    let table = insights::derived_table(view, &[("GDP Growth (%)", "GDP"), ("IIP (%)", "IIP")]);
    tables::derived_table(ui, "economy_summary", &table);
}

// ---------------------------------------------------------------------------
// Announcements
// ---------------------------------------------------------------------------

fn announcements_tab(ui: &mut Ui, view: &AnnouncementView) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        tables::metric_card(ui, "Total Announcements", &view.total.to_string(), None);
        tables::metric_card(ui, "Policy Rate Updates", &view.policy_rate_updates.to_string(), None);
        tables::metric_card(ui, "Liquidity Measures", &view.liquidity_measures.to_string(), None);
    });
    ui.separator();

    if view.items.is_empty() {
        ui.label("No announcements in the selected range.");
        return;
    }

    ui.strong("RBI Policy Feed");
    tables::announcement_feed(ui, &view.items);

    ui.separator();
    ui.strong("Summary Table");
    tables::announcement_table(ui, &view.items);
}
