//! Results View Widget
//! Central panel with the summary metrics and the scrollable results table.

use crate::data::RecordSet;
use crate::stats::{format_currency, Summary};
use egui::{Color32, RichText, ScrollArea};

const METRIC_SIZE: f32 = 26.0;

/// Metrics row plus the presented (sorted) result rows, rendered as text once
/// per query so drawing a frame does not touch the DataFrame.
#[derive(Default)]
pub struct ResultsView {
    pub summary: Summary,
    pub total_text: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed results.
    pub fn set_results(&mut self, records: &RecordSet, summary: Summary, currency_symbol: &str) {
        self.summary = summary;
        self.total_text = format_currency(summary.total_value, currency_symbol);
        self.headers = records.column_names();
        self.rows = records.display_rows();
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.add_space(5.0);
        ui.columns(3, |cols| {
            metric(&mut cols[0], "Matching orders", &self.summary.count.to_string());
            metric(
                &mut cols[1],
                "Unique customers",
                &self.summary.distinct_customers.to_string(),
            );
            metric(&mut cols[2], "Total value", &self.total_text);
        });

        ui.add_space(10.0);
        ui.separator();
        ui.label(RichText::new("Results").size(18.0).strong());
        ui.add_space(5.0);

        if self.rows.is_empty() {
            ui.label(RichText::new("No matching orders").color(Color32::GRAY));
            return;
        }

        ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            egui::Grid::new("results_grid")
                .striped(true)
                .min_col_width(80.0)
                .show(ui, |ui| {
                    for header in &self.headers {
                        ui.label(RichText::new(header).strong());
                    }
                    ui.end_row();

                    for row in &self.rows {
                        for cell in row {
                            ui.label(cell);
                        }
                        ui.end_row();
                    }
                });
        });
    }
}

fn metric(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
    ui.label(RichText::new(value).size(METRIC_SIZE));
}
