//! Search Panel Widget
//! Left side panel with the name search, optional filters and the download button.

use crate::data::OrderQuery;
use egui::{Color32, RichText, ScrollArea};

const NAME_HINT: &str = "e.g., Neha or Aarav";

/// Left side search panel.
pub struct SearchPanel {
    pub name_query: String,
    pub source_label: String,
    pub status_options: Vec<String>,
    pub selected_statuses: Vec<bool>,
    pub city_options: Vec<String>,
    pub selected_cities: Vec<bool>,
    pub download_enabled: bool,
    pub status: String,
}

impl Default for SearchPanel {
    fn default() -> Self {
        Self {
            name_query: String::new(),
            source_label: String::new(),
            status_options: Vec::new(),
            selected_statuses: Vec::new(),
            city_options: Vec::new(),
            selected_cities: Vec::new(),
            download_enabled: false,
            status: "Ready".to_string(),
        }
    }
}

impl SearchPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the filter choices after a (re)load, keeping selections that still exist.
    pub fn update_options(&mut self, statuses: Vec<String>, cities: Vec<String>) {
        self.selected_statuses =
            carry_selection(&self.status_options, &self.selected_statuses, &statuses);
        self.status_options = statuses;
        self.selected_cities = carry_selection(&self.city_options, &self.selected_cities, &cities);
        self.city_options = cities;
    }

    /// Build the query from the current inputs.
    pub fn query(&self) -> OrderQuery {
        OrderQuery::new(self.name_query.clone())
            .with_statuses(selected(&self.status_options, &self.selected_statuses))
            .with_cities(selected(&self.city_options, &self.selected_cities))
    }

    /// Draw the search panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> SearchPanelAction {
        let mut action = SearchPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🔎 Order Search")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new(&self.source_label)
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Name Search =====
        ui.label(RichText::new("Search").size(14.0).strong());
        ui.add_space(5.0);
        ui.label("Customer name");
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.name_query)
                .hint_text(NAME_HINT)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            action = SearchPanelAction::QueryChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Optional Filters =====
        if multi_select(
            ui,
            "Status (optional)",
            &self.status_options,
            &mut self.selected_statuses,
        ) {
            action = SearchPanelAction::QueryChanged;
        }

        ui.add_space(10.0);

        if multi_select(
            ui,
            "City (optional)",
            &self.city_options,
            &mut self.selected_cities,
        ) {
            action = SearchPanelAction::QueryChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.download_enabled, |ui| {
                let button =
                    egui::Button::new(RichText::new("⬇ Download results as CSV").size(14.0))
                        .min_size(egui::vec2(200.0, 32.0));
                if ui.add(button).clicked() {
                    action = SearchPanelAction::Download;
                }
            });

            ui.add_space(8.0);

            if ui.button("🔄 Reload source").clicked() {
                action = SearchPanelAction::Reload;
            }
        });

        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set status message
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Checkbox list with a clear button. Returns true when the selection changed.
fn multi_select(ui: &mut egui::Ui, label: &str, options: &[String], selected: &mut [bool]) -> bool {
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label(RichText::new(label).size(14.0).strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("Clear").clicked() && selected.iter().any(|&s| s) {
                selected.iter_mut().for_each(|s| *s = false);
                changed = true;
            }
        });
    });

    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(5.0)
        .show(ui, |ui| {
            ScrollArea::vertical()
                .id_salt(label)
                .max_height(120.0)
                .show(ui, |ui| {
                    for (option, checked) in options.iter().zip(selected.iter_mut()) {
                        if ui.checkbox(checked, option).changed() {
                            changed = true;
                        }
                    }
                });
        });

    changed
}

fn selected(options: &[String], flags: &[bool]) -> Vec<String> {
    options
        .iter()
        .zip(flags.iter())
        .filter(|(_, &on)| on)
        .map(|(value, _)| value.clone())
        .collect()
}

fn carry_selection(old_options: &[String], old_flags: &[bool], new_options: &[String]) -> Vec<bool> {
    let kept = selected(old_options, old_flags);
    new_options.iter().map(|value| kept.contains(value)).collect()
}

/// Actions triggered by the search panel
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPanelAction {
    None,
    QueryChanged,
    Reload,
    Download,
}
