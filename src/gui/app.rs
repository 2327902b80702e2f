//! Order Search Main Application
//! Main window with search panel and results view.

use crate::config::AppConfig;
use crate::data::{distinct_values, filter, OrderQuery, RecordSet, SourceCache, CITY, STATUS};
use crate::export::{present, write_export};
use crate::gui::{ResultsView, SearchPanel, SearchPanelAction};
use crate::stats::{summarize, Summary};
use anyhow::Result;
use egui::{Color32, RichText, SidePanel};
use tracing::{debug, info, warn};

/// Main application window.
pub struct OrderSearchApp {
    config: AppConfig,
    cache: SourceCache,
    search_panel: SearchPanel,
    results_view: ResultsView,

    /// Filtered and sorted rows of the last query; the download source.
    presented: Option<RecordSet>,
    last_query: Option<OrderQuery>,
    load_error: Option<String>,
}

impl OrderSearchApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, cache: SourceCache) -> Self {
        Self::with_source(config, cache)
    }

    fn with_source(config: AppConfig, cache: SourceCache) -> Self {
        let mut app = Self {
            config,
            cache,
            search_panel: SearchPanel::new(),
            results_view: ResultsView::new(),
            presented: None,
            last_query: None,
            load_error: None,
        };
        app.search_panel.source_label = app.config.source.display().to_string();
        app.refresh_source();
        app
    }

    /// Fetch the record set through the cache. A changed file is reloaded,
    /// which refreshes the filter choices and drops the query memo.
    fn records(&mut self) -> Option<RecordSet> {
        match self.cache.lookup(&self.config.source) {
            Ok((records, reloaded)) => {
                self.load_error = None;
                if reloaded {
                    self.update_options(&records);
                    self.last_query = None;
                }
                Some(records)
            }
            Err(e) => {
                warn!(error = %e, "order source unavailable");
                self.load_error = Some(e.to_string());
                None
            }
        }
    }

    fn update_options(&mut self, records: &RecordSet) {
        match (distinct_values(records, STATUS), distinct_values(records, CITY)) {
            (Ok(statuses), Ok(cities)) => self.search_panel.update_options(statuses, cities),
            (Err(e), _) | (_, Err(e)) => {
                self.search_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Load the source if needed and rerun the current query.
    fn refresh_source(&mut self) {
        if self.records().is_none() {
            return;
        }
        self.last_query = None;
        self.run_query();
    }

    /// Handle reload button - drop the cached set and load again
    fn handle_reload(&mut self) {
        self.cache.invalidate(&self.config.source);
        info!(path = %self.config.source.display(), "reloading order source");
        self.refresh_source();
        debug!(cached_sources = self.cache.len(), "source cache");
    }

    /// Filter, summarize and sort for the current panel inputs.
    fn run_query(&mut self) {
        let Some(records) = self.records() else {
            return;
        };

        let query = self.search_panel.query();
        if self.last_query.as_ref() == Some(&query) {
            return;
        }

        match Self::evaluate(&records, &query) {
            Ok((presented, summary)) => {
                self.results_view
                    .set_results(&presented, summary, &self.config.currency_symbol);
                self.search_panel.download_enabled = !presented.is_empty();
                self.search_panel
                    .set_status(&format!("{} of {} orders", presented.len(), records.len()));
                self.presented = Some(presented);
            }
            Err(e) => {
                warn!(error = %e, "query failed");
                self.results_view = ResultsView::new();
                self.search_panel.download_enabled = false;
                self.search_panel.set_status(&format!("Error: {}", e));
                self.presented = None;
            }
        }
        self.last_query = Some(query);
    }

    fn evaluate(records: &RecordSet, query: &OrderQuery) -> Result<(RecordSet, Summary)> {
        let filtered = filter(records, query)?;
        let summary = summarize(&filtered)?;
        let presented = present(&filtered)?;
        debug!(matched = summary.count, "query evaluated");
        Ok((presented, summary))
    }

    /// Handle CSV download - ask for a path and write the presented rows
    fn handle_download(&mut self) {
        let Some(presented) = self.presented.as_ref().filter(|p| !p.is_empty()) else {
            self.search_panel.set_status("No results to download");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&self.config.export_file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        match write_export(presented, &path) {
            Ok(()) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.search_panel
                    .set_status(&format!("Exported {} orders to {}", presented.len(), name));
            }
            Err(e) => {
                self.search_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for OrderSearchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // A source that cannot be loaded blocks the whole window
        if let Some(error) = &self.load_error {
            let error = error.clone();
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.label(
                        RichText::new("Unable to load orders")
                            .size(20.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                    ui.add_space(10.0);
                    ui.label(&error);
                    ui.add_space(20.0);
                    if ui.button("🔄 Retry").clicked() {
                        self.refresh_source();
                    }
                });
            });
            return;
        }

        // Left panel - Search Panel
        SidePanel::left("search_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.search_panel.show(ui) {
                        SearchPanelAction::QueryChanged => self.run_query(),
                        SearchPanelAction::Reload => self.handle_reload(),
                        SearchPanelAction::Download => self.handle_download(),
                        SearchPanelAction::None => {}
                    }
                });
            });

        // Central panel - Results
        egui::CentralPanel::default().show(ctx, |ui| {
            self.results_view.show(ui);
        });
    }
}
