//! GUI module - User interface components

mod app;
mod results_view;
mod search_panel;

pub use app::OrderSearchApp;
pub use results_view::ResultsView;
pub use search_panel::{SearchPanel, SearchPanelAction};
