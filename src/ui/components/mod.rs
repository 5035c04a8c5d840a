pub mod kpi_card;
pub mod listing_card;
pub mod setup_panel;
pub mod status_line;
pub mod toast;
