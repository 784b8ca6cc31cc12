pub mod chart_panel;
pub mod controls_panel;
pub mod table_panel;
