pub mod chart_renderer;
pub mod curve_smoothing;
pub mod input_fields;
pub mod run_report;
pub mod service_config;
pub mod simulation_api;
pub mod stats_display;
pub mod view_controller;
