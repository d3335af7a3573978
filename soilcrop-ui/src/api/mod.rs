//! HTTP API handlers for soilcrop-ui

pub mod health;
pub mod predict;
pub mod soil_types;
pub mod ui;

pub use health::health_routes;
pub use predict::predict_routes;
pub use soil_types::soil_type_routes;
pub use ui::ui_routes;
