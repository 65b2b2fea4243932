//! TUI widgets

pub mod heatmap;
pub mod message;
pub mod spinner;
pub mod tooltip;
