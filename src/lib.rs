//! GitHub contribution calendar in your terminal

pub mod cli;
pub mod extract;
pub mod logging;
pub mod services;
pub mod tui;
pub mod types;
