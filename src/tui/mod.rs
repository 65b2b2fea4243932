//! Terminal UI

mod app;
pub mod theme;
pub mod widgets;

pub use app::{run, App};
pub use theme::Theme;
