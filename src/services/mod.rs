//! Services: fetching, settings, week grouping and the load pipeline

pub mod fetcher;
pub mod organizer;
pub mod pipeline;
pub mod settings;

pub use fetcher::{ContributionFetcher, HttpFetcher};
pub use organizer::{organize, week_start};
pub use pipeline::{load_calendar, GenerationCounter, ViewState};
pub use settings::{Settings, SettingsService, SettingsStore, UsernameOverride};
