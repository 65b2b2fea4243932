//! End-to-end load: settings lookup, fetch, extract, organize

use reqwest::Url;

use crate::extract;
use crate::services::fetcher::ContributionFetcher;
use crate::services::organizer::organize;
use crate::services::settings::SettingsStore;
use crate::types::{CalendarData, ContribError, Result};

/// `{base}/users/{user}/contributions`
pub fn contributions_url(base_url: &str, username: &str) -> Result<Url> {
    build_url(base_url, &["users", username, "contributions"])
}

/// `{base}/{user}`
pub fn profile_url(base_url: &str, username: &str) -> Result<Url> {
    build_url(base_url, &[username])
}

/// Append path segments to `base_url`, percent-encoding each one
fn build_url(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ContribError::Config(format!("Invalid base URL {:?}: {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| ContribError::Config(format!("Base URL {:?} cannot hold a path", base_url)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Run the whole pipeline once.
///
/// Settings are read fresh on every call so a retry picks up a newly
/// configured username.
pub fn load_calendar<S, F>(store: &S, fetcher: &F) -> Result<CalendarData>
where
    S: SettingsStore + ?Sized,
    F: ContributionFetcher + ?Sized,
{
    let settings = store.load()?;
    let username = settings
        .username()
        .ok_or(ContribError::ConfigurationMissing)?
        .to_string();

    let url = contributions_url(&settings.base_url, &username)?;
    let profile = profile_url(&settings.base_url, &username)?;

    let markup = fetcher.fetch(&url)?;
    let extraction = extract::extract(&markup);
    if extraction.records.is_empty() {
        log::warn!("no day cells found in {} bytes from {}", markup.len(), url);
        return Err(ContribError::EmptyDataset);
    }

    let weeks = organize(&extraction.records);
    log::debug!(
        "loaded {} records in {} weeks for {}",
        extraction.records.len(),
        weeks.len(),
        username
    );

    Ok(CalendarData {
        username,
        profile_url: profile.to_string(),
        total_label: extraction.total_label,
        weeks,
    })
}

/// What the UI should show after a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Fetch in flight
    Loading,
    /// No username configured; retry is not offered
    ConfigPrompt,
    /// Load failed
    Error { message: String, retry: bool },
    /// Calendar ready
    Graph(Box<CalendarData>),
}

impl ViewState {
    pub fn from_result(result: Result<CalendarData>) -> Self {
        match result {
            Ok(data) => Self::Graph(Box::new(data)),
            Err(ContribError::ConfigurationMissing) => Self::ConfigPrompt,
            Err(e) => Self::Error {
                retry: e.is_retryable(),
                message: e.to_string(),
            },
        }
    }

    /// Whether a retry/refresh control is available
    pub fn allows_retry(&self) -> bool {
        match self {
            Self::Error { retry, .. } => *retry,
            Self::Graph(_) => true,
            Self::Loading | Self::ConfigPrompt => false,
        }
    }
}

/// Identifies pipeline runs so results from superseded runs can be dropped
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: u64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, superseding all earlier ones
    pub fn next(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    /// Whether a result tagged `generation` belongs to the latest run
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::settings::Settings;
    use crate::types::ActivityLevel;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSettings(Option<&'static str>);

    impl SettingsStore for StaticSettings {
        fn load(&self) -> Result<Settings> {
            Ok(Settings {
                username: self.0.map(String::from),
                ..Settings::default()
            })
        }
    }

    /// Returns canned markup or a canned error, counting calls
    struct StubFetcher {
        response: std::result::Result<String, String>,
        calls: AtomicUsize,
        last_url: std::sync::Mutex<Option<String>>,
    }

    impl StubFetcher {
        fn ok(markup: &str) -> Self {
            Self {
                response: Ok(markup.to_string()),
                calls: AtomicUsize::new(0),
                last_url: std::sync::Mutex::new(None),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                last_url: std::sync::Mutex::new(None),
            }
        }
    }

    impl ContributionFetcher for StubFetcher {
        fn fetch(&self, url: &Url) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_url.lock().unwrap() = Some(url.to_string());
            self.response.clone().map_err(ContribError::Transport)
        }
    }

    const SCENARIO_MARKUP: &str = r#"
        <h2 class="f4 text-normal mb-2">
            123 contributions
            in the last year
        </h2>
        <table><tbody><tr>
          <td class="ContributionCalendar-day" data-date="2024-01-13" data-level="4"></td>
          <td class="ContributionCalendar-day" data-date="2024-01-07" data-level="2"></td>
          <td class="ContributionCalendar-day" data-date="2024-01-08" data-level="0"></td>
        </tr></tbody></table>"#;

    #[test]
    fn test_contributions_url() {
        let url = contributions_url("https://github.com", "octocat").unwrap();
        assert_eq!(url.as_str(), "https://github.com/users/octocat/contributions");
    }

    #[test]
    fn test_profile_url_trailing_slash_base() {
        let url = profile_url("https://github.example.com/", "octocat").unwrap();
        assert_eq!(url.as_str(), "https://github.example.com/octocat");
    }

    #[test]
    fn test_url_segments_are_encoded() {
        let url = contributions_url("https://github.com", "a/b c").unwrap();
        assert_eq!(url.as_str(), "https://github.com/users/a%2Fb%20c/contributions");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            contributions_url("not a url", "octocat"),
            Err(ContribError::Config(_))
        ));
    }

    #[test]
    fn test_pipeline_success() {
        let fetcher = StubFetcher::ok(SCENARIO_MARKUP);
        let data = load_calendar(&StaticSettings(Some("octocat")), &fetcher).unwrap();

        assert_eq!(data.username, "octocat");
        assert_eq!(data.profile_url, "https://github.com/octocat");
        assert_eq!(data.total_label, "123 contributions in the last year");
        assert_eq!(data.weeks.len(), 1);
        assert_eq!(data.day_count(), 3);
        assert_eq!(data.weeks[0].days[0].level, ActivityLevel::Medium);
        assert_eq!(data.weeks[0].days[2].level, ActivityLevel::Max);
        assert_eq!(
            fetcher.last_url.lock().unwrap().as_deref(),
            Some("https://github.com/users/octocat/contributions")
        );
    }

    #[test]
    fn test_pipeline_missing_username_skips_fetch() {
        let fetcher = StubFetcher::ok(SCENARIO_MARKUP);
        let result = load_calendar(&StaticSettings(None), &fetcher);

        assert!(matches!(result, Err(ContribError::ConfigurationMissing)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);

        let state = ViewState::from_result(result);
        assert_eq!(state, ViewState::ConfigPrompt);
        assert!(!state.allows_retry());
    }

    #[test]
    fn test_pipeline_empty_dataset() {
        let fetcher = StubFetcher::ok("<h2>0 contributions</h2><p>nothing here</p>");
        let result = load_calendar(&StaticSettings(Some("octocat")), &fetcher);
        assert!(matches!(result, Err(ContribError::EmptyDataset)));

        let state = ViewState::from_result(result);
        assert_eq!(
            state,
            ViewState::Error {
                message: "No contribution data found".into(),
                retry: true
            }
        );
    }

    #[test]
    fn test_pipeline_transport_failure() {
        let fetcher = StubFetcher::failing("HTTP 404: Not Found");
        let result = load_calendar(&StaticSettings(Some("ghost")), &fetcher);

        let state = ViewState::from_result(result);
        assert_eq!(
            state,
            ViewState::Error {
                message: "HTTP 404: Not Found".into(),
                retry: true
            }
        );
        assert!(state.allows_retry());
    }

    #[test]
    fn test_view_state_retry_flags() {
        assert!(!ViewState::Loading.allows_retry());
        assert!(!ViewState::ConfigPrompt.allows_retry());
    }

    #[test]
    fn test_generation_counter() {
        let mut generations = GenerationCounter::new();
        assert_eq!(generations.current(), 0);

        let first = generations.next();
        assert!(generations.is_current(first));

        let second = generations.next();
        assert!(!generations.is_current(first));
        assert!(generations.is_current(second));
        assert!(second > first);
    }
}
