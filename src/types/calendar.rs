//! Contribution calendar types

use chrono::NaiveDate;
use serde::Serialize;

/// Activity intensity bucket of a single day (0-4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(into = "u8")]
pub enum ActivityLevel {
    /// No contributions
    #[default]
    None,
    Low,
    Medium,
    High,
    /// Busiest bucket
    Max,
}

impl ActivityLevel {
    /// All levels in ascending order
    pub const ALL: [ActivityLevel; 5] = [
        Self::None,
        Self::Low,
        Self::Medium,
        Self::High,
        Self::Max,
    ];

    /// Map an integer onto a level, clamping into 0..=4
    pub fn from_clamped(value: i64) -> Self {
        match value.clamp(0, 4) {
            0 => Self::None,
            1 => Self::Low,
            2 => Self::Medium,
            3 => Self::High,
            _ => Self::Max,
        }
    }

    /// Parse a `data-level` attribute value.
    ///
    /// Absent or non-numeric values fall back to `None`; numbers outside the
    /// bucket range are clamped.
    pub fn from_attr(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .map(Self::from_clamped)
            .unwrap_or_default()
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Max => 4,
        }
    }

    /// Display character for plain-text output
    pub fn to_char(self) -> char {
        match self {
            Self::None => '·',
            Self::Low => '░',
            Self::Medium => '▒',
            Self::High => '▓',
            Self::Max => '█',
        }
    }
}

impl From<ActivityLevel> for u8 {
    fn from(level: ActivityLevel) -> Self {
        level.as_u8()
    }
}

/// One day of the contribution calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub level: ActivityLevel,
    pub tooltip_text: String,
}

/// Output of markup extraction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    /// Summary heading, e.g. "123 contributions in the last year" (may be empty)
    pub total_label: String,
    /// Day records in document order
    pub records: Vec<DayRecord>,
}

/// Days belonging to one Sunday-to-Saturday span, ascending by date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekColumn {
    /// The Sunday that begins this week
    pub week_start: NaiveDate,
    pub days: Vec<DayRecord>,
}

/// A fully loaded calendar, ready to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarData {
    pub username: String,
    pub profile_url: String,
    pub total_label: String,
    pub weeks: Vec<WeekColumn>,
}

impl CalendarData {
    /// Number of day records across all weeks
    pub fn day_count(&self) -> usize {
        self.weeks.iter().map(|w| w.days.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_attr_valid() {
        for n in 0..=4u8 {
            let level = ActivityLevel::from_attr(Some(&n.to_string()));
            assert_eq!(level.as_u8(), n);
        }
    }

    #[test]
    fn test_level_from_attr_missing_or_invalid() {
        assert_eq!(ActivityLevel::from_attr(None), ActivityLevel::None);
        assert_eq!(ActivityLevel::from_attr(Some("")), ActivityLevel::None);
        assert_eq!(ActivityLevel::from_attr(Some("high")), ActivityLevel::None);
        assert_eq!(ActivityLevel::from_attr(Some("2.5")), ActivityLevel::None);
        assert_eq!(ActivityLevel::from_attr(Some("3abc")), ActivityLevel::None);
    }

    #[test]
    fn test_level_from_attr_clamps() {
        assert_eq!(ActivityLevel::from_attr(Some("7")), ActivityLevel::Max);
        assert_eq!(ActivityLevel::from_attr(Some("-3")), ActivityLevel::None);
        assert_eq!(ActivityLevel::from_attr(Some(" 3 ")), ActivityLevel::High);
    }

    #[test]
    fn test_level_serializes_as_integer() {
        let json = serde_json::to_string(&ActivityLevel::High).unwrap();
        assert_eq!(json, "3");
    }

    #[test]
    fn test_level_ordering() {
        assert!(ActivityLevel::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_day_count() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let day = DayRecord {
            date,
            level: ActivityLevel::Low,
            tooltip_text: String::new(),
        };
        let data = CalendarData {
            username: "octocat".into(),
            profile_url: "https://github.com/octocat".into(),
            total_label: String::new(),
            weeks: vec![
                WeekColumn {
                    week_start: date,
                    days: vec![day.clone(), day.clone()],
                },
                WeekColumn {
                    week_start: date,
                    days: vec![day],
                },
            ],
        };
        assert_eq!(data.day_count(), 3);
    }
}
