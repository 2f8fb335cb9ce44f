//! Calendar dates as recorded on farm entries and the year/month period filter
//! every report shares.

use std::fmt;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::common::Language;

const DATE_FORMAT: &str = "%Y-%m-%d";

const URDU_MONTHS: [&str; 12] = [
    "جنوری",
    "فروری",
    "مارچ",
    "اپریل",
    "مئی",
    "جون",
    "جولائی",
    "اگست",
    "ستمبر",
    "اکتوبر",
    "نومبر",
    "دسمبر",
];

/// A calendar day exactly as it was stored on a record.
///
/// The raw text is kept so that a malformed value does not make the whole
/// record unreadable; it is parsed on demand and an unparseable value simply
/// never matches a concrete period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordDate(String);

impl RecordDate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses `YYYY-MM-DD`, RFC 3339 timestamps and naive ISO datetimes.
    pub fn parse(&self) -> Option<NaiveDate> {
        let raw = self.0.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            return Some(date);
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(stamp.date_naive());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.date())
    }
}

impl From<NaiveDate> for RecordDate {
    fn from(date: NaiveDate) -> Self {
        Self(date.format(DATE_FORMAT).to_string())
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional year/month narrowing applied to every report.
///
/// `month` is 1-indexed and only takes effect together with `year`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

impl PeriodFilter {
    pub fn all_time() -> Self {
        Self::default()
    }

    pub fn for_year(year: i32) -> Self {
        Self {
            year: Some(year),
            month: None,
        }
    }

    pub fn for_month(year: i32, month: u32) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
        }
    }

    /// The period covering the calendar month of `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self::for_month(date.year(), date.month())
    }

    pub fn is_unbounded(&self) -> bool {
        self.year.is_none() && self.month.is_none()
    }

    /// Decides whether a record dated `date` belongs to this period.
    ///
    /// A month without a year selects everything with a valid date; month
    /// selection across all years is not supported.
    pub fn includes(&self, date: &RecordDate) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(parsed) = date.parse() else {
            return false;
        };
        match self.year {
            Some(year) if parsed.year() != year => false,
            Some(_) => self.month.map_or(true, |month| parsed.month() == month),
            None => true,
        }
    }

    /// Human-readable title such as "July 2024", "Year 2024" or "All Time".
    pub fn title(period: Option<&PeriodFilter>, language: Language) -> String {
        let Some(year) = period.and_then(|p| p.year) else {
            return match language {
                Language::En => "All Time".into(),
                Language::Ur => "تمام عرصہ".into(),
            };
        };
        if let Some(month) = period.and_then(|p| p.month) {
            if let Some(label) = month_label(year, month, language, MonthStyle::Long) {
                return label;
            }
        }
        match language {
            Language::En => format!("Year {year}"),
            Language::Ur => format!("سال {year}"),
        }
    }
}

/// Returns `records` narrowed to `period` using `date_of` to find each
/// record's relevant date. An absent period returns the input unchanged.
pub fn filter_by_period<T, F>(records: Vec<T>, date_of: F, period: Option<&PeriodFilter>) -> Vec<T>
where
    F: Fn(&T) -> &RecordDate,
{
    match period {
        Some(filter) if !filter.is_unbounded() => records
            .into_iter()
            .filter(|record| filter.includes(date_of(record)))
            .collect(),
        _ => records,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MonthStyle {
    Long,
    Short,
}

/// Formats a month heading; `None` when `month` is outside 1..=12.
pub(crate) fn month_label(
    year: i32,
    month: u32,
    language: Language,
    style: MonthStyle,
) -> Option<String> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let label = match language {
        Language::En => match style {
            MonthStyle::Long => first.format("%B %Y").to_string(),
            MonthStyle::Short => first.format("%b %Y").to_string(),
        },
        Language::Ur => format!("{} {}", URDU_MONTHS[(month - 1) as usize], year),
    };
    Some(label)
}

/// Named period shortcuts offered on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodPreset {
    CurrentMonth,
    LastMonth,
    CurrentYear,
    LastYear,
    AllTime,
}

impl PeriodPreset {
    /// Resolves the preset relative to `today`; `AllTime` has no filter.
    pub fn resolve(self, today: NaiveDate) -> Option<PeriodFilter> {
        match self {
            PeriodPreset::CurrentMonth => Some(PeriodFilter::containing(today)),
            PeriodPreset::LastMonth => {
                let previous = today
                    .checked_sub_months(Months::new(1))
                    .unwrap_or(today);
                Some(PeriodFilter::containing(previous))
            }
            PeriodPreset::CurrentYear => Some(PeriodFilter::for_year(today.year())),
            PeriodPreset::LastYear => Some(PeriodFilter::for_year(today.year() - 1)),
            PeriodPreset::AllTime => None,
        }
    }

    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (PeriodPreset::CurrentMonth, Language::En) => "Current Month",
            (PeriodPreset::CurrentMonth, Language::Ur) => "موجودہ مہینہ",
            (PeriodPreset::LastMonth, Language::En) => "Last Month",
            (PeriodPreset::LastMonth, Language::Ur) => "پچھلا مہینہ",
            (PeriodPreset::CurrentYear, Language::En) => "Current Year",
            (PeriodPreset::CurrentYear, Language::Ur) => "موجودہ سال",
            (PeriodPreset::LastYear, Language::En) => "Last Year",
            (PeriodPreset::LastYear, Language::Ur) => "پچھلا سال",
            (PeriodPreset::AllTime, Language::En) => "All Time",
            (PeriodPreset::AllTime, Language::Ur) => "کل عرصہ",
        }
    }
}
