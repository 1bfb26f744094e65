//! Schedule value types shared by medication records and client drafts.
//!
//! Values keep the text the caller sent and expose what could be parsed
//! from it, so a stored document echoes its input unchanged.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::enums::AdherenceStatus;

/// A dosing day as the caller wrote it (`Mon`, `monday`, `Weekdays`...).
///
/// Any text is accepted; `weekday()` is set when the label names one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DosageDay {
    label: String,
    weekday: Option<Weekday>,
}

impl DosageDay {
    pub fn parse(label: impl Into<String>) -> Self {
        let label = label.into();
        let weekday = label.trim().parse::<Weekday>().ok();
        Self { label, weekday }
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.weekday
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl From<Weekday> for DosageDay {
    /// Uses the full English name, e.g. `Monday`.
    fn from(weekday: Weekday) -> Self {
        let label = match weekday {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        };
        Self {
            label: label.to_string(),
            weekday: Some(weekday),
        }
    }
}

impl Serialize for DosageDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label)
    }
}

impl<'de> Deserialize<'de> for DosageDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        required_text(deserializer).map(Self::parse)
    }
}

/// Wall-clock time of a dose as the caller wrote it (`08:00`, `8:00 AM`...).
///
/// Any text is accepted; `time()` is set for 24-hour `H:MM[:SS]` or
/// 12-hour `H:MM[:SS] AM/PM` forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOfDay {
    label: String,
    time: Option<NaiveTime>,
}

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p", "%I:%M%p"];

impl TimeOfDay {
    pub fn parse(label: impl Into<String>) -> Self {
        let label = label.into();
        let raw = label.trim();
        let time = TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok());
        Self { label, time }
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl From<NaiveTime> for TimeOfDay {
    /// `HH:MM`, or `HH:MM:SS` when seconds are set.
    fn from(time: NaiveTime) -> Self {
        let label = if time.second() == 0 {
            time.format("%H:%M").to_string()
        } else {
            time.format("%H:%M:%S").to_string()
        };
        Self {
            label,
            time: Some(time),
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        required_text(deserializer).map(Self::parse)
    }
}

/// A calendar date plus the text it was given as.
///
/// Must parse as `YYYY-MM-DD` or RFC 3339; the original text is what gets
/// stored and returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDate {
    raw: String,
    date: NaiveDate,
}

impl CalendarDate {
    pub fn parse(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        let date = parse_date(&raw)?;
        Ok(Self { raw, date })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            raw: date.to_string(),
            date,
        }
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(D::Error::custom)
    }
}

/// One recorded dose outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdherenceEntry {
    pub date: CalendarDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeOfDay>,
    pub status: AdherenceStatus,
}

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| format!("invalid date: {raw:?}"))
}

/// Scalar JSON as text: strings as-is, numbers and booleans in their JSON
/// form, `null` as absent. Arrays and objects are rejected.
fn scalar_text<E: serde::de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(E::custom(format!("expected a string, got {other}"))),
    }
}

fn required_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    scalar_text::<D::Error>(Value::deserialize(deserializer)?)?
        .ok_or_else(|| D::Error::custom("expected a string, got null"))
}

/// Serde adapter: `null`, missing and `""` all mean no date.
pub mod optional_date {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<CalendarDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => CalendarDate::parse(raw).map(Some).map_err(D::Error::custom),
        }
    }
}

/// Serde adapter: free text that may arrive as a JSON number or boolean.
pub mod scalar_string {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None => Ok(None),
            Some(value) => scalar_text(value),
        }
    }
}

/// Serde adapter: `null` arrays become empty.
pub mod null_as_empty {
    use super::*;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
    }
}
