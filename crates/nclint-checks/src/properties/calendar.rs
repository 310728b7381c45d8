//! CF time decoding.
//!
//! Time coordinates are stored as offsets `<unit> since <reference date>`
//! in one of the CF calendars. The Gregorian calendars go through chrono;
//! the fixed-length calendars use plain day arithmetic.

use chrono::{Datelike, NaiveDate, TimeDelta, Timelike};

use crate::error::PropertyError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Supported CF calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calendar {
    /// `standard`, `gregorian` and `proleptic_gregorian`. Dates before
    /// 1582-10-15 are treated as proleptic Gregorian.
    Gregorian,
    /// `noleap` / `365_day`.
    NoLeap,
    /// `all_leap` / `366_day`.
    AllLeap,
    /// `360_day`.
    Day360,
}

impl Calendar {
    pub fn parse(name: &str) -> Result<Self, PropertyError> {
        match name.trim().to_lowercase().as_str() {
            "standard" | "gregorian" | "proleptic_gregorian" => Ok(Self::Gregorian),
            "noleap" | "365_day" => Ok(Self::NoLeap),
            "all_leap" | "366_day" => Ok(Self::AllLeap),
            "360_day" => Ok(Self::Day360),
            _ => Err(PropertyError::Calendar {
                calendar: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gregorian => "standard",
            Self::NoLeap => "noleap",
            Self::AllLeap => "all_leap",
            Self::Day360 => "360_day",
        }
    }

    /// Month lengths of the fixed-length calendars.
    fn month_lengths(self) -> [i64; 12] {
        match self {
            Self::AllLeap => [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31],
            Self::Day360 => [30; 12],
            Self::Gregorian | Self::NoLeap => [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31],
        }
    }
}

/// A broken-down date and time in some calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }

    /// Date stamp used in CMOR filenames for the given `frequency`.
    pub fn stamp(&self, frequency: &str) -> String {
        match frequency {
            "yr" => format!("{:04}", self.year),
            "mon" => format!("{:04}{:02}", self.year, self.month),
            "1hr" | "3hr" | "6hr" => format!(
                "{:04}{:02}{:02}{:02}",
                self.year, self.month, self.day, self.hour
            ),
            _ => format!("{:04}{:02}{:02}", self.year, self.month, self.day),
        }
    }

    fn seconds_of_day(&self) -> i64 {
        i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }
}

/// Parsed `<unit> since <reference>` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    seconds_per_unit: f64,
    reference: CalendarDate,
}

impl TimeUnits {
    pub fn parse(units: &str) -> Result<Self, PropertyError> {
        let error = || PropertyError::TimeUnits {
            units: units.to_string(),
        };
        let lower = units.to_lowercase();
        let (unit, reference) = lower.split_once(" since ").ok_or_else(error)?;
        let seconds_per_unit = match unit.trim() {
            "days" | "day" | "d" => 86_400.0,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3_600.0,
            "minutes" | "minute" | "mins" | "min" => 60.0,
            "seconds" | "second" | "secs" | "sec" | "s" => 1.0,
            _ => return Err(error()),
        };
        let reference = parse_reference(reference).ok_or_else(error)?;
        Ok(Self {
            seconds_per_unit,
            reference,
        })
    }

    pub fn reference(&self) -> CalendarDate {
        self.reference
    }

    /// Date `value` units after the reference date.
    pub fn decode(&self, value: f64, calendar: Calendar) -> Result<CalendarDate, PropertyError> {
        let out_of_range = || PropertyError::DateOutOfRange {
            value,
            calendar: calendar.name().to_string(),
        };
        let offset = value * self.seconds_per_unit;
        if !offset.is_finite() || offset.abs() > 1e15 {
            return Err(out_of_range());
        }
        let offset = offset.round() as i64;
        match calendar {
            Calendar::Gregorian => decode_gregorian(self.reference, offset).ok_or_else(out_of_range),
            fixed => decode_fixed(self.reference, offset, fixed).ok_or_else(out_of_range),
        }
    }
}

fn parse_reference(text: &str) -> Option<CalendarDate> {
    let text = text.trim();
    let (date, time) = match text.find([' ', 't']) {
        Some(idx) => (&text[..idx], text[idx + 1..].trim()),
        None => (text, ""),
    };

    let mut parts = date.split('-');
    let year = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let mut parsed = CalendarDate::new(year, month, day);

    // Anything after the clock time is a timezone offset, which CF files
    // in practice leave at UTC.
    let clock = time
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_end_matches('z');
    if !clock.is_empty() {
        let mut fields = clock.split(':');
        parsed.hour = fields.next()?.parse().ok()?;
        parsed.minute = fields.next().map_or(Some(0), |m| m.parse().ok())?;
        let second: f64 = fields.next().map_or(Some(0.0), |s| s.parse().ok())?;
        parsed.second = second.floor() as u32;
        if parsed.hour > 23 || parsed.minute > 59 || parsed.second > 60 {
            return None;
        }
    }
    Some(parsed)
}

fn decode_gregorian(reference: CalendarDate, offset_seconds: i64) -> Option<CalendarDate> {
    let start = NaiveDate::from_ymd_opt(reference.year, reference.month, reference.day)?
        .and_hms_opt(reference.hour, reference.minute, reference.second.min(59))?;
    let date = start.checked_add_signed(TimeDelta::try_seconds(offset_seconds)?)?;
    Some(CalendarDate {
        year: date.year(),
        month: date.month(),
        day: date.day(),
        hour: date.hour(),
        minute: date.minute(),
        second: date.second(),
    })
}

fn decode_fixed(reference: CalendarDate, offset_seconds: i64, calendar: Calendar) -> Option<CalendarDate> {
    let months = calendar.month_lengths();
    let year_len: i64 = months.iter().sum();
    let month_idx = reference.month as usize - 1;
    if i64::from(reference.day) > months[month_idx] {
        return None;
    }

    let reference_day = i64::from(reference.year) * year_len
        + months[..month_idx].iter().sum::<i64>()
        + i64::from(reference.day)
        - 1;
    let total = reference_day
        .checked_mul(SECONDS_PER_DAY)?
        .checked_add(reference.seconds_of_day())?
        .checked_add(offset_seconds)?;

    let days = total.div_euclid(SECONDS_PER_DAY);
    let seconds = total.rem_euclid(SECONDS_PER_DAY);
    let year = i32::try_from(days.div_euclid(year_len)).ok()?;
    let mut day_of_year = days.rem_euclid(year_len);
    let mut month = 0;
    while day_of_year >= months[month] {
        day_of_year -= months[month];
        month += 1;
    }

    Some(CalendarDate {
        year,
        month: month as u32 + 1,
        day: day_of_year as u32 + 1,
        hour: (seconds / 3600) as u32,
        minute: (seconds % 3600 / 60) as u32,
        second: (seconds % 60) as u32,
    })
}
