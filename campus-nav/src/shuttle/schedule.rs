//! Fixed weekday shuttle timetable.
//!
//! The timetable stores times of day only. Concrete departure instants are
//! built against the queried calendar date on every lookup, so a single
//! `Timetable` answers for any day.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::Serialize;

use super::campus::Campus;

/// Scheduled travel time between the two stops.
pub const SHUTTLE_TRAVEL_MINUTES: i64 = 30;

/// Error returned when parsing an invalid timetable entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid departure time {raw:?}: {reason}")]
pub struct TimeError {
    raw: String,
    reason: &'static str,
}

impl TimeError {
    fn new(raw: &str, reason: &'static str) -> Self {
        Self {
            raw: raw.to_string(),
            reason,
        }
    }
}

/// Which weekly timetable applies on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScheduleKey {
    #[serde(rename = "MON_THU")]
    MonThu,
    #[serde(rename = "FRIDAY")]
    Friday,
}

impl ScheduleKey {
    /// The schedule class for `date`, or `None` on weekends.
    pub fn for_date(date: NaiveDate) -> Option<ScheduleKey> {
        match date.weekday() {
            Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => Some(ScheduleKey::MonThu),
            Weekday::Fri => Some(ScheduleKey::Friday),
            Weekday::Sat | Weekday::Sun => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleKey::MonThu => "MON_THU",
            ScheduleKey::Friday => "FRIDAY",
        }
    }
}

/// Whether the shuttle runs at all on `date`.
pub fn is_operating(date: NaiveDate) -> bool {
    ScheduleKey::for_date(date).is_some()
}

/// A time-of-day timetable entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartureTime {
    time: NaiveTime,
    is_last_bus: bool,
}

impl DepartureTime {
    /// Parse `"HH:MM"`, optionally suffixed with `*` to mark the last bus.
    ///
    /// ```
    /// use campus_nav::shuttle::DepartureTime;
    ///
    /// let last = DepartureTime::parse("18:30*").unwrap();
    /// assert!(last.is_last_bus());
    /// assert_eq!(last.label(), "18:30");
    ///
    /// assert!(DepartureTime::parse("1830").is_err());
    /// assert!(DepartureTime::parse("24:00").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, TimeError> {
        let trimmed = raw.trim();
        let (s, is_last_bus) = match trimmed.strip_suffix('*') {
            Some(rest) => (rest.trim_end(), true),
            None => (trimmed, false),
        };

        if s.len() != 5 {
            return Err(TimeError::new(raw, "expected HH:MM format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' {
            return Err(TimeError::new(raw, "expected colon at position 2"));
        }

        let hour = parse_two_digits(&bytes[0..2])
            .ok_or_else(|| TimeError::new(raw, "invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new(raw, "hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new(raw, "invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new(raw, "minute must be 0-59"));
        }

        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| TimeError::new(raw, "invalid time"))?;

        Ok(Self { time, is_last_bus })
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn is_last_bus(&self) -> bool {
        self.is_last_bus
    }

    /// `HH:MM` without the last-bus marker.
    pub fn label(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// A concrete departure on a specific date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub label: String,
    pub is_last_bus: bool,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub from_campus: Campus,
    pub to_campus: Campus,
    pub travel_minutes: i64,
}

impl ScheduleEntry {
    /// `"departs 09:15"` or `"departs 18:30, last bus"`.
    pub fn describe(&self) -> String {
        if self.is_last_bus {
            format!("departs {}, last bus", self.label)
        } else {
            format!("departs {}", self.label)
        }
    }
}

/// Timetable entries for one campus on one schedule class.
type Direction = (ScheduleKey, Campus);

const MON_THU_FROM_SGW: &[&str] = &[
    "09:15", "09:30", "09:45", "10:00", "10:15", "10:30", "10:45", "11:00", "11:15", "11:30",
    "11:45", "12:30", "12:45", "13:00", "13:15", "13:30", "13:45", "14:00", "14:15", "14:30",
    "14:45", "15:00", "15:15", "15:30", "16:00", "16:15", "16:45", "17:00", "17:15", "17:30",
    "17:45", "18:00", "18:15", "18:30", "18:45*",
];

const MON_THU_FROM_LOY: &[&str] = &[
    "09:15", "09:30", "09:45", "10:00", "10:15", "10:30", "10:45", "11:00", "11:15", "11:30",
    "11:45", "12:00", "12:15", "12:45", "13:00", "13:15", "13:30", "13:45", "14:00", "14:15",
    "14:30", "14:45", "15:00", "15:15", "15:30", "15:45", "16:30", "16:45", "17:00", "17:15",
    "17:30", "17:45", "18:00", "18:15", "18:30*",
];

const FRIDAY_FROM_SGW: &[&str] = &[
    "09:45", "10:00", "10:15", "10:45", "11:15", "11:30", "12:15", "12:30", "12:45", "13:15",
    "13:45", "14:00", "14:45", "15:00", "15:15", "15:45", "16:00", "16:45", "17:15", "17:45",
    "18:15*",
];

const FRIDAY_FROM_LOY: &[&str] = &[
    "09:15", "09:30", "09:45", "10:15", "10:45", "11:00", "11:15", "12:00", "12:15", "12:45",
    "13:00", "13:15", "13:45", "14:15", "14:30", "15:00", "15:15", "15:45", "16:45", "17:15",
    "17:45", "18:15*",
];

/// Raw departure lists for each schedule class and origin campus.
const CONCORDIA_TABLES: [(ScheduleKey, Campus, &[&str]); 4] = [
    (ScheduleKey::MonThu, Campus::Sgw, MON_THU_FROM_SGW),
    (ScheduleKey::MonThu, Campus::Loy, MON_THU_FROM_LOY),
    (ScheduleKey::Friday, Campus::Sgw, FRIDAY_FROM_SGW),
    (ScheduleKey::Friday, Campus::Loy, FRIDAY_FROM_LOY),
];

/// Weekly shuttle timetable.
///
/// Shared freely between controllers: every query is a pure function of the
/// static tables and its arguments.
#[derive(Debug, Clone)]
pub struct Timetable {
    departures: HashMap<Direction, Vec<DepartureTime>>,
    travel_minutes: i64,
}

impl Timetable {
    /// Build a timetable from raw `"HH:MM[*]"` lists.
    ///
    /// Each list must already be in chronological order.
    pub fn from_raw(
        entries: &[(ScheduleKey, Campus, &[&str])],
        travel_minutes: i64,
    ) -> Result<Self, TimeError> {
        let mut departures = HashMap::new();
        for (key, campus, times) in entries {
            let parsed = times
                .iter()
                .map(|raw| DepartureTime::parse(raw))
                .collect::<Result<Vec<_>, _>>()?;
            departures.insert((*key, *campus), parsed);
        }

        Ok(Self {
            departures,
            travel_minutes,
        })
    }

    /// The Concordia inter-campus shuttle timetable.
    pub fn concordia() -> Self {
        Self::from_raw(&CONCORDIA_TABLES, SHUTTLE_TRAVEL_MINUTES).unwrap_or_else(|e| {
            tracing::error!(error = %e, "built-in shuttle timetable is malformed");
            Self {
                departures: HashMap::new(),
                travel_minutes: SHUTTLE_TRAVEL_MINUTES,
            }
        })
    }

    pub fn travel_minutes(&self) -> i64 {
        self.travel_minutes
    }

    /// Whether the shuttle runs on `date`.
    pub fn is_operating(&self, date: NaiveDate) -> bool {
        is_operating(date)
    }

    /// Every departure from `from` on `date`, in schedule order.
    pub fn departures_for(&self, from: Campus, date: NaiveDate) -> Vec<ScheduleEntry> {
        let Some(key) = ScheduleKey::for_date(date) else {
            return Vec::new();
        };

        self.departures
            .get(&(key, from))
            .map(|times| times.iter().map(|t| self.entry(from, date, t)).collect())
            .unwrap_or_default()
    }

    /// Up to `count` departures from `from` at or after `from_instant`,
    /// looking only at `from_instant`'s calendar day.
    pub fn next_departures(
        &self,
        from: Campus,
        count: usize,
        from_instant: NaiveDateTime,
    ) -> Vec<ScheduleEntry> {
        self.departures_for(from, from_instant.date())
            .into_iter()
            .filter(|e| e.departure_time >= from_instant)
            .take(count)
            .collect()
    }

    /// The first departure from `from` at or after `from_instant`.
    pub fn next_departure(
        &self,
        from: Campus,
        from_instant: NaiveDateTime,
    ) -> Option<ScheduleEntry> {
        self.next_departures(from, 1, from_instant).into_iter().next()
    }

    fn entry(&self, from: Campus, date: NaiveDate, t: &DepartureTime) -> ScheduleEntry {
        let departure_time = date.and_time(t.time());
        ScheduleEntry {
            label: t.label(),
            is_last_bus: t.is_last_bus(),
            departure_time,
            arrival_time: departure_time + Duration::minutes(self.travel_minutes),
            from_campus: from,
            to_campus: from.other(),
            travel_minutes: self.travel_minutes,
        }
    }
}

impl Default for Timetable {
    fn default() -> Self {
        Self::concordia()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        d.and_hms_opt(h, m, 0).unwrap()
    }

    // 2026-02-23 is a Monday.
    fn monday() -> NaiveDate {
        date(2026, 2, 23)
    }

    fn friday() -> NaiveDate {
        date(2026, 2, 27)
    }

    #[test]
    fn schedule_keys() {
        assert_eq!(ScheduleKey::for_date(date(2026, 2, 24)), Some(ScheduleKey::MonThu));
        assert_eq!(ScheduleKey::for_date(date(2026, 2, 26)), Some(ScheduleKey::MonThu));
        assert_eq!(ScheduleKey::for_date(friday()), Some(ScheduleKey::Friday));
        assert_eq!(ScheduleKey::for_date(date(2026, 2, 28)), None);
        assert_eq!(ScheduleKey::for_date(date(2026, 3, 1)), None);
    }

    #[test]
    fn operating_days() {
        assert!(!is_operating(date(2026, 2, 28)));
        assert!(!is_operating(date(2026, 3, 1)));
        for day in 23..=27 {
            assert!(is_operating(date(2026, 2, day)), "day {day}");
        }
    }

    #[test]
    fn next_departure_monday_morning() {
        let tt = Timetable::concordia();
        let next = tt.next_departure(Campus::Sgw, at(monday(), 9, 0)).unwrap();
        assert_eq!(next.label, "09:15");
        assert_eq!(next.from_campus, Campus::Sgw);
        assert_eq!(next.to_campus, Campus::Loy);
        assert_eq!(next.arrival_time, at(monday(), 9, 45));
        assert_eq!(next.travel_minutes, 30);
        assert!(!next.is_last_bus);
    }

    #[test]
    fn next_departure_friday_uses_friday_table() {
        let tt = Timetable::concordia();
        let next = tt.next_departure(Campus::Sgw, at(friday(), 9, 0)).unwrap();
        assert_eq!(next.label, "09:45");
    }

    #[test]
    fn exact_departure_time_is_included() {
        let tt = Timetable::concordia();
        let next = tt.next_departure(Campus::Loy, at(monday(), 10, 30)).unwrap();
        assert_eq!(next.label, "10:30");
    }

    #[test]
    fn after_last_bus_returns_none() {
        let tt = Timetable::concordia();
        assert!(tt.next_departure(Campus::Sgw, at(monday(), 19, 0)).is_none());
        assert!(tt.next_departures(Campus::Loy, 5, at(friday(), 23, 59)).is_empty());
    }

    #[test]
    fn weekend_has_no_departures() {
        let tt = Timetable::concordia();
        let saturday = date(2026, 2, 28);
        assert!(tt.next_departure(Campus::Sgw, at(saturday, 9, 0)).is_none());
        assert!(tt.departures_for(Campus::Loy, saturday).is_empty());
    }

    #[test]
    fn built_in_tables_parse_cleanly() {
        let tt = Timetable::from_raw(&CONCORDIA_TABLES, SHUTTLE_TRAVEL_MINUTES).unwrap();
        for campus in [Campus::Sgw, Campus::Loy] {
            assert_eq!(
                tt.departures_for(campus, monday()),
                Timetable::concordia().departures_for(campus, monday())
            );
            assert!(!tt.departures_for(campus, friday()).is_empty());
        }
    }

    #[test]
    fn last_bus_flag_and_label() {
        let tt = Timetable::concordia();
        let last = tt
            .departures_for(Campus::Sgw, monday())
            .pop()
            .unwrap();
        assert!(last.is_last_bus);
        assert_eq!(last.label, "18:45");
        assert_eq!(last.describe(), "departs 18:45, last bus");
    }

    #[test]
    fn next_departures_respects_count() {
        let tt = Timetable::concordia();
        let next = tt.next_departures(Campus::Sgw, 3, at(monday(), 9, 0));
        let labels: Vec<_> = next.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["09:15", "09:30", "09:45"]);
    }

    #[test]
    fn from_raw_rejects_bad_entries() {
        let bad: [(ScheduleKey, Campus, &[&str]); 1] =
            [(ScheduleKey::MonThu, Campus::Sgw, &["09:15", "9:30"])];
        assert!(Timetable::from_raw(&bad, 30).is_err());

        let good: [(ScheduleKey, Campus, &[&str]); 1] =
            [(ScheduleKey::Friday, Campus::Loy, &["08:00", "08:20*"])];
        let tt = Timetable::from_raw(&good, 25).unwrap();
        let entries = tt.departures_for(Campus::Loy, friday());
        assert_eq!(entries.len(), 2);
        assert!(entries[1].is_last_bus);
        assert_eq!(entries[0].arrival_time, at(friday(), 8, 25));
        // No Monday table was supplied.
        assert!(tt.departures_for(Campus::Loy, monday()).is_empty());
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(DepartureTime::parse("").is_err());
        assert!(DepartureTime::parse("*").is_err());
        assert!(DepartureTime::parse("12-30").is_err());
        assert!(DepartureTime::parse("12:60").is_err());
        assert!(DepartureTime::parse("ab:cd").is_err());
    }
}
