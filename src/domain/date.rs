// Calendar date parsing for free-form registration and inspection dates
use chrono::{Datelike, NaiveDate};

/// A plain calendar date as written in a customer record.
///
/// Only real calendar dates can be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(day: u32, month: u32, year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn to_naive(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Parse `DD/MM/YYYY`, `YYYY-MM-DD` or an ISO-8601 timestamp.
///
/// Returns `None` for empty or unrecognised input; callers treat that as
/// an unknown date.
pub fn parse_date(input: &str) -> Option<CalendarDate> {
    let value = input.trim();
    if value.is_empty() {
        return None;
    }

    if value.contains('T') {
        return parse_timestamp(value);
    }
    if value.contains('/') {
        return parse_day_first(value);
    }
    if value.contains('-') {
        return parse_year_first(value);
    }
    None
}

fn parse_day_first(value: &str) -> Option<CalendarDate> {
    let mut parts = value.split('/');
    let day = parse_component(parts.next()?, 1, 2)?;
    let month = parse_component(parts.next()?, 1, 2)?;
    let year = parse_component(parts.next()?, 4, 4)?;
    if parts.next().is_some() {
        return None;
    }
    CalendarDate::new(day, month, year as i32)
}

fn parse_year_first(value: &str) -> Option<CalendarDate> {
    let mut parts = value.split('-');
    let year = parse_component(parts.next()?, 4, 4)?;
    let month = parse_component(parts.next()?, 1, 2)?;
    let day = parse_component(parts.next()?, 1, 2)?;
    if parts.next().is_some() {
        return None;
    }
    CalendarDate::new(day, month, year as i32)
}

fn parse_timestamp(value: &str) -> Option<CalendarDate> {
    // The date written before 'T' wins; offsets are not applied.
    let (date, time) = value.split_once('T')?;
    if !is_iso_time(time) {
        return None;
    }
    parse_year_first(date)
}

/// `HH:MM[:SS[.fff]]` or the basic `HHMM[SS]`, then an optional `Z`,
/// `±HH`, `±HHMM` or `±HH:MM`
fn is_iso_time(time: &str) -> bool {
    let (clock, offset) = match time.find(['Z', 'z', '+', '-']) {
        Some(idx) => time.split_at(idx),
        None => (time, ""),
    };

    let (clock, fraction) = match clock.split_once(['.', ',']) {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (clock, None),
    };
    if fraction.is_some_and(|f| f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit())) {
        return false;
    }

    let fields: Vec<&str> = if clock.contains(':') {
        clock.split(':').collect()
    } else if clock.len() % 2 == 0 {
        (0..clock.len()).step_by(2).filter_map(|i| clock.get(i..i + 2)).collect()
    } else {
        return false;
    };
    let limits = [23, 59, 60];
    if fields.len() < 2 || fields.len() > 3 || (fraction.is_some() && fields.len() != 3) {
        return false;
    }
    let clock_ok = fields
        .iter()
        .zip(limits)
        .all(|(field, max)| parse_component(field, 2, 2).is_some_and(|v| v <= max));
    if !clock_ok {
        return false;
    }

    is_iso_offset(offset)
}

fn is_iso_offset(offset: &str) -> bool {
    if offset.is_empty() || offset.eq_ignore_ascii_case("z") {
        return true;
    }
    let Some(rest) = offset.strip_prefix(['+', '-']) else {
        return false;
    };
    let (hours, minutes) = match rest.len() {
        2 => (rest, "00"),
        4 => rest.split_at(2),
        5 => match rest.split_once(':') {
            Some(parts) => parts,
            None => return false,
        },
        _ => return false,
    };
    parse_component(hours, 2, 2).is_some_and(|h| h <= 23)
        && parse_component(minutes, 2, 2).is_some_and(|m| m <= 59)
}

fn parse_component(part: &str, min_len: usize, max_len: usize) -> Option<u32> {
    if part.len() < min_len || part.len() > max_len || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day_first() {
        assert_eq!(parse_date("01/01/2024"), CalendarDate::new(1, 1, 2024));
        assert_eq!(parse_date("5/3/2025"), CalendarDate::new(5, 3, 2025));
        assert_eq!(parse_date(" 29/02/2024 "), CalendarDate::new(29, 2, 2024));
    }

    #[test]
    fn test_parse_year_first() {
        assert_eq!(parse_date("2025-03-15"), CalendarDate::new(15, 3, 2025));
        assert_eq!(parse_date("2025-3-5"), CalendarDate::new(5, 3, 2025));
    }

    #[test]
    fn test_parse_timestamp_keeps_written_date() {
        let expected = CalendarDate::new(15, 3, 2025);
        assert_eq!(parse_date("2025-03-15T00:00:00.000Z"), expected);
        assert_eq!(parse_date("2025-03-15T23:30:00+07:00"), expected);
        assert_eq!(parse_date("2025-03-15T08:15:00"), expected);
        assert_eq!(parse_date("2025-03-15T08:15"), expected);
        assert_eq!(parse_date("2025-03-15T10:00:00+0700"), expected);
        assert_eq!(parse_date("2025-03-15T10:00Z"), expected);
        assert_eq!(parse_date("2025-03-15T10:00:00.000+07"), expected);
        assert_eq!(parse_date("2025-03-15T10:00:00-05:30"), expected);
        assert_eq!(parse_date("2025-03-15T100000Z"), expected);
        assert_eq!(parse_date("2025-3-15T10:00"), expected);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in [
            "",
            "   ",
            "soon",
            "31/02/2024",
            "2024/01/01",
            "01-01-2024",
            "1/1/24",
            "01/01/2024/1",
            "2024-13-01",
            "2024-01-01Tnoon",
            "2024-01-01T",
            "2024-01-01T25:00",
            "2024-01-01T10",
            "2024-01-01T10:00+7",
            "2024-01-01T10:00.5",
            "2024-02-30T10:00:00Z",
            "15/03/2025T10:00",
            "+1/01/2024",
        ] {
            assert_eq!(parse_date(input), None, "input {:?}", input);
        }
    }

    #[test]
    fn test_only_real_dates_exist() {
        assert_eq!(CalendarDate::new(31, 2, 2024), None);
        let date = CalendarDate::new(29, 2, 2024).unwrap();
        assert_eq!((date.day(), date.month(), date.year()), (29, 2, 2024));
        assert_eq!(date.to_naive(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_both_formats_name_the_same_day() {
        let mut date = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        for _ in 0..800 {
            let day_first = date.format("%d/%m/%Y").to_string();
            let year_first = date.format("%Y-%m-%d").to_string();
            let expected = Some(CalendarDate::from(date));
            assert_eq!(parse_date(&day_first), expected);
            assert_eq!(parse_date(&year_first), expected);
            date = date.succ_opt().unwrap();
        }
    }
}
