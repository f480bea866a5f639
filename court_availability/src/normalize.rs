use crate::batch::NormalizedSlot;
use crate::extractor::RawSlot;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use shared_kernel::eastern_date_time::EasternTZDateTime;
use thiserror::Error;

/// No parsing strategy matched the scraped date/time text. Carries the
/// original raw strings so the caller can log exactly what the page said.
#[derive(Debug, Error)]
#[error("no date parsing strategy matched date {raw_date:?}, start time {raw_start_time:?}")]
pub struct DateParseError {
    pub raw_date: String,
    pub raw_start_time: String,
}

/// The booking site renders its schedule in French. Translation is a fixed
/// lookup so further locales only need more rows, and the translated text
/// feeds straight into chrono's `%B` month-name parsing.
const FRENCH_MONTHS: [(&str, &str); 12] = [
    ("janvier", "January"),
    ("février", "February"),
    ("mars", "March"),
    ("avril", "April"),
    ("mai", "May"),
    ("juin", "June"),
    ("juillet", "July"),
    ("août", "August"),
    ("septembre", "September"),
    ("octobre", "October"),
    ("novembre", "November"),
    ("décembre", "December"),
];

fn translate_month(raw: &str) -> String {
    let lowercased = raw.to_lowercase();
    for (french, english) in FRENCH_MONTHS {
        if lowercased.contains(french) {
            return lowercased.replace(french, english);
        }
    }
    raw.to_string()
}

/// Resolves scraped date/time text into fixed-zone instants.
///
/// Strategies, in order:
/// 1. explicit year: `"15 May 2025 18:00"`
/// 2. no year: assume the current year, rolling forward one year when the
///    resulting calendar date is already behind `reference`'s Eastern date
/// 3. comma shape: `"May 15, 18:00"` with the same assumed-year rule
/// 4. month-first without a comma: `"May 15 18:00"`, same assumed-year rule
///
/// The end time, when present, is a bare `HH:MM` pinned to the start's
/// calendar date; cross-midnight slots are a known limitation. An end time
/// that fails to parse degrades to `None` rather than discarding the slot.
pub fn normalize(
    raw_date: &str,
    raw_start_time: &str,
    raw_end_time: &str,
    reference: DateTime<Utc>,
) -> Result<(EasternTZDateTime, Option<EasternTZDateTime>), DateParseError> {
    let start = parse_start(raw_date, raw_start_time, reference).ok_or_else(|| DateParseError {
        raw_date: raw_date.to_string(),
        raw_start_time: raw_start_time.to_string(),
    })?;

    let end = parse_end(raw_end_time, &start);

    let start = EasternTZDateTime::try_from(start).map_err(|_| DateParseError {
        raw_date: raw_date.to_string(),
        raw_start_time: raw_start_time.to_string(),
    })?;

    Ok((start, end.and_then(|end| EasternTZDateTime::try_from(end).ok())))
}

/// Builds a [`NormalizedSlot`] out of a [`RawSlot`], carrying the name,
/// price and reservability through untouched.
pub fn normalize_slot(raw: &RawSlot, reference: DateTime<Utc>) -> Result<NormalizedSlot, DateParseError> {
    let (start, end) = normalize(
        &raw.raw_date,
        &raw.raw_start_time,
        &raw.raw_end_time,
        reference,
    )?;

    Ok(NormalizedSlot {
        name: raw.name.clone(),
        start,
        end,
        price: raw.raw_price.clone(),
        can_reserve: raw.can_reserve,
    })
}

fn parse_start(
    raw_date: &str,
    raw_start_time: &str,
    reference: DateTime<Utc>,
) -> Option<NaiveDateTime> {
    let translated = translate_month(raw_date.trim());
    let date_time = format!("{} {}", translated.trim(), raw_start_time.trim());
    let date_time = date_time.trim();

    if let Ok(parsed) = NaiveDateTime::parse_from_str(date_time, "%d %B %Y %H:%M") {
        return Some(parsed);
    }

    // No explicit year on the page. Assume the reference's (Eastern) year
    // and roll forward when that lands in the past.
    let reference_date = EasternTZDateTime::from(reference).date();
    let year = reference_date.year();

    if let Ok(parsed) =
        NaiveDateTime::parse_from_str(&format!("{date_time} {year}"), "%d %B %H:%M %Y")
    {
        return nearest_future_occurrence(parsed, reference_date);
    }

    if let Some((month_day, time_part)) = date_time.split_once(',') {
        let candidate = format!("{} {} {}", month_day.trim(), year, time_part.trim());
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&candidate, "%B %d %Y %H:%M") {
            return nearest_future_occurrence(parsed, reference_date);
        }
    }

    if let Ok(parsed) =
        NaiveDateTime::parse_from_str(&format!("{date_time} {year}"), "%B %d %H:%M %Y")
    {
        return nearest_future_occurrence(parsed, reference_date);
    }

    None
}

/// A year-less date that already passed belongs to next year's calendar. A
/// date on the reference day itself still counts as the current year.
fn nearest_future_occurrence(
    candidate: NaiveDateTime,
    reference_date: NaiveDate,
) -> Option<NaiveDateTime> {
    if candidate.date() >= reference_date {
        Some(candidate)
    } else {
        // Feb 29 has no occurrence in the following year, so rolling it
        // yields None and the slot surfaces as a DateParseError rather than
        // a guessed Feb 28/Mar 1.
        candidate.with_year(candidate.year() + 1)
    }
}

fn parse_end(raw_end_time: &str, start: &NaiveDateTime) -> Option<NaiveDateTime> {
    let raw_end_time = raw_end_time.trim();
    if raw_end_time.is_empty() {
        return None;
    }
    match NaiveTime::parse_from_str(raw_end_time, "%H:%M") {
        Ok(end) => Some(start.date().and_time(end)),
        Err(err) => {
            tracing::debug!("Ignoring unparseable end time {raw_end_time:?}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize, translate_month, DateParseError, FRENCH_MONTHS};
    use chrono::{DateTime, Datelike, TimeZone, Utc};
    use shared_kernel::eastern_date_time::EasternTZDateTime;

    fn reference(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        // Midday UTC keeps the Eastern date equal to the UTC date.
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn rendered(date_time: &EasternTZDateTime) -> String {
        date_time
            .to_date_time()
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }

    #[test]
    fn an_explicit_year_is_recovered_exactly() {
        let (start, end) =
            normalize("15 mai 2025", "18:00", "19:00", reference(2024, 1, 1)).unwrap();
        assert_eq!(rendered(&start), "2025-05-15 18:00");
        assert_eq!(rendered(&end.unwrap()), "2025-05-15 19:00");
    }

    #[test]
    fn an_explicit_year_in_the_past_is_never_rolled() {
        let (start, _) = normalize("15 mai 2020", "18:00", "", reference(2025, 6, 1)).unwrap();
        assert_eq!(rendered(&start), "2020-05-15 18:00");
    }

    #[test]
    fn a_yearless_future_date_keeps_the_current_year() {
        let (start, _) = normalize("15 mai", "18:00", "", reference(2025, 5, 1)).unwrap();
        assert_eq!(rendered(&start), "2025-05-15 18:00");
    }

    #[test]
    fn a_yearless_past_date_rolls_to_next_year() {
        let (start, _) = normalize("15 mai", "18:00", "", reference(2025, 6, 1)).unwrap();
        assert_eq!(rendered(&start), "2026-05-15 18:00");
    }

    #[test]
    fn a_slot_on_the_reference_day_keeps_the_current_year() {
        // 18:00 on the reference day is not strictly in the past even when
        // the reference moment is later the same evening.
        let late_evening = Utc.with_ymd_and_hms(2025, 5, 16, 1, 0, 0).unwrap(); // 21:00 on May 15th, Eastern
        let (start, _) = normalize("15 mai", "18:00", "", late_evening).unwrap();
        assert_eq!(rendered(&start), "2025-05-15 18:00");
    }

    #[test]
    fn a_leap_day_that_cannot_roll_is_an_error_not_a_guess() {
        // Feb 29 2024 is already past; Feb 29 2025 does not exist.
        let result = normalize("29 février", "18:00", "", reference(2024, 6, 1));
        assert!(result.is_err());
    }

    #[test]
    fn the_comma_separated_month_first_shape_parses() {
        let (start, _) = normalize("mai 15, 18:00", "", "", reference(2025, 5, 1)).unwrap();
        assert_eq!(rendered(&start), "2025-05-15 18:00");
    }

    #[test]
    fn the_month_first_shape_without_a_comma_parses() {
        let (start, _) = normalize("mai 15", "18:00", "", reference(2025, 5, 1)).unwrap();
        assert_eq!(rendered(&start), "2025-05-15 18:00");
    }

    #[test]
    fn every_french_month_translates_to_a_parseable_name() {
        for (index, (french, _)) in FRENCH_MONTHS.iter().enumerate() {
            let (start, _) = normalize(
                &format!("10 {french} 2025"),
                "09:30",
                "",
                reference(2024, 1, 1),
            )
            .unwrap_or_else(|err| panic!("{french}: {err}"));
            assert_eq!(start.to_date_time().month(), index as u32 + 1);
        }
    }

    #[test]
    fn translation_is_case_insensitive() {
        assert_eq!(translate_month("15 MAI"), "15 May");
        assert_eq!(translate_month("3 Décembre"), "3 December");
    }

    #[test]
    fn an_unparseable_end_time_degrades_to_none() {
        let (_, end) = normalize("15 mai 2025", "18:00", "whenever", reference(2025, 1, 1)).unwrap();
        assert!(end.is_none());
    }

    #[test]
    fn unrecognized_text_surfaces_the_raw_strings() {
        let DateParseError {
            raw_date,
            raw_start_time,
        } = normalize("not a date", "nope", "", reference(2025, 1, 1)).unwrap_err();
        assert_eq!(raw_date, "not a date");
        assert_eq!(raw_start_time, "nope");
    }
}
