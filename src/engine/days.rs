use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCount {
    pub business_days: u32,
    pub calendar_days: u32,
}

/// Counts both kinds of days in the closed interval `[start, end]`.
pub fn count_days(start: NaiveDate, end: NaiveDate) -> DayCount {
    DayCount {
        business_days: business_days(start, end),
        calendar_days: calendar_days(start, end),
    }
}

pub fn calendar_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }
    u32::try_from((end - start).num_days() + 1).unwrap_or(u32::MAX)
}

/// Monday to Friday days in `[start, end]`; holidays are not considered.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> u32 {
    let total = calendar_days(start, end);
    // every run of seven consecutive days holds exactly five weekdays
    let first = start.weekday().num_days_from_monday();
    let remainder = (0..total % 7)
        .filter(|offset| (first + offset) % 7 < 5)
        .count() as u32;
    (total / 7) * 5 + remainder
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn full_work_week() {
        let count = count_days(date(2024, 12, 16), date(2024, 12, 20));
        assert_eq!(count, DayCount { business_days: 5, calendar_days: 5 });
    }

    #[test]
    fn weekend_only() {
        let count = count_days(date(2024, 12, 14), date(2024, 12, 15));
        assert_eq!(count, DayCount { business_days: 0, calendar_days: 2 });
    }

    #[test]
    fn single_day() {
        assert_eq!(count_days(date(2024, 12, 18), date(2024, 12, 18)).business_days, 1);
        assert_eq!(count_days(date(2024, 12, 21), date(2024, 12, 21)).business_days, 0);
        assert_eq!(count_days(date(2024, 12, 21), date(2024, 12, 21)).calendar_days, 1);
    }

    #[test]
    fn spans_across_weeks_and_years() {
        // Sunday 2024-12-15 through Friday 2024-12-20
        assert_eq!(business_days(date(2024, 12, 15), date(2024, 12, 20)), 5);
        // Monday 2024-12-30 through Friday 2025-01-10
        assert_eq!(business_days(date(2024, 12, 30), date(2025, 1, 10)), 10);
        // leap day 2024-02-29 is a Thursday
        assert_eq!(count_days(date(2024, 2, 28), date(2024, 3, 1)).calendar_days, 3);
    }

    #[test]
    fn matches_a_day_by_day_walk() {
        let origin = date(2024, 1, 1);
        for offset in 0..14 {
            let start = origin + Duration::days(offset);
            for span in 0..40 {
                let end = start + Duration::days(span);
                let walked = (0..=span)
                    .map(|d| start + Duration::days(d))
                    .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
                    .count() as u32;
                let count = count_days(start, end);
                assert_eq!(count.business_days, walked, "{start}..{end}");
                assert_eq!(count.calendar_days, span as u32 + 1);
                assert!(count.business_days <= count.calendar_days);
            }
        }
    }
}
