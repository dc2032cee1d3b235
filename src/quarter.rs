// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::{Datelike, NaiveDate};
use log::info;

/// Last day of the most recently completed calendar quarter before `today`.
///
/// Rates are published quarterly, so on 2023-11-02 this returns 2023-09-30
/// and anywhere in January to March it returns December 31 of the previous
/// year.
pub fn last_quarter_end(today: NaiveDate) -> NaiveDate {
    let year = today.year();
    let (year, month, day) = match today.month() {
        1..=3 => (year - 1, 12, 31),
        4..=6 => (year, 3, 31),
        7..=9 => (year, 6, 30),
        10..=12 => (year, 9, 30),
        month => unreachable!("month {} is outside 1..=12", month),
    };

    let last_quarter = NaiveDate::from_ymd_opt(year, month, day)
        .expect("quarter end is always a valid calendar date");
    info!("Established last quarter as {} (today is {})", last_quarter, today);
    last_quarter
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn every_day_of(year: i32, months: std::ops::RangeInclusive<u32>) -> Vec<NaiveDate> {
        let mut day = date(year, *months.start(), 1);
        let mut days = Vec::new();
        while day.year() == year && months.contains(&day.month()) {
            days.push(day);
            day = day.succ_opt().unwrap();
        }
        days
    }

    #[test]
    fn test_second_quarter_returns_march_31() {
        for year in [2019, 2020, 2023, 2024] {
            for today in every_day_of(year, 4..=6) {
                assert_eq!(last_quarter_end(today), date(year, 3, 31), "{}", today);
            }
        }
    }

    #[test]
    fn test_first_quarter_returns_previous_december_31() {
        for year in [2020, 2021, 2024, 2025] {
            for today in every_day_of(year, 1..=3) {
                assert_eq!(last_quarter_end(today), date(year - 1, 12, 31), "{}", today);
            }
        }
    }

    #[test]
    fn test_third_and_fourth_quarters() {
        for today in every_day_of(2023, 7..=9) {
            assert_eq!(last_quarter_end(today), date(2023, 6, 30));
        }
        for today in every_day_of(2023, 10..=12) {
            assert_eq!(last_quarter_end(today), date(2023, 9, 30));
        }
    }

    #[test]
    fn test_year_rollover_around_leap_years() {
        assert_eq!(last_quarter_end(date(2021, 1, 1)), date(2020, 12, 31));
        assert_eq!(last_quarter_end(date(2025, 1, 1)), date(2024, 12, 31));
        assert_eq!(last_quarter_end(date(2024, 2, 29)), date(2023, 12, 31));
        assert_eq!(last_quarter_end(date(2024, 3, 31)), date(2023, 12, 31));
    }

    #[test]
    fn test_quarter_boundaries() {
        assert_eq!(last_quarter_end(date(2023, 3, 31)), date(2022, 12, 31));
        assert_eq!(last_quarter_end(date(2023, 4, 1)), date(2023, 3, 31));
        assert_eq!(last_quarter_end(date(2023, 6, 30)), date(2023, 3, 31));
        assert_eq!(last_quarter_end(date(2023, 7, 1)), date(2023, 6, 30));
        assert_eq!(last_quarter_end(date(2023, 9, 30)), date(2023, 6, 30));
        assert_eq!(last_quarter_end(date(2023, 10, 1)), date(2023, 9, 30));
        assert_eq!(last_quarter_end(date(2023, 12, 31)), date(2023, 9, 30));
    }
}
