//! Deterministic holiday generation.
//!
//! `generate(year)` produces the same read-only entries for a given year
//! every time, with no network or storage access. The rest of the system
//! recognizes holiday entries by their reserved `holiday_` id prefix and
//! excludes them from persistence and from edit operations — they are
//! regenerated per year and merged into the in-memory event set at
//! projection time.
//!
//! Movable feasts come from two mechanisms: Easter via the anonymous
//! Gregorian Computus, and lunisolar observances via a year-keyed lookup
//! table. Years outside the table fall back to an approximate fixed date,
//! and that approximation is flagged to callers rather than passed off as
//! authoritative.

use chrono::NaiveDate;

use crate::dates::format_day;
use crate::types::{EventType, LocalEvent, Recurrence, Reminder};

/// Reserved id prefix marking generated entries.
pub const HOLIDAY_PREFIX: &str = "holiday_";

/// A generated calendar entry plus its provenance.
#[derive(Debug, Clone)]
pub struct Holiday {
    pub event: LocalEvent,
    /// True when the date came from the out-of-table fallback rather than
    /// the Computus or the lookup table.
    pub approximate: bool,
}

/// Whether an event id belongs to the holiday generator.
pub fn is_holiday_id(id: &str) -> bool {
    id.starts_with(HOLIDAY_PREFIX)
}

/// Fixed-date holidays: (month, day, slug, display name).
const FIXED: &[(u32, u32, &str, &str)] = &[
    (1, 1, "new-years-day", "New Year's Day"),
    (2, 14, "valentines-day", "Valentine's Day"),
    (3, 8, "womens-day", "International Women's Day"),
    (5, 1, "may-day", "May Day"),
    (10, 31, "halloween", "Halloween"),
    (12, 24, "christmas-eve", "Christmas Eve"),
    (12, 25, "christmas-day", "Christmas Day"),
    (12, 31, "new-years-eve", "New Year's Eve"),
];

/// Lunar New Year dates (first day of the lunisolar year), 2015–2035.
const LUNAR_NEW_YEAR: &[(i32, u32, u32)] = &[
    (2015, 2, 19),
    (2016, 2, 8),
    (2017, 1, 28),
    (2018, 2, 16),
    (2019, 2, 5),
    (2020, 1, 25),
    (2021, 2, 12),
    (2022, 2, 1),
    (2023, 1, 22),
    (2024, 2, 10),
    (2025, 1, 29),
    (2026, 2, 17),
    (2027, 2, 6),
    (2028, 1, 26),
    (2029, 2, 13),
    (2030, 2, 3),
    (2031, 1, 23),
    (2032, 2, 11),
    (2033, 1, 31),
    (2034, 2, 19),
    (2035, 2, 8),
];

/// Mid-Autumn Festival dates (15th day of the 8th lunar month), 2015–2035.
const MID_AUTUMN: &[(i32, u32, u32)] = &[
    (2015, 9, 27),
    (2016, 9, 15),
    (2017, 10, 4),
    (2018, 9, 24),
    (2019, 9, 13),
    (2020, 10, 1),
    (2021, 9, 21),
    (2022, 9, 10),
    (2023, 9, 29),
    (2024, 9, 17),
    (2025, 10, 6),
    (2026, 9, 25),
    (2027, 9, 15),
    (2028, 10, 3),
    (2029, 9, 22),
    (2030, 9, 12),
    (2031, 10, 1),
    (2032, 9, 19),
    (2033, 9, 8),
    (2034, 9, 27),
    (2035, 9, 16),
];

/// Easter Sunday by the anonymous Gregorian Computus.
fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .expect("computus always yields a valid March or April date")
}

fn entry(year: i32, date: NaiveDate, slug: &str, name: &str) -> LocalEvent {
    let day = format_day(date);
    LocalEvent {
        id: format!("{HOLIDAY_PREFIX}{year}_{slug}"),
        title: name.to_string(),
        all_day: true,
        start_date: day.clone(),
        start_time: None,
        end_date: day,
        end_time: None,
        location: None,
        notes: None,
        color: "red".to_string(),
        reminder: Reminder::None,
        recurrence: Recurrence::None,
        event_type: EventType::Event,
        birth_year: None,
    }
}

fn lookup(table: &[(i32, u32, u32)], year: i32) -> Option<NaiveDate> {
    table
        .iter()
        .find(|(y, _, _)| *y == year)
        .and_then(|(y, m, d)| NaiveDate::from_ymd_opt(*y, *m, *d))
}

/// Generate the holiday set for one calendar year.
pub fn generate(year: i32) -> Vec<Holiday> {
    let mut out = Vec::new();

    for &(month, day, slug, name) in FIXED {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            out.push(Holiday {
                event: entry(year, date, slug, name),
                approximate: false,
            });
        }
    }

    let easter = easter_sunday(year);
    out.push(Holiday {
        event: entry(year, easter - chrono::Duration::days(2), "good-friday", "Good Friday"),
        approximate: false,
    });
    out.push(Holiday {
        event: entry(year, easter, "easter-sunday", "Easter Sunday"),
        approximate: false,
    });
    out.push(Holiday {
        event: entry(year, easter + chrono::Duration::days(1), "easter-monday", "Easter Monday"),
        approximate: false,
    });

    // Lunisolar observances: table hit, or a flagged approximation.
    let (lny, lny_approx) = match lookup(LUNAR_NEW_YEAR, year) {
        Some(d) => (d, false),
        None => (
            NaiveDate::from_ymd_opt(year, 2, 1).expect("Feb 1 exists in every year"),
            true,
        ),
    };
    out.push(Holiday {
        event: entry(year, lny, "lunar-new-year", "Lunar New Year"),
        approximate: lny_approx,
    });

    let (ma, ma_approx) = match lookup(MID_AUTUMN, year) {
        Some(d) => (d, false),
        None => (
            NaiveDate::from_ymd_opt(year, 9, 15).expect("Sep 15 exists in every year"),
            true,
        ),
    };
    out.push(Holiday {
        event: entry(year, ma, "mid-autumn-festival", "Mid-Autumn Festival"),
        approximate: ma_approx,
    });

    out.sort_by(|a, b| a.event.start_date.cmp(&b.event.start_date));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_deterministic() {
        let a = generate(2026);
        let b = generate(2026);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.event.id, y.event.id);
            assert_eq!(x.event.start_date, y.event.start_date);
            assert_eq!(x.approximate, y.approximate);
        }
    }

    #[test]
    fn test_fixed_dates_present() {
        let hols = generate(2026);
        let christmas = hols
            .iter()
            .find(|h| h.event.id == "holiday_2026_christmas-day")
            .unwrap();
        assert_eq!(christmas.event.start_date, "2026-12-25");
        assert!(christmas.event.all_day);
        assert!(!christmas.approximate);
    }

    #[test]
    fn test_computus_known_years() {
        assert_eq!(format_day(easter_sunday(2024)), "2024-03-31");
        assert_eq!(format_day(easter_sunday(2025)), "2025-04-20");
        assert_eq!(format_day(easter_sunday(2026)), "2026-04-05");
        assert_eq!(format_day(easter_sunday(2027)), "2027-03-28");
    }

    #[test]
    fn test_good_friday_and_easter_monday_bracket_sunday() {
        let hols = generate(2026);
        let friday = hols
            .iter()
            .find(|h| h.event.id.ends_with("good-friday"))
            .unwrap();
        let monday = hols
            .iter()
            .find(|h| h.event.id.ends_with("easter-monday"))
            .unwrap();
        assert_eq!(friday.event.start_date, "2026-04-03");
        assert_eq!(monday.event.start_date, "2026-04-06");
    }

    #[test]
    fn test_lunar_table_hit_is_exact() {
        let hols = generate(2026);
        let lny = hols
            .iter()
            .find(|h| h.event.id.ends_with("lunar-new-year"))
            .unwrap();
        assert_eq!(lny.event.start_date, "2026-02-17");
        assert!(!lny.approximate);
    }

    #[test]
    fn test_lunar_table_miss_is_flagged_approximate() {
        let hols = generate(2050);
        let lny = hols
            .iter()
            .find(|h| h.event.id.ends_with("lunar-new-year"))
            .unwrap();
        assert!(lny.approximate);
        assert_eq!(lny.event.start_date, "2050-02-01");
        let ma = hols
            .iter()
            .find(|h| h.event.id.ends_with("mid-autumn-festival"))
            .unwrap();
        assert!(ma.approximate);
    }

    #[test]
    fn test_reserved_prefix() {
        for h in generate(2026) {
            assert!(is_holiday_id(&h.event.id));
        }
        assert!(!is_holiday_id("evt-123"));
        assert!(!is_holiday_id("deadline_t1"));
    }
}
