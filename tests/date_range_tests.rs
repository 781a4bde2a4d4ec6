use chrono::NaiveDate;
use worknight::core::parse_date_range;
use worknight::errors::AppError;
use worknight::utils::date::{DateParser, Language};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn english(label: &str) -> (NaiveDate, NaiveDate) {
    let range = parse_date_range(label, &DateParser::new(Language::English)).unwrap();
    (range.start(), range.end())
}

#[test]
fn test_range_across_months() {
    assert_eq!(
        english("29 Jan \u{2013} 4 Feb 2024"),
        (ymd(2024, 1, 29), ymd(2024, 2, 4))
    );
}

#[test]
fn test_range_across_years_with_both_years() {
    assert_eq!(
        english("26 Dec 2022 \u{2013} 1 Jan 2023"),
        (ymd(2022, 12, 26), ymd(2023, 1, 1))
    );
}

#[test]
fn test_range_across_years_without_start_year() {
    assert_eq!(
        english("30 Dec \u{2013} 5 Jan 2025"),
        (ymd(2024, 12, 30), ymd(2025, 1, 5))
    );
}

#[test]
fn test_compact_range_in_one_month() {
    assert_eq!(english("1\u{2013}7 Jan 2024"), (ymd(2024, 1, 1), ymd(2024, 1, 7)));
}

#[test]
fn test_czech_compact_range() {
    let range =
        parse_date_range("6.\u{2013}12. 5. 2024", &DateParser::new(Language::Czech)).unwrap();
    assert_eq!(range.start(), ymd(2024, 5, 6));
    assert_eq!(range.end(), ymd(2024, 5, 12));
    assert_eq!(range.num_days(), 7);
}

#[test]
fn test_three_spaced_segments_fail() {
    let parser = DateParser::new(Language::English);
    let err = parse_date_range("1 Jan \u{2013} 2 Jan \u{2013} 3 Jan 2024", &parser).unwrap_err();
    assert!(matches!(err, AppError::Format(ref m) if m.starts_with("Unknown time range format")));
}

#[test]
fn test_compact_with_too_many_dashes_fails() {
    let parser = DateParser::new(Language::English);
    assert!(matches!(
        parse_date_range("1\u{2013}2\u{2013}7 Jan 2024", &parser),
        Err(AppError::Format(_))
    ));
}

#[test]
fn test_start_with_unexpected_token_count_fails() {
    let parser = DateParser::new(Language::English);
    assert!(matches!(
        parse_date_range("Monday 29 Jan 2024 \u{2013} 4 Feb 2024", &parser),
        Err(AppError::Format(_))
    ));
}

#[test]
fn test_range_overlaps_month() {
    let range = parse_date_range(
        "29 Jan \u{2013} 4 Feb 2024",
        &DateParser::new(Language::English),
    )
    .unwrap();
    assert!(range.overlaps_month(2024, 1));
    assert!(range.overlaps_month(2024, 2));
    assert!(!range.overlaps_month(2024, 3));
    assert!(!range.overlaps_month(2023, 2));
}

#[test]
fn test_four_segments_fail() {
    let parser = DateParser::new(Language::English);
    assert!(matches!(
        parse_date_range("1 Jan \u{2013} 2 Jan \u{2013} 3 Jan \u{2013} 4 Jan 2024", &parser),
        Err(AppError::Format(_))
    ));
}

#[test]
fn test_oversized_numeric_year_is_invalid_date() {
    let parser = DateParser::new(Language::Czech);
    assert!(matches!(
        parse_date_range("1.\u{2013}7. 2. 2147483000", &parser),
        Err(AppError::InvalidDate(_))
    ));
}
