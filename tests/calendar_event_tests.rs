use chrono::NaiveDate;
use worknight::models::calendar_event::CalendarEvent;
use worknight::models::date_range::DateRange;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn week(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end).unwrap()
}

#[test]
fn test_own_event_from_attributes() {
    let shown = week(ymd(2024, 1, 1), ymd(2024, 1, 7));
    let event = CalendarEvent::from_attributes(
        "1-5-9-0",
        "1-5-13-0",
        "Regular/Time Worked",
        "09:00 - 13:00 (Meal)",
        "4 Hours",
        &shown,
    )
    .unwrap();

    assert_eq!(event.start, ymd(2024, 1, 5).and_hms_opt(9, 0, 0).unwrap());
    assert_eq!(event.end, ymd(2024, 1, 5).and_hms_opt(13, 0, 0).unwrap());
    assert_eq!(event.subtitle2, "4 Hours");
    assert!(!event.spans_multiple_days());
}

#[test]
fn test_minutes_are_kept() {
    let shown = week(ymd(2024, 1, 1), ymd(2024, 1, 7));
    let event =
        CalendarEvent::from_attributes("1-5-13-30", "1-5-17-30", "Regular", "", "", &shown).unwrap();
    assert_eq!(event.start.format("%H:%M").to_string(), "13:30");
    assert_eq!(event.end.format("%H:%M").to_string(), "17:30");
}

#[test]
fn test_event_outside_requested_month() {
    let shown = week(ymd(2024, 1, 29), ymd(2024, 2, 4));
    let january = CalendarEvent::from_attributes("1-31-0-0", "1-31-0-0", "Holiday", "", "", &shown).unwrap();
    let february = CalendarEvent::from_attributes("2-1-0-0", "2-1-0-0", "Regular", "", "", &shown).unwrap();

    assert!(january.within_month(2024, 1));
    assert!(!february.within_month(2024, 1));
    assert!(february.within_month(2024, 2));
}

#[test]
fn test_multi_day_event() {
    let shown = week(ymd(2024, 1, 1), ymd(2024, 1, 7));
    let event = CalendarEvent::from_attributes("1-5-0-0", "1-6-0-0", "Trip", "", "", &shown).unwrap();
    assert!(event.spans_multiple_days());
}

#[test]
fn test_malformed_attribute() {
    let shown = week(ymd(2024, 1, 1), ymd(2024, 1, 7));
    assert!(CalendarEvent::from_attributes("1-5-9", "1-5-13-0", "x", "", "", &shown).is_err());
    assert!(CalendarEvent::from_attributes("13-5-9-0", "1-5-13-0", "x", "", "", &shown).is_err());
}
