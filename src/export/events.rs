use crate::errors::AppResult;
use crate::export::OutputFormat;
use crate::models::calendar_event::{CalendarEvent, CalendarEvents};
use csv::Writer;
use std::io::Write;

const DAY_FMT: &str = "%Y-%m-%d";
const MINUTE_FMT: &str = "%Y-%m-%d %H:%M";

fn daily_line(e: &CalendarEvent) -> String {
    let day = e.start.format(DAY_FMT);
    if e.subtitle.is_empty() {
        format!("  - {day}: {}", e.title)
    } else {
        format!("  - {day}: {}, {}", e.subtitle, e.title)
    }
}

fn own_line(e: &CalendarEvent) -> String {
    format!(
        "  - {} - {}: {}, {}",
        e.start.format(MINUTE_FMT),
        e.end.format("%H:%M"),
        e.subtitle2,
        e.title
    )
}

/// Oddities of daily events worth telling the user about.
pub fn event_warnings(events: &CalendarEvents) -> Vec<String> {
    let mut warnings = Vec::new();
    for e in &events.daily {
        if e.spans_multiple_days() {
            warnings.push(format!(
                "Daily event spans multiple days: {} != {}",
                e.start, e.end
            ));
        }
        if !e.subtitle2.is_empty() {
            warnings.push(format!(
                "Daily event has unexpected nonempty subtitle2: {:?}",
                e.subtitle2
            ));
        }
    }
    warnings
}

pub fn write_events<W: Write>(out: &mut W, events: &CalendarEvents, format: OutputFormat) -> AppResult<()> {
    match format {
        OutputFormat::Text => {
            if events.daily.is_empty() {
                writeln!(out, "No daily events!")?;
            } else {
                writeln!(out, "Daily events:")?;
            }
            for e in &events.daily {
                writeln!(out, "{}", daily_line(e))?;
            }
            if events.own.is_empty() {
                writeln!(out, "No own events!")?;
            } else {
                writeln!(out, "Own events:")?;
            }
            for e in &events.own {
                writeln!(out, "{}", own_line(e))?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, events)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut wtr = Writer::from_writer(&mut *out);
            wtr.write_record(["kind", "start", "end", "title", "subtitle", "subtitle2"])?;
            let rows = events
                .daily
                .iter()
                .map(|e| ("daily", e))
                .chain(events.own.iter().map(|e| ("own", e)));
            for (kind, e) in rows {
                wtr.write_record([
                    kind.to_string(),
                    e.start.format(MINUTE_FMT).to_string(),
                    e.end.format(MINUTE_FMT).to_string(),
                    e.title.clone(),
                    e.subtitle.clone(),
                    e.subtitle2.clone(),
                ])?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn event(start: chrono::NaiveDateTime, end: chrono::NaiveDateTime, subtitle: &str, subtitle2: &str) -> CalendarEvent {
        CalendarEvent {
            start,
            end,
            title: "Regular/Time Worked".into(),
            subtitle: subtitle.into(),
            subtitle2: subtitle2.into(),
        }
    }

    #[test]
    fn text_listing() {
        let events = CalendarEvents {
            daily: vec![
                event(at(5, 0, 0), at(5, 0, 0), "8 Hours", ""),
                event(at(8, 0, 0), at(8, 0, 0), "", ""),
            ],
            own: vec![event(at(5, 9, 0), at(5, 13, 0), "09:00 - 13:00 (Meal)", "4 Hours")],
        };
        let mut buf = Vec::new();
        write_events(&mut buf, &events, OutputFormat::Text).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Daily events:\n\
             \x20 - 2024-01-05: 8 Hours, Regular/Time Worked\n\
             \x20 - 2024-01-08: Regular/Time Worked\n\
             Own events:\n\
             \x20 - 2024-01-05 09:00 - 13:00: 4 Hours, Regular/Time Worked\n"
        );
    }

    #[test]
    fn empty_listing() {
        let mut buf = Vec::new();
        write_events(&mut buf, &CalendarEvents::default(), OutputFormat::Text).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "No daily events!\nNo own events!\n");
    }

    #[test]
    fn csv_tags_each_row() {
        let events = CalendarEvents {
            daily: vec![event(at(5, 0, 0), at(5, 0, 0), "", "")],
            own: vec![event(at(5, 9, 0), at(5, 13, 0), "", "4 Hours")],
        };
        let mut buf = Vec::new();
        write_events(&mut buf, &events, OutputFormat::Csv).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("daily,2024-01-05 00:00,"));
        assert!(lines[2].starts_with("own,2024-01-05 09:00,2024-01-05 13:00,"));
    }

    #[test]
    fn warns_about_odd_daily_events() {
        let events = CalendarEvents {
            daily: vec![
                event(at(5, 0, 0), at(6, 0, 0), "", ""),
                event(at(8, 0, 0), at(8, 0, 0), "", "4 Hours"),
                event(at(9, 0, 0), at(9, 0, 0), "", ""),
            ],
            own: vec![],
        };
        let warnings = event_warnings(&events);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("Daily event spans multiple days"));
        assert!(warnings[1].contains("\"4 Hours\""));
    }
}
