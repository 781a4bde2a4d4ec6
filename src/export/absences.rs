use crate::core::absence_record::AbsenceRecord;
use crate::errors::AppResult;
use crate::export::OutputFormat;
use crate::models::absence::AbsenceEntry;
use csv::Writer;
use std::io::Write;

/// `2024-02-01: 8 hours, Annual Leave, doctor`
pub fn text_line(entry: &AbsenceEntry) -> String {
    match entry.comment() {
        Some(comment) => format!(
            "{}: {} hours, {}, {comment}",
            entry.date_str(),
            entry.hours(),
            entry.leave_type()
        ),
        None => format!(
            "{}: {} hours, {}",
            entry.date_str(),
            entry.hours(),
            entry.leave_type()
        ),
    }
}

/// Write the ledger in date order.
pub fn write_absences<W: Write>(out: &mut W, record: &AbsenceRecord, format: OutputFormat) -> AppResult<()> {
    match format {
        OutputFormat::Text => {
            for entry in record.entries() {
                writeln!(out, "{}", text_line(entry))?;
            }
        }
        OutputFormat::Json => {
            let entries: Vec<&AbsenceEntry> = record.entries().collect();
            serde_json::to_writer_pretty(&mut *out, &entries)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut wtr = Writer::from_writer(&mut *out);
            wtr.write_record(["date", "type", "hours", "comment"])?;
            for entry in record.entries() {
                wtr.write_record([
                    entry.date_str(),
                    entry.leave_type().to_string(),
                    entry.hours().to_string(),
                    entry.comment().unwrap_or_default().to_string(),
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

    fn record() -> AbsenceRecord {
        let mut record = AbsenceRecord::new();
        record
            .add_from_args("2024-02-01", "Annual Leave", "8 Hours", Some("doctor"))
            .unwrap();
        record
            .add_from_args("2024-01-15", "Sick Leave", "4 Hours", None)
            .unwrap();
        record
    }

    fn render(format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write_absences(&mut buf, &record(), format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_keeps_date_order_and_optional_comment() {
        assert_eq!(
            render(OutputFormat::Text),
            "2024-01-15: 4 hours, Sick Leave\n2024-02-01: 8 hours, Annual Leave, doctor\n"
        );
    }

    #[test]
    fn csv_has_header_and_empty_comment_column() {
        let out = render(OutputFormat::Csv);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "date,type,hours,comment");
        assert_eq!(lines[1], "2024-01-15,Sick Leave,4,");
        assert_eq!(lines[2], "2024-02-01,Annual Leave,8,doctor");
    }

    #[test]
    fn json_uses_type_key() {
        let out = render(OutputFormat::Json);
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v[1]["type"], "Annual Leave");
        assert_eq!(v[1]["hours"], 8);
        assert_eq!(v[0]["comment"], serde_json::Value::Null);
        assert_eq!(v[0]["date"], "2024-01-15");
    }
}
