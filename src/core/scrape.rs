//! Interpretation of scraped page fragments that needs no browser.

use crate::errors::{AppError, AppResult};
use std::collections::HashMap;
use tracing::warn;

const NO_ITEMS: &str = "No items available.";
const EMPTY_OPTION: &str = "select one";

/// Kind of a clickable absence event, taken from the second field of its
/// `aria-label` (`Approved | Annual Leave | ...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickableAbsence {
    SickDays,
    CzeSickLeave,
    AnnualLeave,
}

impl ClickableAbsence {
    pub fn from_label(label: &str) -> AppResult<Self> {
        let parts: Vec<&str> = label.split(" | ").collect();
        match parts.get(1).copied() {
            Some("Sick Days") => Ok(ClickableAbsence::SickDays),
            Some("CZE Sick Leave") => Ok(ClickableAbsence::CzeSickLeave),
            Some("Annual Leave") => Ok(ClickableAbsence::AnnualLeave),
            _ => Err(AppError::Format(format!(
                "Unexpected clickable absence event: {label}"
            ))),
        }
    }
}

/// Option labels of the "Select Prior Week" dropdown, placeholder removed.
pub fn prior_week_options<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    labels
        .into_iter()
        .map(Into::into)
        .filter(|l| l != EMPTY_OPTION)
        .collect()
}

/// First row of the prior week preview table whose width matches the header,
/// keyed by column title. The empty-state row means the table was emptied
/// under us and is an error.
pub fn prior_week_table_map(
    header: &[String],
    rows: &[Vec<String>],
) -> AppResult<Option<HashMap<String, String>>> {
    for cols in rows {
        if cols.len() == 1 && cols[0] == NO_ITEMS {
            return Err(AppError::Format("Out of sudden no items available.".into()));
        }
        if cols.len() != header.len() {
            warn!(
                header = header.len(),
                columns = cols.len(),
                ?header,
                ?cols,
                "mismatch between header and columns"
            );
            continue;
        }
        return Ok(Some(
            header.iter().cloned().zip(cols.iter().cloned()).collect(),
        ));
    }
    Ok(None)
}

/// True for a full 40-hour week total in either decimal notation.
pub fn is_full_week_total(total: &str) -> bool {
    matches!(total.trim(), "40.00" | "40,00")
}

/// Empty text inputs read back as `""`; the ledger stores them as no comment.
pub fn normalize_comment(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn clickable_kinds() {
        assert_eq!(
            ClickableAbsence::from_label("Approved | Annual Leave | Monday, 5 February 2024")
                .unwrap(),
            ClickableAbsence::AnnualLeave
        );
        assert!(ClickableAbsence::from_label("Approved | Jury Duty | x").is_err());
        assert!(ClickableAbsence::from_label("Approved").is_err());
    }

    #[test]
    fn table_map_skips_mismatched_rows() {
        let header = strings(&["Week", "Total"]);
        let rows = vec![strings(&["only one"]), strings(&["29/01/2024", "40.00"])];
        let map = prior_week_table_map(&header, &rows).unwrap().unwrap();
        assert_eq!(map["Total"], "40.00");
    }

    #[test]
    fn table_map_empty_state_is_error() {
        let header = strings(&["Week", "Total"]);
        let rows = vec![strings(&[NO_ITEMS])];
        assert!(prior_week_table_map(&header, &rows).is_err());
    }

    #[test]
    fn full_week_totals() {
        assert!(is_full_week_total("40.00"));
        assert!(is_full_week_total("40,00"));
        assert!(!is_full_week_total("32.00"));
    }

    #[test]
    fn placeholder_option_dropped() {
        let opts = prior_week_options(["select one", "29/01/2024 - 04/02/2024"]);
        assert_eq!(opts, vec!["29/01/2024 - 04/02/2024".to_string()]);
    }
}
