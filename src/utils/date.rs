//! Parsing of the human-readable dates the portal renders.
//!
//! The portal prints dates in the account language and in a handful of
//! shapes: `Thursday, 1 February 2024`, `29 Jan`, `12. 5. 2024`,
//! `January 2024`, `08/01/2024`. Text is tokenized into words and numbers
//! (punctuation is ignored); words must be month or weekday names, numbers
//! are assigned to day/month/year by the presence of a month word and the
//! configured [`DateOrder`].

use crate::errors::{AppError, AppResult};
use crate::models::date_range::DateRange;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}+|\d+").expect("token regex is valid"));

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// ---------------------------
// Languages
// ---------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Czech,
    German,
}

const EN_MONTHS: [&[&str]; 12] = [
    &["january", "jan"],
    &["february", "feb"],
    &["march", "mar"],
    &["april", "apr"],
    &["may"],
    &["june", "jun"],
    &["july", "jul"],
    &["august", "aug"],
    &["september", "sep", "sept"],
    &["october", "oct"],
    &["november", "nov"],
    &["december", "dec"],
];

const CS_MONTHS: [&[&str]; 12] = [
    &["leden", "ledna", "led"],
    &["únor", "února", "úno"],
    &["březen", "března", "bře"],
    &["duben", "dubna", "dub"],
    &["květen", "května", "kvě"],
    &["červen", "června", "čvn"],
    &["červenec", "července", "čvc"],
    &["srpen", "srpna", "srp"],
    &["září", "zář"],
    &["říjen", "října", "říj"],
    &["listopad", "listopadu", "lis"],
    &["prosinec", "prosince", "pro"],
];

const DE_MONTHS: [&[&str]; 12] = [
    &["januar", "jänner", "jan"],
    &["februar", "feb"],
    &["märz", "mär", "mrz"],
    &["april", "apr"],
    &["mai"],
    &["juni", "jun"],
    &["juli", "jul"],
    &["august", "aug"],
    &["september", "sep", "sept"],
    &["oktober", "okt"],
    &["november", "nov"],
    &["dezember", "dez"],
];

const EN_WEEKDAYS: &[&str] = &[
    "monday", "mon", "tuesday", "tue", "tues", "wednesday", "wed", "thursday", "thu", "thur",
    "thurs", "friday", "fri", "saturday", "sat", "sunday", "sun",
];

const CS_WEEKDAYS: &[&str] = &[
    "pondělí", "po", "úterý", "út", "středa", "st", "čtvrtek", "čt", "pátek", "pá", "sobota",
    "so", "neděle", "ne",
];

const DE_WEEKDAYS: &[&str] = &[
    "montag",
    "mo",
    "dienstag",
    "di",
    "mittwoch",
    "mi",
    "donnerstag",
    "do",
    "freitag",
    "fr",
    "samstag",
    "sa",
    "sonntag",
    "so",
];

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Czech => "cs",
            Language::German => "de",
        }
    }

    /// Order used for all-numeric dates when none is requested explicitly.
    pub fn default_order(&self) -> DateOrder {
        match self {
            Language::English => DateOrder::Mdy,
            Language::Czech | Language::German => DateOrder::Dmy,
        }
    }

    fn months(&self) -> &'static [&'static [&'static str]; 12] {
        match self {
            Language::English => &EN_MONTHS,
            Language::Czech => &CS_MONTHS,
            Language::German => &DE_MONTHS,
        }
    }

    fn weekdays(&self) -> &'static [&'static str] {
        match self {
            Language::English => EN_WEEKDAYS,
            Language::Czech => CS_WEEKDAYS,
            Language::German => DE_WEEKDAYS,
        }
    }

    fn month_number(&self, word: &str) -> Option<u32> {
        self.months()
            .iter()
            .position(|names| names.contains(&word))
            .map(|i| i as u32 + 1)
    }

    fn is_weekday(&self, word: &str) -> bool {
        self.weekdays().contains(&word)
    }
}

impl FromStr for Language {
    type Err = AppError;

    /// Accepts `en`, `cs`, `de` and locale-like forms such as `en-GB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        match primary.as_str() {
            "en" | "english" => Ok(Language::English),
            "cs" | "cz" | "czech" => Ok(Language::Czech),
            "de" | "german" => Ok(Language::German),
            _ => Err(AppError::Config(format!("Unsupported account language: {s}"))),
        }
    }
}

/// How all-numeric dates are read. A four-digit number is always a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    Dmy,
    Mdy,
    Ymd,
}

/// Whatever could be read from a date fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateParts {
    pub day: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

// ---------------------------
// Parser
// ---------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParser {
    language: Language,
    order: DateOrder,
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new(Language::English)
    }
}

impl DateParser {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            order: language.default_order(),
        }
    }

    pub fn with_order(mut self, order: DateOrder) -> Self {
        self.order = order;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn month_number(&self, word: &str) -> Option<u32> {
        self.language
            .month_number(word)
            .or_else(|| Language::English.month_number(word))
    }

    fn is_weekday(&self, word: &str) -> bool {
        self.language.is_weekday(word) || Language::English.is_weekday(word)
    }

    /// Split `text` into day/month/year without requiring any of them.
    pub fn parts(&self, text: &str) -> AppResult<DateParts> {
        let invalid = || AppError::InvalidDate(text.trim().to_string());

        let mut month_word = None;
        let mut numbers: Vec<&str> = Vec::new();

        for m in TOKEN_RE.find_iter(text) {
            let token = m.as_str();
            if token.chars().all(|c| c.is_ascii_digit()) {
                numbers.push(token);
                continue;
            }
            let word = token.to_lowercase();
            if let Some(month) = self.month_number(&word) {
                if month_word.is_some() {
                    return Err(invalid());
                }
                month_word = Some(month);
            } else if !self.is_weekday(&word) {
                return Err(invalid());
            }
        }

        let mut years = numbers.iter().filter(|n| n.len() == 4);
        let year = match (years.next(), years.next()) {
            (None, _) => None,
            (Some(y), None) => Some(y.parse::<i32>().map_err(|_| invalid())?),
            (Some(_), Some(_)) => return Err(invalid()),
        };
        let rest: Vec<u32> = numbers
            .iter()
            .filter(|n| n.len() != 4)
            .map(|n| n.parse::<u32>().map_err(|_| invalid()))
            .collect::<AppResult<_>>()?;

        let mut parts = DateParts {
            year,
            month: month_word,
            ..Default::default()
        };

        match (month_word, rest.as_slice()) {
            (_, []) => {}
            (Some(_), [day]) => parts.day = Some(*day),
            (Some(_), _) => return Err(invalid()),
            (None, [n]) if year.is_some() => parts.month = Some(*n),
            (None, [n]) => parts.day = Some(*n),
            (None, [a, b]) => match self.order {
                DateOrder::Dmy => (parts.day, parts.month) = (Some(*a), Some(*b)),
                DateOrder::Mdy | DateOrder::Ymd => (parts.month, parts.day) = (Some(*a), Some(*b)),
            },
            (None, [a, b, c]) if year.is_none() => {
                let (d, m, y) = match self.order {
                    DateOrder::Dmy => (*a, *b, *c),
                    DateOrder::Mdy => (*b, *a, *c),
                    DateOrder::Ymd => (*c, *b, *a),
                };
                // only two-digit years are short forms of 20YY
                let short = i32::try_from(y).ok().filter(|y| *y < 100).ok_or_else(invalid)?;
                parts.day = Some(d);
                parts.month = Some(m);
                parts.year = Some(2000 + short);
            }
            _ => return Err(invalid()),
        }

        if parts.day.is_some_and(|d| !(1..=31).contains(&d))
            || parts.month.is_some_and(|m| !(1..=12).contains(&m))
        {
            return Err(invalid());
        }
        Ok(parts)
    }

    /// A full calendar date; day, month and year must all be present.
    pub fn parse_date(&self, text: &str) -> AppResult<NaiveDate> {
        let parts = self.parts(text)?;
        match (parts.year, parts.month, parts.day) {
            (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d)
                .ok_or_else(|| AppError::InvalidDate(text.trim().to_string())),
            _ => Err(AppError::InvalidDate(text.trim().to_string())),
        }
    }

    /// Day of month only, as in the `1` of `1–7 Jan 2024`.
    pub fn parse_day(&self, text: &str) -> AppResult<u32> {
        self.parts(text)?
            .day
            .ok_or_else(|| AppError::InvalidDate(text.trim().to_string()))
    }

    /// Day and month without a year, as in the `29 Jan` of `29 Jan – 4 Feb 2024`.
    pub fn parse_day_month(&self, text: &str) -> AppResult<(u32, u32)> {
        let parts = self.parts(text)?;
        match (parts.day, parts.month) {
            (Some(d), Some(m)) => Ok((d, m)),
            _ => Err(AppError::InvalidDate(text.trim().to_string())),
        }
    }

    /// First day of the month named by a header such as `January 2024`.
    pub fn parse_month_start(&self, text: &str) -> AppResult<NaiveDate> {
        let parts = self.parts(text)?;
        match (parts.year, parts.month) {
            (Some(y), Some(m)) => NaiveDate::from_ymd_opt(y, m, 1)
                .ok_or_else(|| AppError::InvalidDate(text.trim().to_string())),
            _ => Err(AppError::InvalidDate(text.trim().to_string())),
        }
    }
}

/// `DD/MM/YYYY`, the format of absence detail dialogs.
pub fn parse_dmy_slashed(text: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%d/%m/%Y")
        .map_err(|_| AppError::InvalidDate(text.trim().to_string()))
}

/// `YYYY-MM-DD`, with no surrounding whitespace.
pub fn parse_iso_date(text: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(text.to_string()))
}

/// Decode a calendar event attribute such as `1-5-9-0`
/// (month-day-hour-minute). The attribute carries no year, so the year is
/// the one placing the date inside the displayed range, or the closest to it.
pub fn parse_event_timestamp(attr: &str, shown: &DateRange) -> AppResult<NaiveDateTime> {
    let invalid = || AppError::InvalidDate(attr.to_string());

    let fields: Vec<u32> = attr
        .trim()
        .split('-')
        .map(|p| p.parse::<u32>().map_err(|_| invalid()))
        .collect::<AppResult<_>>()?;
    let [month, day, hour, minute] = fields.as_slice() else {
        return Err(invalid());
    };
    let time = NaiveTime::from_hms_opt(*hour, *minute, 0).ok_or_else(invalid)?;

    let distance = |d: NaiveDate| {
        if d < shown.start() {
            (shown.start() - d).num_days()
        } else if d > shown.end() {
            (d - shown.end()).num_days()
        } else {
            0
        }
    };

    (shown.start().year()..=shown.end().year() + 1)
        .chain(std::iter::once(shown.start().year() - 1))
        .filter_map(|y| NaiveDate::from_ymd_opt(y, *month, *day))
        .min_by_key(|d| distance(*d))
        .map(|d| d.and_time(time))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn long_english_date_with_weekday() {
        let p = DateParser::default();
        assert_eq!(p.parse_date("Thursday, 1 February 2024").unwrap(), ymd(2024, 2, 1));
    }

    #[test]
    fn czech_numeric_date_is_day_first() {
        let p = DateParser::new(Language::Czech);
        assert_eq!(p.parse_date("12. 5. 2024").unwrap(), ymd(2024, 5, 12));
        assert_eq!(p.parse_day("6.").unwrap(), 6);
    }

    #[test]
    fn czech_genitive_month_name() {
        let p = DateParser::new(Language::Czech);
        assert_eq!(p.parse_date("1. února 2024").unwrap(), ymd(2024, 2, 1));
    }

    #[test]
    fn ymd_order_reads_iso_like_numbers() {
        let p = DateParser::default().with_order(DateOrder::Ymd);
        assert_eq!(p.parse_date("2024-02-01").unwrap(), ymd(2024, 2, 1));
    }

    #[test]
    fn unknown_word_is_rejected() {
        let p = DateParser::default();
        assert!(matches!(
            p.parse_date("1 Smarch 2024"),
            Err(AppError::InvalidDate(_))
        ));
    }

    #[test]
    fn month_header_defaults_to_first_day() {
        let p = DateParser::default();
        assert_eq!(p.parse_month_start("January 2024").unwrap(), ymd(2024, 1, 1));
    }

    #[test]
    fn leap_day_event_resolves_to_leap_year() {
        let shown = DateRange::new(ymd(2024, 2, 26), ymd(2024, 3, 3)).unwrap();
        let ts = parse_event_timestamp("2-29-9-30", &shown).unwrap();
        assert_eq!(ts, ymd(2024, 2, 29).and_hms_opt(9, 30, 0).unwrap());
    }

    #[test]
    fn event_in_year_crossing_week() {
        let shown = DateRange::new(ymd(2024, 12, 30), ymd(2025, 1, 5)).unwrap();
        let ts = parse_event_timestamp("1-2-13-0", &shown).unwrap();
        assert_eq!(ts.date(), ymd(2025, 1, 2));
        let ts = parse_event_timestamp("12-31-0-0", &shown).unwrap();
        assert_eq!(ts.date(), ymd(2024, 12, 31));
    }

    #[test]
    fn short_year_numeric_date() {
        let p = DateParser::new(Language::Czech);
        assert_eq!(p.parse_date("1 2 24").unwrap(), ymd(2024, 2, 1));
    }

    #[test]
    fn oversized_year_number_is_invalid() {
        let p = DateParser::new(Language::English);
        assert!(matches!(p.parse_date("1 2 2147483000"), Err(AppError::InvalidDate(_))));
        assert!(matches!(p.parse_date("1 2 123"), Err(AppError::InvalidDate(_))));
        assert!(matches!(p.parse_day("1 2 4294967295"), Err(AppError::InvalidDate(_))));
    }

    #[test]
    fn iso_date_rejects_padding() {
        assert_eq!(parse_iso_date("2024-02-01").unwrap(), ymd(2024, 2, 1));
        assert!(matches!(parse_iso_date(" 2024-02-01 "), Err(AppError::InvalidDate(_))));
    }

    #[test]
    fn language_codes() {
        assert_eq!("en-GB".parse::<Language>().unwrap(), Language::English);
        assert_eq!("cs".parse::<Language>().unwrap(), Language::Czech);
        assert!("xx".parse::<Language>().is_err());
    }
}
