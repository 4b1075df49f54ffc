// Parsing and formatting helpers.
//
// Everything that touches free text from the spreadsheet lives here so the
// classifier and aggregator work on typed values only.
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

// Two-digit years come before their `%Y` twins: `%Y` would otherwise read
// "24" as the year 24.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
];
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%d-%m-%y %H:%M:%S",
    "%d-%m-%y %H:%M",
    "%d.%m.%y %H:%M:%S",
    "%d.%m.%y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];
// Anything earlier is a mangled year ("03/04/202"), not a repair date.
const MIN_YEAR: i32 = 1000;

/// Parse a day-first date, ignoring any time component.
///
/// Missing, blank or unparseable input yields `None`; this never fails.
pub fn parse_date_dayfirst(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = strip_fraction(s);
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
        .filter(|d| d.year() >= MIN_YEAR)
}

/// Drop fractional seconds ("... 00:00:00.000"), looking only past the
/// last `:` so a `.` date separator is left alone.
fn strip_fraction(s: &str) -> &str {
    match s.rfind(':') {
        Some(colon) => match s[colon..].find('.') {
            Some(dot) => &s[..colon + dot],
            None => s,
        },
        None => s,
    }
}

/// Replace the Spanish accented vowels with their plain forms.
pub fn fold_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Á' | 'À' | 'Â' | 'Ä' => 'A',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'Ó' | 'Ò' | 'Ô' | 'Ö' => 'O',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            other => other,
        })
        .collect()
}

/// Trimmed, lower-cased, accent-folded form used by the status predicates.
pub fn normalize_status(s: &str) -> String {
    fold_accents(&s.trim().to_lowercase())
}

/// Decode a field as UTF-8 when valid, otherwise as Latin-1.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1 code points map one-to-one onto U+0000..U+00FF.
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Count with `.` as thousands separator (`1.234.567`).
pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en).replace(',', ".")
}

pub fn format_pct(p: f64) -> String {
    format!("{:.1}%", p)
}
