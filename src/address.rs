// 📮 Address Normalizer
// Free-text mailing address → structured street/city/state/zip/country.
// Pure string work: never fails, never guesses a state or zip it cannot
// find by pattern, no I/O.

use serde::{Deserialize, Serialize};

// ============================================================================
// NORMALIZED ADDRESS
// ============================================================================

/// Structured mailing address. Produced fresh from each raw string; never
/// cached. Fields that could not be extracted stay empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAddress {
    pub line1: String,
    pub line2: String,
    pub city: String,
    /// 2-letter state code, uppercase, or empty.
    pub state: String,
    /// 5-digit zip, optionally zip+4, or empty.
    pub zip: String,
    pub country: String,
}

impl NormalizedAddress {
    fn empty() -> Self {
        NormalizedAddress {
            line1: String::new(),
            line2: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            country: "US".to_string(),
        }
    }

    /// "City, ST 12345" display form used on form fields that want a
    /// single city/state/zip line.
    pub fn city_state_zip(&self) -> String {
        let mut out = String::new();
        if !self.city.is_empty() {
            out.push_str(&self.city);
        }
        if !self.state.is_empty() {
            if !out.is_empty() {
                out.push_str(", ");
            }
            out.push_str(&self.state);
        }
        if !self.zip.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&self.zip);
        }
        out
    }

    /// True when nothing beyond `line1` was extracted from a non-empty
    /// input. Used as the unparseable-address quality flag.
    pub fn is_unparsed(&self) -> bool {
        !self.line1.is_empty() && self.city.is_empty() && self.state.is_empty() && self.zip.is_empty()
    }
}

// ============================================================================
// PARSER
// ============================================================================

/// Parse a free-text address. Empty input yields all-empty fields with
/// `country = "US"`. Worst case returns the whole input as `line1`.
pub fn parse_address(raw: &str) -> NormalizedAddress {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NormalizedAddress::empty();
    }

    let segments: Vec<&str> = trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let mut addr = NormalizedAddress::empty();

    match segments.len() {
        0 => {}
        1 => {
            addr.line1 = segments[0].to_string();
        }
        2 => {
            // "street, City ST 12345" — best-effort whitespace split of the
            // second segment: last token zip, second-to-last state.
            addr.line1 = segments[0].to_string();
            let tokens: Vec<&str> = segments[1].split_whitespace().collect();
            match tokens.len() {
                0 => {}
                1 => addr.city = tokens[0].to_string(),
                n => {
                    addr.zip = tokens[n - 1].to_string();
                    addr.state = tokens[n - 2].to_uppercase();
                    addr.city = tokens[..n - 2].join(" ");
                }
            }
        }
        n => {
            // ≥3 segments: street, [overflow...,] city, "ST 12345"
            match scan_state_zip(segments[n - 1]) {
                Some((state, zip)) => {
                    addr.line1 = segments[0].to_string();
                    addr.state = state;
                    addr.zip = zip;
                    addr.city = segments[n - 2].to_string();
                    if n > 3 {
                        addr.line2 = segments[1..n - 2].join(", ");
                    }
                }
                None => {
                    // No recognizable state/zip: keep the whole original
                    // string rather than misfile segments.
                    addr.line1 = trimmed.to_string();
                }
            }
        }
    }

    addr
}

/// Scan a segment for `([A-Z]{2})\s*(\d{5}(-\d{4})?)?` — leftmost match of
/// two uppercase letters, optionally followed by a zip. Returns the state
/// code and the zip (possibly empty).
fn scan_state_zip(segment: &str) -> Option<(String, String)> {
    let chars: Vec<char> = segment.chars().collect();
    let len = chars.len();

    for i in 0..len.saturating_sub(1) {
        if chars[i].is_ascii_uppercase() && chars[i + 1].is_ascii_uppercase() {
            let state: String = chars[i..i + 2].iter().collect();

            let mut j = i + 2;
            while j < len && chars[j].is_whitespace() {
                j += 1;
            }

            let zip = scan_zip(&chars[j..]);
            return Some((state, zip));
        }
    }
    None
}

/// Read `\d{5}(-\d{4})?` from the start of the slice, or empty.
fn scan_zip(chars: &[char]) -> String {
    if chars.len() < 5 || !chars[..5].iter().all(|c| c.is_ascii_digit()) {
        return String::new();
    }
    let mut zip: String = chars[..5].iter().collect();
    if chars.len() >= 10 && chars[5] == '-' && chars[6..10].iter().all(|c| c.is_ascii_digit()) {
        zip.push('-');
        zip.extend(&chars[6..10]);
    }
    zip
}

// ============================================================================
// TESTS
// ============================================================================
