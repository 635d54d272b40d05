use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Timelike, Utc};

// ---------------------------------------------------------------------------
// CanonicalInstant / ParseOutcome
// ---------------------------------------------------------------------------

/// A timestamp normalised to UTC, keeping whatever sub-second precision the
/// source string carried. Only [`parse`] hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalInstant(DateTime<Utc>);

impl CanonicalInstant {
    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for CanonicalInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

/// Classification of one raw cell. `Unparseable` is a normal outcome, not an
/// error: such rows simply never fall inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(CanonicalInstant),
    Unparseable,
}

impl ParseOutcome {
    pub fn instant(&self) -> Option<CanonicalInstant> {
        match self {
            ParseOutcome::Parsed(t) => Some(*t),
            ParseOutcome::Unparseable => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Accepted formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Carries a UTC offset and a mandatory fractional-seconds part.
    OffsetWithFraction,
    /// No offset: the wall-clock value is taken to be UTC already.
    Naive,
}

/// One accepted timestamp layout, in chrono `strftime` syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampFormat {
    pub pattern: &'static str,
    layout: Layout,
}

const fn naive(pattern: &'static str) -> TimestampFormat {
    TimestampFormat {
        pattern,
        layout: Layout::Naive,
    }
}

/// Accepted layouts in matching priority order. Day/month and month/day
/// layouts overlap, so the order is the tie-breaker and must not change.
pub static FORMATS: [TimestampFormat; 9] = [
    TimestampFormat {
        pattern: "%Y-%m-%dT%H:%M:%S%.f%#z",
        layout: Layout::OffsetWithFraction,
    },
    naive("%Y-%m-%d %H:%M:%S"),
    naive("%d/%m/%Y %H:%M:%S"),
    naive("%m-%d-%Y %H:%M:%S"),
    naive("%Y/%m/%d %H:%M:%S"),
    naive("%Y-%m-%d %H:%M"),
    naive("%d/%m/%Y %H:%M"),
    naive("%m-%d-%Y %H:%M"),
    naive("%Y/%m/%d %H:%M"),
];

/// Date and clock fields of the offset layout, up to the fraction.
const OFFSET_CLOCK: &str = "%Y-%m-%dT%H:%M:%S";

/// Walk `s` against the numeric fields of `pattern` and return what is left.
///
/// chrono is lenient where the accepted layouts are not: `%Y` takes any
/// number of digits and a sign, and a space in the pattern matches no
/// whitespace at all. Here `%Y` is exactly four ASCII digits, the other
/// fields one or two, and a space needs at least one whitespace character.
fn match_shape<'a>(s: &'a str, pattern: &str) -> Option<&'a str> {
    let mut rest = s;
    let mut spec = pattern.chars();
    while let Some(c) = spec.next() {
        match c {
            '%' => {
                let (min, max) = match spec.next()? {
                    'Y' => (4, 4),
                    'm' | 'd' | 'H' | 'M' | 'S' => (1, 2),
                    _ => return None,
                };
                let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
                if digits < min || digits > max {
                    return None;
                }
                rest = &rest[digits..];
            }
            ' ' => {
                let trimmed = rest.trim_start();
                if trimmed.len() == rest.len() {
                    return None;
                }
                rest = trimmed;
            }
            lit => rest = rest.strip_prefix(lit)?,
        }
    }
    Some(rest)
}

/// chrono reads second 60 as a leap second and stores it as an extra
/// nanosecond count; a wall clock tops out at 59.
fn is_leap_second<T: Timelike>(t: &T) -> bool {
    t.nanosecond() >= 1_000_000_000
}

impl TimestampFormat {
    fn try_parse(&self, s: &str) -> Option<DateTime<Utc>> {
        match self.layout {
            Layout::OffsetWithFraction => {
                // chrono treats `%.f` as optional; this layout does not.
                if !match_shape(s, OFFSET_CLOCK)?.starts_with('.') {
                    return None;
                }
                DateTime::parse_from_str(s, self.pattern)
                    .ok()
                    .filter(|dt| !is_leap_second(dt))
                    .map(|dt| dt.with_timezone(&Utc))
            }
            Layout::Naive => {
                if !match_shape(s, self.pattern)?.is_empty() {
                    return None;
                }
                NaiveDateTime::parse_from_str(s, self.pattern)
                    .ok()
                    .filter(|dt| !is_leap_second(dt))
                    .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse a raw cell, returning the first format that matches in full along
/// with the normalised instant.
pub fn parse_detailed(raw: &str) -> Option<(&'static TimestampFormat, CanonicalInstant)> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    FORMATS
        .iter()
        .find_map(|fmt| fmt.try_parse(s).map(|dt| (fmt, CanonicalInstant(dt))))
}

/// Classify a raw cell as a UTC instant or `Unparseable`.
pub fn parse(raw: &str) -> ParseOutcome {
    match parse_detailed(raw) {
        Some((_, instant)) => ParseOutcome::Parsed(instant),
        None => ParseOutcome::Unparseable,
    }
}
