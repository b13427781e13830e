//! Recognizers for inherently non-reproducible substrings.
//!
//! Some output can never be captured twice identically: object addresses and
//! wall-clock timestamps change on every run. When the primary adjusted
//! comparison fails, both sides are passed through [`strip_varying`] and
//! compared once more; equality there classifies the pair as
//! `Validity::Varying`. The stripped text is only used for that second-chance
//! check and is never reported back to the user.

use once_cell::sync::Lazy;
use regex::Regex;

/// An object address as printed by a default `toString`: `@` followed by
/// five to seven lowercase hex-ish characters.
pub(crate) static MEM_LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@[0-9a-z]{5,7}").expect("memory-location pattern"));

/// A `Date`-style stamp: optional weekday, then "Mon DD HH:MM:SS TZ YYYY".
static DATESTAMP_CTIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[MTWFS][a-z]{2} )?[JFMASOND][a-z]{2} \d{1,2} \d{2}:\d{2}:\d{2} [A-Z]{3} \d{4}")
        .expect("ctime datestamp pattern")
});

/// A locale-formatted stamp: "Mon DD, YYYY H:MM:SS AM/PM".
static DATESTAMP_LOCALE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[JFMASOND][a-z]{2} \d{1,2}, \d{4} \d{1,2}:\d{1,2}:\d{1,2} (?:AM|PM)")
        .expect("locale datestamp pattern")
});

/// Deletes every match of the volatile patterns, in declaration order.
pub fn strip_varying(text: &str) -> String {
    let mut stripped = text.to_string();
    for pattern in [&*MEM_LOCATION, &*DATESTAMP_CTIME, &*DATESTAMP_LOCALE] {
        stripped = pattern.replace_all(&stripped, "").into_owned();
    }
    stripped
}
