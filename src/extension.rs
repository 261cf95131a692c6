//! Pluggable tag extractors applied to the body of a task line.
//!
//! Each extractor recognises one kind of `key:value` tag, parses its value,
//! and hands back the line with the tag removed. The registry runs them in a
//! fixed order, each one seeing what the previous one left behind.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::recurrence::Recurrence;
use crate::validation::parse_date;

/// A value produced by an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagValue {
    Due(NaiveDate),
    Recurrence(Recurrence),
}

/// Outcome of running one extractor over a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Parsed value of the first matching tag, if any.
    pub value: Option<TagValue>,
    /// The line with every matching tag removed.
    pub residual: String,
    /// The tag exactly as written, e.g. `rec:2w`. Not used when serializing.
    pub raw: Option<String>,
}

impl Extraction {
    fn no_match(line: &str) -> Self {
        Extraction {
            value: None,
            residual: line.to_string(),
            raw: None,
        }
    }
}

/// A pure tag extractor.
///
/// Implementations must not keep state between calls, and must be idempotent:
/// running an extractor on its own residual finds nothing more.
pub trait Extractor: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    fn extract(&self, line: &str) -> Extraction;
}

/// Recognises `due:YYYY-MM-DD`.
///
/// A value chrono cannot turn into a real date (`due:2024-13-40`,
/// `due:2024-02-30`) is not a match and stays in the text.
#[derive(Debug, Default, Clone, Copy)]
pub struct DueExtension;

/// Recognises `rec:<1-7><d|w|m>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecurrenceExtension;

static DUE_TAG_RE: OnceLock<Regex> = OnceLock::new();
static REC_TAG_RE: OnceLock<Regex> = OnceLock::new();

// Both patterns are anchored and run against single whitespace-delimited
// tokens, so a tag must stand alone: `xrec:1d` and `rec:1dx` stay text.

fn due_tag_regex() -> &'static Regex {
    DUE_TAG_RE.get_or_init(|| {
        Regex::new(r"^due:(\d{4}-\d{2}-\d{2})$").expect("due tag pattern compiles")
    })
}

fn rec_tag_regex() -> &'static Regex {
    REC_TAG_RE.get_or_init(|| Regex::new(r"^rec:([1-7][dwm])$").expect("rec tag pattern compiles"))
}

impl Extractor for DueExtension {
    fn name(&self) -> &'static str {
        "due"
    }

    fn extract(&self, line: &str) -> Extraction {
        strip_tags(line, |token| {
            if !token.starts_with("due:") {
                return None;
            }
            let parsed = due_tag_regex()
                .captures(token)
                .and_then(|caps| parse_date(&caps[1]));
            if parsed.is_none() {
                debug!(tag = token, "malformed due tag kept as text");
            }
            parsed.map(TagValue::Due)
        })
    }
}

impl Extractor for RecurrenceExtension {
    fn name(&self) -> &'static str {
        "rec"
    }

    fn extract(&self, line: &str) -> Extraction {
        strip_tags(line, |token| {
            if !token.starts_with("rec:") {
                return None;
            }
            let parsed = rec_tag_regex()
                .captures(token)
                .and_then(|caps| caps[1].parse::<Recurrence>().ok());
            if parsed.is_none() {
                debug!(tag = token, "malformed rec tag kept as text");
            }
            parsed.map(TagValue::Recurrence)
        })
    }
}

/// Remove every whitespace-delimited token `matcher` accepts. The first accepted
/// token supplies the value. Remaining tokens are rejoined with single spaces.
fn strip_tags<F>(line: &str, matcher: F) -> Extraction
where
    F: Fn(&str) -> Option<TagValue>,
{
    let mut value = None;
    let mut raw = None;
    let mut kept: Vec<&str> = Vec::new();
    for token in line.split_whitespace() {
        match matcher(token) {
            Some(v) => {
                if value.is_none() {
                    value = Some(v);
                    raw = Some(token.to_string());
                }
            }
            None => kept.push(token),
        }
    }
    if value.is_none() {
        return Extraction::no_match(line);
    }
    Extraction {
        value,
        residual: kept.join(" "),
        raw,
    }
}

/// Values accumulated by running a registry over a line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub due: Option<NaiveDate>,
    pub recurrence: Option<Recurrence>,
    pub residual: String,
}

/// An ordered list of extractors.
pub struct ExtensionRegistry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl Default for ExtensionRegistry {
    /// Due-date extractor first, then recurrence.
    fn default() -> Self {
        ExtensionRegistry::new(vec![Box::new(DueExtension), Box::new(RecurrenceExtension)])
    }
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.extractors.iter().map(|e| e.name()))
            .finish()
    }
}

static DEFAULT_REGISTRY: OnceLock<ExtensionRegistry> = OnceLock::new();

impl ExtensionRegistry {
    pub fn new(extractors: Vec<Box<dyn Extractor>>) -> Self {
        ExtensionRegistry { extractors }
    }

    /// Shared registry with the standard extractors.
    pub fn standard() -> &'static ExtensionRegistry {
        DEFAULT_REGISTRY.get_or_init(ExtensionRegistry::default)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Run each extractor once, in order, on the residual of the previous one.
    ///
    /// If two extractors yield the same kind of value the earlier one wins.
    pub fn apply(&self, line: &str) -> Extracted {
        let mut out = Extracted {
            residual: line.to_string(),
            ..Extracted::default()
        };
        for extractor in &self.extractors {
            let extraction = extractor.extract(&out.residual);
            match extraction.value {
                Some(TagValue::Due(d)) => {
                    out.due.get_or_insert(d);
                }
                Some(TagValue::Recurrence(r)) => {
                    out.recurrence.get_or_insert(r);
                }
                None => continue,
            }
            out.residual = extraction.residual;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_due_extension_matches_anywhere() {
        let ext = DueExtension;
        let out = ext.extract("due:2024-05-01 Pay rent");
        assert_eq!(out.value, Some(TagValue::Due(date(2024, 5, 1))));
        assert_eq!(out.residual, "Pay rent");
        assert_eq!(out.raw.as_deref(), Some("due:2024-05-01"));

        let out = ext.extract("Pay due:2024-05-01 rent");
        assert_eq!(out.residual, "Pay rent");
    }

    #[test]
    fn test_due_extension_leaves_malformed_dates() {
        let ext = DueExtension;
        for line in [
            "Buy milk due:2024-13-40",
            "Buy milk due:2024-02-30",
            "Buy milk due:tomorrow",
        ] {
            let out = ext.extract(line);
            assert_eq!(out.value, None, "{line}");
            assert_eq!(out.residual, line);
            assert_eq!(out.raw, None);
        }
    }

    #[test]
    fn test_due_extension_needs_token_boundary() {
        let out = DueExtension.extract("overdue:2024-05-01");
        assert_eq!(out.value, None);
    }

    #[test]
    fn test_due_extension_is_idempotent() {
        let ext = DueExtension;
        let first = ext.extract("a due:2024-01-01 b due:2024-02-02");
        assert_eq!(first.value, Some(TagValue::Due(date(2024, 1, 1))));
        assert_eq!(first.residual, "a b");
        let second = ext.extract(&first.residual);
        assert_eq!(second.value, None);
    }

    #[test]
    fn test_recurrence_extension() {
        let ext = RecurrenceExtension;
        let out = ext.extract("Water plants rec:3d");
        assert_eq!(out.value, Some(TagValue::Recurrence("3d".parse().unwrap())));
        assert_eq!(out.residual, "Water plants");
        assert_eq!(out.raw.as_deref(), Some("rec:3d"));

        for line in ["rec:8d", "rec:1y", "rec:1dx", "xrec:1d", "prerec:1d"] {
            let out = ext.extract(line);
            assert_eq!(out.value, None, "{line}");
            assert_eq!(out.residual, line);
        }
    }

    #[test]
    fn test_registry_order_and_accumulation() {
        let registry = ExtensionRegistry::default();
        assert_eq!(registry.names(), vec!["due", "rec"]);

        let out = registry.apply("Call mum rec:1w  due:2024-03-10 @phone");
        assert_eq!(out.due, Some(date(2024, 3, 10)));
        assert_eq!(out.recurrence, Some("1w".parse().unwrap()));
        assert_eq!(out.residual, "Call mum @phone");
    }

    #[test]
    fn test_registry_without_tags_returns_line() {
        let out = ExtensionRegistry::standard().apply("just text");
        assert_eq!(out.due, None);
        assert_eq!(out.recurrence, None);
        assert_eq!(out.residual, "just text");
    }

    #[test]
    fn test_custom_registry_skips_missing_extractors() {
        let registry = ExtensionRegistry::new(vec![Box::new(RecurrenceExtension)]);
        let out = registry.apply("x due:2024-01-01 rec:2m");
        assert_eq!(out.due, None);
        assert_eq!(out.recurrence, Some("2m".parse().unwrap()));
        assert_eq!(out.residual, "x due:2024-01-01");
    }
}
