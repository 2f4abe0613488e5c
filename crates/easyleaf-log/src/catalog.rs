//! Known LaTeX error patterns with quick-fix hints.
//!
//! The catalog is static and small enough to ship to clients for local
//! matching; [`lookup`] is the same matching done on this side.

use crate::ir::ErrorRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Command,
    Math,
    File,
    Layout,
    Structure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPattern {
    /// Literal substring, or a regular expression when `is_regex` is set.
    pub pattern: &'static str,
    #[serde(rename = "type")]
    pub category: ErrorCategory,
    pub severity: PatternSeverity,
    pub quick_fix: &'static str,
    pub explanation: &'static str,
    is_regex: bool,
    #[serde(skip)]
    regex: Option<Regex>,
}

impl ErrorPattern {
    fn literal(
        pattern: &'static str,
        category: ErrorCategory,
        severity: PatternSeverity,
        quick_fix: &'static str,
        explanation: &'static str,
    ) -> Self {
        Self {
            pattern,
            category,
            severity,
            quick_fix,
            explanation,
            is_regex: false,
            regex: None,
        }
    }

    fn regex(
        pattern: &'static str,
        category: ErrorCategory,
        severity: PatternSeverity,
        quick_fix: &'static str,
        explanation: &'static str,
    ) -> Self {
        Self {
            is_regex: true,
            regex: Some(Regex::new(pattern).expect("catalog pattern is valid")),
            ..Self::literal(pattern, category, severity, quick_fix, explanation)
        }
    }

    pub fn is_regex(&self) -> bool {
        self.is_regex
    }

    pub fn matches(&self, message: &str) -> bool {
        match &self.regex {
            Some(re) => re.is_match(message),
            None => message.contains(self.pattern),
        }
    }
}

static CATALOG: Lazy<Vec<ErrorPattern>> = Lazy::new(|| {
    use ErrorCategory::*;
    use PatternSeverity::{Error, Warning};
    vec![
        ErrorPattern::literal(
            "Missing }",
            Syntax,
            Error,
            "Add missing closing brace",
            "A group was opened with { but never closed.",
        ),
        ErrorPattern::literal(
            "Undefined control sequence",
            Command,
            Error,
            "Check command spelling or add package",
            "The command you used is not defined. Check spelling or a missing \\usepackage.",
        ),
        ErrorPattern::literal(
            "Missing $ inserted",
            Math,
            Error,
            "Wrap math content in $ signs",
            "A math-only symbol (like _ or ^) was used outside of math mode.",
        ),
        ErrorPattern::literal(
            "Extra }",
            Syntax,
            Error,
            "Remove extra closing brace",
            "A closing brace has no matching opening brace.",
        ),
        ErrorPattern::regex(
            "File .* not found",
            File,
            Error,
            "Upload missing file or fix path",
            "An \\input, \\include, \\usepackage or image refers to a file that does not exist.",
        ),
        ErrorPattern::literal(
            "Overfull \\hbox",
            Layout,
            Warning,
            "Content too wide, may need reformatting",
            "The content extends beyond the margins.",
        ),
        ErrorPattern::literal(
            "Underfull \\hbox",
            Layout,
            Warning,
            "Line has too much space",
            "There is too much whitespace in this line.",
        ),
        ErrorPattern::literal(
            "Runaway argument",
            Syntax,
            Error,
            "Close the curly brace opened before this point",
            "An argument (usually {...}) is missing its closing brace.",
        ),
        ErrorPattern::literal(
            "File ended while scanning use of",
            Syntax,
            Error,
            "Close the command argument before the end of the file",
            "A command was started but the file ended before it was closed.",
        ),
        ErrorPattern::literal(
            "Emergency stop",
            Structure,
            Error,
            "Fix the first error above; the run could not continue",
            "TeX gave up on the document, usually after an earlier fatal error.",
        ),
    ]
});

static EXCERPT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^l\.\d+[^\n]*").expect("excerpt pattern is valid"));

static CONTROL_SEQUENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:[A-Za-z@]+|[^A-Za-z@\s])").expect("control sequence pattern is valid")
});

/// All known patterns, in lookup order.
pub fn patterns() -> &'static [ErrorPattern] {
    &CATALOG
}

/// The first catalog entry matching `message`.
pub fn lookup(message: &str) -> Option<&'static ErrorPattern> {
    CATALOG.iter().find(|p| p.matches(message))
}

/// For an "Undefined control sequence" record, the offending command.
///
/// TeX breaks the `l.<n>` excerpt right after the token it choked on, so the
/// last control sequence on that line is the culprit.
pub fn undefined_command(record: &ErrorRecord) -> Option<String> {
    if !record.message.contains("Undefined control sequence") {
        return None;
    }
    let excerpt = EXCERPT_LINE.find(&record.full_text)?;
    CONTROL_SEQUENCE
        .find_iter(excerpt.as_str())
        .last()
        .map(|m| m.as_str().to_string())
}

/// A record paired with what the catalog knows about it.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    #[serde(flatten)]
    pub record: ErrorRecord,
    pub hint: Option<&'static ErrorPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undefined_command: Option<String>,
}

pub fn diagnose(records: Vec<ErrorRecord>) -> Vec<Diagnosis> {
    records
        .into_iter()
        .map(|record| Diagnosis {
            hint: lookup(&record.message).or_else(|| lookup(&record.full_text)),
            undefined_command: undefined_command(&record),
            record,
        })
        .collect()
}
