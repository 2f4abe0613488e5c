//! Extraction rules.
//!
//! Each [`RuleKind`] pairs a matcher with an extractor. Matchers never keep
//! state between parses: [`RuleKind::scanner`] hands out a fresh [`Scanner`]
//! whose cursor lives only as long as the call that created it.

use crate::error::RuleError;
use crate::ir::{ErrorKind, ErrorRecord, Span};
use crate::normalize::advance_chars;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

pub const RUNAWAY_MESSAGE: &str = "Runaway argument: probably an unclosed curly brace";
pub const EMERGENCY_STOP_MESSAGE: &str = "Emergency stop: compilation aborted";

/// Upper bound on a `LaTeX Error:` message, wrapped lines included.
const MAX_WRAPPED_MESSAGE: usize = 320;

static BANG_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^![ \t]*([^\n]*)$").expect("bang line pattern is valid"));

static LINE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bl\.(\d+)[^\n]*").expect("line marker pattern is valid"));

static FILE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^((?:[A-Za-z]:)?[^\s:!][^:\n]*):(\d+):[ \t]+([^\n]*)$")
        .expect("file:line pattern is valid")
});

static LATEX_ERROR: Lazy<Regex> = Lazy::new(|| {
    // A wrapped continuation line may not start a new `!` block or be blank.
    Regex::new(&format!(
        r"LaTeX Error:[ \t]*((?:[^\n]|\n[^\n!]){{1,{MAX_WRAPPED_MESSAGE}}}?)\s+on input line (\d+)\.?"
    ))
    .expect("LaTeX error pattern is valid")
});

static RUNAWAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Runaway argument\?").expect("runaway pattern is valid"));

static EMERGENCY_STOP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Emergency stop\.?").expect("emergency stop pattern is valid"));

/// The extraction rules, tagged by what they recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RuleKind {
    /// `! <message>` followed within the lookahead window by `l.<n>`. The
    /// match runs to the end of the `l.<n>` line so it keeps TeX's excerpt.
    GenericBang,
    /// `<path>:<n>: <message>`, as printed with `-file-line-error`.
    FileLine,
    /// `LaTeX Error: <message> on input line <n>.`
    LatexErrorOnLine,
    /// `Runaway argument?` followed within the lookahead window by a `!` line.
    RunawayArgument,
    /// `Emergency stop`, the engine aborted.
    EmergencyStop,
}

impl RuleKind {
    /// Evaluation order. In single-result mode the first rule that yields a
    /// record wins, so the most general and most precise patterns come first.
    pub const PRIORITY: [RuleKind; 5] = [
        RuleKind::GenericBang,
        RuleKind::FileLine,
        RuleKind::LatexErrorOnLine,
        RuleKind::RunawayArgument,
        RuleKind::EmergencyStop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuleKind::GenericBang => "generic-bang",
            RuleKind::FileLine => "file-line",
            RuleKind::LatexErrorOnLine => "latex-error-on-line",
            RuleKind::RunawayArgument => "runaway-argument",
            RuleKind::EmergencyStop => "emergency-stop",
        }
    }

    /// Whether records from this rule can carry a source line.
    pub fn carries_line(self) -> bool {
        matches!(
            self,
            RuleKind::GenericBang | RuleKind::FileLine | RuleKind::LatexErrorOnLine
        )
    }

    /// Creates a scanner positioned at the start of `text`.
    pub fn scanner(self, text: &str, lookahead_window: usize) -> Scanner<'_> {
        Scanner {
            rule: self,
            text,
            cursor: 0,
            window: lookahead_window,
        }
    }

    /// Turns a raw match into a record.
    pub fn extract(self, m: &RuleMatch<'_>) -> Result<ErrorRecord, RuleError> {
        debug_assert_eq!(m.rule, self, "match handed to the wrong extractor");
        let message = match self {
            RuleKind::GenericBang | RuleKind::FileLine => m.message.trim().to_string(),
            RuleKind::LatexErrorOnLine => m.message.split_whitespace().collect::<Vec<_>>().join(" "),
            RuleKind::RunawayArgument => RUNAWAY_MESSAGE.to_string(),
            RuleKind::EmergencyStop => EMERGENCY_STOP_MESSAGE.to_string(),
        };
        if message.is_empty() {
            return Err(RuleError::EmptyMessage);
        }

        let line = match m.line {
            Some(digits) => Some(
                digits
                    .parse::<u32>()
                    .map_err(|_| RuleError::LineOutOfRange(digits.to_string()))?,
            ),
            None => None,
        };

        let kind = match self {
            RuleKind::EmergencyStop => ErrorKind::Critical,
            _ => ErrorKind::Error,
        };

        Ok(ErrorRecord {
            message,
            line,
            file: m.file.map(str::to_string),
            full_text: m.full_text.to_string(),
            kind,
        })
    }
}

/// A raw hit, before extraction. All fields borrow from the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'t> {
    pub rule: RuleKind,
    pub span: Span,
    pub full_text: &'t str,
    pub message: &'t str,
    pub line: Option<&'t str>,
    pub file: Option<&'t str>,
}

/// Per-call matcher state: a rule, the text and a cursor.
///
/// Iterating yields successive non-overlapping matches, each search resuming
/// at the end of the previous match.
#[derive(Debug)]
pub struct Scanner<'t> {
    rule: RuleKind,
    text: &'t str,
    cursor: usize,
    window: usize,
}

impl<'t> Scanner<'t> {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn matched(
        &self,
        span: Span,
        message: &'t str,
        line: Option<&'t str>,
        file: Option<&'t str>,
    ) -> RuleMatch<'t> {
        let text: &'t str = self.text;
        RuleMatch {
            rule: self.rule,
            span,
            full_text: &text[span.start..span.end],
            message,
            line,
            file,
        }
    }

    /// Searches `re` starting at `from`, but only accepts a match that starts
    /// within the next `window` characters. The returned captures are taken on
    /// the full text so a marker straddling the window edge is read whole.
    fn find_in_window(&self, re: &Regex, from: usize) -> Option<Captures<'t>> {
        let text: &'t str = self.text;
        let end = advance_chars(text, from, self.window);
        let hit = re.find_at(&text[..end], from)?;
        re.captures_at(text, hit.start())
    }

    fn next_generic_bang(&self) -> Option<RuleMatch<'t>> {
        let mut from = self.cursor;
        while let Some(head) = BANG_LINE.captures_at(self.text, from) {
            let whole = head.get(0)?;
            if let Some(marker) = self.find_in_window(&LINE_MARKER, whole.end()) {
                let digits = marker.get(1)?;
                let end = marker.get(0)?.end();
                let message = head.get(1).map_or("", |m| m.as_str());
                return Some(self.matched(
                    Span::new(whole.start(), end),
                    message,
                    Some(digits.as_str()),
                    None,
                ));
            }
            from = whole.end();
        }
        None
    }

    fn next_file_line(&self) -> Option<RuleMatch<'t>> {
        let caps = FILE_LINE.captures_at(self.text, self.cursor)?;
        let whole = caps.get(0)?;
        Some(self.matched(
            Span::new(whole.start(), whole.end()),
            caps.get(3).map_or("", |m| m.as_str()),
            caps.get(2).map(|m| m.as_str()),
            caps.get(1).map(|m| m.as_str()),
        ))
    }

    fn next_latex_error(&self) -> Option<RuleMatch<'t>> {
        let caps = LATEX_ERROR.captures_at(self.text, self.cursor)?;
        let whole = caps.get(0)?;
        Some(self.matched(
            Span::new(whole.start(), whole.end()),
            caps.get(1).map_or("", |m| m.as_str()),
            caps.get(2).map(|m| m.as_str()),
            None,
        ))
    }

    fn next_runaway(&self) -> Option<RuleMatch<'t>> {
        let mut from = self.cursor;
        while let Some(head) = RUNAWAY.find_at(self.text, from) {
            if let Some(bang) = self.find_in_window(&BANG_LINE, head.end()) {
                let end = bang.get(0)?.end();
                return Some(self.matched(Span::new(head.start(), end), "", None, None));
            }
            from = head.end();
        }
        None
    }

    fn next_emergency_stop(&self) -> Option<RuleMatch<'t>> {
        let hit = EMERGENCY_STOP.find_at(self.text, self.cursor)?;
        Some(self.matched(Span::new(hit.start(), hit.end()), "", None, None))
    }
}

impl<'t> Iterator for Scanner<'t> {
    type Item = RuleMatch<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor > self.text.len() {
            return None;
        }
        let found = match self.rule {
            RuleKind::GenericBang => self.next_generic_bang(),
            RuleKind::FileLine => self.next_file_line(),
            RuleKind::LatexErrorOnLine => self.next_latex_error(),
            RuleKind::RunawayArgument => self.next_runaway(),
            RuleKind::EmergencyStop => self.next_emergency_stop(),
        };
        match &found {
            // Every pattern consumes at least one literal character, so the
            // cursor always moves forward.
            Some(m) => self.cursor = m.span.end.max(self.cursor + 1),
            None => self.cursor = self.text.len() + 1,
        }
        found
    }
}
