use crate::config::ParserConfig;
use crate::error::{ConfigError, RuleError};
use crate::ir::ErrorRecord;
use crate::normalize::{normalize_all, normalize_line_endings};
use crate::rules::RuleKind;
use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

/// Extracts structured errors from LaTeX compiler logs.
///
/// `LogParser` holds only its configuration. Every call builds its own
/// scanners, so a parser can be shared freely and repeated calls on the same
/// text always return the same result.
#[derive(Debug, Clone, Default)]
pub struct LogParser {
    config: ParserConfig,
}

impl LogParser {
    /// Creates a parser with the default [`ParserConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with a custom configuration, rejecting invalid values.
    pub fn with_config(config: ParserConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Returns the most actionable error in `input`, if any.
    ///
    /// Rules are tried in [`RuleKind::PRIORITY`] order and each gets exactly one
    /// match attempt; the first record with a usable message is returned. The
    /// first error in a TeX log is usually the root cause, later ones are
    /// often fallout from it.
    ///
    /// # Arguments
    ///
    /// * `input` - Raw compiler output. Only CRLF line endings are normalized.
    pub fn parse(&self, input: &str) -> Option<ErrorRecord> {
        if input.trim().is_empty() {
            return None;
        }
        let text = normalize_line_endings(input);
        self.first_of(|rule| self.first_record(rule, &text))
    }

    /// Returns every error in `input`, deduplicated and ordered.
    ///
    /// Records with a known line come first, ascending by line; line-less
    /// records follow in the order they were found.
    ///
    /// # Arguments
    ///
    /// * `input` - Raw compiler output. CRLF endings and invisible formatting
    ///   characters are removed before matching.
    pub fn parse_all(&self, input: &str) -> Vec<ErrorRecord> {
        if input.trim().is_empty() {
            return Vec::new();
        }
        let text = normalize_all(input);
        self.collect_all(|rule| Ok(self.all_records(rule, &text)))
    }

    /// Runs `eval` for each rule in priority order and returns the first
    /// record. A rule that fails or panics counts as no match.
    fn first_of(
        &self,
        mut eval: impl FnMut(RuleKind) -> Result<Option<ErrorRecord>, RuleError>,
    ) -> Option<ErrorRecord> {
        for rule in RuleKind::PRIORITY {
            match self.guarded(rule, || eval(rule)) {
                Ok(Some(record)) => {
                    log::debug!("{} matched: {:?}", rule.name(), record.message);
                    return Some(record);
                }
                Ok(None) => {}
                Err(err) => log::debug!("{} skipped: {}", rule.name(), err),
            }
        }
        None
    }

    /// Runs `eval` for every rule, then dedups and orders the union.
    fn collect_all(
        &self,
        mut eval: impl FnMut(RuleKind) -> Result<Vec<ErrorRecord>, RuleError>,
    ) -> Vec<ErrorRecord> {
        let mut found = Vec::new();
        for rule in RuleKind::PRIORITY {
            match self.guarded(rule, || eval(rule)) {
                Ok(mut records) => {
                    log::debug!("{} produced {} record(s)", rule.name(), records.len());
                    found.append(&mut records);
                }
                Err(err) => log::debug!("{} skipped: {}", rule.name(), err),
            }
        }

        let mut records = self.dedup(found);
        // Stable sort keeps discovery order among equal lines and among
        // line-less records.
        records.sort_by_key(|r| match r.line {
            Some(line) => (false, line),
            None => (true, 0),
        });
        records
    }

    fn first_record(&self, rule: RuleKind, text: &str) -> Result<Option<ErrorRecord>, RuleError> {
        match rule.scanner(text, self.config.lookahead_window).next() {
            Some(m) => rule.extract(&m).map(Some),
            None => Ok(None),
        }
    }

    fn all_records(&self, rule: RuleKind, text: &str) -> Vec<ErrorRecord> {
        rule.scanner(text, self.config.lookahead_window)
            .filter_map(|m| match rule.extract(&m) {
                Ok(record) => {
                    debug_assert!(record.line.is_none() || rule.carries_line());
                    Some(record)
                }
                Err(err) => {
                    log::debug!("{} dropped match at {}: {}", m.rule.name(), m.span.start, err);
                    None
                }
            })
            .collect()
    }

    fn dedup(&self, records: Vec<ErrorRecord>) -> Vec<ErrorRecord> {
        let mut seen = HashSet::new();
        records
            .into_iter()
            .filter(|r| {
                let key = r.dedup_key(self.config.dedup_prefix_len);
                if seen.contains(&key) {
                    log::trace!("dropping duplicate {}", key);
                    return false;
                }
                seen.insert(key)
            })
            .collect()
    }

    /// Runs one rule, turning a panic into a [`RuleError`] so the remaining
    /// rules still get their turn.
    fn guarded<T>(
        &self,
        rule: RuleKind,
        f: impl FnOnce() -> Result<T, RuleError>,
    ) -> Result<T, RuleError> {
        panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
            let reason = panic_message(payload.as_ref());
            log::warn!("{} panicked, treating as no match: {}", rule.name(), reason);
            Err(RuleError::Panicked(reason))
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
