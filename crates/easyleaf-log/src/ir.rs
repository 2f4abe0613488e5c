use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Severity of an extracted error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    #[default]
    Error,
    /// The engine gave up on the run (e.g. `! Emergency stop.`).
    Critical,
}

/// One error occurrence extracted from a compiler log.
///
/// Records are built by a rule's extractor and never mutated afterwards.
/// `message` is always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub message: String,
    /// 1-based line in the source document, when the log carries one.
    pub line: Option<u32>,
    pub file: Option<String>,
    /// The exact span of the log that produced this record.
    #[serde(rename = "fullText")]
    pub full_text: String,
    #[serde(default)]
    pub kind: ErrorKind,
}

impl ErrorRecord {
    /// Identity used by [`LogParser::parse_all`](crate::LogParser::parse_all)
    /// to collapse near-duplicates.
    ///
    /// With a known line only the first `prefix_len` characters of the message
    /// take part in the key; without one the whole message does.
    pub fn dedup_key(&self, prefix_len: usize) -> DedupKey {
        match self.line {
            Some(line) => DedupKey::Located {
                line,
                prefix: self.message.chars().take(prefix_len).collect(),
            },
            None => DedupKey::Unlocated {
                message: self.message.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    Located { line: u32, prefix: String },
    Unlocated { message: String },
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DedupKey::Located { line, prefix } => write!(f, "{line}:{prefix}"),
            DedupKey::Unlocated { message } => write!(f, "null:{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(message: &str, line: Option<u32>) -> ErrorRecord {
        ErrorRecord {
            message: message.to_string(),
            line,
            file: None,
            full_text: message.to_string(),
            kind: ErrorKind::Error,
        }
    }

    #[test]
    fn test_located_key_uses_character_prefix() {
        let key = record("Undefined control sequence.", Some(12)).dedup_key(9);
        assert_eq!(key.to_string(), "12:Undefined");
    }

    #[test]
    fn test_unlocated_key_uses_whole_message() {
        let key = record("Emergency stop: compilation aborted", None).dedup_key(3);
        assert_eq!(key.to_string(), "null:Emergency stop: compilation aborted");
    }
}
