//! # EasyLeaf Log Parser
//!
//! Turns raw LaTeX/Overleaf compiler output into structured error records.
//!
//! ## Overview
//!
//! Compiler logs are noisy: file-open chatter, wrapped lines, context
//! excerpts and cascades of follow-up errors. This crate runs a fixed set of
//! extraction rules over the log and reports what went wrong, where:
//!
//! - **`!` errors**: `! <message>` with a later `l.<n>` line marker
//! - **File:line diagnostics**: `<path>:<n>: <message>` (`-file-line-error` mode)
//! - **Named LaTeX errors**: `LaTeX Error: ... on input line <n>.`
//! - **Runaway arguments**: an unclosed brace swallowing the rest of the file
//! - **Emergency stops**: the engine giving up
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   parse()      ┌────────────┐
//! │  raw log     │ ─────────────► │ LogParser  │ ── Option<ErrorRecord>
//! │  (&str)      │   parse_all()  │            │ ── Vec<ErrorRecord>
//! └──────────────┘                └────────────┘
//!                                       │ RuleKind::PRIORITY
//!                                       ▼
//!                           Scanner per rule, per call
//! ```
//!
//! - [`rules`]: the [`RuleKind`] variants, their matchers and extractors
//! - [`normalize`]: line-ending and invisible-character cleanup
//! - [`ir`]: [`ErrorRecord`] and the dedup key
//! - [`config`]: [`ParserConfig`] tunables
//! - [`catalog`]: known error patterns with quick-fix hints
//!
//! ## Examples
//!
//! ### First error only
//!
//! ```
//! use easyleaf_log::LogParser;
//!
//! let parser = LogParser::new();
//! let record = parser
//!     .parse("! Undefined control sequence.\nl.12 \\mistake")
//!     .expect("an error");
//! assert_eq!(record.message, "Undefined control sequence.");
//! assert_eq!(record.line, Some(12));
//! ```
//!
//! ### Every error, as JSON
//!
//! ```no_run
//! use easyleaf_log::LogParser;
//! use std::fs;
//!
//! let log = fs::read_to_string("main.log")?;
//! let records = LogParser::new().parse_all(&log);
//! println!("{}", serde_json::to_string_pretty(&records)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Known error patterns and quick-fix hints.
pub mod catalog;
pub mod config;
pub mod error;
/// Error record model.
pub mod ir;
pub mod normalize;
/// The log parser.
pub mod parser;
pub mod rules;


pub use config::ParserConfig;
pub use error::{ConfigError, RuleError};
pub use ir::{ErrorKind, ErrorRecord};
pub use parser::LogParser;
pub use rules::RuleKind;
