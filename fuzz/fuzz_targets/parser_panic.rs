#![no_main]
use easyleaf_log::LogParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Lossy conversion keeps inputs that are "almost" text, which is what
    // real logs look like.
    let s = String::from_utf8_lossy(data);
    let parser = LogParser::new();
    let _ = parser.parse(&s);

    let records = parser.parse_all(&s);
    for record in &records {
        assert!(!record.message.trim().is_empty());
    }
    let first_unlocated = records.iter().position(|r| r.line.is_none());
    if let Some(idx) = first_unlocated {
        assert!(records[idx..].iter().all(|r| r.line.is_none()));
    }
});
