use easyleaf_log::ir::ErrorKind;
use easyleaf_log::LogParser;

#[test]
fn test_bang_error_with_line_marker() {
    let parser = LogParser::new();
    let record = parser
        .parse("! Undefined control sequence.\nl.12 \\mistake")
        .expect("Expected a record");

    assert_eq!(record.message, "Undefined control sequence.");
    assert_eq!(record.line, Some(12));
    assert_eq!(record.file, None);
    assert_eq!(record.kind, ErrorKind::Error);
}

#[test]
fn test_file_line_diagnostic() {
    let parser = LogParser::new();
    let record = parser
        .parse("./main.tex:42: Undefined control sequence.\n<argument> \\@nil")
        .expect("Expected a record");

    assert_eq!(record.message, "Undefined control sequence.");
    assert_eq!(record.line, Some(42));
    assert_eq!(record.file.as_deref(), Some("./main.tex"));
}

#[test]
fn test_runaway_argument() {
    let input = "Runaway argument?\n{ \\textbf {oops} \\end {document}\n! File ended while scanning use of \\@newl@bel.";
    let record = LogParser::new().parse(input).expect("Expected a record");

    assert_eq!(record.line, None);
    assert!(record.message.contains("unclosed curly brace"));
}

#[test]
fn test_clean_log() {
    let input = "This is pdfTeX, Version 3.141592653-2.6-1.40.25 (TeX Live 2023)\n\
                 (./main.tex\n\
                 LaTeX2e <2022-11-01> patch level 1\n\
                 )\n\
                 Output written on main.pdf (1 page, 12345 bytes).\n\
                 Transcript written on main.log.\n";
    let parser = LogParser::new();

    assert!(parser.parse(input).is_none());
    assert!(parser.parse_all(input).is_empty());
}

#[test]
fn test_two_independent_errors() {
    let input = "(./main.tex\n\
                 ! Undefined control sequence.\n\
                 l.10 \\foo\n\
                 \n\
                 ! Missing $ inserted.\n\
                 <inserted text>\n\
                 l.20 x_1\n\
                 )";
    let parser = LogParser::new();

    let first = parser.parse(input).expect("Expected a record");
    assert_eq!(first.line, Some(10));

    let all = parser.parse_all(input);
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].line, Some(10));
    assert_eq!(all[0].message, "Undefined control sequence.");
    assert_eq!(all[1].line, Some(20));
    assert_eq!(all[1].message, "Missing $ inserted.");
}

#[test]
fn test_errors_found_out_of_order_are_sorted() {
    let input = "! Second.\nl.20 b\n! First.\nl.10 a";
    let parser = LogParser::new();

    // Single mode reports the first error in the text.
    assert_eq!(parser.parse(input).unwrap().line, Some(20));

    let lines: Vec<_> = parser.parse_all(input).iter().map(|r| r.line).collect();
    assert_eq!(lines, [Some(10), Some(20)]);
}

#[test]
fn test_crlf_line_endings() {
    let input = "(./main.tex\r\n! Undefined control sequence.\r\nl.12 \\mistake\r\n)\r\n";
    let parser = LogParser::new();

    let record = parser.parse(input).expect("Expected a record");
    assert_eq!(record.message, "Undefined control sequence.");
    assert_eq!(record.line, Some(12));

    let all = parser.parse_all(input);
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].message, "Undefined control sequence.");
    assert_eq!(all[0].line, Some(12));
    assert!(!all[0].full_text.contains('\r'));
}

#[test]
fn test_latex_error_on_input_line() {
    let input = "LaTeX Error: Missing \\begin{document} on input line 3.";
    let record = LogParser::new().parse(input).expect("Expected a record");

    assert_eq!(record.message, "Missing \\begin{document}");
    assert_eq!(record.line, Some(3));
}

#[test]
fn test_emergency_stop_alone() {
    let record = LogParser::new()
        .parse("! Emergency stop.\n<*> main.tex\n\n*** (job aborted, no legal \\end found)")
        .expect("Expected a record");

    assert_eq!(record.kind, ErrorKind::Critical);
    assert_eq!(record.line, None);
}
