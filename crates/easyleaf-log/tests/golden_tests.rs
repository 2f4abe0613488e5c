use easyleaf_log::ir::ErrorRecord;
use easyleaf_log::LogParser;
use std::fs;
use std::path::Path;

#[test]
fn run_golden_tests() {
    let fixtures_dir = Path::new("tests/fixtures");
    if !fixtures_dir.exists() {
        // Skip if no fixtures
        return;
    }

    for entry in fs::read_dir(fixtures_dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();

        if path.extension().is_some_and(|ext| ext == "log") {
            let log_content = fs::read_to_string(&path).expect("Failed to read log");
            let records = LogParser::new().parse_all(&log_content);

            let golden_path = path.with_extension("golden.json");

            if std::env::var("UPDATE_GOLDEN").is_ok() {
                let json_output =
                    serde_json::to_string_pretty(&records).expect("Failed to serialize records");
                fs::write(&golden_path, json_output + "\n").expect("Failed to update golden file");
            } else {
                let expected = fs::read_to_string(&golden_path)
                    .expect("Failed to read golden file (run with UPDATE_GOLDEN=1 to create)");
                let expected: Vec<ErrorRecord> =
                    serde_json::from_str(&expected).expect("Golden file is not valid JSON");
                assert_eq!(records, expected, "Golden test failed for {:?}", path);
            }
        }
    }
}
