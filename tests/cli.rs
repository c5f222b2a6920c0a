mod common;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

use common::{METRICS_CSV, SCENARIO_CSV, TestWorkspace};

fn triage() -> Command {
    let mut cmd = Command::cargo_bin("article-triage").expect("binary exists");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn data_lines(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

#[test]
fn view_ranks_scenario_by_rewrite_priority() {
    let ws = TestWorkspace::new();
    let input = ws.write("metrics.csv", SCENARIO_CSV);
    let assert = triage()
        .args(["view", "-i", input.to_str().unwrap()])
        .args(["-a", "rewrite-priority", "--format", "csv"])
        .assert()
        .success();
    let lines = data_lines(&assert.get_output().stdout);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("2,"), "unexpected order: {lines:?}");
    assert!(lines[1].starts_with("1,"), "unexpected order: {lines:?}");
}

#[test]
fn view_applies_actions_in_order() {
    let ws = TestWorkspace::new();
    let input = ws.write("metrics.csv", METRICS_CSV);
    let assert = triage()
        .args(["view", "-i", input.to_str().unwrap(), "--format", "csv"])
        .args(["-a", "nonzero", "-a", "rewrite-priority"])
        .assert()
        .success();
    let lines = data_lines(&assert.get_output().stdout);
    assert_eq!(lines.len(), 2);
    // p-300 converts best but has no avg_position, so it ranks last.
    assert!(lines[0].starts_with("p-100,"), "unexpected order: {lines:?}");
    assert!(lines[1].starts_with("p-300,"), "unexpected order: {lines:?}");
    assert!(lines[1].contains(",250,,80,"), "blank rank kept: {lines:?}");
}

#[test]
fn sort_orders_text_stored_numbers_numerically() {
    let ws = TestWorkspace::new();
    let input = ws.write("ratios.csv", "id,ratio\na,9\nb,12\nc,n/a\nd,100\ne,\n");
    let assert = triage()
        .args(["view", "-i", input.to_str().unwrap(), "--format", "csv"])
        .args(["-a", "sort=ratio"])
        .assert()
        .success();
    let lines = data_lines(&assert.get_output().stdout);
    assert_eq!(lines, ["d,100", "b,12", "a,9", "c,n/a", "e,"]);
}

#[test]
fn view_category_and_threshold_filters() {
    let ws = TestWorkspace::new();
    let input = ws.write("metrics.csv", METRICS_CSV);
    let assert = triage()
        .args(["view", "-i", input.to_str().unwrap(), "--format", "csv"])
        .args(["-a", "category=news"])
        .assert()
        .success();
    let lines = data_lines(&assert.get_output().stdout);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("p-300,"));

    let assert = triage()
        .args(["view", "-i", input.to_str().unwrap(), "--format", "csv"])
        .args(["-a", "threshold=1,100"])
        .assert()
        .success();
    let lines = data_lines(&assert.get_output().stdout);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("p-100,"));
}

#[test]
fn view_csv_header_reflects_normalisation() {
    let ws = TestWorkspace::new();
    let input = ws.write("metrics.csv", METRICS_CSV);
    let assert = triage()
        .args(["view", "-i", input.to_str().unwrap(), "--format", "csv"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let header = stdout.lines().next().expect("header line");
    assert!(header.starts_with("POST_ID,post_title,30日間平均順位,7日間平均順位,順位差,category"));
    assert!(header.ends_with("page_view_numeric"));
    assert!(!header.contains("split_categories"));
}

#[test]
fn view_title_search_is_case_sensitive_unless_requested() {
    let ws = TestWorkspace::new();
    let input = ws.write("metrics.csv", METRICS_CSV);
    let assert = triage()
        .args(["view", "-i", input.to_str().unwrap(), "--format", "csv"])
        .args(["-a", "title=rust"])
        .assert()
        .success();
    assert!(data_lines(&assert.get_output().stdout).is_empty());

    let assert = triage()
        .args(["view", "-i", input.to_str().unwrap(), "--format", "csv"])
        .args(["-a", "title=rust", "--case-insensitive"])
        .assert()
        .success();
    assert_eq!(data_lines(&assert.get_output().stdout).len(), 2);
}

#[test]
fn unavailable_action_warns_and_keeps_rows() {
    let ws = TestWorkspace::new();
    let input = ws.write("plain.csv", "id,title\n1,a\n2,b\n");
    let assert = triage()
        .args(["view", "-i", input.to_str().unwrap(), "--format", "csv"])
        .args(["-a", "nonzero", "-a", "growth-rate", "-a", "sort=session"])
        .assert()
        .success()
        .stderr(contains("unavailable: missing column(s): sales, cv"))
        .stderr(contains("sort column 'session' not found"));
    assert_eq!(data_lines(&assert.get_output().stdout).len(), 2);
}

#[test]
fn missing_input_reports_no_data() {
    let ws = TestWorkspace::new();
    let missing = ws.path().join("nope.csv");
    triage()
        .args(["view", "-i", missing.to_str().unwrap()])
        .assert()
        .success()
        .stderr(contains("No data yet"))
        .stdout(predicates::str::is_empty());
}

#[test]
fn malformed_action_fails() {
    let ws = TestWorkspace::new();
    let input = ws.write("metrics.csv", SCENARIO_CSV);
    triage()
        .args(["view", "-i", input.to_str().unwrap(), "-a", "explode"])
        .assert()
        .failure()
        .stderr(contains("unknown action 'explode'"));
}

#[test]
fn table_output_shows_page_view_total() {
    let ws = TestWorkspace::new();
    let input = ws.write("metrics.csv", METRICS_CSV);
    triage()
        .args(["view", "-i", input.to_str().unwrap(), "--limit", "1"])
        .assert()
        .success()
        .stdout(contains("page_view total: 245"))
        .stdout(contains("p-100").and(contains("p-200").not()));
}

#[test]
fn html_output_links_only_http_urls() {
    let ws = TestWorkspace::new();
    let input = ws.write("metrics.csv", METRICS_CSV);
    triage()
        .args(["view", "-i", input.to_str().unwrap(), "--format", "html"])
        .assert()
        .success()
        .stdout(contains(r#"<table class="customtable">"#))
        .stdout(contains(r#"<a href="https://example.com/rust" target="_blank""#))
        .stdout(contains("<td>/travel</td>"));
}

#[test]
fn json_output_serialises_display_table() {
    let ws = TestWorkspace::new();
    let input = ws.write("metrics.csv", SCENARIO_CSV);
    let assert = triage()
        .args(["view", "-i", input.to_str().unwrap(), "--format", "json"])
        .args(["-a", "imp-revenue"])
        .assert()
        .success();
    let parsed: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid json");
    let headers = parsed["headers"].as_array().expect("headers");
    let score_idx = headers
        .iter()
        .position(|h| h == "imp_revenue_score")
        .expect("score column");
    assert_eq!(parsed["rows"][0][score_idx], "250");
    assert_eq!(parsed["rows"][1][score_idx], "200");
}

#[test]
fn csv_output_to_tsv_file_uses_tab() {
    let ws = TestWorkspace::new();
    let input = ws.write("metrics.csv", SCENARIO_CSV);
    let output = ws.path().join("ranked.tsv");
    triage()
        .args(["view", "-i", input.to_str().unwrap(), "--format", "csv"])
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .success();
    let written = std::fs::read_to_string(&output).expect("output written");
    assert!(written.starts_with("id\tpost_title\t"));
}

#[test]
fn bom_prefixed_input_keeps_first_header() {
    let ws = TestWorkspace::new();
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend_from_slice(SCENARIO_CSV.as_bytes());
    let input = ws.write_bytes("bom.csv", &bytes);
    triage()
        .args(["view", "-i", input.to_str().unwrap(), "--format", "csv"])
        .args(["-a", "id=2"])
        .assert()
        .success()
        .stdout(contains("\n2,Second post"));
}

#[test]
fn categories_lists_sentinel_and_tags() {
    let ws = TestWorkspace::new();
    let input = ws.write("metrics.csv", METRICS_CSV);
    let assert = triage()
        .args(["categories", "-i", input.to_str().unwrap()])
        .assert()
        .success();
    let lines = data_lines(&assert.get_output().stdout);
    assert_eq!(lines, ["--------", "すべて", "life", "news", "rust", "tech"]);
}

#[test]
fn profile_round_trips_through_view() {
    let ws = TestWorkspace::new();
    let profile = ws.path().join("profile.yml");
    triage()
        .args(["profile", "-o", profile.to_str().unwrap()])
        .assert()
        .success();
    let text = std::fs::read_to_string(&profile).expect("profile written");
    assert!(text.contains("pivot_column: post_title"));

    let edited = text.replace("seven_minus_thirty", "thirty_minus_seven");
    let profile = ws.write("edited.yml", &edited);
    let input = ws.write("metrics.csv", METRICS_CSV);
    let assert = triage()
        .args(["view", "-i", input.to_str().unwrap(), "--format", "csv"])
        .args(["-p", profile.to_str().unwrap(), "-a", "id=p-200"])
        .assert()
        .success();
    let lines = data_lines(&assert.get_output().stdout);
    assert!(lines[0].starts_with("p-200,Travel packing list,9.5,11,-1.5,"));
}

#[test]
fn profile_prints_yaml_to_stdout() {
    triage()
        .arg("profile")
        .assert()
        .success()
        .stdout(contains("convention: seven_minus_thirty"));
}
