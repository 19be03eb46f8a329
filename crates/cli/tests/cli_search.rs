// Integration tests for the regscreen binary against the fixture record sets.
//
// stdout from search/list must be exactly one JSON value; diagnostics go to
// stderr. Exit codes follow src/exit_codes.rs.
//
// Run with: cargo test -p regscreen-cli --test cli_search

use std::process::{Command, Output};

fn regscreen() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_regscreen"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("REGSCREEN_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

const REGISTRY: &str = "../screen/tests/fixtures/registry.json";
const BLACKLIST: &str = "../screen/tests/fixtures/blacklist.json";

fn with_fixtures(args: &[&str]) -> Output {
    let mut full = args.to_vec();
    full.extend(["--registry-file", REGISTRY, "--blacklist-file", BLACKLIST]);
    regscreen().args(&full).output().expect("run regscreen")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|e| {
        panic!(
            "stdout must be one JSON value: {e}\nstdout:\n{stdout}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

fn ids(value: &serde_json::Value) -> Vec<i64> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|r| r["id"].as_i64().expect("id"))
        .collect()
}

// ===========================================================================
// search
// ===========================================================================

#[test]
fn search_confirmed_hit_aggregates_reasons() {
    let output = with_fixtures(&["search", "--name", "Ivanov"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let val = stdout_json(&output);
    let records = val.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["last_name"], "Ivanov");
    assert_eq!(records[0]["black_list"], true);
    assert_eq!(records[0]["type"], "SDN,UN");
    assert_eq!(records[0]["hash"], "6c5f2e4a50ba8f6ec304ece345717501");
}

#[test]
fn search_safe_registry_record() {
    let output = with_fixtures(&["search", "--name", "Petrov", "--birth-date", "05/05/1990"]);
    assert!(output.status.success());

    let val = stdout_json(&output);
    assert_eq!(ids(&val), vec![2]);
    assert_eq!(val[0]["black_list"], false);
    assert_eq!(val[0]["country_id"], 2);
}

#[test]
fn search_without_criteria_is_passthrough() {
    let output = with_fixtures(&["search"]);
    assert!(output.status.success());

    let val = stdout_json(&output);
    assert_eq!(ids(&val), vec![1, 2, 4]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not screened"), "stderr: {stderr}");
}

#[test]
fn search_date_range_limits_registry() {
    let output = with_fixtures(&[
        "search",
        "--name",
        "Sidorov",
        "--date1",
        "01/05/2023",
        "--date2",
        "01/05/2023 12:00",
    ]);
    assert!(output.status.success());
    assert_eq!(ids(&stdout_json(&output)), vec![4]);
}

#[test]
fn search_bad_date_exits_60_with_error_body() {
    let output = with_fixtures(&[
        "search",
        "--name",
        "Ivanov",
        "--date1",
        "01/01/2023",
        "--date2",
        "2023-12-31",
    ]);
    assert_eq!(output.status.code(), Some(60));

    let val = stdout_json(&output);
    let msg = val["error"].as_str().expect("error string");
    assert!(msg.contains("2023-12-31"), "{msg}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error:"), "stderr: {stderr}");
}

#[test]
fn search_unreadable_fixture_exits_61() {
    let output = regscreen()
        .args(["search", "--name", "x", "--registry-file", "no/such/file.json"])
        .output()
        .expect("run regscreen");
    assert_eq!(output.status.code(), Some(61));
    assert!(stdout_json(&output)["error"].is_string());
}

#[test]
fn search_missing_config_exits_62() {
    let output = regscreen()
        .args(["search", "--name", "x", "--config", "no/such/config.toml"])
        .output()
        .expect("run regscreen");
    assert_eq!(output.status.code(), Some(62));
    assert!(stdout_json(&output)["error"].is_string());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--registry-file"), "stderr: {stderr}");
}

#[test]
fn search_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("result.json");
    let output = with_fixtures(&["search", "--name", "Petrov", "-o", out.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let text = std::fs::read_to_string(&out).unwrap();
    let val: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(ids(&val), vec![2]);
}

// ===========================================================================
// list
// ===========================================================================

#[test]
fn list_by_risk_newest_first() {
    let output = regscreen()
        .args(["list", "--risk", "2", "--registry-file", REGISTRY])
        .output()
        .expect("run regscreen");
    assert!(output.status.success());
    assert_eq!(ids(&stdout_json(&output)), vec![5, 4]);
}

#[test]
fn list_all_keeps_duplicates() {
    let output = regscreen()
        .args(["list", "--registry-file", REGISTRY])
        .output()
        .expect("run regscreen");
    assert!(output.status.success());
    assert_eq!(ids(&stdout_json(&output)), vec![2, 1, 5, 4, 3]);
}

// ===========================================================================
// fingerprint
// ===========================================================================

#[test]
fn fingerprint_prints_digest() {
    let output = regscreen()
        .args(["fingerprint", "Ivanov", "Ivan", "--birth-date", "01/01/1980"])
        .output()
        .expect("run regscreen");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "6c5f2e4a50ba8f6ec304ece345717501"
    );
}

#[test]
fn fingerprint_json_trims_names() {
    let output = regscreen()
        .args(["fingerprint", " Ivanov ", "Ivan", "--birth-date", "01/01/1980", "--json"])
        .output()
        .expect("run regscreen");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["hash"], "6c5f2e4a50ba8f6ec304ece345717501");
}

#[test]
fn fingerprint_bad_birth_date_is_usage_error() {
    let output = regscreen()
        .args(["fingerprint", "Ivanov", "Ivan", "--birth-date", "1980-01-01"])
        .output()
        .expect("run regscreen");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("hint:"), "stderr: {stderr}");
}

// ===========================================================================
// config check
// ===========================================================================

#[test]
fn config_check_accepts_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "api_base = \"http://127.0.0.1:9/api\"\ntimeout_secs = 5\n\n[sources]\nregistry = \"AddedUser\"\n",
    )
    .unwrap();

    let output = regscreen()
        .args(["config", "check", path.to_str().unwrap()])
        .output()
        .expect("run regscreen");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("registry: AddedUser"), "stderr: {stderr}");
}

#[test]
fn config_check_rejects_bad_scheme() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "api_base = \"ftp://example.org\"\n").unwrap();

    let output = regscreen()
        .args(["config", "check", path.to_str().unwrap()])
        .output()
        .expect("run regscreen");
    assert_eq!(output.status.code(), Some(62));
}

#[test]
fn config_check_reports_unset_token() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "api_base = \"https://example.org\"\ntoken_env = \"REGSCREEN_CLI_TOKEN_NEVER_SET\"\n",
    )
    .unwrap();

    let output = regscreen()
        .args(["config", "check", path.to_str().unwrap()])
        .output()
        .expect("run regscreen");
    assert_eq!(output.status.code(), Some(62));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("export REGSCREEN_CLI_TOKEN_NEVER_SET"), "stderr: {stderr}");
}

#[test]
fn verbose_log_omits_searched_name() {
    let output = with_fixtures(&["search", "--name", "Kuznetsov", "-v"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("screened: 1 result(s), 1 blacklisted"), "stderr: {stderr}");
    assert!(!stderr.contains("Kuznetsov"), "stderr: {stderr}");
}
