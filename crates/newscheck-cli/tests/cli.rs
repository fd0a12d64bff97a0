use assert_cmd::Command;
use predicates::str::contains;

/// Nothing listens here; any request that slips through fails loudly.
const DEAD_API: &str = "http://127.0.0.1:9";

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("newscheck").unwrap();
    cmd.env("API_URL", DEAD_API);
    cmd
}

#[test]
fn help_lists_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("check"))
        .stdout(contains("health"))
        .stdout(contains("sources"));
}

#[test]
fn blank_content_fails_validation() {
    cmd()
        .args(["check", "   "])
        .assert()
        .failure()
        .stderr(contains("Please enter some text or a URL to check."));
}

#[test]
fn blank_content_json_reports_failure() {
    cmd()
        .args(["check", "", "--json"])
        .assert()
        .failure()
        .stdout(contains("\"success\": false"))
        .stdout(contains("Please enter some text or a URL to check."));
}

#[test]
fn num_sources_out_of_range_rejected() {
    cmd()
        .args(["check", "some claim about vaccines", "--num-sources", "11"])
        .assert()
        .failure()
        .stderr(contains("num_sources must be between 1 and 10, got 11"));
}

#[test]
fn unknown_mode_rejected_by_parser() {
    cmd()
        .args(["check", "x", "--mode", "image"])
        .assert()
        .failure()
        .stderr(contains("invalid value 'image'"));
}

#[test]
fn zero_timeout_rejected_by_parser() {
    cmd()
        .args(["--timeout-secs", "0", "check", "some claim about vaccines"])
        .assert()
        .failure()
        .stderr(contains("invalid value '0'"));
}

#[test]
fn unreachable_service_is_transport_error() {
    cmd()
        .args(["--timeout-secs", "5", "check", "some claim about vaccines"])
        .assert()
        .failure()
        .stderr(contains("Error:"));
}
