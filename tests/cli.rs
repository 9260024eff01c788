use assert_cmd::Command;
use predicates::prelude::*;

/// Binary invocation with config writes redirected to a scratch directory
fn ytfetch(config_home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("ytfetch").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd
}

#[test]
fn rejects_unparseable_input_before_any_source_runs() {
    let tmp = tempfile::tempdir().unwrap();

    ytfetch(tmp.path())
        .args(["fetch", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("video ID"));
}

#[test]
fn lists_sources_in_priority_order() {
    let tmp = tempfile::tempdir().unwrap();

    ytfetch(tmp.path())
        .arg("sources")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("captions-api")
                .and(predicate::str::contains("page-scrape")),
        );
}

#[test]
fn shows_configuration() {
    let tmp = tempfile::tempdir().unwrap();

    ytfetch(tmp.path())
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Languages: en, en-US, en-GB"));
}

#[test]
fn help_describes_fetch_command() {
    let tmp = tempfile::tempdir().unwrap();

    ytfetch(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"));
}
