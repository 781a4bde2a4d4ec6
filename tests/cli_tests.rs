use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::path::Path;

mod common;
use common::{temp_config, temp_config_with, wn};

#[test]
fn test_help_lists_modules() {
    wn().arg("--help")
        .assert()
        .success()
        .stdout(contains("time").and(contains("absence")).and(contains("config")));
}

#[test]
fn test_config_set_and_print() {
    let cfg = temp_config("set_and_print");

    wn().args(["--config", &cfg, "--log-handler", "none"])
        .args(["config", "set", "home_url", "https://wd3.myworkday.com/acme/d/home.htmld"])
        .assert()
        .success();

    wn().args(["--config", &cfg, "--log-handler", "none", "config", "print"])
        .assert()
        .success()
        .stdout(contains("home_url: https://wd3.myworkday.com/acme/d/home.htmld"));
}

#[test]
fn test_config_set_nested_keys() {
    let cfg = temp_config("nested");

    wn().args(["--config", &cfg, "--log-handler", "none", "config", "set"])
        .args(["--parent", "browser_configuration", "--parent", "firefox"])
        .args(["driver_path", "/opt/geckodriver"])
        .assert()
        .success();
    wn().args(["--config", &cfg, "--log-handler", "none", "config", "set"])
        .args(["--parent", "browser_configuration", "--parent", "firefox", "--parent", "preferences"])
        .args(["intl.accept_languages", "en-GB"])
        .assert()
        .success();

    let content = std::fs::read_to_string(&cfg).unwrap();
    assert!(content.starts_with("---"));
    assert!(content.contains("browser_configuration:"));
    assert!(content.contains("driver_path: /opt/geckodriver"));
    assert!(content.contains("intl.accept_languages: en-GB"));
}

#[test]
fn test_config_set_below_a_value_fails() {
    let cfg = temp_config_with("below_value", "home_url: https://wd3.myworkday.com/acme\n");

    wn().args(["--config", &cfg, "--log-handler", "none", "config", "set"])
        .args(["--parent", "home_url", "key", "value"])
        .assert()
        .failure()
        .stderr(contains("not a section"));
}

#[test]
fn test_absence_list_requires_home_url() {
    let cfg = temp_config_with("no_home", "account_preferences:\n  language: en\n");

    wn().args(["--config", &cfg, "--log-handler", "none", "absence", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Error: configuration is missing `home_url`."));
}

#[test]
fn test_time_list_requires_home_url() {
    let cfg = temp_config("time_no_home");

    wn().args(["--config", &cfg, "--log-handler", "none", "time", "list", "week"])
        .assert()
        .failure()
        .stderr(contains("configuration is missing `home_url`"));
}

#[test]
fn test_unsupported_language_is_reported() {
    let cfg = temp_config_with(
        "bad_language",
        "home_url: https://wd3.myworkday.com/acme\naccount_preferences:\n  language: xx\n",
    );

    wn().args(["--config", &cfg, "--log-handler", "none", "time", "list", "month"])
        .assert()
        .failure()
        .stderr(contains("Unsupported account language: xx"));
}

#[test]
fn test_month_out_of_range_is_rejected() {
    let cfg = temp_config("month_range");

    wn().args(["--config", &cfg, "absence", "list", "--month", "13"])
        .assert()
        .failure()
        .stderr(contains("13"));
}

#[test]
fn test_year_before_1993_is_rejected() {
    let cfg = temp_config("year_range");

    wn().args(["--config", &cfg, "time", "autofill", "month", "--year", "1992"])
        .assert()
        .failure();
}

#[test]
fn test_missing_profile_dir_is_rejected() {
    let cfg = temp_config("profile_dir");

    wn().args(["--config", &cfg, "--browser-profile-path", "/nonexistent/worknight/profile"])
        .args(["absence", "list"])
        .assert()
        .failure()
        .stderr(contains("does not exist"));
}

#[test]
fn test_file_log_handler_writes_next_to_config() {
    let cfg = temp_config("file_logging");

    wn().args(["--config", &cfg, "--log-handler", "file", "--log-level", "debug"])
        .args(["config", "print"])
        .assert()
        .success();

    let log = Path::new(&cfg).parent().unwrap().join("worknight.log");
    assert!(log.exists());
}
