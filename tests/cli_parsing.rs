//! Tests for command-line parsing.

use std::path::PathBuf;

use agency_directory::{Config, LogFormat, LogLevel};
use clap::Parser;

#[test]
fn test_defaults_without_arguments() {
    let config = Config::try_parse_from(["agency_directory"]).expect("Failed to parse");
    assert_eq!(config.categories, vec!["종합광고대행사", "페이스북"]);
    assert_eq!(config.max_agencies_per_category, 3);
    assert!(!config.headless);
    assert!(!config.skip_details);
    assert!(!config.rescrape);
    assert!(!config.export_only);
    assert_eq!(config.output_dir, PathBuf::from("."));
    assert!(matches!(config.log_level, LogLevel::Info));
    assert!(matches!(config.log_format, LogFormat::Plain));
    assert_eq!(config.agency_cap(), Some(3));
}

#[test]
fn test_multiple_categories_and_unlimited_cap() {
    let config = Config::try_parse_from([
        "agency_directory",
        "-c",
        "검색광고",
        "페이스북",
        "-n",
        "0",
        "--headless",
        "--skip-details",
    ])
    .expect("Failed to parse");
    assert_eq!(config.categories, vec!["검색광고", "페이스북"]);
    assert_eq!(config.max_agencies_per_category, 0);
    assert_eq!(config.agency_cap(), None);
    assert!(config.headless);
    assert!(config.skip_details);
}

#[test]
fn test_long_flags() {
    let config = Config::try_parse_from([
        "agency_directory",
        "--categories",
        "종합광고대행사",
        "--num-agencies",
        "25",
        "--output-dir",
        "/tmp/out",
        "--db-path",
        "custom.db",
        "--webdriver-url",
        "http://localhost:4444",
        "--rescrape",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .expect("Failed to parse");
    assert_eq!(config.categories, vec!["종합광고대행사"]);
    assert_eq!(config.max_agencies_per_category, 25);
    assert_eq!(config.webdriver_url, "http://localhost:4444");
    assert!(config.rescrape);
    assert!(matches!(config.log_level, LogLevel::Debug));
    assert!(matches!(config.log_format, LogFormat::Json));
    assert_eq!(config.resolved_db_path(), PathBuf::from("/tmp/out/custom.db"));
    assert_eq!(config.logos_dir(), PathBuf::from("/tmp/out/logos"));
}

#[test]
fn test_db_path_keeps_only_the_file_name() {
    let config = Config::try_parse_from([
        "agency_directory",
        "--output-dir",
        "results",
        "--db-path",
        "elsewhere/scrape.db",
    ])
    .expect("Failed to parse");
    assert_eq!(config.resolved_db_path(), PathBuf::from("results/scrape.db"));
}

#[test]
fn test_export_only_flag() {
    let config =
        Config::try_parse_from(["agency_directory", "--export-only"]).expect("Failed to parse");
    assert!(config.export_only);
}

#[test]
fn test_invalid_values_are_rejected() {
    assert!(Config::try_parse_from(["agency_directory", "-n", "-1"]).is_err());
    assert!(Config::try_parse_from(["agency_directory", "-n", "many"]).is_err());
    assert!(Config::try_parse_from(["agency_directory", "--log-level", "loud"]).is_err());
    assert!(Config::try_parse_from(["agency_directory", "-c"]).is_err());
}
