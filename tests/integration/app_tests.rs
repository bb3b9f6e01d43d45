use clap::Parser;
use finddup::cli::Cli;
use finddup::config::Config;
use finddup::error::ExitCode;
use finddup::run_app;
use std::fs;
use tempfile::tempdir;

fn cli(args: &[&str]) -> Cli {
    let mut full = vec!["finddup", "--no-progress", "-q"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).unwrap()
}

#[test]
fn test_run_app_duplicates_found() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();
    fs::write(dir.path().join("b.txt"), "X").unwrap();

    let path = dir.path().to_str().unwrap();
    assert_eq!(run_app(cli(&["--dir", path])).unwrap(), ExitCode::Success);
}

#[test]
fn test_run_app_no_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();

    let path = dir.path().to_str().unwrap();
    assert_eq!(
        run_app(cli(&["--dir", path, "--stats"])).unwrap(),
        ExitCode::NoDuplicates
    );
}

#[test]
fn test_run_app_missing_dir_is_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let err = run_app(cli(&["--dir", missing.to_str().unwrap()])).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert!(format!("{:#}", err).contains("missing"));
}

#[test]
fn test_run_app_mvdir() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("a.txt"), "X").unwrap();
    fs::write(src.join("b.txt"), "X").unwrap();
    let target = dir.path().join("dup");

    let code = run_app(cli(&[
        "--dir",
        src.to_str().unwrap(),
        "--mvdir",
        target.to_str().unwrap(),
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(target.join("b.txt").exists());
    assert!(src.join("a.txt").exists());
}

#[test]
fn test_run_app_permanent_delete() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();
    fs::write(dir.path().join("b.txt"), "X").unwrap();

    let path = dir.path().to_str().unwrap();
    run_app(cli(&["--dir", path, "--del", "--permanent"])).unwrap();

    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("b.txt").exists());
}

#[test]
fn test_run_app_json_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();

    let path = dir.path().to_str().unwrap();
    let code = run_app(cli(&["--dir", path, "--output", "json"])).unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);
}

#[test]
fn test_scan_options_cli_overrides_config() {
    let config = Config {
        threads: 1,
        depth: 9,
        limit: 77,
        ..Config::default()
    };

    let parsed = cli(&["--dir", "/p", "-r", "--depth", "3", "--limit", "5"]);
    let options = finddup::scan_options(&parsed, &config);
    assert!(options.recursive);
    assert_eq!(options.max_depth, 3);
    assert_eq!(options.limit, Some(5));

    let parsed = cli(&["--dir", "/p"]);
    let options = finddup::scan_options(&parsed, &config);
    assert_eq!(options.max_depth, 9);
    assert_eq!(options.limit, Some(77));
    assert_eq!(options.thread_count, 1);
    assert!(!options.verbose);
}
