use finddup::duplicates::{DuplicateFinder, GroupFilter, ScanOptions};
use finddup::scanner::HashAlgorithm;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let index = DuplicateFinder::with_defaults().scan(dir.path()).unwrap();

    assert!(index.is_empty());
    let stats = index.report();
    assert_eq!(stats.files_parsed, 0);
    assert_eq!(stats.group_count, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"content a");
    write(dir.path(), "b.txt", b"content b");
    write(dir.path(), "c.txt", b"content c");

    let index = DuplicateFinder::with_defaults().scan(dir.path()).unwrap();

    assert_eq!(index.groups(GroupFilter::DuplicatesOnly).count(), 0);
    assert_eq!(index.groups(GroupFilter::All).count(), 3);
    let stats = index.report();
    assert_eq!(stats.files_parsed, 3);
    assert_eq!(stats.scanned_bytes, 27);
    assert_eq!(stats.group_count, 0);
    assert_eq!(stats.duplicate_bytes, 0);
}

#[test]
fn test_scan_three_file_scenario() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"X");
    write(dir.path(), "b.txt", b"X");
    write(dir.path(), "c.txt", b"Y");

    let options = ScanOptions::default().with_threads(1);
    let index = finddup::scan(dir.path(), &options).unwrap();

    let groups: Vec<_> = index.groups(GroupFilter::DuplicatesOnly).collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(file_names(&groups[0].paths()), vec!["a.txt", "b.txt"]);

    let stats = index.report();
    assert_eq!(stats.files_parsed, 3);
    assert_eq!(stats.scanned_bytes, 3);
    assert_eq!(stats.group_count, 1);
    assert_eq!(stats.duplicate_count, 1);
    assert_eq!(stats.duplicate_bytes, 1);
}

#[test]
fn test_scan_multiple_threads_matches_single() {
    let dir = tempdir().unwrap();
    for i in 0..25 {
        write(dir.path(), &format!("f{:02}.bin", i), format!("{}", i % 4).as_bytes());
    }

    let single = finddup::scan(dir.path(), &ScanOptions::default()).unwrap();
    let multi = finddup::scan(dir.path(), &ScanOptions::default().with_threads(4)).unwrap();

    let collect = |index: &finddup::DuplicateIndex| -> Vec<Vec<PathBuf>> {
        index
            .groups(GroupFilter::All)
            .map(|g| g.paths())
            .collect()
    };
    assert_eq!(collect(&single), collect(&multi));
    assert_eq!(single.report(), multi.report());
    assert_eq!(multi.report().group_count, 4);
    assert_eq!(multi.report().duplicate_count, 21);
}

#[test]
fn test_originals_stable_across_scans() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    write(dir.path(), "z.txt", b"same");
    write(dir.path(), "m.txt", b"same");
    write(&sub, "a.txt", b"same");

    let options = ScanOptions::default().with_recursive(true).with_threads(3);
    let originals: Vec<PathBuf> = (0..5)
        .map(|_| {
            let index = finddup::scan(dir.path(), &options).unwrap();
            let group = index.groups(GroupFilter::DuplicatesOnly).next().unwrap();
            group.original().unwrap().path.clone()
        })
        .collect();

    assert!(originals.windows(2).all(|w| w[0] == w[1]));
    // Root level comes first, sorted by name
    assert_eq!(originals[0].file_name().unwrap(), "m.txt");
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    fs::create_dir(&sub).unwrap();
    write(dir.path(), "a.txt", b"nested dup");
    write(&sub, "b.txt", b"nested dup");

    let flat = finddup::scan(dir.path(), &ScanOptions::default()).unwrap();
    assert_eq!(flat.report().files_parsed, 1);
    assert_eq!(flat.report().group_count, 0);

    let deep = finddup::scan(dir.path(), &ScanOptions::default().with_recursive(true)).unwrap();
    assert_eq!(deep.report().files_parsed, 2);
    assert_eq!(deep.report().group_count, 1);
}

#[test]
fn test_scan_with_sha256() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"abc");
    write(dir.path(), "b.txt", b"abc");

    let options = ScanOptions::default().with_algorithm(HashAlgorithm::Sha256);
    let index = finddup::scan(dir.path(), &options).unwrap();
    let group = index.groups(GroupFilter::DuplicatesOnly).next().unwrap();

    assert_eq!(
        group.digest_hex(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_limit_is_not_enforced() {
    let dir = tempdir().unwrap();
    for i in 0..6 {
        write(dir.path(), &format!("{}.txt", i), b"dup");
    }

    let options = ScanOptions::default().with_limit(Some(2));
    let index = finddup::scan(dir.path(), &options).unwrap();
    assert_eq!(index.report().duplicate_count, 5);
}

#[test]
fn test_scan_relative_root_gives_absolute_paths() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"x");
    write(dir.path(), "b.txt", b"x");

    let relative = dir.path().join(".");
    let index = finddup::scan(&relative, &ScanOptions::default()).unwrap();
    for group in index.groups(GroupFilter::All) {
        for file in &group.files {
            assert!(file.path.is_absolute());
            assert!(!file.path.to_string_lossy().contains("/./"));
        }
    }
}
