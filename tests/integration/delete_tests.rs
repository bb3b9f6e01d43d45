use finddup::actions::delete::{delete, DeleteError, DeleteMode};
use finddup::duplicates::{GroupFilter, ScanOptions};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_permanent_delete_leaves_one_per_group() {
    let dir = tempdir().unwrap();
    for (name, content) in [
        ("a1.txt", "alpha"),
        ("a2.txt", "alpha"),
        ("a3.txt", "alpha"),
        ("b1.txt", "beta"),
        ("b2.txt", "beta"),
        ("u.txt", "unique"),
    ] {
        fs::write(dir.path().join(name), content).unwrap();
    }

    let index = finddup::scan(dir.path(), &ScanOptions::default().with_threads(2)).unwrap();
    let summary = delete(&index, DeleteMode::Permanent).unwrap();

    assert_eq!(summary.deleted, 3);
    assert_eq!(summary.bytes_freed, 2 * 5 + 4);

    let mut remaining: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    remaining.sort();
    assert_eq!(remaining, vec!["a1.txt", "b1.txt", "u.txt"]);
}

#[test]
fn test_delete_missing_duplicate_is_not_found() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "x").unwrap();
    fs::write(dir.path().join("b.txt"), "x").unwrap();

    let index = finddup::scan(dir.path(), &ScanOptions::default()).unwrap();
    let dup = index
        .groups(GroupFilter::DuplicatesOnly)
        .next()
        .unwrap()
        .duplicates()[0]
        .path
        .clone();
    fs::remove_file(&dup).unwrap();

    match delete(&index, DeleteMode::Permanent) {
        Err(DeleteError::NotFound(path)) => assert_eq!(path, dup),
        other => panic!("Expected NotFound, got {:?}", other),
    }
    assert!(dir.path().join("a.txt").exists());
}

#[test]
fn test_delete_with_no_duplicates_is_noop() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "x").unwrap();

    let index = finddup::scan(dir.path(), &ScanOptions::default()).unwrap();
    let summary = delete(&index, DeleteMode::Trash).unwrap();
    assert_eq!(summary.deleted, 0);
    assert!(dir.path().join("a.txt").exists());
}
