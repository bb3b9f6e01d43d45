use finddup::actions::{write_list, write_stats};
use finddup::duplicates::ScanOptions;
use std::fs;
use tempfile::tempdir;

fn render(index: &finddup::DuplicateIndex, stats: bool) -> String {
    let mut out = Vec::new();
    write_list(index, stats, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_list_scanned_directory() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();
    fs::write(dir.path().join("b.txt"), "X").unwrap();
    fs::write(dir.path().join("c.txt"), "Y").unwrap();

    let index = finddup::scan(dir.path(), &ScanOptions::default()).unwrap();
    let text = render(&index, false);

    let root = dir.path().canonicalize().unwrap();
    let expected = format!(
        "Duplicate for file: {:?}:\n\t{}\n\n",
        root.join("a.txt"),
        root.join("b.txt").display()
    );
    assert_eq!(text, expected);
}

#[test]
fn test_list_twice_identical() {
    let dir = tempdir().unwrap();
    for name in ["1.txt", "2.txt", "3.txt", "4.txt"] {
        fs::write(dir.path().join(name), name.len().to_string()).unwrap();
    }

    let index = finddup::scan(dir.path(), &ScanOptions::default().with_threads(2)).unwrap();
    assert_eq!(render(&index, true), render(&index, true));
}

#[test]
fn test_list_no_duplicates_message() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "A").unwrap();
    fs::write(dir.path().join("b.txt"), "B").unwrap();

    let index = finddup::scan(dir.path(), &ScanOptions::default()).unwrap();
    assert_eq!(render(&index, false), "No duplicates found\n");
}

#[test]
fn test_stats_block_counts_unique_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "XX").unwrap();
    fs::write(dir.path().join("b.txt"), "XX").unwrap();
    fs::write(dir.path().join("c.txt"), "YYYY").unwrap();

    let index = finddup::scan(dir.path(), &ScanOptions::default()).unwrap();
    let mut out = Vec::new();
    write_stats(&index, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Files parsed:     3"));
    assert!(text.contains("(8 bytes)"));
    assert!(text.contains("Duplicate files:  1"));
    assert!(text.contains("Duplicate bytes:") && text.contains("(2 bytes)"));
}
