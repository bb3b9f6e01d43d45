use finddup::actions::write_list;
use finddup::duplicates::{GroupFilter, ScanOptions};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_paths_with_spaces_and_unicode() {
    let dir = tempdir().unwrap();
    let names = ["file with spaces.txt", "日本語.txt", "émoji_🦀.txt"];
    for name in names {
        File::create(dir.path().join(name))
            .unwrap()
            .write_all(b"shared")
            .unwrap();
    }

    let index = finddup::scan(dir.path(), &ScanOptions::default()).unwrap();
    let group = index.groups(GroupFilter::DuplicatesOnly).next().unwrap();
    assert_eq!(group.len(), 3);
    for name in names {
        assert!(group.files.iter().any(|f| f.path.ends_with(name)));
    }
}

#[test]
fn test_paths_with_quotes_listed() {
    let dir = tempdir().unwrap();

    // Windows does not allow double quotes in filenames.
    if cfg!(not(windows)) {
        fs::write(dir.path().join("a_\"quoted\".txt"), "content").unwrap();
        fs::write(dir.path().join("b.txt"), "content").unwrap();

        let index = finddup::scan(dir.path(), &ScanOptions::default()).unwrap();
        let mut out = Vec::new();
        write_list(&index, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        // The original is printed quoted with inner quotes escaped
        assert!(text.contains("a_\\\"quoted\\\".txt"));
        assert!(text.contains("/b.txt"));
    }
}

#[test]
fn test_hidden_files_are_scanned() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden"), "dot").unwrap();
    fs::write(dir.path().join("visible"), "dot").unwrap();

    let index = finddup::scan(dir.path(), &ScanOptions::default()).unwrap();
    assert_eq!(index.report().files_parsed, 2);
    assert_eq!(index.report().group_count, 1);
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_excluded() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    let real = dir.path().join("real.txt");
    fs::write(&real, "target").unwrap();
    symlink(&real, dir.path().join("link.txt")).unwrap();

    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("inner.txt"), "target").unwrap();
    symlink(&sub, dir.path().join("sublink")).unwrap();

    let options = ScanOptions::default().with_recursive(true);
    let index = finddup::scan(dir.path(), &options).unwrap();

    let stats = index.report();
    assert_eq!(stats.files_parsed, 2);
    let group = index.groups(GroupFilter::DuplicatesOnly).next().unwrap();
    assert!(group.files.iter().all(|f| !f.path.to_string_lossy().contains("link")));
}

#[cfg(unix)]
#[test]
fn test_fifo_is_excluded() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "x").unwrap();

    let fifo = dir.path().join("pipe");
    let status = std::process::Command::new("mkfifo").arg(&fifo).status();
    if !matches!(status, Ok(s) if s.success()) {
        return;
    }

    let index = finddup::scan(dir.path(), &ScanOptions::default()).unwrap();
    assert_eq!(index.report().files_parsed, 1);
}
