use finddup::duplicates::{GroupFilter, ScanOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// root/f1.txt, root/l2/f2.txt, root/l2/l3/f3.txt, root/l2/l3/l4/f4.txt,
/// all with the same content.
fn four_level_tree() -> (TempDir, Vec<PathBuf>) {
    let dir = tempdir().unwrap();
    let mut current = dir.path().to_path_buf();
    let mut files = Vec::new();
    for level in 1..=4 {
        if level > 1 {
            current = current.join(format!("l{}", level));
            fs::create_dir(&current).unwrap();
        }
        let file = current.join(format!("f{}.txt", level));
        fs::write(&file, "same").unwrap();
        files.push(file);
    }
    (dir, files)
}

fn scanned_names(root: &Path, options: &ScanOptions) -> Vec<String> {
    let index = finddup::scan(root, options).unwrap();
    index
        .groups(GroupFilter::All)
        .flat_map(|g| g.files.iter())
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_non_recursive_hashes_direct_children_only() {
    let (dir, _) = four_level_tree();
    let names = scanned_names(dir.path(), &ScanOptions::default().with_max_depth(20));
    assert_eq!(names, vec!["f1.txt"]);
}

#[test]
fn test_recursive_depth_two_visits_two_levels() {
    let (dir, _) = four_level_tree();
    let options = ScanOptions::default().with_recursive(true).with_max_depth(2);
    assert_eq!(scanned_names(dir.path(), &options), vec!["f1.txt", "f2.txt"]);
}

#[test]
fn test_recursive_depth_one_is_root_only() {
    let (dir, _) = four_level_tree();
    let options = ScanOptions::default().with_recursive(true).with_max_depth(1);
    assert_eq!(scanned_names(dir.path(), &options), vec!["f1.txt"]);
}

#[test]
fn test_recursive_depth_zero_treated_as_one_level() {
    let (dir, _) = four_level_tree();
    let options = ScanOptions::default().with_recursive(true).with_max_depth(0);
    assert_eq!(scanned_names(dir.path(), &options), vec!["f1.txt"]);
}

#[test]
fn test_recursive_default_depth_reaches_all_levels() {
    let (dir, files) = four_level_tree();
    let options = ScanOptions::default().with_recursive(true);
    let index = finddup::scan(dir.path(), &options).unwrap();

    let stats = index.report();
    assert_eq!(stats.files_parsed, 4);
    assert_eq!(stats.group_count, 1);
    assert_eq!(stats.duplicate_count, 3);

    let group = index.groups(GroupFilter::DuplicatesOnly).next().unwrap();
    let canonical: Vec<PathBuf> = files.iter().map(|f| f.canonicalize().unwrap()).collect();
    assert_eq!(group.paths(), canonical);
}

#[test]
fn test_level_order_before_depth() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::create_dir_all(a.join("deep")).unwrap();
    fs::create_dir(&b).unwrap();
    fs::write(a.join("deep").join("x.txt"), "1").unwrap();
    fs::write(b.join("y.txt"), "1").unwrap();
    fs::write(a.join("z.txt"), "1").unwrap();

    let options = ScanOptions::default().with_recursive(true);
    // Level 2 (a/z.txt, b/y.txt) comes before level 3 (a/deep/x.txt)
    assert_eq!(
        scanned_names(dir.path(), &options),
        vec!["z.txt", "y.txt", "x.txt"]
    );
}
