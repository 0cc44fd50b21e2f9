use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use walkdir::WalkDir;

use fixturefs::{validator, Builder, Error, FileOptions, FileStructure, Node, Tree};

/// Every path the definition declares, relative to the mountpoint.
fn declared_paths(tree: &Tree, prefix: &Path, out: &mut Vec<PathBuf>) {
    for node in tree {
        let path = prefix.join(node.name());
        out.push(path.clone());
        if let Some(children) = node.children() {
            declared_paths(children, &path, out);
        }
    }
}

fn on_disk(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| entry.unwrap().path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    paths.sort();
    paths
}

fn sample() -> Tree {
    Builder::build(|b| {
        b.file("file_a");
        b.symlink("point_to_file_b", "file_b");
        b.directory("dir_a", |b| {
            b.add_file("file_b", FileOptions::new().content("hello"));
            b.add_file("file_c", FileOptions::new().reference("ref_file_c"));
            b.directory_with_ref("dir_b", "ref_dir_b", |b| {
                b.symlink("i_point_to_file_c", "ref_file_c");
                b.symlink("i_point_to_dir_a", "dir_a");
            });
        });
    })
}

#[test]
fn builder_output_is_always_valid() {
    let tree = sample();
    assert!(validator::valid(&serde_json::to_value(&tree).unwrap()));
    assert!(tree.validate().is_ok());
}

#[test]
fn every_declared_path_exists_after_mount() {
    let dir = tempfile::tempdir().unwrap();
    let tree = sample();
    let mut fixture = FileStructure::new(tree.clone()).unwrap();
    fixture.mount(dir.path()).unwrap();

    let mut declared = Vec::new();
    declared_paths(&tree, Path::new(""), &mut declared);
    for relative in &declared {
        let found = fixture.path_for(relative).unwrap();
        assert_eq!(found, Some(dir.path().join(relative)), "{:?}", relative);
    }

    declared.sort();
    assert_eq!(on_disk(dir.path()), declared);
}

#[test]
fn symlink_resolves_through_ref() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = FileStructure::build(|b| {
        b.add_file("a", FileOptions::new().content("payload").reference("A"));
        b.symlink("b", "A");
    })
    .unwrap();
    fixture.mount(dir.path()).unwrap();

    let b = dir.path().join("b");
    assert!(fs::symlink_metadata(&b).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_link(&b).unwrap(), dir.path().join("a"));
    assert_eq!(fs::read_to_string(&b).unwrap(), "payload");
}

#[test]
fn file_directory_and_nested_symlink() {
    let dir = tempfile::tempdir().unwrap();
    let tree = Tree::from(vec![
        Node::file("f1"),
        Node::directory("d1", vec![Node::symlink("s1", "f1")]),
    ]);
    let mut fixture = FileStructure::new(tree).unwrap();
    fixture.mount(dir.path()).unwrap();

    assert!(fs::symlink_metadata(dir.path().join("f1"))
        .unwrap()
        .file_type()
        .is_file());
    assert!(dir.path().join("d1").is_dir());
    assert_eq!(
        fs::read_link(dir.path().join("d1/s1")).unwrap(),
        dir.path().join("f1")
    );
}

#[test]
fn round_trip_leaves_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = FileStructure::new(sample()).unwrap();

    fixture.mount(dir.path()).unwrap();
    fixture.unmount().unwrap();

    assert!(dir.path().is_dir());
    assert!(on_disk(dir.path()).is_empty());
    assert!(!fixture.is_mounted());
    assert!(matches!(fixture.unmount(), Err(Error::NotMounted)));
}

#[test]
fn unmount_on_never_mounted_instance() {
    let mut fixture = FileStructure::new(sample()).unwrap();
    assert!(matches!(fixture.unmount(), Err(Error::NotMounted)));
    assert!(matches!(fixture.path_for("file_a"), Err(Error::NotMounted)));
}

#[test]
fn non_empty_target_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("existing_file"), "keep").unwrap();
    let mut fixture = FileStructure::new(sample()).unwrap();

    assert!(matches!(
        fixture.mount(dir.path()),
        Err(Error::TargetNotEmpty { .. })
    ));
    assert_eq!(on_disk(dir.path()), vec![PathBuf::from("existing_file")]);
    assert_eq!(
        fs::read_to_string(dir.path().join("existing_file")).unwrap(),
        "keep"
    );
}

#[test]
fn dangling_ref_fails_without_residue() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = FileStructure::from_value(json!([
        {"type": "file", "name": "one", "content": "1"},
        {"type": "directory", "name": "nested", "children": [
            {"type": "directory", "name": "deeper", "children": [
                {"type": "file", "name": "two"}
            ]},
            {"type": "symlink", "name": "dangling", "to": "no_such_ref"}
        ]}
    ]))
    .unwrap();

    assert!(matches!(
        fixture.mount(dir.path()),
        Err(Error::UnresolvedSymlink { .. })
    ));
    assert!(on_disk(dir.path()).is_empty());
    assert!(!fixture.is_mounted());
}

#[test]
fn structural_lookup_against_definition() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = FileStructure::new(sample()).unwrap();
    fixture.mount(dir.path()).unwrap();

    assert_eq!(
        fixture.locate(["dir_a", "dir_b", "i_point_to_file_c"]).unwrap(),
        Some(dir.path().join("dir_a/dir_b/i_point_to_file_c"))
    );
    assert_eq!(fixture.locate(["dir_b"]).unwrap(), None);
}

#[test]
fn json_fixture_file() {
    let scratch = tempfile::tempdir().unwrap();
    let definition = scratch.path().join("fixture.json");
    fs::write(
        &definition,
        serde_json::to_string_pretty(&json!([
            {"type": "directory", "name": "etc", "children": [
                {
                    "type": "file",
                    "name": "hosts",
                    "content": "127.0.0.1 localhost\n",
                    "ref": "hosts"
                }
            ]},
            {"type": "symlink", "name": "hosts", "to": "hosts"}
        ]))
        .unwrap(),
    )
    .unwrap();

    let tree = Tree::from_json_file(&definition).unwrap();
    let target = scratch.path().join("root");
    let mut fixture = FileStructure::new(tree).unwrap();
    fixture.mount(&target).unwrap();

    assert_eq!(
        fs::read_to_string(target.join("hosts")).unwrap(),
        "127.0.0.1 localhost\n"
    );
}

#[test]
fn invalid_candidates_are_rejected_before_mount() {
    for candidate in [
        json!(null),
        json!([{"type": "unknown", "name": "foo"}]),
        json!([{"type": "file"}]),
        json!([{"type": "directory", "name": "foo"}]),
        json!([{"type": "file", "name": "f", "children": []}]),
    ] {
        assert!(!validator::valid(&candidate));
        assert!(matches!(
            FileStructure::from_value(candidate),
            Err(Error::InvalidStructure(_))
        ));
    }
}
