//! Integration tests for algoverse-sink
//!
//! These tests write real files into temporary directories.

use algoverse_domain::{Artifact, ArtifactSink};
use algoverse_sink::{FsSink, SinkError};
use std::fs;

#[test]
fn test_write_creates_directory_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("generated").join("pages");
    let sink = FsSink::new(&root);

    let path = sink
        .write(&Artifact::new("BinarySearch.jsx", "export default function App() {}"))
        .unwrap();

    assert_eq!(path, root.join("BinarySearch.jsx"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "export default function App() {}"
    );
}

#[test]
fn test_write_overwrites_existing() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FsSink::new(dir.path());

    sink.write(&Artifact::new("Heap.jsx", "first version, longer text")).unwrap();
    let path = sink.write(&Artifact::new("Heap.jsx", "second")).unwrap();

    assert_eq!(fs::read_to_string(path).unwrap(), "second");
}

#[test]
fn test_atomic_write_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FsSink::new(dir.path());
    assert!(sink.is_atomic());

    sink.write(&Artifact::new("A.jsx", "a")).unwrap();
    sink.write(&Artifact::new("B.jsx", "b")).unwrap();

    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["A.jsx", "B.jsx"]);
}

#[test]
fn test_direct_write() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FsSink::new(dir.path()).with_atomic(false);

    let path = sink.write(&Artifact::new("Queue.jsx", "")).unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), "");
}

#[test]
fn test_traversal_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("out");
    let sink = FsSink::new(&root);

    let result = sink.write(&Artifact::new("../escape.jsx", "x"));
    assert!(matches!(result, Err(SinkError::InvalidFilename(_))));
    assert!(!dir.path().join("escape.jsx").exists());
    assert!(!root.exists(), "nothing should be created for a rejected name");
}

#[test]
fn test_unwritable_root_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "file in the way").unwrap();

    let sink = FsSink::new(&blocker);
    let result = sink.write(&Artifact::new("A.jsx", "a"));
    assert!(matches!(result, Err(SinkError::Io { .. })));
}
