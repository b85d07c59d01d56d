// Concept-directory snapshot listing.

use std::path::Path;

use mesh_batch::images::list_image_files;

fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), b"x").expect("write file");
}

#[test]
fn test_listing_filters_by_extension_case_insensitively() {
    let dir = tempfile::tempdir().expect("create temp dir");
    touch(dir.path(), "a.png");
    touch(dir.path(), "B.JPG");
    touch(dir.path(), "c.jpeg"); // spelled-out jpeg is not an accepted extension
    touch(dir.path(), "notes.txt");
    touch(dir.path(), "mesh.glb");

    let files = list_image_files(dir.path()).expect("should list");
    assert_eq!(files, vec!["B.JPG".to_string(), "a.png".to_string()]);
}

#[test]
fn test_listing_ignores_subdirectories() {
    let dir = tempfile::tempdir().expect("create temp dir");
    touch(dir.path(), "a.png");
    let nested = dir.path().join("nested.png");
    std::fs::create_dir(&nested).expect("create dir");

    let files = list_image_files(dir.path()).expect("should list");
    assert_eq!(files, vec!["a.png".to_string()]);
}

#[test]
fn test_listing_empty_directory() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let files = list_image_files(dir.path()).expect("should list");
    assert!(files.is_empty());
}

#[test]
fn test_listing_missing_directory_is_an_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let result = list_image_files(&dir.path().join("absent"));
    assert!(result.is_err(), "missing concepts directory must not be silent");
}
