// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Face store tests: directory scanning, labels, skipped files, uploads

use crate::common::{jpeg_bytes, write_jpeg};
use face_embedding_service::faces::{CompanyId, FaceStore, SkipReason, StoreError};

#[test]
fn test_valid_and_corrupt_files() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("5");
    write_jpeg(&dir, "alice_01.jpg", 80, 60, 1);
    write_jpeg(&dir, "bob_1.jpg", 300, 300, 2);
    write_jpeg(&dir, "carol_x_y.jpg", 50, 50, 3);
    std::fs::write(dir.join("corrupt.jpg"), b"").unwrap();
    std::fs::write(dir.join("garbage.jpg"), b"definitely not a jpeg").unwrap();

    let scan = FaceStore::new(root.path(), ["jpg"])
        .load_faces(CompanyId::new(5))
        .unwrap();

    assert!(scan.directory_found);
    assert_eq!(scan.faces.len(), 3);
    assert_eq!(scan.skipped.len(), 2);
    for skipped in &scan.skipped {
        assert!(matches!(skipped.reason, SkipReason::Decode(_)));
    }
}

#[test]
fn test_labels_from_file_names() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("9");
    write_jpeg(&dir, "alice_01.jpg", 20, 20, 1);
    write_jpeg(&dir, "nounderscore.jpg", 20, 20, 2);
    write_jpeg(&dir, "E1001_2024_front.jpg", 20, 20, 3);

    let scan = FaceStore::new(root.path(), ["jpg"])
        .load_faces(CompanyId::new(9))
        .unwrap();
    let mut labels: Vec<&str> = scan.faces.iter().map(|f| f.label.as_str()).collect();
    labels.sort();
    assert_eq!(labels, vec!["E1001", "alice", "nounderscore"]);
}

#[test]
fn test_missing_directory_is_empty() {
    let root = tempfile::tempdir().unwrap();
    let scan = FaceStore::new(root.path(), ["jpg"])
        .load_faces(CompanyId::new(77))
        .unwrap();
    assert!(!scan.directory_found);
    assert!(scan.faces.is_empty());
    assert!(scan.skipped.is_empty());
}

#[test]
fn test_other_extensions_and_subdirectories_ignored() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("3");
    write_jpeg(&dir, "dave_1.jpg", 20, 20, 1);
    std::fs::write(dir.join("dave_2.png"), jpeg_bytes(20, 20, 2)).unwrap();
    std::fs::write(dir.join("notes.txt"), b"hello").unwrap();
    std::fs::create_dir_all(dir.join("nested.jpg")).unwrap();

    let scan = FaceStore::new(root.path(), ["jpg"])
        .load_faces(CompanyId::new(3))
        .unwrap();
    assert_eq!(scan.faces.len(), 1);
    assert_eq!(scan.faces[0].file_name, "dave_1.jpg");
    assert!(scan.skipped.is_empty());
}

#[test]
fn test_scan_order_is_stable() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("4");
    for (i, name) in ["zed_1.jpg", "amy_1.jpg", "mia_1.jpg"].iter().enumerate() {
        write_jpeg(&dir, name, 16, 16, i as u8);
    }
    let store = FaceStore::new(root.path(), ["jpg"]);

    let first: Vec<String> = store
        .load_faces(CompanyId::new(4))
        .unwrap()
        .faces
        .into_iter()
        .map(|f| f.file_name)
        .collect();
    let second: Vec<String> = store
        .load_faces(CompanyId::new(4))
        .unwrap()
        .faces
        .into_iter()
        .map(|f| f.file_name)
        .collect();

    assert_eq!(first, vec!["amy_1.jpg", "mia_1.jpg", "zed_1.jpg"]);
    assert_eq!(first, second);
}

#[test]
fn test_saved_face_is_loaded_back() {
    let root = tempfile::tempdir().unwrap();
    let store = FaceStore::new(root.path(), ["jpg", "jpeg"]);

    let path = store
        .save_face(CompanyId::new(11), "E42", &jpeg_bytes(64, 64, 9))
        .unwrap();
    assert!(path.starts_with(root.path().join("11")));
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("E42_"));
    assert!(file_name.ends_with(".jpg"));

    let scan = store.load_faces(CompanyId::new(11)).unwrap();
    assert_eq!(scan.faces.len(), 1);
    assert_eq!(scan.faces[0].label, "E42");
}

#[test]
fn test_save_face_rejections() {
    let root = tempfile::tempdir().unwrap();
    let store = FaceStore::new(root.path(), ["png"]);

    let result = store.save_face(CompanyId::new(1), "bad_label", &jpeg_bytes(8, 8, 1));
    assert!(matches!(result, Err(StoreError::InvalidLabel(_))));

    let result = store.save_face(CompanyId::new(1), "../escape", &jpeg_bytes(8, 8, 1));
    assert!(matches!(result, Err(StoreError::InvalidLabel(_))));

    // JPEG upload into a PNG-only store would never be scanned
    let result = store.save_face(CompanyId::new(1), "ok", &jpeg_bytes(8, 8, 1));
    assert!(matches!(result, Err(StoreError::UnsupportedExtension(_))));

    let result = store.save_face(CompanyId::new(1), "ok", b"not an image");
    assert!(matches!(result, Err(StoreError::Image(_))));
}
