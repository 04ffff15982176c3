// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use proptest::prelude::*;
use tempfile::TempDir;

use super::*;

#[test]
fn decode_prefers_the_longer_real_entry() {
    let root = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(root.path().join("Users/u/my_projects/demo")).expect("mkdir");
    std::fs::create_dir_all(root.path().join("Users/u/my")).expect("mkdir");

    let decoded = decode_project_id("-Users-u-my-projects-demo", root.path());
    assert_eq!(decoded, root.path().join("Users/u/my_projects/demo"));
}

#[test]
fn decode_falls_back_to_verbatim_join_when_nothing_matches() {
    let root = TempDir::new().expect("tempdir");
    let decoded = decode_project_id("-a-b-c", root.path());
    assert_eq!(decoded, root.path().join("a").join("b").join("c"));
}

#[test]
fn decode_terminates_on_an_empty_encoded_name() {
    let root = TempDir::new().expect("tempdir");
    assert_eq!(decode_project_id("", root.path()), root.path());
}

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]([a-zA-Z0-9_]{0,8})?"
}

proptest! {
    /// P6: encoding a real directory tree then decoding it against that
    /// same tree yields the original path back.
    #[test]
    fn round_trips_through_a_real_directory_tree(segments in prop::collection::vec(segment(), 1..4)) {
        let root = TempDir::new().expect("tempdir");
        let mut path = root.path().to_path_buf();
        for segment in &segments {
            path.push(segment);
        }
        std::fs::create_dir_all(&path).expect("mkdir -p");

        let encoded = encode_project_path(&path, root.path());
        let decoded = decode_project_id(&encoded, root.path());
        prop_assert_eq!(decoded, path);
    }
}
