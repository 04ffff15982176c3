// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn builder_defaults_are_consistent() {
    let project = Project::builder().build();
    assert_eq!(project.id, "-Users-u-demo");
    assert_eq!(project.path, PathBuf::from("/Users/u/demo"));
    assert_eq!(project.session_count, 0);
}

#[test]
fn builder_overrides_session_count() {
    let project = Project::builder().session_count(3).build();
    assert_eq!(project.session_count, 3);
}
