// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A project is a directory the CLI has been run against at least once,
//! discovered from the encoded directory names under the transcript root
//! (§4.6). `id` is the on-disk directory name; `path` is its decoded
//! absolute filesystem path.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    pub last_modified: u64,
    pub session_count: usize,
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct ProjectBuilder => Project {
        into {
            id: String = "-Users-u-demo",
            name: String = "demo",
        }
        set {
            path: std::path::PathBuf = std::path::PathBuf::from("/Users/u/demo"),
            last_modified: u64 = 0,
            session_count: usize = 0,
        }
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
