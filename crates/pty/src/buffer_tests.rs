// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn lines_only(events: Vec<LineEvent>) -> Vec<String> {
    events
        .into_iter()
        .filter_map(|e| match e {
            LineEvent::Line(l) => Some(l),
            LineEvent::Truncated { .. } => None,
        })
        .collect()
}

#[test]
fn splits_complete_lines() {
    let mut buf = LineBuffer::new();
    let events = buf.push("one\ntwo\nthr");
    assert_eq!(lines_only(events), vec!["one", "two"]);
    assert_eq!(buf.flush(), Some("thr".to_string()));
}

#[test]
fn handles_crlf() {
    let mut buf = LineBuffer::new();
    let events = buf.push("one\r\ntwo\r\n");
    assert_eq!(lines_only(events), vec!["one", "two"]);
    assert_eq!(buf.flush(), None);
}

#[test]
fn skips_blank_lines() {
    let mut buf = LineBuffer::new();
    let events = buf.push("one\n\ntwo\n");
    assert_eq!(lines_only(events), vec!["one", "two"]);
}

#[test]
fn truncates_oversized_residue() {
    let mut buf = LineBuffer::new();
    let huge = "a".repeat(MAX_BUFFER_BYTES + 1);
    let events = buf.push(&huge);
    assert!(matches!(
        events.as_slice(),
        [LineEvent::Truncated { dropped_bytes }] if *dropped_bytes == MAX_BUFFER_BYTES + 1
    ));
    assert_eq!(buf.flush(), None);
}

#[test]
fn residue_under_bound_is_not_truncated() {
    let mut buf = LineBuffer::new();
    let chunk = "a".repeat(MAX_BUFFER_BYTES);
    let events = buf.push(&chunk);
    assert!(events.is_empty());
    assert_eq!(buf.flush().map(|s| s.len()), Some(MAX_BUFFER_BYTES));
}
