// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-oriented buffering of raw PTY bytes, bounded at 4 MiB of
//! not-yet-newline-terminated residue (§4.4).

/// Output buffer bound: exceeding this much unterminated residue drops it
/// and emits a truncation marker rather than growing unbounded.
pub const MAX_BUFFER_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug)]
pub enum LineEvent {
    Line(String),
    Truncated { dropped_bytes: usize },
}

#[derive(Debug, Default)]
pub struct LineBuffer {
    residue: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of decoded PTY output, returning complete lines in
    /// order. A `Truncated` marker is appended if the residue exceeded the
    /// bound after this push.
    pub fn push(&mut self, chunk: &str) -> Vec<LineEvent> {
        self.residue.push_str(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.residue.find('\n') {
            let raw_line: String = self.residue.drain(..=pos).collect();
            let line = raw_line.trim_end_matches(['\n', '\r']);
            if !line.is_empty() {
                events.push(LineEvent::Line(line.to_string()));
            }
        }

        if self.residue.len() > MAX_BUFFER_BYTES {
            let dropped_bytes = self.residue.len();
            self.residue.clear();
            events.push(LineEvent::Truncated { dropped_bytes });
        }

        events
    }

    /// Non-empty residue left over at process exit, emitted raw rather
    /// than dropped (§4.4).
    pub fn flush(&mut self) -> Option<String> {
        if self.residue.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.residue))
        }
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
