// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One running subprocess under a pseudo-terminal: the critical subsystem
//! (§4.4). Owns two interior threads — a reader that parses PTY bytes into
//! line-delimited JSON records, and an exit watcher that observes process
//! termination — and fans typed events out over a broadcast channel.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use parking_lot::Mutex;
use portable_pty::{native_pty_system, ChildKiller, CommandBuilder, MasterPty, PtySize};
use tokio::sync::{broadcast, Notify};
use tracing::{debug, info, warn};

use nova_core::{
    AgentId, Clock, PluginName, Session, SessionEvent, SessionEventData, SessionEventType,
    SessionId, SessionState, SystemClock,
};

use crate::buffer::{LineBuffer, LineEvent};
use crate::error::PtyError;
use crate::launch::{build_args, resolve_binary};
use crate::record::{self, RecordKind};

/// PTY dimensions requested for the subprocess (§4.4: cols≈200, rows≈50).
const PTY_COLS: u16 = 200;
const PTY_ROWS: u16 = 50;

/// How long `await_ready` waits for the first `init` record before the
/// launch is treated as a failure (§5: a MUST, not a SHOULD).
pub const INIT_TIMEOUT: Duration = Duration::from_secs(10);

/// SIGTERM-to-SIGKILL grace window (§4.4, §5).
pub const KILL_GRACE: Duration = Duration::from_secs(5);

/// How many emitted events a late subscriber can replay (§5 guarantee 4:
/// the daemon subscribes only after `invoke` has already waited for
/// `init`, so without a replay buffer that event would be unobservable).
const REPLAY_CAPACITY: usize = 64;

const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("TERM", "xterm-256color"),
    ("NO_COLOR", "1"),
    ("FORCE_COLOR", "0"),
];

/// A live subprocess session. Construct with [`PtySession::spawn`], then
/// await [`PtySession::await_ready`] before treating the session as usable.
pub struct PtySession<C: Clock = SystemClock> {
    pub id: SessionId,
    pub agent_id: AgentId,
    pub plugin_id: PluginName,
    project_path: PathBuf,
    resume_session_id: Option<String>,
    state: Mutex<SessionState>,
    created_at: u64,
    last_activity: AtomicU64,
    exit_code: AtomicI64,
    message_count: AtomicU64,
    upstream_session_id: Mutex<Option<String>>,
    events_tx: broadcast::Sender<SessionEvent>,
    /// Guards `events_tx.send` so a subscriber that locks this, clones the
    /// backlog, then subscribes, can never miss or duplicate an event.
    replay: Mutex<VecDeque<SessionEvent>>,
    writer: Mutex<Box<dyn Write + Send>>,
    killer: Mutex<Box<dyn ChildKiller + Send + Sync>>,
    pid: Option<u32>,
    exited: Notify,
    complete_emitted: AtomicBool,
    clock: C,
}

/// `exit_code` has no value sentinel for "not yet exited"; `i64::MIN` is
/// used internally and never escapes `PtySession`'s public API.
const NO_EXIT: i64 = i64::MIN;

impl PtySession<SystemClock> {
    pub fn spawn(
        id: SessionId,
        agent_id: AgentId,
        plugin_id: PluginName,
        opts: nova_core::InvokeOptions,
    ) -> Result<Arc<Self>, PtyError> {
        Self::spawn_with_clock(id, agent_id, plugin_id, opts, SystemClock)
    }
}

impl<C: Clock + 'static> PtySession<C> {
    pub fn spawn_with_clock(
        id: SessionId,
        agent_id: AgentId,
        plugin_id: PluginName,
        opts: nova_core::InvokeOptions,
        clock: C,
    ) -> Result<Arc<Self>, PtyError> {
        if !opts.project_path.is_dir() {
            return Err(PtyError::ProjectPathMissing(opts.project_path.clone()));
        }

        let binary = resolve_binary()?;
        let args = build_args(&agent_id, &opts);

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: PTY_ROWS,
                cols: PTY_COLS,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| PtyError::OpenPtyFailure(e.to_string()))?;

        let mut cmd = CommandBuilder::new(&binary);
        cmd.args(&args);
        cmd.cwd(&opts.project_path);
        for (key, value) in ENV_OVERRIDES {
            cmd.env(key, value);
        }

        debug!(session_id = %id, binary = %binary.display(), ?args, "spawning pty subprocess");

        let mut child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| PtyError::SpawnFailure(std::io::Error::other(e.to_string())))?;
        drop(pair.slave);

        let pid = child.process_id();
        let killer = child.clone_killer();

        let writer = pair
            .master
            .take_writer()
            .map_err(|e| PtyError::OpenPtyFailure(e.to_string()))?;
        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| PtyError::OpenPtyFailure(e.to_string()))?;

        let (events_tx, _) = broadcast::channel(256);
        let now = clock.epoch_ms();

        let session = Arc::new(Self {
            id,
            agent_id,
            plugin_id,
            project_path: opts.project_path,
            resume_session_id: opts.resume_session_id,
            state: Mutex::new(SessionState::Initializing),
            created_at: now,
            last_activity: AtomicU64::new(now),
            exit_code: AtomicI64::new(NO_EXIT),
            message_count: AtomicU64::new(0),
            upstream_session_id: Mutex::new(None),
            events_tx,
            replay: Mutex::new(VecDeque::with_capacity(REPLAY_CAPACITY)),
            writer: Mutex::new(writer),
            killer: Mutex::new(killer),
            pid,
            exited: Notify::new(),
            complete_emitted: AtomicBool::new(false),
            clock,
        });

        let reader_handle = spawn_reader_thread(session.clone(), reader);
        spawn_exit_watcher_thread(session.clone(), child, pair.master, reader_handle);

        Ok(session)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    /// Subscribe plus the backlog of events already emitted, so a caller
    /// that only learns the session exists after `init` has fired (the
    /// auto-subscribe path in `agent.invoke`) still observes it first.
    pub fn subscribe_with_replay(&self) -> (Vec<SessionEvent>, broadcast::Receiver<SessionEvent>) {
        let replay = self.replay.lock();
        let backlog = replay.iter().cloned().collect();
        let rx = self.events_tx.subscribe();
        (backlog, rx)
    }

    /// Wait for the subprocess to reach `ready` (first `init` record
    /// observed) or fail after [`INIT_TIMEOUT`]. On timeout, the
    /// subprocess is terminated and an error is returned (§5 resolves the
    /// "SHOULD prefer failure" guidance as a MUST).
    pub async fn await_ready(self: &Arc<Self>) -> Result<(), PtyError> {
        let mut rx = self.subscribe();
        let deadline = tokio::time::sleep(INIT_TIMEOUT);
        tokio::pin!(deadline);

        loop {
            if !matches!(*self.state.lock(), SessionState::Initializing) {
                return Ok(());
            }
            tokio::select! {
                _ = &mut deadline => {
                    self.stop().await.ok();
                    return Err(PtyError::UpstreamInitTimeout(INIT_TIMEOUT));
                }
                event = rx.recv() => {
                    match event {
                        Ok(evt) if evt.event_type == SessionEventType::Init => return Ok(()),
                        Ok(evt) if evt.event_type == SessionEventType::Complete => {
                            return Err(PtyError::UpstreamInitTimeout(INIT_TIMEOUT));
                        }
                        Ok(_) => continue,
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(PtyError::UpstreamInitTimeout(INIT_TIMEOUT));
                        }
                    }
                }
            }
        }
    }

    /// Two-phase kill: SIGTERM, then SIGKILL after [`KILL_GRACE`]. Both
    /// phases tolerate the process already being gone.
    pub async fn stop(&self) -> Result<(), PtyError> {
        if self.is_terminal() {
            return Ok(());
        }

        if let Some(pid) = self.pid {
            match signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                Ok(()) | Err(nix::errno::Errno::ESRCH) => {}
                Err(e) => warn!(session_id = %self.id, error = %e, "SIGTERM failed"),
            }
        }

        let notified = self.exited.notified();
        if tokio::time::timeout(KILL_GRACE, notified).await.is_ok() {
            return Ok(());
        }

        warn!(session_id = %self.id, "grace period elapsed, sending SIGKILL");
        let mut killer = self.killer.lock().clone_killer();
        let _ = tokio::task::spawn_blocking(move || killer.kill()).await;

        // The exit watcher thread will observe the kill and notify; this
        // bound just prevents stop() from hanging forever on a wedged PTY.
        let _ = tokio::time::timeout(KILL_GRACE, self.exited.notified()).await;
        Ok(())
    }

    /// Forward text to the subprocess's stdin, used to answer an
    /// interactive prompt mid-run. Single-prompt follow-up messages are
    /// not supported here (§4.4) — that is enforced by the caller.
    pub async fn send_input(&self, text: &str) -> Result<(), PtyError> {
        let mut line = text.to_string();
        line.push('\n');
        let mut writer = self.writer.lock();
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(PtyError::SpawnFailure)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            *self.state.lock(),
            SessionState::Stopped | SessionState::Error
        )
    }

    pub fn snapshot(&self) -> Session {
        let exit_code = match self.exit_code.load(Ordering::SeqCst) {
            NO_EXIT => None,
            code => Some(code as i32),
        };
        Session {
            id: self.id.clone(),
            agent_id: self.agent_id.clone(),
            plugin_id: self.plugin_id.clone(),
            project_path: self.project_path.clone(),
            resume_session_id: self.resume_session_id.clone(),
            upstream_session_id: self.upstream_session_id.lock().clone(),
            state: *self.state.lock(),
            created_at: self.created_at,
            last_activity: self.last_activity.load(Ordering::SeqCst),
            exit_code,
            message_count: self.message_count.load(Ordering::SeqCst),
            line_buffer: String::new(),
        }
    }

    fn touch(&self) {
        self.last_activity.store(self.clock.epoch_ms(), Ordering::SeqCst);
    }

    fn emit(&self, event_type: SessionEventType, data: SessionEventData) {
        self.touch();
        let event = SessionEvent::new(self.id.clone(), event_type, data, self.clock.epoch_ms());

        // Held across the send so subscribe_with_replay's snapshot-then-subscribe
        // is atomic with respect to this event (no gap, no duplicate).
        let mut replay = self.replay.lock();
        if replay.len() == REPLAY_CAPACITY {
            replay.pop_front();
        }
        replay.push_back(event.clone());
        // Zero subscribers is not an error: late subscribers replay the backlog.
        let _ = self.events_tx.send(event);
    }

    fn handle_line(&self, line: String) {
        self.message_count.fetch_add(1, Ordering::SeqCst);

        let value: serde_json::Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(_) => {
                self.emit(SessionEventType::Output, SessionEventData::Raw { raw: line });
                return;
            }
        };

        match record::classify(&value) {
            RecordKind::Init { upstream_session_id } => {
                self.capture_upstream_id(upstream_session_id);
                *self.state.lock() = SessionState::Ready;
                self.emit(
                    SessionEventType::Init,
                    SessionEventData::Message { message: value.clone() },
                );
                self.emit(SessionEventType::Output, SessionEventData::Message { message: value });
            }
            RecordKind::Assistant => {
                *self.state.lock() = SessionState::Processing;
                self.emit(SessionEventType::Output, SessionEventData::Message { message: value });
            }
            RecordKind::Result { upstream_session_id } => {
                if let Some(id) = upstream_session_id {
                    self.capture_upstream_id(id);
                }
                *self.state.lock() = SessionState::Idle;
                self.emit(SessionEventType::Output, SessionEventData::Message { message: value });
            }
            RecordKind::Other => {
                self.emit(SessionEventType::Output, SessionEventData::Message { message: value });
            }
        }
    }

    fn capture_upstream_id(&self, id: impl Into<String>) {
        let mut guard = self.upstream_session_id.lock();
        if guard.is_none() {
            *guard = Some(id.into());
        }
    }

    /// Driven by the exit-watcher thread once the process has exited.
    /// Emits `complete` exactly once (§4.4, §8 P2).
    fn handle_exit(&self, exit_code: Option<i32>) {
        self.exit_code
            .store(exit_code.map(i64::from).unwrap_or(NO_EXIT), Ordering::SeqCst);
        *self.state.lock() = match exit_code {
            Some(0) | None => SessionState::Stopped,
            Some(_) => SessionState::Error,
        };

        if !self.complete_emitted.swap(true, Ordering::SeqCst) {
            let upstream_session_id = self.upstream_session_id.lock().clone();
            self.emit(
                SessionEventType::Complete,
                SessionEventData::Complete {
                    exit_code,
                    upstream_session_id,
                },
            );
        }
        self.exited.notify_waiters();
        info!(session_id = %self.id, ?exit_code, "session exited");
    }

    fn handle_buffer_overflow(&self, dropped_bytes: usize) {
        warn!(session_id = %self.id, dropped_bytes, "output buffer exceeded bound, residue dropped");
        self.emit(
            SessionEventType::Output,
            SessionEventData::Raw {
                raw: format!("<buffer truncated: {dropped_bytes} bytes dropped>"),
            },
        );
    }
}

fn spawn_reader_thread<C: Clock + 'static>(
    session: Arc<PtySession<C>>,
    mut reader: Box<dyn Read + Send>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut buf = [0u8; 8192];
        let mut line_buffer = LineBuffer::new();
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let chunk = String::from_utf8_lossy(&buf[..n]);
                    for event in line_buffer.push(&chunk) {
                        match event {
                            LineEvent::Line(line) => session.handle_line(line),
                            LineEvent::Truncated { dropped_bytes } => {
                                session.handle_buffer_overflow(dropped_bytes)
                            }
                        }
                    }
                }
                Err(e) => {
                    debug!(session_id = %session.id, error = %e, "pty read ended");
                    break;
                }
            }
        }
        if let Some(residue) = line_buffer.flush() {
            session.emit(SessionEventType::Output, SessionEventData::Raw { raw: residue });
        }
    })
}

fn spawn_exit_watcher_thread<C: Clock + 'static>(
    session: Arc<PtySession<C>>,
    mut child: Box<dyn portable_pty::Child + Send + Sync>,
    master: Box<dyn MasterPty + Send>,
    reader_handle: std::thread::JoinHandle<()>,
) {
    std::thread::spawn(move || {
        let exit_code = match child.wait() {
            Ok(status) => Some(status.exit_code() as i32),
            Err(e) => {
                warn!(session_id = %session.id, error = %e, "failed to wait on child");
                None
            }
        };
        drop(master);

        // Wait for the reader to observe EOF and flush any residue before
        // emitting `complete`, so no output event can arrive after it.
        if reader_handle.join().is_err() {
            warn!(session_id = %session.id, "pty reader thread panicked");
        }

        session.handle_exit(exit_code);
    });
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
