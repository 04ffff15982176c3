// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session fan-out from C3's broadcast channel to every subscribed
//! socket (§4.7 subscription lifecycle, §5 ordering guarantees, §8 P4).
//!
//! On the first subscribe to a session, a single task is spawned that
//! drains the registry's broadcast receiver and forwards each event as a
//! `session.event` notification to every subscriber currently in the set.
//! The set itself, not the broadcast subscription, is what gates delivery
//! — per the spec this task MAY keep running after the set empties, since
//! an empty set simply drops every event on the floor until it either
//! regains a subscriber or the session completes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::Message;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::warn;

use nova_core::{SessionEvent, SessionEventType, SessionId};
use nova_plugins::PluginRegistry;

struct SessionFanout {
    subscribers: Mutex<HashMap<u64, tokio::sync::mpsc::UnboundedSender<Message>>>,
}

#[derive(Default)]
pub struct SubscriptionHub {
    sessions: Mutex<HashMap<SessionId, Arc<SessionFanout>>>,
}

impl SubscriptionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `conn_id` as a subscriber of `session_id`. Returns
    /// `false` if the session is unknown to the registry. The first call
    /// for a given session also spawns its fan-out task and replays
    /// whatever backlog the session had already emitted directly to this
    /// caller, so the auto-subscribe path in `agent.invoke` never misses
    /// `init` (§5 guarantee 4).
    pub fn subscribe(
        self: &Arc<Self>,
        registry: &PluginRegistry,
        session_id: &SessionId,
        conn_id: u64,
        tx: tokio::sync::mpsc::UnboundedSender<Message>,
    ) -> bool {
        let mut sessions = self.sessions.lock();
        if let Some(fanout) = sessions.get(session_id) {
            fanout.subscribers.lock().insert(conn_id, tx);
            return true;
        }

        let Some((backlog, rx)) = registry.stream(session_id) else {
            return false;
        };

        let fanout = Arc::new(SessionFanout {
            subscribers: Mutex::new(HashMap::new()),
        });
        fanout.subscribers.lock().insert(conn_id, tx.clone());
        sessions.insert(session_id.clone(), fanout.clone());
        drop(sessions);

        for event in backlog {
            let _ = tx.send(notification_message(&event));
        }

        self.spawn_fanout(session_id.clone(), fanout, rx);
        true
    }

    pub fn unsubscribe(&self, session_id: &SessionId, conn_id: u64) {
        if let Some(fanout) = self.sessions.lock().get(session_id) {
            fanout.subscribers.lock().remove(&conn_id);
        }
    }

    /// A client disconnect cancels only its own subscriptions; running
    /// sessions are untouched (§5 cancellation rules).
    pub fn disconnect(&self, conn_id: u64) {
        for fanout in self.sessions.lock().values() {
            fanout.subscribers.lock().remove(&conn_id);
        }
    }

    fn spawn_fanout(
        self: &Arc<Self>,
        session_id: SessionId,
        fanout: Arc<SessionFanout>,
        mut rx: broadcast::Receiver<SessionEvent>,
    ) {
        let hub = self.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        let terminal = event.event_type == SessionEventType::Complete;
                        let message = notification_message(&event);
                        fanout.subscribers.lock().retain(|_, tx| tx.send(message.clone()).is_ok());
                        if terminal {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(session_id = %session_id, skipped, "subscriber fan-out lagged, dropping oldest events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            hub.sessions.lock().remove(&session_id);
        });
    }
}

#[cfg(test)]
#[path = "subscriptions_tests.rs"]
mod tests;

fn notification_message(event: &SessionEvent) -> Message {
    let params = serde_json::to_value(event).unwrap_or(serde_json::Value::Null);
    let notification = nova_wire::Notification::session_event(params);
    let text = serde_json::to_string(&notification).unwrap_or_default();
    Message::Text(text.into())
}
