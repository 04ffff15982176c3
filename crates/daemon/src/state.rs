// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide wiring, built once in `main` and handed to the transport
//! as ordinary injected values (§9: "the process-wide accessors are a
//! compatibility surface only... injection is unconditional").

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nova_config::ConfigLoader;
use nova_history::HistoryService;
use nova_plugins::{PluginLoader, PluginRegistry};

use crate::subscriptions::SubscriptionHub;

pub struct AppState {
    pub config: Arc<ConfigLoader>,
    pub registry: Arc<PluginRegistry>,
    pub loader: PluginLoader,
    pub history: HistoryService,
    pub subscriptions: Arc<SubscriptionHub>,
    connections: AtomicUsize,
}

impl AppState {
    pub fn new(
        config: Arc<ConfigLoader>,
        registry: Arc<PluginRegistry>,
        loader: PluginLoader,
        history: HistoryService,
    ) -> Self {
        Self {
            config,
            registry,
            loader,
            history,
            subscriptions: Arc::new(SubscriptionHub::new()),
            connections: AtomicUsize::new(0),
        }
    }

    pub fn connection_opened(&self) {
        self.connections.fetch_add(1, Ordering::SeqCst);
    }

    pub fn connection_closed(&self) {
        self.connections.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}
