// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! nova-wire: JSON-RPC 2.0 envelope and typed method payloads exchanged
//! over the `/nova` WebSocket endpoint (§4.7, §6).

pub mod envelope;
pub mod error_codes;
pub mod params;

pub use envelope::{ErrorObject, Notification, Outcome, Request, RequestId, Response};
pub use params::{
    AgentInvokeParams, ProjectSessionsParams, SessionDeleteBulkParams, SessionDeleteParams,
    SessionHistoryParams, SessionIdParams, SessionMessageParams,
};
