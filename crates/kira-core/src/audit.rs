// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audit sink seam: every component that needs to write an audit line
//! (the Pipeline Orchestrator, the Agent Graph, `kiractl`) depends on this
//! trait rather than on the concrete `kira-maintenance::AuditLogger`, so
//! `kira-bus`/`kira-agent` don't need to depend on `kira-maintenance`.

/// Records one structured audit line. Implementations must make each call
/// visible promptly (no cross-call buffering).
pub trait AuditSink: Send + Sync {
    fn record(&self, trace_id: &str, command: &str, args: &serde_json::Value, result: &serde_json::Value);
}

/// No-op sink for tests and embeddings that don't care about the audit
/// trail.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, _trace_id: &str, _command: &str, _args: &serde_json::Value, _result: &serde_json::Value) {}
}
