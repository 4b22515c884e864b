// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Inbox pipeline (C8): scans an inbox source, publishes one event per
//! item, and retries the source's per-item finalize step (e.g. archiving
//! a processed file) with backoff before marking the item failed. This
//! module never parses content, extracts tags, or talks to adapters
//! directly — that's the job of the (out-of-scope) concrete `InboxSource`
//! implementation and the subscribers it triggers.

use super::backoff::retry_with_backoff;
use super::PipelineRunStats;
use crate::bus::EventBus;
use crate::error::BusError;
use kira_core::event::{Event, EventEnvelope};
use kira_core::id::{IdGen, TraceId, UuidIdGen};
use kira_core::AuditSink;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A single item the inbox source surfaced during a scan.
#[derive(Debug, Clone, PartialEq)]
pub enum InboxItem {
    File { path: String },
    Message {
        text: String,
        source: String,
        external_id: String,
    },
}

/// The narrow seam a concrete inbox adapter (file watcher, chat webhook
/// buffer, ...) implements. The pipeline only calls `scan` and
/// `finalize`; it never inspects item content itself.
pub trait InboxSource: Send + Sync {
    /// Lists items newly available since the last scan.
    fn scan(&self) -> Result<Vec<InboxItem>, BusError>;

    /// Called once an item's event has been published. Implementations
    /// typically archive or delete the underlying file here. The default
    /// is a no-op for in-memory sources with nothing to finalize.
    fn finalize(&self, _item: &InboxItem) -> Result<(), BusError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InboxPipelineConfig {
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl Default for InboxPipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff: Duration::from_millis(100),
        }
    }
}

pub struct InboxPipeline {
    bus: Arc<EventBus>,
    source: Arc<dyn InboxSource>,
    audit: Arc<dyn AuditSink>,
    config: InboxPipelineConfig,
    id_gen: UuidIdGen,
}

impl InboxPipeline {
    pub fn new(
        bus: Arc<EventBus>,
        source: Arc<dyn InboxSource>,
        audit: Arc<dyn AuditSink>,
        config: InboxPipelineConfig,
    ) -> Self {
        Self {
            bus,
            source,
            audit,
            config,
            id_gen: UuidIdGen,
        }
    }

    /// Runs one full scan→publish→retry pass. Every event this run
    /// publishes, and the `pipeline_started`/`pipeline_completed` audit
    /// lines, share the same `trace_id`.
    pub async fn run(&self) -> Result<PipelineRunStats, BusError> {
        let trace_id = TraceId::generate(&self.id_gen);
        let started = Instant::now();

        self.audit.record(
            trace_id.as_str(),
            "pipeline_started",
            &serde_json::json!({"pipeline": "inbox"}),
            &serde_json::json!({}),
        );

        let items = self.source.scan()?;
        let mut stats = PipelineRunStats {
            items_scanned: items.len(),
            ..Default::default()
        };

        for item in &items {
            let event = match item {
                InboxItem::File { path } => Event::FileDropped { path: path.clone() },
                InboxItem::Message {
                    text,
                    source,
                    external_id,
                } => Event::MessageReceived {
                    text: text.clone(),
                    source: source.clone(),
                    external_id: external_id.clone(),
                },
            };
            let topic = event.default_topic();
            let envelope = EventEnvelope::new(trace_id.as_str(), event);
            self.bus.publish(&topic, &envelope);

            let finalize_result = retry_with_backoff(self.config.max_retries, self.config.base_backoff, || {
                let item = item.clone();
                let source = self.source.clone();
                async move { source.finalize(&item) }
            })
            .await;

            match finalize_result {
                Ok(()) => stats.items_processed += 1,
                Err(_) => stats.items_failed += 1,
            }
        }

        stats.elapsed_ms = started.elapsed().as_millis() as u64;
        self.audit.record(
            trace_id.as_str(),
            "pipeline_completed",
            &serde_json::json!({"pipeline": "inbox"}),
            &serde_json::json!({
                "items_scanned": stats.items_scanned,
                "items_processed": stats.items_processed,
                "items_failed": stats.items_failed,
                "elapsed_ms": stats.elapsed_ms,
            }),
        );

        Ok(stats)
    }
}

#[cfg(test)]
#[path = "inbox_tests.rs"]
mod tests;
