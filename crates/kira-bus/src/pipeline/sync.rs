// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Sync pipeline (C8): publishes `sync.tick` for every configured
//! remote adapter name and retries each adapter's tick with bounded
//! backoff. Like the Inbox pipeline, this is orchestration-only — it
//! never talks to a remote network itself, only to the narrow
//! `SyncAdapter` seam a concrete adapter implements.

use super::backoff::retry_with_backoff;
use super::PipelineRunStats;
use crate::bus::EventBus;
use crate::error::BusError;
use kira_core::event::{Event, EventEnvelope};
use kira_core::id::{IdGen, TraceId, UuidIdGen};
use kira_core::AuditSink;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One remote system the Sync pipeline ticks. Concrete network wiring is
/// out of scope for this build; `tick` is where a real adapter would poll
/// for remote changes and apply the Sync Ledger's echo-break/LWW rules.
pub trait SyncAdapter: Send + Sync {
    fn name(&self) -> &str;
    fn tick(&self) -> Result<(), BusError>;
}

#[derive(Debug, Clone, Copy)]
pub struct SyncPipelineConfig {
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl Default for SyncPipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff: Duration::from_millis(200),
        }
    }
}

pub struct SyncPipeline {
    bus: Arc<EventBus>,
    adapters: Vec<Arc<dyn SyncAdapter>>,
    audit: Arc<dyn AuditSink>,
    config: SyncPipelineConfig,
    id_gen: UuidIdGen,
}

impl SyncPipeline {
    pub fn new(
        bus: Arc<EventBus>,
        adapters: Vec<Arc<dyn SyncAdapter>>,
        audit: Arc<dyn AuditSink>,
        config: SyncPipelineConfig,
    ) -> Self {
        Self {
            bus,
            adapters,
            audit,
            config,
            id_gen: UuidIdGen,
        }
    }

    /// Publishes `sync.tick` and drives `tick()` for every configured
    /// adapter, one trace id per run.
    pub async fn run(&self) -> PipelineRunStats {
        let trace_id = TraceId::generate(&self.id_gen);
        let started = Instant::now();

        self.audit.record(
            trace_id.as_str(),
            "pipeline_started",
            &serde_json::json!({"pipeline": "sync"}),
            &serde_json::json!({}),
        );

        let mut stats = PipelineRunStats {
            items_scanned: self.adapters.len(),
            ..Default::default()
        };

        for adapter in &self.adapters {
            let event = Event::SyncTick {
                adapter: adapter.name().to_string(),
            };
            let topic = event.default_topic();
            let envelope = EventEnvelope::new(trace_id.as_str(), event);
            self.bus.publish(&topic, &envelope);

            let result = retry_with_backoff(self.config.max_retries, self.config.base_backoff, || {
                let adapter = adapter.clone();
                async move { adapter.tick() }
            })
            .await;

            match result {
                Ok(()) => stats.items_processed += 1,
                Err(_) => stats.items_failed += 1,
            }
        }

        stats.elapsed_ms = started.elapsed().as_millis() as u64;
        self.audit.record(
            trace_id.as_str(),
            "pipeline_completed",
            &serde_json::json!({"pipeline": "sync"}),
            &serde_json::json!({
                "items_scanned": stats.items_scanned,
                "items_processed": stats.items_processed,
                "items_failed": stats.items_failed,
                "elapsed_ms": stats.elapsed_ms,
            }),
        );

        stats
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
