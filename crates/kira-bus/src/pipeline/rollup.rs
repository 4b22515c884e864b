// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Rollup pipeline (C8): creates a `rollup` entity for a period,
//! publishes `rollup.requested`/`rollup.completed`, and aggregates
//! whatever sections are synchronously contributed. Like the Inbox and
//! Sync pipelines this is orchestration-only — the actual section
//! *content* (what a daily rollup says about the day) is supplied by
//! plugins through [`RollupSectionSource`], never hard-coded here.
//!
//! Creating the entity goes through [`kira_core::ports::EntityWriter`]
//! rather than a `kira-host` dependency directly: `kira-host` already
//! depends on `kira-bus` for the Event Bus, so a reverse dependency here
//! would cycle. `EntityWriter` is the narrow seam `kira-host::HostApi`
//! implements.

use super::backoff::retry_with_backoff;
use super::PipelineRunStats;
use crate::bus::EventBus;
use crate::error::BusError;
use indexmap::IndexMap;
use kira_core::entity::{Entity, EntityType, MetaValue};
use kira_core::event::{Event, EventEnvelope};
use kira_core::id::{IdGen, TraceId, UuidIdGen};
use kira_core::ports::EntityWriter;
use kira_core::AuditSink;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Rollup cadence. `period_key` is the caller-supplied label for the
/// concrete window (e.g. `"2026-07-29"` for daily, `"2026-W31"` for
/// weekly) — the pipeline doesn't compute calendar boundaries itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollupPeriod {
    Daily,
    Weekly,
}

impl fmt::Display for RollupPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollupPeriod::Daily => write!(f, "daily"),
            RollupPeriod::Weekly => write!(f, "weekly"),
        }
    }
}

/// One plugin-contributed rollup section, gathered synchronously during
/// the run. Concrete section content (habits, tasks-done, notes-written,
/// ...) is plugin business logic and out of scope here.
pub trait RollupSectionSource: Send + Sync {
    fn name(&self) -> &str;
    fn contribute(&self, period: RollupPeriod, period_key: &str) -> Result<String, BusError>;
}

#[derive(Debug, Clone, Copy)]
pub struct RollupPipelineConfig {
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl Default for RollupPipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_backoff: Duration::from_millis(100),
        }
    }
}

pub struct RollupPipeline {
    bus: Arc<EventBus>,
    writer: Arc<dyn EntityWriter>,
    sources: Vec<Arc<dyn RollupSectionSource>>,
    audit: Arc<dyn AuditSink>,
    config: RollupPipelineConfig,
    id_gen: UuidIdGen,
}

impl RollupPipeline {
    pub fn new(
        bus: Arc<EventBus>,
        writer: Arc<dyn EntityWriter>,
        sources: Vec<Arc<dyn RollupSectionSource>>,
        audit: Arc<dyn AuditSink>,
        config: RollupPipelineConfig,
    ) -> Self {
        Self {
            bus,
            writer,
            sources,
            audit,
            config,
            id_gen: UuidIdGen,
        }
    }

    /// Aggregates every section (retrying a failing source with backoff
    /// before dropping its section), materializes the rollup entity
    /// through the Host API seam with `trace_id` embedded in its
    /// metadata, and publishes `rollup.requested` then `rollup.completed`
    /// under that same trace id.
    pub async fn run(&self, period: RollupPeriod, period_key: &str) -> Result<PipelineRunStats, BusError> {
        let trace_id = TraceId::generate(&self.id_gen);
        let started = Instant::now();

        self.audit.record(
            trace_id.as_str(),
            "pipeline_started",
            &serde_json::json!({"pipeline": "rollup", "period": period.to_string(), "period_key": period_key}),
            &serde_json::json!({}),
        );

        let mut stats = PipelineRunStats {
            items_scanned: self.sources.len(),
            ..Default::default()
        };

        let mut sections = Vec::new();
        for source in &self.sources {
            let result = retry_with_backoff(self.config.max_retries, self.config.base_backoff, || {
                let source = source.clone();
                async move { source.contribute(period, period_key) }
            })
            .await;

            match result {
                Ok(section) => {
                    sections.push(format!("## {}\n\n{}", source.name(), section));
                    stats.items_processed += 1;
                }
                Err(_) => stats.items_failed += 1,
            }
        }
        let content = sections.join("\n\n");

        let mut metadata = IndexMap::new();
        metadata.insert("title".to_string(), MetaValue::Str(format!("{period} rollup {period_key}")));
        metadata.insert("period".to_string(), MetaValue::Str(period.to_string()));
        metadata.insert("period_key".to_string(), MetaValue::Str(period_key.to_string()));
        metadata.insert("trace_id".to_string(), MetaValue::Str(trace_id.as_str().to_string()));

        let entity: Entity = self
            .writer
            .create_entity(EntityType::Rollup, metadata, content)
            .map_err(|err| BusError::Source(err.to_string()))?;

        let requested = Event::RollupRequested {
            id: entity.id.clone(),
            period: period.to_string(),
        };
        self.bus
            .publish(&requested.default_topic(), &EventEnvelope::new(trace_id.as_str(), requested));

        let completed = Event::RollupCompleted { id: entity.id };
        self.bus
            .publish(&completed.default_topic(), &EventEnvelope::new(trace_id.as_str(), completed));

        stats.elapsed_ms = started.elapsed().as_millis() as u64;
        self.audit.record(
            trace_id.as_str(),
            "pipeline_completed",
            &serde_json::json!({"pipeline": "rollup", "period": period.to_string(), "period_key": period_key}),
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
#[path = "rollup_tests.rs"]
mod tests;
