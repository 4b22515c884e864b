// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use kira_core::id::EntityId;
use kira_core::NullAuditSink;
use parking_lot::Mutex;

struct FakeWriter {
    created: Mutex<Vec<(IndexMap<String, MetaValue>, String)>>,
}

impl EntityWriter for FakeWriter {
    fn create_entity(
        &self,
        entity_type: EntityType,
        metadata: IndexMap<String, MetaValue>,
        content: String,
    ) -> Result<Entity, kira_core::KiraError> {
        assert_eq!(entity_type, EntityType::Rollup);
        let period_key = metadata.get("period_key").and_then(MetaValue::as_str).unwrap().to_string();
        self.created.lock().push((metadata.clone(), content.clone()));
        let mut entity = Entity::new(EntityId::new(format!("rollup-{period_key}")), entity_type, Utc::now());
        entity.metadata = metadata;
        entity.content = content;
        Ok(entity)
    }
}

struct FixedSection {
    name: String,
    text: String,
}

impl RollupSectionSource for FixedSection {
    fn name(&self) -> &str {
        &self.name
    }

    fn contribute(&self, _period: RollupPeriod, _period_key: &str) -> Result<String, BusError> {
        Ok(self.text.clone())
    }
}

struct FailingSection;

impl RollupSectionSource for FailingSection {
    fn name(&self) -> &str {
        "flaky"
    }

    fn contribute(&self, _period: RollupPeriod, _period_key: &str) -> Result<String, BusError> {
        Err(BusError::Source("unavailable".into()))
    }
}

#[tokio::test]
async fn aggregates_sections_and_embeds_trace_id() {
    let bus = Arc::new(EventBus::new());
    let requested = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(Mutex::new(Vec::new()));
    let r = requested.clone();
    bus.subscribe("rollup.requested", move |env| r.lock().push(env.clone()));
    let c = completed.clone();
    bus.subscribe("rollup.completed", move |env| c.lock().push(env.clone()));

    let writer = Arc::new(FakeWriter {
        created: Mutex::new(Vec::new()),
    });
    let sources: Vec<Arc<dyn RollupSectionSource>> = vec![Arc::new(FixedSection {
        name: "habits".into(),
        text: "did the thing".into(),
    })];

    let pipeline = RollupPipeline::new(
        bus,
        writer.clone(),
        sources,
        Arc::new(NullAuditSink),
        RollupPipelineConfig::default(),
    );

    let stats = pipeline.run(RollupPeriod::Daily, "2026-07-29").await.unwrap();

    assert_eq!(stats.items_scanned, 1);
    assert_eq!(stats.items_processed, 1);
    assert_eq!(stats.items_failed, 0);
    assert_eq!(requested.lock().len(), 1);
    assert_eq!(completed.lock().len(), 1);
    assert_eq!(requested.lock()[0].trace_id, completed.lock()[0].trace_id);

    let created = writer.created.lock();
    assert_eq!(created.len(), 1);
    assert!(created[0].1.contains("did the thing"));
    let embedded_trace_id = created[0].0.get("trace_id").and_then(MetaValue::as_str).unwrap();
    assert_eq!(embedded_trace_id, requested.lock()[0].trace_id);
}

#[tokio::test]
async fn failing_section_counts_as_failed_not_processed() {
    let bus = Arc::new(EventBus::new());
    let writer = Arc::new(FakeWriter {
        created: Mutex::new(Vec::new()),
    });
    let sources: Vec<Arc<dyn RollupSectionSource>> = vec![Arc::new(FailingSection)];

    let pipeline = RollupPipeline::new(
        bus,
        writer,
        sources,
        Arc::new(NullAuditSink),
        RollupPipelineConfig {
            max_retries: 1,
            base_backoff: std::time::Duration::from_millis(1),
        },
    );

    let stats = pipeline.run(RollupPeriod::Weekly, "2026-W31").await.unwrap();
    assert_eq!(stats.items_processed, 0);
    assert_eq!(stats.items_failed, 1);
}
