// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Narrow port traits that let a lower-layer crate (`kira-bus`) call up
//! into `kira-host`'s Host API without a crate-level dependency cycle
//! (`kira-host` already depends on `kira-bus` for the Event Bus). Each
//! trait names only the handful of methods the caller actually needs.

use crate::entity::{Entity, EntityType, MetaValue};
use crate::error::KiraError;
use indexmap::IndexMap;

/// The subset of the Host API (C5) the Rollup pipeline needs: creating a
/// `rollup` entity for a period. Implemented by `kira-host::HostApi`.
pub trait EntityWriter: Send + Sync {
    fn create_entity(
        &self,
        entity_type: EntityType,
        metadata: IndexMap<String, MetaValue>,
        content: String,
    ) -> Result<Entity, KiraError>;
}
