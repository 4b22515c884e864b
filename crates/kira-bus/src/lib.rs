// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kira-bus: the Event Bus (C6), Scheduler (C7), and the three Pipeline
//! Orchestrators (C8: inbox/sync/rollup). These are the in-process
//! routing primitives; no domain logic lives here.

pub mod bus;
pub mod error;
pub mod pipeline;
pub mod scheduler;

pub use bus::{EventBus, SubscriptionToken};
pub use error::BusError;
pub use pipeline::inbox::{InboxItem, InboxPipeline, InboxPipelineConfig, InboxSource};
pub use pipeline::rollup::{RollupPeriod, RollupPipeline, RollupPipelineConfig, RollupSectionSource};
pub use kira_core::ports::EntityWriter;
pub use pipeline::sync::{SyncAdapter, SyncPipeline, SyncPipelineConfig};
pub use pipeline::PipelineRunStats;
pub use scheduler::{CancellationToken, Job, Scheduler};
