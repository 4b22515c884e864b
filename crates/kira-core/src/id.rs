// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID generation abstractions

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Trait for truncating identifiers to a short prefix.
pub trait ShortId {
    /// Returns a string slice truncated to at most `n` characters.
    fn short(&self, n: usize) -> &str;
}

impl ShortId for str {
    fn short(&self, n: usize) -> &str {
        if self.len() <= n {
            self
        } else {
            &self[..n]
        }
    }
}

/// Define a newtype ID wrapper around `String`.
///
/// Generates `new()`, `as_str()`, `short()`, `Display`, `From<String>`, `From<&str>`,
/// `PartialEq<str>`, `PartialEq<&str>`, and `Borrow<str>` implementations.
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns a string slice truncated to at most `n` characters.
            pub fn short(&self, n: usize) -> &str {
                if self.0.len() <= n {
                    &self.0
                } else {
                    &self.0[..n]
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Generates unique identifiers.
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> String;
}

/// UUID-based ID generator for production use.
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Sequential ID generator for testing.
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}

crate::define_id! {
    /// Identifies an entity (task, note, event, rollup, inbox item).
    pub struct EntityId;
}

crate::define_id! {
    /// Identifies an inbox clarification request.
    pub struct ClarificationId;
}

crate::define_id! {
    /// Identifies a scheduled (once or periodic) job.
    pub struct ScheduledJobId;
}

crate::define_id! {
    /// Correlates every event and log line produced by one logical operation.
    pub struct TraceId;
}

impl TraceId {
    pub fn generate(id_gen: &impl IdGen) -> Self {
        Self::new(id_gen.next())
    }
}

impl ScheduledJobId {
    pub fn generate(id_gen: &impl IdGen) -> Self {
        Self::new(id_gen.next())
    }
}

impl ClarificationId {
    pub fn generate(id_gen: &impl IdGen) -> Self {
        Self::new(id_gen.next())
    }
}

impl EntityId {
    /// Renders the `<type>-<yyyymmdd>-<hhmm>-<slug>` id format, disambiguating
    /// collisions by appending `-2`, `-3`, ... (`exists` reports whether a
    /// candidate id is already taken).
    pub fn generate(
        entity_type: crate::entity::EntityType,
        now: chrono::DateTime<chrono::Utc>,
        slug_source: &str,
        exists: impl Fn(&str) -> bool,
    ) -> Self {
        let slug = crate::slug::slugify(slug_source, 32);
        let base = format!("{}-{}-{}", entity_type, now.format("%Y%m%d-%H%M"), slug);
        let final_id = crate::slug::disambiguate(&base, exists);
        Self::new(final_id)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
