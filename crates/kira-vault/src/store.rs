// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Vault Store: front-matter files under `<vault>/<type>s/<id>.md`,
//! written atomically and guarded by a per-id striped advisory lock.

use crate::error::VaultError;
use crate::frontmatter;
use kira_core::entity::{Entity, EntityType};
use kira_core::id::EntityId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Front-matter file store rooted at a vault directory.
///
/// Readers (`get`, `list`) never take a lock; `upsert` and `delete` acquire
/// the per-id stripe so two concurrent writers to the same entity
/// serialize instead of racing on the read-modify-write. `enable_file_locks
/// = false` disables the table entirely for single-writer embeddings and
/// tests that want to avoid the overhead.
pub struct VaultStore {
    root: PathBuf,
    enable_file_locks: bool,
    locks: Mutex<HashMap<EntityId, Arc<Mutex<()>>>>,
}

impl VaultStore {
    pub fn new(root: impl Into<PathBuf>, enable_file_locks: bool) -> Self {
        Self {
            root: root.into(),
            enable_file_locks,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, entity_type: EntityType, id: &EntityId) -> PathBuf {
        self.root
            .join(entity_type.dir_name())
            .join(format!("{}.md", id.as_str()))
    }

    fn lock_for(&self, id: &EntityId) -> Arc<Mutex<()>> {
        let mut table = self.locks.lock();
        table.entry(id.clone()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }

    /// Reads and decodes a single entity. Scans every `EntityType` directory
    /// since the caller may not know the type up front.
    pub fn get(&self, id: &EntityId) -> Result<Entity, VaultError> {
        for entity_type in EntityType::all() {
            let path = self.path_for(*entity_type, id);
            if path.exists() {
                return self.read_path(&path);
            }
        }
        Err(VaultError::NotFound(id.as_str().to_string()))
    }

    fn read_path(&self, path: &Path) -> Result<Entity, VaultError> {
        let text = fs::read_to_string(path)?;
        frontmatter::decode(&text).map_err(|err| match err {
            VaultError::Corrupt { message, .. } => VaultError::Corrupt {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Writes `entity` to disk, creating or overwriting as needed.
    #[allow(clippy::expect_used)]
    pub fn upsert(&self, entity: &Entity) -> Result<(), VaultError> {
        let guard = if self.enable_file_locks {
            Some(self.lock_for(&entity.id))
        } else {
            None
        };
        let _held = guard.as_ref().map(|lock| lock.lock());

        let path = self.path_for(entity.entity_type, &entity.id);
        let dir = path.parent().expect("entity path always has a parent dir");
        fs::create_dir_all(dir)?;
        let text = frontmatter::encode(entity);
        atomic_write(&path, &text)?;
        Ok(())
    }

    /// Removes an entity's file if present. Idempotent: deleting an absent
    /// id is not an error.
    pub fn delete(&self, id: &EntityId) -> Result<(), VaultError> {
        let guard = if self.enable_file_locks {
            Some(self.lock_for(id))
        } else {
            None
        };
        let _held = guard.as_ref().map(|lock| lock.lock());

        for entity_type in EntityType::all() {
            let path = self.path_for(*entity_type, id);
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Lazily lists every entity of `entity_type`, or every entity across
    /// all types if `None`. No ordering guarantee.
    pub fn list(
        &self,
        entity_type: Option<EntityType>,
    ) -> impl Iterator<Item = Result<Entity, VaultError>> + '_ {
        let types: Vec<EntityType> = match entity_type {
            Some(t) => vec![t],
            None => EntityType::all().to_vec(),
        };
        types.into_iter().flat_map(move |t| {
            let dir = self.root.join(t.dir_name());
            let entries: Vec<PathBuf> = match fs::read_dir(&dir) {
                Ok(read_dir) => read_dir
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.path())
                    .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("md"))
                    .collect(),
                Err(_) => Vec::new(),
            };
            entries.into_iter().map(move |path| self.read_path(&path))
        })
    }
}

/// Writes `content` to `path` via temp-file + fsync + rename + fsync parent
/// dir, so a crash mid-write never leaves a partially-written file at
/// `path` itself.
#[allow(clippy::expect_used)]
fn atomic_write(path: &Path, content: &str) -> Result<(), VaultError> {
    let dir = path.parent().expect("entity path always has a parent dir");
    let tmp_name = format!(
        ".tmp-{}-{}",
        std::process::id(),
        rand::random::<u64>()
    );
    let tmp_path = dir.join(tmp_name);

    {
        let mut file = fs::File::create(&tmp_path)?;
        use std::io::Write;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;

    if let Ok(dir_file) = fs::File::open(dir) {
        let _ = dir_file.sync_all();
    }
    Ok(())
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
