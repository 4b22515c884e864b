// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The RAG store (C14): a small, file-persisted document index scored by
//! lexical token overlap (no embeddings in this build).
//! Grounded on `original_source/tests/unit/test_sprint2_rag_memory.py`;
//! the tokenizer reuses the `regex` dependency the way `oj-runbook` does.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use kira_core::entity::MetaValue;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: IndexMap<String, MetaValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub document: Document,
    pub score: f64,
}

#[allow(clippy::expect_used)]
fn tokenizer() -> Regex {
    Regex::new(r"[A-Za-z0-9]+").expect("static tokenizer pattern is valid")
}

fn tokenize(text: &str) -> Vec<String> {
    tokenizer().find_iter(text).map(|m| m.as_str().to_lowercase()).collect()
}

/// A JSON-file-backed document index scored by token overlap between the
/// query and each document's content, ties broken by insertion order.
pub struct RagStore {
    index_path: PathBuf,
    pub documents: Vec<Document>,
}

impl RagStore {
    /// Loads `index_path` if it exists, starting empty otherwise.
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        let index_path = index_path.into();
        let documents = std::fs::read_to_string(&index_path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        Self { index_path, documents }
    }

    pub fn add_document(&mut self, document: Document) {
        self.documents.retain(|d| d.id != document.id);
        self.documents.push(document);
        self.persist();
    }

    pub fn clear(&mut self) {
        self.documents.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Some(parent) = self.index_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(text) = serde_json::to_string_pretty(&self.documents) {
            let _ = std::fs::write(&self.index_path, text);
        }
    }

    /// Scores every document by token overlap with `query`, returning the
    /// `top_k` best matches with score > 0, highest score first, ties
    /// broken by insertion order.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<SearchResult> {
        let query_tokens: Vec<String> = tokenize(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f64, &Document)> = self
            .documents
            .iter()
            .enumerate()
            .map(|(idx, doc)| (idx, overlap_score(&query_tokens, &doc.content), doc))
            .filter(|(_, score, _)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));

        scored
            .into_iter()
            .take(top_k)
            .map(|(_, score, doc)| SearchResult { document: doc.clone(), score })
            .collect()
    }
}

fn overlap_score(query_tokens: &[String], content: &str) -> f64 {
    let content_tokens = tokenize(content);
    if content_tokens.is_empty() {
        return 0.0;
    }
    let content_set: HashMap<&str, ()> = content_tokens.iter().map(|t| (t.as_str(), ())).collect();
    let matches = query_tokens.iter().filter(|t| content_set.contains_key(t.as_str())).count();
    matches as f64 / query_tokens.len() as f64
}

pub fn index_path_for(vault_root: &Path) -> PathBuf {
    vault_root.join(".kira").join("rag_index.json")
}

#[cfg(test)]
#[path = "rag_tests.rs"]
mod tests;
