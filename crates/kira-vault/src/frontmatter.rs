// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hand-rolled front-matter codec for entity files.
//!
//! The format is a restricted, YAML-flavored block delimited by `---`
//! sentinel lines: scalars as `key: value`, lists as two-space-indented
//! `- item` blocks, nested objects as two-space-indented `key: value`
//! blocks. `encode`/`decode` are written as a matched pair (not through
//! `serde_yaml`) so round-tripping an [`Entity`] is byte-stable and keys
//! keep the [`IndexMap`]'s insertion order, mirroring `oj-runbook::parser`'s
//! hand-written recursive-descent front end.

use crate::error::VaultError;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use kira_core::entity::{Entity, EntityType, MetaValue};
use kira_core::id::EntityId;
use std::str::FromStr;

const SENTINEL: &str = "---";
const INDENT: &str = "  ";

/// Renders an [`Entity`] as `---\n<front matter>\n---\n\n<body>`.
pub fn encode(entity: &Entity) -> String {
    let mut out = String::new();
    out.push_str(SENTINEL);
    out.push('\n');

    out.push_str(&format!("id: {}\n", entity.id));
    out.push_str(&format!("entity_type: {}\n", entity.entity_type));
    out.push_str(&format!("created_ts: {}\n", entity.created_ts.to_rfc3339()));
    out.push_str(&format!("updated_ts: {}\n", entity.updated_ts.to_rfc3339()));
    if let Some(done_ts) = entity.done_ts {
        out.push_str(&format!("done_ts: {}\n", done_ts.to_rfc3339()));
    }

    for (key, value) in &entity.metadata {
        encode_entry(&mut out, 0, key, value);
    }

    out.push_str(SENTINEL);
    out.push('\n');
    out.push('\n');
    out.push_str(&entity.content);
    out
}

fn encode_entry(out: &mut String, depth: usize, key: &str, value: &MetaValue) {
    let indent = INDENT.repeat(depth);
    match value {
        MetaValue::Map(map) => {
            out.push_str(&format!("{indent}{key}:\n"));
            for (child_key, child_value) in map {
                encode_entry(out, depth + 1, child_key, child_value);
            }
        }
        MetaValue::List(items) => {
            out.push_str(&format!("{indent}{key}:\n"));
            for item in items {
                encode_list_item(out, depth + 1, item);
            }
        }
        scalar => {
            out.push_str(&format!("{indent}{key}: {}\n", encode_scalar(scalar)));
        }
    }
}

fn encode_list_item(out: &mut String, depth: usize, value: &MetaValue) {
    let indent = INDENT.repeat(depth);
    match value {
        MetaValue::Map(map) => {
            let mut entries = map.iter();
            if let Some((first_key, first_value)) = entries.next() {
                out.push_str(&format!(
                    "{indent}- {first_key}: {}\n",
                    encode_scalar_or_marker(first_value)
                ));
                for (key, value) in entries {
                    encode_entry(out, depth + 1, key, value);
                }
            } else {
                out.push_str(&format!("{indent}- {{}}\n"));
            }
        }
        scalar => {
            out.push_str(&format!("{indent}- {}\n", encode_scalar(scalar)));
        }
    }
}

fn encode_scalar_or_marker(value: &MetaValue) -> String {
    match value {
        MetaValue::Map(_) | MetaValue::List(_) => String::new(),
        scalar => encode_scalar(scalar),
    }
}

fn encode_scalar(value: &MetaValue) -> String {
    match value {
        MetaValue::Null => "null".to_string(),
        MetaValue::Bool(b) => b.to_string(),
        MetaValue::Int(i) => i.to_string(),
        MetaValue::Float(f) => f.to_string(),
        MetaValue::Str(s) => s.clone(),
        MetaValue::Map(_) | MetaValue::List(_) => String::new(),
    }
}

fn parse_scalar(raw: &str) -> MetaValue {
    let trimmed = raw.trim();
    if trimmed == "null" || trimmed == "~" {
        MetaValue::Null
    } else if trimmed == "true" {
        MetaValue::Bool(true)
    } else if trimmed == "false" {
        MetaValue::Bool(false)
    } else if let Ok(i) = trimmed.parse::<i64>() {
        MetaValue::Int(i)
    } else if let Ok(f) = trimmed.parse::<f64>() {
        MetaValue::Float(f)
    } else {
        MetaValue::Str(trimmed.to_string())
    }
}

struct Line<'a> {
    indent: usize,
    content: &'a str,
}

fn tokenize(block: &str) -> Vec<Line<'_>> {
    block
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            let indent = l.chars().take_while(|c| *c == ' ').count() / INDENT.len();
            Line {
                indent,
                content: l.trim_start(),
            }
        })
        .collect()
}

/// Parses a sequence of sibling `key: value` / `key:` entries starting at
/// `start`, all at exactly `depth`, returning the built map and the index
/// of the first line not consumed.
fn parse_map(lines: &[Line<'_>], start: usize, depth: usize) -> (IndexMap<String, MetaValue>, usize) {
    let mut map = IndexMap::new();
    let mut i = start;
    while i < lines.len() && lines[i].indent == depth {
        let line = &lines[i];
        if let Some(stripped) = line.content.strip_prefix("- ") {
            // Stray list item at map depth: shouldn't happen for well-formed
            // input produced by `encode`; stop rather than misparse.
            let _ = stripped;
            break;
        }
        let (key, rest) = match line.content.split_once(':') {
            Some((k, r)) => (k.trim().to_string(), r.trim()),
            None => (line.content.trim().to_string(), ""),
        };
        i += 1;
        if !rest.is_empty() {
            map.insert(key, parse_scalar(rest));
            continue;
        }
        // Value lives in the indented block that follows, if any.
        if i < lines.len() && lines[i].indent > depth {
            if lines[i].content.starts_with("- ") {
                let (list, next) = parse_list(lines, i, depth + 1);
                map.insert(key, MetaValue::List(list));
                i = next;
            } else {
                let (child, next) = parse_map(lines, i, depth + 1);
                map.insert(key, MetaValue::Map(child));
                i = next;
            }
        } else {
            map.insert(key, MetaValue::Null);
        }
    }
    (map, i)
}

fn parse_list(lines: &[Line<'_>], start: usize, depth: usize) -> (Vec<MetaValue>, usize) {
    let mut items = Vec::new();
    let mut i = start;
    while i < lines.len() && lines[i].indent == depth && lines[i].content.starts_with("- ") {
        let body = &lines[i].content[2..];
        if let Some((key, rest)) = body.split_once(':') {
            let rest = rest.trim();
            let mut entry = IndexMap::new();
            if rest.is_empty() {
                entry.insert(key.trim().to_string(), MetaValue::Null);
            } else {
                entry.insert(key.trim().to_string(), parse_scalar(rest));
            }
            i += 1;
            if i < lines.len() && lines[i].indent > depth {
                let (more, next) = parse_map(lines, i, depth + 1);
                entry.extend(more);
                i = next;
            }
            items.push(MetaValue::Map(entry));
        } else {
            items.push(parse_scalar(body));
            i += 1;
        }
    }
    (items, i)
}

/// Parses front-matter text back into an [`Entity`]. The reverse of
/// [`encode`].
pub fn decode(text: &str) -> Result<Entity, VaultError> {
    let mut parts = text.splitn(3, SENTINEL);
    let empty_prefix = parts.next().unwrap_or("");
    if !empty_prefix.trim().is_empty() {
        return Err(corrupt("missing opening sentinel"));
    }
    let front_matter = parts.next().ok_or_else(|| corrupt("missing front matter block"))?;
    let rest = parts.next().ok_or_else(|| corrupt("missing closing sentinel"))?;
    let body = rest.strip_prefix('\n').unwrap_or(rest);
    let body = body.strip_prefix('\n').unwrap_or(body);

    let lines = tokenize(front_matter);
    let (mut fields, _) = parse_map(&lines, 0, 0);

    let id = fields
        .shift_remove("id")
        .and_then(|v| v.as_str().map(|s| s.to_string()))
        .ok_or_else(|| corrupt("missing id"))?;
    let entity_type = fields
        .shift_remove("entity_type")
        .and_then(|v| v.as_str().map(|s| s.to_string()))
        .ok_or_else(|| corrupt("missing entity_type"))?;
    let entity_type = EntityType::from_str(&entity_type).map_err(|e| corrupt(&e))?;
    let created_ts = fields
        .shift_remove("created_ts")
        .and_then(|v| v.as_str().map(parse_timestamp))
        .ok_or_else(|| corrupt("missing created_ts"))?
        .ok_or_else(|| corrupt("invalid created_ts"))?;
    let updated_ts = fields
        .shift_remove("updated_ts")
        .and_then(|v| v.as_str().map(parse_timestamp))
        .ok_or_else(|| corrupt("missing updated_ts"))?
        .ok_or_else(|| corrupt("invalid updated_ts"))?;
    let done_ts = match fields.shift_remove("done_ts") {
        Some(MetaValue::Str(s)) => Some(parse_timestamp(&s).ok_or_else(|| corrupt("invalid done_ts"))?),
        _ => None,
    };

    Ok(Entity {
        id: EntityId::new(id),
        entity_type,
        metadata: fields,
        content: body.to_string(),
        created_ts,
        updated_ts,
        done_ts,
    })
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn corrupt(message: &str) -> VaultError {
    VaultError::Corrupt {
        path: String::new(),
        message: message.to_string(),
    }
}

#[cfg(test)]
#[path = "frontmatter_tests.rs"]
mod tests;
