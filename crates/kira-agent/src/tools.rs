// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Tool Registry & Schemas (C11): the fixed set of tools the Agent
//! Graph is allowed to call, and total validation of their arguments
//! before anything reaches the Host API. Built-in tool set mirrors
//! `original_source/src/kira/agent/policies.py`'s `TOOL_CAPABILITIES`
//! table.

use kira_core::task_status::TaskStatus;
use std::str::FromStr;

/// The shape a single tool argument must take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    NonEmptyString,
    Enum(&'static [&'static str]),
    BoundedList { max_len: usize },
    DateOnly,
    DateTime,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ToolSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

const TASK_STATUS_VALUES: &[&str] = &["todo", "doing", "blocked", "review", "done"];

const TASK_CREATE: ToolSchema = ToolSchema {
    name: "task_create",
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::NonEmptyString, required: true },
        FieldSpec { name: "status", kind: FieldKind::Enum(TASK_STATUS_VALUES), required: false },
        FieldSpec { name: "tags", kind: FieldKind::BoundedList { max_len: 16 }, required: false },
        FieldSpec { name: "due", kind: FieldKind::DateOnly, required: false },
    ],
};

const TASK_UPDATE: ToolSchema = ToolSchema {
    name: "task_update",
    fields: &[
        FieldSpec { name: "id", kind: FieldKind::NonEmptyString, required: true },
        FieldSpec { name: "status", kind: FieldKind::Enum(TASK_STATUS_VALUES), required: false },
        FieldSpec { name: "title", kind: FieldKind::NonEmptyString, required: false },
    ],
};

const TASK_DELETE: ToolSchema = ToolSchema {
    name: "task_delete",
    fields: &[FieldSpec { name: "id", kind: FieldKind::NonEmptyString, required: true }],
};

const TASK_GET: ToolSchema = ToolSchema {
    name: "task_get",
    fields: &[FieldSpec { name: "id", kind: FieldKind::NonEmptyString, required: true }],
};

const TASK_LIST: ToolSchema = ToolSchema {
    name: "task_list",
    fields: &[FieldSpec { name: "status", kind: FieldKind::Enum(TASK_STATUS_VALUES), required: false }],
};

const ROLLUP_DAILY: ToolSchema = ToolSchema {
    name: "rollup_daily",
    fields: &[FieldSpec { name: "date", kind: FieldKind::DateOnly, required: false }],
};

const VAULT_EXPORT: ToolSchema = ToolSchema {
    name: "vault_export",
    fields: &[FieldSpec { name: "destination", kind: FieldKind::NonEmptyString, required: true }],
};

const BUILTIN_TOOLS: &[ToolSchema] =
    &[TASK_CREATE, TASK_UPDATE, TASK_DELETE, TASK_GET, TASK_LIST, ROLLUP_DAILY, VAULT_EXPORT];

/// Looks up a built-in tool by name.
pub fn find_tool(name: &str) -> Option<&'static ToolSchema> {
    BUILTIN_TOOLS.iter().find(|t| t.name == name)
}

pub fn all_tools() -> &'static [ToolSchema] {
    BUILTIN_TOOLS
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be a non-empty string")]
    NotNonEmptyString { field: &'static str },

    #[error("field `{field}` must be one of {allowed:?}, got `{got}`")]
    NotInEnum { field: &'static str, allowed: &'static [&'static str], got: String },

    #[error("field `{field}` must be a list of at most {max_len} items")]
    ListTooLong { field: &'static str, max_len: usize },

    #[error("field `{field}` must be a date in YYYY-MM-DD form")]
    NotDateOnly { field: &'static str },

    #[error("field `{field}` must be an RFC 3339 date-time")]
    NotDateTime { field: &'static str },
}

/// Arguments that have passed schema validation, still as a JSON object.
#[derive(Debug, Clone)]
pub struct ValidatedArgs {
    pub tool: &'static str,
    pub raw: serde_json::Value,
}

/// Validates `raw` against the named tool's schema. Reports the *first*
/// violation found, scanning fields in declaration order — total in the
/// sense that every declared field is checked against `raw`, not that every
/// violation in `raw` is collected at once.
pub fn validate_tool_args(
    name: &str,
    raw: &serde_json::Value,
) -> Result<ValidatedArgs, ValidationError> {
    let schema = find_tool(name).ok_or_else(|| ValidationError::UnknownTool(name.to_string()))?;
    let obj = raw.as_object();

    for field in schema.fields {
        let value = obj.and_then(|o| o.get(field.name));
        match value {
            None => {
                if field.required {
                    return Err(ValidationError::MissingField(field.name));
                }
            }
            Some(v) => validate_field(field, v)?,
        }
    }

    Ok(ValidatedArgs { tool: schema.name, raw: raw.clone() })
}

fn validate_field(field: &FieldSpec, value: &serde_json::Value) -> Result<(), ValidationError> {
    match field.kind {
        FieldKind::NonEmptyString => {
            let s = value.as_str().ok_or(ValidationError::NotNonEmptyString { field: field.name })?;
            if s.trim().is_empty() {
                return Err(ValidationError::NotNonEmptyString { field: field.name });
            }
        }
        FieldKind::Enum(allowed) => {
            let s = value.as_str().ok_or_else(|| ValidationError::NotInEnum {
                field: field.name,
                allowed,
                got: value.to_string(),
            })?;
            if field.name == "status" {
                if TaskStatus::from_str(s).is_err() {
                    return Err(ValidationError::NotInEnum { field: field.name, allowed, got: s.to_string() });
                }
            } else if !allowed.contains(&s) {
                return Err(ValidationError::NotInEnum { field: field.name, allowed, got: s.to_string() });
            }
        }
        FieldKind::BoundedList { max_len } => {
            let arr = value.as_array().ok_or(ValidationError::ListTooLong { field: field.name, max_len })?;
            if arr.len() > max_len {
                return Err(ValidationError::ListTooLong { field: field.name, max_len });
            }
        }
        FieldKind::DateOnly => {
            let s = value.as_str().ok_or(ValidationError::NotDateOnly { field: field.name })?;
            if chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() {
                return Err(ValidationError::NotDateOnly { field: field.name });
            }
        }
        FieldKind::DateTime => {
            let s = value.as_str().ok_or(ValidationError::NotDateTime { field: field.name })?;
            if chrono::DateTime::parse_from_rfc3339(s).is_err() {
                return Err(ValidationError::NotDateTime { field: field.name });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tools_tests.rs"]
mod tests;
