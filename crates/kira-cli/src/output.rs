// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `--json` envelope shape: a success result carries `status`,
//! `trace_id`, and a `data` payload; a failure carries `status`, `error`,
//! `trace_id`, and a stable `kind` tag.

use kira_core::KiraError;
use serde_json::{json, Value};

pub fn success(trace_id: &str, data: Value) -> Value {
    json!({
        "status": "success",
        "trace_id": trace_id,
        "data": data,
    })
}

pub fn error(trace_id: &str, err: &KiraError) -> Value {
    json!({
        "status": "error",
        "error": err.to_string(),
        "trace_id": trace_id,
        "kind": err.kind(),
    })
}

/// Prints `value` as pretty JSON when `json_mode`, otherwise falls back to
/// a single human-readable line built from `text`.
pub fn emit(json_mode: bool, value: &Value, text: impl FnOnce() -> String) {
    if json_mode {
        match serde_json::to_string_pretty(value) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => eprintln!("failed to render JSON output: {err}"),
        }
    } else {
        println!("{}", text());
    }
}
