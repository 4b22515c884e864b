// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static import-allowlist scanning over a plugin's `src/` tree.
//! Regex-based and language-agnostic, matching the
//! `import`/`from ... import`/`use`/`require(...)`/`__import__(...)`
//! surface forms. Grounded on
//! `original_source/tests/unit/test_hardened_sandbox.py`'s `SAFE_MODULES`
//! contract (pure-computation allowlist, OS/network/subprocess/socket
//! rejected) and `test_import_boundaries.py`'s cross-plugin/private-core
//! import rules; `regex` crate already pinned for `oj-runbook`'s own
//! source scanning.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;

/// Root module segments every plugin may reference: pure computation only.
/// Deliberately excludes anything implying OS, network, subprocess, or raw
/// socket access.
pub const ALLOWED_MODULES: &[&str] =
    &["text", "json", "data_encoding", "math", "time", "collections", "regex"];

/// One disallowed reference found while scanning a plugin source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportViolation {
    pub file: String,
    pub module: String,
    pub reason: &'static str,
}

struct ImportPatterns {
    import_stmt: Regex,
    from_import: Regex,
    rust_use: Regex,
    require_call: Regex,
    dynamic_import: Regex,
}

impl ImportPatterns {
    #[allow(clippy::expect_used)]
    fn new() -> Self {
        Self {
            import_stmt: Regex::new(r"(?m)^\s*import\s+([\w.]+)").expect("static pattern"),
            from_import: Regex::new(r"(?m)^\s*from\s+([\w.]+)\s+import").expect("static pattern"),
            rust_use: Regex::new(r"(?m)^\s*use\s+([\w:]+)").expect("static pattern"),
            require_call: Regex::new(r#"require\(\s*["']([\w./]+)["']\s*\)"#).expect("static pattern"),
            dynamic_import: Regex::new(r#"__import__\(\s*["']([\w.]+)["']\s*\)"#).expect("static pattern"),
        }
    }
}

/// Scans plugin source files for imports outside [`ALLOWED_MODULES`] and
/// for cross-plugin / private-core references.
pub struct ImportScanner {
    allowlist: HashSet<&'static str>,
    patterns: ImportPatterns,
}

impl ImportScanner {
    pub fn new() -> Self {
        Self {
            allowlist: ALLOWED_MODULES.iter().copied().collect(),
            patterns: ImportPatterns::new(),
        }
    }

    pub fn with_allowlist(allowlist: HashSet<&'static str>) -> Self {
        Self { allowlist, patterns: ImportPatterns::new() }
    }

    /// Scans every regular file under `src_dir`, returning every violation
    /// found. An empty result means the plugin may be loaded.
    pub fn scan_dir(&self, src_dir: &Path) -> std::io::Result<Vec<ImportViolation>> {
        let mut violations = Vec::new();
        if !src_dir.exists() {
            return Ok(violations);
        }
        for entry in walk_files(src_dir)? {
            let content = std::fs::read_to_string(&entry)?;
            let file = entry.display().to_string();
            violations.extend(self.scan_source(&file, &content));
        }
        Ok(violations)
    }

    /// Scans one file's already-read source text.
    pub fn scan_source(&self, file: &str, content: &str) -> Vec<ImportViolation> {
        let mut violations = Vec::new();

        for captures in self.patterns.import_stmt.captures_iter(content) {
            self.check_module(file, &captures[1], &mut violations);
        }
        for captures in self.patterns.from_import.captures_iter(content) {
            self.check_module(file, &captures[1], &mut violations);
        }
        for captures in self.patterns.rust_use.captures_iter(content) {
            self.check_module(file, &captures[1].replace("::", "."), &mut violations);
        }
        for captures in self.patterns.require_call.captures_iter(content) {
            self.check_module(file, &captures[1].replace('/', "."), &mut violations);
        }
        for captures in self.patterns.dynamic_import.captures_iter(content) {
            self.check_module(file, &captures[1], &mut violations);
        }

        violations
    }

    fn check_module(&self, file: &str, dotted: &str, violations: &mut Vec<ImportViolation>) {
        let root = dotted.split(['.', ':']).next().unwrap_or(dotted);

        if root.starts_with('_') {
            violations.push(ImportViolation {
                file: file.to_string(),
                module: dotted.to_string(),
                reason: "private (leading-underscore) module segment",
            });
            return;
        }
        if dotted.starts_with("kira_plugin_") || dotted.starts_with("kira.plugins") {
            violations.push(ImportViolation {
                file: file.to_string(),
                module: dotted.to_string(),
                reason: "cross-plugin import is never allowed",
            });
            return;
        }
        if !self.allowlist.contains(root) {
            violations.push(ImportViolation {
                file: file.to_string(),
                module: dotted.to_string(),
                reason: "module outside the pure-computation allowlist",
            });
        }
    }
}

impl Default for ImportScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn walk_files(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            files.extend(walk_files(&path)?);
        } else {
            files.push(path);
        }
    }
    Ok(files)
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
