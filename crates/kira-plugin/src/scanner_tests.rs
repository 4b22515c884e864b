// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn safe_modules_constant_excludes_dangerous_ones() {
    assert!(ALLOWED_MODULES.contains(&"json"));
    assert!(ALLOWED_MODULES.contains(&"math"));
    assert!(!ALLOWED_MODULES.contains(&"os"));
    assert!(!ALLOWED_MODULES.contains(&"subprocess"));
    assert!(!ALLOWED_MODULES.contains(&"socket"));
}

#[test]
fn allows_pure_computation_imports() {
    let scanner = ImportScanner::new();
    let source = "import json\nimport math\nfrom collections import defaultdict\n";
    assert!(scanner.scan_source("plugin.py", source).is_empty());
}

#[test]
fn rejects_os_import() {
    let scanner = ImportScanner::new();
    let violations = scanner.scan_source("plugin.py", "import os\n");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].module, "os");
}

#[test]
fn rejects_subprocess_and_socket() {
    let scanner = ImportScanner::new();
    let violations = scanner.scan_source(
        "plugin.py",
        "import subprocess\nfrom socket import socket\n",
    );
    assert_eq!(violations.len(), 2);
}

#[test]
fn detects_nested_module_reference() {
    let scanner = ImportScanner::new();
    let violations = scanner.scan_source("plugin.py", "import os.path\n");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].module, "os.path");
}

#[test]
fn detects_aliased_import_by_root_segment() {
    let scanner = ImportScanner::new();
    let violations = scanner.scan_source("plugin.py", "import os as o\n");
    assert_eq!(violations.len(), 1);
}

#[test]
fn detects_indirect_dunder_import() {
    let scanner = ImportScanner::new();
    let violations = scanner.scan_source("plugin.py", "evil = __import__('os')\n");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].module, "os");
}

#[test]
fn detects_rust_use_of_disallowed_crate() {
    let scanner = ImportScanner::new();
    let violations = scanner.scan_source("plugin.rs", "use std::process::Command;\n");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].module, "std.process.Command");
}

#[test]
fn detects_cross_plugin_import() {
    let scanner = ImportScanner::new();
    let violations = scanner.scan_source("plugin.py", "import kira_plugin_other\n");
    assert_eq!(violations.len(), 1);
    assert!(violations[0].reason.contains("cross-plugin"));
}

#[test]
fn detects_private_core_module_segment() {
    let scanner = ImportScanner::new();
    let violations = scanner.scan_source("plugin.py", "from _internal import helper\n");
    assert_eq!(violations.len(), 1);
    assert!(violations[0].reason.contains("private"));
}

#[test]
fn custom_allowlist_blocks_modules_not_in_it() {
    let scanner = ImportScanner::with_allowlist(["math"].into_iter().collect());
    let violations = scanner.scan_source("plugin.py", "import json\n");
    assert_eq!(violations.len(), 1);
}

#[test]
fn scan_dir_walks_nested_source_tree() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("plugin.py"), "import json\n").unwrap();
    std::fs::write(dir.path().join("sub/helper.py"), "import os\n").unwrap();

    let scanner = ImportScanner::new();
    let violations = scanner.scan_dir(dir.path()).unwrap();
    assert_eq!(violations.len(), 1);
    assert!(violations[0].file.ends_with("helper.py"));
}

#[test]
fn scan_dir_on_missing_directory_is_empty() {
    let scanner = ImportScanner::new();
    let violations = scanner.scan_dir(std::path::Path::new("/nonexistent/src")).unwrap();
    assert!(violations.is_empty());
}
