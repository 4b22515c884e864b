// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slugify strings for use as entity id components.

/// Lowercases, replaces non-alphanumeric runs with a single hyphen, trims
/// leading/trailing hyphens, and truncates to `max_len` characters.
pub fn slugify(input: &str, max_len: usize) -> String {
    let lower = input.to_lowercase();

    let mut slug = String::with_capacity(lower.len());
    let mut last_was_hyphen = false;
    for ch in lower.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    let trimmed = slug.trim_matches('-');
    let mut result = trimmed.to_string();

    if result.len() > max_len {
        result.truncate(max_len);
        let trimmed = result.trim_end_matches('-');
        if trimmed.len() != result.len() {
            result = trimmed.to_string();
        }
    }

    if result.is_empty() {
        "item".to_string()
    } else {
        result
    }
}

/// Appends `-2`, `-3`, ... to `base` until `exists` returns false.
pub fn disambiguate(base: &str, exists: impl Fn(&str) -> bool) -> String {
    if !exists(base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if !exists(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
#[path = "slug_tests.rs"]
mod tests;
