// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Address grammar for absolute node paths

use super::PathError;

/// The path separator, which is also the default root
pub const SEPARATOR: char = '/';

/// The default root suffix
pub const DEFAULT_ROOT: &str = "/";

/// Validate an absolute address against the node path grammar.
///
/// A valid address starts with the separator, does not end with it (unless it
/// is exactly the root), has no empty segments, no `.` or `..` segments, and
/// contains no control, private-use or non-character code points.
pub fn validate(path: &str) -> Result<(), PathError> {
    let invalid = |reason: String| PathError::InvalidPath {
        path: path.to_string(),
        reason,
    };

    if path.is_empty() {
        return Err(invalid("path must not be empty".to_string()));
    }
    if !path.starts_with(SEPARATOR) {
        return Err(invalid("path must start with '/'".to_string()));
    }
    if path == DEFAULT_ROOT {
        return Ok(());
    }
    if path.ends_with(SEPARATOR) {
        return Err(invalid("path must not end with '/'".to_string()));
    }

    for (index, segment) in path[1..].split(SEPARATOR).enumerate() {
        match segment {
            "" => return Err(invalid(format!("empty node name at segment {}", index))),
            "." | ".." => {
                return Err(invalid(format!(
                    "relative segment '{}' at segment {}",
                    segment, index
                )))
            }
            _ => {}
        }
        if let Some(c) = segment.chars().find(|c| is_forbidden(*c)) {
            return Err(invalid(format!(
                "invalid character {:?} at segment {}",
                c, index
            )));
        }
    }

    Ok(())
}

/// Validate a single path segment (a node name)
pub fn validate_name(name: &str) -> Result<(), PathError> {
    if name.is_empty() {
        return Err(PathError::InvalidPath {
            path: String::new(),
            reason: "node name must not be empty".to_string(),
        });
    }
    if name.contains(SEPARATOR) {
        return Err(PathError::InvalidPath {
            path: name.to_string(),
            reason: "node name must not contain '/'".to_string(),
        });
    }
    validate(&format!("{}{}", SEPARATOR, name)).map_err(|e| match e {
        PathError::InvalidPath { reason, .. } => PathError::InvalidPath {
            path: name.to_string(),
            reason,
        },
        other => other,
    })
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\u{0000}'..='\u{001f}'
        | '\u{007f}'..='\u{009f}'
        | '\u{e000}'..='\u{f8ff}'
        | '\u{fff0}'..='\u{ffff}')
}

#[cfg(test)]
#[path = "grammar_tests.rs"]
mod tests;
