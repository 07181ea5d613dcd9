//! Copying and comparing structured values.
//!
//! Works on [`serde_json::Value`] graphs, so any `Serialize` type can be
//! copied or diffed against another after conversion. Copies only move
//! fields that already exist on the target, mirroring the source shape is
//! never the goal. All recursive walks carry a depth guard so degenerate
//! or maliciously nested input fails instead of overflowing the stack.

use crate::{LatticeError, LatticeResult};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::trace;

/// Maximum nesting depth for recursive value walks.
pub const MAX_DEPTH: usize = 128;

/// Options controlling [`copy_into`].
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Recurse into nested objects instead of replacing them wholesale.
    pub deep: bool,
    /// Field names that must never be written on the target.
    pub skip_fields: HashSet<String>,
    /// Depth guard for recursive copies.
    pub max_depth: usize,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self { deep: true, skip_fields: HashSet::new(), max_depth: MAX_DEPTH }
    }
}

impl CopyOptions {
    /// Shallow copy: nested objects on the target are replaced, not merged.
    #[must_use]
    pub fn shallow() -> Self {
        Self { deep: false, ..Self::default() }
    }

    /// Adds a field name to never write on the target.
    #[must_use]
    pub fn skip(mut self, field: impl Into<String>) -> Self {
        self.skip_fields.insert(field.into());
        self
    }
}

/// Copies fields from `source` into `target`.
///
/// Only fields already present on the target object are written. Deep
/// copies merge nested objects and rebuild arrays element-wise, merging
/// each object element into the target element at the same index. Returns
/// the names of the top-level fields that changed.
pub fn copy_into(source: &Value, target: &mut Value, options: &CopyOptions) -> LatticeResult<Vec<String>> {
    copy_level(source, target, options, 0)
}

fn copy_level(
    source: &Value,
    target: &mut Value,
    options: &CopyOptions,
    depth: usize,
) -> LatticeResult<Vec<String>> {
    if depth >= options.max_depth {
        return Err(LatticeError::invalid_input(format!(
            "value nesting exceeds {} levels",
            options.max_depth
        )));
    }

    let (source, target) = match (source, target) {
        (Value::Object(s), Value::Object(t)) => (s, t),
        _ => {
            return Err(LatticeError::invalid_input(
                "copy_into requires objects on both sides",
            ))
        }
    };

    let mut changed = Vec::new();
    for (name, incoming) in source {
        if options.skip_fields.contains(name) {
            continue;
        }
        let Some(existing) = target.get_mut(name) else {
            continue;
        };

        if options.deep && existing.is_object() && incoming.is_object() {
            let nested = copy_level(incoming, existing, options, depth + 1)?;
            if !nested.is_empty() {
                changed.push(name.clone());
            }
            continue;
        }

        if options.deep && existing.is_array() && incoming.is_array() {
            let merged = merge_array(existing, incoming, options, depth + 1)?;
            if *existing != merged {
                trace!(field = %name, "array rebuilt");
                *existing = merged;
                changed.push(name.clone());
            }
            continue;
        }

        if existing != incoming {
            trace!(field = %name, "field updated");
            *existing = incoming.clone();
            changed.push(name.clone());
        }
    }

    Ok(changed)
}

/// Rebuilds an array from the source, merging each object element into the
/// target's element at the same index when one exists.
fn merge_array(
    existing: &Value,
    incoming: &Value,
    options: &CopyOptions,
    depth: usize,
) -> LatticeResult<Value> {
    if depth >= options.max_depth {
        return Err(LatticeError::invalid_input(format!(
            "value nesting exceeds {} levels",
            options.max_depth
        )));
    }

    let (existing, incoming) = match (existing, incoming) {
        (Value::Array(e), Value::Array(i)) => (e, i),
        _ => return Ok(incoming.clone()),
    };

    let mut out = Vec::with_capacity(incoming.len());
    for (i, element) in incoming.iter().enumerate() {
        match existing.get(i) {
            Some(target) if target.is_object() && element.is_object() => {
                let mut merged = target.clone();
                copy_level(element, &mut merged, options, depth + 1)?;
                out.push(merged);
            }
            Some(target) if target.is_array() && element.is_array() => {
                out.push(merge_array(target, element, options, depth + 1)?);
            }
            _ => out.push(element.clone()),
        }
    }
    Ok(Value::Array(out))
}

/// Clones a value graph, enforcing the depth guard.
pub fn deep_clone(value: &Value) -> LatticeResult<Value> {
    fn walk(value: &Value, depth: usize) -> LatticeResult<Value> {
        if depth >= MAX_DEPTH {
            return Err(LatticeError::invalid_input(format!(
                "value nesting exceeds {MAX_DEPTH} levels"
            )));
        }
        match value {
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k.clone(), walk(v, depth + 1)?);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => items.iter().map(|v| walk(v, depth + 1)).collect(),
            other => Ok(other.clone()),
        }
    }
    walk(value, 0)
}

/// Options controlling [`diff`].
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Field names excluded from the comparison.
    pub ignore_fields: HashSet<String>,
}

impl DiffOptions {
    /// Adds a field name to exclude from the comparison.
    #[must_use]
    pub fn ignore(mut self, field: impl Into<String>) -> Self {
        self.ignore_fields.insert(field.into());
        self
    }
}

/// A single difference between two value graphs.
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    /// Dotted path of the differing field, array indexes in brackets.
    pub path: String,
    pub left: Value,
    pub right: Value,
}

impl std::fmt::Display for Difference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} != {}", self.path, self.left, self.right)
    }
}

/// Lists the fields on which `left` and `right` differ.
pub fn diff(left: &Value, right: &Value, options: &DiffOptions) -> LatticeResult<Vec<Difference>> {
    let mut out = Vec::new();
    diff_level(left, right, options, "", 0, &mut out)?;
    Ok(out)
}

/// Whether two value graphs are equal under `options`.
pub fn are_equal(left: &Value, right: &Value, options: &DiffOptions) -> LatticeResult<bool> {
    Ok(diff(left, right, options)?.is_empty())
}

fn diff_level(
    left: &Value,
    right: &Value,
    options: &DiffOptions,
    path: &str,
    depth: usize,
    out: &mut Vec<Difference>,
) -> LatticeResult<()> {
    if depth >= MAX_DEPTH {
        return Err(LatticeError::invalid_input(format!(
            "value nesting exceeds {MAX_DEPTH} levels"
        )));
    }

    match (left, right) {
        (Value::Object(l), Value::Object(r)) => {
            let mut names: Vec<&String> = l.keys().chain(r.keys()).collect();
            names.sort();
            names.dedup();
            for name in names {
                if options.ignore_fields.contains(name.as_str()) {
                    continue;
                }
                let child_path = join_path(path, name);
                match (l.get(name), r.get(name)) {
                    (Some(lv), Some(rv)) => {
                        diff_level(lv, rv, options, &child_path, depth + 1, out)?;
                    }
                    (Some(lv), None) => out.push(Difference {
                        path: child_path,
                        left: lv.clone(),
                        right: Value::Null,
                    }),
                    (None, Some(rv)) => out.push(Difference {
                        path: child_path,
                        left: Value::Null,
                        right: rv.clone(),
                    }),
                    (None, None) => {}
                }
            }
        }
        (Value::Array(l), Value::Array(r)) => {
            if l.len() != r.len() {
                out.push(Difference { path: path.to_string(), left: left.clone(), right: right.clone() });
                return Ok(());
            }
            for (i, (lv, rv)) in l.iter().zip(r).enumerate() {
                diff_level(lv, rv, options, &format!("{path}[{i}]"), depth + 1, out)?;
            }
        }
        _ => {
            if left != right {
                out.push(Difference { path: path.to_string(), left: left.clone(), right: right.clone() });
            }
        }
    }

    Ok(())
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}
