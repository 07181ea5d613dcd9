//! Human-readable rendering of structured values.
//!
//! Renders the fields of a [`serde_json::Value`] object for logs and
//! status displays. Field treatment is driven by name: fields can be
//! hidden, redacted, relabelled, or given a display unit. [`FormattedItem`]
//! covers the hand-assembled case where single values are composed into
//! one status line with optional verbose-only parts.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Bullet prefixed to each rendered member.
pub const BULLET: char = '\u{2023}';

/// Placeholder shown for redacted values.
pub const REDACTED: &str = "**********";

/// Shown for empty collections.
pub const NONE_MARKER: &str = "(none)";

/// Options controlling [`members_string`] and [`headers`].
#[derive(Debug, Clone, Default)]
pub struct InspectOptions {
    /// Fields omitted from the output entirely.
    pub hide: HashSet<String>,
    /// Fields whose value is replaced with [`REDACTED`].
    pub redact: HashSet<String>,
    /// Labels shown instead of the raw field name.
    pub display_names: HashMap<String, String>,
    /// Units appended after the value, separated by a space.
    pub units: HashMap<String, String>,
}

impl InspectOptions {
    #[must_use]
    pub fn hide(mut self, field: impl Into<String>) -> Self {
        self.hide.insert(field.into());
        self
    }

    #[must_use]
    pub fn redact(mut self, field: impl Into<String>) -> Self {
        self.redact.insert(field.into());
        self
    }

    #[must_use]
    pub fn display_name(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.display_names.insert(field.into(), label.into());
        self
    }

    #[must_use]
    pub fn unit(mut self, field: impl Into<String>, unit: impl Into<String>) -> Self {
        self.units.insert(field.into(), unit.into());
        self
    }

    fn label<'a>(&'a self, field: &'a str) -> &'a str {
        self.display_names.get(field).map_or(field, String::as_str)
    }
}

/// Renders the members of an object, one `‣Label: value` line per field in
/// sorted order, under an optional title line. Lists render as a
/// bulleted `[ ‣el ‣el ]`, nested objects as `{ key: value }`, and empty
/// collections as `(none)`. Non-objects render as their bare value.
#[must_use]
pub fn members_string(title: &str, value: &Value, options: &InspectOptions) -> String {
    let mut lines = Vec::new();
    if !title.is_empty() {
        lines.push(title.to_string());
    }

    match value {
        Value::Object(map) => {
            for (name, v) in map {
                if options.hide.contains(name.as_str()) {
                    continue;
                }
                let mut text = if options.redact.contains(name.as_str()) {
                    REDACTED.to_string()
                } else {
                    value_text(v)
                };
                if let Some(unit) = options.units.get(name) {
                    text.push(' ');
                    text.push_str(unit);
                }
                lines.push(format!(" {BULLET}{}: {text}", options.label(name)));
            }
        }
        other => lines.push(format!(" {BULLET}{}", value_text(other))),
    }

    lines.join("\n")
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.is_empty() => NONE_MARKER.to_string(),
        Value::Array(items) => {
            let inner: Vec<String> =
                items.iter().map(|v| format!("{BULLET}{}", value_text(v))).collect();
            format!("[ {} ]", inner.join(" "))
        }
        Value::Object(map) if map.is_empty() => NONE_MARKER.to_string(),
        Value::Object(map) => {
            let inner: Vec<String> =
                map.iter().map(|(k, v)| format!("{k}: {}", value_text(v))).collect();
            format!("{{ {} }}", inner.join(", "))
        }
        other => other.to_string(),
    }
}

/// Field name to display label for every non-hidden field, sorted by name.
#[must_use]
pub fn headers(value: &Value, options: &InspectOptions) -> BTreeMap<String, String> {
    let Value::Object(map) = value else {
        return BTreeMap::new();
    };

    map.keys()
        .filter(|name| !options.hide.contains(name.as_str()))
        .map(|name| (name.clone(), options.label(name).to_string()))
        .collect()
}

/// When a [`FormattedItem`] is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Render regardless of the verbose flag.
    #[default]
    Always,
    /// Render only when verbose output is requested.
    VerboseOnly,
    /// Render only in terse output.
    NotVerboseOnly,
}

/// A named value prepared for display.
///
/// Items with empty data are skipped, whatever their visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedItem {
    pub name: String,
    /// Label shown instead of `name` when non-empty.
    pub display_name: String,
    pub data: String,
    pub visibility: Visibility,
    /// Prefix the rendered data with the label.
    pub add_name: bool,
    /// Line breaks emitted after this item instead of the separator.
    pub line_breaks: usize,
}

impl FormattedItem {
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: String::new(),
            data: data.into(),
            visibility: Visibility::default(),
            add_name: true,
            line_breaks: 0,
        }
    }

    #[must_use]
    pub fn display_name(mut self, label: impl Into<String>) -> Self {
        self.display_name = label.into();
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Renders the bare data without the `Label: ` prefix.
    #[must_use]
    pub fn without_name(mut self) -> Self {
        self.add_name = false;
        self
    }

    /// Emits `count` line breaks after this item instead of the separator.
    #[must_use]
    pub fn with_line_breaks(mut self, count: usize) -> Self {
        self.line_breaks = count;
        self
    }

    /// The rendered form, or `None` when the verbose filter or empty data
    /// suppresses it.
    #[must_use]
    pub fn render(&self, verbose: bool) -> Option<String> {
        match self.visibility {
            Visibility::VerboseOnly if !verbose => return None,
            Visibility::NotVerboseOnly if verbose => return None,
            _ => {}
        }
        if self.data.is_empty() {
            return None;
        }
        if !self.add_name {
            return Some(self.data.clone());
        }
        let label = if self.display_name.is_empty() { &self.name } else { &self.display_name };
        Some(format!("{label}: {}", self.data))
    }
}

/// Joins the visible items with `" | "`, honoring verbose filtering.
/// An item carrying line breaks emits them in place of the separator.
#[must_use]
pub fn render_items(items: &[FormattedItem], verbose: bool) -> String {
    let mut out = String::new();
    let mut pending_separator: Option<String> = None;

    for item in items {
        let Some(text) = item.render(verbose) else {
            continue;
        };
        if let Some(sep) = pending_separator.take() {
            out.push_str(&sep);
        }
        out.push_str(&text);
        pending_separator = Some(if item.line_breaks > 0 {
            "\n".repeat(item.line_breaks)
        } else {
            " | ".to_string()
        });
    }

    out
}
