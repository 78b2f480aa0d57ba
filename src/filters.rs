//! Sanitizing filter pipeline
//!
//! A filter is any component exposing `name()` and `apply()`; a pipeline
//! applies a registered, ordered list of them. Filters recurse into JSON
//! objects and arrays, transform string leaves, and leave every other
//! scalar untouched, so arbitrarily nested request/response shapes pass
//! through structurally intact.

use serde_json::Value;

/// A single sanitizing transformation over structured values.
pub trait Filter: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, value: Value) -> Value;
}

/// Apply a string transformation to every string leaf, recursing through
/// objects and arrays.
fn map_strings<F: Fn(&str) -> String>(value: Value, transform: &F) -> Value {
    match value {
        Value::String(s) => Value::String(transform(&s)),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| (key, map_strings(val, transform)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| map_strings(item, transform))
                .collect(),
        ),
        other => other,
    }
}

/// Doubles single quotes and escapes backslashes in string leaves.
pub struct SqlQuoteFilter;

impl Filter for SqlQuoteFilter {
    fn name(&self) -> &'static str {
        "SQLi"
    }

    fn apply(&self, value: Value) -> Value {
        map_strings(value, &|s| s.replace('\'', "''").replace('\\', "\\\\"))
    }
}

/// HTML-escapes string leaves. `&` first so later entities survive.
pub struct HtmlEscapeFilter;

impl Filter for HtmlEscapeFilter {
    fn name(&self) -> &'static str {
        "XSS"
    }

    fn apply(&self, value: Value) -> Value {
        map_strings(value, &|s| {
            s.replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;")
                .replace('"', "&quot;")
                .replace('\'', "&#x27;")
        })
    }
}

/// Strips shell metacharacters from string leaves.
pub struct ShellStripFilter;

impl Filter for ShellStripFilter {
    fn name(&self) -> &'static str {
        "CommandInjection"
    }

    fn apply(&self, value: Value) -> Value {
        map_strings(value, &|s| {
            s.chars()
                .filter(|c| !matches!(c, ';' | '|' | '&' | '$' | '`' | '\n' | '\r'))
                .collect()
        })
    }
}

/// An ordered list of filters applied in registration order.
#[derive(Default)]
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard pipeline: SQL quoting, HTML escaping, shell stripping.
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        pipeline.register(Box::new(SqlQuoteFilter));
        pipeline.register(Box::new(HtmlEscapeFilter));
        pipeline.register(Box::new(ShellStripFilter));
        pipeline
    }

    pub fn register(&mut self, filter: Box<dyn Filter>) {
        self.filters.push(filter);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn apply_all(&self, value: Value) -> Value {
        self.filters
            .iter()
            .fold(value, |acc, filter| filter.apply(acc))
    }
}
