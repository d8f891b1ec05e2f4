//! URI template matching.
//!
//! # Responsibilities
//! - Match a concrete path against a template with `{name}` segments
//! - Bind each placeholder to the raw path segment it matched
//!
//! # Design Decisions
//! - Segment counts must be equal; a literal prefix is not a match
//! - One trailing slash on either side is ignored, repeated slashes are not collapsed
//! - Captured segments are returned verbatim (no percent decoding)
//! - `None` means no match; `Some(empty)` is a match without placeholders

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) if !name.is_empty() => Segment::Placeholder(name.to_string()),
            _ => Segment::Literal(raw.to_string()),
        }
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    let path = path.strip_suffix('/').unwrap_or(path);
    path.split('/').collect()
}

/// A pre-split URI template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriPattern {
    template: String,
    segments: Vec<Segment>,
}

impl UriPattern {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let segments = split_segments(&template)
            .into_iter()
            .map(Segment::parse)
            .collect();
        Self { template, segments }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names in declaration order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match `path`, returning the placeholder bindings.
    pub fn matches(&self, path: &str) -> Option<IndexMap<String, String>> {
        let actual = split_segments(path);
        if actual.len() != self.segments.len() {
            return None;
        }
        let mut bindings = IndexMap::new();
        for (expected, actual) in self.segments.iter().zip(actual) {
            match expected {
                Segment::Literal(literal) if literal == actual => {}
                Segment::Placeholder(name) if !actual.is_empty() => {
                    bindings.insert(name.clone(), actual.to_string());
                }
                _ => return None,
            }
        }
        Some(bindings)
    }
}

/// Match `path` against `template` in one call.
pub fn parse_uri_pattern(template: &str, path: &str) -> Option<IndexMap<String, String>> {
    UriPattern::new(template).matches(path)
}
