//! Dotted/bracketed field paths.
//!
//! `observed.resources[vpc].status.addresses[0]` parses into
//! `observed`, `resources`, `vpc`, `status`, `addresses`, `0`. Bracket
//! contents that are all digits become an index, anything else a field name,
//! which is how keys containing dots are addressed (`labels[app.kubernetes.io/name]`).

use crate::error::Error;
use crate::models::Document;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Index(usize),
}

impl Segment {
    fn from_bracket(inner: &str) -> Segment {
        if inner.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = inner.parse() {
                return Segment::Index(index);
            }
        }
        Segment::Field(inner.to_string())
    }

    /// The segment as a key, for routing on names like `composite` or a
    /// resource member `[0]`.
    pub fn key(&self) -> String {
        match self {
            Segment::Field(name) => name.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }
}

/// A parsed field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl FromStr for FieldPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Error::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };
        if path.is_empty() {
            return Err(invalid("empty path"));
        }

        let mut segments = Vec::new();
        let mut rest = path;
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                let end = after.find(']').ok_or_else(|| invalid("unterminated '['"))?;
                let inner = &after[..end];
                if inner.is_empty() {
                    return Err(invalid("empty brackets"));
                }
                if inner.contains('[') {
                    return Err(invalid("nested '['"));
                }
                segments.push(Segment::from_bracket(inner));
                rest = &after[end + 1..];
                if !rest.is_empty() && !rest.starts_with(['.', '[']) {
                    return Err(invalid("unexpected character after ']'"));
                }
            } else {
                let end = rest.find(['.', '[']).unwrap_or(rest.len());
                let name = &rest[..end];
                if name.is_empty() {
                    return Err(invalid("empty field name"));
                }
                if name.contains(']') {
                    return Err(invalid("unexpected ']'"));
                }
                segments.push(Segment::Field(name.to_string()));
                rest = &rest[end..];
            }

            if let Some(after) = rest.strip_prefix('.') {
                // A dot must be followed by a plain field name.
                if after.is_empty() || after.starts_with(['.', '[']) {
                    return Err(invalid("empty field name"));
                }
                rest = after;
            }
        }

        Ok(FieldPath { segments })
    }
}

/// Render segments back into path syntax.
pub fn render(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Index(index) => out.push_str(&format!("[{index}]")),
            Segment::Field(name) if name.contains(['.', '[', ']']) => {
                out.push_str(&format!("[{name}]"))
            }
            Segment::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
        }
    }
    out
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", render(&self.segments))
    }
}

/// Walk `segments` into `doc`. Fields only match mappings and indexes only
/// match sequences; anything else is a miss.
pub fn walk<'a>(doc: &'a Document, segments: &[Segment]) -> Option<&'a Document> {
    let mut current = doc;
    for segment in segments {
        let next = match segment {
            Segment::Field(name) => current.get_field(name),
            Segment::Index(index) => current.get_index(*index),
        };
        current = match next {
            Some(value) => value,
            None => {
                log::trace!(
                    "walk: {segment:?} not found in {kind}",
                    kind = current.type_name()
                );
                return None;
            }
        };
    }
    Some(current)
}
