//! Reference resolution against the per-request lookup context.

use super::path::{render, walk, FieldPath, Segment};
use crate::error::Error;
use crate::models::{Document, IntOrString, State};
use colored::Colorize;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Regex matching a `${<path>}` reference expression.
static REFERENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_reference_regex() -> &'static Regex {
    REFERENCE_REGEX.get_or_init(|| Regex::new(r"^\$\{(.*)\}$").expect("Invalid Regex"))
}

/// The namespaces a reference can start with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Observed,
    Desired,
    Context,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [Namespace::Observed, Namespace::Desired, Namespace::Context];

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Observed => "observed",
            Namespace::Desired => "desired",
            Namespace::Context => "context",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::ALL
            .into_iter()
            .find(|ns| ns.as_str() == s)
            .ok_or_else(|| Error::UnsupportedNamespace {
                namespace: s.to_string(),
                expected: Namespace::ALL.iter().map(|ns| ns.to_string()).collect(),
            })
    }
}

/// Outcome of resolving a raw value.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// Not a reference expression; the input itself.
    Literal(&'a str),
    /// The value a reference points at.
    Found { path: String, value: &'a Document },
    /// The reference routed nowhere under `observed`/`desired`.
    Missing { path: String },
}

/// Read-only view of the documents references resolve against.
#[derive(Debug, Clone, Copy)]
pub struct LookupContext<'a> {
    observed: &'a State,
    desired: &'a State,
    context: &'a Document,
}

impl<'a> LookupContext<'a> {
    pub fn new(observed: &'a State, desired: &'a State, context: &'a Document) -> Self {
        LookupContext {
            observed,
            desired,
            context,
        }
    }

    /// Return `input` unchanged unless it is a `${...}` reference, in which
    /// case look the path up.
    pub fn resolve(&self, input: &'a str) -> Result<Resolved<'a>, Error> {
        match get_reference_regex().captures(input) {
            Some(caps) => {
                let path = caps.get(1).map_or("", |m| m.as_str());
                log::debug!("resolve reference {path}", path = path.cyan());
                self.lookup(path)
            }
            None => Ok(Resolved::Literal(input)),
        }
    }

    /// Resolve `input` to a string.
    pub fn resolve_string(&self, input: &'a str) -> Result<String, Error> {
        match self.resolve(input)? {
            Resolved::Literal(s) => Ok(s.to_string()),
            Resolved::Found { path, value } => match value.as_str() {
                Some(s) => Ok(s.to_string()),
                None => Err(Error::TypeMismatch {
                    path,
                    expected: "string",
                    found: value.type_name(),
                }),
            },
            Resolved::Missing { path } => {
                log::warn!("lookup {path} produced no value, using empty string");
                Ok(String::new())
            }
        }
    }

    /// Resolve an int-or-string field to an integer. Numeric string literals
    /// are accepted; resolved values must already be integers.
    pub fn resolve_int(&self, input: &'a IntOrString) -> Result<i64, Error> {
        let raw = match input {
            IntOrString::Int(i) => return Ok(*i),
            IntOrString::String(s) => s.as_str(),
        };
        match self.resolve(raw)? {
            Resolved::Literal(s) => s.parse().map_err(|_| Error::TypeMismatch {
                path: s.to_string(),
                expected: "integer",
                found: "string",
            }),
            Resolved::Found { path, value } => value.as_i64().ok_or(Error::TypeMismatch {
                path,
                expected: "integer",
                found: value.type_name(),
            }),
            Resolved::Missing { path } => {
                log::warn!("lookup {path} produced no value, using 0");
                Ok(0)
            }
        }
    }

    fn lookup(&self, path: &str) -> Result<Resolved<'a>, Error> {
        let field_path: FieldPath = path.parse()?;
        let segments = field_path.segments();
        let namespace: Namespace = segments[0].key().parse()?;

        let state = match namespace {
            Namespace::Context => return found(self.context, &segments[1..], path),
            Namespace::Observed => self.observed,
            Namespace::Desired => self.desired,
        };

        let not_found = || Error::FieldNotFound {
            path: path.to_string(),
        };
        let route = segments.get(1).ok_or_else(not_found)?;
        match route {
            Segment::Field(name) if name == "composite" => {
                let composite = state.composite.as_ref().ok_or_else(not_found)?;
                found(&composite.resource, &segments[2..], path)
            }
            Segment::Field(name) if name == "resources" => {
                let member = segments.get(2).ok_or_else(not_found)?.key();
                let resource = state.resources.get(&member).ok_or_else(not_found)?;
                found(&resource.resource, &segments[3..], path)
            }
            _ => {
                log::debug!(
                    "{namespace}.{route} is neither composite nor resources",
                    route = render(std::slice::from_ref(route))
                );
                Ok(Resolved::Missing {
                    path: path.to_string(),
                })
            }
        }
    }
}

fn found<'a>(doc: &'a Document, segments: &[Segment], path: &str) -> Result<Resolved<'a>, Error> {
    match walk(doc, segments) {
        Some(value) => {
            log::trace!("{path} => {value}");
            Ok(Resolved::Found {
                path: path.to_string(),
                value,
            })
        }
        None => Err(Error::FieldNotFound {
            path: path.to_string(),
        }),
    }
}
