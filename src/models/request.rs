//! Request and response shapes exchanged with the calling pipeline.

use super::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// A single resource, as seen by the pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Resource {
    #[serde(default)]
    pub resource: Document,
}

/// Observed or desired state: one composite resource plus named members.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct State {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<Resource>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, Resource>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RequestMeta {
    #[serde(default)]
    pub tag: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RunFunctionRequest {
    #[serde(default)]
    pub meta: RequestMeta,
    #[serde(default)]
    pub observed: State,
    #[serde(default)]
    pub desired: State,
    #[serde(default)]
    pub context: Option<Document>,
    /// Raw input, decoded into [`super::Input`] by the function.
    #[serde(default)]
    pub input: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Normal,
    Warning,
    Fatal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FunctionResult {
    pub severity: Severity,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ResponseMeta {
    #[serde(default)]
    pub tag: String,
    pub ttl_seconds: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RunFunctionResponse {
    pub meta: ResponseMeta,
    #[serde(default)]
    pub desired: State,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Document>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<FunctionResult>,
}

impl RunFunctionResponse {
    /// Build a response to `req`, carrying over its tag, desired state and
    /// pipeline context.
    pub fn to(req: &RunFunctionRequest, ttl: Duration) -> Self {
        RunFunctionResponse {
            meta: ResponseMeta {
                tag: req.meta.tag.clone(),
                ttl_seconds: ttl.as_secs(),
            },
            desired: req.desired.clone(),
            context: req.context.clone(),
            results: vec![],
        }
    }

    /// Publish `value` under `key` in the pipeline context.
    pub fn set_context_key(&mut self, key: &str, value: Document) {
        self.context
            .get_or_insert_with(Document::mapping)
            .set_field(key, value);
    }

    /// Record a terminal failure.
    pub fn fatal(&mut self, message: impl Into<String>) {
        self.results.push(FunctionResult {
            severity: Severity::Fatal,
            message: message.into(),
        });
    }

    pub fn is_fatal(&self) -> bool {
        self.results.iter().any(|r| r.severity == Severity::Fatal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_copies_request() {
        let req: RunFunctionRequest = serde_json::from_str(
            r#"{"meta": {"tag": "abc"}, "context": {"subnet_size": 4},
                "desired": {"resources": {"vpc": {"resource": {"kind": "VPC"}}}}}"#,
        )
        .expect("Error parsing request");

        let mut rsp = RunFunctionResponse::to(&req, Duration::from_secs(60));
        assert_eq!(rsp.meta.tag, "abc");
        assert_eq!(rsp.meta.ttl_seconds, 60);
        assert!(rsp.desired.resources.contains_key("vpc"));
        assert!(!rsp.is_fatal());

        rsp.set_context_key("input", Document::from("10.10.0.240/28"));
        let context = rsp.context.expect("Context should be set");
        assert_eq!(context.get_field("subnet_size"), Some(&Document::Integer(4)));
        assert_eq!(
            context.get_field("input"),
            Some(&Document::from("10.10.0.240/28"))
        );
    }

    #[test]
    fn test_fatal_result_serializes() {
        let req = RunFunctionRequest::default();
        let mut rsp = RunFunctionResponse::to(&req, Duration::from_secs(60));
        rsp.fatal("cannot resolve inputs");
        assert!(rsp.is_fatal());
        let json = serde_json::to_value(&rsp).expect("Error serializing response");
        assert_eq!(json["results"][0]["severity"], "FATAL");
        assert!(json.get("context").is_none());
    }
}
