//! The request pipeline: decode input, resolve references, compute, publish.

use crate::config::Config;
use crate::error::Error;
use crate::models::{Document, Input, RunFunctionRequest, RunFunctionResponse};
use crate::resolver::{resolve_inputs, LookupContext};
use crate::subnet::compute_subnet;
use anyhow::Context;
use colored::Colorize;

/// Computes a CIDR subnet per request and publishes it into the pipeline
/// context under the input's name.
#[derive(Debug, Clone, Default)]
pub struct Function {
    config: Config,
}

impl Function {
    pub fn new(config: Config) -> Self {
        Function { config }
    }

    /// Run the function. Failures are reported as a single fatal result on
    /// the response, never as partial output.
    pub fn run_function(&self, req: &RunFunctionRequest) -> RunFunctionResponse {
        log::info!("Running function tag={tag}", tag = req.meta.tag);
        let mut rsp = RunFunctionResponse::to(req, self.config.ttl);

        match compute(req) {
            Ok((name, cidr)) => {
                log::info!("{name} = {cidr}", cidr = cidr.green());
                rsp.set_context_key(&name, Document::from(cidr));
            }
            Err(e) => {
                log::warn!("{failed} {e:#}", failed = "failed".on_red());
                rsp.fatal(format!("{e:#}"));
            }
        }
        rsp
    }
}

fn compute(req: &RunFunctionRequest) -> anyhow::Result<(String, String)> {
    let input = get_input(req).context("cannot get Function input")?;

    let empty = Document::mapping();
    let context = req.context.as_ref().unwrap_or(&empty);
    let ctx = LookupContext::new(&req.observed, &req.desired, context);
    let resolved = resolve_inputs(&ctx, &input).context("cannot resolve inputs")?;

    let cidr = compute_subnet(&resolved.prefix, resolved.newbits, resolved.netnum)
        .context("cannot compute subnet")?;
    Ok((input.name().to_string(), cidr))
}

/// Decode the request's raw input, reporting the JSON path of a bad field.
pub fn get_input(req: &RunFunctionRequest) -> Result<Input, Error> {
    let value = req.input.clone().ok_or_else(|| Error::InvalidInput {
        path: ".".to_string(),
        reason: "missing input".to_string(),
    })?;
    serde_path_to_error::deserialize(value).map_err(|e| Error::InvalidInput {
        path: e.path().to_string(),
        reason: e.inner().to_string(),
    })
}

/// Parse a JSON request.
pub fn parse_request(json: &str) -> Result<RunFunctionRequest, Error> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| Error::InvalidInput {
        path: e.path().to_string(),
        reason: e.inner().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use serde_json::json;

    fn request(input: serde_json::Value) -> RunFunctionRequest {
        RunFunctionRequest {
            input: Some(input),
            ..Default::default()
        }
    }

    #[test]
    fn test_get_input_reports_path() {
        let req = request(json!({
            "metadata": {"name": "input"},
            "prefix": "10.10.0.0/24",
            "newbits": [4],
            "netnum": 1
        }));
        match get_input(&req).unwrap_err() {
            Error::InvalidInput { path, .. } => assert_eq!(path, "newbits"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let rsp = Function::default().run_function(&RunFunctionRequest::default());
        assert!(rsp.is_fatal());
        assert_eq!(rsp.results.len(), 1);
        assert!(rsp.results[0]
            .message
            .starts_with("cannot get Function input: invalid input at .: missing input"));
        assert!(rsp.context.is_none());
    }

    #[test]
    fn test_run_function_publishes_subnet() {
        let req = request(json!({
            "metadata": {"name": "subnet-a"},
            "prefix": "10.10.0.0/24",
            "newbits": 4,
            "netnum": 15
        }));
        let rsp = Function::default().run_function(&req);
        assert!(rsp.results.is_empty(), "unexpected results {:?}", rsp.results);
        assert_eq!(
            rsp.context.and_then(|c| c.get_field("subnet-a").cloned()),
            Some(Document::from("10.10.0.240/28"))
        );
    }

    #[test]
    fn test_error_message_carries_stages() {
        let req = request(json!({
            "metadata": {"name": "input"},
            "prefix": "${bogus.path}",
            "newbits": 4,
            "netnum": 1
        }));
        let rsp = Function::default().run_function(&req);
        assert_eq!(rsp.results[0].severity, Severity::Fatal);
        assert_eq!(
            rsp.results[0].message,
            "cannot resolve inputs: cannot lookup subnet prefix: \
             bogus is not a supported lookup, expected one of [observed, desired, context]"
        );
    }

    #[test]
    fn test_parse_request_reports_path() {
        let err = parse_request(r#"{"observed": {"resources": {"vpc": {"resource": 1, "x": }}}}"#)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));

        let err = parse_request(r#"{"meta": {"tag": 7}}"#).unwrap_err();
        match err {
            Error::InvalidInput { path, .. } => assert_eq!(path, "meta.tag"),
            other => panic!("unexpected error {other}"),
        }
    }
}
