use super::LookupContext;
use crate::models::Input;
use anyhow::{Context, Result};

/// Literal values for the calculator, after every reference is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub prefix: String,
    pub newbits: i64,
    pub netnum: i64,
}

/// Resolve prefix, newbits and netnum of `input` against `ctx`.
pub fn resolve_inputs(ctx: &LookupContext<'_>, input: &Input) -> Result<ResolvedInput> {
    let prefix = ctx
        .resolve_string(&input.prefix)
        .context("cannot lookup subnet prefix")?;
    let newbits = ctx
        .resolve_int(&input.newbits)
        .context("cannot lookup subnet newbits")?;
    let netnum = ctx
        .resolve_int(&input.netnum)
        .context("cannot lookup subnet netnum")?;

    log::debug!("resolved inputs prefix={prefix} newbits={newbits} netnum={netnum}");
    Ok(ResolvedInput {
        prefix,
        newbits,
        netnum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{Document, IntOrString, State};

    #[test]
    fn test_resolve_inputs_mixed() {
        let observed: State = serde_json::from_str(
            r#"{"resources": {"vpc": {"resource": {
                "status": {"atProvider": {"cidrBlock": "10.10.0.0/24"}}
            }}}}"#,
        )
        .expect("Error parsing observed state");
        let desired = State::default();
        let context: Document =
            serde_json::from_str(r#"{"subnet_size": 4}"#).expect("Error parsing context");
        let ctx = LookupContext::new(&observed, &desired, &context);

        let input = Input {
            prefix: "${observed.resources[vpc].status.atProvider.cidrBlock}".to_string(),
            newbits: IntOrString::from("${context.subnet_size}"),
            netnum: IntOrString::Int(15),
            ..Default::default()
        };
        let resolved = resolve_inputs(&ctx, &input).expect("Error resolving inputs");
        assert_eq!(
            resolved,
            ResolvedInput {
                prefix: "10.10.0.0/24".to_string(),
                newbits: 4,
                netnum: 15,
            }
        );
    }

    #[test]
    fn test_resolve_inputs_names_failing_field() {
        let state = State::default();
        let context = Document::mapping();
        let ctx = LookupContext::new(&state, &state, &context);

        let input = Input {
            prefix: "10.0.0.0/8".to_string(),
            newbits: IntOrString::Int(8),
            netnum: IntOrString::from("${context.missing}"),
            ..Default::default()
        };
        let err = resolve_inputs(&ctx, &input).unwrap_err();
        assert_eq!(err.to_string(), "cannot lookup subnet netnum");
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::FieldNotFound { .. })
        ));
    }
}
