//! Function input: the named extension spec.

use serde::{Deserialize, Serialize};

/// A field that accepts either a number or a string, as in
/// `newbits: 4` or `newbits: "${context.subnet_size}"`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i64),
    String(String),
}

impl Default for IntOrString {
    fn default() -> Self {
        IntOrString::Int(0)
    }
}

impl From<i64> for IntOrString {
    fn from(i: i64) -> Self {
        IntOrString::Int(i)
    }
}

impl From<&str> for IntOrString {
    fn from(s: &str) -> Self {
        IntOrString::String(s.to_string())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
}

/// The extension spec: carve subnet `netnum` of size `/prefix+newbits` out of
/// `prefix`. Each field may be a literal or a `${...}` reference.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub prefix: String,
    #[serde(default)]
    pub newbits: IntOrString,
    #[serde(default)]
    pub netnum: IntOrString,
}

impl Input {
    /// Key the computed CIDR is published under in the pipeline context.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_input_mixed_fields() {
        let input: Input = serde_json::from_str(
            r#"{
                "apiVersion": "cidrsubnet.fn.crossplane.io/v1beta1",
                "kind": "Input",
                "metadata": {"name": "subnet-a"},
                "prefix": "${observed.resources[vpc].status.atProvider.cidrBlock}",
                "newbits": "${context.subnet_size}",
                "netnum": 15
            }"#,
        )
        .expect("Error parsing input");
        assert_eq!(input.name(), "subnet-a");
        assert_eq!(input.newbits, IntOrString::from("${context.subnet_size}"));
        assert_eq!(input.netnum, IntOrString::Int(15));
    }

    #[test]
    fn test_decode_input_defaults_missing_numbers() {
        let input: Input =
            serde_json::from_str(r#"{"prefix": "10.0.0.0/8"}"#).expect("Error parsing input");
        assert_eq!(input.newbits, IntOrString::Int(0));
        assert_eq!(input.netnum, IntOrString::Int(0));
    }

    #[test]
    fn test_decode_input_requires_prefix() {
        let result: Result<Input, _> = serde_json::from_str(r#"{"newbits": 4, "netnum": 1}"#);
        assert!(result.is_err(), "prefix is required");
    }
}
