//! JSON argument parsing helpers for function and typed tools.
//!
//! ```rust
//! use serde::Deserialize;
//! use ttooling::{parse_json_object, parse_typed, required_string};
//!
//! #[derive(Deserialize)]
//! struct Search {
//!     query: String,
//! }
//!
//! let args = parse_json_object(r#"{"query":"rust"}"#).expect("object should parse");
//! assert_eq!(required_string(&args, "query").expect("query"), "rust");
//!
//! let typed: Search = parse_typed(r#"{"query":"rust"}"#).expect("typed args");
//! assert_eq!(typed.query, "rust");
//! ```

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::ToolError;

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))
}

pub fn parse_json_object(args_json: &str) -> Result<Map<String, Value>, ToolError> {
    match parse_json_value(args_json)? {
        Value::Object(object) => Ok(object),
        _ => Err(ToolError::invalid_arguments("expected JSON object arguments")),
    }
}

pub fn required_string(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required string: '{key}'")))
}

/// Deserializes the argument object into `I`; missing or ill-typed fields
/// are `InvalidArguments`.
pub fn parse_typed<I>(args_json: &str) -> Result<I, ToolError>
where
    I: DeserializeOwned,
{
    let object = parse_json_object(args_json)?;
    serde_json::from_value(Value::Object(object))
        .map_err(|err| ToolError::invalid_arguments(format!("arguments do not match: {err}")))
}
