//! Output parsers that post-process model text.
//!
//! ```rust
//! use tchain::{OutputParser, StripReasoningParser};
//!
//! let parsed = StripReasoningParser
//!     .parse("<think>\nchickens are birds\n</think>\n\nWhy did the chicken...")
//!     .expect("text remains");
//! assert_eq!(parsed, "Why did the chicken...");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tcommon::{BoxFuture, CallContext};

use crate::{ChainError, Runnable};

static REASONING_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<think>.*?</think>").expect("reasoning pattern is a valid regex")
});

pub trait OutputParser: Send + Sync {
    fn name(&self) -> &str;

    fn parse(&self, text: &str) -> Result<String, ChainError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrimParser;

impl OutputParser for TrimParser {
    fn name(&self) -> &str {
        "trim"
    }

    fn parse(&self, text: &str) -> Result<String, ChainError> {
        Ok(text.trim().to_string())
    }
}

/// Drops `<think>...</think>` blocks emitted by reasoning models.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripReasoningParser;

impl OutputParser for StripReasoningParser {
    fn name(&self) -> &str {
        "strip_reasoning"
    }

    fn parse(&self, text: &str) -> Result<String, ChainError> {
        let stripped = REASONING_BLOCK.replace_all(text, "");
        let stripped = stripped.trim();
        if stripped.is_empty() {
            return Err(ChainError::parse("answer contains only reasoning"));
        }
        Ok(stripped.to_string())
    }
}

/// Extracts one field of a JSON object answer. Fenced code blocks are
/// unwrapped first.
#[derive(Debug, Clone)]
pub struct JsonFieldParser {
    field: String,
    stage_name: String,
}

impl JsonFieldParser {
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            stage_name: format!("json_field:{field}"),
            field,
        }
    }
}

impl OutputParser for JsonFieldParser {
    fn name(&self) -> &str {
        &self.stage_name
    }

    fn parse(&self, text: &str) -> Result<String, ChainError> {
        let body = unfence(text.trim());
        let parsed = serde_json::from_str::<Value>(body)
            .map_err(|err| ChainError::parse(format!("answer is not valid JSON: {err}")))?;

        match parsed.get(&self.field) {
            Some(Value::String(text)) => Ok(text.clone()),
            Some(other) => Ok(other.to_string()),
            None => Err(ChainError::parse(format!(
                "answer has no field '{}'",
                self.field
            ))),
        }
    }
}

fn unfence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Adapts an [`OutputParser`] into a chain stage.
#[derive(Debug, Clone)]
pub struct ParserStage<P> {
    parser: P,
}

impl<P> ParserStage<P>
where
    P: OutputParser,
{
    pub fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<P> Runnable for ParserStage<P>
where
    P: OutputParser,
{
    fn name(&self) -> &str {
        self.parser.name()
    }

    fn invoke<'a>(
        &'a self,
        _ctx: &'a CallContext,
        input: String,
    ) -> BoxFuture<'a, Result<String, ChainError>> {
        let output = self.parser.parse(&input);
        Box::pin(async move { output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChainErrorKind;

    #[test]
    fn trim_parser_trims() {
        assert_eq!(TrimParser.parse("  hi \n").expect("trim"), "hi");
    }

    #[test]
    fn reasoning_only_answer_is_a_parse_error() {
        let error = StripReasoningParser
            .parse("<think>hmm</think>  ")
            .expect_err("nothing left");
        assert_eq!(error.kind, ChainErrorKind::Parse);
    }

    #[test]
    fn json_field_parser_unwraps_fences() {
        let parser = JsonFieldParser::new("answer");
        let fenced = "```json\n{\"answer\": \"42\", \"score\": 0.9}\n```";
        assert_eq!(parser.parse(fenced).expect("field"), "42");
        assert_eq!(
            JsonFieldParser::new("score").parse(fenced).expect("field"),
            "0.9"
        );

        let missing = parser.parse("{\"other\":1}").expect_err("missing field");
        assert_eq!(missing.kind, ChainErrorKind::Parse);

        let invalid = parser.parse("not json").expect_err("invalid json");
        assert_eq!(invalid.kind, ChainErrorKind::Parse);
    }
}
