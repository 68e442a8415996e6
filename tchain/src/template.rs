//! `{name}` placeholder templates.
//!
//! Substitution is a single left-to-right pass: substituted values are never
//! re-scanned, placeholders without a value stay verbatim, and unused
//! variables are ignored.
//!
//! ```rust
//! use tchain::PromptTemplate;
//!
//! let template = PromptTemplate::from_template("Tell me a {adjective} joke about {content}.");
//! assert_eq!(template.input_variables(), ["adjective", "content"]);
//!
//! let prompt = template.format([("adjective", "funny"), ("content", "chickens")]);
//! assert_eq!(prompt, "Tell me a funny joke about chickens.");
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::ChainError;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^{}]+)\}").expect("placeholder pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
    input_variables: Vec<String>,
}

impl PromptTemplate {
    /// Records every placeholder name once, in order of first appearance.
    pub fn from_template(template: impl Into<String>) -> Self {
        let template = template.into();
        let mut input_variables: Vec<String> = Vec::new();
        for captures in PLACEHOLDER.captures_iter(&template) {
            let name = &captures[1];
            if !input_variables.iter().any(|known| known == name) {
                input_variables.push(name.to_string());
            }
        }

        Self {
            template,
            input_variables,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    pub fn format<I, K, V>(&self, vars: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect::<HashMap<String, String>>();
        self.render(&vars)
    }

    /// Formats from a JSON object. String values are inserted as-is, `null`
    /// as an empty string, other values as their JSON text.
    pub fn format_json(&self, input: &str) -> Result<String, ChainError> {
        let parsed = serde_json::from_str::<Value>(input).map_err(|err| {
            ChainError::template_parse(format!("template input is not valid JSON: {err}"))
        })?;

        let Value::Object(object) = parsed else {
            return Err(ChainError::template_parse(
                "template input must be a JSON object",
            ));
        };

        let vars = object
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(text) => text,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect::<HashMap<_, _>>();
        Ok(self.render(&vars))
    }

    /// Declared variables that `vars` does not provide.
    pub fn missing_variables<'a, I>(&self, provided: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let provided = provided.into_iter().collect::<Vec<_>>();
        self.input_variables
            .iter()
            .filter(|name| !provided.contains(&name.as_str()))
            .cloned()
            .collect()
    }

    fn render(&self, vars: &HashMap<String, String>) -> String {
        PLACEHOLDER
            .replace_all(&self.template, |captures: &Captures<'_>| {
                match vars.get(&captures[1]) {
                    Some(value) => value.clone(),
                    None => captures[0].to_string(),
                }
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChainErrorKind;

    #[test]
    fn joke_template_round_trip() {
        let template = PromptTemplate::from_template("Tell me a {adjective} joke about {content}.");
        let vars = HashMap::from([
            ("adjective".to_string(), "funny".to_string()),
            ("content".to_string(), "chickens".to_string()),
        ]);
        assert_eq!(template.format(&vars), "Tell me a funny joke about chickens.");
    }

    #[test]
    fn format_is_deterministic_and_idempotent() {
        let template = PromptTemplate::from_template("{a}-{b}-{a}");
        let vars = [("a", "x"), ("b", "y")];

        let once = template.format(vars);
        assert_eq!(once, "x-y-x");
        assert_eq!(template.format(vars), once);

        let again = PromptTemplate::from_template(once.clone()).format(vars);
        assert_eq!(again, once);
    }

    #[test]
    fn unmatched_placeholders_stay_and_unused_keys_are_ignored() {
        let template = PromptTemplate::from_template("Hello {name}, today is {day}.");
        let output = template.format([("name", "Ada"), ("unused", "zzz")]);
        assert_eq!(output, "Hello Ada, today is {day}.");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let template = PromptTemplate::from_template("{first} {second}");
        let output = template.format([("first", "{second}"), ("second", "two")]);
        assert_eq!(output, "{second} two");
    }

    #[test]
    fn variables_are_deduplicated_in_first_seen_order() {
        let template = PromptTemplate::from_template("{b} {a} {b} {c} {a}");
        assert_eq!(template.input_variables(), ["b", "a", "c"]);
        assert!(PromptTemplate::from_template("Tell me a joke").input_variables().is_empty());
    }

    #[test]
    fn format_json_renders_scalars_and_rejects_bad_input() {
        let template = PromptTemplate::from_template("{who} is {age} ({admin})");
        let output = template
            .format_json(r#"{"who":"Ada","age":36,"admin":true}"#)
            .expect("valid input");
        assert_eq!(output, "Ada is 36 (true)");

        let error = template.format_json("{not json").expect_err("bad json");
        assert_eq!(error.kind, ChainErrorKind::TemplateParse);

        let error = template.format_json("[1,2]").expect_err("not an object");
        assert_eq!(error.kind, ChainErrorKind::TemplateParse);
    }

    #[test]
    fn format_json_substitutes_null_as_empty() {
        let template = PromptTemplate::from_template("[{note}] {who}");
        let output = template
            .format_json(r#"{"note":null,"who":"Ada"}"#)
            .expect("valid input");
        assert_eq!(output, "[] Ada");
    }

    #[test]
    fn missing_variables_lists_undeclared_inputs() {
        let template = PromptTemplate::from_template("{a} {b} {c}");
        assert_eq!(template.missing_variables(["b"]), vec!["a", "c"]);
        assert!(template.missing_variables(["a", "b", "c"]).is_empty());
    }
}
