//! Grammar notation for syntax trees.
//!
//! A syntax tree can be written down as compact text and built back from it:
//!
//! ```text
//! syntax   := "" | "string" | "number" | "boolean"
//!           | "[" syntax ["|" separator] "]"        array
//!           | "(" syntax ":" default ")"            optional, default is JSON
//!           | "{" field ("," field)* ["|" separator] "}"
//! field    := name [":" syntax]                     type defaults to string
//! ```
//!
//! Whitespace around keywords and fields is ignored; separators are taken
//! verbatim, whitespace included.
//!
//! ```rust
//! use flatsyntax::{value, Grammar};
//!
//! let grammar = Grammar::new();
//! let syntax = grammar
//!     .parse("{name, followers: (number: 0), repos: [string|;]}")
//!     .unwrap();
//!
//! assert_eq!(
//!     syntax.parse("Foo:flat;grid").unwrap(),
//!     value!({ "name": "Foo", "followers": 0, "repos": ["flat", "grid"] })
//! );
//! assert_eq!(
//!     grammar.dump(&syntax).unwrap(),
//!     r#"{"name:string,followers:"(number:0)",repos:[string|;]"|:}"#
//! );
//! ```
//!
//! `Constant` and `Choice` syntaxes have no grammar form.

use crate::error::{Error, ErrorCode, Result};
use crate::options::GrammarOptions;
use crate::text::{self, char_len, Token, SURROUNDERS, WRAPPERS};
use crate::{Syntax, Value};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

const PIPE: &str = "|";

/// Parses grammar text into a [`Syntax`] and dumps a [`Syntax`] back.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    options: GrammarOptions,
}

impl Grammar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: GrammarOptions) -> Self {
        Grammar { options }
    }

    #[must_use]
    pub fn options(&self) -> &GrammarOptions {
        &self.options
    }

    /// Builds the syntax described by `text`.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::InvalidSyntax`] parse error pointing at the
    /// offending character.
    pub fn parse(&self, text: &str) -> Result<Syntax> {
        trace!(input = text, "parsing grammar");
        let trimmed = text.trim();
        let lead = char_len(text) - char_len(text.trim_start());

        match trimmed {
            "" | "string" => return Ok(Syntax::String),
            "number" => return Ok(Syntax::Number),
            "boolean" => return Ok(Syntax::Boolean),
            _ => {}
        }

        let mut chars = trimmed.chars();
        let enclosed = match (chars.next(), chars.next_back()) {
            (Some(open @ ('[' | '(' | '{')), Some(close)) => Some((open, close)),
            _ => None,
        };
        let result = match enclosed {
            Some(('[', ']')) => self.parse_body(text, lead, "array", trimmed, Self::parse_array),
            Some(('(', ')')) => {
                self.parse_body(text, lead, "optional", trimmed, Self::parse_optional)
            }
            Some(('{', '}')) => self.parse_body(text, lead, "object", trimmed, Self::parse_object),
            _ => Err(self.invalid(
                text,
                lead,
                format!("Unable to parse '{}' as syntax", trimmed),
            )),
        };
        if let Err(err) = &result {
            debug!(error = %err, "grammar rejected");
        }
        result
    }

    /// Writes `syntax` as grammar text.
    ///
    /// # Errors
    ///
    /// Fails for `Constant` and `Choice` syntaxes, and for optional defaults
    /// that have no JSON form.
    pub fn dump(&self, syntax: &Syntax) -> Result<String> {
        match syntax {
            Syntax::String => Ok("string".to_string()),
            Syntax::Number => Ok("number".to_string()),
            Syntax::Boolean => Ok("boolean".to_string()),
            Syntax::Array(array) => {
                let parts = [self.dump(array.item())?, array.separator().to_string()];
                Ok(format!("[{}]", text::join(&parts, PIPE)))
            }
            Syntax::Optional(optional) => {
                let default = serde_json::to_string(optional.default_value()).map_err(|err| {
                    Error::dump(
                        self,
                        syntax,
                        ErrorCode::InvalidSyntax,
                        format!("Unable to encode the default value: {}", err),
                    )
                })?;
                Ok(format!("({}:{})", self.dump(optional.inner())?, default))
            }
            Syntax::Object(object) => {
                let entries = object
                    .fields()
                    .iter()
                    .map(|(name, field)| -> Result<String> {
                        if !is_plain_name(name) {
                            return Err(Error::dump(
                                self,
                                syntax,
                                ErrorCode::InvalidSyntax,
                                format!("Unable to write the field name '{}'", name),
                            ));
                        }
                        Ok(text::join(&[name.clone(), self.dump(field)?], ":"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                let parts = [text::join(&entries, ","), object.separator().to_string()];
                Ok(format!("{{{}}}", text::join(&parts, PIPE)))
            }
            Syntax::Constant(_) | Syntax::Choice(_) => Err(Error::dump(
                self,
                syntax,
                ErrorCode::InvalidSyntax,
                format!("Unable to dump '{}' as syntax", syntax),
            )),
        }
    }

    fn invalid(&self, input: &str, position: usize, message: impl Into<String>) -> Error {
        Error::parse(self, input, position, ErrorCode::InvalidSyntax, message)
    }

    /// Wraps a failure found at `offset` inside `input`.
    fn nested<'a>(
        &'a self,
        input: &'a str,
        offset: usize,
        message: String,
    ) -> impl FnOnce(Error) -> Error + 'a {
        move |cause| {
            let position = offset + cause.position().unwrap_or(0);
            self.invalid(input, position, message).with_cause(cause)
        }
    }

    /// Strips the enclosing pair off `trimmed` and parses what is inside.
    fn parse_body(
        &self,
        text: &str,
        lead: usize,
        kind: &str,
        trimmed: &str,
        parse: fn(&Self, &str) -> Result<Syntax>,
    ) -> Result<Syntax> {
        // the enclosing characters are ASCII
        let body = &trimmed[1..trimmed.len() - 1];
        parse(self, body).map_err(self.nested(
            text,
            lead + 1,
            format!("Invalid {} definition", kind),
        ))
    }

    fn parse_array(&self, body: &str) -> Result<Syntax> {
        let tokens = text::tokenize(body, PIPE, SURROUNDERS, WRAPPERS);
        if let Some(extra) = tokens.get(2) {
            return Err(self.invalid(
                body,
                extra.offset - 1,
                "An array takes an item syntax and a separator",
            ));
        }
        let item = self.parse_token(body, &tokens[0], "item")?;
        let separator = self.separator(&tokens, &self.options.array_separator);
        Ok(Syntax::array_with(item, separator))
    }

    fn parse_optional(&self, body: &str) -> Result<Syntax> {
        // defaults are raw JSON, quotes included
        let tokens = text::tokenize(body, ":", SURROUNDERS, "");
        let Some(default) = tokens.get(1) else {
            return Err(self.invalid(
                body,
                char_len(body),
                "An optional syntax needs a default value",
            ));
        };
        let inner = self.parse_token(body, &tokens[0], "inner")?;
        let raw = &body[default.span.start..];
        let value = self.decode_default(body, raw, default.offset)?;
        Ok(Syntax::optional(inner, value))
    }

    fn parse_object(&self, body: &str) -> Result<Syntax> {
        let tokens = text::tokenize(body, PIPE, SURROUNDERS, WRAPPERS);
        if let Some(extra) = tokens.get(2) {
            return Err(self.invalid(
                body,
                extra.offset - 1,
                "An object takes a list of fields and a separator",
            ));
        }
        let list = &tokens[0];
        if list.text.trim().is_empty() {
            return Err(self.invalid(body, list.offset, "An object needs at least one field"));
        }

        let mut fields: Vec<(String, Syntax)> = Vec::new();
        for token in text::tokenize(&list.text, ",", SURROUNDERS, WRAPPERS) {
            let offset = list.content_offset() + token.content_offset();
            let (name, field) = self.parse_field(&token.text).map_err(self.nested(
                body,
                offset,
                format!("Invalid field definition '{}'", token.text.trim()),
            ))?;
            if fields.iter().any(|(known, _)| *known == name) {
                return Err(self.invalid(body, offset, format!("Duplicate field '{}'", name)));
            }
            fields.push((name, field));
        }

        let separator = self.separator(&tokens, &self.options.object_separator);
        Syntax::object_with(fields, separator)
    }

    /// Parses `name` or `name: syntax`.
    fn parse_field(&self, text: &str) -> Result<(String, Syntax)> {
        let lead = char_len(text) - char_len(text.trim_start());
        let trimmed = text.trim();
        let parts = text::tokenize(trimmed, ":", SURROUNDERS, WRAPPERS);
        if let Some(extra) = parts.get(2) {
            return Err(self.invalid(
                text,
                lead + extra.offset - 1,
                "A field takes a name and a syntax",
            ));
        }

        let name = parts[0].text.trim();
        if name.is_empty() {
            return Err(self.invalid(text, lead, "A field needs a name"));
        }
        let field = match parts.get(1) {
            Some(part) => self.parse(&part.text).map_err(self.nested(
                text,
                lead + part.content_offset(),
                format!("Invalid syntax of field '{}'", name),
            ))?,
            None => Syntax::String,
        };
        Ok((name.to_string(), field))
    }

    fn parse_token(&self, body: &str, token: &Token, role: &str) -> Result<Syntax> {
        self.parse(&token.text).map_err(self.nested(
            body,
            token.content_offset(),
            format!("Invalid {} syntax '{}'", role, token.text.trim()),
        ))
    }

    /// The separator after the pipe, or `default` when there is none.
    fn separator<'a>(&self, tokens: &'a [Token], default: &'a str) -> &'a str {
        match tokens.get(1) {
            Some(token) if !token.text.is_empty() => &token.text,
            _ => default,
        }
    }

    fn decode_default(&self, body: &str, raw: &str, offset: usize) -> Result<Value> {
        let raw = raw.trim();
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Ok(value),
            Err(err) if err.is_data() => Err(self.invalid(
                body,
                offset,
                format!("Unsupported default value '{}': {}", raw, err),
            )),
            // not JSON at all: a bare string
            Err(_) => Ok(Value::String(raw.to_string())),
        }
    }
}

/// Field names are read trimmed, up to the first delimiter.
fn is_plain_name(name: &str) -> bool {
    name.trim() == name && !name.contains(|c| SURROUNDERS.contains(c) || ",:|".contains(c))
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Syntax")
    }
}

impl FromStr for Syntax {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Grammar::new().parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives() {
        let grammar = Grammar::new();
        assert_eq!(grammar.parse("").unwrap(), Syntax::String);
        assert_eq!(grammar.parse(" string ").unwrap(), Syntax::String);
        assert_eq!(grammar.parse("number").unwrap(), Syntax::Number);
        assert_eq!(grammar.parse("boolean").unwrap(), Syntax::Boolean);
    }

    #[test]
    fn test_unknown_keyword() {
        let err = Grammar::new().parse("  integer").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidSyntax));
        assert_eq!(err.position(), Some(2));
        assert_eq!(err.message(), "Unable to parse 'integer' as syntax");
    }

    #[test]
    fn test_nested_error_position() {
        // "numbr" starts at character 4
        let err = Grammar::new().parse("[{a:numbr}]").unwrap_err();
        assert_eq!(err.position(), Some(4));
        assert_eq!(err.root_cause().message(), "Unable to parse 'numbr' as syntax");
    }

    #[test]
    fn test_optional_needs_default() {
        let err = Grammar::new().parse("(number)").unwrap_err();
        assert_eq!(
            err.cause().map(Error::message),
            Some("An optional syntax needs a default value")
        );
    }

    #[test]
    fn test_null_default_is_rejected() {
        assert!(Grammar::new().parse("(number:null)").is_err());
    }

    #[test]
    fn test_default_keeps_colons() {
        let syntax = Grammar::new().parse("(string:a:b)").unwrap();
        assert_eq!(syntax.default_value(), Some(&Value::from("a:b")));
    }

    #[test]
    fn test_dump_constant_fails() {
        let err = Grammar::new().dump(&Syntax::constant("x")).unwrap_err();
        assert!(err.is_dump());
        assert_eq!(err.code(), Some(ErrorCode::InvalidSyntax));
    }

    #[test]
    fn test_dump_rejects_delimiters_in_field_names() {
        let grammar = Grammar::new();
        for name in ["n,m", "o|p", "a:b", "\"q\"", "[x]", " pad"] {
            let syntax = Syntax::object(vec![(name, Syntax::string())]).unwrap();
            let err = grammar.dump(&syntax).unwrap_err();
            assert!(err.is_dump(), "{}", name);
            assert_eq!(err.code(), Some(ErrorCode::InvalidSyntax));
        }

        let nested = Syntax::array(
            Syntax::object(vec![
                ("n,m", Syntax::string()),
                ("o|p", Syntax::optional(Syntax::string(), "q:r,s|t")),
            ])
            .unwrap(),
        );
        assert!(grammar.dump(&nested).is_err());

        let plain = Syntax::object(vec![("first-name", Syntax::string())]).unwrap();
        assert_eq!(grammar.parse(&grammar.dump(&plain).unwrap()).unwrap(), plain);
    }

    #[test]
    fn test_options_apply_to_missing_separators() {
        let grammar = Grammar::with_options(GrammarOptions::new().with_array_separator(";"));
        let Syntax::Array(array) = grammar.parse("[number]").unwrap() else {
            panic!("Expected array");
        };
        assert_eq!(array.separator(), ";");
    }
}
