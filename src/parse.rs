//! Text to value.
//!
//! [`Syntax::parse`] is the entry point. Composite syntaxes tokenize their
//! input with [`crate::text::tokenize`] and delegate every token to a child;
//! a child failure is wrapped into the parent's error with the token offset
//! added, so the outermost position is relative to the outermost input.
//!
//! Parsing an object relies on [`Outcome::matched`]: an optional field whose
//! inner syntax rejected the current item yields its default without
//! consuming the item, and the next field gets a chance at it.

use crate::error::{Error, ErrorCode, Extra, Result};
use crate::syntax::{ArraySyntax, ChoiceSyntax, ConstantSyntax, ObjectSyntax, OptionalSyntax};
use crate::text::{self, char_len, Token, SURROUNDERS, WRAPPERS};
use crate::{Syntax, Value, ValueMap};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid numeric pattern")
});

const TRUTHY: [&str; 3] = ["true", "yes", "y"];
const FALSY: [&str; 3] = ["false", "no", "n"];

/// The result of one parse call.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// The parsed value, or the default of an optional syntax.
    pub value: Value,
    /// False when an optional syntax substituted its default.
    pub matched: bool,
    /// The option selected by a choice syntax.
    pub option: Option<String>,
}

impl Outcome {
    fn matched(value: Value) -> Self {
        Outcome {
            value,
            matched: true,
            option: None,
        }
    }
}

impl Syntax {
    /// Parses `text` into a value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the text does not conform; the error
    /// position is a character offset into `text`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatsyntax::{Syntax, Value};
    ///
    /// let flags = Syntax::array_with(Syntax::boolean(), "|");
    /// assert_eq!(
    ///     flags.parse("yes|N|true").unwrap(),
    ///     Value::from(vec![Value::Bool(true), Value::Bool(false), Value::Bool(true)])
    /// );
    /// ```
    pub fn parse(&self, text: &str) -> Result<Value> {
        self.parse_outcome(text).map(|outcome| outcome.value)
    }

    /// Parses `text`, reporting whether an optional syntax fell back to its
    /// default and which option a choice selected.
    ///
    /// # Errors
    ///
    /// Same as [`Syntax::parse`].
    pub fn parse_outcome(&self, text: &str) -> Result<Outcome> {
        match self {
            Syntax::String => parse_string(self, text).map(Outcome::matched),
            Syntax::Number => parse_number(self, text).map(Outcome::matched),
            Syntax::Boolean => parse_boolean(self, text).map(Outcome::matched),
            Syntax::Constant(constant) => constant.parse(text).map(Outcome::matched),
            Syntax::Choice(choice) => choice.parse(text),
            Syntax::Array(array) => array.parse(text).map(Outcome::matched),
            Syntax::Object(object) => object.parse(text).map(Outcome::matched),
            Syntax::Optional(optional) => Ok(optional.parse(text)),
        }
    }

    /// Whether `text` parses, without keeping the value.
    #[must_use]
    pub fn accepts(&self, text: &str) -> bool {
        self.parse_outcome(text).is_ok()
    }
}

fn parse_string(syntax: &Syntax, text: &str) -> Result<Value> {
    if text.is_empty() {
        return Err(Error::parse(
            syntax,
            text,
            0,
            ErrorCode::EmptyInput,
            "String should not be empty",
        ));
    }
    Ok(Value::String(text.to_string()))
}

fn parse_number(syntax: &Syntax, text: &str) -> Result<Value> {
    let not_numeric = || Error::parse(syntax, text, 0, ErrorCode::NotNumeric, "Not a numeric value");
    if !NUMERIC.is_match(text) {
        return Err(not_numeric());
    }
    text.parse::<f64>()
        .map(Value::Number)
        .map_err(|_| not_numeric())
}

fn parse_boolean(syntax: &Syntax, text: &str) -> Result<Value> {
    let lowered = text.to_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Ok(Value::Bool(true))
    } else if FALSY.contains(&lowered.as_str()) {
        Ok(Value::Bool(false))
    } else {
        Err(Error::parse(
            syntax,
            text,
            0,
            ErrorCode::NotBoolean,
            r#"Boolean value should be one of "yes", "no", "y", "n", "true", "false""#,
        ))
    }
}

impl ConstantSyntax {
    fn parse(&self, text: &str) -> Result<Value> {
        if self.matches(text) {
            Ok(Value::String(self.value().to_string()))
        } else {
            Err(Error::parse(
                self,
                text,
                0,
                ErrorCode::NoMatch,
                format!("Expected '{}'", self.value()),
            ))
        }
    }
}

impl ChoiceSyntax {
    fn parse(&self, text: &str) -> Result<Outcome> {
        trace!(syntax = %self, input = text, "parsing choice");
        let mut accepted = self
            .options()
            .iter()
            .filter_map(|(name, option)| {
                option
                    .parse_outcome(text)
                    .ok()
                    .map(|outcome| (name, outcome.value))
            })
            .collect::<Vec<_>>();

        if accepted.len() == 1 {
            let (name, value) = accepted.remove(0);
            return Ok(Outcome {
                value,
                matched: true,
                option: Some(name.clone()),
            });
        }

        let err = if accepted.is_empty() {
            let all = self.describe(self.options().keys().map(String::as_str));
            Error::parse(
                self,
                text,
                0,
                ErrorCode::NoMatch,
                format!("Unable to parse '{}' as any of {}", text, all),
            )
        } else {
            let names = self.describe(accepted.iter().map(|(name, _)| name.as_str()));
            Error::parse(
                self,
                text,
                0,
                ErrorCode::AmbiguousMatch,
                format!(
                    "Unable to choose an option: '{}' can be parsed as many options: {}",
                    text, names
                ),
            )
        };
        debug!(error = %err, "choice rejected input");
        Err(err)
    }
}

impl ArraySyntax {
    fn parse(&self, text: &str) -> Result<Value> {
        trace!(syntax = %self, input = text, "parsing array");
        let tokens = text::tokenize(text, self.separator(), SURROUNDERS, WRAPPERS);
        let mut items = Vec::with_capacity(tokens.len());
        for token in &tokens {
            match self.item().parse(&token.text) {
                Ok(value) => items.push(value),
                Err(cause) => {
                    let inner = cause.position().unwrap_or(0);
                    let err = Error::parse(
                        self,
                        text,
                        token.content_offset() + inner,
                        ErrorCode::InvalidItem,
                        format!("Unable to parse the item '{}'", token.text),
                    )
                    .with_extra(Extra::InvalidItem {
                        item: token.text.clone(),
                        position: inner,
                    })
                    .with_cause(cause);
                    debug!(error = %err, "array item rejected");
                    return Err(err);
                }
            }
        }
        Ok(Value::Array(items))
    }
}

impl ObjectSyntax {
    fn parse(&self, text: &str) -> Result<Value> {
        trace!(syntax = %self, input = text, "parsing object");
        let items: Vec<Token> = if text.is_empty() {
            Vec::new()
        } else {
            text::tokenize(text, self.separator(), SURROUNDERS, WRAPPERS)
        };

        let mut record = ValueMap::with_capacity(self.fields().len());
        let mut cursor = 0;
        for (name, field) in self.fields() {
            let Some(item) = items.get(cursor) else {
                let value = self.parse_missing(text, &items, name, field)?;
                record.insert(name.clone(), value);
                continue;
            };
            match field.parse_outcome(&item.text) {
                Ok(outcome) => {
                    if outcome.matched {
                        cursor += 1;
                    } else {
                        trace!(field = %name, item = %item.text, "optional field left the item");
                    }
                    record.insert(name.clone(), outcome.value);
                }
                Err(cause) => {
                    let inner = cause.position().unwrap_or(0);
                    let err = Error::parse(
                        self,
                        text,
                        item.content_offset() + inner,
                        ErrorCode::InvalidField,
                        format!(
                            "Unable to parse the item '{}' for field '{}'",
                            item.text, name
                        ),
                    )
                    .with_extra(Extra::InvalidField {
                        field: name.clone(),
                        item: item.text.clone(),
                        position: inner,
                    })
                    .with_cause(cause);
                    debug!(error = %err, "object field rejected");
                    return Err(err);
                }
            }
        }

        if let Some(first) = items.get(cursor) {
            // just past the last consumed item
            let position = if cursor == 0 {
                0
            } else {
                first.offset - char_len(self.separator())
            };
            let err = Error::parse(
                self,
                text,
                position,
                ErrorCode::AdditionalItems,
                "Additional items with no corresponding fields",
            )
            .with_extra(Extra::AdditionalItems {
                items: items[cursor..].iter().map(|t| t.text.clone()).collect(),
                position,
            });
            debug!(error = %err, "object has leftover items");
            return Err(err);
        }

        Ok(Value::Object(record))
    }

    /// Parses a field that has no item left against empty text.
    fn parse_missing(&self, text: &str, items: &[Token], name: &str, field: &Syntax) -> Result<Value> {
        field.parse("").map_err(|cause| {
            let position = if items.is_empty() {
                0
            } else {
                char_len(text) + char_len(self.separator())
            };
            let err = Error::parse(
                self,
                text,
                position,
                ErrorCode::MissingField,
                format!("No item left for field '{}'", name),
            )
            .with_extra(Extra::MissingField {
                field: name.to_string(),
                position,
            })
            .with_cause(cause);
            debug!(error = %err, "object field missing");
            err
        })
    }
}

impl OptionalSyntax {
    fn parse(&self, text: &str) -> Outcome {
        match self.inner().parse_outcome(text) {
            Ok(outcome) => Outcome {
                matched: true,
                ..outcome
            },
            Err(err) => {
                trace!(error = %err, "optional falls back to default");
                Outcome {
                    value: self.default_value().clone(),
                    matched: false,
                    option: None,
                }
            }
        }
    }
}
