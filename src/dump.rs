//! Value to text.
//!
//! Dumping walks the syntax tree, not the value: object fields are written in
//! the order the syntax declares them, and keys of the value that the syntax
//! does not know are ignored. Optional syntaxes dump through their inner
//! syntax; a default never changes the output.

use crate::error::{Error, ErrorCode, Extra, Result};
use crate::syntax::{ArraySyntax, ChoiceSyntax, ConstantSyntax, ObjectSyntax};
use crate::{text, Syntax, Value};
use tracing::{debug, trace};

impl Syntax {
    /// Dumps `value` into text that [`Syntax::parse`] reads back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dump`] when the value does not have the shape this
    /// syntax describes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatsyntax::{value, Syntax};
    ///
    /// let point = Syntax::object_with(vec![("x", Syntax::number()), ("y", Syntax::number())], ",")
    ///     .unwrap();
    /// assert_eq!(point.dump(&value!({ "x": 1.5, "y": (-2) })).unwrap(), "1.5,-2");
    /// ```
    pub fn dump(&self, value: &Value) -> Result<String> {
        match self {
            Syntax::String => match value {
                Value::String(s) => Ok(s.clone()),
                _ => Err(mismatch(self, value, "Not a string value")),
            },
            Syntax::Number => match value {
                Value::Number(n) if n.is_finite() => Ok(n.to_string()),
                Value::Number(_) => Err(mismatch(self, value, "Not a finite number")),
                _ => Err(mismatch(self, value, "Not a numeric value")),
            },
            Syntax::Boolean => match value {
                Value::Bool(b) => Ok(b.to_string()),
                _ => Err(mismatch(self, value, "Not a boolean")),
            },
            Syntax::Constant(constant) => constant.dump(value),
            Syntax::Choice(choice) => choice.dump(value),
            Syntax::Array(array) => array.dump(value),
            Syntax::Object(object) => object.dump(value),
            Syntax::Optional(optional) => optional.inner().dump(value),
        }
    }
}

fn mismatch(syntax: &impl std::fmt::Display, value: &Value, message: &str) -> Error {
    Error::dump(syntax, value, ErrorCode::TypeMismatch, message)
}

impl ConstantSyntax {
    fn dump(&self, value: &Value) -> Result<String> {
        match value {
            Value::String(s) if self.matches(s) => Ok(self.value().to_string()),
            Value::String(_) => Err(Error::dump(
                self,
                value,
                ErrorCode::NoMatch,
                format!("Expected '{}'", self.value()),
            )),
            _ => Err(mismatch(self, value, "Not a string value")),
        }
    }
}

impl ChoiceSyntax {
    fn dump(&self, value: &Value) -> Result<String> {
        trace!(syntax = %self, "dumping choice");
        let mut dumped = self
            .options()
            .iter()
            .filter_map(|(name, option)| option.dump(value).ok().map(|text| (name, text)))
            .collect::<Vec<_>>();

        match dumped.len() {
            1 => Ok(dumped.remove(0).1),
            0 => {
                let all = self.describe(self.options().keys().map(String::as_str));
                Err(Error::dump(
                    self,
                    value,
                    ErrorCode::NoMatch,
                    format!("Unable to dump {} as any of {}", value, all),
                ))
            }
            _ => {
                let names = self.describe(dumped.iter().map(|(name, _)| name.as_str()));
                Err(Error::dump(
                    self,
                    value,
                    ErrorCode::AmbiguousMatch,
                    format!(
                        "Unable to choose an option: {} can be dumped as many options: {}",
                        value, names
                    ),
                ))
            }
        }
    }
}

impl ArraySyntax {
    fn dump(&self, value: &Value) -> Result<String> {
        trace!(syntax = %self, "dumping array");
        let Value::Array(items) = value else {
            return Err(mismatch(self, value, "Not an array"));
        };
        // empty text reads back as one empty item
        if items.is_empty() {
            return Err(Error::dump(
                self,
                value,
                ErrorCode::InvalidItem,
                "Unable to dump an empty array",
            ));
        }
        let mut parts = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.item().dump(item) {
                Ok(part) if !part.is_empty() || reads_empty(self.item(), item, false) => {
                    parts.push(part);
                }
                Ok(_) => return Err(self.item_error(value, index, None)),
                Err(cause) => return Err(self.item_error(value, index, Some(cause))),
            }
        }

        let text = text::join(&parts, self.separator());
        if let Some(index) = split_mismatch(&text, self.separator(), &parts) {
            return Err(self.item_error(value, index, None));
        }
        Ok(text)
    }

    fn item_error(&self, value: &Value, index: usize, cause: Option<Error>) -> Error {
        let item = value.as_array().and_then(|items| items.get(index));
        let mut err = Error::dump(
            self,
            value,
            ErrorCode::InvalidItem,
            format!("Unable to dump item at key {}", index),
        )
        .with_extra(Extra::InvalidItem {
            item: item.map(Value::to_string).unwrap_or_default(),
            position: index,
        });
        if let Some(cause) = cause {
            err = err.with_cause(cause);
        }
        debug!(error = %err, "array item not dumped");
        err
    }
}

impl ObjectSyntax {
    fn dump(&self, value: &Value) -> Result<String> {
        trace!(syntax = %self, "dumping object");
        let Value::Object(record) = value else {
            return Err(mismatch(self, value, "Not an object"));
        };
        let mut parts = Vec::with_capacity(self.fields().len());
        // first field left to its default; only valid at the end
        let mut omitted: Option<(usize, Option<Error>)> = None;
        for (index, (name, field)) in self.fields().iter().enumerate() {
            let Some(item) = record.get(name) else {
                let err = Error::dump(
                    self,
                    value,
                    ErrorCode::MissingField,
                    format!("Missing field '{}'", name),
                )
                .with_extra(Extra::MissingField {
                    field: name.clone(),
                    position: index,
                });
                debug!(error = %err, "object field absent");
                return Err(err);
            };
            let (part, cause) = match field.dump(item) {
                Ok(part) if !part.is_empty() || reads_empty(field, item, true) => {
                    (Some(part), None)
                }
                Ok(_) => (None, None),
                Err(cause) => (None, Some(cause)),
            };
            match part {
                Some(part) => {
                    if let Some((index, cause)) = omitted.take() {
                        return Err(self.field_error(value, index, cause));
                    }
                    parts.push(part);
                }
                None if falls_back(field, item) => {
                    if omitted.is_none() {
                        omitted = Some((index, cause));
                    }
                }
                None => return Err(self.field_error(value, index, cause)),
            }
        }

        let text = text::join(&parts, self.separator());
        // empty text has no items: every field reads ""
        if !text.is_empty() {
            if let Some(index) = split_mismatch(&text, self.separator(), &parts) {
                return Err(self.field_error(value, index, None));
            }
        }
        Ok(text)
    }

    fn field_error(&self, value: &Value, index: usize, cause: Option<Error>) -> Error {
        let (name, item) = match self.fields().get_index(index) {
            Some((name, _)) => (name.clone(), value.get(name)),
            None => (String::new(), None),
        };
        let mut err = Error::dump(
            self,
            value,
            ErrorCode::InvalidField,
            format!("Unable to dump the field '{}'", name),
        )
        .with_extra(Extra::InvalidField {
            field: name,
            item: item.map(Value::to_string).unwrap_or_default(),
            position: index,
        });
        if let Some(cause) = cause {
            err = err.with_cause(cause);
        }
        debug!(error = %err, "object field not dumped");
        err
    }
}

/// Whether parsing empty text gives back `value`; `consumed` also requires
/// that an optional did not fall back to its default.
fn reads_empty(syntax: &Syntax, value: &Value, consumed: bool) -> bool {
    matches!(
        syntax.parse_outcome(""),
        Ok(outcome) if outcome.value == *value && (outcome.matched || !consumed)
    )
}

/// Whether an absent item makes `syntax` produce `value`.
fn falls_back(syntax: &Syntax, value: &Value) -> bool {
    matches!(syntax.parse_outcome(""), Ok(outcome) if !outcome.matched && outcome.value == *value)
}

/// Index of the first part that does not split back out of `text`.
fn split_mismatch(text: &str, separator: &str, parts: &[String]) -> Option<usize> {
    let tokens = text::split(text, separator);
    let last = parts.len().saturating_sub(1);
    (0..tokens.len().max(parts.len()))
        .find(|&i| tokens.get(i) != parts.get(i))
        .map(|i| i.min(last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives() {
        assert_eq!(Syntax::string().dump(&Value::from("Foo")).unwrap(), "Foo");
        assert_eq!(Syntax::number().dump(&Value::from(76)).unwrap(), "76");
        assert_eq!(Syntax::number().dump(&Value::from(-6.5)).unwrap(), "-6.5");
        assert_eq!(Syntax::boolean().dump(&Value::Bool(false)).unwrap(), "false");
    }

    #[test]
    fn test_type_mismatch() {
        let err = Syntax::boolean().dump(&Value::from(1)).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::TypeMismatch));
        assert_eq!(err.message(), "Not a boolean");

        let err = Syntax::number().dump(&Value::Number(f64::INFINITY)).unwrap_err();
        assert_eq!(err.message(), "Not a finite number");
    }

    #[test]
    fn test_optional_dumps_inner() {
        let optional = Syntax::optional(Syntax::number(), 0);
        assert_eq!(optional.dump(&Value::from(3)).unwrap(), "3");
        assert!(optional.dump(&Value::from("three")).is_err());
    }

    #[test]
    fn test_constant_dump() {
        let constant = Syntax::constant_ignore_case("ON");
        assert_eq!(constant.dump(&Value::from("on")).unwrap(), "ON");
        let err = constant.dump(&Value::from("off")).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::NoMatch));
    }

    #[test]
    fn test_array_items_must_split_back() {
        let words = Syntax::array(Syntax::string());
        let value = Value::from(vec![Value::from("a["), Value::from("b")]);
        let err = words.dump(&value).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidItem));
        assert_eq!(err.message(), "Unable to dump item at key 0");
        assert_eq!(
            err.extra(),
            Some(&Extra::InvalidItem {
                item: "\"a[\"".to_string(),
                position: 0,
            })
        );

        let balanced = Value::from(vec![Value::from("a[b]"), Value::from("c")]);
        assert_eq!(words.dump(&balanced).unwrap(), "a[b],c");
    }

    #[test]
    fn test_empty_items() {
        let words = Syntax::array(Syntax::string());
        let err = words.dump(&Value::from(vec![Value::from("")])).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidItem));
        assert!(err.cause().is_none());

        let err = words.dump(&Value::Array(vec![])).unwrap_err();
        assert_eq!(err.message(), "Unable to dump an empty array");

        let defaults = Syntax::array(Syntax::optional(Syntax::string(), "z"));
        assert!(defaults.dump(&Value::from(vec![Value::from("")])).is_err());
    }

    #[test]
    fn test_trailing_default_is_left_off() {
        let syntax = Syntax::object(vec![
            ("name", Syntax::string()),
            ("tags", Syntax::optional(Syntax::array(Syntax::string()), Value::Array(vec![]))),
        ])
        .unwrap();
        let mut record = crate::ValueMap::new();
        record.insert("name".to_string(), Value::from("Foo"));
        record.insert("tags".to_string(), Value::Array(vec![]));
        let value = Value::Object(record);

        let text = syntax.dump(&value).unwrap();
        assert_eq!(text, "Foo");
        assert_eq!(syntax.parse(&text).unwrap(), value);
    }

    #[test]
    fn test_default_before_a_written_field_fails() {
        let syntax = Syntax::object(vec![
            ("tags", Syntax::optional(Syntax::array(Syntax::string()), Value::Array(vec![]))),
            ("name", Syntax::string()),
        ])
        .unwrap();
        let mut record = crate::ValueMap::new();
        record.insert("tags".to_string(), Value::Array(vec![]));
        record.insert("name".to_string(), Value::from("Foo"));

        let err = syntax.dump(&Value::Object(record)).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidField));
        assert_eq!(err.message(), "Unable to dump the field 'tags'");
        assert_eq!(
            err.cause().map(Error::message),
            Some("Unable to dump an empty array")
        );
    }

    #[test]
    fn test_choice_dump_is_exclusive() {
        let choice = Syntax::choice(vec![
            ("flag", Syntax::boolean()),
            ("count", Syntax::number()),
        ])
        .unwrap();
        assert_eq!(choice.dump(&Value::from(3)).unwrap(), "3");
        assert_eq!(
            choice.dump(&Value::from("x")).unwrap_err().code(),
            Some(ErrorCode::NoMatch)
        );

        let overlapping = Syntax::choice(vec![
            ("word", Syntax::string()),
            ("keyword", Syntax::constant("on")),
        ])
        .unwrap();
        assert_eq!(
            overlapping.dump(&Value::from("on")).unwrap_err().code(),
            Some(ErrorCode::AmbiguousMatch)
        );
    }
}
