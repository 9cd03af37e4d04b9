//! Error types for parsing and dumping.
//!
//! Every failure carries the description of the syntax that rejected the
//! input, the input itself, a message and, for parse failures, the zero-based
//! character offset of the problem. Composite syntaxes wrap the failure of a
//! child into their own error and keep the child as its `cause`, so an error
//! reads as a chain from the outermost record down to the offending leaf.
//!
//! ## Error Categories
//!
//! - **Parse**: text could not be turned into a value
//! - **Dump**: a value could not be turned into text
//! - **Definition**: a syntax tree was built or queried incorrectly
//! - **Conversion**: a [`Value`](crate::Value) was extracted as the wrong type
//!
//! ## Examples
//!
//! ```rust
//! use flatsyntax::{ErrorCode, Syntax};
//!
//! let numbers = Syntax::array(Syntax::number());
//! let err = numbers.parse("5,nan,20.4").unwrap_err();
//!
//! assert_eq!(err.position(), Some(2));
//! assert_eq!(err.code(), Some(ErrorCode::InvalidItem));
//! assert_eq!(err.cause().and_then(|e| e.code()), Some(ErrorCode::NotNumeric));
//! ```

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Machine-readable classification of a parse or dump failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    /// A string syntax received empty text.
    EmptyInput,
    /// Text is not a numeric literal.
    NotNumeric,
    /// Text is outside the boolean vocabulary.
    NotBoolean,
    /// No option (or constant) accepted the input.
    NoMatch,
    /// More than one choice option accepted the input.
    AmbiguousMatch,
    /// An array element was rejected by the item syntax.
    InvalidItem,
    /// An object field was rejected by its syntax.
    InvalidField,
    /// A required object field had nothing to consume.
    MissingField,
    /// Items were left over after every object field was assigned.
    AdditionalItems,
    /// Grammar text (or a syntax tree) is not expressible by the meta-syntax.
    InvalidSyntax,
    /// A value of the wrong kind was handed to `dump`.
    TypeMismatch,
}

impl ErrorCode {
    /// Returns the kebab-case name of this code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::EmptyInput => "empty-input",
            ErrorCode::NotNumeric => "not-numeric",
            ErrorCode::NotBoolean => "not-boolean",
            ErrorCode::NoMatch => "no-match",
            ErrorCode::AmbiguousMatch => "ambiguous-match",
            ErrorCode::InvalidItem => "invalid-item",
            ErrorCode::InvalidField => "invalid-field",
            ErrorCode::MissingField => "missing-field",
            ErrorCode::AdditionalItems => "additional-items",
            ErrorCode::InvalidSyntax => "invalid-syntax",
            ErrorCode::TypeMismatch => "type-mismatch",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured context attached by composite syntaxes.
///
/// For parse failures `position` is the offset of the failure inside the
/// item; for dump failures it is the index of the element or field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Extra {
    InvalidItem {
        item: String,
        position: usize,
    },
    InvalidField {
        field: String,
        item: String,
        position: usize,
    },
    MissingField {
        field: String,
        position: usize,
    },
    AdditionalItems {
        items: Vec<String>,
        position: usize,
    },
}

/// Represents all possible errors raised by syntaxes and the meta-syntax.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Text could not be parsed.
    #[error("Error while parsing '{input}' as {syntax} at character {position}: {message}")]
    Parse {
        code: ErrorCode,
        syntax: String,
        input: String,
        position: usize,
        message: String,
        extra: Option<Extra>,
        #[source]
        cause: Option<Box<Error>>,
    },

    /// A value could not be dumped.
    #[error("Error while dumping some input as {syntax}: {message}")]
    Dump {
        code: ErrorCode,
        syntax: String,
        input: String,
        message: String,
        extra: Option<Extra>,
        #[source]
        cause: Option<Box<Error>>,
    },

    /// A syntax tree was constructed or queried incorrectly.
    #[error("Invalid syntax definition: {0}")]
    Definition(String),

    /// A value did not hold the requested type.
    #[error("Value conversion failed: {0}")]
    Conversion(String),
}

impl Error {
    /// Creates a parse failure raised by `syntax` on `input`.
    pub fn parse(
        syntax: &impl fmt::Display,
        input: &str,
        position: usize,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Error::Parse {
            code,
            syntax: syntax.to_string(),
            input: input.to_string(),
            position,
            message: message.into(),
            extra: None,
            cause: None,
        }
    }

    /// Creates a dump failure raised by `syntax` on `input`.
    pub fn dump(
        syntax: &impl fmt::Display,
        input: &impl fmt::Display,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Error::Dump {
            code,
            syntax: syntax.to_string(),
            input: input.to_string(),
            message: message.into(),
            extra: None,
            cause: None,
        }
    }

    /// Creates a definition error.
    pub fn definition<T: fmt::Display>(msg: T) -> Self {
        Error::Definition(msg.to_string())
    }

    /// Attaches structured context. No-op on definition and conversion errors.
    #[must_use]
    pub fn with_extra(mut self, value: Extra) -> Self {
        if let Error::Parse { extra, .. } | Error::Dump { extra, .. } = &mut self {
            *extra = Some(value);
        }
        self
    }

    /// Attaches the child failure that caused this one.
    #[must_use]
    pub fn with_cause(mut self, value: Error) -> Self {
        if let Error::Parse { cause, .. } | Error::Dump { cause, .. } = &mut self {
            *cause = Some(Box::new(value));
        }
        self
    }

    /// Returns the failure code, if this is a parse or dump failure.
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::Parse { code, .. } | Error::Dump { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns the character offset of a parse failure.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::Parse { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Returns the message without the positional prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Error::Parse { message, .. } | Error::Dump { message, .. } => message,
            Error::Definition(message) | Error::Conversion(message) => message,
        }
    }

    /// Returns the rejected input (the text, or the rendered value for dumps).
    #[must_use]
    pub fn input(&self) -> Option<&str> {
        match self {
            Error::Parse { input, .. } | Error::Dump { input, .. } => Some(input),
            _ => None,
        }
    }

    /// Returns the description of the syntax that raised the failure.
    #[must_use]
    pub fn syntax(&self) -> Option<&str> {
        match self {
            Error::Parse { syntax, .. } | Error::Dump { syntax, .. } => Some(syntax),
            _ => None,
        }
    }

    #[must_use]
    pub fn extra(&self) -> Option<&Extra> {
        match self {
            Error::Parse { extra, .. } | Error::Dump { extra, .. } => extra.as_ref(),
            _ => None,
        }
    }

    /// Returns the child failure wrapped by this one.
    #[must_use]
    pub fn cause(&self) -> Option<&Error> {
        match self {
            Error::Parse { cause, .. } | Error::Dump { cause, .. } => cause.as_deref(),
            _ => None,
        }
    }

    /// Iterates over this error and its causes, outermost first.
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// Returns the innermost failure of the chain.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Some(cause) = current.cause() {
            current = cause;
        }
        current
    }

    #[inline]
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_dump(&self) -> bool {
        matches!(self, Error::Dump { .. })
    }
}

/// Iterator over an error and its causes. See [`Error::chain`].
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a Error>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Error;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.cause();
        Some(current)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_format() {
        let err = Error::parse(&"Number", "t56", 0, ErrorCode::NotNumeric, "Not a numeric value");
        assert_eq!(
            err.to_string(),
            "Error while parsing 't56' as Number at character 0: Not a numeric value"
        );
        assert_eq!(err.position(), Some(0));
        assert!(err.is_parse());
    }

    #[test]
    fn test_dump_message_format() {
        let err = Error::dump(&"Boolean", &"[15]", ErrorCode::TypeMismatch, "Not a boolean");
        assert_eq!(
            err.to_string(),
            "Error while dumping some input as Boolean: Not a boolean"
        );
        assert_eq!(err.position(), None);
        assert_eq!(err.input(), Some("[15]"));
    }

    #[test]
    fn test_chain_and_source() {
        use std::error::Error as _;

        let inner = Error::parse(&"Number", "x", 0, ErrorCode::NotNumeric, "Not a numeric value");
        let outer = Error::parse(&"Array", "1,x", 2, ErrorCode::InvalidItem, "Unable to parse the item 'x'")
            .with_extra(Extra::InvalidItem {
                item: "x".to_string(),
                position: 0,
            })
            .with_cause(inner.clone());

        let codes: Vec<_> = outer.chain().filter_map(Error::code).collect();
        assert_eq!(codes, vec![ErrorCode::InvalidItem, ErrorCode::NotNumeric]);
        assert_eq!(outer.root_cause(), &inner);
        assert!(outer.source().is_some());
        assert!(inner.source().is_none());
    }

    #[test]
    fn test_definition_ignores_context() {
        let err = Error::definition("no fields").with_cause(Error::Conversion("x".into()));
        assert!(err.cause().is_none());
        assert_eq!(err.code(), None);
        assert_eq!(err.message(), "no fields");
    }

    #[test]
    fn test_code_names() {
        assert_eq!(ErrorCode::AdditionalItems.as_str(), "additional-items");
        assert_eq!(ErrorCode::TypeMismatch.to_string(), "type-mismatch");
    }
}
