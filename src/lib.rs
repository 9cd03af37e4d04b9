//! # flatsyntax
//!
//! Bidirectional conversion between flat delimited text records and typed
//! values, driven by composable syntax descriptions.
//!
//! ## What is it for?
//!
//! Line-oriented formats such as `Foo:76:yes:Bar,Baz` are everywhere: config
//! lines, exports, logs, quick data files. Instead of writing a parser and a
//! printer for each, describe the record once as a [`Syntax`] and get both.
//!
//! ## Key Features
//!
//! - **Bidirectional**: every syntax parses text into a [`Value`] and dumps a
//!   [`Value`] back into text that parses to the same value
//! - **Nesting-aware**: separators inside brackets, braces, parentheses or
//!   quotes belong to the inner value
//! - **Optional fields**: an optional field that cannot use an item steps
//!   aside and lets the next field take it
//! - **Precise errors**: character offsets relative to the outermost input,
//!   with a cause chain down to the leaf that failed
//! - **Grammar notation**: syntax trees can be written as compact text
//!
//! ## Quick Start
//!
//! ```rust
//! use flatsyntax::{value, Syntax};
//!
//! let person = Syntax::object(vec![
//!     ("name", Syntax::string()),
//!     ("age", Syntax::number()),
//!     ("is_programmer", Syntax::optional(Syntax::boolean(), false)),
//!     ("friends", Syntax::array(Syntax::string())),
//! ])
//! .unwrap();
//!
//! let foo = person.parse("Foo:76:Bar,Baz").unwrap();
//! assert_eq!(
//!     foo,
//!     value!({ "name": "Foo", "age": 76, "is_programmer": false, "friends": ["Bar", "Baz"] })
//! );
//! assert_eq!(person.dump(&foo).unwrap(), "Foo:76:false:Bar,Baz");
//! ```
//!
//! ### The same syntax as grammar text
//!
//! ```rust
//! use flatsyntax::value;
//!
//! let grammar = "{name, age: number, is_programmer: (boolean: false), friends: []}";
//! let foo = flatsyntax::parse(grammar, "Foo:76:Bar,Baz").unwrap();
//! assert_eq!(foo.get("friends"), Some(&value!(["Bar", "Baz"])));
//! ```
//!
//! ### Errors
//!
//! ```rust
//! use flatsyntax::{ErrorCode, Syntax};
//!
//! let syntax: Syntax = "{name, age: number}".parse().unwrap();
//! let err = syntax.parse("Foo:old").unwrap_err();
//!
//! assert_eq!(err.code(), Some(ErrorCode::InvalidField));
//! assert_eq!(err.position(), Some(4));
//! assert_eq!(
//!     err.to_string(),
//!     "Error while parsing 'Foo:old' as Object {name: String, age: Number} separated by ':' \
//!      at character 4: Unable to parse the item 'old' for field 'age'"
//! );
//! ```
//!
//! ## Logging
//!
//! Parsing and dumping emit [`tracing`] events: `trace` when a composite
//! syntax starts, `debug` when one fails. Nothing is printed unless the
//! application installs a subscriber.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`developers.rs`** - A document of developer records, built by hand
//! - **`grammar.rs`** - The same document described with grammar text
//! - **`errors.rs`** - Walking an error chain
//!
//! Run any example with: `cargo run --example <name>`

pub mod dump;
pub mod error;
pub mod grammar;
pub mod macros;
pub mod map;
pub mod options;
pub mod parse;
pub mod syntax;
pub mod text;
pub mod value;

pub use error::{Error, ErrorCode, Extra, Result};
pub use grammar::Grammar;
pub use map::ValueMap;
pub use options::GrammarOptions;
pub use parse::Outcome;
pub use syntax::{ArraySyntax, ChoiceSyntax, ConstantSyntax, ObjectSyntax, OptionalSyntax, Syntax};
pub use value::Value;

/// Builds the syntax described by grammar text.
///
/// # Examples
///
/// ```rust
/// use flatsyntax::Syntax;
///
/// let syntax = flatsyntax::syntax("[number|/]").unwrap();
/// assert_eq!(syntax, Syntax::array_with(Syntax::number(), "/"));
/// ```
///
/// # Errors
///
/// Returns an error if the text is not valid grammar notation.
pub fn syntax(grammar: &str) -> Result<Syntax> {
    Grammar::new().parse(grammar)
}

/// Writes a syntax as grammar text.
///
/// # Examples
///
/// ```rust
/// use flatsyntax::Syntax;
///
/// let syntax = Syntax::optional(Syntax::string(), "Yo");
/// assert_eq!(flatsyntax::grammar(&syntax).unwrap(), r#"(string:"Yo")"#);
/// ```
///
/// # Errors
///
/// Returns an error if the syntax has no grammar form.
pub fn grammar(syntax: &Syntax) -> Result<String> {
    Grammar::new().dump(syntax)
}

/// Parses `text` with the syntax described by `grammar`.
///
/// # Errors
///
/// Returns an error if the grammar is invalid or the text does not conform.
pub fn parse(grammar: &str, text: &str) -> Result<Value> {
    syntax(grammar)?.parse(text)
}

/// Dumps `value` with the syntax described by `grammar`.
///
/// # Examples
///
/// ```rust
/// use flatsyntax::value;
///
/// let text = flatsyntax::dump("[{name, stars: number}|;]", &value!([
///     { "name": "flat", "stars": 12 },
///     { "name": "grid", "stars": 3 }
/// ]))
/// .unwrap();
/// assert_eq!(text, "flat:12;grid:3");
/// ```
///
/// # Errors
///
/// Returns an error if the grammar is invalid or the value does not fit.
pub fn dump(grammar: &str, value: &Value) -> Result<String> {
    syntax(grammar)?.dump(value)
}
