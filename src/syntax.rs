//! Syntax trees.
//!
//! A [`Syntax`] describes how one piece of text maps to one [`Value`] and
//! back. Leaves (`String`, `Number`, `Boolean`, `Constant`) convert a single
//! token; composites (`Array`, `Object`, `Optional`, `Choice`) delegate to
//! their children. Trees are immutable once built and hold no per-call state,
//! so a single tree can be shared freely across threads.
//!
//! ```rust
//! use flatsyntax::{value, Syntax};
//!
//! let repo = Syntax::object(vec![
//!     ("name", Syntax::string()),
//!     ("stars", Syntax::number()),
//! ])
//! .unwrap();
//! let repos = Syntax::array(repo);
//!
//! let parsed = repos.parse("foo:12,bar:7").unwrap();
//! assert_eq!(
//!     parsed,
//!     value!([{ "name": "foo", "stars": 12 }, { "name": "bar", "stars": 7 }])
//! );
//! assert_eq!(repos.dump(&parsed).unwrap(), "foo:12,bar:7");
//! ```
//!
//! Parsing and dumping live in [`crate::parse`] and [`crate::dump`].

use crate::{Error, Result, Value};
use indexmap::IndexMap;
use std::fmt;

/// A node of a syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Syntax {
    /// Any non-empty text.
    String,
    /// A numeric literal, parsed as a double.
    Number,
    /// One of `true`, `yes`, `y`, `false`, `no`, `n`, ignoring case.
    Boolean,
    /// One literal text.
    Constant(ConstantSyntax),
    /// Exactly one of several named alternatives.
    Choice(ChoiceSyntax),
    /// Items of one syntax separated by a delimiter.
    Array(ArraySyntax),
    /// Ordered named fields separated by a delimiter.
    Object(ObjectSyntax),
    /// A syntax that falls back to a default value.
    Optional(OptionalSyntax),
}

impl Syntax {
    #[must_use]
    pub const fn string() -> Self {
        Syntax::String
    }

    #[must_use]
    pub const fn number() -> Self {
        Syntax::Number
    }

    #[must_use]
    pub const fn boolean() -> Self {
        Syntax::Boolean
    }

    /// An array of `item` separated by `,`.
    #[must_use]
    pub fn array(item: Syntax) -> Self {
        Syntax::Array(ArraySyntax::new(item, ArraySyntax::DEFAULT_SEPARATOR))
    }

    /// An array of `item` separated by `separator`.
    #[must_use]
    pub fn array_with(item: Syntax, separator: &str) -> Self {
        Syntax::Array(ArraySyntax::new(item, separator))
    }

    /// An object whose fields are separated by `:`.
    ///
    /// # Errors
    ///
    /// Fails when `fields` is empty or names a field twice.
    pub fn object<I, K>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Syntax)>,
        K: Into<String>,
    {
        ObjectSyntax::new(fields, ObjectSyntax::DEFAULT_SEPARATOR).map(Syntax::Object)
    }

    /// An object whose fields are separated by `separator`.
    ///
    /// # Errors
    ///
    /// Fails when `fields` is empty or names a field twice.
    pub fn object_with<I, K>(fields: I, separator: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Syntax)>,
        K: Into<String>,
    {
        ObjectSyntax::new(fields, separator).map(Syntax::Object)
    }

    /// Wraps `inner` so that a parse failure yields `default`.
    #[must_use]
    pub fn optional(inner: Syntax, default: impl Into<Value>) -> Self {
        Syntax::Optional(OptionalSyntax::new(inner, default))
    }

    /// A case-sensitive literal.
    #[must_use]
    pub fn constant(value: impl Into<String>) -> Self {
        Syntax::Constant(ConstantSyntax::new(value, true))
    }

    /// A literal matched regardless of case.
    #[must_use]
    pub fn constant_ignore_case(value: impl Into<String>) -> Self {
        Syntax::Constant(ConstantSyntax::new(value, false))
    }

    /// A choice between named options.
    ///
    /// # Errors
    ///
    /// Fails when `options` is empty or names an option twice.
    pub fn choice<I, K>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Syntax)>,
        K: Into<String>,
    {
        ChoiceSyntax::new(options).map(Syntax::Choice)
    }

    /// A syntax is required unless it carries a default.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        !matches!(self, Syntax::Optional(_))
    }

    /// The default value of an optional syntax.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        match self {
            Syntax::Optional(optional) => Some(optional.default_value()),
            _ => None,
        }
    }

    /// Looks up a field by dotted path, descending through arrays, optionals
    /// and objects.
    ///
    /// # Errors
    ///
    /// Fails when the syntax has no nested object or the path names an
    /// unknown field.
    pub fn field(&self, path: &str) -> Result<&Syntax> {
        self.nested_object()
            .ok_or_else(|| Error::definition(format!("{} has no fields", self)))?
            .field(path)
    }

    /// The object reached by unwrapping arrays and optionals.
    fn nested_object(&self) -> Option<&ObjectSyntax> {
        match self {
            Syntax::Object(object) => Some(object),
            Syntax::Array(array) => array.item().nested_object(),
            Syntax::Optional(optional) => optional.inner().nested_object(),
            _ => None,
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Syntax::String => f.write_str("String"),
            Syntax::Number => f.write_str("Number"),
            Syntax::Boolean => f.write_str("Boolean"),
            Syntax::Constant(constant) => fmt::Display::fmt(constant, f),
            Syntax::Choice(choice) => fmt::Display::fmt(choice, f),
            Syntax::Array(array) => fmt::Display::fmt(array, f),
            Syntax::Object(object) => fmt::Display::fmt(object, f),
            Syntax::Optional(optional) => fmt::Display::fmt(optional, f),
        }
    }
}

/// A literal text, optionally matched regardless of case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantSyntax {
    value: String,
    case_sensitive: bool,
}

impl ConstantSyntax {
    #[must_use]
    pub fn new(value: impl Into<String>, case_sensitive: bool) -> Self {
        ConstantSyntax {
            value: value.into(),
            case_sensitive,
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Whether `text` is this constant.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        if self.case_sensitive {
            text == self.value
        } else {
            text.to_lowercase() == self.value.to_lowercase()
        }
    }
}

impl fmt::Display for ConstantSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.case_sensitive {
            write!(f, "Constant '{}'", self.value)
        } else {
            write!(f, "Constant '{}' (ignoring case)", self.value)
        }
    }
}

/// Named alternatives; exactly one must accept the input.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceSyntax {
    options: IndexMap<String, Syntax>,
}

impl ChoiceSyntax {
    /// # Errors
    ///
    /// Fails when `options` is empty or names an option twice.
    pub fn new<I, K>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Syntax)>,
        K: Into<String>,
    {
        let options = collect_named(options, "option")?;
        if options.is_empty() {
            return Err(Error::definition("A choice needs at least one option"));
        }
        Ok(ChoiceSyntax { options })
    }

    #[must_use]
    pub fn options(&self) -> &IndexMap<String, Syntax> {
        &self.options
    }

    /// # Errors
    ///
    /// Fails when no option has that name.
    pub fn option(&self, name: &str) -> Result<&Syntax> {
        self.options
            .get(name)
            .ok_or_else(|| Error::definition(format!("No option with name '{}' is found", name)))
    }

    /// Renders `names` as `name (syntax)` pairs.
    pub(crate) fn describe<'a, I>(&self, names: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter_map(|name| {
                self.options
                    .get(name)
                    .map(|syntax| format!("{} ({})", name, syntax))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ChoiceSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let all = self.describe(self.options.keys().map(String::as_str));
        write!(f, "Choice between {}", all)
    }
}

/// Homogeneous items separated by a delimiter.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySyntax {
    item: Box<Syntax>,
    separator: String,
}

impl ArraySyntax {
    pub const DEFAULT_SEPARATOR: &'static str = ",";

    /// An empty `separator` falls back to [`ArraySyntax::DEFAULT_SEPARATOR`].
    #[must_use]
    pub fn new(item: Syntax, separator: &str) -> Self {
        ArraySyntax {
            item: Box::new(item),
            separator: non_empty_or(separator, Self::DEFAULT_SEPARATOR),
        }
    }

    #[must_use]
    pub fn item(&self) -> &Syntax {
        &self.item
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl fmt::Display for ArraySyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Array of ({}) separated by '{}'", self.item, self.separator)
    }
}

/// Ordered, named, heterogeneous fields separated by a delimiter.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSyntax {
    fields: IndexMap<String, Syntax>,
    separator: String,
}

impl ObjectSyntax {
    pub const DEFAULT_SEPARATOR: &'static str = ":";

    /// An empty `separator` falls back to [`ObjectSyntax::DEFAULT_SEPARATOR`].
    ///
    /// # Errors
    ///
    /// Fails when `fields` is empty or names a field twice.
    pub fn new<I, K>(fields: I, separator: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Syntax)>,
        K: Into<String>,
    {
        let fields = collect_named(fields, "field")?;
        if fields.is_empty() {
            return Err(Error::definition("An object needs at least one field"));
        }
        Ok(ObjectSyntax {
            fields,
            separator: non_empty_or(separator, Self::DEFAULT_SEPARATOR),
        })
    }

    /// Adds a field at the end, or replaces the syntax of an existing one
    /// in place.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, syntax: Syntax) -> Self {
        self.fields.insert(name.into(), syntax);
        self
    }

    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, Syntax> {
        &self.fields
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Looks up a field by dotted path (`repos.stars`), descending through
    /// nested arrays, optionals and objects.
    ///
    /// # Errors
    ///
    /// Fails when a segment of the path names no field.
    pub fn field(&self, path: &str) -> Result<&Syntax> {
        let (name, rest) = match path.split_once('.') {
            Some((name, rest)) => (name, Some(rest)),
            None => (path, None),
        };
        let field = self
            .fields
            .get(name)
            .ok_or_else(|| Error::definition(format!("No field with name '{}' is found", name)))?;
        match rest {
            None => Ok(field),
            Some(rest) => field
                .nested_object()
                .ok_or_else(|| Error::definition(format!("Field '{}' has no fields", name)))?
                .field(rest),
        }
    }
}

impl fmt::Display for ObjectSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .fields
            .iter()
            .map(|(name, syntax)| format!("{}: {}", name, syntax))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Object {{{}}} separated by '{}'", fields, self.separator)
    }
}

/// A syntax with a fallback value.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalSyntax {
    inner: Box<Syntax>,
    default: Value,
}

impl OptionalSyntax {
    #[must_use]
    pub fn new(inner: Syntax, default: impl Into<Value>) -> Self {
        OptionalSyntax {
            inner: Box::new(inner),
            default: default.into(),
        }
    }

    #[must_use]
    pub fn inner(&self) -> &Syntax {
        &self.inner
    }

    #[must_use]
    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

impl fmt::Display for OptionalSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Optional {}", self.inner)
    }
}

fn non_empty_or(separator: &str, default: &str) -> String {
    if separator.is_empty() {
        default.to_string()
    } else {
        separator.to_string()
    }
}

fn collect_named<I, K>(entries: I, what: &str) -> Result<IndexMap<String, Syntax>>
where
    I: IntoIterator<Item = (K, Syntax)>,
    K: Into<String>,
{
    let mut named = IndexMap::new();
    for (name, syntax) in entries {
        let name = name.into();
        if named.contains_key(&name) {
            return Err(Error::definition(format!("Duplicate {} '{}'", what, name)));
        }
        named.insert(name, syntax);
    }
    Ok(named)
}
