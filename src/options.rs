//! Configuration options for the grammar notation.
//!
//! Grammar text may leave out the separator of an array (`[number]`) or an
//! object (`{name, age: number}`). [`GrammarOptions`] decides which
//! separator the resulting syntax uses in that case.
//!
//! ## Examples
//!
//! ```rust
//! use flatsyntax::{Grammar, GrammarOptions};
//!
//! let options = GrammarOptions::new()
//!     .with_array_separator(";")
//!     .with_object_separator("\t");
//! let grammar = Grammar::with_options(options);
//!
//! let syntax = grammar.parse("[{name, age: number}]").unwrap();
//! assert!(syntax.parse("Foo\t76;Bar\t12").is_ok());
//! ```

use crate::syntax::{ArraySyntax, ObjectSyntax};

/// Default separators used by the grammar notation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrammarOptions {
    pub array_separator: String,
    pub object_separator: String,
}

impl Default for GrammarOptions {
    fn default() -> Self {
        GrammarOptions {
            array_separator: ArraySyntax::DEFAULT_SEPARATOR.to_string(),
            object_separator: ObjectSyntax::DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl GrammarOptions {
    /// Creates default options (`,` between array items, `:` between fields).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatsyntax::GrammarOptions;
    ///
    /// let options = GrammarOptions::new();
    /// assert_eq!(options.array_separator, ",");
    /// assert_eq!(options.object_separator, ":");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the separator of arrays declared without one.
    ///
    /// An empty separator is ignored.
    #[must_use]
    pub fn with_array_separator(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        if !separator.is_empty() {
            self.array_separator = separator;
        }
        self
    }

    /// Sets the separator of objects declared without one.
    ///
    /// An empty separator is ignored.
    #[must_use]
    pub fn with_object_separator(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        if !separator.is_empty() {
            self.object_separator = separator;
        }
        self
    }
}
