//! Delimiter-aware tokenizer.
//!
//! Arrays and objects split their input on a separator, but only at the top
//! level: a separator nested inside brackets, braces, parentheses or quotes
//! belongs to the inner value. [`split`] does that split in a single
//! left-to-right scan and [`join`] is its inverse.
//!
//! ```rust
//! use flatsyntax::text;
//!
//! let items = text::split(r#"foo ("bar baz" alpha) beta"#, " ");
//! assert_eq!(items, vec!["foo", r#"("bar baz" alpha)"#, "beta"]);
//!
//! let joined = text::join(&["a:b", "c"], ":");
//! assert_eq!(joined, r#""a:b":c"#);
//! assert_eq!(text::split(&joined, ":"), vec!["a:b", "c"]);
//! ```
//!
//! Each token is stripped of one pair of wrapper characters (by default a
//! pair of double quotes) when the pair encloses the whole token. The round
//! trip `split(join(items, sep), sep) == items` holds as long as no item
//! contains a quote character.

use std::ops::Range;

/// Default nesting pairs: quotes, brackets, parentheses and braces.
pub const SURROUNDERS: &str = "\"\"[](){}";

/// Default wrapper pairs stripped from each token.
pub const WRAPPERS: &str = "\"\"";

/// A top-level piece of the input returned by [`tokenize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text, unwrapped.
    pub text: String,
    /// Character offset of the raw token in the input.
    pub offset: usize,
    /// Byte range of the raw token in the input.
    pub span: Range<usize>,
    /// Whether a wrapper pair was stripped.
    pub unwrapped: bool,
}

impl Token {
    /// Character offset of the first character of [`Token::text`].
    #[must_use]
    pub fn content_offset(&self) -> usize {
        self.offset + usize::from(self.unwrapped)
    }
}

/// Splits `text` on top-level occurrences of `separator`, with the default
/// surrounders and wrappers.
#[must_use]
pub fn split(text: &str, separator: &str) -> Vec<String> {
    split_with(text, separator, SURROUNDERS, WRAPPERS)
}

/// Splits `text` on top-level occurrences of `separator`.
///
/// `surrounders` is a sequence of opener/closer character pairs; a character
/// that is both opener and closer (a quote) toggles instead of nesting.
/// `wrappers` lists the pairs stripped from each token.
#[must_use]
pub fn split_with(text: &str, separator: &str, surrounders: &str, wrappers: &str) -> Vec<String> {
    tokenize(text, separator, surrounders, wrappers)
        .into_iter()
        .map(|token| token.text)
        .collect()
}

/// Splits `text` like [`split_with`], keeping the position of every token.
///
/// Always yields at least one token: empty input gives one empty token, and
/// a trailing separator gives a trailing empty token.
#[must_use]
pub fn tokenize(text: &str, separator: &str, surrounders: &str, wrappers: &str) -> Vec<Token> {
    let pairs = pairs(surrounders);
    let mut depths = vec![0isize; pairs.len()];
    let mut total: isize = 0;

    let separator_chars = separator.chars().count();
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut start_offset = 0;
    let mut offset = 0;
    let mut index = 0;

    while index < text.len() {
        let rest = &text[index..];
        if total == 0 && !separator.is_empty() && rest.starts_with(separator) {
            tokens.push(token(text, start..index, start_offset, wrappers));
            index += separator.len();
            offset += separator_chars;
            start = index;
            start_offset = offset;
            continue;
        }

        let Some(c) = rest.chars().next() else {
            break;
        };
        let opening = pairs.iter().position(|&(open, _)| open == c);
        let closing = pairs.iter().position(|&(_, close)| close == c);
        match (opening, closing) {
            (Some(open), Some(close)) if open == close => {
                // same character opens and closes: toggle
                if depths[open] == 0 {
                    depths[open] = 1;
                    total += 1;
                } else {
                    depths[open] = 0;
                    total -= 1;
                }
            }
            _ => {
                if let Some(open) = opening {
                    depths[open] += 1;
                    total += 1;
                }
                if let Some(close) = closing {
                    depths[close] -= 1;
                    total -= 1;
                }
            }
        }
        index += c.len_utf8();
        offset += 1;
    }

    tokens.push(token(text, start..text.len(), start_offset, wrappers));
    tokens
}

fn token(text: &str, span: Range<usize>, offset: usize, wrappers: &str) -> Token {
    let raw = &text[span.clone()];
    let (inner, unwrapped) = strip_wrapper(raw, wrappers);
    Token {
        text: inner.to_string(),
        offset,
        span,
        unwrapped,
    }
}

/// Strips one wrapper pair enclosing the whole of `text`, if any.
///
/// ```rust
/// use flatsyntax::text::unwrap;
///
/// assert_eq!(unwrap("\"Hello\"", "\"\""), "Hello");
/// assert_eq!(unwrap("(Hey)", "\"\"()"), "Hey");
/// assert_eq!(unwrap("(Hey", "()"), "(Hey");
/// ```
#[must_use]
pub fn unwrap<'a>(text: &'a str, wrappers: &str) -> &'a str {
    strip_wrapper(text, wrappers).0
}

fn strip_wrapper<'a>(text: &'a str, wrappers: &str) -> (&'a str, bool) {
    if text.chars().nth(1).is_none() {
        return (text, false);
    }
    for (open, close) in pairs(wrappers) {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return (inner, true);
        }
    }
    (text, false)
}

/// Joins `items` with `separator`, quoting every item that contains it.
///
/// An item that is already enclosed in quotes is quoted once more, so that
/// [`split`] strips the added pair and not the item's own.
#[must_use]
pub fn join<S: AsRef<str>>(items: &[S], separator: &str) -> String {
    items
        .iter()
        .map(|item| {
            let item = item.as_ref();
            let contains = !separator.is_empty() && item.contains(separator);
            if contains || strip_wrapper(item, WRAPPERS).1 {
                format!("\"{}\"", item)
            } else {
                item.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Number of characters in `text`.
#[inline]
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn pairs(chars: &str) -> Vec<(char, char)> {
    let chars: Vec<char> = chars.chars().collect();
    chars
        .chunks(2)
        .filter_map(|pair| match pair {
            [open, close] => Some((*open, *close)),
            _ => None,
        })
        .collect()
}
