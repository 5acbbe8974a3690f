// src/utils/html.rs

use std::{iter::Enumerate, slice, sync::LazyLock};

use regex::{Captures, Regex};
use serde_json::{Value, map};

use crate::{
    error::SanitizeError,
    utils::sanitizer::{HtmlSanitizer, Sanitizer},
};

/// Matches the only three entities `unescape_structure` reverses.
static SAFE_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(amp|lt|gt);").expect("entity pattern is valid"));

/// Shapes user input around an injected [`Sanitizer`].
///
/// Structured inputs are `serde_json::Value`s: objects and arrays are walked,
/// strings are transformed, and every other leaf (numbers, booleans, null) is
/// returned untouched. Output always has the input's shape. Traversal uses an
/// explicit stack, so nesting depth is bounded only by memory.
#[derive(Debug, Clone, Default)]
pub struct HtmlCleaner<S = HtmlSanitizer> {
    sanitizer: S,
}

impl<S: Sanitizer> HtmlCleaner<S> {
    pub fn new(sanitizer: S) -> Self {
        Self { sanitizer }
    }

    /// Removes all markup, keeping only text content.
    pub fn strip_tags(&self, input: &str) -> String {
        self.sanitizer.strip(input)
    }

    /// Escapes `input` for use as a tag value inside a double-quoted attribute.
    /// `"` becomes `&quot;` and `'` is deleted outright.
    pub fn format_as_tag(&self, input: &str) -> String {
        self.sanitizer
            .escape_attribute(input)
            .replace('"', "&quot;")
            .replace('\'', "")
    }

    /// Escapes every string inside `input`.
    pub fn escape_structure(&self, input: Value) -> Value {
        let mut visited = 0usize;
        let out = map_strings(input, |s| {
            visited += 1;
            self.sanitizer.escape(&s)
        });
        tracing::trace!(strings = visited, "escaped structure");
        out
    }

    /// Like [`escape_structure`](Self::escape_structure), but first requires
    /// every string to already equal its escaped form.
    ///
    /// Fails on the first offending string with its location, e.g. `$.k[0]`
    /// or `$["a.b"]` for keys that are not plain identifiers.
    pub fn assert_escaped(&self, input: Value) -> Result<Value, SanitizeError> {
        if let Err(err) = self.check_escaped(&input) {
            tracing::warn!(error = %err, "unescaped markup in structure");
            return Err(err);
        }
        Ok(self.escape_structure(input))
    }

    /// Reverses `&amp;`, `&lt;` and `&gt;` in every string of `input`.
    pub fn unescape_structure(&self, input: Value) -> Value {
        map_strings(input, |s| unescape_text(&s))
    }

    /// Depth-first, in document order, so the first failure is reported.
    fn check_escaped(&self, root: &Value) -> Result<(), SanitizeError> {
        let mut path = String::from("$");
        let mut stack: Vec<Frame<'_>> = Vec::new();
        let mut next = Some(root);

        loop {
            match next.take() {
                Some(Value::String(s)) => {
                    if *s != self.sanitizer.escape(s) {
                        return Err(SanitizeError::NotEscaped { path });
                    }
                }
                Some(Value::Array(items)) => {
                    stack.push(Frame::Array(items.iter().enumerate(), path.len()));
                }
                Some(Value::Object(map)) => {
                    stack.push(Frame::Object(map.iter(), path.len()));
                }
                _ => {}
            }

            let Some(frame) = stack.last_mut() else {
                return Ok(());
            };
            next = match frame {
                Frame::Array(items, base) => {
                    path.truncate(*base);
                    items.next().map(|(i, item)| {
                        path.push_str(&format!("[{}]", i));
                        item
                    })
                }
                Frame::Object(entries, base) => {
                    path.truncate(*base);
                    entries.next().map(|(key, item)| {
                        push_key(&mut path, key);
                        item
                    })
                }
            };
            if next.is_none() {
                stack.pop();
            }
        }
    }
}

/// A container being walked, with the path length to restore per child.
enum Frame<'a> {
    Array(Enumerate<slice::Iter<'a, Value>>, usize),
    Object(map::Iter<'a>, usize),
}

/// `.key` for identifiers, `["..."]` (JSON-quoted) for anything else.
fn push_key(path: &mut String, key: &str) {
    let mut chars = key.chars();
    let is_ident = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if is_ident {
        path.push('.');
        path.push_str(key);
    } else {
        path.push('[');
        path.push_str(&Value::String(key.to_string()).to_string());
        path.push(']');
    }
}

/// Applies `f` to every string leaf in place. Objects and arrays keep
/// their keys and order.
fn map_strings<F>(mut input: Value, mut f: F) -> Value
where
    F: FnMut(String) -> String,
{
    {
        let mut stack: Vec<&mut Value> = vec![&mut input];
        while let Some(value) = stack.pop() {
            match value {
                Value::String(s) => *s = f(std::mem::take(s)),
                Value::Array(items) => stack.extend(items.iter_mut()),
                Value::Object(map) => stack.extend(map.values_mut()),
                _ => {}
            }
        }
    }
    input
}

/// Single left-to-right pass: `&amp;lt;` becomes `&lt;`, never `<`.
pub fn unescape_text(input: &str) -> String {
    SAFE_ENTITY
        .replace_all(input, |caps: &Captures| match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            _ => ">",
        })
        .into_owned()
}

static DEFAULT_CLEANER: LazyLock<HtmlCleaner> = LazyLock::new(HtmlCleaner::default);

/// Strips all HTML tags using the default sanitizer.
pub fn strip_tags(input: &str) -> String {
    DEFAULT_CLEANER.strip_tags(input)
}

/// Formats `input` as a tag value using the default sanitizer.
pub fn format_as_tag(input: &str) -> String {
    DEFAULT_CLEANER.format_as_tag(input)
}

/// Entity-escapes every string in `input` using the default sanitizer.
pub fn escape_structure(input: Value) -> Value {
    DEFAULT_CLEANER.escape_structure(input)
}

pub fn assert_escaped(input: Value) -> Result<Value, SanitizeError> {
    DEFAULT_CLEANER.assert_escaped(input)
}

pub fn unescape_structure(input: Value) -> Value {
    DEFAULT_CLEANER.unescape_structure(input)
}
