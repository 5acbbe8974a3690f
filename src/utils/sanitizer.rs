// src/utils/sanitizer.rs

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::{Captures, Regex};

/// A complete character reference, or one of the characters that must be encoded.
/// References are matched first so they pass through untouched.
static ESCAPABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"&(?:#[0-9]+;|#[xX][0-9a-fA-F]+;|[A-Za-z][A-Za-z0-9]*;)|[&<>"]"#)
        .expect("escape pattern is valid")
});

/// A start or end tag, capturing its name.
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?([A-Za-z][A-Za-z0-9-]*)(?:\s[^<>]*)?/?>").expect("tag pattern is valid")
});

/// The primitives the facade builds on.
///
/// * `strip` removes every tag, attribute and style, leaving text content.
/// * `escape` turns HTML special characters into entity references.
/// * `escape_attribute` must leave no tag delimiters at all; it defaults to `escape`.
pub trait Sanitizer: Send + Sync {
    fn strip(&self, text: &str) -> String;
    fn escape(&self, text: &str) -> String;

    fn escape_attribute(&self, text: &str) -> String {
        self.escape(text)
    }
}

/// How `HtmlSanitizer::escape` treats its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EscapeMode {
    /// Encode `<`, `>`, `"` and any `&` that does not start a character
    /// reference. Existing references such as `&#39;` are kept as they are.
    #[default]
    Entities,
    /// Keep tags on ammonia's default allowlist (e.g. `<b>`), cleaning their
    /// attributes; every other tag is entity-escaped and shown as text.
    Allowlist,
}

impl fmt::Display for EscapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscapeMode::Entities => write!(f, "entities"),
            EscapeMode::Allowlist => write!(f, "allowlist"),
        }
    }
}

impl FromStr for EscapeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entities" => Ok(EscapeMode::Entities),
            "allowlist" => Ok(EscapeMode::Allowlist),
            other => Err(format!("unknown escape mode: {}", other)),
        }
    }
}

/// Production sanitizer backed by `ammonia`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSanitizer {
    mode: EscapeMode,
}

impl HtmlSanitizer {
    pub fn new(mode: EscapeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> EscapeMode {
        self.mode
    }
}

impl Sanitizer for HtmlSanitizer {
    /// Note: ammonia drops the *content* of `<script>` and `<style>` as well,
    /// and serializes literal `<`/`>` in text as `&lt;`/`&gt;`.
    fn strip(&self, text: &str) -> String {
        ammonia::Builder::default()
            .tags(std::collections::HashSet::new())
            .clean(text)
            .to_string()
    }

    fn escape(&self, text: &str) -> String {
        match self.mode {
            EscapeMode::Entities => encode_entities(text),
            EscapeMode::Allowlist => clean_allowlisted(text),
        }
    }

    /// Always entity-encodes, whatever the mode.
    fn escape_attribute(&self, text: &str) -> String {
        encode_entities(text)
    }
}

/// Single pass; valid references survive, so the result is a fixed point.
fn encode_entities(text: &str) -> String {
    ESCAPABLE
        .replace_all(text, |caps: &Captures| match &caps[0] {
            "&" => "&amp;".to_string(),
            "<" => "&lt;".to_string(),
            ">" => "&gt;".to_string(),
            "\"" => "&quot;".to_string(),
            reference => reference.to_string(),
        })
        .into_owned()
}

/// Escapes tags outside ammonia's default allowlist, then lets ammonia clean
/// the rest. Escaped tags reach ammonia as text and are kept as text.
fn clean_allowlisted(text: &str) -> String {
    let builder = ammonia::Builder::default();
    let allowed = builder.clone_tags();

    let guarded = TAG.replace_all(text, |caps: &Captures| {
        let name = caps[1].to_ascii_lowercase();
        if allowed.contains(name.as_str()) {
            caps[0].to_string()
        } else {
            encode_entities(&caps[0])
        }
    });

    builder.clean(&guarded).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_removes_markup() {
        let s = HtmlSanitizer::default();
        assert_eq!(s.strip("<b>hi</b>"), "hi");
        assert_eq!(s.strip("<p class=\"x\" style=\"color:red\">a <i>b</i></p>"), "a b");
    }

    #[test]
    fn test_strip_drops_script_content() {
        let s = HtmlSanitizer::default();
        assert_eq!(s.strip("ok<script>alert(1)</script>"), "ok");
    }

    #[test]
    fn test_strip_malformed_markup() {
        let s = HtmlSanitizer::default();
        let out = s.strip("<div><b>unclosed <i>tags");
        assert_eq!(out, "unclosed tags");

        let out = s.strip("1 < 2 > 0");
        assert!(!out.contains('<') && !out.contains('>'));
    }

    #[test]
    fn test_escape_entities() {
        let s = HtmlSanitizer::default();
        assert_eq!(s.escape("<x>"), "&lt;x&gt;");
        assert_eq!(s.escape("a & \"b\""), "a &amp; &quot;b&quot;");
        // Single quotes are left for callers to handle.
        assert_eq!(s.escape("it's"), "it's");
    }

    #[test]
    fn test_escape_keeps_character_references() {
        let s = HtmlSanitizer::default();
        for input in ["it&#39;s", "&copy; 2024", "a&nbsp;b", "&#x27;", "&lt;b&gt;", "&amp;"] {
            assert_eq!(s.escape(input), input);
        }
    }

    #[test]
    fn test_escape_encodes_bare_ampersands() {
        let s = HtmlSanitizer::default();
        assert_eq!(s.escape("AT&T"), "AT&amp;T");
        assert_eq!(s.escape("&;"), "&amp;;");
        assert_eq!(s.escape("&#;"), "&amp;#;");
        assert_eq!(s.escape("&copy"), "&amp;copy");
    }

    #[test]
    fn test_escape_entities_is_idempotent() {
        let s = HtmlSanitizer::default();
        let once = s.escape("Tom & Jerry <3");
        assert_eq!(once, "Tom &amp; Jerry &lt;3");
        assert_eq!(s.escape(&once), once);
    }

    #[test]
    fn test_escape_allowlist_keeps_safe_tags() {
        let s = HtmlSanitizer::new(EscapeMode::Allowlist);
        assert_eq!(s.escape("<b>bold</b>"), "<b>bold</b>");
        assert_eq!(s.escape("<b onclick=\"x()\">hi</b>"), "<b>hi</b>");
    }

    #[test]
    fn test_escape_allowlist_escapes_other_tags() {
        let s = HtmlSanitizer::new(EscapeMode::Allowlist);
        assert_eq!(s.escape("<x>"), "&lt;x&gt;");
        assert_eq!(
            s.escape("x<script>evil()</script>"),
            "x&lt;script&gt;evil()&lt;/script&gt;"
        );
        assert_eq!(s.escape("<b>ok</b><x>"), "<b>ok</b>&lt;x&gt;");
    }

    #[test]
    fn test_escape_attribute_ignores_mode() {
        let s = HtmlSanitizer::new(EscapeMode::Allowlist);
        assert_eq!(s.escape_attribute("<b>x</b>"), "&lt;b&gt;x&lt;/b&gt;");
    }

    #[test]
    fn test_escape_mode_parse() {
        assert_eq!("entities".parse::<EscapeMode>(), Ok(EscapeMode::Entities));
        assert_eq!(" AllowList ".parse::<EscapeMode>(), Ok(EscapeMode::Allowlist));
        assert!("bleach".parse::<EscapeMode>().is_err());
        assert_eq!(EscapeMode::Allowlist.to_string(), "allowlist");
    }
}
