//! HTML assembly with escaping enforced by the type system.
//!
//! [`HtmlBuilder`] accepts raw markup only as `&'static str`, i.e. literals
//! compiled into the binary. Every runtime string goes through [`HtmlBuilder::text`],
//! which escapes `& < > " '`. The only way to obtain a [`Markup`] is to finish a
//! builder, so unescaped request data cannot reach a response body.

use std::fmt;

/// Escape `s` for use in HTML text and double- or single-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    push_escaped(&mut out, s);
    out
}

fn push_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// A finished, safe-to-send HTML document or fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default)]
pub struct HtmlBuilder {
    buf: String,
}

impl HtmlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    /// Append literal markup.
    pub fn raw(&mut self, markup: &'static str) -> &mut Self {
        self.buf.push_str(markup);
        self
    }

    /// Append a runtime value, escaped.
    pub fn text(&mut self, value: &str) -> &mut Self {
        push_escaped(&mut self.buf, value);
        self
    }

    /// Append an already finished fragment.
    pub fn markup(&mut self, fragment: &Markup) -> &mut Self {
        self.buf.push_str(fragment.as_str());
        self
    }

    pub fn finish(self) -> Markup {
        Markup(self.buf)
    }
}
