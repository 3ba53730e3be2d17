//! Directive attribute scanning over component markup.
//!
//! A directive is an attribute of the form `doc-<kind>="<value>"` where
//! `<kind>` is one of a fixed keyword set and `<value>` names the directive
//! declared in the component's `directives` map. The scanner accepts one or
//! more quote characters (`"`, `'` or a backslash, so escaped JSON markup
//! matches too) on either side of the value.

use std::fmt;
use std::str::FromStr;

const PREFIX: &str = "doc-";

/// The fixed set of directive keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Container,
    Editable,
    Html,
    Image,
    Include,
    Link,
    Style,
    Toggle,
    Video,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 9] = [
        DirectiveKind::Container,
        DirectiveKind::Editable,
        DirectiveKind::Html,
        DirectiveKind::Image,
        DirectiveKind::Include,
        DirectiveKind::Link,
        DirectiveKind::Style,
        DirectiveKind::Toggle,
        DirectiveKind::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveKind::Container => "container",
            DirectiveKind::Editable => "editable",
            DirectiveKind::Html => "html",
            DirectiveKind::Image => "image",
            DirectiveKind::Include => "include",
            DirectiveKind::Link => "link",
            DirectiveKind::Style => "style",
            DirectiveKind::Toggle => "toggle",
            DirectiveKind::Video => "video",
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DirectiveKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown directive kind: {}", s))
    }
}

/// One `doc-<kind>="<value>"` attribute found in markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveOccurrence<'a> {
    pub kind: DirectiveKind,
    pub value: &'a str,
}

/// Iterator over the directive attributes of a piece of markup.
pub struct DirectiveScanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> DirectiveScanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Try to match a directive starting right after a `doc-` prefix.
    ///
    /// Returns the occurrence and the byte offset just past the closing quotes.
    fn match_at(&self, start: usize) -> Option<(DirectiveOccurrence<'a>, usize)> {
        let rest = &self.input[start..];
        let kind = DirectiveKind::ALL
            .into_iter()
            .find(|kind| rest.starts_with(kind.as_str()) && rest[kind.as_str().len()..].starts_with('='))?;

        let bytes = self.input.as_bytes();
        let mut cursor = start + kind.as_str().len() + 1;

        let quotes = count_while(&bytes[cursor..], is_quote);
        if quotes == 0 {
            return None;
        }
        cursor += quotes;

        let value_len = count_while(&bytes[cursor..], is_value_byte);
        if value_len == 0 {
            return None;
        }
        let value = &self.input[cursor..cursor + value_len];
        cursor += value_len;

        let closing = count_while(&bytes[cursor..], is_quote);
        if closing == 0 {
            return None;
        }

        Some((DirectiveOccurrence { kind, value }, cursor + closing))
    }
}

impl<'a> Iterator for DirectiveScanner<'a> {
    type Item = DirectiveOccurrence<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.input.len() {
            let offset = self.input[self.pos..].find(PREFIX)?;
            let start = self.pos + offset + PREFIX.len();

            match self.match_at(start) {
                Some((occurrence, end)) => {
                    self.pos = end;
                    return Some(occurrence);
                }
                None => self.pos = self.pos + offset + 1,
            }
        }
        None
    }
}

/// Collect every directive occurrence in `html`, in document order.
pub fn scan_directives(html: &str) -> Vec<DirectiveOccurrence<'_>> {
    DirectiveScanner::new(html).collect()
}

fn is_quote(b: u8) -> bool {
    matches!(b, b'"' | b'\'' | b'\\')
}

fn is_value_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn count_while(bytes: &[u8], pred: fn(u8) -> bool) -> usize {
    bytes.iter().take_while(|b| pred(**b)).count()
}
