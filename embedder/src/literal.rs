//! Quoted-literal encoding for the launcher sources.
//!
//! Source text goes through ordered passes: escape introducers first, so
//! later passes can add escapes without them being doubled, then delimiters,
//! then placeholder quotes, then interpolation openers, then carriage returns.
//! The result is wrapped in the delimiter.

use std::fmt;
use std::path::Path;

use anyhow::{Result, anyhow, bail};
use clap::ValueEnum;
use serde::Deserialize;

/// Literal syntax of a target launcher file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    /// JavaScript template literal (`bin/nadm.js`).
    Js,
    /// Rust string literal (`launcher/src/embedded.rs`).
    Rust,
}

impl Syntax {
    /// Character that opens and closes the literal.
    pub const fn delimiter(self) -> char {
        match self {
            Self::Js => '`',
            Self::Rust => '"',
        }
    }

    /// Character that starts an escape sequence.
    pub const fn escape(self) -> char {
        '\\'
    }

    /// Sequence that would start an embedded expression, if the syntax has one.
    pub const fn interpolation(self) -> Option<&'static str> {
        match self {
            Self::Js => Some("${"),
            Self::Rust => None,
        }
    }

    /// Placeholder token, quotes included, that the build step replaces.
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Js => "'{{CORE_SH}}'",
            Self::Rust => "\"{{CORE_SH}}\"",
        }
    }

    /// Quote character framing [`Syntax::placeholder`].
    pub const fn placeholder_quote(self) -> char {
        match self {
            Self::Js => '\'',
            Self::Rust => '"',
        }
    }

    /// Guess the syntax from a file extension.
    pub fn for_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("js" | "cjs" | "mjs") => Ok(Self::Js),
            Some("rs") => Ok(Self::Rust),
            _ => Err(anyhow!(
                "cannot infer literal syntax for {} (pass --syntax)",
                path.display()
            )),
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Js => f.write_str("js"),
            Self::Rust => f.write_str("rust"),
        }
    }
}

/// Pass 1: double every escape introducer.
pub fn escape_introducers(text: &str, syntax: Syntax) -> String {
    let escape = syntax.escape();
    text.replace(escape, &format!("{escape}{escape}"))
}

/// Pass 2: escape every delimiter so the literal cannot end early.
pub fn escape_delimiters(text: &str, syntax: Syntax) -> String {
    let delimiter = syntax.delimiter();
    text.replace(delimiter, &format!("{}{delimiter}", syntax.escape()))
}

/// Escape the placeholder's quote so the token never survives inside a literal.
///
/// A no-op when the quote is the delimiter, which pass 2 already escaped.
/// Otherwise the next build would find the token in the embedded script and
/// splice into it instead of failing.
pub fn escape_placeholder_quotes(text: &str, syntax: Syntax) -> String {
    let quote = syntax.placeholder_quote();
    if quote == syntax.delimiter() {
        return text.to_string();
    }
    text.replace(quote, &format!("{}{quote}", syntax.escape()))
}

/// Pass 3: escape every interpolation opener so nothing is evaluated.
pub fn escape_interpolation(text: &str, syntax: Syntax) -> String {
    match syntax.interpolation() {
        Some(open) => text.replace(open, &format!("{}{open}", syntax.escape())),
        None => text.to_string(),
    }
}

/// Pass 4: write carriage returns as `\r`.
///
/// Template literals normalise a raw CR to LF and Rust rejects a bare CR in a
/// string literal, so neither would round-trip.
pub fn escape_carriage_returns(text: &str, syntax: Syntax) -> String {
    text.replace('\r', &format!("{}r", syntax.escape()))
}

/// Encode `source` as a complete quoted literal.
pub fn to_literal(source: &str, syntax: Syntax) -> String {
    let escaped = escape_introducers(source, syntax);
    let escaped = escape_delimiters(&escaped, syntax);
    let escaped = escape_placeholder_quotes(&escaped, syntax);
    let escaped = escape_interpolation(&escaped, syntax);
    let escaped = escape_carriage_returns(&escaped, syntax);
    let delimiter = syntax.delimiter();
    format!("{delimiter}{escaped}{delimiter}")
}

/// Decode a literal the way the target language would.
///
/// Only the escapes produced by [`to_literal`] are accepted; anything else
/// (including an unescaped delimiter or interpolation opener) is an error.
pub fn decode_literal(literal: &str, syntax: Syntax) -> Result<String> {
    let delimiter = syntax.delimiter();
    let escape = syntax.escape();
    let inner = literal
        .strip_prefix(delimiter)
        .and_then(|rest| rest.strip_suffix(delimiter))
        .ok_or_else(|| anyhow!("literal is not wrapped in {delimiter}"))?;

    let mut decoded = String::with_capacity(inner.len());
    let mut chars = inner.char_indices();
    while let Some((at, c)) = chars.next() {
        if c == escape {
            match chars.next().map(|(_, next)| next) {
                Some('r') => decoded.push('\r'),
                Some(next)
                    if next == escape
                        || next == delimiter
                        || next == syntax.placeholder_quote() =>
                {
                    decoded.push(next);
                }
                Some(next)
                    if syntax
                        .interpolation()
                        .is_some_and(|open| open.starts_with(next)) =>
                {
                    decoded.push(next);
                }
                Some(next) => bail!("unsupported escape {escape}{next} at byte {at}"),
                None => bail!("literal ends inside an escape"),
            }
        } else if c == delimiter {
            bail!("unescaped {delimiter} at byte {at}");
        } else if let Some(open) = syntax
            .interpolation()
            .filter(|open| inner[at..].starts_with(open))
        {
            bail!("unescaped {open} at byte {at}");
        } else {
            decoded.push(c);
        }
    }
    Ok(decoded)
}
