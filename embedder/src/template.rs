//! Placeholder substitution in launcher templates.

use std::fmt;

use anyhow::{Context, Result, bail};
use regex::Regex;

use crate::literal::{Syntax, decode_literal, to_literal};

/// The target does not contain its placeholder: wrong path, or already built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderMissing {
    pub placeholder: &'static str,
}

impl fmt::Display for PlaceholderMissing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "placeholder {} not found (already built?)",
            self.placeholder
        )
    }
}

impl std::error::Error for PlaceholderMissing {}

/// Double every `$` so regex replacement treats the text literally.
///
/// `$1`, `${name}` and `$$` are capture references in the replacement text
/// given to `Regex::replace`; `$$` is the literal dollar.
pub fn escape_replacement(text: &str) -> String {
    text.replace('$', "$$")
}

fn placeholder_pattern(syntax: Syntax) -> Result<Regex> {
    Regex::new(&regex::escape(syntax.placeholder())).context("compile placeholder pattern")
}

/// Number of placeholder occurrences in `template`.
pub fn placeholder_count(template: &str, syntax: Syntax) -> Result<usize> {
    Ok(placeholder_pattern(syntax)?.find_iter(template).count())
}

/// Replace the single placeholder in `template` with `source` as a literal.
///
/// Fails with [`PlaceholderMissing`] when there is no placeholder, and
/// refuses templates with more than one. The literal is decoded and compared
/// with `source` before substitution, and the result must no longer contain
/// the placeholder so that a second build fails fast.
pub fn embed(source: &str, template: &str, syntax: Syntax) -> Result<String> {
    let pattern = placeholder_pattern(syntax)?;
    let placeholder = syntax.placeholder();
    match pattern.find_iter(template).count() {
        0 => return Err(PlaceholderMissing { placeholder }.into()),
        1 => {}
        count => bail!("placeholder {placeholder} appears {count} times, expected exactly once"),
    }

    let literal = to_literal(source, syntax);
    let decoded = decode_literal(&literal, syntax).context("decode escaped literal")?;
    if decoded != source {
        bail!("escaped {syntax} literal does not decode back to the source text");
    }

    let replacement = escape_replacement(&literal);
    let rendered = pattern
        .replacen(template, 1, replacement.as_str())
        .into_owned();
    if pattern.is_match(&rendered) {
        bail!("placeholder {placeholder} survives in the embedded {syntax} literal");
    }
    Ok(rendered)
}
